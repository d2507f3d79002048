//! Transport (§4.11): the sole owner of the netlink socket(s).
//!
//! Subscribing to the `"monitor"` multicast group needs its group id, which
//! is only learned by asking the kernel's generic netlink controller about
//! the `"dpll"` family — and that query itself needs a connection that is
//! already spawned and driving I/O. A [`netlink_proto::Connection`] can only
//! hand out its socket before being spawned (spawning moves it into the
//! task), so a single connection can't both resolve the group id and then
//! subscribe to it. `subscribe_monitor` works around this by opening a
//! *second* connection, adding the membership on its still-unspawned
//! socket, and only then spawning it.

use std::time::Duration;

use futures::{Stream, StreamExt};
use genetlink::{new_connection, GenetlinkHandle};
use netlink_packet_core::{
    DecodeError as WireDecodeError, Emitable, NetlinkHeader, NetlinkMessage, NetlinkPayload,
    ParseableParametrized, NLM_F_ACK, NLM_F_DUMP, NLM_F_REQUEST,
};
use netlink_packet_generic::{
    ctrl::{nlas::GenlCtrlAttrs, GenlCtrl, GenlCtrlCmd},
    GenlFamily, GenlHeader, GenlMessage,
};
use futures::channel::mpsc::UnboundedReceiver;
use netlink_sys::AsyncSocket;

use crate::error::TransportError;

/// Payload type for every "dpll" family message: attribute bytes are
/// already TLV-encoded by the Wire Encoder, so this type only carries the
/// command and opaque body through `genetlink`/`netlink-proto`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DpllMessage {
    pub cmd: u8,
    pub payload: Vec<u8>,
}

impl DpllMessage {
    pub fn new(cmd: u8, payload: Vec<u8>) -> Self {
        DpllMessage { cmd, payload }
    }
}

impl GenlFamily for DpllMessage {
    fn family_name() -> &'static str {
        "dpll"
    }

    fn command(&self) -> u8 {
        self.cmd
    }

    fn version(&self) -> u8 {
        1
    }
}

impl Emitable for DpllMessage {
    fn buffer_len(&self) -> usize {
        self.payload.len()
    }

    fn emit(&self, buffer: &mut [u8]) {
        buffer.copy_from_slice(&self.payload);
    }
}

impl ParseableParametrized<[u8], GenlHeader> for DpllMessage {
    fn parse_with_param(buf: &[u8], header: GenlHeader) -> Result<Self, WireDecodeError> {
        Ok(DpllMessage {
            cmd: header.cmd,
            payload: buf.to_vec(),
        })
    }
}

fn request_header(dump: bool) -> NetlinkHeader {
    let mut header = NetlinkHeader::default();
    header.flags = if dump {
        NLM_F_REQUEST | NLM_F_DUMP
    } else {
        NLM_F_REQUEST | NLM_F_ACK
    };
    header
}

/// One connection's worth of netlink access: request/response plus, once
/// [`subscribe_monitor`](Transport::subscribe_monitor) has been called, a
/// stream of multicast notifications.
pub struct Transport {
    handle: GenetlinkHandle,
}

impl Transport {
    pub async fn connect() -> Result<Self, TransportError> {
        let (conn, handle, _unsolicited) =
            new_connection().map_err(TransportError::SocketSetup)?;
        tokio::spawn(conn);
        let transport = Transport { handle };
        transport
            .handle
            .resolve_family_id::<DpllMessage>()
            .await
            .map_err(|e| TransportError::FamilyUnavailable(e.to_string()))?;
        Ok(transport)
    }

    /// Sends one request and returns exactly the first reply, erroring on a
    /// kernel-reported netlink error.
    pub async fn request_single(&mut self, cmd: u8, payload: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        let msg = NetlinkMessage::new(
            request_header(false),
            GenlMessage::from_payload(DpllMessage::new(cmd, payload)).into(),
        );
        let mut replies = self
            .handle
            .request(msg)
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;
        match replies.next().await {
            Some(Ok(reply)) => extract_payload(reply),
            Some(Err(e)) => Err(TransportError::Request(e.to_string())),
            None => Err(TransportError::Request("no reply from kernel".to_string())),
        }
    }

    /// Sends one dump request and returns every reply's raw attribute bytes
    /// in delivery order.
    pub async fn request_dump(
        &mut self,
        cmd: u8,
        payload: Vec<u8>,
    ) -> Result<impl Stream<Item = Result<Vec<u8>, TransportError>> + '_, TransportError> {
        let msg = NetlinkMessage::new(
            request_header(true),
            GenlMessage::from_payload(DpllMessage::new(cmd, payload)).into(),
        );
        let replies = self
            .handle
            .request(msg)
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;
        Ok(replies.map(|result| match result {
            Ok(reply) => extract_payload(reply),
            Err(e) => Err(TransportError::Request(e.to_string())),
        }))
    }

    /// Resolves the `"monitor"` multicast group id via the controller
    /// family, opens a second connection, subscribes it, and returns the
    /// stream of notification messages.
    pub async fn subscribe_monitor(&mut self) -> Result<MonitorStream, TransportError> {
        let group_id = self.resolve_monitor_group().await?;

        let (mut conn, _handle, rx) = new_connection().map_err(TransportError::SocketSetup)?;
        conn.socket_mut()
            .socket_mut()
            .add_membership(group_id)
            .map_err(TransportError::SocketSetup)?;
        tokio::spawn(conn);

        Ok(MonitorStream { rx })
    }

    async fn resolve_monitor_group(&mut self) -> Result<u32, TransportError> {
        let msg = NetlinkMessage::new(
            request_header(false),
            GenlMessage::from_payload(GenlCtrl {
                cmd: GenlCtrlCmd::GetFamily,
                nlas: vec![GenlCtrlAttrs::FamilyName(DpllMessage::family_name().to_string())],
            })
            .into(),
        );
        let mut replies = self
            .handle
            .request(msg)
            .await
            .map_err(|e| TransportError::FamilyUnavailable(e.to_string()))?;

        while let Some(result) = replies.next().await {
            let reply = result.map_err(|e| TransportError::FamilyUnavailable(e.to_string()))?;
            if let NetlinkPayload::InnerMessage(genlmsg) = reply.payload {
                for nla in genlmsg.payload.nlas {
                    if let GenlCtrlAttrs::McastGroups(groups) = nla {
                        for group in groups {
                            let name = group.iter().find_map(|a| match a {
                                netlink_packet_generic::ctrl::nlas::McastGrpAttrs::Name(n) => {
                                    Some(n.as_str())
                                }
                                _ => None,
                            });
                            let id = group.iter().find_map(|a| match a {
                                netlink_packet_generic::ctrl::nlas::McastGrpAttrs::Id(id) => {
                                    Some(*id)
                                }
                                _ => None,
                            });
                            if name == Some("monitor") {
                                if let Some(id) = id {
                                    return Ok(id);
                                }
                            }
                        }
                    }
                }
            }
        }
        Err(TransportError::FamilyUnavailable(
            "\"dpll\" family has no \"monitor\" multicast group".to_string(),
        ))
    }
}

fn extract_payload(
    msg: NetlinkMessage<GenlMessage<DpllMessage>>,
) -> Result<Vec<u8>, TransportError> {
    match msg.payload {
        NetlinkPayload::InnerMessage(genlmsg) => Ok(genlmsg.payload.payload),
        NetlinkPayload::Error(err) => Err(TransportError::KernelError(err.code.map_or(0, |c| c.get()))),
        _ => Ok(Vec::new()),
    }
}

/// A live subscription to the `"monitor"` multicast group. `next` waits up
/// to `timeout` for one delivery; a `None` means the wait timed out and the
/// notification loop should re-check its cancellation flag.
pub struct MonitorStream {
    rx: UnboundedReceiver<(
        NetlinkMessage<genetlink::message::RawGenlMessage>,
        netlink_sys::SocketAddr,
    )>,
}

impl MonitorStream {
    pub async fn next_notification(&mut self, timeout: Duration) -> Option<DpllMessage> {
        let (msg, _addr) = tokio::time::timeout(timeout, self.rx.next())
            .await
            .ok()
            .flatten()?;
        match msg.payload {
            NetlinkPayload::InnerMessage(raw) => {
                raw.parse_into_genlmsg::<DpllMessage>().ok().map(|g| g.payload)
            }
            _ => None,
        }
    }
}
