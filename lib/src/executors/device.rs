//! `device show` / `device set` / `device id-get` (§6.1).

use futures::StreamExt;

use crate::cursor::TokenCursor;
use crate::enums::device_type;
use crate::error::{ArgError, CoreError};
use crate::executors::args::{run, run_required, KeywordSpec, ValueKind};
use crate::model::Device;
use crate::numeric::parse_uint;
use crate::render::render_device;
use crate::schema::{cmd, dev_attr};
use crate::sink::Sink;
use crate::transport::Transport;
use crate::wire::decoder::AttributeSet;
use crate::wire::encoder::Encoder;

const SET_KEYWORDS: &[KeywordSpec] = &[
    KeywordSpec {
        keyword: "id",
        attr_id: dev_attr::ID,
        kind: ValueKind::U32,
    },
    KeywordSpec {
        keyword: "phase-offset-monitor",
        attr_id: dev_attr::PHASE_OFFSET_MONITOR,
        kind: ValueKind::Bool,
    },
    KeywordSpec {
        keyword: "phase-offset-avg-factor",
        attr_id: dev_attr::PHASE_OFFSET_AVG_FACTOR,
        kind: ValueKind::U32,
    },
];

const ID_GET_KEYWORDS: &[KeywordSpec] = &[
    KeywordSpec {
        keyword: "module-name",
        attr_id: dev_attr::MODULE_NAME,
        kind: ValueKind::Str,
    },
    KeywordSpec {
        keyword: "clock-id",
        attr_id: dev_attr::CLOCK_ID,
        kind: ValueKind::U64,
    },
    KeywordSpec {
        keyword: "type",
        attr_id: dev_attr::TYPE,
        kind: ValueKind::Enum(device_type::encode),
    },
];

/// `dpll device show [id ID]`: single entity if `id` was given, otherwise
/// a dump wrapped in a `device` array.
pub async fn show(
    transport: &mut Transport,
    sink: &mut dyn Sink,
    cursor: &mut TokenCursor<'_>,
) -> Result<(), CoreError> {
    let id = match cursor.peek() {
        Some("id") => {
            cursor.advance();
            let value = cursor
                .take()
                .ok_or_else(|| ArgError::MissingArgument("id".to_string()))?;
            Some(parse_uint("id", value, 32)? as u32)
        }
        _ => None,
    };

    match id {
        Some(id) => {
            let mut enc = Encoder::new();
            enc.put_u32(dev_attr::ID, id);
            let reply = transport.request_single(cmd::DEVICE_GET, enc.finish()).await?;
            let set = AttributeSet::parse(&reply)?;
            let dev = Device::from_attrs(&set)?;
            render_device(sink, &dev, None);
        }
        None => {
            let enc = Encoder::new();
            let mut replies = transport.request_dump(cmd::DEVICE_GET, enc.finish()).await?;
            sink.open_array("device");
            while let Some(reply) = replies.next().await {
                let payload = match reply {
                    Ok(payload) => payload,
                    Err(e) => return Err(e.into()),
                };
                match AttributeSet::parse(&payload).and_then(|set| Device::from_attrs(&set)) {
                    Ok(dev) => render_device(sink, &dev, None),
                    Err(e) => log::warn!("skipping undecodable device dump element: {e}"),
                }
            }
            sink.close_array();
        }
    }
    Ok(())
}

/// `dpll device set id ID [phase-offset-monitor ...] [phase-offset-avg-factor ...]`.
pub async fn set(transport: &mut Transport, cursor: &mut TokenCursor<'_>) -> Result<(), CoreError> {
    let mut enc = Encoder::new();
    run_required(cursor, &mut enc, SET_KEYWORDS, &[], &["id"])?;
    transport.request_single(cmd::DEVICE_SET, enc.finish()).await?;
    Ok(())
}

/// `dpll device id-get [module-name STR] [clock-id U64] [type ...]`: the
/// kernel replies with exactly one `id` attribute, or a netlink error if
/// the filter matches more than one device.
pub async fn id_get(
    transport: &mut Transport,
    sink: &mut dyn Sink,
    cursor: &mut TokenCursor<'_>,
) -> Result<(), CoreError> {
    let mut enc = Encoder::new();
    run(cursor, &mut enc, ID_GET_KEYWORDS, &[])?;
    let reply = transport
        .request_single(cmd::DEVICE_ID_GET, enc.finish())
        .await?;
    let set = AttributeSet::parse(&reply)?;
    let id = set.u32(dev_attr::ID)?.ok_or(CoreError::KernelMissingId)?;
    sink.open_entity("device", id);
    sink.close_entity();
    Ok(())
}
