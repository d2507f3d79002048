//! `pin show` / `pin set` / `pin id-get` (§6.1).

use futures::StreamExt;

use crate::cursor::TokenCursor;
use crate::enums::{direction, pin_state, pin_type};
use crate::error::{ArgError, CoreError};
use crate::executors::args::{run, run_required, KeywordSpec, NestSpec, ValueKind};
use crate::model::Pin;
use crate::numeric::parse_uint;
use crate::render::render_pin;
use crate::schema::{cmd, parent_device, parent_pin, pin_attr, reference_sync};
use crate::sink::Sink;
use crate::transport::Transport;
use crate::wire::decoder::AttributeSet;
use crate::wire::encoder::Encoder;

const PARENT_DEVICE_SUB: &[KeywordSpec] = &[
    KeywordSpec {
        keyword: "direction",
        attr_id: parent_device::DIRECTION,
        kind: ValueKind::Enum(direction::encode),
    },
    KeywordSpec {
        keyword: "prio",
        attr_id: parent_device::PRIO,
        kind: ValueKind::U32,
    },
    KeywordSpec {
        keyword: "state",
        attr_id: parent_device::STATE,
        kind: ValueKind::Enum(pin_state::encode),
    },
];

const PARENT_PIN_SUB: &[KeywordSpec] = &[KeywordSpec {
    keyword: "state",
    attr_id: parent_pin::STATE,
    kind: ValueKind::Enum(pin_state::encode),
}];

const REFERENCE_SYNC_SUB: &[KeywordSpec] = &[KeywordSpec {
    keyword: "state",
    attr_id: reference_sync::STATE,
    kind: ValueKind::Enum(pin_state::encode),
}];

const SET_NESTS: &[NestSpec] = &[
    NestSpec {
        keyword: "parent-device",
        attr_id: pin_attr::PARENT_DEVICE,
        id_attr: parent_device::PARENT_ID,
        sub_keywords: PARENT_DEVICE_SUB,
    },
    NestSpec {
        keyword: "parent-pin",
        attr_id: pin_attr::PARENT_PIN,
        id_attr: parent_pin::PARENT_ID,
        sub_keywords: PARENT_PIN_SUB,
    },
    NestSpec {
        keyword: "reference-sync",
        attr_id: pin_attr::REFERENCE_SYNC,
        id_attr: reference_sync::PIN_ID,
        sub_keywords: REFERENCE_SYNC_SUB,
    },
];

const SET_KEYWORDS: &[KeywordSpec] = &[
    KeywordSpec {
        keyword: "id",
        attr_id: pin_attr::ID,
        kind: ValueKind::U32,
    },
    KeywordSpec {
        keyword: "frequency",
        attr_id: pin_attr::FREQUENCY,
        kind: ValueKind::U64,
    },
    // Legacy top-level keywords (§9 open question): accepted for backward
    // compatibility, stored outside the nested blocks the kernel actually
    // reads them from.
    KeywordSpec {
        keyword: "direction",
        attr_id: pin_attr::DIRECTION,
        kind: ValueKind::Enum(direction::encode),
    },
    KeywordSpec {
        keyword: "prio",
        attr_id: pin_attr::PRIO,
        kind: ValueKind::U32,
    },
    KeywordSpec {
        keyword: "state",
        attr_id: pin_attr::STATE,
        kind: ValueKind::Enum(pin_state::encode),
    },
    KeywordSpec {
        keyword: "phase-adjust",
        attr_id: pin_attr::PHASE_ADJUST,
        kind: ValueKind::S32,
    },
    KeywordSpec {
        keyword: "esync-frequency",
        attr_id: pin_attr::ESYNC_FREQUENCY,
        kind: ValueKind::U64,
    },
];

const ID_GET_KEYWORDS: &[KeywordSpec] = &[
    KeywordSpec {
        keyword: "module-name",
        attr_id: pin_attr::MODULE_NAME,
        kind: ValueKind::Str,
    },
    KeywordSpec {
        keyword: "clock-id",
        attr_id: pin_attr::CLOCK_ID,
        kind: ValueKind::U64,
    },
    KeywordSpec {
        keyword: "board-label",
        attr_id: pin_attr::BOARD_LABEL,
        kind: ValueKind::Str,
    },
    KeywordSpec {
        keyword: "panel-label",
        attr_id: pin_attr::PANEL_LABEL,
        kind: ValueKind::Str,
    },
    KeywordSpec {
        keyword: "package-label",
        attr_id: pin_attr::PACKAGE_LABEL,
        kind: ValueKind::Str,
    },
    KeywordSpec {
        keyword: "type",
        attr_id: pin_attr::TYPE,
        kind: ValueKind::Enum(pin_type::encode),
    },
];

/// `dpll pin show [id ID] [device ID]`.
pub async fn show(
    transport: &mut Transport,
    sink: &mut dyn Sink,
    cursor: &mut TokenCursor<'_>,
) -> Result<(), CoreError> {
    let mut id = None;
    let mut enc = Encoder::new();

    loop {
        match cursor.peek() {
            Some("id") => {
                cursor.advance();
                let value = cursor
                    .take()
                    .ok_or_else(|| ArgError::MissingArgument("id".to_string()))?;
                let value = parse_uint("id", value, 32)? as u32;
                enc.put_u32(pin_attr::ID, value);
                id = Some(value);
            }
            Some("device") => {
                cursor.advance();
                let value = cursor
                    .take()
                    .ok_or_else(|| ArgError::MissingArgument("device".to_string()))?;
                let value = parse_uint("device", value, 32)? as u32;
                enc.put_u32(pin_attr::DEVICE_ID_FILTER, value);
            }
            Some(other) => return Err(ArgError::Usage(other.to_string()).into()),
            None => break,
        }
    }

    match id {
        Some(_) => {
            let reply = transport.request_single(cmd::PIN_GET, enc.finish()).await?;
            let set = AttributeSet::parse(&reply)?;
            let pin = Pin::from_attrs(&set)?;
            render_pin(sink, &pin, None);
        }
        None => {
            let mut replies = transport.request_dump(cmd::PIN_GET, enc.finish()).await?;
            sink.open_array("pin");
            while let Some(reply) = replies.next().await {
                let payload = match reply {
                    Ok(payload) => payload,
                    Err(e) => return Err(e.into()),
                };
                match AttributeSet::parse(&payload).and_then(|set| Pin::from_attrs(&set)) {
                    Ok(pin) => render_pin(sink, &pin, None),
                    Err(e) => log::warn!("skipping undecodable pin dump element: {e}"),
                }
            }
            sink.close_array();
        }
    }
    Ok(())
}

/// `dpll pin set id ID [...] [parent-device ID ...]... [parent-pin ID ...]...
/// [reference-sync ID ...]...`.
pub async fn set(transport: &mut Transport, cursor: &mut TokenCursor<'_>) -> Result<(), CoreError> {
    let mut enc = Encoder::new();
    run_required(cursor, &mut enc, SET_KEYWORDS, SET_NESTS, &["id"])?;
    transport.request_single(cmd::PIN_SET, enc.finish()).await?;
    Ok(())
}

/// `dpll pin id-get [module-name STR] [clock-id U64] [board-label STR]
/// [panel-label STR] [package-label STR] [type ...]`.
pub async fn id_get(
    transport: &mut Transport,
    sink: &mut dyn Sink,
    cursor: &mut TokenCursor<'_>,
) -> Result<(), CoreError> {
    let mut enc = Encoder::new();
    run(cursor, &mut enc, ID_GET_KEYWORDS, &[])?;
    let reply = transport.request_single(cmd::PIN_ID_GET, enc.finish()).await?;
    let set = AttributeSet::parse(&reply)?;
    let id = set.u32(pin_attr::ID)?.ok_or(CoreError::KernelMissingId)?;
    sink.open_entity("pin", id);
    sink.close_entity();
    Ok(())
}
