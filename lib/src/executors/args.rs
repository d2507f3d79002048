//! The argument-loop state machine shared by every verb (§4.9).
//!
//! The named states `Top`, `InNest`, `ExpectValue` and `ExpectSubValue`
//! collapse here into the control flow of [`run`] itself: a keyword match
//! immediately requires and consumes its value (folding `ExpectValue`/
//! `ExpectSubValue` into one step), and `InNest` is simply "we're inside
//! the `while` loop body started by a nest keyword".

use crate::cursor::TokenCursor;
use crate::error::ArgError;
use crate::numeric::{parse_bool, parse_int, parse_uint};
use crate::wire::encoder::Encoder;

#[derive(Clone, Copy)]
pub enum ValueKind {
    U32,
    U64,
    S32,
    Str,
    Bool,
    Enum(fn(&str, &str) -> Result<u32, ArgError>),
}

#[derive(Clone, Copy)]
pub struct KeywordSpec {
    pub keyword: &'static str,
    pub attr_id: u16,
    pub kind: ValueKind,
}

pub struct NestSpec {
    pub keyword: &'static str,
    pub attr_id: u16,
    /// The attribute the nest keyword's own immediate value is stored
    /// under, e.g. `parent-device 0` stores `0` as `PARENT_ID`.
    pub id_attr: u16,
    pub sub_keywords: &'static [KeywordSpec],
}

fn apply(enc: &mut Encoder, spec: &KeywordSpec, value: &str) -> Result<(), ArgError> {
    match spec.kind {
        ValueKind::U32 => enc.put_u32(spec.attr_id, parse_uint(spec.keyword, value, 32)? as u32),
        ValueKind::U64 => enc.put_u64(spec.attr_id, parse_uint(spec.keyword, value, 64)?),
        ValueKind::S32 => enc.put_s32(spec.attr_id, parse_int(spec.keyword, value, 32)? as i32),
        ValueKind::Str => enc.put_str(spec.attr_id, value),
        ValueKind::Bool => enc.put_u32(spec.attr_id, parse_bool(spec.keyword, value)? as u32),
        ValueKind::Enum(encode) => enc.put_u32(spec.attr_id, encode(spec.keyword, value)?),
    }
    Ok(())
}

fn require_value<'a>(keyword: &str, cursor: &mut TokenCursor<'a>) -> Result<&'a str, ArgError> {
    cursor
        .take()
        .ok_or_else(|| ArgError::MissingArgument(keyword.to_string()))
}

/// Walks every token, building attributes onto `enc`. Returns once the
/// cursor is empty or an unrecognized top-level token is seen.
pub fn run(
    cursor: &mut TokenCursor,
    enc: &mut Encoder,
    top_keywords: &[KeywordSpec],
    nests: &[NestSpec],
) -> Result<(), ArgError> {
    run_tracking_seen(cursor, enc, top_keywords, nests, &[])
}

/// As [`run`], but every keyword in `required` must have been seen at the
/// top level at least once, or the loop fails with `MissingArgument` (the
/// post-loop check from §4.9, e.g. `device id` / `pin id` on SET).
pub fn run_required(
    cursor: &mut TokenCursor,
    enc: &mut Encoder,
    top_keywords: &[KeywordSpec],
    nests: &[NestSpec],
    required: &[&'static str],
) -> Result<(), ArgError> {
    run_tracking_seen(cursor, enc, top_keywords, nests, required)
}

fn run_tracking_seen(
    cursor: &mut TokenCursor,
    enc: &mut Encoder,
    top_keywords: &[KeywordSpec],
    nests: &[NestSpec],
    required: &[&'static str],
) -> Result<(), ArgError> {
    let mut seen: Vec<&'static str> = Vec::new();

    while let Some(token) = cursor.peek() {
        if let Some(spec) = top_keywords.iter().find(|k| k.keyword == token) {
            cursor.advance();
            let value = require_value(spec.keyword, cursor)?;
            apply(enc, spec, value)?;
            seen.push(spec.keyword);
            continue;
        }

        if let Some(nest) = nests.iter().find(|n| n.keyword == token) {
            cursor.advance();
            let id_value = require_value(nest.keyword, cursor)?;
            let id_num = parse_uint(nest.keyword, id_value, 32)? as u32;
            enc.put_nested_open(nest.attr_id);
            enc.put_u32(nest.id_attr, id_num);
            run_nest(cursor, enc, nest)?;
            enc.put_nested_close();
            continue;
        }

        return Err(ArgError::Usage(token.to_string()));
    }

    for keyword in required {
        if !seen.contains(keyword) {
            return Err(ArgError::MissingArgument(keyword.to_string()));
        }
    }
    Ok(())
}

fn run_nest(cursor: &mut TokenCursor, enc: &mut Encoder, nest: &NestSpec) -> Result<(), ArgError> {
    while let Some(token) = cursor.peek() {
        match nest.sub_keywords.iter().find(|k| k.keyword == token) {
            Some(spec) => {
                cursor.advance();
                let value = require_value(spec.keyword, cursor)?;
                apply(enc, spec, value)?;
            }
            // Unrecognized sub-keyword (including another nest's own
            // keyword): the block closes and the token is re-evaluated by
            // the enclosing top-level loop.
            None => return Ok(()),
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::enums::direction;
    use crate::schema::{parent_device, pin_attr};
    use crate::wire::decoder::AttributeSet;

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
    ];

    const PARENT_DEVICE: NestSpec = NestSpec {
        keyword: "parent-device",
        attr_id: pin_attr::PARENT_DEVICE,
        id_attr: parent_device::PARENT_ID,
        sub_keywords: PARENT_DEVICE_SUB,
    };

    fn toks(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn two_nested_blocks_do_not_bleed_into_each_other() {
        let t = toks(&[
            "parent-device",
            "0",
            "direction",
            "input",
            "prio",
            "10",
            "parent-device",
            "1",
            "direction",
            "output",
        ]);
        let mut cursor = TokenCursor::new(&t);
        let mut enc = Encoder::new();
        run(&mut cursor, &mut enc, &[], &[PARENT_DEVICE]).unwrap();
        assert!(cursor.empty());

        let buf = enc.finish();
        let set = AttributeSet::parse(&buf).unwrap();
        let entries = set.get_all(pin_attr::PARENT_DEVICE);
        assert_eq!(entries.len(), 2);

        let first = AttributeSet::parse(&entries[0].bytes).unwrap();
        assert_eq!(first.u32(parent_device::PARENT_ID).unwrap(), Some(0));
        assert_eq!(first.u32(parent_device::PRIO).unwrap(), Some(10));

        let second = AttributeSet::parse(&entries[1].bytes).unwrap();
        assert_eq!(second.u32(parent_device::PARENT_ID).unwrap(), Some(1));
        assert_eq!(second.u32(parent_device::PRIO).unwrap(), None);
    }

    #[test]
    fn missing_value_is_an_error() {
        let t = toks(&["parent-device", "0", "direction"]);
        let mut cursor = TokenCursor::new(&t);
        let mut enc = Encoder::new();
        let err = run(&mut cursor, &mut enc, &[], &[PARENT_DEVICE]).unwrap_err();
        assert!(matches!(err, ArgError::MissingArgument(_)));
    }

    #[test]
    fn unrecognized_top_level_keyword_is_a_usage_error() {
        let t = toks(&["not-a-keyword", "5"]);
        let mut cursor = TokenCursor::new(&t);
        let mut enc = Encoder::new();
        let err = run(&mut cursor, &mut enc, &[], &[]).unwrap_err();
        assert!(matches!(err, ArgError::Usage(_)));
    }
}
