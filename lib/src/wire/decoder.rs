//! Wire Decoder + Multi-Attribute Aggregator (§4.4, §4.5).
//!
//! `AttributeSet::parse` walks the attribute stream three times: a count
//! pass sizes the per-id vectors so a `push` in the collect pass never
//! reallocates mid-walk, a collect pass copies each attribute's raw value
//! bytes into its id's vector, and typed access (`u32`, `string`, ...) is
//! the expand pass, done lazily by the caller rather than eagerly for every
//! attribute up front.

use std::collections::HashMap;

use netlink_packet_utils::nla::NlasIterator;
use netlink_packet_utils::parsers::{parse_i32, parse_i64, parse_string, parse_u32, parse_u64};

use crate::error::DecodeError;

#[derive(Debug, Clone)]
pub struct AttrValue {
    pub nested: bool,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct AttributeSet {
    map: HashMap<u16, Vec<AttrValue>>,
}

impl AttributeSet {
    pub fn parse(buf: &[u8]) -> Result<Self, DecodeError> {
        let mut counts: HashMap<u16, usize> = HashMap::new();
        for nla in NlasIterator::new(buf) {
            let nla = nla.map_err(|e| DecodeError::Malformed(e.to_string()))?;
            *counts.entry(nla.kind()).or_insert(0) += 1;
        }

        let mut map: HashMap<u16, Vec<AttrValue>> = HashMap::new();
        for (id, n) in &counts {
            let mut values = Vec::new();
            values
                .try_reserve(*n)
                .map_err(|_| DecodeError::AllocationFailure)?;
            map.insert(*id, values);
        }

        for nla in NlasIterator::new(buf) {
            let nla = nla.map_err(|e| DecodeError::Malformed(e.to_string()))?;
            map.entry(nla.kind()).or_default().push(AttrValue {
                nested: nla.nested_flag(),
                bytes: nla.value().to_vec(),
            });
        }

        Ok(AttributeSet { map })
    }

    pub fn get_one(&self, id: u16) -> Option<&AttrValue> {
        self.map.get(&id).and_then(|v| v.first())
    }

    pub fn get_all(&self, id: u16) -> &[AttrValue] {
        self.map.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn u32(&self, id: u16) -> Result<Option<u32>, DecodeError> {
        self.get_one(id)
            .map(|v| parse_u32(&v.bytes).map_err(|_| DecodeError::WrongLength(id)))
            .transpose()
    }

    pub fn u64(&self, id: u16) -> Result<Option<u64>, DecodeError> {
        self.get_one(id)
            .map(|v| parse_u64(&v.bytes).map_err(|_| DecodeError::WrongLength(id)))
            .transpose()
    }

    pub fn string(&self, id: u16) -> Result<Option<String>, DecodeError> {
        self.get_one(id)
            .map(|v| parse_string(&v.bytes).map_err(|_| DecodeError::WrongLength(id)))
            .transpose()
    }

    /// Variable-width signed field per the nested-record parser's width
    /// detection rule: 4 bytes decodes as `s32`, 8 bytes as `s64`; anything
    /// else is a decode error rather than a silent truncation.
    pub fn variable_width_signed(&self, id: u16) -> Result<Option<i64>, DecodeError> {
        match self.get_one(id) {
            None => Ok(None),
            Some(v) => match v.bytes.len() {
                4 => parse_i32(&v.bytes)
                    .map(|n| Some(n as i64))
                    .map_err(|_| DecodeError::WrongLength(id)),
                8 => parse_i64(&v.bytes)
                    .map(Some)
                    .map_err(|_| DecodeError::WrongLength(id)),
                _ => Err(DecodeError::WrongLength(id)),
            },
        }
    }

    pub fn require_one(&self, id: u16) -> Result<&AttrValue, DecodeError> {
        self.get_one(id).ok_or(DecodeError::MissingId)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::schema::dev_attr;
    use crate::wire::encoder::Encoder;

    #[test]
    fn decodes_flat_scalars() {
        let mut enc = Encoder::new();
        enc.put_u32(dev_attr::ID, 9);
        enc.put_str(dev_attr::MODULE_NAME, "hwmon");
        let buf = enc.finish();

        let set = AttributeSet::parse(&buf).unwrap();
        assert_eq!(set.u32(dev_attr::ID).unwrap(), Some(9));
        assert_eq!(
            set.string(dev_attr::MODULE_NAME).unwrap(),
            Some("hwmon".to_string())
        );
    }

    #[test]
    fn aggregates_repeated_attribute_ids_in_order() {
        let mut enc = Encoder::new();
        enc.put_u32(dev_attr::MODE_SUPPORTED, 1);
        enc.put_u32(dev_attr::MODE_SUPPORTED, 2);
        enc.put_u32(dev_attr::MODE_SUPPORTED, 3);
        let buf = enc.finish();

        let set = AttributeSet::parse(&buf).unwrap();
        let all = set.get_all(dev_attr::MODE_SUPPORTED);
        assert_eq!(all.len(), 3);
        let values: Vec<u32> = all
            .iter()
            .map(|v| parse_u32(&v.bytes).unwrap())
            .collect();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn missing_required_id_is_an_error() {
        let set = AttributeSet::parse(&[]).unwrap();
        assert!(matches!(
            set.require_one(dev_attr::ID),
            Err(DecodeError::MissingId)
        ));
    }

    #[test]
    fn variable_width_signed_field_detects_width() {
        let mut enc = Encoder::new();
        enc.put_s32(1, -7);
        let buf = enc.finish();
        let set = AttributeSet::parse(&buf).unwrap();
        assert_eq!(set.variable_width_signed(1).unwrap(), Some(-7));

        let mut enc64 = Encoder::new();
        enc64.put_s64(1, -7);
        let buf64 = enc64.finish();
        let set64 = AttributeSet::parse(&buf64).unwrap();
        assert_eq!(set64.variable_width_signed(1).unwrap(), Some(-7));
    }
}
