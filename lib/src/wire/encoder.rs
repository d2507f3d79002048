//! Wire Encoder (§4.3): builds a flat byte buffer of TLV attributes from a
//! sequence of typed `put_*` calls, supporting one level of nesting via an
//! explicit open/close stack rather than a recursive builder.

use netlink_packet_utils::nla::{DefaultNla, NLA_F_NESTED};
use netlink_packet_utils::Emitable;

pub struct Encoder {
    stack: Vec<Vec<DefaultNla>>,
    open_ids: Vec<u16>,
}

impl Encoder {
    pub fn new() -> Self {
        Encoder {
            stack: vec![Vec::new()],
            open_ids: Vec::new(),
        }
    }

    fn current(&mut self) -> &mut Vec<DefaultNla> {
        self.stack.last_mut().expect("encoder stack is never empty")
    }

    pub fn put_u8(&mut self, id: u16, v: u8) {
        self.current().push(DefaultNla::new(id, vec![v]));
    }

    pub fn put_u32(&mut self, id: u16, v: u32) {
        self.current()
            .push(DefaultNla::new(id, v.to_ne_bytes().to_vec()));
    }

    pub fn put_u64(&mut self, id: u16, v: u64) {
        self.current()
            .push(DefaultNla::new(id, v.to_ne_bytes().to_vec()));
    }

    pub fn put_s32(&mut self, id: u16, v: i32) {
        self.current()
            .push(DefaultNla::new(id, v.to_ne_bytes().to_vec()));
    }

    pub fn put_s64(&mut self, id: u16, v: i64) {
        self.current()
            .push(DefaultNla::new(id, v.to_ne_bytes().to_vec()));
    }

    pub fn put_str(&mut self, id: u16, v: &str) {
        let mut bytes = v.as_bytes().to_vec();
        bytes.push(0);
        self.current().push(DefaultNla::new(id, bytes));
    }

    /// Opens a nested block under `id`; every `put_*` until the matching
    /// `put_nested_close` lands inside it.
    pub fn put_nested_open(&mut self, id: u16) {
        self.open_ids.push(id);
        self.stack.push(Vec::new());
    }

    pub fn put_nested_close(&mut self) {
        let nlas = self
            .stack
            .pop()
            .expect("put_nested_close without a matching put_nested_open");
        let id = self
            .open_ids
            .pop()
            .expect("put_nested_close without a matching put_nested_open");
        let len = nlas.as_slice().buffer_len();
        let mut buf = vec![0u8; len];
        nlas.as_slice().emit(&mut buf);
        self.current()
            .push(DefaultNla::new(id | NLA_F_NESTED, buf));
    }

    /// Serializes every attribute collected at the top level. Every opened
    /// nested block must have been closed first.
    pub fn finish(mut self) -> Vec<u8> {
        assert!(
            self.open_ids.is_empty(),
            "encoder finished with unclosed nested blocks"
        );
        let nlas = self.stack.pop().expect("encoder stack is never empty");
        let len = nlas.as_slice().buffer_len();
        let mut buf = vec![0u8; len];
        nlas.as_slice().emit(&mut buf);
        buf
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::schema::{dev_attr, parent_device, pin_attr};

    #[test]
    fn flat_attributes_round_trip_through_nlas_iterator() {
        let mut enc = Encoder::new();
        enc.put_u32(dev_attr::ID, 7);
        enc.put_str(dev_attr::MODULE_NAME, "hwmon");
        let buf = enc.finish();

        use netlink_packet_utils::nla::NlasIterator;
        let nlas: Vec<_> = NlasIterator::new(buf.as_slice())
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(nlas.len(), 2);
        assert_eq!(nlas[0].kind(), dev_attr::ID);
        assert_eq!(nlas[1].kind(), dev_attr::MODULE_NAME);
    }

    #[test]
    fn nested_block_carries_the_nested_flag() {
        let mut enc = Encoder::new();
        enc.put_nested_open(pin_attr::PARENT_DEVICE);
        enc.put_u32(parent_device::PARENT_ID, 3);
        enc.put_nested_close();
        let buf = enc.finish();

        use netlink_packet_utils::nla::NlasIterator;
        let nlas: Vec<_> = NlasIterator::new(buf.as_slice())
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(nlas.len(), 1);
        assert!(nlas[0].nested_flag());
        assert_eq!(nlas[0].kind(), pin_attr::PARENT_DEVICE);
    }
}
