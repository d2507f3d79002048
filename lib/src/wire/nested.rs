//! Nested Record Parser (§4.6): typed construction of the small sub-records
//! that occur inside a `Multi` pin attribute (`FREQUENCY_SUPPORTED`,
//! `PARENT_DEVICE`, `PARENT_PIN`, `REFERENCE_SYNC`). Each sub-record is
//! itself a nested TLV blob, decoded by recursing into `AttributeSet::parse`.

use crate::enums::{direction, pin_state};
use crate::error::DecodeError;
use crate::schema::{freq_range, parent_device, parent_pin, reference_sync};
use crate::wire::decoder::AttributeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreqRange {
    pub min: u64,
    pub max: u64,
}

impl FreqRange {
    pub fn parse(bytes: &[u8]) -> Result<Self, DecodeError> {
        let set = AttributeSet::parse(bytes)?;
        Ok(FreqRange {
            min: set.u64(freq_range::MIN)?.ok_or(DecodeError::MissingId)?,
            max: set.u64(freq_range::MAX)?.ok_or(DecodeError::MissingId)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentDevice {
    pub parent_id: u32,
    pub direction: Option<&'static str>,
    pub prio: Option<u32>,
    pub state: Option<&'static str>,
    pub phase_offset: Option<i64>,
}

impl ParentDevice {
    pub fn parse(bytes: &[u8]) -> Result<Self, DecodeError> {
        let set = AttributeSet::parse(bytes)?;
        Ok(ParentDevice {
            parent_id: set
                .u32(parent_device::PARENT_ID)?
                .ok_or(DecodeError::MissingId)?,
            direction: set
                .u32(parent_device::DIRECTION)?
                .map(direction::decode),
            prio: set.u32(parent_device::PRIO)?,
            state: set.u32(parent_device::STATE)?.map(pin_state::decode),
            phase_offset: set.variable_width_signed(parent_device::PHASE_OFFSET)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentPin {
    pub parent_id: u32,
    pub state: Option<&'static str>,
}

impl ParentPin {
    pub fn parse(bytes: &[u8]) -> Result<Self, DecodeError> {
        let set = AttributeSet::parse(bytes)?;
        Ok(ParentPin {
            parent_id: set
                .u32(parent_pin::PARENT_ID)?
                .ok_or(DecodeError::MissingId)?,
            state: set.u32(parent_pin::STATE)?.map(pin_state::decode),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSync {
    pub pin_id: u32,
    pub state: Option<&'static str>,
}

impl ReferenceSync {
    pub fn parse(bytes: &[u8]) -> Result<Self, DecodeError> {
        let set = AttributeSet::parse(bytes)?;
        Ok(ReferenceSync {
            pin_id: set
                .u32(reference_sync::PIN_ID)?
                .ok_or(DecodeError::MissingId)?,
            state: set.u32(reference_sync::STATE)?.map(pin_state::decode),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::wire::encoder::Encoder;

    #[test]
    fn parses_a_freq_range() {
        let mut enc = Encoder::new();
        enc.put_u64(freq_range::MIN, 10_000_000);
        enc.put_u64(freq_range::MAX, 25_000_000);
        let buf = enc.finish();
        let fr = FreqRange::parse(&buf).unwrap();
        assert_eq!(fr, FreqRange { min: 10_000_000, max: 25_000_000 });
    }

    #[test]
    fn parses_a_parent_device_with_optional_phase_offset_absent() {
        let mut enc = Encoder::new();
        enc.put_u32(parent_device::PARENT_ID, 1);
        enc.put_u32(parent_device::DIRECTION, 2);
        enc.put_u32(parent_device::PRIO, 5);
        enc.put_u32(parent_device::STATE, 1);
        let buf = enc.finish();
        let pd = ParentDevice::parse(&buf).unwrap();
        assert_eq!(pd.parent_id, 1);
        assert_eq!(pd.direction, Some("output"));
        assert_eq!(pd.state, Some("connected"));
        assert_eq!(pd.phase_offset, None);
    }

    #[test]
    fn parses_a_parent_device_with_all_optional_fields_absent() {
        let mut enc = Encoder::new();
        enc.put_u32(parent_device::PARENT_ID, 3);
        let buf = enc.finish();
        let pd = ParentDevice::parse(&buf).unwrap();
        assert_eq!(pd.parent_id, 3);
        assert_eq!(pd.direction, None);
        assert_eq!(pd.prio, None);
        assert_eq!(pd.state, None);
        assert_eq!(pd.phase_offset, None);
    }

    #[test]
    fn parses_a_parent_pin_and_reference_sync_with_state_absent() {
        let mut enc = Encoder::new();
        enc.put_u32(parent_pin::PARENT_ID, 2);
        let buf = enc.finish();
        let pp = ParentPin::parse(&buf).unwrap();
        assert_eq!(pp.parent_id, 2);
        assert_eq!(pp.state, None);

        let mut enc = Encoder::new();
        enc.put_u32(reference_sync::PIN_ID, 4);
        let buf = enc.finish();
        let rs = ReferenceSync::parse(&buf).unwrap();
        assert_eq!(rs.pin_id, 4);
        assert_eq!(rs.state, None);
    }
}
