//! Expand pass: turns one message's `AttributeSet` into a typed `Device` or
//! `Pin` (§4.4 step 3), resolving enum codes and nested records along the
//! way. This is the point where the Wire Decoder, Enum Codec and Nested
//! Record Parser meet.

use netlink_packet_utils::parsers::parse_u32;

use crate::enums::{clock_quality_level, device_type, lock_status, lock_status_error, mode, pin_type};
use crate::error::DecodeError;
use crate::model::{Device, Pin};
use crate::schema::{dev_attr, pin_attr};
use crate::wire::decoder::AttributeSet;
use crate::wire::nested::{FreqRange, ParentDevice, ParentPin, ReferenceSync};

impl Device {
    pub fn from_attrs(set: &AttributeSet) -> Result<Self, DecodeError> {
        let id = set.u32(dev_attr::ID)?.ok_or(DecodeError::MissingId)?;

        let mode_supported = set
            .get_all(dev_attr::MODE_SUPPORTED)
            .iter()
            .map(|v| parse_u32(&v.bytes).map(mode::decode))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| DecodeError::WrongLength(dev_attr::MODE_SUPPORTED))?;

        let clock_quality_level = set
            .get_all(dev_attr::CLOCK_QUALITY_LEVEL)
            .iter()
            .map(|v| parse_u32(&v.bytes).map(clock_quality_level::decode))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| DecodeError::WrongLength(dev_attr::CLOCK_QUALITY_LEVEL))?;

        Ok(Device {
            id,
            module_name: set.string(dev_attr::MODULE_NAME)?,
            mode: set.u32(dev_attr::MODE)?.map(mode::decode),
            mode_supported,
            clock_id: set.u64(dev_attr::CLOCK_ID)?,
            device_type: set.u32(dev_attr::TYPE)?.map(device_type::decode),
            lock_status: set.u32(dev_attr::LOCK_STATUS)?.map(lock_status::decode),
            lock_status_error: set
                .u32(dev_attr::LOCK_STATUS_ERROR)?
                .map(lock_status_error::decode),
            clock_quality_level,
            temp: set
                .get_one(dev_attr::TEMP)
                .map(|v| {
                    v.bytes
                        .as_slice()
                        .try_into()
                        .map(i32::from_ne_bytes)
                        .map_err(|_| DecodeError::WrongLength(dev_attr::TEMP))
                })
                .transpose()?,
            phase_offset_monitor: set
                .u32(dev_attr::PHASE_OFFSET_MONITOR)?
                .map(|code| code != 0),
            phase_offset_avg_factor: set.u32(dev_attr::PHASE_OFFSET_AVG_FACTOR)?,
        })
    }
}

impl Pin {
    pub fn from_attrs(set: &AttributeSet) -> Result<Self, DecodeError> {
        let id = set.u32(pin_attr::ID)?.ok_or(DecodeError::MissingId)?;

        let frequency_supported = set
            .get_all(pin_attr::FREQUENCY_SUPPORTED)
            .iter()
            .map(|v| FreqRange::parse(&v.bytes))
            .collect::<Result<Vec<_>, _>>()?;

        let esync_frequency_supported = set
            .get_all(pin_attr::ESYNC_FREQUENCY_SUPPORTED)
            .iter()
            .map(|v| FreqRange::parse(&v.bytes))
            .collect::<Result<Vec<_>, _>>()?;

        let parent_device = set
            .get_all(pin_attr::PARENT_DEVICE)
            .iter()
            .map(|v| ParentDevice::parse(&v.bytes))
            .collect::<Result<Vec<_>, _>>()?;

        let parent_pin = set
            .get_all(pin_attr::PARENT_PIN)
            .iter()
            .map(|v| ParentPin::parse(&v.bytes))
            .collect::<Result<Vec<_>, _>>()?;

        let reference_sync = set
            .get_all(pin_attr::REFERENCE_SYNC)
            .iter()
            .map(|v| ReferenceSync::parse(&v.bytes))
            .collect::<Result<Vec<_>, _>>()?;

        let capabilities = set
            .u32(pin_attr::CAPABILITIES)?
            .map(crate::enums::capabilities::labels)
            .unwrap_or_default();

        Ok(Pin {
            id,
            module_name: set.string(pin_attr::MODULE_NAME)?,
            clock_id: set.u64(pin_attr::CLOCK_ID)?,
            board_label: set.string(pin_attr::BOARD_LABEL)?,
            panel_label: set.string(pin_attr::PANEL_LABEL)?,
            package_label: set.string(pin_attr::PACKAGE_LABEL)?,
            pin_type: set.u32(pin_attr::TYPE)?.map(pin_type::decode),
            frequency: set.u64(pin_attr::FREQUENCY)?,
            frequency_supported,
            capabilities,
            phase_adjust_min: set.variable_width_signed(pin_attr::PHASE_ADJUST_MIN)?.map(|v| v as i32),
            phase_adjust_max: set.variable_width_signed(pin_attr::PHASE_ADJUST_MAX)?.map(|v| v as i32),
            phase_adjust_gran: set.variable_width_signed(pin_attr::PHASE_ADJUST_GRAN)?.map(|v| v as i32),
            phase_adjust: set.variable_width_signed(pin_attr::PHASE_ADJUST)?.map(|v| v as i32),
            fractional_frequency_offset: set
                .variable_width_signed(pin_attr::FRACTIONAL_FREQUENCY_OFFSET)?,
            esync_frequency: set.u64(pin_attr::ESYNC_FREQUENCY)?,
            esync_frequency_supported,
            esync_pulse: set.u32(pin_attr::ESYNC_PULSE)?,
            parent_device,
            parent_pin,
            reference_sync,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::wire::encoder::Encoder;

    #[test]
    fn decodes_a_device_with_repeated_mode_supported() {
        let mut enc = Encoder::new();
        enc.put_u32(dev_attr::ID, 0);
        enc.put_u32(dev_attr::MODE, 1);
        enc.put_u32(dev_attr::MODE_SUPPORTED, 1);
        enc.put_u32(dev_attr::MODE_SUPPORTED, 2);
        enc.put_u32(dev_attr::TYPE, 2);
        let buf = enc.finish();

        let set = AttributeSet::parse(&buf).unwrap();
        let dev = Device::from_attrs(&set).unwrap();
        assert_eq!(dev.id, 0);
        assert_eq!(dev.mode, Some("manual"));
        assert_eq!(dev.mode_supported, vec!["manual", "automatic"]);
        assert_eq!(dev.device_type, Some("eec"));
    }

    #[test]
    fn missing_id_is_rejected() {
        let set = AttributeSet::parse(&[]).unwrap();
        assert!(matches!(Device::from_attrs(&set), Err(DecodeError::MissingId)));
    }
}
