//! Data Model (§3): `Device`, `Pin`, and the notification envelope.
//!
//! These are plain, fully-decoded domain structs — renderers and the
//! notification loop work with these, never with raw `AttributeSet`s.

use crate::wire::nested::{FreqRange, ParentDevice, ParentPin, ReferenceSync};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Device {
    pub id: u32,
    pub module_name: Option<String>,
    pub mode: Option<&'static str>,
    pub mode_supported: Vec<&'static str>,
    pub clock_id: Option<u64>,
    pub device_type: Option<&'static str>,
    pub lock_status: Option<&'static str>,
    pub lock_status_error: Option<&'static str>,
    pub clock_quality_level: Vec<&'static str>,
    /// Milli-degrees Celsius on the wire; rendered divided by 1000.
    pub temp: Option<i32>,
    pub phase_offset_monitor: Option<bool>,
    pub phase_offset_avg_factor: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pin {
    pub id: u32,
    pub module_name: Option<String>,
    pub clock_id: Option<u64>,
    pub board_label: Option<String>,
    pub panel_label: Option<String>,
    pub package_label: Option<String>,
    pub pin_type: Option<&'static str>,
    pub frequency: Option<u64>,
    pub frequency_supported: Vec<FreqRange>,
    pub capabilities: Vec<&'static str>,
    pub phase_adjust_min: Option<i32>,
    pub phase_adjust_max: Option<i32>,
    pub phase_adjust_gran: Option<i32>,
    pub phase_adjust: Option<i32>,
    pub fractional_frequency_offset: Option<i64>,
    pub esync_frequency: Option<u64>,
    pub esync_frequency_supported: Vec<FreqRange>,
    pub esync_pulse: Option<u32>,
    pub parent_device: Vec<ParentDevice>,
    pub parent_pin: Vec<ParentPin>,
    pub reference_sync: Vec<ReferenceSync>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    DeviceCreate,
    DeviceChange,
    DeviceDelete,
    PinCreate,
    PinChange,
    PinDelete,
}

impl EventKind {
    /// The `[TAG]` prefix the notification loop prepends to a rendered
    /// payload (§4.10).
    pub fn tag(self) -> &'static str {
        match self {
            EventKind::DeviceCreate => "[DEVICE_CREATE]",
            EventKind::DeviceChange => "[DEVICE_CHANGE]",
            EventKind::DeviceDelete => "[DEVICE_DELETE]",
            EventKind::PinCreate => "[PIN_CREATE]",
            EventKind::PinChange => "[PIN_CHANGE]",
            EventKind::PinDelete => "[PIN_DELETE]",
        }
    }

    pub fn from_cmd(cmd: u8) -> Option<Self> {
        use crate::schema::cmd;
        match cmd {
            cmd::DEVICE_CREATE_NTF => Some(EventKind::DeviceCreate),
            cmd::DEVICE_CHANGE_NTF => Some(EventKind::DeviceChange),
            cmd::DEVICE_DELETE_NTF => Some(EventKind::DeviceDelete),
            cmd::PIN_CREATE_NTF => Some(EventKind::PinCreate),
            cmd::PIN_CHANGE_NTF => Some(EventKind::PinChange),
            cmd::PIN_DELETE_NTF => Some(EventKind::PinDelete),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Device(Device),
    Pin(Pin),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEvent {
    pub kind: EventKind,
    pub payload: Payload,
}
