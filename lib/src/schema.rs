//! Attribute Schema (§4.2): wire ids, value kinds and cardinality for the
//! Device and Pin attribute namespaces, plus the `DPLL_CMD_*` command ids.
//!
//! Device and Pin attributes live in separate numbering spaces on the wire,
//! each keyed off their own `*_A_ID` attribute. A nested record (`FreqRange`,
//! `ParentDevice`, `ParentPin`, `ReferenceSync`) has its own small schema,
//! addressed relative to the parent attribute that carries it.

/// `DPLL_CMD_*`: generic netlink command ids for the "dpll" family.
pub mod cmd {
    pub const DEVICE_ID_GET: u8 = 1;
    pub const DEVICE_GET: u8 = 2;
    pub const DEVICE_SET: u8 = 3;
    pub const DEVICE_CREATE_NTF: u8 = 4;
    pub const DEVICE_CHANGE_NTF: u8 = 5;
    pub const DEVICE_DELETE_NTF: u8 = 6;
    pub const PIN_ID_GET: u8 = 7;
    pub const PIN_GET: u8 = 8;
    pub const PIN_SET: u8 = 9;
    pub const PIN_CREATE_NTF: u8 = 10;
    pub const PIN_CHANGE_NTF: u8 = 11;
    pub const PIN_DELETE_NTF: u8 = 12;
}

/// `DPLL_A_*`: device attribute ids.
pub mod dev_attr {
    pub const ID: u16 = 1;
    pub const MODULE_NAME: u16 = 2;
    pub const MODE: u16 = 3;
    pub const MODE_SUPPORTED: u16 = 4;
    pub const LOCK_STATUS: u16 = 5;
    pub const LOCK_STATUS_ERROR: u16 = 6;
    pub const CLOCK_ID: u16 = 7;
    pub const TYPE: u16 = 8;
    pub const TEMP: u16 = 9;
    pub const CLOCK_QUALITY_LEVEL: u16 = 10;
    pub const PHASE_OFFSET_MONITOR: u16 = 11;
    pub const PHASE_OFFSET_AVG_FACTOR: u16 = 12;
}

/// `DPLL_A_PIN_*`: pin attribute ids, a namespace distinct from `dev_attr`.
pub mod pin_attr {
    pub const ID: u16 = 1;
    pub const MODULE_NAME: u16 = 2;
    pub const CLOCK_ID: u16 = 3;
    pub const BOARD_LABEL: u16 = 4;
    pub const PANEL_LABEL: u16 = 5;
    pub const PACKAGE_LABEL: u16 = 6;
    pub const TYPE: u16 = 7;
    pub const FREQUENCY: u16 = 8;
    pub const FREQUENCY_SUPPORTED: u16 = 9;
    pub const CAPABILITIES: u16 = 10;
    pub const PARENT_DEVICE: u16 = 11;
    pub const PARENT_PIN: u16 = 12;
    pub const PHASE_ADJUST_MIN: u16 = 13;
    pub const PHASE_ADJUST_MAX: u16 = 14;
    pub const PHASE_ADJUST_GRAN: u16 = 15;
    pub const PHASE_ADJUST: u16 = 16;
    pub const FRACTIONAL_FREQUENCY_OFFSET: u16 = 17;
    pub const ESYNC_FREQUENCY: u16 = 18;
    pub const ESYNC_FREQUENCY_SUPPORTED: u16 = 19;
    pub const ESYNC_PULSE: u16 = 20;
    pub const REFERENCE_SYNC: u16 = 21;

    /// Legacy top-level fields: `direction`/`prio`/`state` are accepted on
    /// `pin set` at the top level for backward compatibility with the
    /// original tool, even though the kernel only acts on them inside a
    /// `parent-device`/`parent-pin` nested block (§9 open question).
    pub const DIRECTION: u16 = 22;
    pub const PRIO: u16 = 23;
    pub const STATE: u16 = 24;

    /// Request-only filter: restricts a `pin show` dump to pins owned by
    /// one device (`dpll pin show device ID`). Never present on a reply.
    pub const DEVICE_ID_FILTER: u16 = 25;
}

/// Nested sub-attribute ids for a `FREQUENCY_SUPPORTED`/`ESYNC_FREQUENCY_SUPPORTED` entry.
pub mod freq_range {
    pub const MIN: u16 = 1;
    pub const MAX: u16 = 2;
}

/// Nested sub-attribute ids for a `PARENT_DEVICE` entry.
pub mod parent_device {
    pub const PARENT_ID: u16 = 1;
    pub const DIRECTION: u16 = 2;
    pub const PRIO: u16 = 3;
    pub const STATE: u16 = 4;
    pub const PHASE_OFFSET: u16 = 5;
}

/// Nested sub-attribute ids for a `PARENT_PIN` entry.
pub mod parent_pin {
    pub const PARENT_ID: u16 = 1;
    pub const STATE: u16 = 2;
}

/// Nested sub-attribute ids for a `REFERENCE_SYNC` entry.
pub mod reference_sync {
    pub const PIN_ID: u16 = 1;
    pub const STATE: u16 = 2;
}

/// Whether a given attribute id occurs at most once or may repeat in a
/// single message (§4.4's multi-attribute aggregator only engages for the
/// latter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Single,
    Multi,
}

pub fn dev_attr_cardinality(id: u16) -> Cardinality {
    match id {
        dev_attr::MODE_SUPPORTED | dev_attr::CLOCK_QUALITY_LEVEL => Cardinality::Multi,
        _ => Cardinality::Single,
    }
}

pub fn pin_attr_cardinality(id: u16) -> Cardinality {
    match id {
        pin_attr::FREQUENCY_SUPPORTED
        | pin_attr::ESYNC_FREQUENCY_SUPPORTED
        | pin_attr::PARENT_DEVICE
        | pin_attr::PARENT_PIN
        | pin_attr::REFERENCE_SYNC => Cardinality::Multi,
        _ => Cardinality::Single,
    }
}
