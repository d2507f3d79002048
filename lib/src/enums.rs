//! Enum Codec (§4.7): bidirectional label/wire-code mapping for every
//! enumerated attribute, plus the `Capabilities` bitflags for pins.
//!
//! Decoding a code the table doesn't recognize yields `"unknown"` rather
//! than an error — a kernel newer than this client is expected. Encoding a
//! label the table doesn't recognize is always an error: user input is
//! never assumed forward-compatible.

use crate::error::ArgError;

macro_rules! enum_codec {
    ($name:ident, [$(($label:literal, $code:expr)),+ $(,)?]) => {
        pub fn decode(code: u32) -> &'static str {
            match code {
                $($code => $label,)+
                _ => "unknown",
            }
        }

        pub fn encode(keyword: &str, label: &str) -> Result<u32, ArgError> {
            match label {
                $($label => Ok($code),)+
                _ => Err(ArgError::InvalidArgument {
                    keyword: keyword.to_string(),
                    value: label.to_string(),
                }),
            }
        }
    };
}

pub mod mode {
    use super::*;
    enum_codec!(mode, [("manual", 1), ("automatic", 2)]);
}

pub mod device_type {
    use super::*;
    enum_codec!(device_type, [("pps", 1), ("eec", 2)]);
}

pub mod lock_status {
    use super::*;
    enum_codec!(
        lock_status,
        [
            ("unlocked", 1),
            ("locked", 2),
            ("locked-ho-acq", 3),
            ("holdover", 4),
        ]
    );
}

pub mod lock_status_error {
    use super::*;
    enum_codec!(
        lock_status_error,
        [
            ("none", 1),
            ("undefined", 2),
            ("media-down", 3),
            ("fractional-frequency-offset-too-high", 4),
        ]
    );
}

pub mod clock_quality_level {
    use super::*;
    enum_codec!(
        clock_quality_level,
        [
            ("unknown", 0),
            ("prc", 1),
            ("ssu-a", 2),
            ("ssu-b", 3),
            ("eec1", 4),
            ("prtc", 5),
            ("eprtc", 6),
            ("eeec", 7),
            ("eprc", 8),
        ]
    );
}

pub mod pin_type {
    use super::*;
    enum_codec!(
        pin_type,
        [
            ("mux", 1),
            ("ext", 2),
            ("synce-eth-port", 3),
            ("int-oscillator", 4),
            ("gnss", 5),
        ]
    );
}

pub mod direction {
    use super::*;
    enum_codec!(direction, [("input", 1), ("output", 2)]);
}

pub mod pin_state {
    use super::*;
    enum_codec!(
        pin_state,
        [("connected", 1), ("disconnected", 2), ("selectable", 3)]
    );
}

pub mod phase_offset_monitor {
    use super::*;
    enum_codec!(phase_offset_monitor, [("disabled", 0), ("enabled", 1)]);
}

/// Pin `CAPABILITIES` bits, combined by bitwise OR on the wire.
pub mod capabilities {
    pub const STATE_CAN_CHANGE: u32 = 0x1;
    pub const PRIORITY_CAN_CHANGE: u32 = 0x2;
    pub const DIRECTION_CAN_CHANGE: u32 = 0x4;

    /// Labels in canonical rendering order (§6.3): state, priority, direction.
    const BITS: [(u32, &str); 3] = [
        (STATE_CAN_CHANGE, "state-can-change"),
        (PRIORITY_CAN_CHANGE, "priority-can-change"),
        (DIRECTION_CAN_CHANGE, "direction-can-change"),
    ];

    pub fn labels(mask: u32) -> Vec<&'static str> {
        BITS.iter()
            .filter(|(bit, _)| mask & bit != 0)
            .map(|(_, label)| *label)
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trip_known_labels() {
        for label in ["manual", "automatic"] {
            let code = mode::encode("mode", label).unwrap();
            assert_eq!(mode::decode(code), label);
        }
    }

    #[test]
    fn decode_unknown_code_is_lenient() {
        assert_eq!(lock_status::decode(99), "unknown");
    }

    #[test]
    fn encode_unknown_label_is_an_error() {
        assert!(mode::encode("mode", "not-a-mode").is_err());
    }

    #[test]
    fn capabilities_are_listed_in_canonical_order() {
        let mask = capabilities::DIRECTION_CAN_CHANGE | capabilities::STATE_CAN_CHANGE;
        assert_eq!(
            capabilities::labels(mask),
            vec!["state-can-change", "direction-can-change"]
        );
    }
}
