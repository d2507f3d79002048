//! Renders a decoded `Device`/`Pin`/`NotificationEvent` through a [`Sink`]
//! (§6.3). Field order here is the wire-declaration order from §3; the
//! concrete sink only decides how a field is spelled, never which fields
//! exist or in what order.

use crate::model::{Device, NotificationEvent, Payload, Pin};
use crate::sink::Sink;
use crate::wire::nested::{FreqRange, ParentDevice, ParentPin, ReferenceSync};

pub fn render_device(sink: &mut dyn Sink, dev: &Device, tag: Option<&str>) {
    sink.open_entity("device", dev.id);
    if let Some(tag) = tag {
        sink.field_str("event", tag);
    }
    if let Some(name) = &dev.module_name {
        sink.field_str("module_name", name);
    }
    if let Some(mode) = dev.mode {
        sink.field_str("mode", mode);
    }
    if !dev.mode_supported.is_empty() {
        sink.open_array("mode_supported");
        for label in &dev.mode_supported {
            sink.field_str("mode_supported", label);
        }
        sink.close_array();
    }
    if let Some(clock_id) = dev.clock_id {
        sink.field_hex("clock_id", clock_id);
    }
    if let Some(ty) = dev.device_type {
        sink.field_str("type", ty);
    }
    if let Some(status) = dev.lock_status {
        sink.field_str("lock_status", status);
    }
    if let Some(err) = dev.lock_status_error {
        sink.field_str("lock_status_error", err);
    }
    if !dev.clock_quality_level.is_empty() {
        sink.open_array("clock_quality_level");
        for label in &dev.clock_quality_level {
            sink.field_str("clock_quality_level", label);
        }
        sink.close_array();
    }
    if let Some(temp) = dev.temp {
        sink.field_s("temp", temp as i64);
    }
    if let Some(enabled) = dev.phase_offset_monitor {
        sink.field_bool("phase_offset_monitor", enabled);
    }
    if let Some(factor) = dev.phase_offset_avg_factor {
        sink.field_u("phase_offset_avg_factor", factor as u64);
    }
    sink.close_entity();
}

fn render_freq_range(sink: &mut dyn Sink, range: &FreqRange) {
    sink.open_object();
    sink.field_u("min", range.min);
    sink.field_u("max", range.max);
    sink.close_object();
}

fn render_parent_device(sink: &mut dyn Sink, pd: &ParentDevice) {
    sink.open_object();
    sink.field_u("parent_id", pd.parent_id as u64);
    if let Some(direction) = pd.direction {
        sink.field_str("direction", direction);
    }
    if let Some(prio) = pd.prio {
        sink.field_u("prio", prio as u64);
    }
    if let Some(state) = pd.state {
        sink.field_str("state", state);
    }
    if let Some(offset) = pd.phase_offset {
        sink.field_s("phase_offset", offset);
    }
    sink.close_object();
}

fn render_parent_pin(sink: &mut dyn Sink, pp: &ParentPin) {
    sink.open_object();
    sink.field_u("parent_id", pp.parent_id as u64);
    if let Some(state) = pp.state {
        sink.field_str("state", state);
    }
    sink.close_object();
}

fn render_reference_sync(sink: &mut dyn Sink, rs: &ReferenceSync) {
    sink.open_object();
    sink.field_u("pin_id", rs.pin_id as u64);
    if let Some(state) = rs.state {
        sink.field_str("state", state);
    }
    sink.close_object();
}

pub fn render_pin(sink: &mut dyn Sink, pin: &Pin, tag: Option<&str>) {
    sink.open_entity("pin", pin.id);
    if let Some(tag) = tag {
        sink.field_str("event", tag);
    }
    if let Some(name) = &pin.module_name {
        sink.field_str("module_name", name);
    }
    if let Some(clock_id) = pin.clock_id {
        sink.field_hex("clock_id", clock_id);
    }
    if let Some(label) = &pin.board_label {
        sink.field_str("board_label", label);
    }
    if let Some(label) = &pin.panel_label {
        sink.field_str("panel_label", label);
    }
    if let Some(label) = &pin.package_label {
        sink.field_str("package_label", label);
    }
    if let Some(ty) = pin.pin_type {
        sink.field_str("type", ty);
    }
    if let Some(freq) = pin.frequency {
        sink.field_u("frequency", freq);
    }
    if !pin.frequency_supported.is_empty() {
        sink.open_array("frequency_supported");
        for range in &pin.frequency_supported {
            render_freq_range(sink, range);
        }
        sink.close_array();
    }
    if !pin.capabilities.is_empty() {
        sink.open_array("capabilities");
        for label in &pin.capabilities {
            sink.field_str("capabilities", label);
        }
        sink.close_array();
    }
    if let Some(v) = pin.phase_adjust_min {
        sink.field_s("phase_adjust_min", v as i64);
    }
    if let Some(v) = pin.phase_adjust_max {
        sink.field_s("phase_adjust_max", v as i64);
    }
    if let Some(v) = pin.phase_adjust_gran {
        sink.field_s("phase_adjust_gran", v as i64);
    }
    if let Some(v) = pin.phase_adjust {
        sink.field_s("phase_adjust", v as i64);
    }
    if let Some(v) = pin.fractional_frequency_offset {
        sink.field_s("fractional_frequency_offset", v);
    }
    if let Some(v) = pin.esync_frequency {
        sink.field_u("esync_frequency", v);
    }
    if !pin.esync_frequency_supported.is_empty() {
        sink.open_array("esync_frequency_supported");
        for range in &pin.esync_frequency_supported {
            render_freq_range(sink, range);
        }
        sink.close_array();
    }
    if let Some(v) = pin.esync_pulse {
        sink.field_u("esync_pulse", v as u64);
    }
    if !pin.parent_device.is_empty() {
        sink.open_array("parent_device");
        for pd in &pin.parent_device {
            render_parent_device(sink, pd);
        }
        sink.close_array();
    }
    if !pin.parent_pin.is_empty() {
        sink.open_array("parent_pin");
        for pp in &pin.parent_pin {
            render_parent_pin(sink, pp);
        }
        sink.close_array();
    }
    if !pin.reference_sync.is_empty() {
        sink.open_array("reference_sync");
        for rs in &pin.reference_sync {
            render_reference_sync(sink, rs);
        }
        sink.close_array();
    }
    sink.close_entity();
}

/// Renders one notification event, including its `[TAG]` prefix (§4.10).
/// The tag is written as a field inside the entity's own object scope (not
/// before it is opened), so it lands as a sibling of the entity's other
/// fields in both sink modes rather than as a bare array element.
pub fn render_notification_event(sink: &mut dyn Sink, event: &NotificationEvent) {
    let tag = event.kind.tag();
    match &event.payload {
        Payload::Device(dev) => render_device(sink, dev, Some(tag)),
        Payload::Pin(pin) => render_pin(sink, pin, Some(tag)),
    }
}
