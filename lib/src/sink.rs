//! Output Sink (§4.12): the abstract interface every renderer targets.
//!
//! The core never writes to stdout/stderr itself and never reaches for
//! process-wide state; `dpll-cli` owns the concrete `PlainTextSink`/
//! `JsonSink` implementations and the one `SinkConfig` instance, built once
//! in `main` and threaded down to every call site explicitly (§9).

/// Whether the output sink renders plain columnar text or JSON, and
/// whether JSON is pretty-indented. The sole piece of process-wide
/// configuration in this crate, and even this is never reached via global
/// state — callers hold and pass a `SinkConfig` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    pub json: bool,
    pub pretty: bool,
}

impl SinkConfig {
    pub fn new(json: bool, pretty: bool) -> Self {
        SinkConfig { json, pretty }
    }
}

/// A renderer target. `device`/`pin`/`monitor` dumps open one array scope
/// for their whole invocation; single-entity results open and close one
/// entity without an enclosing array.
pub trait Sink {
    /// Opens a top-level entity scope — `device id 0:` in text mode, a
    /// JSON object carrying its own `id` field in JSON mode.
    fn open_entity(&mut self, type_name: &str, id: u32);
    fn close_entity(&mut self);

    /// Opens an anonymous nested object — one entry of a sequence like
    /// `parent_device` or `frequency_supported`.
    fn open_object(&mut self);
    fn close_object(&mut self);

    fn open_array(&mut self, name: &str);
    fn close_array(&mut self);

    fn field_str(&mut self, name: &str, value: &str);
    fn field_u(&mut self, name: &str, value: u64);
    fn field_s(&mut self, name: &str, value: i64);
    fn field_hex(&mut self, name: &str, value: u64);
    fn field_bool(&mut self, name: &str, value: bool);
}
