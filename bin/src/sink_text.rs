//! Plain columnar text output sink (§6.3): `key: value` lines, one entity
//! per leading `TYPE id N:` header, nested blocks indented further.

use dpll::sink::Sink;

pub struct PlainTextSink {
    depth: usize,
}

impl PlainTextSink {
    pub fn new() -> Self {
        PlainTextSink { depth: 0 }
    }

    fn indent(&self) -> String {
        "  ".repeat(self.depth)
    }

    fn line(&self, text: &str) {
        println!("{}{}", self.indent(), text);
    }
}

impl Default for PlainTextSink {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders milli-degrees Celsius as `DD.mmm C`.
fn format_temp(milli: i64) -> String {
    let sign = if milli < 0 { "-" } else { "" };
    let abs = milli.unsigned_abs();
    format!("{sign}{}.{:03} C", abs / 1000, abs % 1000)
}

impl Sink for PlainTextSink {
    fn open_entity(&mut self, type_name: &str, id: u32) {
        self.line(&format!("{type_name} id {id}:"));
        self.depth += 1;
    }

    fn close_entity(&mut self) {
        self.depth -= 1;
    }

    fn open_object(&mut self) {
        self.line("-");
        self.depth += 1;
    }

    fn close_object(&mut self) {
        self.depth -= 1;
    }

    fn open_array(&mut self, name: &str) {
        self.line(&format!("{name}:"));
        self.depth += 1;
    }

    fn close_array(&mut self) {
        self.depth -= 1;
    }

    fn field_str(&mut self, name: &str, value: &str) {
        self.line(&format!("{name}: {value}"));
    }

    fn field_u(&mut self, name: &str, value: u64) {
        self.line(&format!("{name}: {value}"));
    }

    fn field_s(&mut self, name: &str, value: i64) {
        if name == "temp" {
            self.line(&format!("{name}: {}", format_temp(value)));
        } else {
            self.line(&format!("{name}: {value}"));
        }
    }

    fn field_hex(&mut self, name: &str, value: u64) {
        self.line(&format!("{name}: {value:#x}"));
    }

    fn field_bool(&mut self, name: &str, value: bool) {
        self.line(&format!("{name}: {value}"));
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn formats_negative_temp_with_sign() {
        assert_eq!(format_temp(-23456), "-23.456 C");
    }

    #[test]
    fn formats_positive_temp() {
        assert_eq!(format_temp(23456), "23.456 C");
    }
}
