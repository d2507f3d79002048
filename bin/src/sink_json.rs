//! JSON output sink (§6.3): a top-level object containing either a single
//! entity's fields or one named array of entities; nested sub-records
//! become JSON objects, multi attributes become JSON arrays.

use serde_json::{Map, Value};

use dpll::sink::Sink;

enum Frame {
    Object(Map<String, Value>),
    Array { name: String, items: Vec<Value> },
}

pub struct JsonSink {
    pretty: bool,
    stack: Vec<Frame>,
    root: Option<Value>,
}

impl JsonSink {
    pub fn new(pretty: bool) -> Self {
        JsonSink {
            pretty,
            stack: Vec::new(),
            root: None,
        }
    }

    fn push_value(&mut self, value: Value) {
        match self.stack.last_mut() {
            Some(Frame::Array { items, .. }) => items.push(value),
            Some(Frame::Object(_)) => unreachable!("a bare value cannot land in an object frame"),
            None => self.root = Some(value),
        }
    }

    fn set_field(&mut self, name: &str, value: Value) {
        match self.stack.last_mut() {
            Some(Frame::Object(map)) => {
                map.insert(name.to_string(), value);
            }
            Some(Frame::Array { items, .. }) => items.push(value),
            None => panic!("field written outside any open scope"),
        }
    }

    /// Prints whatever was accumulated. An empty root (no entity ever
    /// opened, e.g. an id-get that errored before decoding) renders as
    /// `{}`, the "empty object" error shape from scenario (e).
    pub fn finish(self) {
        let value = self.root.unwrap_or_else(|| Value::Object(Map::new()));
        let text = if self.pretty {
            serde_json::to_string_pretty(&value)
        } else {
            serde_json::to_string(&value)
        }
        .expect("a Value tree built only from sink calls always serializes");
        println!("{text}");
    }
}

impl Sink for JsonSink {
    fn open_entity(&mut self, _type_name: &str, id: u32) {
        let mut map = Map::new();
        map.insert("id".to_string(), Value::from(id));
        self.stack.push(Frame::Object(map));
    }

    fn close_entity(&mut self) {
        let Some(Frame::Object(map)) = self.stack.pop() else {
            unreachable!("close_entity without a matching open_entity");
        };
        self.push_value(Value::Object(map));
    }

    fn open_object(&mut self) {
        self.stack.push(Frame::Object(Map::new()));
    }

    fn close_object(&mut self) {
        let Some(Frame::Object(map)) = self.stack.pop() else {
            unreachable!("close_object without a matching open_object");
        };
        self.push_value(Value::Object(map));
    }

    fn open_array(&mut self, name: &str) {
        self.stack.push(Frame::Array {
            name: name.to_string(),
            items: Vec::new(),
        });
    }

    fn close_array(&mut self) {
        let Some(Frame::Array { name, items }) = self.stack.pop() else {
            unreachable!("close_array without a matching open_array");
        };
        let array = Value::Array(items);
        match self.stack.last_mut() {
            Some(Frame::Object(map)) => {
                map.insert(name, array);
            }
            Some(Frame::Array { items, .. }) => items.push(array),
            None => {
                let mut map = Map::new();
                map.insert(name, array);
                self.root = Some(Value::Object(map));
            }
        }
    }

    fn field_str(&mut self, name: &str, value: &str) {
        self.set_field(name, Value::from(value));
    }

    fn field_u(&mut self, name: &str, value: u64) {
        self.set_field(name, Value::from(value));
    }

    fn field_s(&mut self, name: &str, value: i64) {
        self.set_field(name, Value::from(value));
    }

    fn field_hex(&mut self, name: &str, value: u64) {
        self.set_field(name, Value::from(format!("{value:#x}")));
    }

    fn field_bool(&mut self, name: &str, value: bool) {
        self.set_field(name, Value::from(value));
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn single_entity_renders_as_a_bare_object() {
        let mut sink = JsonSink::new(false);
        sink.open_entity("device", 0);
        sink.field_str("mode", "manual");
        sink.close_entity();
        let value = sink.root.clone().unwrap();
        assert_eq!(value["id"], 0);
        assert_eq!(value["mode"], "manual");
    }

    #[test]
    fn dump_wraps_entities_in_a_named_array() {
        let mut sink = JsonSink::new(false);
        sink.open_array("device");
        sink.open_entity("device", 0);
        sink.close_entity();
        sink.open_entity("device", 1);
        sink.close_entity();
        sink.close_array();
        let value = sink.root.clone().unwrap();
        assert_eq!(value["device"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn empty_root_renders_as_empty_object() {
        let sink = JsonSink::new(false);
        assert!(sink.root.is_none());
    }

    #[test]
    fn notification_event_tag_lands_inside_its_entity_object() {
        use dpll::model::{EventKind, NotificationEvent, Payload, Pin};
        use dpll::render::render_notification_event;

        let mut sink = JsonSink::new(false);
        sink.open_array("monitor");
        render_notification_event(
            &mut sink,
            &NotificationEvent {
                kind: EventKind::PinChange,
                payload: Payload::Pin(Pin {
                    id: 7,
                    ..Default::default()
                }),
            },
        );
        sink.close_array();

        let value = sink.root.clone().unwrap();
        let items = value["monitor"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["event"], "[PIN_CHANGE]");
        assert_eq!(items[0]["id"], 7);
    }
}
