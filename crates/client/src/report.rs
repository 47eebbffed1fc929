//! Human-readable lines for each client operation.

use serde_json::Value;

use crate::Record;

fn render(record: &Record) -> String {
    Value::Object(record.clone()).to_string()
}

pub fn listed(items: &[Record]) -> String {
    let array = Value::Array(items.iter().cloned().map(Value::Object).collect());
    format!("Items: {array}")
}

pub fn found(item: Option<&Record>) -> String {
    match item {
        Some(record) => format!("Item found: {}", render(record)),
        None => not_found(),
    }
}

pub fn created(record: &Record) -> String {
    format!("Item created: {}", render(record))
}

pub fn updated(item: Option<&Record>) -> String {
    match item {
        Some(record) => format!("Item updated: {}", render(record)),
        None => not_found(),
    }
}

pub fn deleted(id: u64, removed: bool) -> String {
    if removed { format!("Item {id} removed") } else { not_found() }
}

pub fn not_found() -> String {
    "Item not found".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(v: Value) -> Record {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn lines_read_naturally() {
        let r = record(json!({"name": "Widget", "id": 1}));
        assert_eq!(found(Some(&r)), r#"Item found: {"name":"Widget","id":1}"#);
        assert_eq!(found(None), "Item not found");
        assert_eq!(created(&r), r#"Item created: {"name":"Widget","id":1}"#);
        assert_eq!(updated(None), "Item not found");
        assert_eq!(deleted(7, true), "Item 7 removed");
        assert_eq!(deleted(7, false), "Item not found");
        assert_eq!(listed(&[]), "Items: []");
        assert_eq!(listed(&[r]), r#"Items: [{"name":"Widget","id":1}]"#);
    }
}
