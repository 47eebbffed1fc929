use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Open, schema-less field set of a product. Insertion order is kept.
pub type Fields = Map<String, Value>;

/// Name of the server-assigned identifier field.
pub const ID_FIELD: &str = "id";

/// A product record: a typed `id` plus whatever fields the caller supplied.
///
/// On the wire and on disk this is one flat JSON object.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Product {
    #[serde(flatten)]
    pub fields: Fields,
    pub id: u64,
}

impl Product {
    /// Build a record with a server-assigned id. Any `id` key in `fields` is dropped.
    pub fn new(id: u64, mut fields: Fields) -> Self {
        fields.remove(ID_FIELD);
        Self { fields, id }
    }

    /// Shallow merge: keys in `patch` overwrite or extend, nothing is removed.
    /// `id` is immutable and ignored when present in the patch.
    pub fn merge(&mut self, patch: Fields) {
        for (key, value) in patch {
            if key == ID_FIELD {
                continue;
            }
            self.fields.insert(key, value);
        }
    }
}

/// Next id for a collection: one more than the largest id, or 1 when empty.
/// `None` once the largest id is `u64::MAX`.
pub fn next_id(items: &[Product]) -> Option<u64> {
    items.iter().map(|p| p.id).max().unwrap_or(0).checked_add(1)
}
