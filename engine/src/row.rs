//! Row types: the unit of grid state.

use crate::{error::Result, Error, FieldName, RowId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single grid row: open-ended domain fields plus edit-tracking flags.
///
/// `dirty` means the row carries an uncommitted local edit. `stale` means a
/// remote update arrived while the row was dirty and was withheld, so the
/// user's view of it is outdated. A row is never stale without being dirty.
///
/// Nothing in the engine clears `dirty` once it is set - there is no commit
/// or discard protocol - so an edited row keeps both flags until the
/// product grows one.
///
/// Serializes flat, the way the display layer consumes it: domain fields
/// sit beside `id`, `dirty` and `stale`. A domain field named `id`, `dirty`
/// or `stale` would collide with the control fields and is not supported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Unique row identifier
    pub id: RowId,
    /// Domain field values, keyed by field name
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    /// True iff the row has an uncommitted local edit
    #[serde(default)]
    pub dirty: bool,
    /// True iff a remote update was withheld while the row was dirty
    #[serde(default)]
    pub stale: bool,
}

impl Row {
    /// Create an empty row with both flags clear.
    pub fn new(id: impl Into<RowId>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
            dirty: false,
            stale: false,
        }
    }

    /// Build a fresh row from a remote update, flags clear.
    pub fn from_update(update: RowUpdate) -> Self {
        Self {
            id: update.id,
            fields: update.fields,
            dirty: false,
            stale: false,
        }
    }

    /// Set a single field value.
    pub fn set_field(&mut self, name: impl Into<FieldName>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// Get a field value.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Accept a remote update: lay `fields` over the current values and
    /// clear both flags. Only valid for rows without a pending local edit;
    /// the merge pass never calls this on a dirty row.
    pub fn accept_remote(&mut self, fields: &Map<String, Value>) {
        for (name, value) in fields {
            self.fields.insert(name.clone(), value.clone());
        }
        self.dirty = false;
        self.stale = false;
    }
}

/// A raw remote update payload: a target row id plus zero or more field
/// values to lay over the current row state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowUpdate {
    /// Target row id
    pub id: RowId,
    /// Field values carried by the update
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RowUpdate {
    /// Create an update carrying no field values.
    pub fn new(id: impl Into<RowId>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Add a field value (builder style).
    pub fn with_field(mut self, name: impl Into<FieldName>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Parse a transport payload.
    ///
    /// The payload must be a JSON object with a string `id`; everything
    /// else in the object becomes field values. Malformed payloads are
    /// rejected rather than silently skipped, so the transport layer can
    /// log them.
    pub fn from_value(value: Value) -> Result<Self> {
        let mut map = match value {
            Value::Object(map) => map,
            other => {
                return Err(Error::InvalidUpdate(format!(
                    "expected object, got {}",
                    json_type_name(&other)
                )))
            }
        };

        let id = match map.remove("id") {
            Some(Value::String(id)) => id,
            _ => return Err(Error::MissingRowId),
        };

        Ok(Self { id, fields: map })
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
