//! Message schemas and the registry that maps wire message ids to them.
//!
//! Layouts are data, not generated code: a [`MessageSchema`] is an ordered
//! list of [`FieldDescriptor`]s in wire order, and a single generic layout
//! engine decodes any message against its descriptors. A [`Registry`] is an
//! explicit lookup table passed into the parser; there is no hidden global,
//! so tests can supply minimal synthetic schemas.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Wire message id. 24 bits on the wire.
pub type MsgId = u32;

/// Primitive wire types.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
    Char,
}

impl ScalarType {
    /// Encoded size in bytes.
    #[must_use]
    pub fn size(self) -> usize {
        match self {
            ScalarType::U8 | ScalarType::I8 | ScalarType::Char => 1,
            ScalarType::U16 | ScalarType::I16 => 2,
            ScalarType::U32 | ScalarType::I32 | ScalarType::F32 => 4,
            ScalarType::U64 | ScalarType::I64 | ScalarType::F64 => 8,
        }
    }
}

/// A decoded field value.
///
/// Character arrays decode to `Str`; other arrays to `Array` of scalar
/// values of the element type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    F32(f32),
    F64(f64),
    Str(String),
    Array(Vec<Value>),
}

impl Value {
    /// The zero value for a scalar type.
    #[must_use]
    pub fn zero(kind: ScalarType) -> Value {
        match kind {
            ScalarType::U8 => Value::U8(0),
            ScalarType::I8 => Value::I8(0),
            ScalarType::U16 => Value::U16(0),
            ScalarType::I16 => Value::I16(0),
            ScalarType::U32 => Value::U32(0),
            ScalarType::I32 => Value::I32(0),
            ScalarType::U64 => Value::U64(0),
            ScalarType::I64 => Value::I64(0),
            ScalarType::F32 => Value::F32(0.0),
            ScalarType::F64 => Value::F64(0.0),
            ScalarType::Char => Value::Str(String::new()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// One field of a message layout.
///
/// Descriptor order is wire order: all non-extension fields first, extension
/// fields last. The decoder never reorders.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: ScalarType,
    /// `Some(n)` for fixed-size arrays of `n` elements.
    #[serde(default)]
    pub count: Option<usize>,
    /// Appended after the original field set; senders with an older layout
    /// may omit it entirely.
    #[serde(default)]
    pub extension: bool,
    /// Value an omitted extension field is left at. Defaults to zero.
    #[serde(skip)]
    pub default: Option<Value>,
}

impl FieldDescriptor {
    pub fn scalar(name: &str, kind: ScalarType) -> Self {
        FieldDescriptor {
            name: name.to_string(),
            kind,
            count: None,
            extension: false,
            default: None,
        }
    }

    pub fn array(name: &str, kind: ScalarType, count: usize) -> Self {
        FieldDescriptor {
            count: Some(count),
            ..Self::scalar(name, kind)
        }
    }

    #[must_use]
    pub fn extension(mut self) -> Self {
        self.extension = true;
        self
    }

    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Encoded size of this field in bytes.
    #[must_use]
    pub fn wire_size(&self) -> usize {
        self.kind.size() * self.count.unwrap_or(1)
    }

    /// Value this field holds before any payload bytes are applied.
    #[must_use]
    pub fn default_value(&self) -> Value {
        if let Some(default) = &self.default {
            return default.clone();
        }
        match self.count {
            Some(_) if self.kind == ScalarType::Char => Value::Str(String::new()),
            Some(n) => Value::Array(vec![Value::zero(self.kind); n]),
            None => Value::zero(self.kind),
        }
    }
}

/// Layout and identity of one message kind.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MessageSchema {
    pub id: MsgId,
    pub name: String,
    /// Schema-specific seed byte folded into the frame checksum.
    pub crc_seed: u8,
    pub fields: Vec<FieldDescriptor>,
}

impl MessageSchema {
    /// Full declared payload size: the sum of all field sizes. Transmitted
    /// payloads may be shorter when trailing zero bytes were truncated.
    #[must_use]
    pub fn wire_len(&self) -> usize {
        self.fields.iter().map(FieldDescriptor::wire_size).sum()
    }

    /// Create an empty message of this schema's shape, every field at its
    /// default.
    #[must_use]
    pub fn instantiate(&self, system_id: u8, component_id: u8) -> Message {
        Message {
            system_id,
            component_id,
            id: self.id,
            name: self.name.clone(),
            fields: self
                .fields
                .iter()
                .map(|f| (f.name.clone(), f.default_value()))
                .collect(),
        }
    }
}

/// A decoded message: identity metadata plus an ordered field map.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub system_id: u8,
    pub component_id: u8,
    pub id: MsgId,
    pub name: String,
    fields: Vec<(String, Value)>,
}

impl Message {
    /// Look up a field value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Fields in wire order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub(crate) fn set(&mut self, idx: usize, value: Value) {
        self.fields[idx].1 = value;
    }
}

/// Constructed-once lookup table from message id to schema.
#[derive(Debug, Default)]
pub struct Registry {
    schemas: HashMap<MsgId, MessageSchema>,
}

#[derive(Deserialize)]
struct RegistryDef {
    messages: Vec<MessageSchema>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Registry::default()
    }

    /// Add a schema, replacing any existing one with the same id.
    pub fn register(&mut self, schema: MessageSchema) {
        self.schemas.insert(schema.id, schema);
    }

    #[must_use]
    pub fn get(&self, id: MsgId) -> Option<&MessageSchema> {
        self.schemas.get(&id)
    }

    /// Load a registry from a JSON definition document.
    ///
    /// # Errors
    /// Any read or parse error.
    pub fn from_reader<R: std::io::Read>(reader: R) -> std::io::Result<Registry> {
        let def: RegistryDef = serde_json::from_reader(reader)?;
        let mut registry = Registry::new();
        for schema in def.messages {
            registry.register(schema);
        }
        debug!(num_messages = registry.schemas.len(), "loaded registry");
        Ok(registry)
    }

    /// Load a registry from a JSON definition file.
    ///
    /// # Errors
    /// Any read or parse error.
    pub fn with_file<P: AsRef<Path>>(path: P) -> std::io::Result<Registry> {
        Self::from_reader(File::open(path)?)
    }

    /// Create an empty message of the right shape for `id`, every field at
    /// its default, along with the ordered descriptor list to decode against.
    ///
    /// # Errors
    /// [`Error::UnknownMessage`] if no schema is registered for `id`.
    pub fn instantiate(
        &self,
        system_id: u8,
        component_id: u8,
        id: MsgId,
    ) -> Result<(Message, &[FieldDescriptor])> {
        let schema = self.get(id).ok_or(Error::UnknownMessage { id })?;
        Ok((
            schema.instantiate(system_id, component_id),
            &schema.fields,
        ))
    }
}
