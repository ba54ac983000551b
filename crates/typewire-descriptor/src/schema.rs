use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::composite::Sequence;
use crate::dynamic::DynamicType;
use crate::error::{DescriptorError, Result};
use crate::primitive::{Bool, ByteString, Char, Float, Integer};

/// Serializable description of a descriptor tree.
///
/// This is what a stub generator emits for each message type:
///
/// ```json
/// {
///   "type": "record",
///   "name": "Scored",
///   "fields": [
///     { "name": "id", "type": { "type": "int", "signed": true, "width": 4 } },
///     { "name": "name", "type": { "type": "string" } },
///     { "name": "scores", "type": { "type": "sequence",
///       "element": { "type": "int", "signed": false, "width": 2 } } }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TypeSchema {
    Int {
        signed: bool,
        width: u8,
    },
    Float,
    String,
    Bool,
    Char,
    Sequence {
        element: Box<TypeSchema>,
    },
    Mapping {
        key: Box<TypeSchema>,
        value: Box<TypeSchema>,
    },
    Record {
        name: String,
        fields: Vec<FieldSchema>,
    },
}

/// One record field in a [`TypeSchema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeSchema,
}

impl TypeSchema {
    /// Parse a schema from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Render the schema as JSON text.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the schema and build its descriptor tree.
    pub fn compile(&self) -> Result<DynamicType> {
        let compiled = match self {
            TypeSchema::Int { signed, width } => {
                DynamicType::Int(Integer::from_config(*signed, *width)?)
            }
            TypeSchema::Float => DynamicType::Float(Float),
            TypeSchema::String => DynamicType::String(ByteString),
            TypeSchema::Bool => DynamicType::Bool(Bool),
            TypeSchema::Char => DynamicType::Char(Char),
            TypeSchema::Sequence { element } => {
                DynamicType::Sequence(Sequence::new(Box::new(element.compile()?)))
            }
            TypeSchema::Mapping { key, value } => DynamicType::Mapping {
                key: Box::new(key.compile()?),
                value: Box::new(value.compile()?),
            },
            TypeSchema::Record { name, fields } => {
                let mut seen = HashSet::new();
                let mut compiled = Vec::with_capacity(fields.len());
                for field in fields {
                    if !seen.insert(field.name.as_str()) {
                        return Err(DescriptorError::DuplicateField {
                            record: name.clone(),
                            field: field.name.clone(),
                        });
                    }
                    compiled.push((field.name.clone(), field.ty.compile()?));
                }
                DynamicType::Record {
                    name: name.clone(),
                    fields: compiled,
                }
            }
        };
        Ok(compiled)
    }
}
