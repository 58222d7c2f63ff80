//! Hand-authored input schemas for tools.
//!
//! Each tool declares its argument shape once with [`InputSchema`]. The same
//! descriptor is rendered to JSON Schema for the backend and used by the
//! dispatcher to reject malformed arguments before a handler runs.
//!
//! The rendered top level has exactly `type`, `properties` and `required`.
//! Nothing is referenced through `$ref`; nested objects are inlined and closed
//! with `additionalProperties: false`.

use serde_json::{Map, Value, json};

use crate::error::ToolError;

/// The type of a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
    Array(Box<FieldType>),
    Object(InputSchema),
}

impl FieldType {
    fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Array(_) => "array",
            FieldType::Object(_) => "object",
        }
    }

    fn descriptor(&self) -> Value {
        match self {
            FieldType::Array(items) => json!({
                "type": "array",
                "items": items.descriptor(),
            }),
            FieldType::Object(schema) => {
                let mut obj = schema.render();
                obj.insert("additionalProperties".into(), Value::Bool(false));
                Value::Object(obj)
            }
            other => json!({ "type": other.type_name() }),
        }
    }

    fn check(&self, path: &str, value: &Value) -> Result<(), ToolError> {
        let ok = match self {
            FieldType::String => value.is_string(),
            FieldType::Integer => value.is_i64() || value.is_u64(),
            FieldType::Number => value.is_number(),
            FieldType::Boolean => value.is_boolean(),
            FieldType::Array(items) => {
                let Some(arr) = value.as_array() else {
                    return Err(type_mismatch(path, self));
                };
                for (i, item) in arr.iter().enumerate() {
                    items.check(&format!("{path}[{i}]"), item)?;
                }
                true
            }
            FieldType::Object(schema) => return schema.check_object(path, value),
        };
        if ok { Ok(()) } else { Err(type_mismatch(path, self)) }
    }
}

fn type_mismatch(path: &str, expected: &FieldType) -> ToolError {
    ToolError::InvalidArgument(format!(
        "'{path}' must be of type {}",
        expected.type_name()
    ))
}

/// One declared property.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub field_type: FieldType,
    pub description: String,
    pub required: bool,
}

/// A closed object shape: named fields, their types, and which are required.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSchema {
    fields: Vec<Field>,
}

impl InputSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field that must be present.
    pub fn required(
        self,
        name: impl Into<String>,
        field_type: FieldType,
        description: impl Into<String>,
    ) -> Self {
        self.field(name, field_type, description, true)
    }

    /// Declare a field that may be omitted.
    pub fn optional(
        self,
        name: impl Into<String>,
        field_type: FieldType,
        description: impl Into<String>,
    ) -> Self {
        self.field(name, field_type, description, false)
    }

    fn field(
        mut self,
        name: impl Into<String>,
        field_type: FieldType,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        let name = name.into();
        self.fields.retain(|f| f.name != name);
        self.fields.push(Field {
            name,
            field_type,
            description: description.into(),
            required,
        });
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Names of required fields, in declaration order.
    pub fn required_names(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Render as the JSON Schema advertised to the backend.
    pub fn to_json(&self) -> Value {
        Value::Object(self.render())
    }

    fn render(&self) -> Map<String, Value> {
        let mut properties = Map::new();
        for field in &self.fields {
            let mut descriptor = field.field_type.descriptor();
            if !field.description.is_empty()
                && let Value::Object(obj) = &mut descriptor
            {
                obj.insert("description".into(), Value::String(field.description.clone()));
            }
            properties.insert(field.name.clone(), descriptor);
        }

        let mut out = Map::new();
        out.insert("type".into(), Value::String("object".into()));
        out.insert("properties".into(), Value::Object(properties));
        out.insert("required".into(), json!(self.required_names()));
        out
    }

    /// Check parsed arguments against the declared shape.
    ///
    /// Rejects undeclared properties, missing required fields and primitive
    /// type mismatches. A `null` optional field counts as absent.
    pub fn validate(&self, arguments: &Value) -> Result<(), ToolError> {
        self.check_object("arguments", arguments)
    }

    fn check_object(&self, path: &str, value: &Value) -> Result<(), ToolError> {
        let Some(obj) = value.as_object() else {
            return Err(ToolError::InvalidArgument(format!(
                "'{path}' must be a JSON object"
            )));
        };

        if let Some(unknown) = obj
            .keys()
            .find(|k| !self.fields.iter().any(|f| &f.name == *k))
        {
            return Err(ToolError::InvalidArgument(format!(
                "unexpected property '{unknown}'"
            )));
        }

        for field in &self.fields {
            match obj.get(&field.name) {
                None | Some(Value::Null) if field.required => {
                    return Err(ToolError::InvalidArgument(format!(
                        "missing required property '{}'",
                        field.name
                    )));
                }
                None | Some(Value::Null) => {}
                Some(v) => field.field_type.check(&field.name, v)?,
            }
        }
        Ok(())
    }
}
