//! Class declaration descriptors
//!
//! The JSON shape handed over by the declaration parser:
//!
//! ```text
//! {
//!   "name": "Point", "extends": null, "implements": ["Countable"],
//!   "properties": [[doc, name, visibility, static?, type-tag, encoded-default?], ...],
//!   "methods": [[[kind, visibility, static?, final?, name, param-count], param..., ["begin"], body...], ...]
//! }
//! ```

use serde_json::Value;

use crate::error::{JitError, JitResult};
use crate::stream::decoder::{count, decode_after_header, text};
use crate::stream::{CalleeKind, InstructionStream};

/// Member visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl Visibility {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "public" => Some(Visibility::Public),
            "protected" => Some(Visibility::Protected),
            "private" => Some(Visibility::Private),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        }
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// A declared property
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    pub doc: Option<String>,
    pub name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    /// Declared type tag; only `string` defaults are base64-encoded
    pub ty: String,
    /// Encoded default value, if any
    pub default: Option<String>,
}

/// Method modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodModifiers {
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_final: bool,
}

impl MethodModifiers {
    /// Modifier prefix, e.g. `public static final`
    pub fn render(&self) -> String {
        let mut modifiers = self.visibility.keyword().to_string();
        if self.is_static {
            modifiers.push_str(" static");
        }
        if self.is_final {
            modifiers.push_str(" final");
        }
        modifiers
    }
}

/// A method: modifiers plus the body stream
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDescriptor {
    pub modifiers: MethodModifiers,
    pub stream: InstructionStream,
}

impl MethodDescriptor {
    pub fn name(&self) -> &str {
        self.stream.name()
    }
}

/// A full class declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDescriptor {
    pub name: String,
    pub extends: Option<String>,
    pub implements: Vec<String>,
    pub properties: Vec<PropertyDecl>,
    pub methods: Vec<MethodDescriptor>,
}

impl ClassDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        ClassDescriptor {
            name: name.into(),
            extends: None,
            implements: vec![],
            properties: vec![],
            methods: vec![],
        }
    }

    /// Decode the JSON descriptor shape
    pub fn from_json(value: &Value) -> JitResult<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| JitError::malformed_class("descriptor is not an object"))?;

        let name = object
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| JitError::malformed_class("missing class name"))?
            .to_string();

        let extends = match object.get("extends") {
            None | Some(Value::Null) | Some(Value::Bool(false)) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                return Err(JitError::malformed_class(format!("'extends' is not a name: {}", other)))
            }
        };

        let implements = match object.get("implements") {
            None | Some(Value::Null) => vec![],
            Some(Value::Array(names)) => names
                .iter()
                .map(|n| {
                    n.as_str().map(str::to_string).ok_or_else(|| {
                        JitError::malformed_class(format!("interface name is not a string: {}", n))
                    })
                })
                .collect::<JitResult<Vec<_>>>()?,
            Some(other) => {
                return Err(JitError::malformed_class(format!("'implements' is not a list: {}", other)))
            }
        };

        let properties = list(object.get("properties"), "properties")?
            .iter()
            .map(decode_property)
            .collect::<JitResult<Vec<_>>>()?;

        let methods = list(object.get("methods"), "methods")?
            .iter()
            .map(decode_method)
            .collect::<JitResult<Vec<_>>>()?;

        Ok(ClassDescriptor { name, extends, implements, properties, methods })
    }
}

fn list<'a>(value: Option<&'a Value>, what: &str) -> JitResult<&'a [Value]> {
    match value {
        None | Some(Value::Null) => Ok(&[][..]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(JitError::malformed_class(format!("'{}' is not a list", what))),
    }
}

fn visibility(keyword: &str) -> JitResult<Visibility> {
    Visibility::from_keyword(keyword)
        .ok_or_else(|| JitError::malformed_class(format!("unknown visibility '{}'", keyword)))
}

/// Flags arrive as the keyword itself, a boolean, or empty
fn flag(value: Option<&Value>, keyword: &str) -> bool {
    match value {
        Some(Value::String(s)) => s == keyword,
        Some(Value::Bool(b)) => *b,
        _ => false,
    }
}

/// Absent, null, false and empty defaults all mean "no default"
fn optional_scalar(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(true)) => Some("true".to_string()),
        _ => None,
    }
}

fn decode_property(value: &Value) -> JitResult<PropertyDecl> {
    let fields = value
        .as_array()
        .ok_or_else(|| JitError::malformed_class("property is not a tuple"))?;
    let field_str = |pos: usize, what: &str| {
        fields
            .get(pos)
            .and_then(Value::as_str)
            .ok_or_else(|| JitError::malformed_class(format!("property {} missing", what)))
    };

    Ok(PropertyDecl {
        doc: optional_scalar(fields.first()),
        name: field_str(1, "name")?.to_string(),
        visibility: visibility(field_str(2, "visibility")?)?,
        is_static: flag(fields.get(3), "static"),
        ty: field_str(4, "type")?.to_string(),
        default: optional_scalar(fields.get(5)),
    })
}

fn decode_method(value: &Value) -> JitResult<MethodDescriptor> {
    let items = value
        .as_array()
        .filter(|items| !items.is_empty())
        .ok_or_else(|| JitError::malformed_class("method is not a non-empty list"))?;
    let header = items[0]
        .as_array()
        .ok_or_else(|| JitError::malformed_class("method header is not a tuple"))?;

    let modifiers = MethodModifiers {
        visibility: visibility(text(header, 1, 0)?)?,
        is_static: flag(header.get(2), "static"),
        is_final: flag(header.get(3), "final"),
    };
    let name = text(header, 4, 0)?.to_string();
    let param_count = count(header, 5, 0)?;

    let stream = decode_after_header(CalleeKind::Method, name, param_count, items, 1)?;
    Ok(MethodDescriptor { modifiers, stream })
}
