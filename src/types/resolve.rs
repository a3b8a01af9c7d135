//! Annotation resolution
//!
//! Turns an [`Annotation`] into the [`ParameterDescriptor`] the emitter works
//! from. Resolution happens once per parameter and is the only place that
//! looks at annotation shape.

use crate::error::{TypeError, TypeResult};
use crate::types::{Annotation, StreamArg, Value};
use clap::builder::ValueParser;
use std::fmt;

/// Closed set of scalar kinds a flag value can be converted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Float,
    Integer,
    Boolean,
    TextStream,
    BinaryStream,
}

impl ScalarKind {
    /// Look up a type name in the scalar table
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.strip_prefix("typing.").unwrap_or(name);
        match name {
            "str" => Some(ScalarKind::String),
            "float" => Some(ScalarKind::Float),
            "int" => Some(ScalarKind::Integer),
            "bool" => Some(ScalarKind::Boolean),
            "TextIO" => Some(ScalarKind::TextStream),
            "BinaryIO" => Some(ScalarKind::BinaryStream),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ScalarKind::String => "str",
            ScalarKind::Float => "float",
            ScalarKind::Integer => "int",
            ScalarKind::Boolean => "bool",
            ScalarKind::TextStream => "TextIO",
            ScalarKind::BinaryStream => "BinaryIO",
        }
    }

    /// clap value parser producing the Rust type [`crate::parser::FlagSpec::extract`] reads back
    pub(crate) fn value_parser(&self) -> ValueParser {
        match self {
            ScalarKind::String => ValueParser::string(),
            ScalarKind::Float => ValueParser::new(|s: &str| s.parse::<f64>()),
            ScalarKind::Integer => ValueParser::new(clap::value_parser!(i64)),
            ScalarKind::Boolean => ValueParser::bool(),
            ScalarKind::TextStream => ValueParser::new(StreamArg::parse_text),
            ScalarKind::BinaryStream => ValueParser::new(StreamArg::parse_binary),
        }
    }
}

/// Either a plain scalar or a fixed set of literal choices
#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    Scalar(ScalarKind),
    Choice(Vec<Value>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiplicity {
    Single,
    Sequence,
}

/// Resolved description of one parameter's type
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    pub kind: Kind,
    pub multiplicity: Multiplicity,
    /// False when the annotation was optional-wrapped
    pub required: bool,
}

impl ParameterDescriptor {
    pub fn scalar(&self) -> Option<ScalarKind> {
        match &self.kind {
            Kind::Scalar(kind) => Some(*kind),
            Kind::Choice(_) => None,
        }
    }

    pub fn is_boolean(&self) -> bool {
        self.scalar() == Some(ScalarKind::Boolean)
    }

    pub fn is_sequence(&self) -> bool {
        self.multiplicity == Multiplicity::Sequence
    }
}

impl fmt::Display for ParameterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = match &self.kind {
            Kind::Scalar(kind) => kind.type_name().to_string(),
            Kind::Choice(values) => Annotation::Literal(values.clone()).to_string(),
        };
        let base = match self.multiplicity {
            Multiplicity::Single => base,
            Multiplicity::Sequence => format!("List[{}]", base),
        };
        if self.required {
            write!(f, "{}", base)
        } else {
            write!(f, "Optional[{}]", base)
        }
    }
}

/// Resolve the annotation of parameter `param`
pub fn resolve(param: &str, annotation: &Annotation) -> TypeResult<ParameterDescriptor> {
    let (annotation, required) = unwrap_optional(param, annotation)?;

    let (element, multiplicity) = match annotation {
        Annotation::Literal(values) => {
            if values.is_empty() {
                return Err(TypeError::Unsupported {
                    ty: annotation.to_string(),
                    param: param.to_string(),
                });
            }
            return Ok(ParameterDescriptor {
                kind: Kind::Choice(values.clone()),
                multiplicity: Multiplicity::Single,
                required,
            });
        }
        Annotation::List(inner) => (inner.as_ref(), Multiplicity::Sequence),
        Annotation::Tuple(items) => match items.as_slice() {
            [inner] => (inner, Multiplicity::Sequence),
            _ => {
                return Err(TypeError::Aggregate {
                    ty: annotation.to_string(),
                    param: param.to_string(),
                })
            }
        },
        other => (other, Multiplicity::Single),
    };

    if multiplicity == Multiplicity::Sequence && element.is_composite() {
        return Err(TypeError::Nested {
            ty: annotation.to_string(),
            param: param.to_string(),
        });
    }

    let kind = match element {
        Annotation::Named(name) => ScalarKind::from_name(name),
        _ => None,
    }
    .ok_or_else(|| TypeError::Unsupported {
        ty: element.to_string(),
        param: param.to_string(),
    })?;

    Ok(ParameterDescriptor {
        kind: Kind::Scalar(kind),
        multiplicity,
        required,
    })
}

/// Strip one `Optional[X]` / `Union[X, None]` layer
fn unwrap_optional<'a>(param: &str, annotation: &'a Annotation) -> TypeResult<(&'a Annotation, bool)> {
    match annotation {
        Annotation::Optional(inner) => Ok((inner.as_ref(), false)),
        Annotation::Union(members) => {
            let nones = members
                .iter()
                .filter(|m| matches!(m, Annotation::NoneType))
                .count();
            let others: Vec<&Annotation> = members
                .iter()
                .filter(|m| !matches!(m, Annotation::NoneType))
                .collect();
            if members.len() != 2 || nones != 1 {
                return Err(TypeError::UnsupportedUnion {
                    ty: annotation.to_string(),
                    param: param.to_string(),
                });
            }
            Ok((others[0], false))
        }
        other => Ok((other, true)),
    }
}

/// Resolve a type written in prose inside documentation
///
/// Accepts the scalar table names and the `list of X` convention. Returns
/// `None` when the text is not understood, which callers treat as "no check".
pub fn resolve_doc_type(text: &str) -> Option<(ScalarKind, Multiplicity)> {
    let text = text.trim();
    if let Some(rest) = text.strip_prefix("list of") {
        let kind = ScalarKind::from_name(rest.trim())?;
        return Some((kind, Multiplicity::Sequence));
    }
    ScalarKind::from_name(text).map(|kind| (kind, Multiplicity::Single))
}
