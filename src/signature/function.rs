//! Function schemas
//!
//! A [`Function`] is the explicit description of a callable: its name, its
//! documentation text and its ordered parameters. It stands in for runtime
//! signature inspection.

use crate::error::TypeResult;
use crate::types::{Annotation, StreamMode, TypeHint, Value};

/// Structural role of a parameter
///
/// Receivers and variadic collectors are skipped when building a parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParameterKind {
    /// Implicit receiver (`self`)
    Receiver,
    #[default]
    Regular,
    /// Regular parameter that can only be passed by name
    KeywordOnly,
    /// Positional variadic collector (`*args`)
    VarPositional,
    /// Keyword variadic collector (`**kwargs`)
    VarKeyword,
}

impl ParameterKind {
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ParameterKind::Receiver | ParameterKind::VarPositional | ParameterKind::VarKeyword
        )
    }
}

/// One declared parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    kind: ParameterKind,
    annotation: Annotation,
    default: Option<Value>,
}

impl Parameter {
    /// A regular parameter with the given annotation and no default
    pub fn new(name: impl Into<String>, annotation: Annotation) -> Self {
        Parameter {
            name: name.into(),
            kind: ParameterKind::Regular,
            annotation,
            default: None,
        }
    }

    /// A regular parameter whose annotation comes from a Rust type
    pub fn of<T: TypeHint>(name: impl Into<String>) -> Self {
        Self::new(name, T::annotation())
    }

    /// A regular parameter whose annotation is parsed from text
    pub fn parse(name: impl Into<String>, annotation: &str) -> TypeResult<Self> {
        Ok(Self::new(name, annotation.parse()?))
    }

    /// A regular parameter typed after its default; `None` gives `Any`
    pub fn inferred(name: impl Into<String>, default: impl Into<Value>) -> Self {
        let default = default.into();
        Self::new(name, annotation_of(&default)).with_default(default)
    }

    pub fn receiver(name: impl Into<String>) -> Self {
        Self::new(name, Annotation::named("Any")).with_kind(ParameterKind::Receiver)
    }

    pub fn var_positional(name: impl Into<String>) -> Self {
        Self::new(name, Annotation::named("Any")).with_kind(ParameterKind::VarPositional)
    }

    pub fn var_keyword(name: impl Into<String>) -> Self {
        Self::new(name, Annotation::named("Any")).with_kind(ParameterKind::VarKeyword)
    }

    pub fn with_kind(mut self, kind: ParameterKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }

    /// The declared default, including an explicit `None`
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

fn annotation_of(value: &Value) -> Annotation {
    match value {
        Value::None => Annotation::named("Any"),
        Value::Bool(_) => Annotation::named("bool"),
        Value::Int(_) => Annotation::named("int"),
        Value::Float(_) => Annotation::named("float"),
        Value::Str(_) => Annotation::named("str"),
        Value::List(items) => match items.first() {
            Some(first) => Annotation::list(annotation_of(first)),
            None => Annotation::named("list"),
        },
        Value::Stream(stream) => match stream.mode() {
            StreamMode::Text => Annotation::named("TextIO"),
            StreamMode::Binary => Annotation::named("BinaryIO"),
        },
    }
}

/// A documented callable
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    name: String,
    doc: Option<String>,
    params: Vec<Parameter>,
}

impl Function {
    pub fn new(name: impl Into<String>) -> Self {
        Function {
            name: name.into(),
            doc: None,
            params: Vec::new(),
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    pub fn params_from(mut self, params: impl IntoIterator<Item = Parameter>) -> Self {
        self.params.extend(params);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Documentation text, `None` when blank
    pub fn doc_text(&self) -> Option<&str> {
        self.doc.as_deref().filter(|d| !d.trim().is_empty())
    }

    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    pub fn get_param(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name == name)
    }
}
