//! Type annotations describing parameters
//!
//! An [`Annotation`] is the shape of a parameter's declared type before it is
//! resolved into a [`ParameterDescriptor`](crate::types::ParameterDescriptor).
//! Annotations are built directly, parsed from text such as
//! `Optional[List[int]]` or `Literal['a', 'b']`, or derived from Rust types
//! through [`TypeHint`].

use crate::error::TypeError;
use crate::types::Value;
use std::fmt;
use std::str::FromStr;

/// Closed set of annotation shapes
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    /// A bare type name such as `int` or `TextIO`
    Named(String),
    /// The `None` type, only meaningful inside a union
    NoneType,
    Optional(Box<Annotation>),
    Union(Vec<Annotation>),
    Literal(Vec<Value>),
    List(Box<Annotation>),
    Tuple(Vec<Annotation>),
    /// Any other parametrised type, e.g. `Dict[str, str]`
    Generic { name: String, args: Vec<Annotation> },
}

impl Annotation {
    pub fn named(name: impl Into<String>) -> Self {
        Annotation::Named(name.into())
    }

    pub fn optional(inner: Annotation) -> Self {
        Annotation::Optional(Box::new(inner))
    }

    pub fn list(inner: Annotation) -> Self {
        Annotation::List(Box::new(inner))
    }

    pub fn literal<T: Into<Value>>(values: impl IntoIterator<Item = T>) -> Self {
        Annotation::Literal(values.into_iter().map(Into::into).collect())
    }

    /// Whether this annotation wraps other annotations
    pub fn is_composite(&self) -> bool {
        !matches!(self, Annotation::Named(_) | Annotation::NoneType)
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, items: &[Annotation]) -> fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", item)?;
            }
            Ok(())
        }

        match self {
            Annotation::Named(name) => write!(f, "{}", name),
            Annotation::NoneType => write!(f, "None"),
            Annotation::Optional(inner) => write!(f, "Optional[{}]", inner),
            Annotation::Union(members) => {
                write!(f, "Union[")?;
                join(f, members)?;
                write!(f, "]")
            }
            Annotation::Literal(values) => {
                // list rendering quotes strings, reuse it without the brackets
                let rendered = Value::List(values.clone()).to_string();
                write!(f, "Literal[{}]", &rendered[1..rendered.len() - 1])
            }
            Annotation::List(inner) => write!(f, "List[{}]", inner),
            Annotation::Tuple(items) => {
                write!(f, "Tuple[")?;
                join(f, items)?;
                write!(f, "]")
            }
            Annotation::Generic { name, args } => {
                write!(f, "{}[", name)?;
                join(f, args)?;
                write!(f, "]")
            }
        }
    }
}

impl FromStr for Annotation {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = AnnotationParser {
            text: s,
            chars: s.char_indices().peekable(),
        };
        let annotation = parser.parse_union()?;
        parser.skip_ws();
        if let Some((pos, c)) = parser.chars.next() {
            return Err(parser.error(format!("unexpected '{}' at {}", c, pos)));
        }
        Ok(annotation)
    }
}

struct AnnotationParser<'a> {
    text: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> AnnotationParser<'a> {
    fn error(&self, reason: impl Into<String>) -> TypeError {
        TypeError::InvalidAnnotation {
            text: self.text.to_string(),
            reason: reason.into(),
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.chars.peek(), Some((_, c)) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_ws();
        if matches!(self.chars.peek(), Some((_, c)) if *c == expected) {
            self.chars.next();
            true
        } else {
            false
        }
    }

    /// `X | Y | ...`
    fn parse_union(&mut self) -> Result<Annotation, TypeError> {
        let first = self.parse_type()?;
        let mut members = vec![first];
        while self.eat('|') {
            members.push(self.parse_type()?);
        }
        if members.len() == 1 {
            Ok(members.remove(0))
        } else {
            Ok(Annotation::Union(members))
        }
    }

    fn parse_ident(&mut self) -> Result<String, TypeError> {
        self.skip_ws();
        let mut ident = String::new();
        while let Some((_, c)) = self.chars.peek() {
            if c.is_alphanumeric() || *c == '_' || *c == '.' {
                ident.push(*c);
                self.chars.next();
            } else {
                break;
            }
        }
        if ident.is_empty() {
            return Err(self.error("expected a type name"));
        }
        Ok(ident)
    }

    fn parse_type(&mut self) -> Result<Annotation, TypeError> {
        let ident = self.parse_ident()?;
        let name = ident.strip_prefix("typing.").unwrap_or(&ident).to_string();

        if !self.eat('[') {
            return Ok(match name.as_str() {
                "None" | "NoneType" => Annotation::NoneType,
                _ => Annotation::Named(name),
            });
        }

        if name == "Literal" {
            let values = self.parse_list(Self::parse_literal)?;
            return Ok(Annotation::Literal(values));
        }

        let mut args = self.parse_list(Self::parse_union)?;
        let annotation = match name.as_str() {
            "Optional" => {
                if args.len() != 1 {
                    return Err(self.error("Optional takes exactly one argument"));
                }
                Annotation::Optional(Box::new(args.remove(0)))
            }
            "Union" => Annotation::Union(args),
            "List" | "list" | "Sequence" => {
                if args.len() != 1 {
                    return Err(self.error("List takes exactly one argument"));
                }
                Annotation::List(Box::new(args.remove(0)))
            }
            "Tuple" | "tuple" => Annotation::Tuple(args),
            _ => Annotation::Generic { name, args },
        };
        Ok(annotation)
    }

    fn parse_list<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Result<T, TypeError>,
    ) -> Result<Vec<T>, TypeError> {
        let mut items = Vec::new();
        if self.eat(']') {
            return Ok(items);
        }
        loop {
            items.push(item(self)?);
            if self.eat(',') {
                continue;
            }
            if self.eat(']') {
                return Ok(items);
            }
            return Err(self.error("expected ',' or ']'"));
        }
    }

    fn parse_literal(&mut self) -> Result<Value, TypeError> {
        self.skip_ws();
        match self.chars.peek().map(|(_, c)| *c) {
            Some(quote @ ('\'' | '"')) => {
                self.chars.next();
                let mut s = String::new();
                loop {
                    match self.chars.next() {
                        Some((_, '\\')) => {
                            if let Some((_, escaped)) = self.chars.next() {
                                s.push(escaped);
                            }
                        }
                        Some((_, c)) if c == quote => return Ok(Value::Str(s)),
                        Some((_, c)) => s.push(c),
                        None => return Err(self.error("unterminated string literal")),
                    }
                }
            }
            Some(c) if c == '-' || c.is_ascii_digit() => {
                let mut number = String::new();
                while let Some((_, c)) = self.chars.peek() {
                    if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E') {
                        number.push(*c);
                        self.chars.next();
                    } else {
                        break;
                    }
                }
                if let Ok(i) = number.parse::<i64>() {
                    Ok(Value::Int(i))
                } else {
                    number
                        .parse::<f64>()
                        .map(Value::Float)
                        .map_err(|_| self.error(format!("invalid number literal '{}'", number)))
                }
            }
            _ => match self.parse_ident()?.as_str() {
                "True" | "true" => Ok(Value::Bool(true)),
                "False" | "false" => Ok(Value::Bool(false)),
                "None" => Ok(Value::None),
                other => Err(self.error(format!("invalid literal '{}'", other))),
            },
        }
    }
}

/// Readable text stream marker for [`TypeHint`]
pub enum TextStream {}

/// Readable binary stream marker for [`TypeHint`]
pub enum BinaryStream {}

/// Maps a Rust type to the annotation a parameter of that type would carry
pub trait TypeHint {
    fn annotation() -> Annotation;
}

macro_rules! type_hint {
    ($name:literal => $($ty:ty),+) => {
        $(
            impl TypeHint for $ty {
                fn annotation() -> Annotation {
                    Annotation::named($name)
                }
            }
        )+
    };
}

type_hint!("str" => String, &str);
type_hint!("int" => i64, i32, u32, usize);
type_hint!("float" => f64, f32);
type_hint!("bool" => bool);
type_hint!("TextIO" => TextStream);
type_hint!("BinaryIO" => BinaryStream);

impl<T: TypeHint> TypeHint for Vec<T> {
    fn annotation() -> Annotation {
        Annotation::list(T::annotation())
    }
}

impl<T: TypeHint> TypeHint for Option<T> {
    fn annotation() -> Annotation {
        Annotation::optional(T::annotation())
    }
}
