//! Runtime values for defaults, literals and parsed arguments

use indexmap::IndexMap;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

/// A dynamically typed argument value
///
/// `Display` follows the conventions of the help text and generated argv:
/// `None`, `True`/`False`, numbers as written, strings unquoted at the top
/// level and quoted inside lists (`['a', 'b']`).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Stream(StreamArg),
}

impl Value {
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Integers widen to floats
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_stream(&self) -> Option<&StreamArg> {
        match self {
            Value::Stream(s) => Some(s),
            _ => None,
        }
    }

    /// Render as an element of a list (strings quoted)
    fn fmt_repr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "'{}'", s.replace('\'', "\\'")),
            other => write!(f, "{}", other),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Str(s) => write!(f, "{}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    item.fmt_repr(f)?;
                }
                write!(f, "]")
            }
            Value::Stream(stream) => write!(f, "{}", stream.path().display()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<StreamArg> for Value {
    fn from(s: StreamArg) -> Self {
        Value::Stream(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::None, Into::into)
    }
}

/// How a stream parameter is meant to be opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamMode {
    Text,
    Binary,
}

/// A readable file argument
///
/// Parsing only checks the path is readable. Opening is left to whoever
/// receives the parsed value, and so is closing the handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamArg {
    path: PathBuf,
    mode: StreamMode,
}

impl StreamArg {
    pub fn new(path: impl Into<PathBuf>, mode: StreamMode) -> Self {
        StreamArg {
            path: path.into(),
            mode,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> StreamMode {
        self.mode
    }

    /// `-` stands for standard input
    pub fn is_stdin(&self) -> bool {
        self.path.as_os_str() == "-"
    }

    /// Open the stream for reading
    pub fn open(&self) -> io::Result<Box<dyn BufRead>> {
        if self.is_stdin() {
            return Ok(Box::new(BufReader::new(io::stdin())));
        }
        Ok(Box::new(BufReader::new(File::open(&self.path)?)))
    }

    /// Read a text stream to the end
    pub fn read_to_string(&self) -> io::Result<String> {
        let mut contents = String::new();
        self.open()?.read_to_string(&mut contents)?;
        Ok(contents)
    }

    fn check(path: &str, mode: StreamMode) -> Result<Self, String> {
        if path != "-" {
            let meta = fs::metadata(path).map_err(|e| format!("can't open '{}': {}", path, e))?;
            if !meta.is_file() {
                return Err(format!("can't open '{}': not a file", path));
            }
        }
        Ok(StreamArg::new(path, mode))
    }

    /// clap value parser for text streams
    pub(crate) fn parse_text(path: &str) -> Result<Self, String> {
        Self::check(path, StreamMode::Text)
    }

    /// clap value parser for binary streams
    pub(crate) fn parse_binary(path: &str) -> Result<Self, String> {
        Self::check(path, StreamMode::Binary)
    }
}

/// Named argument values, in declaration order
///
/// Returned by the parsers and consumed by the command generator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: IndexMap<String, Value>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Merge another set of arguments, later values win
    pub fn extend(&mut self, other: Arguments) {
        self.values.extend(other.values);
    }
}

impl FromIterator<(String, Value)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Arguments {
            values: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Arguments {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}
