//! Parameter sections of documentation text
//!
//! The reconciler only needs the documented parameters, in the order they
//! were written. [`DocParser`] is the seam; [`DocstringParser`] handles the
//! common reST, epydoc, Google and NumPy layouts.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// One documented parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocParam {
    pub name: String,
    /// Prose type as written, e.g. `int` or `list of str`
    pub type_name: Option<String>,
    pub description: String,
}

impl DocParam {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        DocParam {
            name: name.into(),
            type_name: None,
            description: description.into(),
        }
    }

    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }
}

/// Extracts documented parameters from documentation text
pub trait DocParser {
    /// Documented parameters in declaration order, duplicates included
    fn parse_params(&self, doc: &str) -> Vec<DocParam>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocStyle {
    /// `:param name: description`
    Rest,
    /// `@param name: description`
    Epydoc,
    /// `Args:` block
    Google,
    /// `Parameters` underlined with dashes
    Numpy,
}

impl DocStyle {
    pub fn detect(doc: &str) -> Self {
        if doc.contains("@param") {
            DocStyle::Epydoc
        } else if doc.contains(":param") {
            DocStyle::Rest
        } else if GOOGLE_HEADER.is_match(doc) {
            DocStyle::Google
        } else if NUMPY_HEADER.is_match(doc) {
            DocStyle::Numpy
        } else {
            DocStyle::Epydoc
        }
    }
}

pub(super) static GOOGLE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*(Args|Arguments)\s*:\s*$").expect("valid regex"));
static NUMPY_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*Parameters\s*\n\s*-{3,}\s*$").expect("valid regex"));
static SECTION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(Parameters|Returns|Yields|Raises|Examples|Notes|-{3,})$").expect("valid regex")
});
static REST_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*:param\s+(?:(?P<type>[^:]+?)\s+)?(?P<name>\*{0,2}[A-Za-z_]\w*)\s*:\s*(?P<desc>.*)$")
        .expect("valid regex")
});
static REST_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*:type\s+(?P<name>[A-Za-z_]\w*)\s*:\s*(?P<type>.*)$").expect("valid regex")
});
static EPYDOC_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*@param\s+(?P<name>\*{0,2}[A-Za-z_]\w*)\s*:\s*(?P<desc>.*)$").expect("valid regex")
});
static EPYDOC_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*@type\s+(?P<name>[A-Za-z_]\w*)\s*:\s*(?P<type>.*)$").expect("valid regex")
});
static GOOGLE_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>\*{0,2}[A-Za-z_]\w*)\s*(?:\((?P<type>[^)]*)\))?\s*:\s*(?P<desc>.*)$")
        .expect("valid regex")
});
static NUMPY_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>\*{0,2}[A-Za-z_]\w*)\s*(?::\s*(?P<type>.*))?$").expect("valid regex")
});

/// Default [`DocParser`], auto-detecting the style unless one is fixed
#[derive(Debug, Clone, Copy, Default)]
pub struct DocstringParser {
    style: Option<DocStyle>,
}

impl DocstringParser {
    pub fn auto() -> Self {
        Self::default()
    }

    pub fn with_style(style: DocStyle) -> Self {
        DocstringParser { style: Some(style) }
    }
}

impl DocParser for DocstringParser {
    fn parse_params(&self, doc: &str) -> Vec<DocParam> {
        match self.style.unwrap_or_else(|| DocStyle::detect(doc)) {
            DocStyle::Rest => parse_fields(doc, &REST_PARAM, &REST_TYPE),
            DocStyle::Epydoc => parse_fields(doc, &EPYDOC_PARAM, &EPYDOC_TYPE),
            DocStyle::Google => parse_google(doc),
            DocStyle::Numpy => parse_numpy(doc),
        }
    }
}

/// Leading prose of the documentation, up to the first blank line or field
pub fn summary(doc: &str) -> Option<String> {
    let lines: Vec<&str> = doc
        .lines()
        .map(str::trim)
        .skip_while(|l| l.is_empty())
        .take_while(|l| {
            !l.is_empty()
                && !l.starts_with(':')
                && !l.starts_with('@')
                && !GOOGLE_HEADER.is_match(l)
                && !SECTION_HEADER.is_match(l)
        })
        .collect();
    (!lines.is_empty()).then(|| lines.join(" "))
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// `int, optional` documents an `int`
fn clean_type(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let raw = raw.strip_suffix(", optional").unwrap_or(raw).trim();
    (!raw.is_empty()).then(|| raw.to_string())
}

fn push_continuation(param: Option<&mut DocParam>, text: &str) {
    if let Some(param) = param {
        if param.description.is_empty() {
            param.description = text.to_string();
        } else {
            param.description.push(' ');
            param.description.push_str(text);
        }
    }
}

/// Field-list styles (reST and epydoc)
fn parse_fields(doc: &str, param_re: &Regex, type_re: &Regex) -> Vec<DocParam> {
    let mut params: Vec<DocParam> = Vec::new();
    let mut types: HashMap<String, String> = HashMap::new();
    let mut open = false;

    for line in doc.lines() {
        let trimmed = line.trim();
        if let Some(caps) = param_re.captures(line) {
            let mut param = DocParam::new(&caps["name"], caps["desc"].trim());
            param.type_name = caps.name("type").and_then(|t| clean_type(t.as_str()));
            params.push(param);
            open = true;
        } else if let Some(caps) = type_re.captures(line) {
            // applied once all params are known; `:type` may come first
            if let Some(type_name) = clean_type(&caps["type"]) {
                types.insert(caps["name"].to_string(), type_name);
            }
            open = false;
        } else if trimmed.is_empty() || trimmed.starts_with(':') || trimmed.starts_with('@') {
            open = false;
        } else if open {
            push_continuation(params.last_mut(), trimmed);
        }
    }

    for param in &mut params {
        if let Some(type_name) = types.get(&param.name) {
            param.type_name = Some(type_name.clone());
        }
    }
    params
}

fn parse_google(doc: &str) -> Vec<DocParam> {
    let mut params: Vec<DocParam> = Vec::new();
    let mut lines = doc.lines().skip_while(|l| !GOOGLE_HEADER.is_match(l));
    let Some(header) = lines.next() else {
        return params;
    };
    let header_indent = indent_of(header);
    let mut entry_indent: Option<usize> = None;

    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let indent = indent_of(line);
        if indent <= header_indent {
            break;
        }
        let entry = *entry_indent.get_or_insert(indent);
        if indent <= entry {
            if let Some(caps) = GOOGLE_PARAM.captures(trimmed) {
                let mut param = DocParam::new(&caps["name"], caps["desc"].trim());
                param.type_name = caps.name("type").and_then(|t| clean_type(t.as_str()));
                params.push(param);
            }
        } else {
            push_continuation(params.last_mut(), trimmed);
        }
    }

    params
}

fn parse_numpy(doc: &str) -> Vec<DocParam> {
    let mut params: Vec<DocParam> = Vec::new();
    let lines: Vec<&str> = doc.lines().collect();
    let is_rule = |line: &str| {
        let t = line.trim();
        t.len() >= 3 && t.chars().all(|c| c == '-')
    };

    let Some(start) = lines
        .windows(2)
        .position(|w| w[0].trim() == "Parameters" && is_rule(w[1]))
    else {
        return params;
    };

    let mut base_indent: Option<usize> = None;
    let mut i = start + 2;
    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim();
        if trimmed.is_empty() {
            i += 1;
            continue;
        }
        // next section header
        if lines.get(i + 1).is_some_and(|&next| is_rule(next)) {
            break;
        }
        let indent = indent_of(line);
        let base = *base_indent.get_or_insert(indent);
        if indent < base {
            break;
        }
        if indent == base {
            if let Some(caps) = NUMPY_PARAM.captures(trimmed) {
                let mut param = DocParam::new(&caps["name"], "");
                param.type_name = caps.name("type").and_then(|t| clean_type(t.as_str()));
                params.push(param);
            }
        } else {
            push_continuation(params.last_mut(), trimmed);
        }
        i += 1;
    }

    params
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(params: &[DocParam]) -> Vec<&str> {
        params.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_detect_styles() {
        assert_eq!(DocStyle::detect("@param a: x"), DocStyle::Epydoc);
        assert_eq!(DocStyle::detect(":param a: x"), DocStyle::Rest);
        assert_eq!(DocStyle::detect("Sum.\n\nArgs:\n    a: x\n"), DocStyle::Google);
        assert_eq!(
            DocStyle::detect("Sum.\n\nParameters\n----------\na\n    x\n"),
            DocStyle::Numpy
        );
    }

    #[test]
    fn test_rest_params_with_types_and_continuations() {
        let doc = r#"
            Add numbers

            :param a: input to add
                spanning two lines
            :param list of int ns: input param iterable
            :type a: int
            :return: an int
        "#;
        let params = DocstringParser::auto().parse_params(doc);
        assert_eq!(names(&params), vec!["a", "ns"]);
        assert_eq!(params[0].description, "input to add spanning two lines");
        assert_eq!(params[0].type_name.as_deref(), Some("int"));
        assert_eq!(params[1].type_name.as_deref(), Some("list of int"));
    }

    #[test]
    fn test_type_lines_before_their_param() {
        let doc = ":type a: int\n:param a: first\n@type b: str\n:param b: second\n:type b: float, optional\n";
        let params = DocstringParser::with_style(DocStyle::Rest).parse_params(doc);
        assert_eq!(names(&params), vec!["a", "b"]);
        assert_eq!(params[0].type_name.as_deref(), Some("int"));
        assert_eq!(params[1].type_name.as_deref(), Some("float"));

        let doc = "@type x: list of int\n@param x: values\n";
        let params = DocstringParser::auto().parse_params(doc);
        assert_eq!(params[0].type_name.as_deref(), Some("list of int"));
    }

    #[test]
    fn test_duplicates_are_kept() {
        let doc = ":param a: one\n:param ns: two\n:param ns: three\n";
        let params = DocstringParser::auto().parse_params(doc);
        assert_eq!(names(&params), vec!["a", "ns", "ns"]);
    }

    #[test]
    fn test_epydoc() {
        let doc = "Add two numbers\n@param a: First number\n@param b: Second number (default: 10)\n";
        let params = DocstringParser::auto().parse_params(doc);
        assert_eq!(names(&params), vec!["a", "b"]);
        assert_eq!(params[1].description, "Second number (default: 10)");
    }

    #[test]
    fn test_google() {
        let doc = r#"Calculate things.

    Args:
        length (float): Length of the rectangle
        width: Width of the
            rectangle

    Returns:
        the area
"#;
        let params = DocstringParser::auto().parse_params(doc);
        assert_eq!(names(&params), vec!["length", "width"]);
        assert_eq!(params[0].type_name.as_deref(), Some("float"));
        assert_eq!(params[1].description, "Width of the rectangle");
    }

    #[test]
    fn test_numpy_with_and_without_types() {
        let doc = r#"
            Function definition

            Parameters
            ----------
            a: int
                first number
            b : list of int, optional
                optional argument
            c
                untyped

            Returns
            -------
            int
        "#;
        let params = DocstringParser::auto().parse_params(doc);
        assert_eq!(names(&params), vec!["a", "b", "c"]);
        assert_eq!(params[0].type_name.as_deref(), Some("int"));
        assert_eq!(params[1].type_name.as_deref(), Some("list of int"));
        assert_eq!(params[2].type_name, None);
        assert_eq!(params[2].description, "untyped");
    }

    #[test]
    fn test_summary() {
        let doc = "\n    Add two\n    numbers\n\n    :param a: x\n";
        assert_eq!(summary(doc).as_deref(), Some("Add two numbers"));
        assert_eq!(summary(":param a: x"), None);
        assert_eq!(summary("Parameters\n----------\na : int\n    x"), None);
    }

    #[test]
    fn test_no_params() {
        assert!(DocstringParser::auto().parse_params("Just a summary.").is_empty());
    }
}
