//! Rewriting the parameter section of documentation text
//!
//! When parameters are added to a function its documentation has to list them
//! too, in signature order. [`compose_doc`] renders the section again in the
//! style the text already uses and keeps the prose before and after it.

use super::docstring::GOOGLE_HEADER;
use crate::docs::{DocParser, DocStyle, DocstringParser};
use crate::types::Annotation;
use std::collections::HashMap;

/// Text placed around the parameter section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocFrame {
    /// Appended after the existing leading prose, or replacing it
    pub prefix: Option<String>,
    /// Appended after the existing trailing prose, or replacing it
    pub suffix: Option<String>,
    pub replace_prefix: bool,
    pub replace_suffix: bool,
}

/// Rebuild `doc` so its parameter section lists `params` in order.
///
/// Existing descriptions are kept unless `descriptions` holds a non-empty
/// replacement. Documented types are not carried over; NumPy entries are
/// typed from the annotations instead.
pub fn compose_doc(
    doc: &str,
    params: &[(&str, &Annotation)],
    descriptions: &HashMap<String, String>,
    frame: &DocFrame,
) -> String {
    let style = DocStyle::detect(doc);
    let lines: Vec<&str> = doc.lines().collect();
    let (pre, post) = match param_section(&lines, style) {
        Some((start, end)) => (lines[..start].join("\n"), lines[end..].join("\n")),
        None => (doc.to_string(), String::new()),
    };

    let mut merged: HashMap<String, String> = DocstringParser::with_style(style)
        .parse_params(doc)
        .into_iter()
        .filter(|p| !p.description.is_empty())
        .map(|p| (p.name, p.description))
        .collect();
    merged.extend(
        descriptions
            .iter()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(name, text)| (name.clone(), text.trim().to_string())),
    );

    let section = render_section(style, params, &merged);
    let pre = merge_text(&pre, frame.prefix.as_deref(), frame.replace_prefix);
    let post = merge_text(&post, frame.suffix.as_deref(), frame.replace_suffix);

    [pre, section, post]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn merge_text(existing: &str, added: Option<&str>, replace: bool) -> String {
    let added = added.map(str::trim).filter(|t| !t.is_empty());
    if replace {
        return added.unwrap_or_default().to_string();
    }
    match (existing.trim(), added) {
        ("", Some(added)) => added.to_string(),
        (existing, Some(added)) => format!("{}\n\n{}", existing, added),
        (existing, None) => existing.to_string(),
    }
}

/// Render a parameter section in `style`
pub fn render_section(
    style: DocStyle,
    params: &[(&str, &Annotation)],
    descriptions: &HashMap<String, String>,
) -> String {
    fn describe<'a>(descriptions: &'a HashMap<String, String>, name: &str) -> &'a str {
        descriptions.get(name).map(String::as_str).unwrap_or("")
    }

    let lines: Vec<String> = match style {
        DocStyle::Rest => params
            .iter()
            .map(|(name, _)| format!(":param {}: {}", name, describe(descriptions, name)))
            .collect(),
        DocStyle::Epydoc => params
            .iter()
            .map(|(name, _)| format!("@param {}: {}", name, describe(descriptions, name)))
            .collect(),
        DocStyle::Google => std::iter::once("Args:".to_string())
            .chain(
                params
                    .iter()
                    .map(|(name, _)| format!("    {}: {}", name, describe(descriptions, name))),
            )
            .collect(),
        DocStyle::Numpy => {
            let mut lines = vec!["Parameters".to_string(), "----------".to_string()];
            for (name, annotation) in params {
                lines.push(format!("{} : {}", name, annotation));
                let text = describe(descriptions, name);
                if !text.is_empty() {
                    lines.push(format!("    {}", text));
                }
            }
            lines
        }
    };

    lines
        .iter()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

fn is_rule(line: &str) -> bool {
    let t = line.trim();
    t.len() >= 3 && t.chars().all(|c| c == '-')
}

/// Line range `[start, end)` of the existing parameter section
fn param_section(lines: &[&str], style: DocStyle) -> Option<(usize, usize)> {
    match style {
        DocStyle::Rest => field_section(lines, ':'),
        DocStyle::Epydoc => field_section(lines, '@'),
        DocStyle::Google => google_section(lines),
        DocStyle::Numpy => numpy_section(lines),
    }
}

/// From the first `param` field to the last `param`/`type` field or its continuation
fn field_section(lines: &[&str], sigil: char) -> Option<(usize, usize)> {
    let param = format!("{}param", sigil);
    let type_field = format!("{}type", sigil);
    let start = lines.iter().position(|l| l.trim_start().starts_with(&param))?;

    let mut end = start + 1;
    let mut open = true;
    for (i, line) in lines.iter().enumerate().skip(start + 1) {
        let trimmed = line.trim();
        if trimmed.starts_with(&param) || trimmed.starts_with(&type_field) {
            end = i + 1;
            open = true;
        } else if trimmed.is_empty() || trimmed.starts_with(':') || trimmed.starts_with('@') {
            open = false;
        } else if open {
            end = i + 1;
        }
    }
    Some((start, end))
}

/// The `Args:` header and every deeper-indented line after it
fn google_section(lines: &[&str]) -> Option<(usize, usize)> {
    let start = lines.iter().position(|l| GOOGLE_HEADER.is_match(l))?;
    let header_indent = indent_of(lines[start]);

    let mut end = start + 1;
    for (i, line) in lines.iter().enumerate().skip(start + 1) {
        if line.trim().is_empty() {
            continue;
        }
        if indent_of(line) <= header_indent {
            break;
        }
        end = i + 1;
    }
    Some((start, end))
}

/// The underlined `Parameters` header up to the next section or dedent
fn numpy_section(lines: &[&str]) -> Option<(usize, usize)> {
    let start = lines
        .windows(2)
        .position(|w| w[0].trim() == "Parameters" && is_rule(w[1]))?;

    let mut end = start + 2;
    let mut base_indent: Option<usize> = None;
    for (i, line) in lines.iter().enumerate().skip(start + 2) {
        if line.trim().is_empty() {
            continue;
        }
        if lines.get(i + 1).is_some_and(|next| is_rule(next)) {
            break;
        }
        let indent = indent_of(line);
        if indent < *base_indent.get_or_insert(indent) {
            break;
        }
        end = i + 1;
    }
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int() -> Annotation {
        Annotation::named("int")
    }

    fn descriptions(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_epydoc_section_follows_new_order() {
        let doc = "Calculate the area.\n\n@param length: Length\n@param width: Width\n\n@return: the area";
        let ty = int();
        let params = [("length", &ty), ("scale", &ty), ("width", &ty)];
        let composed = compose_doc(doc, &params, &descriptions(&[("scale", "Scaling")]), &DocFrame::default());

        assert_eq!(
            composed,
            "Calculate the area.\n\n@param length: Length\n@param scale: Scaling\n@param width: Width\n\n@return: the area"
        );
    }

    #[test]
    fn test_rest_continuations_and_types_are_replaced() {
        let doc = "Add.\n\n:param a: first\n    spanning lines\n:type a: int\n:param b: second\n:returns: sum";
        let ty = int();
        let params = [("a", &ty), ("b", &ty), ("c", &ty)];
        let composed = compose_doc(doc, &params, &HashMap::new(), &DocFrame::default());

        assert_eq!(
            composed,
            "Add.\n\n:param a: first spanning lines\n:param b: second\n:param c:\n\n:returns: sum"
        );
    }

    #[test]
    fn test_google_section() {
        let doc = "Scale.\n\nArgs:\n    x (float): the value\n        still the value\n\nReturns:\n    scaled";
        let ty = Annotation::named("float");
        let params = [("x", &ty), ("factor", &ty)];
        let composed = compose_doc(doc, &params, &descriptions(&[("factor", "multiplier")]), &DocFrame::default());

        assert_eq!(
            composed,
            "Scale.\n\nArgs:\n    x: the value still the value\n    factor: multiplier\n\nReturns:\n    scaled"
        );
    }

    #[test]
    fn test_numpy_section_is_typed_from_annotations() {
        let doc = "Fit.\n\nParameters\n----------\nx : int\n    data\n\nReturns\n-------\nmodel";
        let list = Annotation::list(int());
        let ty = int();
        let params = [("x", &ty), ("ns", &list)];
        let composed = compose_doc(doc, &params, &HashMap::new(), &DocFrame::default());

        assert_eq!(
            composed,
            "Fit.\n\nParameters\n----------\nx : int\n    data\nns : List[int]\n\nReturns\n-------\nmodel"
        );
    }

    #[test]
    fn test_missing_section_defaults_to_epydoc() {
        let ty = int();
        let composed = compose_doc("Sum numbers.", &[("a", &ty)], &HashMap::new(), &DocFrame::default());
        assert_eq!(composed, "Sum numbers.\n\n@param a:");

        let composed = compose_doc("", &[("a", &ty)], &descriptions(&[("a", "x")]), &DocFrame::default());
        assert_eq!(composed, "@param a: x");
    }

    #[test]
    fn test_frame_appends_or_replaces() {
        let doc = "Intro.\n\n@param a: first\n\nOutro.";
        let ty = int();
        let params = [("a", &ty)];

        let appended = DocFrame {
            prefix: Some("More intro.".to_string()),
            suffix: Some("More outro.".to_string()),
            ..DocFrame::default()
        };
        assert_eq!(
            compose_doc(doc, &params, &HashMap::new(), &appended),
            "Intro.\n\nMore intro.\n\n@param a: first\n\nOutro.\n\nMore outro."
        );

        let replaced = DocFrame {
            prefix: Some("New intro.".to_string()),
            replace_prefix: true,
            replace_suffix: true,
            ..DocFrame::default()
        };
        assert_eq!(
            compose_doc(doc, &params, &HashMap::new(), &replaced),
            "New intro.\n\n@param a: first"
        );
    }
}
