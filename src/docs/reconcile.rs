//! Joining the scanned signature with its documentation
//!
//! Documentation and signature are matched by position, never re-sorted: a
//! difference in order means the two drifted apart and is reported as an
//! error with a side-by-side table.

use crate::docs::DocParam;
use crate::error::{SchemaError, SchemaResult};
use crate::signature::{BuildOptions, ScannedSignature, Slot};
use crate::types::{resolve_doc_type, Kind, Multiplicity, ParameterDescriptor, Value};
use std::collections::HashSet;
use tracing::debug;

const MISSING_DOC: &str = "----";
const MISSING_SIGNATURE: &str = "****";

/// A parameter ready to become a flag
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentRecord {
    pub name: String,
    pub descriptor: ParameterDescriptor,
    pub default: Option<Value>,
    pub description: String,
    pub effectively_required: bool,
}

impl ArgumentRecord {
    /// Required unless forced optional, defaulted, or optional-wrapped
    pub fn is_required(&self, optional: &HashSet<String>) -> bool {
        self.descriptor.required && self.default.is_none() && !optional.contains(&self.name)
    }
}

/// Merge scanned parameters with documented ones
pub fn reconcile(
    function: &str,
    scanned: &ScannedSignature,
    doc_params: &[DocParam],
    opts: &BuildOptions,
) -> SchemaResult<Vec<ArgumentRecord>> {
    let mut seen = HashSet::new();
    for param in doc_params {
        if !seen.insert(param.name.as_str()) {
            return Err(SchemaError::DuplicateArgument(param.name.clone()));
        }
    }

    let doc_names: Vec<&str> = doc_params.iter().map(|p| p.name.as_str()).collect();
    let signature_names: Vec<&str> = scanned.names().collect();
    if doc_names != signature_names {
        return Err(SchemaError::Mismatch {
            function: function.to_string(),
            table: mismatch_table(&doc_names, scanned),
        });
    }

    let mut records = Vec::new();
    for param in doc_params {
        let Some(Slot::Present {
            descriptor,
            default,
        }) = scanned.get(&param.name)
        else {
            continue;
        };
        if opts.excludes(&param.name) {
            continue;
        }

        if opts.check_doc_types {
            check_doc_type(param, descriptor)?;
        }

        let mut record = ArgumentRecord {
            name: param.name.clone(),
            descriptor: descriptor.clone(),
            default: default.clone(),
            description: param.description.clone(),
            effectively_required: false,
        };
        record.effectively_required = record.is_required(&opts.optional);
        records.push(record);
    }

    debug!(function, records = records.len(), "reconciled documentation");
    Ok(records)
}

/// Prose types are checked only when understood; choices are never checked.
/// `list of X` requires a sequence, while a plain `X` is accepted for either
/// multiplicity.
fn check_doc_type(param: &DocParam, descriptor: &ParameterDescriptor) -> SchemaResult<()> {
    let Some(type_name) = param.type_name.as_deref() else {
        return Ok(());
    };
    let Kind::Scalar(kind) = descriptor.kind else {
        return Ok(());
    };
    let Some((doc_kind, doc_multiplicity)) = resolve_doc_type(type_name) else {
        return Ok(());
    };

    let lost_sequence =
        doc_multiplicity == Multiplicity::Sequence && descriptor.multiplicity == Multiplicity::Single;
    if doc_kind != kind || lost_sequence {
        return Err(SchemaError::DocTypeMismatch {
            param: param.name.clone(),
            documented: type_name.to_string(),
            signature: descriptor.to_string(),
        });
    }
    Ok(())
}

/// Side-by-side rendering of both name lists
fn mismatch_table(doc_names: &[&str], scanned: &ScannedSignature) -> String {
    let rows = doc_names.len().max(scanned.len());
    let mut table = format!("{:>20}\t{:>10} {:>20}\n", "documentation", "signature", "signature info");
    for i in 0..rows {
        let doc = doc_names.get(i).copied().unwrap_or(MISSING_DOC);
        let (name, info) = match scanned.get_index(i) {
            Some((name, slot)) => (name.to_string(), slot.to_string()),
            None => (MISSING_SIGNATURE.to_string(), String::new()),
        };
        table.push_str(&format!("{:>20}\t{:>10} {:>20}\n", doc, name, info));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::{scan, Function, Parameter};

    fn scanned(function: &Function, opts: &BuildOptions) -> ScannedSignature {
        scan(function, opts).unwrap()
    }

    fn fun() -> Function {
        Function::new("fun")
            .param(Parameter::of::<i64>("a"))
            .param(Parameter::of::<bool>("b").with_default(true))
    }

    #[test]
    fn test_reconcile_builds_records_in_order() {
        let opts = BuildOptions::default();
        let docs = vec![DocParam::new("a", "input 1"), DocParam::new("b", "input bool")];
        let records = reconcile("fun", &scanned(&fun(), &opts), &docs, &opts).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "a");
        assert_eq!(records[0].description, "input 1");
        assert!(records[0].effectively_required);
        assert_eq!(records[1].default, Some(Value::Bool(true)));
        assert!(!records[1].effectively_required);
    }

    #[test]
    fn test_reconcile_order_mismatch() {
        let opts = BuildOptions::default();
        let docs = vec![DocParam::new("b", "input 1"), DocParam::new("a", "input 2")];
        let err = reconcile("fun", &scanned(&fun(), &opts), &docs, &opts).unwrap_err();
        match err {
            SchemaError::Mismatch { function, table } => {
                assert_eq!(function, "fun");
                assert!(table.contains("documentation"));
                assert_eq!(table.lines().count(), 3);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_reconcile_missing_doc_entry_is_padded() {
        let opts = BuildOptions::default();
        let docs = vec![DocParam::new("a", "input 1")];
        let err = reconcile("fun", &scanned(&fun(), &opts), &docs, &opts).unwrap_err();
        let SchemaError::Mismatch { table, .. } = err else {
            panic!("expected mismatch");
        };
        assert!(table.contains(MISSING_DOC));
    }

    #[test]
    fn test_reconcile_extra_doc_entry_is_padded() {
        let opts = BuildOptions::default();
        let docs = vec![
            DocParam::new("a", "1"),
            DocParam::new("b", "2"),
            DocParam::new("c", "3"),
        ];
        let err = reconcile("fun", &scanned(&fun(), &opts), &docs, &opts).unwrap_err();
        let SchemaError::Mismatch { table, .. } = err else {
            panic!("expected mismatch");
        };
        assert!(table.contains(MISSING_SIGNATURE));
    }

    #[test]
    fn test_reconcile_duplicate_doc_name() {
        let opts = BuildOptions::default();
        let docs = vec![
            DocParam::new("a", "1"),
            DocParam::new("b", "2"),
            DocParam::new("b", "again"),
        ];
        let err = reconcile("fun", &scanned(&fun(), &opts), &docs, &opts).unwrap_err();
        assert_eq!(err, SchemaError::DuplicateArgument("b".to_string()));
    }

    #[test]
    fn test_reconcile_tombstones_hold_position() {
        let opts = BuildOptions::new().ignore(["b"]);
        let docs = vec![DocParam::new("a", "1"), DocParam::new("b", "2")];
        let records = reconcile("fun", &scanned(&fun(), &opts), &docs, &opts).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "a");
    }

    #[test]
    fn test_reconcile_optional_override() {
        let opts = BuildOptions::new().optional(["a"]);
        let docs = vec![DocParam::new("a", "1"), DocParam::new("b", "2")];
        let records = reconcile("fun", &scanned(&fun(), &opts), &docs, &opts).unwrap();
        assert!(!records[0].effectively_required);
    }

    #[test]
    fn test_doc_type_cross_check() {
        let function = Function::new("fun")
            .param(Parameter::of::<i64>("a"))
            .param(Parameter::of::<Option<Vec<i64>>>("b"));
        let opts = BuildOptions::default();
        let scanned = scanned(&function, &opts);

        let good = vec![
            DocParam::new("a", "first").with_type("int"),
            DocParam::new("b", "second").with_type("list of int"),
        ];
        let records = reconcile("fun", &scanned, &good, &opts).unwrap();
        assert_eq!(records[1].descriptor.multiplicity, Multiplicity::Sequence);

        let wrong_scalar = vec![
            DocParam::new("a", "first").with_type("str"),
            DocParam::new("b", "second"),
        ];
        assert!(matches!(
            reconcile("fun", &scanned, &wrong_scalar, &opts),
            Err(SchemaError::DocTypeMismatch { .. })
        ));

        // a plain element type on a sequence parameter is accepted
        let element_only = vec![
            DocParam::new("a", "first"),
            DocParam::new("b", "second").with_type("int"),
        ];
        assert!(reconcile("fun", &scanned, &element_only, &opts).is_ok());

        let wrong_element = vec![
            DocParam::new("a", "first"),
            DocParam::new("b", "second").with_type("list of str"),
        ];
        assert!(matches!(
            reconcile("fun", &scanned, &wrong_element, &opts),
            Err(SchemaError::DocTypeMismatch { .. })
        ));

        let list_on_scalar = vec![
            DocParam::new("a", "first").with_type("list of int"),
            DocParam::new("b", "second"),
        ];
        assert!(matches!(
            reconcile("fun", &scanned, &list_on_scalar, &opts),
            Err(SchemaError::DocTypeMismatch { param, .. }) if param == "a"
        ));

        let unchecked = BuildOptions::new().check_doc_types(false);
        assert!(reconcile("fun", &scanned, &wrong_scalar, &unchecked).is_ok());
    }

    #[test]
    fn test_unknown_prose_type_is_not_checked() {
        let function = Function::new("fun").param(Parameter::of::<i64>("a"));
        let opts = BuildOptions::default();
        let docs = vec![DocParam::new("a", "first").with_type("a number")];
        assert!(reconcile("fun", &scanned(&function, &opts), &docs, &opts).is_ok());
    }
}
