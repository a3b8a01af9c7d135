//! Caller-supplied filters shared by the parser pipeline and the generator

use std::collections::HashSet;

/// Which parameters become flags, and which are forced optional
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Names recorded as tombstones
    pub ignore: HashSet<String>,
    /// When set, only these names become flags
    pub include: Option<HashSet<String>>,
    /// Names never marked required
    pub optional: HashSet<String>,
    /// Cross-check prose types in the documentation against the signature
    pub check_doc_types: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            ignore: HashSet::new(),
            include: None,
            optional: HashSet::new(),
            check_doc_types: true,
        }
    }
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ignore<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn include<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include
            .get_or_insert_with(HashSet::new)
            .extend(names.into_iter().map(Into::into));
        self
    }

    pub fn optional<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.optional.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn check_doc_types(mut self, check: bool) -> Self {
        self.check_doc_types = check;
        self
    }

    /// Whether `name` is excluded by the ignore set or the include list
    pub fn excludes(&self, name: &str) -> bool {
        self.ignore.contains(name)
            || self
                .include
                .as_ref()
                .is_some_and(|include| !include.contains(name))
    }

    pub fn is_forced_optional(&self, name: &str) -> bool {
        self.optional.contains(name)
    }
}
