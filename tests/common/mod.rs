//! Common test utilities

use argdoc::{Function, Parameter};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Create a temporary directory with an argdoc.yml file
#[allow(dead_code)]
pub fn create_test_manifest(content: &str) -> (TempDir, std::path::PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let manifest_path = temp_dir.path().join("argdoc.yml");
    fs::write(&manifest_path, content).unwrap();
    (temp_dir, manifest_path)
}

/// Create a test manifest with an empty subdirectory next to it
#[allow(dead_code)]
pub fn create_test_manifest_in_subdir(content: &str) -> (TempDir, std::path::PathBuf, std::path::PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let manifest_path = temp_dir.path().join("argdoc.yml");
    let sub_dir = temp_dir.path().join("subdir");

    fs::write(&manifest_path, content).unwrap();
    fs::create_dir(&sub_dir).unwrap();

    (temp_dir, manifest_path, sub_dir)
}

/// Build a function from `(name, annotation)` pairs
#[allow(dead_code)]
pub fn function(name: &str, doc: &str, params: &[(&str, &str)]) -> Function {
    params.iter().fold(Function::new(name).doc(doc), |function, (param, annotation)| {
        function.param(Parameter::parse(*param, annotation).unwrap())
    })
}

/// Write a file and return its path as a string
#[allow(dead_code)]
pub fn write_file(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}
