#![allow(dead_code)]

use log::debug;
use scaffold::config::GeneratorConfig;
use serde_json::Value;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Prints a diff of files and their contents between two directories.
/// Shows files only present in one directory and content differences for files present in both.
///
/// # Arguments
/// * `dir1` - The first directory to compare (actual output).
/// * `dir2` - The second directory to compare (expected output).
pub fn print_dir_diff(dir1: &Path, dir2: &Path) {
    let mut files1 = std::collections::HashSet::new();
    let mut files2 = std::collections::HashSet::new();

    for entry in WalkDir::new(dir1).into_iter().filter_map(Result::ok).filter(|e| e.path().is_file())
    {
        files1.insert(entry.path().strip_prefix(dir1).unwrap().to_path_buf());
    }
    for entry in WalkDir::new(dir2).into_iter().filter_map(Result::ok).filter(|e| e.path().is_file())
    {
        files2.insert(entry.path().strip_prefix(dir2).unwrap().to_path_buf());
    }

    println!("\n=== Directory Comparison ===");
    println!("Actual output:   {:?}", dir1);
    println!("Expected output: {:?}", dir2);

    for file in files1.difference(&files2) {
        println!("  + {:?} (only in actual)", file);
    }
    for file in files2.difference(&files1) {
        println!("  - {:?} (only in expected)", file);
    }

    for file in files1.intersection(&files2) {
        let actual = fs::read(dir1.join(file)).unwrap();
        let expected = fs::read(dir2.join(file)).unwrap();
        if actual != expected {
            println!("\n  File: {:?}", file);
            println!("  --- Actual content:\n{}", String::from_utf8_lossy(&actual));
            println!("  --- Expected content:\n{}", String::from_utf8_lossy(&expected));
        }
    }
    println!("=== End of Comparison ===\n");
}

/// Asserts that two directory trees hold the same files with the same content.
pub fn assert_dirs_equal(actual: &Path, expected: &Path) {
    match dir_diff::is_different(actual, expected) {
        Ok(true) => {
            print_dir_diff(actual, expected);
            panic!("Directories differ. See above for details.");
        }
        Ok(false) => {}
        Err(e) => {
            debug!("Error comparing directories: {e:?}");
            panic!("Failed to compare directories");
        }
    }
}

/// Loads the configuration of a fixture project and redirects its output.
pub fn fixture_config(project: &str, output_dir: &Path) -> GeneratorConfig {
    let mut config = GeneratorConfig::load_config(project).unwrap();
    config.output_dir = output_dir.to_path_buf();
    config
}

/// Runs a fixture project against `context` and compares the output to `expected_dir`.
pub fn run_and_assert(project: &str, expected_dir: &str, context: Value) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let config = fixture_config(project, tmp_dir.path());
    let mut pipeline = config.pipeline_builder(project).unwrap().build().unwrap();
    pipeline.process(context).unwrap();
    assert_dirs_equal(tmp_dir.path(), Path::new(expected_dir));
}
