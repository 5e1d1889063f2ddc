//! Directory-style imports: ordering, recursion, and filtering as seen
//! through full merges.

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use xmlfuse::{process, MergeOutcome};

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn merged_output(dir: &Path) -> String {
    fs::read_to_string(dir.join("merged.xml")).unwrap()
}

#[test]
fn test_directory_import_is_lexicographic() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::create_dir(dir.join("items")).unwrap();
    write(
        dir,
        "source.xml",
        r#"<root><import file="items" skipRoot="true" recursiveImport="false"/></root>"#,
    );
    // b.xml lands on disk before a.xml; output order must not care.
    write(&dir.join("items"), "b.xml", r#"<w><item name="from-b"/></w>"#);
    write(&dir.join("items"), "a.xml", r#"<w><item name="from-a"/></w>"#);

    let outcome = process(dir.join("source.xml"), dir.join("merged.xml")).unwrap();
    assert_eq!(outcome, MergeOutcome::Merged { imported_files: 2 });

    let output = merged_output(dir);
    let pos_a = output.find("from-a").unwrap();
    let pos_b = output.find("from-b").unwrap();
    assert!(pos_a < pos_b);
}

#[test]
fn test_non_recursive_import_ignores_subdirectories() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::create_dir_all(dir.join("items").join("deep")).unwrap();
    write(
        dir,
        "source.xml",
        r#"<root><import file="items" skipRoot="true" recursiveImport="false"/></root>"#,
    );
    write(&dir.join("items"), "a.xml", r#"<w><item name="top"/></w>"#);
    write(
        &dir.join("items").join("deep"),
        "b.xml",
        r#"<w><item name="nested"/></w>"#,
    );

    let outcome = process(dir.join("source.xml"), dir.join("merged.xml")).unwrap();
    assert_eq!(outcome, MergeOutcome::Merged { imported_files: 1 });

    let output = merged_output(dir);
    assert!(output.contains("top"));
    assert!(!output.contains("nested"));
}

#[test]
fn test_recursive_import_descends_by_default() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::create_dir_all(dir.join("items").join("deep")).unwrap();
    write(
        dir,
        "source.xml",
        r#"<root><import file="items" skipRoot="true"/></root>"#,
    );
    write(&dir.join("items"), "a.xml", r#"<w><item name="top"/></w>"#);
    write(
        &dir.join("items").join("deep"),
        "b.xml",
        r#"<w><item name="nested"/></w>"#,
    );

    let outcome = process(dir.join("source.xml"), dir.join("merged.xml")).unwrap();
    assert_eq!(outcome, MergeOutcome::Merged { imported_files: 2 });

    let output = merged_output(dir);
    assert!(output.contains("top"));
    assert!(output.contains("nested"));
}

#[test]
fn test_hidden_and_reserved_files_are_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::create_dir(dir.join("items")).unwrap();
    write(
        dir,
        "source.xml",
        r#"<root><import file="items" skipRoot="true"/></root>"#,
    );
    write(&dir.join("items"), "a.xml", r#"<w><item name="kept"/></w>"#);
    write(
        &dir.join("items"),
        "newdraft.xml",
        r#"<w><item name="reserved"/></w>"#,
    );
    write(
        &dir.join("items"),
        ".hidden.xml",
        r#"<w><item name="hidden"/></w>"#,
    );
    write(&dir.join("items"), "readme.txt", "not xml");

    let outcome = process(dir.join("source.xml"), dir.join("merged.xml")).unwrap();
    assert_eq!(outcome, MergeOutcome::Merged { imported_files: 1 });

    let output = merged_output(dir);
    assert!(output.contains("kept"));
    assert!(!output.contains("reserved"));
    assert!(!output.contains("hidden"));
}

#[test]
fn test_directory_import_change_in_one_file_redetected() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::create_dir(dir.join("items")).unwrap();
    write(
        dir,
        "source.xml",
        r#"<root><import file="items" skipRoot="true"/></root>"#,
    );
    write(&dir.join("items"), "a.xml", r#"<w><item name="a1"/></w>"#);
    write(&dir.join("items"), "b.xml", r#"<w><item name="b1"/></w>"#);

    process(dir.join("source.xml"), dir.join("merged.xml")).unwrap();

    write(&dir.join("items"), "b.xml", r#"<w><item name="b2"/></w>"#);

    let outcome = process(dir.join("source.xml"), dir.join("merged.xml")).unwrap();
    assert_eq!(outcome, MergeOutcome::Merged { imported_files: 2 });
    assert!(merged_output(dir).contains("b2"));
}

#[test]
fn test_file_added_to_directory_redetected() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::create_dir(dir.join("items")).unwrap();
    write(
        dir,
        "source.xml",
        r#"<root><import file="items" skipRoot="true"/></root>"#,
    );
    write(&dir.join("items"), "a.xml", r#"<w><item name="a"/></w>"#);

    process(dir.join("source.xml"), dir.join("merged.xml")).unwrap();

    // A new candidate appears; it has no sidecar entry, so the scan reports drift.
    write(&dir.join("items"), "b.xml", r#"<w><item name="b"/></w>"#);

    let outcome = process(dir.join("source.xml"), dir.join("merged.xml")).unwrap();
    assert_eq!(outcome, MergeOutcome::Merged { imported_files: 2 });
    assert!(merged_output(dir).contains(r#"name="b""#));
}
