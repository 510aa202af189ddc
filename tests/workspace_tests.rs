use std::fs;
use std::path::{Path, PathBuf};

use arkscript::codec::SheetCodec;
use arkscript::workspace::is_allowed;
use arkscript::{Config, Workspace, WorkspaceError};
use tempfile::TempDir;

fn workspace(dir: &TempDir) -> Workspace {
    let config = Config::with_root(dir.path().join("temp_files"));
    Workspace::with_codec(config, Box::new(SheetCodec::default())).unwrap()
}

fn write_input(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn files_in(ws: &Workspace) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(ws.root())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// ============================================================================
// Setup
// ============================================================================

#[test]
fn test_open_creates_root() {
    let dir = TempDir::new().unwrap();
    let ws = workspace(&dir);
    assert!(ws.root().is_dir());
    assert!(ws.inputs().is_empty());
}

#[test]
fn test_allowed_extensions() {
    assert!(is_allowed("a.txt"));
    assert!(is_allowed("LIBRO.PDF"));
    assert!(!is_allowed("a.docx"));
    assert!(!is_allowed("txt"));
}

// ============================================================================
// Staging
// ============================================================================

#[test]
fn test_stage_copies_and_records() {
    let dir = TempDir::new().unwrap();
    let ws = workspace(&dir);
    let a = write_input(dir.path(), "a.txt", "uno");
    let b = write_input(dir.path(), "b.pdf", "%SHEET 1\npágina");

    let staged = ws.stage(&[a, b]).unwrap();
    assert_eq!(staged, vec!["a.txt", "b.pdf"]);
    assert_eq!(fs::read_to_string(ws.root().join("a.txt")).unwrap(), "uno");

    let inputs: Vec<String> = ws.inputs().into_iter().collect();
    assert_eq!(inputs, vec!["a.txt", "b.pdf"]);
}

#[test]
fn test_stage_accumulates() {
    let dir = TempDir::new().unwrap();
    let ws = workspace(&dir);
    ws.stage(&[write_input(dir.path(), "a.txt", "1")]).unwrap();
    ws.stage(&[write_input(dir.path(), "b.txt", "2")]).unwrap();
    assert_eq!(ws.inputs().len(), 2);
}

#[test]
fn test_stage_rejects_extension_before_copying() {
    let dir = TempDir::new().unwrap();
    let ws = workspace(&dir);
    let good = write_input(dir.path(), "a.txt", "1");
    let bad = write_input(dir.path(), "notas.docx", "2");

    let err = ws.stage(&[good, bad]).unwrap_err();
    assert!(matches!(err, WorkspaceError::DisallowedExtension(ref n) if n == "notas.docx"));
    assert!(files_in(&ws).is_empty());
}

#[test]
fn test_stage_missing_file() {
    let dir = TempDir::new().unwrap();
    let ws = workspace(&dir);
    let err = ws.stage(&[dir.path().join("nada.txt")]).unwrap_err();
    assert!(matches!(err, WorkspaceError::Io { .. }));
}

#[test]
fn test_invalid_manifest_means_no_inputs() {
    let dir = TempDir::new().unwrap();
    let ws = workspace(&dir);
    fs::write(ws.config().manifest_path(), "{not json").unwrap();
    assert!(ws.inputs().is_empty());

    fs::write(ws.config().manifest_path(), r#"["a.txt", 3, "x.exe", "b.PDF"]"#).unwrap();
    let inputs: Vec<String> = ws.inputs().into_iter().collect();
    assert_eq!(inputs, vec!["a.txt", "b.PDF"]);
}

// ============================================================================
// Cleanup
// ============================================================================

#[test]
fn test_clean_outputs_keeps_inputs_and_manifest() {
    let dir = TempDir::new().unwrap();
    let ws = workspace(&dir);
    ws.stage(&[write_input(dir.path(), "a.txt", "1")]).unwrap();
    fs::write(ws.root().join("salida.txt"), "x").unwrap();
    fs::write(ws.root().join("otra.pdf"), "y").unwrap();

    assert_eq!(ws.clean_outputs().unwrap(), 2);
    assert_eq!(files_in(&ws), vec!["a.txt", "input_files.json"]);
}

#[test]
fn test_reset_removes_everything() {
    let dir = TempDir::new().unwrap();
    let ws = workspace(&dir);
    ws.stage(&[write_input(dir.path(), "a.txt", "1")]).unwrap();
    fs::write(ws.root().join("salida.txt"), "x").unwrap();

    assert_eq!(ws.reset().unwrap(), 3);
    assert!(files_in(&ws).is_empty());
    assert!(ws.inputs().is_empty());
}

// ============================================================================
// Execution
// ============================================================================

#[test]
fn test_execute_writes_outputs() {
    let dir = TempDir::new().unwrap();
    let ws = workspace(&dir);
    ws.stage(&[write_input(dir.path(), "a.txt", "hola mundo")]).unwrap();

    let result = ws
        .execute(r#"reemplazar todo "hola" con "adios" de "a.txt" en "b.txt""#)
        .unwrap();
    assert!(!result.failed);
    assert_eq!(fs::read_to_string(ws.root().join("b.txt")).unwrap(), "adios mundo");
}

#[test]
fn test_execute_clears_previous_outputs() {
    let dir = TempDir::new().unwrap();
    let ws = workspace(&dir);
    ws.stage(&[write_input(dir.path(), "a.txt", "x")]).unwrap();

    ws.execute(r#"reemplazar todo "x" con "y" de "a.txt" en "viejo.txt""#).unwrap();
    ws.execute(r#"reemplazar todo "x" con "z" de "a.txt" en "nuevo.txt""#).unwrap();
    assert_eq!(files_in(&ws), vec!["a.txt", "input_files.json", "nuevo.txt"]);
}

#[test]
fn test_run_keeps_previous_outputs() {
    let dir = TempDir::new().unwrap();
    let ws = workspace(&dir);
    ws.stage(&[write_input(dir.path(), "a.txt", "x")]).unwrap();

    ws.execute(r#"reemplazar todo "x" con "y" de "a.txt" en "viejo.txt""#).unwrap();
    ws.run(r#"reemplazar todo "x" con "z" de "a.txt" en "nuevo.txt""#);
    assert_eq!(
        files_in(&ws),
        vec!["a.txt", "input_files.json", "nuevo.txt", "viejo.txt"]
    );
}

#[test]
fn test_scripts_cannot_escape_root() {
    let dir = TempDir::new().unwrap();
    let ws = workspace(&dir);
    ws.stage(&[write_input(dir.path(), "a.txt", "x")]).unwrap();

    let result = ws
        .execute(r#"reemplazar todo "x" con "y" de "a.txt" en "../fuera.txt""#)
        .unwrap();
    assert!(result.sections[0].has_errors());
    assert!(!dir.path().join("fuera.txt").exists());
}
