use arkscript::codec::{SheetCodec, Unavailable};
use arkscript::output::{Level, RunResult};
use arkscript::{Interpreter, MemoryStorage};

fn interpreter(storage: &MemoryStorage) -> Interpreter<MemoryStorage, SheetCodec> {
    Interpreter::new(storage.clone(), SheetCodec::default())
}

fn run(storage: &MemoryStorage, source: &str) -> RunResult {
    interpreter(storage).run(source)
}

fn sheet(pages: &[&str]) -> Vec<u8> {
    SheetCodec::document(pages)
}

fn pages_of(storage: &MemoryStorage, name: &str) -> Vec<String> {
    SheetCodec::pages(&storage.get(name).unwrap()).unwrap()
}

fn errors(result: &RunResult, statement: usize) -> Vec<String> {
    result.sections[statement]
        .lines
        .iter()
        .filter(|l| l.level == Level::Error)
        .map(|l| l.message.clone())
        .collect()
}

fn generated(result: &RunResult) -> Vec<&str> {
    result.generated_files.iter().map(String::as_str).collect()
}

// ============================================================================
// Run structure
// ============================================================================

#[test]
fn test_one_section_per_statement() {
    let storage = MemoryStorage::new().with("a.txt", "uno");
    let result = run(
        &storage,
        r#"var a = "a.txt"
           buscar repeticiones de "x" de "missing.txt"
           buscar repeticiones de "uno" de a
           invertir de a en "b.pdf""#,
    );

    assert!(!result.failed);
    assert_eq!(result.sections.len(), 4);
    let flags: Vec<bool> = result.sections.iter().map(|s| s.has_errors()).collect();
    assert_eq!(flags, vec![false, true, false, true]);
    assert_eq!(result.statement_errors(), 2);
}

#[test]
fn test_sections_carry_command_tags() {
    let storage = MemoryStorage::new().with("a.txt", "x");
    let result = run(
        &storage,
        r#"var a = "a.txt", sobreescribir todo "x" con "y" de a en "b.txt""#,
    );
    let tags: Vec<&str> = result.sections.iter().map(|s| s.command.as_str()).collect();
    assert_eq!(tags, vec!["VAR", "SOBREESCRIBIR"]);
    assert!(result.log().iter().any(|l| l.starts_with("[SOBREESCRIBIR] ")));
}

#[test]
fn test_lex_error_fails_whole_run() {
    let storage = MemoryStorage::new().with("a.txt", "hola");
    let result = run(
        &storage,
        r#"reemplazar todo "hola" con "adios" de "a.txt" en "b.txt" $"#,
    );

    assert!(result.failed);
    assert!(result.sections.is_empty());
    assert!(result.generated_files.is_empty());
    assert!(storage.get("b.txt").is_none());
    assert!(result.log()[0].starts_with("compile error: "));
}

#[test]
fn test_parse_error_fails_whole_run() {
    let storage = MemoryStorage::new().with("a.txt", "hola");
    let result = run(
        &storage,
        r#"reemplazar todo "hola" con "adios" de "a.txt" en "b.txt"
           invertir "a.pdf""#,
    );

    assert!(result.failed);
    assert!(result.error.as_deref().unwrap().contains("syntax error"));
    assert_eq!(storage.names(), vec!["a.txt"]);
}

#[test]
fn test_contar_rejected() {
    let storage = MemoryStorage::new();
    let result = run(&storage, r#"contar "a" de "b.txt""#);
    assert!(result.failed);
    assert!(result.error.unwrap().contains("not implemented"));
}

#[test]
fn test_empty_script() {
    let result = run(&MemoryStorage::new(), "// nada que hacer");
    assert!(!result.failed);
    assert!(result.sections.is_empty());
}

// ============================================================================
// Variables
// ============================================================================

#[test]
fn test_undefined_variable_is_statement_local() {
    let storage = MemoryStorage::new().with("a.txt", "uno dos");
    let result = run(
        &storage,
        r#"invertir de fantasma en "x.pdf"
           reemplazar todo "uno" con "1" de "a.txt" en "b.txt""#,
    );

    assert_eq!(errors(&result, 0), vec!["variable 'fantasma' is not defined"]);
    assert!(!result.sections[1].has_errors());
    assert_eq!(storage.text("b.txt").as_deref(), Some("1 dos"));
}

#[test]
fn test_variable_from_bound_name_stores_the_name() {
    let storage = MemoryStorage::new().with("a.txt", "abc").with("a", "bbb");
    let result = run(
        &storage,
        r#"var a = "a.txt"
           var b = a
           reemplazar todo "b" con "B" de b en "out.txt""#,
    );
    assert_eq!(result.sections[1].lines[0].message, "variable 'b' = 'a'");
    assert_eq!(storage.text("out.txt").as_deref(), Some("BBB"));
}

#[test]
fn test_variable_from_unbound_name_keeps_text() {
    let storage = MemoryStorage::new().with("a.txt", "abc");
    let result = run(
        &storage,
        r#"var t = b
           reemplazar todo t con "X" de "a.txt" en "out.txt""#,
    );
    assert!(result.sections[0].lines[0].message.contains("'b'"));
    assert_eq!(storage.text("out.txt").as_deref(), Some("aXc"));
}

#[test]
fn test_variables_do_not_survive_runs() {
    let storage = MemoryStorage::new().with("a.txt", "abc");
    let interpreter = interpreter(&storage);

    interpreter.run(r#"var a = "a.txt""#);
    let result = interpreter.run(r#"reemplazar todo "a" con "z" de a en "b.txt""#);
    assert_eq!(errors(&result, 0), vec!["variable 'a' is not defined"]);
}

// ============================================================================
// Search
// ============================================================================

#[test]
fn test_search_reports_count() {
    let storage = MemoryStorage::new().with("c.txt", "Lobo lobo LOBO");
    let result = run(
        &storage,
        r#"buscar repeticiones de "lobo" de "c.txt"
           buscar repeticiones de "lobo" de "c.txt" con sensibilidad"#,
    );

    assert!(result.sections[0].lines[0].message.starts_with("found 3 occurrence(s)"));
    assert!(result.sections[1].lines[0].message.starts_with("found 1 occurrence(s)"));
    assert!(result.generated_files.is_empty());
}

#[test]
fn test_search_reads_paginated_text() {
    let storage = MemoryStorage::new().with("l.pdf", sheet(&["un lobo", "", "otro lobo"]));
    let result = run(&storage, r#"buscar repeticiones de "lobo" de "l.pdf""#);
    assert!(result.sections[0].lines[0].message.starts_with("found 2 occurrence(s)"));
}

#[test]
fn test_missing_document() {
    let storage = MemoryStorage::new();
    let result = run(&storage, r#"buscar repeticiones de "x" de "nada.txt""#);
    assert_eq!(errors(&result, 0), vec!["document not found: 'nada.txt'"]);
}

// ============================================================================
// Fusion
// ============================================================================

#[test]
fn test_fusion_exact_output() {
    let storage = MemoryStorage::new()
        .with("a.txt", "  primero\n\n")
        .with("b.txt", "\tsegundo  ");
    let result = run(
        &storage,
        r#"fusionar "a.txt" con "b.txt" separado_por "***" en "ab.txt""#,
    );

    assert_eq!(storage.text("ab.txt").as_deref(), Some("primero\n\n***\n\nsegundo"));
    assert_eq!(generated(&result), vec!["ab.txt"]);
}

#[test]
fn test_fusion_into_paginated_target() {
    let storage = MemoryStorage::new().with("a.txt", "uno").with("b.txt", "dos");
    run(&storage, r#"fusionar "a.txt" con "b.txt" separado_por "-" en "ab.pdf""#);
    assert_eq!(pages_of(&storage, "ab.pdf"), vec!["uno\n\n-\n\ndos"]);
}

// ============================================================================
// Replace and overwrite
// ============================================================================

#[test]
fn test_replace_frequency_and_limit() {
    let storage = MemoryStorage::new().with("in.txt", "a a a a a a a");
    run(
        &storage,
        r#"reemplazar 2 "a" con "B" cada 3 de "in.txt" en "out.txt""#,
    );
    assert_eq!(storage.text("out.txt").as_deref(), Some("B a a B a a a"));
}

#[test]
fn test_replace_without_matches_still_writes() {
    let storage = MemoryStorage::new().with("in.txt", "nada");
    let result = run(&storage, r#"reemplazar todo "x" con "y" de "in.txt" en "out.txt""#);
    assert_eq!(storage.text("out.txt").as_deref(), Some("nada"));
    assert_eq!(generated(&result), vec!["out.txt"]);
}

#[test]
fn test_overwrite_consumes_following_characters() {
    let storage = MemoryStorage::new().with("in.txt", "ab-cd ab-cd");
    run(&storage, r#"sobreescribir todo "ab" con "XYZ" de "in.txt" en "out.txt""#);
    assert_eq!(storage.text("out.txt").as_deref(), Some("XYZcd XYZcd"));
}

#[test]
fn test_overwrite_limit_drops_remaining_text() {
    let storage = MemoryStorage::new().with("in.txt", "a1 a2 a3");
    let result = run(&storage, r#"sobreescribir 1 "a" con "b" de "in.txt" en "out.txt""#);
    assert!(!result.sections[0].has_errors());
    assert_eq!(storage.text("out.txt").as_deref(), Some("b"));
}

#[test]
fn test_overwrite_with_empty_term_finishes() {
    let storage = MemoryStorage::new().with("in.txt", "banana");
    let result = run(
        &storage,
        r#"sobreescribir todo "a" con "" de "in.txt" en "out.txt"
           buscar repeticiones de "n" de "out.txt""#,
    );
    assert_eq!(result.sections.len(), 2);
    assert_eq!(storage.text("out.txt").as_deref(), Some("bnn"));
    assert!(result.sections[1].lines[0].message.starts_with("found 2 occurrence(s)"));
}

#[test]
fn test_zero_frequency_rejected() {
    let storage = MemoryStorage::new().with("in.txt", "aaa");
    let result = run(&storage, r#"reemplazar todo "a" con "b" cada 0 de "in.txt" en "out.txt""#);
    assert!(result.sections[0].has_errors());
    assert!(storage.get("out.txt").is_none());
}

#[test]
fn test_empty_original_rejected() {
    let storage = MemoryStorage::new().with("in.txt", "aaa");
    let result = run(&storage, r#"reemplazar todo "" con "b" de "in.txt" en "out.txt""#);
    assert!(result.sections[0].has_errors());
    assert!(result.generated_files.is_empty());
}

// ============================================================================
// Enumerate
// ============================================================================

#[test]
fn test_enumerate_cycles_sequence() {
    let storage = MemoryStorage::new().with("l.txt", "#. #. #. #. #.");
    run(&storage, r##"enumerar "#" desde 1 hasta 3 de "l.txt" en "n.txt""##);
    assert_eq!(storage.text("n.txt").as_deref(), Some("1. 2. 3. 1. 2."));
}

#[test]
fn test_enumerate_descending() {
    let storage = MemoryStorage::new().with("l.txt", "x x x");
    let result = run(&storage, r#"enumerar "x" desde 3 hasta 1 de "l.txt" en "n.txt""#);
    assert_eq!(storage.text("n.txt").as_deref(), Some("3 2 1"));
    assert!(result.sections[0].lines[0].message.starts_with("descending"));
}

#[test]
fn test_enumerate_absent_term_copies() {
    let storage = MemoryStorage::new().with("l.txt", "sin marcas");
    run(&storage, r##"enumerar "#" desde 1 hasta 3 de "l.txt" en "n.txt""##);
    assert_eq!(storage.text("n.txt").as_deref(), Some("sin marcas"));
}

// ============================================================================
// Extract
// ============================================================================

#[test]
fn test_extract_reversed_range_rejected() {
    let storage = MemoryStorage::new().with("l.pdf", sheet(&["1", "2", "3"]));
    let result = run(&storage, r#"extraer de "l.pdf" desde 2 hasta 1 en "p.pdf""#);

    assert_eq!(errors(&result, 0), vec!["invalid page range 2 to 1"]);
    assert!(storage.get("p.pdf").is_none());
}

#[test]
fn test_extract_past_last_page() {
    let storage = MemoryStorage::new().with("l.pdf", sheet(&["1", "2", "3"]));
    let result = run(&storage, r#"extraer de "l.pdf" desde 2 hasta 4 en "p.pdf""#);
    assert_eq!(
        errors(&result, 0),
        vec!["invalid page range 2 to 4 (document has 3 page(s))"]
    );
}

#[test]
fn test_extract_page_zero() {
    let storage = MemoryStorage::new().with("l.pdf", sheet(&["1"]));
    let result = run(&storage, r#"extraer de "l.pdf" desde 0 hasta 1 en "p.pdf""#);
    assert!(result.sections[0].has_errors());
}

#[test]
fn test_extract_pages_to_paginated_target() {
    let storage = MemoryStorage::new().with("l.pdf", sheet(&["uno", "dos", "tres", "cuatro"]));
    let result = run(&storage, r#"extraer de "l.pdf" desde 2 hasta 3 en "p.pdf""#);

    assert!(!result.sections[0].has_errors());
    assert_eq!(pages_of(&storage, "p.pdf"), vec!["dos", "tres"]);
    assert_eq!(generated(&result), vec!["p.pdf"]);
}

#[test]
fn test_extract_text_listing() {
    let storage = MemoryStorage::new().with("l.pdf", sheet(&["uno", "dos", "", "cuatro"]));
    run(&storage, r#"extraer de "l.pdf" desde 2 hasta 4 en "p.txt""#);
    assert_eq!(
        storage.text("p.txt").as_deref(),
        Some("--- Página 2 ---\ndos\n\n--- Página 4 ---\ncuatro\n")
    );
}

#[test]
fn test_extract_requires_paginated_source() {
    let storage = MemoryStorage::new().with("l.txt", "texto");
    let result = run(&storage, r#"extraer de "l.txt" desde 1 hasta 1 en "p.txt""#);
    assert!(result.sections[0].has_errors());
}

// ============================================================================
// Invert
// ============================================================================

#[test]
fn test_invert_reverses_pages() {
    let storage = MemoryStorage::new().with("l.pdf", sheet(&["a", "b", "c"]));
    run(&storage, r#"invertir de "l.pdf" en "r.pdf""#);
    assert_eq!(pages_of(&storage, "r.pdf"), vec!["c", "b", "a"]);
}

#[test]
fn test_invert_twice_restores_order() {
    let storage = MemoryStorage::new().with("l.pdf", sheet(&["a", "b", "c", "d"]));
    run(
        &storage,
        r#"invertir de "l.pdf" en "r.pdf", invertir de "r.pdf" en "rr.pdf""#,
    );
    assert_eq!(pages_of(&storage, "rr.pdf"), pages_of(&storage, "l.pdf"));
}

#[test]
fn test_invert_empty_document_warns() {
    let storage = MemoryStorage::new().with("vacio.pdf", sheet(&[]));
    let result = run(&storage, r#"invertir de "vacio.pdf" en "r.pdf""#);

    let section = &result.sections[0];
    assert!(!section.has_errors());
    assert_eq!(section.lines[0].level, Level::Warning);
    assert!(storage.get("r.pdf").is_none());
    assert!(result.generated_files.is_empty());
}

#[test]
fn test_invert_requires_paginated_target() {
    let storage = MemoryStorage::new().with("l.pdf", sheet(&["a"]));
    let result = run(&storage, r#"invertir de "l.pdf" en "r.txt""#);
    assert!(result.sections[0].has_errors());
    assert!(storage.get("r.txt").is_none());
}

#[test]
fn test_malformed_paginated_source() {
    let storage = MemoryStorage::new().with("roto.pdf", "not a sheet");
    let result = run(&storage, r#"invertir de "roto.pdf" en "r.pdf""#);
    assert!(errors(&result, 0)[0].starts_with("cannot process 'roto.pdf'"));
}

// ============================================================================
// Fragment
// ============================================================================

#[test]
fn test_fragment_numbering_and_markers() {
    let storage = MemoryStorage::new().with("todo.txt", "a|b||c");
    let result = run(&storage, r#"fragmentar de "todo.txt" por "|" en "parte.txt""#);

    assert_eq!(generated(&result), vec!["parte1.txt", "parte2.txt", "parte3.txt"]);
    assert_eq!(storage.text("parte1.txt").as_deref(), Some("a\n|\n"));
    assert_eq!(storage.text("parte2.txt").as_deref(), Some("b\n|\n"));
    assert_eq!(storage.text("parte3.txt").as_deref(), Some("c"));
}

#[test]
fn test_fragment_without_extension() {
    let storage = MemoryStorage::new().with("todo.txt", "uno---dos");
    run(&storage, r#"fragmentar de "todo.txt" por "---" en "parte""#);
    assert_eq!(storage.text("parte1").as_deref(), Some("uno\n---\n"));
    assert_eq!(storage.text("parte2").as_deref(), Some("dos"));
}

#[test]
fn test_fragment_only_delimiters_warns() {
    let storage = MemoryStorage::new().with("todo.txt", " | \n| ");
    let result = run(&storage, r#"fragmentar de "todo.txt" por "|" en "p.txt""#);
    assert_eq!(result.sections[0].lines[0].level, Level::Warning);
    assert!(result.generated_files.is_empty());
}

#[test]
fn test_fragment_rejects_paginated_source() {
    let storage = MemoryStorage::new().with("l.pdf", sheet(&["a|b"]));
    let result = run(&storage, r#"fragmentar de "l.pdf" por "|" en "p.txt""#);
    assert!(result.sections[0].has_errors());
    assert!(result.generated_files.is_empty());
}

#[test]
fn test_fragment_rejects_empty_delimiter() {
    let storage = MemoryStorage::new().with("todo.txt", "abc");
    let result = run(&storage, r#"fragmentar de "todo.txt" por "" en "p.txt""#);
    assert_eq!(errors(&result, 0), vec!["the delimiter cannot be empty"]);
}

// ============================================================================
// Capabilities
// ============================================================================

#[test]
fn test_paginated_support_unavailable() {
    let storage = MemoryStorage::new()
        .with("l.pdf", sheet(&["a"]))
        .with("a.txt", "uno");
    let interpreter = Interpreter::new(storage.clone(), Unavailable);
    let result = interpreter.run(
        r#"invertir de "l.pdf" en "r.pdf"
           reemplazar todo "uno" con "1" de "a.txt" en "b.pdf"
           reemplazar todo "uno" con "1" de "a.txt" en "b.txt""#,
    );

    assert!(errors(&result, 0)[0].contains("paginated document support is not available"));
    assert!(result.sections[1].has_errors());
    assert!(!result.sections[2].has_errors());
    assert_eq!(generated(&result), vec!["b.txt"]);
}

#[test]
fn test_generated_files_are_deduplicated() {
    let storage = MemoryStorage::new().with("a.txt", "x");
    let result = run(
        &storage,
        r#"reemplazar todo "x" con "y" de "a.txt" en "b.txt"
           reemplazar todo "y" con "z" de "b.txt" en "b.txt""#,
    );
    assert_eq!(generated(&result), vec!["b.txt"]);
    assert_eq!(storage.text("b.txt").as_deref(), Some("z"));
}

#[cfg(feature = "pdf")]
mod pdf {
    use super::*;
    use arkscript::codec::{PageCodec, PdfCodec};

    fn book(lines: usize) -> Vec<u8> {
        let text: Vec<String> = (0..lines).map(|i| format!("linea {}", i)).collect();
        PdfCodec::default().render_text(&text.join("\n")).unwrap()
    }

    #[test]
    fn test_invert_then_extract_text() {
        // 61 lines per page: pages hold 0-60, 61-121 and 122-129
        let storage = MemoryStorage::new().with("libro.pdf", book(130));
        let interpreter = Interpreter::new(storage.clone(), PdfCodec::default());
        let result = interpreter.run(
            r#"invertir de "libro.pdf" en "r.pdf"
               extraer de "r.pdf" desde 1 hasta 1 en "p.txt""#,
        );

        assert!(!result.failed);
        assert_eq!(result.statement_errors(), 0);
        assert_eq!(generated(&result), vec!["p.txt", "r.pdf"]);

        let text = storage.text("p.txt").unwrap();
        assert!(text.starts_with("--- Página 1 ---\nlinea 122\nlinea 123\n"));
        assert!(text.contains("linea 129"));
        assert!(!text.contains("linea 0\n"));
    }

    #[test]
    fn test_fusion_into_pdf_is_searchable() {
        let storage = MemoryStorage::new().with("a.txt", "lobo").with("b.txt", "otro lobo");
        let interpreter = Interpreter::new(storage.clone(), PdfCodec::default());
        let result = interpreter.run(
            r#"fusionar "a.txt" con "b.txt" separado_por "---" en "ab.pdf"
               buscar repeticiones de "lobo" de "ab.pdf""#,
        );

        assert_eq!(result.statement_errors(), 0);
        assert!(result.sections[1].lines[0].message.starts_with("found 2 occurrence(s)"));
    }
}
