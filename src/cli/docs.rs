//! Documentation content for ark CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Variables,
    Search,
    Fusion,
    Replace,
    Enumerate,
    Pages,
    Fragment,
    Workspace,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "syntax" => Some(Self::Syntax),
            "variables" | "var" | "vars" => Some(Self::Variables),
            "search" | "buscar" => Some(Self::Search),
            "fusion" | "fusionar" | "merge" => Some(Self::Fusion),
            "replace" | "reemplazar" | "overwrite" | "sobreescribir" => Some(Self::Replace),
            "enumerate" | "enumerar" => Some(Self::Enumerate),
            "pages" | "pdf" | "extraer" | "invertir" => Some(Self::Pages),
            "fragment" | "fragmentar" | "split" => Some(Self::Fragment),
            "workspace" | "files" => Some(Self::Workspace),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"ARKSCRIPT DOCUMENTATION

ArkScript is a small command language for batch editing of text and PDF
documents. A script is a list of commands; each command reads documents from
the working directory and writes new ones next to them.

DOCUMENTATION CATEGORIES

  syntax            Keywords, strings, numbers, comments, and separators
  variables         Declaring and referencing variables with var
  search            Counting occurrences with buscar
  fusion            Joining two documents with fusionar
  replace           reemplazar and sobreescribir, limits and frequency
  enumerate         Numbering occurrences with enumerar
  pages             Page extraction and reversal for PDF documents
  fragment          Splitting a document on a delimiter
  workspace         Staging inputs, outputs, and cleanup

QUICK REFERENCE

  var NAME = "value"
  buscar repeticiones de T de DOC [con|sin sensibilidad]
  fusionar A con B separado_por SEP en OUT
  reemplazar (todo|N) OLD con NEW [cada N] de SRC en DST
  sobreescribir (todo|N) OLD con NEW [cada N] de SRC en DST
  enumerar T desde N hasta M de SRC en DST
  extraer de SRC desde N hasta M en DST
  invertir de SRC en DST
  fragmentar de SRC por DELIM en BASE

Run 'ark doc <category>' for detailed documentation.
Run 'ark onboard' for an interactive tutorial.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_name(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::Variables) => Ok(VARIABLES_DOC),
        Some(DocCategory::Search) => Ok(SEARCH_DOC),
        Some(DocCategory::Fusion) => Ok(FUSION_DOC),
        Some(DocCategory::Replace) => Ok(REPLACE_DOC),
        Some(DocCategory::Enumerate) => Ok(ENUMERATE_DOC),
        Some(DocCategory::Pages) => Ok(PAGES_DOC),
        Some(DocCategory::Fragment) => Ok(FRAGMENT_DOC),
        Some(DocCategory::Workspace) => Ok(WORKSPACE_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r#"SYNTAX - Keywords, Literals, and Separators

KEYWORDS
--------
Keywords are Spanish words and are case-insensitive: BUSCAR, Buscar and
buscar are the same command. Any other word is a variable name.

  var con sin de por en desde hasta
  buscar fusionar reemplazar sobreescribir enumerar extraer invertir
  fragmentar repeticiones sensibilidad separado_por cada todo

'contar' is reserved; scripts that use it are rejected.

STRINGS
-------
Text between double quotes. There are no escape sequences; a string ends at
the next double quote.

  "informe final.txt"

NUMBERS
-------
Whole, non-negative numbers.

  extraer de "libro.pdf" desde 2 hasta 10 en "parte.pdf"

COMMENTS
--------
// starts a comment that runs to the end of the line.

SEPARATORS
----------
Commands may be separated by commas or simply written one after another.

  var a = "x.txt", invertir de a en "y.pdf"

ERRORS
------
A script with a syntax error does not run at all. A command that fails while
running logs its error and the remaining commands still run.
"#;

const VARIABLES_DOC: &str = r#"VARIABLES - var

  var NAME = "value"
  var NAME = OTHER

Any place that takes a string also takes a variable name.

  var fuente = "capitulo.txt"
  buscar repeticiones de "lobo" de fuente

'var b = a' stores the text "a" in b. It does not copy the value of a.

Using a variable that was never declared fails that command only.
"#;

const SEARCH_DOC: &str = r#"SEARCH - buscar

  buscar repeticiones de TERM de DOCUMENT [con sensibilidad | sin sensibilidad]

Counts non-overlapping occurrences of TERM in DOCUMENT and logs the count.
Nothing is written. The default is 'sin sensibilidad' (case-insensitive).

  buscar repeticiones de "lobo" de "cuento.txt" con sensibilidad

PDF documents are searched through the text of their pages.
"#;

const FUSION_DOC: &str = r#"FUSION - fusionar

  fusionar FIRST con SECOND separado_por SEPARATOR en OUTPUT

Trims both documents and writes

  FIRST
  <blank line>
  SEPARATOR
  <blank line>
  SECOND

to OUTPUT. An OUTPUT ending in .pdf is rendered as a new PDF.
"#;

const REPLACE_DOC: &str = r#"REPLACE - reemplazar and sobreescribir

  reemplazar (todo|N) ORIGINAL con NEW [cada F] de SOURCE en TARGET
  sobreescribir (todo|N) ORIGINAL con NEW [cada F] de SOURCE en TARGET

LIMIT
-----
'todo' rewrites every selected occurrence; a number stops after that many.

FREQUENCY
---------
'cada F' selects occurrence 1, 1+F, 1+2F, ... The default is every occurrence.

  reemplazar todo "a" con "B" cada 2 de "in.txt" en "out.txt"
  // "a a a a a" becomes "B a B a B"

REEMPLAZAR
----------
Swaps each selected occurrence for NEW.

SOBREESCRIBIR
-------------
Writes NEW over the text starting at each selected occurrence. A NEW longer
than ORIGINAL covers the characters that follow; a shorter one leaves the end
of ORIGINAL in place.

  sobreescribir todo "ab" con "XYZ" de "in.txt" en "out.txt"
  // "ab-cd" becomes "XYZcd"

Once N occurrences have been written the rest of the text is dropped:

  sobreescribir 1 "a" con "b" de "in.txt" en "out.txt"
  // "a1 a2 a3" becomes "b"

Both commands write TARGET even when ORIGINAL does not occur.
"#;

const ENUMERATE_DOC: &str = r##"ENUMERATE - enumerar

  enumerar TERM desde START hasta END de SOURCE en TARGET

Replaces the occurrences of TERM with the numbers START..END in order,
counting down when START is greater than END. The sequence starts over when
there are more occurrences than numbers.

  enumerar "#" desde 1 hasta 3 de "lista.txt" en "numerada.txt"
  // "# # # # #" becomes "1 2 3 1 2"
"##;

const PAGES_DOC: &str = r#"PAGES - extraer and invertir

Both commands need a PDF source.

EXTRAER
-------
  extraer de SOURCE desde START hasta END en TARGET

Pages are counted from 1 and the range is inclusive. START must not be
greater than END, and END must not pass the last page.

A .pdf TARGET receives the pages themselves. Any other TARGET receives their
text, each page under a header:

  --- Página 2 ---
  ...

INVERTIR
--------
  invertir de SOURCE en TARGET

Writes the pages of SOURCE in reverse order. TARGET must be a .pdf. A source
without pages only logs a warning.
"#;

const FRAGMENT_DOC: &str = r#"FRAGMENT - fragmentar

  fragmentar de SOURCE por DELIMITER en BASE

Splits a text document on DELIMITER into BASE1, BASE2, ... keeping the
extension of BASE:

  fragmentar de "todo.txt" por "---" en "parte.txt"
  // writes parte1.txt, parte2.txt, ...

Blank pieces are skipped. Every fragment but the last ends with the
delimiter on its own line. PDF sources are not accepted.
"#;

const WORKSPACE_DOC: &str = r#"WORKSPACE - Inputs and Outputs

Scripts run inside one directory: ./temp_files, or the directory named by
--dir or ARKSCRIPT_DIR.

  ark stage informe.txt libro.pdf   Copy inputs in (.txt and .pdf only)
  ark inputs                        List staged inputs
  ark run script.ark                Run a script
  ark clean                         Delete generated documents
  ark clean --all                   Delete everything

Staged inputs are listed in input_files.json. Every run first deletes the
documents the previous run generated, unless --keep-outputs is given.
"#;
