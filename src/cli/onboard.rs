//! Onboarding tutorial content for ark CLI

/// Get the interactive onboarding tutorial content
pub fn get_onboarding_content() -> &'static str {
    r#"WELCOME TO ARKSCRIPT

ArkScript edits text and PDF documents in batches.

STEP 1: STAGE YOUR DOCUMENTS
----------------------------
Copy the inputs into the working directory.

  ark stage cuento.txt libro.pdf
  => staged cuento.txt, libro.pdf

STEP 2: COUNT
-------------
  ark run -e 'buscar repeticiones de "lobo" de "cuento.txt"'
  => [BUSCAR] found 4 occurrence(s) of 'lobo' in 'cuento.txt' (case-sensitive: no)

STEP 3: VARIABLES
-----------------
Name a document once and reuse it.

  ark run -e 'var c = "cuento.txt"
              reemplazar todo "lobo" con "zorro" de c en "zorro.txt"'

STEP 4: PAGES
-------------
  ark run -e 'extraer de "libro.pdf" desde 1 hasta 3 en "inicio.pdf"'
  ark run -e 'invertir de "libro.pdf" en "al_reves.pdf"'

STEP 5: SPLITTING
-----------------
  ark run -e 'fragmentar de "cuento.txt" por "***" en "escena.txt"'
  => escena1.txt, escena2.txt, ...

STEP 6: SCRIPTS
---------------
Put the commands in a file and run it. Each run clears the previous outputs.

  ark check edicion.ark
  ark run edicion.ark --json

NEXT STEPS
----------
  ark docs              List all documentation categories
  ark doc syntax        Keywords, strings, and comments
  ark doc replace       reemplazar and sobreescribir
  ark doc workspace     Inputs, outputs, and cleanup
"#
}
