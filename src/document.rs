//! Document naming rules: format detection and extension handling.

/// Storage format of a document, decided by its file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// UTF-8 text
    Text,
    /// Paginated binary document (`.pdf`)
    Paginated,
}

impl Format {
    pub fn of(name: &str) -> Format {
        if name.to_lowercase().ends_with(".pdf") {
            Format::Paginated
        } else {
            Format::Text
        }
    }

    pub fn is_paginated(self) -> bool {
        self == Format::Paginated
    }
}

/// What a content read produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    /// A paginated source read in opaque mode; its pages were not converted to text.
    Binary,
}

/// How a read treats paginated sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Extract and concatenate page text.
    ExtractText,
    /// Leave paginated sources alone and report [`Content::Binary`].
    Opaque,
}

/// Splits `name` into stem and extension, the extension keeping its dot.
///
/// Leading dots belong to the stem, so `.notes` has no extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(dot) if name[..dot].chars().any(|c| c != '.') => name.split_at(dot),
        _ => (name, ""),
    }
}
