//! Paginated document codec.
//!
//! The evaluator never touches PDF internals directly. It opens bytes into a
//! [`PagedDocument`], asks for page text or for a new document made of a
//! chosen page order, and renders plain text into fresh paginated bytes.
//!
//! - **[pdf]** - `lopdf` backed PDF codec (feature `pdf`)
//! - **[testing]** - a form-feed separated text format for tests

#[cfg(feature = "pdf")]
pub mod pdf;
pub mod testing;

use thiserror::Error;

#[cfg(feature = "pdf")]
pub use pdf::PdfCodec;
pub use testing::SheetCodec;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("paginated document support is not available in this build")]
    Unavailable,

    #[error("malformed paginated document: {0}")]
    Malformed(String),

    #[error("page {index} does not exist (document has {count} pages)")]
    PageOutOfRange { index: usize, count: usize },
}

pub type CodecResult<T> = Result<T, CodecError>;

/// Format-level operations.
pub trait PageCodec {
    fn name(&self) -> &'static str;

    /// Parse a document from its bytes.
    fn open(&self, bytes: &[u8]) -> CodecResult<Box<dyn PagedDocument>>;

    /// Lay `text` out on as many pages as it needs.
    fn render_text(&self, text: &str) -> CodecResult<Vec<u8>>;
}

impl<T: PageCodec + ?Sized> PageCodec for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn open(&self, bytes: &[u8]) -> CodecResult<Box<dyn PagedDocument>> {
        (**self).open(bytes)
    }

    fn render_text(&self, text: &str) -> CodecResult<Vec<u8>> {
        (**self).render_text(text)
    }
}

/// An opened document.
pub trait PagedDocument {
    fn page_count(&self) -> usize;

    /// Extracted text of the page at 0-based `index`.
    fn page_text(&self, index: usize) -> CodecResult<String>;

    /// A new document holding the pages at `order` (0-based), in that order.
    fn assemble(&self, order: &[usize]) -> CodecResult<Vec<u8>>;
}

/// Stand-in used when no paginated format is compiled in.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

impl PageCodec for Unavailable {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn open(&self, _bytes: &[u8]) -> CodecResult<Box<dyn PagedDocument>> {
        Err(CodecError::Unavailable)
    }

    fn render_text(&self, _text: &str) -> CodecResult<Vec<u8>> {
        Err(CodecError::Unavailable)
    }
}

/// The codec this build supports: PDF when the `pdf` feature is on.
pub fn default_codec() -> Box<dyn PageCodec> {
    #[cfg(feature = "pdf")]
    {
        Box::new(PdfCodec::default())
    }
    #[cfg(not(feature = "pdf"))]
    {
        Box::new(Unavailable)
    }
}

pub(crate) fn check_pages(order: &[usize], count: usize) -> CodecResult<()> {
    match order.iter().find(|&&index| index >= count) {
        Some(&index) => Err(CodecError::PageOutOfRange { index, count }),
        None => Ok(()),
    }
}
