//! A plain-text paginated format for tests.
//!
//! Layout: a `%SHEET <pages>` header line, then the page texts separated by
//! form feeds. Easy to build fixtures with and to inspect after a run.

use super::{CodecError, CodecResult, PageCodec, PagedDocument, check_pages};

const HEADER: &str = "%SHEET ";
const PAGE_BREAK: char = '\x0c';

#[derive(Debug, Clone, Copy)]
pub struct SheetCodec {
    /// Lines per page when rendering text
    pub lines_per_page: usize,
}

impl Default for SheetCodec {
    fn default() -> Self {
        SheetCodec { lines_per_page: 40 }
    }
}

impl SheetCodec {
    /// Encode pages into sheet bytes.
    pub fn document<S: AsRef<str>>(pages: &[S]) -> Vec<u8> {
        let body: Vec<&str> = pages.iter().map(|p| p.as_ref()).collect();
        format!("{}{}\n{}", HEADER, pages.len(), body.join("\x0c")).into_bytes()
    }

    /// Decode sheet bytes into page texts.
    pub fn pages(bytes: &[u8]) -> CodecResult<Vec<String>> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| CodecError::Malformed(format!("not UTF-8: {}", e)))?;
        let rest = text
            .strip_prefix(HEADER)
            .ok_or_else(|| CodecError::Malformed("missing sheet header".to_string()))?;
        let (count, body) = rest.split_once('\n').unwrap_or((rest, ""));
        let count: usize = count
            .trim()
            .parse()
            .map_err(|_| CodecError::Malformed(format!("bad page count '{}'", count)))?;

        if count == 0 {
            return Ok(Vec::new());
        }
        let pages: Vec<String> = body.split(PAGE_BREAK).map(str::to_string).collect();
        if pages.len() != count {
            return Err(CodecError::Malformed(format!(
                "header says {} pages, found {}",
                count,
                pages.len()
            )));
        }
        Ok(pages)
    }
}

impl PageCodec for SheetCodec {
    fn name(&self) -> &'static str {
        "sheet"
    }

    fn open(&self, bytes: &[u8]) -> CodecResult<Box<dyn PagedDocument>> {
        Ok(Box::new(Sheet {
            pages: Self::pages(bytes)?,
        }))
    }

    fn render_text(&self, text: &str) -> CodecResult<Vec<u8>> {
        let lines: Vec<&str> = text.split('\n').collect();
        let pages: Vec<String> = lines
            .chunks(self.lines_per_page.max(1))
            .map(|chunk| chunk.join("\n"))
            .collect();
        Ok(Self::document(&pages))
    }
}

struct Sheet {
    pages: Vec<String>,
}

impl PagedDocument for Sheet {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> CodecResult<String> {
        self.pages
            .get(index)
            .cloned()
            .ok_or(CodecError::PageOutOfRange {
                index,
                count: self.pages.len(),
            })
    }

    fn assemble(&self, order: &[usize]) -> CodecResult<Vec<u8>> {
        check_pages(order, self.pages.len())?;
        let pages: Vec<&str> = order.iter().map(|&i| self.pages[i].as_str()).collect();
        Ok(SheetCodec::document(&pages))
    }
}
