//! PDF support on top of `lopdf`.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

use super::{CodecError, CodecResult, PageCodec, PagedDocument, check_pages};

// A4 in points
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 50;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

fn malformed(e: lopdf::Error) -> CodecError {
    CodecError::Malformed(e.to_string())
}

/// Renders text in Courier, so layout is a matter of counting characters.
#[derive(Debug, Clone, Copy)]
pub struct PdfCodec {
    pub font_size: i64,
    pub line_height: i64,
}

impl Default for PdfCodec {
    fn default() -> Self {
        PdfCodec {
            font_size: 10,
            line_height: 12,
        }
    }
}

impl PdfCodec {
    fn chars_per_line(&self) -> usize {
        // Courier advances 0.6em per glyph
        let usable = (PAGE_WIDTH - 2 * MARGIN) * 10;
        (usable / (self.font_size.max(1) * 6)).max(1) as usize
    }

    fn lines_per_page(&self) -> usize {
        ((PAGE_HEIGHT - 2 * MARGIN) / self.line_height.max(1)).max(1) as usize
    }

    /// Each line gets its own text object: text extraction only breaks
    /// lines at `ET`.
    fn page_content(&self, lines: &[String]) -> CodecResult<Vec<u8>> {
        let mut operations = Vec::with_capacity(lines.len() * 5);
        let mut y = PAGE_HEIGHT - MARGIN;
        for line in lines {
            if !line.is_empty() {
                operations.extend([
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), self.font_size.into()]),
                    Operation::new("Td", vec![MARGIN.into(), y.into()]),
                    Operation::new("Tj", vec![Object::string_literal(latin1(line))]),
                    Operation::new("ET", vec![]),
                ]);
            }
            y -= self.line_height;
        }

        Content { operations }.encode().map_err(malformed)
    }
}

impl PageCodec for PdfCodec {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn open(&self, bytes: &[u8]) -> CodecResult<Box<dyn PagedDocument>> {
        let doc = Document::load_mem(bytes).map_err(malformed)?;
        let numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        Ok(Box::new(PdfDocument { doc, numbers }))
    }

    fn render_text(&self, text: &str) -> CodecResult<Vec<u8>> {
        let lines = wrap(text, self.chars_per_line());
        let mut chunks: Vec<&[String]> = lines.chunks(self.lines_per_page()).collect();
        if chunks.is_empty() {
            chunks.push(&[]);
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let content_id = doc.add_object(Stream::new(dictionary! {}, self.page_content(chunk)?));
            let media_box: Vec<Object> = vec![
                0.into(),
                0.into(),
                PAGE_WIDTH.into(),
                PAGE_HEIGHT.into(),
            ];
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => media_box,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        save(&mut doc)
    }
}

struct PdfDocument {
    doc: Document,
    /// 1-based page numbers, in document order
    numbers: Vec<u32>,
}

impl PagedDocument for PdfDocument {
    fn page_count(&self) -> usize {
        self.numbers.len()
    }

    fn page_text(&self, index: usize) -> CodecResult<String> {
        let number = self
            .numbers
            .get(index)
            .copied()
            .ok_or(CodecError::PageOutOfRange {
                index,
                count: self.numbers.len(),
            })?;
        self.doc.extract_text(&[number]).map_err(malformed)
    }

    fn assemble(&self, order: &[usize]) -> CodecResult<Vec<u8>> {
        check_pages(order, self.numbers.len())?;

        let mut doc = self.doc.clone();
        let pages = doc.get_pages();
        let ids: Vec<ObjectId> = order
            .iter()
            .filter_map(|&i| pages.get(&self.numbers[i]).copied())
            .collect();
        let root_pages = doc
            .catalog()
            .and_then(|catalog| catalog.get(b"Pages"))
            .and_then(Object::as_reference)
            .map_err(malformed)?;

        // Pages are hoisted directly under the root node, so inherited
        // attributes have to be copied onto them first.
        for &id in &ids {
            let inherited = inherited_attributes(&doc, id);
            let page = doc.get_dictionary_mut(id).map_err(malformed)?;
            for (key, value) in inherited {
                page.set(key, value);
            }
            page.set("Parent", root_pages);
        }

        let kids: Vec<Object> = ids.iter().map(|&id| Object::Reference(id)).collect();
        let root = doc.get_dictionary_mut(root_pages).map_err(malformed)?;
        root.set("Kids", kids);
        root.set("Count", ids.len() as i64);

        doc.prune_objects();
        save(&mut doc)
    }
}

fn inherited_attributes(doc: &Document, page_id: ObjectId) -> Vec<(Vec<u8>, Object)> {
    let mut found: Vec<(Vec<u8>, Object)> = Vec::new();
    let Ok(page) = doc.get_dictionary(page_id) else {
        return found;
    };

    let mut parent = parent_of(page);
    let mut depth = 0;
    while let Some(parent_id) = parent {
        let Ok(node) = doc.get_dictionary(parent_id) else {
            break;
        };
        for key in INHERITABLE {
            if page.has(key) || found.iter().any(|(k, _)| k.as_slice() == key) {
                continue;
            }
            if let Ok(value) = node.get(key) {
                found.push((key.to_vec(), value.clone()));
            }
        }
        parent = parent_of(node);
        depth += 1;
        if depth > 64 {
            break;
        }
    }
    found
}

fn parent_of(node: &Dictionary) -> Option<ObjectId> {
    node.get(b"Parent").and_then(Object::as_reference).ok()
}

fn save(doc: &mut Document) -> CodecResult<Vec<u8>> {
    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| CodecError::Malformed(e.to_string()))?;
    Ok(out)
}

/// Characters outside Latin-1 become `?`.
fn latin1(line: &str) -> Vec<u8> {
    line.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

/// Greedy word wrap; words longer than a line are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for raw in text.replace('\r', "").replace('\t', "    ").split('\n') {
        let mut line = String::new();
        let mut len = 0;
        for word in raw.split(' ') {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if len > 0 {
                    lines.push(std::mem::take(&mut line));
                    len = 0;
                }
                let rest = word.split_off(width);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let needed = if len == 0 { word.len() } else { len + 1 + word.len() };
            if needed > width && len > 0 {
                lines.push(std::mem::take(&mut line));
                len = 0;
            }
            if len > 0 {
                line.push(' ');
                len += 1;
            }
            line.extend(word.iter());
            len += word.len();
        }
        lines.push(line);
    }
    lines
}
