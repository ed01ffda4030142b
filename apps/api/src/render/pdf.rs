//! PDF writer on printpdf's built-in Helvetica faces. US letter, word-wrapped,
//! new page when the cursor reaches the bottom margin.

use anyhow::{anyhow, Result};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerIndex, PdfPageIndex};

use super::Block;

const PAGE_WIDTH_MM: f32 = 215.9;
const PAGE_HEIGHT_MM: f32 = 279.4;
const MARGIN_MM: f32 = 20.0;
const PT_TO_MM: f32 = 0.3528;
/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;
const LINE_SPACING: f32 = 1.35;

const TITLE_PT: f32 = 18.0;
const HEADING_PT: f32 = 13.0;
const BODY_PT: f32 = 10.5;
const LAYER_NAME: &str = "Layer 1";

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

struct PageWriter {
    doc: PdfDocumentReference,
    fonts: Fonts,
    page: PdfPageIndex,
    layer: PdfLayerIndex,
    cursor_mm: f32,
}

impl PageWriter {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);
        let fonts = Fonts {
            regular: builtin_font(&doc, BuiltinFont::Helvetica)?,
            bold: builtin_font(&doc, BuiltinFont::HelveticaBold)?,
            italic: builtin_font(&doc, BuiltinFont::HelveticaOblique)?,
        };
        Ok(Self {
            doc,
            fonts,
            page,
            layer,
            cursor_mm: PAGE_HEIGHT_MM - MARGIN_MM,
        })
    }

    fn line(&mut self, text: &str, size_pt: f32, font: FontFace, centered: bool) {
        let line_height = size_pt * PT_TO_MM * LINE_SPACING;
        if self.cursor_mm - line_height < MARGIN_MM {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);
            self.page = page;
            self.layer = layer;
            self.cursor_mm = PAGE_HEIGHT_MM - MARGIN_MM;
        }
        self.cursor_mm -= line_height;

        let x = if centered {
            let width = estimated_width_mm(text, size_pt);
            ((PAGE_WIDTH_MM - width) / 2.0).max(MARGIN_MM)
        } else {
            MARGIN_MM
        };

        let font = match font {
            FontFace::Regular => &self.fonts.regular,
            FontFace::Bold => &self.fonts.bold,
            FontFace::Italic => &self.fonts.italic,
        };
        self.doc
            .get_page(self.page)
            .get_layer(self.layer)
            .use_text(pdf_safe(text), size_pt, Mm(x), Mm(self.cursor_mm), font);
    }

    fn wrapped(&mut self, text: &str, size_pt: f32, font: FontFace, centered: bool) {
        for line in wrap_text(text, max_chars(size_pt)) {
            self.line(&line, size_pt, font, centered);
        }
    }

    fn gap(&mut self, mm: f32) {
        self.cursor_mm -= mm;
    }

    fn finish(self) -> Result<Vec<u8>> {
        self.doc
            .save_to_bytes()
            .map_err(|e| anyhow!("Failed to serialize PDF: {e:?}"))
    }
}

#[derive(Clone, Copy)]
enum FontFace {
    Regular,
    Bold,
    Italic,
}

fn builtin_font(doc: &PdfDocumentReference, font: BuiltinFont) -> Result<IndirectFontRef> {
    doc.add_builtin_font(font)
        .map_err(|e| anyhow!("Failed to load built-in font: {e:?}"))
}

pub fn write_pdf(title: &str, blocks: &[Block]) -> Result<Vec<u8>> {
    let mut writer = PageWriter::new(title)?;

    for block in blocks {
        match block {
            Block::Title(text) => {
                writer.wrapped(text, TITLE_PT, FontFace::Bold, true);
                writer.gap(2.0);
            }
            Block::Heading(text) => {
                writer.gap(2.0);
                writer.wrapped(text, HEADING_PT, FontFace::Bold, false);
                writer.gap(1.0);
            }
            Block::Paragraph(text) => writer.wrapped(text, BODY_PT, FontFace::Regular, false),
            // Bold label inlined as plain text; one face per line.
            Block::Labeled { label, text } => {
                writer.wrapped(&format!("{label}{text}"), BODY_PT, FontFace::Regular, false)
            }
            Block::Italic(text) => writer.wrapped(text, BODY_PT, FontFace::Italic, false),
            Block::Bullet(text) => {
                let lines = wrap_text(text, max_chars(BODY_PT).saturating_sub(3));
                for (i, line) in lines.iter().enumerate() {
                    let prefix = if i == 0 { "-  " } else { "   " };
                    writer.line(&format!("{prefix}{line}"), BODY_PT, FontFace::Regular, false);
                }
            }
            Block::Centered(text) => writer.wrapped(text, BODY_PT, FontFace::Regular, true),
            Block::Spacer => writer.gap(BODY_PT * PT_TO_MM),
        }
    }

    writer.finish()
}

fn max_chars(size_pt: f32) -> usize {
    let usable = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
    (usable / (size_pt * PT_TO_MM * AVG_GLYPH_WIDTH)).floor() as usize
}

fn estimated_width_mm(text: &str, size_pt: f32) -> f32 {
    text.chars().count() as f32 * size_pt * PT_TO_MM * AVG_GLYPH_WIDTH
}

/// Greedy word wrap to at most `max_chars` per line. Longer words are split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(word.drain(..max_chars).collect());
        }
        if word.is_empty() {
            continue;
        }

        let word: String = word.into_iter().collect();
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Maps typographic characters onto what the built-in fonts can encode.
fn pdf_safe(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '•' | '●' | '▪' | '◦' | '·' => '-',
            '–' | '—' => '-',
            '‘' | '’' => '\'',
            '“' | '”' => '"',
            c if (c as u32) < 0x100 => c,
            _ => '?',
        })
        .collect()
}
