//! Minimal WordprocessingML writer: one `w:p` per block, no styles part.

use std::io::{Cursor, Write};

use anyhow::Result;
use quick_xml::escape::escape;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use super::Block;

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_OPEN: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#;

// US letter, one-inch margins, in twentieths of a point.
const DOCUMENT_CLOSE: &str = r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr></w:body></w:document>"#;

/// Font sizes in half-points.
const TITLE_SIZE: u32 = 36;
const HEADING_SIZE: u32 = 26;
const BODY_SIZE: u32 = 22;

#[derive(Default)]
struct RunStyle {
    bold: bool,
    italic: bool,
    size: Option<u32>,
}

pub fn write_docx(blocks: &[Block]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(CONTENT_TYPES_XML.as_bytes())?;

    zip.start_file("_rels/.rels", options)?;
    zip.write_all(ROOT_RELS_XML.as_bytes())?;

    zip.start_file("word/document.xml", options)?;
    zip.write_all(document_xml(blocks).as_bytes())?;

    Ok(zip.finish()?.into_inner())
}

fn document_xml(blocks: &[Block]) -> String {
    let mut xml = String::from(DOCUMENT_OPEN);
    for block in blocks {
        xml.push_str(&paragraph_xml(block));
    }
    xml.push_str(DOCUMENT_CLOSE);
    xml
}

fn paragraph_xml(block: &Block) -> String {
    match block {
        Block::Title(text) => paragraph(
            Some("center"),
            &[(
                text,
                RunStyle {
                    bold: true,
                    size: Some(TITLE_SIZE),
                    ..RunStyle::default()
                },
            )],
        ),
        Block::Heading(text) => paragraph(
            None,
            &[(
                text,
                RunStyle {
                    bold: true,
                    size: Some(HEADING_SIZE),
                    ..RunStyle::default()
                },
            )],
        ),
        Block::Paragraph(text) => paragraph(None, &[(text, body())]),
        Block::Labeled { label, text } => paragraph(
            None,
            &[
                (
                    label,
                    RunStyle {
                        bold: true,
                        size: Some(BODY_SIZE),
                        ..RunStyle::default()
                    },
                ),
                (text, body()),
            ],
        ),
        Block::Italic(text) => paragraph(
            None,
            &[(
                text,
                RunStyle {
                    italic: true,
                    size: Some(BODY_SIZE),
                    ..RunStyle::default()
                },
            )],
        ),
        Block::Bullet(text) => paragraph(None, &[(&format!("• {text}"), body())]),
        Block::Centered(text) => paragraph(Some("center"), &[(text, body())]),
        Block::Spacer => "<w:p/>".to_string(),
    }
}

fn body() -> RunStyle {
    RunStyle {
        size: Some(BODY_SIZE),
        ..RunStyle::default()
    }
}

fn paragraph(align: Option<&str>, runs: &[(&String, RunStyle)]) -> String {
    let mut xml = String::from("<w:p>");
    if let Some(align) = align {
        xml.push_str(&format!(r#"<w:pPr><w:jc w:val="{align}"/></w:pPr>"#));
    }
    for (text, style) in runs {
        xml.push_str("<w:r>");
        xml.push_str(&run_properties(style));
        xml.push_str(r#"<w:t xml:space="preserve">"#);
        xml.push_str(&escape(text.as_str()));
        xml.push_str("</w:t></w:r>");
    }
    xml.push_str("</w:p>");
    xml
}

fn run_properties(style: &RunStyle) -> String {
    let mut props = String::new();
    if style.bold {
        props.push_str("<w:b/>");
    }
    if style.italic {
        props.push_str("<w:i/>");
    }
    if let Some(size) = style.size {
        props.push_str(&format!(r#"<w:sz w:val="{size}"/>"#));
    }
    if props.is_empty() {
        props
    } else {
        format!("<w:rPr>{props}</w:rPr>")
    }
}
