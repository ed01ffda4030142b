//! Document rendering. Every artifact is first laid out as a list of
//! `Block`s, then handed to the DOCX or PDF writer.

pub mod docx;
pub mod pdf;
pub mod report;
pub mod resume;
pub mod templates;

use std::str::FromStr;

/// One laid-out paragraph.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Large bold centered line.
    Title(String),
    /// Bold section header.
    Heading(String),
    Paragraph(String),
    /// Bold label followed by plain text on the same line.
    Labeled { label: String, text: String },
    Italic(String),
    Bullet(String),
    Centered(String),
    Spacer,
}

impl Block {
    pub fn heading(text: impl Into<String>) -> Self {
        Block::Heading(text.into())
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph(text.into())
    }

    pub fn bullet(text: impl Into<String>) -> Self {
        Block::Bullet(text.into())
    }

    pub fn labeled(label: impl Into<String>, text: impl Into<String>) -> Self {
        Block::Labeled {
            label: label.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Docx,
    Pdf,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Docx => "docx",
            OutputFormat::Pdf => "pdf",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            OutputFormat::Pdf => "application/pdf",
        }
    }

    /// Writes `blocks` in this format.
    pub fn write(&self, title: &str, blocks: &[Block]) -> anyhow::Result<Vec<u8>> {
        match self {
            OutputFormat::Docx => docx::write_docx(blocks),
            OutputFormat::Pdf => pdf::write_pdf(title, blocks),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "docx" => Ok(OutputFormat::Docx),
            "pdf" => Ok(OutputFormat::Pdf),
            other => Err(format!("unsupported format '{other}', expected 'docx' or 'pdf'")),
        }
    }
}

/// UTC timestamp used in generated file names.
pub fn file_timestamp() -> String {
    chrono::Utc::now().format("%Y%m%d_%H%M%S_%3f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("DOCX".parse::<OutputFormat>(), Ok(OutputFormat::Docx));
        assert_eq!(" pdf ".parse::<OutputFormat>(), Ok(OutputFormat::Pdf));
        assert!("txt".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_file_timestamp_is_filename_safe() {
        let ts = file_timestamp();
        assert!(ts
            .chars()
            .all(|c| c.is_ascii_digit() || c == '_'));
    }
}
