use anyhow::Result;

use super::{Block, OutputFormat};
use crate::models::resume::{Contact, ResumeDocument};

/// Lays out a rewritten resume. Sections with no content are left out.
pub fn resume_blocks(doc: &ResumeDocument) -> Vec<Block> {
    let mut blocks = Vec::new();

    let name = doc.contact.name.trim();
    blocks.push(Block::Title(if name.is_empty() {
        "Resume".to_string()
    } else {
        name.to_string()
    }));

    let contact_line = contact_line(&doc.contact);
    if !contact_line.is_empty() {
        blocks.push(Block::Centered(contact_line));
    }
    blocks.push(Block::Spacer);

    if !doc.summary.trim().is_empty() {
        blocks.push(Block::heading("PROFESSIONAL SUMMARY"));
        blocks.push(Block::paragraph(doc.summary.trim()));
    }

    if !doc.experience.is_empty() {
        blocks.push(Block::heading("WORK EXPERIENCE"));
        for entry in &doc.experience {
            if !entry.title.trim().is_empty() {
                blocks.push(Block::labeled(entry.title.trim(), ""));
            }
            let details = join_present(&[&entry.company, &entry.location, &entry.dates]);
            if !details.is_empty() {
                blocks.push(Block::Italic(details));
            }
            blocks.extend(
                entry
                    .achievements
                    .iter()
                    .filter(|a| !a.trim().is_empty())
                    .map(|a| Block::bullet(a.trim())),
            );
            blocks.push(Block::Spacer);
        }
    }

    let skills: Vec<(&String, &Vec<String>)> =
        doc.skills.iter().filter(|(_, items)| !items.is_empty()).collect();
    if !skills.is_empty() {
        blocks.push(Block::heading("SKILLS & EXPERTISE"));
        for (category, items) in skills {
            blocks.push(Block::labeled(format!("{category}: "), items.join(", ")));
        }
    }

    if !doc.education.is_empty() {
        blocks.push(Block::heading("EDUCATION"));
        for entry in &doc.education {
            let line = join_present(&[&entry.degree, &entry.institution, &entry.year]);
            if !line.is_empty() {
                blocks.push(Block::paragraph(line));
            }
            if let Some(details) = entry.details.as_deref().filter(|d| !d.trim().is_empty()) {
                blocks.push(Block::Italic(details.trim().to_string()));
            }
        }
    }

    if !doc.certifications.is_empty() {
        blocks.push(Block::heading("CERTIFICATIONS"));
        blocks.extend(doc.certifications.iter().map(|c| Block::bullet(c.trim())));
    }

    blocks
}

fn contact_line(contact: &Contact) -> String {
    let linkedin = contact.linkedin.clone().unwrap_or_default();
    join_present(&[&contact.email, &contact.phone, &contact.location, &linkedin])
}

fn join_present(parts: &[&String]) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" | ")
}

pub fn render_resume(doc: &ResumeDocument, format: OutputFormat) -> Result<Vec<u8>> {
    let title = if doc.contact.name.trim().is_empty() {
        "Improved Resume"
    } else {
        doc.contact.name.trim()
    };
    format.write(title, &resume_blocks(doc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::extract_text;
    use crate::models::resume::{EducationEntry, ExperienceEntry};

    fn sample() -> ResumeDocument {
        let mut doc = ResumeDocument {
            contact: Contact {
                name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string(),
                phone: String::new(),
                location: "Austin, TX".to_string(),
                linkedin: Some("linkedin.com/in/janedoe".to_string()),
            },
            summary: "Backend engineer focused on data platforms.".to_string(),
            experience: vec![ExperienceEntry {
                title: "Senior Engineer".to_string(),
                company: "Initech".to_string(),
                location: String::new(),
                dates: "2019 - Present".to_string(),
                achievements: vec!["Cut p99 latency by 40%".to_string(), "  ".to_string()],
            }],
            education: vec![EducationEntry {
                degree: "B.S. Computer Science".to_string(),
                institution: "UT Austin".to_string(),
                year: "2015".to_string(),
                details: None,
            }],
            ..ResumeDocument::default()
        };
        doc.skills
            .insert("Technical".to_string(), vec!["Rust".to_string(), "SQL".to_string()]);
        doc.skills.insert("Soft".to_string(), Vec::new());
        doc
    }

    #[test]
    fn test_contact_line_skips_blank_parts() {
        let blocks = resume_blocks(&sample());
        assert_eq!(
            blocks[1],
            Block::Centered("jane@example.com | Austin, TX | linkedin.com/in/janedoe".to_string())
        );
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let blocks = resume_blocks(&sample());
        assert!(!blocks.contains(&Block::heading("CERTIFICATIONS")));
        assert!(blocks.contains(&Block::labeled("Technical: ", "Rust, SQL")));
        assert!(!blocks.iter().any(|b| matches!(b, Block::Labeled { label, .. } if label == "Soft: ")));
        // blank achievement dropped
        let bullets = blocks.iter().filter(|b| matches!(b, Block::Bullet(_))).count();
        assert_eq!(bullets, 1);
    }

    #[test]
    fn test_empty_document_renders() {
        let blocks = resume_blocks(&ResumeDocument::default());
        assert_eq!(blocks, vec![Block::Title("Resume".to_string()), Block::Spacer]);
        assert!(render_resume(&ResumeDocument::default(), OutputFormat::Pdf).is_ok());
    }

    #[test]
    fn test_docx_section_order() {
        let bytes = render_resume(&sample(), OutputFormat::Docx).unwrap();
        let text = extract_text("resume.docx", &bytes).unwrap();
        let order: Vec<usize> = [
            "Jane Doe",
            "PROFESSIONAL SUMMARY",
            "WORK EXPERIENCE",
            "Initech | 2019 - Present",
            "• Cut p99 latency by 40%",
            "SKILLS & EXPERTISE",
            "EDUCATION",
            "B.S. Computer Science | UT Austin | 2015",
        ]
        .iter()
        .map(|needle| text.find(needle).unwrap())
        .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]));
    }
}
