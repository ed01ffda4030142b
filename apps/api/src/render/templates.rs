//! Blank ATS-friendly templates offered for download.

use anyhow::Result;

use super::{docx, Block};

pub const RESUME_TEMPLATE_FILE: &str = "resume_template.docx";
pub const JOB_DESCRIPTION_TEMPLATE_FILE: &str = "job_description_template.docx";

const BLANK: &str = "________________________________________________";

fn blank_field(label: &str) -> Block {
    Block::paragraph(format!("{label}: {BLANK}"))
}

fn section(blocks: &mut Vec<Block>, title: &str) {
    blocks.push(Block::Spacer);
    blocks.push(Block::heading(title));
}

pub fn resume_template_blocks() -> Vec<Block> {
    let mut blocks = vec![
        Block::Title("RESUME TEMPLATE".to_string()),
        Block::labeled(
            "Instructions: ",
            "Fill in all sections below. This template is optimized for ATS compatibility.",
        ),
    ];

    section(&mut blocks, "PERSONAL INFORMATION");
    for label in ["Full Name", "Email", "Phone", "LinkedIn", "Location"] {
        blocks.push(blank_field(label));
    }

    section(&mut blocks, "PROFESSIONAL SUMMARY");
    blocks.push(Block::paragraph(
        "[Write 3-4 sentences summarizing your background, key skills, and target role.]",
    ));

    section(&mut blocks, "TECHNICAL SKILLS");
    blocks.extend(
        [
            "Programming Languages: [e.g., Java, Python, JavaScript, C++]",
            "Frameworks & Tools: [e.g., Spring Boot, React, Docker]",
            "Databases: [e.g., MySQL, PostgreSQL, MongoDB]",
            "Cloud Platforms: [e.g., AWS, Azure, GCP]",
            "Other Skills: [e.g., Agile, Git, CI/CD]",
        ]
        .map(Block::bullet),
    );

    section(&mut blocks, "CERTIFICATIONS");
    for _ in 0..2 {
        blocks.push(Block::bullet("[Certification] - [Organization] - [Year]"));
    }

    section(&mut blocks, "PROFESSIONAL EXPERIENCE");
    for i in 1..=2 {
        blocks.push(Block::labeled(
            format!("Job Title {i}"),
            " | Company Name | Location",
        ));
        blocks.push(Block::Italic(
            "[Start Month Year] - [End Month Year or Present]".to_string(),
        ));
        blocks.extend(
            [
                "[Achievement/responsibility with quantifiable results]",
                "[Achievement/responsibility with quantifiable results]",
                "[Key project or initiative and its impact]",
                "[Technical skills utilized or leadership demonstrated]",
            ]
            .map(Block::bullet),
        );
        blocks.push(Block::Spacer);
    }

    blocks.push(Block::heading("KEY PROJECTS"));
    blocks.push(Block::labeled("Project Name", " | [Client/Company] | [Year]"));
    blocks.extend(
        [
            "[Brief project description]",
            "[Technologies used]",
            "[Your role and contributions]",
            "[Measurable outcomes or impact]",
        ]
        .map(Block::bullet),
    );

    section(&mut blocks, "EDUCATION");
    blocks.push(Block::paragraph("[Degree] in [Field]"));
    blocks.push(Block::paragraph("[University] | [Location] | [Year]"));

    section(&mut blocks, "ADDITIONAL INFORMATION");
    blocks.push(Block::bullet("Languages: [e.g., English, Hindi]"));
    blocks.push(Block::bullet("Professional Memberships: [e.g., IEEE, ACM]"));

    blocks
}

pub fn job_description_template_blocks() -> Vec<Block> {
    let mut blocks = vec![
        Block::Title("JOB DESCRIPTION TEMPLATE".to_string()),
        Block::labeled(
            "Instructions: ",
            "Fill in all sections below with specific requirements.",
        ),
    ];

    section(&mut blocks, "BASIC INFORMATION");
    for label in ["Job Title", "Department", "Location"] {
        blocks.push(blank_field(label));
    }
    blocks.push(Block::paragraph(
        "Employment Type: [Full-time / Part-time / Contract]",
    ));
    blocks.push(Block::paragraph(
        "Experience Level: [Entry / Mid / Senior / Lead]",
    ));

    section(&mut blocks, "COMPANY OVERVIEW");
    blocks.push(Block::paragraph(
        "[Describe your company, mission, culture, and industry.]",
    ));

    section(&mut blocks, "ROLE SUMMARY");
    blocks.push(Block::paragraph(
        "[Provide a 2-3 sentence overview of the role and impact.]",
    ));

    section(&mut blocks, "KEY RESPONSIBILITIES");
    blocks.extend(
        [
            "[Primary responsibility]",
            "[Secondary responsibility]",
            "[Team responsibilities]",
            "[Strategic responsibilities]",
        ]
        .map(Block::bullet),
    );

    section(&mut blocks, "REQUIRED QUALIFICATIONS");
    blocks.push(Block::paragraph("Education:"));
    blocks.push(Block::bullet(
        "[Degree level and field, e.g., B.Tech in Computer Science]",
    ));
    blocks.push(Block::paragraph("Experience:"));
    blocks.push(Block::bullet(
        "[Years of experience, e.g., 3+ years in Java development]",
    ));
    blocks.push(Block::paragraph("Technical Skills (Must-Have):"));
    blocks.push(Block::bullet("[Technologies, frameworks, tools]"));

    section(&mut blocks, "PREFERRED QUALIFICATIONS");
    blocks.push(Block::bullet("[Nice-to-have certifications, skills, domains]"));

    section(&mut blocks, "SOFT SKILLS & COMPETENCIES");
    blocks.push(Block::bullet("[Communication, teamwork, problem solving]"));

    section(&mut blocks, "WORK ENVIRONMENT & CULTURE");
    blocks.push(Block::paragraph(
        "[Remote/hybrid/onsite, team size, values, and culture.]",
    ));

    section(&mut blocks, "IMPORTANT KEYWORDS FOR ATS");
    blocks.push(Block::paragraph(
        "[List critical keywords: Java, Spring Boot, Microservices, etc.]",
    ));

    blocks
}

pub fn resume_template() -> Result<Vec<u8>> {
    docx::write_docx(&resume_template_blocks())
}

pub fn job_description_template() -> Result<Vec<u8>> {
    docx::write_docx(&job_description_template_blocks())
}
