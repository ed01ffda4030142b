//! Heuristic resume parser used when the rewrite call cannot run.
//!
//! Single pass over non-empty lines. Text starts in the summary section;
//! a short line matching a known header switches sections. Experience lines
//! are split into job headers (year ranges or short lines) and achievements
//! (bulleted or long lines).

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::resume::{Contact, EducationEntry, ExperienceEntry, ResumeDocument};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap());
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\+?\d{1,3}[\s.-]?)?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}").unwrap()
});
static LINKEDIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(https?://)?(www\.)?linkedin\.com/in/[A-Za-z0-9_-]+/?").unwrap()
});
static LOCATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Za-z .'-]+,\s*[A-Z][A-Za-z .]+$").unwrap());

static YEAR_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+|\d{1,2}/)?(?:19|20)\d{2}\s*(?:-|–|—|to)\s*(?:(?:(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+|\d{1,2}/)?(?:19|20)\d{2}|present|current|now)\b",
    )
    .unwrap()
});
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

/// Separators between title, company and location on a header line.
static FIELD_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*(?:\||•|·|–|—|,|\s-\s|\sat\s)\s*").unwrap());

static DEGREE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:bachelor|master|ph\.?\s?d|doctorate|associate'?s? degree|mba|b\.s\.|m\.s\.|b\.a\.|m\.a\.|bsc|msc|b\.?tech|m\.?tech|diploma)",
    )
    .unwrap()
});
static INSTITUTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:university|college|institute|school|academy|polytechnic)\b").unwrap()
});

static SECTION_HEADERS: Lazy<Vec<(Regex, Section)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"(?i)^(?:professional |work |relevant )?(?:experience|employment(?: history)?|work history|career history)$").unwrap(),
            Section::Experience,
        ),
        (
            Regex::new(r"(?i)^(?:education|academic background|education (?:&|and) training)$").unwrap(),
            Section::Education,
        ),
        (
            Regex::new(r"(?i)^(?:technical |core |key )?(?:skills|competencies|technologies|skills (?:&|and) (?:expertise|tools))$").unwrap(),
            Section::Skills,
        ),
        (
            Regex::new(r"(?i)^(?:certifications?|certificates|licenses? (?:&|and) certifications)$").unwrap(),
            Section::Certifications,
        ),
        (
            Regex::new(r"(?i)^(?:professional |career |executive )?(?:summary|profile|objective|about me)$").unwrap(),
            Section::Summary,
        ),
    ]
});

const NAME_SCAN_LINES: usize = 10;
const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 50;
const NAME_EXCLUDED_MARKERS: &[&str] = &["@", "phone", "linkedin", "address", "mobile", "location"];
const MAX_HEADER_CHARS: usize = 40;
const MAX_JOB_HEADER_CHARS: usize = 60;
/// Header lines merged into one experience entry before achievements start.
const MAX_JOB_HEADER_LINES: usize = 2;
const BULLET_MARKERS: &[char] = &['-', '*', '•', '●', '▪', '◦', '–', '>', '·'];
const DEFAULT_NAME: &str = "Your Name";
const DEFAULT_SKILL_CATEGORY: &str = "Technical";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Summary,
    Experience,
    Education,
    Skills,
    Certifications,
}

#[derive(Debug, Default)]
struct SectionLines {
    summary: Vec<String>,
    experience: Vec<String>,
    education: Vec<String>,
    skills: Vec<String>,
    certifications: Vec<String>,
}

impl SectionLines {
    fn push(&mut self, section: Section, line: &str) {
        let bucket = match section {
            Section::Summary => &mut self.summary,
            Section::Experience => &mut self.experience,
            Section::Education => &mut self.education,
            Section::Skills => &mut self.skills,
            Section::Certifications => &mut self.certifications,
        };
        bucket.push(line.to_string());
    }
}

/// Parses raw resume text into a `ResumeDocument`. Provenance is left at its
/// default; the caller tags the result.
pub fn parse_resume(text: &str) -> ResumeDocument {
    let contact = extract_contact(text);
    let mut sections = SectionLines::default();
    let mut current = Section::Summary;
    let mut seen_header = false;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(section) = detect_section(line) {
            current = section;
            seen_header = true;
            continue;
        }
        if !seen_header && is_contact_line(line, &contact.name) {
            continue;
        }
        sections.push(current, line);
    }

    let summary = sections
        .summary
        .iter()
        .map(|l| strip_bullet(l).unwrap_or(l))
        .collect::<Vec<_>>()
        .join(" ");

    let mut experience = parse_experience(&sections.experience);
    if experience.is_empty() {
        experience.push(synthesize_experience(&summary));
    }

    ResumeDocument {
        contact,
        summary,
        experience,
        skills: parse_skills(&sections.skills),
        education: parse_education(&sections.education),
        certifications: sections
            .certifications
            .iter()
            .map(|l| strip_bullet(l).unwrap_or(l).to_string())
            .collect(),
        ..ResumeDocument::default()
    }
}

/// Maps a short header line such as "WORK EXPERIENCE:" to its section.
pub fn detect_section(line: &str) -> Option<Section> {
    let candidate = line.trim().trim_end_matches(':').trim();
    if candidate.is_empty() || candidate.chars().count() > MAX_HEADER_CHARS {
        return None;
    }
    SECTION_HEADERS
        .iter()
        .find(|(re, _)| re.is_match(candidate))
        .map(|(_, section)| *section)
}

pub fn extract_name(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(NAME_SCAN_LINES)
        .find(|line| {
            let lower = line.to_lowercase();
            let len = line.chars().count();
            (NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&len)
                && !NAME_EXCLUDED_MARKERS.iter().any(|m| lower.contains(m))
                && !PHONE_RE.is_match(line)
                && detect_section(line).is_none()
        })
        .map(str::to_string)
}

pub fn extract_contact(text: &str) -> Contact {
    let name = extract_name(text).unwrap_or_else(|| DEFAULT_NAME.to_string());
    let location = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(NAME_SCAN_LINES)
        .flat_map(|l| l.split(['|', '•', '·']))
        .map(|part| part.trim().trim_start_matches("Location:").trim())
        .find(|part| *part != name && LOCATION_RE.is_match(part))
        .unwrap_or_default()
        .to_string();

    Contact {
        email: EMAIL_RE
            .find(text)
            .map(|m| m.as_str().to_lowercase())
            .unwrap_or_default(),
        phone: PHONE_RE
            .find(text)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default(),
        linkedin: LINKEDIN_RE.find(text).map(|m| m.as_str().to_string()),
        location,
        name,
    }
}

fn is_contact_line(line: &str, name: &str) -> bool {
    line == name
        || EMAIL_RE.is_match(line)
        || PHONE_RE.is_match(line)
        || LINKEDIN_RE.is_match(line)
        || LOCATION_RE.is_match(line)
}

/// Returns the text after a leading bullet glyph, or `None` for unbulleted lines.
fn strip_bullet(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix(BULLET_MARKERS)?.trim();
    (!rest.is_empty()).then_some(rest)
}

fn parse_experience(lines: &[String]) -> Vec<ExperienceEntry> {
    let mut entries: Vec<ExperienceEntry> = Vec::new();
    let mut header_lines = 0;

    for line in lines {
        if let Some(achievement) = strip_bullet(line) {
            push_achievement(&mut entries, achievement);
            continue;
        }

        let looks_like_header =
            YEAR_RANGE_RE.is_match(line) || line.chars().count() <= MAX_JOB_HEADER_CHARS;
        if !looks_like_header {
            push_achievement(&mut entries, line);
            continue;
        }

        match entries.last_mut() {
            Some(entry) if entry.achievements.is_empty() && header_lines < MAX_JOB_HEADER_LINES => {
                apply_job_header(entry, line);
                header_lines += 1;
            }
            _ => {
                let mut entry = ExperienceEntry::default();
                apply_job_header(&mut entry, line);
                entries.push(entry);
                header_lines = 1;
            }
        }
    }

    entries
}

fn push_achievement(entries: &mut Vec<ExperienceEntry>, text: &str) {
    if entries.is_empty() {
        entries.push(ExperienceEntry::default());
    }
    if let Some(entry) = entries.last_mut() {
        entry.achievements.push(text.to_string());
    }
}

/// Fills dates from a year range, then title, company and location in order.
fn apply_job_header(entry: &mut ExperienceEntry, line: &str) {
    let mut rest = line.to_string();
    if let Some(m) = YEAR_RANGE_RE.find(line) {
        if entry.dates.is_empty() {
            entry.dates = m.as_str().trim().to_string();
        }
        rest = format!("{} {}", &line[..m.start()], &line[m.end()..]);
    }

    let mut parts = split_fields(&rest).into_iter();
    if entry.title.is_empty() {
        entry.title = parts.next().unwrap_or_default();
    }
    if entry.company.is_empty() {
        entry.company = parts.next().unwrap_or_default();
    }
    if entry.location.is_empty() {
        entry.location = parts.collect::<Vec<_>>().join(", ");
    }
}

fn split_fields(text: &str) -> Vec<String> {
    FIELD_SPLIT_RE
        .split(text)
        .map(|p| p.trim().trim_matches(['(', ')']).trim())
        .filter(|p| p.chars().any(char::is_alphanumeric))
        .map(str::to_string)
        .collect()
}

fn parse_education(lines: &[String]) -> Vec<EducationEntry> {
    let mut entries: Vec<EducationEntry> = Vec::new();

    for line in lines {
        let text = strip_bullet(line).unwrap_or(line);
        let has_degree = DEGREE_RE.is_match(text);
        let has_institution = INSTITUTION_RE.is_match(text);

        let start_new = match entries.last() {
            None => true,
            Some(last) => {
                (has_degree && !last.degree.is_empty())
                    || (has_institution && !last.institution.is_empty())
            }
        };
        if start_new {
            entries.push(EducationEntry::default());
        }
        let Some(entry) = entries.last_mut() else {
            continue;
        };

        if let Some(year) = YEAR_RE.find_iter(text).last() {
            if entry.year.is_empty() {
                entry.year = year.as_str().to_string();
            }
        }

        let without_dates = YEAR_RANGE_RE.replace_all(text, " ");
        let without_years = YEAR_RE.replace_all(&without_dates, " ");
        for part in split_fields(&without_years) {
            if entry.degree.is_empty() && DEGREE_RE.is_match(&part) {
                entry.degree = part;
            } else if entry.institution.is_empty() && INSTITUTION_RE.is_match(&part) {
                entry.institution = part;
            } else {
                match &mut entry.details {
                    Some(details) => {
                        details.push_str("; ");
                        details.push_str(&part);
                    }
                    None => entry.details = Some(part),
                }
            }
        }
    }

    // A details-only entry carries no degree; promote its text.
    for entry in &mut entries {
        if entry.degree.is_empty() && entry.institution.is_empty() {
            if let Some(details) = entry.details.take() {
                entry.degree = details;
            }
        }
    }

    entries
}

fn parse_skills(lines: &[String]) -> BTreeMap<String, Vec<String>> {
    let mut skills: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for line in lines {
        let text = strip_bullet(line).unwrap_or(line);
        let (category, items) = match text.split_once(':') {
            Some((label, items)) if !label.trim().is_empty() && label.chars().count() <= 30 => {
                (label.trim(), items)
            }
            _ => (DEFAULT_SKILL_CATEGORY, text),
        };

        let bucket = skills.entry(category.to_string()).or_default();
        for item in items.split([',', ';', '|', '•', '·']).map(str::trim) {
            if !item.is_empty() && !bucket.iter().any(|s| s == item) {
                bucket.push(item.to_string());
            }
        }
    }

    skills.retain(|_, items| !items.is_empty());
    skills
}

/// One generic entry built from the summary when no experience was found.
fn synthesize_experience(summary: &str) -> ExperienceEntry {
    ExperienceEntry {
        title: "Professional Experience".to_string(),
        achievements: summary
            .split(". ")
            .map(|s| s.trim().trim_end_matches('.').trim())
            .filter(|s| !s.is_empty())
            .take(3)
            .map(str::to_string)
            .collect(),
        ..ExperienceEntry::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "\
John A. Smith
john.smith@example.com | (555) 123-4567 | Austin, TX
linkedin.com/in/johnasmith

PROFESSIONAL SUMMARY
Backend engineer with eight years of experience building payment systems.

WORK EXPERIENCE
Senior Software Engineer | Acme Corp | Austin, TX | Jan 2020 - Present
- Responsible for the payments ledger service
- Cut settlement latency by 40% with batched writes
Software Engineer
Globex Inc, Remote 2016 - 2019
• Built internal tooling for support agents

EDUCATION
B.S. Computer Science, University of Texas, 2016
GPA 3.8

SKILLS
Languages: Rust, Go, Python
Tools: Docker, Kubernetes
PostgreSQL, Redis

CERTIFICATIONS
- AWS Certified Solutions Architect (2022)
";

    #[test]
    fn test_first_content_line_is_the_name() {
        assert_eq!(
            extract_name("John A. Smith\njohn@example.com").as_deref(),
            Some("John A. Smith")
        );
        assert_eq!(extract_name(RESUME).as_deref(), Some("John A. Smith"));
    }

    #[test]
    fn test_name_skips_contact_lines() {
        let text = "Email: jane@example.com\nPhone: 555 123 4567\nJane Roe\nEXPERIENCE";
        assert_eq!(extract_name(text).as_deref(), Some("Jane Roe"));
        assert_eq!(extract_name("EXPERIENCE\nx"), None);
    }

    #[test]
    fn test_contact_fields() {
        let contact = extract_contact(RESUME);
        assert_eq!(contact.email, "john.smith@example.com");
        assert_eq!(contact.phone, "(555) 123-4567");
        assert_eq!(contact.location, "Austin, TX");
        assert_eq!(contact.linkedin.as_deref(), Some("linkedin.com/in/johnasmith"));
    }

    #[test]
    fn test_missing_name_defaults() {
        let contact = extract_contact("jane@example.com\n");
        assert_eq!(contact.name, DEFAULT_NAME);
    }

    #[test]
    fn test_detect_section_headers() {
        assert_eq!(detect_section("WORK EXPERIENCE"), Some(Section::Experience));
        assert_eq!(detect_section("Education:"), Some(Section::Education));
        assert_eq!(detect_section("Skills & Expertise"), Some(Section::Skills));
        assert_eq!(detect_section("Certifications"), Some(Section::Certifications));
        assert_eq!(detect_section("Professional Summary"), Some(Section::Summary));
        assert_eq!(
            detect_section("Gained experience across many different teams and products"),
            None
        );
    }

    #[test]
    fn test_full_parse() {
        let doc = parse_resume(RESUME);

        assert_eq!(
            doc.summary,
            "Backend engineer with eight years of experience building payment systems."
        );

        assert_eq!(doc.experience.len(), 2);
        let acme = &doc.experience[0];
        assert_eq!(acme.title, "Senior Software Engineer");
        assert_eq!(acme.company, "Acme Corp");
        assert_eq!(acme.location, "Austin, TX");
        assert_eq!(acme.dates, "Jan 2020 - Present");
        assert_eq!(acme.achievements.len(), 2);

        let globex = &doc.experience[1];
        assert_eq!(globex.title, "Software Engineer");
        assert_eq!(globex.company, "Globex Inc");
        assert_eq!(globex.location, "Remote");
        assert_eq!(globex.dates, "2016 - 2019");
        assert_eq!(
            globex.achievements,
            vec!["Built internal tooling for support agents"]
        );

        assert_eq!(doc.education.len(), 1);
        let edu = &doc.education[0];
        assert_eq!(edu.degree, "B.S. Computer Science");
        assert_eq!(edu.institution, "University of Texas");
        assert_eq!(edu.year, "2016");
        assert_eq!(edu.details.as_deref(), Some("GPA 3.8"));

        assert_eq!(doc.skills["Languages"], vec!["Rust", "Go", "Python"]);
        assert_eq!(doc.skills["Tools"], vec!["Docker", "Kubernetes"]);
        assert_eq!(doc.skills["Technical"], vec!["PostgreSQL", "Redis"]);

        assert_eq!(
            doc.certifications,
            vec!["AWS Certified Solutions Architect (2022)"]
        );
    }

    #[test]
    fn test_no_experience_synthesizes_entry_from_summary() {
        let doc = parse_resume(
            "Pat Lee\nSUMMARY\nData analyst. Built dashboards for sales leadership. Automated weekly reports.",
        );
        assert_eq!(doc.experience.len(), 1);
        assert_eq!(doc.experience[0].title, "Professional Experience");
        assert_eq!(
            doc.experience[0].achievements,
            vec![
                "Data analyst",
                "Built dashboards for sales leadership",
                "Automated weekly reports"
            ]
        );
    }

    #[test]
    fn test_long_unbulleted_line_is_an_achievement() {
        let lines = vec![
            "Data Engineer | Initech".to_string(),
            "Designed and operated the nightly ingestion pipeline that moved two terabytes a day".to_string(),
        ];
        let entries = parse_experience(&lines);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].company, "Initech");
        assert_eq!(entries[0].achievements.len(), 1);
    }

    #[test]
    fn test_empty_text_still_yields_a_document() {
        let doc = parse_resume("");
        assert_eq!(doc.contact.name, DEFAULT_NAME);
        assert_eq!(doc.experience.len(), 1);
        assert!(doc.experience[0].achievements.is_empty());
        assert!(doc.skills.is_empty());
    }
}
