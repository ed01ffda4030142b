// Shared prompt fragments and prompt-building utilities.
// Each pipeline stage that calls the LLM defines its own prompts.rs alongside it.

/// Closing instruction appended to every prompt that expects a JSON reply.
/// Calls are a single user message, so this lives in the prompt body.
pub const JSON_ONLY_INSTRUCTION: &str = "Return ONLY valid JSON. \
    Do NOT include any text outside the JSON object. \
    Do NOT include explanations or apologies.";

/// Characters of job description sent with suggestion and rewrite prompts.
pub const JD_PROMPT_PREFIX_CHARS: usize = 1500;

/// Returns at most `max_chars` characters of `text`, cut on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Renders items as a dash list, one per line.
pub fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Substitutes `{name}` placeholders in one pass over `template`.
/// Substituted values are never rescanned, so user text containing
/// `{resume_text}` or similar stays literal. Unknown braces are kept.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let hit = values.iter().find_map(|(name, value)| {
            let inner = tail.strip_prefix('{')?.strip_prefix(name)?;
            inner.starts_with('}').then_some((name.len() + 2, *value))
        });
        match hit {
            Some((len, value)) => {
                out.push_str(value);
                rest = &tail[len..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_short_text_untouched() {
        assert_eq!(truncate_chars("short", 10), "short");
    }

    #[test]
    fn test_truncate_chars_respects_multibyte_boundaries() {
        let text = "résumé café";
        assert_eq!(truncate_chars(text, 6), "résumé");
    }

    #[test]
    fn test_bullet_list() {
        let items = vec!["Rust".to_string(), "SQL".to_string()];
        assert_eq!(bullet_list(&items), "- Rust\n- SQL");
        assert_eq!(bullet_list(&[]), "");
    }

    #[test]
    fn test_fill_template_substitutes_known_placeholders() {
        let filled = fill_template(
            "JD: {jd_text}\nCV: {resume_text}\nJSON: {\"a\": 1} {unknown}",
            &[("resume_text", "Rust dev"), ("jd_text", "Hiring")],
        );
        assert_eq!(filled, "JD: Hiring\nCV: Rust dev\nJSON: {\"a\": 1} {unknown}");
    }

    #[test]
    fn test_fill_template_leaves_placeholders_inside_values_literal() {
        let filled = fill_template(
            "{jd_text}|{resume_text}",
            &[("jd_text", "Paste {resume_text} here"), ("resume_text", "CV")],
        );
        assert_eq!(filled, "Paste {resume_text} here|CV");
    }
}
