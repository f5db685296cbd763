use crate::models::ParsedContent;

pub const TITLE_FALLBACK: &str = "শিরোনাম তৈরি করতে সমস্যা হয়েছে";
pub const BODY_FALLBACK: &str = "কনটেন্ট তৈরি করতে সমস্যা হয়েছে";
pub const IMAGE_IDEAS_FALLBACK: &str = "ইমেজ আইডিয়া তৈরি করতে সমস্যা হয়েছে";

/// Extracts the three labeled sections from the raw model reply.
///
/// Each section lives between `<LABEL>_START` and `<LABEL>_END` markers and
/// may span multiple lines. A missing section degrades to a fixed placeholder
/// string; extraction itself never fails.
pub fn parse_response(raw: &str) -> ParsedContent {
    let title = labeled_span(raw, "TITLE")
        .map(str::to_string)
        .unwrap_or_else(|| TITLE_FALLBACK.to_string());

    let body = labeled_span(raw, "BODY")
        .map(str::to_string)
        .unwrap_or_else(|| BODY_FALLBACK.to_string());

    let mut image_ideas = labeled_span(raw, "IMAGE_IDEAS")
        .map(split_ideas)
        .unwrap_or_default();
    if image_ideas.is_empty() {
        image_ideas = vec![IMAGE_IDEAS_FALLBACK.to_string()];
    }

    ParsedContent {
        title,
        body,
        image_ideas,
    }
}

/// Finds the `<label>_START` .. `<label>_END` span and returns the trimmed
/// interior, or `None` when either marker is absent.
fn labeled_span<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    let start_marker = format!("{label}_START");
    let end_marker = format!("{label}_END");
    let start = text.find(&start_marker)? + start_marker.len();
    let end = start + text[start..].find(&end_marker)?;
    Some(text[start..end].trim())
}

/// One idea per line; a single leading `-` or `•` bullet is stripped and
/// blank lines are dropped. Order and duplicates are preserved.
fn split_ideas(span: &str) -> Vec<String> {
    span.lines()
        .map(|line| {
            let line = line.trim();
            match line.strip_prefix(['-', '•']) {
                Some(rest) => rest.trim_start(),
                None => line,
            }
        })
        .filter(|idea| !idea.is_empty())
        .map(str::to_string)
        .collect()
}
