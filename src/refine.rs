use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{ContentType, ParsedContent, RefinedContent};
use crate::parser::IMAGE_IDEAS_FALLBACK;

/// Leading bullet run on an image idea, any of `-`, `•`, `*`.
static IDEA_BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-•*]+\s*").unwrap());

/// Three or more consecutive line breaks.
static EXCESS_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// A chapter delimiter together with whatever whitespace surrounds it.
static CHAPTER_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*///\s*").unwrap());

/// Ideas shorter than this are treated as noise lines and dropped.
const MIN_IDEA_CHARS: usize = 11;

/// Cleans up the parsed sections for display. The transform is idempotent:
/// refining already-refined content is a no-op.
pub fn refine(parsed: ParsedContent, content_type: ContentType) -> RefinedContent {
    RefinedContent {
        title: refine_title(&parsed.title),
        body: refine_body(&parsed.body, content_type),
        image_ideas: refine_image_ideas(&parsed.image_ideas),
    }
}

/// Strips one matching pair of surrounding quote characters.
fn refine_title(title: &str) -> String {
    strip_outer_quotes(title.trim()).trim().to_string()
}

const QUOTES: [char; 6] = ['"', '\'', '“', '”', '‘', '’'];

fn strip_outer_quotes(s: &str) -> &str {
    let first = match s.chars().next() {
        Some(c) => c,
        None => return s,
    };
    let last = match s.chars().last() {
        Some(c) => c,
        None => return s,
    };
    if QUOTES.contains(&first) && QUOTES.contains(&last) && s.chars().count() >= 2 {
        &s[first.len_utf8()..s.len() - last.len_utf8()]
    } else {
        s
    }
}

/// Normalizes the body into blank-line-separated paragraphs: runs of line
/// breaks collapse, lines are trimmed, empty lines dropped. For eBooks every
/// `///` chapter delimiter is re-wrapped with surrounding blank lines so the
/// page splitter always sees a well-formed delimiter.
fn refine_body(body: &str, content_type: ContentType) -> String {
    let collapsed = EXCESS_BREAKS.replace_all(body, "\n\n");
    let paragraphs = collapsed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");

    match content_type {
        ContentType::EBook => CHAPTER_BREAK
            .replace_all(&paragraphs, "\n\n///\n\n")
            .into_owned(),
        ContentType::FacebookPost | ContentType::InstagramPost => paragraphs,
    }
}

fn refine_image_ideas(ideas: &[String]) -> Vec<String> {
    let refined: Vec<String> = ideas
        .iter()
        .map(|idea| IDEA_BULLET.replace(idea.trim(), "").trim().to_string())
        .filter(|idea| idea.chars().count() >= MIN_IDEA_CHARS)
        .map(ensure_terminator)
        .collect();

    // Keep the non-empty invariant established by parsing.
    if refined.is_empty() {
        vec![ensure_terminator(IMAGE_IDEAS_FALLBACK.to_string())]
    } else {
        refined
    }
}

fn ensure_terminator(mut idea: String) -> String {
    if !idea.ends_with(['.', '!', '?']) {
        idea.push('.');
    }
    idea
}
