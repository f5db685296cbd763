use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::models::ContentType;

/// Literal token the model inserts between eBook chapters.
pub const CHAPTER_SEPARATOR: &str = "///";

/// Separator used when joining every chapter into one copyable text.
pub const CHAPTER_COPY_JOIN: &str = "\n\n--- নতুন অধ্যায় ---\n\n";

/// Emoji set treated as bullet markers and given breathing room in text.
const EMOJIS: &str = "🔥💡📌✅🎯🚀💰📈🔴⭐📱💪🌟🎉🏆🎊✨💥💯⚡🌈🎨🎭🎪🎲";

static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#+)\s*").unwrap());
static NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\.\s*").unwrap());
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static HASHTAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#[\w\u{0980}-\u{09FF}]+").unwrap());
static EMOJI_GAP: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"([^\s])([{}])", EMOJIS)).unwrap());

/// Splits a refined body into displayable pages. eBooks split on the chapter
/// delimiter; other types are a single page. An eBook body with no usable
/// chapter pieces degrades to one page holding the original body.
pub fn split_pages(body: &str, content_type: ContentType) -> Vec<String> {
    match content_type {
        ContentType::EBook => {
            let pages: Vec<String> = body
                .split(CHAPTER_SEPARATOR)
                .map(str::trim)
                .filter(|page| !page.is_empty())
                .map(str::to_string)
                .collect();
            if pages.is_empty() {
                vec![body.to_string()]
            } else {
                pages
            }
        }
        ContentType::FacebookPost | ContentType::InstagramPost => vec![body.to_string()],
    }
}

/// Transient page cursor. Navigation clamps to `[0, len - 1]`, so stepping
/// past either end is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    index: usize,
    len: usize,
}

impl Paginator {
    pub fn new(len: usize) -> Self {
        Self {
            index: 0,
            len: len.max(1),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn next_page(&mut self) {
        if self.index + 1 < self.len {
            self.index += 1;
        }
    }

    pub fn prev_page(&mut self) {
        if self.index > 0 {
            self.index -= 1;
        }
    }

    pub fn go_to(&mut self, index: usize) {
        self.index = index.min(self.len - 1);
    }
}

/// Display fragment for one paragraph of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Heading { level: u8, spans: Vec<Span> },
    Bullet { spans: Vec<Span> },
    Numbered { number: u32, spans: Vec<Span> },
    Paragraph { spans: Vec<Span> },
}

/// Inline run inside a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Span {
    Text(String),
    Bold(String),
    Hashtag(String),
}

pub fn render_blocks(page: &str, content_type: ContentType) -> Vec<Block> {
    match content_type {
        ContentType::EBook => format_page(page),
        ContentType::FacebookPost | ContentType::InstagramPost => format_post(page),
    }
}

/// Long-form formatter for eBook pages: headings, bullet and numbered items.
/// Heading markers are stripped from the display text.
pub fn format_page(content: &str) -> Vec<Block> {
    paragraphs(content)
        .map(|paragraph| {
            let line = space_emojis(paragraph);
            if let Some(caps) = HEADING.captures(&line) {
                let level = caps[1].len().min(4) as u8;
                let text = HEADING.replace(&line, "").into_owned();
                Block::Heading {
                    level,
                    spans: inline_spans(&text, false),
                }
            } else if let Some(caps) = NUMBERED.captures(&line) {
                let number = caps[1].parse().unwrap_or(0);
                Block::Numbered {
                    number,
                    spans: inline_spans(&line, false),
                }
            } else if starts_with_bullet(&line) {
                Block::Bullet {
                    spans: inline_spans(&line, false),
                }
            } else {
                Block::Paragraph {
                    spans: inline_spans(&line, false),
                }
            }
        })
        .collect()
}

/// Short-form formatter for Facebook posts and Instagram captions: no
/// headings or numbered items, hashtag tokens get their own spans.
pub fn format_post(content: &str) -> Vec<Block> {
    paragraphs(content)
        .map(|paragraph| {
            let line = space_emojis(paragraph);
            if starts_with_bullet(&line) {
                Block::Bullet {
                    spans: inline_spans(&line, true),
                }
            } else {
                Block::Paragraph {
                    spans: inline_spans(&line, true),
                }
            }
        })
        .collect()
}

// Paragraph-based splitting: the refiner upstream rejoins body text with
// blank lines, so blank-line-separated runs are the display unit.
fn paragraphs(text: &str) -> impl Iterator<Item = &str> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
}

fn space_emojis(text: &str) -> String {
    EMOJI_GAP.replace_all(text, "$1 $2").into_owned()
}

fn starts_with_bullet(line: &str) -> bool {
    line.chars()
        .next()
        .is_some_and(|c| c == '-' || c == '*' || c == '•' || EMOJIS.contains(c))
}

fn inline_spans(text: &str, tag_hashtags: bool) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut last = 0;
    for caps in BOLD.captures_iter(text) {
        let matched = caps.get(0).expect("group 0 always present");
        if matched.start() > last {
            push_text(&mut spans, &text[last..matched.start()], tag_hashtags);
        }
        spans.push(Span::Bold(caps[1].to_string()));
        last = matched.end();
    }
    if last < text.len() {
        push_text(&mut spans, &text[last..], tag_hashtags);
    }
    spans
}

fn push_text(spans: &mut Vec<Span>, text: &str, tag_hashtags: bool) {
    if !tag_hashtags {
        if !text.is_empty() {
            spans.push(Span::Text(text.to_string()));
        }
        return;
    }
    let mut last = 0;
    for m in HASHTAG.find_iter(text) {
        if m.start() > last {
            spans.push(Span::Text(text[last..m.start()].to_string()));
        }
        spans.push(Span::Hashtag(m.as_str().to_string()));
        last = m.end();
    }
    if last < text.len() {
        spans.push(Span::Text(text[last..].to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ebook_body_splits_on_chapter_delimiter() {
        let pages = split_pages("A///B///", ContentType::EBook);
        assert_eq!(pages, vec!["A", "B"]);
    }

    #[test]
    fn delimiter_only_body_degrades_to_single_page() {
        let pages = split_pages("///", ContentType::EBook);
        assert_eq!(pages, vec!["///"]);
    }

    #[test]
    fn post_body_is_one_page() {
        let pages = split_pages("এক\n\n///\n\nদুই", ContentType::FacebookPost);
        assert_eq!(pages, vec!["এক\n\n///\n\nদুই"]);
    }

    #[test]
    fn page_split_is_idempotent() {
        let body = "অধ্যায় এক\n\n///\n\nঅধ্যায় দুই";
        let once = split_pages(body, ContentType::EBook);
        let rejoined = once.join("\n\n///\n\n");
        let twice = split_pages(&rejoined, ContentType::EBook);
        assert_eq!(once, twice);
    }

    #[test]
    fn paginator_clamps_at_both_ends() {
        let mut paginator = Paginator::new(3);
        paginator.prev_page();
        assert_eq!(paginator.index(), 0);
        paginator.next_page();
        paginator.next_page();
        assert_eq!(paginator.index(), 2);
        paginator.next_page();
        assert_eq!(paginator.index(), 2);
    }

    #[test]
    fn paginator_go_to_clamps() {
        let mut paginator = Paginator::new(4);
        paginator.go_to(99);
        assert_eq!(paginator.index(), 3);
        paginator.go_to(1);
        assert_eq!(paginator.index(), 1);
    }

    #[test]
    fn heading_markers_are_stripped_and_level_capped() {
        let blocks = format_page("## ভূমিকা\n\n###### গভীর স্তর");
        assert_eq!(
            blocks,
            vec![
                Block::Heading {
                    level: 2,
                    spans: vec![Span::Text("ভূমিকা".to_string())],
                },
                Block::Heading {
                    level: 4,
                    spans: vec![Span::Text("গভীর স্তর".to_string())],
                },
            ]
        );
    }

    #[test]
    fn bullet_and_numbered_paragraphs_are_classified() {
        let blocks = format_page("• প্রথম পয়েন্ট\n\n1. প্রথম ধাপ\n\nসাধারণ অনুচ্ছেদ");
        assert!(matches!(blocks[0], Block::Bullet { .. }));
        assert!(matches!(blocks[1], Block::Numbered { number: 1, .. }));
        assert!(matches!(blocks[2], Block::Paragraph { .. }));
    }

    #[test]
    fn bold_runs_become_emphasized_spans() {
        let blocks = format_page("আগে **জরুরি কথা** পরে");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                spans: vec![
                    Span::Text("আগে ".to_string()),
                    Span::Bold("জরুরি কথা".to_string()),
                    Span::Text(" পরে".to_string()),
                ],
            }]
        );
    }

    #[test]
    fn emoji_gets_a_space_after_text() {
        let blocks = format_page("সফলতা🔥 আসবেই");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                spans: vec![Span::Text("সফলতা 🔥 আসবেই".to_string())],
            }]
        );
    }

    #[test]
    fn post_formatter_wraps_hashtags() {
        let blocks = format_post("শেয়ার করুন #মার্কেটিং #tips2024");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                spans: vec![
                    Span::Text("শেয়ার করুন ".to_string()),
                    Span::Hashtag("#মার্কেটিং".to_string()),
                    Span::Text(" ".to_string()),
                    Span::Hashtag("#tips2024".to_string()),
                ],
            }]
        );
    }

    #[test]
    fn post_formatter_has_no_headings() {
        let blocks = format_post("# শিরোনামের মতো লাইন");
        assert!(matches!(blocks[0], Block::Paragraph { .. }));
    }

    #[test]
    fn full_pipeline_from_raw_reply_to_pages() {
        let raw = "\
TITLE_START
\"ভ্রমণ গাইড\"
TITLE_END
BODY_START
# অধ্যায় এক
কিছু লেখা **জরুরি** অংশসহ
///
# অধ্যায় দুই
আরো লেখা
BODY_END
IMAGE_IDEAS_START
- পাহাড়ের চূড়ায় সূর্যোদয়ের ছবি
IMAGE_IDEAS_END";
        let parsed = crate::parser::parse_response(raw);
        let refined = crate::refine::refine(parsed, ContentType::EBook);
        assert_eq!(refined.title, "ভ্রমণ গাইড");
        assert_eq!(refined.image_ideas, vec!["পাহাড়ের চূড়ায় সূর্যোদয়ের ছবি."]);

        let pages = split_pages(&refined.body, ContentType::EBook);
        assert_eq!(pages.len(), 2);

        let blocks = format_page(&pages[0]);
        assert!(matches!(blocks[0], Block::Heading { level: 1, .. }));
        assert!(blocks.iter().any(|block| matches!(
            block,
            Block::Paragraph { spans } if spans.contains(&Span::Bold("জরুরি".to_string()))
        )));
    }

    #[test]
    fn page_formatter_leaves_hashtags_as_text() {
        let blocks = format_page("টেক্সটের ভেতরে #ট্যাগ থাকলেও");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                spans: vec![Span::Text("টেক্সটের ভেতরে #ট্যাগ থাকলেও".to_string())],
            }]
        );
    }
}
