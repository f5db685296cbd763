use crate::models::{ContentType, GenerationRequest};

pub const DEFAULT_PAGE_COUNT: u32 = 10;
pub const DEFAULT_WORD_COUNT: u32 = 500;

const MIN_PAGE_COUNT: u32 = 5;
const MAX_PAGE_COUNT: u32 = 50;
const MIN_WORD_COUNT: u32 = 100;
const MAX_WORD_COUNT: u32 = 2000;

const PROMPT_TEMPLATE: &str = "\
আপনি একজন পেশাদার কন্টেন্ট ক্রিয়েটর এবং সোশ্যাল মিডিয়া এক্সপার্ট। আপনার কাজ হলো \"{{topic}}\" টপিকের উপর একটি আকর্ষণীয় {{content_type}} তৈরি করা।

নিম্নোক্ত ফরম্যাটে আউটপুট দিন:

TITLE_START
[এখানে একটি শক্তিশালী ও মনোযোগ আকর্ষণকারী শিরোনাম লিখুন]
TITLE_END

BODY_START
{{requirements}}
BODY_END

IMAGE_IDEAS_START
[এখানে ৪-৬টি বিস্তারিত ইমেজ আইডিয়া দিন যা এই কনটেন্টের সাথে ব্যবহার করা যাবে। প্রতিটি আইডিয়া আলাদা লাইনে লিখুন]
IMAGE_IDEAS_END

গুরুত্বপূর্ণ নির্দেশনা:
- সব কন্টেন্ট বাংলায় লিখুন
- প্রচুর ইমোজি ব্যবহার করুন আকর্ষণীয় করতে
- পয়েন্ট আলাদা করতে বুলেট পয়েন্ট (• বা ✅) ব্যবহার করুন
- গুরুত্বপূর্ণ কথা **বোল্ড** করে লিখুন
- ভাইরাল হওয়ার জন্য হুক, কৌতূহল এবং ভ্যালু যোগ করুন
- বিস্তারিত তথ্য, উদাহরণ, পরিসংখ্যান এবং ব্যবহারিক টিপস দিন
";

/// Fills the prompt template with the topic, content-type label and a
/// per-type requirements clause. Missing counts fall back to defaults;
/// out-of-range counts are clamped. There is no failure path.
pub fn build_prompt(request: &GenerationRequest) -> String {
    let requirements = requirements_clause(request);
    PROMPT_TEMPLATE
        .replace("{{topic}}", request.topic.trim())
        .replace("{{content_type}}", request.content_type.bengali_label())
        .replace("{{requirements}}", &requirements)
}

fn requirements_clause(request: &GenerationRequest) -> String {
    match request.content_type {
        ContentType::EBook => {
            let pages = request
                .options
                .page_count
                .unwrap_or(DEFAULT_PAGE_COUNT)
                .clamp(MIN_PAGE_COUNT, MAX_PAGE_COUNT);
            format!(
                "[এখানে সম্পূর্ণ ই-বুকটি লিখুন। ঠিক {pages}টি অধ্যায় লিখুন এবং প্রতিটি অধ্যায় /// দিয়ে আলাদা করুন। প্রতিটি অধ্যায়ের শুরুতে # দিয়ে শিরোনাম দিন এবং প্রয়োজনে ## দিয়ে উপশিরোনাম ব্যবহার করুন]"
            )
        }
        ContentType::FacebookPost => {
            let words = clamped_word_count(request);
            format!(
                "[এখানে প্রায় {words} শব্দের একটি সম্পূর্ণ ফেসবুক পোস্ট লিখুন যা শেয়ার করার মতো আকর্ষণীয় হবে। শেষে প্রাসঙ্গিক হ্যাশট্যাগ দিন]"
            )
        }
        ContentType::InstagramPost => {
            let words = clamped_word_count(request);
            format!(
                "[এখানে প্রায় {words} শব্দের একটি আকর্ষণীয় ইনস্টাগ্রাম ক্যাপশন লিখুন। শেষে প্রাসঙ্গিক হ্যাশট্যাগ দিন]"
            )
        }
    }
}

fn clamped_word_count(request: &GenerationRequest) -> u32 {
    request
        .options
        .word_count
        .unwrap_or(DEFAULT_WORD_COUNT)
        .clamp(MIN_WORD_COUNT, MAX_WORD_COUNT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GenerationOptions;
    use pretty_assertions::assert_eq;

    fn request(content_type: ContentType, options: GenerationOptions) -> GenerationRequest {
        GenerationRequest {
            topic: "ডিজিটাল মার্কেটিং গাইড".to_string(),
            content_type,
            options,
        }
    }

    #[test]
    fn substitutes_topic_and_label() {
        let prompt = build_prompt(&request(ContentType::EBook, GenerationOptions::default()));
        assert!(prompt.contains("\"ডিজিটাল মার্কেটিং গাইড\""));
        assert!(prompt.contains("ই-বুক"));
        assert!(!prompt.contains("{{topic}}"));
        assert!(!prompt.contains("{{content_type}}"));
        assert!(!prompt.contains("{{requirements}}"));
    }

    #[test]
    fn ebook_uses_default_page_count() {
        let prompt = build_prompt(&request(ContentType::EBook, GenerationOptions::default()));
        assert!(prompt.contains("ঠিক 10টি অধ্যায়"));
        assert!(prompt.contains("///"));
    }

    #[test]
    fn post_uses_default_word_count() {
        let prompt = build_prompt(&request(
            ContentType::FacebookPost,
            GenerationOptions::default(),
        ));
        assert!(prompt.contains("প্রায় 500 শব্দের"));
    }

    #[test]
    fn page_count_is_clamped() {
        let prompt = build_prompt(&request(
            ContentType::EBook,
            GenerationOptions {
                page_count: Some(500),
                word_count: None,
            },
        ));
        assert!(prompt.contains("ঠিক 50টি অধ্যায়"));
    }

    #[test]
    fn word_count_is_clamped() {
        let prompt = build_prompt(&request(
            ContentType::InstagramPost,
            GenerationOptions {
                word_count: Some(7),
                page_count: None,
            },
        ));
        assert!(prompt.contains("প্রায় 100 শব্দের"));
    }

    #[test]
    fn template_carries_all_marker_pairs() {
        let prompt = build_prompt(&request(ContentType::FacebookPost, GenerationOptions::default()));
        for marker in [
            "TITLE_START",
            "TITLE_END",
            "BODY_START",
            "BODY_END",
            "IMAGE_IDEAS_START",
            "IMAGE_IDEAS_END",
        ] {
            assert!(prompt.contains(marker), "missing {marker}");
        }
    }
}
