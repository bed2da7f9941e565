//! Post data enrichment.

use std::fmt;

use crate::domain::post::{CreatePostData, ProcessedPostData};

/// Assumed reading speed in words per minute.
pub const READING_WORDS_PER_MINUTE: u32 = 200;

/// System prompts shorter than this, without advanced keywords, draw a
/// warning.
pub const PROMPT_DETAIL_THRESHOLD: usize = 50;

/// Keywords marking a system prompt as using advanced prompting techniques.
///
/// Bilingual: the product ships to English and Japanese audiences.
const ADVANCED_PROMPT_KEYWORDS: &[&str] = &[
    "roleplay",
    "ロールプレイ",
    "persona",
    "character",
    "step-by-step",
    "ステップバイステップ",
    "chain of thought",
    "few-shot",
    "example",
    "例",
    "具体例",
];

/// Non-blocking quality observations about a processed post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostQualityWarning {
    /// Fewer than ten words across the text fields.
    ContentTooShort,
    /// More than a thousand words across the text fields.
    ContentTooLong,
    /// Short system prompt with no advanced keyword.
    PromptLacksDetail,
}

impl fmt::Display for PostQualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContentTooShort => f.write_str("content is too short"),
            Self::ContentTooLong => f.write_str("content is too long"),
            Self::PromptLacksDetail => {
                f.write_str("consider providing a more detailed system prompt")
            }
        }
    }
}

/// Derive the enriched form of raw post-creation input.
///
/// Pure: trims the text fields, counts words, estimates reading time, and
/// flags advanced prompting keywords.
#[must_use]
pub fn process_post_data(input: &CreatePostData) -> ProcessedPostData {
    let title = input.title.trim().to_owned();
    let description = input.description.trim().to_owned();
    let system_prompt = input.system_prompt.trim().to_owned();

    let word_count = count_words(&[&title, &description, &system_prompt]);

    ProcessedPostData {
        has_advanced_prompt: has_advanced_prompt(&system_prompt),
        estimated_reading_time: word_count.div_ceil(READING_WORDS_PER_MINUTE),
        word_count,
        title,
        description,
        system_prompt,
        picked_image: input.picked_image.clone(),
    }
}

/// Collect quality warnings for a processed post.
///
/// Warnings are independent and non-exclusive; every applicable warning is
/// returned.
#[must_use]
pub fn quality_warnings(processed: &ProcessedPostData) -> Vec<PostQualityWarning> {
    let mut warnings = Vec::new();

    if processed.word_count < 10 {
        warnings.push(PostQualityWarning::ContentTooShort);
    }
    if processed.word_count > 1000 {
        warnings.push(PostQualityWarning::ContentTooLong);
    }
    if !processed.has_advanced_prompt
        && processed.system_prompt.chars().count() < PROMPT_DETAIL_THRESHOLD
    {
        warnings.push(PostQualityWarning::PromptLacksDetail);
    }

    warnings
}

fn count_words(fields: &[&str]) -> u32 {
    let joined = fields.join(" ");
    u32::try_from(joined.split_whitespace().count()).unwrap_or(u32::MAX)
}

fn has_advanced_prompt(system_prompt: &str) -> bool {
    let lowered = system_prompt.to_lowercase();
    ADVANCED_PROMPT_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}
