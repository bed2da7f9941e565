//! Post-creation input, its enriched form, and the persisted post document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ports::Patchable;

/// Raw post-creation input supplied by the caller.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostData {
    /// Post title.
    pub title: String,
    /// Post body text.
    pub description: String,
    /// AI system prompt attached to the post.
    pub system_prompt: String,
    /// Base64 image payload picked by the user, when one was attached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picked_image: Option<String>,
}

/// Enriched post data derived from [`CreatePostData`].
///
/// ## Invariants
/// - the three text fields are the trimmed input fields;
/// - `word_count` counts the non-empty whitespace-delimited tokens of the
///   three trimmed fields joined by a single space;
/// - `estimated_reading_time` is `word_count` divided by the reading speed,
///   rounded up (0 for an empty post).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedPostData {
    /// Trimmed title.
    pub title: String,
    /// Trimmed body text.
    pub description: String,
    /// Trimmed system prompt.
    pub system_prompt: String,
    /// Image payload, passed through unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picked_image: Option<String>,
    /// Non-empty token count across the three text fields.
    pub word_count: u32,
    /// Estimated reading time in whole minutes.
    pub estimated_reading_time: u32,
    /// Whether the system prompt matches an advanced-prompting keyword.
    pub has_advanced_prompt: bool,
}

/// Persisted post document under `public/v1/users/{uid}/posts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    /// Stable post identifier.
    pub id: String,
    /// Identifier of the authoring user.
    pub author_uid: String,
    /// Post title.
    pub title: String,
    /// Post body text.
    pub description: String,
    /// AI system prompt attached to the post.
    pub system_prompt: String,
    /// Resolved image URL, when the post carries an image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Creation instant; listings order by this field, descending.
    pub created_at: DateTime<Utc>,
}

/// Partial update for a [`PostRecord`].
#[derive(Debug, Clone, Default)]
pub struct PostRecordPatch {
    /// Replace the title.
    pub title: Option<String>,
    /// Replace the body text.
    pub description: Option<String>,
    /// Replace the system prompt.
    pub system_prompt: Option<String>,
    /// Set or clear the image URL.
    pub image_url: Option<Option<String>>,
}

impl Patchable for PostRecord {
    type Patch = PostRecordPatch;

    fn apply_patch(&mut self, patch: &PostRecordPatch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(description) = &patch.description {
            self.description.clone_from(description);
        }
        if let Some(system_prompt) = &patch.system_prompt {
            self.system_prompt.clone_from(system_prompt);
        }
        if let Some(image_url) = &patch.image_url {
            self.image_url.clone_from(image_url);
        }
    }
}
