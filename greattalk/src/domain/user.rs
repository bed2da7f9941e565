//! Raw user records and their side inputs.
//!
//! A [`RawUserData`] is the user document as received from the persistence
//! backend, pre-transformation. It is created on sign-up, mutated through the
//! repository's partial update, and never hard-deleted in normal flow:
//! suspension is a soft flag pair (`is_suspended` / `suspended_until`).
//!
//! ## Invariants (after sanitation)
//! - counters are non-negative;
//! - `uid` matches `^[A-Za-z0-9_-]{1,128}$`;
//! - `username` matches `^[A-Za-z0-9_]{3,30}$`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ports::Patchable;

/// Persisted user record as received from the backend.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUserData {
    /// Stable user identifier.
    pub uid: String,
    /// Unique handle chosen by the user.
    #[serde(default)]
    pub username: String,
    /// Free-form profile text.
    #[serde(default)]
    pub bio: String,
    /// Profile image URL; empty when the user has not set one.
    #[serde(default, rename = "photoURL")]
    pub photo_url: String,
    /// Number of accounts following this user.
    #[serde(default)]
    pub follower_count: i64,
    /// Number of accounts this user follows.
    #[serde(default)]
    pub following_count: i64,
    /// Number of posts this user has created.
    #[serde(default)]
    pub post_count: i64,
    /// Whether the account is an official one.
    #[serde(default)]
    pub is_official: bool,
    /// Whether the account is currently soft-suspended.
    #[serde(default)]
    pub is_suspended: bool,
    /// End of the suspension window, when one was recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspended_until: Option<DateTime<Utc>>,
    /// Instant the account was verified, if it was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<DateTime<Utc>>,
    /// Most recent login instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,
    /// Record creation instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Most recent record update instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Free-form backend metadata.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

/// Partial update for a [`RawUserData`] record.
///
/// Every field is optional; `None` leaves the stored value untouched. The
/// double-`Option` fields distinguish "leave as is" (`None`) from "clear the
/// stored value" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct RawUserPatch {
    /// Replace the handle.
    pub username: Option<String>,
    /// Replace the profile text.
    pub bio: Option<String>,
    /// Replace the profile image URL.
    pub photo_url: Option<String>,
    /// Replace the follower counter.
    pub follower_count: Option<i64>,
    /// Replace the following counter.
    pub following_count: Option<i64>,
    /// Replace the post counter.
    pub post_count: Option<i64>,
    /// Replace the official flag.
    pub is_official: Option<bool>,
    /// Replace the suspension flag.
    pub is_suspended: Option<bool>,
    /// Set or clear the suspension window end.
    pub suspended_until: Option<Option<DateTime<Utc>>>,
    /// Set or clear the verification instant.
    pub verified_at: Option<Option<DateTime<Utc>>>,
    /// Set or clear the most recent login instant.
    pub last_login_at: Option<Option<DateTime<Utc>>>,
    /// Replace the metadata map.
    pub metadata: Option<Map<String, Value>>,
}

impl Patchable for RawUserData {
    type Patch = RawUserPatch;

    fn apply_patch(&mut self, patch: &RawUserPatch) {
        if let Some(username) = &patch.username {
            self.username.clone_from(username);
        }
        if let Some(bio) = &patch.bio {
            self.bio.clone_from(bio);
        }
        if let Some(photo_url) = &patch.photo_url {
            self.photo_url.clone_from(photo_url);
        }
        if let Some(follower_count) = patch.follower_count {
            self.follower_count = follower_count;
        }
        if let Some(following_count) = patch.following_count {
            self.following_count = following_count;
        }
        if let Some(post_count) = patch.post_count {
            self.post_count = post_count;
        }
        if let Some(is_official) = patch.is_official {
            self.is_official = is_official;
        }
        if let Some(is_suspended) = patch.is_suspended {
            self.is_suspended = is_suspended;
        }
        if let Some(suspended_until) = patch.suspended_until {
            self.suspended_until = suspended_until;
        }
        if let Some(verified_at) = patch.verified_at {
            self.verified_at = verified_at;
        }
        if let Some(last_login_at) = patch.last_login_at {
            self.last_login_at = last_login_at;
        }
        if let Some(metadata) = &patch.metadata {
            self.metadata.clone_from(metadata);
        }
        self.updated_at = Some(Utc::now());
    }
}

/// Optional authentication side input merged during processing.
///
/// Not owned by this layer; supplied by the caller when available.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAuthData {
    /// Account email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Whether the email address has been verified.
    #[serde(default)]
    pub email_verified: bool,
    /// Most recent sign-in instant recorded by the auth system.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sign_in_at: Option<DateTime<Utc>>,
}
