//! User data enrichment.
//!
//! Transforms a raw user record, plus optional auth and preference side
//! inputs, into a display-ready [`ProcessedUser`]. All derivations are pure;
//! the callable surface also offers `_at` variants taking an explicit
//! evaluation instant so tests can pin time-dependent fields.

use std::collections::HashMap;
use std::sync::OnceLock;

use chrono::{DateTime, Duration, Utc};
use regex::Regex;

use crate::domain::preferences::{PrivacySettings, RawUserPreferences, ResolvedPreferences};
use crate::domain::processed_user::{
    AccountStatus, AvatarSet, Enrichments, InfluenceLevel, ProcessedUser, ProfileStats,
    SocialInfo, SuspensionInfo,
};
use crate::domain::user::{RawAuthData, RawUserData};

/// Version tag of the processing rules.
pub const DATA_VERSION: &str = "1.0";

/// Placeholder avatar used when a user has no profile image.
pub const DEFAULT_AVATAR_PATH: &str = "/images/default-avatar.png";

/// Bio shown when the record has none.
pub const EMPTY_BIO_PLACEHOLDER: &str = "No bio available";

/// Maximum displayed bio length in characters.
pub const BIO_DISPLAY_MAX_CHARS: usize = 500;

/// Placeholder suspension reason; no real reason tracking exists upstream.
pub const SUSPENSION_REASON_PLACEHOLDER: &str = "Terms of service violation";

/// Minutes since last login within which a user counts as online.
const ONLINE_WINDOW_MINUTES: i64 = 5;

/// Days a suspension runs for when no end date was recorded.
const DEFAULT_SUSPENSION_DAYS: i64 = 7;

/// Process a raw user record into its display-ready view.
///
/// Never fails; missing optional input degrades to computed defaults.
#[must_use]
pub fn process_user_data(
    raw: &RawUserData,
    auth: Option<&RawAuthData>,
    preferences: Option<&RawUserPreferences>,
) -> ProcessedUser {
    process_user_data_at(raw, auth, preferences, Utc::now())
}

/// [`process_user_data`] with an explicit evaluation instant.
#[must_use]
pub fn process_user_data_at(
    raw: &RawUserData,
    auth: Option<&RawAuthData>,
    preferences: Option<&RawUserPreferences>,
    now: DateTime<Utc>,
) -> ProcessedUser {
    ProcessedUser {
        id: raw.uid.clone(),
        processed_at: now,
        data_version: DATA_VERSION.to_owned(),
        enrichments: Enrichments {
            auth_merged: auth.is_some(),
            preferences_merged: preferences.is_some(),
        },
        display_name: display_name(raw),
        bio: normalize_bio(&raw.bio),
        avatar: avatar_set(&raw.photo_url),
        stats: ProfileStats {
            follower_count: raw.follower_count,
            following_count: raw.following_count,
            post_count: raw.post_count,
            engagement_rate: engagement_rate(raw.post_count, raw.follower_count),
            activity_score: activity_score(raw, now),
        },
        status: AccountStatus {
            is_official: raw.is_official,
            is_suspended: raw.is_suspended,
            is_verified: is_verified(raw, auth),
            is_online: is_online(raw.last_login_at, now),
            suspension: suspension_info(raw, now),
        },
        social: SocialInfo {
            influence: influence_level(raw.follower_count, raw.post_count),
            member_since: raw.created_at,
            last_active_at: last_active_at(raw, auth),
        },
        preferences: ResolvedPreferences::merge(preferences),
        privacy: PrivacySettings::merge(preferences),
    }
}

/// Process a batch of raw records, looking up side inputs by `uid`.
#[must_use]
pub fn process_batch_user_data(
    raws: &[RawUserData],
    auth: &HashMap<String, RawAuthData>,
    preferences: &HashMap<String, RawUserPreferences>,
) -> Vec<ProcessedUser> {
    let now = Utc::now();
    raws.iter()
        .map(|raw| {
            process_user_data_at(raw, auth.get(&raw.uid), preferences.get(&raw.uid), now)
        })
        .collect()
}

fn display_name(raw: &RawUserData) -> String {
    let username = raw.username.trim();
    if username.is_empty() {
        let suffix: String = {
            let chars: Vec<char> = raw.uid.chars().collect();
            chars.iter().rev().take(6).rev().collect()
        };
        return format!("User{suffix}");
    }

    let mut chars = username.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn excess_newlines_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new("\n{3,}")
            .unwrap_or_else(|error| panic!("newline regex failed to compile: {error}"))
    })
}

fn normalize_bio(bio: &str) -> String {
    let trimmed = bio.trim();
    if trimmed.is_empty() {
        return EMPTY_BIO_PLACEHOLDER.to_owned();
    }

    let collapsed = excess_newlines_regex().replace_all(trimmed, "\n\n");
    collapsed.chars().take(BIO_DISPLAY_MAX_CHARS).collect()
}

fn avatar_set(photo_url: &str) -> AvatarSet {
    let original = if photo_url.is_empty() {
        DEFAULT_AVATAR_PATH.to_owned()
    } else {
        photo_url.to_owned()
    };

    // Default avatars are served as-is; sizing suffixes would break them.
    let thumbnail = if original.contains("default-avatar") {
        original.clone()
    } else {
        format!("{original}?size=150")
    };
    let placeholder = format!("{original}?size=50&quality=10");

    AvatarSet {
        original,
        thumbnail,
        placeholder,
    }
}

fn engagement_rate(post_count: i64, follower_count: i64) -> f64 {
    if follower_count <= 0 {
        return 0.0;
    }
    let rate = (post_count * 10) as f64 / follower_count as f64 * 100.0;
    rate.min(100.0)
}

fn is_online(last_login_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    last_login_at.is_some_and(|login| {
        let elapsed = now.signed_duration_since(login);
        elapsed >= Duration::zero() && elapsed < Duration::minutes(ONLINE_WINDOW_MINUTES)
    })
}

fn is_verified(raw: &RawUserData, auth: Option<&RawAuthData>) -> bool {
    raw.verified_at.is_some() || auth.is_some_and(|a| a.email_verified)
}

fn suspension_info(raw: &RawUserData, now: DateTime<Utc>) -> Option<SuspensionInfo> {
    if !raw.is_suspended {
        return None;
    }

    Some(SuspensionInfo {
        until: raw
            .suspended_until
            .unwrap_or_else(|| now + Duration::days(DEFAULT_SUSPENSION_DAYS)),
        reason: SUSPENSION_REASON_PLACEHOLDER.to_owned(),
        appealable: true,
    })
}

fn last_active_at(raw: &RawUserData, auth: Option<&RawAuthData>) -> Option<DateTime<Utc>> {
    let auth_instant = auth.and_then(|a| a.last_sign_in_at);
    match (raw.last_login_at, auth_instant) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (instant, None) | (None, instant) => instant,
    }
}

fn activity_score(raw: &RawUserData, now: DateTime<Utc>) -> u8 {
    let posts = capped_ratio(raw.post_count, 100) * 30.0;
    let followers = capped_ratio(raw.follower_count, 1000) * 25.0;
    let following = capped_ratio(raw.following_count, 500) * 15.0;
    let recency = raw
        .last_login_at
        .map_or(0.0, |login| recency_factor(days_since(login, now)))
        * 30.0;

    let score = (posts + followers + following + recency).round().clamp(0.0, 100.0);
    score as u8
}

fn capped_ratio(value: i64, scale: i64) -> f64 {
    (value.max(0) as f64 / scale as f64).min(1.0)
}

fn days_since(instant: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    now.signed_duration_since(instant).num_days().max(0)
}

fn recency_factor(days: i64) -> f64 {
    match days {
        0..=1 => 1.0,
        2..=7 => 0.8,
        8..=30 => 0.5,
        31..=90 => 0.2,
        _ => 0.0,
    }
}

/// First matching influence tier wins.
fn influence_level(follower_count: i64, post_count: i64) -> InfluenceLevel {
    if follower_count >= 100_000 {
        InfluenceLevel::Celebrity
    } else if follower_count >= 10_000 {
        InfluenceLevel::Influencer
    } else if follower_count >= 1_000 {
        InfluenceLevel::Popular
    } else if follower_count >= 100 || post_count >= 10 {
        InfluenceLevel::Regular
    } else {
        InfluenceLevel::Newcomer
    }
}

#[cfg(test)]
mod tests;
