//! Validation and sanitation of raw user records.
//!
//! [`validate_user`] evaluates every rule independently (no short-circuit)
//! and returns a structured result; it never fails. [`sanitize_user`] is
//! independent of validation, may be called on invalid data, is pure, and is
//! idempotent: sanitizing twice yields the same record as sanitizing once.

use std::sync::OnceLock;

use chrono::{DateTime, Datelike, Duration, Utc};
use regex::Regex;
use serde_json::{Map, Value};
use url::Url;

use super::user::RawUserData;

/// Maximum allowed bio length in characters.
pub const BIO_MAX_CHARS: usize = 500;

/// Follower count above which a warning is raised.
pub const FOLLOWER_WARNING_THRESHOLD: i64 = 1_000_000;

/// Outcome of validating a raw record.
///
/// ## Invariants
/// - the record is valid if and only if `errors` is empty;
/// - warnings never block validity.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationResult {
    /// Human-readable rule violations.
    pub errors: Vec<String>,
    /// Non-blocking observations.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// True when no rule produced an error.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

fn uid_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new("^[A-Za-z0-9_-]{1,128}$")
            .unwrap_or_else(|error| panic!("uid regex failed to compile: {error}"))
    })
}

fn username_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new("^[A-Za-z0-9_]{3,30}$")
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Deliberately loose; the auth system owns real address verification.
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

fn script_block_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<script\b[^>]*>.*?</script>")
            .unwrap_or_else(|error| panic!("script regex failed to compile: {error}"))
    })
}

fn html_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new("</?[^>]+>")
            .unwrap_or_else(|error| panic!("tag regex failed to compile: {error}"))
    })
}

fn inner_whitespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Collapses space/tab runs but preserves line structure.
        Regex::new("[ \\t]{2,}")
            .unwrap_or_else(|error| panic!("whitespace regex failed to compile: {error}"))
    })
}

/// Validate a raw user record against every rule.
///
/// Rules are independent: a record can accumulate one error per failed rule.
#[must_use]
pub fn validate_user(data: &RawUserData) -> ValidationResult {
    let mut result = ValidationResult::default();

    check_required(data, &mut result.errors);
    check_formats(data, &mut result.errors);
    check_counters(data, &mut result.errors);
    check_dates(data, &mut result.errors);
    collect_warnings(data, &mut result.warnings);

    result
}

fn check_required(data: &RawUserData, errors: &mut Vec<String>) {
    if data.uid.is_empty() {
        errors.push("User ID is required".to_owned());
    }
    if data.username.is_empty() {
        errors.push("Username is required".to_owned());
    }
}

fn check_formats(data: &RawUserData, errors: &mut Vec<String>) {
    if !data.uid.is_empty() && !uid_regex().is_match(&data.uid) {
        errors.push("User ID has an invalid format".to_owned());
    }
    if !data.username.is_empty() && !username_regex().is_match(&data.username) {
        errors.push(
            "Username must be 3-30 characters of letters, numbers, or underscores".to_owned(),
        );
    }
    if data.bio.chars().count() > BIO_MAX_CHARS {
        errors.push(format!("Bio must be at most {BIO_MAX_CHARS} characters"));
    }
    if !data.photo_url.is_empty() && Url::parse(&data.photo_url).is_err() {
        errors.push("Photo URL is not a valid URL".to_owned());
    }
    if let Some(email) = data.metadata.get("email").and_then(Value::as_str) {
        if !email_regex().is_match(email) {
            errors.push("Email address is not well-formed".to_owned());
        }
    }
}

fn check_counters(data: &RawUserData, errors: &mut Vec<String>) {
    let counters = [
        ("Follower count", data.follower_count),
        ("Following count", data.following_count),
        ("Post count", data.post_count),
    ];
    for (label, value) in counters {
        if value < 0 {
            errors.push(format!("{label} cannot be negative"));
        }
    }
}

fn check_dates(data: &RawUserData, errors: &mut Vec<String>) {
    let dates = [
        ("createdAt", data.created_at),
        ("updatedAt", data.updated_at),
        ("suspendedUntil", data.suspended_until),
    ];
    for (label, value) in dates {
        if value.is_some_and(|timestamp| !date_in_sane_range(timestamp)) {
            errors.push(format!("{label} is not a valid date"));
        }
    }
}

fn collect_warnings(data: &RawUserData, warnings: &mut Vec<String>) {
    if data.follower_count > FOLLOWER_WARNING_THRESHOLD {
        warnings.push("Follower count is unusually high".to_owned());
    }
    if data.is_suspended && data.suspended_until.is_none() {
        warnings.push("Account is suspended without a suspension end date".to_owned());
    }
}

// Typed timestamps always parse; the rendition of "is this a real date" on
// loosely-typed input is a sane-range check instead.
fn date_in_sane_range(timestamp: DateTime<Utc>) -> bool {
    timestamp.year() >= 2000 && timestamp <= Utc::now() + Duration::days(36_525)
}

/// Sanitize a raw user record.
///
/// Independent of [`validate_user`] and safe to call on invalid data:
/// - trims and collapses inner space/tab runs in free-text fields;
/// - lowercases the username and strips everything outside `[a-z0-9_]`;
/// - strips `<script>` blocks (with their content) and remaining HTML tags
///   from the bio;
/// - re-parses and re-serializes the photo URL (invalid URL becomes empty);
/// - clamps counters to zero or above;
/// - filters metadata down to primitive values and arrays of primitives.
#[must_use]
pub fn sanitize_user(data: RawUserData) -> RawUserData {
    RawUserData {
        uid: data.uid.trim().to_owned(),
        username: sanitize_username(&data.username),
        bio: sanitize_bio(&data.bio),
        photo_url: sanitize_url(&data.photo_url),
        follower_count: data.follower_count.max(0),
        following_count: data.following_count.max(0),
        post_count: data.post_count.max(0),
        metadata: sanitize_metadata(data.metadata),
        ..data
    }
}

fn sanitize_username(username: &str) -> String {
    username
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect()
}

fn sanitize_bio(bio: &str) -> String {
    let without_scripts = script_block_regex().replace_all(bio, "");
    let without_tags = html_tag_regex().replace_all(&without_scripts, "");
    let collapsed = inner_whitespace_regex().replace_all(&without_tags, " ");
    collapsed.trim().to_owned()
}

fn sanitize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    Url::parse(trimmed).map_or_else(|_| String::new(), |url| url.to_string())
}

fn is_primitive(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
}

fn sanitize_metadata(metadata: Map<String, Value>) -> Map<String, Value> {
    metadata
        .into_iter()
        .filter(|(_, value)| match value {
            Value::Array(items) => items.iter().all(is_primitive),
            other => is_primitive(other),
        })
        .collect()
}

#[cfg(test)]
mod tests;
