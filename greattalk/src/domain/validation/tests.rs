//! Regression coverage for user validation and sanitation.

use chrono::{TimeZone, Utc};
use rstest::rstest;
use serde_json::json;

use super::*;

fn valid_user() -> RawUserData {
    RawUserData {
        uid: "u_1234567890".to_owned(),
        username: "john_doe".to_owned(),
        bio: "Hello there".to_owned(),
        photo_url: "https://images.greattalk.example/users/u_1234567890".to_owned(),
        follower_count: 10,
        following_count: 20,
        post_count: 3,
        ..RawUserData::default()
    }
}

#[rstest]
fn valid_record_passes_with_no_errors_or_warnings() {
    let result = validate_user(&valid_user());
    assert!(result.is_valid(), "unexpected errors: {:?}", result.errors);
    assert!(result.warnings.is_empty());
}

#[rstest]
fn missing_uid_is_required_error() {
    let user = RawUserData {
        uid: String::new(),
        ..valid_user()
    };

    let result = validate_user(&user);
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e == "User ID is required"));
}

#[rstest]
#[case::too_short("ab")]
#[case::illegal_chars("john doe!")]
#[case::too_long("a_very_long_username_over_thirty_chars")]
fn malformed_username_is_format_error(#[case] username: &str) {
    let user = RawUserData {
        username: username.to_owned(),
        ..valid_user()
    };

    let result = validate_user(&user);
    assert!(result.errors.iter().any(|e| e.starts_with("Username must be")));
}

#[rstest]
fn negative_counter_is_an_error() {
    let user = RawUserData {
        follower_count: -1,
        ..valid_user()
    };

    let result = validate_user(&user);
    assert!(
        result
            .errors
            .iter()
            .any(|e| e == "Follower count cannot be negative")
    );
}

#[rstest]
fn rules_accumulate_without_short_circuiting() {
    let user = RawUserData {
        uid: String::new(),
        username: "ab".to_owned(),
        follower_count: -5,
        post_count: -2,
        ..valid_user()
    };

    let result = validate_user(&user);
    assert!(result.errors.len() >= 4, "errors: {:?}", result.errors);
}

#[rstest]
fn suspension_without_end_date_is_a_warning_not_an_error() {
    let user = RawUserData {
        is_suspended: true,
        suspended_until: None,
        ..valid_user()
    };

    let result = validate_user(&user);
    assert!(result.is_valid());
    assert!(
        result
            .warnings
            .iter()
            .any(|w| w.contains("suspended without"))
    );
}

#[rstest]
fn huge_follower_count_is_a_warning() {
    let user = RawUserData {
        follower_count: 2_000_000,
        ..valid_user()
    };

    let result = validate_user(&user);
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.contains("unusually high")));
}

#[rstest]
fn invalid_photo_url_is_an_error() {
    let user = RawUserData {
        photo_url: "not a url".to_owned(),
        ..valid_user()
    };

    let result = validate_user(&user);
    assert!(result.errors.iter().any(|e| e.contains("Photo URL")));
}

#[rstest]
fn malformed_metadata_email_is_an_error() {
    let mut user = valid_user();
    user.metadata
        .insert("email".to_owned(), json!("not-an-email"));

    let result = validate_user(&user);
    assert!(result.errors.iter().any(|e| e.contains("Email address")));
}

#[rstest]
fn oversized_bio_is_an_error() {
    let user = RawUserData {
        bio: "x".repeat(BIO_MAX_CHARS + 1),
        ..valid_user()
    };

    let result = validate_user(&user);
    assert!(result.errors.iter().any(|e| e.contains("Bio must be")));
}

#[rstest]
fn prehistoric_date_is_an_error() {
    let user = RawUserData {
        created_at: Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).single(),
        ..valid_user()
    };

    let result = validate_user(&user);
    assert!(result.errors.iter().any(|e| e.contains("createdAt")));
}

#[rstest]
fn sanitize_strips_script_blocks_from_bio() {
    let user = RawUserData {
        bio: "<script>alert(1)</script>Hello".to_owned(),
        ..valid_user()
    };

    assert_eq!(sanitize_user(user).bio, "Hello");
}

#[rstest]
fn sanitize_strips_remaining_html_tags() {
    let user = RawUserData {
        bio: "<b>bold</b> and <i>italic</i>".to_owned(),
        ..valid_user()
    };

    assert_eq!(sanitize_user(user).bio, "bold and italic");
}

#[rstest]
#[case::punctuation("John_Doe!", "john_doe")]
#[case::spaces("  Ada Lovelace  ", "adalovelace")]
#[case::already_clean("john_doe", "john_doe")]
fn sanitize_normalizes_usernames(#[case] input: &str, #[case] expected: &str) {
    let user = RawUserData {
        username: input.to_owned(),
        ..valid_user()
    };

    assert_eq!(sanitize_user(user).username, expected);
}

#[rstest]
fn sanitize_clamps_negative_counters() {
    let user = RawUserData {
        follower_count: -5,
        following_count: -1,
        post_count: -9,
        ..valid_user()
    };

    let clean = sanitize_user(user);
    assert_eq!(clean.follower_count, 0);
    assert_eq!(clean.following_count, 0);
    assert_eq!(clean.post_count, 0);
}

#[rstest]
fn sanitize_empties_invalid_urls() {
    let user = RawUserData {
        photo_url: "nonsense url".to_owned(),
        ..valid_user()
    };

    assert_eq!(sanitize_user(user).photo_url, "");
}

#[rstest]
fn sanitize_filters_metadata_to_primitives() {
    let mut user = valid_user();
    user.metadata.insert("email".to_owned(), json!("a@b.example"));
    user.metadata.insert("score".to_owned(), json!(42));
    user.metadata.insert("tags".to_owned(), json!(["a", "b"]));
    user.metadata.insert("nested".to_owned(), json!({ "x": 1 }));
    user.metadata.insert("deep".to_owned(), json!([["x"]]));
    user.metadata.insert("nothing".to_owned(), json!(null));

    let clean = sanitize_user(user);
    assert!(clean.metadata.contains_key("email"));
    assert!(clean.metadata.contains_key("score"));
    assert!(clean.metadata.contains_key("tags"));
    assert!(!clean.metadata.contains_key("nested"));
    assert!(!clean.metadata.contains_key("deep"));
    assert!(!clean.metadata.contains_key("nothing"));
}

#[rstest]
fn sanitize_is_idempotent() {
    let mut user = RawUserData {
        uid: "  u_1  ".to_owned(),
        username: "John_Doe!".to_owned(),
        bio: "<script>x()</script>Hi   there".to_owned(),
        photo_url: "https://images.greattalk.example/users/u_1".to_owned(),
        follower_count: -3,
        ..valid_user()
    };
    user.metadata.insert("nested".to_owned(), json!({ "x": 1 }));

    let once = sanitize_user(user);
    let twice = sanitize_user(once.clone());
    assert_eq!(once, twice);
}

#[rstest]
fn sanitize_may_be_followed_by_a_passing_validation() {
    let user = RawUserData {
        username: "John_Doe!".to_owned(),
        bio: "<script>alert(1)</script>Hello".to_owned(),
        follower_count: -1,
        ..valid_user()
    };

    let clean = sanitize_user(user);
    let result = validate_user(&clean);
    assert!(result.is_valid(), "errors: {:?}", result.errors);
}
