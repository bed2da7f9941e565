//! Regression coverage for user data enrichment.

use chrono::TimeZone;
use rstest::rstest;

use crate::domain::preferences::{ProfileVisibility, Theme};

use super::*;

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0)
        .single()
        .expect("valid fixture instant")
}

fn raw_user(uid: &str, username: &str) -> RawUserData {
    RawUserData {
        uid: uid.to_owned(),
        username: username.to_owned(),
        ..RawUserData::default()
    }
}

fn process(raw: &RawUserData) -> ProcessedUser {
    process_user_data_at(raw, None, None, fixed_now())
}

#[rstest]
fn display_name_capitalizes_the_username() {
    let processed = process(&raw_user("u1", "ada_lovelace"));
    assert_eq!(processed.display_name, "Ada_lovelace");
}

#[rstest]
fn display_name_falls_back_to_uid_suffix() {
    let processed = process(&raw_user("user_abcdef123456", ""));
    assert_eq!(processed.display_name, "User123456");
}

#[rstest]
fn display_name_fallback_handles_short_uids() {
    let processed = process(&raw_user("u1", ""));
    assert_eq!(processed.display_name, "Useru1");
}

#[rstest]
#[case::empty("")]
#[case::whitespace("   \n ")]
fn blank_bio_becomes_the_placeholder(#[case] bio: &str) {
    let user = RawUserData {
        bio: bio.to_owned(),
        ..raw_user("u1", "ada")
    };

    assert_eq!(process(&user).bio, EMPTY_BIO_PLACEHOLDER);
}

#[rstest]
fn bio_collapses_excess_newlines_to_two() {
    let user = RawUserData {
        bio: "line one\n\n\n\n\nline two".to_owned(),
        ..raw_user("u1", "ada")
    };

    assert_eq!(process(&user).bio, "line one\n\nline two");
}

#[rstest]
fn bio_keeps_double_newlines() {
    let user = RawUserData {
        bio: "line one\n\nline two".to_owned(),
        ..raw_user("u1", "ada")
    };

    assert_eq!(process(&user).bio, "line one\n\nline two");
}

#[rstest]
fn bio_truncates_to_the_display_limit() {
    let user = RawUserData {
        bio: "x".repeat(BIO_DISPLAY_MAX_CHARS + 100),
        ..raw_user("u1", "ada")
    };

    assert_eq!(process(&user).bio.chars().count(), BIO_DISPLAY_MAX_CHARS);
}

#[rstest]
fn missing_photo_yields_default_avatar_variants() {
    let processed = process(&raw_user("u1", "ada"));

    assert_eq!(processed.avatar.original, DEFAULT_AVATAR_PATH);
    // Default avatars skip the thumbnail suffix but keep the placeholder one.
    assert_eq!(processed.avatar.thumbnail, DEFAULT_AVATAR_PATH);
    assert_eq!(
        processed.avatar.placeholder,
        format!("{DEFAULT_AVATAR_PATH}?size=50&quality=10")
    );
}

#[rstest]
fn photo_url_gets_sizing_variants() {
    let user = RawUserData {
        photo_url: "https://images.greattalk.example/users/u1".to_owned(),
        ..raw_user("u1", "ada")
    };

    let avatar = process(&user).avatar;
    assert_eq!(
        avatar.thumbnail,
        "https://images.greattalk.example/users/u1?size=150"
    );
    assert_eq!(
        avatar.placeholder,
        "https://images.greattalk.example/users/u1?size=50&quality=10"
    );
}

#[rstest]
fn zero_followers_means_zero_engagement() {
    let user = RawUserData {
        post_count: 50,
        follower_count: 0,
        ..raw_user("u1", "ada")
    };

    let stats = process(&user).stats;
    assert!((stats.engagement_rate - 0.0).abs() < f64::EPSILON);
}

#[rstest]
#[case::modest(5, 1000, 5.0)]
#[case::busy(10, 200, 50.0)]
#[case::capped(500, 100, 100.0)]
fn engagement_rate_is_the_capped_heuristic(
    #[case] posts: i64,
    #[case] followers: i64,
    #[case] expected: f64,
) {
    let user = RawUserData {
        post_count: posts,
        follower_count: followers,
        ..raw_user("u1", "ada")
    };

    let stats = process(&user).stats;
    assert!((stats.engagement_rate - expected).abs() < 1e-9);
}

#[rstest]
fn recent_login_counts_as_online() {
    let user = RawUserData {
        last_login_at: Some(fixed_now() - Duration::minutes(2)),
        ..raw_user("u1", "ada")
    };

    assert!(process(&user).status.is_online);
}

#[rstest]
fn stale_login_is_offline() {
    let user = RawUserData {
        last_login_at: Some(fixed_now() - Duration::minutes(6)),
        ..raw_user("u1", "ada")
    };

    assert!(!process(&user).status.is_online);
}

#[rstest]
fn never_logged_in_is_never_online() {
    assert!(!process(&raw_user("u1", "ada")).status.is_online);
}

#[rstest]
fn unsuspended_accounts_carry_no_suspension_info() {
    assert!(process(&raw_user("u1", "ada")).status.suspension.is_none());
}

#[rstest]
fn suspension_without_end_date_defaults_to_a_week() {
    let user = RawUserData {
        is_suspended: true,
        ..raw_user("u1", "ada")
    };

    let suspension = process(&user)
        .status
        .suspension
        .expect("suspended account carries info");
    assert_eq!(suspension.until, fixed_now() + Duration::days(7));
    assert!(suspension.appealable);
    assert_eq!(suspension.reason, SUSPENSION_REASON_PLACEHOLDER);
}

#[rstest]
fn recorded_suspension_end_is_preserved() {
    let until = fixed_now() + Duration::days(3);
    let user = RawUserData {
        is_suspended: true,
        suspended_until: Some(until),
        ..raw_user("u1", "ada")
    };

    let suspension = process(&user)
        .status
        .suspension
        .expect("suspended account carries info");
    assert_eq!(suspension.until, until);
}

#[rstest]
fn dormant_account_scores_zero_activity() {
    let processed = process(&raw_user("u1", "ada"));
    assert_eq!(processed.stats.activity_score, 0);
}

#[rstest]
fn saturated_account_scores_full_activity() {
    let user = RawUserData {
        post_count: 100,
        follower_count: 1000,
        following_count: 500,
        last_login_at: Some(fixed_now() - Duration::hours(2)),
        ..raw_user("u1", "ada")
    };

    assert_eq!(process(&user).stats.activity_score, 100);
}

#[rstest]
fn activity_score_weights_each_component() {
    // Half the post scale, no followers/following, logged in 3 days ago:
    // 0.5 * 30 + 0.8 * 30 = 39.
    let user = RawUserData {
        post_count: 50,
        last_login_at: Some(fixed_now() - Duration::days(3)),
        ..raw_user("u1", "ada")
    };

    assert_eq!(process(&user).stats.activity_score, 39);
}

#[rstest]
#[case::fresh(0, 1.0)]
#[case::yesterday(1, 1.0)]
#[case::this_week(7, 0.8)]
#[case::this_month(30, 0.5)]
#[case::this_quarter(90, 0.2)]
#[case::long_gone(180, 0.0)]
fn recency_step_function(#[case] days: i64, #[case] factor: f64) {
    let user = RawUserData {
        last_login_at: Some(fixed_now() - Duration::days(days)),
        ..raw_user("u1", "ada")
    };

    let expected = (factor * 30.0).round();
    assert_eq!(f64::from(process(&user).stats.activity_score), expected);
}

#[rstest]
#[case::newcomer(0, 0, InfluenceLevel::Newcomer)]
#[case::regular_by_followers(100, 0, InfluenceLevel::Regular)]
#[case::regular_by_posts(0, 10, InfluenceLevel::Regular)]
#[case::popular(1_000, 0, InfluenceLevel::Popular)]
#[case::influencer(10_000, 0, InfluenceLevel::Influencer)]
#[case::celebrity(100_000, 0, InfluenceLevel::Celebrity)]
#[case::just_below_popular(999, 0, InfluenceLevel::Regular)]
fn influence_tiers_match_first_threshold(
    #[case] followers: i64,
    #[case] posts: i64,
    #[case] expected: InfluenceLevel,
) {
    let user = RawUserData {
        follower_count: followers,
        post_count: posts,
        ..raw_user("u1", "ada")
    };

    assert_eq!(process(&user).social.influence, expected);
}

#[rstest]
fn verification_comes_from_record_or_auth() {
    let verified_record = RawUserData {
        verified_at: Some(fixed_now() - Duration::days(30)),
        ..raw_user("u1", "ada")
    };
    assert!(process(&verified_record).status.is_verified);

    let auth = RawAuthData {
        email: Some("ada@greattalk.example".to_owned()),
        email_verified: true,
        last_sign_in_at: None,
    };
    let plain = raw_user("u1", "ada");
    let processed = process_user_data_at(&plain, Some(&auth), None, fixed_now());
    assert!(processed.status.is_verified);
    assert!(processed.enrichments.auth_merged);

    assert!(!process(&plain).status.is_verified);
}

#[rstest]
fn preferences_merge_over_defaults() {
    let prefs = RawUserPreferences {
        theme: Some(Theme::Dark),
        visibility: Some(ProfileVisibility::FollowersOnly),
        ..RawUserPreferences::default()
    };

    let raw = raw_user("u1", "ada");
    let processed = process_user_data_at(&raw, None, Some(&prefs), fixed_now());

    assert!(processed.enrichments.preferences_merged);
    assert_eq!(processed.preferences.theme, Theme::Dark);
    assert_eq!(processed.preferences.language, "en");
    assert_eq!(processed.privacy.visibility, ProfileVisibility::FollowersOnly);
    assert!(processed.privacy.allow_direct_messages);
}

#[rstest]
fn last_active_takes_the_latest_of_record_and_auth() {
    let record_login = fixed_now() - Duration::days(2);
    let auth_login = fixed_now() - Duration::days(1);
    let user = RawUserData {
        last_login_at: Some(record_login),
        ..raw_user("u1", "ada")
    };
    let auth = RawAuthData {
        last_sign_in_at: Some(auth_login),
        ..RawAuthData::default()
    };

    let processed = process_user_data_at(&user, Some(&auth), None, fixed_now());
    assert_eq!(processed.social.last_active_at, Some(auth_login));
}

#[rstest]
fn batch_processing_matches_side_inputs_by_uid() {
    let users = vec![raw_user("u1", "ada"), raw_user("u2", "grace")];
    let mut auth = HashMap::new();
    auth.insert(
        "u2".to_owned(),
        RawAuthData {
            email_verified: true,
            ..RawAuthData::default()
        },
    );
    let prefs = HashMap::new();

    let processed = process_batch_user_data(&users, &auth, &prefs);

    let [first, second] = processed.as_slice() else {
        panic!("expected two processed users, got {}", processed.len());
    };
    assert!(!first.enrichments.auth_merged);
    assert!(second.enrichments.auth_merged);
    assert!(second.status.is_verified);
}

#[rstest]
fn view_carries_identity_and_version() {
    let processed = process(&raw_user("u42", "ada"));

    assert_eq!(processed.id, "u42");
    assert_eq!(processed.data_version, DATA_VERSION);
    assert_eq!(processed.processed_at, fixed_now());
}
