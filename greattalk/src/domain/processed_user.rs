//! Display-ready user view model.
//!
//! A [`ProcessedUser`] is computed fresh on every call from a raw record plus
//! optional auth and preference side inputs. It is never persisted and has no
//! identity beyond the source `uid`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::preferences::{PrivacySettings, ResolvedPreferences};

/// Ordered influence tiers derived from follower counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfluenceLevel {
    /// Fresh account with little activity.
    Newcomer,
    /// Established account.
    Regular,
    /// At least a thousand followers.
    Popular,
    /// At least ten thousand followers.
    Influencer,
    /// At least a hundred thousand followers.
    Celebrity,
}

impl InfluenceLevel {
    /// Returns the wire string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Newcomer => "newcomer",
            Self::Regular => "regular",
            Self::Popular => "popular",
            Self::Influencer => "influencer",
            Self::Celebrity => "celebrity",
        }
    }
}

impl fmt::Display for InfluenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown influence level string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseInfluenceLevelError {
    /// The unrecognised input value.
    pub input: String,
}

impl fmt::Display for ParseInfluenceLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown influence level: {}", self.input)
    }
}

impl std::error::Error for ParseInfluenceLevelError {}

impl FromStr for InfluenceLevel {
    type Err = ParseInfluenceLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newcomer" => Ok(Self::Newcomer),
            "regular" => Ok(Self::Regular),
            "popular" => Ok(Self::Popular),
            "influencer" => Ok(Self::Influencer),
            "celebrity" => Ok(Self::Celebrity),
            _ => Err(ParseInfluenceLevelError {
                input: s.to_owned(),
            }),
        }
    }
}

/// Provenance flags recording which optional side inputs were merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrichments {
    /// An auth record was supplied and merged.
    pub auth_merged: bool,
    /// A preference record was supplied and merged.
    pub preferences_merged: bool,
}

/// Profile image URL variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarSet {
    /// Resolved source URL (or the default placeholder path).
    pub original: String,
    /// 150px variant for profile listings.
    pub thumbnail: String,
    /// Low-quality 50px variant for progressive loading.
    pub placeholder: String,
}

/// Derived profile statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    /// Accounts following this user.
    pub follower_count: i64,
    /// Accounts this user follows.
    pub following_count: i64,
    /// Posts created by this user.
    pub post_count: i64,
    /// Capped percentage heuristic, not a real engagement metric.
    pub engagement_rate: f64,
    /// Weighted 0-100 activity score.
    pub activity_score: u8,
}

/// Suspension details, present only while an account is suspended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuspensionInfo {
    /// End of the suspension window.
    pub until: DateTime<Utc>,
    /// Placeholder reason; no real reason tracking exists upstream.
    pub reason: String,
    /// Suspensions are always appealable.
    pub appealable: bool,
}

/// Account status flags and suspension details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStatus {
    /// Official account flag.
    pub is_official: bool,
    /// Soft-suspension flag.
    pub is_suspended: bool,
    /// Verified through a verification timestamp or a verified email.
    pub is_verified: bool,
    /// Logged in within the online window.
    pub is_online: bool,
    /// Present only when the account is suspended.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspension: Option<SuspensionInfo>,
}

/// Social standing derived from counters and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialInfo {
    /// Influence tier.
    pub influence: InfluenceLevel,
    /// Account creation instant, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_since: Option<DateTime<Utc>>,
    /// Most recent activity instant from either the record or the auth input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_active_at: Option<DateTime<Utc>>,
}

/// Display-ready user view computed by the user processor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedUser {
    /// Source `uid`.
    pub id: String,
    /// Instant this view was computed.
    pub processed_at: DateTime<Utc>,
    /// Version tag of the processing rules that produced this view.
    pub data_version: String,
    /// Which optional side inputs contributed.
    pub enrichments: Enrichments,
    /// Name shown in the UI.
    pub display_name: String,
    /// Normalized profile text.
    pub bio: String,
    /// Profile image variants.
    pub avatar: AvatarSet,
    /// Derived statistics.
    pub stats: ProfileStats,
    /// Account status.
    pub status: AccountStatus,
    /// Social standing.
    pub social: SocialInfo,
    /// Preferences merged over defaults.
    pub preferences: ResolvedPreferences,
    /// Privacy settings merged over defaults.
    pub privacy: PrivacySettings,
}
