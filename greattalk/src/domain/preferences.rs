//! Preference and privacy settings with their fixed defaults.
//!
//! The processor receives an optional, sparsely populated
//! [`RawUserPreferences`] record and merges it over the defaults: any field
//! explicitly present overrides its default, absent fields fall back.

use serde::{Deserialize, Serialize};

/// UI colour theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    /// Light theme.
    Light,
    /// Dark theme.
    Dark,
    /// Follow the operating system setting.
    #[default]
    System,
}

impl Theme {
    /// Returns the wire string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }
}

/// Delivery cadence for notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NotificationFrequency {
    /// Deliver as events happen.
    #[default]
    Immediate,
    /// Batch hourly.
    Hourly,
    /// Batch daily.
    Daily,
}

/// Who can see a user's profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProfileVisibility {
    /// Visible to everyone.
    #[default]
    Public,
    /// Visible to followers only.
    FollowersOnly,
    /// Hidden from everyone but the owner.
    Private,
}

/// Resolved notification settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    /// Master toggle.
    pub enabled: bool,
    /// Delivery cadence.
    pub frequency: NotificationFrequency,
    /// Notify on likes.
    pub likes: bool,
    /// Notify on comments.
    pub comments: bool,
    /// Notify on new followers.
    pub follows: bool,
    /// Notify on mentions.
    pub mentions: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            frequency: NotificationFrequency::Immediate,
            likes: true,
            comments: true,
            follows: true,
            mentions: true,
        }
    }
}

/// Resolved display preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPreferences {
    /// UI theme.
    pub theme: Theme,
    /// BCP 47 language tag.
    pub language: String,
    /// Notification settings.
    pub notifications: NotificationSettings,
}

impl Default for ResolvedPreferences {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            language: "en".to_owned(),
            notifications: NotificationSettings::default(),
        }
    }
}

/// Resolved privacy settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacySettings {
    /// Profile visibility.
    pub visibility: ProfileVisibility,
    /// Whether the online indicator is shown to others.
    pub show_online_status: bool,
    /// Whether other users may open a direct message.
    pub allow_direct_messages: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            visibility: ProfileVisibility::Public,
            show_online_status: true,
            allow_direct_messages: true,
        }
    }
}

/// Optional preference side input, as stored by the backend.
///
/// Every field is optional; not owned by this layer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUserPreferences {
    /// Selected theme.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    /// Selected language tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Notification master toggle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications_enabled: Option<bool>,
    /// Notification cadence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_frequency: Option<NotificationFrequency>,
    /// Notify on likes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_likes: Option<bool>,
    /// Notify on comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_comments: Option<bool>,
    /// Notify on new followers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_follows: Option<bool>,
    /// Notify on mentions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_mentions: Option<bool>,
    /// Profile visibility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<ProfileVisibility>,
    /// Show the online indicator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_online_status: Option<bool>,
    /// Allow direct messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_direct_messages: Option<bool>,
}

impl ResolvedPreferences {
    /// Merge an optional raw preference record over the defaults.
    #[must_use]
    pub fn merge(raw: Option<&RawUserPreferences>) -> Self {
        let defaults = Self::default();
        let Some(raw) = raw else {
            return defaults;
        };

        Self {
            theme: raw.theme.unwrap_or(defaults.theme),
            language: raw.language.clone().unwrap_or(defaults.language),
            notifications: NotificationSettings {
                enabled: raw
                    .notifications_enabled
                    .unwrap_or(defaults.notifications.enabled),
                frequency: raw
                    .notification_frequency
                    .unwrap_or(defaults.notifications.frequency),
                likes: raw.notify_likes.unwrap_or(defaults.notifications.likes),
                comments: raw
                    .notify_comments
                    .unwrap_or(defaults.notifications.comments),
                follows: raw.notify_follows.unwrap_or(defaults.notifications.follows),
                mentions: raw
                    .notify_mentions
                    .unwrap_or(defaults.notifications.mentions),
            },
        }
    }
}

impl PrivacySettings {
    /// Merge an optional raw preference record over the defaults.
    #[must_use]
    pub fn merge(raw: Option<&RawUserPreferences>) -> Self {
        let defaults = Self::default();
        let Some(raw) = raw else {
            return defaults;
        };

        Self {
            visibility: raw.visibility.unwrap_or(defaults.visibility),
            show_online_status: raw
                .show_online_status
                .unwrap_or(defaults.show_online_status),
            allow_direct_messages: raw
                .allow_direct_messages
                .unwrap_or(defaults.allow_direct_messages),
        }
    }
}
