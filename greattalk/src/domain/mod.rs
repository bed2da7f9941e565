//! Domain primitives, processors, and ports.
//!
//! Purpose: define the raw records persisted for GreatTalk users and posts,
//! the derived read-only views computed from them, the validation and
//! sanitation rules applied before persistence, and the port traits that
//! outbound adapters bind. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - `RawUserData` / `RawUserPatch` — persisted user record and partial update.
//! - `ProcessedUser` — display-ready view computed by the user processor.
//! - `CreatePostData` / `ProcessedPostData` — post-creation input and its
//!   enriched form.
//! - `RepositoryError` — the closed error taxonomy surfaced by repositories.
//! - `RawDataEnvelope` — payload wrapper carrying provenance and timestamp.

pub mod collections;
pub mod envelope;
pub mod error;
pub mod ports;
pub mod post;
pub mod preferences;
pub mod processed_user;
pub mod processing;
pub mod user;
pub mod validation;

pub use self::envelope::{DataSource, RawDataEnvelope};
pub use self::error::{RepositoryError, RepositoryErrorKind};
pub use self::post::{CreatePostData, PostRecord, PostRecordPatch, ProcessedPostData};
pub use self::preferences::{
    NotificationFrequency, NotificationSettings, PrivacySettings, ProfileVisibility,
    RawUserPreferences, ResolvedPreferences, Theme,
};
pub use self::processed_user::{
    AccountStatus, AvatarSet, Enrichments, InfluenceLevel, ProcessedUser, ProfileStats,
    SocialInfo, SuspensionInfo,
};
pub use self::user::{RawAuthData, RawUserData, RawUserPatch};
pub use self::validation::ValidationResult;
