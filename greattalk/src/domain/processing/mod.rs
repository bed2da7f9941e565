//! Pure enrichment processors.
//!
//! Processors never fail and never touch a repository: missing optional
//! input degrades to computed defaults rather than erroring.

pub mod post;
pub mod user;

pub use self::post::{PostQualityWarning, process_post_data, quality_warnings};
pub use self::user::{
    DEFAULT_AVATAR_PATH, process_batch_user_data, process_user_data, process_user_data_at,
};
