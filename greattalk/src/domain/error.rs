//! Repository error taxonomy.
//!
//! Backend-native failures are translated into this closed taxonomy at the
//! repository boundary; callers never see backend-specific error types.
//! Anything an adapter cannot classify falls into the [`RepositoryErrorKind::Network`]
//! bucket.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::envelope::DataSource;

/// Closed set of failure categories a repository may surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum RepositoryErrorKind {
    /// The requested record does not exist.
    NotFound,
    /// The payload or request failed a validation rule.
    Validation,
    /// Transport or backend failure, and the default bucket for anything
    /// unrecognised.
    Network,
    /// The caller is not permitted to perform this operation.
    Authorization,
}

impl RepositoryErrorKind {
    /// Default machine-readable code for this category.
    #[must_use]
    pub const fn default_code(&self) -> &'static str {
        match self {
            Self::NotFound => "repo/not-found",
            Self::Validation => "repo/validation",
            Self::Network => "repo/network",
            Self::Authorization => "repo/authorization",
        }
    }
}

/// Classified repository failure.
///
/// ## Invariants
/// - `message` is non-empty.
/// - `code` is a stable machine-readable identifier; it defaults to the
///   category code but adapters may refine it (for example
///   `repo/serialization`).
///
/// # Examples
/// ```
/// use greattalk::domain::error::{RepositoryError, RepositoryErrorKind};
/// use greattalk::domain::envelope::DataSource;
///
/// let err = RepositoryError::not_found(DataSource::LocalStorage, "user missing");
/// assert_eq!(err.kind(), RepositoryErrorKind::NotFound);
/// assert_eq!(err.code(), "repo/not-found");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryError {
    kind: RepositoryErrorKind,
    code: String,
    message: String,
    source: DataSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl RepositoryError {
    /// Create a classified error with the category's default code.
    #[must_use]
    pub fn new(
        kind: RepositoryErrorKind,
        source: DataSource,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            code: kind.default_code().to_owned(),
            message: message.into(),
            source,
            details: None,
        }
    }

    /// Failure category.
    #[must_use]
    pub const fn kind(&self) -> RepositoryErrorKind {
        self.kind
    }

    /// Stable machine-readable code.
    #[must_use]
    pub fn code(&self) -> &str {
        self.code.as_str()
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Backend the failure originated from.
    #[must_use]
    pub const fn source(&self) -> DataSource {
        self.source
    }

    /// Supplementary structured details, if any.
    #[must_use]
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Refine the machine-readable code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Attach structured details to the error.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`RepositoryErrorKind::NotFound`].
    #[must_use]
    pub fn not_found(source: DataSource, message: impl Into<String>) -> Self {
        Self::new(RepositoryErrorKind::NotFound, source, message)
    }

    /// Convenience constructor for [`RepositoryErrorKind::Validation`].
    #[must_use]
    pub fn validation(source: DataSource, message: impl Into<String>) -> Self {
        Self::new(RepositoryErrorKind::Validation, source, message)
    }

    /// Convenience constructor for [`RepositoryErrorKind::Network`].
    #[must_use]
    pub fn network(source: DataSource, message: impl Into<String>) -> Self {
        Self::new(RepositoryErrorKind::Network, source, message)
    }

    /// Convenience constructor for [`RepositoryErrorKind::Authorization`].
    #[must_use]
    pub fn authorization(source: DataSource, message: impl Into<String>) -> Self {
        Self::new(RepositoryErrorKind::Authorization, source, message)
    }
}

impl std::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for RepositoryError {}
