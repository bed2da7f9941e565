//! Provenance envelope wrapped around every repository payload.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Originating backend for a piece of raw data.
///
/// The source always reflects the system that produced the payload, never the
/// caller that requested it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Managed document store.
    Firestore,
    /// REST API origin.
    RestApi,
    /// Local, in-process storage.
    LocalStorage,
    /// Read-through cache in front of another source.
    Cache,
}

impl DataSource {
    /// Returns the wire string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Firestore => "firestore",
            Self::RestApi => "rest_api",
            Self::LocalStorage => "local_storage",
            Self::Cache => "cache",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown data source string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDataSourceError {
    /// The unrecognised input value.
    pub input: String,
}

impl fmt::Display for ParseDataSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown data source: {}", self.input)
    }
}

impl std::error::Error for ParseDataSourceError {}

impl FromStr for DataSource {
    type Err = ParseDataSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "firestore" => Ok(Self::Firestore),
            "rest_api" => Ok(Self::RestApi),
            "local_storage" => Ok(Self::LocalStorage),
            "cache" => Ok(Self::Cache),
            _ => Err(ParseDataSourceError {
                input: s.to_owned(),
            }),
        }
    }
}

/// Wrapper around a repository payload carrying provenance and a timestamp.
///
/// ## Invariants
/// - `source` reflects the backend the payload was read from or written to.
/// - `timestamp` is the instant the payload was produced by that backend,
///   not the instant the caller observed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDataEnvelope<T> {
    /// The wrapped payload.
    pub data: T,
    /// Backend the payload originated from.
    pub source: DataSource,
    /// Instant the payload was produced.
    pub timestamp: DateTime<Utc>,
    /// Optional structured metadata attached by the backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl<T> RawDataEnvelope<T> {
    /// Wrap a payload produced now by the given backend.
    #[must_use]
    pub fn new(data: T, source: DataSource) -> Self {
        Self::at(data, source, Utc::now())
    }

    /// Wrap a payload produced at an explicit instant.
    #[must_use]
    pub const fn at(data: T, source: DataSource, timestamp: DateTime<Utc>) -> Self {
        Self {
            data,
            source,
            timestamp,
            metadata: None,
        }
    }

    /// Attach structured metadata to the envelope.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Re-tag the envelope with a different originating backend.
    ///
    /// Used by read-through caches handing back a previously stored payload.
    #[must_use]
    pub fn with_source(mut self, source: DataSource) -> Self {
        self.source = source;
        self
    }
}
