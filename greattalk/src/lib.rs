//! Core data-processing and repository layer for the GreatTalk social
//! posting application.
//!
//! The crate is organised hexagonally: [`domain`] holds the raw and processed
//! data models, validation, the pure enrichment processors, and the port
//! traits; [`outbound`] holds the backend adapters binding those ports.
//! Callers compose the three stages independently: validate raw input,
//! process it into display-ready views, and persist it through a repository.

pub mod config;
pub mod domain;
pub mod outbound;

pub use config::{ConfigError, CoreConfig, DEFAULT_PAGE_SIZE};
pub use domain::{DataSource, RawDataEnvelope, RepositoryError, RepositoryErrorKind};
pub use outbound::MemoryRepository;
