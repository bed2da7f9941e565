//! Construction-time configuration.
//!
//! Configuration is an explicit value passed to the components that need it,
//! validated once when the process assembles its dependencies. A missing or
//! malformed image endpoint fails construction with a descriptive error
//! rather than surfacing later as a broken URL.

use url::Url;

/// Default page size for listing queries.
pub const DEFAULT_PAGE_SIZE: usize = 30;

/// Errors raised while validating configuration at construction time.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The image origin endpoint was empty or missing.
    #[error("image endpoint is required but was empty")]
    MissingImageEndpoint,
    /// The image origin endpoint did not parse as an absolute URL.
    #[error("image endpoint is not a valid URL: {0}")]
    InvalidImageEndpoint(#[from] url::ParseError),
}

/// Validated core configuration.
///
/// # Examples
/// ```
/// use greattalk::config::CoreConfig;
///
/// let config = CoreConfig::new("https://images.greattalk.example").expect("valid endpoint");
/// assert_eq!(
///     config.user_image_url("abc123"),
///     "https://images.greattalk.example/users/abc123",
/// );
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfig {
    image_endpoint: Url,
    page_size: usize,
}

impl CoreConfig {
    /// Validate and construct the configuration.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the endpoint is empty or unparseable.
    pub fn new(image_endpoint: &str) -> Result<Self, ConfigError> {
        let trimmed = image_endpoint.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::MissingImageEndpoint);
        }
        let image_endpoint = Url::parse(trimmed)?;

        Ok(Self {
            image_endpoint,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Override the listing page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// The configured image origin endpoint.
    #[must_use]
    pub fn image_endpoint(&self) -> &Url {
        &self.image_endpoint
    }

    /// Page size used for listing queries.
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Image origin URL for a user's profile image.
    #[must_use]
    pub fn user_image_url(&self, uid: &str) -> String {
        format!("{}/users/{uid}", self.endpoint_base())
    }

    /// Image origin URL for an image attached to one of a user's posts.
    #[must_use]
    pub fn post_image_url(&self, uid: &str, post_id: &str) -> String {
        format!("{}/users/{uid}/posts/{post_id}", self.endpoint_base())
    }

    fn endpoint_base(&self) -> &str {
        self.image_endpoint.as_str().trim_end_matches('/')
    }
}
