//! Document path conventions for the persistence boundary.
//!
//! User documents live at `public/v1/users/{uid}`; a user's posts live in the
//! `public/v1/users/{uid}/posts` sub-collection, listed newest first with a
//! page size of [`crate::config::DEFAULT_PAGE_SIZE`].

/// Root prefix shared by all public collections.
pub const COLLECTION_ROOT: &str = "public/v1";

/// Field post listings are ordered by, descending.
pub const POST_ORDER_FIELD: &str = "createdAt";

/// Path to a single user document.
#[must_use]
pub fn user_document_path(uid: &str) -> String {
    format!("{COLLECTION_ROOT}/users/{uid}")
}

/// Path to a user's posts sub-collection.
#[must_use]
pub fn user_posts_path(uid: &str) -> String {
    format!("{COLLECTION_ROOT}/users/{uid}/posts")
}

/// Path to a single post document.
#[must_use]
pub fn post_document_path(uid: &str, post_id: &str) -> String {
    format!("{COLLECTION_ROOT}/users/{uid}/posts/{post_id}")
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn paths_follow_the_versioned_convention() {
        assert_eq!(user_document_path("u1"), "public/v1/users/u1");
        assert_eq!(user_posts_path("u1"), "public/v1/users/u1/posts");
        assert_eq!(post_document_path("u1", "p2"), "public/v1/users/u1/posts/p2");
    }
}
