//! Domain ports for the hexagonal boundary.

mod repository;
mod upload;

pub use repository::{
    DocumentListener, FieldFilter, FilterOp, OrderBy, Page, PageQuery, Patchable,
    QueryListener, Repository, SortDirection, SubscriptionEvent, SubscriptionHandle,
};
#[cfg(test)]
pub use upload::MockImageUploader;
pub use upload::{
    FixtureImageUploader, ImageUploader, UPLOAD_FAILED_MESSAGE, UploadRequest, UploadResponse,
    UploadResult, upload_image,
};
