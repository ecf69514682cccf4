//! Image uploads: form parsing, validation and object key derivation

mod error;
mod form;
mod key;

pub use error::InputError;
pub use form::{has_allowed_extension, FromUploadForm, UploadForm, UploadedFile, ALLOWED_EXTENSIONS};
pub use key::{
    GroupProfileFields, ImageLinkQuery, ImageReason, ImageTarget, PunishFeedFields,
    UserProfileFields,
};
