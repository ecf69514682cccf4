//! `multipart/form-data` upload extractor

use std::collections::HashMap;

use aide::{operation::OperationInput, OperationOutput};
use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, FromRequest, Multipart, Request},
    http::StatusCode,
};

use super::InputError;
use crate::types::AppError;

/// Extensions accepted when extension validation is enabled
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// Form part names that carry the image
const FILE_PART_NAMES: [&str; 2] = ["image", "file"];

/// File part of an upload form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Filename as sent by the client, possibly empty
    pub filename: String,
    /// Declared content type, never sniffed
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Parsed upload form: at most one file plus text fields
///
/// Parsing never fails on missing parts; the handler decides which parts its
/// variant needs.
#[derive(Debug, Default)]
pub struct UploadForm {
    file: Option<UploadedFile>,
    fields: HashMap<String, String>,
}

/// Typed view over the text fields a variant requires
pub trait FromUploadForm: Sized {
    /// # Errors
    ///
    /// Returns `InputError::MissingField` for the first absent or empty field
    fn from_form(form: &UploadForm) -> Result<Self, InputError>;
}

/// Lower-cased text after the last `.`, empty when there is no dot
///
/// A bare `.png` counts as a `png` file.
fn extension_of(filename: &str) -> String {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}

/// Returns whether `filename` ends with one of [`ALLOWED_EXTENSIONS`], ignoring case
#[must_use]
pub fn has_allowed_extension(filename: &str) -> bool {
    ALLOWED_EXTENSIONS.contains(&extension_of(filename).as_str())
}

impl UploadForm {
    /// Builds a form directly, bypassing multipart parsing
    #[must_use]
    pub fn new(file: Option<UploadedFile>, fields: HashMap<String, String>) -> Self {
        Self { file, fields }
    }

    /// Returns a non-empty text field
    ///
    /// # Errors
    ///
    /// Returns `InputError::MissingField` when the field is absent or empty
    pub fn require(&self, name: &'static str) -> Result<String, InputError> {
        self.fields
            .get(name)
            .filter(|value| !value.is_empty())
            .cloned()
            .ok_or(InputError::MissingField(name))
    }

    /// Takes the uploaded file out of the form, checking its name
    ///
    /// # Errors
    ///
    /// - `InputError::MissingFile` when no `image`/`file` part was sent
    /// - `InputError::EmptyFilename` when the part has no filename
    /// - `InputError::UnsupportedExtension` when `validate_extension` is set
    ///   and the extension is not an allowed image type
    pub fn take_image(&mut self, validate_extension: bool) -> Result<UploadedFile, InputError> {
        let file = self.file.take().ok_or(InputError::MissingFile)?;

        if file.filename.is_empty() {
            return Err(InputError::EmptyFilename);
        }

        if validate_extension && !has_allowed_extension(&file.filename) {
            return Err(InputError::UnsupportedExtension(extension_of(
                &file.filename,
            )));
        }

        Ok(file)
    }
}

fn multipart_error(err: &MultipartError) -> InputError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        InputError::PayloadTooLarge
    } else {
        InputError::MalformedMultipart(err.body_text())
    }
}

impl<S> FromRequest<S> for UploadForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| InputError::MalformedMultipart(rejection.body_text()))?;

        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error(&e))?
        {
            let name = field.name().unwrap_or_default().to_owned();

            if FILE_PART_NAMES.contains(&name.as_str()) && form.file.is_none() {
                let filename = field.file_name().unwrap_or_default().to_owned();
                let content_type = field.content_type().map(ToOwned::to_owned);
                let data = field.bytes().await.map_err(|e| multipart_error(&e))?;

                form.file = Some(UploadedFile {
                    filename,
                    content_type,
                    data,
                });
            } else if field.file_name().is_none() {
                let value = field.text().await.map_err(|e| multipart_error(&e))?;
                form.fields.insert(name, value);
            }
            // Extra file parts are drained by the next `next_field` call
        }

        Ok(form)
    }
}

impl OperationInput for UploadForm {
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        Multipart::operation_input(ctx, operation);
    }

    fn inferred_early_responses(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Vec<(Option<u16>, aide::openapi::Response)> {
        AppError::inferred_responses(ctx, operation)
    }
}
