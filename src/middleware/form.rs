use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
};
use std::collections::HashMap;

use crate::error::SiteError;
use crate::service::uploads::{allowed_file, secure_filename};

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Bytes,
}

/// How an optional image field of a submitted form should be treated.
#[derive(Debug)]
pub enum ImageUpload<'a> {
    /// no file part, or the browser sent an empty file input
    Missing,
    /// a file whose name does not survive the extension/sanitising checks
    Rejected,
    Accepted(&'a UploadedFile),
}

/// A fully buffered `multipart/form-data` body: text fields and file parts by name.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    /// Text value of `name`, empty when absent.
    pub fn text(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name)
    }

    pub fn image(&self, name: &str) -> ImageUpload<'_> {
        match self.file(name) {
            None => ImageUpload::Missing,
            Some(file) if file.file_name.is_empty() => ImageUpload::Missing,
            Some(file)
                if allowed_file(&file.file_name)
                    && allowed_file(&secure_filename(&file.file_name)) =>
            {
                ImageUpload::Accepted(file)
            }
            Some(_) => ImageUpload::Rejected,
        }
    }
}

impl<S> FromRequest<S> for MultipartForm
where
    S: Send + Sync,
{
    type Rejection = SiteError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| SiteError::BadRequest(rejection.body_text()))?;

        let mut form = MultipartForm::default();
        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let bytes = field.bytes().await?;
                    form.files.insert(name, UploadedFile { file_name, bytes });
                }
                None => {
                    let text = field.text().await?;
                    form.fields.insert(name, text);
                }
            }
        }
        Ok(form)
    }
}
