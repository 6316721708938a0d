//! Upload form state.
//!
//! An [`UploadDraft`] collects the metadata and the selected file; it
//! validates locally before any request is built, and is reset whenever the
//! modal closes.

use std::time::Duration;

use crate::error::{ApiError, ValidationError, ValidationResult};
use crate::models::{FileInfo, ImageMetadata, MetadataField};

/// Delay between the success banner and closing the modal.
pub const SUCCESS_CLOSE_DELAY: Duration = Duration::from_millis(1500);

/// Banner text after a successful upload.
pub const UPLOAD_SUCCESS_MESSAGE: &str = "Image uploaded successfully!";

/// Lifecycle of one submission.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UploadStatus {
    #[default]
    Editing,
    Submitting,
    Succeeded,
    Failed(String),
}

impl UploadStatus {
    pub fn is_submitting(&self) -> bool {
        matches!(self, UploadStatus::Submitting)
    }

    /// The modal cannot be closed while a request runs or a success waits
    /// out its close delay.
    pub fn holds_modal(&self) -> bool {
        matches!(self, UploadStatus::Submitting | UploadStatus::Succeeded)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            UploadStatus::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// What gets sent: the file plus the metadata for the `image_data` part.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadPayload {
    pub file: FileInfo,
    pub metadata: ImageMetadata,
}

impl UploadPayload {
    /// JSON text of the `image_data` multipart part.
    pub fn image_data(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.metadata)
    }
}

/// Mutable upload form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadDraft {
    pub metadata: ImageMetadata,
    pub file: Option<FileInfo>,
    pub status: UploadStatus,
}

impl UploadDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_field(&mut self, field: MetadataField, value: String) {
        self.metadata.set(field, value);
    }

    /// Accept a picked file. Non-JPEG files are rejected, the previous
    /// selection is kept and the error is shown.
    pub fn select_file(&mut self, file: FileInfo) -> ValidationResult<()> {
        if !file.is_jpeg() {
            let err = ValidationError::UnsupportedFileType {
                mime: file.mime_type.clone(),
            };
            self.status = UploadStatus::Failed(err.to_string());
            return Err(err);
        }
        self.file = Some(file);
        if self.status.error().is_some() {
            self.status = UploadStatus::Editing;
        }
        Ok(())
    }

    /// Check required fields and build the payload.
    ///
    /// The file is checked first, then the title.
    pub fn validate(&self) -> ValidationResult<UploadPayload> {
        let file = self.file.clone().ok_or(ValidationError::MissingFile)?;
        if !file.is_jpeg() {
            return Err(ValidationError::UnsupportedFileType {
                mime: file.mime_type,
            });
        }
        if self.metadata.title.trim().is_empty() {
            return Err(ValidationError::MissingTitle);
        }

        let mut metadata = self.metadata.clone();
        trim_all(&mut metadata);
        Ok(UploadPayload { file, metadata })
    }

    /// Validate and move to `Submitting`. A validation failure is recorded
    /// as the visible error and no payload is returned.
    pub fn begin_submit(&mut self) -> ValidationResult<UploadPayload> {
        if self.status.is_submitting() {
            return Err(ValidationError::InProgress);
        }
        match self.validate() {
            Ok(payload) => {
                self.status = UploadStatus::Submitting;
                Ok(payload)
            }
            Err(err) => {
                self.status = UploadStatus::Failed(err.to_string());
                Err(err)
            }
        }
    }

    /// Record the server's answer.
    pub fn finish_submit(&mut self, result: Result<(), ApiError>) {
        self.status = match result {
            Ok(()) => UploadStatus::Succeeded,
            Err(err) => UploadStatus::Failed(err.upload_message()),
        };
    }

    /// Clear every field, the file and any banner.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn trim_all(metadata: &mut ImageMetadata) {
    for field in MetadataField::ALL {
        let trimmed = metadata.get(field).trim().to_string();
        metadata.set(field, trimmed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(mime: &str) -> FileInfo {
        FileInfo {
            name: "upload.jpg".into(),
            mime_type: mime.into(),
            size: 4096,
            last_modified: 0,
        }
    }

    #[test]
    fn test_non_jpeg_is_rejected() {
        let mut draft = UploadDraft::new();
        draft.set_field(MetadataField::Title, "Allegory".into());

        let err = draft.select_file(file("image/png")).unwrap_err();
        assert_eq!(err.to_string(), "Only JPEG images are supported");
        assert_eq!(draft.status.error(), Some("Only JPEG images are supported"));
        assert!(draft.file.is_none());

        // Submission stays blocked: no payload is produced.
        assert_eq!(draft.begin_submit(), Err(ValidationError::MissingFile));
        assert!(!draft.status.is_submitting());
    }

    #[test]
    fn test_validation_order() {
        let mut draft = UploadDraft::new();
        assert_eq!(draft.validate(), Err(ValidationError::MissingFile));

        draft.select_file(file("image/jpeg")).unwrap();
        assert_eq!(draft.validate(), Err(ValidationError::MissingTitle));

        draft.set_field(MetadataField::Title, "   ".into());
        assert_eq!(draft.validate(), Err(ValidationError::MissingTitle));
    }

    #[test]
    fn test_payload_contents() {
        let mut draft = UploadDraft::new();
        draft.select_file(file("image/jpeg")).unwrap();
        draft.set_field(MetadataField::Title, " Allegory ".into());
        draft.set_field(MetadataField::School, "german".into());

        let payload = draft.begin_submit().unwrap();
        assert!(draft.status.is_submitting());
        assert_eq!(payload.file.name, "upload.jpg");

        let json: serde_json::Value = serde_json::from_str(&payload.image_data().unwrap()).unwrap();
        assert_eq!(json["title"], "Allegory");
        assert_eq!(json["school"], "german");
        assert!(json.get("author").is_none());

        assert_eq!(draft.begin_submit(), Err(ValidationError::InProgress));
    }

    #[test]
    fn test_valid_file_clears_previous_error() {
        let mut draft = UploadDraft::new();
        let _ = draft.select_file(file("image/gif"));
        assert!(draft.status.error().is_some());
        draft.select_file(file("image/jpeg")).unwrap();
        assert_eq!(draft.status, UploadStatus::Editing);
    }

    #[test]
    fn test_server_failure_messages() {
        let mut draft = UploadDraft::new();
        draft.finish_submit(Err(ApiError::from_response(400, r#"{"detail": "Duplicate image"}"#)));
        assert_eq!(draft.status.error(), Some("Duplicate image"));

        draft.finish_submit(Err(ApiError::Network("offline".into())));
        assert_eq!(draft.status.error(), Some(crate::error::UPLOAD_FAILED_MESSAGE));

        draft.finish_submit(Ok(()));
        assert_eq!(draft.status, UploadStatus::Succeeded);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut draft = UploadDraft::new();
        draft.select_file(file("image/jpeg")).unwrap();
        draft.set_field(MetadataField::Author, "Hans von".into());
        draft.finish_submit(Ok(()));

        draft.reset();
        assert_eq!(draft, UploadDraft::default());
    }

    #[test]
    fn test_modal_held_until_success_delay_ends() {
        let mut draft = UploadDraft::new();
        assert!(!draft.status.holds_modal());

        draft.select_file(file("image/jpeg")).unwrap();
        draft.set_field(MetadataField::Title, "Allegory".into());
        draft.begin_submit().unwrap();
        assert!(draft.status.holds_modal());

        draft.finish_submit(Ok(()));
        assert!(draft.status.holds_modal());

        draft.reset();
        assert!(!draft.status.holds_modal());

        draft.finish_submit(Err(ApiError::Timeout));
        assert!(!draft.status.holds_modal());
    }
}
