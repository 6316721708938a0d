//! Image creation.

use imagehub::search::create_image_url;
use imagehub::{ApiError, ApiResult, RetryPolicy, UploadPayload};
use serde::Deserialize;
use web_sys::File;

use super::client::{HubClient, Part};

/// The parts of the created record the client looks at.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatedImage {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Send one image with its metadata. Never retried.
pub async fn create_image(client: &HubClient, file: &File, payload: &UploadPayload) -> ApiResult<CreatedImage> {
    let image_data = payload
        .image_data()
        .map_err(|e| ApiError::Request(format!("Failed to encode metadata: {}", e)))?;
    let url = create_image_url(client.config());

    log::info!("Uploading {} ({} bytes)", payload.file.name, payload.file.size);
    let created: CreatedImage = client
        .post_multipart_json(
            &url,
            &[],
            &[Part::File("file", file), Part::Text("image_data", &image_data)],
            RetryPolicy::NONE,
        )
        .await?;
    log::info!("Created image {}", created.id.as_deref().unwrap_or("(no id)"));
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_image_deserialization() {
        let created: CreatedImage =
            serde_json::from_str(r#"{"_id": "abc", "url": "/static/images/abc.jpg", "title": "Dawn"}"#).unwrap();
        assert_eq!(created.id.as_deref(), Some("abc"));

        let created: CreatedImage = serde_json::from_str(r#"{"id": "def"}"#).unwrap();
        assert_eq!(created.id.as_deref(), Some("def"));

        let created: CreatedImage = serde_json::from_str("{}").unwrap();
        assert!(created.id.is_none());
    }
}
