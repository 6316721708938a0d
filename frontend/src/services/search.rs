//! Search and related-image fetches.

use imagehub::search::related_url;
use imagehub::{ApiError, ApiResult, FetchTicket, ImageRecord, Method, RelatedTicket};
use web_sys::File;

use super::client::{HubClient, Part};

/// Fetch the page a ticket asks for.
///
/// Image searches need the picked file; text searches ignore `file`.
pub async fn fetch_search_page(
    client: &HubClient,
    ticket: &FetchTicket,
    file: Option<&File>,
) -> ApiResult<Vec<ImageRecord>> {
    let request = ticket.descriptor.page_request(client.config(), ticket.page);
    log::debug!("Fetching page {} of {}", ticket.page, ticket.key);

    match request.method {
        Method::Get => client.get_json(&request.url, &request.params).await,
        Method::PostMultipart => {
            let file = file.ok_or_else(|| ApiError::Request("No image selected for image search".to_string()))?;
            client
                .post_multipart_json(
                    &request.url,
                    &request.params,
                    &[Part::File("file", file)],
                    client.config().retry,
                )
                .await
        }
    }
}

/// Fetch the neighbours of one record.
pub async fn fetch_related(client: &HubClient, ticket: &RelatedTicket) -> ApiResult<Vec<ImageRecord>> {
    let url = related_url(client.config(), &ticket.image_id);
    log::debug!("Fetching {} related images for {}", ticket.count, ticket.image_id);
    client.get_json(&url, &[("n", ticket.count.to_string())]).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_deserialization() {
        let json = r#"[
            {
                "_id": "65f1c0",
                "url": "/static/images/65f1c0.jpg",
                "title": "The Harvesters",
                "author": "BRUEGEL, Pieter the Elder",
                "born_died": "(b. 1525, Breda, d. 1569, Brussels)",
                "date": "1565",
                "technique": "Oil on wood",
                "type": "genre",
                "school": "Flemish",
                "timeline": "1551-1600",
                "uploadDate": "2024-03-04T10:15:00",
                "score": 0.873
            },
            { "_id": "65f1c1", "url": "/static/images/65f1c1.jpg" }
        ]"#;

        let records: Vec<ImageRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind.as_deref(), Some("genre"));
        assert_eq!(records[0].score_percent(), Some(87));
        assert_eq!(records[0].formatted_upload_date().as_deref(), Some("Mar 4, 2024"));
        assert_eq!(records[1].display_title(), "Untitled");
        assert!(records[1].tags.is_empty());
    }
}
