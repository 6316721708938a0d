//! Search descriptors, cache keys and request shapes.
//!
//! A [`SearchDescriptor`] is the normalized "what is being searched".
//! Its [`QueryKey`] decides cache identity: any change to the query text,
//! the ranking type, the file or the page size yields a new key and a
//! fresh pagination run.

use std::fmt;

use crate::config::HubConfig;
use crate::models::{FileInfo, SearchType};

/// Which kind of search is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchMode {
    #[default]
    Text,
    Image,
}

/// The active search.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SearchDescriptor {
    Text { query: String, search_type: SearchType },
    Image { file: FileInfo },
}

impl SearchDescriptor {
    /// Text descriptor from raw input, or `None` when the query is blank.
    pub fn text(query: &str, search_type: SearchType) -> Option<Self> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        Some(SearchDescriptor::Text {
            query: query.to_string(),
            search_type,
        })
    }

    pub fn image(file: FileInfo) -> Self {
        SearchDescriptor::Image { file }
    }

    pub fn mode(&self) -> SearchMode {
        match self {
            SearchDescriptor::Text { .. } => SearchMode::Text,
            SearchDescriptor::Image { .. } => SearchMode::Image,
        }
    }

    /// Whether a request may be issued for this descriptor.
    pub fn is_enabled(&self) -> bool {
        match self {
            SearchDescriptor::Text { query, .. } => !query.trim().is_empty(),
            SearchDescriptor::Image { .. } => true,
        }
    }

    /// Cache key for this descriptor at a given page size.
    pub fn key(&self, page_size: usize) -> QueryKey {
        match self {
            SearchDescriptor::Text { query, search_type } => {
                QueryKey(format!("text:{}:{}:{}", search_type, page_size, query))
            }
            SearchDescriptor::Image { file } => QueryKey(format!(
                "image:{}:{}:{}:{}",
                file.name, file.size, file.last_modified, page_size
            )),
        }
    }

    /// HTTP request for one page of this search.
    pub fn page_request(&self, config: &HubConfig, page: u32) -> PageRequest {
        let n = config.page_size.to_string();
        let page = page.to_string();
        match self {
            SearchDescriptor::Text { query, search_type } => PageRequest {
                method: Method::Get,
                url: config.endpoint("/search/"),
                params: vec![
                    ("query", query.clone()),
                    ("type", search_type.as_str().to_string()),
                    ("n", n),
                    ("page", page),
                ],
            },
            SearchDescriptor::Image { .. } => PageRequest {
                method: Method::PostMultipart,
                url: config.endpoint("/search/by-image"),
                params: vec![("n", n), ("page", page)],
            },
        }
    }
}

/// Cache identity of a paginated search.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(String);

impl QueryKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a request is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    /// POST with the selected file as the `file` multipart part
    PostMultipart,
}

/// Transport-agnostic description of one page fetch.
///
/// Query parameters are kept unencoded; the HTTP layer encodes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub method: Method,
    pub url: String,
    pub params: Vec<(&'static str, String)>,
}

/// URL for the related-images lookup of one record.
pub fn related_url(config: &HubConfig, image_id: &str) -> String {
    config.endpoint(&format!("/images/related/{}", image_id))
}

/// URL for creating a new image.
pub fn create_image_url(config: &HubConfig) -> String {
    config.endpoint("/images/")
}
