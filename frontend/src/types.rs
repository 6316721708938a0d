//! Browser-side types shared by components and services.
//!
//! # Categories
//!
//! - **Local Files** - a picked `File` plus its identity
//! - **Search Requests** - what the search input reports upward

use imagehub::{FileInfo, SearchEvent};
use web_sys::{File, HtmlInputElement, Url};

// =============================================================================
// Local Files
// =============================================================================

/// A file picked in a file input.
///
/// The handle is what gets sent; `info` is what keys caches and drives
/// validation.
#[derive(Clone, Debug)]
pub struct LocalFile {
    pub file: File,
    pub info: FileInfo,
}

impl LocalFile {
    pub fn new(file: File) -> Self {
        let info = FileInfo {
            name: file.name(),
            mime_type: file.type_(),
            size: file.size() as u64,
            last_modified: file.last_modified() as i64,
        };
        Self { file, info }
    }

    /// First file of a file input, if any.
    pub fn from_input(input: &HtmlInputElement) -> Option<Self> {
        let files = input.files()?;
        files.get(0).map(Self::new)
    }

    /// Object URL for an `<img>` preview. Release it with [`revoke_preview`].
    pub fn preview_url(&self) -> Option<String> {
        match Url::create_object_url_with_blob(&self.file) {
            Ok(url) => Some(url),
            Err(e) => {
                log::error!("Could not create preview for {}: {:?}", self.info.name, e);
                None
            }
        }
    }
}

impl PartialEq for LocalFile {
    fn eq(&self, other: &Self) -> bool {
        self.info == other.info
    }
}

/// Release an object URL created by [`LocalFile::preview_url`].
pub fn revoke_preview(url: &str) {
    if let Err(e) = Url::revoke_object_url(url) {
        log::warn!("Could not revoke preview URL: {:?}", e);
    }
}

// =============================================================================
// Search Requests
// =============================================================================

/// What the search input hands to the page.
///
/// `file` travels with image searches so the query hook can send the bytes.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchRequest {
    pub event: SearchEvent,
    pub file: Option<LocalFile>,
}

impl SearchRequest {
    pub fn new(event: SearchEvent) -> Self {
        Self { event, file: None }
    }

    pub fn with_file(event: SearchEvent, file: LocalFile) -> Self {
        Self {
            event,
            file: Some(file),
        }
    }
}
