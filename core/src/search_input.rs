//! Search input state machine.
//!
//! Two sub-states share one input: text (`query` + `search_type`) and image
//! (`selected_file`). Exactly one is visible; switching clears the other.
//! Every transition reports a [`SearchEvent`] telling the page what to do
//! with its active search.

use crate::error::{ValidationError, ValidationResult};
use crate::models::{FileInfo, SearchType};
use crate::search::{SearchDescriptor, SearchMode};

/// What the page controller should do after an input transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    /// Make this the active search.
    Search(SearchDescriptor),
    /// No search is active any more.
    Cleared,
    /// Leave the active search alone.
    Unchanged,
}

/// State behind the search bar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchInputState {
    pub mode: SearchMode,
    /// Text being typed (not yet submitted)
    pub query: String,
    pub search_type: SearchType,
    pub selected_file: Option<FileInfo>,
    /// Search this input last reported as active
    pub active: Option<SearchDescriptor>,
    /// Visible error, e.g. a rejected file
    pub error: Option<String>,
}

impl SearchInputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch between text and image input.
    pub fn set_mode(&mut self, mode: SearchMode) -> SearchEvent {
        if mode == self.mode {
            return SearchEvent::Unchanged;
        }
        self.mode = mode;
        self.error = None;
        match mode {
            SearchMode::Text => self.selected_file = None,
            SearchMode::Image => self.query.clear(),
        }
        self.deactivate()
    }

    /// Update the typed text. Takes effect on [`submit`](Self::submit).
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Change the ranking type. Re-issues the active text search at once.
    pub fn set_search_type(&mut self, search_type: SearchType) -> SearchEvent {
        if search_type == self.search_type {
            return SearchEvent::Unchanged;
        }
        self.search_type = search_type;

        match &self.active {
            Some(SearchDescriptor::Text { query, .. }) => {
                let descriptor = SearchDescriptor::Text {
                    query: query.clone(),
                    search_type,
                };
                self.active = Some(descriptor.clone());
                SearchEvent::Search(descriptor)
            }
            _ => SearchEvent::Unchanged,
        }
    }

    /// Submit the typed query (button or Enter).
    ///
    /// A blank query makes search inactive.
    pub fn submit(&mut self) -> SearchEvent {
        if self.mode != SearchMode::Text {
            return SearchEvent::Unchanged;
        }
        match SearchDescriptor::text(&self.query, self.search_type) {
            Some(descriptor) => {
                self.error = None;
                self.active = Some(descriptor.clone());
                SearchEvent::Search(descriptor)
            }
            None => self.deactivate(),
        }
    }

    /// Pick a file for reverse-image search. Searches immediately.
    ///
    /// Non-JPEG files are rejected with a visible error and the current
    /// search is left untouched.
    pub fn select_file(&mut self, file: FileInfo) -> ValidationResult<SearchEvent> {
        if !file.is_jpeg() {
            let err = ValidationError::UnsupportedFileType {
                mime: file.mime_type.clone(),
            };
            self.error = Some(err.to_string());
            return Err(err);
        }

        self.mode = SearchMode::Image;
        self.query.clear();
        self.error = None;
        self.selected_file = Some(file.clone());

        let descriptor = SearchDescriptor::image(file);
        self.active = Some(descriptor.clone());
        Ok(SearchEvent::Search(descriptor))
    }

    /// Reset both sub-states.
    pub fn clear(&mut self) -> SearchEvent {
        self.query.clear();
        self.selected_file = None;
        self.error = None;
        self.active = None;
        SearchEvent::Cleared
    }

    /// Forget the active search (e.g. after an upload reset it upstream).
    pub fn forget_active(&mut self) {
        self.active = None;
    }

    fn deactivate(&mut self) -> SearchEvent {
        match self.active.take() {
            Some(_) => SearchEvent::Cleared,
            None => SearchEvent::Unchanged,
        }
    }
}
