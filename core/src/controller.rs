//! Home page state.
//!
//! One [`PageController`] owns the cross-cutting state: which search is
//! active, which record the detail modal shows, and which modals are open.
//! Components read it and report back through the transition methods.

use crate::models::ImageRecord;
use crate::navigation::{adjacent, KeyCommand};
use crate::search::{SearchDescriptor, SearchMode};
use crate::search_input::SearchEvent;

/// What a search-input event did to the active search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchChange {
    Unchanged,
    /// A different search, or none, is now active
    Switched,
    /// The active search was submitted again
    Resubmitted,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageController {
    pub active_search: Option<SearchDescriptor>,
    pub selected: Option<ImageRecord>,
    pub modal_open: bool,
    pub upload_modal_open: bool,
}

impl PageController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Which query's results feed the grid.
    pub fn authoritative_mode(&self) -> Option<SearchMode> {
        self.active_search.as_ref().map(SearchDescriptor::mode)
    }

    /// Active descriptor if it is of the given mode.
    pub fn search_for(&self, mode: SearchMode) -> Option<SearchDescriptor> {
        self.active_search
            .as_ref()
            .filter(|d| d.mode() == mode)
            .cloned()
    }

    /// Apply an event from the search input.
    ///
    /// Submitting the active search again is reported as
    /// [`SearchChange::Resubmitted`] so a failed search can be refetched.
    pub fn apply_search_event(&mut self, event: SearchEvent) -> SearchChange {
        let next = match event {
            SearchEvent::Search(descriptor) => Some(descriptor),
            SearchEvent::Cleared => None,
            SearchEvent::Unchanged => return SearchChange::Unchanged,
        };
        if next == self.active_search {
            return match next {
                Some(_) => SearchChange::Resubmitted,
                None => SearchChange::Unchanged,
            };
        }
        self.active_search = next;
        self.close_modal();
        SearchChange::Switched
    }

    /// Open the detail modal on `record`.
    pub fn select(&mut self, record: ImageRecord) {
        self.selected = Some(record);
        self.modal_open = true;
    }

    pub fn close_modal(&mut self) {
        self.selected = None;
        self.modal_open = false;
    }

    /// Handle a key press in the detail modal against the loaded results.
    /// Returns whether the displayed record changed or the modal closed.
    pub fn handle_key(&mut self, command: KeyCommand, results: &[ImageRecord]) -> bool {
        if !self.modal_open {
            return false;
        }
        if command == KeyCommand::Close {
            self.close_modal();
            return true;
        }

        let Some(current) = self.selected.as_ref() else {
            return false;
        };
        match adjacent(results, &current.id, command) {
            Some(next) => {
                self.selected = Some(next.clone());
                true
            }
            None => false,
        }
    }

    pub fn open_upload(&mut self) {
        self.upload_modal_open = true;
    }

    pub fn close_upload(&mut self) {
        self.upload_modal_open = false;
    }

    /// After a successful upload the user starts a fresh search.
    pub fn upload_succeeded(&mut self) {
        self.upload_modal_open = false;
        self.active_search = None;
        self.close_modal();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::models::SearchType;
    use crate::pagination::{FetchTicket, InfiniteQueryCache};

    fn list(n: usize) -> Vec<ImageRecord> {
        (0..n)
            .map(|i| {
                serde_json::from_value(serde_json::json!({
                    "_id": format!("img-{}", i),
                    "url": format!("/static/images/{}.jpg", i)
                }))
                .unwrap()
            })
            .collect()
    }

    fn cats() -> SearchDescriptor {
        SearchDescriptor::text("cats", SearchType::Semantic).unwrap()
    }

    #[test]
    fn test_select_and_close() {
        let records = list(3);
        let mut page = PageController::new();
        page.select(records[1].clone());
        assert!(page.modal_open);
        assert_eq!(page.selected.as_ref().map(|r| r.id.as_str()), Some("img-1"));

        page.close_modal();
        assert!(!page.modal_open);
        assert!(page.selected.is_none());
    }

    #[test]
    fn test_keyboard_scenario() {
        let records = list(10);
        let mut page = PageController::new();

        page.select(records[2].clone());
        page.handle_key(KeyCommand::Next, &records);
        page.handle_key(KeyCommand::Next, &records);
        assert_eq!(page.selected.as_ref().unwrap().id, "img-4");
        assert!(page.modal_open);

        page.select(records[0].clone());
        assert!(!page.handle_key(KeyCommand::Previous, &records));
        assert_eq!(page.selected.as_ref().unwrap().id, "img-0");

        page.select(records[9].clone());
        assert!(!page.handle_key(KeyCommand::Next, &records));
        assert_eq!(page.selected.as_ref().unwrap().id, "img-9");

        assert!(page.handle_key(KeyCommand::Close, &records));
        assert!(page.selected.is_none());
    }

    #[test]
    fn test_keys_ignored_when_closed() {
        let records = list(3);
        let mut page = PageController::new();
        assert!(!page.handle_key(KeyCommand::Next, &records));
        assert!(!page.handle_key(KeyCommand::Close, &records));
    }

    #[test]
    fn test_only_one_search_is_authoritative() {
        let mut page = PageController::new();
        assert_eq!(page.authoritative_mode(), None);

        page.apply_search_event(SearchEvent::Search(cats()));
        assert_eq!(page.authoritative_mode(), Some(SearchMode::Text));
        assert!(page.search_for(SearchMode::Image).is_none());
        assert_eq!(page.search_for(SearchMode::Text), Some(cats()));

        assert_eq!(page.apply_search_event(SearchEvent::Search(cats())), SearchChange::Resubmitted);
        assert_eq!(page.apply_search_event(SearchEvent::Unchanged), SearchChange::Unchanged);
        assert_eq!(page.apply_search_event(SearchEvent::Cleared), SearchChange::Switched);
        assert_eq!(page.authoritative_mode(), None);
        assert_eq!(page.apply_search_event(SearchEvent::Cleared), SearchChange::Unchanged);
    }

    #[test]
    fn test_resubmit_after_failure_refetches() {
        let mut page = PageController::new();
        let mut cache = InfiniteQueryCache::new(20);

        // The page activates the cache on a switch and reactivates it on a
        // resubmit.
        fn submit(page: &mut PageController, cache: &mut InfiniteQueryCache, event: SearchEvent) -> Option<FetchTicket> {
            match page.apply_search_event(event) {
                SearchChange::Switched => cache.activate(page.search_for(SearchMode::Text)),
                SearchChange::Resubmitted => cache.reactivate(),
                SearchChange::Unchanged => None,
            }
        }

        let first = submit(&mut page, &mut cache, SearchEvent::Search(cats())).unwrap();
        cache.resolve(&first, Err(ApiError::Network("offline".into())));
        assert!(cache.state().error.is_some());

        let again = submit(&mut page, &mut cache, SearchEvent::Search(cats())).unwrap();
        assert_eq!(again.page, 1);
        assert!(cache.state().error.is_none());

        cache.resolve(&again, Ok(list(3)));
        assert!(submit(&mut page, &mut cache, SearchEvent::Search(cats())).is_none());
        assert_eq!(cache.state().records().len(), 3);
    }

    #[test]
    fn test_new_search_closes_modal() {
        let records = list(2);
        let mut page = PageController::new();
        page.apply_search_event(SearchEvent::Search(cats()));
        page.select(records[0].clone());

        let dogs = SearchDescriptor::text("dogs", SearchType::Hybrid).unwrap();
        page.apply_search_event(SearchEvent::Search(dogs));
        assert!(!page.modal_open);
        assert!(page.selected.is_none());
    }

    #[test]
    fn test_upload_success_resets_search() {
        let mut page = PageController::new();
        page.apply_search_event(SearchEvent::Search(cats()));
        page.open_upload();
        assert!(page.upload_modal_open);

        page.upload_succeeded();
        assert!(!page.upload_modal_open);
        assert!(page.active_search.is_none());

        page.open_upload();
        page.close_upload();
        assert!(!page.upload_modal_open);
    }
}
