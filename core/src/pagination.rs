//! Paginated search cache.
//!
//! Holds one ordered page list per [`QueryKey`] and hands out
//! [`FetchTicket`]s for the page that should be loaded next. Every ticket
//! carries a token; a response is applied only while its token is still
//! the entry's in-flight token and its page is the next gapless index.
//! Responses for superseded searches are therefore dropped, never merged.
//!
//! ```text
//!  activate(desc) ──▶ ticket(page 1) ──▶ resolve ──▶ pages [1]
//!  fetch_next_page() ──▶ ticket(page 2) ──▶ resolve ──▶ pages [1, 2]
//!  activate(other) ──▶ old token revoked; late page 3 is discarded
//! ```

use std::collections::{HashMap, HashSet};

use crate::error::ApiError;
use crate::models::ImageRecord;
use crate::search::{QueryKey, SearchDescriptor};

/// One fetch's worth of results.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultPage {
    /// 1-based page index
    pub index: u32,
    pub records: Vec<ImageRecord>,
}

/// Concatenate pages in order, keeping the first occurrence of each id.
pub fn flatten_pages(pages: &[ResultPage]) -> Vec<ImageRecord> {
    let mut seen = HashSet::new();
    pages
        .iter()
        .flat_map(|page| page.records.iter())
        .filter(|record| seen.insert(record.id.clone()))
        .cloned()
        .collect()
}

/// Whether another page may exist after `pages`.
///
/// A page shorter than `page_size` ends the result set; a full page keeps
/// it open until the next fetch proves otherwise.
pub fn has_next_page(pages: &[ResultPage], page_size: usize) -> bool {
    pages
        .last()
        .is_some_and(|page| page.records.len() >= page_size)
}

/// Handle for one in-flight page fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    pub key: QueryKey,
    pub descriptor: SearchDescriptor,
    /// 1-based page index to request
    pub page: u32,
    pub token: u64,
}

/// Outcome of handing a response back to the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The response was stored.
    Applied,
    /// The ticket was superseded; the response was dropped.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InFlight {
    token: u64,
    page: u32,
}

#[derive(Debug, Clone)]
struct QueryEntry {
    descriptor: SearchDescriptor,
    pages: Vec<ResultPage>,
    in_flight: Option<InFlight>,
    error: Option<ApiError>,
}

impl QueryEntry {
    fn new(descriptor: SearchDescriptor) -> Self {
        Self {
            descriptor,
            pages: Vec::new(),
            in_flight: None,
            error: None,
        }
    }
}

/// Read-only view of the active search, as consumed by the UI.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryState {
    pub pages: Vec<ResultPage>,
    /// First page in flight with nothing loaded yet
    pub is_loading: bool,
    /// A page after the first is in flight
    pub is_fetching_next_page: bool,
    pub has_next_page: bool,
    pub error: Option<ApiError>,
}

impl QueryState {
    /// The visible result list.
    pub fn records(&self) -> Vec<ImageRecord> {
        flatten_pages(&self.pages)
    }

    pub fn is_fetching(&self) -> bool {
        self.is_loading || self.is_fetching_next_page
    }
}

/// Cache of paginated searches keyed by descriptor.
#[derive(Debug, Clone)]
pub struct InfiniteQueryCache {
    page_size: usize,
    entries: HashMap<QueryKey, QueryEntry>,
    active: Option<QueryKey>,
    next_token: u64,
}

impl InfiniteQueryCache {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            entries: HashMap::new(),
            active: None,
            next_token: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn active_key(&self) -> Option<&QueryKey> {
        self.active.as_ref()
    }

    /// Make `descriptor` the active search.
    ///
    /// Returns the first-page ticket when a request is needed. A disabled or
    /// absent descriptor deactivates the cache and issues nothing. The
    /// previously active search, if different, loses its in-flight request.
    pub fn activate(&mut self, descriptor: Option<SearchDescriptor>) -> Option<FetchTicket> {
        let descriptor = descriptor.filter(SearchDescriptor::is_enabled);
        let key = descriptor.as_ref().map(|d| d.key(self.page_size));

        if key != self.active {
            if let Some(previous) = self.active.take() {
                self.abandon(&previous);
            }
        }

        let (descriptor, key) = match (descriptor, key) {
            (Some(descriptor), Some(key)) => (descriptor, key),
            _ => return None,
        };
        self.active = Some(key.clone());

        let entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| QueryEntry::new(descriptor));

        if entry.in_flight.is_some() {
            return None;
        }
        if !entry.pages.is_empty() && entry.error.is_none() {
            log::debug!("Search cache hit for {}", key);
            return None;
        }

        // Errored or empty entry: start over from page 1.
        entry.pages.clear();
        entry.error = None;
        let token = bump(&mut self.next_token);
        Some(issue(entry, key, 1, token))
    }

    /// Ticket for the next page of the active search, if one may be fetched.
    ///
    /// No-op while a fetch is in flight, before page 1 has loaded, once a
    /// short page has been seen, or after a failure (see [`retry`](Self::retry)).
    pub fn fetch_next_page(&mut self) -> Option<FetchTicket> {
        let key = self.active.clone()?;
        let entry = self.entries.get_mut(&key)?;

        if entry.in_flight.is_some() || entry.error.is_some() || !has_next_page(&entry.pages, self.page_size) {
            return None;
        }
        let page = entry.pages.len() as u32 + 1;
        let token = bump(&mut self.next_token);
        Some(issue(entry, key, page, token))
    }

    /// Activate the current search again, as when the user resubmits it.
    ///
    /// A healthy entry is left alone; an errored one restarts at page 1.
    pub fn reactivate(&mut self) -> Option<FetchTicket> {
        let key = self.active.as_ref()?;
        let descriptor = self.entries.get(key)?.descriptor.clone();
        self.activate(Some(descriptor))
    }

    /// Re-request the page that failed for the active search.
    pub fn retry(&mut self) -> Option<FetchTicket> {
        let key = self.active.clone()?;
        let entry = self.entries.get_mut(&key)?;

        if entry.in_flight.is_some() || entry.error.take().is_none() {
            return None;
        }
        let page = entry.pages.len() as u32 + 1;
        let token = bump(&mut self.next_token);
        Some(issue(entry, key, page, token))
    }

    /// Hand a response back.
    pub fn resolve(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<ImageRecord>, ApiError>,
    ) -> Resolution {
        let Some(entry) = self.entries.get_mut(&ticket.key) else {
            return Resolution::Stale;
        };
        match entry.in_flight {
            Some(InFlight { token, page }) if token == ticket.token && page == ticket.page => {}
            _ => return Resolution::Stale,
        }
        entry.in_flight = None;

        match result {
            Ok(records) => {
                if ticket.page as usize != entry.pages.len() + 1 {
                    return Resolution::Stale;
                }
                entry.pages.push(ResultPage {
                    index: ticket.page,
                    records,
                });
                entry.error = None;
            }
            Err(error) => {
                entry.error = Some(error);
            }
        }
        Resolution::Applied
    }

    /// Drop every cached search and deactivate. In-flight responses become
    /// stale.
    pub fn invalidate_all(&mut self) {
        self.entries.clear();
        self.active = None;
    }

    /// Snapshot of the active search.
    pub fn state(&self) -> QueryState {
        let Some(entry) = self.active.as_ref().and_then(|key| self.entries.get(key)) else {
            return QueryState::default();
        };

        let in_flight_page = entry.in_flight.map(|f| f.page);
        QueryState {
            pages: entry.pages.clone(),
            is_loading: in_flight_page == Some(1),
            is_fetching_next_page: in_flight_page.is_some_and(|p| p > 1),
            has_next_page: has_next_page(&entry.pages, self.page_size),
            error: entry.error.clone(),
        }
    }

    fn abandon(&mut self, key: &QueryKey) {
        let evict = match self.entries.get_mut(key) {
            Some(entry) => {
                entry.in_flight = None;
                entry.pages.is_empty()
            }
            None => false,
        };
        if evict {
            self.entries.remove(key);
        }
    }
}

fn bump(counter: &mut u64) -> u64 {
    let token = *counter;
    *counter += 1;
    token
}

fn issue(entry: &mut QueryEntry, key: QueryKey, page: u32, token: u64) -> FetchTicket {
    entry.in_flight = Some(InFlight { token, page });
    log::debug!("Fetching page {} for {}", page, key);
    FetchTicket {
        key,
        descriptor: entry.descriptor.clone(),
        page,
        token,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FileInfo, SearchType};

    fn records(prefix: &str, count: usize) -> Vec<ImageRecord> {
        (0..count)
            .map(|i| ImageRecord {
                id: format!("{}-{}", prefix, i),
                url: format!("/static/images/{}-{}.jpg", prefix, i),
                title: None,
                author: None,
                born_died: None,
                date: None,
                technique: None,
                location: None,
                form: None,
                kind: None,
                school: None,
                timeline: None,
                description: None,
                tags: Vec::new(),
                upload_date: None,
                score: None,
            })
            .collect()
    }

    fn cats() -> SearchDescriptor {
        SearchDescriptor::text("cats", SearchType::Semantic).unwrap()
    }

    #[test]
    fn test_first_activation_requests_page_one() {
        let mut cache = InfiniteQueryCache::new(20);
        let ticket = cache.activate(Some(cats())).unwrap();
        assert_eq!(ticket.page, 1);
        assert!(cache.state().is_loading);

        // Same search again while in flight: no duplicate request.
        assert!(cache.activate(Some(cats())).is_none());
    }

    #[test]
    fn test_disabled_descriptor_issues_nothing() {
        let mut cache = InfiniteQueryCache::new(20);
        assert!(cache.activate(None).is_none());

        let blank = SearchDescriptor::Text {
            query: "  ".into(),
            search_type: SearchType::Keyword,
        };
        assert!(cache.activate(Some(blank)).is_none());
        assert_eq!(cache.state(), QueryState::default());
    }

    #[test]
    fn test_cats_scenario_twenty_then_five() {
        let mut cache = InfiniteQueryCache::new(20);

        let first = cache.activate(Some(cats())).unwrap();
        assert_eq!(cache.resolve(&first, Ok(records("p1", 20))), Resolution::Applied);
        assert!(cache.state().has_next_page);

        let second = cache.fetch_next_page().unwrap();
        assert_eq!(second.page, 2);
        assert!(cache.state().is_fetching_next_page);
        assert!(cache.fetch_next_page().is_none());

        assert_eq!(cache.resolve(&second, Ok(records("p2", 5))), Resolution::Applied);
        let state = cache.state();
        assert_eq!(state.records().len(), 25);
        assert!(!state.has_next_page);
        assert!(!state.is_fetching());
        assert_eq!(state.pages.iter().map(|p| p.index).collect::<Vec<_>>(), vec![1, 2]);

        assert!(cache.fetch_next_page().is_none());
    }

    #[test]
    fn test_next_page_requires_loaded_first_page() {
        let mut cache = InfiniteQueryCache::new(20);
        assert!(cache.fetch_next_page().is_none());
        cache.activate(Some(cats())).unwrap();
        assert!(cache.fetch_next_page().is_none());
    }

    #[test]
    fn test_superseded_response_is_discarded() {
        let mut cache = InfiniteQueryCache::new(20);
        let stale = cache.activate(Some(cats())).unwrap();

        let dogs = SearchDescriptor::text("dogs", SearchType::Semantic).unwrap();
        let fresh = cache.activate(Some(dogs)).unwrap();
        assert_ne!(stale.token, fresh.token);

        assert_eq!(cache.resolve(&stale, Ok(records("cat", 20))), Resolution::Stale);
        assert_eq!(cache.resolve(&fresh, Ok(records("dog", 3))), Resolution::Applied);

        let ids: Vec<String> = cache.state().records().into_iter().map(|r| r.id).collect();
        assert!(ids.iter().all(|id| id.starts_with("dog")));

        // Going back to "cats" starts over rather than reviving the old request.
        let retry = cache.activate(Some(cats())).unwrap();
        assert_eq!(retry.page, 1);
        assert_ne!(retry.token, stale.token);
    }

    #[test]
    fn test_type_change_restarts_pagination() {
        let mut cache = InfiniteQueryCache::new(20);
        let first = cache.activate(Some(cats())).unwrap();
        cache.resolve(&first, Ok(records("sem", 20)));
        let second = cache.fetch_next_page().unwrap();
        cache.resolve(&second, Ok(records("sem2", 20)));

        let keyword = SearchDescriptor::text("cats", SearchType::Keyword).unwrap();
        let ticket = cache.activate(Some(keyword)).unwrap();
        assert_eq!(ticket.page, 1);
        assert!(cache.state().pages.is_empty());
    }

    #[test]
    fn test_cached_search_is_reused() {
        let mut cache = InfiniteQueryCache::new(20);
        let first = cache.activate(Some(cats())).unwrap();
        cache.resolve(&first, Ok(records("c", 20)));

        cache.activate(None);
        assert_eq!(cache.state(), QueryState::default());

        assert!(cache.activate(Some(cats())).is_none());
        assert_eq!(cache.state().records().len(), 20);
    }

    #[test]
    fn test_error_then_recovery() {
        let mut cache = InfiniteQueryCache::new(2);
        let first = cache.activate(Some(cats())).unwrap();
        cache.resolve(&first, Ok(records("a", 2)));

        let second = cache.fetch_next_page().unwrap();
        cache.resolve(&second, Err(ApiError::Timeout));
        let state = cache.state();
        assert_eq!(state.error, Some(ApiError::Timeout));
        assert_eq!(state.pages.len(), 1);

        // Scrolling does not hammer a failing page; an explicit retry does.
        assert!(cache.fetch_next_page().is_none());
        let again = cache.retry().unwrap();
        assert_eq!(again.page, 2);
        assert!(cache.state().error.is_none());
        assert!(cache.retry().is_none());
        cache.resolve(&again, Ok(records("b", 1)));
        let state = cache.state();
        assert!(state.error.is_none());
        assert_eq!(state.records().len(), 3);
        assert!(!state.has_next_page);
    }

    #[test]
    fn test_errored_first_page_refetches_on_activation() {
        let mut cache = InfiniteQueryCache::new(20);
        let first = cache.activate(Some(cats())).unwrap();
        cache.resolve(&first, Err(ApiError::Network("offline".into())));
        assert!(cache.state().error.is_some());

        cache.activate(None);
        let ticket = cache.activate(Some(cats())).unwrap();
        assert_eq!(ticket.page, 1);
        assert!(cache.state().error.is_none());

        cache.resolve(&ticket, Err(ApiError::Timeout));
        assert_eq!(cache.retry().map(|t| t.page), Some(1));
    }

    #[test]
    fn test_resubmitting_failed_search_refetches() {
        let mut cache = InfiniteQueryCache::new(2);
        assert!(cache.reactivate().is_none());

        let first = cache.activate(Some(cats())).unwrap();
        cache.resolve(&first, Ok(records("a", 2)));
        assert!(cache.reactivate().is_none());

        let second = cache.fetch_next_page().unwrap();
        cache.resolve(&second, Err(ApiError::Network("offline".into())));

        let ticket = cache.reactivate().unwrap();
        assert_eq!(ticket.page, 1);
        let state = cache.state();
        assert!(state.error.is_none());
        assert!(state.is_loading);
        assert!(cache.reactivate().is_none());
    }

    #[test]
    fn test_duplicate_ids_across_pages_are_dropped() {
        let mut cache = InfiniteQueryCache::new(3);
        let first = cache.activate(Some(cats())).unwrap();
        cache.resolve(&first, Ok(records("x", 3)));
        let second = cache.fetch_next_page().unwrap();
        let mut overlap = records("x", 1);
        overlap.extend(records("y", 2));
        cache.resolve(&second, Ok(overlap));

        let ids: Vec<String> = cache.state().records().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["x-0", "x-1", "x-2", "y-0", "y-1"]);
    }

    #[test]
    fn test_invalidate_all_drops_late_responses() {
        let mut cache = InfiniteQueryCache::new(20);
        let first = cache.activate(Some(cats())).unwrap();
        cache.invalidate_all();
        assert_eq!(cache.resolve(&first, Ok(records("c", 20))), Resolution::Stale);
        assert!(cache.active_key().is_none());

        let ticket = cache.activate(Some(cats())).unwrap();
        assert_eq!(ticket.page, 1);
    }

    #[test]
    fn test_image_descriptor_pages() {
        let mut cache = InfiniteQueryCache::new(20);
        let file = FileInfo {
            name: "query.jpg".into(),
            mime_type: "image/jpeg".into(),
            size: 2048,
            last_modified: 1,
        };
        let ticket = cache.activate(Some(SearchDescriptor::image(file))).unwrap();
        assert_eq!(ticket.page, 1);
        cache.resolve(&ticket, Ok(records("img", 20)));
        assert!(cache.state().has_next_page);
    }
}
