//! Related-images lookups.
//!
//! Neighbours of a record are treated as immutable for the session: once
//! fetched for an id they are served from memory. Only revoked tickets are
//! dropped; a late answer for an id that is no longer displayed is still
//! valid data and is kept.

use std::collections::HashMap;

use crate::error::ApiError;
use crate::models::ImageRecord;

/// Handle for one in-flight related lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedTicket {
    pub image_id: String,
    pub count: usize,
    pub token: u64,
}

/// Read-only view of the related panel for the requested id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RelatedState {
    pub images: Vec<ImageRecord>,
    pub is_loading: bool,
    pub error: Option<ApiError>,
}

#[derive(Debug, Clone, Default)]
struct RelatedEntry {
    images: Option<Vec<ImageRecord>>,
    in_flight: Option<u64>,
    error: Option<ApiError>,
}

/// Cache of related-image lists keyed by record id.
#[derive(Debug, Clone)]
pub struct RelatedCache {
    count: usize,
    entries: HashMap<String, RelatedEntry>,
    requested: Option<String>,
    next_token: u64,
}

impl RelatedCache {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            entries: HashMap::new(),
            requested: None,
            next_token: 1,
        }
    }

    /// Point the panel at `image_id`.
    ///
    /// Returns a ticket when the id has neither data nor a request in
    /// flight. `None` clears the panel without a request.
    pub fn request(&mut self, image_id: Option<&str>) -> Option<RelatedTicket> {
        let id = image_id.map(str::trim).filter(|id| !id.is_empty());
        self.requested = id.map(str::to_string);
        let id = id?;

        let entry = self.entries.entry(id.to_string()).or_default();
        if entry.in_flight.is_some() || entry.images.is_some() {
            return None;
        }

        let token = self.next_token;
        self.next_token += 1;
        entry.in_flight = Some(token);
        entry.error = None;

        Some(RelatedTicket {
            image_id: id.to_string(),
            count: self.count,
            token,
        })
    }

    /// Hand a response back. Returns `false` when the ticket was revoked.
    pub fn resolve(&mut self, ticket: &RelatedTicket, result: Result<Vec<ImageRecord>, ApiError>) -> bool {
        let Some(entry) = self.entries.get_mut(&ticket.image_id) else {
            return false;
        };
        if entry.in_flight != Some(ticket.token) {
            return false;
        }
        entry.in_flight = None;

        match result {
            Ok(mut images) => {
                // The backend may include the record itself among its neighbours.
                images.retain(|image| image.id != ticket.image_id);
                images.truncate(ticket.count);
                entry.images = Some(images);
            }
            Err(error) => entry.error = Some(error),
        }
        true
    }

    /// Drop everything. In-flight responses are revoked.
    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }

    /// Snapshot for the requested id.
    pub fn state(&self) -> RelatedState {
        let Some(entry) = self.requested.as_ref().and_then(|id| self.entries.get(id)) else {
            return RelatedState::default();
        };
        RelatedState {
            images: entry.images.clone().unwrap_or_default(),
            is_loading: entry.in_flight.is_some(),
            error: entry.error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> ImageRecord {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "url": format!("/static/images/{}.jpg", id),
            "score": 0.5
        }))
        .unwrap()
    }

    #[test]
    fn test_absent_id_issues_nothing() {
        let mut cache = RelatedCache::new(6);
        assert!(cache.request(None).is_none());
        assert!(cache.request(Some("  ")).is_none());
        assert_eq!(cache.state(), RelatedState::default());
    }

    #[test]
    fn test_fetch_once_per_id() {
        let mut cache = RelatedCache::new(6);
        let ticket = cache.request(Some("a")).unwrap();
        assert_eq!(ticket.count, 6);
        assert!(cache.state().is_loading);
        assert!(cache.request(Some("a")).is_none());

        assert!(cache.resolve(&ticket, Ok(vec![record("b"), record("c")])));
        let state = cache.state();
        assert!(!state.is_loading);
        assert_eq!(state.images.len(), 2);

        assert!(cache.request(Some("a")).is_none());
    }

    #[test]
    fn test_self_match_and_overflow_are_trimmed() {
        let mut cache = RelatedCache::new(2);
        let ticket = cache.request(Some("a")).unwrap();
        cache.resolve(&ticket, Ok(vec![record("a"), record("b"), record("c"), record("d")]));
        let ids: Vec<String> = cache.state().images.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_late_answer_for_previous_id_is_kept() {
        let mut cache = RelatedCache::new(6);
        let first = cache.request(Some("a")).unwrap();
        let second = cache.request(Some("b")).unwrap();

        assert!(cache.resolve(&first, Ok(vec![record("x")])));
        // Panel shows "b", still loading.
        assert!(cache.state().is_loading);

        cache.resolve(&second, Ok(vec![record("y")]));
        assert_eq!(cache.state().images[0].id, "y");

        // Navigating back to "a" is served from memory.
        assert!(cache.request(Some("a")).is_none());
        assert_eq!(cache.state().images[0].id, "x");

        // Closing the panel empties the view but keeps the data.
        assert!(cache.request(None).is_none());
        assert_eq!(cache.state(), RelatedState::default());
    }

    #[test]
    fn test_error_surfaces_and_invalidate_revokes() {
        let mut cache = RelatedCache::new(6);
        let ticket = cache.request(Some("a")).unwrap();
        cache.resolve(&ticket, Err(ApiError::Status { status: 404, detail: None }));
        assert!(cache.state().error.is_some());

        let ticket = cache.request(Some("z")).unwrap();
        cache.invalidate_all();
        assert!(!cache.resolve(&ticket, Ok(vec![record("q")])));
    }
}
