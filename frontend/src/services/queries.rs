//! Reactive query hooks.
//!
//! Each hook owns one core cache inside an `RwSignal`, watches a descriptor
//! signal and spawns the fetches the cache asks for. Responses go back
//! through the cache, which drops anything superseded in the meantime.

use imagehub::{
    FetchTicket, InfiniteQueryCache, QueryState, RelatedCache, RelatedState, RelatedTicket, Resolution,
    SearchDescriptor,
};
use leptos::*;

use super::client::HubClient;
use super::search::{fetch_related, fetch_search_page};
use crate::types::LocalFile;

// =============================================================================
// Paginated Searches
// =============================================================================

/// Handle returned by [`use_text_search`] and [`use_image_search`].
#[derive(Clone, Copy)]
pub struct InfiniteSearch {
    cache: RwSignal<InfiniteQueryCache>,
    state: Memo<QueryState>,
    file: Signal<Option<LocalFile>>,
    client: StoredValue<HubClient>,
}

impl InfiniteSearch {
    pub fn state(&self) -> Memo<QueryState> {
        self.state
    }

    /// Request the next page if one may be fetched now.
    pub fn fetch_next_page(&self) {
        if let Some(ticket) = self.cache.try_update(|cache| cache.fetch_next_page()).flatten() {
            self.run(ticket);
        }
    }

    /// Refetch the current search from page 1 if it failed.
    pub fn reactivate(&self) {
        if let Some(ticket) = self.cache.try_update(|cache| cache.reactivate()).flatten() {
            log::info!("Search resubmitted: {}", ticket.key);
            self.run(ticket);
        }
    }

    /// Re-request the page that failed.
    pub fn retry(&self) {
        if let Some(ticket) = self.cache.try_update(|cache| cache.retry()).flatten() {
            log::info!("Retrying page {} of {}", ticket.page, ticket.key);
            self.run(ticket);
        }
    }

    /// Forget every cached result.
    pub fn invalidate(&self) {
        self.cache.update(|cache| cache.invalidate_all());
    }

    fn run(&self, ticket: FetchTicket) {
        let this = *self;
        spawn_local(async move {
            let client = this.client.get_value();
            let file = this.file.get_untracked().map(|local| local.file);
            let result = fetch_search_page(&client, &ticket, file.as_ref()).await;
            if let Err(e) = &result {
                log::error!("Search page {} of {} failed: {}", ticket.page, ticket.key, e);
            }

            match this.cache.try_update(|cache| cache.resolve(&ticket, result)) {
                Some(Resolution::Applied) => {}
                Some(Resolution::Stale) => {
                    log::debug!("Discarded stale page {} of {}", ticket.page, ticket.key)
                }
                None => log::debug!("Search for {} finished after unmount", ticket.key),
            }
        });
    }
}

/// Paginated text search driven by `descriptor`.
pub fn use_text_search(descriptor: Signal<Option<SearchDescriptor>>) -> InfiniteSearch {
    use_infinite_search(descriptor, Signal::derive(|| None))
}

/// Paginated reverse-image search. `file` holds the bytes for the
/// descriptor's [`FileInfo`](imagehub::FileInfo).
pub fn use_image_search(
    descriptor: Signal<Option<SearchDescriptor>>,
    file: Signal<Option<LocalFile>>,
) -> InfiniteSearch {
    use_infinite_search(descriptor, file)
}

fn use_infinite_search(
    descriptor: Signal<Option<SearchDescriptor>>,
    file: Signal<Option<LocalFile>>,
) -> InfiniteSearch {
    let client = expect_context::<HubClient>();
    let cache = create_rw_signal(InfiniteQueryCache::new(client.config().page_size));
    let state = create_memo(move |_| cache.with(InfiniteQueryCache::state));

    let search = InfiniteSearch {
        cache,
        state,
        file,
        client: store_value(client),
    };

    create_effect(move |_| {
        let descriptor = descriptor.get();
        if let Some(descriptor) = &descriptor {
            log::info!("Search: {}", descriptor.key(cache.with_untracked(InfiniteQueryCache::page_size)));
        }
        if let Some(ticket) = cache.try_update(|cache| cache.activate(descriptor)).flatten() {
            search.run(ticket);
        }
    });

    search
}

// =============================================================================
// Related Images
// =============================================================================

/// Handle returned by [`use_related_images`].
#[derive(Clone, Copy)]
pub struct RelatedImages {
    cache: RwSignal<RelatedCache>,
    state: Memo<RelatedState>,
}

impl RelatedImages {
    pub fn state(&self) -> Memo<RelatedState> {
        self.state
    }

    /// Forget every cached list.
    pub fn invalidate(&self) {
        self.cache.update(|cache| cache.invalidate_all());
    }
}

/// Related images of the record whose id `image_id` holds.
///
/// Lists are fetched once per id and kept for the session.
pub fn use_related_images(image_id: Signal<Option<String>>) -> RelatedImages {
    let client = store_value(expect_context::<HubClient>());
    let count = client.with_value(|client| client.config().related_count);
    let cache = create_rw_signal(RelatedCache::new(count));
    let state = create_memo(move |_| cache.with(RelatedCache::state));

    create_effect(move |_| {
        let id = image_id.get();
        if let Some(ticket) = cache.try_update(|cache| cache.request(id.as_deref())).flatten() {
            run_related(cache, client, ticket);
        }
    });

    RelatedImages { cache, state }
}

fn run_related(cache: RwSignal<RelatedCache>, client: StoredValue<HubClient>, ticket: RelatedTicket) {
    spawn_local(async move {
        let client = client.get_value();
        let result = fetch_related(&client, &ticket).await;
        if let Err(e) = &result {
            log::error!("Related images for {} failed: {}", ticket.image_id, e);
        }
        if cache.try_update(|cache| cache.resolve(&ticket, result)) != Some(true) {
            log::debug!("Discarded related images for {}", ticket.image_id);
        }
    });
}
