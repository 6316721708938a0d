//! Image Hub - Frontend Rust/Leptos Application
//!
//! A WebAssembly frontend for searching and browsing an image catalog:
//! text and reverse-image search, infinite scroll, a detail view with
//! related images, and uploads.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  HomePage (PageController in one RwSignal)                  │
//! │  ├── Header (upload button)                                 │
//! │  ├── SearchInput ──▶ text / image query hooks               │
//! │  ├── ImageGrid (authoritative result set)                   │
//! │  ├── ImageModal (related images hook, arrow keys)           │
//! │  ├── UploadModal                                            │
//! │  └── Footer                                                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`config`] - build-time configuration and tunables
//! - [`types`] - browser-side types (picked files, search requests)
//! - [`components`] - UI components
//! - [`services`] - API client, fetches and query hooks

use imagehub::{ImageRecord, KeyCommand, PageController, QueryState, SearchChange, SearchEvent, SearchMode};
use leptos::*;
use leptos_meta::*;
use leptos_router::*;

// =============================================================================
// Module declarations
// =============================================================================

pub mod components;
pub mod config;
pub mod services;
pub mod types;

// =============================================================================
// Re-exports
// =============================================================================

pub use components::*;
pub use config::*;
pub use services::*;
pub use types::{LocalFile, SearchRequest};

// =============================================================================
// Application Entry Point
// =============================================================================

/// Install logging and mount the application.
pub fn start() {
    console_error_panic_hook::set_once();
    _ = console_log::init_with_level(log::Level::Debug);

    log::info!("🦀 {} - Starting Leptos App (API at {})", APP_NAME, API_URL);

    mount_to_body(|| view! { <App/> });
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    provide_context(HubClient::new(hub_config()));

    view! {
        <Title text=APP_NAME/>
        <Router>
            <main>
                <Routes>
                    <Route path="/" view=HomePage/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn HomePage() -> impl IntoView {
    let page = create_rw_signal(PageController::new());
    let image_file = create_rw_signal(None::<LocalFile>);

    let active_search = create_memo(move |_| page.with(|p| p.active_search.clone()));
    let text_descriptor = create_memo(move |_| page.with(|p| p.search_for(SearchMode::Text)));
    let image_descriptor = create_memo(move |_| page.with(|p| p.search_for(SearchMode::Image)));
    let selected = create_memo(move |_| page.with(|p| p.selected.clone()));
    let selected_id = create_memo(move |_| selected.with(|r| r.as_ref().map(|r| r.id.clone())));

    let text_search = use_text_search(text_descriptor.into());
    let image_search = use_image_search(image_descriptor.into(), image_file.into());
    let related = use_related_images(selected_id.into());

    // Only the active search feeds the grid.
    let authoritative = move || match page.with_untracked(PageController::authoritative_mode) {
        Some(SearchMode::Text) => Some(text_search),
        Some(SearchMode::Image) => Some(image_search),
        None => None,
    };
    let query_state = create_memo(move |_| match page.with(PageController::authoritative_mode) {
        Some(SearchMode::Text) => text_search.state().get(),
        Some(SearchMode::Image) => image_search.state().get(),
        None => QueryState::default(),
    });
    let searching = Signal::derive(move || active_search.with(Option::is_some));

    let on_search = move |request: SearchRequest| {
        match (&request.event, request.file) {
            (SearchEvent::Search(_), Some(file)) => image_file.set(Some(file)),
            (SearchEvent::Cleared, _) => image_file.set(None),
            _ => {}
        }
        let change = page.try_update(|p| p.apply_search_event(request.event));
        if change == Some(SearchChange::Resubmitted) {
            if let Some(search) = authoritative() {
                search.reactivate();
            }
        }
    };

    let on_load_more = move |_: ()| {
        if let Some(search) = authoritative() {
            search.fetch_next_page();
        }
    };
    let on_retry = move |_: ()| {
        if let Some(search) = authoritative() {
            search.retry();
        }
    };

    let on_select = move |record: ImageRecord| page.update(|p| p.select(record));
    let on_close = move |_: ()| page.update(PageController::close_modal);
    let on_key = move |command: KeyCommand| {
        let records = query_state.with_untracked(QueryState::records);
        page.update(|p| {
            p.handle_key(command, &records);
        });
    };

    let on_upload_success = move |_: ()| {
        log::info!("Upload finished, clearing cached searches");
        page.update(PageController::upload_succeeded);
        text_search.invalidate();
        image_search.invalidate();
        related.invalidate();
        image_file.set(None);
    };

    view! {
        <Header on_upload=move |_: ()| page.update(PageController::open_upload)/>

        <div class="container">
            <SearchInput active_search=active_search on_search=on_search/>
            <ImageGrid
                state=query_state
                searching=searching
                on_load_more=on_load_more
                on_retry=on_retry
                on_select=on_select
            />
        </div>

        <Show when=move || page.with(|p| p.modal_open)>
            <ImageModal
                record=selected
                related=related
                on_key=on_key
                on_select=on_select
                on_close=on_close
            />
        </Show>

        <Show when=move || page.with(|p| p.upload_modal_open)>
            <UploadModal
                on_close=move |_: ()| page.update(PageController::close_upload)
                on_success=on_upload_success
            />
        </Show>

        <Footer/>
    }
}
