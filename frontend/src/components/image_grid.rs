//! Result grid with infinite scroll.
//!
//! A sentinel below the last card is watched by an `IntersectionObserver`.
//! While it is visible and the active search has another page, the next page
//! is requested; the request re-fires after each page lands for as long as
//! the sentinel stays in view.

use imagehub::{HubConfig, ImageRecord, QueryState};
use leptos::*;
use wasm_bindgen::prelude::*;
use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::config::SCROLL_ROOT_MARGIN;
use crate::services::HubClient;

/// What the grid should render for a given query state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridView {
    /// No search is active
    Idle,
    /// First page in flight
    Loading,
    /// First page failed
    Failed,
    /// Search ran and found nothing
    Empty,
    Results,
}

impl GridView {
    pub fn of(state: &QueryState, searching: bool) -> Self {
        if !searching {
            GridView::Idle
        } else if state.is_loading {
            GridView::Loading
        } else if state.pages.is_empty() && state.error.is_some() {
            GridView::Failed
        } else if state.pages.iter().all(|page| page.records.is_empty()) {
            GridView::Empty
        } else {
            GridView::Results
        }
    }
}

#[component]
pub fn ImageGrid(
    #[prop(into)] state: Signal<QueryState>,
    /// Whether any search is active
    #[prop(into)]
    searching: Signal<bool>,
    #[prop(into)] on_load_more: Callback<()>,
    #[prop(into)] on_retry: Callback<()>,
    #[prop(into)] on_select: Callback<ImageRecord>,
) -> impl IntoView {
    let client = expect_context::<HubClient>();
    let config = store_value(client.config().clone());

    let records = create_memo(move |_| state.with(QueryState::records));
    let grid_view = create_memo(move |_| state.with(|s| GridView::of(s, searching.get())));
    let error = move || state.with(|s| s.error.as_ref().map(ToString::to_string));

    let (sentinel_visible, set_sentinel_visible) = create_signal(false);
    let sentinel = create_node_ref::<html::Div>();
    let observer = store_value(None::<IntersectionObserver>);

    sentinel.on_load(move |el| {
        let callback = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
            let visible = entries
                .iter()
                .any(|entry| entry.unchecked_into::<IntersectionObserverEntry>().is_intersecting());
            set_sentinel_visible.set(visible);
        });

        let options = IntersectionObserverInit::new();
        options.set_root_margin(SCROLL_ROOT_MARGIN);
        match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options) {
            Ok(obs) => {
                obs.observe(&el);
                observer.set_value(Some(obs));
            }
            Err(e) => log::error!("IntersectionObserver unavailable: {:?}", e),
        }
        callback.forget();
    });

    on_cleanup(move || {
        if let Some(obs) = observer.try_get_value().flatten() {
            obs.disconnect();
        }
    });

    create_effect(move |_| {
        let visible = sentinel_visible.get();
        let ready = state.with(|s| s.has_next_page && !s.is_fetching() && s.error.is_none());
        if visible && ready {
            on_load_more.call(());
        }
    });

    view! {
        <section class="image-grid-section">
            {move || match grid_view.get() {
                GridView::Idle => view! {
                    <div class="grid-message">"Search by text or with an image to explore the catalog."</div>
                }.into_view(),
                GridView::Loading => view! {
                    <div class="grid-message loading">"Searching…"</div>
                }.into_view(),
                GridView::Failed => view! {
                    <div class="grid-message error-message">
                        {error}
                        <button class="retry-button" on:click=move |_| on_retry.call(())>"Retry"</button>
                    </div>
                }.into_view(),
                GridView::Empty => view! {
                    <div class="grid-message">"No images found"</div>
                }.into_view(),
                GridView::Results => view! {
                    <div class="image-grid">
                        <For
                            each=move || records.get()
                            key=|record| record.id.clone()
                            children=move |record| view! {
                                <ImageCard record=record config=config on_select=on_select/>
                            }
                        />
                    </div>
                }.into_view(),
            }}

            <Show when=move || state.with(|s| s.is_fetching_next_page)>
                <div class="grid-message loading">"Loading more…"</div>
            </Show>
            <Show when=move || grid_view.get() == GridView::Results && state.with(|s| s.error.is_some())>
                <div class="grid-message error-message">
                    {error}
                    <button class="retry-button" on:click=move |_| on_retry.call(())>"Retry"</button>
                </div>
            </Show>

            <div class="scroll-sentinel" node_ref=sentinel></div>
        </section>
    }
}

#[component]
fn ImageCard(record: ImageRecord, config: StoredValue<HubConfig>, on_select: Callback<ImageRecord>) -> impl IntoView {
    let src = config.with_value(|config| config.asset(&record.url));
    let title = record.display_title().to_string();
    let author = record.author.clone().unwrap_or_default();
    let score = record.score_percent();

    view! {
        <figure class="image-card" on:click=move |_| on_select.call(record.clone())>
            <img src=src alt=title.clone() loading="lazy"/>
            <figcaption>
                <div class="card-title">{title}</div>
                <div class="card-author">{author}</div>
                {score.map(|pct| view! { <span class="score-badge">{format!("{}%", pct)}</span> })}
            </figcaption>
        </figure>
    }
}
