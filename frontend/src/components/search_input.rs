//! Search bar: free text with a ranking type, or a query image.
//!
//! Typing alone never searches. Enter or the button submits; choosing a
//! file searches at once. The ranking selector re-runs an active text
//! search immediately.

use imagehub::{SearchDescriptor, SearchEvent, SearchInputState, SearchMode, SearchType};
use leptos::*;
use web_sys::{Event, HtmlInputElement, KeyboardEvent};

use crate::types::{LocalFile, SearchRequest};

#[component]
pub fn SearchInput(
    /// The page's active search. When it is reset upstream the input
    /// forgets its own.
    #[prop(into)]
    active_search: Signal<Option<SearchDescriptor>>,
    #[prop(into)] on_search: Callback<SearchRequest>,
) -> impl IntoView {
    let input = create_rw_signal(SearchInputState::new());
    let file_input = create_node_ref::<html::Input>();

    create_effect(move |_| {
        if active_search.with(Option::is_none) && input.with_untracked(|s| s.active.is_some()) {
            input.update(SearchInputState::forget_active);
        }
    });

    let emit = move |event: SearchEvent| {
        if event != SearchEvent::Unchanged {
            on_search.call(SearchRequest::new(event));
        }
    };

    let submit = move || {
        if let Some(event) = input.try_update(SearchInputState::submit) {
            emit(event);
        }
    };

    let set_mode = move |mode: SearchMode| {
        if let Some(event) = input.try_update(|s| s.set_mode(mode)) {
            emit(event);
        }
        if let Some(el) = file_input.get_untracked() {
            el.set_value("");
        }
    };

    let on_type_change = move |ev: Event| match event_target_value(&ev).parse::<SearchType>() {
        Ok(search_type) => {
            if let Some(event) = input.try_update(|s| s.set_search_type(search_type)) {
                emit(event);
            }
        }
        Err(e) => log::warn!("{}", e),
    };

    let on_keydown = move |ev: KeyboardEvent| {
        if ev.key() == "Enter" {
            ev.prevent_default();
            submit();
        }
    };

    let on_file_change = move |ev: Event| {
        let target: HtmlInputElement = event_target(&ev);
        let Some(local) = LocalFile::from_input(&target) else {
            return;
        };

        match input.try_update(|s| s.select_file(local.info.clone())) {
            Some(Ok(event)) => {
                log::info!("Reverse image search with {}", local.info.name);
                on_search.call(SearchRequest::with_file(event, local));
            }
            Some(Err(e)) => {
                log::warn!("Rejected {}: {}", local.info.name, e);
                target.set_value("");
            }
            None => {}
        }
    };

    let on_clear = move |_| {
        if let Some(event) = input.try_update(SearchInputState::clear) {
            emit(event);
        }
        if let Some(el) = file_input.get_untracked() {
            el.set_value("");
        }
    };

    let mode = move || input.with(|s| s.mode);

    view! {
        <div class="search-input">
            <div class="mode-toggle">
                <button
                    class="mode-button"
                    class:active=move || mode() == SearchMode::Text
                    on:click=move |_| set_mode(SearchMode::Text)
                >
                    "Text"
                </button>
                <button
                    class="mode-button"
                    class:active=move || mode() == SearchMode::Image
                    on:click=move |_| set_mode(SearchMode::Image)
                >
                    "Image"
                </button>
            </div>

            <Show
                when=move || mode() == SearchMode::Text
                fallback=move || view! {
                    <label class="file-picker">
                        <input
                            type="file"
                            accept="image/jpeg"
                            node_ref=file_input
                            on:change=on_file_change
                        />
                        <span>
                            {move || input.with(|s| {
                                s.selected_file
                                    .as_ref()
                                    .map(|f| f.name.clone())
                                    .unwrap_or_else(|| "Choose a JPEG image…".to_string())
                            })}
                        </span>
                    </label>
                }
            >
                <input
                    type="search"
                    class="query"
                    placeholder="Search the catalog…"
                    prop:value=move || input.with(|s| s.query.clone())
                    on:input=move |ev| input.update(|s| s.set_query(event_target_value(&ev)))
                    on:keydown=on_keydown
                />
                <select
                    class="search-type"
                    prop:value=move || input.with(|s| s.search_type.as_str().to_string())
                    on:change=on_type_change
                >
                    {SearchType::ALL
                        .into_iter()
                        .map(|t| view! { <option value=t.as_str()>{t.label()}</option> })
                        .collect_view()}
                </select>
                <button class="search-button" on:click=move |_| submit()>
                    "Search"
                </button>
            </Show>

            <button class="clear-button" on:click=on_clear>"Clear"</button>

            <Show when=move || input.with(|s| s.error.is_some())>
                <div class="error-message">
                    {move || input.with(|s| s.error.clone().unwrap_or_default())}
                </div>
            </Show>
        </div>
    }
}
