//! Detail view of one record.
//!
//! Arrow keys move through the loaded results, Escape closes. The related
//! panel shows neighbours of whichever record is displayed; picking one
//! displays it in place.

use imagehub::{HubConfig, ImageRecord, KeyCommand, RelatedState};
use leptos::*;

use crate::services::{HubClient, RelatedImages};

#[component]
pub fn ImageModal(
    #[prop(into)] record: Signal<Option<ImageRecord>>,
    related: RelatedImages,
    #[prop(into)] on_key: Callback<KeyCommand>,
    #[prop(into)] on_select: Callback<ImageRecord>,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    let client = expect_context::<HubClient>();
    let config = store_value(client.config().clone());

    let handle = window_event_listener(ev::keydown, move |ev| {
        if let Some(command) = KeyCommand::from_key(&ev.key()) {
            ev.prevent_default();
            on_key.call(command);
        }
    });
    on_cleanup(move || handle.remove());

    lock_body_scroll(true);
    on_cleanup(|| lock_body_scroll(false));

    let related_state = related.state();

    view! {
        <div class="modal-backdrop" on:click=move |_| on_close.call(())>
            <div class="modal image-modal" on:click=|ev| ev.stop_propagation()>
                <button class="modal-close" title="Close" on:click=move |_| on_close.call(())>"×"</button>
                {move || record.get().map(|record| view! {
                    <RecordDetail record=record config=config/>
                })}
                <RelatedPanel state=related_state config=config on_select=on_select/>
            </div>
        </div>
    }
}

#[component]
fn RecordDetail(record: ImageRecord, config: StoredValue<HubConfig>) -> impl IntoView {
    let src = config.with_value(|config| config.asset(&record.url));
    let title = record.display_title().to_string();
    let author = record.author_line();
    let uploaded = record.formatted_upload_date();
    let score = record.score_percent();
    let attributes: Vec<(&'static str, String)> = record
        .attributes()
        .into_iter()
        .map(|(label, value)| (label, value.to_string()))
        .collect();
    let description = record.description.clone().filter(|d| !d.trim().is_empty());
    let tags = record.tags.clone();

    view! {
        <div class="record-detail">
            <img class="detail-image" src=src alt=title.clone()/>
            <div class="detail-info">
                <h2>{title}</h2>
                {author.map(|author| view! { <div class="detail-author">{author}</div> })}
                {score.map(|pct| view! { <span class="score-badge">{format!("{}% match", pct)}</span> })}

                <dl class="detail-attributes">
                    {attributes
                        .into_iter()
                        .map(|(label, value)| view! {
                            <dt>{label}</dt>
                            <dd>{value}</dd>
                        })
                        .collect_view()}
                    {uploaded.map(|date| view! {
                        <dt>"Uploaded"</dt>
                        <dd>{date}</dd>
                    })}
                </dl>

                {description.map(|text| view! { <p class="detail-description">{text}</p> })}

                {(!tags.is_empty()).then(|| view! {
                    <div class="detail-tags">
                        {tags.into_iter().map(|tag| view! { <span class="tag">{tag}</span> }).collect_view()}
                    </div>
                })}
            </div>
        </div>
    }
}

#[component]
fn RelatedPanel(
    state: Memo<RelatedState>,
    config: StoredValue<HubConfig>,
    on_select: Callback<ImageRecord>,
) -> impl IntoView {
    view! {
        <section class="related-panel">
            <h3>"Related images"</h3>
            {move || state.with(|s| {
                if s.is_loading {
                    view! { <div class="grid-message loading">"Loading related images…"</div> }.into_view()
                } else if let Some(err) = &s.error {
                    view! { <div class="error-message">{err.to_string()}</div> }.into_view()
                } else if s.images.is_empty() {
                    view! { <div class="grid-message">"No related images"</div> }.into_view()
                } else {
                    s.images
                        .iter()
                        .cloned()
                        .map(|image| {
                            let src = config.with_value(|config| config.asset(&image.url));
                            let title = image.display_title().to_string();
                            let score = image.score_percent();
                            view! {
                                <figure class="related-card" on:click=move |_| on_select.call(image.clone())>
                                    <img src=src alt=title.clone() loading="lazy"/>
                                    <figcaption>
                                        {title}
                                        {score.map(|pct| view! { <span class="score-badge">{format!("{}%", pct)}</span> })}
                                    </figcaption>
                                </figure>
                            }
                        })
                        .collect_view()
                }
            })}
        </section>
    }
}

/// Keep the page behind an open modal from scrolling.
fn lock_body_scroll(locked: bool) {
    let body = gloo_utils::body();
    let result = if locked {
        body.class_list().add_1("modal-open")
    } else {
        body.class_list().remove_1("modal-open")
    };
    if let Err(e) = result {
        log::warn!("Could not toggle body scroll lock: {:?}", e);
    }
}
