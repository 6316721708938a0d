//! Upload form for a new catalog image.
//!
//! Validation happens before any request: a JPEG file, then a title. On
//! success the banner shows for a moment, then the modal closes and the
//! page is told. The modal cannot be closed until then. Closing always
//! clears the form.

use gloo_timers::future::TimeoutFuture;
use imagehub::upload::{SUCCESS_CLOSE_DELAY, UPLOAD_SUCCESS_MESSAGE};
use imagehub::{ApiError, MetadataField, UploadDraft, UploadStatus};
use leptos::*;
use web_sys::{Event, HtmlInputElement, SubmitEvent};

use crate::services::client::millis;
use crate::services::{create_image, HubClient};
use crate::types::{revoke_preview, LocalFile};

#[component]
pub fn UploadModal(#[prop(into)] on_close: Callback<()>, #[prop(into)] on_success: Callback<()>) -> impl IntoView {
    let client = store_value(expect_context::<HubClient>());
    let draft = create_rw_signal(UploadDraft::new());
    let local_file = create_rw_signal(None::<LocalFile>);
    let preview = create_rw_signal(None::<String>);

    let submitting = move || draft.with(|d| d.status.is_submitting());
    let held = move || draft.with(|d| d.status.holds_modal());

    let reset = move || {
        if let Some(url) = preview.try_update(Option::take).flatten() {
            revoke_preview(&url);
        }
        _ = local_file.try_set(None);
        draft.try_update(UploadDraft::reset);
    };
    on_cleanup(reset);

    let close = move || {
        if draft.with_untracked(|d| d.status.holds_modal()) {
            return;
        }
        reset();
        on_close.call(());
    };

    let on_file_change = move |ev: Event| {
        let target: HtmlInputElement = event_target(&ev);
        let Some(local) = LocalFile::from_input(&target) else {
            return;
        };

        match draft.try_update(|d| d.select_file(local.info.clone())) {
            Some(Ok(())) => {
                if let Some(old) = preview.get_untracked() {
                    revoke_preview(&old);
                }
                preview.set(local.preview_url());
                local_file.set(Some(local));
            }
            Some(Err(e)) => {
                log::warn!("Rejected {}: {}", local.info.name, e);
                target.set_value("");
            }
            None => {}
        }
    };

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();

        let payload = match draft.try_update(UploadDraft::begin_submit) {
            Some(Ok(payload)) => payload,
            Some(Err(e)) => {
                log::warn!("Upload blocked: {}", e);
                return;
            }
            None => return,
        };
        let Some(local) = local_file.get_untracked() else {
            draft.update(|d| d.finish_submit(Err(ApiError::Request("Selected file is no longer available".into()))));
            return;
        };

        spawn_local(async move {
            let client = client.get_value();
            let result = create_image(&client, &local.file, &payload).await;
            if let Err(e) = &result {
                log::error!("Upload of {} failed: {}", local.info.name, e);
            }
            let succeeded = result.is_ok();
            draft.try_update(|d| d.finish_submit(result.map(|_| ())));

            if succeeded {
                TimeoutFuture::new(millis(SUCCESS_CLOSE_DELAY)).await;
                if draft.try_with_untracked(|_| ()).is_none() {
                    log::warn!("Upload modal unmounted before its success delay ended");
                    return;
                }
                reset();
                on_success.call(());
            }
        });
    };

    view! {
        <div class="modal-backdrop" on:click=move |_| close()>
            <div class="modal upload-modal" on:click=|ev| ev.stop_propagation()>
                <button
                    class="modal-close"
                    title="Close"
                    disabled=held
                    on:click=move |_| close()
                >
                    "×"
                </button>
                <h2>"Upload Image"</h2>

                <form on:submit=on_submit>
                    <label class="file-picker">
                        <input
                            type="file"
                            accept="image/jpeg"
                            disabled=submitting
                            on:change=on_file_change
                        />
                        <span>
                            {move || local_file.with(|f| {
                                f.as_ref()
                                    .map(|f| f.info.name.clone())
                                    .unwrap_or_else(|| "Choose a JPEG image…".to_string())
                            })}
                        </span>
                    </label>
                    {move || preview.get().map(|src| view! { <img class="upload-preview" src=src alt="Preview"/> })}

                    <div class="form-fields">
                        {MetadataField::ALL
                            .into_iter()
                            .map(|field| view! {
                                <label class="form-field">
                                    <span>{field.label()}{field.is_required().then_some(" *")}</span>
                                    <input
                                        type="text"
                                        name=field.key()
                                        required=field.is_required()
                                        disabled=submitting
                                        prop:value=move || draft.with(|d| d.metadata.get(field).to_string())
                                        on:input=move |ev| draft.update(|d| d.set_field(field, event_target_value(&ev)))
                                    />
                                </label>
                            })
                            .collect_view()}
                    </div>

                    {move || draft.with(|d| status_banner(&d.status))}

                    <div class="form-actions">
                        <button type="button" disabled=held on:click=move |_| close()>"Cancel"</button>
                        <button type="submit" class="upload-button" disabled=submitting>
                            {move || if submitting() { "Uploading…" } else { "Upload" }}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}

fn status_banner(status: &UploadStatus) -> Option<View> {
    match status {
        UploadStatus::Editing | UploadStatus::Submitting => None,
        UploadStatus::Succeeded => Some(view! { <div class="success-message">{UPLOAD_SUCCESS_MESSAGE}</div> }.into_view()),
        UploadStatus::Failed(message) => {
            Some(view! { <div class="error-message">{message.clone()}</div> }.into_view())
        }
    }
}
