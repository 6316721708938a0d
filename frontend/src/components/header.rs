use leptos::*;

use crate::config::APP_NAME;

#[component]
pub fn Header(#[prop(into)] on_upload: Callback<()>) -> impl IntoView {
    view! {
        <header>
            <div class="header-left">
                <a href="/" class="logo">{APP_NAME}</a>
                <span class="badge">"Art catalog search"</span>
            </div>
            <div class="header-right">
                <button class="upload-button" on:click=move |_| on_upload.call(())>
                    "Upload Image"
                </button>
            </div>
        </header>
    }
}
