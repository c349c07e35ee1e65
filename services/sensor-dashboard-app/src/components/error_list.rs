//! Error message list component

use leptos::prelude::*;

/// Shows each message on its own line; renders nothing when empty
#[component]
pub fn ErrorList(#[prop(into)] errors: Signal<Vec<String>>) -> impl IntoView {
    view! {
        <Show when=move || !errors.with(Vec::is_empty)>
            <ul style="color: #721c24; background-color: #f8d7da; padding: 0.5rem 1.5rem; border-radius: 0.25rem;">
                {move || {
                    errors
                        .get()
                        .into_iter()
                        .map(|message| view! { <li>{message}</li> })
                        .collect::<Vec<_>>()
                }}
            </ul>
        </Show>
    }
}
