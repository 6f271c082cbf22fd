use leptos::*;

use crate::state::ProgressPanel;

/// Progress of the running enrollment batch.
#[component]
pub fn ProgressSection(panel: RwSignal<Option<ProgressPanel>>) -> impl IntoView {
    view! {
        <Show when=move || panel.with(Option::is_some) fallback=|| ()>
            {move || panel.get().map(|p| view! {
                <div
                    class="progress-section show"
                    style=format!("background-color: {};", p.tint.background())
                >
                    <div class="progress-text">{p.text.clone()}</div>
                    <div class="progress-bar">
                        <div class="progress-fill" style=format!("width: {}%;", p.percent)></div>
                    </div>
                    {p.tally().map(|tally| view! { <div class="progress-tally">{tally}</div> })}
                </div>
            })}
        </Show>
    }
}
