use leptos::*;

use crate::controller::use_app;

#[component]
pub fn Header() -> impl IntoView {
    let Some(ctx) = use_app() else {
        return ().into_view();
    };
    let people = ctx.people;

    view! {
        <header>
            <div class="header-left">
                <span class="logo">"AttendMe"</span>
                <span class="badge">"Face recognition attendance"</span>
            </div>
            <div class="header-right">
                <span class="stat">
                    "👥 " {move || people.with(|r| r.len())} " enrolled"
                </span>
                <span class="stat present">
                    "✅ " {move || people.with(|r| r.present_count())} " present"
                </span>
            </div>
        </header>
    }
    .into_view()
}
