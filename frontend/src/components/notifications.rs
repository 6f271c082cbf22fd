//! On-screen notification stack.

use leptos::*;

use crate::services::NotificationCenter;

#[component]
pub fn NotificationStack() -> impl IntoView {
    let center = NotificationCenter::install();
    let queue = center.queue();

    view! {
        <div class="notifications">
            <For
                each=move || queue.with(|q| q.entries().to_vec())
                key=|n| (n.id, n.closing)
                children=move |n| {
                    let id = n.id;
                    let class_name = if n.closing {
                        format!("{} closing", n.kind.css_class())
                    } else {
                        n.kind.css_class().to_string()
                    };
                    view! {
                        <div class=class_name>
                            <span class="notification-time">"[" {n.timestamp.clone()} "] "</span>
                            <span class="notification-emoji">{n.kind.emoji()}</span>
                            <span class="notification-message">{n.message.clone()}</span>
                            <button
                                class="notification-close"
                                on:click=move |_| center.dismiss(id)
                            >
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
