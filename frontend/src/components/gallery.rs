//! Target image gallery.

use leptos::*;

use super::take_files;
use crate::controller::{use_app, Command};
use crate::state::GalleryView;
use crate::MediaKind;

#[component]
pub fn TargetGallerySection() -> impl IntoView {
    let Some(ctx) = use_app() else {
        return ().into_view();
    };
    let gallery = ctx.gallery;
    let cards = create_memo(move |_| gallery.with(|g| g.view()));
    let button = create_memo(move |_| gallery.with(|g| g.delete_button()));
    let stats = create_memo(move |_| gallery.with(|g| g.stats()));

    let upload_ctx = ctx.clone();
    let refresh_ctx = ctx.clone();
    let all_ctx = ctx.clone();
    let clear_ctx = ctx.clone();
    let delete_ctx = ctx.clone();

    view! {
        <section class="gallery-section">
            <div class="section-toolbar">
                <span class="gallery-stats">
                    {move || {
                        let s = stats.get();
                        format!("{} files ({} images, {} videos)", s.total, s.images, s.videos)
                    }}
                </span>
                <input
                    type="file"
                    accept="image/*,video/*"
                    multiple=true
                    on:change=move |ev| {
                        let files = take_files(&ev);
                        upload_ctx.dispatch(Command::UploadTargets(files));
                    }
                />
                <button class="btn" on:click=move |_| refresh_ctx.dispatch(Command::RefreshTargets)>
                    "🔄 Refresh"
                </button>
                <button class="btn" on:click=move |_| all_ctx.dispatch(Command::SelectAllTargets)>
                    "Select all"
                </button>
                <button class="btn" on:click=move |_| clear_ctx.dispatch(Command::ClearTargetSelection)>
                    "Clear selection"
                </button>
                <button
                    class="btn danger"
                    disabled=move || !button.get().enabled
                    on:click=move |_| delete_ctx.dispatch(Command::DeleteSelectedTargets)
                >
                    {move || button.get().label}
                </button>
            </div>
            {move || match cards.get() {
                GalleryView::Empty => view! {
                    <div class="empty-gallery">"No target images yet"</div>
                }
                .into_view(),
                GalleryView::Cards(cards) => view! {
                    <div class="gallery-grid">
                        {cards
                            .into_iter()
                            .map(|card| {
                                let ctx = ctx.clone();
                                let public_id = card.public_id.clone();
                                let media = match card.kind {
                                    MediaKind::Video => view! {
                                        <video src=card.url.clone() controls=true muted=true></video>
                                    }
                                    .into_view(),
                                    MediaKind::Image => view! {
                                        <img src=card.url.clone() alt=card.public_id.clone()/>
                                    }
                                    .into_view(),
                                };
                                view! {
                                    <div class="gallery-card" class:selected=card.checked>
                                        {media}
                                        <label class="gallery-select">
                                            <input
                                                type="checkbox"
                                                prop:checked=card.checked
                                                on:change=move |ev| ctx.dispatch(Command::ToggleTarget {
                                                    public_id: public_id.clone(),
                                                    checked: event_target_checked(&ev),
                                                })
                                            />
                                            <span class="file-size">{card.size_label.clone()}</span>
                                        </label>
                                    </div>
                                }
                            })
                            .collect_view()}
                    </div>
                }
                .into_view(),
            }}
        </section>
    }
    .into_view()
}
