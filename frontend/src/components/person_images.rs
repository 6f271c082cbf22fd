use leptos::*;

use crate::controller::{use_app, Command};

#[component]
pub fn PersonImagesModal() -> impl IntoView {
    let Some(ctx) = use_app() else {
        return ().into_view();
    };
    let viewing = ctx.viewing;

    view! {
        <div class="person-images">{move || viewing.get().map(|images| {
            let ctx = ctx.clone();
            let count = images.urls.len();
            view! {
                <div class="modal show">
                    <div class="modal-content">
                        <h2>{format!("Images of {} ({})", images.full_name, count)}</h2>
                        {if images.urls.is_empty() {
                            view! { <p class="no-images">"No images available"</p> }.into_view()
                        } else {
                            view! {
                                <div class="images-grid">
                                    {images.urls.iter().enumerate().map(|(i, url)| view! {
                                        <div class="image-item">
                                            <img src=url.clone() alt=format!("Image {}", i + 1)/>
                                            <span class="image-number">{i + 1}</span>
                                        </div>
                                    }).collect_view()}
                                </div>
                            }
                            .into_view()
                        }}
                        <div class="modal-actions">
                            <button class="btn" on:click=move |_| ctx.dispatch(Command::CloseImages)>
                                "Close"
                            </button>
                        </div>
                    </div>
                </div>
            }
        })}</div>
    }
    .into_view()
}
