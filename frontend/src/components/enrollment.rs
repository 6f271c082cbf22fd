//! Enrollment modal: step markers, status line, file picker and the
//! finish/cancel actions for the open session.

use leptos::*;

use super::{take_files, ProgressSection};
use crate::controller::{use_app, Command};
use crate::state::progress_steps;
use crate::MAX_IMAGES_PER_PERSON;

#[component]
pub fn EnrollmentModal() -> impl IntoView {
    let Some(ctx) = use_app() else {
        return ().into_view();
    };
    let enrollment = ctx.enrollment;
    let panel = ctx.panel;
    let session = create_memo(move |_| enrollment.with(|e| e.current().cloned()));

    view! {
        <div class="enrollment-container">
            {
                move || session.get().map(|s| {
                    let band = s.band();
                    let uploading = s.is_uploading();
                    let upload_ctx = ctx.clone();
                    let finish_ctx = ctx.clone();
                    let cancel_ctx = ctx.clone();
                    view! {
                        <div class="modal show">
                            <div class="modal-content enrollment">
                                <h2>{format!("Upload images for {}", s.person_name())}</h2>
                                <div class="progress-steps">
                                    {progress_steps(s.uploaded_count())
                                        .into_iter()
                                        .map(|step| view! {
                                            <div class=step.css_class()>{step.number}</div>
                                        })
                                        .collect_view()}
                                </div>
                                <div class=band.css_class()>{band.message()}</div>
                                <input
                                    type="file"
                                    accept="image/*"
                                    multiple=true
                                    disabled=uploading || !band.accepts_uploads()
                                    title=format!("Select up to {} images", MAX_IMAGES_PER_PERSON)
                                    on:change=move |ev| {
                                        let files = take_files(&ev);
                                        upload_ctx.dispatch(Command::UploadImages(files));
                                    }
                                />
                                <ProgressSection panel=panel/>
                                <div class="modal-actions">
                                    {band.finish_visible().then(|| view! {
                                        <button
                                            class="btn primary"
                                            disabled=uploading
                                            on:click=move |_| finish_ctx.dispatch(Command::FinishEnrollment)
                                        >
                                            "✅ Finish"
                                        </button>
                                    })}
                                    <button
                                        class="btn"
                                        disabled=uploading
                                        on:click=move |_| cancel_ctx.dispatch(Command::CancelEnrollment)
                                    >
                                        "Close"
                                    </button>
                                </div>
                            </div>
                        </div>
                    }
                })
            }
        </div>
    }
    .into_view()
}
