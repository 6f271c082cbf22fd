use leptos::*;

use crate::controller::{use_app, Command};

/// New person form. Blank fields are refused before any request.
#[component]
pub fn AddPersonModal() -> impl IntoView {
    let Some(ctx) = use_app() else {
        return ().into_view();
    };
    let open = ctx.add_person_open;

    let first_name = create_rw_signal(String::new());
    let last_name = create_rw_signal(String::new());
    let id_number = create_rw_signal(String::new());

    let reset = move || {
        first_name.set(String::new());
        last_name.set(String::new());
        id_number.set(String::new());
    };

    let on_submit = {
        let ctx = ctx.clone();
        move |ev: ev::SubmitEvent| {
            ev.prevent_default();
            ctx.dispatch(Command::AddPerson {
                first_name: first_name.get_untracked(),
                last_name: last_name.get_untracked(),
                id_number: id_number.get_untracked(),
            });
            reset();
        }
    };
    let on_cancel = move |_| {
        reset();
        ctx.dispatch(Command::ShowAddPerson(false));
    };

    view! {
        <Show when=move || open.get() fallback=|| ()>
            <div class="modal show">
                <form class="modal-content" on:submit=on_submit.clone()>
                    <h2>"Add person"</h2>
                    <label>
                        "First name"
                        <input
                            type="text"
                            prop:value=move || first_name.get()
                            on:input=move |ev| first_name.set(event_target_value(&ev))
                        />
                    </label>
                    <label>
                        "Last name"
                        <input
                            type="text"
                            prop:value=move || last_name.get()
                            on:input=move |ev| last_name.set(event_target_value(&ev))
                        />
                    </label>
                    <label>
                        "ID number"
                        <input
                            type="text"
                            prop:value=move || id_number.get()
                            on:input=move |ev| id_number.set(event_target_value(&ev))
                        />
                    </label>
                    <div class="modal-actions">
                        <button type="submit" class="btn primary">"Save"</button>
                        <button type="button" class="btn" on:click=on_cancel.clone()>"Cancel"</button>
                    </div>
                </form>
            </div>
        </Show>
    }
    .into_view()
}
