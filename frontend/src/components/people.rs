//! People table with search and per-row actions.

use leptos::*;

use crate::controller::{use_app, Command};
use crate::render::{render_rows, TableBody};

#[component]
pub fn PeopleSection() -> impl IntoView {
    let Some(ctx) = use_app() else {
        return ().into_view();
    };
    let people = ctx.people;
    let search = ctx.search;

    // filtering toggles visibility on rendered rows, the roster stays put
    let body = create_memo(move |_| {
        let mut body = people.with(|r| render_rows(r.people()));
        body.filter(&search.get());
        body
    });

    let on_search = {
        let ctx = ctx.clone();
        move |ev| ctx.dispatch(Command::Search(event_target_value(&ev)))
    };
    let on_add = {
        let ctx = ctx.clone();
        move |_| ctx.dispatch(Command::ShowAddPerson(true))
    };
    let on_refresh = {
        let ctx = ctx.clone();
        move |_| ctx.dispatch(Command::RefreshPeople)
    };

    view! {
        <section class="people-section">
            <div class="section-toolbar">
                <input
                    type="search"
                    class="search-input"
                    placeholder="Search by name or ID"
                    prop:value=move || search.get()
                    on:input=on_search
                />
                <button class="btn" on:click=on_refresh>"🔄 Refresh"</button>
                <button class="btn primary" on:click=on_add>"➕ Add person"</button>
            </div>
            <table class="people-table">
                <thead>
                    <tr>
                        <th>"Image"</th>
                        <th>"Name"</th>
                        <th>"ID"</th>
                        <th>"Status"</th>
                        <th>"Actions"</th>
                    </tr>
                </thead>
                <tbody>
                    {move || match body.get() {
                        TableBody::Placeholder(text) => view! {
                            <tr><td colspan="5" class="placeholder">{text}</td></tr>
                        }
                        .into_view(),
                        TableBody::Rows(rows) => rows
                            .into_iter()
                            .map(|row| {
                                let ctx = ctx.clone();
                                let image_count = row.image_count;
                                let upload_id = row.person_id.clone();
                                let view_id = row.person_id.clone();
                                let delete_id = row.person_id.clone();
                                let upload_ctx = ctx.clone();
                                let view_ctx = ctx.clone();
                                view! {
                                    <tr style:display=if row.visible { "" } else { "none" }>
                                        <td>
                                            {row.thumbnail.clone().map(|src| view! {
                                                <img src=src class="person-image"/>
                                            })}
                                            {(image_count > 0).then(|| view! {
                                                <span class="image-count">{image_count}</span>
                                            })}
                                        </td>
                                        <td>{row.full_name.clone()}</td>
                                        <td>{row.person_id.clone()}</td>
                                        <td>
                                            <span class=row.status_class()>{row.status_label()}</span>
                                        </td>
                                        <td class="person-actions">
                                            <button
                                                class="upload"
                                                title="Upload images"
                                                on:click=move |_| upload_ctx
                                                    .dispatch(Command::OpenEnrollment(upload_id.clone()))
                                            >
                                                "📤"
                                            </button>
                                            {row.can_view_images().then(|| view! {
                                                <button
                                                    class="view-images"
                                                    title="View images"
                                                    on:click=move |_| view_ctx
                                                        .dispatch(Command::ViewImages(view_id.clone()))
                                                >
                                                    "🖼️"
                                                </button>
                                            })}
                                            <button
                                                class="delete"
                                                title="Delete"
                                                on:click=move |_| ctx
                                                    .dispatch(Command::RemovePerson(delete_id.clone()))
                                            >
                                                "🗑️"
                                            </button>
                                        </td>
                                    </tr>
                                }
                            })
                            .collect_view(),
                    }}
                </tbody>
            </table>
        </section>
    }
    .into_view()
}
