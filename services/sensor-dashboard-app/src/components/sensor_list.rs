//! Sensor list page: search, pagination, create, edit and delete

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;

use sensor_client::models::{NewSensor, SensorId, SensorQuery, SensorUpdate};
use sensor_client::sensor_list::SensorListState;
use sensor_client::view::Outcome;

use crate::app::AppContext;
use crate::browser::BrowserConfirm;
use crate::components::error_list::ErrorList;

/// Fetch the page and search currently in `state`
fn refresh(ctx: &AppContext, state: RwSignal<SensorListState>) {
    let Some(ticket) = state.try_update(|s| s.begin_refresh()) else {
        return;
    };
    let api = ctx.dashboard.api().clone();
    let token = ctx.dashboard.session().current();
    spawn_local(async move {
        let result = api
            .list_sensors(token.as_deref(), &SensorQuery::from(ticket.key()))
            .await;
        state.update(|s| {
            s.complete_refresh(&ticket, result);
        });
    });
}

/// Refresh after a mutation the server accepted
fn refresh_if_applied(
    ctx: &AppContext,
    state: RwSignal<SensorListState>,
    outcome: Option<Outcome>,
) -> bool {
    let applied = outcome.is_some_and(|o| o.is_applied());
    if applied {
        refresh(ctx, state);
    }
    applied
}

fn show_rejection(errors: RwSignal<Vec<String>>, outcome: Outcome) {
    if let Outcome::Rejected(messages) = outcome {
        errors.set(messages);
    }
}

/// Name, model and description inputs bound to `sensor`
#[component]
fn SensorFields(sensor: RwSignal<NewSensor>) -> impl IntoView {
    view! {
        <input
            type="text"
            placeholder="Name"
            prop:value=move || sensor.with(|n| n.name.clone())
            on:input=move |ev| sensor.update(|n| n.name = event_target_value(&ev))
        />
        <input
            type="text"
            placeholder="Model"
            prop:value=move || sensor.with(|n| n.model.clone())
            on:input=move |ev| sensor.update(|n| n.model = event_target_value(&ev))
        />
        <textarea
            placeholder="Description"
            prop:value=move || sensor.with(|n| n.description.clone())
            on:input=move |ev| sensor.update(|n| n.description = event_target_value(&ev))
        />
    }
}

#[component]
pub fn SensorListPage() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let state = RwSignal::new(SensorListState::new(&ctx.dashboard.config().sensors));
    let new_sensor = RwSignal::new(NewSensor::default());
    let form_errors = RwSignal::new(Vec::<String>::new());
    let edited_sensor = RwSignal::new(NewSensor::default());
    let edit_errors = RwSignal::new(Vec::<String>::new());

    refresh(&ctx, state);

    let navigate_to = {
        let ctx = ctx.clone();
        move |change: fn(&mut SensorListState) -> bool| {
            if state.try_update(change).unwrap_or(false) {
                refresh(&ctx, state);
            }
        }
    };

    let on_search = {
        let ctx = ctx.clone();
        move |ev: leptos::ev::Event| {
            let search = event_target_value(&ev);
            if state.try_update(|s| s.set_search(search)).unwrap_or(false) {
                refresh(&ctx, state);
            }
        }
    };

    let on_create = {
        let ctx = ctx.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            let sensor = new_sensor.get_untracked();
            if let Err(outcome) = state.with_untracked(|s| s.prepare_create(&sensor)) {
                show_rejection(form_errors, outcome);
                return;
            }
            form_errors.set(Vec::new());

            let ctx = ctx.clone();
            spawn_local(async move {
                let token = ctx.dashboard.session().current();
                let result = ctx
                    .dashboard
                    .api()
                    .create_sensor(token.as_deref(), &sensor)
                    .await;
                let outcome = state.try_update(|s| s.complete_create(result));
                if refresh_if_applied(&ctx, state, outcome) {
                    new_sensor.set(NewSensor::default());
                }
            });
        }
    };

    let on_edit = move |id: SensorId| {
        let original = state.with_untracked(|s| s.sensors.iter().find(|x| x.id == id).cloned());
        if let Some(original) = original {
            edited_sensor.set(NewSensor::from(&original));
            edit_errors.set(Vec::new());
            state.update(|s| s.start_editing(id));
        }
    };

    let on_update = {
        let ctx = ctx.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            let original = state.with_untracked(|s| {
                s.editing
                    .and_then(|id| s.sensors.iter().find(|x| x.id == id).cloned())
            });
            let Some(original) = original else {
                state.update(|s| s.stop_editing());
                return;
            };
            let changes = SensorUpdate::between(&original, &edited_sensor.get_untracked());
            match state.with_untracked(|s| s.prepare_update(&changes)) {
                Ok(()) => edit_errors.set(Vec::new()),
                Err(Outcome::Cancelled) => {
                    state.update(|s| s.stop_editing());
                    return;
                }
                Err(outcome) => {
                    show_rejection(edit_errors, outcome);
                    return;
                }
            }

            let ctx = ctx.clone();
            let id = original.id;
            spawn_local(async move {
                let token = ctx.dashboard.session().current();
                let result = ctx
                    .dashboard
                    .api()
                    .update_sensor(token.as_deref(), id, &changes)
                    .await;
                let outcome = state.try_update(|s| s.complete_update(id, result));
                refresh_if_applied(&ctx, state, outcome);
            });
        }
    };

    let on_delete = {
        let ctx = ctx.clone();
        move |id: SensorId| {
            if state
                .with_untracked(|s| s.prepare_delete(id, &BrowserConfirm))
                .is_err()
            {
                return;
            }
            let ctx = ctx.clone();
            spawn_local(async move {
                let token = ctx.dashboard.session().current();
                let result = ctx.dashboard.api().delete_sensor(token.as_deref(), id).await;
                let outcome = state.try_update(|s| s.complete_delete(id, result));
                refresh_if_applied(&ctx, state, outcome);
            });
        }
    };

    let previous = {
        let navigate_to = navigate_to.clone();
        move |_: leptos::ev::MouseEvent| navigate_to(SensorListState::previous_page)
    };
    let next = move |_: leptos::ev::MouseEvent| navigate_to(SensorListState::next_page);

    view! {
        <section>
            <h2>"Sensors"</h2>
            <ErrorList errors=Signal::derive(move || state.with(|s| s.error.iter().cloned().collect::<Vec<_>>())) />

            <div style="display: flex; gap: 0.5rem; margin-bottom: 1rem;">
                <input
                    type="search"
                    placeholder="Search sensors"
                    prop:value=move || state.with(|s| s.search.clone())
                    on:input=on_search
                />
                <button on:click=move |_| state.update(|s| s.open_create_form())>"Add sensor"</button>
            </div>

            <Show when=move || state.with(|s| s.create_form_open)>
                <form on:submit=on_create.clone() style="display: grid; gap: 0.5rem; max-width: 360px; margin-bottom: 1rem;">
                    <ErrorList errors=form_errors />
                    <SensorFields sensor=new_sensor />
                    <div style="display: flex; gap: 0.5rem;">
                        <button type="submit">"Create"</button>
                        <button type="button" on:click=move |_| state.update(|s| s.close_create_form())>
                            "Cancel"
                        </button>
                    </div>
                </form>
            </Show>

            <Show when=move || state.with(|s| s.editing.is_some())>
                <form on:submit=on_update.clone() style="display: grid; gap: 0.5rem; max-width: 360px; margin-bottom: 1rem;">
                    <h3>"Edit sensor"</h3>
                    <ErrorList errors=edit_errors />
                    <SensorFields sensor=edited_sensor />
                    <div style="display: flex; gap: 0.5rem;">
                        <button type="submit">"Save"</button>
                        <button type="button" on:click=move |_| state.update(|s| s.stop_editing())>
                            "Cancel"
                        </button>
                    </div>
                </form>
            </Show>

            {move || {
                if state.with(|s| s.is_initial_load()) {
                    view! { <p>"Loading sensors..."</p> }.into_any()
                } else if state.with(|s| s.is_empty()) {
                    view! { <p>"No sensors found."</p> }.into_any()
                } else {
                    let on_delete = on_delete.clone();
                    view! {
                        <table style="width: 100%; border-collapse: collapse;">
                            <thead>
                                <tr style="border-bottom: 2px solid #dee2e6;">
                                    <th style="padding: 0.5rem; text-align: left;">"Name"</th>
                                    <th style="padding: 0.5rem; text-align: left;">"Model"</th>
                                    <th style="padding: 0.5rem; text-align: left;">"Description"</th>
                                    <th style="padding: 0.5rem;"></th>
                                </tr>
                            </thead>
                            <tbody>
                                {state.with(|s| s.sensors.clone()).into_iter().map(|sensor| {
                                    let on_delete = on_delete.clone();
                                    let id = sensor.id;
                                    view! {
                                        <tr style="border-bottom: 1px solid #dee2e6;">
                                            <td style="padding: 0.5rem;">
                                                <A href=format!("/sensors/{}", id)>{sensor.name}</A>
                                            </td>
                                            <td style="padding: 0.5rem;">{sensor.model}</td>
                                            <td style="padding: 0.5rem;">{sensor.description.unwrap_or_default()}</td>
                                            <td style="padding: 0.5rem; white-space: nowrap;">
                                                <button on:click=move |_| on_edit(id)>"Edit"</button>
                                                " "
                                                <button on:click=move |_| on_delete(id)>"Delete"</button>
                                            </td>
                                        </tr>
                                    }
                                }).collect::<Vec<_>>()}
                            </tbody>
                        </table>
                    }.into_any()
                }
            }}

            <Show when=move || state.with(|s| s.shows_pagination())>
                <div style="display: flex; gap: 0.5rem; align-items: center; margin-top: 1rem;">
                    <button
                        disabled=move || !state.with(|s| s.can_go_previous())
                        on:click=previous.clone()
                    >
                        "Previous"
                    </button>
                    <span>{move || state.with(|s| format!("Page {} of {}", s.page, s.total_pages))}</span>
                    <button
                        disabled=move || !state.with(|s| s.can_go_next())
                        on:click=next.clone()
                    >
                        "Next"
                    </button>
                </div>
            </Show>
        </section>
    }
}
