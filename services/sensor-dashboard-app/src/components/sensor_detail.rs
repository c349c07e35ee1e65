//! Sensor detail page: sensor info, readings chart, date filter and reading form

use chrono::Local;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_params_map;

use sensor_client::error::messages;
use sensor_client::models::SensorId;
use sensor_client::sensor_detail::{SensorDetailState, SensorRecord};
use sensor_client::view::Outcome;

use crate::app::AppContext;
use crate::components::error_list::ErrorList;
use crate::components::reading_chart::ReadingChart;

/// Fetch the readings for the sensor and range currently in `state`
fn refresh_readings(ctx: &AppContext, state: RwSignal<SensorDetailState>) {
    let Some(ticket) = state.try_update(|s| s.begin_readings_fetch()) else {
        return;
    };
    let api = ctx.dashboard.api().clone();
    let token = ctx.dashboard.session().current();
    spawn_local(async move {
        let key = ticket.key();
        let result = api
            .list_readings(token.as_deref(), key.sensor_id, &key.range)
            .await;
        state.update(|s| {
            s.complete_readings_fetch(&ticket, result);
        });
    });
}

/// Fetch the sensor record, then its readings unless the sensor is unavailable
fn refresh(ctx: &AppContext, state: RwSignal<SensorDetailState>) {
    let Some(ticket) = state.try_update(|s| s.begin_sensor_fetch()) else {
        return;
    };
    let ctx = ctx.clone();
    spawn_local(async move {
        let token = ctx.dashboard.session().current();
        let result = ctx
            .dashboard
            .api()
            .get_sensor(token.as_deref(), *ticket.key())
            .await;
        state.update(|s| {
            s.complete_sensor_fetch(&ticket, result);
        });
        if state.with_untracked(|s| s.sensor != SensorRecord::Unavailable) {
            refresh_readings(&ctx, state);
        }
    });
}

#[component]
pub fn SensorDetailPage() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let params = use_params_map();
    let sensor_id = move || {
        params
            .read()
            .get("id")
            .and_then(|id| id.parse::<SensorId>().ok())
    };

    let initial_id = params
        .with_untracked(|p| p.get("id"))
        .and_then(|id| id.parse::<SensorId>().ok())
        .unwrap_or_default();
    let state = RwSignal::new(SensorDetailState::new(initial_id));
    let reading_errors = RwSignal::new(Vec::<String>::new());

    {
        let ctx = ctx.clone();
        Effect::new(move |_| {
            match sensor_id() {
                Some(id) => {
                    state.update(|s| {
                        s.set_sensor(id);
                    });
                    refresh(&ctx, state);
                }
                None => state.update(|s| {
                    s.sensor = SensorRecord::Unavailable;
                    s.fail(messages::LOAD_SENSOR_FAILED);
                }),
            }
        });
    }

    let on_range = {
        let ctx = ctx.clone();
        move |from: Option<String>, to: Option<String>| {
            let changed = state
                .try_update(|s| s.set_date_range(from.as_deref(), to.as_deref()))
                .unwrap_or(false);
            if changed {
                refresh(&ctx, state);
            }
        }
    };
    let on_from = {
        let on_range = on_range.clone();
        move |ev: leptos::ev::Event| on_range(Some(event_target_value(&ev)), None)
    };
    let on_to = {
        let on_range = on_range.clone();
        move |ev: leptos::ev::Event| on_range(None, Some(event_target_value(&ev)))
    };
    let on_clear = {
        let ctx = ctx.clone();
        move |_: leptos::ev::MouseEvent| {
            if state.try_update(|s| s.clear_date_range()).unwrap_or(false) {
                refresh(&ctx, state);
            }
        }
    };

    let on_add_reading = {
        let ctx = ctx.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            let reading = match state.with_untracked(|s| s.prepare_reading_in(&Local)) {
                Ok(reading) => reading,
                Err(outcome) => {
                    if let Outcome::Rejected(errors) = outcome {
                        reading_errors.set(errors);
                    }
                    return;
                }
            };
            reading_errors.set(Vec::new());

            let ctx = ctx.clone();
            let sensor_id = state.with_untracked(|s| s.sensor_id);
            spawn_local(async move {
                let token = ctx.dashboard.session().current();
                let result = ctx
                    .dashboard
                    .api()
                    .create_reading(token.as_deref(), sensor_id, &reading)
                    .await;
                let outcome =
                    state.try_update(|s| s.complete_add_reading(result, Local::now()));
                if outcome.is_some_and(|o| o.is_applied()) {
                    refresh_readings(&ctx, state);
                }
            });
        }
    };

    view! {
        <section>
            <p><A href="/sensors">"Back to sensors"</A></p>
            <ErrorList errors=Signal::derive(move || state.with(|s| s.error.iter().cloned().collect::<Vec<_>>())) />

            {move || match state.with(|s| s.sensor.clone()) {
                SensorRecord::Pending => view! { <p>"Loading sensor..."</p> }.into_any(),
                SensorRecord::Unavailable => view! { <p>"This sensor could not be loaded."</p> }.into_any(),
                SensorRecord::Loaded(sensor) => view! {
                    <header>
                        <h2>{sensor.name}</h2>
                        <p>"Model: " {sensor.model}</p>
                        <p>{sensor.description.unwrap_or_default()}</p>
                    </header>
                }.into_any(),
            }}

            <Show when=move || state.with(|s| s.sensor().is_some())>
                <div style="display: flex; gap: 0.5rem; align-items: end; margin: 1rem 0;">
                    <label>
                        "From "
                        <input
                            type="datetime-local"
                            prop:value=move || state.with(|s| s.date_range.from.clone())
                            on:change=on_from.clone()
                        />
                    </label>
                    <label>
                        "To "
                        <input
                            type="datetime-local"
                            prop:value=move || state.with(|s| s.date_range.to.clone())
                            on:change=on_to.clone()
                        />
                    </label>
                    <button
                        disabled=move || state.with(|s| s.date_range.is_unbounded())
                        on:click=on_clear.clone()
                    >
                        "Clear"
                    </button>
                </div>

                <Show
                    when=move || state.with(|s| s.has_readings())
                    fallback=move || {
                        if state.with(|s| s.loading) {
                            view! { <p>"Loading readings..."</p> }.into_any()
                        } else {
                            view! { <p>"No readings yet."</p> }.into_any()
                        }
                    }
                >
                    <ReadingChart points=Signal::derive(move || state.with(|s| s.chart_in(&Local))) />
                </Show>

                {
                    let on_add_reading = on_add_reading.clone();
                    view! {
                <Show
                    when=move || state.with(|s| s.reading_form_open)
                    fallback=move || view! {
                        <button on:click=move |_| state.update(|s| s.open_reading_form())>"Add reading"</button>
                    }
                >
                    <form on:submit=on_add_reading.clone() style="display: grid; gap: 0.5rem; max-width: 320px; margin-top: 1rem;">
                        <ErrorList errors=reading_errors />
                        <label>
                            "Temperature (°C)"
                            <input
                                type="number"
                                step="any"
                                prop:value=move || state.with(|s| s.reading_form.temperature.clone())
                                on:input=move |ev| state.update(|s| s.reading_form.temperature = event_target_value(&ev))
                            />
                        </label>
                        <label>
                            "Humidity (%)"
                            <input
                                type="number"
                                step="any"
                                prop:value=move || state.with(|s| s.reading_form.humidity.clone())
                                on:input=move |ev| state.update(|s| s.reading_form.humidity = event_target_value(&ev))
                            />
                        </label>
                        <label>
                            "Time"
                            <input
                                type="datetime-local"
                                prop:value=move || state.with(|s| s.reading_form.timestamp.clone())
                                on:input=move |ev| state.update(|s| s.reading_form.timestamp = event_target_value(&ev))
                            />
                        </label>
                        <div style="display: flex; gap: 0.5rem;">
                            <button type="submit">"Save"</button>
                            <button type="button" on:click=move |_| state.update(|s| s.close_reading_form())>
                                "Cancel"
                            </button>
                        </div>
                    </form>
                </Show>
                    }
                }
            </Show>
        </section>
    }
}
