//! Temperature and humidity line chart drawn as inline SVG

use leptos::prelude::*;

use sensor_client::chart::{plot, ChartPoint};

const WIDTH: f64 = 720.0;
const HEIGHT: f64 = 300.0;
const PADDING: f64 = 40.0;
const TEMPERATURE_COLOR: &str = "#dc3545";
const HUMIDITY_COLOR: &str = "#0d6efd";

/// Two series on independent vertical scales, oldest reading on the left
#[component]
pub fn ReadingChart(#[prop(into)] points: Signal<Vec<ChartPoint>>) -> impl IntoView {
    move || {
        let Some(chart) = points.with(|p| plot(p, WIDTH, HEIGHT, PADDING)) else {
            return view! { <p>"No readings in this range."</p> }.into_any();
        };
        let first_label = chart.labels.first().cloned();
        let last_label = chart.labels.last().cloned().filter(|_| chart.labels.len() > 1);

        view! {
            <figure style="margin: 0;">
                <svg
                    viewBox=format!("0 0 {} {}", chart.width, chart.height)
                    style="width: 100%; height: auto; border: 1px solid #dee2e6;"
                >
                    <polyline
                        points=chart.temperature
                        fill="none"
                        stroke=TEMPERATURE_COLOR
                        stroke-width="2"
                    />
                    <polyline
                        points=chart.humidity
                        fill="none"
                        stroke=HUMIDITY_COLOR
                        stroke-width="2"
                    />
                    <text x="4" y=(PADDING - 8.0).to_string() fill=TEMPERATURE_COLOR font-size="12">
                        {format!("{:.1} °C", chart.temperature_range.max)}
                    </text>
                    <text x="4" y=(HEIGHT - PADDING + 16.0).to_string() fill=TEMPERATURE_COLOR font-size="12">
                        {format!("{:.1} °C", chart.temperature_range.min)}
                    </text>
                    <text x=(WIDTH - 4.0).to_string() y=(PADDING - 8.0).to_string() fill=HUMIDITY_COLOR font-size="12" text-anchor="end">
                        {format!("{:.1} %", chart.humidity_range.max)}
                    </text>
                    <text x=(WIDTH - 4.0).to_string() y=(HEIGHT - PADDING + 16.0).to_string() fill=HUMIDITY_COLOR font-size="12" text-anchor="end">
                        {format!("{:.1} %", chart.humidity_range.min)}
                    </text>
                    {first_label.map(|(x, label)| view! {
                        <text x=x.to_string() y=(HEIGHT - 8.0).to_string() font-size="12">{label}</text>
                    })}
                    {last_label.map(|(x, label)| view! {
                        <text x=x.to_string() y=(HEIGHT - 8.0).to_string() font-size="12" text-anchor="end">{label}</text>
                    })}
                </svg>
                <figcaption style="display: flex; gap: 1rem; font-size: 0.85em;">
                    <span style=format!("color: {};", TEMPERATURE_COLOR)>"Temperature"</span>
                    <span style=format!("color: {};", HUMIDITY_COLOR)>"Humidity"</span>
                </figcaption>
            </figure>
        }
        .into_any()
    }
}
