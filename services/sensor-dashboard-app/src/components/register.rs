//! Registration page

use leptos::prelude::*;
use leptos_router::components::A;

use sensor_client::validation::FormMode;

use crate::components::login::CredentialsForm;

#[component]
pub fn RegisterPage() -> impl IntoView {
    view! {
        <section>
            <h2>"Register"</h2>
            <CredentialsForm mode=FormMode::Register />
            <p>"Already registered? " <A href="/login">"Login"</A></p>
        </section>
    }
}
