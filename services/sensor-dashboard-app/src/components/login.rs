//! Login page and the credentials form it shares with registration

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use sensor_client::auth::AuthForm;
use sensor_client::route::Route as Page;
use sensor_client::validation::FormMode;

use crate::app::AppContext;
use crate::components::error_list::ErrorList;

#[component]
pub fn LoginPage() -> impl IntoView {
    view! {
        <section>
            <h2>"Login"</h2>
            <CredentialsForm mode=FormMode::Login />
            <p>"No account yet? " <A href="/register">"Register"</A></p>
        </section>
    }
}

/// Email and password, plus a username when registering
#[component]
pub fn CredentialsForm(mode: FormMode) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let form = RwSignal::new(AuthForm::new(mode));
    let navigate = use_navigate();

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        form.update(|f| f.submitting = true);
        let mut submitted = form.get_untracked();

        let dashboard = ctx.dashboard.clone();
        let authenticated = ctx.authenticated;
        let navigate = navigate.clone();
        spawn_local(async move {
            let outcome = submitted.submit(dashboard.api(), dashboard.session()).await;
            form.update(|f| f.settle(&submitted));
            if outcome.is_applied() {
                authenticated.set(true);
                navigate(&Page::SensorList.path(), Default::default());
            }
        });
    };

    let field = move |read: fn(&AuthForm) -> Option<String>| {
        move || form.with(|f| read(f).unwrap_or_default())
    };

    view! {
        <form on:submit=on_submit style="display: grid; gap: 0.5rem; max-width: 320px;">
            <ErrorList errors=Signal::derive(move || form.with(|f| f.errors.clone())) />
            <label>
                "Email"
                <input
                    type="email"
                    prop:value=field(|f| f.fields.email.clone())
                    on:input=move |ev| form.update(|f| f.fields.email = Some(event_target_value(&ev)))
                />
            </label>
            <Show when=move || mode == FormMode::Register>
                <label>
                    "Username"
                    <input
                        type="text"
                        prop:value=field(|f| f.fields.username.clone())
                        on:input=move |ev| form.update(|f| f.fields.username = Some(event_target_value(&ev)))
                    />
                </label>
            </Show>
            <label>
                "Password"
                <input
                    type="password"
                    prop:value=field(|f| f.fields.password.clone())
                    on:input=move |ev| form.update(|f| f.fields.password = Some(event_target_value(&ev)))
                />
            </label>
            <button type="submit" disabled=move || form.with(|f| f.submitting)>
                {match mode {
                    FormMode::Login => "Login",
                    FormMode::Register => "Register",
                }}
            </button>
        </form>
    }
}
