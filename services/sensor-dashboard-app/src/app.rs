//! Main App component, routing and shared context

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::{provide_meta_context, Title};
use leptos_router::components::{Redirect, Route, Router, Routes, A};
use leptos_router::hooks::{use_location, use_navigate};
use leptos_router::path;

use sensor_client::io::ReqwestHttpClient;
use sensor_client::route::{guard, Navigation, Route as Page};
use sensor_client::Dashboard;

use crate::browser::session_store;
use crate::components::login::LoginPage;
use crate::components::register::RegisterPage;
use crate::components::sensor_detail::SensorDetailPage;
use crate::components::sensor_list::SensorListPage;

/// Shared by every page
#[derive(Clone)]
pub struct AppContext {
    pub dashboard: Dashboard,
    /// Mirrors `dashboard.session()` so the shell can react to login and logout
    pub authenticated: RwSignal<bool>,
}

impl AppContext {
    pub fn new(dashboard: Dashboard) -> Self {
        let authenticated = RwSignal::new(dashboard.session().is_authenticated());
        Self {
            dashboard,
            authenticated,
        }
    }

    pub fn logout(&self) {
        if let Err(e) = self.dashboard.session().logout() {
            tracing::warn!("Failed to clear stored session: {}", e);
        }
        self.authenticated.set(false);
    }
}

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = crate::app_config();
    let store = session_store(&config.session);
    let dashboard = Dashboard::new(config, Arc::new(ReqwestHttpClient::new()), store);
    provide_context(AppContext::new(dashboard));

    view! {
        <Title text="Sensor Dashboard" />
        <Router>
            <NavBar />
            <main style="font-family: system-ui, sans-serif; max-width: 960px; margin: 0 auto; padding: 1rem;">
                <Routes fallback=|| view! { <p>"Page not found."</p> }>
                    <Route path=path!("/") view=|| view! { <Guarded>""</Guarded> } />
                    <Route path=path!("/login") view=|| view! { <Guarded><LoginPage /></Guarded> } />
                    <Route path=path!("/register") view=|| view! { <Guarded><RegisterPage /></Guarded> } />
                    <Route path=path!("/sensors") view=|| view! { <Guarded><SensorListPage /></Guarded> } />
                    <Route path=path!("/sensors/:id") view=|| view! { <Guarded><SensorDetailPage /></Guarded> } />
                </Routes>
            </main>
        </Router>
    }
}

/// Renders its children only if the session allows the current path
#[component]
fn Guarded(children: ChildrenFn) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let location = use_location();

    move || {
        let path = location.pathname.get();
        let navigation = Page::parse(&path).map(|page| guard(page, ctx.authenticated.get()));
        match navigation {
            Some(Navigation::Redirect(target)) => {
                view! { <Redirect path=target.path() /> }.into_any()
            }
            _ => children().into_any(),
        }
    }
}

#[component]
fn NavBar() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let authenticated = ctx.authenticated;
    let navigate = use_navigate();

    let on_logout = move |_: leptos::ev::MouseEvent| {
        ctx.logout();
        navigate(&Page::Login.path(), Default::default());
    };

    view! {
        <nav style="display: flex; gap: 1rem; align-items: center; padding: 0.5rem 1rem; border-bottom: 1px solid #dee2e6;">
            <strong>"Sensor Dashboard"</strong>
            <Show
                when=move || authenticated.get()
                fallback=|| view! {
                    <A href="/login">"Login"</A>
                    <A href="/register">"Register"</A>
                }
            >
                <A href="/sensors">"Sensors"</A>
                <button on:click=on_logout.clone()>"Logout"</button>
            </Show>
        </nav>
    }
}
