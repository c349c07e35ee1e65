//! BDD step definitions for login, registration and routing

use cucumber::{given, then, when};

use sensor_client::auth::AuthForm;
use sensor_client::route::Navigation;
use sensor_client::validation::CredentialFields;

use crate::world::DashboardWorld;

#[given(expr = "a registered user {string} with password {string}")]
fn registered_user(world: &mut DashboardWorld, email: String, password: String) {
    world.backend.add_user(&email, &password);
}

#[given("I am logged in")]
fn logged_in(world: &mut DashboardWorld) {
    let token = world.backend.signed_in_user("ada@example.com");
    world
        .dashboard()
        .session()
        .login(token)
        .expect("session store accepts token");
}

async fn submit(world: &mut DashboardWorld, mut form: AuthForm) {
    let dashboard = world.dashboard().clone();
    let outcome = form.submit(dashboard.api(), dashboard.session()).await;
    world.auth_form = Some(form);
    world.last_outcome = Some(outcome);
}

#[when(expr = "I log in as {string} with password {string}")]
async fn log_in(world: &mut DashboardWorld, email: String, password: String) {
    let mut form = AuthForm::login();
    form.fields = CredentialFields::login(email, password);
    submit(world, form).await;
}

#[when(expr = "I register as {string} with username {string} and password {string}")]
async fn register(world: &mut DashboardWorld, email: String, username: String, password: String) {
    let mut form = AuthForm::register();
    form.fields = CredentialFields::register(email, username, password);
    submit(world, form).await;
}

#[when("I log out")]
fn log_out(world: &mut DashboardWorld) {
    world
        .dashboard()
        .session()
        .logout()
        .expect("session store clears token");
}

#[then("the session should be authenticated")]
fn session_authenticated(world: &mut DashboardWorld) {
    assert!(world.dashboard().session().is_authenticated());
}

#[then("the session should not be authenticated")]
fn session_not_authenticated(world: &mut DashboardWorld) {
    assert!(!world.dashboard().session().is_authenticated());
}

#[then(expr = "visiting {string} should redirect to {string}")]
fn visiting_redirects(world: &mut DashboardWorld, path: String, target: String) {
    let navigation = world.dashboard().navigate(&path);
    match navigation {
        Some(Navigation::Redirect(route)) => assert_eq!(route.path(), target),
        other => panic!("expected redirect to {}, got {:?}", target, other),
    }
    world.navigation = navigation;
}

#[then(expr = "visiting {string} should show the page")]
fn visiting_renders(world: &mut DashboardWorld, path: String) {
    let navigation = world.dashboard().navigate(&path);
    match navigation {
        Some(Navigation::Render(route)) => assert_eq!(route.path(), path),
        other => panic!("expected {} to render, got {:?}", path, other),
    }
    world.navigation = navigation;
}

#[then(expr = "the form should show {string}")]
fn form_shows(world: &mut DashboardWorld, message: String) {
    let errors = world.form_errors();
    assert!(
        errors.contains(&message),
        "expected {:?} in {:?}",
        message,
        errors
    );
}

#[then("no request should have been sent")]
fn no_request(world: &mut DashboardWorld) {
    assert!(world.backend.requests().is_empty());
}
