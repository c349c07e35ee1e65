//! Page routes and the authentication redirects between them

use std::fmt;

use crate::models::SensorId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Root,
    Login,
    Register,
    SensorList,
    SensorDetail(SensorId),
}

impl Route {
    /// Match a path, ignoring a trailing slash. Unknown paths give `None`.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').skip(1).collect();
        match segments.as_slice() {
            [] => Some(Route::Root),
            ["login"] => Some(Route::Login),
            ["register"] => Some(Route::Register),
            ["sensors"] => Some(Route::SensorList),
            ["sensors", id] => id.parse().ok().map(Route::SensorDetail),
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Root => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::SensorList => "/sensors".to_string(),
            Route::SensorDetail(id) => format!("/sensors/{}", id),
        }
    }

    pub fn requires_session(&self) -> bool {
        matches!(self, Route::SensorList | Route::SensorDetail(_))
    }

    pub fn is_auth_page(&self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// What the shell should do with a requested route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect(Route),
}

pub fn guard(route: Route, authenticated: bool) -> Navigation {
    let navigation = match route {
        Route::Root => Navigation::Redirect(Route::SensorList),
        r if r.is_auth_page() && authenticated => Navigation::Redirect(Route::SensorList),
        r if r.requires_session() && !authenticated => Navigation::Redirect(Route::Login),
        r => Navigation::Render(r),
    };
    if let Navigation::Redirect(target) = navigation {
        tracing::debug!("Redirecting {} to {}", route, target);
    }
    navigation
}
