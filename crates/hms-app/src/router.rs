//! Role router
//!
//! Every route has an [`Access`] level. [`resolve`] decides, for the current
//! [`AuthState`], whether a route renders or redirects:
//! - signed out on a protected route: redirect to `/login`
//! - signed in on `/login`: redirect to the role's home
//! - signed in on another role's route: redirect to the role's home
//!
//! There is no error page; unknown paths redirect too.

use hms_core::{AuthState, Role};
use std::fmt;
use std::str::FromStr;

/// Client-side pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    DoctorDashboard,
    Patients,
    Appointments,
    Doctors,
    DoctorProfile,
    PatientDashboard,
    BookAppointment,
    MyAppointments,
    PatientProfile,
}

/// Who may render a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Anyone; signed-in visitors are sent home
    Public,
    /// Only the given role
    Only(Role),
}

impl Route {
    /// Every route
    pub const ALL: [Route; 10] = [
        Route::Login,
        Route::DoctorDashboard,
        Route::Patients,
        Route::Appointments,
        Route::Doctors,
        Route::DoctorProfile,
        Route::PatientDashboard,
        Route::BookAppointment,
        Route::MyAppointments,
        Route::PatientProfile,
    ];

    /// Canonical path
    #[must_use]
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::DoctorDashboard => "/dashboard",
            Route::Patients => "/patients",
            Route::Appointments => "/appointments",
            Route::Doctors => "/doctors",
            Route::DoctorProfile => "/profile/doctor",
            Route::PatientDashboard => "/patient/dashboard",
            Route::BookAppointment => "/patient/book",
            Route::MyAppointments => "/patient/appointments",
            Route::PatientProfile => "/patient/profile",
        }
    }

    /// Parse a path; `/` is an alias of `/dashboard`, a trailing slash is ignored
    #[must_use]
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.trim();
        if path == "/" {
            return Some(Route::DoctorDashboard);
        }
        let path = path.strip_suffix('/').unwrap_or(path);
        Route::ALL.into_iter().find(|r| r.path() == path)
    }

    /// Who may render this route
    #[must_use]
    pub fn access(&self) -> Access {
        match self {
            Route::Login => Access::Public,
            Route::DoctorDashboard
            | Route::Patients
            | Route::Appointments
            | Route::Doctors
            | Route::DoctorProfile => Access::Only(Role::Doctor),
            Route::PatientDashboard
            | Route::BookAppointment
            | Route::MyAppointments
            | Route::PatientProfile => Access::Only(Role::Patient),
        }
    }

    /// Page title
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::DoctorDashboard | Route::PatientDashboard => "Dashboard",
            Route::Patients => "Patients",
            Route::Appointments => "Appointments",
            Route::Doctors => "Doctors",
            Route::DoctorProfile | Route::PatientProfile => "Profile",
            Route::BookAppointment => "Book Appointment",
            Route::MyAppointments => "My Appointments",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = hms_core::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::parse(s).ok_or_else(|| hms_core::ValidationError::unrecognized("route", s))
    }
}

/// Landing page after sign-in
#[must_use]
pub fn home(role: Role) -> Route {
    match role {
        Role::Doctor => Route::DoctorDashboard,
        Role::Patient => Route::PatientDashboard,
    }
}

/// Landing page for a state
#[must_use]
pub fn landing(state: AuthState) -> Route {
    match state {
        AuthState::Unauthenticated => Route::Login,
        AuthState::Authenticated(role) => home(role),
    }
}

/// Outcome of navigating to a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Show the requested page
    Render(Route),
    /// Go somewhere else instead
    Redirect(Route),
}

impl Resolution {
    /// The page that ends up on screen
    #[inline]
    #[must_use]
    pub fn route(&self) -> Route {
        match self {
            Resolution::Render(r) | Resolution::Redirect(r) => *r,
        }
    }
}

/// Decide what happens when `state` navigates to `route`
#[must_use]
pub fn resolve(state: AuthState, route: Route) -> Resolution {
    match (state, route.access()) {
        (AuthState::Unauthenticated, Access::Public) => Resolution::Render(route),
        (AuthState::Unauthenticated, Access::Only(_)) => Resolution::Redirect(Route::Login),
        (AuthState::Authenticated(role), Access::Public) => Resolution::Redirect(home(role)),
        (AuthState::Authenticated(role), Access::Only(required)) if role == required => {
            Resolution::Render(route)
        }
        (AuthState::Authenticated(role), Access::Only(_)) => Resolution::Redirect(home(role)),
    }
}

/// [`resolve`] for a raw path; unknown paths redirect to the landing page
#[must_use]
pub fn resolve_path(state: AuthState, path: &str) -> Resolution {
    match Route::parse(path) {
        Some(route) => resolve(state, route),
        None => Resolution::Redirect(landing(state)),
    }
}

/// Sidebar entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub route: Route,
}

/// Sidebar entries for `role`, in display order
#[must_use]
pub fn menu(role: Role) -> Vec<MenuItem> {
    let routes: &[Route] = match role {
        Role::Doctor => &[
            Route::DoctorDashboard,
            Route::Patients,
            Route::Appointments,
            Route::Doctors,
            Route::DoctorProfile,
        ],
        Role::Patient => &[
            Route::PatientDashboard,
            Route::BookAppointment,
            Route::MyAppointments,
            Route::PatientProfile,
        ],
    };
    routes
        .iter()
        .map(|&route| MenuItem {
            label: route.title(),
            route,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_round_trip() {
        for route in Route::ALL {
            assert_eq!(Route::parse(route.path()), Some(route));
            assert_eq!(route.to_string().parse::<Route>().unwrap(), route);
        }
        assert_eq!(Route::parse("/"), Some(Route::DoctorDashboard));
        assert_eq!(Route::parse("/patients/"), Some(Route::Patients));
        assert_eq!(Route::parse("/nowhere"), None);
    }

    #[test]
    fn signed_out_goes_to_login() {
        let state = AuthState::Unauthenticated;
        assert_eq!(resolve(state, Route::Login), Resolution::Render(Route::Login));
        assert_eq!(
            resolve(state, Route::Appointments),
            Resolution::Redirect(Route::Login)
        );
        assert_eq!(
            resolve(state, Route::BookAppointment),
            Resolution::Redirect(Route::Login)
        );
    }

    #[test]
    fn wrong_role_goes_home() {
        let patient = AuthState::Authenticated(Role::Patient);
        assert_eq!(
            resolve(patient, Route::Patients),
            Resolution::Redirect(Route::PatientDashboard)
        );
        let doctor = AuthState::Authenticated(Role::Doctor);
        assert_eq!(
            resolve(doctor, Route::BookAppointment),
            Resolution::Redirect(Route::DoctorDashboard)
        );
        assert_eq!(
            resolve(doctor, Route::Login),
            Resolution::Redirect(Route::DoctorDashboard)
        );
    }

    #[test]
    fn unknown_paths_land_home() {
        let doctor = AuthState::Authenticated(Role::Doctor);
        assert_eq!(resolve_path(doctor, "/admin").route(), Route::DoctorDashboard);
        assert_eq!(
            resolve_path(AuthState::Unauthenticated, "/admin").route(),
            Route::Login
        );
    }

    #[test]
    fn menus_only_list_own_routes() {
        for role in Role::ALL {
            let items = menu(role);
            assert!(!items.is_empty());
            assert_eq!(items[0].route, home(role));
            for item in items {
                assert_eq!(item.route.access(), Access::Only(role));
            }
        }
    }
}
