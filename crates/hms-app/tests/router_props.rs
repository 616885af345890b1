use hms_app::{home, resolve, resolve_path, Access, Resolution, Route};
use hms_core::{AuthState, Role};
use proptest::prelude::*;

fn any_route() -> impl Strategy<Value = Route> {
    proptest::sample::select(Route::ALL.to_vec())
}

fn any_role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::Doctor), Just(Role::Patient)]
}

fn any_state() -> impl Strategy<Value = AuthState> {
    prop_oneof![
        Just(AuthState::Unauthenticated),
        any_role().prop_map(AuthState::Authenticated),
    ]
}

#[test]
fn test_every_route_has_an_owner_or_is_public() {
    let public: Vec<Route> = Route::ALL
        .into_iter()
        .filter(|r| r.access() == Access::Public)
        .collect();
    assert_eq!(public, vec![Route::Login]);
}

proptest! {
    #[test]
    fn prop_foreign_routes_redirect_home(role in any_role(), route in any_route()) {
        if let Access::Only(owner) = route.access() {
            let resolution = resolve(AuthState::Authenticated(role), route);
            if owner == role {
                prop_assert_eq!(resolution, Resolution::Render(route));
            } else {
                prop_assert_eq!(resolution, Resolution::Redirect(home(role)));
            }
        }
    }

    #[test]
    fn prop_resolution_always_lands_on_an_allowed_page(state in any_state(), route in any_route()) {
        let landed = resolve(state, route).route();
        // The landing page itself renders without a further redirect
        prop_assert_eq!(resolve(state, landed), Resolution::Render(landed));
    }

    #[test]
    fn prop_arbitrary_paths_never_error(state in any_state(), path in "/[a-z/]{0,24}") {
        let landed = resolve_path(state, &path).route();
        prop_assert_eq!(resolve(state, landed), Resolution::Render(landed));
    }
}
