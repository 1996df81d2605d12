//! Registry construction and request resolution through the public API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::http::{Method, StatusCode};
use front_router::config::parse_config;
use front_router::routing::{
    FrontRequest, FrontResponse, MatchOutcome, ModuleRegistry, NoMatchReason, RouteError,
    SecurePathPolicy, TransportSecurity, FRONT_ROUTE_PARAM,
};

mod common;

use common::{build_resolver, insecure_web, CountingLocator};

fn get(path: &str) -> FrontRequest {
    let mut request = FrontRequest::from_path(Method::GET, path);
    if let Some(front_name) = request.module_name().map(str::to_owned) {
        request.set_param(FRONT_ROUTE_PARAM, front_name);
    }
    request
}

fn registry(toml: &str) -> ModuleRegistry {
    let config = parse_config(toml).expect("valid config");
    ModuleRegistry::from_source(&config, &config.server.area, &config.server.router_name)
}

fn modules(registry: &ModuleRegistry, front_name: &str) -> Vec<String> {
    registry.lookup(front_name).expect("front-name registered").to_vec()
}

#[test]
fn test_extras_wrap_base_module() {
    let registry = registry(
        r#"
        [[areas.frontend.routers]]
        name = "blog"
        use = "standard"
        module = "B"

        [[areas.frontend.routers.extra]]
        module = "m1"
        before = "B"

        [[areas.frontend.routers.extra]]
        module = "m2"
        after = "B"
        "#,
    );
    assert_eq!(modules(&registry, "blog"), vec!["m1", "B", "m2"]);
}

#[test]
fn test_missing_targets_fall_back_to_ends() {
    let registry = registry(
        r#"
        [[areas.frontend.routers]]
        name = "blog"
        use = "standard"
        module = "A"

        [[areas.frontend.routers.extra]]
        module = "c"
        before = "Z"

        [[areas.frontend.routers.extra]]
        module = "d"
        after = "Z"
        "#,
    );
    assert_eq!(modules(&registry, "blog"), vec!["c", "A", "d"]);
}

#[test]
fn test_empty_extra_never_listed() {
    let registry = registry(
        r#"
        [[areas.frontend.routers]]
        name = "blog"
        use = "standard"
        module = "A"

        [[areas.frontend.routers.extra]]
        module = ""
        before = "A"

        [[areas.frontend.routers.extra]]
        module = ""

        [[areas.frontend.routers.extra]]
        after = "A"
        "#,
    );
    assert_eq!(modules(&registry, "blog"), vec!["A"]);
}

#[test]
fn test_front_name_route_lookups_agree() {
    let registry = registry(
        r#"
        [[areas.frontend.routers]]
        name = "blog"
        use = "standard"
        module = "A"

        [[areas.frontend.routers]]
        name = "cms"
        use = "custom"
        module = "C"
        "#,
    );

    for name in ["blog", "cms", "catalog"] {
        assert_eq!(registry.front_name_for_route(name), registry.route_for_front_name(name));
    }
    assert_eq!(registry.route_for_front_name("blog"), Some("blog"));
    assert_eq!(registry.front_name_for_route("cms"), None);
}

#[test]
fn test_first_module_with_action_wins() {
    let locator = Arc::new(
        CountingLocator::new()
            .with_controller("M1", "post", &["list"])
            .with_controller("M2", "post", &["view"]),
    );
    let resolver = build_resolver("blog", &["M1", "M2"], locator.clone(), &insecure_web());

    let mut request = get("/blog/post/view");
    let mut response = FrontResponse::new();
    let outcome = resolver.match_request(&mut request, &mut response).unwrap();

    assert!(outcome.is_matched());
    assert_eq!(request.controller_module(), Some("M2"));
    assert_eq!(locator.dispatched(), vec![("M2".to_string(), "view".to_string())]);
    assert_eq!(response.body(), "M2::view");

    let locator = Arc::new(
        CountingLocator::new()
            .with_controller("M1", "post", &["view"])
            .with_controller("M2", "post", &["view"]),
    );
    let resolver = build_resolver("blog", &["M1", "M2"], locator.clone(), &insecure_web());

    let mut request = get("/blog/post/view");
    resolver.match_request(&mut request, &mut FrontResponse::new()).unwrap();
    assert_eq!(request.controller_module(), Some("M1"));
    // M2 is never looked at once M1 wins.
    assert_eq!(locator.resolve_calls(), 1);
    assert_eq!(locator.dispatched().len(), 1);
}

#[test]
fn test_missing_action_skips_materialization() {
    let locator = Arc::new(CountingLocator::new().with_controller("M1", "post", &["view"]));
    let resolver = build_resolver("blog", &["M1"], locator.clone(), &insecure_web());

    let mut request = get("/blog/post");
    let outcome = resolver.match_request(&mut request, &mut FrontResponse::new()).unwrap();

    assert!(matches!(outcome, MatchOutcome::NoMatch(NoMatchReason::MissingSegment(_))));
    assert_eq!(locator.resolve_calls(), 0);
    assert_eq!(locator.instantiate_calls(), 0);
}

#[test]
fn test_insecure_get_redirects_before_materialization() {
    let mut web = insecure_web();
    web.unsecure_base_url = "https://shop.example/".into();

    let locator = Arc::new(CountingLocator::new().with_controller("M1", "post", &["view"]));
    let resolver = build_resolver("blog", &["M1"], locator.clone(), &web);

    let mut request = get("/blog/post/view");
    let mut response = FrontResponse::new();
    let outcome = resolver.match_request(&mut request, &mut response).unwrap();

    match outcome {
        MatchOutcome::Redirected { location } => {
            assert_eq!(location, "https://shop.example/blog/post/view");
        }
        other => panic!("expected redirect, got {:?}", other),
    }
    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(response.is_sent());
    assert_eq!(locator.resolve_calls(), 0);
    assert!(locator.dispatched().is_empty());
    assert!(!request.is_dispatched());
}

#[test]
fn test_post_is_never_redirected() {
    let mut web = insecure_web();
    web.unsecure_base_url = "https://shop.example/".into();

    let locator = Arc::new(CountingLocator::new().with_controller("M1", "post", &["save"]));
    let resolver = build_resolver("blog", &["M1"], locator.clone(), &web);

    let mut request = FrontRequest::from_path(Method::POST, "/blog/post/save");
    let outcome = resolver.match_request(&mut request, &mut FrontResponse::new()).unwrap();
    assert!(outcome.is_matched());
}

#[test]
fn test_admin_context_vetoed_before_reading_segments() {
    let locator = Arc::new(CountingLocator::new().with_controller("M1", "post", &["view"]));
    let resolver = build_resolver("blog", &["M1"], locator.clone(), &insecure_web());

    let mut request = get("/blog/post/view");
    request.set_admin_context(true);
    let outcome = resolver.match_request(&mut request, &mut FrontResponse::new()).unwrap();
    assert!(matches!(outcome, MatchOutcome::NoMatch(NoMatchReason::Vetoed)));

    // Vetoed even though no segment is present at all.
    let mut bare = FrontRequest::new(Method::GET, "/");
    bare.set_admin_context(true);
    let outcome = resolver.match_request(&mut bare, &mut FrontResponse::new()).unwrap();
    assert!(matches!(outcome, MatchOutcome::NoMatch(NoMatchReason::Vetoed)));

    assert_eq!(locator.resolve_calls(), 0);
}

#[test]
fn test_secure_check_runs_for_every_probed_module() {
    struct CountingPaths(Arc<AtomicUsize>);
    impl SecurePathPolicy for CountingPaths {
        fn should_path_be_secure(&self, _path: &str) -> bool {
            self.0.fetch_add(1, Ordering::SeqCst);
            false
        }
    }

    let mut web = insecure_web();
    web.secure_in_frontend = true;
    let calls = Arc::new(AtomicUsize::new(0));

    let locator = Arc::new(
        CountingLocator::new()
            .with_admin_controller("M1", "post", &["view"])
            .with_controller("M3", "post", &["view"]),
    );
    let mut registry = ModuleRegistry::new();
    registry.add_module("blog", vec!["M1".into(), "M2".into(), "M3".into()]);
    let resolver = front_router::RouteResolver::new(
        Arc::new(registry.into()),
        locator.clone(),
        TransportSecurity::from_config(&web).with_path_policy(CountingPaths(calls.clone())),
    );

    let mut request = get("/blog/post/view");
    let outcome = resolver.match_request(&mut request, &mut FrontResponse::new()).unwrap();

    assert!(outcome.is_matched());
    assert_eq!(request.controller_module(), Some("M3"));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_missing_class_is_an_error_not_a_miss() {
    let locator = Arc::new(
        CountingLocator::new()
            .with_broken("M1", "post")
            .with_controller("M2", "post", &["view"]),
    );
    let resolver = build_resolver("blog", &["M1", "M2"], locator.clone(), &insecure_web());

    let mut request = get("/blog/post/view");
    let err = resolver
        .match_request(&mut request, &mut FrontResponse::new())
        .unwrap_err();

    assert!(matches!(err, RouteError::ControllerClassMissing { .. }));
    assert!(locator.dispatched().is_empty());
    assert!(!request.is_dispatched());
}

#[test]
fn test_concurrent_resolution_shares_registry() {
    let locator = Arc::new(CountingLocator::new().with_controller("M1", "post", &["view"]));
    let resolver = Arc::new(build_resolver("blog", &["M1"], locator.clone(), &insecure_web()));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let resolver = resolver.clone();
            std::thread::spawn(move || {
                let mut request = get("/blog/post/view");
                resolver
                    .match_request(&mut request, &mut FrontResponse::new())
                    .unwrap()
                    .is_matched()
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
    assert_eq!(locator.dispatched().len(), 8);
}
