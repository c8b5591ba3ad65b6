mod common;

use common::{Journal, app_controllers, dispatch_signal};
use futures::StreamExt;
use navroute::{
    Application, CompileMode, DispatchFailure, History, MemoryHistory, RouteMissed, RouteSpec,
    Router, RouterConfig, testing::RecordingHook,
};
use std::{
    future,
    sync::{Arc, Mutex},
};
use tracing_test::traced_test;

#[tokio::test]
async fn test_home_users_scenario() {
    let journal = Journal::new();
    let missed = RecordingHook::<RouteMissed>::new();
    let router = Router::builder().on_route_missed(missed.clone()).build();
    router
        .initialize(
            [
                RouteSpec::new("/", "home#index"),
                RouteSpec::new("users", "users#list"),
                RouteSpec::new("users/:id/edit", "users#edit"),
            ],
            app_controllers(&journal),
        )
        .unwrap();

    let params = router.parse("users/42/edit").await.unwrap();
    assert_eq!(params.get("id"), Some("42"));
    assert_eq!(params.len(), 1);

    let err = router.parse("unknown").await.unwrap_err();
    assert!(matches!(err.as_dispatch(), Some(DispatchFailure::RouteMissed(t)) if t == "unknown"));
    assert_eq!(missed.events(), [RouteMissed { token: "unknown".into() }]);

    let params = router.parse("").await.unwrap();
    assert!(params.is_empty());

    assert_eq!(journal.entries(), ["Users#edit id=42", "Home#index"]);
}

const SETTINGS: &str = r#"
enable_router = true
compile_mode = "strict"

[routes]
"/" = "home#index"
"settings" = "settings#index"
"users" = "users#list"
"users/:id/edit" = { controller = "users", action = "edit", id = { pattern = '^\d+$' } }
"#;

#[tokio::test]
async fn test_application_bootstrap_from_config() {
    let config = RouterConfig::from_toml(SETTINGS).unwrap();
    assert_eq!(config.compile_mode, CompileMode::Strict);

    let journal = Journal::new();
    let phases = Arc::new(Mutex::new(Vec::new()));
    let (signal, mut dispatched) = dispatch_signal();

    let before = Arc::clone(&phases);
    let after = Arc::clone(&phases);
    let app = Application::builder("singlepage")
        .router(Router::builder().on_dispatch(signal).build())
        .config(&config)
        .unwrap()
        .controllers(app_controllers(&journal))
        .before_launch(move |router| {
            before
                .lock()
                .unwrap()
                .push(format!("before_launch initialized={}", router.is_initialized()));
        })
        .launch(move |router| {
            after
                .lock()
                .unwrap()
                .push(format!("launch initialized={}", router.is_initialized()));
        })
        .build();

    assert_eq!(app.name(), "singlepage");
    let history = Arc::new(MemoryHistory::with_token("settings"));

    let driver = async {
        assert_eq!(dispatched.next().await.as_deref(), Some("settings"));
        history.add("users/abc/edit");
        history.add("users/5/edit");
        assert_eq!(dispatched.next().await.as_deref(), Some("users/5/edit"));
        history.close();
    };

    let (ran, ()) = tokio::join!(app.run(Arc::clone(&history), future::ready(())), driver);
    ran.unwrap();

    assert_eq!(
        *phases.lock().unwrap(),
        ["before_launch initialized=false", "launch initialized=true"]
    );
    assert_eq!(journal.entries(), ["Settings#index", "Users#edit id=5"]);
}

#[tokio::test]
async fn test_disabled_router_is_never_initialized() {
    let config = RouterConfig::from_json(r#"{ "enable_router": false, "routes": { "/": "home#index" } }"#).unwrap();
    let journal = Journal::new();
    let app = Application::builder("static")
        .config(&config)
        .unwrap()
        .controllers(app_controllers(&journal))
        .build();

    app.run(Arc::new(MemoryHistory::new()), future::ready(()))
        .await
        .unwrap();

    assert!(!app.router_enabled());
    assert!(!app.router().is_initialized());
    assert!(app.router().history().is_none());
    assert!(journal.is_empty());
}

#[tokio::test]
async fn test_launching_twice_is_rejected() {
    let journal = Journal::new();
    let app = Application::builder("twice")
        .route("/", "home#index")
        .controllers(app_controllers(&journal))
        .build();

    app.launch().unwrap();
    assert!(matches!(app.launch(), Err(navroute::RouterError::AlreadyInitialized)));

    app.router().parse("/").await.unwrap();
    assert_eq!(journal.entries(), ["Home#index"]);
}

const LENIENT_SETTINGS: &str = r#"
compile_mode = "lenient"

[routes]
"/" = "home#index"
"broken" = "users"
"users" = "users#list"
"#;

#[tokio::test]
#[traced_test]
async fn test_lenient_config_keeps_broken_routes() {
    let config = RouterConfig::from_toml(LENIENT_SETTINGS).unwrap();
    let journal = Journal::new();
    let app = Application::builder("lenient")
        .router(Router::builder().compile_mode(CompileMode::Strict).build())
        .config(&config)
        .unwrap()
        .controllers(app_controllers(&journal))
        .build();

    assert_eq!(app.router().compile_mode(), CompileMode::Lenient);
    app.launch().unwrap();
    assert!(logs_contain("config `action` can't be undefined"));

    let err = app.router().parse("broken").await.unwrap_err();
    assert!(matches!(err.as_dispatch(), Some(DispatchFailure::ActionNotFound { .. })));

    app.router().parse("users").await.unwrap();
    assert_eq!(journal.entries(), ["Users#list"]);
}
