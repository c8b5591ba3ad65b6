mod common;

use common::{Journal, app_controllers, app_routes};
use navroute::{
    ControllerRegistry, DispatchFailure, ParsedToken, RouteSpec, RouteTarget, Router,
    RouterError, Rule, regex::Regex, testing::RecordingController,
};

fn demo_router(journal: &Journal) -> Router {
    let router = Router::new();
    router.initialize(app_routes(), app_controllers(journal)).unwrap();
    router
}

#[tokio::test]
async fn test_placeholder_values_reach_the_action() {
    let journal = Journal::new();
    let router = demo_router(&journal);

    let params = router.parse("users/42/edit").await.unwrap();

    assert_eq!(params.get("id"), Some("42"));
    assert_eq!(params.get_as::<u32>("id").unwrap(), 42);
    assert_eq!(journal.entries(), ["Users#edit id=42"]);
}

#[tokio::test]
async fn test_root_route_for_empty_and_slash() {
    let journal = Journal::new();
    let router = demo_router(&journal);

    router.parse("").await.unwrap();
    router.parse("/").await.unwrap();

    assert_eq!(journal.entries(), ["Home#index", "Home#index"]);
}

#[tokio::test]
async fn test_query_is_merged_behind_path_captures() {
    let journal = Journal::new();
    let router = demo_router(&journal);

    router.parse("users/7/edit?id=9&tab=notes").await.unwrap();

    assert_eq!(journal.entries(), ["Users#edit id=7 tab=notes"]);
}

#[tokio::test]
async fn test_unknown_token_is_reported_as_missed() {
    let journal = Journal::new();
    let router = demo_router(&journal);

    let err = router.parse("users/42").await.unwrap_err();

    assert!(matches!(
        err.as_dispatch(),
        Some(DispatchFailure::RouteMissed(token)) if token == "users/42"
    ));
    assert!(journal.is_empty());
}

#[tokio::test]
async fn test_rules_select_between_overlapping_routes() {
    let posts = RecordingController::new(["show", "by_slug", "archive"]);
    let router = Router::new();
    router
        .initialize(
            [
                RouteSpec::new(
                    "posts/:id",
                    RouteTarget::to("posts", "show").rule("id", Regex::new(r"^\d+$").unwrap()),
                ),
                RouteSpec::new(
                    "posts/:slug",
                    RouteTarget::to("posts", "by_slug")
                        .rule("slug", Rule::predicate(|slug| slug.len() > 3)),
                ),
                RouteSpec::new(
                    "archive",
                    RouteTarget::regex(Regex::new(r"^archive/(\d{4})$").unwrap(), "posts", "archive")
                        .rule("0", Rule::predicate(|year| year >= "2000")),
                ),
            ],
            ControllerRegistry::builder()
                .register("Posts", posts.clone())
                .build(),
        )
        .unwrap();

    router.parse("posts/12").await.unwrap();
    router.parse("posts/hello").await.unwrap();
    assert!(router.parse("posts/abc").await.is_err());

    let params = router.parse("archive/2012").await.unwrap();
    assert_eq!(params.capture(0), Some("2012"));
    assert!(router.parse("archive/1999").await.is_err());

    assert_eq!(posts.actions_called(), ["show", "by_slug", "archive"]);
}

#[test]
fn test_find_match_does_not_dispatch() {
    let journal = Journal::new();
    let router = demo_router(&journal);

    let found = router.find_match("users/5/edit").unwrap().unwrap();
    assert_eq!(found.route.pattern(), "users/:id/edit");
    assert_eq!(found.params.get("id"), Some("5"));

    assert!(router.find_match("nowhere").unwrap().is_none());
    assert!(journal.is_empty());
}

#[test]
fn test_parsed_token_is_public() {
    let parsed = ParsedToken::parse("help/list?view=3&details=1");

    assert_eq!(parsed.segments, ["help", "list"]);
    assert_eq!(parsed.query.get("view").map(String::as_str), Some("3"));
}

#[test]
fn test_route_error_surfaces_from_initialize() {
    let router = Router::new();
    let err = router
        .initialize([RouteSpec::new("users", "#list")], ControllerRegistry::new())
        .unwrap_err();

    assert!(matches!(err, RouterError::Route(ref e) if e.pattern() == "users"));
}
