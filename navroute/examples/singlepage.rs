//! A single-page application shell: home, settings and a users area.
//!
//! Run with `RUST_LOG=debug cargo run --example singlepage --features macros`.

use navroute::{
    Application, BeforeDispatch, BoxError, ControllerRegistry, History, MemoryHistory, Params,
    Router, RouterConfig, from_fn, hooks::LoggingHook,
};
use std::{future, sync::Arc, time::Duration};
use tracing_subscriber::EnvFilter;

const ROUTES: &str = r#"
[routes]
"/" = "home#index"
"settings" = "settings#index"
"users" = "users#list"
"users/:id/edit" = { controller = "users", action = "edit", id = { pattern = '^\d+$' } }
"#;

struct Home;

#[navroute::controller]
impl Home {
    #[action]
    fn index(&self) {
        tracing::info!("rendering home");
    }
}

struct Settings;

#[navroute::controller]
impl Settings {
    #[action]
    fn index(&self) {
        tracing::info!("rendering settings");
    }
}

struct Users {
    names: Vec<&'static str>,
}

#[navroute::controller]
impl Users {
    #[action]
    async fn list(&self) {
        tracing::info!(users = ?self.names, "rendering user list");
    }

    #[action]
    async fn edit(&self, params: Params) -> Result<(), BoxError> {
        let id: usize = params.get_as("id")?;
        let name = self
            .names
            .get(id)
            .ok_or_else(|| format!("no user with id {id}"))?;
        tracing::info!(id, name, "editing user");
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = RouterConfig::from_toml(ROUTES)?;
    let router = Router::builder()
        .on_route_missed(LoggingHook)
        .on_before_dispatch(from_fn(|event: &BeforeDispatch| {
            tracing::info!(token = %event.token, "navigating");
        }))
        .on_dispatch(LoggingHook)
        .build();

    let controllers = ControllerRegistry::builder()
        .register("Home", Home)
        .register_lazy("Settings", || Settings)
        .register(
            "Users",
            Users {
                names: vec!["ada", "grace", "linus"],
            },
        )
        .build();

    let app = Application::builder("singlepage")
        .router(router)
        .config(&config)?
        .controllers(controllers)
        .build();

    let history = Arc::new(MemoryHistory::new());
    let user = {
        let history = Arc::clone(&history);
        let router = Arc::clone(app.router());
        async move {
            for token in ["users", "users/1/edit", "users/9/edit", "nowhere"] {
                tokio::time::sleep(Duration::from_millis(50)).await;
                history.add(token);
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
            history.back();
            router.redirect("settings").await.ok();
            tokio::time::sleep(Duration::from_millis(50)).await;
            history.close();
        }
    };

    let (ran, ()) = tokio::join!(app.run(Arc::clone(&history), future::ready(())), user);
    ran?;

    tracing::info!(entries = ?history.entries(), "history at exit");
    Ok(())
}
