//! Logging hook for notification observation.

use navroute_core::{BoxError, Hook, HookResult, Message};

/// A hook that logs every notification it receives at `INFO` level and never
/// cancels anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingHook;

impl<E: Message + std::fmt::Debug> Hook<E> for LoggingHook {
    async fn on_event(&self, event: &E) -> Result<HookResult, BoxError> {
        tracing::info!(?event, "router notification");
        Ok(HookResult::Next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navroute_core::RouteMissed;
    use tracing_test::traced_test;

    #[tokio::test]
    #[traced_test]
    async fn logs_and_continues() {
        let event = RouteMissed {
            token: "nowhere".into(),
        };
        let result = LoggingHook.on_event(&event).await.unwrap();

        assert_eq!(result, HookResult::Next);
        assert!(logs_contain("router notification"));
        assert!(logs_contain("nowhere"));
    }
}
