//! Transient status messages

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::services::ui::DeployUi;

/// Publishes status messages and clears them after a delay.
///
/// One pending hide per scope; publishing again for the same scope
/// aborts the previous hide so it cannot clear the newer message early.
pub struct StatusBoard {
    ui: Arc<dyn DeployUi>,
    hide_delay: Duration,
    pending: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl StatusBoard {
    pub fn new(ui: Arc<dyn DeployUi>, hide_delay: Duration) -> Self {
        Self {
            ui,
            hide_delay,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Publish a message and schedule its removal
    pub fn show_transient(&self, scope: &str, message: &str) {
        self.ui.publish_status(scope, message);

        let ui = self.ui.clone();
        let delay = self.hide_delay;
        let owned_scope = scope.to_string();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            ui.hide_status(&owned_scope);
        });

        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = pending.insert(scope.to_string(), handle) {
            if !previous.is_finished() {
                debug!(scope, "Superseding pending status hide");
            }
            previous.abort();
        }
    }

    /// Wait until every scheduled hide has run
    pub async fn settle(&self) {
        let handles: Vec<_> = {
            let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
            pending.drain().map(|(_, handle)| handle).collect()
        };
        for handle in handles {
            // aborted hides were superseded
            let _ = handle.await;
        }
    }

    /// Abort every pending hide
    pub fn cancel_all(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        for (_, handle) in pending.drain() {
            handle.abort();
        }
    }
}

impl Drop for StatusBoard {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl DeployUi for Recorder {
        fn show_warning(&self, _message: &str) {}
        fn show_error(&self, _message: &str) {}
        fn reveal_output(&self, _target: &str) {}
        fn open_application(&self, _target: &str, _application: &str) {}
        fn refresh_applications(&self, _target: &str) {}
        fn refresh_server_list(&self) {}

        fn publish_status(&self, scope: &str, message: &str) {
            self.events
                .lock()
                .unwrap()
                .push(format!("status:{}:{}", scope, message));
        }

        fn hide_status(&self, scope: &str) {
            self.events.lock().unwrap().push(format!("hide:{}", scope));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_waits_for_scheduled_hide() {
        let ui = Arc::new(Recorder::default());
        let board = StatusBoard::new(ui.clone(), Duration::from_millis(1000));

        board.show_transient("shop", "shop successfully deployed");
        board.settle().await;

        assert_eq!(
            *ui.events.lock().unwrap(),
            vec![
                "status:shop:shop successfully deployed".to_string(),
                "hide:shop".to_string(),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_skips_superseded_hide() {
        let ui = Arc::new(Recorder::default());
        let board = StatusBoard::new(ui.clone(), Duration::from_millis(1000));

        board.show_transient("shop", "first");
        tokio::time::sleep(Duration::from_millis(500)).await;
        board.show_transient("shop", "second");
        board.settle().await;

        let hides = ui
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.starts_with("hide:"))
            .count();
        assert_eq!(hides, 1);
    }
}
