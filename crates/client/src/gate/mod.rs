//! Deletion Confirmation Gate: nothing destructive reaches a repository
//! without an explicit confirm.

mod intent;
mod reducer;
mod state;

pub use intent::GateIntent;
pub use reducer::GateReducer;
pub use state::GateState;

use async_trait::async_trait;
use domain::Result;
use std::fmt::Display;
use tracing::info;

use crate::mvi::Reducer;

/// Something that can irreversibly delete an `Id`.
#[async_trait]
pub trait Deleter<Id: Send + Sync>: Send + Sync {
    async fn delete_target(&self, id: &Id) -> Result<()>;
}

pub struct DeletionGate<Id> {
    state: GateState<Id>,
    prompt: &'static str,
}

impl<Id> DeletionGate<Id>
where
    Id: Clone + Display + Send + Sync,
{
    pub fn new(prompt: &'static str) -> Self {
        Self {
            state: GateState::Idle,
            prompt,
        }
    }

    pub fn state(&self) -> &GateState<Id> {
        &self.state
    }

    pub fn target(&self) -> Option<&Id> {
        self.state.target()
    }

    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    pub fn prompt(&self) -> Option<&'static str> {
        self.is_pending().then_some(self.prompt)
    }

    fn dispatch(&mut self, intent: GateIntent<Id>) {
        let state = std::mem::take(&mut self.state);
        self.state = GateReducer::reduce(state, intent);
    }

    pub fn request(&mut self, id: Id) {
        self.dispatch(GateIntent::Request(id));
    }

    pub fn cancel(&mut self) {
        self.dispatch(GateIntent::Cancel);
    }

    /// Closes the gate, then deletes the captured target. A failure is
    /// returned but does not reopen the gate. `Ok(None)` when nothing was pending.
    pub async fn confirm(&mut self, deleter: &dyn Deleter<Id>) -> Result<Option<Id>> {
        let Some(target) = self.state.target().cloned() else {
            return Ok(None);
        };
        self.dispatch(GateIntent::Confirm);

        info!("Delete confirmed for {}", target);
        deleter.delete_target(&target).await?;
        Ok(Some(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::ClientError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl Deleter<String> for Recorder {
        async fn delete_target(&self, id: &String) -> Result<()> {
            self.calls.lock().unwrap().push(id.clone());
            if self.fail {
                return Err(ClientError::Transport("offline".into()));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn cancel_issues_no_call() {
        let recorder = Recorder::default();
        let mut gate = DeletionGate::new("Delete?");
        gate.request("b1".to_string());
        assert_eq!(gate.prompt(), Some("Delete?"));

        gate.cancel();
        assert_eq!(gate.confirm(&recorder).await.unwrap(), None);
        assert!(recorder.calls.lock().unwrap().is_empty());
        assert_eq!(gate.prompt(), None);
    }

    #[tokio::test]
    async fn failed_confirm_does_not_reopen() {
        let recorder = Recorder {
            fail: true,
            ..Default::default()
        };
        let mut gate = DeletionGate::new("Delete?");
        gate.request("b1".to_string());

        assert!(gate.confirm(&recorder).await.is_err());
        assert_eq!(gate.state(), &GateState::Idle);

        // 再次确认不会重复提交
        assert_eq!(gate.confirm(&recorder).await.unwrap(), None);
        assert_eq!(recorder.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn confirm_deletes_latest_target() {
        let recorder = Recorder::default();
        let mut gate = DeletionGate::new("Delete?");
        gate.request("b1".to_string());
        gate.request("b2".to_string());

        assert_eq!(gate.confirm(&recorder).await.unwrap(), Some("b2".to_string()));
        assert_eq!(*recorder.calls.lock().unwrap(), vec!["b2".to_string()]);
    }
}
