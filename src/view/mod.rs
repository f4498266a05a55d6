//! Homepage state machine: Loading until the loader settles, then either
//! Failed or Loaded for the rest of the mount.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::FutureExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error};
use uuid::Uuid;

use crate::loader::{LoadError, StudentData, load_student_data};
use crate::store::StudentStore;

pub mod render;

pub use render::{TimestampFormat, render};

#[derive(Debug)]
pub enum ViewState {
    Loading,
    Failed(LoadError),
    Loaded(StudentData),
}

impl ViewState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, ViewState::Loading)
    }
}

/// A mounted homepage. The load runs once, on mount; dropping the handle
/// unmounts it. Aborting the task is what stops a late result on the
/// single-threaded runtime; the active flag is checked again right before
/// publishing for runtimes where the task may still be mid-poll when the
/// handle drops.
pub struct HomepageView {
    state: watch::Receiver<ViewState>,
    active: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl HomepageView {
    pub fn mount(store: Arc<dyn StudentStore>, auth_user_id: Uuid) -> Self {
        let (tx, rx) = watch::channel(ViewState::Loading);
        let active = Arc::new(AtomicBool::new(true));
        let still_mounted = active.clone();

        let task = actix_web::rt::spawn(async move {
            let outcome = AssertUnwindSafe(load_student_data(store.as_ref(), &auth_user_id))
                .catch_unwind()
                .await;

            let next = match outcome {
                Ok(Ok(data)) => ViewState::Loaded(data),
                Ok(Err(e)) => ViewState::Failed(e),
                Err(panic) => {
                    let detail = panic_detail(panic.as_ref());
                    error!(%auth_user_id, detail = %detail, "Homepage load panicked");
                    ViewState::Failed(LoadError::Unknown { detail })
                }
            };

            if !commit(&still_mounted, &tx, next) {
                debug!(%auth_user_id, "Homepage unmounted before load settled");
            }
        });

        Self {
            state: rx,
            active,
            task,
        }
    }

    /// Current state, readable without waiting.
    pub fn state(&self) -> watch::Ref<'_, ViewState> {
        self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.clone()
    }

    /// Waits until the load has settled. If the load task went away without
    /// reporting, the last known state is returned.
    pub async fn settled(&mut self) -> watch::Ref<'_, ViewState> {
        if self.state.wait_for(ViewState::is_settled).await.is_err() {
            debug!("Homepage load ended without a result");
        }
        self.state.borrow()
    }
}

impl Drop for HomepageView {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Release);
        self.task.abort();
    }
}

/// Publishes `next` only while the view is still mounted. Returns whether it
/// was published.
fn commit(active: &AtomicBool, tx: &watch::Sender<ViewState>, next: ViewState) -> bool {
    if !active.load(Ordering::Acquire) {
        return false;
    }
    // receivers may all be gone already; nothing left to update then
    let _ = tx.send(next);
    true
}

fn panic_detail(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
