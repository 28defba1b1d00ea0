//! Shared world state for task finalization BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskledger::tracking::{
    adapters::memory::InMemoryTrackingStore,
    domain::Task,
    services::{RecordTracker, TaskLifecycleError, TaskLifecycleManager},
};

/// Lifecycle manager type used by the BDD world.
pub type TestManager = TaskLifecycleManager<InMemoryTrackingStore, DefaultClock>;

/// Record tracker type used by the BDD world.
pub type TestTracker = RecordTracker<InMemoryTrackingStore, DefaultClock>;

/// Scenario world for task finalization behaviour tests.
pub struct TaskFinalizationWorld {
    pub manager: TestManager,
    pub tracker: TestTracker,
    pub running_task: Option<Task>,
    pub last_finalize_result: Option<Result<Task, TaskLifecycleError>>,
}

impl TaskFinalizationWorld {
    /// Creates a world with an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(InMemoryTrackingStore::new());
        let clock = Arc::new(DefaultClock);
        Self {
            manager: TaskLifecycleManager::new(Arc::clone(&store), Arc::clone(&clock)),
            tracker: RecordTracker::new(store, clock),
            running_task: None,
            last_finalize_result: None,
        }
    }
}

impl Default for TaskFinalizationWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskFinalizationWorld {
    TaskFinalizationWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
