use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use gacha_core::{CollectorProfile, GachaError, PoolType, RawDraw, RecordCollector};

/// Instruction for how a method should behave.
#[derive(Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(GachaError),
    /// Hang indefinitely (simulate a timeout).
    Hang,
}

impl<T> MockBehavior<T> {
    async fn run(self) -> Result<T, GachaError> {
        match self {
            Self::Return(v) => Ok(v),
            Self::Fail(e) => Err(e),
            Self::Hang => std::future::pending().await,
        }
    }
}

#[derive(Default)]
struct InternalState {
    profile: Option<MockBehavior<CollectorProfile>>,
    pool_rules: HashMap<PoolType, MockBehavior<Vec<RawDraw>>>,
    pool_requests: Vec<PoolType>,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Set the behavior for `profile` calls.
    pub async fn set_profile_behavior(&self, behavior: MockBehavior<CollectorProfile>) {
        let mut guard = self.state.lock().await;
        guard.profile = Some(behavior);
    }

    /// Set the behavior for `collect_pool` calls for a specific pool.
    pub async fn set_pool_behavior(&self, pool: PoolType, behavior: MockBehavior<Vec<RawDraw>>) {
        let mut guard = self.state.lock().await;
        guard.pool_rules.insert(pool, behavior);
    }

    /// Pools requested so far, in call order.
    pub async fn pool_requests(&self) -> Vec<PoolType> {
        let guard = self.state.lock().await;
        guard.pool_requests.clone()
    }

    /// Clear all configured behaviors and request logs.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        guard.profile = None;
        guard.pool_rules.clear();
        guard.pool_requests.clear();
    }
}

/// A collector that defers all behavior to an external controller.
///
/// Without a configured behavior `profile` returns a default profile and
/// `collect_pool` returns no draws.
pub struct DynamicMockCollector {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockCollector {
    /// Create a new dynamic mock collector and its controller.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
    ) -> (Arc<dyn RecordCollector>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self { name, state });
        (me as Arc<dyn RecordCollector>, controller)
    }
}

#[async_trait]
impl RecordCollector for DynamicMockCollector {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn profile(&self) -> Result<CollectorProfile, GachaError> {
        // Acquire behavior snapshot without holding the lock across await points
        let behavior = {
            let guard = self.state.lock().await;
            guard.profile.clone()
        };
        match behavior {
            Some(b) => b.run().await,
            None => Ok(CollectorProfile::default()),
        }
    }

    async fn collect_pool(&self, pool: PoolType) -> Result<Vec<RawDraw>, GachaError> {
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.pool_requests.push(pool);
            guard.pool_rules.get(&pool).cloned()
        };
        match behavior {
            Some(b) => b.run().await,
            None => Ok(Vec::new()),
        }
    }
}
