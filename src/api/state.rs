use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::{rngs::StdRng, SeedableRng};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::catalog::CatalogStore;
use crate::services::RecommendationSession;

/// Idle time after which a session is dropped, unless configured otherwise
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// A session is only ever driven by one request at a time
pub type SessionHandle = Arc<Mutex<RecommendationSession>>;

struct TrackedSession {
    handle: SessionHandle,
    last_used: Instant,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Immutable after load
    pub catalog: Arc<CatalogStore>,
    sessions: Arc<RwLock<HashMap<Uuid, TrackedSession>>>,
    session_ttl: Duration,
    /// Seeds the per-request samplers for similar songs
    rng: Arc<Mutex<StdRng>>,
}

impl AppState {
    /// Creates state around a loaded catalog
    ///
    /// With a seed the similar-song suggestions are reproducible.
    pub fn new(catalog: CatalogStore, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            catalog: Arc::new(catalog),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            session_ttl: DEFAULT_SESSION_TTL,
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Registers a fresh session on the first page
    ///
    /// Sessions idle for longer than the TTL are evicted first.
    pub async fn create_session(&self) -> Uuid {
        let id = Uuid::new_v4();
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;

        let before = sessions.len();
        sessions.retain(|_, tracked| now.duration_since(tracked.last_used) <= self.session_ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, "Evicted idle sessions");
        }

        sessions.insert(
            id,
            TrackedSession {
                handle: Arc::new(Mutex::new(RecommendationSession::new())),
                last_used: now,
            },
        );
        tracing::info!(session_id = %id, active = sessions.len(), "Session created");
        id
    }

    /// Looks up a live session and marks it as used
    pub async fn session(&self, id: Uuid) -> Option<SessionHandle> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let tracked = sessions.get_mut(&id)?;

        if now.duration_since(tracked.last_used) > self.session_ttl {
            sessions.remove(&id);
            tracing::info!(session_id = %id, "Session expired");
            return None;
        }

        tracked.last_used = now;
        Some(tracked.handle.clone())
    }

    /// Returns false if no such session existed
    pub async fn remove_session(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            tracing::info!(session_id = %id, "Session removed");
        }
        removed
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// A sampler for one request, seeded from the shared generator
    pub async fn request_rng(&self) -> StdRng {
        let mut shared = self.rng.lock().await;
        StdRng::from_rng(&mut *shared)
    }
}
