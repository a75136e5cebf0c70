//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::ports::{ClockPort, GenerationPort, SessionStore};
use crate::use_cases;

/// Main application state.
///
/// Holds the use cases and the injected collaborators. Passed to HTTP
/// handlers via Axum state.
pub struct App {
    pub use_cases: UseCases,
    pub store: Arc<dyn SessionStore>,
    pub generation: Arc<dyn GenerationPort>,
}

/// Container for all use cases.
pub struct UseCases {
    pub turn: Arc<use_cases::ProcessTurn>,
    pub session: Arc<use_cases::SessionOps>,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(generation: Arc<dyn GenerationPort>, store: Arc<dyn SessionStore>) -> Self {
        let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
        Self::with_clock(generation, store, clock)
    }

    /// Create a new App with an explicit clock (for tests).
    pub fn with_clock(
        generation: Arc<dyn GenerationPort>,
        store: Arc<dyn SessionStore>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        let turn = Arc::new(use_cases::ProcessTurn::new(
            generation.clone(),
            store.clone(),
            clock,
        ));
        let session = Arc::new(use_cases::SessionOps::new(store.clone()));

        Self {
            use_cases: UseCases { turn, session },
            store,
            generation,
        }
    }
}
