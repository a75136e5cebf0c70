//! Value objects for the turn context and resume bookkeeping.

mod interaction;
mod progress;
mod resume;
mod turn;

pub use interaction::{InteractionKind, PlayerInteraction};
pub use progress::GameProgress;
pub use resume::{ChoiceRecord, ResumeContext};
pub use turn::{SceneContext, TurnRequest};
