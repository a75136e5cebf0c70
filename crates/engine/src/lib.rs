//! Taleforge Engine library.
//!
//! This crate contains all server-side code for the Taleforge narrative
//! engine.
//!
//! ## Structure
//!
//! - `pipeline/` - extract, repair, and synthesize turn content
//! - `use_cases/` - turn processing and session lifecycle orchestration
//! - `infrastructure/` - external dependency implementations (ports + adapters)
//! - `api/` - HTTP entry points
//! - `prompts` - generation context assembly
//! - `app` - application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod pipeline;
pub mod prompts;
pub mod use_cases;

pub use app::App;
