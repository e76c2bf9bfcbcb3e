// Library surface for the binary, headless integration tests and reuse.
// The game core (difficulty, session, spawner, controller) has no terminal dependencies.
pub mod app_dirs;
pub mod config;
pub mod controller;
pub mod difficulty;
pub mod input;
pub mod logging;
pub mod runtime;
pub mod session;
pub mod spawner;
pub mod ui;
pub mod util;

pub use controller::{Cadence, SessionController};
pub use session::{Phase, SessionState};
