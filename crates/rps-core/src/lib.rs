//! # RPS Core
//!
//! Deterministic rock-paper-scissors arena simulation.
//!
//! Entities of three kinds drift around a rectangular arena, bounce off its
//! walls and convert each other on contact: Rock beats Scissors, Scissors
//! beats Paper, Paper beats Rock. A session ends when one kind has converted
//! everything, then starts over.
//!
//! ## Architecture
//!
//! - **Entities**: one actor type with a kind, position, velocity and history
//! - **Arena**: ID-ordered entity storage, bounds and zoom scale
//! - **Resolvers**: motion, tally and collision stages run once per tick
//! - **Session**: lifecycle, parameters, selection and the win check
//!
//! ## Usage
//!
//! ```
//! use std::time::Duration;
//! use rps_core::{SessionConfig, SessionController};
//!
//! let mut session = SessionController::new(SessionConfig::default().with_seed(42))?;
//! session.on_win(|kind| println!("{kind} wins!"));
//! session.start()?;
//!
//! for _ in 0..60 {
//!     session.frame(Duration::from_millis(16))?;
//! }
//! println!("{}", session.counts());
//! # Ok::<(), rps_core::SessionError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arena;
pub mod census;
pub mod config;
pub mod entity;
pub mod error;
pub mod event;
pub mod geometry;
pub mod resolver;
pub mod session;
pub mod simulation;
pub mod spawner;

#[cfg(test)]
mod tests;

pub use arena::Arena;
pub use census::Census;
pub use config::SessionConfig;
pub use entity::{Entity, EntityId, Kind};
pub use error::{ConfigError, ParameterError, SessionError, SimError, SpawnError};
pub use event::SimEvent;
pub use resolver::PairMode;
pub use session::{FrameReport, Selected, SessionController, SessionState};
pub use simulation::{Simulation, TickReport};
