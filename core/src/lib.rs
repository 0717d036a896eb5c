//! Game-state engine for mindsweeper: a grid of hidden tiles whose occupants
//! are fought, claimed or triggered, driven entirely by entity tags from the
//! JSON configuration.
//!
//! A [`GameSession`] owns one board at a time. Clicks go through
//! [`GameSession::handle_click`], which returns a [`ClickReport`] describing
//! what changed; two-phase fights are finished with [`GameSession::advance`].

pub use board::*;
pub use catalog::*;
pub use cell::*;
pub use combat::*;
pub use config::*;
pub use crystal::*;
pub use effects::*;
pub use engine::*;
pub use error::*;
pub use events::*;
pub use inventory::*;
pub use player::*;
pub use random::*;
pub use rules::*;
pub use session::*;
pub use snapshot::*;
pub use tally::*;
pub use threat::*;
pub use types::*;

mod board;
mod catalog;
mod cell;
mod combat;
mod config;
mod crystal;
mod effects;
mod engine;
mod error;
mod events;
mod inventory;
mod player;
mod random;
mod rules;
mod session;
mod snapshot;
mod tally;
mod threat;
mod types;

#[cfg(test)]
mod test_support;
