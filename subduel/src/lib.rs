//! Turn-action flow engine for a submarine variant of Battleship.
//!
//! The game itself lives on a server; this crate is the client-side core that
//! decides what a player may do between two state syncs. It models the two
//! mutually exclusive interaction flows, attack (pick an attacker, pick an
//! adjacent target) and move (pick a submarine, pick a destination within two
//! cardinal steps), plus the turn gate that forces both into the
//! opponent-turn phase whenever the viewer does not own the turn.
//!
//! Everything at the edges is injected or emitted as plain data: state syncs
//! come in as [`state::GameStateView`] values, confirmed actions go out
//! through an [`action::ActionSubmitter`] implementation, and after every
//! event the host reads back [`view::Highlights`] and the enabled
//! [`view::Control`] set to paint. The engine never touches a network or a
//! render target, and its legality checks are advisory UX only; the server
//! remains the authority on every rule.

pub mod action;
pub mod board;
pub mod fleet;
pub mod flow;
pub mod state;
pub mod view;
