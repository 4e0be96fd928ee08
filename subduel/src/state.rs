//! Synchronized game state consumed from the server, and the turn context
//! derived from it.
//!
//! The engine never asks the server anything; a host fetches the state
//! endpoint and feeds the decoded [`GameStateView`] to
//! [`Engine::sync`][crate::flow::Engine::sync]. Both the turn context and the
//! fleet snapshot are replaced, never merged, on every sync.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a player. Assigned by the server; opaque to the engine.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// View this id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Identifier of a game session, handed out by the initialize endpoint.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    /// View this id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for GameId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for GameId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Wire form of one submarine on the ally board.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SubmarineState {
    pub x: usize,
    pub y: usize,
    pub hp: u32,
    pub sunk: bool,
}

/// Wire form of the viewer's side of the board.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllyBoardState {
    /// Submarines keyed by their server-assigned id.
    pub submarines: HashMap<String, SubmarineState>,
}

/// One synchronized game state as served by the state endpoint.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateView {
    /// Session identifier. Absent from some early mock payloads; submission
    /// is aborted while it is unknown.
    #[serde(default)]
    pub game_id: Option<GameId>,
    /// The player entitled to act this turn.
    pub current_player_id: PlayerId,
    /// The viewer's side of the board.
    pub ally_board: AllyBoardState,
}

/// Turn ownership and session identity, refreshed on every sync.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TurnContext {
    viewer: PlayerId,
    current: Option<PlayerId>,
    game: Option<GameId>,
}

impl TurnContext {
    /// Create a context for the given viewer, before any state has synced.
    /// Until the first sync no one owns the turn and no session is known.
    pub fn new(viewer: PlayerId) -> Self {
        Self {
            viewer,
            current: None,
            game: None,
        }
    }

    /// Replace turn ownership and session identity from a sync payload.
    pub fn apply_sync(&mut self, view: &GameStateView) {
        self.current = Some(view.current_player_id.clone());
        self.game = view.game_id.clone();
    }

    /// The player this client renders for.
    pub fn viewer(&self) -> &PlayerId {
        &self.viewer
    }

    /// The player entitled to act, once a sync has reported one.
    pub fn current(&self) -> Option<&PlayerId> {
        self.current.as_ref()
    }

    /// The session id, once a sync has reported one.
    pub fn game(&self) -> Option<&GameId> {
        self.game.as_ref()
    }

    /// Whether the viewer is the player entitled to act this turn.
    pub fn is_my_turn(&self) -> bool {
        self.current.as_ref() == Some(&self.viewer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_payload_deserializes_from_documented_shape() {
        let view: GameStateView = serde_json::from_str(
            r#"{
                "gameId": "g-1",
                "currentPlayerId": "playerA",
                "allyBoard": {
                    "submarines": {
                        "s1": {"x": 2, "y": 2, "hp": 3, "sunk": false},
                        "s2": {"x": 4, "y": 4, "hp": 0, "sunk": true}
                    }
                }
            }"#,
        )
        .unwrap();
        assert_eq!(view.game_id, Some(GameId::from("g-1")));
        assert_eq!(view.current_player_id, PlayerId::from("playerA"));
        assert_eq!(view.ally_board.submarines.len(), 2);
        assert!(view.ally_board.submarines["s2"].sunk);
    }

    #[test]
    fn sync_payload_tolerates_missing_game_id() {
        let view: GameStateView = serde_json::from_str(
            r#"{"currentPlayerId": "playerA", "allyBoard": {"submarines": {}}}"#,
        )
        .unwrap();
        assert_eq!(view.game_id, None);
    }

    #[test]
    fn turn_ownership_follows_sync() {
        let mut ctx = TurnContext::new(PlayerId::from("playerA"));
        assert!(!ctx.is_my_turn());

        let mut view = GameStateView {
            game_id: Some(GameId::from("g-1")),
            current_player_id: PlayerId::from("playerA"),
            ally_board: AllyBoardState::default(),
        };
        ctx.apply_sync(&view);
        assert!(ctx.is_my_turn());
        assert_eq!(ctx.game().map(GameId::as_str), Some("g-1"));

        view.current_player_id = PlayerId::from("playerB");
        ctx.apply_sync(&view);
        assert!(!ctx.is_my_turn());
    }
}
