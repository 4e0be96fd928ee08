//! Action wire types and the submission seam.
//!
//! The flow machines never talk to a network themselves. They build an
//! [`ActionRequest`] and hand it to whatever [`ActionSubmitter`] the engine
//! was constructed with; an HTTP host posts the serialized request to the
//! action endpoint, a test records it.

use serde::Serialize;
use thiserror::Error;

use crate::board::{Coordinate, Direction};
use crate::state::{GameId, PlayerId};

/// Request body for the action-execution endpoint.
///
/// Serializes to the tagged JSON the server expects:
/// `{"actionType": "attack", "gameId": .., "playerId": .., "target": {..}}`
/// or `{"actionType": "move", .., "direction": "north", "distance": 2}`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(
    tag = "actionType",
    rename_all = "lowercase",
    rename_all_fields = "camelCase"
)]
pub enum ActionRequest {
    /// Fire at a cell adjacent to one of the viewer's submarines.
    Attack {
        game_id: GameId,
        player_id: PlayerId,
        target: Coordinate,
    },
    /// Move one of the viewer's submarines along a cardinal ray.
    Move {
        game_id: GameId,
        player_id: PlayerId,
        direction: Direction,
        distance: u8,
    },
}

impl ActionRequest {
    /// The session the action belongs to.
    pub fn game_id(&self) -> &GameId {
        match self {
            ActionRequest::Attack { game_id, .. } => game_id,
            ActionRequest::Move { game_id, .. } => game_id,
        }
    }

    /// The player performing the action.
    pub fn player_id(&self) -> &PlayerId {
        match self {
            ActionRequest::Attack { player_id, .. } => player_id,
            ActionRequest::Move { player_id, .. } => player_id,
        }
    }
}

/// Error returned by an [`ActionSubmitter`] when the action does not take
/// effect: a server-side rule rejection, a transport failure, or a timeout.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("{message}")]
pub struct SubmitError {
    message: String,
}

impl SubmitError {
    /// Create a [`SubmitError`] carrying the given description.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Human-readable description of the failure.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// External collaborator that delivers an action to the game server.
///
/// The engine performs exactly one `submit` call per confirmed action and
/// interprets `Err` as the failure transition back to the selection phase.
/// Implementations own their transport and timeout policy; a submitter that
/// can hang forever leaves the engine stuck in the submitting phase, so
/// network-backed implementations should convert a deadline into a
/// [`SubmitError`].
pub trait ActionSubmitter {
    /// Deliver `request` to the server. `Ok` means the action took effect.
    fn submit(&mut self, request: &ActionRequest) -> Result<(), SubmitError>;
}

impl<S: ActionSubmitter + ?Sized> ActionSubmitter for &mut S {
    fn submit(&mut self, request: &ActionRequest) -> Result<(), SubmitError> {
        (**self).submit(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn attack_request_wire_form() {
        let request = ActionRequest::Attack {
            game_id: GameId::from("g-1"),
            player_id: PlayerId::from("playerA"),
            target: Coordinate::new(2, 3),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "actionType": "attack",
                "gameId": "g-1",
                "playerId": "playerA",
                "target": {"x": 2, "y": 3},
            })
        );
    }

    #[test]
    fn move_request_wire_form() {
        let request = ActionRequest::Move {
            game_id: GameId::from("g-1"),
            player_id: PlayerId::from("playerA"),
            direction: Direction::North,
            distance: 2,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "actionType": "move",
                "gameId": "g-1",
                "playerId": "playerA",
                "direction": "north",
                "distance": 2,
            })
        );
    }
}
