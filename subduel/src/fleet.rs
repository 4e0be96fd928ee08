//! Per-turn snapshot of the viewer's own submarines.
//!
//! The fleet is rebuilt wholesale from every synchronized game state rather
//! than mutated incrementally; the server is the authority and the snapshot
//! only exists to answer occupancy and selection queries between syncs.

use std::fmt;

use crate::board::Coordinate;
use crate::state::AllyBoardState;

/// Identifier of a submarine within the ally board. Assigned by the server;
/// opaque to the engine.
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct SubmarineId(String);

impl SubmarineId {
    /// View this id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SubmarineId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for SubmarineId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl fmt::Display for SubmarineId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// One submarine in the viewer's fleet.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Submarine {
    /// Server-assigned id of this submarine.
    pub id: SubmarineId,
    /// Cell the submarine occupies.
    pub position: Coordinate,
    /// Remaining hit points.
    pub hp: u32,
    /// Whether the submarine has been sunk. Sunk submarines keep their cell
    /// and block movement, but cannot act.
    pub sunk: bool,
}

impl Submarine {
    /// Whether this submarine is still afloat and able to act.
    pub fn is_live(&self) -> bool {
        !self.sunk
    }
}

/// Snapshot of the viewer's submarines, replaced on every sync.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Fleet {
    submarines: Vec<Submarine>,
}

impl Fleet {
    /// Build a fleet from the ally-board portion of a sync payload. Entries
    /// are sorted by id so the snapshot is deterministic regardless of the
    /// payload's map ordering.
    pub fn from_sync(board: &AllyBoardState) -> Self {
        let mut submarines: Vec<Submarine> = board
            .submarines
            .iter()
            .map(|(id, sub)| Submarine {
                id: SubmarineId::from(id.as_str()),
                position: Coordinate::new(sub.x, sub.y),
                hp: sub.hp,
                sunk: sub.sunk,
            })
            .collect();
        submarines.sort_by(|a, b| a.id.cmp(&b.id));
        Self { submarines }
    }

    /// Number of submarines in the snapshot, sunk ones included.
    pub fn len(&self) -> usize {
        self.submarines.len()
    }

    /// Whether the snapshot holds no submarines at all.
    pub fn is_empty(&self) -> bool {
        self.submarines.is_empty()
    }

    /// Iterate over every submarine in the snapshot.
    pub fn iter(&self) -> impl Iterator<Item = &Submarine> {
        self.submarines.iter()
    }

    /// Iterate over the submarines that can still act.
    pub fn live(&self) -> impl Iterator<Item = &Submarine> {
        self.iter().filter(|sub| sub.is_live())
    }

    /// The live submarine at `cell`, if any.
    pub fn live_at(&self, cell: Coordinate) -> Option<&Submarine> {
        self.live().find(|sub| sub.position == cell)
    }

    /// Whether any submarine, live or sunk, occupies `cell`.
    pub fn occupied(&self, cell: Coordinate) -> bool {
        self.iter().any(|sub| sub.position == cell)
    }

    /// Whether a sunk submarine occupies `cell`.
    pub fn wreck_at(&self, cell: Coordinate) -> bool {
        self.iter().any(|sub| sub.sunk && sub.position == cell)
    }
}
