//! Move selection: pick one of your live submarines, then pick a reachable
//! cell along one of the four cardinal rays.

use crate::board::{Coordinate, Direction, MAX_MOVE_DISTANCE};
use crate::fleet::Fleet;
use crate::flow::Phase;
use crate::view::Highlights;

/// Candidate destinations for a submarine at `source`.
///
/// Each cardinal ray is walked outward up to [`MAX_MOVE_DISTANCE`] steps and
/// every empty in-bounds cell before the first blocker is offered. Any hull
/// ends the ray: a wreck blocks passage outright, and a live hull cannot be
/// jumped, so cells beyond it are unreachable either way.
pub fn move_candidates(source: Coordinate, fleet: &Fleet) -> Vec<Coordinate> {
    let mut candidates = Vec::new();
    for &dir in Direction::ALL.iter() {
        for dist in 1..=MAX_MOVE_DISTANCE {
            let cell = match source.step(dir, dist) {
                Some(cell) => cell,
                None => break,
            };
            if fleet.occupied(cell) {
                break;
            }
            candidates.push(cell);
        }
    }
    candidates
}

/// Which selection step the move flow is on.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(super) enum MoveStage {
    /// Choosing which live submarine moves.
    PickSource,
    /// Choosing a destination from the candidate set.
    PickDestination,
}

/// Selection state of the move flow while it holds UI focus.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(super) struct MoveFlow {
    stage: MoveStage,
    selected_source: Option<Coordinate>,
    selected_destination: Option<Coordinate>,
    candidates: Vec<Coordinate>,
}

impl MoveFlow {
    /// Start at the source-selection step with nothing picked.
    pub(super) fn new() -> Self {
        Self {
            stage: MoveStage::PickSource,
            selected_source: None,
            selected_destination: None,
            candidates: Vec::new(),
        }
    }

    pub(super) fn stage(&self) -> MoveStage {
        self.stage
    }

    pub(super) fn phase(&self) -> Phase {
        match self.stage {
            MoveStage::PickSource => Phase::SelectSource,
            MoveStage::PickDestination => Phase::SelectDestination,
        }
    }

    /// Handle a board click. Returns whether the click changed a selection;
    /// clicks on illegal cells are dropped without touching state.
    pub(super) fn select(&mut self, cell: Coordinate, fleet: &Fleet) -> bool {
        match self.stage {
            MoveStage::PickSource => {
                if fleet.live_at(cell).is_some() {
                    self.selected_source = Some(cell);
                    true
                } else {
                    false
                }
            }
            MoveStage::PickDestination => {
                if self.candidates.contains(&cell) {
                    self.selected_destination = Some(cell);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Confirm the picked source and compute its reachable destinations.
    /// Returns false (and stays put) if no source is picked yet.
    pub(super) fn confirm_source(&mut self, fleet: &Fleet) -> bool {
        let source = match self.selected_source {
            Some(source) => source,
            None => return false,
        };
        self.candidates = move_candidates(source, fleet);
        self.selected_destination = None;
        self.stage = MoveStage::PickDestination;
        true
    }

    /// Step back one stage. Returns false when already at the first stage,
    /// meaning the flow should be cancelled entirely.
    pub(super) fn back(&mut self) -> bool {
        match self.stage {
            MoveStage::PickDestination => {
                self.selected_destination = None;
                self.candidates.clear();
                self.stage = MoveStage::PickSource;
                true
            }
            MoveStage::PickSource => false,
        }
    }

    /// The confirmed `(source, destination)` pair, once both are picked.
    pub(super) fn selection(&self) -> Option<(Coordinate, Coordinate)> {
        match (self.selected_source, self.selected_destination) {
            (Some(source), Some(destination)) => Some((source, destination)),
            _ => None,
        }
    }

    pub(super) fn highlights(&self, fleet: &Fleet) -> Highlights {
        match self.stage {
            MoveStage::PickSource => Highlights {
                clickable: fleet.live().map(|sub| sub.position).collect(),
                selected_actor: self.selected_source,
                selected_target: None,
            },
            MoveStage::PickDestination => Highlights {
                clickable: self.candidates.clone(),
                selected_actor: self.selected_source,
                selected_target: self.selected_destination,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{AllyBoardState, SubmarineState};
    use std::collections::HashMap;

    fn fleet(entries: &[(&str, usize, usize, bool)]) -> Fleet {
        let submarines: HashMap<String, SubmarineState> = entries
            .iter()
            .map(|&(id, x, y, sunk)| {
                (
                    id.to_owned(),
                    SubmarineState {
                        x,
                        y,
                        hp: if sunk { 0 } else { 3 },
                        sunk,
                    },
                )
            })
            .collect();
        Fleet::from_sync(&AllyBoardState { submarines })
    }

    fn sorted(mut cells: Vec<Coordinate>) -> Vec<Coordinate> {
        cells.sort_by_key(|c| (c.x, c.y));
        cells
    }

    #[test]
    fn empty_board_offers_two_steps_in_each_direction() {
        let fleet = fleet(&[("s1", 3, 3, false)]);
        let candidates = sorted(move_candidates(Coordinate::new(3, 3), &fleet));
        let expected = sorted(
            [(3, 1), (3, 2), (3, 4), (3, 5), (1, 3), (2, 3), (4, 3), (5, 3)]
                .iter()
                .map(|&pair| Coordinate::from(pair))
                .collect(),
        );
        assert_eq!(candidates, expected);
    }

    #[test]
    fn wreck_blocks_the_cell_and_everything_beyond_it() {
        let fleet = fleet(&[("s1", 3, 3, false), ("s2", 3, 2, true)]);
        let candidates = move_candidates(Coordinate::new(3, 3), &fleet);
        assert!(!candidates.contains(&Coordinate::new(3, 2)));
        assert!(!candidates.contains(&Coordinate::new(3, 1)));
        // The other rays are unaffected.
        for open in &[(3, 4), (3, 5), (1, 3), (2, 3), (4, 3), (5, 3)] {
            assert!(candidates.contains(&Coordinate::from(*open)));
        }
    }

    #[test]
    fn live_hull_blocks_its_cell_and_the_cell_behind_it() {
        let fleet = fleet(&[("s1", 3, 3, false), ("s2", 4, 3, false)]);
        let candidates = move_candidates(Coordinate::new(3, 3), &fleet);
        assert!(!candidates.contains(&Coordinate::new(4, 3)));
        assert!(!candidates.contains(&Coordinate::new(5, 3)));
        assert!(candidates.contains(&Coordinate::new(2, 3)));
    }

    #[test]
    fn rays_truncate_at_the_board_edge() {
        let fleet = fleet(&[("s1", 1, 1, false)]);
        let candidates = sorted(move_candidates(Coordinate::new(1, 1), &fleet));
        let expected = sorted(
            [(1, 2), (1, 3), (2, 1), (3, 1)]
                .iter()
                .map(|&pair| Coordinate::from(pair))
                .collect(),
        );
        assert_eq!(candidates, expected);
    }

    #[test]
    fn destination_click_outside_candidates_is_ignored() {
        let fleet = fleet(&[("s1", 3, 3, false)]);
        let mut flow = MoveFlow::new();
        flow.select(Coordinate::new(3, 3), &fleet);
        assert!(flow.confirm_source(&fleet));

        let snapshot = flow.clone();
        assert!(!flow.select(Coordinate::new(4, 4), &fleet));
        assert_eq!(flow, snapshot);
    }

    #[test]
    fn confirm_without_a_source_stays_put() {
        let fleet = fleet(&[("s1", 3, 3, false)]);
        let mut flow = MoveFlow::new();
        assert!(!flow.confirm_source(&fleet));
        assert_eq!(flow.stage(), MoveStage::PickSource);
    }
}
