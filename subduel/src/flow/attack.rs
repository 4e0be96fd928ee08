//! Attack selection: pick one of your live submarines, then pick one of the
//! cells adjacent to it.

use crate::board::Coordinate;
use crate::fleet::{Fleet, SubmarineId};
use crate::flow::Phase;
use crate::view::Highlights;

/// Candidate targets for an attacker at `actor`: the in-bounds 8-neighborhood
/// minus cells holding a live own submarine.
///
/// Enemy cells, empty water and sunk wrecks all stay targetable. This is a
/// deliberate asymmetry from move legality, where any hull blocks the cell.
pub fn attack_candidates(actor: Coordinate, fleet: &Fleet) -> Vec<Coordinate> {
    actor
        .neighbors8()
        .filter(|&cell| fleet.live_at(cell).is_none())
        .collect()
}

/// Which selection step the attack flow is on.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(super) enum AttackStage {
    /// Choosing which live submarine attacks.
    PickActor,
    /// Choosing a cell from the candidate set.
    PickTarget,
}

/// Selection state of the attack flow while it holds UI focus.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(super) struct AttackFlow {
    stage: AttackStage,
    selected_actor: Option<(SubmarineId, Coordinate)>,
    selected_target: Option<Coordinate>,
    candidates: Vec<Coordinate>,
}

impl AttackFlow {
    /// Start at the actor-selection step with nothing picked.
    pub(super) fn new() -> Self {
        Self {
            stage: AttackStage::PickActor,
            selected_actor: None,
            selected_target: None,
            candidates: Vec::new(),
        }
    }

    pub(super) fn stage(&self) -> AttackStage {
        self.stage
    }

    pub(super) fn phase(&self) -> Phase {
        match self.stage {
            AttackStage::PickActor => Phase::SelectActor,
            AttackStage::PickTarget => Phase::SelectTarget,
        }
    }

    /// Handle a board click. Returns whether the click changed a selection;
    /// clicks on illegal cells are dropped without touching state.
    pub(super) fn select(&mut self, cell: Coordinate, fleet: &Fleet) -> bool {
        match self.stage {
            AttackStage::PickActor => match fleet.live_at(cell) {
                Some(sub) => {
                    self.selected_actor = Some((sub.id.clone(), sub.position));
                    true
                }
                None => false,
            },
            AttackStage::PickTarget => {
                if self.candidates.contains(&cell) {
                    self.selected_target = Some(cell);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Confirm the picked attacker and compute its candidate targets.
    /// Returns false (and stays put) if no attacker is picked yet.
    pub(super) fn confirm_actor(&mut self, fleet: &Fleet) -> bool {
        let actor = match &self.selected_actor {
            Some((_, position)) => *position,
            None => return false,
        };
        self.candidates = attack_candidates(actor, fleet);
        self.selected_target = None;
        self.stage = AttackStage::PickTarget;
        true
    }

    /// Step back one stage. Returns false when already at the first stage,
    /// meaning the flow should be cancelled entirely.
    pub(super) fn back(&mut self) -> bool {
        match self.stage {
            AttackStage::PickTarget => {
                self.selected_target = None;
                self.candidates.clear();
                self.stage = AttackStage::PickActor;
                true
            }
            AttackStage::PickActor => false,
        }
    }

    /// The confirmed target, once both attacker and target are picked.
    pub(super) fn target(&self) -> Option<Coordinate> {
        match (&self.selected_actor, self.selected_target) {
            (Some(_), Some(target)) => Some(target),
            _ => None,
        }
    }

    pub(super) fn highlights(&self, fleet: &Fleet) -> Highlights {
        let selected_actor = self.selected_actor.as_ref().map(|(_, pos)| *pos);
        match self.stage {
            AttackStage::PickActor => Highlights {
                clickable: fleet.live().map(|sub| sub.position).collect(),
                selected_actor,
                selected_target: None,
            },
            AttackStage::PickTarget => Highlights {
                clickable: self.candidates.clone(),
                selected_actor,
                selected_target: self.selected_target,
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

    #[test]
    fn open_water_offers_all_eight_neighbors() {
        let fleet = fleet(&[("s1", 3, 3, false)]);
        let candidates = attack_candidates(Coordinate::new(3, 3), &fleet);
        assert_eq!(candidates.len(), 8);
    }

    #[test]
    fn live_ally_is_excluded_from_candidates() {
        let fleet = fleet(&[("s1", 3, 3, false), ("s2", 3, 2, false)]);
        let candidates = attack_candidates(Coordinate::new(3, 3), &fleet);
        assert_eq!(candidates.len(), 7);
        assert!(!candidates.contains(&Coordinate::new(3, 2)));
    }

    #[test]
    fn sunk_ally_remains_a_valid_target() {
        let fleet = fleet(&[("s1", 3, 3, false), ("s2", 3, 2, true)]);
        let candidates = attack_candidates(Coordinate::new(3, 3), &fleet);
        assert!(candidates.contains(&Coordinate::new(3, 2)));
    }

    #[test]
    fn corner_attacker_has_three_candidates() {
        let fleet = fleet(&[("s1", 1, 1, false)]);
        let candidates = attack_candidates(Coordinate::new(1, 1), &fleet);
        assert_eq!(candidates.len(), 3);
    }

    #[test]
    fn clicking_a_non_submarine_cell_is_ignored() {
        let fleet = fleet(&[("s1", 2, 2, false)]);
        let mut flow = AttackFlow::new();
        assert!(!flow.select(Coordinate::new(4, 4), &fleet));
        assert_eq!(flow, AttackFlow::new());
    }

    #[test]
    fn reselecting_the_same_actor_is_idempotent() {
        let fleet = fleet(&[("s1", 2, 2, false)]);
        let mut flow = AttackFlow::new();
        assert!(flow.select(Coordinate::new(2, 2), &fleet));
        let snapshot = flow.clone();
        assert!(flow.select(Coordinate::new(2, 2), &fleet));
        assert_eq!(flow, snapshot);
    }

    #[test]
    fn back_from_target_stage_clears_candidates() {
        let fleet = fleet(&[("s1", 2, 2, false)]);
        let mut flow = AttackFlow::new();
        flow.select(Coordinate::new(2, 2), &fleet);
        assert!(flow.confirm_actor(&fleet));
        assert_eq!(flow.stage(), AttackStage::PickTarget);

        assert!(flow.back());
        assert_eq!(flow.stage(), AttackStage::PickActor);
        assert!(flow.highlights(&fleet).selected_target.is_none());
        // A second back means "cancel the flow".
        assert!(!flow.back());
    }
}
