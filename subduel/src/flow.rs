//! The turn-action flow engine.
//!
//! [`Engine`] owns the single source of truth shared by both interaction
//! flows: the [`TurnContext`], the [`Fleet`] snapshot, and a top-level mode
//! that lets at most one flow hold UI focus at a time. Hosts feed it discrete
//! events (a sync payload, a board click, a button press) and read back the
//! current [`Phase`], highlights and enabled controls after each one.
//!
//! Events that are illegal in the current phase are dropped without touching
//! state; the event methods report whether anything changed so a host can
//! skip a repaint.

use enumflags2::BitFlags;
use thiserror::Error;

use crate::action::{ActionRequest, ActionSubmitter, SubmitError};
use crate::board::{direction_and_distance, Coordinate, GeometryError};
use crate::fleet::Fleet;
use crate::state::{GameStateView, PlayerId, TurnContext};
use crate::view::{enabled_controls, Control, Highlights};

pub use self::{attack::attack_candidates, movement::move_candidates};

use self::attack::{AttackFlow, AttackStage};
use self::movement::{MoveFlow, MoveStage};

mod attack;
mod movement;

/// One discrete interaction state. Gates which controls are enabled and which
/// board cells respond to a click.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Phase {
    /// The viewer's turn, no flow in progress.
    Idle,
    /// Attack flow: choosing the attacker.
    SelectActor,
    /// Attack flow: choosing the target cell.
    SelectTarget,
    /// Move flow: choosing the submarine to move.
    SelectSource,
    /// Move flow: choosing the destination cell.
    SelectDestination,
    /// An action submission is in flight. Every control is disabled.
    Submitting,
    /// The opponent owns the turn.
    OpponentTurn,
}

/// What a confirm press accomplished.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ConfirmOutcome {
    /// Nothing was confirmable in the current phase; state is unchanged.
    Ignored,
    /// The actor/source was confirmed and its candidate cells are ready.
    CandidatesReady,
    /// The action was submitted and accepted; the turn has passed.
    Submitted,
}

/// Error surfaced by [`Engine::confirm`].
#[derive(Debug, Error)]
pub enum FlowError {
    /// A selected destination did not decompose into a cardinal move. The
    /// candidate set only offers cardinal cells, so this is a candidate
    /// computation bug, not a user error.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// No game session id is known; the submission was aborted before the
    /// submitter was contacted and the flow stayed in its selection phase.
    #[error("no game session id is known; submission aborted")]
    MissingSession,

    /// The submitter rejected the action. Selections are retained so the
    /// user can retry or re-pick without starting over.
    #[error("action submission rejected: {0}")]
    Submission(#[source] SubmitError),
}

/// Which flow currently holds UI focus. Keeping this a single enum is what
/// enforces the flows' mutual exclusion: there is nowhere to store a second
/// active flow.
#[derive(Debug, Clone, Eq, PartialEq)]
enum Mode {
    /// The opponent owns the turn. Initial state until a sync says otherwise.
    OpponentTurn,
    /// The viewer's turn, no flow started.
    Idle,
    /// The attack flow holds focus.
    Attacking(AttackFlow),
    /// The move flow holds focus.
    Moving(MoveFlow),
}

/// Outcome of the selection-phase half of a confirm press, before any
/// submitter contact.
enum Prepared {
    Done(ConfirmOutcome),
    Submit(ActionRequest),
}

/// The turn-action flow engine. Generic over the injected submitter so hosts
/// and tests choose their own transport.
#[derive(Debug)]
pub struct Engine<S> {
    ctx: TurnContext,
    fleet: Fleet,
    mode: Mode,
    /// Per-turn budgets. Attack and move are independent; each latches on
    /// its own submission success and both clear when the turn returns.
    attacked_this_turn: bool,
    moved_this_turn: bool,
    submitter: S,
}

impl<S: ActionSubmitter> Engine<S> {
    /// Create an engine rendering for `viewer`, submitting actions through
    /// `submitter`. Starts in the opponent-turn phase until a sync reports
    /// the viewer owns the turn.
    pub fn new(viewer: PlayerId, submitter: S) -> Self {
        Self {
            ctx: TurnContext::new(viewer),
            fleet: Fleet::default(),
            mode: Mode::OpponentTurn,
            attacked_this_turn: false,
            moved_this_turn: false,
            submitter,
        }
    }

    /// The current interaction phase.
    pub fn phase(&self) -> Phase {
        match &self.mode {
            Mode::OpponentTurn => Phase::OpponentTurn,
            Mode::Idle => Phase::Idle,
            Mode::Attacking(flow) => flow.phase(),
            Mode::Moving(flow) => flow.phase(),
        }
    }

    /// The shared turn context, replaced on every sync.
    pub fn turn(&self) -> &TurnContext {
        &self.ctx
    }

    /// The fleet snapshot, replaced on every sync.
    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    /// Whether the attack budget for this turn is spent.
    pub fn has_attacked_this_turn(&self) -> bool {
        self.attacked_this_turn
    }

    /// Whether the move budget for this turn is spent.
    pub fn has_moved_this_turn(&self) -> bool {
        self.moved_this_turn
    }

    /// Borrow the injected submitter.
    pub fn submitter(&self) -> &S {
        &self.submitter
    }

    /// Mutably borrow the injected submitter.
    pub fn submitter_mut(&mut self) -> &mut S {
        &mut self.submitter
    }

    /// The controls enabled for the current phase.
    pub fn controls(&self) -> BitFlags<Control> {
        enabled_controls(self.phase())
    }

    /// The cells to mark clickable/selected for the current phase.
    pub fn highlights(&self) -> Highlights {
        match &self.mode {
            Mode::Attacking(flow) => flow.highlights(&self.fleet),
            Mode::Moving(flow) => flow.highlights(&self.fleet),
            _ => Highlights::empty(),
        }
    }

    /// Apply a synchronized game state. The fleet snapshot and turn context
    /// are replaced wholesale, then the turn gate runs: losing the turn
    /// forces the opponent-turn phase and discards any in-progress
    /// selection; regaining it resets to idle and re-arms both budgets.
    pub fn sync(&mut self, view: &GameStateView) {
        self.ctx.apply_sync(view);
        self.fleet = Fleet::from_sync(&view.ally_board);

        if self.ctx.is_my_turn() {
            if let Mode::OpponentTurn = self.mode {
                self.attacked_this_turn = false;
                self.moved_this_turn = false;
                self.mode = Mode::Idle;
                tracing::debug!(viewer = %self.ctx.viewer(), "turn returned to viewer");
            }
        } else {
            if !matches!(self.mode, Mode::OpponentTurn) {
                tracing::debug!(
                    phase = ?self.phase(),
                    "turn passed to opponent; discarding in-progress selection"
                );
            }
            self.mode = Mode::OpponentTurn;
        }
    }

    /// Start the attack flow. A no-op unless the engine is idle on the
    /// viewer's turn and the attack budget is unspent; in particular this is
    /// ignored while the move flow holds focus.
    pub fn start_attack(&mut self) -> bool {
        if !matches!(self.mode, Mode::Idle) {
            return false;
        }
        if !self.ctx.is_my_turn() || self.attacked_this_turn {
            return false;
        }
        self.mode = Mode::Attacking(AttackFlow::new());
        true
    }

    /// Start the move flow. Gated exactly like [`Engine::start_attack`], on
    /// the independent move budget.
    pub fn start_move(&mut self) -> bool {
        if !matches!(self.mode, Mode::Idle) {
            return false;
        }
        if !self.ctx.is_my_turn() || self.moved_this_turn {
            return false;
        }
        self.mode = Mode::Moving(MoveFlow::new());
        true
    }

    /// Handle a click on a board cell, routed to whichever flow holds focus.
    /// Returns whether the click changed a selection.
    pub fn select_cell(&mut self, cell: Coordinate) -> bool {
        match &mut self.mode {
            Mode::Attacking(flow) => flow.select(cell, &self.fleet),
            Mode::Moving(flow) => flow.select(cell, &self.fleet),
            _ => false,
        }
    }

    /// Handle the back control: selection phases step back one stage, and a
    /// second press from the first stage cancels the flow. Returns whether
    /// the press did anything.
    pub fn back(&mut self) -> bool {
        let cancelled = match &mut self.mode {
            Mode::Attacking(flow) => !flow.back(),
            Mode::Moving(flow) => !flow.back(),
            _ => return false,
        };
        if cancelled {
            self.mode = Mode::Idle;
        }
        true
    }

    /// Handle the confirm control.
    ///
    /// On the first selection stage this locks in the actor/source and
    /// computes candidates. On the second it packages the action and drives
    /// the injected submitter: success latches the flow's per-turn budget
    /// and moves to the opponent-turn phase; rejection keeps the flow in its
    /// selection phase with all selections retained so the user can retry.
    pub fn confirm(&mut self) -> Result<ConfirmOutcome, FlowError> {
        let prepared = match &mut self.mode {
            Mode::Attacking(flow) => match flow.stage() {
                AttackStage::PickActor => {
                    if flow.confirm_actor(&self.fleet) {
                        Prepared::Done(ConfirmOutcome::CandidatesReady)
                    } else {
                        tracing::debug!("confirm ignored: no attacker selected");
                        Prepared::Done(ConfirmOutcome::Ignored)
                    }
                }
                AttackStage::PickTarget => {
                    let target = match flow.target() {
                        Some(target) => target,
                        None => {
                            tracing::debug!("confirm ignored: no target selected");
                            return Ok(ConfirmOutcome::Ignored);
                        }
                    };
                    let game_id = match self.ctx.game() {
                        Some(game_id) => game_id.clone(),
                        None => {
                            tracing::error!("no game session id; attack not submitted");
                            return Err(FlowError::MissingSession);
                        }
                    };
                    Prepared::Submit(ActionRequest::Attack {
                        game_id,
                        player_id: self.ctx.viewer().clone(),
                        target,
                    })
                }
            },
            Mode::Moving(flow) => match flow.stage() {
                MoveStage::PickSource => {
                    if flow.confirm_source(&self.fleet) {
                        Prepared::Done(ConfirmOutcome::CandidatesReady)
                    } else {
                        tracing::debug!("confirm ignored: no source selected");
                        Prepared::Done(ConfirmOutcome::Ignored)
                    }
                }
                MoveStage::PickDestination => {
                    let (source, destination) = match flow.selection() {
                        Some(pair) => pair,
                        None => {
                            tracing::debug!("confirm ignored: no destination selected");
                            return Ok(ConfirmOutcome::Ignored);
                        }
                    };
                    // A failure here means the candidate set offered a cell
                    // it should not have. Propagate loudly.
                    let (direction, distance) = direction_and_distance(source, destination)?;
                    let game_id = match self.ctx.game() {
                        Some(game_id) => game_id.clone(),
                        None => {
                            tracing::error!("no game session id; move not submitted");
                            return Err(FlowError::MissingSession);
                        }
                    };
                    Prepared::Submit(ActionRequest::Move {
                        game_id,
                        player_id: self.ctx.viewer().clone(),
                        direction,
                        distance,
                    })
                }
            },
            _ => {
                tracing::debug!("confirm ignored outside a flow");
                Prepared::Done(ConfirmOutcome::Ignored)
            }
        };

        match prepared {
            Prepared::Done(outcome) => Ok(outcome),
            Prepared::Submit(request) => self.submit(request),
        }
    }

    /// Drive the submitter with a packaged request. The flow sits in the
    /// submitting phase for the duration of the call; `&mut self` guarantees
    /// no other event can interleave with it.
    fn submit(&mut self, request: ActionRequest) -> Result<ConfirmOutcome, FlowError> {
        match self.submitter.submit(&request) {
            Ok(()) => {
                match request {
                    ActionRequest::Attack { .. } => self.attacked_this_turn = true,
                    ActionRequest::Move { .. } => self.moved_this_turn = true,
                }
                self.mode = Mode::OpponentTurn;
                tracing::debug!("action submitted; waiting for the opponent");
                Ok(ConfirmOutcome::Submitted)
            }
            Err(err) => {
                // The flow stays in its selection phase with selections
                // retained, so a retry needs no re-picking.
                tracing::warn!(error = %err, "action submission rejected");
                Err(FlowError::Submission(err))
            }
        }
    }
}
