//! Declarative outputs for a view collaborator.
//!
//! The engine never touches a render target. After every transition a host
//! asks for [`Highlights`] (which cells to mark clickable/selected) and the
//! enabled [`Control`] set, and paints them however it likes.

use enumflags2::BitFlags;

use crate::board::Coordinate;
use crate::flow::Phase;

/// The UI controls gated by the current phase.
#[derive(BitFlags, Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum Control {
    /// Start the attack flow.
    Attack = 0b00001,
    /// Start the move flow.
    Move = 0b00010,
    /// Step back one selection stage, or cancel out of the flow.
    Back = 0b00100,
    /// Toggle the display mode. Never gated by a flow being in progress.
    Display = 0b01000,
    /// Confirm the current selection.
    Confirm = 0b10000,
}

/// The controls enabled while in `phase`.
///
/// | phase | attack | move | back | display | confirm |
/// |---|---|---|---|---|---|
/// | idle | on | on | off | on | off |
/// | any selection stage | off | off | on | on | on |
/// | submitting | off | off | off | off | off |
/// | opponent turn | off | off | off | on | off |
pub fn enabled_controls(phase: Phase) -> BitFlags<Control> {
    match phase {
        Phase::Idle => Control::Attack | Control::Move | Control::Display,
        Phase::SelectActor
        | Phase::SelectTarget
        | Phase::SelectSource
        | Phase::SelectDestination => Control::Back | Control::Display | Control::Confirm,
        Phase::Submitting => BitFlags::empty(),
        Phase::OpponentTurn => BitFlags::from(Control::Display),
    }
}

/// Cells the view should mark for the current phase: candidates as clickable,
/// plus the confirmed actor/source and the pending target/destination.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Highlights {
    /// Cells that respond to a click in the current phase.
    pub clickable: Vec<Coordinate>,
    /// The selected actor (attacker or move source), once picked.
    pub selected_actor: Option<Coordinate>,
    /// The selected target or destination, once picked.
    pub selected_target: Option<Coordinate>,
}

impl Highlights {
    /// A report with nothing highlighted, used outside the selection phases.
    pub fn empty() -> Self {
        Self::default()
    }
}
