//! Typed error taxonomy for the decision core.

use thiserror::Error;

use super::action::Move;
use super::item::ItemKind;

/// Errors raised synchronously by the state machine and the orchestrator.
///
/// Decision engines filter their choices through `legal_moves` by contract,
/// so any of these surfacing from inside an engine indicates an engine
/// defect and must propagate rather than be swallowed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GameError {
    /// The move is absent from the current legal move set.
    #[error("illegal move {0:?} in this state")]
    InvalidMove(Move),

    /// An item spend was requested on a zero-count slot, outside the
    /// adrenaline-steal exception.
    #[error("no {0} held to spend")]
    InsufficientItem(ItemKind),

    /// A constructor or snapshot was handed inconsistent parameters.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// No eligible actor remains, or the state violates a structural
    /// invariant. Fatal: indicates an upstream bug, not user error.
    #[error("degenerate state: {0}")]
    DegenerateState(&'static str),
}
