//! Events for the selection flow state machine.
//!
//! This modules is private and restricted to the
//! [`selection_flow`](crate::selection_flow) scope. The public interface of
//! the state machine is provided by [`selection_flow`](crate::selection_flow).
//!
//! Refer to the [`state_machine`](super::state_machine) module for an overview
//! of states, events and transitions.

use crate::{config::Configuration, error::Result, toolchain::SelectableItem};

// =============================================================================
// Crate-Public Interface
// =============================================================================

// BoardChosenEvent ============================================================

/// Event fired when the user confirms a board. It triggers the transition to
/// the `ChoosingPort` state.
#[derive(Debug)]
pub(crate) struct BoardChosenEvent {
    /// The configuration with its `board` already set to the chosen one.
    pub config: Configuration,
    /// The serial ports to offer next.
    pub ports: Vec<SelectableItem>,
}

// PortChosenEvent =============================================================

/// Event fired when the user confirms a port, after the completed
/// configuration went through the store. It triggers the transition to the
/// `Done` state.
#[derive(Debug)]
pub(crate) struct PortChosenEvent {
    pub config: Configuration,
    /// What the store answered when asked to save `config`.
    pub saved: Result<()>,
}

// QuitEvent ===================================================================

/// Event fired when the user abandons the selection, at any stage. Nothing is
/// saved.
#[derive(Debug)]
pub(crate) struct QuitEvent {
    pub config: Configuration,
}

// Events enum ==================================================================

/// Events that can be triggered within the selection flow.
///
/// Each possible value holds an `event`, which in turn holds the data handed
/// from the origin state to the target state.
#[derive(Debug)]
pub(crate) enum Event {
    BoardChosen(BoardChosenEvent),
    PortChosen(PortChosenEvent),
    Quit(QuitEvent),
}
