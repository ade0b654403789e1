//! States for the selection flow state machine.
//!
//! This modules is private and restricted to the
//! [`selection_flow`](crate::selection_flow) scope.
//!
//! Refer to the [`state_machine`](super::state_machine) module for an overview
//! of states, events and transitions.

use log::{trace, warn};

use crate::{
    config::{ConfigStore, Configuration},
    error::Result,
    toolchain::{SelectableItem, Toolchain},
    utils::FilterList,
};

use super::{events::*, state_machine::FlowOutcome};

pub(crate) const BOARD_TITLE: &str = "Select the board";
pub(crate) const PORT_TITLE: &str = "Select the port";

// =============================================================================
// Crate-Public Interface
// =============================================================================

/// Trait implemented by every state of the selection flow.
pub(crate) trait Runnable {
    /// Called right after the state machine transitions into the state, to
    /// prepare the list widget for it.
    fn enter(&mut self, list: &mut FilterList<SelectableItem>);

    /// Called when the user confirms `selected`, the highlighted item (if the
    /// list shows any).
    ///
    /// Returns the event requesting the transition to the next state, or
    /// `None` to stay in the current one.
    fn confirm(
        &mut self,
        config: &Configuration,
        selected: Option<&SelectableItem>,
        toolchain: &mut dyn Toolchain,
        store: &mut dyn ConfigStore,
    ) -> Option<Event>;
}

// ChoosingBoard State =========================================================

/// The initial state, offering the boards known to the toolchain.
///
///  * **`BoardChosenEvent` => `ChoosingPortState`** when a board is confirmed.
///  * **`QuitEvent` => `DoneState`** when the user quits.
#[derive(Debug)]
pub(crate) struct ChoosingBoardState {
    /// Handed over to the list widget when entering the state.
    pub boards: Vec<SelectableItem>,
}
impl Runnable for ChoosingBoardState {
    fn enter(&mut self, list: &mut FilterList<SelectableItem>) {
        trace!("=> ChoosingBoard");
        list.reset_filter();
        list.set_items(std::mem::take(&mut self.boards));
        list.set_title(BOARD_TITLE);
    }

    fn confirm(
        &mut self,
        config: &Configuration,
        selected: Option<&SelectableItem>,
        toolchain: &mut dyn Toolchain,
        _store: &mut dyn ConfigStore,
    ) -> Option<Event> {
        let qualifier = match selected {
            Some(SelectableItem::Board { name, qualifier }) => {
                trace!("board `{}` ({}) selected", name, qualifier);
                qualifier.clone()
            }
            _ => {
                trace!("no board to confirm");
                return None;
            }
        };

        let ports = toolchain
            .list_ports()
            .unwrap_or_else(|e| {
                warn!("{}", e);
                Vec::new()
            })
            .into_iter()
            .map(|path| SelectableItem::Port { path })
            .collect();

        let mut config = config.clone();
        config.board = qualifier;
        Some(Event::BoardChosen(BoardChosenEvent { config, ports }))
    }
}

// ChoosingPort State ==========================================================

/// Offers the serial ports once the board is known.
///
///  * **`PortChosenEvent` => `DoneState`** when a port is confirmed; the
///    configuration is saved before the event is fired.
///  * **`QuitEvent` => `DoneState`** when the user quits.
#[derive(Debug)]
pub(crate) struct ChoosingPortState {
    pub ports: Vec<SelectableItem>,
}
impl Runnable for ChoosingPortState {
    fn enter(&mut self, list: &mut FilterList<SelectableItem>) {
        trace!("=> ChoosingPort");
        list.reset_filter();
        list.set_items(std::mem::take(&mut self.ports));
        list.set_title(PORT_TITLE);
    }

    fn confirm(
        &mut self,
        config: &Configuration,
        selected: Option<&SelectableItem>,
        _toolchain: &mut dyn Toolchain,
        store: &mut dyn ConfigStore,
    ) -> Option<Event> {
        let path = match selected {
            Some(SelectableItem::Port { path }) => path.clone(),
            _ => {
                trace!("no port to confirm");
                return None;
            }
        };
        trace!("port `{}` selected", path);

        let mut config = config.clone();
        config.port = path;
        let saved = store.save(&config);
        Some(Event::PortChosen(PortChosenEvent { config, saved }))
    }
}

// Done State ==================================================================

/// Reached when the flow completes, normally or because the user quit. The
/// flow stops reading input once in this state.
#[derive(Debug)]
pub(crate) struct DoneState {
    /// Handed to the owner of the state machine once the flow is over.
    pub outcome: Result<FlowOutcome>,
}
impl DoneState {
    pub(crate) fn saved(config: Configuration, saved: Result<()>) -> Self {
        trace!(
            "=> Done, configuration {}",
            if saved.is_ok() { "saved" } else { "not saved" }
        );
        DoneState {
            outcome: saved.map(|_| FlowOutcome::Saved(config)),
        }
    }

    pub(crate) fn cancelled() -> Self {
        trace!("=> Done, selection cancelled");
        DoneState {
            outcome: Ok(FlowOutcome::Cancelled),
        }
    }
}
impl Runnable for DoneState {
    fn enter(&mut self, _list: &mut FilterList<SelectableItem>) {}

    fn confirm(
        &mut self,
        _config: &Configuration,
        _selected: Option<&SelectableItem>,
        _toolchain: &mut dyn Toolchain,
        _store: &mut dyn ConfigStore,
    ) -> Option<Event> {
        None
    }
}
