//! Board and port selection state machine.
//!
//! The selection is a two-stage chooser on top of a single
//! [`FilterList`] widget: first the board, then the serial port. Terminal
//! events are fed one at a time; the state machine only moves when the user
//! confirms the highlighted item or quits. Everything else (cursor movement,
//! filtering) is handled by the list widget.
//!
//! ```text
//!                START
//!                  |
//!                  v
//!         .---------------.
//!         | ChoosingBoard |--------.
//!         '---------------'        |
//!                  |               |
//!            board chosen         quit
//!                  |               |
//!                  v               |
//!         .---------------.        |
//!         | ChoosingPort  |------->|
//!         '---------------'        |
//!                  |               |
//!            port chosen           |
//!            (config saved)        |
//!                  |               |
//!                  v               v
//!                 .-----------------.
//!                 |      Done       |
//!                 '-----------------'
//! ```
//!
//! Confirming while the list is empty, or filtered down to nothing, does not
//! move the state machine.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{trace, warn};

use super::events::*;
use super::states::*;
use crate::{
    config::{ConfigStore, Configuration},
    error::Result,
    toolchain::{SelectableItem, Toolchain},
    utils::{draw, read_input, terminal_size, FilterList, Input, TerminalGuard},
};

// =============================================================================
// Public Interface
// =============================================================================

/// How a completed selection ended.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FlowOutcome {
    /// Both board and port were chosen and the configuration was saved.
    Saved(Configuration),
    /// The user quit before choosing a port. Nothing was saved.
    Cancelled,
}

/// The stage the selection is at.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Stage {
    ChoosingBoard,
    ChoosingPort,
    Done,
}

/// The board and port selection, driven by [`Input`] events.
///
/// The board list is fetched from the toolchain when the flow is created. A
/// toolchain failure is logged and leaves the list empty.
pub struct SelectionFlow<'a, T: Toolchain, C: ConfigStore> {
    sm: FlowStates,
    list: FilterList<SelectableItem>,
    toolchain: &'a mut T,
    store: &'a mut C,
}
impl<'a, T: Toolchain, C: ConfigStore> SelectionFlow<'a, T, C> {
    pub fn new(config: Configuration, toolchain: &'a mut T, store: &'a mut C) -> Self {
        let boards = toolchain.list_boards().unwrap_or_else(|e| {
            warn!("{}", e);
            Vec::new()
        });

        let mut list = FilterList::new(BOARD_TITLE, Vec::new());
        let mut sm = FlowStates::ChoosingBoard(FlowSM::new(config, boards));
        sm.enter(&mut list);

        SelectionFlow {
            sm,
            list,
            toolchain,
            store,
        }
    }

    pub fn stage(&self) -> Stage {
        match &self.sm {
            FlowStates::ChoosingBoard(_) => Stage::ChoosingBoard,
            FlowStates::ChoosingPort(_) => Stage::ChoosingPort,
            FlowStates::Done(_) => Stage::Done,
        }
    }

    pub fn is_done(&self) -> bool {
        self.stage() == Stage::Done
    }

    /// The configuration as chosen so far.
    pub fn config(&self) -> &Configuration {
        self.sm.config()
    }

    pub fn list(&self) -> &FilterList<SelectableItem> {
        &self.list
    }

    /// Handles one terminal event. Returns `true` once the flow is done and no
    /// more input should be read.
    pub fn handle(&mut self, input: Input) -> bool {
        if self.is_done() {
            return true;
        }

        let key = match input {
            Input::Resize(width, height) => {
                self.list.set_size(width, height);
                return false;
            }
            Input::Key(key) => key,
        };

        if is_quit(&key, &self.list) {
            let event = Event::Quit(QuitEvent {
                config: self.sm.config().clone(),
            });
            self.transition(event);
            return true;
        }

        if key.code == KeyCode::Enter {
            let event = self.sm.confirm(
                self.list.selected(),
                &mut *self.toolchain,
                &mut *self.store,
            );
            match event {
                Some(event) => self.transition(event),
                None => trace!("nothing to confirm in {:?}", self.stage()),
            }
            if self.is_done() {
                return true;
            }
        }

        self.list.handle_key(key);
        false
    }

    /// The lines to draw for the current state.
    pub fn view(&self) -> Vec<String> {
        self.list.view()
    }

    /// Consumes the flow and returns how it ended. A flow abandoned before
    /// reaching `Done` counts as cancelled.
    pub fn into_outcome(self) -> Result<FlowOutcome> {
        match self.sm {
            FlowStates::Done(sm) => sm.state.outcome,
            _ => Ok(FlowOutcome::Cancelled),
        }
    }

    fn transition(&mut self, event: Event) {
        self.sm = self.sm.step(event);
        self.sm.enter(&mut self.list);
    }
}

/// Runs the selection with the terminal attached until the user saves or
/// quits.
///
/// The terminal is switched to raw mode on the alternate screen for the
/// duration of the selection and restored afterwards, even on error.
pub fn select_interactive<T: Toolchain, C: ConfigStore>(
    config: Configuration,
    toolchain: &mut T,
    store: &mut C,
) -> Result<FlowOutcome> {
    let mut flow = SelectionFlow::new(config, toolchain, store);
    {
        let _terminal = TerminalGuard::enter()?;
        let (width, height) = terminal_size()?;
        flow.handle(Input::Resize(width, height));

        loop {
            draw(&flow.view())?;
            if let Some(input) = read_input()? {
                if flow.handle(input) {
                    break;
                }
            }
        }
    }
    flow.into_outcome()
}

// =============================================================================
// Private stuff
// =============================================================================

/// `q` and `Esc` quit unless they are meant for the filter; `Ctrl+C` always
/// quits since raw mode swallows the signal.
fn is_quit(key: &KeyEvent, list: &FilterList<SelectableItem>) -> bool {
    match key.code {
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        KeyCode::Char('q') => !list.is_editing_filter(),
        KeyCode::Esc => !list.is_editing_filter() && !list.is_filtered(),
        _ => false,
    }
}

// -----------------------------------------------------------------------------
// The State Machine
// -----------------------------------------------------------------------------

/// The selection state machine. The configuration being built is shared by
/// all states.
#[derive(Debug)]
struct FlowSM<S: Runnable> {
    config: Configuration,
    state: S,
}
impl<S: Runnable> FlowSM<S> {
    fn confirm(
        &mut self,
        selected: Option<&SelectableItem>,
        toolchain: &mut dyn Toolchain,
        store: &mut dyn ConfigStore,
    ) -> Option<Event> {
        self.state.confirm(&self.config, selected, toolchain, store)
    }
}

/// The flow starts in the `ChoosingBoardState`.
impl FlowSM<ChoosingBoardState> {
    fn new(config: Configuration, boards: Vec<SelectableItem>) -> Self {
        FlowSM {
            config,
            state: ChoosingBoardState { boards },
        }
    }
}

/// Wraps the state machine and its various states into a simple enum, which can
/// also be used for pattern matching during state transitions.
#[derive(Debug)]
enum FlowStates {
    ChoosingBoard(FlowSM<ChoosingBoardState>),
    ChoosingPort(FlowSM<ChoosingPortState>),
    Done(FlowSM<DoneState>),
}
impl FlowStates {
    /// Decides the next state from the current one and `event`. Transitions
    /// from events are implemented with `From`/`Into`; pairs without such an
    /// implementation are illegal.
    fn step(&mut self, event: Event) -> Self {
        match self {
            FlowStates::ChoosingBoard(sm) => match event {
                Event::BoardChosen(ev) => FlowStates::ChoosingPort(ev.into()),
                Event::Quit(ev) => FlowStates::Done(ev.into()),
                _ => unreachable!("illegal event {:#?} at current state {:#?}", event, sm),
            },
            FlowStates::ChoosingPort(sm) => match event {
                Event::PortChosen(ev) => FlowStates::Done(ev.into()),
                Event::Quit(ev) => FlowStates::Done(ev.into()),
                _ => unreachable!("illegal event {:#?} at current state {:#?}", event, sm),
            },
            FlowStates::Done(sm) => {
                unreachable!("illegal event {:#?} at current state {:#?}", event, sm)
            }
        }
    }

    fn enter(&mut self, list: &mut FilterList<SelectableItem>) {
        match self {
            FlowStates::ChoosingBoard(sm) => sm.state.enter(list),
            FlowStates::ChoosingPort(sm) => sm.state.enter(list),
            FlowStates::Done(sm) => sm.state.enter(list),
        }
    }

    fn confirm(
        &mut self,
        selected: Option<&SelectableItem>,
        toolchain: &mut dyn Toolchain,
        store: &mut dyn ConfigStore,
    ) -> Option<Event> {
        match self {
            FlowStates::ChoosingBoard(sm) => sm.confirm(selected, toolchain, store),
            FlowStates::ChoosingPort(sm) => sm.confirm(selected, toolchain, store),
            FlowStates::Done(sm) => sm.confirm(selected, toolchain, store),
        }
    }

    fn config(&self) -> &Configuration {
        match self {
            FlowStates::ChoosingBoard(sm) => &sm.config,
            FlowStates::ChoosingPort(sm) => &sm.config,
            FlowStates::Done(sm) => &sm.config,
        }
    }
}

// -----------------------------------------------------------------------------
// State from Event transitions
// -----------------------------------------------------------------------------

impl From<BoardChosenEvent> for FlowSM<ChoosingPortState> {
    fn from(event: BoardChosenEvent) -> FlowSM<ChoosingPortState> {
        FlowSM {
            config: event.config,
            state: ChoosingPortState { ports: event.ports },
        }
    }
}

impl From<PortChosenEvent> for FlowSM<DoneState> {
    fn from(event: PortChosenEvent) -> FlowSM<DoneState> {
        FlowSM {
            config: event.config.clone(),
            state: DoneState::saved(event.config, event.saved),
        }
    }
}

impl From<QuitEvent> for FlowSM<DoneState> {
    fn from(event: QuitEvent) -> FlowSM<DoneState> {
        FlowSM {
            config: event.config,
            state: DoneState::cancelled(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
