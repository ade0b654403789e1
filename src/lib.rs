//! `abt` is a small front-end to `arduino-cli` for the edit, compile and
//! upload loop of sketch development. The board and the serial port are picked
//! once, interactively, and remembered in `.abt.json` next to the sketch;
//! afterwards a single verb compiles and/or uploads with them.
//!
//! ```text
//! abt config     # pick the board, then the port
//! abt all        # compile, then upload
//! abt compile
//! abt upload
//! ```
//!
//! The interactive selection is implemented as a state machine in terms of
//! **states** and **transitions** between them with the following
//! characteristics:
//!
//! * Can only be in one state at any time.
//! * Each state can have its own associated data if needed.
//! * The configuration being built is shared between **all** states.
//! * Transitions between states are triggered via typed **events** and follow
//!   defined semantics.
//! * Only explicitly defined transitions are permitted; the data handed from
//!   one state to the next is attached to the transition event.
//!
//! The implementation of state transitions leverages `rust`'s `From` and `Into`
//! pattern: a new state is created from the event that triggers the
//! transition, and only transitions for which `From` is implemented compile.
//!
//! The external toolchain and the configuration file sit behind the
//! [`Toolchain`] and [`ConfigStore`] traits.

mod config;
mod dispatcher;
mod error;
mod selection_flow;
mod settings;
mod toolchain;
mod utils;

#[cfg(test)]
mod testing;

pub use config::{ConfigStore, Configuration, JsonFileStore};
pub use dispatcher::{Dispatcher, Verb};
pub use error::{Error, Result};
pub use selection_flow::{select_interactive, FlowOutcome, SelectionFlow, Stage};
pub use settings::{Settings, SettingsBuilder, DEFAULT_CONFIG_PATH, DEFAULT_TOOLCHAIN};
pub use toolchain::{filter_ports, parse_board_list, ArduinoCli, SelectableItem, Toolchain};
pub use utils::{FilterList, Input, ListItem};
