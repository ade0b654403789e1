//! Interactive board and port selection.
//!
//! **Example** - Running the selection with the terminal attached:
//! ```no_run
//! use abt::{ArduinoCli, ConfigStore, JsonFileStore, SettingsBuilder};
//!
//! let settings = SettingsBuilder::new().finalize();
//! let mut store = JsonFileStore::new(&settings.config_path);
//! let mut toolchain = ArduinoCli::new(settings);
//! let config = store.load().unwrap_or_default();
//! let outcome = abt::select_interactive(config, &mut toolchain, &mut store);
//! println!("{:?}", outcome);
//! ```

mod events;
mod state_machine;
mod states;

pub use state_machine::{select_interactive, FlowOutcome, SelectionFlow, Stage};
