//! Terminal helpers: the filterable list widget and the raw-mode driver.

mod filter_list;
mod terminal;

pub use filter_list::{FilterList, ListItem};
pub use terminal::Input;
pub(crate) use terminal::{draw, read_input, terminal_size, TerminalGuard};
