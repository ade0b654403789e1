//! Maps the command line verb to the action it triggers.

use std::str::FromStr;

use console::style;
use log::{info, warn};

use crate::{
    config::{ConfigStore, Configuration},
    error::{Error, Result},
    selection_flow::{select_interactive, FlowOutcome},
    toolchain::Toolchain,
};

// =============================================================================
// Public Interface
// =============================================================================

/// The actions `abt` can perform.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Verb {
    /// Choose the board and the port interactively and save them.
    Config,
    /// Compile, then upload.
    All,
    Compile,
    Upload,
}
impl Verb {
    /// Every accepted spelling, short forms first.
    pub const NAMES: &'static [&'static str] =
        &["c", "config", "a", "all", "comp", "compile", "u", "upload"];
}
impl FromStr for Verb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "c" | "config" => Ok(Verb::Config),
            "a" | "all" => Ok(Verb::All),
            "comp" | "compile" => Ok(Verb::Compile),
            "u" | "upload" => Ok(Verb::Upload),
            other => Err(Error::UnknownCommand(other.into())),
        }
    }
}

/// Runs verbs against a toolchain, using the configuration loaded at startup.
pub struct Dispatcher<T: Toolchain, C: ConfigStore> {
    config: Configuration,
    toolchain: T,
    store: C,
}
impl<T: Toolchain, C: ConfigStore> Dispatcher<T, C> {
    /// Loads the configuration from `store`. A missing or unreadable
    /// configuration is not an error: the dispatcher starts with an empty one.
    pub fn new(toolchain: T, store: C) -> Self {
        let config = store.load().unwrap_or_else(|e| {
            info!("using an empty configuration: {}", e);
            Configuration::default()
        });
        Dispatcher {
            config,
            toolchain,
            store,
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn run(&mut self, verb: Verb) -> Result<()> {
        info!("running {:?} with {:?}", verb, self.config);
        match verb {
            Verb::Config => self.configure(),
            Verb::All => {
                let compiled = self.compile();
                let uploaded = self.upload();
                match (compiled, uploaded) {
                    (Err(compile), Err(upload)) => {
                        warn!("{}", compile);
                        Err(upload)
                    }
                    (compiled, uploaded) => compiled.and(uploaded),
                }
            }
            Verb::Compile => self.compile(),
            Verb::Upload => self.upload(),
        }
    }

    fn configure(&mut self) -> Result<()> {
        let outcome =
            select_interactive(self.config.clone(), &mut self.toolchain, &mut self.store)?;
        match outcome {
            FlowOutcome::Saved(config) => {
                println!(
                    "[ABT] 👍 Using {} on {}",
                    style(&config.board).green(),
                    style(&config.port).cyan()
                );
                self.config = config;
            }
            FlowOutcome::Cancelled => {
                println!("[ABT] ❌ Selection canceled, configuration unchanged");
            }
        }
        Ok(())
    }

    fn compile(&mut self) -> Result<()> {
        if self.config.board.is_empty() {
            warn!("no board configured, run `abt config` first");
        }
        println!("[ABT] 🔨 Compiling for {}", style(&self.config.board).green());
        self.toolchain.compile(&self.config.board)
    }

    fn upload(&mut self) -> Result<()> {
        if self.config.port.is_empty() {
            warn!("no port configured, run `abt config` first");
        }
        println!(
            "[ABT] 📤 Uploading to {} on {}",
            style(&self.config.board).green(),
            style(&self.config.port).cyan()
        );
        self.toolchain.upload(&self.config.board, &self.config.port)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
