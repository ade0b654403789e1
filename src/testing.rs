//! In-memory stand-ins for the toolchain and the configuration store.

use std::io;

use crate::{
    config::{ConfigStore, Configuration},
    error::{Error, Result},
    toolchain::{SelectableItem, Toolchain},
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    ListBoards,
    ListPorts,
    Compile(String),
    Upload(String, String),
}

/// Records every call and answers with canned boards and ports.
#[derive(Debug, Default)]
pub(crate) struct FakeToolchain {
    boards: Vec<SelectableItem>,
    ports: Vec<String>,
    failing: bool,
    failing_commands: Vec<&'static str>,
    pub calls: Vec<Call>,
}
impl FakeToolchain {
    pub fn new(boards: Vec<(&str, &str)>, ports: Vec<&str>) -> Self {
        FakeToolchain {
            boards: boards
                .into_iter()
                .map(|(name, qualifier)| SelectableItem::Board {
                    name: name.into(),
                    qualifier: qualifier.into(),
                })
                .collect(),
            ports: ports.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Every operation fails as if the toolchain was not installed.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Only `command` (`compile`, `upload`, ...) fails.
    pub fn failing_at(mut self, command: &'static str) -> Self {
        self.failing_commands.push(command);
        self
    }

    fn outcome(&self, command: &str) -> Result<()> {
        if self.failing || self.failing_commands.iter().any(|c| *c == command) {
            Err(Error::ToolchainSpawn {
                command: command.into(),
                source: io::Error::new(io::ErrorKind::NotFound, "not installed"),
            })
        } else {
            Ok(())
        }
    }
}
impl Toolchain for FakeToolchain {
    fn list_boards(&mut self) -> Result<Vec<SelectableItem>> {
        self.calls.push(Call::ListBoards);
        self.outcome("board listall")?;
        Ok(self.boards.clone())
    }

    fn list_ports(&mut self) -> Result<Vec<String>> {
        self.calls.push(Call::ListPorts);
        self.outcome("ls")?;
        Ok(self.ports.clone())
    }

    fn compile(&mut self, board: &str) -> Result<()> {
        self.calls.push(Call::Compile(board.into()));
        self.outcome("compile")
    }

    fn upload(&mut self, board: &str, port: &str) -> Result<()> {
        self.calls.push(Call::Upload(board.into(), port.into()));
        self.outcome("upload")
    }
}

/// Keeps every saved configuration, in order.
#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    pub loaded: Option<Configuration>,
    pub saved: Vec<Configuration>,
    pub(crate) failing: bool,
}
impl MemoryStore {
    pub fn failing() -> Self {
        MemoryStore {
            failing: true,
            ..Default::default()
        }
    }
}
impl ConfigStore for MemoryStore {
    fn load(&self) -> Result<Configuration> {
        self.loaded.clone().ok_or_else(|| Error::ConfigIo {
            path: ".abt.json".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "no configuration"),
        })
    }

    fn save(&mut self, config: &Configuration) -> Result<()> {
        if self.failing {
            return Err(Error::ConfigIo {
                path: ".abt.json".into(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
            });
        }
        self.saved.push(config.clone());
        Ok(())
    }
}
