//! Adapter over the external toolchain (`arduino-cli`) and the serial device
//! directory.
//!
//! The toolchain only speaks free-text tables. All knowledge of that layout is
//! kept in [`parse_board_list`] and [`filter_ports`] so that the rest of `abt`
//! works with [`SelectableItem`]s and plain port paths.

use std::{
    ffi::OsStr,
    fs,
    path::Path,
    process::{Command, Stdio},
};

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, trace, warn};

use crate::{
    error::{Error, Result},
    settings::Settings,
    utils::ListItem,
};

// =============================================================================
// Public Interface
// =============================================================================

/// One row offered for selection by the interactive flow.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SelectableItem {
    /// A board from `board listall`: human label and its qualifier.
    Board { name: String, qualifier: String },
    /// A serial device node, as a full path.
    Port { path: String },
}
impl ListItem for SelectableItem {
    fn title(&self) -> &str {
        match self {
            SelectableItem::Board { name, .. } => name,
            SelectableItem::Port { path } => path,
        }
    }

    fn description(&self) -> &str {
        match self {
            SelectableItem::Board { qualifier, .. } => qualifier,
            SelectableItem::Port { .. } => "",
        }
    }

    fn filter_value(&self) -> String {
        match self {
            SelectableItem::Board { name, qualifier } => format!("{}{}", name, qualifier),
            SelectableItem::Port { path } => path.clone(),
        }
    }
}

/// The operations `abt` needs from the toolchain and the operating system.
pub trait Toolchain {
    /// All boards known to the toolchain, in the order it lists them.
    fn list_boards(&mut self) -> Result<Vec<SelectableItem>>;
    /// Serial device paths a board may be attached to.
    fn list_ports(&mut self) -> Result<Vec<String>>;
    fn compile(&mut self, board: &str) -> Result<()>;
    fn upload(&mut self, board: &str, port: &str) -> Result<()>;
}

/// The [`Toolchain`] backed by an `arduino-cli` compatible executable.
#[derive(Debug, Clone)]
pub struct ArduinoCli {
    settings: Settings,
}
impl ArduinoCli {
    pub fn new(settings: Settings) -> Self {
        ArduinoCli { settings }
    }

    fn command<I, S>(&self, args: I) -> (Command, String)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(&self.settings.toolchain);
        let mut line = self.settings.toolchain.clone();
        for arg in args {
            line.push(' ');
            line.push_str(&arg.as_ref().to_string_lossy());
            cmd.arg(arg);
        }
        debug!("running `{}`", line);
        (cmd, line)
    }

    /// Runs a toolchain action with the terminal attached, so that its own
    /// progress and diagnostics are visible.
    fn run_attached(&self, args: &[&str]) -> Result<()> {
        let (mut cmd, line) = self.command(args);
        let status = cmd
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| Error::ToolchainSpawn {
                command: line.clone(),
                source,
            })?;
        if status.success() {
            info!("`{}` completed", line);
            Ok(())
        } else {
            Err(Error::ToolchainFailed {
                command: line,
                status,
            })
        }
    }
}
impl Toolchain for ArduinoCli {
    fn list_boards(&mut self) -> Result<Vec<SelectableItem>> {
        let pb = ProgressBar::new_spinner();
        pb.enable_steady_tick(120);
        pb.set_style(
            ProgressStyle::default_spinner()
                .tick_strings(&["⠋", "⠙", "⠚", "⠞", "⠖", "⠦", "⠴", "⠲", "⠳", "⠓", "✔"])
                .template("[ABT] {spinner:.blue} {msg}"),
        );
        pb.set_message("Fetching the list of boards...");

        let (mut cmd, line) = self.command(&["board", "listall"]);
        let output = cmd.output();
        pb.finish_and_clear();

        let output = output.map_err(|source| Error::ToolchainSpawn {
            command: line.clone(),
            source,
        })?;
        // Whatever the toolchain printed is parsed, even on a failing exit.
        if !output.status.success() {
            warn!("`{}` failed ({})", line, output.status);
        }

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        let boards = parse_board_list(&text);
        info!("found {} boards", boards.len());
        Ok(boards)
    }

    fn list_ports(&mut self) -> Result<Vec<String>> {
        let dir = &self.settings.device_dir;
        let mut names = fs::read_dir(dir)
            .map_err(|source| Error::PortScan {
                dir: dir.clone(),
                source,
            })?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        // `read_dir` order is unspecified; present the nodes the way `ls` does.
        names.sort();

        let ports = filter_ports(names, dir, &self.settings.port_prefixes);
        debug!("found {} serial ports", ports.len());
        Ok(ports)
    }

    fn compile(&mut self, board: &str) -> Result<()> {
        self.run_attached(&["compile", "-b", board])
    }

    fn upload(&mut self, board: &str, port: &str) -> Result<()> {
        self.run_attached(&["upload", "-b", board, "-p", port])
    }
}

/// Parses the `board listall` table.
///
/// The first line is the column header. Every other line holding at least two
/// whitespace separated tokens is a board: the last token is its qualifier
/// and the tokens before it, joined with single spaces, its name.
pub fn parse_board_list(output: &str) -> Vec<SelectableItem> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| {
            let mut tokens = line.split_whitespace().collect::<Vec<_>>();
            if tokens.len() < 2 {
                trace!("skipping line {:?}", line);
                return None;
            }
            let qualifier = tokens.pop()?.to_string();
            Some(SelectableItem::Board {
                name: tokens.join(" "),
                qualifier,
            })
        })
        .collect()
}

/// Keeps the device names starting with one of `prefixes` and turns them into
/// full paths under `dir`, preserving their order.
pub fn filter_ports<I, S>(names: I, dir: &Path, prefixes: &[String]) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .filter(|name| {
            prefixes
                .iter()
                .any(|prefix| name.as_ref().starts_with(prefix.as_str()))
        })
        .map(|name| dir.join(name.as_ref()).to_string_lossy().into_owned())
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SettingsBuilder;

    fn board(name: &str, qualifier: &str) -> SelectableItem {
        SelectableItem::Board {
            name: name.into(),
            qualifier: qualifier.into(),
        }
    }

    #[test]
    fn parses_listall_table() {
        let output = "Board Name                       FQBN\n\
                      Arduino Uno                      arduino:avr:uno\n\
                      Arduino Nano Every               arduino:megaavr:nona4809\n";
        assert_eq!(
            parse_board_list(output),
            vec![
                board("Arduino Uno", "arduino:avr:uno"),
                board("Arduino Nano Every", "arduino:megaavr:nona4809"),
            ]
        );
    }

    #[test]
    fn two_line_output_yields_one_board() {
        let output = "Board Name FQBN\nLilyPad   Arduino  USB   arduino:avr:LilyPadUSB";
        assert_eq!(
            parse_board_list(output),
            vec![board("LilyPad Arduino USB", "arduino:avr:LilyPadUSB")]
        );
    }

    #[test]
    fn skips_header_and_short_lines() {
        let output = "Board Name FQBN\n\n   \nlonely\nYún arduino:avr:yun\n";
        assert_eq!(parse_board_list(output), vec![board("Yún", "arduino:avr:yun")]);
    }

    #[test]
    fn empty_output_yields_no_boards() {
        assert!(parse_board_list("").is_empty());
        assert!(parse_board_list("Board Name FQBN\n").is_empty());
    }

    #[test]
    fn filters_serial_devices_in_order() {
        let prefixes = vec!["ttyUSB".to_string(), "ttyACM".to_string()];
        let names = vec!["tty0", "ttyUSB1", "null", "ttyACM0", "ttyS0", "ttyUSB0"];
        assert_eq!(
            filter_ports(names, Path::new("/dev"), &prefixes),
            vec!["/dev/ttyUSB1", "/dev/ttyACM0", "/dev/ttyUSB0"]
        );
    }

    #[test]
    fn no_matching_devices() {
        let prefixes = vec!["ttyUSB".to_string()];
        assert!(filter_ports(vec!["sda", "tty1"], Path::new("/dev"), &prefixes).is_empty());
    }

    #[test]
    fn lists_ports_from_device_dir() {
        let dir = tempfile::tempdir().unwrap();
        for name in &["ttyACM0", "ttyUSB0", "random", "ttyS3"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        let settings = SettingsBuilder::new().device_dir(dir.path()).finalize();
        let ports = ArduinoCli::new(settings).list_ports().unwrap();
        assert_eq!(
            ports,
            vec![
                dir.path().join("ttyACM0").to_string_lossy().into_owned(),
                dir.path().join("ttyUSB0").to_string_lossy().into_owned(),
            ]
        );
    }

    #[test]
    fn missing_device_dir_is_an_error() {
        let settings = SettingsBuilder::new()
            .device_dir("/this/does/not/exist")
            .finalize();
        match ArduinoCli::new(settings).list_ports() {
            Err(Error::PortScan { .. }) => {}
            other => panic!("unexpected result {:?}", other),
        }
    }

    /// Writes an executable `sh` script standing in for `arduino-cli`.
    #[cfg(unix)]
    fn scripted_toolchain(dir: &Path, body: &str) -> ArduinoCli {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("arduino-cli");
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        let settings = SettingsBuilder::new()
            .toolchain(path.to_string_lossy().into_owned())
            .finalize();
        ArduinoCli::new(settings)
    }

    #[cfg(unix)]
    #[test]
    fn lists_boards_from_toolchain() {
        let dir = tempfile::tempdir().unwrap();
        let mut toolchain = scripted_toolchain(
            dir.path(),
            "[ \"$1 $2\" = \"board listall\" ] || exit 2\n\
             echo 'Board Name        FQBN'\n\
             echo 'Arduino Uno       arduino:avr:uno'\n\
             echo 'Arduino Mega 2560 arduino:avr:mega'",
        );
        assert_eq!(
            toolchain.list_boards().unwrap(),
            vec![
                board("Arduino Uno", "arduino:avr:uno"),
                board("Arduino Mega 2560", "arduino:avr:mega"),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn boards_are_parsed_from_stdout_then_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let mut toolchain = scripted_toolchain(
            dir.path(),
            "printf 'Board Name FQBN\\nArduino Uno arduino:avr:uno'\n\
             echo 'Arduino Nano arduino:avr:nano' >&2",
        );
        assert_eq!(
            toolchain.list_boards().unwrap(),
            vec![
                board("Arduino Uno", "arduino:avr:uno"),
                board("Arduino Nano", "arduino:avr:nano"),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn failing_board_listing_still_parses_its_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut toolchain = scripted_toolchain(
            dir.path(),
            "echo 'Board Name FQBN'\n\
             echo 'Arduino Uno arduino:avr:uno'\n\
             exit 1",
        );
        assert_eq!(
            toolchain.list_boards().unwrap(),
            vec![board("Arduino Uno", "arduino:avr:uno")]
        );
    }

    #[test]
    fn missing_toolchain_is_a_spawn_error() {
        let settings = SettingsBuilder::new()
            .toolchain("abt-no-such-toolchain")
            .finalize();
        match ArduinoCli::new(settings).compile("arduino:avr:uno") {
            Err(Error::ToolchainSpawn { command, .. }) => {
                assert_eq!(command, "abt-no-such-toolchain compile -b arduino:avr:uno")
            }
            other => panic!("unexpected result {:?}", other),
        }
    }
}
