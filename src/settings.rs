//! Settings controlling how `abt` talks to the toolchain and where it keeps
//! its state.
//!
//! Use the [builder](https://doc.rust-lang.org/1.0.0/style/ownership/builders.html)
//! pattern to set the configurable values.

use std::path::PathBuf;

// =============================================================================
// Public Interface
// =============================================================================

/// Name of the toolchain binary used when none is specified.
pub const DEFAULT_TOOLCHAIN: &str = "arduino-cli";

/// Relative path of the file holding the persisted board/port selection.
pub const DEFAULT_CONFIG_PATH: &str = ".abt.json";

/// Groups all settings used by `abt` and its collaborators.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Settings {
    /// The toolchain executable, looked up in `PATH` unless it is a path.
    pub toolchain: String,
    /// Where the board/port configuration is loaded from and saved to.
    pub config_path: PathBuf,
    /// The device-node directory scanned for serial ports.
    pub device_dir: PathBuf,
    /// Only device nodes whose name starts with one of these are offered as
    /// serial ports.
    pub port_prefixes: Vec<String>,

    /// Restrict creation of `Settings` instances unless through the
    /// `SettingsBuilder`.
    #[doc(hidden)]
    _private_use_builder: (),
}

/// The builder for the `Settings` values.
///
/// All values are optional and have default values that will be used if not
/// explicitly set.
///
/// **Example**
///
/// ```
/// let settings = abt::SettingsBuilder::new()
///     .toolchain("/opt/arduino/arduino-cli")
///     .finalize();
/// assert_eq!(settings.config_path.to_str(), Some(".abt.json"));
/// ```
pub struct SettingsBuilder {
    settings: Settings,
}
impl SettingsBuilder {
    /// Start building the settings using default values.
    pub fn new() -> Self {
        SettingsBuilder {
            settings: Settings {
                toolchain: DEFAULT_TOOLCHAIN.into(),
                config_path: DEFAULT_CONFIG_PATH.into(),
                device_dir: "/dev".into(),
                port_prefixes: vec!["ttyUSB".into(), "ttyACM".into()],
                _private_use_builder: (),
            },
        }
    }

    /// Set the toolchain executable
    pub fn toolchain<'a>(mut self, toolchain: impl Into<std::borrow::Cow<'a, str>>) -> Self {
        self.settings.toolchain = toolchain.into().into_owned();
        self
    }

    /// Set the path of the configuration file
    pub fn config_path(mut self, config_path: impl Into<PathBuf>) -> Self {
        self.settings.config_path = config_path.into();
        self
    }

    /// Set the directory scanned for serial device nodes
    pub fn device_dir(mut self, device_dir: impl Into<PathBuf>) -> Self {
        self.settings.device_dir = device_dir.into();
        self
    }

    /// Replace the device name prefixes identifying serial ports
    pub fn port_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.settings.port_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn finalize(self) -> Settings {
        self.settings
    }
}
impl Default for SettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[test]
fn all_default() {
    let settings = SettingsBuilder::new().finalize();
    assert_eq!(
        settings,
        Settings {
            toolchain: "arduino-cli".into(),
            config_path: ".abt.json".into(),
            device_dir: "/dev".into(),
            port_prefixes: vec!["ttyUSB".into(), "ttyACM".into()],
            _private_use_builder: (),
        }
    )
}

#[test]
fn toolchain() {
    let settings = SettingsBuilder::new()
        .toolchain("/usr/local/bin/arduino-cli")
        .finalize();
    assert_eq!(settings.toolchain, "/usr/local/bin/arduino-cli");
}

#[test]
fn config_path() {
    let settings = SettingsBuilder::new().config_path("sketch/.abt.json").finalize();
    assert_eq!(settings.config_path, PathBuf::from("sketch/.abt.json"));
}

#[test]
fn device_dir() {
    let settings = SettingsBuilder::new().device_dir("/tmp/dev").finalize();
    assert_eq!(settings.device_dir, PathBuf::from("/tmp/dev"));
}

#[test]
fn port_prefixes() {
    let settings = SettingsBuilder::new()
        .port_prefixes(vec!["cu.usbserial"])
        .finalize();
    assert_eq!(settings.port_prefixes, vec!["cu.usbserial".to_string()]);
}
