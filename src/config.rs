use crate::consts;
use crate::engine::{ClassicRules, EndlessRules, Mode, SpeedRamp};
use crate::options::{GameMode, Options};
use crate::util::data_file_path;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Program configuration read from a configuration file
#[derive(Clone, Deserialize, Debug, Default, PartialEq)]
pub(crate) struct Config {
    /// Options initially selected in the main menu
    #[serde(default)]
    pub(crate) options: Options,

    /// Tuning for classic mode
    #[serde(default)]
    pub(crate) classic: ClassicConfig,

    /// Tuning for endless mode
    #[serde(default)]
    pub(crate) endless: EndlessConfig,

    /// Settings about data files
    #[serde(default)]
    pub(crate) files: FileConfig,
}

impl Config {
    /// Return the default configuration file path
    pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join("snakeboard").join("config.toml"))
            .ok_or(ConfigError::NoPath)
    }

    /// Read configuration from a file on disk.  If the file does not exist and
    /// `allow_missing` is true, a default `Config` value is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file could not be read or if the file's contents
    /// could not be deserialized.
    pub(crate) fn load(path: &Path, allow_missing: bool) -> Result<Config, ConfigError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
                return Ok(Config::default())
            }
            Err(e) => return Err(ConfigError::Read(e)),
        };
        toml::from_str(&content).map_err(Into::into)
    }

    /// Build the engine rules for a game played with the given options
    pub(crate) fn mode(&self, options: Options) -> Mode {
        let cells = options.level_size.cells();
        match options.mode {
            GameMode::Classic => Mode::Classic(ClassicRules {
                grid_size: cells,
                speed: self.classic.speed,
            }),
            GameMode::Endless => {
                let mut rules = EndlessRules::new(cells, cells);
                rules.tick = self.endless.tick;
                rules.scroll_per_tick = self.endless.scroll_per_tick;
                if let Some(limit) = self.endless.fall_limit {
                    rules.fall_limit = limit;
                }
                let floor = rules.min_fall_limit();
                if rules.fall_limit < floor {
                    log::warn!(
                        "fall-limit {} is too small for a {cells}-row view; using {floor}",
                        rules.fall_limit
                    );
                    rules.fall_limit = floor;
                }
                rules.spawn_ahead = self.endless.spawn_ahead;
                Mode::Endless(rules)
            }
        }
    }
}

#[derive(Clone, Copy, Deserialize, Debug, Default, Eq, PartialEq)]
#[serde(try_from = "RawClassicConfig")]
pub(crate) struct ClassicConfig {
    speed: SpeedRamp,
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
struct RawClassicConfig {
    tick_ms: u64,
    tick_decrement_ms: u64,
    min_tick_ms: u64,
}

impl Default for RawClassicConfig {
    fn default() -> RawClassicConfig {
        RawClassicConfig {
            tick_ms: millis(consts::CLASSIC_TICK),
            tick_decrement_ms: millis(consts::CLASSIC_TICK_DECREMENT),
            min_tick_ms: millis(consts::CLASSIC_MIN_TICK),
        }
    }
}

impl TryFrom<RawClassicConfig> for ClassicConfig {
    type Error = SettingError;

    fn try_from(value: RawClassicConfig) -> Result<ClassicConfig, SettingError> {
        if value.min_tick_ms == 0 {
            return Err(SettingError::ZeroTick("min-tick-ms"));
        }
        if value.tick_ms < value.min_tick_ms {
            return Err(SettingError::TickBelowMinimum);
        }
        Ok(ClassicConfig {
            speed: SpeedRamp {
                initial: Duration::from_millis(value.tick_ms),
                decrement: Duration::from_millis(value.tick_decrement_ms),
                minimum: Duration::from_millis(value.min_tick_ms),
            },
        })
    }
}

#[derive(Clone, Copy, Deserialize, Debug, PartialEq)]
#[serde(try_from = "RawEndlessConfig")]
pub(crate) struct EndlessConfig {
    tick: Duration,
    scroll_per_tick: f64,
    /// `None` means one row more than the height of the view
    fall_limit: Option<u16>,
    spawn_ahead: u16,
}

impl Default for EndlessConfig {
    fn default() -> EndlessConfig {
        EndlessConfig {
            tick: consts::ENDLESS_TICK,
            scroll_per_tick: consts::ENDLESS_SCROLL_PER_TICK,
            fall_limit: None,
            spawn_ahead: consts::ENDLESS_SPAWN_AHEAD,
        }
    }
}

#[derive(Clone, Deserialize, Debug, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
struct RawEndlessConfig {
    tick_ms: u64,
    scroll_per_tick: f64,
    fall_limit: Option<u16>,
    spawn_ahead: u16,
}

impl Default for RawEndlessConfig {
    fn default() -> RawEndlessConfig {
        let defaults = EndlessConfig::default();
        RawEndlessConfig {
            tick_ms: millis(defaults.tick),
            scroll_per_tick: defaults.scroll_per_tick,
            fall_limit: defaults.fall_limit,
            spawn_ahead: defaults.spawn_ahead,
        }
    }
}

impl TryFrom<RawEndlessConfig> for EndlessConfig {
    type Error = SettingError;

    fn try_from(value: RawEndlessConfig) -> Result<EndlessConfig, SettingError> {
        if value.tick_ms == 0 {
            return Err(SettingError::ZeroTick("tick-ms"));
        }
        if !(value.scroll_per_tick.is_finite() && value.scroll_per_tick > 0.0) {
            return Err(SettingError::Scroll);
        }
        if value.spawn_ahead == 0 {
            return Err(SettingError::SpawnAhead);
        }
        Ok(EndlessConfig {
            tick: Duration::from_millis(value.tick_ms),
            scroll_per_tick: value.scroll_per_tick,
            fall_limit: value.fall_limit,
            spawn_ahead: value.spawn_ahead,
        })
    }
}

#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct FileConfig {
    /// Path at which the leaderboard is stored
    leaderboard_file: Option<PathBuf>,

    /// Path to which log messages are appended
    log_file: Option<PathBuf>,
}

impl FileConfig {
    /// Return the configured leaderboard path or, if that is not set, the
    /// default.  Returns `None` if the default could not be determined.
    pub(crate) fn leaderboard_file(&self) -> Option<PathBuf> {
        self.leaderboard_file
            .clone()
            .or_else(|| data_file_path("leaderboard.json"))
    }

    /// Return the configured log file path or, if that is not set, the
    /// default.  Returns `None` if the default could not be determined.
    pub(crate) fn log_file(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| data_file_path("snakeboard.log"))
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub(crate) enum SettingError {
    #[error("{0} must be greater than zero")]
    ZeroTick(&'static str),
    #[error("tick-ms must not be less than min-tick-ms")]
    TickBelowMinimum,
    #[error("scroll-per-tick must be a positive number")]
    Scroll,
    #[error("spawn-ahead must be greater than zero")]
    SpawnAhead,
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to determine path to local configuration directory")]
    NoPath,
    #[error("failed to read configuration file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
}
