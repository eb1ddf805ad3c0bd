use crate::util::EnumExt;
use enum_dispatch::enum_dispatch;
use enum_map::Enum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Gameplay options, as chosen in the main menu
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct Options {
    pub(crate) mode: GameMode,
    pub(crate) level_size: LevelSize,
}

impl Options {
    pub(crate) fn get(&self, key: OptKey) -> OptValue {
        match key {
            OptKey::Mode => self.mode.into(),
            OptKey::LevelSize => self.level_size.into(),
        }
    }

    pub(crate) fn set(&mut self, key: OptKey, value: OptValue) {
        match key {
            OptKey::Mode => {
                self.mode = value
                    .try_into()
                    .expect("Options::set(Mode, value) called with non-GameMode value");
            }
            OptKey::LevelSize => {
                self.level_size = value
                    .try_into()
                    .expect("Options::set(LevelSize, value) called with non-LevelSize value");
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
pub(crate) enum OptKey {
    Mode,
    LevelSize,
}

impl OptKey {
    pub(crate) const DISPLAY_WIDTH: u16 = 10;

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            OptKey::Mode => "Mode",
            OptKey::LevelSize => "Level Size",
        }
    }
}

impl fmt::Display for OptKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[enum_dispatch]
pub(crate) trait Adjustable {
    fn increase(&mut self);
    fn decrease(&mut self);
    fn can_increase(&self) -> bool;
    fn can_decrease(&self) -> bool;
}

#[enum_dispatch(Adjustable)] // This also gives us From and TryInto
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum OptValue {
    GameMode,
    LevelSize,
}

impl OptValue {
    pub(crate) const DISPLAY_WIDTH: u16 = 11;
}

// This is needed for EnumMap to be convenient to construct.
impl Default for OptValue {
    fn default() -> OptValue {
        OptValue::GameMode(GameMode::default())
    }
}

impl fmt::Display for OptValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (left, right) = (
            if self.can_decrease() { '◀' } else { '◁' },
            if self.can_increase() { '▶' } else { '▷' },
        );
        match self {
            OptValue::GameMode(mode) => write!(f, "{left} {mode:^7} {right}"),
            OptValue::LevelSize(sz) => write!(f, "{left} {sz:^7} {right}"),
        }
    }
}

/// Steps an option through the variants of its enum, stopping at either end
fn step<T: EnumExt + Copy>(value: &mut T, forwards: bool) {
    let stepped = if forwards { value.next() } else { value.prev() };
    if let Some(v) = stepped {
        *value = v;
    }
}

/// Which rule set to play under
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Enum, Eq, Hash, PartialEq, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub(crate) enum GameMode {
    /// Walled grid; the snake speeds up as it eats
    #[default]
    Classic,
    /// Scrolling field; keep up with the camera
    Endless,
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameMode::Classic => "Classic",
            GameMode::Endless => "Endless",
        };
        f.pad(name)
    }
}

impl Adjustable for GameMode {
    fn increase(&mut self) {
        step(self, true);
    }

    fn decrease(&mut self) {
        step(self, false);
    }

    fn can_increase(&self) -> bool {
        *self != Self::max()
    }

    fn can_decrease(&self) -> bool {
        *self != Self::min()
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Enum, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum LevelSize {
    Small,
    Medium,
    #[default]
    Large,
}

impl LevelSize {
    /// The number of cells along each side of the level.  In endless mode,
    /// this is the width of the field and the height of the view.
    pub(crate) fn cells(self) -> u16 {
        match self {
            LevelSize::Small => 12,
            LevelSize::Medium => 16,
            LevelSize::Large => 20,
        }
    }
}

impl fmt::Display for LevelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LevelSize::Small => "Small",
            LevelSize::Medium => "Medium",
            LevelSize::Large => "Large",
        };
        f.pad(name)
    }
}

impl Adjustable for LevelSize {
    fn increase(&mut self) {
        step(self, true);
    }

    fn decrease(&mut self) {
        step(self, false);
    }

    fn can_increase(&self) -> bool {
        *self != Self::max()
    }

    fn can_decrease(&self) -> bool {
        *self != Self::min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod opt_key {
        use super::*;

        #[test]
        fn display_width() {
            let actual_width = OptKey::iter()
                .map(|key| key.as_str().chars().count())
                .max()
                .unwrap();
            assert_eq!(actual_width, usize::from(OptKey::DISPLAY_WIDTH));
        }

        #[test]
        fn fmt_width() {
            assert_eq!(
                format!(
                    "{:width$}",
                    OptKey::Mode,
                    width = usize::from(OptKey::DISPLAY_WIDTH)
                ),
                "Mode      "
            );
        }
    }

    mod opt_value {
        use super::*;

        #[test]
        fn display_width() {
            for value in GameMode::iter()
                .map(OptValue::from)
                .chain(LevelSize::iter().map(OptValue::from))
            {
                assert_eq!(
                    value.to_string().chars().count(),
                    usize::from(OptValue::DISPLAY_WIDTH),
                    "{value:?}"
                );
            }
        }

        #[test]
        fn display() {
            assert_eq!(
                OptValue::from(GameMode::Classic).to_string(),
                "◁ Classic ▶"
            );
            assert_eq!(OptValue::from(LevelSize::Medium).to_string(), "◀ Medium  ▶");
            assert_eq!(OptValue::from(LevelSize::Large).to_string(), "◀  Large  ▷");
        }
    }

    #[test]
    fn adjust_within_bounds() {
        let mut opts = Options::default();
        let mut value = opts.get(OptKey::LevelSize);
        value.increase();
        assert_eq!(value, OptValue::LevelSize(LevelSize::Large));
        value.decrease();
        value.decrease();
        value.decrease();
        assert_eq!(value, OptValue::LevelSize(LevelSize::Small));
        opts.set(OptKey::LevelSize, value);
        assert_eq!(opts.level_size, LevelSize::Small);

        let mut mode = opts.get(OptKey::Mode);
        mode.increase();
        opts.set(OptKey::Mode, mode);
        assert_eq!(opts.mode, GameMode::Endless);
    }

    #[test]
    fn deserialize() {
        let opts: Options = toml::from_str("mode = \"endless\"\nlevel-size = \"small\"\n").unwrap();
        assert_eq!(
            opts,
            Options {
                mode: GameMode::Endless,
                level_size: LevelSize::Small,
            }
        );
        let opts: Options = toml::from_str("").unwrap();
        assert_eq!(opts, Options::default());
    }
}
