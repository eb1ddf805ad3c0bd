use crate::config::Config;
use crate::consts;
use crate::leaderboard::Leaderboard;
use crate::options::Options;
use enum_map::Enum;
use ratatui::layout::{Flex, Layout, Rect, Size};
use std::path::PathBuf;

/// State shared by all of the screens of the application
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Globals {
    /// The gameplay options most recently selected in the main menu
    pub(crate) options: Options,
    pub(crate) config: Config,
    pub(crate) leaderboard: Leaderboard,
}

/// Return the path to a file in the local data directory for this program
pub(crate) fn data_file_path(filename: &str) -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join("snakeboard").join(filename))
}

pub(crate) fn get_display_area(buffer_area: Rect) -> Rect {
    let [display] = Layout::horizontal([consts::DISPLAY_SIZE.width])
        .flex(Flex::Center)
        .areas(buffer_area);
    let [display] = Layout::vertical([consts::DISPLAY_SIZE.height])
        .flex(Flex::Center)
        .areas(display);
    display
}

/// Return a `Rect` of the given size centered within `area`
pub(crate) fn center_rect(area: Rect, size: Size) -> Rect {
    let [area] = Layout::horizontal([size.width])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([size.height])
        .flex(Flex::Center)
        .areas(area);
    area
}

/// Navigation over the variants of a fieldless enum in declaration order
pub(crate) trait EnumExt: Enum {
    fn iter() -> impl Iterator<Item = Self> {
        (0..Self::LENGTH).map(Self::from_usize)
    }

    fn min() -> Self {
        Self::from_usize(0)
    }

    fn max() -> Self {
        Self::from_usize(Self::LENGTH - 1)
    }

    fn next(self) -> Option<Self> {
        let i = self.into_usize() + 1;
        (i < Self::LENGTH).then(|| Self::from_usize(i))
    }

    fn prev(self) -> Option<Self> {
        self.into_usize().checked_sub(1).map(Self::from_usize)
    }
}

impl<T: Enum> EnumExt for T {}
