use super::direction::{Cell, Direction};
use crate::consts;
use std::ops::Range;
use std::time::Duration;

/// Which set of rules a session is played under, along with that rule set's
/// tuning parameters
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Mode {
    /// A square walled grid.  The snake speeds up as it eats.
    Classic(ClassicRules),

    /// A field with walls on the left and right that scrolls upwards on its
    /// own; the snake dies if it falls too far below the top of the view.
    Endless(EndlessRules),
}

impl Mode {
    /// Where the snake's head starts and which way it faces
    pub(super) fn start(&self) -> (Cell, Direction) {
        match self {
            Mode::Classic(rules) => {
                let mid = i32::from(rules.grid_size / 2);
                (Cell::new(mid, mid), Direction::East)
            }
            Mode::Endless(rules) => (
                Cell::new(
                    i32::from(rules.width / 2),
                    i32::from(rules.view_height / 2),
                ),
                Direction::North,
            ),
        }
    }

    /// The tick period at the start of a session
    pub(super) fn initial_tick(&self) -> Duration {
        match self {
            Mode::Classic(rules) => rules.speed.initial,
            Mode::Endless(rules) => rules.tick,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct ClassicRules {
    /// Width & height of the grid
    pub(crate) grid_size: u16,
    pub(crate) speed: SpeedRamp,
}

impl ClassicRules {
    pub(super) fn contains(&self, cell: Cell) -> bool {
        let size = i32::from(self.grid_size);
        (0..size).contains(&cell.x) && (0..size).contains(&cell.y)
    }

    pub(super) fn spawn_area(&self) -> SpawnArea {
        let size = i32::from(self.grid_size);
        SpawnArea {
            xs: 0..size,
            ys: 0..size,
        }
    }
}

impl Default for ClassicRules {
    fn default() -> ClassicRules {
        ClassicRules {
            grid_size: 20,
            speed: SpeedRamp::default(),
        }
    }
}

/// How the classic mode's tick period shrinks as food is eaten
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct SpeedRamp {
    pub(crate) initial: Duration,
    pub(crate) decrement: Duration,
    pub(crate) minimum: Duration,
}

impl SpeedRamp {
    /// The tick period to use after eating a piece of food when the period
    /// was `current`.  Never longer than `current`, never shorter than
    /// `minimum` unless `current` already was.
    pub(super) fn faster(&self, current: Duration) -> Duration {
        current
            .saturating_sub(self.decrement)
            .max(self.minimum)
            .min(current)
    }
}

impl Default for SpeedRamp {
    fn default() -> SpeedRamp {
        SpeedRamp {
            initial: consts::CLASSIC_TICK,
            decrement: consts::CLASSIC_TICK_DECREMENT,
            minimum: consts::CLASSIC_MIN_TICK,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct EndlessRules {
    /// Number of columns between the side walls
    pub(crate) width: u16,

    /// Number of rows visible at once
    pub(crate) view_height: u16,

    /// Time between movements
    pub(crate) tick: Duration,

    /// Rows the camera moves north by on every tick
    pub(crate) scroll_per_tick: f64,

    /// The snake dies once its head is more than this many rows south of the
    /// camera's leading edge
    pub(crate) fall_limit: u16,

    /// Food is placed within this many rows north of the leading edge
    pub(crate) spawn_ahead: u16,
}

impl EndlessRules {
    pub(crate) fn new(width: u16, view_height: u16) -> EndlessRules {
        EndlessRules {
            width,
            view_height,
            tick: consts::ENDLESS_TICK,
            scroll_per_tick: consts::ENDLESS_SCROLL_PER_TICK,
            fall_limit: view_height.saturating_add(1),
            spawn_ahead: consts::ENDLESS_SPAWN_AHEAD,
        }
    }

    /// The smallest usable `fall_limit`: the starting row plus one tick of
    /// scrolling, so that the snake is not already behind on its first move
    pub(crate) fn min_fall_limit(&self) -> u16 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let scroll = self.scroll_per_tick.ceil().clamp(0.0, f64::from(u16::MAX)) as u16;
        (self.view_height / 2).saturating_add(scroll)
    }

    pub(super) fn within_walls(&self, cell: Cell) -> bool {
        (0..i32::from(self.width)).contains(&cell.x)
    }

    pub(super) fn fell_behind(&self, cell: Cell, camera: f64) -> bool {
        f64::from(cell.y) - camera > f64::from(self.fall_limit)
    }

    /// The rows just north of the leading edge, which are not visible yet
    pub(super) fn spawn_area(&self, camera: f64) -> SpawnArea {
        let lead = leading_row(camera);
        SpawnArea {
            xs: 0..i32::from(self.width),
            ys: lead.saturating_sub(i32::from(self.spawn_ahead))..lead,
        }
    }
}

impl Default for EndlessRules {
    fn default() -> EndlessRules {
        EndlessRules::new(20, 20)
    }
}

/// The topmost row that is at least partially visible when the camera is at
/// `camera`
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn leading_row(camera: f64) -> i32 {
    // `as` saturates on overflow, which is fine for a screen row.
    camera.floor() as i32
}

/// The rectangle of cells food may be placed in
#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) struct SpawnArea {
    pub(super) xs: Range<i32>,
    pub(super) ys: Range<i32>,
}

impl SpawnArea {
    pub(super) fn is_empty(&self) -> bool {
        self.xs.is_empty() || self.ys.is_empty()
    }

    #[cfg(test)]
    pub(super) fn contains(&self, cell: Cell) -> bool {
        self.xs.contains(&cell.x) && self.ys.contains(&cell.y)
    }

    pub(super) fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.ys
            .clone()
            .flat_map(move |y| self.xs.clone().map(move |x| Cell::new(x, y)))
    }
}
