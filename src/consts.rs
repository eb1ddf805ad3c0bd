//! Assorted constants & hard-coded configuration
use ratatui::{
    layout::Size,
    style::{Color, Modifier, Style},
};
use std::time::Duration;

/// Draw everything inside a rectangle of this size in the center of the
/// terminal window.
///
/// Cf. [`crate::util::get_display_area()`]
pub(crate) const DISPLAY_SIZE: Size = Size {
    width: 80,
    height: 24,
};

/// Number of cells in the snake when a session starts
pub(crate) const INITIAL_SNAKE_LENGTH: usize = 3;

/// Points awarded for each piece of food eaten
pub(crate) const FOOD_REWARD: u32 = 10;

/// Number of random draws to try when placing food before falling back to an
/// exhaustive search of the free cells
pub(crate) const SPAWN_ATTEMPTS: usize = 64;

/// Classic mode: time between movements at the start of a session
pub(crate) const CLASSIC_TICK: Duration = Duration::from_millis(150);

/// Classic mode: how much faster the snake gets with each piece of food
pub(crate) const CLASSIC_TICK_DECREMENT: Duration = Duration::from_millis(2);

/// Classic mode: the tick period never drops below this
pub(crate) const CLASSIC_MIN_TICK: Duration = Duration::from_millis(80);

/// Endless mode: time between movements
pub(crate) const ENDLESS_TICK: Duration = Duration::from_millis(120);

/// Endless mode: rows the camera scrolls up per tick
pub(crate) const ENDLESS_SCROLL_PER_TICK: f64 = 0.25;

/// Endless mode: how many rows above the leading edge food may appear in
pub(crate) const ENDLESS_SPAWN_AHEAD: u16 = 10;

/// Endless mode: redraw this often between ticks so that movement is
/// interpolated
pub(crate) const FRAME_PERIOD: Duration = Duration::from_millis(33);

/// The maximum number of leaderboard entries kept per game mode
pub(crate) const LEADERBOARD_SIZE: usize = 10;

/// The maximum length of a leaderboard name, in grapheme clusters
pub(crate) const MAX_NAME_LENGTH: usize = 20;

/// Number of terminal columns used to draw one grid cell
pub(crate) const CELL_WIDTH: u16 = 2;

/// Glyph for the snake's head when it is moving north/up
pub(crate) const SNAKE_HEAD_NORTH_SYMBOL: char = 'v';

/// Glyph for the snake's head when it is moving south/down
pub(crate) const SNAKE_HEAD_SOUTH_SYMBOL: char = '^';

/// Glyph for the snake's head when it is moving east/right
pub(crate) const SNAKE_HEAD_EAST_SYMBOL: char = '<';

/// Glyph for the snake's head when it is moving west/left
pub(crate) const SNAKE_HEAD_WEST_SYMBOL: char = '>';

/// Glyph for the parts of the snake's body
pub(crate) const SNAKE_BODY_SYMBOL: char = '⚬';

/// Glyph for the food
pub(crate) const FOOD_SYMBOL: char = '●';

/// Glyph for the snake's head when it's collided with a wall or itself
pub(crate) const COLLISION_SYMBOL: char = '×';

/// Color used when painting the snake on the endless-mode canvas
pub(crate) const SNAKE_COLOR: Color = Color::Green;

/// Color used when painting food on the endless-mode canvas
pub(crate) const FOOD_COLOR: Color = Color::LightRed;

/// Style for the snake's head and body
pub(crate) const SNAKE_STYLE: Style = Style::new().fg(SNAKE_COLOR).add_modifier(Modifier::BOLD);

/// Style for the food
pub(crate) const FOOD_STYLE: Style = Style::new().fg(FOOD_COLOR);

/// Style for [`COLLISION_SYMBOL`]
pub(crate) const COLLISION_STYLE: Style = Style::new()
    .fg(Color::LightRed)
    .add_modifier(Modifier::REVERSED);

/// Style for key codes shown in the interface
pub(crate) const KEY_STYLE: Style = Style::new().fg(Color::Yellow);

/// Styles for the first, second and third places on the leaderboard
pub(crate) const PODIUM_STYLES: [Style; 3] = [
    Style::new().fg(Color::LightYellow).add_modifier(Modifier::BOLD),
    Style::new().fg(Color::Gray).add_modifier(Modifier::BOLD),
    Style::new().fg(Color::Rgb(205, 127, 50)).add_modifier(Modifier::BOLD),
];

/// Style for the score bar at the top of the game screen
pub(crate) const SCORE_BAR_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

/// Style for the currently-selected menu item
pub(crate) const MENU_SELECTION_STYLE: Style = Style::new().add_modifier(Modifier::UNDERLINED);

/// Style for warnings about files that could not be read or written
pub(crate) const NOTICE_STYLE: Style = Style::new().fg(Color::LightRed);
