mod entry;
use self::entry::{FormOutcome, NameForm};
use crate::app::Screen;
use crate::command::Command;
use crate::consts;
use crate::engine::{Cell, Direction, EndReason, Engine, Mode, Phase, Smooth, Tick};
use crate::menu::MainMenu;
use crate::standings::Standings;
use crate::util::{center_rect, get_display_area, Globals};
use crate::warning::{error_chain, Warning, WarningOutcome};
use crossterm::event::{poll, read, Event};
use rand::Rng;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Margin, Position, Rect, Size},
    style::Style,
    symbols::Marker,
    text::{Line, Span, Text},
    widgets::{
        canvas::{Canvas, Points},
        Block, Widget,
    },
    Frame,
};
use std::num::NonZeroUsize;
use std::time::Instant;

/// Room for the largest board plus its border
const BOARD_COLUMN_WIDTH: u16 = 44;

/// The game screen.  Drives the engine's ticks from the terminal event loop,
/// draws the session, and takes care of the leaderboard once it is over.
#[derive(Clone, Debug)]
pub(crate) struct Game<R = rand::rngs::ThreadRng> {
    engine: Engine<R>,
    smooth: Smooth,
    globals: Globals,
    /// When the engine is next due to tick.  `None` whenever the session is
    /// not running.
    next_tick: Option<Instant>,
    last_tick: Option<Instant>,
    /// How far the display has come from the previous tick toward the
    /// current one, from 0 to 1
    alpha: f64,
    after: Option<AfterGame>,
    warning: Option<Warning>,
}

impl Game<rand::rngs::ThreadRng> {
    pub(crate) fn new(globals: Globals) -> Self {
        Game::new_with_rng(globals, rand::rng())
    }
}

impl<R: Rng> Game<R> {
    pub(crate) fn new_with_rng(globals: Globals, rng: R) -> Game<R> {
        let mode = globals.config.mode(globals.options);
        Game {
            engine: Engine::new(mode, rng),
            smooth: Smooth::default(),
            globals,
            next_tick: None,
            last_tick: None,
            alpha: 1.0,
            after: None,
            warning: None,
        }
    }

    pub(crate) fn process_input(&mut self) -> std::io::Result<Option<Screen>> {
        let Some(wake) = self.wake_time(Instant::now()) else {
            return Ok(self.handle_event(read()?));
        };
        let wait = wake.saturating_duration_since(Instant::now());
        if wait.is_zero() || !poll(wait)? {
            self.on_timer(Instant::now());
            Ok(None)
        } else {
            Ok(self.handle_event(read()?))
        }
    }

    /// Called when the deadline returned by `wake_time()` has passed
    fn on_timer(&mut self, now: Instant) {
        let Some(next_tick) = self.next_tick else {
            return;
        };
        if now >= next_tick {
            self.advance(now);
        } else if let Some(last) = self.last_tick {
            let period = next_tick.saturating_duration_since(last).as_secs_f64();
            let elapsed = now.saturating_duration_since(last).as_secs_f64();
            self.alpha = if period > 0.0 {
                (elapsed / period).min(1.0)
            } else {
                1.0
            };
        }
    }

    fn advance(&mut self, now: Instant) {
        self.smooth.record(&self.engine);
        match self.engine.tick() {
            Tick::Moved => self.schedule(now),
            Tick::Ate { score } => {
                log::debug!("Ate; score is now {score}");
                self.schedule(now);
            }
            Tick::GameOver { score, reason } => {
                log::debug!("Game over after {reason}");
                self.game_over(score);
            }
            Tick::Idle | Tick::Ended => self.stop(),
        }
    }

    fn handle_event(&mut self, event: Event) -> Option<Screen> {
        if let Some(ref warning) = self.warning {
            match warning.handle_command(Command::from_key_event(event.as_key_press_event()?)?)? {
                WarningOutcome::Dismissed => self.warning = None,
                WarningOutcome::Quit => return Some(Screen::Quit),
            }
            return None;
        }
        match self.after {
            Some(AfterGame::EnterName(ref mut form)) => {
                match form.handle_event(event)? {
                    FormOutcome::Submit(name) => self.submit(&name),
                    FormOutcome::Skip => {
                        self.after = Some(AfterGame::Summary {
                            rank: None,
                            unsaved: false,
                        });
                    }
                    FormOutcome::Quit => return Some(Screen::Quit),
                }
                return None;
            }
            Some(AfterGame::Summary { .. }) => {
                match Command::from_key_event(event.as_key_press_event()?)? {
                    Command::R | Command::Enter => self.start(),
                    Command::M | Command::Esc => return Some(self.main_menu()),
                    Command::Q | Command::Quit => return Some(Screen::Quit),
                    _ => (),
                }
                return None;
            }
            None => (),
        }
        match (
            self.engine.phase(),
            Command::from_key_event(event.as_key_press_event()?)?,
        ) {
            (_, Command::Quit) => return Some(Screen::Quit),
            (Phase::Idle, Command::Space | Command::Enter) => self.start(),
            (Phase::Idle, Command::Esc | Command::M) => return Some(self.main_menu()),
            (Phase::Idle, Command::Q) => return Some(Screen::Quit),
            (Phase::Running, Command::Esc) => return Some(self.main_menu()),
            (Phase::Running, cmd) => {
                if let Some(d) = cmd.vector().and_then(|(dx, dy)| Direction::from_vector(dx, dy)) {
                    self.engine.set_pending_direction(d);
                }
            }
            _ => (),
        }
        None
    }

    /// Start a new session on the same settings
    fn start(&mut self) {
        self.after = None;
        self.warning = None;
        self.engine.initialize();
        self.smooth.record(&self.engine);
        if self.engine.phase() == Phase::Running {
            self.schedule(Instant::now());
        } else {
            self.game_over(self.engine.score());
        }
    }
}

impl<R> Game<R> {
    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }

    /// Return when the event loop should stop waiting for input, or `None` if
    /// it should wait indefinitely
    fn wake_time(&self, now: Instant) -> Option<Instant> {
        let next_tick = self.next_tick?;
        match self.engine.mode() {
            Mode::Classic(_) => Some(next_tick),
            Mode::Endless(_) => Some(next_tick.min(now + consts::FRAME_PERIOD)),
        }
    }

    fn schedule(&mut self, now: Instant) {
        self.alpha = 0.0;
        self.last_tick = Some(now);
        self.next_tick = Some(now + self.engine.tick_interval());
    }

    fn stop(&mut self) {
        self.next_tick = None;
        self.last_tick = None;
        self.alpha = 1.0;
    }

    fn game_over(&mut self, score: u32) {
        self.stop();
        let mode = self.globals.options.mode;
        let rank = (score > 0)
            .then(|| self.globals.leaderboard.would_rank(score, mode))
            .flatten();
        self.after = Some(match rank {
            Some(rank) => AfterGame::EnterName(NameForm::new(rank)),
            None => AfterGame::Summary {
                rank: None,
                unsaved: false,
            },
        });
    }

    fn submit(&mut self, name: &str) {
        let mode = self.globals.options.mode;
        let score = self.engine.score();
        let after = match self.globals.leaderboard.submit(name, score, mode) {
            Ok(rank) => AfterGame::Summary {
                rank,
                unsaved: false,
            },
            Err(e) => {
                log::warn!("{}", error_chain(&e).join(": "));
                self.warning = Some(Warning::new(&e));
                AfterGame::Summary {
                    rank: None,
                    unsaved: true,
                }
            }
        };
        self.after = Some(after);
    }

    fn main_menu(&self) -> Screen {
        Screen::Main(MainMenu::new(self.globals.clone()))
    }

    fn score_bar(&self) -> Line<'static> {
        let best = self
            .globals
            .leaderboard
            .best(self.globals.options.mode)
            .map_or_else(|| String::from("-"), |b| b.to_string());
        Line::styled(
            format!(
                " Score: {}    Best: {}    Mode: {}",
                self.engine.score(),
                best,
                self.globals.options.mode
            ),
            consts::SCORE_BAR_STYLE,
        )
    }

    fn messages(&self) -> Text<'static> {
        let mut text = Text::default();
        match self.engine.phase() {
            Phase::Idle => {
                text.push_line(key_line("Start", "Space"));
                text.push_line(key_line("Main Menu", "Esc"));
            }
            Phase::Running => {
                text.push_line(Line::from_iter([
                    Span::raw(" Steer: "),
                    Span::styled("←", consts::KEY_STYLE),
                    Span::raw(" "),
                    Span::styled("↓", consts::KEY_STYLE),
                    Span::raw(" "),
                    Span::styled("↑", consts::KEY_STYLE),
                    Span::raw(" "),
                    Span::styled("→", consts::KEY_STYLE),
                ]));
                if matches!(self.engine.mode(), Mode::Endless(_)) {
                    text.push_line(" Don't fall behind!");
                }
                text.push_line(key_line("Main Menu", "Esc"));
            }
            Phase::Ended(reason) => {
                text.push_line(" — GAME OVER —");
                text.push_line(format!(" {}", reason.message()));
                text.push_line("");
                if let Some(AfterGame::Summary { rank, unsaved }) = self.after {
                    if let Some(rank) = rank {
                        text.push_line(format!(" You placed #{rank}!"));
                    } else if unsaved {
                        text.push_line(Line::styled(" Score not saved.", consts::NOTICE_STYLE));
                    } else {
                        text.push_line("");
                    }
                    text.push_line("");
                    text.push_line(key_line("Restart", "r"));
                    text.push_line(key_line("Main Menu", "m"));
                    text.push_line(key_line("Quit", "q"));
                }
            }
        }
        text
    }

    fn board_size(&self) -> Size {
        let (width, height) = match self.engine.mode() {
            Mode::Classic(rules) => (rules.grid_size, rules.grid_size),
            Mode::Endless(rules) => (rules.width, rules.view_height),
        };
        Size {
            width: width.saturating_mul(consts::CELL_WIDTH).saturating_add(2),
            height: height.saturating_add(2),
        }
    }

    fn render_classic(&self, area: Rect, buf: &mut Buffer) {
        Block::bordered().render(area, buf);
        let mut grid = Grid {
            area: area.inner(Margin::new(1, 1)),
            buf,
        };
        for cell in self.engine.snake().skip(1) {
            grid.draw_cell(cell, consts::SNAKE_BODY_SYMBOL, consts::SNAKE_STYLE);
        }
        grid.draw_cell(self.engine.food(), consts::FOOD_SYMBOL, consts::FOOD_STYLE);
        // Draw the head last so that, if it's a collision, we overwrite
        // whatever it's colliding with
        if self.collided() {
            grid.draw_cell(
                self.engine.head(),
                consts::COLLISION_SYMBOL,
                consts::COLLISION_STYLE,
            );
        } else {
            grid.draw_cell(
                self.engine.head(),
                head_symbol(self.engine.direction()),
                consts::SNAKE_STYLE,
            );
        }
    }

    fn render_endless(&self, area: Rect, buf: &mut Buffer) {
        let Mode::Endless(rules) = self.engine.mode() else {
            return;
        };
        let camera = self.smooth.camera(&self.engine, self.alpha);
        let snake = self
            .smooth
            .segments(&self.engine, self.alpha)
            .flat_map(cell_pixels)
            .collect::<Vec<_>>();
        let food = cell_pixels((
            f64::from(self.engine.food().x),
            f64::from(self.engine.food().y),
        ));
        let head = self.engine.head();
        let collided = self.collided();
        Canvas::default()
            .block(Block::bordered())
            .marker(Marker::HalfBlock)
            .x_bounds([0.0, f64::from(rules.width)])
            .y_bounds([-(camera + f64::from(rules.view_height)), -camera])
            .paint(|ctx| {
                ctx.draw(&Points {
                    coords: &food,
                    color: consts::FOOD_COLOR,
                });
                ctx.draw(&Points {
                    coords: &snake,
                    color: consts::SNAKE_COLOR,
                });
                if collided {
                    ctx.print(
                        f64::from(head.x),
                        -f64::from(head.y),
                        Span::styled(
                            consts::COLLISION_SYMBOL.to_string(),
                            consts::COLLISION_STYLE,
                        ),
                    );
                }
            })
            .render(area, buf);
    }

    fn collided(&self) -> bool {
        matches!(
            self.engine.phase(),
            Phase::Ended(EndReason::Wall | EndReason::SelfCollision)
        )
    }
}

impl<R> Widget for &Game<R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = get_display_area(area);
        let [score_area, body_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(display);
        self.score_bar().render(score_area, buf);

        let [board_column, side_column] = Layout::horizontal([
            Constraint::Length(BOARD_COLUMN_WIDTH),
            Constraint::Fill(1),
        ])
        .spacing(1)
        .areas(body_area);
        let board_area = center_rect(board_column, self.board_size());
        match self.engine.mode() {
            Mode::Classic(_) => self.render_classic(board_area, buf),
            Mode::Endless(_) => self.render_endless(board_area, buf),
        }

        let [standings_area, msg_area] =
            Layout::vertical([Constraint::Length(Standings::HEIGHT), Constraint::Fill(1)])
                .spacing(1)
                .areas(side_column);
        let [standings_area] = Layout::horizontal([Standings::WIDTH])
            .flex(Flex::Center)
            .areas(standings_area);
        let highlight = match self.after {
            Some(AfterGame::Summary { rank, .. }) => rank,
            _ => None,
        };
        Standings::new(&self.globals.leaderboard, self.globals.options.mode)
            .highlight(highlight)
            .render(standings_area, buf);
        self.messages().render(msg_area, buf);

        if let Some(AfterGame::EnterName(ref form)) = self.after {
            let form_area = center_rect(
                display,
                Size {
                    width: NameForm::WIDTH,
                    height: NameForm::HEIGHT,
                },
            );
            form.render(form_area, buf);
        }
        if let Some(ref warning) = self.warning {
            warning.render(display, buf);
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum AfterGame {
    /// The score made the leaderboard; ask for a name to file it under
    EnterName(NameForm),
    Summary {
        /// Where the score placed on the leaderboard, if it was entered
        rank: Option<NonZeroUsize>,
        /// Whether saving the score failed
        unsaved: bool,
    },
}

/// Draws grid cells into a buffer, two terminal columns per cell
#[derive(Debug, Eq, PartialEq)]
struct Grid<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl Grid<'_> {
    fn draw_cell(&mut self, cell: Cell, symbol: char, style: Style) {
        let (Ok(x), Ok(y)) = (u16::try_from(cell.x), u16::try_from(cell.y)) else {
            return;
        };
        let Some(x) = x
            .checked_mul(consts::CELL_WIDTH)
            .and_then(|x| x.checked_add(self.area.x))
        else {
            return;
        };
        let Some(y) = self.area.y.checked_add(y) else {
            return;
        };
        if !self.area.contains(Position::new(x, y)) {
            return;
        }
        if let Some(c) = self.buf.cell_mut((x, y)) {
            c.set_char(symbol);
            c.set_style(Style::reset().patch(style));
        }
    }
}

fn head_symbol(direction: Direction) -> char {
    match direction {
        Direction::North => consts::SNAKE_HEAD_NORTH_SYMBOL,
        Direction::East => consts::SNAKE_HEAD_EAST_SYMBOL,
        Direction::South => consts::SNAKE_HEAD_SOUTH_SYMBOL,
        Direction::West => consts::SNAKE_HEAD_WEST_SYMBOL,
    }
}

/// The four half-block pixels covering a cell at `(x, y)`, in canvas
/// coordinates (which grow upwards)
fn cell_pixels((x, y): (f64, f64)) -> [(f64, f64); 4] {
    [
        (x + 0.25, -(y + 0.25)),
        (x + 0.75, -(y + 0.25)),
        (x + 0.25, -(y + 0.75)),
        (x + 0.75, -(y + 0.75)),
    ]
}

fn key_line(action: &'static str, key: &'static str) -> Line<'static> {
    Line::from_iter([
        Span::raw(format!(" {action} (")),
        Span::styled(key, consts::KEY_STYLE),
        Span::raw(")"),
    ])
}
