//! The game simulation: snake movement, collisions, food placement and the
//! session lifecycle.  Nothing in here performs I/O; rendering, input and
//! score persistence are all done by whoever holds the [`Engine`].
mod direction;
mod rules;
mod smooth;
mod snake;
pub(crate) use self::direction::{Cell, Direction};
pub(crate) use self::rules::{ClassicRules, EndlessRules, Mode, SpeedRamp};
pub(crate) use self::smooth::Smooth;
use self::snake::Snake;
use crate::consts;
use rand::{seq::IteratorRandom, Rng};
use std::fmt;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Engine<R = rand::rngs::ThreadRng> {
    rng: R,
    mode: Mode,
    session: Session,
}

/// Everything that changes over the course of a game
#[derive(Clone, Debug, PartialEq)]
struct Session {
    snake: Snake,
    food: Cell,
    /// The direction committed on the most recent tick
    direction: Direction,
    /// The direction that will be committed on the next tick
    pending: Direction,
    score: u32,
    phase: Phase,
    tick_interval: Duration,
    /// Endless mode: the row coordinate of the top of the view.  Always zero
    /// in classic mode.
    camera: f64,
}

impl<R: Rng> Engine<R> {
    /// Create an engine in the idle phase.  The starting layout is already in
    /// place so that it can be drawn, but [`Engine::tick()`] does nothing
    /// until [`Engine::initialize()`] is called.
    pub(crate) fn new(mode: Mode, rng: R) -> Engine<R> {
        let (head, direction) = mode.start();
        let mut engine = Engine {
            rng,
            mode,
            session: Session {
                snake: Snake::new(head, direction, consts::INITIAL_SNAKE_LENGTH),
                food: head,
                direction,
                pending: direction,
                score: 0,
                phase: Phase::Idle,
                tick_interval: mode.initial_tick(),
                camera: 0.0,
            },
        };
        engine.reset();
        engine.session.phase = Phase::Idle;
        engine
    }

    /// Start a new session, discarding any previous one
    pub(crate) fn initialize(&mut self) {
        self.reset();
        log::info!(
            "Starting session; snake at {}, food at {}",
            self.session.snake.head(),
            self.session.food
        );
    }

    fn reset(&mut self) {
        let (head, direction) = self.mode.start();
        let session = &mut self.session;
        session.snake = Snake::new(head, direction, consts::INITIAL_SNAKE_LENGTH);
        session.direction = direction;
        session.pending = direction;
        session.score = 0;
        session.phase = Phase::Running;
        session.tick_interval = self.mode.initial_tick();
        session.camera = 0.0;
        match self.spawn_food() {
            Some(food) => self.session.food = food,
            None => self.session.phase = Phase::Ended(EndReason::Exhausted),
        }
    }

    /// Advance the session by one step
    pub(crate) fn tick(&mut self) -> Tick {
        match self.session.phase {
            Phase::Idle => return Tick::Idle,
            Phase::Ended(_) => return Tick::Ended,
            Phase::Running => (),
        }
        self.session.direction = self.session.pending;
        if let Mode::Endless(rules) = self.mode {
            self.session.camera -= rules.scroll_per_tick;
        }
        let head = self.session.snake.head().step(self.session.direction);
        if let Some(reason) = self.collision(head) {
            return self.end(reason);
        }
        self.session.snake.push_head(head);
        if head != self.session.food {
            self.session.snake.pop_tail();
            if let Mode::Endless(rules) = self.mode {
                if rules.fell_behind(self.session.food, self.session.camera) {
                    self.replace_food();
                }
            }
            return Tick::Moved;
        }
        self.session.score += consts::FOOD_REWARD;
        if let Mode::Classic(rules) = self.mode {
            let faster = rules.speed.faster(self.session.tick_interval);
            if faster != self.session.tick_interval {
                log::debug!("Tick period now {faster:?}");
                self.session.tick_interval = faster;
            }
        }
        match self.spawn_food() {
            Some(food) => {
                log::debug!("Placed food at {food}");
                self.session.food = food;
                Tick::Ate {
                    score: self.session.score,
                }
            }
            None => self.end(EndReason::Exhausted),
        }
    }

    /// Move uneaten food that has scrolled out of reach to somewhere ahead
    fn replace_food(&mut self) {
        if let Some(food) = self.spawn_food() {
            log::debug!("Food at {} left behind; moved to {food}", self.session.food);
            self.session.food = food;
        }
    }

    /// Pick a free cell for the next piece of food.  Returns `None` if there
    /// is no free cell left in the spawn area.
    fn spawn_food(&mut self) -> Option<Cell> {
        let area = match self.mode {
            Mode::Classic(rules) => rules.spawn_area(),
            Mode::Endless(rules) => rules.spawn_area(self.session.camera),
        };
        if area.is_empty() {
            return None;
        }
        let snake = &self.session.snake;
        for _ in 0..consts::SPAWN_ATTEMPTS {
            let cell = Cell::new(
                self.rng.random_range(area.xs.clone()),
                self.rng.random_range(area.ys.clone()),
            );
            if !snake.occupies(cell) {
                return Some(cell);
            }
        }
        area.cells()
            .filter(|&c| !snake.occupies(c))
            .choose(&mut self.rng)
    }
}

impl<R> Engine<R> {
    /// Request a change of direction, to take effect on the next tick.
    /// Requests to reverse into the snake's own neck are ignored, as are
    /// requests made while the session is not running.
    pub(crate) fn set_pending_direction(&mut self, direction: Direction) {
        if self.session.phase == Phase::Running && direction != self.session.direction.reverse()
        {
            self.session.pending = direction;
        }
    }

    fn collision(&self, head: Cell) -> Option<EndReason> {
        match self.mode {
            Mode::Classic(rules) if !rules.contains(head) => return Some(EndReason::Wall),
            Mode::Endless(rules) if !rules.within_walls(head) => return Some(EndReason::Wall),
            Mode::Endless(rules) if rules.fell_behind(head, self.session.camera) => {
                return Some(EndReason::FellBehind)
            }
            _ => (),
        }
        self.session
            .snake
            .occupies(head)
            .then_some(EndReason::SelfCollision)
    }

    fn end(&mut self, reason: EndReason) -> Tick {
        self.session.phase = Phase::Ended(reason);
        log::info!(
            "Session over ({reason}) with score {}",
            self.session.score
        );
        Tick::GameOver {
            score: self.session.score,
            reason,
        }
    }

    pub(crate) fn mode(&self) -> Mode {
        self.mode
    }

    pub(crate) fn phase(&self) -> Phase {
        self.session.phase
    }

    pub(crate) fn score(&self) -> u32 {
        self.session.score
    }

    pub(crate) fn food(&self) -> Cell {
        self.session.food
    }

    /// The cells of the snake, head first
    pub(crate) fn snake(&self) -> impl ExactSizeIterator<Item = Cell> + '_ {
        self.session.snake.cells()
    }

    pub(crate) fn head(&self) -> Cell {
        self.session.snake.head()
    }

    /// The direction the snake moved in on the last tick
    pub(crate) fn direction(&self) -> Direction {
        self.session.direction
    }

    /// How long the driver should wait between ticks
    pub(crate) fn tick_interval(&self) -> Duration {
        self.session.tick_interval
    }

    /// Endless mode: the row coordinate of the top edge of the view
    pub(crate) fn camera(&self) -> f64 {
        self.session.camera
    }

    #[cfg(test)]
    pub(crate) fn set_food(&mut self, food: Cell) {
        self.session.food = food;
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Phase {
    /// No session has been started yet
    Idle,
    Running,
    Ended(EndReason),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum EndReason {
    /// The snake ran into a wall
    Wall,
    /// The camera left the snake behind
    FellBehind,
    /// The snake ran into itself
    SelfCollision,
    /// The snake has filled the board and there is nowhere left to place food
    Exhausted,
}

impl EndReason {
    pub(crate) fn message(self) -> &'static str {
        match self {
            EndReason::Wall => "You hit a wall.",
            EndReason::FellBehind => "You fell behind.",
            EndReason::SelfCollision => "You bit yourself.",
            EndReason::Exhausted => "There's no room left!",
        }
    }
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EndReason::Wall => "wall",
            EndReason::FellBehind => "fell behind",
            EndReason::SelfCollision => "self-collision",
            EndReason::Exhausted => "board full",
        };
        f.pad(name)
    }
}

/// What happened on a call to [`Engine::tick()`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Tick {
    /// No session has been started; nothing happened
    Idle,
    /// The session had already ended; nothing happened
    Ended,
    /// The snake moved without eating
    Moved,
    /// The snake ate and grew
    Ate { score: u32 },
    /// The session ended on this tick
    GameOver { score: u32, reason: EndReason },
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::rules::leading_row;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    fn classic() -> Engine<ChaCha12Rng> {
        let mut engine = Engine::new(
            Mode::Classic(ClassicRules::default()),
            ChaCha12Rng::seed_from_u64(RNG_SEED),
        );
        engine.initialize();
        engine
    }

    fn endless() -> Engine<ChaCha12Rng> {
        let mut engine = Engine::new(
            Mode::Endless(EndlessRules::default()),
            ChaCha12Rng::seed_from_u64(RNG_SEED),
        );
        engine.initialize();
        engine
    }

    fn cells<R>(engine: &Engine<R>) -> Vec<Cell> {
        engine.snake().collect()
    }

    /// Put the engine into a given running state
    fn arrange<R>(engine: &mut Engine<R>, snake: &[(i32, i32)], direction: Direction) {
        engine.session.snake = Snake::from_cells(snake.iter().map(|&(x, y)| Cell::new(x, y)));
        engine.session.direction = direction;
        engine.session.pending = direction;
        engine.session.phase = Phase::Running;
        engine.session.food = OUT_OF_REACH;
    }

    /// Food that the snake can never get to, for tests that don't want the
    /// snake to eat by accident
    const OUT_OF_REACH: Cell = Cell::new(-100, -100);

    #[test]
    fn initialize_layout() {
        let engine = classic();
        assert_eq!(engine.phase(), Phase::Running);
        assert_eq!(
            cells(&engine),
            [Cell::new(10, 10), Cell::new(9, 10), Cell::new(8, 10)]
        );
        assert_eq!(engine.direction(), Direction::East);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.tick_interval(), consts::CLASSIC_TICK);
        assert!(!cells(&engine).contains(&engine.food()));
        assert!(ClassicRules::default().contains(engine.food()));
    }

    #[test]
    fn idle_until_initialized() {
        let mut engine = Engine::new(
            Mode::Classic(ClassicRules::default()),
            ChaCha12Rng::seed_from_u64(RNG_SEED),
        );
        assert_eq!(engine.phase(), Phase::Idle);
        let before = cells(&engine);
        engine.set_pending_direction(Direction::South);
        assert_eq!(engine.tick(), Tick::Idle);
        assert_eq!(cells(&engine), before);
        engine.initialize();
        engine.session.food = OUT_OF_REACH;
        assert_eq!(engine.tick(), Tick::Moved);
        assert_eq!(engine.head(), Cell::new(11, 10));
    }

    #[test]
    fn eat_food() {
        let mut engine = classic();
        arrange(&mut engine, &[(10, 10), (9, 10), (8, 10)], Direction::East);
        engine.session.food = Cell::new(11, 10);
        assert_eq!(engine.tick(), Tick::Ate { score: 10 });
        assert_eq!(
            cells(&engine),
            [
                Cell::new(11, 10),
                Cell::new(10, 10),
                Cell::new(9, 10),
                Cell::new(8, 10)
            ]
        );
        assert_eq!(engine.score(), 10);
        assert_eq!(engine.phase(), Phase::Running);
        assert!(!cells(&engine).contains(&engine.food()));
        assert_eq!(engine.tick_interval(), Duration::from_millis(148));
    }

    #[test]
    fn hit_left_wall() {
        let mut engine = classic();
        arrange(&mut engine, &[(0, 10), (1, 10), (2, 10)], Direction::West);
        engine.session.score = 30;
        let before = cells(&engine);
        assert_eq!(
            engine.tick(),
            Tick::GameOver {
                score: 30,
                reason: EndReason::Wall
            }
        );
        assert_eq!(engine.phase(), Phase::Ended(EndReason::Wall));
        assert_eq!(cells(&engine), before);
        assert_eq!(engine.score(), 30);
    }

    #[test]
    fn hit_bottom_wall() {
        let mut engine = classic();
        arrange(&mut engine, &[(4, 19), (4, 18), (4, 17)], Direction::South);
        assert!(matches!(
            engine.tick(),
            Tick::GameOver {
                reason: EndReason::Wall,
                ..
            }
        ));
    }

    #[test]
    fn reversal_ignored() {
        let mut engine = classic();
        arrange(&mut engine, &[(5, 5), (5, 6), (5, 7)], Direction::North);
        engine.set_pending_direction(Direction::South);
        assert_eq!(engine.tick(), Tick::Moved);
        assert_eq!(engine.direction(), Direction::North);
        assert_eq!(engine.head(), Cell::new(5, 4));
    }

    #[test]
    fn reversal_checked_against_committed_direction() {
        let mut engine = classic();
        arrange(&mut engine, &[(5, 5), (5, 6), (5, 7)], Direction::North);
        // East is accepted as pending, but South is still the reverse of the
        // committed direction and must not slip through.
        engine.set_pending_direction(Direction::East);
        engine.set_pending_direction(Direction::South);
        assert_eq!(engine.tick(), Tick::Moved);
        assert_eq!(engine.head(), Cell::new(6, 5));
        assert_eq!(engine.direction(), Direction::East);
    }

    #[test]
    fn latest_pending_direction_wins() {
        let mut engine = classic();
        arrange(&mut engine, &[(5, 5), (5, 6), (5, 7)], Direction::North);
        engine.set_pending_direction(Direction::East);
        engine.set_pending_direction(Direction::West);
        engine.tick();
        assert_eq!(engine.head(), Cell::new(4, 5));
    }

    #[test]
    fn bite_self() {
        let mut engine = classic();
        arrange(
            &mut engine,
            &[(5, 5), (6, 5), (6, 6), (5, 6), (4, 6)],
            Direction::West,
        );
        engine.set_pending_direction(Direction::South);
        assert_eq!(
            engine.tick(),
            Tick::GameOver {
                score: 0,
                reason: EndReason::SelfCollision
            }
        );
        assert_eq!(cells(&engine).len(), 5);
    }

    #[test]
    fn chasing_tail_is_a_collision() {
        // The tail has not moved out of the way yet when the head arrives.
        let mut engine = classic();
        arrange(
            &mut engine,
            &[(5, 5), (6, 5), (6, 6), (5, 6)],
            Direction::West,
        );
        engine.set_pending_direction(Direction::South);
        assert_eq!(
            engine.tick(),
            Tick::GameOver {
                score: 0,
                reason: EndReason::SelfCollision
            }
        );
    }

    #[test]
    fn ended_is_terminal() {
        let mut engine = classic();
        arrange(&mut engine, &[(0, 10), (1, 10), (2, 10)], Direction::West);
        assert!(matches!(engine.tick(), Tick::GameOver { .. }));
        let before = engine.clone();
        for _ in 0..5 {
            engine.set_pending_direction(Direction::North);
            assert_eq!(engine.tick(), Tick::Ended);
        }
        assert_eq!(engine, before);
        engine.initialize();
        assert_eq!(engine.phase(), Phase::Running);
        assert_eq!(engine.score(), 0);
        assert_eq!(cells(&engine).len(), consts::INITIAL_SNAKE_LENGTH);
    }

    #[test]
    fn board_full_ends_session() {
        let mut engine = Engine::new(
            Mode::Classic(ClassicRules {
                grid_size: 2,
                speed: SpeedRamp::default(),
            }),
            ChaCha12Rng::seed_from_u64(RNG_SEED),
        );
        arrange(&mut engine, &[(0, 0), (0, 1), (1, 1)], Direction::East);
        engine.session.food = Cell::new(1, 0);
        assert_eq!(
            engine.tick(),
            Tick::GameOver {
                score: 10,
                reason: EndReason::Exhausted
            }
        );
        assert_eq!(cells(&engine).len(), 4);
    }

    /// A generator that only ever produces zeros, so every random draw lands
    /// on the low end of its range
    #[derive(Clone, Debug, PartialEq)]
    struct Zeros;

    impl rand::RngCore for Zeros {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0);
        }
    }

    #[test]
    fn spawn_falls_back_to_last_free_cell() {
        let mut engine = Engine::new(
            Mode::Classic(ClassicRules {
                grid_size: 3,
                speed: SpeedRamp::default(),
            }),
            Zeros,
        );
        let mut snake = vec![(0, 0), (1, 0), (2, 0), (2, 1), (1, 1), (0, 1), (0, 2), (1, 2)];
        arrange(&mut engine, &snake, Direction::East);
        assert_eq!(engine.spawn_food(), Some(Cell::new(2, 2)));
        snake.push((2, 2));
        arrange(&mut engine, &snake, Direction::East);
        assert_eq!(engine.spawn_food(), None);
    }

    #[test]
    fn speed_never_increases() {
        let mut engine = classic();
        let mut previous = engine.tick_interval();
        for i in 0..60 {
            arrange(&mut engine, &[(10, 10), (9, 10), (8, 10)], Direction::East);
            engine.session.food = Cell::new(11, 10);
            assert!(matches!(engine.tick(), Tick::Ate { .. }), "tick {i}");
            let now = engine.tick_interval();
            assert!(now <= previous);
            assert!(now >= consts::CLASSIC_MIN_TICK);
            previous = now;
        }
        assert_eq!(previous, consts::CLASSIC_MIN_TICK);
    }

    /// Play a long series of sessions with random turns and check the
    /// invariants that must hold after every tick
    fn check_invariants(mut engine: Engine<ChaCha12Rng>) {
        let mut turns = ChaCha12Rng::seed_from_u64(RNG_SEED ^ 0xFFFF);
        let directions = [
            Direction::North,
            Direction::East,
            Direction::South,
            Direction::West,
        ];
        let mut sessions = 0;
        for _ in 0..5000 {
            if turns.random_ratio(1, 4) {
                let d = *directions.iter().choose(&mut turns).expect("nonempty");
                engine.set_pending_direction(d);
            }
            let before_len = engine.snake().len();
            let before_direction = engine.direction();
            let before_camera = engine.camera();
            match engine.tick() {
                Tick::Moved => assert_eq!(engine.snake().len(), before_len),
                Tick::Ate { score } => {
                    assert_eq!(engine.snake().len(), before_len + 1);
                    assert_eq!(score, engine.score());
                }
                Tick::GameOver { .. } => {
                    assert_eq!(engine.snake().len(), before_len);
                    assert_eq!(engine.tick(), Tick::Ended);
                    engine.initialize();
                    sessions += 1;
                    continue;
                }
                Tick::Idle | Tick::Ended => panic!("engine should be running"),
            }
            assert_ne!(engine.direction(), before_direction.reverse());
            if let Mode::Endless(rules) = engine.mode() {
                assert!(engine.camera() < before_camera);
                assert!(!rules.fell_behind(engine.head(), engine.camera()));
            }
            let body = cells(&engine);
            for (i, c) in body.iter().enumerate() {
                assert!(!body[i + 1..].contains(c), "duplicate cell {c}");
            }
            assert!(!body.contains(&engine.food()));
            assert_eq!(engine.score() % consts::FOOD_REWARD, 0);
        }
        assert!(sessions > 0);
    }

    #[test]
    fn classic_invariants() {
        check_invariants(classic());
    }

    #[test]
    fn endless_invariants() {
        check_invariants(endless());
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn endless_initialize_layout() {
        let engine = endless();
        assert_eq!(
            cells(&engine),
            [Cell::new(10, 10), Cell::new(10, 11), Cell::new(10, 12)]
        );
        assert_eq!(engine.direction(), Direction::North);
        assert_eq!(engine.camera(), 0.0);
        let food = engine.food();
        assert!((-10..0).contains(&food.y), "food at {food}");
        assert!((0..20).contains(&food.x), "food at {food}");
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn endless_camera_scrolls() {
        let mut engine = endless();
        engine.tick();
        engine.tick();
        assert_eq!(engine.camera(), -0.5);
        assert_eq!(engine.head(), Cell::new(10, 8));
    }

    #[test]
    fn endless_side_wall() {
        let mut engine = endless();
        arrange(&mut engine, &[(19, 5), (18, 5), (17, 5)], Direction::East);
        assert!(matches!(
            engine.tick(),
            Tick::GameOver {
                reason: EndReason::Wall,
                ..
            }
        ));
    }

    #[test]
    fn endless_no_ceiling() {
        let mut engine = endless();
        arrange(&mut engine, &[(3, -40), (3, -39), (3, -38)], Direction::North);
        assert_eq!(engine.tick(), Tick::Moved);
        assert_eq!(engine.head(), Cell::new(3, -41));
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn endless_fall_behind() {
        let mut engine = endless();
        arrange(&mut engine, &[(3, 20), (3, 19), (3, 18)], Direction::South);
        engine.session.camera = -0.75;
        // The camera moves before the check: head at 21, edge at -1.0
        assert_eq!(
            engine.tick(),
            Tick::GameOver {
                score: 0,
                reason: EndReason::FellBehind
            }
        );
        assert_eq!(engine.camera(), -1.0);
        assert_eq!(engine.head(), Cell::new(3, 20));
    }

    #[test]
    fn endless_food_spawns_ahead() {
        let mut engine = endless();
        for _ in 0..40 {
            arrange(&mut engine, &[(10, 10), (10, 11), (10, 12)], Direction::North);
            engine.session.food = Cell::new(10, 9);
            assert!(matches!(engine.tick(), Tick::Ate { .. }));
            let lead = leading_row(engine.camera());
            let food = engine.food();
            assert!(food.y < lead, "food at {food}, leading edge {lead}");
            assert!(food.y >= lead - 10, "food at {food}, leading edge {lead}");
        }
        assert_eq!(engine.tick_interval(), consts::ENDLESS_TICK);
    }

    #[test]
    fn endless_food_left_behind_moves_ahead() {
        let mut engine = endless();
        arrange(&mut engine, &[(10, 10), (10, 11), (10, 12)], Direction::North);
        engine.session.food = Cell::new(2, 21);
        assert_eq!(engine.tick(), Tick::Moved);
        let lead = leading_row(engine.camera());
        let food = engine.food();
        assert!((lead - 10..lead).contains(&food.y), "food at {food}");
    }
}
