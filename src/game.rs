use crate::config::GameConfig;
use crate::entity::{Direction, Point};
use crate::input::Input;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Alive,
    Dead,
}

/// What a single call to [`Game::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The game was already over; nothing changed.
    Frozen,
    Moved,
    Ate,
    Died,
}

pub struct Game {
    pub config: GameConfig,
    /// Head first, tail last.
    pub snake: VecDeque<Point>,
    pub direction: Direction,
    pub pending_direction: Option<Direction>,
    /// Segments still owed to the snake from eaten food. Each move that
    /// consumes one keeps the tail instead of dropping it.
    pub pending_growth: usize,
    pub food: Point,
    pub state: GameState,
    rng: StdRng,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        let mut game = Self {
            config,
            snake: VecDeque::new(),
            direction: Direction::Right,
            pending_direction: None,
            pending_growth: 0,
            food: Point::new(0, 0),
            state: GameState::Alive,
            rng,
        };

        game.reset();
        game.place_food();

        game
    }

    /// Lays the snake out as a horizontal line on the middle row, heading right.
    pub fn reset(&mut self) {
        let size = self.config.snake_size as i32;
        let mid = self.config.map_size / 2;
        let tail_x = mid - 1 - size;

        self.snake = (0..size).rev().map(|i| Point::new(tail_x + i, mid)).collect();
        self.direction = Direction::Right;
        self.pending_direction = None;
        self.pending_growth = 0;
        self.state = GameState::Alive;
    }

    /// Drops the food on a random cell. The cell may be under the snake.
    pub fn place_food(&mut self) {
        let size = self.config.map_size;
        self.food = Point::new(self.rng.gen_range(0..size), self.rng.gen_range(0..size));
    }

    pub fn head(&self) -> Point {
        self.snake[0]
    }

    pub fn is_alive(&self) -> bool {
        self.state == GameState::Alive
    }

    pub fn score(&self) -> u32 {
        (self.snake.len() + self.pending_growth).saturating_sub(self.config.snake_size) as u32
    }

    pub fn handle_input(&mut self, input: Input) {
        match input {
            Input::Direction(direction) => self.steer(direction),
            Input::Restart => {
                if !self.is_alive() {
                    self.restart();
                }
            }
            Input::Quit => {}
        }
    }

    /// Buffers a direction change for the next tick. Reversals are checked
    /// against the committed direction so that several inputs between two
    /// ticks cannot chain into a U-turn.
    pub fn steer(&mut self, direction: Direction) {
        if direction == self.direction.opposite() {
            return;
        }
        self.pending_direction = Some(direction);
    }

    fn restart(&mut self) {
        info!("restarting after game over with score {}", self.score());
        self.reset();
        self.pending_direction = Some(Direction::Right);
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.state == GameState::Dead {
            return TickOutcome::Frozen;
        }

        if let Some(direction) = self.pending_direction.take() {
            self.direction = direction;
        }

        let next = self.head().moved(self.direction);

        if !self.config.in_bounds(next.x, next.y) || self.hits_body(next) {
            self.state = GameState::Dead;
            info!("game over at ({}, {}) with score {}", next.x, next.y, self.score());
            return TickOutcome::Died;
        }

        let ate = next == self.food;
        if ate {
            self.place_food();
            self.pending_growth += 1;
            debug!("food eaten, score {}, next food at {:?}", self.score(), self.food);
        }

        self.snake.push_front(next);
        if self.pending_growth > 0 {
            self.pending_growth -= 1;
        } else {
            self.snake.pop_back();
        }

        if ate {
            TickOutcome::Ate
        } else {
            TickOutcome::Moved
        }
    }

    /// The head itself is excluded; the tail is not, even though it is about
    /// to move out of the way.
    fn hits_body(&self, cell: Point) -> bool {
        self.snake.iter().skip(1).any(|&segment| segment == cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MAP_SIZE, SNAKE_SIZE};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn game() -> Game {
        Game::with_seed(GameConfig::default(), 7)
    }

    fn points(coords: &[(i32, i32)]) -> VecDeque<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    /// Puts the food somewhere the scripted moves of a test never reach.
    fn park_food(game: &mut Game) {
        game.food = Point::new(0, MAP_SIZE - 1);
    }

    fn kill(game: &mut Game) {
        park_food(game);
        game.steer(Direction::Up);
        while game.tick() != TickOutcome::Died {}
    }

    // Strategy for generating valid directions
    fn direction_strategy() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Up),
            Just(Direction::Down),
            Just(Direction::Left),
            Just(Direction::Right),
        ]
    }

    fn move_sequence_strategy() -> impl Strategy<Value = Vec<Option<Direction>>> {
        prop::collection::vec(prop::option::of(direction_strategy()), 1..200)
    }

    proptest! {
        /// Every live tick either advances the head by exactly one step in the
        /// committed direction or ends the game without touching the snake.
        #[test]
        fn prop_head_advances_by_direction(
            seed in any::<u64>(),
            moves in move_sequence_strategy()
        ) {
            let mut game = Game::with_seed(GameConfig::default(), seed);

            for input in moves {
                if let Some(direction) = input {
                    game.steer(direction);
                }

                let before = game.snake.clone();
                let score_before = game.score();
                let outcome = game.tick();

                match outcome {
                    TickOutcome::Moved => {
                        prop_assert_eq!(game.snake.len(), before.len());
                        prop_assert_eq!(game.head(), before[0].moved(game.direction));
                        prop_assert_eq!(game.score(), score_before);
                    }
                    TickOutcome::Ate => {
                        prop_assert_eq!(game.snake.len(), before.len() + 1);
                        prop_assert_eq!(game.head(), before[0].moved(game.direction));
                        prop_assert_eq!(game.score(), score_before + 1);
                    }
                    TickOutcome::Died | TickOutcome::Frozen => {
                        prop_assert_eq!(&game.snake, &before);
                        prop_assert!(!game.is_alive());
                        break;
                    }
                }
            }
        }

        /// A living snake never occupies a cell twice and never leaves the board.
        #[test]
        fn prop_live_snake_is_distinct_and_in_bounds(
            seed in any::<u64>(),
            moves in move_sequence_strategy()
        ) {
            let mut game = Game::with_seed(GameConfig::default(), seed);

            for input in moves {
                if let Some(direction) = input {
                    game.steer(direction);
                }
                game.tick();
                if !game.is_alive() {
                    break;
                }

                let unique: HashSet<Point> = game.snake.iter().copied().collect();
                prop_assert_eq!(unique.len(), game.snake.len());
                for segment in &game.snake {
                    prop_assert!(game.config.in_bounds(segment.x, segment.y));
                }
                prop_assert!(game.snake.len() >= SNAKE_SIZE);
                prop_assert_eq!(game.score() as usize, game.snake.len() - SNAKE_SIZE);
            }
        }

        /// No input sequence between two ticks can make the snake reverse.
        #[test]
        fn prop_never_reverses_in_one_tick(
            seed in any::<u64>(),
            bursts in prop::collection::vec(prop::collection::vec(direction_strategy(), 0..4), 1..100)
        ) {
            let mut game = Game::with_seed(GameConfig::default(), seed);

            for burst in bursts {
                let committed = game.direction;
                for direction in burst {
                    game.steer(direction);
                }
                game.tick();
                if !game.is_alive() {
                    break;
                }
                prop_assert_ne!(game.direction, committed.opposite());
            }
        }

        /// Once dead, ticks and direction inputs leave everything untouched.
        #[test]
        fn prop_dead_state_is_frozen(
            seed in any::<u64>(),
            moves in move_sequence_strategy()
        ) {
            let mut game = Game::with_seed(GameConfig::default(), seed);
            kill(&mut game);

            let snake = game.snake.clone();
            let food = game.food;
            let score = game.score();

            for input in moves {
                if let Some(direction) = input {
                    game.handle_input(Input::Direction(direction));
                }
                prop_assert_eq!(game.tick(), TickOutcome::Frozen);
                prop_assert_eq!(&game.snake, &snake);
                prop_assert_eq!(game.food, food);
                prop_assert_eq!(game.score(), score);
                prop_assert_eq!(game.state, GameState::Dead);
            }
        }

        #[test]
        fn prop_food_is_always_on_the_board(seed in any::<u64>(), rolls in 1usize..500) {
            let mut game = Game::with_seed(GameConfig::default(), seed);
            for _ in 0..rolls {
                game.place_food();
                prop_assert!(game.config.in_bounds(game.food.x, game.food.y));
            }
        }
    }

    // Regular unit tests for specific scenarios
    #[test]
    fn test_reset_state() {
        let mut game = game();
        game.snake = points(&[(1, 1), (1, 2), (1, 3), (1, 4), (1, 5), (1, 6), (1, 7)]);
        game.direction = Direction::Down;
        game.pending_direction = Some(Direction::Left);
        game.state = GameState::Dead;

        game.reset();

        assert_eq!(game.snake.len(), SNAKE_SIZE);
        assert_eq!(game.score(), 0);
        assert!(game.is_alive());
        assert_eq!(game.direction, Direction::Right);
        assert_eq!(game.pending_direction, None);
        assert_eq!(
            game.snake,
            points(&[(13, 15), (12, 15), (11, 15), (10, 15), (9, 15)])
        );
    }

    #[test]
    fn test_initial_food_is_placed() {
        let game = game();
        assert!(game.config.in_bounds(game.food.x, game.food.y));
    }

    #[test]
    fn test_tick_moves_head_right_from_start() {
        let mut game = game();
        park_food(&mut game);

        assert_eq!(game.tick(), TickOutcome::Moved);
        assert_eq!(
            game.snake,
            points(&[(14, 15), (13, 15), (12, 15), (11, 15), (10, 15)])
        );
    }

    #[test]
    fn test_left_moving_snake_advances_one_cell() {
        let mut game = game();
        game.snake = points(&[(14, 15), (15, 15), (16, 15), (17, 15), (18, 15)]);
        game.direction = Direction::Left;
        park_food(&mut game);

        game.tick();

        assert_eq!(
            game.snake,
            points(&[(13, 15), (14, 15), (15, 15), (16, 15), (17, 15)])
        );
    }

    #[test]
    fn test_eating_food_grows_snake_and_scores() {
        let mut game = game();
        game.snake = points(&[(14, 15), (15, 15), (16, 15), (17, 15), (18, 15)]);
        game.direction = Direction::Left;
        game.food = Point::new(13, 15);

        assert_eq!(game.tick(), TickOutcome::Ate);

        assert_eq!(game.snake.len(), SNAKE_SIZE + 1);
        assert_eq!(game.score(), 1);
        assert_eq!(game.head(), Point::new(13, 15));
        assert_eq!(game.snake.back(), Some(&Point::new(18, 15)));
        assert_eq!(game.pending_growth, 0);
        assert!(game.config.in_bounds(game.food.x, game.food.y));
    }

    #[test]
    fn test_growth_is_applied_once() {
        let mut game = game();
        game.food = Point::new(14, 15);

        game.tick();
        park_food(&mut game);
        game.tick();

        assert_eq!(game.snake.len(), SNAKE_SIZE + 1);
        assert_eq!(game.score(), 1);
    }

    #[test]
    fn test_pending_growth_keeps_tail() {
        let mut game = game();
        park_food(&mut game);
        game.pending_growth = 2;
        assert_eq!(game.score(), 2);

        game.tick();
        game.tick();
        game.tick();

        assert_eq!(game.snake.len(), SNAKE_SIZE + 2);
        assert_eq!(game.pending_growth, 0);
        assert_eq!(game.score(), 2);
    }

    #[test]
    fn test_walls_are_fatal_on_every_side() {
        let cases = [
            (Point::new(0, 10), Direction::Left, Point::new(1, 10)),
            (Point::new(MAP_SIZE - 1, 10), Direction::Right, Point::new(MAP_SIZE - 2, 10)),
            (Point::new(10, 0), Direction::Up, Point::new(10, 1)),
            (Point::new(10, MAP_SIZE - 1), Direction::Down, Point::new(10, MAP_SIZE - 2)),
        ];

        for (head, direction, neck) in cases {
            let mut game = game();
            park_food(&mut game);
            game.snake = VecDeque::from(vec![head, neck]);
            game.direction = direction;

            assert_eq!(game.tick(), TickOutcome::Died, "heading {:?}", direction);
            assert_eq!(game.state, GameState::Dead);
            assert_eq!(game.snake, VecDeque::from(vec![head, neck]));
        }
    }

    #[test]
    fn test_hitting_own_body_is_fatal() {
        let mut game = game();
        park_food(&mut game);
        game.snake = points(&[(5, 5), (6, 5), (6, 6), (5, 6), (4, 6), (4, 7)]);
        game.direction = Direction::Left;
        game.steer(Direction::Down);

        assert_eq!(game.tick(), TickOutcome::Died);
        assert!(!game.is_alive());
    }

    #[test]
    fn test_moving_into_tail_cell_is_fatal() {
        let mut game = game();
        park_food(&mut game);
        game.snake = points(&[(5, 5), (6, 5), (6, 6), (5, 6)]);
        game.direction = Direction::Left;
        game.steer(Direction::Down);

        assert_eq!(game.tick(), TickOutcome::Died);
    }

    #[test]
    fn test_cannot_reverse() {
        let mut game = game();
        park_food(&mut game);

        game.handle_input(Input::Direction(Direction::Left));
        assert_eq!(game.pending_direction, None);

        game.tick();
        assert_eq!(game.direction, Direction::Right);
        assert_eq!(game.head(), Point::new(14, 15));
    }

    #[test]
    fn test_reversal_checked_against_committed_direction() {
        let mut game = game();
        park_food(&mut game);

        game.handle_input(Input::Direction(Direction::Up));
        game.handle_input(Input::Direction(Direction::Left));
        assert_eq!(game.pending_direction, Some(Direction::Up));

        game.tick();
        assert_eq!(game.direction, Direction::Up);
    }

    #[test]
    fn test_last_input_before_tick_wins() {
        let mut game = game();
        park_food(&mut game);

        game.handle_input(Input::Direction(Direction::Up));
        game.handle_input(Input::Direction(Direction::Down));
        game.tick();

        assert_eq!(game.direction, Direction::Down);
        assert_eq!(game.head(), Point::new(13, 16));
        assert_eq!(game.pending_direction, None);
    }

    #[test]
    fn test_restart_ignored_while_alive() {
        let mut game = game();
        park_food(&mut game);
        game.tick();
        let snake = game.snake.clone();

        game.handle_input(Input::Restart);

        assert_eq!(game.snake, snake);
        assert_eq!(game.pending_direction, None);
    }

    #[test]
    fn test_restart_after_death_resets_game() {
        let mut game = game();
        game.snake.push_back(Point::new(8, 15));
        kill(&mut game);
        let food = game.food;
        assert_eq!(game.score(), 1);

        game.handle_input(Input::Restart);

        assert!(game.is_alive());
        assert_eq!(game.score(), 0);
        assert_eq!(game.snake.len(), SNAKE_SIZE);
        assert_eq!(game.direction, Direction::Right);
        assert_eq!(game.pending_direction, Some(Direction::Right));
        assert_eq!(game.food, food);
    }

    #[test]
    fn test_quit_does_not_touch_game() {
        let mut game = game();
        game.handle_input(Input::Quit);
        assert!(game.is_alive());
        assert_eq!(game.pending_direction, None);
    }
}
