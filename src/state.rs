use crate::Cell;

use rand::seq::SliceRandom;
use rand::Rng;

use Direction::*;

// Cap on random draws when relocating food. Defensive only: with the snake
// far smaller than the board, a handful of draws is the norm.
const FOOD_SAMPLE_CAP: u32 = 10_000;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }
}

/// What a single tick did, carrying the cells a renderer needs to repaint.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TickOutcome {
    Moved { new_head: Cell, old_head: Cell, old_tail: Option<Cell> },
    Grew { new_head: Cell, old_head: Cell },
    Reset { old_body: Vec<Cell> },
}

struct Snake {
    body: Vec<Cell>,
    direction: Direction,
    pending: Option<Direction>,
    last: Option<Cell>,
}

impl Snake {
    fn new(head: Cell) -> Self {
        Snake { body: vec![head], direction: Right, pending: None, last: None }
    }
}

struct Food {
    position: Cell,
}

impl Food {
    // Uniform over the free cells. Resamples on occupied draws; past the
    // cap, scans for the free cells and picks among them directly.
    fn randomize(&mut self, rng: &mut impl Rng, width: u16, height: u16, occupied: &[Cell]) {
        for _ in 0..FOOD_SAMPLE_CAP {
            let candidate = (rng.gen_range(0..width), rng.gen_range(0..height));
            if !occupied.contains(&candidate) {
                self.position = candidate;
                return;
            }
        }

        let free: Vec<Cell> = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .filter(|cell| !occupied.contains(cell))
            .collect();

        if let Some(cell) = free.choose(rng) {
            self.position = *cell;
        }
    }
}

/// The whole simulation: a snake and one food item on a toroidal grid of
/// `width` x `height` cells. Advanced one discrete step at a time by
/// `tick()`; steered between ticks by `request_direction()`.
pub struct GameState {
    width: u16,
    height: u16,
    snake: Snake,
    food: Food,
}

impl GameState {
    pub fn new(width: u16, height: u16, rng: &mut impl Rng) -> Self {
        let snake = Snake::new((width / 2, height / 2));
        let mut food = Food { position: (0, 0) };
        food.randomize(rng, width, height, &snake.body);

        GameState { width, height, snake, food }
    }

    /// Stores `dir` to be committed at the start of the next tick. Requests
    /// that would reverse the committed direction are dropped silently.
    pub fn request_direction(&mut self, dir: Direction) {
        if dir.opposite() == self.snake.direction {
            return;
        }

        self.snake.pending = Some(dir);
    }

    /// Advances the simulation one step: commits any pending direction,
    /// moves the head with wraparound, grows and relocates the food when
    /// the head lands on it, and resets the snake to its starting state on
    /// self-collision. The food stays put across a reset.
    pub fn tick(&mut self, rng: &mut impl Rng) -> TickOutcome {
        if let Some(dir) = self.snake.pending.take() {
            self.snake.direction = dir;
        }

        let old_head = self.head();
        let (dx, dy) = self.snake.direction.delta();
        let new_head = (
            wrap(old_head.0, dx, self.width),
            wrap(old_head.1, dy, self.height),
        );

        let grew = new_head == self.food.position;

        self.snake.body.insert(0, new_head);
        if grew {
            self.snake.last = None;
            self.food.randomize(rng, self.width, self.height, &self.snake.body);
        } else {
            // The body holds at least two cells right after the insert
            let tail = self.snake.body.pop().unwrap();
            self.snake.last = Some(tail);
        }

        if self.snake.body[1..].contains(&new_head) {
            let old_body = std::mem::take(&mut self.snake.body);
            self.snake = Snake::new((self.width / 2, self.height / 2));
            return TickOutcome::Reset { old_body };
        }

        if grew {
            TickOutcome::Grew { new_head, old_head }
        } else {
            TickOutcome::Moved { new_head, old_head, old_tail: self.snake.last }
        }
    }

    pub fn body(&self) -> &[Cell] {
        &self.snake.body
    }

    pub fn head(&self) -> Cell {
        self.snake.body[0]
    }

    pub fn direction(&self) -> Direction {
        self.snake.direction
    }

    /// The cell vacated by the most recent tick, if any.
    pub fn last(&self) -> Option<Cell> {
        self.snake.last
    }

    pub fn food(&self) -> Cell {
        self.food.position
    }
}

// Toroidal coordinate step: leaving one edge re-enters the opposite one.
fn wrap(coord: u16, delta: i32, size: u16) -> u16 {
    (coord as i32 + delta).rem_euclid(size as i32) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn state(width: u16, height: u16, body: Vec<Cell>, direction: Direction, food: Cell) -> GameState {
        GameState {
            width,
            height,
            snake: Snake { body, direction, pending: None, last: None },
            food: Food { position: food },
        }
    }

    #[test]
    fn starts_centered_with_one_cell() {
        let mut r = rng();
        let gs = GameState::new(32, 24, &mut r);

        assert_eq!(gs.body(), &[(16, 12)]);
        assert_eq!(gs.direction(), Right);
        assert_eq!(gs.last(), None);
        assert_ne!(gs.food(), (16, 12));
    }

    #[test]
    fn wraps_around_every_edge() {
        let mut r = rng();

        let mut gs = state(5, 5, vec![(4, 2)], Right, (0, 0));
        gs.tick(&mut r);
        assert_eq!(gs.head(), (0, 2));

        let mut gs = state(5, 5, vec![(0, 2)], Left, (0, 0));
        gs.tick(&mut r);
        assert_eq!(gs.head(), (4, 2));

        let mut gs = state(5, 5, vec![(2, 0)], Up, (0, 0));
        gs.tick(&mut r);
        assert_eq!(gs.head(), (2, 4));

        let mut gs = state(5, 5, vec![(2, 4)], Down, (0, 0));
        gs.tick(&mut r);
        assert_eq!(gs.head(), (2, 0));
    }

    #[test]
    fn rejects_reversal_of_committed_direction() {
        let mut r = rng();
        let mut gs = state(10, 10, vec![(5, 5), (4, 5)], Right, (0, 0));

        gs.request_direction(Left);
        gs.tick(&mut r);

        assert_eq!(gs.direction(), Right);
        assert_eq!(gs.head(), (6, 5));
    }

    #[test]
    fn later_request_overwrites_pending_one() {
        let mut r = rng();
        let mut gs = state(10, 10, vec![(5, 5)], Right, (0, 0));

        gs.request_direction(Up);
        gs.request_direction(Down);
        gs.tick(&mut r);

        assert_eq!(gs.direction(), Down);
        assert_eq!(gs.head(), (5, 6));
    }

    #[test]
    fn growth_keeps_tail_and_relocates_food() {
        let mut r = rng();
        let mut gs = state(10, 10, vec![(2, 2), (1, 2)], Right, (3, 2));

        let outcome = gs.tick(&mut r);

        assert_eq!(outcome, TickOutcome::Grew { new_head: (3, 2), old_head: (2, 2) });
        assert_eq!(gs.body(), &[(3, 2), (2, 2), (1, 2)]);
        assert_eq!(gs.last(), None);
        assert!(!gs.body().contains(&gs.food()));
    }

    #[test]
    fn plain_move_drops_the_tail() {
        let mut r = rng();
        let mut gs = state(10, 10, vec![(2, 2), (1, 2)], Right, (9, 9));

        let outcome = gs.tick(&mut r);

        assert_eq!(
            outcome,
            TickOutcome::Moved { new_head: (3, 2), old_head: (2, 2), old_tail: Some((1, 2)) }
        );
        assert_eq!(gs.body(), &[(3, 2), (2, 2)]);
        assert_eq!(gs.last(), Some((1, 2)));
    }

    #[test]
    fn single_cell_snake_just_relocates() {
        let mut r = rng();
        let mut gs = state(10, 10, vec![(2, 2)], Right, (9, 9));

        gs.tick(&mut r);

        assert_eq!(gs.body(), &[(3, 2)]);
        assert_eq!(gs.last(), Some((2, 2)));
    }

    #[test]
    fn moving_into_the_vacated_tail_cell_is_not_a_collision() {
        let mut r = rng();
        // A 2x2 loop: the head chases its own tail around forever
        let mut gs = state(10, 10, vec![(5, 5), (4, 5), (4, 6), (5, 6)], Down, (9, 9));

        let outcome = gs.tick(&mut r);

        assert!(matches!(outcome, TickOutcome::Moved { .. }));
        assert_eq!(gs.body(), &[(5, 6), (5, 5), (4, 5), (4, 6)]);
    }

    #[test]
    fn self_collision_resets_snake_but_not_food() {
        let mut r = rng();
        let mut gs = state(10, 10, vec![(5, 5), (4, 5), (4, 6), (5, 6), (6, 6)], Down, (9, 9));

        let outcome = gs.tick(&mut r);

        match outcome {
            TickOutcome::Reset { old_body } => assert_eq!(old_body[0], (5, 6)),
            other => panic!("expected a reset, got {:?}", other),
        }
        assert_eq!(gs.body(), &[(5, 5)]);
        assert_eq!(gs.direction(), Right);
        assert_eq!(gs.last(), None);
        assert_eq!(gs.food(), (9, 9));

        // The next tick runs from the fresh starting state
        gs.tick(&mut r);
        assert_eq!(gs.head(), (6, 5));
    }

    #[test]
    fn food_never_lands_on_the_body() {
        let mut r = rng();
        let mut gs = GameState::new(4, 4, &mut r);

        // Staircase play on a tiny torus: plenty of growth and resets
        for i in 0..500 {
            gs.request_direction(if i % 2 == 0 { Down } else { Right });
            gs.tick(&mut r);
            assert!(!gs.body().contains(&gs.food()));
        }
    }

    #[test]
    fn three_ticks_then_growth_scenario() {
        let mut r = rng();
        let mut gs = state(32, 24, vec![(16, 12)], Right, (0, 0));

        gs.tick(&mut r);
        gs.tick(&mut r);
        assert_eq!(gs.head(), (18, 12));
        assert_eq!(gs.body().len(), 1);

        gs.food.position = (19, 12);
        gs.tick(&mut r);

        assert_eq!(gs.head(), (19, 12));
        assert_eq!(gs.body().len(), 2);
        assert_ne!(gs.food(), (19, 12));
        assert!(!gs.body().contains(&gs.food()));
    }
}
