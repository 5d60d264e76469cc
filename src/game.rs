use std::{process::exit, thread::sleep, time::Duration};

use crate::state::{Direction::*, GameState, TickOutcome};
use crate::term::TermManager;
use crate::{Cell, TermInt};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::style::Color;
use rand::rngs::ThreadRng;

const GRID_WIDTH: u16 = 32;
const GRID_HEIGHT: u16 = 24;

// Cells are two characters wide so they come out roughly square
const CELL_WIDTH: TermInt = 2;

const TICK_INTERVAL_MS: u64 = 5;
const TICKS_UNTIL_STEP: u64 = 40;

const BOARD_COLOR: Color = Color::Black;
const SNAKE_COLOR: Color = Color::Green;
const HEAD_COLOR: Color = Color::DarkGreen;
const FOOD_COLOR: Color = Color::Red;

pub struct SnakeGame {
    paused: bool,
    term: TermManager,
    state: GameState,
    rng: ThreadRng,
}

impl SnakeGame {
    pub fn new() -> Self {
        let mut rng = rand::thread_rng();
        let state = GameState::new(GRID_WIDTH, GRID_HEIGHT, &mut rng);

        SnakeGame { paused: false, term: TermManager::new(), state, rng }
    }

    pub fn initialize(&mut self) {
        let (w, h) = self.term.size();
        let min_w = GRID_WIDTH * CELL_WIDTH + 2;
        let min_h = GRID_HEIGHT + 2;

        if w < min_w || h < min_h {
            eprintln!("Terminal too small: at least {}x{} characters needed.", min_w, min_h);
            exit(1);
        }

        self.term.setup();
    }

    pub fn show_intro(&mut self) {
        let lines = &[
            "Arrow keys or WASD to move",
            "The board wraps around at the edges",
            "Esc to pause",
            "Q or CTRL+C to quit",
            "",
            "Press any key to begin",
        ];

        self.term.show_message(lines);

        if is_quit(&self.term.read_key_blocking()) {
            self.clean_exit();
        }
    }

    pub fn play(&mut self) {
        self.redraw_board();

        let mut ticks_until_step = TICKS_UNTIL_STEP;

        loop {
            sleep(Duration::from_millis(TICK_INTERVAL_MS));

            for key_ev in self.term.read_key_events_queue() {
                match &key_ev {
                    ev if is_quit(ev) => self.clean_exit(),
                    KeyEvent { code, modifiers: _ } => match code {
                        KeyCode::Char('w') | KeyCode::Up => self.state.request_direction(Up),
                        KeyCode::Char('a') | KeyCode::Left => self.state.request_direction(Left),
                        KeyCode::Char('s') | KeyCode::Down => self.state.request_direction(Down),
                        KeyCode::Char('d') | KeyCode::Right => self.state.request_direction(Right),
                        KeyCode::Esc => self.toggle_pause(),
                        _ => {}
                    },
                }
            }

            if self.paused {
                continue;
            }

            ticks_until_step -= 1;
            if ticks_until_step == 0 {
                ticks_until_step = TICKS_UNTIL_STEP;

                let outcome = self.state.tick(&mut self.rng);
                self.draw_outcome(&outcome);
            }
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn clean_exit(&mut self) {
        self.term.restore();
        exit(0);
    }

    fn draw_outcome(&mut self, outcome: &TickOutcome) {
        match outcome {
            TickOutcome::Moved { new_head: _, old_head, old_tail } => {
                // Erase after the old-head repaint: for a one-cell snake the
                // vacated tail IS the old head
                self.paint_cell(*old_head, SNAKE_COLOR);
                if let Some(tail) = old_tail {
                    // The food stays put across a reset, so the snake can
                    // glide over it without eating; repaint instead of erase
                    let color = if *tail == self.state.food() { FOOD_COLOR } else { BOARD_COLOR };
                    self.paint_cell(*tail, color);
                }
                self.paint_head();
            }
            TickOutcome::Grew { new_head: _, old_head } => {
                self.paint_cell(*old_head, SNAKE_COLOR);
                self.paint_head();
                self.paint_cell(self.state.food(), FOOD_COLOR);
            }
            TickOutcome::Reset { old_body } => {
                for cell in old_body {
                    self.paint_cell(*cell, BOARD_COLOR);
                }
                self.paint_cell(self.state.food(), FOOD_COLOR);
                self.paint_head();
            }
        }

        self.term.flush();
    }

    fn redraw_board(&mut self) {
        self.term.clear();
        self.term.draw_borders((GRID_WIDTH * CELL_WIDTH + 2, GRID_HEIGHT + 2));

        let body: Vec<Cell> = self.state.body().to_vec();
        for cell in body.iter().skip(1) {
            self.paint_cell(*cell, SNAKE_COLOR);
        }

        self.paint_cell(self.state.food(), FOOD_COLOR);
        self.paint_head();
        self.term.flush();
    }

    fn paint_cell(&mut self, cell: Cell, color: Color) {
        self.term.fill_cell(term_pos(cell), CELL_WIDTH, color);
    }

    fn paint_head(&mut self) {
        let ch = match self.state.direction() {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        };

        self.term.fill_cell_char(term_pos(self.state.head()), CELL_WIDTH, HEAD_COLOR, ch);
    }

    fn toggle_pause(&mut self) {
        if !self.paused {
            self.term.show_message(&["Paused", "Press Esc to resume", "or Q to quit"]);
        } else {
            self.redraw_board();
        }

        self.paused = !self.paused;
    }
}

// Grid cell to terminal position: one row/column in for the border,
// CELL_WIDTH characters per cell horizontally
fn term_pos(cell: Cell) -> (TermInt, TermInt) {
    (1 + cell.0 * CELL_WIDTH, 1 + cell.1)
}

fn is_quit(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
        || ev.code == KeyCode::Char('q')
}
