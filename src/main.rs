mod game;
mod state;
mod term;

pub type TermInt = u16;

/// A grid cell, in cell units (not terminal characters).
pub type Cell = (u16, u16);

fn main() {
    let mut game = game::SnakeGame::new();
    game.initialize();
    game.show_intro();

    // play() only returns control through clean_exit() on a quit request
    game.play();
}
