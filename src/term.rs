use crate::TermInt;
use std::{
    io::{stdout, Stdout, Write},
    time::Duration,
};

use crossterm::event::{poll, read, Event, KeyEvent};
use crossterm::style::{Color, ResetColor, SetBackgroundColor};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, style, terminal};

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
}

impl TermManager {
    pub fn new() -> Self {
        let (width, height) = terminal::size().expect("Error reading size.");
        TermManager { width, height, stdout: stdout() }
    }

    pub fn setup(&mut self) {
        execute!(self.stdout, EnterAlternateScreen).expect("Error entering alt screen");
        self.set_raw_mode(true);
        self.set_cursor_visibility(false);
    }

    pub fn restore(&mut self) {
        self.set_raw_mode(false);
        self.set_cursor_visibility(true);
        execute!(self.stdout, LeaveAlternateScreen).expect("Error leaving alt screen");
    }

    pub fn size(&self) -> (TermInt, TermInt) {
        (self.width, self.height)
    }

    pub fn read_key_blocking(&self) -> KeyEvent {
        loop {
            if let Event::Key(ev) = read().expect("Error reading event.") {
                return ev;
            }
        }
    }

    pub fn read_key_events_queue(&self) -> Vec<KeyEvent> {
        let mut events = vec![];

        while poll(Duration::from_millis(1)).expect("Error polling events.") {
            if let Event::Key(ev) = read().expect("Error reading event.") {
                events.push(ev);
            }
        }

        events
    }

    pub fn draw_borders(&mut self, size: (TermInt, TermInt)) {
        let (width, height) = size;
        let end_x = width - 1;
        let end_y = height - 1;

        for x in 0..width {
            let ch = if x == 0 || x == end_x { '+' } else { '-' };
            self.print_at((x, 0), ch);
            self.print_at((x, end_y), ch);
        }

        for y in 1..end_y {
            self.print_at((0, y), '|');
            self.print_at((end_x, y), '|');
        }

        self.flush();
    }

    /// Paints `width` consecutive characters starting at `pos` in the given
    /// background color.
    pub fn fill_cell(&mut self, pos: (TermInt, TermInt), width: TermInt, color: Color) {
        let blank = " ".repeat(width as usize);
        queue!(
            self.stdout,
            cursor::MoveTo(pos.0, pos.1),
            SetBackgroundColor(color),
            style::Print(blank),
            ResetColor
        )
        .expect("Error painting cell.");
    }

    /// Like `fill_cell`, but with `ch` centered in the painted run.
    pub fn fill_cell_char(&mut self, pos: (TermInt, TermInt), width: TermInt, color: Color, ch: char) {
        let text = format!("{: ^width$}", ch, width = width as usize);
        queue!(
            self.stdout,
            cursor::MoveTo(pos.0, pos.1),
            SetBackgroundColor(color),
            style::Print(text),
            ResetColor
        )
        .expect("Error painting cell.");
    }

    /// Prints a centered message box over whatever is on screen. The caller
    /// repaints the board to dismiss it.
    pub fn show_message(&mut self, lines: &[&str]) {
        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.len()).max().unwrap() + 2) as TermInt;
        let top_left = (self.width / 2 - msg_width / 2, self.height / 2 - msg_height / 2);

        // Blank lines above and below the text
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at((top_left.0 + x_diff, *y), ' ');
            }
        }

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.char_indices() {
                self.print_at((top_left.0 + x_diff as TermInt, y), ch);
            }
        }

        self.flush();
    }

    pub fn print_at(&mut self, pos: (TermInt, TermInt), ch: char) {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))
            .expect("Error printing.");
    }

    pub fn clear(&mut self) {
        execute!(self.stdout, terminal::Clear(ClearType::All)).expect("Error clearing.");
    }

    pub fn flush(&mut self) {
        self.stdout.flush().expect("Error flushing.");
    }

    ///////////////////////////////////////////////////////////////////////////

    fn set_raw_mode(&self, option: bool) {
        let res = if option {
            terminal::enable_raw_mode()
        } else {
            terminal::disable_raw_mode()
        };

        res.expect("Error setting raw mode.");
    }

    fn set_cursor_visibility(&mut self, option: bool) {
        let res = if option {
            execute!(self.stdout, cursor::Show)
        } else {
            execute!(self.stdout, cursor::Hide)
        };

        res.expect("Error setting cursor visibility.");
    }
}
