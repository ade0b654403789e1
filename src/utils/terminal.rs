use std::io::{stdout, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{read, Event, KeyEvent},
    execute, queue,
    style::Print,
    terminal::{
        disable_raw_mode, enable_raw_mode, size, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
    Result,
};
use log::{trace, warn};

/// The terminal events the interactive flow reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    Key(KeyEvent),
    /// New viewport width and height, in cells.
    Resize(u16, u16),
}

/// Puts the terminal in raw mode on the alternate screen for as long as it is
/// alive.
pub(crate) struct TerminalGuard {}
impl TerminalGuard {
    pub(crate) fn enter() -> Result<Self> {
        enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen, Hide)?;
        Ok(TerminalGuard {})
    }
}
impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = execute!(stdout(), Show, LeaveAlternateScreen) {
            warn!("could not restore the screen: {}", e);
        }
        if let Err(e) = disable_raw_mode() {
            warn!("could not leave raw mode: {}", e);
        }
    }
}

pub(crate) fn terminal_size() -> Result<(u16, u16)> {
    size()
}

/// Blocks until the next terminal event. Events the flow does not care about
/// (mouse) yield `None`.
pub(crate) fn read_input() -> Result<Option<Input>> {
    let event = read()?;
    trace!("{:?}", event);
    Ok(match event {
        Event::Key(key) => Some(Input::Key(key)),
        Event::Resize(width, height) => Some(Input::Resize(width, height)),
        _ => None,
    })
}

/// Redraws the whole screen with `lines`, one per row from the top.
pub(crate) fn draw(lines: &[String]) -> Result<()> {
    let mut out = stdout();
    queue!(out, Clear(ClearType::All))?;
    for (row, line) in lines.iter().enumerate() {
        queue!(out, MoveTo(0, row as u16), Print(line))?;
    }
    out.flush()?;
    Ok(())
}
