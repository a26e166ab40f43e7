//! crossterm terminal backend
//!
//! [`TerminalSurface`] owns raw mode and the alternate screen for its
//! lifetime and restores both on drop. Frames are diffed against what is
//! already on screen, so only changed cells are written.

use std::io::{self, Stdout, Write};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{self, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{
    self, BeginSynchronizedUpdate, ClearType, DisableLineWrap, EnableLineWrap,
    EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{cursor, execute, queue};

use crate::app::CancelToken;
use crate::consts::INPUT_POLL_MS;
use crate::error::AppError;
use crate::surface::{Cell, CellBuffer, Color, Style, Surface};

fn to_crossterm(color: Color) -> style::Color {
    match color.rgb() {
        Some((r, g, b)) => style::Color::Rgb { r, g, b },
        None => style::Color::Reset,
    }
}

/// Cells of `next` that differ from `shown`, or every cell when `full`
pub fn changed_cells(shown: &CellBuffer, next: &CellBuffer, full: bool) -> Vec<(i32, i32, Cell)> {
    next.cells()
        .filter(|&(x, y, cell)| full || shown.get(x, y) != Some(cell))
        .collect()
}

pub struct TerminalSurface {
    out: Stdout,
    /// What the terminal currently shows
    shown: CellBuffer,
    next: CellBuffer,
    full_redraw: bool,
}

impl TerminalSurface {
    /// Enter raw mode and the alternate screen, hide the cursor
    pub fn new() -> Result<Self, AppError> {
        let (cols, rows) = terminal::size().map_err(AppError::TerminalInit)?;
        terminal::enable_raw_mode().map_err(AppError::TerminalInit)?;

        // Built before any escape codes go out, so a failed setup still restores on drop
        let (w, h) = (i32::from(cols), i32::from(rows));
        let mut surface = Self {
            out: io::stdout(),
            shown: CellBuffer::new(w, h),
            next: CellBuffer::new(w, h),
            full_redraw: true,
        };
        enter_screen(&mut surface.out).map_err(AppError::TerminalInit)?;
        log::info!("Terminal surface {cols}x{rows}");
        Ok(surface)
    }

    fn write_cells(&mut self, cells: &[(i32, i32, Cell)]) -> io::Result<()> {
        let mut current: Option<Style> = None;
        for &(x, y, cell) in cells {
            queue!(self.out, cursor::MoveTo(x as u16, y as u16))?;
            if current != Some(cell.style) {
                queue!(
                    self.out,
                    SetForegroundColor(to_crossterm(cell.style.fg)),
                    SetBackgroundColor(to_crossterm(cell.style.bg))
                )?;
                current = Some(cell.style);
            }
            queue!(self.out, Print(cell.glyph))?;
        }
        Ok(())
    }
}

impl Surface for TerminalSurface {
    fn size(&self) -> (i32, i32) {
        self.next.size()
    }

    fn set_cell(&mut self, x: i32, y: i32, glyph: char, style: Style) {
        self.next.set_cell(x, y, glyph, style);
    }

    /// Also picks up terminal resizes
    fn clear(&mut self) {
        let size = match terminal::size() {
            Ok((cols, rows)) => (i32::from(cols), i32::from(rows)),
            Err(e) => {
                log::warn!("Failed to read terminal size: {e}");
                self.next.size()
            }
        };
        if size != self.next.size() {
            log::debug!("Terminal resized to {}x{}", size.0, size.1);
            self.next.resize(size.0, size.1);
            self.shown.resize(size.0, size.1);
            self.full_redraw = true;
        } else {
            self.next.clear();
        }
    }

    fn present(&mut self) -> io::Result<()> {
        let cells = changed_cells(&self.shown, &self.next, self.full_redraw);
        queue!(self.out, BeginSynchronizedUpdate)?;
        if self.full_redraw {
            queue!(self.out, ResetColor, terminal::Clear(ClearType::All))?;
        }
        self.write_cells(&cells)?;
        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;

        self.shown.clone_from(&self.next);
        self.full_redraw = false;
        Ok(())
    }
}

fn enter_screen(out: &mut impl Write) -> io::Result<()> {
    execute!(
        out,
        EnterAlternateScreen,
        DisableLineWrap,
        cursor::Hide,
        terminal::Clear(ClearType::All),
        cursor::MoveTo(0, 0)
    )
}

fn leave_screen(out: &mut impl Write) -> io::Result<()> {
    execute!(
        out,
        EndSynchronizedUpdate,
        ResetColor,
        cursor::Show,
        EnableLineWrap,
        LeaveAlternateScreen
    )
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        let _ = leave_screen(&mut self.out);
        let _ = terminal::disable_raw_mode();
    }
}

/// Esc, `q` or Ctrl-C
pub fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Watch for quit keys on a background thread until `cancel` is set
pub fn spawn_key_watcher(cancel: CancelToken) -> JoinHandle<()> {
    thread::spawn(move || {
        let poll = Duration::from_millis(INPUT_POLL_MS);
        while !cancel.is_cancelled() {
            match event::poll(poll) {
                Ok(false) => {}
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if is_quit_key(&key) => {
                        log::info!("Quit key pressed");
                        cancel.cancel();
                    }
                    Ok(_) => {}
                    Err(e) => {
                        log::warn!("Input read failed, stopping: {e}");
                        cancel.cancel();
                    }
                },
                Err(e) => {
                    log::warn!("Input poll failed, stopping: {e}");
                    cancel.cancel();
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_quit_keys() {
        assert!(is_quit_key(&key(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(is_quit_key(&key(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(is_quit_key(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!is_quit_key(&key(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!is_quit_key(&key(KeyCode::Char('x'), KeyModifiers::NONE)));

        let mut release = key(KeyCode::Esc, KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert!(!is_quit_key(&release));
    }

    #[test]
    fn test_diff_only_changed_cells() {
        let mut shown = CellBuffer::new(4, 2);
        let mut next = CellBuffer::new(4, 2);
        shown.set_cell(0, 0, 'a', Style::default());
        next.set_cell(0, 0, 'a', Style::default());
        next.set_cell(2, 1, 'b', Style::fg(Color::Red));

        let changed = changed_cells(&shown, &next, false);
        assert_eq!(changed.len(), 1);
        assert_eq!(changed[0].0, 2);
        assert_eq!(changed[0].1, 1);
        assert_eq!(changed[0].2.glyph, 'b');

        // Erased cells are written back as blanks
        let erased = changed_cells(&next, &shown, false);
        assert_eq!(erased.len(), 1);
        assert!(erased[0].2.is_blank());

        assert_eq!(changed_cells(&shown, &next, true).len(), 8);
    }

    struct Unwritable;

    impl Write for Unwritable {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("not a tty"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::other("not a tty"))
        }
    }

    #[test]
    fn test_screen_setup_and_restore_sequences() {
        assert!(enter_screen(&mut Unwritable).is_err());

        let mut entered = Vec::new();
        enter_screen(&mut entered).unwrap();
        let entered = String::from_utf8_lossy(&entered);
        assert!(entered.contains("\x1b[?1049h"));
        assert!(entered.contains("\x1b[?25l"));

        let mut restored = Vec::new();
        leave_screen(&mut restored).unwrap();
        let restored = String::from_utf8_lossy(&restored);
        assert!(restored.contains("\x1b[?1049l"));
        assert!(restored.contains("\x1b[?25h"));
    }

    #[test]
    fn test_color_mapping() {
        assert_eq!(to_crossterm(Color::Reset), style::Color::Reset);
        assert_eq!(
            to_crossterm(Color::Red),
            style::Color::Rgb { r: 255, g: 0, b: 0 }
        );
    }
}
