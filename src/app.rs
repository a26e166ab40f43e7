//! Fixed-rate frame loop
//!
//! Each iteration: check cancellation, clear, tick with the surface's current
//! size, draw, present, sleep. The sleep is a soft frame-rate cap; no actor
//! ever sees wall-clock time.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crate::error::AppError;
use crate::sim::{GridSize, Playground};
use crate::surface::Surface;

/// Shared stop flag, set by the key watcher and polled by the loop
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a stop; calling it again has no further effect
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Clear, advance one tick and draw, without presenting
fn step(surface: &mut dyn Surface, playground: &mut Playground) {
    surface.clear();
    let size = GridSize::from(surface.size());
    playground.tick(size);
    playground.draw(surface);
}

/// Run until `cancel` is set; returns the number of presented frames
pub fn run(
    surface: &mut dyn Surface,
    playground: &mut Playground,
    cancel: &CancelToken,
    interval: Duration,
) -> Result<u64, AppError> {
    let mut frames = 0;
    loop {
        if cancel.is_cancelled() {
            break;
        }
        step(surface, playground);
        surface.present().map_err(AppError::Present)?;
        frames += 1;
        if !interval.is_zero() {
            thread::sleep(interval);
        }
    }
    log::info!("Stopped after {frames} frames ({} ticks)", playground.tick_count());
    Ok(frames)
}

/// Run exactly `ticks` frames as fast as possible (headless mode)
pub fn run_ticks(
    surface: &mut dyn Surface,
    playground: &mut Playground,
    ticks: u64,
) -> Result<(), AppError> {
    for _ in 0..ticks {
        step(surface, playground);
        surface.present().map_err(AppError::Present)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::surface::{CellBuffer, Style};
    use std::io;

    /// Cancels its token once `limit` frames have been presented
    struct StopAfter {
        buf: CellBuffer,
        cancel: CancelToken,
        limit: u64,
        sizes: Vec<(i32, i32)>,
    }

    impl Surface for StopAfter {
        fn size(&self) -> (i32, i32) {
            self.buf.size()
        }

        fn set_cell(&mut self, x: i32, y: i32, glyph: char, style: Style) {
            self.buf.set_cell(x, y, glyph, style);
        }

        fn clear(&mut self) {
            self.sizes.push(self.buf.size());
            self.buf.clear();
        }

        fn present(&mut self) -> io::Result<()> {
            self.buf.present()?;
            if self.buf.presents() >= self.limit {
                self.cancel.cancel();
            }
            Ok(())
        }
    }

    struct Broken;

    impl Surface for Broken {
        fn size(&self) -> (i32, i32) {
            (10, 10)
        }
        fn set_cell(&mut self, _: i32, _: i32, _: char, _: Style) {}
        fn clear(&mut self) {}
        fn present(&mut self) -> io::Result<()> {
            Err(io::Error::other("closed"))
        }
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!token.is_cancelled());
        other.cancel();
        other.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_cancel_stops_without_another_present() {
        let cancel = CancelToken::new();
        let mut surface = StopAfter {
            buf: CellBuffer::new(30, 10),
            cancel: cancel.clone(),
            limit: 3,
            sizes: Vec::new(),
        };
        let mut playground = Playground::new(&Settings::default(), 1);
        let frames = run(&mut surface, &mut playground, &cancel, Duration::ZERO).unwrap();
        assert_eq!(frames, 3);
        assert_eq!(surface.buf.presents(), 3);
        assert_eq!(playground.tick_count(), 3);
        assert_eq!(surface.sizes, vec![(30, 10); 3]);
    }

    #[test]
    fn test_precancelled_run_draws_nothing() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut buf = CellBuffer::new(30, 10);
        let mut playground = Playground::new(&Settings::default(), 1);
        let frames = run(&mut buf, &mut playground, &cancel, Duration::ZERO).unwrap();
        assert_eq!(frames, 0);
        assert_eq!(buf.presents(), 0);
        assert_eq!(playground.tick_count(), 0);
    }

    #[test]
    fn test_present_failure_is_reported() {
        let cancel = CancelToken::new();
        let mut playground = Playground::new(&Settings::default(), 1);
        let result = run(&mut Broken, &mut playground, &cancel, Duration::ZERO);
        assert!(matches!(result, Err(AppError::Present(_))));
    }

    #[test]
    fn test_run_ticks() {
        let mut buf = CellBuffer::new(40, 12);
        let mut playground = Playground::new(&Settings::default(), 4);
        run_ticks(&mut buf, &mut playground, 25).unwrap();
        assert_eq!(buf.presents(), 25);
        assert_eq!(playground.tick_count(), 25);
    }
}
