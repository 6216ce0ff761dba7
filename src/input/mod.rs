use anyhow::{anyhow, Context, Result};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use rdev::{Button, EventType, Key};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::shared::Point;
use crate::utils::logger;

/// How a synthetic click is delivered.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ClickKind {
    /// Press followed by release: palette selection, and the default for
    /// canvas marks.
    Full,
    /// Press without release, for canvases that latch on button-down.
    PressOnly,
}

/// Narrow seam over the pointing device so the draw pass can be tested
/// without an OS event queue behind it.
pub trait Pointer {
    fn move_to(&mut self, pos: Point) -> Result<()>;
    fn click(&mut self, kind: ClickKind) -> Result<()>;
}

/// Blocking source of user clicks (primary button press positions).
pub trait ClickSource {
    /// Wait for the next fresh primary-button press and return the pointer
    /// position at that instant. `None` blocks indefinitely.
    fn next_click(&self, timeout: Option<Duration>) -> Result<Point>;
}

/// Shared cancellation flag. Single writer (the input listener or the
/// Ctrl+C handler), single reader (the draw pass polling between pixels).
#[derive(Clone)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Route one raw input event from the listener. The pointer position is
/// only known once a `MouseMove` has been observed; presses arriving
/// before that are dropped rather than attributed to a bogus origin.
fn route_event(
    event_type: &EventType,
    last_pos: &mut Option<(f64, f64)>,
    clicks_tx: &Sender<Point>,
    armed: &AtomicBool,
    cancel: &CancelToken,
) {
    match event_type {
        EventType::MouseMove { x, y } => {
            *last_pos = Some((*x, *y));
        }
        EventType::ButtonPress(Button::Left) => match last_pos {
            Some((x, y)) => {
                let _ = clicks_tx.send(Point::new(*x as i32, *y as i32));
            }
            None => logger::debug("ignoring click before any pointer movement"),
        },
        EventType::KeyPress(Key::Escape) => {
            if armed.load(Ordering::SeqCst) {
                cancel.cancel();
            }
        }
        _ => {}
    }
}

/// Global input listener. rdev supports a single `listen` callback per
/// process, so one background thread is started for the whole run; it
/// tracks the pointer position, forwards left-button presses over a
/// channel, and flips the cancel token on Escape while a watch is armed.
pub struct InputHub {
    clicks_rx: Receiver<Point>,
    escape_armed: Arc<AtomicBool>,
    cancel: CancelToken,
}

impl InputHub {
    pub fn start() -> Result<Self> {
        let (clicks_tx, clicks_rx): (Sender<Point>, Receiver<Point>) = unbounded();
        let escape_armed = Arc::new(AtomicBool::new(false));
        let cancel = CancelToken::new();

        let armed = Arc::clone(&escape_armed);
        let token = cancel.clone();
        thread::Builder::new()
            .name("input-listener".into())
            .spawn(move || {
                let mut last_pos: Option<(f64, f64)> = None;
                let result = rdev::listen(move |event| {
                    route_event(&event.event_type, &mut last_pos, &clicks_tx, &armed, &token);
                });
                if let Err(e) = result {
                    logger::error(&format!("input listener failed: {:?}", e));
                }
            })
            .context("failed to spawn input listener thread")?;

        Ok(Self {
            clicks_rx,
            escape_armed,
            cancel,
        })
    }

    /// Arm Escape-to-cancel for the duration of a draw pass. The watch is
    /// disarmed when the returned guard is dropped.
    pub fn watch_escape(&self) -> EscapeWatch {
        self.cancel.reset();
        self.escape_armed.store(true, Ordering::SeqCst);
        EscapeWatch {
            armed: Arc::clone(&self.escape_armed),
            token: self.cancel.clone(),
        }
    }
}

impl ClickSource for InputHub {
    fn next_click(&self, timeout: Option<Duration>) -> Result<Point> {
        // Drop clicks queued before this request so each capture consumes
        // exactly one fresh press.
        while self.clicks_rx.try_recv().is_ok() {}

        match timeout {
            Some(t) => match self.clicks_rx.recv_timeout(t) {
                Ok(pos) => Ok(pos),
                Err(RecvTimeoutError::Timeout) => {
                    Err(anyhow!("no click received within {:?}", t))
                }
                Err(RecvTimeoutError::Disconnected) => {
                    Err(anyhow!("input listener stopped unexpectedly"))
                }
            },
            None => self
                .clicks_rx
                .recv()
                .map_err(|_| anyhow!("input listener stopped unexpectedly")),
        }
    }
}

/// Guard that keeps Escape-to-cancel armed while alive.
pub struct EscapeWatch {
    armed: Arc<AtomicBool>,
    token: CancelToken,
}

impl EscapeWatch {
    pub fn token(&self) -> &CancelToken {
        &self.token
    }
}

impl Drop for EscapeWatch {
    fn drop(&mut self) {
        self.armed.store(false, Ordering::SeqCst);
    }
}

/// Production pointer backed by rdev's event synthesis. A short pause
/// follows every synthetic event so the OS queue and the target app keep
/// up with the click stream.
pub struct RdevPointer {
    delay: Duration,
}

impl RdevPointer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
        }
    }

    fn send(&self, event: &EventType) -> Result<()> {
        rdev::simulate(event).map_err(|e| anyhow!("failed to simulate {:?}: {:?}", event, e))?;
        thread::sleep(self.delay);
        Ok(())
    }
}

impl Pointer for RdevPointer {
    fn move_to(&mut self, pos: Point) -> Result<()> {
        self.send(&EventType::MouseMove {
            x: pos.x as f64,
            y: pos.y as f64,
        })
    }

    fn click(&mut self, kind: ClickKind) -> Result<()> {
        self.send(&EventType::ButtonPress(Button::Left))?;
        if kind == ClickKind::Full {
            self.send(&EventType::ButtonRelease(Button::Left))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clicks_before_any_movement_are_dropped() {
        let (tx, rx) = unbounded();
        let armed = AtomicBool::new(false);
        let cancel = CancelToken::new();
        let mut last_pos = None;

        // No MouseMove observed yet: the press has no position to report.
        route_event(
            &EventType::ButtonPress(Button::Left),
            &mut last_pos,
            &tx,
            &armed,
            &cancel,
        );
        assert!(rx.try_recv().is_err());

        route_event(
            &EventType::MouseMove { x: 320.0, y: 240.0 },
            &mut last_pos,
            &tx,
            &armed,
            &cancel,
        );
        route_event(
            &EventType::ButtonPress(Button::Left),
            &mut last_pos,
            &tx,
            &armed,
            &cancel,
        );
        assert_eq!(rx.try_recv().unwrap(), Point::new(320, 240));
    }

    #[test]
    fn test_escape_only_cancels_while_armed() {
        let (tx, _rx) = unbounded();
        let armed = AtomicBool::new(false);
        let cancel = CancelToken::new();
        let mut last_pos = None;

        route_event(
            &EventType::KeyPress(Key::Escape),
            &mut last_pos,
            &tx,
            &armed,
            &cancel,
        );
        assert!(!cancel.is_cancelled());

        armed.store(true, Ordering::SeqCst);
        route_event(
            &EventType::KeyPress(Key::Escape),
            &mut last_pos,
            &tx,
            &armed,
            &cancel,
        );
        assert!(cancel.is_cancelled());
    }

    #[test]
    fn test_escape_watch_disarms_on_drop() {
        let armed = Arc::new(AtomicBool::new(true));
        let token = CancelToken::new();
        let watch = EscapeWatch {
            armed: Arc::clone(&armed),
            token: token.clone(),
        };
        assert!(armed.load(Ordering::SeqCst));
        drop(watch);
        assert!(!armed.load(Ordering::SeqCst));
    }

    #[test]
    fn test_cancel_token_single_writer() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        let writer = token.clone();
        writer.cancel();
        assert!(token.is_cancelled());
        token.reset();
        assert!(!token.is_cancelled());
    }
}
