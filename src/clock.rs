use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const TICK: Duration = Duration::from_millis(100);
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Elapsed play time in tenths of a second.
///
/// The value only moves one tenth per tick, so the host must tick more often
/// than every 100ms for the display to keep up. Stopping applies one last
/// tick so the final reading is within a tenth of real time.
#[derive(Debug, Clone, Default)]
pub struct GameClock {
    started: Option<Instant>,
    tenths: u32,
    running: bool,
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_at(&mut self, now: Instant) {
        self.started = Some(now);
        self.tenths = 0;
        self.running = true;
    }

    /// Advances by one tenth if it is due. Returns whether the value changed.
    pub fn tick_at(&mut self, now: Instant) -> bool {
        if self.running && self.is_due(now) {
            self.tenths += 1;
            true
        } else {
            false
        }
    }

    pub fn stop_at(&mut self, now: Instant) {
        self.tick_at(now);
        self.running = false;
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    pub fn stop(&mut self) {
        self.stop_at(Instant::now());
    }

    fn is_due(&self, now: Instant) -> bool {
        self.started.map_or(false, |started| {
            now.saturating_duration_since(started) > TICK * (self.tenths + 1)
        })
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tenths(&self) -> u32 {
        self.tenths
    }

    pub fn seconds(&self) -> f64 {
        f64::from(self.tenths) / 10.0
    }
}

impl fmt::Display for GameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.tenths / 10, self.tenths % 10)
    }
}

/// Background thread ticking a shared clock every 10ms until dropped.
#[derive(Debug)]
pub struct Ticker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn spawn(clock: Arc<Mutex<GameClock>>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);

        let handle = thread::spawn(move || {
            while !thread_stop.load(Ordering::Relaxed) {
                match clock.lock() {
                    Ok(mut clock) => {
                        clock.tick();
                    }
                    Err(_) => {
                        log::error!("game clock lock poisoned, ticker exiting");
                        break;
                    }
                }
                thread::sleep(POLL_INTERVAL);
            }
        });

        Self {
            stop,
            handle: Some(handle),
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
