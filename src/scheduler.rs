//! Periodic tick sources.
//!
//! Two timer threads (redraw, heartbeat) raise boolean flags that the
//! main loop takes once per iteration. A flag is a single bit: ticks
//! the loop did not consume in time collapse into one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::config::Cadence;
use crate::error::{Error, Result};

/// Shortest period a source will run at.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Single-bit readiness signal shared with a timer thread.
#[derive(Clone, Debug, Default)]
pub struct TickFlag(Arc<AtomicBool>);

impl TickFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Clear the flag, returning whether it was set.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Process-wide cancellation flag for the timer threads.
#[derive(Clone, Debug, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn set(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// The flags the main loop consumes.
#[derive(Clone, Debug, Default)]
pub struct TickFlags {
    pub redraw: TickFlag,
    pub heartbeat: TickFlag,
}

/// Owner of the two timer threads.
pub struct Scheduler {
    flags: TickFlags,
    stop: StopSignal,
    workers: Vec<JoinHandle<()>>,
}

impl Scheduler {
    /// Spawn both tick sources.
    pub fn start(cadence: Cadence) -> Result<Self> {
        let mut scheduler = Self {
            flags: TickFlags::default(),
            stop: StopSignal::default(),
            workers: Vec::with_capacity(2),
        };

        let sources = [
            ("redraw-tick", cadence.redraw, scheduler.flags.redraw.clone()),
            ("heartbeat-tick", cadence.heartbeat, scheduler.flags.heartbeat.clone()),
        ];
        for (name, period, flag) in sources {
            let stop = scheduler.stop.clone();
            let handle = thread::Builder::new()
                .name(name.into())
                .spawn(move || run_source(name, period, flag, stop))
                .map_err(|source| Error::Thread { name, source })?;
            scheduler.workers.push(handle);
        }

        info!(
            "Scheduler: redraw every {:?}, heartbeat every {:?}",
            cadence.redraw, cadence.heartbeat
        );
        Ok(scheduler)
    }

    pub fn flags(&self) -> TickFlags {
        self.flags.clone()
    }

    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Signal both sources and wait for them to exit.
    pub fn shutdown(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        if self.workers.is_empty() {
            return;
        }
        self.stop.set();
        for handle in self.workers.drain(..) {
            let name = handle.thread().name().unwrap_or("tick").to_owned();
            if handle.join().is_err() {
                warn!("Scheduler: {} thread panicked", name);
            }
        }
        info!("Scheduler: stopped");
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

fn run_source(name: &str, period: Duration, flag: TickFlag, stop: StopSignal) {
    let period = period.max(MIN_PERIOD);
    debug!("{}: started", name);

    let mut deadline = Instant::now() + period;
    while !stop.is_set() {
        let now = Instant::now();
        if deadline > now {
            thread::sleep(deadline - now);
        }
        if stop.is_set() {
            break;
        }
        flag.raise();

        deadline += period;
        // Overslept by more than a period: resync rather than burst.
        let now = Instant::now();
        if deadline < now {
            deadline = now + period;
        }
    }

    debug!("{}: exiting", name);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cadence(redraw_ms: u64, heartbeat_ms: u64) -> Cadence {
        Cadence {
            redraw: Duration::from_millis(redraw_ms),
            heartbeat: Duration::from_millis(heartbeat_ms),
        }
    }

    #[test]
    fn flag_is_consumed_once() {
        let flag = TickFlag::new();
        assert!(!flag.take());
        flag.raise();
        flag.raise();
        assert!(flag.is_raised());
        assert!(flag.take());
        assert!(!flag.take());
    }

    #[test]
    fn clones_share_state() {
        let flag = TickFlag::new();
        let other = flag.clone();
        other.raise();
        assert!(flag.take());
        assert!(!other.is_raised());

        let stop = StopSignal::default();
        stop.clone().set();
        assert!(stop.is_set());
    }

    #[test]
    fn redraw_count_tracks_the_period() {
        let period = 50u64;
        let window = Duration::from_secs(2);
        let scheduler = Scheduler::start(cadence(period, 1_000)).unwrap();
        let flags = scheduler.flags();

        let start = Instant::now();
        let mut redraws = 0u64;
        while start.elapsed() < window {
            if flags.redraw.take() {
                redraws += 1;
            }
            thread::sleep(Duration::from_millis(1));
        }
        scheduler.shutdown();

        let expected = window.as_millis() as u64 / period;
        // Never faster than the cadence.
        assert!(redraws <= expected + 1, "{} redraws in {:?}", redraws, window);
        // One tick of slack for the partial first period, one for a resync.
        assert!(redraws >= expected.saturating_sub(2), "{} redraws in {:?}", redraws, window);
    }

    #[test]
    fn unconsumed_ticks_do_not_accumulate() {
        let scheduler = Scheduler::start(cadence(5, 5)).unwrap();
        let flags = scheduler.flags();
        thread::sleep(Duration::from_millis(60));
        assert!(flags.redraw.take());
        assert!(!flags.redraw.take());
        scheduler.shutdown();
    }

    #[test]
    fn shutdown_stops_both_sources() {
        let scheduler = Scheduler::start(cadence(5, 5)).unwrap();
        let flags = scheduler.flags();
        let stop = scheduler.stop_signal();
        scheduler.shutdown();
        assert!(stop.is_set());

        flags.redraw.take();
        flags.heartbeat.take();
        thread::sleep(Duration::from_millis(30));
        assert!(!flags.redraw.is_raised());
        assert!(!flags.heartbeat.is_raised());
    }

    #[test]
    fn drop_joins_threads() {
        let stop = {
            let scheduler = Scheduler::start(cadence(5, 5)).unwrap();
            scheduler.stop_signal()
        };
        assert!(stop.is_set());
    }
}
