//! Live system snapshot for the System Info pages.
//!
//! Probing the OS means shelling out, which can take hundreds of
//! milliseconds on a Pi Zero. `SnapshotFeed` keeps that off the main
//! loop: a worker thread runs the provider on request and the loop
//! only ever looks at the newest cached result.

use std::fs;
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};
use log::{debug, info, warn};

use crate::config::PROBE_TIMEOUT_MS;
use crate::error::{Error, Result};
use crate::ui::menu::SnapshotPage;

/// Longest value kept per field; wider text would be clipped anyway.
pub const FIELD_LEN: usize = 24;

pub type Field = heapless::String<FIELD_LEN>;

pub const FETCHING_TEXT: &str = "Fetching...";
pub const UNAVAILABLE_TEXT: &str = "Info\nunavailable";

/// Copy `s` into a field, dropping whatever does not fit.
pub fn field(s: &str) -> Field {
    let mut out = Field::new();
    for c in s.trim().chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// One reading of the system, already formatted for display.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SystemSnapshot {
    pub ip: Field,
    pub temperature: Field,
    pub uptime: Field,
    pub memory: Field,
    pub cpu_load: Field,
}

impl SystemSnapshot {
    pub fn page_text(&self, page: SnapshotPage) -> String {
        match page {
            SnapshotPage::Network => format!("IP {}\nTemp {}", self.ip, self.temperature),
            SnapshotPage::Load => format!(
                "Up {}\nMem {}\nLoad {}",
                self.uptime, self.memory, self.cpu_load
            ),
        }
    }
}

/// Source of system snapshots.
pub trait SystemInfoProvider {
    fn fetch(&mut self) -> Result<SystemSnapshot>;
}

// ════════════════════════════════════════════════════════════════════════
// Shell provider
// ════════════════════════════════════════════════════════════════════════

/// Probes the running Raspberry Pi OS with stock tools.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShellSystemInfo;

impl SystemInfoProvider for ShellSystemInfo {
    fn fetch(&mut self) -> Result<SystemSnapshot> {
        let probes: [(&str, Result<Field>); 5] = [
            ("ip", run("hostname", &["-I"]).and_then(|s| parse_ip(&s))),
            ("temperature", run("vcgencmd", &["measure_temp"]).and_then(|s| parse_temperature(&s))),
            ("uptime", run("uptime", &["-p"]).and_then(|s| parse_uptime(&s))),
            ("memory", run("free", &["-m"]).and_then(|s| parse_memory(&s))),
            ("cpu_load", read_loadavg().and_then(|s| parse_load(&s))),
        ];

        if probes.iter().all(|(_, r)| r.is_err()) {
            return Err(Error::SystemInfo("every probe failed".into()));
        }

        let [ip, temperature, uptime, memory, cpu_load] = probes.map(|(name, result)| {
            result.unwrap_or_else(|e| {
                debug!("SysInfo: {} probe failed: {}", name, e);
                field("n/a")
            })
        });
        Ok(SystemSnapshot {
            ip,
            temperature,
            uptime,
            memory,
            cpu_load,
        })
    }
}

fn run(program: &'static str, args: &[&str]) -> Result<String> {
    run_bounded(program, args, Duration::from_millis(PROBE_TIMEOUT_MS))
}

/// Run `program` and collect its stdout, killing it once `timeout`
/// has passed.
fn run_bounded(program: &'static str, args: &[&str], timeout: Duration) -> Result<String> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| Error::Command { program, source })?;

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if Instant::now() >= deadline => {
                kill(&mut child, program);
                return Err(Error::SystemInfo(format!("{} timed out after {:?}", program, timeout)));
            }
            Ok(None) => thread::sleep(PROBE_POLL),
            Err(source) => {
                kill(&mut child, program);
                return Err(Error::Command { program, source });
            }
        }
    };
    if !status.success() {
        return Err(Error::SystemInfo(format!("{} exited with {}", program, status)));
    }

    let mut stdout = String::new();
    if let Some(mut pipe) = child.stdout.take() {
        pipe.read_to_string(&mut stdout)
            .map_err(|source| Error::Command { program, source })?;
    }
    Ok(stdout)
}

const PROBE_POLL: Duration = Duration::from_millis(10);

fn kill(child: &mut Child, program: &str) {
    if let Err(e) = child.kill() {
        debug!("SysInfo: kill {}: {}", program, e);
    }
    // Reap so no zombie is left behind.
    let _ = child.wait();
}

fn read_loadavg() -> Result<String> {
    fs::read_to_string("/proc/loadavg").map_err(|e| Error::SystemInfo(format!("/proc/loadavg: {}", e)))
}

fn malformed(what: &str, raw: &str) -> Error {
    Error::SystemInfo(format!("unexpected {} output: {:?}", what, raw.trim()))
}

/// First address of `hostname -I`.
pub fn parse_ip(raw: &str) -> Result<Field> {
    raw.split_whitespace()
        .next()
        .map(field)
        .ok_or_else(|| malformed("hostname", raw))
}

/// `temp=48.3'C` → `48.3C`.
pub fn parse_temperature(raw: &str) -> Result<Field> {
    let value = raw
        .trim()
        .strip_prefix("temp=")
        .ok_or_else(|| malformed("vcgencmd", raw))?;
    Ok(field(&value.replace('\'', "")))
}

/// `up 2 hours, 5 minutes` → `2 hours, 5 minutes`.
pub fn parse_uptime(raw: &str) -> Result<Field> {
    let value = raw.trim().strip_prefix("up").map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err(malformed("uptime", raw));
    }
    Ok(field(value))
}

/// `free -m` → `used/totalMB`.
pub fn parse_memory(raw: &str) -> Result<Field> {
    let mem = raw
        .lines()
        .find(|l| l.starts_with("Mem:"))
        .ok_or_else(|| malformed("free", raw))?;
    let mut cols = mem.split_whitespace().skip(1);
    let (Some(total), Some(used)) = (cols.next(), cols.next()) else {
        return Err(malformed("free", raw));
    };
    let total: u64 = total.parse().map_err(|_| malformed("free", raw))?;
    let used: u64 = used.parse().map_err(|_| malformed("free", raw))?;
    Ok(field(&format!("{}/{}MB", used, total)))
}

/// One-minute load average from `/proc/loadavg`.
pub fn parse_load(raw: &str) -> Result<Field> {
    raw.split_whitespace()
        .next()
        .filter(|v| v.parse::<f32>().is_ok())
        .map(field)
        .ok_or_else(|| malformed("loadavg", raw))
}

// ════════════════════════════════════════════════════════════════════════
// Background feed
// ════════════════════════════════════════════════════════════════════════

/// What the compositor can show right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapshotView<'a> {
    /// Nothing fetched yet.
    Pending,
    Ready(&'a SystemSnapshot),
    /// The most recent fetch failed.
    Unavailable,
}

impl SnapshotView<'_> {
    pub fn page_text(&self, page: SnapshotPage) -> String {
        match self {
            SnapshotView::Pending => FETCHING_TEXT.to_owned(),
            SnapshotView::Ready(snapshot) => snapshot.page_text(page),
            SnapshotView::Unavailable => UNAVAILABLE_TEXT.to_owned(),
        }
    }
}

enum Latest {
    Nothing,
    Snapshot(SystemSnapshot),
    Failed,
}

/// Cached snapshot refreshed by a worker thread.
pub struct SnapshotFeed {
    requests: Option<Sender<()>>,
    results: Receiver<Result<SystemSnapshot>>,
    worker: Option<JoinHandle<()>>,
    refresh: Duration,
    latest: Latest,
    fetched_at: Option<Instant>,
    in_flight: bool,
}

impl SnapshotFeed {
    pub fn spawn<P>(mut provider: P, refresh: Duration) -> Result<Self>
    where
        P: SystemInfoProvider + Send + 'static,
    {
        let (request_tx, request_rx) = bounded::<()>(1);
        let (result_tx, result_rx) = bounded(1);

        let worker = thread::Builder::new()
            .name("sysinfo".into())
            .spawn(move || {
                for () in request_rx.iter() {
                    let result = provider.fetch();
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
                debug!("SysInfo: worker exiting");
            })
            .map_err(|source| Error::Thread {
                name: "sysinfo",
                source,
            })?;

        info!("SysInfo: feed started, refresh every {:?}", refresh);
        Ok(Self {
            requests: Some(request_tx),
            results: result_rx,
            worker: Some(worker),
            refresh,
            latest: Latest::Nothing,
            fetched_at: None,
            in_flight: false,
        })
    }

    /// Collect finished fetches and, if `wanted` and the cache is
    /// stale, ask for a new one. Never blocks.
    pub fn poll(&mut self, now: Instant, wanted: bool) {
        match self.results.try_recv() {
            Ok(result) => {
                self.in_flight = false;
                self.fetched_at = Some(now);
                self.latest = match result {
                    Ok(snapshot) => Latest::Snapshot(snapshot),
                    Err(e) => {
                        warn!("SysInfo: {}", e);
                        Latest::Failed
                    }
                };
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                if self.in_flight {
                    warn!("SysInfo: worker gone");
                    self.in_flight = false;
                    self.latest = Latest::Failed;
                }
            }
        }

        if !wanted || self.in_flight || !self.is_stale(now) {
            return;
        }
        let Some(requests) = &self.requests else {
            return;
        };
        match requests.try_send(()) {
            Ok(()) => self.in_flight = true,
            Err(TrySendError::Full(())) => {}
            Err(TrySendError::Disconnected(())) => self.latest = Latest::Failed,
        }
    }

    pub fn view(&self) -> SnapshotView<'_> {
        match &self.latest {
            Latest::Nothing => SnapshotView::Pending,
            Latest::Snapshot(snapshot) => SnapshotView::Ready(snapshot),
            Latest::Failed => SnapshotView::Unavailable,
        }
    }

    /// A fetch has been requested and not yet collected.
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    fn is_stale(&self, now: Instant) -> bool {
        self.fetched_at
            .map_or(true, |t| now.saturating_duration_since(t) >= self.refresh)
    }
}

impl Drop for SnapshotFeed {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop.
        self.requests.take();
        while self.results.try_recv().is_ok() {}
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("SysInfo: worker panicked");
            }
        }
    }
}
