//! Scan Worker
//!
//! Runs a scan session on a background thread. The caller submits one batch
//! of OCR output per tick and reads the published guess from shared state.

use anyhow::{Context, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::search::ScanSession;
use crate::shared::{ScanCommand, ScanEvent, SharedScanState, TickReport};
use crate::vision::TextObservation;

/// "Search in progress" flag.
///
/// Only one tick is in flight at a time; batches arriving meanwhile are
/// dropped rather than queued.
#[derive(Debug, Default)]
pub struct SearchGate {
    busy: AtomicBool,
}

impl SearchGate {
    /// Claim the gate, false if a search is already running
    pub fn try_enter(&self) -> bool {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn leave(&self) {
        self.busy.store(false, Ordering::Release);
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Background scan coordinator
pub struct ScanWorker {
    /// State published by the worker thread
    pub shared_state: Arc<RwLock<SharedScanState>>,
    /// Events from the worker thread
    pub events: Receiver<ScanEvent>,
    /// Channel to send commands to the worker
    commands: Sender<ScanCommand>,
    gate: Arc<SearchGate>,
    handle: Option<JoinHandle<()>>,
}

impl ScanWorker {
    /// Start a worker over the given catalog
    pub fn start(catalog: Arc<Catalog>, config: AppConfig) -> Result<Self> {
        config.validate().context("Refusing to start scan worker")?;
        let session = ScanSession::new(catalog, config.session());
        let shared_state = Arc::new(RwLock::new(SharedScanState::new(config)));
        let gate = Arc::new(SearchGate::default());
        let (commands, command_rx) = unbounded();
        let (event_tx, events) = unbounded();

        shared_state.write().runtime.is_running = true;

        let thread_state = shared_state.clone();
        let thread_gate = gate.clone();
        let handle = std::thread::Builder::new()
            .name("scan-worker".to_string())
            .spawn(move || {
                info!("Scan worker starting...");
                run_worker(session, command_rx, event_tx, thread_state, thread_gate);
                info!("Scan worker exiting...");
            })
            .context("Failed to spawn scan worker thread")?;

        info!("Scan worker started in background thread");

        Ok(Self {
            shared_state,
            events,
            commands,
            gate,
            handle: Some(handle),
        })
    }

    /// Submit one tick of OCR output.
    ///
    /// Returns false when the batch was dropped because the previous tick is
    /// still being processed or the worker is gone.
    pub fn submit(&self, batch: Vec<TextObservation>) -> bool {
        if !self.gate.try_enter() {
            self.shared_state.write().runtime.dropped_ticks += 1;
            warn!("Search in progress, dropping tick");
            return false;
        }

        if self.commands.send(ScanCommand::Tick(batch)).is_err() {
            self.gate.leave();
            self.shared_state
                .write()
                .runtime
                .set_error("Scan worker is not running");
            return false;
        }
        true
    }

    /// Clear all evidence
    pub fn reset(&self) {
        let _ = self.commands.send(ScanCommand::Reset);
    }

    /// Get current shared state
    pub fn state(&self) -> Arc<RwLock<SharedScanState>> {
        self.shared_state.clone()
    }

    /// Whether a tick is currently being processed
    pub fn is_searching(&self) -> bool {
        self.gate.is_busy()
    }

    /// Check if the worker thread is running
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for ScanWorker {
    fn drop(&mut self) {
        // Signal worker to stop
        let _ = self.commands.send(ScanCommand::Shutdown);

        // Wait for worker thread to finish
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run_worker(
    mut session: ScanSession,
    commands: Receiver<ScanCommand>,
    events: Sender<ScanEvent>,
    state: Arc<RwLock<SharedScanState>>,
    gate: Arc<SearchGate>,
) {
    let _ = events.send(ScanEvent::Started);

    while let Ok(command) = commands.recv() {
        match command {
            ScanCommand::Tick(batch) => {
                let previous = state.read().runtime.guess;
                session.ingest(&batch);
                let guess = session.best_guess();
                let label = session.describe(guess);
                let changed = guess != previous;
                if changed {
                    info!("Scan guess changed: {:?} {}", guess, label);
                }

                let report = TickReport {
                    tick: session.ticks(),
                    guess,
                    label: label.clone(),
                    changed,
                };
                {
                    let mut state = state.write();
                    state.runtime.ticks_processed = session.ticks();
                    state.runtime.set_guess(guess, label);
                }
                gate.leave();
                let _ = events.send(ScanEvent::TickProcessed(report));
            }
            ScanCommand::Reset => {
                debug!("Resetting scan session");
                session.reset();
                state.write().runtime.reset_scan();
                let _ = events.send(ScanEvent::Reset);
            }
            ScanCommand::Shutdown => break,
        }
    }

    state.write().runtime.is_running = false;
    let _ = events.send(ScanEvent::Stopped);
}
