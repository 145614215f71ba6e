//! Cancellable deferred task for throttle flushes
//!
//! One worker thread per scheduler, started lazily on the first
//! [`FlushScheduler::schedule`] call. Each schedule supersedes the previous
//! one. The callback receives the generation it was scheduled with; the owner
//! compares it with its own generation under its state lock, which makes
//! cancellation exact even when the timer fires concurrently with a new
//! dispatch.

use crossbeam_channel::{unbounded, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use std::thread;
use std::time::{Duration, Instant};

pub type FlushCallback = Box<dyn Fn(u64) + Send + 'static>;

enum TimerCommand {
    Schedule { generation: u64, deadline: Instant },
    Cancel,
}

pub struct FlushScheduler {
    sender: Mutex<Option<Sender<TimerCommand>>>,
    callback: Mutex<Option<FlushCallback>>,
}

impl FlushScheduler {
    pub fn new(callback: FlushCallback) -> Self {
        Self {
            sender: Mutex::new(None),
            callback: Mutex::new(Some(callback)),
        }
    }

    /// Fire the callback with `generation` after `delay`, replacing any
    /// pending schedule
    pub fn schedule(&self, generation: u64, delay: Duration) {
        let command = TimerCommand::Schedule {
            generation,
            deadline: Instant::now() + delay,
        };
        let mut sender = self.sender.lock();
        if sender.is_none() {
            *sender = self.spawn_worker();
        }
        if let Some(ref tx) = *sender {
            if tx.send(command).is_err() {
                eprintln!("[LOGGER ERROR] Throttle timer is gone; pending repeats flush on the next record");
            }
        }
    }

    /// Drop the pending schedule, if any
    pub fn cancel(&self) {
        if let Some(ref tx) = *self.sender.lock() {
            // a disconnected worker holds no schedule to cancel
            let _ = tx.send(TimerCommand::Cancel);
        }
    }

    fn spawn_worker(&self) -> Option<Sender<TimerCommand>> {
        let callback = self.callback.lock().take()?;
        let (tx, rx) = unbounded::<TimerCommand>();

        let spawned = thread::Builder::new()
            .name("console-logger-throttle".to_string())
            .spawn(move || {
                let mut pending: Option<(u64, Instant)> = None;
                loop {
                    let received = match pending {
                        Some((_, deadline)) => rx.recv_deadline(deadline),
                        None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
                    };
                    match received {
                        Ok(TimerCommand::Schedule {
                            generation,
                            deadline,
                        }) => pending = Some((generation, deadline)),
                        Ok(TimerCommand::Cancel) => pending = None,
                        Err(RecvTimeoutError::Timeout) => {
                            if let Some((generation, _)) = pending.take() {
                                callback(generation);
                            }
                        }
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            });

        match spawned {
            Ok(_) => Some(tx),
            Err(e) => {
                eprintln!("[LOGGER ERROR] Failed to start throttle timer thread: {}", e);
                None
            }
        }
    }
}

impl std::fmt::Debug for FlushScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlushScheduler")
            .field("started", &self.sender.lock().is_some())
            .finish()
    }
}
