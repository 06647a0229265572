// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Single-slot debounce for auto-saving edits.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub const DEFAULT_QUIET: Duration = Duration::from_millis(500);

enum Msg<T> {
    Schedule(T),
    Cancel,
}

/// Runs `action` with the most recently scheduled value once no new value has
/// been scheduled for the quiet interval. Scheduling again replaces the
/// pending value and restarts the interval. Dropping the debouncer runs any
/// value still pending.
pub struct Debouncer<T: Send + 'static> {
    tx: Option<Sender<Msg<T>>>,
    worker: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F>(quiet: Duration, mut action: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<Msg<T>>();
        let worker = thread::spawn(move || {
            let mut pending: Option<T> = None;
            loop {
                let msg = if pending.is_some() {
                    match rx.recv_timeout(quiet) {
                        Ok(m) => Some(m),
                        Err(RecvTimeoutError::Timeout) => None,
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                } else {
                    match rx.recv() {
                        Ok(m) => Some(m),
                        Err(_) => break,
                    }
                };
                match msg {
                    Some(Msg::Schedule(v)) => pending = Some(v),
                    Some(Msg::Cancel) => pending = None,
                    None => {
                        if let Some(v) = pending.take() {
                            action(v);
                        }
                    }
                }
            }
            if let Some(v) = pending.take() {
                action(v);
            }
        });
        Self {
            tx: Some(tx),
            worker: Some(worker),
        }
    }

    pub fn schedule(&self, value: T) {
        if let Some(tx) = &self.tx {
            if tx.send(Msg::Schedule(value)).is_err() {
                tracing::warn!("debounce worker has stopped; edit dropped");
            }
        }
    }

    pub fn cancel(&self) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(Msg::Cancel);
        }
    }
}

impl<T: Send + 'static> Drop for Debouncer<T> {
    fn drop(&mut self) {
        drop(self.tx.take());
        if let Some(h) = self.worker.take() {
            if h.join().is_err() {
                tracing::error!("debounce worker panicked");
            }
        }
    }
}
