//! Hands submitted payloads from the UI thread to the tokio runtime and
//! brings the results back.
//!
//! The form's submit handler only queues the payload. Each frame the window
//! calls `dispatch`, which spawns one task per queued payload, and `poll`,
//! which yields finished results. A task whose form was dropped in the
//! meantime discards its result.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::future::Future;
use std::rc::Rc;

use deskform::{FormValues, MountToken};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

pub struct SubmitBridge<T> {
    handle: Handle,
    queued: Rc<RefCell<VecDeque<FormValues>>>,
    results_tx: mpsc::UnboundedSender<anyhow::Result<T>>,
    results_rx: mpsc::UnboundedReceiver<anyhow::Result<T>>,
    in_flight: usize,
}

impl<T: Send + 'static> SubmitBridge<T> {
    pub fn new(handle: Handle) -> Self {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        Self {
            handle,
            queued: Rc::default(),
            results_tx,
            results_rx,
            in_flight: 0,
        }
    }

    /// Submit handler for the form: queues the payload for `dispatch`.
    pub fn submit_handler(&self) -> impl FnMut(FormValues) + 'static {
        let queued = Rc::clone(&self.queued);
        move |values| queued.borrow_mut().push_back(values)
    }

    /// Spawn `work` for every queued payload.
    pub fn dispatch<F, Fut>(&mut self, token: &MountToken, mut work: F) -> Vec<JoinHandle<()>>
    where
        F: FnMut(FormValues) -> Fut,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let mut spawned = Vec::new();
        loop {
            let Some(payload) = self.queued.borrow_mut().pop_front() else {
                break;
            };
            let task = work(payload);
            let token = token.clone();
            let tx = self.results_tx.clone();
            self.in_flight += 1;
            spawned.push(self.handle.spawn(async move {
                let result = task.await;
                if token.is_mounted() {
                    let _ = tx.send(result);
                } else {
                    debug!("form is gone, dropping submit result");
                }
            }));
        }
        spawned
    }

    /// A finished result, if any arrived.
    pub fn poll(&mut self) -> Option<anyhow::Result<T>> {
        let result = self.results_rx.try_recv().ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(result)
    }

    /// Number of dispatched tasks whose result has not been polled yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn queued(&self) -> usize {
        self.queued.borrow().len()
    }

    /// A payload is waiting or being saved.
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0 || self.queued() > 0
    }
}
