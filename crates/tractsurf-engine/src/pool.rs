//! Fork-join task pool.
//!
//! Each call to [`TaskPool::run_strided`] (or its wrappers) splits an
//! output buffer into per-index slots, hands groups of slots to worker
//! threads through a crossbeam channel, and joins before returning.
//! A worker can only touch the slot it was given, so writes are
//! race-free without locks. Threads live for one call; no state
//! persists between calls.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use tractsurf_core::TaskError;

use crate::config::RunConfig;

/// Slots per channel message, relative to the thread count.
const CHUNKS_PER_THREAD: usize = 4;

/// A fixed-size pool of worker threads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaskPool {
    threads: usize,
}

impl Default for TaskPool {
    fn default() -> Self {
        Self::from_config(&RunConfig::default())
    }
}

impl TaskPool {
    /// A pool of `threads` workers (at least one).
    pub fn new(threads: usize) -> Self {
        Self {
            threads: threads.max(1),
        }
    }

    /// A pool sized by [`RunConfig::resolved_thread_count`].
    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(config.resolved_thread_count())
    }

    /// Number of worker threads.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Run `worker(i, slot)` for every `i` in `[0, out.len() / stride)`,
    /// where `slot` is `out[i * stride..(i + 1) * stride]`.
    ///
    /// Every index runs exactly once, in no particular order, and the
    /// call blocks until all have finished. The first error stops the
    /// remaining work and is returned; the contents of `out` are then
    /// unspecified.
    pub fn run_strided<T, F>(
        &self,
        label: &str,
        out: &mut [T],
        stride: usize,
        worker: F,
    ) -> Result<(), TaskError>
    where
        T: Send,
        F: Fn(usize, &mut [T]) -> Result<(), TaskError> + Sync,
    {
        if stride == 0 || out.len() % stride != 0 {
            return Err(TaskError::InvalidStride {
                label: label.to_string(),
                len: out.len(),
                stride,
            });
        }
        let n = out.len() / stride;
        if n == 0 {
            return Ok(());
        }
        let threads = self.threads.min(n);
        tracing::debug!(label, tasks = n, threads, "dispatching stage");

        if threads == 1 {
            for (i, slot) in out.chunks_mut(stride).enumerate() {
                worker(i, slot)?;
            }
            return Ok(());
        }

        let per_message = (n / (threads * CHUNKS_PER_THREAD)).max(1);
        let (tx, rx) = crossbeam_channel::unbounded::<(usize, &mut [T])>();
        for (k, chunk) in out.chunks_mut(stride * per_message).enumerate() {
            if tx.send((k * per_message, chunk)).is_err() {
                break;
            }
        }
        drop(tx);

        let abort = AtomicBool::new(false);
        let first_error: Mutex<Option<TaskError>> = Mutex::new(None);
        std::thread::scope(|scope| {
            for _ in 0..threads {
                let rx = rx.clone();
                let worker = &worker;
                let abort = &abort;
                let first_error = &first_error;
                scope.spawn(move || {
                    while let Ok((start, chunk)) = rx.recv() {
                        if abort.load(Ordering::Acquire) {
                            return;
                        }
                        for (k, slot) in chunk.chunks_mut(stride).enumerate() {
                            if let Err(e) = worker(start + k, slot) {
                                abort.store(true, Ordering::Release);
                                let mut guard =
                                    first_error.lock().unwrap_or_else(PoisonError::into_inner);
                                if guard.is_none() {
                                    *guard = Some(e);
                                }
                                return;
                            }
                        }
                    }
                });
            }
        });

        match first_error
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
        {
            Some(e) => {
                tracing::debug!(label, error = %e, "stage aborted");
                Err(e)
            }
            None => Ok(()),
        }
    }

    /// Run `worker(i, &mut out[i])` for every index of `out`.
    pub fn run_into<T, F>(&self, label: &str, out: &mut [T], worker: F) -> Result<(), TaskError>
    where
        T: Send,
        F: Fn(usize, &mut T) -> Result<(), TaskError> + Sync,
    {
        self.run_strided(label, out, 1, |i, slot| match slot.first_mut() {
            Some(value) => worker(i, value),
            None => Err(TaskError::failed(label, i, "empty slot")),
        })
    }

    /// Run `worker(i)` for every `i` in `[0, n)` and collect the results
    /// in index order.
    pub fn run<T, F>(&self, n: usize, label: &str, worker: F) -> Result<Vec<T>, TaskError>
    where
        T: Send,
        F: Fn(usize) -> Result<T, TaskError> + Sync,
    {
        let mut slots: Vec<Option<T>> = (0..n).map(|_| None).collect();
        self.run_into(label, &mut slots, |i, slot| {
            *slot = Some(worker(i)?);
            Ok(())
        })?;
        slots
            .into_iter()
            .enumerate()
            .map(|(i, slot)| slot.ok_or_else(|| TaskError::failed(label, i, "slot not written")))
            .collect()
    }
}
