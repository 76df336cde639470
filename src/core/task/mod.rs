//! 后台任务池 - fire-and-forget execution for long-running work
//!
//! Training and whole-video translation run off the caller's path. The
//! caller gets a task id back immediately; completion is observed by
//! re-querying persisted state. Tasks are not cancellable once queued.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread::JoinHandle;

use crossbeam_channel::{unbounded, Sender};
use log::{debug, error, info};
use uuid::Uuid;

/// Identifier handed back at submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskId(String);

impl TaskId {
    fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

type Job = Box<dyn FnOnce(TaskId) + Send + 'static>;

/// Fixed-size worker pool over an MPMC queue. A panicking job is caught
/// and logged at the task boundary; the worker survives and the task
/// ends silently from the caller's perspective.
pub struct WorkerPool {
    sender: Option<Sender<(String, TaskId, Job)>>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn new() -> Self {
        Self::with_threads(num_cpus::get().min(4))
    }

    pub fn with_threads(threads: usize) -> Self {
        let (sender, receiver) = unbounded::<(String, TaskId, Job)>();

        let mut workers = Vec::new();
        for i in 0..threads.max(1) {
            let receiver = receiver.clone();
            let builder = std::thread::Builder::new().name(format!("sign-worker-{}", i));
            match builder.spawn(move || {
                while let Ok((label, id, job)) = receiver.recv() {
                    debug!("⚙️ task '{}' ({}) started", label, id);
                    let task_id = id.clone();
                    if catch_unwind(AssertUnwindSafe(move || job(task_id))).is_err() {
                        error!("❌ task '{}' ({}) panicked", label, id);
                    } else {
                        debug!("⚙️ task '{}' ({}) finished", label, id);
                    }
                }
            }) {
                Ok(handle) => workers.push(handle),
                Err(e) => error!("❌ failed to spawn worker thread: {}", e),
            }
        }

        Self {
            sender: Some(sender),
            workers,
        }
    }

    /// Queue a job and return immediately. The job receives its own
    /// task id so it can tag whatever it persists.
    pub fn submit<F>(&self, label: &str, job: F) -> TaskId
    where
        F: FnOnce(TaskId) + Send + 'static,
    {
        let id = TaskId::generate();
        info!("📦 queued task '{}' ({})", label, id);
        if let Some(sender) = &self.sender {
            if sender
                .send((label.to_string(), id.clone(), Box::new(job)))
                .is_err()
            {
                error!("❌ task '{}' dropped: worker pool is shut down", label);
            }
        }
        id
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // closing the channel lets workers drain the queue and exit
        self.sender.take();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_submitted_job_runs() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let pool = WorkerPool::with_threads(2);
            let counter = Arc::clone(&counter);
            pool.submit("count", move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });
            // pool drop joins workers after the queue drains
        }
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_distinct_task_ids() {
        let pool = WorkerPool::with_threads(1);
        let a = pool.submit("a", |_| {});
        let b = pool.submit("b", |_| {});
        assert_ne!(a, b);
    }

    #[test]
    fn test_job_sees_its_own_id() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let pool = WorkerPool::with_threads(1);
        let id = pool.submit("echo", move |task_id| {
            let _ = tx.send(task_id);
        });

        let seen = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(seen, id);
    }

    #[test]
    fn test_panicking_job_does_not_kill_worker() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let pool = WorkerPool::with_threads(1);
            pool.submit("boom", |_| panic!("intentional"));
            let counter = Arc::clone(&counter);
            pool.submit("after", move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
