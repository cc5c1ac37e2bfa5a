use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::{Condvar, Mutex};

/// Shared state of one batch, from submission to its terminal event.
#[derive(Debug)]
pub(crate) struct JobState {
    pub(crate) total: usize,
    completed: AtomicUsize,
    cancelled: AtomicBool,
    // Serializes unit commits against cancel().
    gate: Mutex<()>,
    active: AtomicUsize,
    peak: AtomicUsize,
    // Units spawned but not yet returned from the pool.
    pending: Mutex<usize>,
    idle: Condvar,
}

impl JobState {
    pub(crate) fn new(total: usize) -> Self {
        Self {
            total,
            completed: AtomicUsize::new(0),
            cancelled: AtomicBool::new(false),
            gate: Mutex::new(()),
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            pending: Mutex::new(total),
            idle: Condvar::new(),
        }
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Once this returns, no unit of the job can commit.
    pub(crate) fn cancel(&self) {
        let _gate = self.gate.lock();
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Runs `commit` under the gate unless the job is cancelled.
    /// Returns whether it ran.
    pub(crate) fn commit(&self, commit: impl FnOnce()) -> bool {
        let _gate = self.gate.lock();
        if self.is_cancelled() {
            return false;
        }
        commit();
        true
    }

    /// Records one more delivered unit; returns the new count.
    pub(crate) fn complete_one(&self) -> usize {
        self.completed.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Marks a unit as executing until the guard drops.
    pub(crate) fn enter(&self) -> ActiveGuard<'_> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        ActiveGuard { job: self }
    }

    pub(crate) fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Held by a unit for its whole run on the pool, cancelled or not.
    pub(crate) fn unit(&self) -> UnitGuard<'_> {
        UnitGuard { job: self }
    }

    pub(crate) fn in_flight(&self) -> usize {
        *self.pending.lock()
    }

    /// Blocks until every unit of the job has returned.
    pub(crate) fn wait_idle(&self) {
        let mut pending = self.pending.lock();
        while *pending > 0 {
            self.idle.wait(&mut pending);
        }
    }

    fn finish_unit(&self) {
        let mut pending = self.pending.lock();
        *pending = pending.saturating_sub(1);
        if *pending == 0 {
            self.idle.notify_all();
        }
    }
}

pub(crate) struct UnitGuard<'a> {
    job: &'a JobState,
}

impl Drop for UnitGuard<'_> {
    fn drop(&mut self) {
        self.job.finish_unit();
    }
}

pub(crate) struct ActiveGuard<'a> {
    job: &'a JobState,
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.job.active.fetch_sub(1, Ordering::SeqCst);
    }
}
