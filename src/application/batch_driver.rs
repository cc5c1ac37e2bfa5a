//! Batch driver.
//!
//! Fans file analyses out over a fixed-width rayon pool and funnels every
//! outcome through one callback thread, which owns the observer.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, info};
use parking_lot::Mutex;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::application::job::JobState;
use crate::application::DriverConfig;
use crate::domain::{MetricResult, TextAnalyzer};
use crate::error::{DriverError, ErrorKind, Result};
use crate::infrastructure::{load_text, ResultCache};
use crate::ports::{BatchEvent, BatchObserver};

/// What a worker hands to the callback thread for one path.
#[derive(Debug)]
enum UnitOutcome {
    Succeeded(String),
    Failed(String, ErrorKind),
}

pub struct BatchDriver {
    config: DriverConfig,
    pool: Mutex<Option<Arc<ThreadPool>>>,
    cache: Arc<ResultCache>,
    // Batches whose units may still be on the pool; the last one is current.
    jobs: Mutex<Vec<Arc<JobState>>>,
    shut_down: AtomicBool,
}

impl BatchDriver {
    pub fn new() -> Result<Self> {
        Self::with_config(DriverConfig::default())
    }

    pub fn with_config(config: DriverConfig) -> Result<Self> {
        let config = config.normalized();
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .thread_name(|i| format!("textstat-worker-{}", i))
            .build()?;
        debug!("[Batch] worker pool ready ({} workers)", config.workers);

        Ok(Self {
            config,
            pool: Mutex::new(Some(Arc::new(pool))),
            cache: Arc::new(ResultCache::new()),
            jobs: Mutex::new(Vec::new()),
            shut_down: AtomicBool::new(false),
        })
    }

    /// Number of units that may execute at once.
    pub fn pool_width(&self) -> usize {
        self.config.workers
    }

    pub fn cache(&self) -> Arc<ResultCache> {
        Arc::clone(&self.cache)
    }

    /// Starts analyzing `paths`, reporting to `observer` on a dedicated callback thread.
    ///
    /// Any batch still running on this driver is cancelled and the cache is
    /// cleared before the first unit is dispatched.
    pub fn run<I, S, O>(&self, paths: I, observer: O) -> Result<BatchHandle<O>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        O: BatchObserver + 'static,
    {
        let mut jobs = self.jobs.lock();
        if self.shut_down.load(Ordering::SeqCst) {
            return Err(DriverError::AlreadyShutDown);
        }
        let pool = self.pool.lock().clone().ok_or(DriverError::AlreadyShutDown)?;

        let paths: Vec<String> = paths.into_iter().map(Into::into).collect();
        let job = Arc::new(JobState::new(paths.len()));

        let (tx, rx) = mpsc::channel();
        let dispatcher = spawn_callback_thread(Arc::clone(&job), rx, observer)?;

        for previous in jobs.iter().filter(|j| !j.is_cancelled()) {
            debug!("[Batch] cancelling superseded batch");
            previous.cancel();
        }
        jobs.retain(|j| j.in_flight() > 0);
        jobs.push(Arc::clone(&job));
        self.cache.clear();

        info!("[Batch] analyzing {} file(s) on {} workers", paths.len(), self.config.workers);

        for path in paths {
            let job = Arc::clone(&job);
            let cache = Arc::clone(&self.cache);
            let tx = tx.clone();
            pool.spawn(move || {
                let _unit = job.unit();
                run_unit(&job, &cache, path, &tx, load_text);
            });
        }

        Ok(BatchHandle { job, dispatcher })
    }

    /// Cancels all work, waits for units still on the pool to return, and
    /// releases the pool. Later `run` calls fail.
    ///
    /// A unit blocked inside a file read holds up shutdown until the read ends.
    pub fn shutdown(&self) {
        self.shut_down.store(true, Ordering::SeqCst);
        let jobs = std::mem::take(&mut *self.jobs.lock());
        for job in &jobs {
            job.cancel();
        }
        let released = self.pool.lock().take().is_some();
        for job in &jobs {
            job.wait_idle();
        }
        if released {
            info!("[Batch] driver shut down");
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }
}

impl Drop for BatchDriver {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Caller's view of a running batch.
pub struct BatchHandle<O> {
    job: Arc<JobState>,
    dispatcher: JoinHandle<O>,
}

impl<O> BatchHandle<O> {
    /// Stops the batch: units that have not committed yet deliver nothing
    /// and leave the cache untouched.
    pub fn cancel(&self) {
        self.job.cancel();
        debug!("[Batch] cancelled at {}/{}", self.job.completed(), self.job.total);
    }

    pub fn is_cancelled(&self) -> bool {
        self.job.is_cancelled()
    }

    pub fn total(&self) -> usize {
        self.job.total
    }

    /// Units whose events have been delivered so far.
    pub fn completed(&self) -> usize {
        self.job.completed()
    }

    /// Highest number of units that were executing at the same time.
    pub fn peak_workers(&self) -> usize {
        self.job.peak()
    }

    /// Waits until every event has been delivered and returns the observer.
    pub fn join(self) -> Result<O> {
        self.dispatcher.join().map_err(|_| DriverError::ObserverPanicked)
    }
}

fn spawn_callback_thread<O>(
    job: Arc<JobState>,
    rx: Receiver<UnitOutcome>,
    mut observer: O,
) -> Result<JoinHandle<O>>
where
    O: BatchObserver + 'static,
{
    let handle = thread::Builder::new()
        .name("textstat-callbacks".to_string())
        .spawn(move || {
            dispatch(&job, rx, &mut observer);
            observer
        })?;
    Ok(handle)
}

/// Delivers events until every worker has dropped its sender.
fn dispatch<O: BatchObserver>(job: &JobState, rx: Receiver<UnitOutcome>, observer: &mut O) {
    if job.total == 0 {
        if !job.is_cancelled() {
            BatchEvent::BatchCompleted.deliver(observer);
        }
        return;
    }

    // Everything received here was committed before any cancel.
    for outcome in rx {
        let event = match outcome {
            UnitOutcome::Succeeded(path) => BatchEvent::FileSucceeded { path },
            UnitOutcome::Failed(path, kind) => BatchEvent::FileFailed { path, kind },
        };
        event.deliver(observer);

        let completed = job.complete_one();
        BatchEvent::ProgressChanged { completed, total: job.total }.deliver(observer);

        if completed == job.total {
            info!("[Batch] complete ({} file(s))", job.total);
            BatchEvent::BatchCompleted.deliver(observer);
        }
    }
}

/// Runs the analyzer, turning a panic into [`ErrorKind::InternalError`].
fn guarded_analysis(
    analyze: impl FnOnce() -> MetricResult,
) -> std::result::Result<MetricResult, ErrorKind> {
    panic::catch_unwind(AssertUnwindSafe(analyze)).map_err(|_| ErrorKind::InternalError)
}

/// One path: read, analyze, then commit the outcome unless cancelled.
fn run_unit<L>(
    job: &JobState,
    cache: &ResultCache,
    path: String,
    tx: &Sender<UnitOutcome>,
    load: L,
) where
    L: FnOnce(&str) -> std::result::Result<String, ErrorKind>,
{
    if job.is_cancelled() {
        debug!("[Batch] {}: skipped, batch cancelled", path);
        return;
    }
    let _active = job.enter();

    let outcome = match load(&path) {
        Ok(text) => {
            if job.is_cancelled() {
                debug!("[Batch] {}: discarded after read", path);
                return;
            }
            guarded_analysis(|| TextAnalyzer::analyze(&text))
        }
        Err(kind) => Err(kind),
    };

    if job.is_cancelled() {
        debug!("[Batch] {}: discarded after analysis", path);
        return;
    }

    let committed = job.commit(|| {
        // A closed channel means the observer panicked; nothing left to notify.
        let _ = match outcome {
            Ok(result) => {
                cache.put(&path, result);
                tx.send(UnitOutcome::Succeeded(path.clone()))
            }
            Err(kind) => tx.send(UnitOutcome::Failed(path.clone(), kind)),
        };
    });
    if !committed {
        debug!("[Batch] {}: discarded, batch cancelled", path);
    }
}
