use std::{
    future::Future,
    pin::Pin,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::sync::oneshot;

pub type Job = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Runs a job once after a delay.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, job: Job) -> ScheduledTask;
}

/// Handle to a job armed by a [`Scheduler`].
///
/// Cancelling (or dropping) the handle stops the job only while it is
/// still waiting; once the delay has elapsed the job runs to completion.
#[derive(Debug)]
pub struct ScheduledTask {
    cancel: Option<oneshot::Sender<()>>,
    fired: Arc<AtomicBool>,
}

impl ScheduledTask {
    pub fn new(cancel: oneshot::Sender<()>, fired: Arc<AtomicBool>) -> Self {
        Self {
            cancel: Some(cancel),
            fired,
        }
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
    }

    pub fn is_pending(&self) -> bool {
        !self.fired.load(Ordering::Acquire)
            && self.cancel.as_ref().is_some_and(|cancel| !cancel.is_closed())
    }
}

pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, job: Job) -> ScheduledTask {
        let (cancel_tx, cancel_rx) = oneshot::channel();
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);

        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = cancel_rx => return,
            }
            flag.store(true, Ordering::Release);
            job.await;
        });

        ScheduledTask::new(cancel_tx, fired)
    }
}

/// Keeps at most one armed job; arming again replaces the previous one.
pub struct Debouncer {
    delay: Duration,
    pending: Option<ScheduledTask>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn reschedule(&mut self, scheduler: &dyn Scheduler, job: Job) {
        self.cancel();
        self.pending = Some(scheduler.schedule(self.delay, job));
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.pending.take() {
            task.cancel();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(ScheduledTask::is_pending)
    }
}
