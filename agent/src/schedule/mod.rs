//! Job scheduling
//!
//! A single-threaded scheduler: it sleeps until the soonest due job, runs
//! everything that is due to completion, then sleeps again. Cycles never
//! overlap because the loop awaits each job before reconsidering due times.

pub mod interval;

pub use interval::IntervalSpec;

use anyhow::Result;
use chrono::Local;
use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, info};

type JobFuture = Pin<Box<dyn Future<Output = Result<()>> + Send>>;
type JobFn = Box<dyn Fn() -> JobFuture + Send>;

struct Job {
    name: String,
    every: Duration,
    next_due: Instant,
    run: JobFn,
}

pub struct Scheduler {
    jobs: Vec<Job>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self { jobs: Vec::new() }
    }

    /// Register a recurring job. The first run is one interval from now.
    pub fn register<F, Fut>(&mut self, name: &str, interval: &IntervalSpec, job: F)
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.register_every(name, interval.to_duration(), job);
    }

    fn register_every<F, Fut>(&mut self, name: &str, every: Duration, job: F)
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.jobs.push(Job {
            name: name.to_string(),
            every,
            next_due: Instant::now() + every,
            run: Box::new(move || Box::pin(job())),
        });
    }

    /// Recurring mode: sleep until the soonest due job, run everything that
    /// is due, repeat. Returns only when no jobs are registered.
    pub async fn run(&mut self) {
        loop {
            let Some(idle) = self.idle_duration(Instant::now()) else {
                info!("No jobs registered, scheduler exiting");
                break;
            };

            if idle > Duration::ZERO {
                let wake = Local::now() + chrono::Duration::milliseconds(idle.as_millis() as i64);
                info!("Sleeping until {}", wake.format("%Y-%m-%d %H:%M:%S"));
                sleep(idle).await;
            }

            self.run_pending().await;
        }
    }

    /// One-shot mode: run every job exactly once, in registration order.
    pub async fn run_all(&mut self) {
        for job in &mut self.jobs {
            debug!("Running job {}", job.name);
            if let Err(e) = (job.run)().await {
                error!("Job {} failed: {:#}", job.name, e);
            }
        }
    }

    async fn run_pending(&mut self) {
        let now = Instant::now();
        for job in &mut self.jobs {
            if job.next_due <= now {
                debug!("Running job {}", job.name);
                if let Err(e) = (job.run)().await {
                    error!("Job {} failed: {:#}", job.name, e);
                }
                // Next run counts from completion, drift is accepted
                job.next_due = Instant::now() + job.every;
            }
        }
    }

    fn idle_duration(&self, now: Instant) -> Option<Duration> {
        self.jobs
            .iter()
            .map(|job| job.next_due)
            .min()
            .map(|due| due.saturating_duration_since(now))
    }
}
