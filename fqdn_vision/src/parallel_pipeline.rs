// THEORY:
// The `parallel_pipeline` runs the locator over many screenshots at once. Every
// screenshot's pipeline is independent (no shared mutable state, no cross-image
// interaction), so the only coordination needed is a bound on how many run together.
//
// The locator is synchronous and CPU bound (plus a blocking wait on the OCR process),
// so each image runs on tokio's blocking pool. A semaphore sized to the worker count
// (the CPU count by default) keeps at most that many in flight. Results are returned in
// submission order regardless of completion order.

use crate::core_modules::raster::raster::Raster;
use crate::core_modules::recognizer::Recognizer;
use crate::error::{VisionError, VisionResult};
use crate::pipeline::AddressBarLocator;
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::debug;

/// The result for one screenshot in a batch.
#[derive(Debug)]
pub struct ImageOutcome {
    pub path: PathBuf,
    pub result: VisionResult<Option<String>>,
}

/// Runs a shared locator over many screenshots with bounded concurrency.
pub struct WorkerPool<R: Recognizer + 'static> {
    locator: Arc<AddressBarLocator<R>>,
    permits: Arc<Semaphore>,
    workers: usize,
}

impl<R: Recognizer + 'static> WorkerPool<R> {
    /// `workers == 0` means one worker per logical CPU.
    pub fn new(locator: AddressBarLocator<R>, workers: usize) -> Self {
        let workers = if workers == 0 { num_cpus::get() } else { workers };
        Self {
            locator: Arc::new(locator),
            permits: Arc::new(Semaphore::new(workers)),
            workers,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    async fn run_blocking<T, F>(&self, job: F) -> VisionResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&AddressBarLocator<R>) -> VisionResult<T> + Send + 'static,
    {
        let _permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| VisionError::WorkerPool {
                message: "worker pool is closed".to_string(),
            })?;
        let locator = Arc::clone(&self.locator);
        tokio::task::spawn_blocking(move || job(locator.as_ref()))
            .await
            .map_err(|e| VisionError::WorkerPool {
                message: format!("worker task failed: {e}"),
            })?
    }

    /// Locates the FQDN in one decoded screenshot.
    pub async fn locate(&self, raster: Raster) -> VisionResult<Option<String>> {
        self.run_blocking(move |locator| locator.locate(&raster)).await
    }

    /// Decodes the image file and locates its FQDN, both on a worker.
    pub async fn locate_file(&self, path: &Path) -> VisionResult<Option<String>> {
        let path = path.to_path_buf();
        self.run_blocking(move |locator| {
            let image = image::open(&path)?;
            debug!(path = %path.display(), "decoded");
            locator.locate(&Raster::from_dynamic(&image))
        })
        .await
    }

    /// Processes every file, returning outcomes in the order the paths were given.
    pub async fn locate_files(&self, paths: Vec<PathBuf>) -> Vec<ImageOutcome> {
        debug!(images = paths.len(), workers = self.workers, "batch started");
        let jobs = paths.into_iter().map(|path| async move {
            let result = self.locate_file(&path).await;
            ImageOutcome { path, result }
        });
        join_all(jobs).await
    }
}
