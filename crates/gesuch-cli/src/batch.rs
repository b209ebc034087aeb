use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use gesuch_core::ExtractionResult;
use gesuch_ingest::DocumentPipeline;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// One document to extract.
#[derive(Debug, Clone)]
pub struct Job {
    pub path: PathBuf,
    pub mime_type: String,
}

/// Guess a MIME type from the file extension.
pub fn guess_mime(path: &std::path::Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Extract every job on the blocking pool, at most `workers` at a time.
///
/// Results come back in job order. A job exceeding `timeout` gets a failure
/// envelope; its blocking thread is left to finish on its own and keeps its
/// worker slot until it does.
pub async fn run_batch(
    pipeline: Arc<DocumentPipeline>,
    jobs: Vec<Job>,
    workers: usize,
    timeout: Option<Duration>,
) -> Vec<ExtractionResult> {
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));

    let handles: Vec<_> = jobs
        .into_iter()
        .map(|job| {
            let pipeline = Arc::clone(&pipeline);
            let semaphore = Arc::clone(&semaphore);
            tokio::spawn(async move {
                let Ok(permit) = semaphore.acquire_owned().await else {
                    return ExtractionResult::failure("worker pool closed");
                };
                extract_one(pipeline, job, timeout, permit).await
            })
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => ExtractionResult::failure(format!("extraction task failed: {}", e)),
        };
        results.push(result);
    }
    results
}

async fn extract_one(
    pipeline: Arc<DocumentPipeline>,
    job: Job,
    timeout: Option<Duration>,
    permit: OwnedSemaphorePermit,
) -> ExtractionResult {
    let path = job.path.clone();
    let task = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        pipeline.extract(&job.path, &job.mime_type)
    });

    let joined = match timeout {
        Some(limit) => match tokio::time::timeout(limit, task).await {
            Ok(joined) => joined,
            Err(_) => {
                tracing::warn!(path = %path.display(), secs = limit.as_secs(), "extraction timed out");
                return ExtractionResult::failure(format!(
                    "extraction timed out after {}s",
                    limit.as_secs()
                ));
            }
        },
        None => task.await,
    };

    joined.unwrap_or_else(|e| ExtractionResult::failure(format!("extraction task failed: {}", e)))
}
