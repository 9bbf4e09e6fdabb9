use super::{ApplicationError, CommandResult, Request, Response, execute};
use crate::application::ledger::Ledger;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::error;

/// Runs commands concurrently on the runtime, at most `workers` at a time.
///
/// Every command is its own task. A command that panics is reported as a
/// technical error; the other commands and the ledger are unaffected.
#[derive(Clone)]
pub struct CommandExecutor {
    ledger: Ledger,
    permits: Arc<Semaphore>,
}

impl CommandExecutor {
    pub fn new(ledger: Ledger, workers: usize) -> Self {
        Self {
            ledger,
            permits: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub async fn execute(&self, request: Request) -> CommandResult<Response> {
        self.execute_all(vec![request])
            .await
            .pop()
            .unwrap_or(CommandResult::Application(ApplicationError::TechnicalError))
    }

    /// Runs all requests concurrently. Results come back in request order.
    pub async fn execute_all(&self, requests: Vec<Request>) -> Vec<CommandResult<Response>> {
        let handles: Vec<_> = requests
            .into_iter()
            .map(|request| {
                let ledger = self.ledger.clone();
                let permits = Arc::clone(&self.permits);
                tokio::spawn(async move {
                    // The semaphore is never closed, so acquisition only waits.
                    let _permit = permits.acquire_owned().await.ok();
                    execute(&ledger, request).await
                })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(join_error) => {
                    error!(error = %join_error, "error occurred during command execution");
                    CommandResult::Application(ApplicationError::TechnicalError)
                }
            };
            results.push(result);
        }
        results
    }
}
