// HTTP plumbing to the model backends: one GET per model, body returned as text

use futures::future::join_all;
use reqwest::Client;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

/// Display form is the bare status code or transport message so that panels
/// read `Error: 500` / `Error: <message>`.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{0}")]
    Status(u16),
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

/// One GET against one model backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub model_id: &'static str,
    pub url: String,
}

/// Work produced by an accepted submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Independent variant: a single model's own prompt
    Single(Request),
    /// Shared variant: the same prompt to every model, settled together
    Fanout(Vec<Request>),
}

/// Settled result of a submission, already converted to panel text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Single {
        model_id: &'static str,
        text: String,
        /// False when `text` is an error rather than a body
        ok: bool,
    },
    Fanout(Vec<(&'static str, String)>),
}

pub fn error_text(err: &BackendError) -> String {
    format!("Error: {}", err)
}

#[derive(Debug, Clone)]
pub struct Backend {
    client: Client,
}

impl Backend {
    /// No timeout and no default headers: a hung backend stays hung.
    pub fn new() -> Result<Self, BackendError> {
        let client = Client::builder().build()?;
        Ok(Self { client })
    }

    pub async fn fetch_text(&self, url: &str) -> Result<String, BackendError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status.as_u16()));
        }

        // Always UTF-8, whatever charset the Content-Type claims
        let bytes = response.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Panel text for a request. `Err` carries the `Error: …` text.
    pub async fn fetch_display(&self, request: &Request) -> Result<String, String> {
        match self.fetch_text(&request.url).await {
            Ok(body) => {
                debug!(model = request.model_id, bytes = body.len(), "response received");
                Ok(body)
            }
            Err(e) => {
                warn!(model = request.model_id, error = %e, "request failed");
                Err(error_text(&e))
            }
        }
    }

    pub async fn execute(&self, submission: Submission) -> Outcome {
        match submission {
            Submission::Single(request) => {
                let result = self.fetch_display(&request).await;
                Outcome::Single {
                    model_id: request.model_id,
                    ok: result.is_ok(),
                    text: result.unwrap_or_else(|e| e),
                }
            }
            Submission::Fanout(requests) => {
                // Each future resolves to text, so one failure cannot cancel the rest
                let results = join_all(requests.iter().map(|request| async move {
                    let text = self.fetch_display(request).await.unwrap_or_else(|e| e);
                    (request.model_id, text)
                }))
                .await;
                info!(models = results.len(), "fan-out settled");
                Outcome::Fanout(results)
            }
        }
    }
}

/// Run a submission on the runtime and hand its outcome back to the view.
pub fn dispatch(backend: &Backend, submission: Submission, outcomes: UnboundedSender<Outcome>) {
    let backend = backend.clone();
    tokio::spawn(async move {
        let outcome = backend.execute(submission).await;
        if outcomes.send(outcome).is_err() {
            debug!("view closed before outcome arrived");
        }
    });
}
