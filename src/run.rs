//! Application execution logic.
//!
//! Sends the configured request once, decodes the body and renders it
//! for standard output.

use std::time::Duration;

use thiserror::Error;

use bastion_core::config::ValidatedConfig;
use bastion_core::decode::TargetKind;
use bastion_core::exchange::{
    Assertions, Bastion, Disposition, Errored, ExchangeError, ExchangeListener, ExchangeSetup,
    ExpectStatus, Failed, Finished, NoAssertions, Outcome, Started,
};
use bastion_core::request::ApiRequest;
use bastion_core::transport::{HttpClient, HttpError, ReqwestClient};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to build the HTTP client.
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] HttpError),

    /// The exchange failed and the failure was propagated.
    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    /// Failed to render the decoded body.
    #[error("Failed to render response: {0}")]
    Render(#[source] serde_json::Error),
}

impl RunError {
    /// Returns true if an expectation on the response did not hold.
    #[must_use]
    pub const fn is_assertion(&self) -> bool {
        matches!(self, Self::Exchange(ExchangeError::Assertion(_)))
    }
}

/// Logs exchange progress and leaves every failure to the caller.
struct LoggingListener;

impl ExchangeListener for LoggingListener {
    fn on_started(&self, event: &Started<'_>) {
        tracing::info!(
            "Exchange {} started: {} {}",
            event.id,
            event.request.method(),
            event.request.url()
        );
    }

    fn on_finished(&self, event: &Finished<'_>) {
        tracing::info!(
            "Exchange {} finished: {} {}",
            event.id,
            event.response.status(),
            event.response.status_text()
        );
    }

    fn on_failed(&self, _event: &Failed<'_>) -> Disposition {
        Disposition::Propagate
    }

    fn on_error(&self, _event: &Errored<'_>) -> Disposition {
        Disposition::Propagate
    }
}

/// Executes the configured request and prints the rendered body.
///
/// # Errors
///
/// Returns an error if:
/// - The HTTP client cannot be built
/// - The exchange fails (transport, decoding or expected status)
/// - The JSON body cannot be rendered
///
/// # Coverage Note
///
/// This function is excluded from coverage because it performs real network I/O.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    let client = create_client(config.timeout)?;
    let bastion = Bastion::new(client, std::sync::Arc::new(create_setup()));

    if let Some(rendered) = exchange(&bastion, &config).await? {
        println!("{rendered}");
    }

    Ok(())
}

/// Creates the reqwest-backed client, forwarding the timeout if configured.
fn create_client(timeout: Option<Duration>) -> Result<ReqwestClient, RunError> {
    match timeout {
        Some(timeout) => ReqwestClient::with_timeout(timeout).map_err(RunError::Client),
        None => Ok(ReqwestClient::new()),
    }
}

/// Default decoders and fail-loud propagation, plus progress logging.
fn create_setup() -> ExchangeSetup {
    ExchangeSetup::default().with_listener(LoggingListener)
}

/// Runs the configured exchange and renders the body.
///
/// Returns `None` when a listener suppressed the failure.
async fn exchange<H: HttpClient>(
    bastion: &Bastion<H>,
    config: &ValidatedConfig,
) -> Result<Option<String>, RunError> {
    if config.expect_status.is_empty() {
        render(bastion, &config.request, config.decode, NoAssertions).await
    } else {
        let expect = ExpectStatus::new(config.expect_status.iter().copied());
        render(bastion, &config.request, config.decode, expect).await
    }
}

async fn render<H, A>(
    bastion: &Bastion<H>,
    request: &ApiRequest,
    decode: TargetKind,
    assertions: A,
) -> Result<Option<String>, RunError>
where
    H: HttpClient,
    A: Assertions<String> + Assertions<serde_json::Value>,
{
    match decode {
        TargetKind::Text => {
            let outcome = bastion.call::<String, _>(request, assertions).await?;
            Ok(suppressed_as_none(outcome))
        }
        TargetKind::Structured => {
            let outcome = bastion
                .call::<serde_json::Value, _>(request, assertions)
                .await?;
            suppressed_as_none(outcome)
                .map(|value| serde_json::to_string_pretty(&value).map_err(RunError::Render))
                .transpose()
        }
    }
}

fn suppressed_as_none<M>(outcome: Outcome<M>) -> Option<M> {
    if let Some(error) = outcome.suppressed() {
        tracing::warn!("Exchange failure suppressed: {error}");
    }
    outcome.into_model()
}
