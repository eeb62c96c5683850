//! The exchange runner: execute, decode, assert, notify.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::decode::Model;
use crate::executor::RequestExecutor;
use crate::request::ApiRequest;
use crate::response::ApiResponse;
use crate::transport::HttpClient;

use super::{
    Assertions, Disposition, Errored, ExchangeError, ExchangeEvent, ExchangeId, ExchangeSetup,
    Failed, Finished, NoAssertions, Started,
};

/// A completed exchange that passed every assertion.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchanged<M> {
    /// Exchange identity
    pub id: ExchangeId,
    /// The raw response
    pub response: ApiResponse,
    /// The decoded model
    pub model: M,
}

/// Result of an exchange whose failures, if any, were not propagated.
#[derive(Debug)]
pub enum Outcome<M> {
    /// Executed, decoded and every assertion held.
    Passed(Exchanged<M>),
    /// Something failed and every listener chose to swallow it.
    Suppressed(ExchangeError),
}

impl<M> Outcome<M> {
    /// Returns true for [`Outcome::Passed`].
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed(_))
    }

    /// The completed exchange, if it passed.
    #[must_use]
    pub fn passed(self) -> Option<Exchanged<M>> {
        match self {
            Self::Passed(exchanged) => Some(exchanged),
            Self::Suppressed(_) => None,
        }
    }

    /// The decoded model, if the exchange passed.
    #[must_use]
    pub fn into_model(self) -> Option<M> {
        self.passed().map(|exchanged| exchanged.model)
    }

    /// The suppressed error, if any.
    #[must_use]
    pub const fn suppressed(&self) -> Option<&ExchangeError> {
        match self {
            Self::Passed(_) => None,
            Self::Suppressed(error) => Some(error),
        }
    }
}

/// Runs exchanges against one transport with one shared [`ExchangeSetup`].
///
/// Every call notifies the set-up's listeners `Started`, then exactly one
/// of `Finished`, `Failed` or `Error`, and lets them decide whether a
/// failure reaches the caller.
///
/// # Example
///
/// ```no_run
/// use bastion_core::decode::Json;
/// use bastion_core::exchange::{Bastion, ExpectStatus};
/// use bastion_core::request::ApiRequest;
/// use bastion_core::transport::ReqwestClient;
///
/// #[derive(serde::Deserialize)]
/// struct Sushi {
///     name: String,
/// }
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let bastion = Bastion::with_defaults(ReqwestClient::new());
/// let outcome = bastion
///     .call::<Json<Sushi>, _>(
///         &ApiRequest::get("https://api.example.com/sushi/1"),
///         ExpectStatus::new([200]),
///     )
///     .await?;
///
/// if let Some(Json(sushi)) = outcome.into_model() {
///     println!("{}", sushi.name);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Bastion<H> {
    executor: RequestExecutor<H>,
    setup: Arc<ExchangeSetup>,
    next_id: AtomicU64,
}

impl<H> Bastion<H> {
    /// Creates a runner sharing `setup`.
    #[must_use]
    pub const fn new(client: H, setup: Arc<ExchangeSetup>) -> Self {
        Self {
            executor: RequestExecutor::new(client),
            setup,
            next_id: AtomicU64::new(1),
        }
    }

    /// Creates a runner with [`ExchangeSetup::default`].
    #[must_use]
    pub fn with_defaults(client: H) -> Self {
        Self::new(client, Arc::new(ExchangeSetup::default()))
    }

    /// The shared set-up.
    #[must_use]
    pub const fn setup(&self) -> &Arc<ExchangeSetup> {
        &self.setup
    }

    /// The executor performing transport calls.
    #[must_use]
    pub const fn executor(&self) -> &RequestExecutor<H> {
        &self.executor
    }
}

impl<H: HttpClient> Bastion<H> {
    /// Runs a full exchange: execute `request`, decode into `M`, check
    /// `assertions`.
    ///
    /// # Errors
    ///
    /// Returns the original [`ExchangeError`] when the listeners propagate
    /// it; a swallowed failure comes back as [`Outcome::Suppressed`].
    pub async fn call<M: Model, A: Assertions<M>>(
        &self,
        request: &ApiRequest,
        assertions: A,
    ) -> Result<Outcome<M>, ExchangeError> {
        let id = self.begin(request);

        let result = match self.executor.execute(request).await {
            Ok(response) => match self.setup.decoders().decode::<M>(&response) {
                Ok(model) => Ok((response, model)),
                Err(e) => Err(ExchangeError::from(e)),
            },
            Err(e) => Err(ExchangeError::from(e)),
        };

        self.conclude(id, request, result, &assertions)
    }

    /// Runs an exchange without decoding; the model is `()` and the raw
    /// response is in [`Exchanged::response`].
    ///
    /// # Errors
    ///
    /// Returns the original [`ExchangeError`] when the listeners propagate it.
    pub async fn fetch(&self, request: &ApiRequest) -> Result<Outcome<()>, ExchangeError> {
        let id = self.begin(request);

        let result = self
            .executor
            .execute(request)
            .await
            .map(|response| (response, ()))
            .map_err(ExchangeError::from);

        self.conclude(id, request, result, &NoAssertions)
    }

    fn begin(&self, request: &ApiRequest) -> ExchangeId {
        let id = ExchangeId::new(self.next_id.fetch_add(1, Ordering::Relaxed));

        tracing::debug!(%id, method = %request.method(), url = request.url(), "Exchange started");
        self.setup
            .dispatcher()
            .dispatch(&ExchangeEvent::Started(Started { id, request }));

        id
    }

    fn conclude<M, A: Assertions<M>>(
        &self,
        id: ExchangeId,
        request: &ApiRequest,
        result: Result<(ApiResponse, M), ExchangeError>,
        assertions: &A,
    ) -> Result<Outcome<M>, ExchangeError> {
        let dispatcher = self.setup.dispatcher();

        let (response, model) = match result {
            Ok(exchanged) => exchanged,
            Err(error) => {
                let disposition = dispatcher.dispatch(&ExchangeEvent::Error(Errored {
                    id,
                    request,
                    error: &error,
                }));
                return settle(id, disposition, error);
            }
        };

        if let Err(failure) = assertions.check(&response, &model) {
            let disposition = dispatcher.dispatch(&ExchangeEvent::Failed(Failed {
                id,
                request,
                response: &response,
                failure: &failure,
            }));
            return settle(id, disposition, ExchangeError::Assertion(failure));
        }

        dispatcher.dispatch(&ExchangeEvent::Finished(Finished {
            id,
            request,
            response: &response,
        }));
        tracing::debug!(%id, status = response.status(), "Exchange finished");

        Ok(Outcome::Passed(Exchanged {
            id,
            response,
            model,
        }))
    }
}

fn settle<M>(
    id: ExchangeId,
    disposition: Option<Disposition>,
    error: ExchangeError,
) -> Result<Outcome<M>, ExchangeError> {
    match disposition {
        Some(Disposition::Swallow) => {
            tracing::warn!(%id, kind = ?error.kind(), "Exchange failure suppressed: {error}");
            Ok(Outcome::Suppressed(error))
        }
        Some(Disposition::Propagate) | None => {
            tracing::debug!(%id, kind = ?error.kind(), "Exchange failure propagated: {error}");
            Err(error)
        }
    }
}
