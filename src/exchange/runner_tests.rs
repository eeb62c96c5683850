//! Tests for `Bastion` exchanges: ordering, decoding and propagation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde::Deserialize;

use super::{
    AssertionFailure, Bastion, CollectingListener, Disposition, ErrorKind, Errored,
    ExchangeError, ExchangeListener, ExchangeSetup, ExpectStatus, Failed, Finished, NoAssertions,
    Outcome, PropagationPolicy, Started,
};
use crate::decode::{DecodeError, DecoderRegistry, Json, JsonDecoder};
use crate::executor::ExecuteError;
use crate::request::ApiRequest;
use crate::response::ApiResponse;
use crate::transport::{HttpClient, HttpError, HttpRequest, HttpResponse};

#[derive(Debug, Deserialize, PartialEq)]
struct Point {
    x: i64,
}

/// Fake transport answering every call with the same canned result.
struct FakeTransport {
    status: u16,
    content_type: Option<&'static str>,
    body: &'static [u8],
    timeout: bool,
    calls: AtomicUsize,
}

impl FakeTransport {
    fn respond(status: u16, content_type: Option<&'static str>, body: &'static [u8]) -> Self {
        Self {
            status,
            content_type,
            body,
            timeout: false,
            calls: AtomicUsize::new(0),
        }
    }

    fn json_point() -> Self {
        Self::respond(200, Some("application/json"), br#"{"x":1}"#)
    }

    fn timing_out() -> Self {
        Self {
            timeout: true,
            ..Self::respond(200, None, b"")
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl HttpClient for FakeTransport {
    async fn request(&self, _req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.timeout {
            return Err(HttpError::Timeout);
        }

        let mut headers = http::HeaderMap::new();
        if let Some(content_type) = self.content_type {
            headers.append(
                http::header::CONTENT_TYPE,
                http::HeaderValue::from_static(content_type),
            );
        }
        Ok(HttpResponse::new(
            http::StatusCode::from_u16(self.status).unwrap(),
            headers,
            self.body.to_vec(),
        ))
    }
}

/// Listener recording the order of notifications; defers to others on failures.
#[derive(Default)]
struct RecordingListener {
    events: Mutex<Vec<String>>,
}

impl RecordingListener {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl ExchangeListener for RecordingListener {
    fn on_started(&self, event: &Started<'_>) {
        self.push(format!("started {}", event.id));
    }

    fn on_finished(&self, event: &Finished<'_>) {
        self.push(format!("finished {} {}", event.id, event.response.status()));
    }

    fn on_failed(&self, event: &Failed<'_>) -> Disposition {
        self.push(format!("failed {}", event.id));
        Disposition::Swallow
    }

    fn on_error(&self, event: &Errored<'_>) -> Disposition {
        self.push(format!("error {}", event.id));
        Disposition::Swallow
    }
}

fn recorded(
    client: FakeTransport,
    setup: ExchangeSetup,
) -> (Bastion<FakeTransport>, Arc<RecordingListener>) {
    let recorder = Arc::new(RecordingListener::default());
    let setup = setup.with_shared_listener(recorder.clone());
    (Bastion::new(client, Arc::new(setup)), recorder)
}

fn request() -> ApiRequest {
    ApiRequest::get("https://example.com/point")
}

mod lifecycle {
    use super::*;

    #[tokio::test]
    async fn successful_exchange_notifies_started_then_finished() {
        let (bastion, recorder) = recorded(FakeTransport::json_point(), ExchangeSetup::default());

        let outcome = bastion
            .call::<Json<Point>, _>(&request(), NoAssertions)
            .await
            .unwrap();

        assert!(outcome.is_passed());
        assert_eq!(recorder.events(), ["started #1", "finished #1 200"]);
    }

    #[tokio::test]
    async fn decode_failure_notifies_started_then_error_never_finished() {
        let (bastion, recorder) = recorded(
            FakeTransport::respond(200, Some("application/json"), b"{broken"),
            ExchangeSetup::default(),
        );

        let result = bastion.call::<Json<Point>, _>(&request(), NoAssertions).await;

        assert!(matches!(
            result,
            Err(ExchangeError::Decode(DecodeError::Malformed { .. }))
        ));
        assert_eq!(recorder.events(), ["started #1", "error #1"]);
    }

    #[tokio::test]
    async fn transport_failure_notifies_error() {
        let (bastion, recorder) = recorded(FakeTransport::timing_out(), ExchangeSetup::default());

        let result = bastion.call::<String, _>(&request(), NoAssertions).await;

        assert!(matches!(
            result,
            Err(ExchangeError::Execute(ExecuteError::Failed(HttpError::Timeout)))
        ));
        assert_eq!(recorder.events(), ["started #1", "error #1"]);
    }

    #[tokio::test]
    async fn assertion_failure_notifies_failed_never_finished() {
        let (bastion, recorder) = recorded(FakeTransport::json_point(), ExchangeSetup::default());

        let result = bastion
            .call::<String, _>(&request(), ExpectStatus::new([201]))
            .await;

        assert!(matches!(result, Err(ExchangeError::Assertion(_))));
        assert_eq!(recorder.events(), ["started #1", "failed #1"]);
    }

    #[tokio::test]
    async fn exchange_ids_increase_per_call() {
        let (bastion, recorder) = recorded(FakeTransport::json_point(), ExchangeSetup::default());

        bastion.call::<String, _>(&request(), NoAssertions).await.unwrap();
        bastion.call::<String, _>(&request(), NoAssertions).await.unwrap();

        assert_eq!(
            recorder.events(),
            ["started #1", "finished #1 200", "started #2", "finished #2 200"]
        );
    }
}

mod decoding {
    use super::*;

    #[tokio::test]
    async fn json_body_binds_into_structured_model() {
        let bastion = Bastion::with_defaults(FakeTransport::json_point());

        let model = bastion
            .call::<Json<Point>, _>(&request(), NoAssertions)
            .await
            .unwrap()
            .into_model();

        assert_eq!(model, Some(Json(Point { x: 1 })));
    }

    #[tokio::test]
    async fn json_body_decodes_as_literal_text() {
        let bastion = Bastion::with_defaults(FakeTransport::json_point());

        let exchanged = bastion
            .call::<String, _>(&request(), NoAssertions)
            .await
            .unwrap()
            .passed()
            .unwrap();

        assert_eq!(exchanged.model, r#"{"x":1}"#);
        assert_eq!(exchanged.response.status(), 200);
    }

    #[tokio::test]
    async fn no_matching_decoder_is_a_selection_error() {
        let setup = ExchangeSetup::new()
            .with_decoder(JsonDecoder)
            .with_listener(PropagationPolicy::fail_loud());
        let bastion = Bastion::new(
            FakeTransport::respond(200, Some("text/html"), b"<p>hi</p>"),
            Arc::new(setup),
        );

        let result = bastion.call::<String, _>(&request(), NoAssertions).await;

        let error = result.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NoDecoder);
    }

    #[tokio::test]
    async fn fetch_bypasses_decoding() {
        let setup = ExchangeSetup::new().with_listener(PropagationPolicy::fail_loud());
        let bastion = Bastion::new(
            FakeTransport::respond(200, Some("image/png"), &[0x89, 0x50]),
            Arc::new(setup),
        );

        let exchanged = bastion.fetch(&request()).await.unwrap().passed().unwrap();

        assert_eq!(exchanged.response.body(), &[0x89, 0x50]);
        assert_eq!(exchanged.response.header("content-type"), Some("image/png"));
    }
}

mod propagation {
    use super::*;

    #[tokio::test]
    async fn default_setup_reraises_the_exact_assertion_failure() {
        let bastion = Bastion::with_defaults(FakeTransport::json_point());
        let expected = AssertionFailure::new("x must be 2");

        let result = bastion
            .call::<Json<Point>, _>(&request(), |_: &ApiResponse, model: &Json<Point>| {
                if model.0.x == 2 {
                    Ok(())
                } else {
                    Err(AssertionFailure::new("x must be 2"))
                }
            })
            .await;

        match result {
            Err(ExchangeError::Assertion(failure)) => assert_eq!(failure, expected),
            other => panic!("Expected assertion failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unsupported_method_propagates_without_transport_call() {
        let bastion = Bastion::with_defaults(FakeTransport::json_point());
        let trace = ApiRequest::new(http::Method::TRACE, "https://example.com/");

        let error = bastion
            .call::<String, _>(&trace, NoAssertions)
            .await
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::UnsupportedMethod);
        assert_eq!(bastion.executor().client().calls(), 0);
    }

    #[tokio::test]
    async fn collecting_listener_suppresses_failures() {
        let collector = Arc::new(CollectingListener::new());
        let setup = ExchangeSetup::new()
            .with_decoders(DecoderRegistry::default())
            .with_shared_listener(collector.clone());
        let bastion = Bastion::new(FakeTransport::json_point(), Arc::new(setup));

        let outcome = bastion
            .call::<String, _>(&request(), ExpectStatus::new([404]))
            .await
            .unwrap();

        assert!(matches!(
            outcome.suppressed(),
            Some(ExchangeError::Assertion(_))
        ));
        let collected = collector.take();
        assert_eq!(collected.len(), 1);
        assert_eq!(collected[0].kind, ErrorKind::Assertion);
    }

    #[tokio::test]
    async fn propagating_listener_overrides_swallowing_one() {
        let setup = ExchangeSetup::default().with_listener(CollectingListener::new());
        let bastion = Bastion::new(FakeTransport::timing_out(), Arc::new(setup));

        let result = bastion.call::<String, _>(&request(), NoAssertions).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn no_listeners_fails_loud() {
        let setup = ExchangeSetup::new().with_decoders(DecoderRegistry::default());
        let bastion = Bastion::new(FakeTransport::timing_out(), Arc::new(setup));

        let result = bastion.call::<String, _>(&request(), NoAssertions).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn policy_swallowing_execution_suppresses_timeouts() {
        let setup = ExchangeSetup::new()
            .with_decoders(DecoderRegistry::default())
            .with_listener(PropagationPolicy::fail_loud().swallowing(ErrorKind::Execution));
        let bastion = Bastion::new(FakeTransport::timing_out(), Arc::new(setup));

        let outcome: Outcome<String> = bastion.call(&request(), NoAssertions).await.unwrap();

        assert_eq!(
            outcome.suppressed().map(ExchangeError::kind),
            Some(ErrorKind::Execution)
        );
        assert!(outcome.into_model().is_none());
    }
}

mod concurrency {
    use super::*;

    #[tokio::test]
    async fn shared_setup_serves_concurrent_exchanges() {
        let setup = Arc::new(ExchangeSetup::default());
        let first = Bastion::new(FakeTransport::json_point(), Arc::clone(&setup));
        let second = Bastion::new(FakeTransport::json_point(), Arc::clone(&setup));
        let request = request();

        let (a, b) = tokio::join!(
            first.call::<Json<Point>, _>(&request, NoAssertions),
            second.call::<String, _>(&request, NoAssertions),
        );

        assert_eq!(a.unwrap().into_model(), Some(Json(Point { x: 1 })));
        assert_eq!(b.unwrap().into_model().as_deref(), Some(r#"{"x":1}"#));
    }
}
