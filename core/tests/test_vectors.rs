//! Verify executor behavior against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, simulated transport responses and the
//! expected outcome. Decoded results are compared as parsed values, not raw
//! strings, so field ordering does not matter.

use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use netkit_core::{
    parse_url, HttpRequest, HttpResponse, RequestError, RequestExecutor, Transport, TransportError,
};
use serde::Deserialize;

const URL: &str = "https://api.example.com/resource";

/// Replays one scripted outcome and counts calls.
struct OneShot {
    outcome: Result<(u16, String), String>,
    calls: Mutex<usize>,
}

impl OneShot {
    fn from_case(case: &serde_json::Value) -> Self {
        let outcome = match case["transport_error"].as_str() {
            Some(message) => Err(message.to_string()),
            None => Ok((
                case["status"].as_u64().unwrap() as u16,
                case["body"].as_str().unwrap().to_string(),
            )),
        };
        Self {
            outcome,
            calls: Mutex::new(0),
        }
    }

    fn ok(body: &str) -> Self {
        Self {
            outcome: Ok((200, body.to_string())),
            calls: Mutex::new(0),
        }
    }
}

#[async_trait]
impl Transport for OneShot {
    async fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
        *self.calls.lock().unwrap() += 1;
        match &self.outcome {
            Ok((status, body)) => Ok(HttpResponse {
                status: *status,
                headers: Vec::new(),
                body: Bytes::from(body.clone()),
            }),
            Err(message) => Err(TransportError::new(message.clone())),
        }
    }
}

// ---------------------------------------------------------------------------
// Response mapping
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let executor = RequestExecutor::new(OneShot::from_case(case));
        let result = executor.fetch(URL).await;
        let expected = &case["expected"];

        if let Some(body) = expected["ok"].as_str() {
            let bytes = result.unwrap_or_else(|e| panic!("{name}: unexpected error {e:?}"));
            assert_eq!(&bytes[..], body.as_bytes(), "{name}: body");
            continue;
        }

        let err = result.expect_err(name);
        match expected["error"].as_str().unwrap() {
            "EmptyResponse" => assert!(matches!(err, RequestError::EmptyResponse), "{name}: {err:?}"),
            "Transport" => assert!(matches!(err, RequestError::Transport(_)), "{name}: {err:?}"),
            "UnexpectedStatus" => {
                let status = expected["status"].as_u64().unwrap() as u16;
                assert_eq!(err.status(), Some(status), "{name}: {err:?}");
            }
            other => panic!("{name}: unknown expected error {other}"),
        }
        assert_eq!(*executor.transport().calls.lock().unwrap(), 1, "{name}: calls");
    }
}

// ---------------------------------------------------------------------------
// URL validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn url_test_vectors() {
    let raw = include_str!("../../test-vectors/urls.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let input = case["input"].as_str().unwrap();
        let valid = case["valid"].as_bool().unwrap();

        assert_eq!(parse_url(input).is_ok(), valid, "{input:?}: parse_url");

        let executor = RequestExecutor::new(OneShot::ok("x"));
        let result = executor.fetch(input).await;
        let calls = *executor.transport().calls.lock().unwrap();
        if valid {
            assert!(result.is_ok(), "{input:?}: {result:?}");
            assert_eq!(calls, 1, "{input:?}: calls");
        } else {
            assert!(
                matches!(&result, Err(RequestError::InvalidUrl(s)) if s == input),
                "{input:?}: {result:?}"
            );
            assert_eq!(calls, 0, "{input:?}: no I/O for invalid URL");
        }
    }
}

// ---------------------------------------------------------------------------
// Typed decode
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq, Deserialize)]
struct User {
    id: u64,
    name: String,
    email: Option<String>,
}

#[tokio::test]
async fn decode_test_vectors() {
    let raw = include_str!("../../test-vectors/decode.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let executor = RequestExecutor::new(OneShot::ok(case["body"].as_str().unwrap()));
        let result = executor.fetch_and_decode::<User>(URL, &[]).await;

        if case["expected"].is_null() {
            assert!(matches!(result, Err(RequestError::Decode(_))), "{name}: {result:?}");
        } else {
            let expected: User = serde_json::from_value(case["expected"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: decoded value");
        }
    }
}
