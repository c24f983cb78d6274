//! Single-attempt HTTP operations with typed error mapping.
//!
//! # Design
//! `RequestExecutor` holds only its `Transport` and carries no mutable state
//! between calls, so concurrent calls cannot observe each other. Every
//! operation has the same shape: a `build_*` function validates the URL and
//! produces an `HttpRequest` without I/O, the transport performs one
//! round-trip, and `check_response` maps the outcome. Nothing is retried.
//!
//! The `build_*` functions and `check_response` are public so a caller that
//! runs its own I/O loop can use the same request construction and mapping.

use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::endpoint::parse_url;
use crate::error::{OperationResult, RequestError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, WriteMethod};
use crate::json::{self, JsonObject};
use crate::multipart::{self, FilePart};
use crate::transport::{Transport, TransportConfig, UreqTransport};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Performs one network round-trip per call and reports one terminal result.
#[derive(Debug, Clone, Default)]
pub struct RequestExecutor<T> {
    transport: T,
}

impl RequestExecutor<UreqTransport> {
    pub fn with_config(config: TransportConfig) -> Self {
        Self::new(UreqTransport::new(config))
    }
}

impl<T: Transport> RequestExecutor<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GET `url` and return the raw body.
    pub async fn fetch(&self, url: &str) -> OperationResult<Bytes> {
        let request = build_get(url, &[])?;
        self.round_trip(request).await
    }

    /// GET `url` with `headers` and decode the JSON body into `D`.
    pub async fn fetch_and_decode<D: DeserializeOwned>(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> OperationResult<D> {
        let request = build_get(url, headers)?;
        let body = self.round_trip(request).await?;
        json::decode(&body)
    }

    /// GET `url` with `headers` and decode the body as an untyped JSON object.
    pub async fn fetch_json_object(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> OperationResult<JsonObject> {
        let request = build_get(url, headers)?;
        let body = self.round_trip(request).await?;
        json::decode_object(&body)
    }

    /// Serialize `body` as JSON and send it with `method`.
    pub async fn send<B: Serialize + ?Sized>(
        &self,
        url: &str,
        method: WriteMethod,
        body: &B,
    ) -> OperationResult<Bytes> {
        let request = build_send(url, method, body)?;
        self.round_trip(request).await
    }

    /// POST already-encoded JSON.
    pub async fn upload_json(&self, url: &str, json: impl Into<Bytes>) -> OperationResult<Bytes> {
        let request = build_json_upload(url, json)?;
        self.round_trip(request).await
    }

    /// POST `fields` followed by `file` as `multipart/form-data`.
    pub async fn upload_multipart<I, K, V>(
        &self,
        url: &str,
        fields: I,
        file: &FilePart,
    ) -> OperationResult<Bytes>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let request = build_multipart(url, &multipart::new_boundary(), fields, file)?;
        self.round_trip(request).await
    }

    async fn round_trip(&self, request: HttpRequest) -> OperationResult<Bytes> {
        debug!(
            target: "netkit::http",
            method = request.method.as_str(),
            url = %request.url,
            "sending request"
        );
        let response = self.transport.execute(request).await?;
        debug!(
            target: "netkit::http",
            status = response.status,
            len = response.body.len(),
            "response received"
        );
        check_response(response)
    }
}

/// Build a GET request for `url` carrying `headers`.
pub fn build_get(url: &str, headers: &[(String, String)]) -> Result<HttpRequest, RequestError> {
    Ok(HttpRequest {
        method: HttpMethod::Get,
        url: parse_url(url)?,
        headers: headers.to_vec(),
        body: None,
    })
}

/// Build a POST/PUT request whose body is `body` serialized as JSON.
///
/// The URL is validated before serialization, so a bad URL always reports
/// `InvalidUrl`.
pub fn build_send<B: Serialize + ?Sized>(
    url: &str,
    method: WriteMethod,
    body: &B,
) -> Result<HttpRequest, RequestError> {
    let url = parse_url(url)?;
    let body = json::encode(body)?;
    Ok(HttpRequest {
        method: method.into(),
        url,
        headers: vec![("content-type".to_string(), JSON_CONTENT_TYPE.to_string())],
        body: Some(body),
    })
}

/// Build a POST request carrying pre-encoded JSON bytes.
pub fn build_json_upload(url: &str, json: impl Into<Bytes>) -> Result<HttpRequest, RequestError> {
    Ok(HttpRequest {
        method: HttpMethod::Post,
        url: parse_url(url)?,
        headers: vec![("content-type".to_string(), JSON_CONTENT_TYPE.to_string())],
        body: Some(json.into()),
    })
}

/// Build a multipart POST request delimited by `boundary`.
pub fn build_multipart<I, K, V>(
    url: &str,
    boundary: &str,
    fields: I,
    file: &FilePart,
) -> Result<HttpRequest, RequestError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let url = parse_url(url)?;
    Ok(HttpRequest {
        method: HttpMethod::Post,
        url,
        headers: vec![("content-type".to_string(), multipart::content_type(boundary))],
        body: Some(multipart::encode_form(boundary, fields, file)),
    })
}

/// Map a received response to its body, or to `UnexpectedStatus` for non-2xx
/// and `EmptyResponse` for an empty 2xx body.
pub fn check_response(response: HttpResponse) -> OperationResult<Bytes> {
    if !response.is_success() {
        return Err(RequestError::UnexpectedStatus {
            status: response.status,
            body: String::from_utf8_lossy(&response.body).into_owned(),
        });
    }
    if response.body.is_empty() {
        return Err(RequestError::EmptyResponse);
    }
    Ok(response.body)
}
