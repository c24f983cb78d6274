use std::collections::BTreeMap;

use axum::{
    body::Bytes,
    extract::{Multipart, Path},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub id: u64,
    pub name: String,
    pub tags: Vec<String>,
}

/// Request as seen by `/echo`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub content_type: Option<String>,
    pub body: serde_json::Value,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub field: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub content: String,
}

/// Multipart form as seen by `/upload`. Fields keep arrival order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Upload {
    pub fields: Vec<(String, String)>,
    pub files: Vec<UploadedFile>,
}

/// Size of the `/large` body; above ureq's default 10 MiB read limit.
pub const LARGE_BODY_LEN: usize = 11 * 1024 * 1024;

/// Raw bytes of the `x-raw` header sent by `/raw-header`; not valid UTF-8.
pub const RAW_HEADER_BYTES: &[u8] = b"caf\xe9";

pub fn sample_widget() -> Widget {
    Widget {
        id: 1,
        name: "Widget".to_string(),
        tags: vec!["a".to_string(), "b".to_string()],
    }
}

pub fn app() -> Router {
    Router::new()
        .route("/widget", get(widget))
        .route("/list", get(list))
        .route("/empty", get(empty))
        .route("/invalid-json", get(invalid_json))
        .route("/status/{code}", get(status))
        .route("/headers", get(headers))
        .route("/redirect", get(redirect).post(redirect).put(redirect))
        .route("/large", get(large))
        .route("/raw-header", get(raw_header))
        .route("/echo", post(echo).put(echo))
        .route("/upload", post(upload))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn widget() -> Json<Widget> {
    Json(sample_widget())
}

async fn list() -> Json<Vec<u32>> {
    Json(vec![1, 2, 3])
}

async fn empty() -> StatusCode {
    StatusCode::OK
}

async fn invalid_json() -> &'static str {
    "{\"id\": "
}

async fn status(Path(code): Path<u16>) -> Result<(StatusCode, String), StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((status, format!("status {code}")))
}

// Repeated headers are joined with ", " so duplicates stay visible.
async fn headers(headers: HeaderMap) -> Json<BTreeMap<String, String>> {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers.iter() {
        let value = String::from_utf8_lossy(value.as_bytes());
        map.entry(name.as_str().to_string())
            .and_modify(|v| {
                v.push_str(", ");
                v.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }
    Json(map)
}

async fn redirect() -> (StatusCode, [(header::HeaderName, &'static str); 1], &'static str) {
    (StatusCode::FOUND, [(header::LOCATION, "/widget")], "moved")
}

async fn large() -> Vec<u8> {
    vec![b'x'; LARGE_BODY_LEN]
}

async fn raw_header() -> Result<([(header::HeaderName, HeaderValue); 1], &'static str), StatusCode> {
    let value = HeaderValue::from_bytes(RAW_HEADER_BYTES).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(([(header::HeaderName::from_static("x-raw"), value)], "ok"))
}

async fn echo(method: Method, headers: HeaderMap, body: Bytes) -> Result<Json<Echo>, StatusCode> {
    let body = serde_json::from_slice(&body).map_err(|_| StatusCode::UNPROCESSABLE_ENTITY)?;
    let content_type = headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    Ok(Json(Echo {
        method: method.to_string(),
        content_type,
        body,
    }))
}

async fn upload(mut multipart: Multipart) -> Result<Json<Upload>, StatusCode> {
    let mut upload = Upload::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
        let content = String::from_utf8_lossy(&data).into_owned();
        if filename.is_some() {
            upload.files.push(UploadedFile {
                field: name,
                filename,
                content_type,
                content,
            });
        } else {
            upload.fields.push((name, content));
        }
    }
    Ok(Json(upload))
}
