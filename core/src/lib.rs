//! Single-call HTTP utilities with typed decoding.
//!
//! # Overview
//! `RequestExecutor` validates a URL string, performs exactly one round-trip
//! through a `Transport`, maps transport and HTTP failures into
//! `RequestError`, and optionally decodes the JSON body into a caller-chosen
//! type. Supported shapes are GET, JSON POST/PUT and a single-file multipart
//! POST.
//!
//! # Design
//! - The executor is stateless apart from its transport; calls never share
//!   mutable state and are never retried.
//! - A request carries a parsed `Url`, so an invalid URL fails with
//!   `RequestError::InvalidUrl` before any I/O.
//! - `Transport` is the only I/O seam. `UreqTransport` is the bundled
//!   implementation; tests substitute scripted doubles.

pub mod endpoint;
pub mod error;
pub mod executor;
pub mod http;
pub mod json;
pub mod multipart;
pub mod transport;

pub use endpoint::{build_url, parse_url};
pub use error::{OperationResult, RequestError, TransportError};
pub use executor::RequestExecutor;
pub use http::{Headers, HttpMethod, HttpRequest, HttpResponse, WriteMethod};
pub use json::{JsonObject, JsonValue};
pub use multipart::FilePart;
pub use transport::{Transport, TransportConfig, UreqTransport};
