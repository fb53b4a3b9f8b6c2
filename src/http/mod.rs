//! Outbound HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! gateway builds HttpRequest (request.rs)
//!     → resilience wraps the call (deadline, retries)
//!     → transport.rs sends it (reqwest)
//!     → HttpResponse (response.rs) buffered for the gateway to decode
//! ```

pub mod request;
pub mod response;
pub mod transport;

pub use request::{HttpRequest, RequestBody};
pub use response::HttpResponse;
pub use transport::{ReqwestTransport, Transport, TransportError};

#[cfg(test)]
pub(crate) mod mock;
