//! HTTP middleware.
//!
//! # Data Flow
//! ```text
//! request
//!     → request ID (set)         ← http/request.rs
//!     → trace span
//!     → cors.rs                  (preflight, allow-origin)
//!     → tracking.rs              (request counter, metrics)
//!     → envelope.rs              (bare framework errors → Envelope)
//!     → timeout, body limit
//!     → panic catcher            (panic → 500 Envelope)
//!     → handler
//! ```

pub mod cors;
pub mod envelope;
pub mod tracking;

pub use cors::cors_layer;
pub use envelope::{handle_panic, normalize_error_responses};
pub use tracking::track_requests;
