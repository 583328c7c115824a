//! End-to-end tests for client authentication and CIBA request validation.
//!
//! Keys and certificates under `fixtures/` were generated offline with
//! OpenSSL. Run with `RUST_LOG=debug` to see rejection reasons.

mod ciba;
mod client_auth;
mod common;
