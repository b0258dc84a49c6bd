//! Typed client for the Merit balances and payments API.
//!
//! # Overview
//! Fetches user and repository balances, lists outgoing payments page by
//! page, and builds checkout links for the hosted payment terminal.
//!
//! # Design
//! - `MeritConfig` is resolved and validated once, then shared read-only.
//! - `BaseApi` is the single request/response layer: it builds
//!   `HttpRequest` values, runs them through an `HttpTransport`, and maps
//!   every failure onto `MeritError`.
//! - Each operation issues at most one request. Nothing is retried, cached
//!   or batched.
//! - The transport is a trait object, so tests (or hosts with their own HTTP
//!   stack) can swap out the default `UreqTransport`.

pub mod balances;
pub mod base;
pub mod checkout;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod payments;
pub mod transport;
pub mod types;

#[cfg(test)]
mod test_support;

pub use balances::BalancesApi;
pub use base::{parse_response, BaseApi};
pub use checkout::{CheckoutApi, CheckoutParams};
pub use client::MeritClient;
pub use config::{MeritConfig, MeritConfigBuilder};
pub use error::{ConfigError, ErrorBody, ErrorKind, MeritError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
pub use payments::{PaymentsApi, PaymentsFilter};
pub use transport::UreqTransport;
pub use types::{
    Amount, CheckoutItem, OutgoingPayment, PaginatedResponse, PaymentCommon, RepoBalance,
    SubjectKind, UserBalance,
};
