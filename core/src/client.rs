//! Top-level Merit client.
//!
//! # Design
//! `MeritClient` only wires the resource clients together. `balances` and
//! `payments` share one `BaseApi` (and so one transport and one connection
//! pool); `checkout` needs neither the key nor the network.

use std::sync::Arc;

use crate::balances::BalancesApi;
use crate::base::BaseApi;
use crate::checkout::CheckoutApi;
use crate::config::MeritConfig;
use crate::http::HttpTransport;
use crate::payments::PaymentsApi;
use crate::transport::UreqTransport;

#[derive(Debug, Clone)]
pub struct MeritClient {
    balances: BalancesApi,
    payments: PaymentsApi,
    checkout: CheckoutApi,
}

impl MeritClient {
    /// Client backed by `UreqTransport`, honoring the configured timeout.
    pub fn new(config: &MeritConfig) -> Self {
        Self::with_transport(config, Arc::new(UreqTransport::new(config.timeout())))
    }

    pub fn with_transport(config: &MeritConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let base = BaseApi::new(config, transport);
        Self {
            balances: BalancesApi::new(base.clone()),
            payments: PaymentsApi::new(base),
            checkout: CheckoutApi::new(config.checkout_url().clone()),
        }
    }

    pub fn balances(&self) -> &BalancesApi {
        &self.balances
    }

    pub fn payments(&self) -> &PaymentsApi {
        &self.payments
    }

    pub fn checkout(&self) -> &CheckoutApi {
        &self.checkout
    }
}
