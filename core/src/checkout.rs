//! Checkout link construction.
//!
//! # Design
//! No network is involved. Recipients are encoded as `<prefix>_<id>_<amount>`
//! (`u` for users, `r` for repositories), joined with commas, and written to
//! the `recipients` query parameter. Amounts are rounded to cents with
//! midpoint-away-from-zero, so `25.005` becomes `25.01` and `50` becomes
//! `50.00`. Amounts are encoded as given; zero or negative values are not
//! rejected here.

use rust_decimal::{Decimal, RoundingStrategy};
use url::Url;
use uuid::Uuid;

use crate::types::CheckoutItem;

pub const RECIPIENTS_PARAM: &str = "recipients";
pub const GROUP_ID_PARAM: &str = "groupId";
pub const SENDER_PARAM: &str = "sender";

/// Inputs for one checkout link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutParams {
    pub items: Vec<CheckoutItem>,
    /// Correlates payments across links. Generated when `None`.
    pub group_id: Option<String>,
    pub sender_github_id: Option<u64>,
}

impl CheckoutParams {
    pub fn new(items: Vec<CheckoutItem>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    pub fn group_id(mut self, group_id: &str) -> Self {
        self.group_id = Some(group_id.to_string());
        self
    }

    pub fn sender(mut self, sender_github_id: u64) -> Self {
        self.sender_github_id = Some(sender_github_id);
        self
    }
}

#[derive(Debug, Clone)]
pub struct CheckoutApi {
    checkout_url: Url,
}

impl CheckoutApi {
    pub fn new(checkout_url: Url) -> Self {
        Self { checkout_url }
    }

    /// Absolute URL of the hosted checkout page for `params`.
    pub fn generate_checkout_url(&self, params: &CheckoutParams) -> String {
        let recipients = params
            .items
            .iter()
            .map(encode_item)
            .collect::<Vec<_>>()
            .join(",");
        let group_id = match params.group_id.as_deref().filter(|g| !g.is_empty()) {
            Some(group_id) => group_id.to_string(),
            None => self.generate_group_id(),
        };

        let mut url = self.checkout_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair(RECIPIENTS_PARAM, &recipients);
            query.append_pair(GROUP_ID_PARAM, &group_id);
            if let Some(sender) = params.sender_github_id {
                query.append_pair(SENDER_PARAM, &sender.to_string());
            }
        }
        url.into()
    }

    /// Fresh UUID v4, for sharing one group id across several links.
    pub fn generate_group_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// `u_583231_50.00` / `r_123456_75.50`.
pub fn encode_item(item: &CheckoutItem) -> String {
    format!("{}_{}_{}", item.kind.prefix(), item.id, format_cents(item.amount))
}

/// Render `amount` with exactly two decimal places, rounding half away from zero.
pub fn format_cents(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}
