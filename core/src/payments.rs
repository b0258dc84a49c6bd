//! Outgoing payment listings.

use url::form_urlencoded;

use crate::base::BaseApi;
use crate::error::MeritError;
use crate::http::HttpRequest;
use crate::types::{OutgoingPayment, PaginatedResponse};

/// Optional filters for `PaymentsApi::get_payments_by_sender`.
///
/// Unset, empty and zero values are left out of the query string entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentsFilter {
    pub group_id: Option<String>,
    pub page_size: Option<u32>,
    /// 1-based page number.
    pub page: Option<u32>,
}

impl PaymentsFilter {
    pub fn group_id(mut self, group_id: &str) -> Self {
        self.group_id = Some(group_id.to_string());
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Encoded query string without the leading `?`; empty when no filter is set.
    pub fn to_query(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(group_id) = self.group_id.as_deref().filter(|g| !g.is_empty()) {
            query.append_pair("group_id", group_id);
        }
        if let Some(page_size) = self.page_size.filter(|n| *n > 0) {
            query.append_pair("page_size", &page_size.to_string());
        }
        if let Some(page) = self.page.filter(|n| *n > 0) {
            query.append_pair("page", &page.to_string());
        }
        query.finish()
    }
}

#[derive(Debug, Clone)]
pub struct PaymentsApi {
    base: BaseApi,
}

impl PaymentsApi {
    pub fn new(base: BaseApi) -> Self {
        Self { base }
    }

    pub fn build_payments_by_sender(&self, sender_github_id: u64, filter: &PaymentsFilter) -> HttpRequest {
        let query = filter.to_query();
        let endpoint = if query.is_empty() {
            format!("/user/{sender_github_id}/payments")
        } else {
            format!("/user/{sender_github_id}/payments?{query}")
        };
        self.base.build_get(&endpoint)
    }

    /// One page of payments sent by `sender_github_id`.
    pub fn get_payments_by_sender(
        &self,
        sender_github_id: u64,
        filter: &PaymentsFilter,
    ) -> Result<PaginatedResponse<OutgoingPayment>, MeritError> {
        self.base.send(self.build_payments_by_sender(sender_github_id, filter))
    }
}
