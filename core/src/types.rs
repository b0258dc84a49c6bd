//! Domain DTOs for the Merit API.
//!
//! # Design
//! Records decode through serde, so a missing or mistyped field fails with a
//! `MeritError::Decode` instead of producing a half-filled value. Types with
//! invariants beyond their shape (`Amount`, `PaginatedResponse`) decode via a
//! private wire struct and a `TryFrom` that checks them.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary value in both exact and display form.
///
/// `raw` is the exact decimal string; `formatted` is for humans (for example
/// `"$1,250.00"`). Neither is ever a float. The fields are private so every
/// `Amount` has passed the decimal check in `Amount::new`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "AmountWire")]
pub struct Amount {
    raw: String,
    formatted: String,
    #[serde(skip)]
    value: Decimal,
}

impl Amount {
    pub fn new(raw: impl Into<String>, formatted: impl Into<String>) -> Result<Self, rust_decimal::Error> {
        let raw = raw.into();
        let value = Decimal::from_str(raw.trim())?;
        Ok(Amount {
            raw,
            formatted: formatted.into(),
            value,
        })
    }

    /// The exact decimal string as sent by the server.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn formatted(&self) -> &str {
        &self.formatted
    }

    pub fn to_decimal(&self) -> Decimal {
        self.value
    }
}

#[derive(Deserialize)]
struct AmountWire {
    raw: String,
    formatted: String,
}

impl TryFrom<AmountWire> for Amount {
    type Error = String;

    fn try_from(wire: AmountWire) -> Result<Self, Self::Error> {
        Amount::new(wire.raw.as_str(), wire.formatted)
            .map_err(|e| format!("amount raw value {:?} is not a decimal: {e}", wire.raw))
    }
}

/// Balance of a GitHub user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserBalance {
    pub user_id: u64,
    pub login: String,
    pub balance: Amount,
}

/// Balance of a GitHub repository.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepoBalance {
    pub repo_id: u64,
    pub owner: String,
    pub repo: String,
    pub balance: Amount,
}

/// Fields present on every outgoing payment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentCommon {
    pub sender_id: u64,
    pub amount: Amount,
    pub token: String,
    /// ISO-8601 timestamp, as sent by the server.
    pub timestamp: String,
    pub tx_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

/// A payment sent by a user, either to another user or to a repository.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutgoingPayment {
    UserPayment {
        recipient_id: u64,
        #[serde(flatten)]
        common: PaymentCommon,
    },
    RepoFund {
        repo_id: u64,
        #[serde(flatten)]
        common: PaymentCommon,
    },
}

impl OutgoingPayment {
    pub fn common(&self) -> &PaymentCommon {
        match self {
            OutgoingPayment::UserPayment { common, .. } | OutgoingPayment::RepoFund { common, .. } => {
                common
            }
        }
    }

    /// The paid subject: recipient user id or funded repository id.
    pub fn subject(&self) -> (SubjectKind, u64) {
        match self {
            OutgoingPayment::UserPayment { recipient_id, .. } => (SubjectKind::User, *recipient_id),
            OutgoingPayment::RepoFund { repo_id, .. } => (SubjectKind::Repo, *repo_id),
        }
    }
}

/// One page of a paginated listing.
///
/// Pages are 1-based. `items.len()` never exceeds `page_size`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(
    try_from = "PageWire<T>",
    bound(deserialize = "T: Deserialize<'de>", serialize = "T: Serialize")
)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub has_next: bool,
}

#[derive(Deserialize)]
struct PageWire<T> {
    items: Vec<T>,
    page: u32,
    page_size: u32,
    total_count: u64,
    #[serde(default)]
    has_next: Option<bool>,
}

impl<T> TryFrom<PageWire<T>> for PaginatedResponse<T> {
    type Error = String;

    fn try_from(wire: PageWire<T>) -> Result<Self, Self::Error> {
        if wire.items.len() as u64 > u64::from(wire.page_size) {
            return Err(format!(
                "page holds {} items but page_size is {}",
                wire.items.len(),
                wire.page_size
            ));
        }
        let has_next = wire.has_next.unwrap_or_else(|| {
            u64::from(wire.page).saturating_mul(u64::from(wire.page_size)) < wire.total_count
        });
        Ok(PaginatedResponse {
            items: wire.items,
            page: wire.page,
            page_size: wire.page_size,
            total_count: wire.total_count,
            has_next,
        })
    }
}

/// What a checkout item or payment targets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    User,
    Repo,
}

impl SubjectKind {
    /// Single-letter prefix used in checkout recipient encoding.
    pub fn prefix(self) -> char {
        match self {
            SubjectKind::User => 'u',
            SubjectKind::Repo => 'r',
        }
    }
}

/// One recipient of a checkout link.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckoutItem {
    /// GitHub id of the user or repository.
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: SubjectKind,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

impl CheckoutItem {
    pub fn user(id: u64, amount: Decimal) -> Self {
        Self {
            id,
            kind: SubjectKind::User,
            amount,
        }
    }

    pub fn repo(id: u64, amount: Decimal) -> Self {
        Self {
            id,
            kind: SubjectKind::Repo,
            amount,
        }
    }
}
