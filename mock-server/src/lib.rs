//! In-memory stand-in for the Merit data API.
//!
//! Serves the balance and payment endpoints from a fixed ledger, enforces the
//! `x-api-key` header, and answers failures with the same
//! `{"message", "request_id"}` body the real service uses.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use uuid::Uuid;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Amount {
    pub raw: String,
    pub formatted: String,
}

impl Amount {
    fn usd(raw: &str, formatted: &str) -> Self {
        Self {
            raw: raw.to_string(),
            formatted: formatted.to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserBalance {
    pub user_id: u64,
    pub login: String,
    pub balance: Amount,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RepoBalance {
    pub repo_id: u64,
    pub owner: String,
    pub repo: String,
    pub balance: Amount,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaymentCommon {
    pub sender_id: u64,
    pub amount: Amount,
    pub token: String,
    pub timestamp: String,
    pub tx_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Payment {
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

impl Payment {
    fn common(&self) -> &PaymentCommon {
        match self {
            Payment::UserPayment { common, .. } | Payment::RepoFund { common, .. } => common,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub has_next: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub request_id: String,
}

#[derive(Debug, Deserialize)]
pub struct PaymentsQuery {
    pub group_id: Option<String>,
    pub page_size: Option<u32>,
    pub page: Option<u32>,
}

/// Everything the mock server knows about.
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    pub users: Vec<UserBalance>,
    pub repos: Vec<RepoBalance>,
    pub payments: Vec<Payment>,
}

pub const FIXTURE_GROUP_ID: &str = "fbb809b4-5359-4554-bfce-c0a8315bac4f";

impl Ledger {
    /// Two users, one repository, and five payments sent by `rsproule`
    /// (three of them in `FIXTURE_GROUP_ID`).
    pub fn fixtures() -> Self {
        let users = vec![
            UserBalance {
                user_id: 583231,
                login: "octocat".to_string(),
                balance: Amount::usd("1250.5", "$1,250.50"),
            },
            UserBalance {
                user_id: 24497652,
                login: "rsproule".to_string(),
                balance: Amount::usd("0", "$0.00"),
            },
        ];
        let repos = vec![RepoBalance {
            repo_id: 1296269,
            owner: "octocat".to_string(),
            repo: "Hello-World".to_string(),
            balance: Amount::usd("75.5", "$75.50"),
        }];
        let payments = (1..=5u64)
            .map(|n| {
                let common = PaymentCommon {
                    sender_id: 24497652,
                    amount: Amount::usd(&format!("{n}0"), &format!("${n}0.00")),
                    token: "USDC".to_string(),
                    timestamp: format!("2025-01-0{n}T12:00:00Z"),
                    tx_hash: format!("0x{n:064x}"),
                    group_id: (n <= 3).then(|| FIXTURE_GROUP_ID.to_string()),
                };
                if n % 2 == 0 {
                    Payment::RepoFund {
                        repo_id: 1296269,
                        common,
                    }
                } else {
                    Payment::UserPayment {
                        recipient_id: 583231,
                        common,
                    }
                }
            })
            .collect();
        Self {
            users,
            repos,
            payments,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    api_key: Arc<str>,
    ledger: Arc<Ledger>,
}

pub fn app(api_key: &str) -> Router {
    app_with_ledger(api_key, Ledger::fixtures())
}

pub fn app_with_ledger(api_key: &str, ledger: Ledger) -> Router {
    let state = AppState {
        api_key: Arc::from(api_key),
        ledger: Arc::new(ledger),
    };
    Router::new()
        .route("/users/{login}/balance", get(user_balance_by_login))
        .route("/user/{github_id}/balance", get(user_balance_by_id))
        .route("/user/{github_id}/payments", get(payments_by_sender))
        .route("/repos/{owner}/{repo}/balance", get(repo_balance_by_name))
        .route("/repositories/{github_id}/balance", get(repo_balance_by_id))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .with_state(state)
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(api_key)).await
}

fn error(status: StatusCode, message: &str) -> Response {
    let body = ErrorBody {
        message: message.to_string(),
        request_id: Uuid::new_v4().to_string(),
    };
    (status, Json(body)).into_response()
}

async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    log::debug!("{} {}", request.method(), request.uri());
    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());
    if presented == Some(&*state.api_key) {
        next.run(request).await
    } else {
        log::info!("rejected {} without a valid api key", request.uri().path());
        error(StatusCode::UNAUTHORIZED, "invalid or missing api key")
    }
}

async fn user_balance_by_login(State(state): State<AppState>, Path(login): Path<String>) -> Response {
    match state.ledger.users.iter().find(|u| u.login.eq_ignore_ascii_case(&login)) {
        Some(user) => Json(user.clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, "user not found"),
    }
}

async fn user_balance_by_id(State(state): State<AppState>, Path(github_id): Path<u64>) -> Response {
    match state.ledger.users.iter().find(|u| u.user_id == github_id) {
        Some(user) => Json(user.clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, "user not found"),
    }
}

async fn repo_balance_by_name(
    State(state): State<AppState>,
    Path((owner, repo)): Path<(String, String)>,
) -> Response {
    let found = state
        .ledger
        .repos
        .iter()
        .find(|r| r.owner.eq_ignore_ascii_case(&owner) && r.repo.eq_ignore_ascii_case(&repo));
    match found {
        Some(repo) => Json(repo.clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, "repository not found"),
    }
}

async fn repo_balance_by_id(State(state): State<AppState>, Path(github_id): Path<u64>) -> Response {
    match state.ledger.repos.iter().find(|r| r.repo_id == github_id) {
        Some(repo) => Json(repo.clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, "repository not found"),
    }
}

async fn payments_by_sender(
    State(state): State<AppState>,
    Path(github_id): Path<u64>,
    Query(query): Query<PaymentsQuery>,
) -> Response {
    if !state.ledger.users.iter().any(|u| u.user_id == github_id) {
        return error(StatusCode::NOT_FOUND, "user not found");
    }
    let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return error(
            StatusCode::BAD_REQUEST,
            &format!("page_size must be between 1 and {MAX_PAGE_SIZE}"),
        );
    }
    let page = query.page.unwrap_or(1);
    if page == 0 {
        return error(StatusCode::BAD_REQUEST, "page must be at least 1");
    }

    let matching: Vec<&Payment> = state
        .ledger
        .payments
        .iter()
        .filter(|p| p.common().sender_id == github_id)
        .filter(|p| match &query.group_id {
            Some(group_id) => p.common().group_id.as_deref() == Some(group_id.as_str()),
            None => true,
        })
        .collect();
    let total_count = matching.len() as u64;
    let skip = (page as usize - 1) * page_size as usize;
    let items: Vec<Payment> = matching
        .into_iter()
        .skip(skip)
        .take(page_size as usize)
        .cloned()
        .collect();
    let has_next = ((skip + items.len()) as u64) < total_count;

    Json(Page {
        items,
        page,
        page_size,
        total_count,
        has_next,
    })
    .into_response()
}
