//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use std::sync::Arc;

use merit_core::{
    parse_response, BalancesApi, BaseApi, CheckoutApi, CheckoutItem, CheckoutParams, ErrorKind, HttpMethod,
    HttpRequest, HttpResponse, HttpTransport, MeritConfig, OutgoingPayment, PaginatedResponse, PaymentsApi,
    PaymentsFilter, RepoBalance, TransportError, UserBalance,
};

const BASE_URL: &str = "http://localhost:3000";
const API_KEY: &str = "vector-key";

/// Vectors only exercise build and parse; executing a request is a bug.
struct NoNetwork;

impl HttpTransport for NoNetwork {
    fn execute(&self, _request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        Err(TransportError::new("test vectors never touch the network"))
    }
}

fn base() -> BaseApi {
    let config = MeritConfig::builder(API_KEY).base_url(BASE_URL).build().unwrap();
    BaseApi::new(&config, Arc::new(NoNetwork))
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn parse_kind(s: &str) -> ErrorKind {
    match s {
        "BadRequest" => ErrorKind::BadRequest,
        "Unauthorized" => ErrorKind::Unauthorized,
        "NotFound" => ErrorKind::NotFound,
        "InternalServer" => ErrorKind::InternalServer,
        "Api" => ErrorKind::Api,
        "Transport" => ErrorKind::Transport,
        "Decode" => ErrorKind::Decode,
        other => panic!("unknown error kind: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Balances
// ---------------------------------------------------------------------------

#[test]
fn balance_test_vectors() {
    let raw = include_str!("../../test-vectors/balances.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let api = BalancesApi::new(base());
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let args = &case["args"];
        let expected_req = &case["expected_request"];

        // Verify build
        let req = match case["operation"].as_str().unwrap() {
            "user_by_login" => api.build_user_balance_by_login(args["login"].as_str().unwrap()),
            "user_by_id" => api.build_user_balance_by_github_id(args["github_id"].as_u64().unwrap()),
            "repo_by_name" => {
                api.build_repo_balance_by_name(args["owner"].as_str().unwrap(), args["repo"].as_str().unwrap())
            }
            "repo_by_id" => api.build_repo_balance_by_github_id(args["github_id"].as_u64().unwrap()),
            other => panic!("unknown operation: {other}"),
        };
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: path");
        assert!(req.body.is_none(), "{name}: body should be None");

        let expected_headers: Vec<(String, String)> = expected_req["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");

        // Verify parse
        let parsed = if case["operation"].as_str().unwrap().starts_with("user") {
            serde_json::to_value(parse_response::<UserBalance>(simulated(case)).unwrap()).unwrap()
        } else {
            serde_json::to_value(parse_response::<RepoBalance>(simulated(case)).unwrap()).unwrap()
        };
        assert_eq!(parsed, case["expected_result"], "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn error_test_vectors() {
    let raw = include_str!("../../test-vectors/errors.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected = &case["expected_error"];

        let err = parse_response::<UserBalance>(simulated(case)).unwrap_err();
        assert_eq!(err.kind(), parse_kind(expected["kind"].as_str().unwrap()), "{name}: kind");
        assert_eq!(err.status().map(u64::from), expected["status"].as_u64(), "{name}: status");
        if let Some(message) = expected["message"].as_str() {
            assert_eq!(err.message(), message, "{name}: message");
        }
        assert_eq!(err.request_id(), expected["request_id"].as_str(), "{name}: request id");
    }
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

#[test]
fn payment_test_vectors() {
    let raw = include_str!("../../test-vectors/payments.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let api = PaymentsApi::new(base());
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let f = &case["filter"];
        let filter = PaymentsFilter {
            group_id: f["group_id"].as_str().map(str::to_string),
            page_size: f["page_size"].as_u64().map(|n| n as u32),
            page: f["page"].as_u64().map(|n| n as u32),
        };

        // Verify build
        let req = api.build_payments_by_sender(case["sender_github_id"].as_u64().unwrap(), &filter);
        assert_eq!(req.method, HttpMethod::Get, "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", case["expected_path"].as_str().unwrap()), "{name}: path");

        // Verify parse
        let page: PaginatedResponse<OutgoingPayment> = parse_response(simulated(case)).unwrap();
        let expected = &case["expected"];
        assert_eq!(page.items.len() as u64, expected["items"].as_u64().unwrap(), "{name}: items");
        assert_eq!(page.total_count, expected["total_count"].as_u64().unwrap(), "{name}: total_count");
        assert_eq!(page.has_next, expected["has_next"].as_bool().unwrap(), "{name}: has_next");
    }
}

// ---------------------------------------------------------------------------
// Checkout
// ---------------------------------------------------------------------------

#[test]
fn checkout_test_vectors() {
    let raw = include_str!("../../test-vectors/checkout.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let checkout_url = url::Url::parse(vectors["checkout_url"].as_str().unwrap()).unwrap();
    let api = CheckoutApi::new(checkout_url);
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let items: Vec<CheckoutItem> = serde_json::from_value(case["items"].clone()).unwrap();
        let params = CheckoutParams {
            items,
            group_id: case["group_id"].as_str().map(str::to_string),
            sender_github_id: case["sender"].as_u64(),
        };

        let url = api.generate_checkout_url(&params);
        assert_eq!(url, case["expected_url"].as_str().unwrap(), "{name}: url");
    }
}
