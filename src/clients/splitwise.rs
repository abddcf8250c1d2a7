//! Splitwise API client (write side)

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;
use zeroize::Zeroizing;

use super::{ExpenseSink, HTTP_TIMEOUT_SECS, USER_AGENT};
use crate::error::{SyncError, SyncResult};
use crate::models::{CreatedExpense, ExpenseRequest};

const BASE_URL: &str = "https://secure.splitwise.com/api/v3.0";

#[derive(Deserialize)]
struct CreateExpenseResponse {
    #[serde(default)]
    expenses: Vec<ExpenseRef>,
    #[serde(default)]
    errors: Value,
}

#[derive(Deserialize)]
struct ExpenseRef {
    id: u64,
}

/// Blocking Splitwise client authenticated with an API key
pub struct SplitwiseClient {
    client: Client,
    base_url: String,
    api_key: Zeroizing<String>,
}

impl SplitwiseClient {
    pub fn new(api_key: Zeroizing<String>) -> SyncResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: BASE_URL.to_string(),
            api_key,
        })
    }

    /// Point the client at another host (proxies, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl ExpenseSink for SplitwiseClient {
    fn create_expense(&self, request: &ExpenseRequest) -> SyncResult<CreatedExpense> {
        let url = format!("{}/create_expense", self.base_url);
        debug!(url = %url, source_id = %request.source_id, "POST");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.as_str())
            .json(&expense_payload(request))
            .send()
            .map_err(|e| SyncError::Destination(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| SyncError::Destination(e.to_string()))?;

        if !status.is_success() {
            return Err(SyncError::Destination(format!(
                "{} {}",
                status.as_u16(),
                body.trim()
            )));
        }

        parse_create_response(&body)
    }
}

/// JSON body for `POST /create_expense`, split equally across the group
pub fn expense_payload(request: &ExpenseRequest) -> Value {
    let mut payload = json!({
        "cost": request.amount.to_decimal_string(),
        "description": request.name,
        "details": request.description,
        "date": request.date.format("%Y-%m-%d").to_string(),
        "group_id": request.group_id,
        "split_equally": true,
    });

    if let Some(category_id) = request.category_id {
        payload["category_id"] = json!(category_id);
    }

    payload
}

/// Interpret a create-expense response body
///
/// Splitwise reports validation failures with a 200 status and a non-empty
/// `errors` object.
pub fn parse_create_response(body: &str) -> SyncResult<CreatedExpense> {
    let response: CreateExpenseResponse = serde_json::from_str(body)
        .map_err(|e| SyncError::Destination(format!("Unexpected response: {}", e)))?;

    let has_errors = match &response.errors {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    };

    if has_errors {
        return Err(SyncError::Destination(response.errors.to_string()));
    }

    Ok(CreatedExpense {
        id: response.expenses.first().map(|e| e.id),
    })
}
