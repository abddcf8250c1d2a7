//! YNAB API client (read side)

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;
use zeroize::Zeroizing;

use super::{BudgetSource, HTTP_TIMEOUT_SECS, USER_AGENT};
use crate::error::{SyncError, SyncResult};
use crate::models::{CategoryGroup, CategoryGroupIndex, Transaction};

const BASE_URL: &str = "https://api.ynab.com/v1";

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct TransactionsData {
    transactions: Vec<Transaction>,
}

#[derive(Deserialize)]
struct CategoriesData {
    category_groups: Vec<CategoryGroup>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    id: String,
    name: String,
    #[serde(default)]
    detail: Option<String>,
}

/// Blocking client for one YNAB budget
pub struct YnabClient {
    client: Client,
    base_url: String,
    token: Zeroizing<String>,
    budget_id: String,
}

impl YnabClient {
    pub fn new(token: Zeroizing<String>, budget_id: impl Into<String>) -> SyncResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: BASE_URL.to_string(),
            token,
            budget_id: budget_id.into(),
        })
    }

    /// Point the client at another host (proxies, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn budget_id(&self) -> &str {
        &self.budget_id
    }

    fn get(&self, path: &str, query: &[(&str, String)]) -> SyncResult<String> {
        let url = format!("{}/budgets/{}/{}", self.base_url, self.budget_id, path);
        debug!(url = %url, "GET");

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.token.as_str())
            .query(query)
            .send()?;

        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(SyncError::Source(describe_error(status.as_u16(), &body)));
        }

        Ok(body)
    }
}

impl BudgetSource for YnabClient {
    fn list_transactions_since(&self, since: NaiveDate) -> SyncResult<Vec<Transaction>> {
        let body = self.get(
            "transactions",
            &[("since_date", since.format("%Y-%m-%d").to_string())],
        )?;
        parse_transactions(&body)
    }

    fn list_category_groups(&self) -> SyncResult<CategoryGroupIndex> {
        let body = self.get("categories", &[])?;
        parse_category_groups(&body)
    }
}

/// Parse a `GET /budgets/{id}/transactions` response body
pub fn parse_transactions(body: &str) -> SyncResult<Vec<Transaction>> {
    let envelope: DataEnvelope<TransactionsData> = serde_json::from_str(body)
        .map_err(|e| SyncError::Source(format!("Unexpected transactions response: {}", e)))?;
    Ok(envelope.data.transactions)
}

/// Parse a `GET /budgets/{id}/categories` response body into a group index
pub fn parse_category_groups(body: &str) -> SyncResult<CategoryGroupIndex> {
    let envelope: DataEnvelope<CategoriesData> = serde_json::from_str(body)
        .map_err(|e| SyncError::Source(format!("Unexpected categories response: {}", e)))?;
    Ok(CategoryGroupIndex::from_groups(&envelope.data.category_groups))
}

fn describe_error(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => format!(
            "{} {} ({}){}",
            status,
            envelope.error.name,
            envelope.error.id,
            envelope
                .error
                .detail
                .map(|d| format!(": {}", d))
                .unwrap_or_default()
        ),
        Err(_) => format!("{} {}", status, body.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClearingStatus;
    use mockito::Matcher;

    fn client(server: &mockito::Server) -> YnabClient {
        YnabClient::new(Zeroizing::new("ynab-token".into()), "b1")
            .unwrap()
            .with_base_url(server.url())
    }

    #[test]
    fn test_parse_transactions() {
        let body = r#"{
            "data": {
                "transactions": [
                    {
                        "id": "t1",
                        "date": "2024-03-01",
                        "amount": -4250,
                        "memo": null,
                        "cleared": "cleared",
                        "approved": true,
                        "account_id": "a1",
                        "payee_name": "Market",
                        "category_id": "c1",
                        "category_name": "Groceries",
                        "deleted": false,
                        "subtransactions": []
                    },
                    {
                        "id": "t2",
                        "date": "2024-03-02",
                        "amount": 1000,
                        "cleared": "uncleared",
                        "category_id": null
                    }
                ],
                "server_knowledge": 12
            }
        }"#;

        let txns = parse_transactions(body).unwrap();
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].category_name.as_deref(), Some("Groceries"));
        assert_eq!(txns[1].cleared, ClearingStatus::Uncleared);
        assert_eq!(txns[1].category_id, None);
    }

    #[test]
    fn test_parse_category_groups() {
        let body = r#"{
            "data": {
                "category_groups": [
                    {
                        "id": "g1",
                        "name": "Shared",
                        "hidden": false,
                        "deleted": false,
                        "categories": [
                            {"id": "c1", "category_group_id": "g1", "name": "Groceries", "budgeted": 0}
                        ]
                    },
                    {"id": "g2", "name": "Internal Master Category", "categories": []}
                ],
                "server_knowledge": 3
            }
        }"#;

        let index = parse_category_groups(body).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.group_name(&"c1".into()), Some("Shared"));
    }

    #[test]
    fn test_parse_rejects_unexpected_shape() {
        let err = parse_transactions(r#"{"transactions": []}"#).unwrap_err();
        assert!(matches!(err, SyncError::Source(_)));
    }

    #[test]
    fn test_describe_api_error() {
        let body = r#"{"error": {"id": "401", "name": "unauthorized", "detail": "Unauthorized"}}"#;
        assert_eq!(describe_error(401, body), "401 unauthorized (401): Unauthorized");
        assert_eq!(describe_error(502, "Bad Gateway\n"), "502 Bad Gateway");
    }

    #[test]
    fn test_base_url_override_trims_slash() {
        let client = YnabClient::new(Zeroizing::new("t".into()), "b1")
            .unwrap()
            .with_base_url("http://localhost:9000/v1/");
        assert_eq!(client.base_url, "http://localhost:9000/v1");
        assert_eq!(client.budget_id(), "b1");
    }

    #[test]
    fn test_list_transactions_sends_token_and_since_date() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/budgets/b1/transactions")
            .match_header("authorization", "Bearer ynab-token")
            .match_query(Matcher::UrlEncoded(
                "since_date".into(),
                "2024-03-01".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"data": {"transactions": [
                    {"id": "t1", "date": "2024-03-02", "amount": -4250, "cleared": "cleared"}
                ]}}"#,
            )
            .create();

        let txns = client(&server)
            .list_transactions_since(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
            .unwrap();

        mock.assert();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].id.as_str(), "t1");
    }

    #[test]
    fn test_list_category_groups_over_http() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/budgets/b1/categories")
            .match_header("authorization", "Bearer ynab-token")
            .with_status(200)
            .with_body(
                r#"{"data": {"category_groups": [
                    {"id": "g1", "name": "Shared", "categories": [{"id": "c1", "name": "Groceries"}]}
                ]}}"#,
            )
            .create();

        let index = client(&server).list_category_groups().unwrap();

        mock.assert();
        assert_eq!(index.group_name(&"c1".into()), Some("Shared"));
    }

    #[test]
    fn test_unauthorized_is_a_source_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/budgets/b1/categories")
            .with_status(401)
            .with_body(r#"{"error": {"id": "401", "name": "unauthorized", "detail": "Unauthorized"}}"#)
            .create();

        let err = client(&server).list_category_groups().unwrap_err();

        assert!(matches!(err, SyncError::Source(_)));
        assert!(err.to_string().contains("401 unauthorized"));
        assert!(!err.is_per_item());
    }
}
