//! Wrappers for B2B dynamic pricing rules. Rule creation accepts an optional
//! name and priority which the backend reads as query parameters.

use super::types::{PricingRule, RateType};
use super::ApiClient;
use crate::error::ApiError;
use serde::Serialize;

#[derive(Serialize)]
struct RuleCreate {
    rate: f64,
    rate_type: RateType,
}

#[derive(Serialize)]
struct RuleCreateQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<i32>,
}

impl ApiClient {
    /// List all pricing rules for a lot, highest priority first.
    ///
    /// # Errors
    /// Propagates transport and backend errors.
    pub async fn pricing_rules(&self, lot_id: &str) -> Result<Vec<PricingRule>, ApiError> {
        self.get_json(&format!("/api/b2b/lots/{lot_id}/rules")).await
    }

    /// Create a rule for a lot.
    ///
    /// # Errors
    /// Propagates transport and backend errors.
    pub async fn create_pricing_rule(
        &self,
        lot_id: &str,
        rate: f64,
        rate_type: RateType,
        name: Option<&str>,
        priority: Option<i32>,
    ) -> Result<PricingRule, ApiError> {
        self.post_json_query(
            &format!("/api/b2b/lots/{lot_id}/rules"),
            &RuleCreate { rate, rate_type },
            &RuleCreateQuery { name, priority },
        )
        .await
    }

    /// # Errors
    /// Propagates transport and backend errors.
    pub async fn delete_pricing_rule(&self, rule_id: &str) -> Result<(), ApiError> {
        self.delete_empty(&format!("/api/b2b/rules/{rule_id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::session::{MemorySessionStorage, SessionStore};
    use anyhow::Result;
    use serde_json::json;
    use std::net::TcpListener;
    use std::sync::Arc;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn client_for(server: &MockServer) -> Result<ApiClient> {
        let config = AppConfig {
            api_base_url: server.uri(),
            maps_api_key: String::new(),
            payment_public_key: String::new(),
        };
        let store = Arc::new(SessionStore::new(Box::new(MemorySessionStorage::new())));
        Ok(ApiClient::new(&config, store)?)
    }

    #[tokio::test]
    async fn create_rule_sends_name_and_priority_as_query() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let client = client_for(&server)?;

        Mock::given(method("POST"))
            .and(path("/api/b2b/lots/lot-1/rules"))
            .and(query_param("name", "Weekend Surge"))
            .and(query_param("priority", "10"))
            .and(body_json(json!({"rate": 120.0, "rate_type": "FLAT"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "rule-2",
                "lot_id": "lot-1",
                "name": "Weekend Surge",
                "rate": 120.0,
                "rate_type": "FLAT",
                "is_active": true,
                "priority": 10
            })))
            .mount(&server)
            .await;

        let rule = client
            .create_pricing_rule("lot-1", 120.0, RateType::Flat, Some("Weekend Surge"), Some(10))
            .await?;
        assert_eq!(rule.priority, 10);
        Ok(())
    }

    #[tokio::test]
    async fn delete_rule_accepts_message_body() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let client = client_for(&server)?;

        Mock::given(method("DELETE"))
            .and(path("/api/b2b/rules/rule-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "deleted"})))
            .mount(&server)
            .await;

        client.delete_pricing_rule("rule-2").await?;
        Ok(())
    }
}
