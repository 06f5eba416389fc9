//! Plain JSON fetches outside the main API.

use std::time::Duration;

use async_trait::async_trait;

use atelier_core::api::{EffectError, HttpGateway};

#[derive(Clone)]
pub struct JsonHttpGateway {
    http: reqwest::Client,
}

impl JsonHttpGateway {
    pub fn new(timeout_ms: u64) -> Result<Self, EffectError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(anyhow::Error::new)?;
        Ok(Self { http })
    }
}

#[async_trait]
impl HttpGateway for JsonHttpGateway {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, EffectError> {
        tracing::debug!(target: "atelier.http", stage = "get.in", url = %url);
        let resp = self.http.get(url).send().await.map_err(anyhow::Error::new)?;

        let status = resp.status();
        tracing::debug!(target: "atelier.http", stage = "get.out", status = %status);
        if !status.is_success() {
            return Err(EffectError::Http(status.as_u16()));
        }

        let doc = resp
            .json::<serde_json::Value>()
            .await
            .map_err(anyhow::Error::new)?;
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn test_get_json_parses_the_body() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/roster.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"contributors":[{"login":"ada"}]}"#)
            .create_async()
            .await;

        let gateway = JsonHttpGateway::new(1_000).unwrap();
        let doc = gateway
            .get_json(&format!("{}/roster.json", server.url()))
            .await
            .unwrap();
        assert_eq!(doc["contributors"][0]["login"], "ada");
    }

    #[tokio::test]
    async fn test_get_json_surfaces_the_status() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/roster.json")
            .with_status(404)
            .create_async()
            .await;

        let gateway = JsonHttpGateway::new(1_000).unwrap();
        let err = gateway
            .get_json(&format!("{}/roster.json", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, EffectError::Http(404)));
    }
}
