//! REST client for the Atelier API.

use std::time::Duration;

use async_trait::async_trait;

use atelier_core::api::{
    ApiConfig, AuthToken, EffectError, User, UserApi, Workspace, WorkspaceApi, WorkspaceId,
};

/// Shared client for the user and workspace endpoints.
#[derive(Clone)]
pub struct HttpApi {
    http: reqwest::Client,
    // Pre-built URL endpoints
    url_me: String,
    url_templates: String,
    url_workspaces: String,
}

impl HttpApi {
    pub fn new(cfg: &ApiConfig) -> Result<Self, EffectError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(anyhow::Error::new)?;
        let normalized = cfg.base_url.trim_end_matches('/');
        Ok(Self {
            http,
            url_me: format!("{}/v1/me", normalized),
            url_templates: format!("{}/v1/templates", normalized),
            url_workspaces: format!("{}/v1/workspaces", normalized),
        })
    }
}

fn status_error(status: reqwest::StatusCode) -> EffectError {
    match status.as_u16() {
        401 | 403 => EffectError::Unauthorized,
        code => EffectError::Http(code),
    }
}

#[async_trait]
impl UserApi for HttpApi {
    async fn get_current_user(&self, token: &AuthToken) -> Result<User, EffectError> {
        let url = &self.url_me;
        tracing::debug!(target: "atelier.api", stage = "me.in", url = %url);
        let resp = self
            .http
            .get(url)
            .bearer_auth(token.as_str())
            .send()
            .await
            .map_err(anyhow::Error::new)?;

        let status = resp.status();
        tracing::debug!(target: "atelier.api", stage = "me.out", status = %status);
        if !status.is_success() {
            return Err(status_error(status));
        }

        let user = resp.json::<User>().await.map_err(anyhow::Error::new)?;
        Ok(user)
    }

    async fn preload_templates(&self) {
        let url = &self.url_templates;
        tracing::debug!(target: "atelier.api", stage = "templates.in", url = %url);
        match self.http.get(url).send().await {
            Ok(resp) => {
                tracing::debug!(
                    target: "atelier.api",
                    stage = "templates.out",
                    status = %resp.status()
                );
            }
            Err(e) => {
                // Cache warming is opportunistic.
                tracing::debug!(target: "atelier.api", "template preload failed: {e}");
            }
        }
    }
}

#[async_trait]
impl WorkspaceApi for HttpApi {
    async fn fork(&self, id: &WorkspaceId) -> Result<Workspace, EffectError> {
        let url = format!("{}/{}/fork", self.url_workspaces, id);
        tracing::debug!(target: "atelier.api", stage = "fork.in", url = %url);
        let resp = self
            .http
            .post(&url)
            .send()
            .await
            .map_err(anyhow::Error::new)?;

        let status = resp.status();
        tracing::debug!(target: "atelier.api", stage = "fork.out", status = %status);
        if !status.is_success() {
            return Err(status_error(status));
        }

        let workspace = resp.json::<Workspace>().await.map_err(anyhow::Error::new)?;
        Ok(workspace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn api_for(server: &Server) -> HttpApi {
        HttpApi::new(&ApiConfig {
            base_url: server.url(),
            timeout_ms: 1_000,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_me_sends_the_bearer_token_and_maps_the_user() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/v1/me")
            .match_header("authorization", "Bearer tok-42")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"u1","username":"ada","subscription":{"amount_cents":900}}"#)
            .create_async()
            .await;

        let api = api_for(&server);
        let user = api
            .get_current_user(&AuthToken::new("tok-42"))
            .await
            .unwrap();
        assert_eq!(user.username, "ada");
        assert_eq!(user.subscription.unwrap().amount_cents, 900);
    }

    #[tokio::test]
    async fn test_me_rejection_maps_to_unauthorized() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/v1/me")
            .with_status(401)
            .create_async()
            .await;

        let api = api_for(&server);
        let err = api
            .get_current_user(&AuthToken::new("tok-stale"))
            .await
            .unwrap_err();
        assert!(matches!(err, EffectError::Unauthorized));
    }

    #[tokio::test]
    async fn test_me_server_error_carries_the_status() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/v1/me")
            .with_status(503)
            .create_async()
            .await;

        let api = api_for(&server);
        let err = api
            .get_current_user(&AuthToken::new("tok-42"))
            .await
            .unwrap_err();
        assert!(matches!(err, EffectError::Http(503)));
    }

    #[tokio::test]
    async fn test_fork_posts_to_the_workspace_endpoint() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/v1/workspaces/ws-1/fork")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id":"ws-2","name":"sketchbook","privacy":"public","owned":true,"frozen":false}"#,
            )
            .create_async()
            .await;

        let api = api_for(&server);
        let forked = api.fork(&WorkspaceId("ws-1".to_string())).await.unwrap();
        assert_eq!(forked.id.as_str(), "ws-2");
        assert!(forked.owned);
    }

    #[tokio::test]
    async fn test_preload_templates_swallows_failures() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/v1/templates")
            .with_status(500)
            .create_async()
            .await;

        let api = api_for(&server);
        api.preload_templates().await;
    }
}
