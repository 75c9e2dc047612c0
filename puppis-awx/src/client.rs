//! AWX HTTP client (reqwest-based)

use reqwest::{Client, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::config::{AwxAuth, AwxConfig};
use crate::error::{AwxError, AwxResult};
use crate::services::{
    CredentialsService, InventoriesService, JobTemplatesService, OrganizationsService,
    ProjectsService, SchedulesService, TeamsService, WorkflowJobTemplatesService,
    WorkflowNodesService,
};

/// HTTP client for the AWX v2 API.
///
/// Wraps `reqwest::Client` with authentication and error mapping. Resource
/// operations live on the per-family services returned by the accessor
/// methods.
#[derive(Debug, Clone)]
pub struct AwxClient {
    base_url: String,
    auth: AwxAuth,
    http: Client,
}

impl AwxClient {
    /// Create a new client from validated configuration
    pub fn new(config: AwxConfig) -> AwxResult<Self> {
        config.validate()?;

        let http = Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(!config.verify_tls)
            .user_agent(concat!("puppis/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AwxError::InvalidConfig(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth: config.auth,
            http,
        })
    }

    /// Create a client with a pre-built `reqwest::Client` (for testing)
    pub fn with_http_client(base_url: impl Into<String>, auth: AwxAuth, http: Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Verify the server is reachable and the credentials are accepted
    pub async fn ping(&self) -> AwxResult<()> {
        let _: serde_json::Value = self.get("me/").await?;
        Ok(())
    }

    // ── Service accessors ─────────────────────────────────────────────

    pub fn organizations(&self) -> OrganizationsService<'_> {
        OrganizationsService::new(self)
    }

    pub fn teams(&self) -> TeamsService<'_> {
        TeamsService::new(self)
    }

    pub fn projects(&self) -> ProjectsService<'_> {
        ProjectsService::new(self)
    }

    pub fn schedules(&self) -> SchedulesService<'_> {
        SchedulesService::new(self)
    }

    pub fn credentials(&self) -> CredentialsService<'_> {
        CredentialsService::new(self)
    }

    pub fn job_templates(&self) -> JobTemplatesService<'_> {
        JobTemplatesService::new(self)
    }

    pub fn workflow_job_templates(&self) -> WorkflowJobTemplatesService<'_> {
        WorkflowJobTemplatesService::new(self)
    }

    pub fn workflow_nodes(&self) -> WorkflowNodesService<'_> {
        WorkflowNodesService::new(self)
    }

    pub fn inventories(&self) -> InventoriesService<'_> {
        InventoriesService::new(self)
    }

    // ── Internal HTTP methods ─────────────────────────────────────────

    /// Build a full URL for a path under /api/v2/
    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v2/{}", self.base_url, path)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> AwxResult<T> {
        let url = self.api_url(path);
        debug!("GET {}", url);
        let builder = self.auth.apply(self.http.get(&url));
        let response = builder.send().await?;
        self.handle_response(response).await
    }

    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AwxResult<T> {
        let url = self.api_url(path);
        debug!("GET {} (query={:?})", url, query);
        let mut builder = self.auth.apply(self.http.get(&url));
        if !query.is_empty() {
            builder = builder.query(query);
        }
        let response = builder.send().await?;
        self.handle_response(response).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> AwxResult<T> {
        let url = self.api_url(path);
        debug!("POST {}", url);
        let builder = self.auth.apply(self.http.post(&url));
        let response = builder.json(body).send().await?;
        self.handle_response(response).await
    }

    /// POST where the server may answer 204 with no body (association
    /// endpoints)
    pub(crate) async fn post_no_content<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> AwxResult<()> {
        let url = self.api_url(path);
        debug!("POST {}", url);
        let builder = self.auth.apply(self.http.post(&url));
        let response = builder.json(body).send().await?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT || status.is_success() {
            Ok(())
        } else {
            self.handle_error_response(response).await
        }
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> AwxResult<T> {
        let url = self.api_url(path);
        debug!("PUT {}", url);
        let builder = self.auth.apply(self.http.put(&url));
        let response = builder.json(body).send().await?;
        self.handle_response(response).await
    }

    pub(crate) async fn delete(&self, path: &str) -> AwxResult<()> {
        let url = self.api_url(path);
        debug!("DELETE {}", url);
        let builder = self.auth.apply(self.http.delete(&url));
        let response = builder.send().await?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT || status.is_success() {
            Ok(())
        } else {
            self.handle_error_response(response).await
        }
    }

    // ── Response handling ─────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> AwxResult<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|e| AwxError::Decode(format!("Failed to parse response: {e}")))
        } else {
            self.handle_error_response(response).await
        }
    }

    async fn handle_error_response<T>(&self, response: reqwest::Response) -> AwxResult<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());
        let detail = extract_detail(&body).unwrap_or(body);

        match status {
            StatusCode::NOT_FOUND => Err(AwxError::NotFound(detail)),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AwxError::Auth {
                status: status.as_u16(),
                detail,
            }),
            _ => Err(AwxError::Api {
                status: status.as_u16(),
                detail,
            }),
        }
    }
}

/// Pull the "detail" field out of an AWX error body when present
fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(|d| d.as_str())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> AwxClient {
        AwxClient::with_http_client(
            base_url,
            AwxAuth::Bearer {
                token: "t".to_string(),
            },
            Client::new(),
        )
    }

    #[test]
    fn api_url_joins_paths() {
        let client = test_client("https://awx.example.com");
        assert_eq!(
            client.api_url("organizations/"),
            "https://awx.example.com/api/v2/organizations/"
        );
    }

    #[test]
    fn trailing_slash_is_normalized() {
        let client = test_client("https://awx.example.com/");
        assert_eq!(client.base_url(), "https://awx.example.com");
        assert_eq!(
            client.api_url("teams/1/"),
            "https://awx.example.com/api/v2/teams/1/"
        );
    }

    #[test]
    fn detail_extraction() {
        assert_eq!(
            extract_detail(r#"{"detail": "Not found."}"#),
            Some("Not found.".to_string())
        );
        assert_eq!(extract_detail(r#"{"name": ["required"]}"#), None);
        assert_eq!(extract_detail("not json"), None);
    }
}
