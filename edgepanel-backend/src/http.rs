use std::time::Duration;

use async_trait::async_trait;
use edgepanel_core::{
    config::TlsMode,
    err::{anyhow, bail, Context, Result},
};
use edgepanel_logging::{debug, MaxLogLength};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ConnectionConfig, QueryExecutor};

const USER_AGENT: &str = "EdgePanel/v1";

/// Executes EdgeQL using the instance's http interface
pub struct HttpExecutor {
    client: Client,
    endpoint: Url,
    user: String,
    password: Option<String>,
}

#[derive(Debug, Serialize)]
struct EdgeQlRequest<'a> {
    query: &'a str,
}

#[derive(Debug, Deserialize)]
struct EdgeQlResponse {
    #[serde(default)]
    data: Option<Vec<Value>>,
    #[serde(default)]
    error: Option<EdgeQlError>,
}

#[derive(Debug, Deserialize)]
struct EdgeQlError {
    message: String,
    #[serde(default, rename = "type")]
    r#type: Option<String>,
}

impl HttpExecutor {
    /// Creates an executor for the instance described by the config
    pub fn new(conf: &ConnectionConfig) -> Result<Self> {
        let base = conf.http_base_url()?;
        Self::with_base_url(conf, base)
    }

    /// Creates an executor which sends its requests to the supplied
    /// base url rather than the one derived from the config
    pub fn with_base_url(conf: &ConnectionConfig, base: Url) -> Result<Self> {
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT);

        builder = match conf.tls_mode {
            TlsMode::Strict => builder,
            TlsMode::NoHostVerification => builder.danger_accept_invalid_hostnames(true),
            TlsMode::Insecure => builder.danger_accept_invalid_certs(true),
        };

        let client = builder.build().context("Failed to build http client")?;

        // The database name is a single path segment, so it is percent-encoded
        let mut endpoint = base;
        endpoint
            .path_segments_mut()
            .map_err(|_| anyhow!("Failed to build edgeql endpoint url: base url cannot have a path"))?
            .pop_if_empty()
            .extend(["db", conf.database.as_str(), "edgeql"]);

        Ok(Self {
            client,
            endpoint,
            user: conf.user.clone(),
            password: conf.password.clone(),
        })
    }

    /// The url queries are posted to
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl QueryExecutor for HttpExecutor {
    async fn query_values(&self, query: &str) -> Result<Vec<Value>> {
        debug!("Executing edgeql: {}", MaxLogLength::new(Some(512), query));

        let mut request = self
            .client
            .post(self.endpoint.clone())
            .json(&EdgeQlRequest { query });

        if self.password.is_some() {
            request = request.basic_auth(&self.user, self.password.as_ref());
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Error during request to {}", self.endpoint))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        let parsed = match serde_json::from_str::<EdgeQlResponse>(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                bail!("Query failed with status {}: {}", status, body)
            }
            Err(err) => return Err(err).context("Failed to parse query response"),
        };

        if let Some(err) = parsed.error {
            match err.r#type {
                Some(ty) => bail!("{}: {}", ty, err.message),
                None => bail!("{}", err.message),
            }
        }

        if !status.is_success() {
            bail!("Query failed with status {}", status);
        }

        parsed
            .data
            .context("Query response did not contain any data")
    }
}
