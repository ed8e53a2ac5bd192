use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::PersistenceGateway;
use crate::error::{LinkError, Result};
use crate::model::StoredLink;

const FALLBACK_MESSAGE: &str = "Something went wrong";

/// [`PersistenceGateway`] backed by the profile service's `/links` endpoint.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> linkcard::Result<()> {
/// use linkcard::{HttpGateway, LinkEditor};
///
/// let gateway = HttpGateway::new("http://localhost:5000", "user-42").with_token("secret");
/// let mut editor = LinkEditor::new();
/// editor.load(gateway.fetch_links().await?)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpGateway {
    http: reqwest::Client,
    base_url: String,
    user_id: String,
    token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateLinksRequest<'a> {
    user_id: &'a str,
    links: &'a [StoredLink],
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateLinksResponse {
    #[serde(default)]
    success: bool,
    error: Option<String>,
    updated_links: Option<Vec<StoredLink>>,
}

#[derive(Debug, Default, Deserialize)]
struct LinksResponse {
    links: Option<Vec<StoredLink>>,
    error: Option<String>,
}

impl HttpGateway {
    /// Create a gateway for `user_id` talking to the service at `base_url`.
    pub fn new(base_url: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, user_id)
    }

    /// Create a gateway using the provided [`reqwest::Client`].
    ///
    /// Use this when you need to configure timeouts, proxies, headers, etc.
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            http: client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_id: user_id.into(),
            token: None,
        }
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn links_url(&self) -> String {
        format!("{}/links", self.base_url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Fetch the stored link list of the user, for [`LinkEditor::load`](crate::LinkEditor::load).
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub async fn fetch_links(&self) -> Result<Vec<StoredLink>> {
        let url = self.links_url();
        debug!(url, "fetching links");

        let request = self
            .http
            .get(&url)
            .query(&[("userId", self.user_id.as_str())]);
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| LinkError::Http {
                url: url.clone(),
                source: e,
            })?;

        let status = response.status();
        let body = read_body::<LinksResponse>(&url, status, response).await?;
        if !status.is_success() {
            return Err(rejected(url, status, body.error));
        }
        Ok(body.links.unwrap_or_default())
    }
}

impl PersistenceGateway for HttpGateway {
    #[instrument(skip(self, links), fields(user_id = %self.user_id, count = links.len()))]
    async fn submit(&self, links: &[StoredLink]) -> Result<Vec<StoredLink>> {
        let url = self.links_url();
        let payload = UpdateLinksRequest {
            user_id: &self.user_id,
            links,
        };

        let request = self.http.patch(&url).json(&payload);
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| LinkError::Http {
                url: url.clone(),
                source: e,
            })?;

        let status = response.status();
        let body = read_body::<UpdateLinksResponse>(&url, status, response).await?;
        interpret_update(url, status, body, links)
    }
}

/// Decode a JSON body. Error statuses may come without one; those decode to
/// the default so the status is still reported.
async fn read_body<T>(url: &str, status: reqwest::StatusCode, response: reqwest::Response) -> Result<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    match response.json::<T>().await {
        Ok(body) => Ok(body),
        Err(e) if !status.is_success() => {
            debug!(url, %status, error = %e, "error response without a readable body");
            Ok(T::default())
        }
        Err(e) => Err(LinkError::ResponseBody {
            url: url.to_owned(),
            source: e,
        }),
    }
}

fn interpret_update(
    url: String,
    status: reqwest::StatusCode,
    body: UpdateLinksResponse,
    submitted: &[StoredLink],
) -> Result<Vec<StoredLink>> {
    if !status.is_success() {
        return Err(rejected(url, status, body.error));
    }
    if !body.success {
        return Err(LinkError::Persistence {
            message: body.error.unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
        });
    }
    match body.updated_links {
        Some(links) => Ok(links),
        None => {
            warn!(url, "save response carried no links, keeping submitted list");
            Ok(submitted.to_vec())
        }
    }
}

fn rejected(url: String, status: reqwest::StatusCode, error: Option<String>) -> LinkError {
    LinkError::Rejected {
        url,
        status,
        message: error.unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
    }
}
