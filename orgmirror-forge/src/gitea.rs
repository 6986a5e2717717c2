//! Mirror host client for Gitea-compatible APIs (Gitea, Forgejo, Codeberg).

use orgmirror_core::{RepoName, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::{agent, REQUEST_TIMEOUT};
use crate::error::{decode_error, from_ureq, status_error, ForgeError};
use crate::host::{CreateOutcome, CreateRepository, MirrorHost};

const HTTP_OK: u16 = 200;
const HTTP_CREATED: u16 = 201;
const HTTP_CONFLICT: u16 = 409;

#[derive(Debug, Deserialize)]
struct NamedRepo {
    name: String,
}

#[derive(Debug, Serialize)]
struct VisibilityPatch {
    private: bool,
}

pub struct GiteaClient {
    api_url: String,
    token: SecretString,
    agent: ureq::Agent,
}

impl GiteaClient {
    /// `api_url` is the API root without a trailing slash, e.g.
    /// `https://codeberg.org/api/v1`.
    pub fn new(api_url: impl Into<String>, token: SecretString) -> Self {
        Self {
            api_url: api_url.into(),
            token,
            agent: agent(REQUEST_TIMEOUT),
        }
    }

    fn authorize(&self, request: ureq::Request) -> ureq::Request {
        request
            .set("Authorization", &format!("token {}", self.token.expose()))
            .set("Accept", "application/json")
    }
}

pub(crate) fn org_repos_url(api_url: &str, organization: &str) -> String {
    format!("{api_url}/orgs/{organization}/repos")
}

pub(crate) fn repo_url(api_url: &str, organization: &str, name: &str) -> String {
    format!("{api_url}/repos/{organization}/{name}")
}

/// Map a creation response status onto its outcome. 201 and 409 both mean
/// the repository now exists.
pub(crate) fn create_outcome(status: u16) -> Option<CreateOutcome> {
    match status {
        HTTP_CREATED => Some(CreateOutcome::Created),
        HTTP_CONFLICT => Some(CreateOutcome::AlreadyExists),
        _ => None,
    }
}

impl MirrorHost for GiteaClient {
    fn list_repository_page(
        &self,
        organization: &str,
        page: u32,
        limit: usize,
    ) -> Result<Vec<RepoName>, ForgeError> {
        let url = org_repos_url(&self.api_url, organization);
        debug!(page, url = %url, "fetching mirror repository page");

        let repos: Vec<NamedRepo> = self
            .authorize(self.agent.get(&url))
            .query("page", &page.to_string())
            .query("limit", &limit.to_string())
            .call()
            .map_err(|e| from_ureq(&url, e))?
            .into_json()
            .map_err(|e| decode_error(&url, e))?;

        Ok(repos.into_iter().map(|r| RepoName::from(r.name)).collect())
    }

    fn create_repository(
        &self,
        organization: &str,
        request: &CreateRepository,
    ) -> Result<CreateOutcome, ForgeError> {
        let url = org_repos_url(&self.api_url, organization);
        let result = self
            .authorize(self.agent.post(&url))
            .set("Content-Type", "application/json")
            .send_json(request);

        let (status, response) = match result {
            Ok(response) => (response.status(), response),
            Err(ureq::Error::Status(status, response)) => (status, response),
            Err(err) => return Err(from_ureq(&url, err)),
        };
        create_outcome(status).ok_or_else(|| status_error(&url, status, response))
    }

    fn update_visibility(
        &self,
        organization: &str,
        name: &str,
        private: bool,
    ) -> Result<(), ForgeError> {
        let url = repo_url(&self.api_url, organization, name);
        let response = self
            .authorize(self.agent.patch(&url))
            .set("Content-Type", "application/json")
            .send_json(VisibilityPatch { private })
            .map_err(|e| from_ureq(&url, e))?;

        if response.status() != HTTP_OK {
            let status = response.status();
            return Err(status_error(&url, status, response));
        }
        Ok(())
    }
}
