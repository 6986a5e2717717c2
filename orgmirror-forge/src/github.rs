//! Source host client for the GitHub REST API.

use orgmirror_core::{RepositoryDescriptor, SecretString};
use serde::Deserialize;
use tracing::debug;

use crate::client::{agent, DIAGNOSTIC_TIMEOUT, REQUEST_TIMEOUT};
use crate::error::{decode_error, from_ureq, ForgeError};
use crate::host::{OrgSummary, SourceHost, TokenReport};

const ACCEPT: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";

#[derive(Debug, Deserialize)]
struct UserPayload {
    login: String,
}

pub struct GitHubClient {
    api_url: String,
    token: SecretString,
    listing: ureq::Agent,
    diagnostics: ureq::Agent,
}

impl GitHubClient {
    /// `api_url` is the API root without a trailing slash, e.g.
    /// `https://api.github.com`.
    pub fn new(api_url: impl Into<String>, token: SecretString) -> Self {
        Self {
            api_url: api_url.into(),
            token,
            listing: agent(REQUEST_TIMEOUT),
            diagnostics: agent(DIAGNOSTIC_TIMEOUT),
        }
    }

    fn get(&self, agent: &ureq::Agent, url: &str) -> ureq::Request {
        agent
            .get(url)
            .set("Authorization", &format!("Bearer {}", self.token.expose()))
            .set("Accept", ACCEPT)
            .set("X-GitHub-Api-Version", API_VERSION)
    }
}

pub(crate) fn org_repos_url(api_url: &str, organization: &str) -> String {
    format!("{api_url}/orgs/{organization}/repos")
}

pub(crate) fn org_url(api_url: &str, organization: &str) -> String {
    format!("{api_url}/orgs/{organization}")
}

pub(crate) fn user_url(api_url: &str) -> String {
    format!("{api_url}/user")
}

fn token_report(status: u16, response: &ureq::Response) -> TokenReport {
    TokenReport {
        status,
        login: None,
        scopes: response.header("x-oauth-scopes").map(str::to_owned),
        rate_limit_remaining: response.header("x-ratelimit-remaining").map(str::to_owned),
    }
}

impl SourceHost for GitHubClient {
    fn list_repository_page(
        &self,
        organization: &str,
        page: u32,
        per_page: usize,
    ) -> Result<Vec<RepositoryDescriptor>, ForgeError> {
        let url = org_repos_url(&self.api_url, organization);
        debug!(page, url = %url, "fetching source repository page");

        let response = self
            .get(&self.listing, &url)
            .query("page", &page.to_string())
            .query("per_page", &per_page.to_string())
            .query("type", "all")
            .call()
            .map_err(|e| from_ureq(&url, e))?;

        response
            .into_json::<Vec<RepositoryDescriptor>>()
            .map_err(|e| decode_error(&url, e))
    }

    fn check_token(&self) -> Result<TokenReport, ForgeError> {
        let url = user_url(&self.api_url);
        match self.get(&self.diagnostics, &url).call() {
            Ok(response) => {
                let mut report = token_report(response.status(), &response);
                let user: UserPayload = response.into_json().map_err(|e| decode_error(&url, e))?;
                report.login = Some(user.login);
                Ok(report)
            }
            Err(ureq::Error::Status(status, response)) => Ok(token_report(status, &response)),
            Err(err) => Err(from_ureq(&url, err)),
        }
    }

    fn org_summary(&self, organization: &str) -> Result<OrgSummary, ForgeError> {
        let url = org_url(&self.api_url, organization);
        self.get(&self.diagnostics, &url)
            .call()
            .map_err(|e| from_ureq(&url, e))?
            .into_json::<OrgSummary>()
            .map_err(|e| decode_error(&url, e))
    }
}
