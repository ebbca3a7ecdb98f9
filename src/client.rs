// Copyright 2023 gandi-livedns authors
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use reqwest::Url;

use crate::auth::{AuthenticatedClient, GandiAuthentication};
use crate::dns::GandiLiveDns;
use crate::error::{GandiError, Result};
use crate::utils::request::{DEFAULT_TIMEOUT, DefaultDnsClient, DnsHttpClient};

/// Base URL of the Gandi v5 REST API.
pub const API_BASE: &str = "https://api.gandi.net/v5/";

/// Environment variable read by [`GandiClient::from_env`].
pub const AUTH_TOKEN_ENV: &str = "GANDI_AUTH";

/// Builder for [`GandiClient`].
#[derive(Debug, Clone)]
pub struct GandiClientBuilder {
    auth_token: Option<String>,
    api_base: Option<Url>,
    timeout: Duration,
}

impl Default for GandiClientBuilder {
    fn default() -> Self {
        Self {
            auth_token: None,
            api_base: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GandiClientBuilder {
    /// Personal access token, or legacy API key, with permission to manage the technical
    /// configuration of your domains.
    pub fn auth_token(mut self, auth_token: impl Into<String>) -> Self {
        self.auth_token = Some(auth_token.into());
        self
    }

    /// Overrides [`API_BASE`], for example to use the sandbox environment.
    pub fn api_base(mut self, api_base: Url) -> Self {
        self.api_base = Some(api_base);
        self
    }

    /// Request timeout of the transport created by [`build`](Self::build).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Constructs a client with a new `reqwest` transport.
    pub fn build(self) -> Result<GandiClient<DefaultDnsClient>> {
        let http_client = DefaultDnsClient::with_timeout(self.timeout)
            .map_err(|e| GandiError::Config(format!("failed to build HTTP client: {e}")))?;
        self.build_with(http_client)
    }

    /// Constructs a client that sends its requests through `http_client`.
    ///
    /// The configured timeout does not apply; it is up to `http_client`.
    pub fn build_with<T: DnsHttpClient>(self, http_client: T) -> Result<GandiClient<T>> {
        let api_base = match self.api_base {
            Some(api_base) => api_base,
            None => Url::parse(API_BASE)
                .map_err(|e| GandiError::Config(format!("invalid API base {API_BASE}: {e}")))?,
        };
        if api_base.cannot_be_a_base() {
            return Err(GandiError::Config(format!(
                "{api_base} cannot be used as an API base"
            )));
        }

        let auth_token = Arc::new(ArcSwapOption::from(self.auth_token.map(Arc::new)));
        let token = Arc::clone(&auth_token);
        let auth = GandiAuthentication::new(api_base.clone(), move || {
            token.load_full().map(|token| token.as_str().to_owned())
        });

        Ok(GandiClient {
            http_client: Arc::new(AuthenticatedClient::new(http_client, auth)),
            api_base,
            auth_token,
        })
    }
}

/// REST client for the Gandi v5 API.
///
/// A client holds at most one auth token. To use several tokens at once, build one client
/// per token; [`set_auth_token`](Self::set_auth_token) swaps the token for every request
/// sent afterwards, including those of existing [`GandiLiveDns`] handles.
///
/// The transport is shared by the client and every handle it creates, and is released
/// once all of them are dropped.
#[derive(Debug)]
pub struct GandiClient<T = DefaultDnsClient> {
    http_client: Arc<AuthenticatedClient<T>>,
    api_base: Url,
    auth_token: Arc<ArcSwapOption<String>>,
}

impl GandiClient<DefaultDnsClient> {
    pub fn builder() -> GandiClientBuilder {
        GandiClientBuilder::default()
    }

    /// Client with the default configuration and the given token.
    pub fn new(auth_token: impl Into<String>) -> Result<Self> {
        Self::builder().auth_token(auth_token).build()
    }

    /// Client whose token is read from the `GANDI_AUTH` environment variable.
    pub fn from_env() -> Result<Self> {
        let auth_token = std::env::var(AUTH_TOKEN_ENV).map_err(|e| {
            GandiError::Config(format!(
                "pass a Gandi personal access token or API key in {AUTH_TOKEN_ENV}: {e}"
            ))
        })?;
        Self::new(auth_token)
    }
}

impl<T: DnsHttpClient> GandiClient<T> {
    /// The authenticated transport. Requests sent through it to other hosts never receive
    /// the token.
    pub fn http_client(&self) -> &Arc<AuthenticatedClient<T>> {
        &self.http_client
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    pub fn auth_token(&self) -> Option<String> {
        self.auth_token
            .load_full()
            .map(|token| token.as_str().to_owned())
    }

    pub fn set_auth_token(&self, auth_token: Option<String>) {
        self.auth_token.store(auth_token.map(Arc::new));
    }

    /// LiveDNS handle for `domain`, a fully-qualified second-level domain registered with
    /// Gandi whose DNS is managed there.
    pub fn live_dns(
        &self,
        domain: impl Into<String>,
    ) -> Result<GandiLiveDns<Arc<AuthenticatedClient<T>>>> {
        GandiLiveDns::new(Arc::clone(&self.http_client), &self.api_base, domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction() {
        let client = GandiClient::builder().build().unwrap();
        assert_eq!(client.api_base().as_str(), API_BASE);
        assert_eq!(client.auth_token(), None);
    }

    #[test]
    fn auth_token() {
        let client = GandiClient::new("4b456787b41fa06d679d43822abcc9f11a6684e7").unwrap();
        assert_eq!(
            client.auth_token().as_deref(),
            Some("4b456787b41fa06d679d43822abcc9f11a6684e7")
        );

        client.set_auth_token(Some("ecaf24354b1ed098d3c30eae2477b32665b383fe".into()));
        assert_eq!(
            client.auth_token().as_deref(),
            Some("ecaf24354b1ed098d3c30eae2477b32665b383fe")
        );

        client.set_auth_token(None);
        assert_eq!(client.auth_token(), None);
    }

    // the only test that touches GANDI_AUTH, so the two cases share it
    #[test]
    fn from_env() {
        unsafe { std::env::remove_var(AUTH_TOKEN_ENV) };
        let err = GandiClient::from_env().unwrap_err();
        assert!(matches!(err, GandiError::Config(_)), "{err:?}");
        assert!(err.to_string().contains(AUTH_TOKEN_ENV));

        unsafe { std::env::set_var(AUTH_TOKEN_ENV, "dZiBqfkRztGO9nzXp1G6vxax") };
        let client = GandiClient::from_env().unwrap();
        unsafe { std::env::remove_var(AUTH_TOKEN_ENV) };
        assert_eq!(client.auth_token().as_deref(), Some("dZiBqfkRztGO9nzXp1G6vxax"));
        assert_eq!(client.api_base().as_str(), API_BASE);
    }

    #[test]
    fn opaque_api_base_is_rejected() {
        let err = GandiClient::builder()
            .api_base(Url::parse("data:text/plain,gandi").unwrap())
            .build()
            .unwrap_err();
        assert!(matches!(err, GandiError::Config(_)));
    }

    #[test]
    fn live_dns_handles_share_the_transport() {
        let client = GandiClient::new("7abf9633e407ca1452c59bf0a607af8d452a2607").unwrap();
        let first = client.live_dns("example.com").unwrap();
        let second = client.live_dns("example.org").unwrap();

        assert_eq!(first.domain(), "example.com");
        assert_eq!(second.domain(), "example.org");
        assert_eq!(Arc::strong_count(client.http_client()), 3);

        drop(first);
        drop(second);
        assert_eq!(Arc::strong_count(client.http_client()), 1);
    }
}
