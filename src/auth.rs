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

use std::fmt;
use std::sync::Arc;

use reqwest::Url;
use reqwest::header::{AUTHORIZATION, HeaderValue};

use crate::error::HttpError;
use crate::utils::request::{DnsHttpClient, HttpRequest, HttpResponse};

const API_KEY_SCHEME: &str = "Apikey";
const BEARER_SCHEME: &str = "Bearer";

/// Length of a legacy API key. Personal access tokens are 40 characters.
const API_KEY_LENGTH: usize = 24;

type TokenProvider = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// Adds an `Authorization` header to requests bound for the Gandi API.
///
/// The token is fetched from the provider for every request, so a rotated token is used
/// as soon as it is set.
#[derive(Clone)]
pub struct GandiAuthentication {
    api_base: Url,
    token_provider: TokenProvider,
}

impl GandiAuthentication {
    pub fn new<F>(api_base: Url, token_provider: F) -> Self
    where
        F: Fn() -> Option<String> + Send + Sync + 'static,
    {
        Self {
            api_base,
            token_provider: Arc::new(token_provider),
        }
    }

    /// Authenticates `request` unless it already carries an `Authorization` header, targets
    /// a URL outside the API base, or there is no token.
    ///
    /// 24-character tokens are API keys and use the `Apikey` scheme; anything else is taken
    /// to be a personal access token and uses `Bearer`.
    pub fn filter(&self, request: &mut HttpRequest) {
        if request.headers.contains_key(AUTHORIZATION)
            || !is_base_of(&self.api_base, &request.url)
        {
            return;
        }
        let Some(token) = (self.token_provider)() else {
            return;
        };

        let scheme = if token.chars().count() == API_KEY_LENGTH {
            API_KEY_SCHEME
        } else {
            BEARER_SCHEME
        };
        match HeaderValue::from_str(&format!("{scheme} {token}")) {
            Ok(mut value) => {
                value.set_sensitive(true);
                request.headers.insert(AUTHORIZATION, value);
            }
            Err(_) => {
                tracing::warn!("auth token is not a valid header value, sending without it");
            }
        }
    }
}

impl fmt::Debug for GandiAuthentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GandiAuthentication")
            .field("api_base", &self.api_base.as_str())
            .finish_non_exhaustive()
    }
}

/// True when `url` is `base` or lies beneath it.
fn is_base_of(base: &Url, url: &Url) -> bool {
    base.scheme() == url.scheme()
        && base.host() == url.host()
        && base.port_or_known_default() == url.port_or_known_default()
        && url
            .path()
            .strip_prefix(base.path().trim_end_matches('/'))
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// [`DnsHttpClient`] that runs [`GandiAuthentication`] on every request before handing it
/// to the wrapped transport.
#[derive(Debug)]
pub struct AuthenticatedClient<T> {
    inner: T,
    auth: GandiAuthentication,
}

impl<T: DnsHttpClient> AuthenticatedClient<T> {
    pub fn new(inner: T, auth: GandiAuthentication) -> Self {
        Self { inner, auth }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: DnsHttpClient> DnsHttpClient for AuthenticatedClient<T> {
    fn request(
        &self,
        mut request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, HttpError>> + Send {
        self.auth.filter(&mut request);
        self.inner.request(request)
    }
}
