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

use async_trait::async_trait;
use reqwest::{Method, Url};
use serde_json::Value;

use crate::dns::{DnsRecord, RecordType};
use crate::error::{GandiError, HttpError, Result};
use crate::utils::request::{DnsHttpClient, HttpRequest, HttpResponse};

/// `object` of a 404 body when the whole zone is out of reach, as opposed to `dns-record`
/// when only the record is missing.
const RESOURCE_NOT_FOUND: &str = "HTTPNotFound";

/// Create, read, update and delete DNS records of one domain hosted on Gandi LiveDNS.
///
/// Every method fails with [`GandiError::Auth`] when the token is missing, expired, or has no
/// access to the domain, and with [`GandiError::Request`] on any other HTTP or network error.
/// Dropping a returned future cancels the request.
///
/// A record name of `""`, `.` or `..` fails with [`GandiError::OutOfRange`] without sending
/// anything, except that [`LiveDns::set`] writes a record with an empty name to
/// [`DnsRecord::ORIGIN`].
#[async_trait]
pub trait LiveDns: Send + Sync {
    /// Finds the records of the domain, optionally filtered by type and name, sorted
    /// ascending by name.
    ///
    /// Never returns `SOA`, `DS` or `DNSKEY` records, or the top-level `NS` record.
    async fn list(
        &self,
        record_type: Option<RecordType>,
        name: Option<&str>,
    ) -> Result<Vec<DnsRecord>>;

    /// Fetches the record with the given type and name, or `None` if there is none.
    async fn get(&self, record_type: RecordType, name: &str) -> Result<Option<DnsRecord>>;

    /// Fetches the record with the type and name of `query`; its TTL and values are ignored.
    async fn get_record(&self, query: &DnsRecord) -> Result<Option<DnsRecord>> {
        self.get(query.record_type(), query.name()).await
    }

    /// Creates the record, or replaces the existing record with the same type and name.
    ///
    /// Fails with [`GandiError::OutOfRange`] before sending anything if `record` has no
    /// values; use [`LiveDns::delete`] to remove a record.
    async fn set(&self, record: &DnsRecord) -> Result<()>;

    /// Deletes the records named `name`, of every type when `record_type` is `None`.
    ///
    /// Succeeds whether or not anything was deleted.
    async fn delete(&self, record_type: Option<RecordType>, name: &str) -> Result<()>;

    /// Deletes the record with the type and name of `record`; its TTL and values are ignored.
    async fn delete_record(&self, record: &DnsRecord) -> Result<()> {
        self.delete(Some(record.record_type()), record.name()).await
    }
}

/// [`LiveDns`] over HTTP, rooted at `livedns/domains/{domain}/records` under the API base.
#[derive(Debug, Clone)]
pub struct GandiLiveDns<C> {
    http_client: C,
    records_url: Url,
    domain: String,
}

impl<C: DnsHttpClient> GandiLiveDns<C> {
    /// Creates a handle for `domain`, the fully-qualified second-level domain whose DNS is
    /// managed by Gandi.
    ///
    /// `http_client` is used as is; attach authentication to it beforehand, as
    /// [`GandiClient::live_dns`](crate::GandiClient::live_dns) does.
    pub fn new(http_client: C, api_base: &Url, domain: impl Into<String>) -> Result<Self> {
        let domain = domain.into();
        let mut records_url = api_base.clone();
        records_url
            .path_segments_mut()
            .map_err(|()| GandiError::Config(format!("{api_base} cannot be used as an API base")))?
            .pop_if_empty()
            .extend(["livedns", "domains", domain.as_str(), "records"]);

        Ok(Self {
            http_client,
            records_url,
            domain,
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.records_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.extend(segments);
        }
        url
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
    ) -> std::result::Result<HttpResponse, HttpError> {
        let request = HttpRequest::new(method, url).accept_json();
        self.http_client.request(request).await?.error_for_status()
    }

    async fn put(
        &self,
        url: Url,
        record: &DnsRecord,
    ) -> std::result::Result<HttpResponse, HttpError> {
        let request = HttpRequest::new(Method::PUT, url).accept_json().json(record)?;
        self.http_client.request(request).await?.error_for_status()
    }

    fn auth_failure(source: HttpError) -> GandiError {
        GandiError::Auth {
            message: "Gandi auth failure".into(),
            source,
        }
    }

    fn foreign_token(&self, source: HttpError) -> GandiError {
        GandiError::Auth {
            message: format!("Gandi auth token is for the wrong domain, not {}", self.domain),
            source,
        }
    }

    fn wrong_domain(&self, source: HttpError) -> GandiError {
        tracing::debug!(domain = %self.domain, "404 reclassified as an authorization failure");
        GandiError::Auth {
            message: format!(
                "Not authorized to edit domain {}, check that the personal access token or API key is for the right domain",
                self.domain
            ),
            source,
        }
    }

    /// Maps a failed write. A token scoped to another domain cannot see this zone, so the
    /// server answers 404 instead of creating or deleting anything.
    fn write_error(&self, error: HttpError, message: impl FnOnce() -> String) -> GandiError {
        if error.is_not_found() {
            self.wrong_domain(error)
        } else if error.is_auth_status() {
            Self::auth_failure(error)
        } else {
            GandiError::Request {
                message: message(),
                source: error,
            }
        }
    }
}

/// Checks that `name` survives as its own path segment. The URL parser drops `.` and `..`
/// segments, which would widen a request to the parent collection.
fn path_name(name: &str) -> Result<&str> {
    let decoded = name.to_ascii_lowercase().replace("%2e", ".");
    if matches!(decoded.as_str(), "" | "." | "..") {
        return Err(GandiError::OutOfRange {
            parameter: "name",
            message: format!(
                "{name:?} is not a record name, use \"{}\" for the domain itself",
                DnsRecord::ORIGIN
            ),
        });
    }
    Ok(name)
}

/// True when a 404 body says the resource, not just the record, does not exist. Bodies that
/// are not JSON count as an ordinary missing record.
fn is_resource_not_found(error: &HttpError) -> bool {
    error
        .body()
        .and_then(|body| serde_json::from_str::<Value>(body).ok())
        .and_then(|body| {
            body.get("object")
                .and_then(Value::as_str)
                .map(|object| object == RESOURCE_NOT_FOUND)
        })
        .unwrap_or(false)
}

#[async_trait]
impl<C: DnsHttpClient> LiveDns for GandiLiveDns<C> {
    #[tracing::instrument(level = "debug", skip(self), fields(domain = %self.domain))]
    async fn list(
        &self,
        record_type: Option<RecordType>,
        name: Option<&str>,
    ) -> Result<Vec<DnsRecord>> {
        if let (Some(record_type), Some(name)) = (record_type, name) {
            // the single-record endpoint answers with an object, not an array
            return Ok(self.get(record_type, name).await?.into_iter().collect());
        }

        let url = match (name, record_type) {
            (Some(name), _) => self.endpoint(&[path_name(name)?]),
            (None, Some(record_type)) => {
                let mut url = self.endpoint(&[]);
                url.query_pairs_mut()
                    .append_pair("rrset_type", record_type.as_str());
                url
            }
            (None, None) => self.endpoint(&[]),
        };

        let result = self.send(Method::GET, url).await;
        match result.and_then(|response| response.json::<Vec<DnsRecord>>()) {
            Ok(mut records) => {
                records.sort_by(|a, b| a.name().cmp(b.name()));
                tracing::debug!(count = records.len(), "listed records");
                Ok(records)
            }
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            Err(e) if e.is_auth_status() => Err(Self::auth_failure(e)),
            Err(e) => Err(GandiError::Request {
                message: format!("Failed to find records in domain {}", self.domain),
                source: e,
            }),
        }
    }

    #[tracing::instrument(level = "debug", skip(self), fields(domain = %self.domain))]
    async fn get(&self, record_type: RecordType, name: &str) -> Result<Option<DnsRecord>> {
        let url = self.endpoint(&[path_name(name)?, record_type.as_str()]);

        let result = self.send(Method::GET, url).await;
        match result.and_then(|response| response.json::<DnsRecord>()) {
            Ok(record) => Ok(Some(record)),
            // a wrong type or name gives "dns-record" instead
            Err(e) if e.is_not_found() && is_resource_not_found(&e) => Err(self.foreign_token(e)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) if e.is_auth_status() => Err(Self::auth_failure(e)),
            Err(e) => Err(GandiError::Request {
                message: format!("Failed to get {record_type} record {name}"),
                source: e,
            }),
        }
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(domain = %self.domain, record_type = %record.record_type(), name = record.name())
    )]
    async fn set(&self, record: &DnsRecord) -> Result<()> {
        if record.values().is_empty() {
            return Err(GandiError::OutOfRange {
                parameter: "record",
                message: "When creating or modifying a DNS record, it must have one or more values. To delete an existing record, call delete instead of set.".into(),
            });
        }

        let record = record.sanitized();
        let url = self.endpoint(&[path_name(record.name())?, record.record_type().as_str()]);

        self.put(url, &record).await.map(drop).map_err(|e| {
            self.write_error(e, || {
                format!(
                    "Failed to create or modify {} record {}",
                    record.record_type(),
                    record.name()
                )
            })
        })
    }

    #[tracing::instrument(level = "debug", skip(self), fields(domain = %self.domain))]
    async fn delete(&self, record_type: Option<RecordType>, name: &str) -> Result<()> {
        let name = path_name(name)?;
        let url = match record_type {
            Some(record_type) => self.endpoint(&[name, record_type.as_str()]),
            None => self.endpoint(&[name]),
        };

        self.send(Method::DELETE, url)
            .await
            .map(drop)
            .map_err(|e| self.write_error(e, || format!("Failed to delete record {name}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn not_found(body: &str) -> HttpError {
        HttpError::Status {
            status: StatusCode::NOT_FOUND,
            body: body.into(),
        }
    }

    #[test]
    fn resource_not_found_body() {
        assert!(is_resource_not_found(&not_found(
            r#"{"object": "HTTPNotFound", "cause": "Not Found", "code": 404, "message": "The resource could not be found."}"#
        )));
        assert!(!is_resource_not_found(&not_found(
            r#"{"object": "dns-record", "cause": "Not Found", "code": 404, "message": "Can't find the DNS record missing/A in the zone"}"#
        )));
        assert!(!is_resource_not_found(&not_found("hargle invalid json")));
        assert!(!is_resource_not_found(&not_found("")));
        assert!(!is_resource_not_found(&HttpError::other("timeout")));
    }

    #[test]
    fn dot_segments_are_not_record_names() {
        for name in ["", ".", "..", "%2e", "%2E%2e", ".%2E"] {
            let err = path_name(name).unwrap_err();
            assert!(
                matches!(err, GandiError::OutOfRange { parameter: "name", .. }),
                "{name:?}"
            );
        }
        for name in ["@", "www", "_acme-challenge.www", "...", "*"] {
            assert_eq!(path_name(name).unwrap(), name);
        }
    }

    #[derive(Debug, Clone)]
    struct Unreachable;

    impl DnsHttpClient for Unreachable {
        async fn request(&self, _: HttpRequest) -> std::result::Result<HttpResponse, HttpError> {
            Err(HttpError::other("unreachable"))
        }
    }

    #[test]
    fn endpoints() {
        let base = Url::parse("https://api.gandi.net/v5/").unwrap();
        let live_dns = GandiLiveDns::new(Unreachable, &base, "example.com").unwrap();

        assert_eq!(live_dns.domain(), "example.com");
        assert_eq!(
            live_dns.endpoint(&[]).as_str(),
            "https://api.gandi.net/v5/livedns/domains/example.com/records"
        );
        assert_eq!(
            live_dns.endpoint(&["@", "A"]).as_str(),
            "https://api.gandi.net/v5/livedns/domains/example.com/records/@/A"
        );
    }

    #[test]
    fn base_without_trailing_slash() {
        let base = Url::parse("https://api.sandbox.gandi.net/v5").unwrap();
        let live_dns = GandiLiveDns::new(Unreachable, &base, "example.com").unwrap();
        assert_eq!(
            live_dns.endpoint(&["www"]).as_str(),
            "https://api.sandbox.gandi.net/v5/livedns/domains/example.com/records/www"
        );
    }

    #[test]
    fn opaque_base_is_rejected() {
        let base = Url::parse("mailto:dns@example.com").unwrap();
        let err = GandiLiveDns::new(Unreachable, &base, "example.com").unwrap_err();
        assert!(matches!(err, GandiError::Config(_)));
    }
}
