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
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::dns::RecordType;

/// A DNS record stored on the LiveDNS servers.
///
/// Two records are equal when their type, name, TTL and values (in order) are all equal.
/// The server keys records by `(type, name)`: there is at most one record for each pair.
///
/// The JSON form is the one LiveDNS speaks:
///
/// ```json
/// {"rrset_type":"A","rrset_name":"@","rrset_ttl":300,"rrset_values":["67.210.32.33"]}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DnsRecord {
    #[serde(rename = "rrset_type")]
    record_type: RecordType,
    #[serde(rename = "rrset_name")]
    name: String,
    #[serde(
        rename = "rrset_ttl",
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::utils::serde_utils::seconds"
    )]
    time_to_live: Option<Duration>,
    #[serde(rename = "rrset_values", default)]
    values: Vec<String>,
}

impl DnsRecord {
    /// Name of the record at the root of the domain.
    ///
    /// For `example.com`, an `A` record named `@` answers lookups of `example.com` itself.
    pub const ORIGIN: &'static str = "@";

    /// Shortest TTL Gandi accepts. Shorter TTLs are raised to this on write.
    pub const MIN_TIME_TO_LIVE: Duration = Duration::from_secs(5 * 60);

    /// Longest TTL Gandi accepts. Longer TTLs are lowered to this on write.
    pub const MAX_TIME_TO_LIVE: Duration = Duration::from_secs(30 * 24 * 60 * 60);

    /// TTL the server assigns when a record is written without one.
    pub const DEFAULT_TIME_TO_LIVE: Duration = Duration::from_secs(3 * 60 * 60);

    /// Creates a record.
    ///
    /// `name` is the subdomain relative to the domain, such as `www` or `api.stage`, or
    /// [`DnsRecord::ORIGIN`]. Nothing is validated here; writing a record without values is
    /// rejected by [`LiveDns::set`](crate::dns::LiveDns::set).
    pub fn new<I, S>(
        record_type: RecordType,
        name: impl Into<String>,
        time_to_live: Option<Duration>,
        values: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            record_type,
            name: name.into(),
            time_to_live,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// A record with only a type and name, for lookups and deletions.
    pub fn key(record_type: RecordType, name: impl Into<String>) -> Self {
        Self::new(record_type, name, None, Vec::<String>::new())
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `None` means the server applies [`DnsRecord::DEFAULT_TIME_TO_LIVE`].
    pub fn time_to_live(&self) -> Option<Duration> {
        self.time_to_live
    }

    /// Dotted-quad addresses for `A`, FQDNs with a trailing period for `CNAME`, quoted
    /// strings for `TXT`, and so on.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// The form of this record sent on writes: an empty name becomes [`DnsRecord::ORIGIN`],
    /// a zero TTL becomes the server default and any other TTL is clamped into
    /// [`MIN_TIME_TO_LIVE`](Self::MIN_TIME_TO_LIVE)..=[`MAX_TIME_TO_LIVE`](Self::MAX_TIME_TO_LIVE).
    pub(crate) fn sanitized(&self) -> Self {
        let name = if self.name.is_empty() {
            Self::ORIGIN.to_string()
        } else {
            self.name.clone()
        };
        let time_to_live = self
            .time_to_live
            .filter(|ttl| !ttl.is_zero())
            .map(|ttl| ttl.clamp(Self::MIN_TIME_TO_LIVE, Self::MAX_TIME_TO_LIVE));

        Self {
            record_type: self.record_type,
            name,
            time_to_live,
            values: self.values.clone(),
        }
    }
}

impl fmt::Display for DnsRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type: {}, Name: {}, TimeToLive: ", self.record_type, self.name)?;
        match self.time_to_live {
            Some(ttl) => write_clock(f, ttl)?,
            None => f.write_str("null")?,
        }
        write!(f, ", Values: {}", self.values.join(" "))
    }
}

/// `[d.]hh:mm:ss[.fffffff]`
fn write_clock(f: &mut fmt::Formatter<'_>, duration: Duration) -> fmt::Result {
    let secs = duration.as_secs();
    let (days, hours, minutes, seconds) = (
        secs / 86_400,
        secs / 3_600 % 24,
        secs / 60 % 60,
        secs % 60,
    );
    if days > 0 {
        write!(f, "{days}.")?;
    }
    write!(f, "{hours:02}:{minutes:02}:{seconds:02}")?;
    let ticks = duration.subsec_nanos() / 100;
    if ticks > 0 {
        write!(f, ".{ticks:07}")?;
    }
    Ok(())
}
