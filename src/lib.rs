//! Client for the Gandi LiveDNS v5 REST API
//!
//! Supported features:
//! - List, get, create-or-replace and delete the DNS records of a domain
//! - Asynchronous operations on a shared `reqwest` transport
//! - API key and personal access token authentication, switchable at runtime
//!
//! # Example
//! ```no_run
//! use gandi_livedns::dns::{DnsRecord, LiveDns, RecordType};
//! use gandi_livedns::GandiClient;
//!
//! # async fn run() -> gandi_livedns::Result<()> {
//! let gandi = GandiClient::from_env()?;
//! let live_dns = gandi.live_dns("example.com")?;
//!
//! for record in live_dns.list(None, None).await? {
//!     println!("{record}");
//! }
//!
//! live_dns
//!     .set(&DnsRecord::new(RecordType::TXT, "_test", None, ["hello"]))
//!     .await?;
//! let found = live_dns.get(RecordType::TXT, "_test").await?;
//! assert!(found.is_some());
//! live_dns.delete(Some(RecordType::TXT), "_test").await?;
//! # Ok(())
//! # }
//! ```

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

pub mod auth;
pub mod client;
pub mod dns;
pub mod error;
pub mod utils;

pub use client::{GandiClient, GandiClientBuilder};
pub use error::{GandiError, HttpError, Result};
