//! LiveDNS records API.

mod live_dns;
mod record;
mod record_type;

pub use live_dns::{GandiLiveDns, LiveDns};
pub use record::DnsRecord;
pub use record_type::RecordType;
