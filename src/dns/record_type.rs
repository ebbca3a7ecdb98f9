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
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseRecordTypeError;

/// Record types accepted by LiveDNS (`GET /v5/livedns/dns/rrtypes`).
///
/// Serialized, displayed and placed in request paths as the upper-case name.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecordType {
    A,
    AAAA,
    ALIAS,
    CAA,
    CDS,
    CNAME,
    DNAME,
    DS,
    KEY,
    LOC,
    MX,
    NAPTR,
    NS,
    OPENPGPKEY,
    PTR,
    RP,
    SPF,
    SRV,
    SSHFP,
    TLSA,
    TXT,
    WKS,
}

impl RecordType {
    pub const ALL: [RecordType; 22] = [
        Self::A,
        Self::AAAA,
        Self::ALIAS,
        Self::CAA,
        Self::CDS,
        Self::CNAME,
        Self::DNAME,
        Self::DS,
        Self::KEY,
        Self::LOC,
        Self::MX,
        Self::NAPTR,
        Self::NS,
        Self::OPENPGPKEY,
        Self::PTR,
        Self::RP,
        Self::SPF,
        Self::SRV,
        Self::SSHFP,
        Self::TLSA,
        Self::TXT,
        Self::WKS,
    ];

    /// Wire and URI form of the type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::AAAA => "AAAA",
            Self::ALIAS => "ALIAS",
            Self::CAA => "CAA",
            Self::CDS => "CDS",
            Self::CNAME => "CNAME",
            Self::DNAME => "DNAME",
            Self::DS => "DS",
            Self::KEY => "KEY",
            Self::LOC => "LOC",
            Self::MX => "MX",
            Self::NAPTR => "NAPTR",
            Self::NS => "NS",
            Self::OPENPGPKEY => "OPENPGPKEY",
            Self::PTR => "PTR",
            Self::RP => "RP",
            Self::SPF => "SPF",
            Self::SRV => "SRV",
            Self::SSHFP => "SSHFP",
            Self::TLSA => "TLSA",
            Self::TXT => "TXT",
            Self::WKS => "WKS",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = ParseRecordTypeError;

    /// Parses a type name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseRecordTypeError(s.to_string()))
    }
}
