use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use ipnet::IpNet;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Address cannot be empty")]
    Empty,

    #[error("Invalid address format: {0}")]
    Malformed(String),
}

/// A canonicalized single IP address or CIDR network block.
///
/// Host addresses are held as full-length prefixes (`/32`, `/128`) and
/// render without the prefix, so `10.0.0.1` and `10.0.0.1/32` parse to
/// equal values. Network specs are truncated to their base address:
/// `10.0.0.5/24` becomes `10.0.0.0/24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressSpec {
    net: IpNet,
}

impl AddressSpec {
    /// Parse a textual address or CIDR block into canonical form.
    /// Blank input is `Empty`, anything unparseable is `Malformed`.
    /// Pure, no I/O.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let s = raw.trim();

        if s.is_empty() {
            return Err(ParseError::Empty);
        }

        // Try a bare IPv4/IPv6 host first
        if let Ok(ip) = s.parse::<IpAddr>() {
            return Ok(Self { net: IpNet::from(ip) });
        }

        match s.parse::<IpNet>() {
            Ok(net) => Ok(Self { net: net.trunc() }),
            Err(_) => Err(ParseError::Malformed(s.to_string())),
        }
    }

    /// Containment test: true when `other` equals this spec or falls
    /// inside its network range. Addresses of a different family never
    /// match.
    pub fn contains(&self, other: &AddressSpec) -> bool {
        self.net.contains(&other.net)
    }

    pub fn contains_ip(&self, ip: IpAddr) -> bool {
        self.net.contains(&ip)
    }

    pub fn is_host(&self) -> bool {
        self.net.prefix_len() == self.net.max_prefix_len()
    }
}

impl fmt::Display for AddressSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_host() {
            write!(f, "{}", self.net.addr())
        } else {
            write!(f, "{}", self.net)
        }
    }
}

impl FromStr for AddressSpec {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_ipv4_hosts() {
        assert!(AddressSpec::parse("192.168.1.1").is_ok());
        assert!(AddressSpec::parse("0.0.0.0").is_ok());
        assert!(AddressSpec::parse("255.255.255.255").is_ok());
    }

    #[test]
    fn valid_ipv6_hosts() {
        assert!(AddressSpec::parse("::1").is_ok());
        assert!(AddressSpec::parse("2001:db8::1").is_ok());
        assert!(AddressSpec::parse("fe80::1").is_ok());
    }

    #[test]
    fn valid_cidr_blocks() {
        assert!(AddressSpec::parse("10.0.0.0/24").is_ok());
        assert!(AddressSpec::parse("2001:db8::/32").is_ok());
    }

    #[test]
    fn empty_input() {
        assert_eq!(AddressSpec::parse("").unwrap_err(), ParseError::Empty);
        assert_eq!(AddressSpec::parse("   \t ").unwrap_err(), ParseError::Empty);
    }

    #[test]
    fn malformed_input() {
        assert!(matches!(
            AddressSpec::parse("not-an-ip").unwrap_err(),
            ParseError::Malformed(_)
        ));
        assert!(matches!(
            AddressSpec::parse("192.168.1.256").unwrap_err(),
            ParseError::Malformed(_)
        ));
        assert!(matches!(
            AddressSpec::parse("10.0.0.0/33").unwrap_err(),
            ParseError::Malformed(_)
        ));
        assert!(matches!(
            AddressSpec::parse("2001:db8::gggg").unwrap_err(),
            ParseError::Malformed(_)
        ));
    }

    #[test]
    fn host_and_full_prefix_are_equal() {
        let host: AddressSpec = "10.0.0.1".parse().unwrap();
        let full: AddressSpec = "10.0.0.1/32".parse().unwrap();
        assert_eq!(host, full);
        assert_eq!(host.to_string(), "10.0.0.1");

        let host6: AddressSpec = "2001:db8::1".parse().unwrap();
        let full6: AddressSpec = "2001:db8::1/128".parse().unwrap();
        assert_eq!(host6, full6);
        assert_eq!(host6.to_string(), "2001:db8::1");
    }

    #[test]
    fn networks_truncate_to_base_address() {
        let net: AddressSpec = "10.0.0.5/24".parse().unwrap();
        assert_eq!(net.to_string(), "10.0.0.0/24");
    }

    #[test]
    fn canonical_form_is_stable_under_reparse() {
        for raw in ["10.0.0.5/24", "10.0.0.1/32", "2001:0db8:0000::1", "192.168.1.10"] {
            let first: AddressSpec = raw.parse().unwrap();
            let reparsed: AddressSpec = first.to_string().parse().unwrap();
            assert_eq!(first, reparsed);
            assert_eq!(first.to_string(), reparsed.to_string());
        }
    }

    #[test]
    fn network_contains_member_addresses() {
        let net: AddressSpec = "10.0.0.0/24".parse().unwrap();
        assert!(net.contains(&"10.0.0.5".parse().unwrap()));
        assert!(!net.contains(&"10.0.1.5".parse().unwrap()));
        assert!(net.contains_ip("10.0.0.5".parse().unwrap()));
        assert!(!net.contains_ip("10.0.1.5".parse().unwrap()));
    }

    #[test]
    fn host_entry_matches_only_itself() {
        let host: AddressSpec = "192.168.1.10".parse().unwrap();
        assert!(host.contains(&"192.168.1.10".parse().unwrap()));
        assert!(!host.contains(&"192.168.1.11".parse().unwrap()));
    }

    #[test]
    fn containment_never_crosses_families() {
        let v4: AddressSpec = "10.0.0.0/24".parse().unwrap();
        assert!(!v4.contains(&"::1".parse().unwrap()));

        let v6: AddressSpec = "2001:db8::/32".parse().unwrap();
        assert!(v6.contains(&"2001:db8::1".parse().unwrap()));
        assert!(!v6.contains(&"10.0.0.1".parse().unwrap()));
    }
}
