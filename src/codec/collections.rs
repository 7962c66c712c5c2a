//! List, map and address grammars.

use super::{Coerce, Delimiters, split_fields};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::vec;

/// Split on the record separator and trim every token.
pub fn parse_list(raw: &str, delimiters: &Delimiters) -> Vec<String> {
    split_fields(raw, delimiters.record())
        .into_iter()
        .map(|token| token.trim().to_string())
        .collect()
}

/// Parse every record as a base-10 `i32`.
///
/// All or nothing: one bad token discards the whole array.
pub fn parse_int_array(raw: &str, delimiters: &Delimiters) -> Option<Vec<i32>> {
    split_fields(raw, delimiters.record())
        .into_iter()
        .map(|token| token.trim().parse::<i32>().ok())
        .collect()
}

/// Records that split into exactly two fields, trimmed.
pub(crate) fn key_value_records<'a>(
    raw: &'a str,
    delimiters: &Delimiters,
) -> impl Iterator<Item = (&'a str, &'a str)> {
    let field = delimiters.field().clone();
    split_fields(raw, delimiters.record())
        .into_iter()
        .filter_map(move |record| match split_fields(record, &field)[..] {
            [key, value] => Some((key.trim(), value.trim())),
            _ => None,
        })
}

/// `k1:v1,k2:v2` into a map. Malformed records are skipped.
pub fn parse_map(raw: &str, delimiters: &Delimiters) -> HashMap<String, String> {
    key_value_records(raw, delimiters)
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// A `host:port` pair as written in the configuration.
///
/// The host is not resolved when the value is coerced; resolution happens
/// through [`ToSocketAddrs`] when the address is used.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ServiceAddress {
    pub host: String,
    pub port: u16,
}

impl ServiceAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for ServiceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl ToSocketAddrs for ServiceAddress {
    type Iter = vec::IntoIter<SocketAddr>;

    fn to_socket_addrs(&self) -> io::Result<Self::Iter> {
        (self.host.as_str(), self.port).to_socket_addrs()
    }
}

/// Split on the field separator into exactly host and port.
pub fn parse_address(raw: &str, delimiters: &Delimiters) -> Option<ServiceAddress> {
    match split_fields(raw.trim(), delimiters.field())[..] {
        [host, port] => {
            let port = port.trim().parse::<u16>().ok()?;
            Some(ServiceAddress::new(host.trim(), port))
        }
        _ => None,
    }
}

impl Coerce for Vec<String> {
    fn coerce(raw: &str, delimiters: &Delimiters) -> Option<Self> {
        Some(parse_list(raw, delimiters))
    }
}

impl Coerce for Vec<i32> {
    fn coerce(raw: &str, delimiters: &Delimiters) -> Option<Self> {
        parse_int_array(raw, delimiters)
    }
}

impl Coerce for HashMap<String, String> {
    fn coerce(raw: &str, delimiters: &Delimiters) -> Option<Self> {
        Some(parse_map(raw, delimiters))
    }
}

impl Coerce for ServiceAddress {
    fn coerce(raw: &str, delimiters: &Delimiters) -> Option<Self> {
        parse_address(raw, delimiters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn std_delims() -> &'static Delimiters {
        Delimiters::standard()
    }

    #[test]
    fn test_list_trims_tokens() {
        assert_eq!(parse_list("a, b ,c", std_delims()), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_list_of_empty_value() {
        assert_eq!(parse_list("", std_delims()), vec![""]);
    }

    #[test]
    fn test_list_custom_separator() {
        let delims = Delimiters::default().with_literal_record(";");
        assert_eq!(parse_list("a;b, c", &delims), vec!["a", "b, c"]);
    }

    #[test]
    fn test_int_array_all_or_nothing() {
        assert_eq!(parse_int_array("1, 2,3", std_delims()), Some(vec![1, 2, 3]));
        assert_eq!(parse_int_array("1,x,3", std_delims()), None);
        // Hex is not accepted in arrays.
        assert_eq!(parse_int_array("0x10", std_delims()), None);
    }

    #[test]
    fn test_map_skips_malformed_records() {
        let map = parse_map("a:1, b : 2 ,broken,c:3:4,d:", std_delims());
        assert_eq!(map.len(), 2);
        assert_eq!(map["a"], "1");
        assert_eq!(map["b"], "2");
    }

    #[test]
    fn test_map_empty_key_is_kept() {
        let map = parse_map(":v", std_delims());
        assert_eq!(map.get(""), Some(&"v".to_string()));
    }

    #[test]
    fn test_map_custom_separators() {
        let delims = Delimiters::default()
            .with_literal_record(";")
            .with_literal_field("=");
        let map = parse_map("a=1;b=2", &delims);
        assert_eq!(map["a"], "1");
        assert_eq!(map["b"], "2");
    }

    #[test]
    fn test_address() {
        assert_eq!(
            parse_address(" localhost : 8080 ", std_delims()),
            Some(ServiceAddress::new("localhost", 8080))
        );
        assert_eq!(parse_address("localhost", std_delims()), None);
        assert_eq!(parse_address("localhost:http", std_delims()), None);
        assert_eq!(parse_address("localhost:70000", std_delims()), None);
        assert_eq!(parse_address("::1:80", std_delims()), None);
    }

    #[test]
    fn test_address_display_and_resolution() {
        let addr = ServiceAddress::new("127.0.0.1", 9000);
        assert_eq!(addr.to_string(), "127.0.0.1:9000");
        let resolved: Vec<SocketAddr> = addr.to_socket_addrs().unwrap().collect();
        assert_eq!(resolved, vec!["127.0.0.1:9000".parse().unwrap()]);
    }
}
