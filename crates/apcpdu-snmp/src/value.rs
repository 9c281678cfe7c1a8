// SNMP values and variable bindings
//
// Transport-neutral mirror of the SMI value types. The UDP transport
// converts to and from `async_snmp::Value` at the boundary so callers
// never depend on the collaborator crate directly.

use std::fmt;

use serde::Serialize;

use crate::oid::Oid;

/// A single SNMP value as sent to or returned by an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Integer(i32),
    OctetString(Vec<u8>),
    Null,
    ObjectIdentifier(Oid),
    IpAddress([u8; 4]),
    Counter32(u32),
    Gauge32(u32),
    TimeTicks(u32),
    Opaque(Vec<u8>),
    Counter64(u64),
    /// The agent knows the object type but has no such object.
    NoSuchObject,
    /// The object exists but not at the requested instance.
    NoSuchInstance,
    /// Walk ran past the last object in the agent's MIB view.
    EndOfMibView,
    /// A tag this crate does not model.
    Unknown { tag: u8 },
}

impl Value {
    /// Build an OCTET STRING from UTF-8 text.
    pub fn string(text: &str) -> Self {
        Self::OctetString(text.as_bytes().to_vec())
    }

    /// Integer view of any numeric SMI type.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(i64::from(*v)),
            Self::Counter32(v) | Self::Gauge32(v) | Self::TimeTicks(v) => Some(i64::from(*v)),
            Self::Counter64(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// `true` for the v2c exception markers (`noSuchObject`,
    /// `noSuchInstance`, `endOfMibView`).
    pub fn is_exception(&self) -> bool {
        matches!(
            self,
            Self::NoSuchObject | Self::NoSuchInstance | Self::EndOfMibView
        )
    }

    /// The SMI type name, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "INTEGER",
            Self::OctetString(_) => "OCTET STRING",
            Self::Null => "NULL",
            Self::ObjectIdentifier(_) => "OBJECT IDENTIFIER",
            Self::IpAddress(_) => "IpAddress",
            Self::Counter32(_) => "Counter32",
            Self::Gauge32(_) => "Gauge32",
            Self::TimeTicks(_) => "TimeTicks",
            Self::Opaque(_) => "Opaque",
            Self::Counter64(_) => "Counter64",
            Self::NoSuchObject => "noSuchObject",
            Self::NoSuchInstance => "noSuchInstance",
            Self::EndOfMibView => "endOfMibView",
            Self::Unknown { .. } => "unknown",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::OctetString(b) | Self::Opaque(b) => write!(f, "{}", String::from_utf8_lossy(b)),
            Self::ObjectIdentifier(oid) => write!(f, "{oid}"),
            Self::IpAddress([a, b, c, d]) => write!(f, "{a}.{b}.{c}.{d}"),
            Self::Counter32(v) | Self::Gauge32(v) | Self::TimeTicks(v) => write!(f, "{v}"),
            Self::Counter64(v) => write!(f, "{v}"),
            Self::Unknown { tag } => write!(f, "<unknown tag 0x{tag:02x}>"),
            other => f.write_str(other.type_name()),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Integer(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::string(v)
    }
}

/// A `(oid, value)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Varbind {
    pub oid: Oid,
    pub value: Value,
}

impl Varbind {
    pub fn new(oid: Oid, value: impl Into<Value>) -> Self {
        Self {
            oid,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_views() {
        assert_eq!(Value::Integer(-3).as_i64(), Some(-3));
        assert_eq!(Value::Gauge32(125).as_i64(), Some(125));
        assert_eq!(Value::Counter64(u64::MAX).as_i64(), None);
        assert_eq!(Value::string("x").as_i64(), None);
    }

    #[test]
    fn exceptions_are_flagged() {
        assert!(Value::NoSuchInstance.is_exception());
        assert!(!Value::Null.is_exception());
    }

    #[test]
    fn display_renders_strings_as_text() {
        assert_eq!(Value::string("Rack A").to_string(), "Rack A");
        assert_eq!(Value::NoSuchObject.to_string(), "noSuchObject");
    }
}
