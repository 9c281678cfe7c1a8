// Object identifiers
//
// Owned, numeric representation of a dotted OID. Ordering is arc-wise,
// which matches the lexicographic order agents use for GETNEXT walks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A dotted-numeric object identifier (e.g. `1.3.6.1.4.1.318`).
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Oid(Vec<u32>);

impl Oid {
    /// Build an OID from its arcs.
    pub fn from_arcs(arcs: &[u32]) -> Self {
        Self(arcs.to_vec())
    }

    /// The numeric arcs.
    pub fn arcs(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a single arc, returning the child OID.
    pub fn child(&self, arc: u32) -> Self {
        let mut arcs = self.0.clone();
        arcs.push(arc);
        Self(arcs)
    }

    /// Append a sequence of arcs.
    pub fn join(&self, suffix: &[u32]) -> Self {
        let mut arcs = Vec::with_capacity(self.0.len() + suffix.len());
        arcs.extend_from_slice(&self.0);
        arcs.extend_from_slice(suffix);
        Self(arcs)
    }

    /// `true` if `self` lies at or below `prefix` in the tree.
    pub fn starts_with(&self, prefix: &Oid) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// The final arc -- the table index for a single-index column entry.
    pub fn last_arc(&self) -> Option<u32> {
        self.0.last().copied()
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for arc in &self.0 {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{arc}")?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for Oid {
    type Err = Error;

    /// Parse a dotted OID. A single leading dot (`.1.3.6...`) is accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let body = trimmed.strip_prefix('.').unwrap_or(trimmed);
        if body.is_empty() {
            return Err(Error::InvalidOid(s.to_owned()));
        }

        body.split('.')
            .map(|part| part.parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
            .map_err(|_| Error::InvalidOid(s.to_owned()))
    }
}

impl TryFrom<String> for Oid {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Oid> for String {
    fn from(oid: Oid) -> Self {
        oid.to_string()
    }
}
