// ── PowerNet MIB namespace ──
//
// OIDs under APC's enterprise root. Every concept has exactly one
// suffix; per-outlet concepts take the 1-based outlet number as their
// final arc.

use apcpdu_snmp::Oid;
use strum::{Display, EnumIter};

use crate::error::CoreError;
use crate::model::OutletIndex;

/// `iso.org.dod.internet.private.enterprises.apc`
pub const VENDOR_ROOT: &[u32] = &[1, 3, 6, 1, 4, 1, 318];

/// Named device concepts addressable by OID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Concept {
    /// `rPDUIdentDeviceNumOutlets`
    OutletCount,
    /// `sPDUOutletCtlName`
    OutletName,
    /// `sPDUOutletCtl`
    OutletPowerState,
    /// `rPDULoadStatusLoad`, phase 1, tenths of amps.
    PowerDraw,
    /// `rPDULoadPhaseConfigLowLoadThreshold`, phase 1, tenths of amps.
    LowLoadThreshold,
    /// `rPDULoadPhaseConfigNearOverloadThreshold`, phase 1, tenths of amps.
    NearOverloadThreshold,
    /// `rPDULoadPhaseConfigOverloadThreshold`, phase 1, tenths of amps.
    OverloadThreshold,
    /// `rPDULoadStatusLoadState`, phase 1.
    LoadState,
}

/// Where a concept lives below [`VENDOR_ROOT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OidDescriptor {
    pub suffix: &'static [u32],
    /// Per-outlet column; the outlet number is appended as the last arc.
    pub requires_index: bool,
}

impl Concept {
    pub const fn descriptor(self) -> OidDescriptor {
        const fn scalar(suffix: &'static [u32]) -> OidDescriptor {
            OidDescriptor {
                suffix,
                requires_index: false,
            }
        }
        const fn column(suffix: &'static [u32]) -> OidDescriptor {
            OidDescriptor {
                suffix,
                requires_index: true,
            }
        }

        match self {
            Self::OutletCount => scalar(&[1, 1, 12, 1, 8, 0]),
            Self::OutletName => column(&[1, 1, 4, 4, 2, 1, 4]),
            Self::OutletPowerState => column(&[1, 1, 4, 4, 2, 1, 3]),
            Self::PowerDraw => scalar(&[1, 1, 12, 2, 3, 1, 1, 2, 1]),
            Self::LowLoadThreshold => scalar(&[1, 1, 12, 2, 2, 1, 1, 2, 1]),
            Self::NearOverloadThreshold => scalar(&[1, 1, 12, 2, 2, 1, 1, 3, 1]),
            Self::OverloadThreshold => scalar(&[1, 1, 12, 2, 2, 1, 1, 4, 1]),
            Self::LoadState => scalar(&[1, 1, 12, 2, 3, 1, 1, 3, 1]),
        }
    }
}

pub fn vendor_root() -> Oid {
    Oid::from_arcs(VENDOR_ROOT)
}

/// Full OID for `concept`.
///
/// # Panics
///
/// If `index` is given for a scalar concept or omitted for a per-outlet
/// one. Both are programming errors, not device conditions.
pub fn resolve(concept: Concept, index: Option<OutletIndex>) -> Oid {
    let descriptor = concept.descriptor();
    let base = vendor_root().join(descriptor.suffix);
    match (descriptor.requires_index, index) {
        (true, Some(index)) => base.child(index.get()),
        (false, None) => base,
        (true, None) => panic!("{concept} is a per-outlet column and needs an outlet index"),
        (false, Some(_)) => panic!("{concept} is a scalar and takes no outlet index"),
    }
}

/// Column root for a per-outlet concept, for subtree walks.
///
/// # Panics
///
/// If `concept` is a scalar.
pub fn column(concept: Concept) -> Oid {
    let descriptor = concept.descriptor();
    assert!(
        descriptor.requires_index,
        "{concept} is a scalar and has no column"
    );
    vendor_root().join(descriptor.suffix)
}

/// Absolute OID for a dotted suffix relative to [`VENDOR_ROOT`].
///
/// Accepts `1.1.12.1.8.0` or `.1.1.12.1.8.0`.
pub fn relative(suffix: &str) -> Result<Oid, CoreError> {
    let trimmed = suffix.trim().trim_start_matches('.');
    let parsed: Oid = trimmed.parse()?;
    Ok(vendor_root().join(parsed.arcs()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    use super::*;

    fn outlet(n: u32) -> OutletIndex {
        OutletIndex::new(n).unwrap()
    }

    #[test]
    fn resolves_known_oids() {
        assert_eq!(
            resolve(Concept::OutletCount, None).to_string(),
            "1.3.6.1.4.1.318.1.1.12.1.8.0"
        );
        assert_eq!(
            resolve(Concept::OutletName, Some(outlet(3))).to_string(),
            "1.3.6.1.4.1.318.1.1.4.4.2.1.4.3"
        );
        assert_eq!(
            resolve(Concept::OutletPowerState, Some(outlet(12))).to_string(),
            "1.3.6.1.4.1.318.1.1.4.4.2.1.3.12"
        );
        assert_eq!(
            resolve(Concept::LoadState, None).to_string(),
            "1.3.6.1.4.1.318.1.1.12.2.3.1.1.3.1"
        );
    }

    #[test]
    fn every_concept_is_distinct_and_under_the_vendor_root() {
        let root = vendor_root();
        let mut seen = HashSet::new();
        for concept in Concept::iter() {
            let oid = if concept.descriptor().requires_index {
                resolve(concept, Some(outlet(1)))
            } else {
                resolve(concept, None)
            };
            assert!(oid.starts_with(&root), "{concept} resolved outside root: {oid}");
            assert!(seen.insert(oid.clone()), "{concept} shares {oid}");
        }
    }

    #[test]
    fn column_is_prefix_of_each_row() {
        let column = column(Concept::OutletName);
        let row = resolve(Concept::OutletName, Some(outlet(7)));
        assert!(row.starts_with(&column));
        assert_eq!(row.last_arc(), Some(7));
    }

    #[test]
    #[should_panic(expected = "needs an outlet index")]
    fn per_outlet_concept_without_index_panics() {
        let _ = resolve(Concept::OutletName, None);
    }

    #[test]
    #[should_panic(expected = "takes no outlet index")]
    fn scalar_with_index_panics() {
        let _ = resolve(Concept::PowerDraw, Some(outlet(1)));
    }

    #[test]
    fn relative_suffix_joins_root() {
        assert_eq!(
            relative(".1.1.12.1.8.0").unwrap(),
            resolve(Concept::OutletCount, None)
        );
        assert!(relative("1..2").is_err());
    }
}
