// ── Bulk enumeration ──
//
// Variable-cardinality tables (one row per outlet) are discovered by
// walking the column root rather than by issuing `count` single GETs.

use apcpdu_snmp::{Oid, Session, SnmpTransport, Value};
use tracing::trace;

use crate::error::CoreError;
use crate::model::{OutletKey, OutletMap};

/// Repetitions per request when walking a column.
pub const WALK_PAGE_SIZE: u32 = 30;

/// Walk `root` and decode every row, keyed by its trailing arc.
///
/// All-or-nothing: a walk failure or any row that fails to decode aborts
/// the whole enumeration.
pub async fn enumerate_subtree<T, V, F>(
    session: &Session<T>,
    root: &Oid,
    mut decode_row: F,
) -> Result<OutletMap<V>, CoreError>
where
    T: SnmpTransport,
    F: FnMut(&Oid, &Value) -> Result<V, CoreError>,
{
    let varbinds = session.walk_subtree(root, WALK_PAGE_SIZE).await?;

    let mut rows = OutletMap::new();
    for varbind in varbinds {
        // An agent may still hand back the root itself or an
        // end-of-view marker at the edge of the column.
        if !varbind.oid.starts_with(root) || varbind.oid == *root || varbind.value.is_exception() {
            continue;
        }
        let Some(arc) = varbind.oid.last_arc() else {
            continue;
        };
        rows.insert(OutletKey::from(arc), decode_row(&varbind.oid, &varbind.value)?);
    }

    trace!(root = %root, rows = rows.len(), "enumerated subtree");
    Ok(rows)
}
