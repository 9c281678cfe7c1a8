// apcpdu-core: Domain operations for APC PowerNet PDUs over SNMP.
//
// Maps outlet and load concepts onto PowerNet-MIB OIDs, issues requests
// through an `apcpdu-snmp` session, and decodes the responses into typed
// results or typed errors.

pub mod config;
pub mod decode;
pub mod enumerate;
pub mod error;
pub mod model;
pub mod oids;
pub mod pdu;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::DeviceConfig;
pub use decode::decode_deci_amps;
pub use enumerate::{WALK_PAGE_SIZE, enumerate_subtree};
pub use error::CoreError;
pub use oids::{Concept, OidDescriptor, VENDOR_ROOT};
pub use pdu::Pdu;

pub use model::{
    LoadState, LoadThresholds, MAX_OUTLET_NAME_LEN, OutletIndex, OutletKey, OutletMap,
    PowerCommand, PowerState,
};

// Session-layer types callers need to name.
pub use apcpdu_snmp::transport::{DEFAULT_COMMUNITY, DEFAULT_PORT};
pub use apcpdu_snmp::{Error as SnmpError, Oid, Session, SnmpTransport, Value, Version};
