// apcpdu-snmp: SNMP session adapter for APC PowerNet PDUs.
//
// Thin seam over the `async-snmp` collaborator: get, set, subtree walk,
// and an explicitly closed session that owns the transport.

pub mod error;
pub mod oid;
pub mod session;
pub mod transport;
pub mod udp;
pub mod value;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::Error;
pub use oid::Oid;
pub use session::Session;
pub use transport::{SnmpTransport, TransportConfig, Version};
pub use udp::UdpTransport;
pub use value::{Value, Varbind};
