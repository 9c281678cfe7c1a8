// ── Domain model ──
//
// Typed views of what a PDU reports. Codes the device may extend are
// kept as integers; fixed enumerations are Rust enums.

pub mod load;
pub mod outlet;
pub mod outlet_map;

pub use load::{LoadState, LoadThresholds};
pub use outlet::{MAX_OUTLET_NAME_LEN, OutletIndex, PowerCommand, PowerState};
pub use outlet_map::{OutletKey, OutletMap};
