// Response decoding shared by PDU reads and subtree enumeration.

use apcpdu_snmp::{Oid, Value, Varbind};

use crate::error::CoreError;
use crate::model::LoadState;

/// Load and thresholds are reported in tenths of amps.
pub fn decode_deci_amps(raw: u32) -> f64 {
    f64::from(raw) / 10.0
}

/// Exactly one varbind whose value is not a v2c exception.
pub(crate) fn single(oid: &Oid, varbinds: Vec<Varbind>) -> Result<Value, CoreError> {
    let actual = varbinds.len();
    let mut iter = varbinds.into_iter();
    match (iter.next(), iter.next()) {
        (Some(varbind), None) => present(oid, varbind.value),
        _ => Err(CoreError::InvalidResponseShape {
            oid: oid.clone(),
            expected: 1,
            actual,
        }),
    }
}

/// v2c agents report missing objects in-band instead of as an error status.
pub(crate) fn present(oid: &Oid, value: Value) -> Result<Value, CoreError> {
    if value.is_exception() {
        Err(CoreError::NoSuchObject { oid: oid.clone() })
    } else {
        Ok(value)
    }
}

pub(crate) fn integer(oid: &Oid, value: &Value) -> Result<i64, CoreError> {
    value.as_i64().ok_or_else(|| {
        CoreError::decode(
            oid,
            format!("expected an integer, got {}", value.type_name()),
        )
    })
}

pub(crate) fn non_negative(oid: &Oid, value: &Value) -> Result<u32, CoreError> {
    let n = integer(oid, value)?;
    u32::try_from(n).map_err(|_| {
        CoreError::decode(oid, format!("expected a non-negative integer, got {n}"))
    })
}

pub(crate) fn state_code(oid: &Oid, value: &Value) -> Result<i32, CoreError> {
    let n = non_negative(oid, value)?;
    i32::try_from(n).map_err(|_| CoreError::decode(oid, format!("state code {n} out of range")))
}

pub(crate) fn deci_amps(oid: &Oid, value: &Value) -> Result<f64, CoreError> {
    non_negative(oid, value).map(decode_deci_amps)
}

/// OCTET STRING as text. Invalid UTF-8 is replaced rather than rejected:
/// outlet names are set from the front panel and web UI too. Opaque is
/// not text even though it also carries bytes.
pub(crate) fn text(oid: &Oid, value: &Value) -> Result<String, CoreError> {
    match value {
        Value::OctetString(bytes) => Ok(String::from_utf8_lossy(bytes).into_owned()),
        other => Err(CoreError::decode(
            oid,
            format!("expected an octet string, got {}", other.type_name()),
        )),
    }
}

pub(crate) fn load_state(oid: &Oid, value: &Value) -> Result<LoadState, CoreError> {
    let code = integer(oid, value)?;
    LoadState::from_code(code)
        .ok_or_else(|| CoreError::decode(oid, format!("load state {code} is not in 1..=4")))
}
