// ── PDU operations ──
//
// Every operation resolves its OID, issues one session call, then checks
// the response shape and decodes the value. Operations hold no state;
// the session is the only thing with a lifecycle.

use apcpdu_snmp::{Oid, Session, SnmpTransport, UdpTransport, Value};
use tracing::debug;

use crate::config::DeviceConfig;
use crate::decode;
use crate::enumerate::enumerate_subtree;
use crate::error::CoreError;
use crate::model::{
    LoadState, LoadThresholds, MAX_OUTLET_NAME_LEN, OutletIndex, OutletMap, PowerCommand,
    PowerState,
};
use crate::oids::{self, Concept};

/// A connected PowerNet PDU.
///
/// Safe to share across tasks; every method takes `&self`.
pub struct Pdu<T: SnmpTransport = UdpTransport> {
    session: Session<T>,
}

impl Pdu<UdpTransport> {
    /// Open a session to the PDU described by `config`.
    pub async fn connect(config: &DeviceConfig) -> Result<Self, CoreError> {
        let transport = config.transport_config()?;
        let session = Session::open(&transport).await?;
        debug!(peer = session.peer(), "connected to PDU");
        Ok(Self { session })
    }
}

impl<T: SnmpTransport> Pdu<T> {
    pub fn new(session: Session<T>) -> Self {
        Self { session }
    }

    /// The underlying session, for raw SNMP access.
    pub fn session(&self) -> &Session<T> {
        &self.session
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Number of outlets on the device (`rPDUIdentDeviceNumOutlets`).
    pub async fn total_outlets(&self) -> Result<u32, CoreError> {
        let oid = oids::resolve(Concept::OutletCount, None);
        let value = self.get_one(&oid).await?;
        decode::non_negative(&oid, &value)
    }

    pub async fn outlet_name(&self, outlet: OutletIndex) -> Result<String, CoreError> {
        let oid = oids::resolve(Concept::OutletName, Some(outlet));
        let value = self.get_one(&oid).await?;
        decode::text(&oid, &value)
    }

    /// Every outlet's name in one subtree walk.
    pub async fn all_outlet_names(&self) -> Result<OutletMap<String>, CoreError> {
        let root = oids::column(Concept::OutletName);
        enumerate_subtree(&self.session, &root, decode::text).await
    }

    /// The raw control code; see [`PowerState`] for the known values.
    pub async fn outlet_power_state(&self, outlet: OutletIndex) -> Result<PowerState, CoreError> {
        let oid = oids::resolve(Concept::OutletPowerState, Some(outlet));
        let value = self.get_one(&oid).await?;
        decode::state_code(&oid, &value).map(PowerState::from_code)
    }

    pub async fn all_outlet_power_states(&self) -> Result<OutletMap<PowerState>, CoreError> {
        let root = oids::column(Concept::OutletPowerState);
        enumerate_subtree(&self.session, &root, |oid, value| {
            decode::state_code(oid, value).map(PowerState::from_code)
        })
        .await
    }

    /// Phase 1 load in amps.
    pub async fn power_draw(&self) -> Result<f64, CoreError> {
        self.read_deci_amps(Concept::PowerDraw).await
    }

    pub async fn low_load_threshold(&self) -> Result<f64, CoreError> {
        self.read_deci_amps(Concept::LowLoadThreshold).await
    }

    pub async fn near_overload_threshold(&self) -> Result<f64, CoreError> {
        self.read_deci_amps(Concept::NearOverloadThreshold).await
    }

    pub async fn overload_threshold(&self) -> Result<f64, CoreError> {
        self.read_deci_amps(Concept::OverloadThreshold).await
    }

    /// All three phase 1 thresholds in a single GET.
    pub async fn load_thresholds(&self) -> Result<LoadThresholds, CoreError> {
        let requested = [
            oids::resolve(Concept::LowLoadThreshold, None),
            oids::resolve(Concept::NearOverloadThreshold, None),
            oids::resolve(Concept::OverloadThreshold, None),
        ];
        let varbinds = self.session.get(&requested).await?;
        if varbinds.len() != requested.len() {
            return Err(CoreError::InvalidResponseShape {
                oid: requested[0].clone(),
                expected: requested.len(),
                actual: varbinds.len(),
            });
        }

        let mut amps = [0.0; 3];
        for ((slot, oid), varbind) in amps.iter_mut().zip(&requested).zip(varbinds) {
            let value = decode::present(oid, varbind.value)?;
            *slot = decode::deci_amps(oid, &value)?;
        }
        let [low, near_overload, overload] = amps;
        Ok(LoadThresholds {
            low,
            near_overload,
            overload,
        })
    }

    pub async fn load_state(&self) -> Result<LoadState, CoreError> {
        let oid = oids::resolve(Concept::LoadState, None);
        let value = self.get_one(&oid).await?;
        decode::load_state(&oid, &value)
    }

    /// Read an arbitrary object relative to the APC enterprise root.
    ///
    /// Same shape check and missing-object handling as the typed reads;
    /// the value is returned undecoded.
    pub async fn get_by_oid(&self, suffix: &str) -> Result<Value, CoreError> {
        let oid = oids::relative(suffix)?;
        self.get_one(&oid).await
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Switch an outlet and wait for the device to confirm the new code.
    pub async fn set_power_state(
        &self,
        outlet: OutletIndex,
        command: impl Into<PowerCommand>,
    ) -> Result<(), CoreError> {
        let command = command.into().validate()?;
        let oid = oids::resolve(Concept::OutletPowerState, Some(outlet));
        let requested = command.code();

        let confirmed = self.set_one(&oid, &Value::Integer(requested)).await?;
        if confirmed.as_i64() != Some(i64::from(requested)) {
            return Err(CoreError::DeviceRejectedChange {
                oid,
                requested: requested.to_string(),
                confirmed: confirmed.to_string(),
            });
        }

        debug!(%outlet, code = requested, "outlet power state confirmed");
        Ok(())
    }

    /// Rename an outlet. Names longer than the device field are rejected
    /// without contacting the device.
    pub async fn set_outlet_name(&self, outlet: OutletIndex, name: &str) -> Result<(), CoreError> {
        let length = name.chars().count();
        if length > MAX_OUTLET_NAME_LEN {
            return Err(CoreError::Validation {
                field: "name".into(),
                reason: format!(
                    "outlet names are at most {MAX_OUTLET_NAME_LEN} characters, got {length}"
                ),
            });
        }

        let oid = oids::resolve(Concept::OutletName, Some(outlet));
        let confirmed = self.set_one(&oid, &Value::string(name)).await?;
        let echoed = matches!(&confirmed, Value::OctetString(bytes) if bytes == name.as_bytes());
        if !echoed {
            return Err(CoreError::DeviceRejectedChange {
                oid,
                requested: name.to_owned(),
                confirmed: confirmed.to_string(),
            });
        }

        debug!(%outlet, name, "outlet name confirmed");
        Ok(())
    }

    /// Close the session. A second call fails with `SessionClosed`.
    pub async fn close(&self) -> Result<(), CoreError> {
        self.session.close().await.map_err(CoreError::from)
    }

    // ── Helpers ──────────────────────────────────────────────────────

    async fn get_one(&self, oid: &Oid) -> Result<Value, CoreError> {
        let varbinds = self.session.get(std::slice::from_ref(oid)).await?;
        decode::single(oid, varbinds)
    }

    async fn set_one(&self, oid: &Oid, value: &Value) -> Result<Value, CoreError> {
        let varbinds = self.session.set(oid, value).await?;
        decode::single(oid, varbinds)
    }

    async fn read_deci_amps(&self, concept: Concept) -> Result<f64, CoreError> {
        let oid = oids::resolve(concept, None);
        let value = self.get_one(&oid).await?;
        decode::deci_amps(&oid, &value)
    }
}
