// UDP transport backed by `async-snmp`.
//
// Converts between this crate's OID/value types and the collaborator's,
// and folds its error enum into `crate::Error`. The collaborator matches
// responses by request ID, so concurrent requests are safe.

use std::time::Duration;

use async_snmp::client::Retry;
use async_snmp::{Auth, Client, ErrorStatus};
use secrecy::ExposeSecret;
use tracing::debug;

use crate::error::{Error, Result};
use crate::oid::Oid;
use crate::transport::{SnmpTransport, TransportConfig, Version};
use crate::value::{Value, Varbind};

/// SNMP over UDP to a single agent.
pub struct UdpTransport {
    client: Client,
    target: String,
    version: Version,
    timeout: Duration,
}

impl UdpTransport {
    /// Bind a local socket and prepare a client for `config.target()`.
    ///
    /// No packets are sent until the first request.
    pub async fn connect(config: &TransportConfig) -> Result<Self> {
        config.validate()?;

        let target = config.target();
        let community = config.community.expose_secret().to_owned();
        let auth = match config.version {
            Version::V1 => Auth::v1(community),
            Version::V2c => Auth::v2c(community),
        };

        let client = Client::builder(target.clone(), auth)
            .timeout(config.timeout)
            .retry(Retry::fixed(config.retries, Duration::ZERO))
            .connect()
            .await
            .map_err(|e| convert_error(*e, &target, config.timeout, &[]))?;

        debug!(target = %target, version = ?config.version, "SNMP transport ready");

        Ok(Self {
            client,
            target,
            version: config.version,
            timeout: config.timeout,
        })
    }

    fn err(&self, err: Box<async_snmp::Error>, requested: &[Oid]) -> Error {
        convert_error(*err, &self.target, self.timeout, requested)
    }
}

impl SnmpTransport for UdpTransport {
    async fn get(&self, oids: &[Oid]) -> Result<Vec<Varbind>> {
        let request: Vec<async_snmp::Oid> = oids.iter().map(to_snmp_oid).collect();
        let response = self
            .client
            .get_many(&request)
            .await
            .map_err(|e| self.err(e, oids))?;
        Ok(response.into_iter().map(from_snmp_varbind).collect())
    }

    async fn set(&self, oid: &Oid, value: &Value) -> Result<Vec<Varbind>> {
        let encoded = to_snmp_value(value)?;
        let confirmed = self
            .client
            .set(&to_snmp_oid(oid), encoded)
            .await
            .map_err(|e| self.err(e, std::slice::from_ref(oid)))?;
        Ok(vec![from_snmp_varbind(confirmed)])
    }

    async fn walk(&self, root: &Oid, page_size: u32) -> Result<Vec<Varbind>> {
        let start = to_snmp_oid(root);
        let collected = match self.version {
            // v1 has no GETBULK; page size only applies to v2c.
            Version::V1 => self.client.walk_getnext(start).collect().await,
            Version::V2c => {
                let repetitions = i32::try_from(page_size).unwrap_or(i32::MAX);
                self.client.bulk_walk(start, repetitions).collect().await
            }
        }
        .map_err(|e| self.err(e, std::slice::from_ref(root)))?;

        Ok(collected.into_iter().map(from_snmp_varbind).collect())
    }

    fn supports_concurrent_requests(&self) -> bool {
        true
    }

    fn peer(&self) -> String {
        self.target.clone()
    }
}

// ── Conversions ──────────────────────────────────────────────────────

fn to_snmp_oid(oid: &Oid) -> async_snmp::Oid {
    async_snmp::Oid::from_slice(oid.arcs())
}

fn from_snmp_oid(oid: &async_snmp::Oid) -> Oid {
    Oid::from_arcs(oid.arcs())
}

fn from_snmp_varbind(vb: async_snmp::VarBind) -> Varbind {
    Varbind {
        oid: from_snmp_oid(&vb.oid),
        value: from_snmp_value(vb.value),
    }
}

fn from_snmp_value(value: async_snmp::Value) -> Value {
    use async_snmp::Value as V;

    match value {
        V::Integer(v) => Value::Integer(v),
        V::OctetString(b) => Value::OctetString(b.to_vec()),
        V::Null => Value::Null,
        V::ObjectIdentifier(oid) => Value::ObjectIdentifier(from_snmp_oid(&oid)),
        V::IpAddress(addr) => Value::IpAddress(addr),
        V::Counter32(v) => Value::Counter32(v),
        V::Gauge32(v) => Value::Gauge32(v),
        V::TimeTicks(v) => Value::TimeTicks(v),
        V::Opaque(b) => Value::Opaque(b.to_vec()),
        V::Counter64(v) => Value::Counter64(v),
        V::NoSuchObject => Value::NoSuchObject,
        V::NoSuchInstance => Value::NoSuchInstance,
        V::EndOfMibView => Value::EndOfMibView,
        V::Unknown { tag, .. } => Value::Unknown { tag },
        _ => Value::Unknown { tag: 0 },
    }
}

fn to_snmp_value(value: &Value) -> Result<async_snmp::Value> {
    use async_snmp::Value as V;

    let encoded = match value {
        Value::Integer(v) => V::Integer(*v),
        Value::OctetString(b) => V::from(b.as_slice()),
        Value::Null => V::Null,
        Value::ObjectIdentifier(oid) => V::ObjectIdentifier(to_snmp_oid(oid)),
        Value::IpAddress(addr) => V::IpAddress(*addr),
        Value::Counter32(v) => V::Counter32(*v),
        Value::Gauge32(v) => V::Gauge32(*v),
        Value::TimeTicks(v) => V::TimeTicks(*v),
        Value::Counter64(v) => V::Counter64(*v),
        other => {
            return Err(Error::Encode {
                type_name: other.type_name(),
            });
        }
    };
    Ok(encoded)
}

fn convert_error(
    err: async_snmp::Error,
    target: &str,
    timeout: Duration,
    requested: &[Oid],
) -> Error {
    use async_snmp::Error as E;

    match err {
        E::Timeout { .. } => Error::Timeout {
            target: target.to_owned(),
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        },
        E::Network { source, .. } => Error::Network {
            target: target.to_owned(),
            message: source.to_string(),
        },
        E::Snmp {
            status: ErrorStatus::NoSuchName,
            index,
            oid,
            ..
        } => {
            // error-index is 1-based into the request varbind list.
            let position = usize::try_from(index).unwrap_or(0).saturating_sub(1);
            let oid = oid
                .as_ref()
                .map(from_snmp_oid)
                .or_else(|| requested.get(position).cloned())
                .unwrap_or_default();
            Error::NoSuchName { oid }
        }
        E::Snmp {
            status, index, oid, ..
        } => Error::Agent {
            status: status.to_string(),
            index,
            oid: oid.as_ref().map(from_snmp_oid),
        },
        E::Auth { .. } => Error::Authentication {
            target: target.to_owned(),
        },
        E::MalformedResponse { .. } => Error::MalformedResponse {
            message: format!("undecodable response from {target}"),
        },
        E::WalkAborted { reason, .. } => Error::WalkAborted {
            root: requested.first().cloned().unwrap_or_default(),
            reason: reason.to_string(),
        },
        E::InvalidOid(msg) => Error::InvalidOid(msg.into()),
        E::Config(msg) => Error::InvalidHost { reason: msg.into() },
        other => Error::Network {
            target: target.to_owned(),
            message: other.to_string(),
        },
    }
}
