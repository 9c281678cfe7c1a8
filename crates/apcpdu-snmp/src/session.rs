// ── Device session ──
//
// The single point of contact with the transport. A session is created
// once per device and is either open or closed; after `close()` every
// request fails with `Error::SessionClosed`.

use std::future::Future;
use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard, RwLock};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::oid::Oid;
use crate::transport::{SnmpTransport, TransportConfig};
use crate::udp::UdpTransport;
use crate::value::{Value, Varbind};

/// A long-lived, explicitly closed session with one agent.
///
/// Requests take `&self`. If the transport cannot multiplex in-flight
/// requests, every call waits its turn on a FIFO queue so responses are
/// never attributed to the wrong request.
pub struct Session<T: SnmpTransport = UdpTransport> {
    transport: RwLock<Option<T>>,
    queue: Mutex<()>,
    serialize: bool,
    deadline: Duration,
    peer: String,
}

impl Session<UdpTransport> {
    /// Open a UDP session from `config`.
    pub async fn open(config: &TransportConfig) -> Result<Self> {
        let transport = UdpTransport::connect(config).await?;
        Ok(Self::new(transport, config.deadline()))
    }
}

impl<T: SnmpTransport> Session<T> {
    /// Wrap an existing transport. `deadline` bounds each GET and SET.
    pub fn new(transport: T, deadline: Duration) -> Self {
        let serialize = !transport.supports_concurrent_requests();
        let peer = transport.peer();
        Self {
            transport: RwLock::new(Some(transport)),
            queue: Mutex::new(()),
            serialize,
            deadline,
            peer,
        }
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    pub async fn is_closed(&self) -> bool {
        self.transport.read().await.is_none()
    }

    /// GET the given OIDs. The result mirrors the request order.
    pub async fn get(&self, oids: &[Oid]) -> Result<Vec<Varbind>> {
        let _turn = self.turn().await;
        let guard = self.transport.read().await;
        let transport = guard.as_ref().ok_or(Error::SessionClosed)?;

        debug!(
            peer = %self.peer,
            oid_count = oids.len(),
            first = ?oids.first().map(ToString::to_string),
            "GET"
        );
        self.bounded(transport.get(oids)).await
    }

    /// SET a single object and return the agent's confirmation varbinds.
    pub async fn set(&self, oid: &Oid, value: &Value) -> Result<Vec<Varbind>> {
        let _turn = self.turn().await;
        let guard = self.transport.read().await;
        let transport = guard.as_ref().ok_or(Error::SessionClosed)?;

        debug!(peer = %self.peer, oid = %oid, value_type = value.type_name(), "SET");
        self.bounded(transport.set(oid, value)).await
    }

    /// Walk everything below `root`, all-or-nothing.
    ///
    /// Walks span many PDUs, so only the transport's per-request timeout
    /// applies here.
    pub async fn walk_subtree(&self, root: &Oid, page_size: u32) -> Result<Vec<Varbind>> {
        let _turn = self.turn().await;
        let guard = self.transport.read().await;
        let transport = guard.as_ref().ok_or(Error::SessionClosed)?;

        debug!(peer = %self.peer, root = %root, page_size, "WALK");
        let varbinds = transport.walk(root, page_size).await?;
        trace!(root = %root, count = varbinds.len(), "walk complete");
        Ok(varbinds)
    }

    /// Close the session, dropping the transport.
    ///
    /// Waits for in-flight requests to finish. Fails with
    /// `Error::SessionClosed` if already closed.
    pub async fn close(&self) -> Result<()> {
        let mut guard = self.transport.write().await;
        match guard.take() {
            Some(transport) => {
                drop(transport);
                debug!(peer = %self.peer, "session closed");
                Ok(())
            }
            None => Err(Error::SessionClosed),
        }
    }

    async fn turn(&self) -> Option<MutexGuard<'_, ()>> {
        if self.serialize {
            Some(self.queue.lock().await)
        } else {
            None
        }
    }

    async fn bounded<R>(&self, request: impl Future<Output = Result<R>>) -> Result<R> {
        tokio::time::timeout(self.deadline, request)
            .await
            .unwrap_or_else(|_| {
                Err(Error::Timeout {
                    target: self.peer.clone(),
                    timeout_ms: u64::try_from(self.deadline.as_millis()).unwrap_or(u64::MAX),
                })
            })
    }
}
