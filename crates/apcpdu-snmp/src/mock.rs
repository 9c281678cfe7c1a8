// In-memory agent for tests.
//
// Behaves like a small SNMPv1 agent over a sorted object store, with
// scripted replies that take precedence when queued. Every request is
// recorded so tests can assert what was (or was not) sent.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{Error, Result};
use crate::oid::Oid;
use crate::transport::SnmpTransport;
use crate::value::{Value, Varbind};

/// A request observed by [`MockTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Get(Vec<Oid>),
    Set(Oid, Value),
    Walk(Oid, u32),
}

enum Reply {
    Ready(Result<Vec<Varbind>>),
    /// Never completes; exercises session deadlines.
    Pending,
}

impl Reply {
    async fn resolve(self) -> Result<Vec<Varbind>> {
        match self {
            Self::Ready(result) => result,
            Self::Pending => std::future::pending().await,
        }
    }
}

#[derive(Default)]
struct State {
    objects: BTreeMap<Oid, Value>,
    get_replies: VecDeque<Reply>,
    set_replies: VecDeque<Reply>,
    walk_replies: VecDeque<Reply>,
    calls: Vec<Call>,
}

#[derive(Default)]
struct Shared {
    state: Mutex<State>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

/// Scripted [`SnmpTransport`].
///
/// Clones share the same store and call log, so a test can keep a handle
/// after moving the transport into a session.
#[derive(Clone, Default)]
pub struct MockTransport {
    shared: Arc<Shared>,
    concurrent: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object in the store.
    pub fn with_object(self, oid: Oid, value: impl Into<Value>) -> Self {
        self.insert(oid, value);
        self
    }

    /// Report multiplexing support to the session.
    pub fn concurrent(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    pub fn insert(&self, oid: Oid, value: impl Into<Value>) {
        self.lock().objects.insert(oid, value.into());
    }

    /// Current value in the store.
    pub fn object(&self, oid: &Oid) -> Option<Value> {
        self.lock().objects.get(oid).cloned()
    }

    /// Queue the result of the next GET, bypassing the store.
    pub fn push_get_reply(&self, result: Result<Vec<Varbind>>) {
        self.lock().get_replies.push_back(Reply::Ready(result));
    }

    /// Make the next GET hang forever.
    pub fn push_get_pending(&self) {
        self.lock().get_replies.push_back(Reply::Pending);
    }

    /// Queue the result of the next SET. The store is left untouched.
    pub fn push_set_reply(&self, result: Result<Vec<Varbind>>) {
        self.lock().set_replies.push_back(Reply::Ready(result));
    }

    /// Queue the result of the next walk, in the order given.
    pub fn push_walk_reply(&self, result: Result<Vec<Varbind>>) {
        self.lock().walk_replies.push_back(Reply::Ready(result));
    }

    /// Every request received so far.
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn set_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, Call::Set(..)))
            .count()
    }

    /// Highest number of requests observed in flight at once.
    pub fn max_in_flight(&self) -> usize {
        self.shared.max_in_flight.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.shared.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn enter(&self) -> InFlight<'_> {
        let now = self.shared.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared.max_in_flight.fetch_max(now, Ordering::SeqCst);
        // Give other requests a chance to overlap with this one.
        tokio::task::yield_now().await;
        InFlight(&self.shared.in_flight)
    }

    fn lookup(&self, oids: &[Oid]) -> Result<Vec<Varbind>> {
        let state = self.lock();
        oids.iter()
            .map(|oid| {
                state
                    .objects
                    .get(oid)
                    .map(|value| Varbind::new(oid.clone(), value.clone()))
                    .ok_or_else(|| Error::NoSuchName { oid: oid.clone() })
            })
            .collect()
    }

    fn store(&self, oid: &Oid, value: &Value) -> Result<Vec<Varbind>> {
        let mut state = self.lock();
        match state.objects.get_mut(oid) {
            Some(slot) => {
                *slot = value.clone();
                Ok(vec![Varbind::new(oid.clone(), value.clone())])
            }
            None => Err(Error::NoSuchName { oid: oid.clone() }),
        }
    }

    fn subtree(&self, root: &Oid) -> Vec<Varbind> {
        self.lock()
            .objects
            .iter()
            .filter(|(oid, _)| oid.starts_with(root) && *oid != root)
            .map(|(oid, value)| Varbind::new(oid.clone(), value.clone()))
            .collect()
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl SnmpTransport for MockTransport {
    async fn get(&self, oids: &[Oid]) -> Result<Vec<Varbind>> {
        let scripted = {
            let mut state = self.lock();
            state.calls.push(Call::Get(oids.to_vec()));
            state.get_replies.pop_front()
        };
        let _flight = self.enter().await;
        match scripted {
            Some(reply) => reply.resolve().await,
            None => self.lookup(oids),
        }
    }

    async fn set(&self, oid: &Oid, value: &Value) -> Result<Vec<Varbind>> {
        let scripted = {
            let mut state = self.lock();
            state.calls.push(Call::Set(oid.clone(), value.clone()));
            state.set_replies.pop_front()
        };
        let _flight = self.enter().await;
        match scripted {
            Some(reply) => reply.resolve().await,
            None => self.store(oid, value),
        }
    }

    async fn walk(&self, root: &Oid, page_size: u32) -> Result<Vec<Varbind>> {
        let scripted = {
            let mut state = self.lock();
            state.calls.push(Call::Walk(root.clone(), page_size));
            state.walk_replies.pop_front()
        };
        let _flight = self.enter().await;
        match scripted {
            Some(reply) => reply.resolve().await,
            None => Ok(self.subtree(root)),
        }
    }

    fn supports_concurrent_requests(&self) -> bool {
        self.concurrent
    }

    fn peer(&self) -> String {
        "mock".into()
    }
}
