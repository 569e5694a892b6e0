//! Single-owner native handle with release-at-most-once semantics.

use crate::error::{PlayerError, Result};
use crate::native::{Engine, HandleKind, NativeHandle};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HandleState {
    /// We hold one engine reference.
    Owned,
    /// Our reference was released after binding into a parent engine object,
    /// which keeps the handle alive. Calls are still forwarded.
    Lent,
    /// Terminal. Nothing is forwarded anymore.
    Released,
}

/// One engine reference owned by a wrapper.
///
/// The raw pointer doubles as the wrapper identity and is kept after release.
pub(crate) struct OwnedHandle {
    engine: Engine,
    kind: HandleKind,
    raw: NativeHandle,
    state: HandleState,
}

impl OwnedHandle {
    /// Adopt one reference to `raw`.
    pub(crate) fn new(engine: Engine, kind: HandleKind, raw: NativeHandle) -> Self {
        tracing::debug!(%kind, handle = %raw, "native handle acquired");
        Self {
            engine,
            kind,
            raw,
            state: HandleState::Owned,
        }
    }

    /// Handle to forward a call to, or `Disposed` once released.
    pub(crate) fn live(&self) -> Result<NativeHandle> {
        match self.state {
            HandleState::Owned | HandleState::Lent => Ok(self.raw),
            HandleState::Released => Err(PlayerError::Disposed(self.kind)),
        }
    }

    pub(crate) fn raw(&self) -> NativeHandle {
        self.raw
    }

    pub(crate) fn kind(&self) -> HandleKind {
        self.kind
    }

    pub(crate) fn engine(&self) -> &Engine {
        &self.engine
    }

    pub(crate) fn is_released(&self) -> bool {
        self.state == HandleState::Released
    }

    /// Release our reference but keep forwarding calls.
    ///
    /// Only valid once a parent engine object holds its own reference.
    pub(crate) fn relinquish(&mut self) {
        if self.state == HandleState::Owned {
            tracing::debug!(kind = %self.kind, handle = %self.raw, "native handle lent to parent");
            self.engine.release(self.kind, self.raw);
            self.state = HandleState::Lent;
        }
    }

    /// Stop forwarding and drop our reference if we still hold it.
    ///
    /// Returns `true` when this call issued the native release.
    pub(crate) fn release(&mut self) -> bool {
        let previous = std::mem::replace(&mut self.state, HandleState::Released);
        match previous {
            HandleState::Owned => {
                tracing::debug!(kind = %self.kind, handle = %self.raw, "native handle released");
                self.engine.release(self.kind, self.raw);
                true
            }
            HandleState::Lent | HandleState::Released => false,
        }
    }
}

impl Drop for OwnedHandle {
    fn drop(&mut self) {
        self.release();
    }
}
