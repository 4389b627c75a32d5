//! Listener registration scoped to a mounted component.
//!
//! A [`ListenerHost`] knows how to attach and detach one handler per
//! [`EventKind`]. [`Subscriptions`] attaches a set of kinds up front and
//! detaches each one exactly once, either through [`Subscriptions::detach_all`]
//! or when dropped, so every exit path (including a failed mount) releases
//! what was registered.

use crate::error::WoodgrainError;
use crate::input::EventKind;

/// A global event source that handlers can be registered against.
pub trait ListenerHost {
    /// Whatever the host needs to remove a registration again.
    type Handle;

    fn attach(&self, kind: EventKind) -> Result<Self::Handle, WoodgrainError>;

    fn detach(&self, handle: Self::Handle);
}

/// Registrations owned for the lifetime of a mounted component.
pub struct Subscriptions<H: ListenerHost> {
    host: H,
    handles: Vec<H::Handle>,
}

impl<H: ListenerHost> Subscriptions<H> {
    /// Attaches one handler per kind.
    ///
    /// If any attach fails, the ones already attached are detached before
    /// the error is returned.
    pub fn attach(host: H, kinds: &[EventKind]) -> Result<Self, WoodgrainError> {
        let mut subs = Self {
            host,
            handles: Vec::with_capacity(kinds.len()),
        };
        for &kind in kinds {
            let handle = subs.host.attach(kind)?;
            subs.handles.push(handle);
        }
        log::debug!("attached {} listeners", subs.handles.len());
        Ok(subs)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Detaches everything now instead of at drop.
    pub fn detach_all(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.handles.is_empty() {
            return;
        }
        log::debug!("detaching {} listeners", self.handles.len());
        for handle in self.handles.drain(..) {
            self.host.detach(handle);
        }
    }
}

impl<H: ListenerHost> Drop for Subscriptions<H> {
    fn drop(&mut self) {
        self.release();
    }
}
