//! One-shot "document ready" signal
//!
//! The browser build fires it from `DOMContentLoaded` (or immediately when the
//! document is already interactive). The preview tool fires it at startup.

use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::future::{FutureExt, Shared};
use tracing::debug;

use crate::constants::host;

struct ReadyInner {
    sender: RefCell<Option<oneshot::Sender<()>>>,
    receiver: Shared<oneshot::Receiver<()>>,
}

#[derive(Clone)]
pub struct ReadySignal {
    inner: Rc<ReadyInner>,
}

impl ReadySignal {
    pub fn new() -> Self {
        let (sender, receiver) = oneshot::channel();
        Self {
            inner: Rc::new(ReadyInner {
                sender: RefCell::new(Some(sender)),
                receiver: receiver.shared(),
            }),
        }
    }

    /// A signal that has already fired
    pub fn fired() -> Self {
        let signal = Self::new();
        signal.fire();
        signal
    }

    /// Mark the document ready. Only the first call has an effect.
    pub fn fire(&self) {
        let sender = self.inner.sender.borrow_mut().take();
        if let Some(sender) = sender {
            let _ = sender.send(());
            debug!("Document ready");
        }
    }

    pub fn is_ready(&self) -> bool {
        self.inner.sender.borrow().is_none()
    }

    /// Resolves to true once fired, or false if every handle was dropped first
    pub fn wait(&self) -> impl Future<Output = bool> + 'static {
        let receiver = self.inner.receiver.clone();
        async move { receiver.await.is_ok() }
    }
}

/// True for any `document.readyState` past `loading`
pub fn is_loaded(ready_state: &str) -> bool {
    ready_state != host::LOADING_STATE
}

impl Default for ReadySignal {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ReadySignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadySignal")
            .field("ready", &self.is_ready())
            .finish()
    }
}
