//! Document-level keyboard navigation
//!
//! Key presses arrive at one shared [`KeyboardHub`] (the document). Each
//! viewer holds at most one [`KeySubscription`]; dropping or unsubscribing
//! it removes the binding exactly once.

use std::sync::{Arc, LazyLock, Mutex, Weak};

use crossterm::event::KeyCode;
use flume::{Receiver, Sender, TryIter};
use log::debug;

/// Keys the viewer scrolls on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NavKey {
    ArrowUp,
    ArrowDown,
    PageUp,
    PageDown,
    Space,
    Home,
    End,
}

impl NavKey {
    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Up => Some(NavKey::ArrowUp),
            KeyCode::Down => Some(NavKey::ArrowDown),
            KeyCode::PageUp => Some(NavKey::PageUp),
            KeyCode::PageDown => Some(NavKey::PageDown),
            KeyCode::Char(' ') => Some(NavKey::Space),
            KeyCode::Home => Some(NavKey::Home),
            KeyCode::End => Some(NavKey::End),
            _ => None,
        }
    }

    /// Parse the DOM `KeyboardEvent.key` spelling
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(NavKey::ArrowUp),
            "ArrowDown" => Some(NavKey::ArrowDown),
            "PageUp" => Some(NavKey::PageUp),
            "PageDown" => Some(NavKey::PageDown),
            " " => Some(NavKey::Space),
            "Home" => Some(NavKey::Home),
            "End" => Some(NavKey::End),
            _ => None,
        }
    }
}

#[derive(Default)]
struct HubInner {
    next_id: u64,
    subscribers: Vec<(u64, Sender<NavKey>)>,
}

/// Shared key dispatcher standing in for the document object
#[derive(Clone, Default)]
pub struct KeyboardHub {
    inner: Arc<Mutex<HubInner>>,
}

static DOCUMENT_HUB: LazyLock<KeyboardHub> = LazyLock::new(KeyboardHub::new);

impl KeyboardHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide hub
    pub fn document() -> KeyboardHub {
        DOCUMENT_HUB.clone()
    }

    pub fn subscribe(&self) -> KeySubscription {
        let (tx, rx) = flume::unbounded();
        let mut id = 0;
        if let Ok(mut inner) = self.inner.lock() {
            inner.next_id += 1;
            id = inner.next_id;
            inner.subscribers.push((id, tx));
        }
        debug!("Keyboard subscription {id} bound");
        KeySubscription {
            id,
            hub: Arc::downgrade(&self.inner),
            rx,
            active: true,
        }
    }

    /// Deliver a key press. Returns true when a subscriber took it, meaning
    /// the default action should be prevented.
    pub fn dispatch(&self, code: KeyCode) -> bool {
        match NavKey::from_key_code(code) {
            Some(key) => self.dispatch_nav(key),
            None => false,
        }
    }

    pub fn dispatch_nav(&self, key: NavKey) -> bool {
        let Ok(mut inner) = self.inner.lock() else {
            return false;
        };
        inner.subscribers.retain(|(_, tx)| tx.send(key).is_ok());
        !inner.subscribers.is_empty()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().map(|i| i.subscribers.len()).unwrap_or(0)
    }
}

impl std::fmt::Debug for KeyboardHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyboardHub")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// A viewer's binding to the hub
#[derive(Debug)]
pub struct KeySubscription {
    id: u64,
    hub: Weak<Mutex<HubInner>>,
    rx: Receiver<NavKey>,
    active: bool,
}

impl KeySubscription {
    /// Keys delivered since the last drain
    pub fn pending(&self) -> TryIter<'_, NavKey> {
        self.rx.try_iter()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Remove the binding. Returns false if it was already removed.
    pub fn unsubscribe(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        if let Some(hub) = self.hub.upgrade() {
            if let Ok(mut inner) = hub.lock() {
                inner.subscribers.retain(|(id, _)| *id != self.id);
            }
        }
        debug!("Keyboard subscription {} released", self.id);
        true
    }
}

impl Drop for KeySubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
