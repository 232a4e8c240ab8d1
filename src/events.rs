//! Viewer lifecycle and progress events
//!
//! Emission is a synchronous publish: every registered listener sees each
//! event exactly once, in registration order, before `emit` returns.

use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ViewerEvent {
    Loaded { total_pages: usize, title: String },
    PageChanged { page_number: usize, total_pages: usize },
    ProgressChanged { percentage: u32, current: usize, total: usize },
    Rendered { scale: f32 },
    Error { message: String },
}

impl ViewerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ViewerEvent::Loaded { .. } => "loaded",
            ViewerEvent::PageChanged { .. } => "pageChanged",
            ViewerEvent::ProgressChanged { .. } => "progressChanged",
            ViewerEvent::Rendered { .. } => "rendered",
            ViewerEvent::Error { .. } => "error",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&ViewerEvent)>;

#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    listeners: Vec<(ListenerId, Listener)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ViewerEvent) + 'static,
    {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, event: ViewerEvent) {
        log::debug!("emit {}: {event:?}", event.name());
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn each_listener_gets_one_delivery() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        for tag in ["a", "b"] {
            let seen = seen.clone();
            bus.subscribe(move |e| seen.borrow_mut().push((tag, e.name())));
        }

        bus.emit(ViewerEvent::Rendered { scale: 1.5 });
        assert_eq!(*seen.borrow(), vec![("a", "rendered"), ("b", "rendered")]);
    }

    #[test]
    fn unsubscribed_listener_is_silent() {
        let count = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();
        let c = count.clone();
        let id = bus.subscribe(move |_| *c.borrow_mut() += 1);

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.emit(ViewerEvent::Rendered { scale: 1.0 });
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn serializes_with_host_field_names() {
        let json = serde_json::to_string(&ViewerEvent::PageChanged {
            page_number: 3,
            total_pages: 9,
        })
        .unwrap();
        assert_eq!(json, r#"{"event":"pageChanged","pageNumber":3,"totalPages":9}"#);
    }
}
