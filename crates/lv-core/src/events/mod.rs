use std::sync::Arc;
use parking_lot::Mutex;
use ahash::AHashMap;

/// Viewer-wide notification bus
pub struct EventBus {
    handlers: Arc<Mutex<AHashMap<std::any::TypeId, Vec<Box<dyn EventHandler>>>>>,
}

/// Event trait that all events must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// Notifications emitted by the viewer controller
pub mod events {
    use super::Event;

    /// All four documents were loaded and the store was built
    #[derive(Debug, Clone, PartialEq)]
    pub struct DataLoaded {
        pub logbook_rows: usize,
        pub boats: usize,
        pub persons: usize,
        pub destinations: usize,
    }

    /// The logbook filter was recomputed
    #[derive(Debug, Clone, PartialEq)]
    pub struct FiltersApplied {
        pub visible_rows: usize,
        pub total_pages: usize,
    }

    /// The current table page changed without a refilter
    #[derive(Debug, Clone, PartialEq)]
    pub struct PageChanged {
        pub page: usize,
        pub total_pages: usize,
    }

    /// A statistics chart was rebuilt
    #[derive(Debug, Clone, PartialEq)]
    pub struct StatisticsUpdated {
        pub tab: String,
        pub series_len: usize,
    }

    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(
        DataLoaded,
        FiltersApplied,
        PageChanged,
        StatisticsUpdated
    );
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(AHashMap::new())),
        }
    }

    /// Subscribe to events of a specific type
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();
        handlers.entry(type_id).or_insert_with(Vec::new).push(handler);
    }

    /// Publish an event to every handler subscribed to its type.
    ///
    /// Handlers must not publish on the same bus from inside `handle`.
    pub fn publish<E: Event>(&self, event: E) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();

        if let Some(event_handlers) = handlers.get_mut(&type_id) {
            for handler in event_handlers.iter_mut() {
                handler.handle(&event);
            }
        }
    }

    /// Number of handlers registered for `E`
    pub fn handler_count<E: Event>(&self) -> usize {
        self.handlers
            .lock()
            .get(&std::any::TypeId::of::<E>())
            .map(Vec::len)
            .unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Event handler built from a closure over the concrete event type
pub struct TypedEventHandler<E, F> {
    handler: F,
    _phantom: std::marker::PhantomData<fn(&E)>,
}

impl<E, F> EventHandler for TypedEventHandler<E, F>
where
    E: Event,
    F: FnMut(&E) + Send + Sync,
{
    fn handle(&mut self, event: &dyn Event) {
        if let Some(event) = event.as_any().downcast_ref::<E>() {
            (self.handler)(event);
        }
    }
}

/// Create an event handler from a closure taking the concrete event
pub fn handler_for<E, F>(f: F) -> Box<dyn EventHandler>
where
    E: Event,
    F: FnMut(&E) + Send + Sync + 'static,
{
    Box::new(TypedEventHandler {
        handler: f,
        _phantom: std::marker::PhantomData,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::events::{FiltersApplied, PageChanged};

    #[test]
    fn test_publish_reaches_typed_subscriber() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        bus.subscribe::<FiltersApplied>(handler_for(move |e: &FiltersApplied| {
            sink.lock().push(e.visible_rows);
        }));

        bus.publish(FiltersApplied { visible_rows: 7, total_pages: 1 });
        bus.publish(FiltersApplied { visible_rows: 0, total_pages: 0 });

        assert_eq!(*seen.lock(), vec![7, 0]);
    }

    #[test]
    fn test_other_event_types_are_not_delivered() {
        let bus = EventBus::new();
        let count = Arc::new(Mutex::new(0));
        let sink = count.clone();
        bus.subscribe::<FiltersApplied>(handler_for(move |_: &FiltersApplied| {
            *sink.lock() += 1;
        }));

        bus.publish(PageChanged { page: 2, total_pages: 3 });

        assert_eq!(*count.lock(), 0);
        assert_eq!(bus.handler_count::<FiltersApplied>(), 1);
        assert_eq!(bus.handler_count::<PageChanged>(), 0);
    }
}
