//! Priority-ordered listener chain, shaped like a host event bus.
//!
//! Listeners run in ascending [`HookPriority`] order; registration order
//! breaks ties. The first listener to cancel stops the chain, so a
//! `First` guard rules before any downstream executor sees the event.

use airlock_hooks::{EventRuling, HookPriority};

type Listener<E> = Box<dyn Fn(&E) -> EventRuling + Send + Sync>;

pub struct EventPipeline<E> {
    listeners: Vec<(HookPriority, Listener<E>)>,
}

impl<E> EventPipeline<E> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn register<F>(&mut self, priority: HookPriority, listener: F)
    where
        F: Fn(&E) -> EventRuling + Send + Sync + 'static,
    {
        self.listeners.push((priority, Box::new(listener)));
        // Stable sort keeps registration order within a priority.
        self.listeners.sort_by_key(|(priority, _)| *priority);
    }

    pub fn dispatch(&self, event: &E) -> EventRuling {
        for (_, listener) in &self.listeners {
            if listener(event) == EventRuling::Cancel {
                return EventRuling::Cancel;
            }
        }
        EventRuling::Proceed
    }
}

impl<E> Default for EventPipeline<E> {
    fn default() -> Self {
        Self::new()
    }
}
