//! Named-channel dispatch for decoded messages.
//!
//! The source protocol dispatches decoded frames through a runtime event
//! emitter keyed by message name, plus a generic channel that sees
//! everything. [`Dispatcher`] is the typed equivalent: a catalog of named
//! subscriber lists plus one generic list, all invoked synchronously from
//! [`crate::parser::FrameParser::feed`].

use std::collections::HashMap;

use crate::{header::FrameHeader, values::FieldMap};

type GenericSubscriber = Box<dyn FnMut(&str, &FrameHeader, &FieldMap)>;
type NamedSubscriber = Box<dyn FnMut(&FrameHeader, &FieldMap)>;

/// Registry of subscribers for decoded messages.
///
/// Not `Send`/`Sync`: a [`crate::parser::FrameParser`] (and its dispatcher)
/// belongs to a single thread, per the crate's concurrency model.
#[derive(Default)]
pub struct Dispatcher {
    generic: Vec<GenericSubscriber>,
    named: HashMap<String, Vec<NamedSubscriber>>,
}

impl Dispatcher {
    /// Create an empty dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to every decoded message, regardless of name.
    pub fn on_message(&mut self, subscriber: impl FnMut(&str, &FrameHeader, &FieldMap) + 'static) {
        self.generic.push(Box::new(subscriber));
    }

    /// Subscribe to decoded messages with a specific name.
    pub fn on_named(
        &mut self,
        name: impl Into<String>,
        subscriber: impl FnMut(&FrameHeader, &FieldMap) + 'static,
    ) {
        self.named.entry(name.into()).or_default().push(Box::new(subscriber));
    }

    /// Invoke every matching subscriber for one decoded message: first the
    /// generic channel, then the name-specific channel, in registration
    /// order.
    pub(crate) fn dispatch(&mut self, name: &str, header: &FrameHeader, fields: &FieldMap) {
        for subscriber in &mut self.generic {
            subscriber(name, header, fields);
        }
        if let Some(subscribers) = self.named.get_mut(name) {
            for subscriber in subscribers {
                subscriber(header, fields);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn generic_and_named_subscribers_both_fire() {
        let mut dispatcher = Dispatcher::new();
        let generic_hits = Rc::new(RefCell::new(0));
        let named_hits = Rc::new(RefCell::new(0));

        let g = Rc::clone(&generic_hits);
        dispatcher.on_message(move |_, _, _| *g.borrow_mut() += 1);

        let n = Rc::clone(&named_hits);
        dispatcher.on_named("ATTITUDE", move |_, _| *n.borrow_mut() += 1);

        let header = FrameHeader {
            start: 0xFE,
            payload_length: 0,
            sequence: 0,
            system_id: 1,
            component_id: 1,
            message_id: 30,
        };
        let fields = FieldMap::new();
        dispatcher.dispatch("ATTITUDE", &header, &fields);
        dispatcher.dispatch("HEARTBEAT", &header, &fields);

        assert_eq!(*generic_hits.borrow(), 2);
        assert_eq!(*named_hits.borrow(), 1);
    }
}
