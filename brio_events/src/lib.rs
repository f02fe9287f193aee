//! Ordered multicast delegates. Every hookable event in the engine is an
//! `EventCaller` (sender + args) or a `GlobalEventCaller` (args only).
//! Registration appends; invocation runs handlers in registration order.

use std::fmt;

/// Handler signature for sender-carrying events.
pub type EventAction<S, A> = Box<dyn FnMut(&mut S, &mut A)>;
/// Handler signature for events without a sender.
pub type GlobalEventAction<A> = Box<dyn FnMut(&mut A)>;

/// Ordered list of callbacks invoked with a mutable sender and argument.
///
/// `call` synthesizes a default argument value when the caller passes none;
/// only that synthesized value is dropped afterward — a caller-supplied
/// argument is shared across handlers and handed back untouched.
pub struct EventCaller<S: ?Sized, A: Default> {
    handlers: Vec<EventAction<S, A>>,
}

impl<S: ?Sized, A: Default> EventCaller<S, A> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Number of registered handlers.
    pub fn count(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Unregister every handler. There is no individual unregistration.
    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    /// Append a handler; it will run after every handler registered before it.
    pub fn register(&mut self, action: impl FnMut(&mut S, &mut A) + 'static) {
        self.handlers.push(Box::new(action));
    }

    /// Move every handler out of `other` onto the end of this caller,
    /// preserving both registration orders.
    pub fn absorb(&mut self, other: &mut Self) {
        self.handlers.append(&mut other.handlers);
    }

    /// Invoke every handler in registration order.
    pub fn call(&mut self, sender: &mut S, args: Option<&mut A>) {
        match args {
            Some(args) => {
                for f in &mut self.handlers {
                    f(sender, args);
                }
            }
            None => {
                let mut transient = A::default();
                for f in &mut self.handlers {
                    f(sender, &mut transient);
                }
            }
        }
    }
}

impl<S: ?Sized, A: Default> Default for EventCaller<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ?Sized, A: Default> fmt::Debug for EventCaller<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventCaller")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

/// Ordered list of callbacks for events that have no sender.
pub struct GlobalEventCaller<A: Default> {
    handlers: Vec<GlobalEventAction<A>>,
}

impl<A: Default> GlobalEventCaller<A> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn count(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    pub fn register(&mut self, action: impl FnMut(&mut A) + 'static) {
        self.handlers.push(Box::new(action));
    }

    pub fn call(&mut self, args: Option<&mut A>) {
        match args {
            Some(args) => {
                for f in &mut self.handlers {
                    f(args);
                }
            }
            None => {
                let mut transient = A::default();
                for f in &mut self.handlers {
                    f(&mut transient);
                }
            }
        }
    }
}

impl<A: Default> Default for GlobalEventCaller<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Default> fmt::Debug for GlobalEventCaller<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalEventCaller")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
