use cosmwasm_std::Event;

use crate::events::normalized_type;

/// Handle of a subscription. Use it to cancel the subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<C> = Box<dyn FnMut(&Event, &mut C)>;

struct Subscription<C> {
    id: SubscriptionId,
    event_type: String,
    once: bool,
    handler: Handler<C>,
}

/// Routes contract events to handlers by event type.
///
/// Handlers get the event and a mutable client context `C`, e.g. a local view of the lottery
/// that the handler refreshes. Event types are matched without the `wasm-` prefix.
pub struct EventBus<C> {
    next_id: u64,
    subscriptions: Vec<Subscription<C>>,
}

impl<C> Default for EventBus<C> {
    fn default() -> Self {
        Self {
            next_id: 0,
            subscriptions: Vec::new(),
        }
    }
}

impl<C> EventBus<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls `handler` for every matching event until cancelled
    pub fn subscribe(
        &mut self,
        event_type: impl Into<String>,
        handler: impl FnMut(&Event, &mut C) + 'static,
    ) -> SubscriptionId {
        self.insert(event_type.into(), false, Box::new(handler))
    }

    /// Calls `handler` for the first matching event only. The subscription is removed afterwards.
    pub fn subscribe_once(
        &mut self,
        event_type: impl Into<String>,
        handler: impl FnMut(&Event, &mut C) + 'static,
    ) -> SubscriptionId {
        self.insert(event_type.into(), true, Box::new(handler))
    }

    /// Cancels a subscription. Returns false if it does not exist (anymore).
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|sub| sub.id != id);
        self.subscriptions.len() != before
    }

    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.subscriptions.iter().any(|sub| sub.id == id)
    }

    /// Number of active subscriptions
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Passes the events in order to the matching handlers.
    /// Returns the number of handler invocations.
    pub fn dispatch(&mut self, events: &[Event], ctx: &mut C) -> usize {
        let mut invocations = 0;
        for event in events {
            let ty = normalized_type(event);
            self.subscriptions.retain_mut(|sub| {
                if sub.event_type != ty {
                    return true;
                }
                (sub.handler)(event, ctx);
                invocations += 1;
                !sub.once
            });
        }
        invocations
    }

    fn insert(&mut self, event_type: String, once: bool, handler: Handler<C>) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.subscriptions.push(Subscription {
            id,
            event_type,
            once,
            handler,
        });
        id
    }
}
