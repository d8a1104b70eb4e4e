use super::event_models::{BotEvent, EventHandler};
use crate::core::plugins::PluginHost;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

struct Subscription {
    plugin: String,
    once: bool,
    fired: AtomicBool,
    handler: Arc<dyn EventHandler>,
}

/// Event name -> handlers, in subscription order.
pub struct EventBus {
    subscriptions: DashMap<String, Vec<Arc<Subscription>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscriptions: DashMap::new(),
        }
    }

    pub fn subscribe(
        &self,
        event: impl Into<String>,
        plugin: impl Into<String>,
        once: bool,
        handler: Arc<dyn EventHandler>,
    ) {
        let subscription = Arc::new(Subscription {
            plugin: plugin.into(),
            once,
            fired: AtomicBool::new(false),
            handler,
        });
        self.subscriptions
            .entry(event.into())
            .or_default()
            .push(subscription);
    }

    /// Plugins currently subscribed to `event`.
    pub fn subscribers(&self, event: &str) -> Vec<String> {
        self.subscriptions
            .get(event)
            .map(|subs| subs.iter().map(|s| s.plugin.clone()).collect())
            .unwrap_or_default()
    }

    pub fn total(&self) -> usize {
        self.subscriptions.iter().map(|e| e.value().len()).sum()
    }

    /// Run every handler subscribed to the event's name, passing `host` along.
    ///
    /// Handler errors are logged and never stop the remaining handlers.
    /// Once-subscriptions are dropped after their first run. Returns how many
    /// handlers ran.
    pub async fn emit(&self, event: &BotEvent, host: &PluginHost) -> usize {
        let name = event.name();
        let subscriptions: Vec<Arc<Subscription>> = match self.subscriptions.get(name) {
            Some(subs) => subs.value().clone(),
            None => return 0,
        };

        let mut ran = 0;
        let mut consumed_once = false;
        for sub in subscriptions {
            if sub.once {
                // Concurrent emits race on this flag; only one of them wins.
                if sub.fired.swap(true, Ordering::SeqCst) {
                    continue;
                }
                consumed_once = true;
            }

            ran += 1;
            if let Err(e) = sub.handler.handle(event, host).await {
                tracing::error!(
                    event = name,
                    plugin = %sub.plugin,
                    "Event handler failed: {:#}",
                    e
                );
            }
        }

        if consumed_once {
            if let Some(mut subs) = self.subscriptions.get_mut(name) {
                subs.retain(|s| !(s.once && s.fired.load(Ordering::SeqCst)));
            }
        }

        ran
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
