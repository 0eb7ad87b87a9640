// Copyright 2025 Roost Contributors (https://github.com/roost-wm/roost)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Per-plugin subscription state and event matching.

use thiserror::Error;

use roost_core::encoding::{Decode, DecodeError};
use roost_core::event::{Event, Subscription};

use crate::manager::PluginId;

/// A rejected `subscribe`/`unsubscribe` call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubscribeError {
    #[error("unknown event kind {0}")]
    UnknownKind(u32),

    #[error("filter is {have} bytes, this kind's payload is {expected}")]
    BadLength { expected: usize, have: usize },
}

impl From<DecodeError> for SubscribeError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::UnknownKind(kind) => Self::UnknownKind(kind),
            DecodeError::Truncated { need, have } => Self::BadLength {
                expected: need,
                have,
            },
            DecodeError::PayloadLength { expected, have } => Self::BadLength { expected, have },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    plugin: PluginId,
    subscription: Subscription,
}

/// Registration-ordered subscription table.
///
/// Mutated only from a module's own `init`/`subscribe`/`unsubscribe` calls
/// and at unload; the dispatch loop only reads it. Iteration order is
/// subscribe-call order, which keeps delivery deterministic across runs.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    entries: Vec<Entry>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register interest described by a raw subscription buffer.
    ///
    /// Re-registering an identical `(plugin, kind, filter)` triple is
    /// idempotent: the event is still delivered to that plugin once.
    pub fn subscribe(&mut self, plugin: PluginId, raw: &[u8]) -> Result<(), SubscribeError> {
        let subscription = Subscription::decode(raw)?;
        let entry = Entry {
            plugin,
            subscription,
        };

        if self.entries.contains(&entry) {
            tracing::debug!(plugin = %entry.plugin, ?subscription, "duplicate subscription ignored");
            return Ok(());
        }

        tracing::debug!(plugin = %entry.plugin, ?subscription, "subscribe");
        self.entries.push(entry);
        Ok(())
    }

    /// Drop a previously registered interest.
    ///
    /// A wildcard buffer (kind only) removes every subscription of that kind
    /// for the plugin; a filtered buffer removes only the exact triple.
    pub fn unsubscribe(&mut self, plugin: &PluginId, raw: &[u8]) -> Result<(), SubscribeError> {
        let subscription = Subscription::decode(raw)?;
        tracing::debug!(plugin = %plugin, ?subscription, "unsubscribe");

        match subscription.filter {
            Some(_) => self
                .entries
                .retain(|e| !(e.plugin == *plugin && e.subscription == subscription)),
            None => self
                .entries
                .retain(|e| !(e.plugin == *plugin && e.subscription.kind == subscription.kind)),
        }
        Ok(())
    }

    /// Remove every subscription a module holds. Called on unload.
    pub fn unsubscribe_all(&mut self, plugin: &PluginId) {
        self.entries.retain(|e| e.plugin != *plugin);
    }

    /// Plugins `event` must be delivered to, deduplicated, in registration
    /// order.
    pub fn matches(&self, event: &Event) -> Vec<PluginId> {
        let mut matched: Vec<PluginId> = Vec::new();
        for entry in &self.entries {
            if entry.subscription.matches(event) && !matched.contains(&entry.plugin) {
                matched.push(entry.plugin.clone());
            }
        }
        matched
    }

    /// Total number of registered subscriptions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roost_core::encoding::Encode;
    use roost_core::event::EventKind;
    use roost_core::key::{Key, Keycode, ModMask};

    fn press(modifiers: ModMask, keycode: Keycode) -> Event {
        Event::KeyPress(Key::new(modifiers, keycode))
    }

    fn raw(subscription: Subscription) -> Vec<u8> {
        subscription.encode_to_vec()
    }

    #[test]
    fn wildcard_matches_kind_only() {
        let mut registry = SubscriptionRegistry::new();
        registry
            .subscribe("a".into(), &raw(Subscription::wildcard(EventKind::KeyPress)))
            .unwrap();

        assert_eq!(
            registry.matches(&press(ModMask::M4, Keycode::A)),
            vec![PluginId::from("a")]
        );
        assert!(registry
            .matches(&Event::KeyRelease(Key::new(ModMask::M4, Keycode::A)))
            .is_empty());
    }

    #[test]
    fn filter_requires_exact_payload() {
        let mut registry = SubscriptionRegistry::new();
        let win_a = Subscription::key_press(Key::new(ModMask::M4, Keycode::A));
        registry.subscribe("a".into(), &raw(win_a)).unwrap();

        assert_eq!(registry.matches(&press(ModMask::M4, Keycode::A)).len(), 1);
        assert!(registry.matches(&press(ModMask::M4, Keycode::S)).is_empty());
        assert!(registry.matches(&press(ModMask::NONE, Keycode::A)).is_empty());
    }

    #[test]
    fn duplicate_subscription_collapses_to_one_delivery() {
        let mut registry = SubscriptionRegistry::new();
        let sub = raw(Subscription::wildcard(EventKind::KeyPress));
        registry.subscribe("a".into(), &sub).unwrap();
        registry.subscribe("a".into(), &sub).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.matches(&press(ModMask::NONE, Keycode::Q)).len(), 1);
    }

    #[test]
    fn overlapping_subscriptions_still_deliver_once() {
        let mut registry = SubscriptionRegistry::new();
        registry
            .subscribe("a".into(), &raw(Subscription::wildcard(EventKind::KeyPress)))
            .unwrap();
        registry
            .subscribe(
                "a".into(),
                &raw(Subscription::key_press(Key::new(ModMask::M4, Keycode::A))),
            )
            .unwrap();

        assert_eq!(registry.matches(&press(ModMask::M4, Keycode::A)).len(), 1);
    }

    #[test]
    fn matching_preserves_registration_order() {
        let mut registry = SubscriptionRegistry::new();
        let sub = raw(Subscription::wildcard(EventKind::KeyPress));
        for plugin in ["a", "b", "c"] {
            registry.subscribe(plugin.into(), &sub).unwrap();
        }

        let matched = registry.matches(&press(ModMask::NONE, Keycode::Q));
        assert_eq!(
            matched,
            vec![
                PluginId::from("a"),
                PluginId::from("b"),
                PluginId::from("c")
            ]
        );
    }

    #[test]
    fn unknown_kind_and_bad_length_are_rejected() {
        let mut registry = SubscriptionRegistry::new();

        assert_eq!(
            registry.subscribe("a".into(), &[9, 9, 0, 0]),
            Err(SubscribeError::UnknownKind(0x0909))
        );
        assert_eq!(
            registry.subscribe("a".into(), &[1, 0, 0, 0, 64]),
            Err(SubscribeError::BadLength {
                expected: 3,
                have: 1
            })
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn wildcard_unsubscribe_drops_every_filter_of_that_kind() {
        let mut registry = SubscriptionRegistry::new();
        registry
            .subscribe(
                "a".into(),
                &raw(Subscription::key_press(Key::new(ModMask::M4, Keycode::A))),
            )
            .unwrap();
        registry
            .subscribe(
                "a".into(),
                &raw(Subscription::key_press(Key::new(ModMask::M4, Keycode::S))),
            )
            .unwrap();

        registry
            .unsubscribe(
                &"a".into(),
                &raw(Subscription::wildcard(EventKind::KeyPress)),
            )
            .unwrap();

        assert!(registry.is_empty());
    }

    #[test]
    fn unsubscribe_all_prunes_only_that_plugin() {
        let mut registry = SubscriptionRegistry::new();
        let sub = raw(Subscription::wildcard(EventKind::KeyPress));
        registry.subscribe("a".into(), &sub).unwrap();
        registry.subscribe("b".into(), &sub).unwrap();

        registry.unsubscribe_all(&"a".into());

        assert_eq!(
            registry.matches(&press(ModMask::NONE, Keycode::Q)),
            vec![PluginId::from("b")]
        );
    }
}
