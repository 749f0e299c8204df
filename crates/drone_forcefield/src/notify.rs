//! Enter/exit notification fan-out

use crate::config::NotificationTarget;
use crate::error::ForcefieldError;
use crate::host::NotificationSink;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Notification sent to receivers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldEvent {
    EntityEnteredField,
    EntityExitedField,
}

impl FieldEvent {
    /// Stable event name receivers subscribe to
    pub fn name(&self) -> &'static str {
        match self {
            Self::EntityEnteredField => "EntityEnteredField",
            Self::EntityExitedField => "EntityExitedField",
        }
    }
}

impl fmt::Display for FieldEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One configured receiver slot
#[derive(Debug, Clone)]
struct ReceiverSlot<R> {
    target: NotificationTarget,
    receiver: Option<R>,
}

/// Receivers for one event, resolved once and kept in configured order.
/// Unresolved targets keep their slot and are skipped on delivery.
#[derive(Debug, Clone)]
pub struct ReceiverSet<R> {
    event: FieldEvent,
    slots: Vec<ReceiverSlot<R>>,
}

impl<R> ReceiverSet<R> {
    /// Resolve every target through `sink`
    pub fn resolve<S>(
        field: &str,
        event: FieldEvent,
        targets: &[NotificationTarget],
        sink: &S,
    ) -> Self
    where
        S: NotificationSink<Receiver = R>,
    {
        if targets.is_empty() {
            log::debug!("[{}] No {} receivers set", field, event);
        }

        let slots = targets
            .iter()
            .map(|target| {
                let receiver = sink.resolve(target);
                if receiver.is_none() {
                    log::warn!(
                        "[{}] {}",
                        field,
                        ForcefieldError::UnresolvedReceiver(target.to_string())
                    );
                }
                ReceiverSlot {
                    target: target.clone(),
                    receiver,
                }
            })
            .collect();

        Self { event, slots }
    }

    /// Event this set delivers
    pub fn event(&self) -> FieldEvent {
        self.event
    }

    /// Number of configured targets, resolved or not
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of targets that resolved
    pub fn resolved_count(&self) -> usize {
        self.slots.iter().filter(|s| s.receiver.is_some()).count()
    }

    /// Notify every resolved receiver in order. Returns how many were
    /// notified.
    pub fn deliver<S>(&self, field: &str, sink: &mut S) -> usize
    where
        S: NotificationSink<Receiver = R>,
    {
        let mut delivered = 0;
        for slot in &self.slots {
            match &slot.receiver {
                Some(receiver) => {
                    log::debug!("[{}] Sending {} to {}", field, self.event, slot.target);
                    sink.notify(receiver, self.event);
                    delivered += 1;
                }
                None => log::debug!("[{}] Skipping unresolved receiver {}", field, slot.target),
            }
        }
        delivered
    }
}
