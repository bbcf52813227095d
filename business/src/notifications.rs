//! Transient toast notifications.
//!
//! Anything holding a [`Notifier`] can push; the UI owns [`Notifications`] and polls it once
//! per frame.

use std::any::Any;

use chrono::{DateTime, TimeDelta, Utc};
use flume::{Receiver, Sender};
use log::{debug, warn};
use stockroom_states::{State, state_assign_impl};

use crate::i18n::MessageKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationText {
    Key(MessageKey),
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub text: NotificationText,
}

#[derive(Debug, Clone)]
pub struct Notifier {
    send: Sender<Notification>,
}

pub fn notification_channel() -> (Notifier, Receiver<Notification>) {
    let (send, recv) = flume::unbounded();
    (Notifier { send }, recv)
}

impl Notifier {
    pub fn success(&self, key: MessageKey) {
        self.push(Notification {
            level: NotificationLevel::Success,
            text: NotificationText::Key(key),
        });
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(Notification {
            level: NotificationLevel::Error,
            text: NotificationText::Raw(message.into()),
        });
    }

    fn push(&self, notification: Notification) {
        if self.send.send(notification).is_err() {
            warn!("Notification dropped: no receiver");
        }
    }
}

/// A notification on screen, with the time it appeared.
#[derive(Debug, Clone)]
pub struct VisibleNotification {
    pub notification: Notification,
    pub shown_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct Notifications {
    recv: Receiver<Notification>,
    visible: Vec<VisibleNotification>,
}

impl Notifications {
    pub const LIFETIME_SECS: i64 = 5;

    pub fn lifetime() -> TimeDelta {
        TimeDelta::seconds(Self::LIFETIME_SECS)
    }

    pub fn new(recv: Receiver<Notification>) -> Self {
        Self {
            recv,
            visible: Vec::new(),
        }
    }

    /// Take new notifications and drop the ones older than [`Self::lifetime`].
    pub fn poll(&mut self, now: DateTime<Utc>) {
        for notification in self.recv.try_iter() {
            debug!("Showing notification {notification:?}");
            self.visible.push(VisibleNotification {
                notification,
                shown_at: now,
            });
        }
        self.visible
            .retain(|n| now.signed_duration_since(n.shown_at) < Self::lifetime());
    }

    pub fn visible(&self) -> &[VisibleNotification] {
        &self.visible
    }

    pub fn dismiss(&mut self, index: usize) {
        if index < self.visible.len() {
            self.visible.remove(index);
        }
    }
}

impl State for Notifications {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}
