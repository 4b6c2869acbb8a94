//! Tenant notifications. Delivery is fire-and-forget: a notifier never
//! reports failure back to the handler that triggered it.

use std::sync::{Arc, Mutex};

use tracing::info;

use crate::store::{Id, Tenant};

/// Delivers a text message to a tenant
pub trait Notifier: Send + Sync {
    fn notify(&self, tenant: &Tenant, text: &str);
}

/// Emits every notification as a log event
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, tenant: &Tenant, text: &str) {
        info!(tenant_id = tenant.id, "Dear {},\n{}", tenant.name, text);
    }
}

/// A delivered message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub tenant_id: Id,
    pub text: String,
}

/// Keeps every message in memory. Clones share the same inbox.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    inbox: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far, oldest first.
    pub fn received(&self) -> Vec<Notification> {
        match self.inbox.lock() {
            Ok(inbox) => inbox.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, tenant: &Tenant, text: &str) {
        let message = Notification {
            tenant_id: tenant.id,
            text: text.to_string(),
        };
        match self.inbox.lock() {
            Ok(mut inbox) => inbox.push(message),
            Err(poisoned) => poisoned.into_inner().push(message),
        }
    }
}
