//! Shopper-facing notifications.

use std::sync::{Arc, Mutex};

use tracing::warn;

use crate::error::CartError;
use crate::ids::ProductId;

/// A non-blocking message for the shopper, raised when an operation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Product the failed operation targeted.
    pub product_id: Option<ProductId>,
    /// Message to show.
    pub message: String,
}

impl From<&CartError> for Notice {
    fn from(err: &CartError) -> Self {
        Self {
            product_id: err.product_id(),
            message: err.user_message().to_string(),
        }
    }
}

/// Delivers notices to the shopper. Must not block.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, notice: &Notice) {
        (**self).notify(notice)
    }
}

/// Emits notices as `tracing` warnings.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: &Notice) {
        match notice.product_id {
            Some(id) => warn!(product_id = %id, "{}", notice.message),
            None => warn!("{}", notice.message),
        }
    }
}

/// Collects notices in memory for later rendering.
#[derive(Debug, Default)]
pub struct NoticeLog {
    notices: Mutex<Vec<Notice>>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return every collected notice.
    pub fn take(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|mut n| std::mem::take(&mut *n))
            .unwrap_or_default()
    }

    /// Number of collected notices.
    pub fn len(&self) -> usize {
        self.notices.lock().map(|n| n.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for NoticeLog {
    fn notify(&self, notice: &Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_log_take_drains() {
        let log = NoticeLog::new();
        let err = CartError::remove_failed(ProductId::new(3), "not in cart");
        log.notify(&Notice::from(&err));

        assert_eq!(log.len(), 1);
        let notices = log.take();
        assert_eq!(notices[0].message, "Failed to remove product");
        assert_eq!(notices[0].product_id, Some(ProductId::new(3)));
        assert!(log.is_empty());
    }
}
