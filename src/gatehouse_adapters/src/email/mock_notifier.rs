use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use gatehouse_core::{Notifier, NotifierError, User};

/// A delivery captured by [`MockNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Welcome {
        email: String,
        context_url: String,
    },
    PasswordReset {
        email: String,
        reset_url: String,
    },
}

/// Notifier that records deliveries instead of sending them.
///
/// `fail_deliveries(true)` makes every send fail, which is how tests drive
/// the reset flow's roll-back path.
#[derive(Default, Clone)]
pub struct MockNotifier {
    deliveries: Arc<Mutex<Vec<Delivery>>>,
    fail: Arc<AtomicBool>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_deliveries(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().expect("notifier lock").clone()
    }

    fn record(&self, delivery: Delivery) -> Result<(), NotifierError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotifierError::SendFailed(
                "mock notifier set to fail".to_string(),
            ));
        }
        self.deliveries.lock().expect("notifier lock").push(delivery);
        Ok(())
    }
}

#[async_trait::async_trait]
impl Notifier for MockNotifier {
    async fn send_welcome(&self, user: &User, context_url: &str) -> Result<(), NotifierError> {
        self.record(Delivery::Welcome {
            email: user.email().as_str().to_string(),
            context_url: context_url.to_string(),
        })
    }

    async fn send_password_reset(
        &self,
        user: &User,
        reset_url: &str,
    ) -> Result<(), NotifierError> {
        self.record(Delivery::PasswordReset {
            email: user.email().as_str().to_string(),
            reset_url: reset_url.to_string(),
        })
    }
}
