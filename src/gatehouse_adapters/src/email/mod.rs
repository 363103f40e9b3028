pub mod mock_notifier;
pub mod postmark_notifier;

pub use mock_notifier::{Delivery, MockNotifier};
pub use postmark_notifier::PostmarkNotifier;
