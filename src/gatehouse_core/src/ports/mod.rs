pub mod notifier;
pub mod token_service;
pub mod user_store;
