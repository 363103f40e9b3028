use std::sync::Arc;

use gatehouse_adapters::{JwtTokenService, Settings};
use gatehouse_core::{Notifier, UserStore};

/// Shared state for all auth routes and middleware.
///
/// Stores and notifier are held behind `Arc<dyn ...>` so the service can be
/// assembled from any port implementations; the token service and settings
/// are immutable process-wide configuration.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub notifier: Arc<dyn Notifier>,
    pub tokens: Arc<JwtTokenService>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new<U, N>(users: U, notifier: N, settings: Settings) -> Self
    where
        U: UserStore + 'static,
        N: Notifier + 'static,
    {
        let tokens = Arc::new(JwtTokenService::new(settings.auth.jwt.clone()));
        Self {
            users: Arc::new(users),
            notifier: Arc::new(notifier),
            tokens,
            settings: Arc::new(settings),
        }
    }
}
