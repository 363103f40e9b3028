//! Service assembly: mounts the authentication routes, wires the gating
//! middleware, and runs the HTTP server.

pub mod tracing;

use axum::{
    Router,
    http::{HeaderValue, Method, request},
    middleware,
    routing::{get, patch, post},
};
use gatehouse_adapters::AllowedOrigins;
use gatehouse_axum::{
    AppState,
    middleware::require_auth,
    routes::{
        forgot_password, login, logout, me, reset_password, signup, update_password,
    },
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::tracing::{make_span_with_request_id, on_request, on_response};

/// The assembled authentication service.
///
/// Holds a router with every auth route mounted under `/api/v1/users`.
/// Routes that act on an established session sit behind the auth gate;
/// everything else is public by nature of what it does.
pub struct GatehouseService {
    router: Router,
}

impl GatehouseService {
    pub fn new(state: AppState) -> Self {
        let public = Router::new()
            .route("/signup", post(signup))
            .route("/login", post(login))
            .route("/logout", get(logout))
            .route("/forgot-password", post(forgot_password))
            .route("/reset-password/{secret}", patch(reset_password));

        let gated = Router::new()
            .route("/update-password", patch(update_password))
            .route("/me", get(me))
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                require_auth,
            ));

        let router = Router::new()
            .nest("/api/v1/users", public.merge(gated))
            .with_state(state);

        Self { router }
    }

    fn with_trace_layer(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(make_span_with_request_id)
                .on_request(on_request)
                .on_response(on_response),
        );
        self
    }

    /// Finalize the router, optionally restricted to a CORS allow-list.
    /// Useful for mounting the service inside a larger application.
    pub fn into_router(mut self, allowed_origins: Option<AllowedOrigins>) -> Router {
        if let Some(allowed_origins) = allowed_origins {
            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
                .allow_credentials(true)
                .allow_origin(AllowOrigin::predicate(
                    move |origin: &HeaderValue, _request_parts: &request::Parts| {
                        allowed_origins.contains(origin)
                    },
                ));

            self.router = self.router.layer(cors);
        }
        self.with_trace_layer().router
    }

    /// Run as a standalone server on an already-bound listener.
    pub async fn run(
        self,
        listener: TcpListener,
        allowed_origins: Option<AllowedOrigins>,
    ) -> Result<(), std::io::Error> {
        let router = self.into_router(allowed_origins);

        ::tracing::info!("Gatehouse listening on {}", listener.local_addr()?);

        axum::serve(listener, router).await
    }
}
