//! # Gatehouse - Authentication & Session Library
//!
//! This is a facade crate that re-exports all public APIs from the gatehouse components.
//! Use this crate to get access to all authentication functionality in one place.
//!
//! ## Usage
//!
//! Add to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! gatehouse = { path = "../gatehouse" }
//! ```
//!
//! ## Structure
//!
//! - **Core domain types**: `Email`, `Password`, `Role`, `User`, etc.
//! - **Ports**: `UserStore`, `Notifier`, `TokenService`
//! - **Use cases**: `SignupUseCase`, `LoginUseCase`, `AuthorizeUseCase`, etc.
//! - **Adapters**: `InMemoryUserStore`, `PostmarkNotifier`, `JwtTokenService`, etc.
//! - **Service**: `GatehouseService` - The main entry point for the HTTP service

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use gatehouse_core::*;
}

// Re-export most commonly used core types at the root level
pub use gatehouse_core::{
    Email, NewUser, OutstandingReset, Password, ResetSecret, ResetSecretHash, Role, User,
    UserError, UserId,
};

// ============================================================================
// Ports
// ============================================================================

/// Port trait definitions
pub mod ports {
    pub use gatehouse_core::{
        Notifier, NotifierError, SaveMode, TokenClaims, TokenError, TokenService, UserStore,
        UserStoreError,
    };
}

// Re-export port traits at root level
pub use gatehouse_core::{
    Notifier, NotifierError, SaveMode, TokenClaims, TokenError, TokenService, UserStore,
    UserStoreError,
};

// ============================================================================
// Use Cases (Application Layer)
// ============================================================================

/// Application use cases
pub mod use_cases {
    pub use gatehouse_application::*;
}

// Re-export use cases at root level
pub use gatehouse_application::{
    AuthorizeUseCase, ForgotPasswordUseCase, LoginUseCase, ResetPasswordUseCase, SignupUseCase,
    UpdatePasswordUseCase, restrict_to,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// Persistence implementations
    pub mod persistence {
        pub use gatehouse_adapters::persistence::*;
    }

    /// Notifier implementations
    pub mod email {
        pub use gatehouse_adapters::email::*;
    }

    /// JWT token service
    pub mod auth {
        pub use gatehouse_adapters::auth::*;
    }

    /// Configuration
    pub mod config {
        pub use gatehouse_adapters::config::*;
    }
}

// Re-export commonly used adapters at root level
pub use gatehouse_adapters::{
    InMemoryUserStore, JwtConfig, JwtTokenService, MockNotifier, PostmarkNotifier, Settings,
};

// ============================================================================
// HTTP Layer
// ============================================================================

/// Axum routes, middleware, and extractors
pub mod web {
    pub use gatehouse_axum::*;
}

pub use gatehouse_axum::{ApiError, AppState, CurrentUser, MaybeUser};

// ============================================================================
// Gatehouse Service (Main Entry Point)
// ============================================================================

/// Main HTTP service
pub use gatehouse_service::GatehouseService;

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing port traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};

pub use http;
