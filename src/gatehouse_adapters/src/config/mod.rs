pub mod settings;

pub use settings::{AllowedOrigins, AppSettings, AuthSettings, EmailSettings, Settings};
