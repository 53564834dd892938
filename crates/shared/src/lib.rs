//! Shared types, errors, and configuration for Monedero.
//!
//! This crate provides common infrastructure used across all other crates:
//! - Application-wide error types with stable codes
//! - Configuration management
//! - JWT claims and token validation
//! - Transactional email dispatch

pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod jwt;

pub use auth::{CallerIdentity, Claims};
pub use config::AppConfig;
pub use email::{EmailConfig, EmailService};
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
