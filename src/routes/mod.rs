//! Router Module Index
//!
//! Groups the routes by the access class the gate assigns to their paths.
//! The groups carry no middleware of their own: `gate_middleware` wraps the
//! whole router and decides from the path alone.

/// Login page, login/logout API and the health check.
pub mod public;

/// Pages and API endpoints that need a valid session.
pub mod authenticated;

/// The admin panel. The gate only lets sessions with the administrator role in.
pub mod admin;
