//! Router Module Index
//!
//! Splits the routing table by access level. Authentication is applied as a layer on the
//! whole `authenticated` router, so a route cannot be exposed without it by accident.

/// Routes reachable without a token: health check, registration and login.
pub mod public;

/// Routes behind the bearer-token gate. Every handler receives a resolved `AuthUser`.
pub mod authenticated;
