//! Identity boundary: bearer tokens issued by the external identity provider.
//!
//! Login and sign-up are handled elsewhere; this service only checks tokens.

pub mod jwt;
pub mod middleware;
pub mod model;

#[cfg(test)]
mod tests;

pub use jwt::*;
pub use middleware::*;
pub use model::*;
