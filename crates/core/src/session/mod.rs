//! Session lifecycle: token grants and the guard that drives them

pub mod guard;
pub mod token_service;

pub use guard::SessionGuard;
pub use token_service::TokenService;
