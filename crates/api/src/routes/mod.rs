pub mod attendance;
pub mod auth;
pub mod children;
pub mod entries;
pub mod export;
pub mod health;
