//! HTTP request handlers.

pub mod entity;
pub mod health;
