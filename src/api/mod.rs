//! HTTP surface: HTML pages, static assets and the JSON API.

pub mod error;
pub mod handlers;
pub mod server;

pub use server::{build_router, serve};
