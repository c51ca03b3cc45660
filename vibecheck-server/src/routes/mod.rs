//! HTTP route handlers, one module per resource

pub mod admin;
pub mod analytics;
pub mod health;
pub mod leaderboard;
pub mod questions;
pub mod responses;
