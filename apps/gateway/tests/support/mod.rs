#![allow(dead_code, unused_imports)]

pub mod app_builder;
pub mod auth;
pub mod fake_service;

pub use app_builder::{create_test_app, test_state};
pub use fake_service::{closed_port_url, Canned, FakeService};
