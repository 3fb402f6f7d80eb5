//! Interface layer - external APIs

pub mod http;
