//! HTTP proxy between the form and the spreadsheet backend

pub mod http_server;

pub use http_server::{router, serve, start_server, ProxyError, ProxyState};
