//! # oxide-formsite
//!
//! HTTP service around `oxide-forms`: a JSON API for building, publishing
//! and exporting forms, plus public HTML pages where respondents fill them
//! in.
//!
//! This crate provides:
//! - An in-memory store implementing the form and submission services
//! - A route table with `{param}` path patterns
//! - Handlers for the JSON API and the public form pages
//! - A hyper HTTP/1 server loop
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use oxide_formsite::{serve, App, SiteConfig};
//! use tokio::net::TcpListener;
//!
//! let config = SiteConfig::default();
//! let listener = TcpListener::bind(config.addr).await?;
//! serve(listener, Arc::new(App::new(config)?)).await?;
//! ```
//!
//! ## Driving handlers directly
//!
//! Handlers take plain [`Request`] values, so they can be exercised without
//! a socket:
//!
//! ```ignore
//! let app = App::new(SiteConfig::default())?;
//! let res = app.handle(Request::get("/api/health")).await;
//! assert_eq!(res.status, 200);
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod http;
pub mod routes;
pub mod server;
pub mod store;
pub mod templates;

pub use config::SiteConfig;
pub use error::{Result, SiteError};
pub use handlers::App;
pub use http::{FilePart, FormData, Method, PathParams, Request, Response};
pub use routes::{Endpoint, PathPattern, Router};
pub use server::serve;
pub use store::MemoryStore;
