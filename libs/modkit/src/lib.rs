//! # ModKit - module contracts and lifecycle
//!
//! Modules are registered explicitly with [`ModuleRegistry::builder`] and driven
//! through the phases init → REST → start → wait → stop by [`runtime::run`].
//!
//! ## Example
//!
//! ```rust,ignore
//! let registry = ModuleRegistry::builder()
//!     .module("api_ingress", ingress.clone())
//!     .rest_host("api_ingress", ingress.clone())
//!     .stateful("api_ingress", ingress)
//!     .module("users_info", users.clone())
//!     .rest("users_info", users)
//!     .build()?;
//! ```

pub use anyhow::Result;
pub use async_trait::async_trait;

pub mod api;
pub mod context;
pub mod contracts;
pub mod registry;
pub mod runtime;

pub use api::{ApiError, ApiResult, JsonPayload, JsonPayloadRejection};
pub use context::{ConfigProvider, ModuleCtx, ModuleCtxBuilder};
pub use contracts::*;
pub use registry::{ModuleRegistry, RegistryBuilder, RegistryError};
pub use runtime::{run, RunOptions, ShutdownOptions};
