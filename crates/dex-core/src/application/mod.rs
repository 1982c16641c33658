//! Application layer for Dex.
//!
//! This layer contains:
//! - **Services**: use case orchestration (`ScaffoldService`, `TemplateService`)
//! - **Ports**: traits for the filesystem and template lookup
//! - **Errors**: application-specific error types
//!
//! Business rules live in `crate::domain`; this layer sequences them and
//! moves bytes through the ports.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    MaterializeReport, ScaffoldPlan, ScaffoldReport, ScaffoldRequest, ScaffoldService,
    TemplateInfo, TemplateService,
};

pub use ports::{EntryKind, Filesystem, TemplateStore, WalkEntry};

pub use error::ApplicationError;
