//! Dex Core - hexagonal architecture implementation.
//!
//! Domain and application layers for the Dex project scaffolder.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              dex-cli (CLI)              │
//! │   prompts, config, installer, output    │
//! └──────────────────┬──────────────────────┘
//!                    │ builds ScaffoldRequest
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │          Application Services           │
//! │    (ScaffoldService, TemplateService)   │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Ports (Filesystem, TemplateStore)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        dex-adapters (std::fs, disk)     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dex_core::prelude::*;
//! # fn run(store: Box<dyn TemplateStore>, fs: Box<dyn Filesystem>) -> DexResult<()> {
//! let spec = ProjectSpec::builder()
//!     .name(ProjectName::parse("my-api")?)
//!     .language(Language::TypeScript)
//!     .database(true)
//!     .build();
//!
//! let service = ScaffoldService::new(store, fs);
//! let report = service.scaffold(&ScaffoldRequest::new(spec, "."))?;
//! println!("created {}", report.project_dir.display());
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod domain;
pub mod error;

pub mod prelude {
    pub use crate::application::{
        ScaffoldReport, ScaffoldRequest, ScaffoldService, TemplateInfo, TemplateService,
        ports::{Filesystem, TemplateStore},
    };
    pub use crate::domain::{Language, PackageManager, ProjectName, ProjectSpec, TemplateRoot};
    pub use crate::error::{DexError, DexResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
