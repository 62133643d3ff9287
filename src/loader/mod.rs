//! Module and page data loading.
//!
//! # Data Flow
//! ```text
//! RouteModule
//!     → importer.rs (cache lookup by url+hash, single-flight)
//!     → source.rs ModuleSource::load (registry, network, ...)
//!     → Arc<ModuleExports>
//!
//! RouterUrl (module declares asyncDeps.data)
//!     → data.rs (cache lookup by data key, single-flight)
//!     → source.rs DataSource::fetch
//!     → shared data cache, read at render time
//! ```

pub mod data;
pub mod importer;
pub mod source;

pub use data::PageDataLoader;
pub use importer::ModuleImporter;
pub use source::{
    DataError, DataSource, FsDataSource, ImportError, MemoryDataSource, ModuleRegistry, ModuleSource,
};
