//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or DispatcherConfig built in code
//!     → loader.rs (parse & deserialize, unknown keys rejected)
//!     → validation.rs (semantic checks)
//!     → RouterConfig (validated)
//!     → Dispatcher::configure swaps the active DispatcherConfig
//! ```
//!
//! # Design Decisions
//! - Exactly three dispatcher options; anything else is a parse error
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::DispatcherConfig;
pub use schema::ObservabilityConfig;
pub use schema::RouterConfig;
