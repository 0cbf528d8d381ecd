//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Declaration (at application setup):
//!     pattern string
//!     → path.rs (normalize, root prefix)
//!     → pattern.rs (tokenize → compiled matcher + parameter list)
//!     → table.rs (insert or augment Route)
//!
//! Navigation:
//!     path
//!     → table.rs (exact key hit, then ordered scan)
//!     → pattern.rs (all-or-nothing match)
//!     → Return: (Route, Request) or no match
//! ```
//!
//! # Design Decisions
//! - Malformed patterns fail at declare time, never at dispatch time
//! - Deterministic: same input always matches same route
//! - First match wins (ordered by declaration)

pub mod path;
pub mod pattern;
pub mod request;
pub mod table;

pub use pattern::CompiledPattern;
pub use request::Request;
pub use table::{ContextEntry, Route, RouteTable};
