//! Diagnostics for Kiln compilations.
//!
//! - [`Diagnostic`]: an immutable, located record with a kind and message
//! - [`ErrorCode`]: searchable codes for toolchain diagnostics
//! - [`DiagnosticIndex`]: the captured sequence of one compilation, with
//!   lookups by kind, unit, position and message text
//! - [`span_utils`]: byte offset to line/column conversion
//!
//! Lines and columns are 1-based. Columns count characters, not bytes.

mod diagnostic;
mod error_code;
mod index;
pub mod span_utils;

pub use diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSource, UnitLocator};
pub use error_code::ErrorCode;
pub use index::{DiagnosticIndex, DiagnosticQuery};
