//! Kiln compilation harness.
//!
//! Compiles source units in process, runs processors over them round by
//! round, checks the result, and hands back an immutable
//! [`CompilationResult`] carrying the status, the generated units and every
//! diagnostic. Nothing touches the file system and nothing outlives the call.
//!
//! # Architecture
//!
//! ```text
//! SourceUnit[]
//!     │
//!     ▼
//! kiln_parse::parse ──► CompilationUnit per unit
//!     │
//!     ▼
//! processing rounds ──► generated units (parsed, next round's roots)
//!     │
//!     ▼
//! kiln_check::check ──► diagnostics
//!     │
//!     ▼
//! CompilationResult ──► verify_generated against golden units
//! ```
//!
//! Every call owns its own session, so independent compilations may run on
//! any thread; [`compile_batch`] runs many at once.

mod compiler;
mod golden;
mod options;
pub mod processor;
mod result;
mod session;

use std::sync::Once;

use rayon::prelude::*;

pub use compiler::Compiler;
pub use golden::{verify_generated, GoldenEntry, GoldenOutcome, GoldenReport};
pub use options::{CompileOptions, DEFAULT_MAX_ROUNDS};
pub use processor::{
    Element, ElementKind, Processor, ProcessorError, ProcessingContext, ProcessingEnv, RoundEnv,
};
pub use result::{CompilationResult, CompilationStatus, ParsedUnit, ProcessorFault};

pub use kiln_diagnostic::{Diagnostic, DiagnosticIndex, DiagnosticKind, ErrorCode};
pub use kiln_ir::SourceUnit;

/// Compile `units` with `processors` and default options.
pub fn compile(units: &[SourceUnit], processors: Vec<Box<dyn Processor>>) -> CompilationResult {
    Compiler::new().processors(processors).compile(units)
}

/// One independent compilation of a batch.
pub struct BatchCase {
    pub compiler: Compiler,
    pub units: Vec<SourceUnit>,
}

impl BatchCase {
    pub fn new(compiler: Compiler, units: Vec<SourceUnit>) -> Self {
        BatchCase { compiler, units }
    }
}

/// Compile independent cases in parallel. Results come back in case order.
#[tracing::instrument(level = "debug", skip_all, fields(cases = cases.len()))]
pub fn compile_batch(cases: Vec<BatchCase>) -> Vec<CompilationResult> {
    cases
        .into_par_iter()
        .map(|case| case.compiler.compile(&case.units))
        .collect()
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=kilnc=debug`, or
/// `RUST_LOG=kiln_check=trace` for per-declaration detail.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
