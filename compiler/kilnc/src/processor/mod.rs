//! The processor extension API.
//!
//! A [`Processor`] is a pass that runs during compilation, between parsing
//! and checking. It declares the annotations it handles, is initialized once
//! per compilation, and is then invoked round by round with the units that
//! round introduced. Through its [`ProcessingContext`] it may generate new
//! units, which become the roots of the next round, and report diagnostics.
//!
//! Returning an error (or panicking) from a processor is a fault: the
//! compilation stops and the result carries the fault instead of
//! diagnostics about it.

mod context;
mod round;

pub use context::{Filer, FilerError, Messager, ProcessingContext};
pub use round::{Element, ElementKind, RoundEnv, RootUnit};

use rustc_hash::FxHashMap;

/// Annotation name that claims every round.
pub const ALL_ANNOTATIONS: &str = "*";

/// An error a processor reports to abort processing.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProcessorError {
    #[error("{0}")]
    Failed(String),
    #[error(transparent)]
    Filer(#[from] FilerError),
}

impl ProcessorError {
    #[cold]
    pub fn new(message: impl Into<String>) -> Self {
        ProcessorError::Failed(message.into())
    }
}

/// What a processor sees at initialization.
#[derive(Copy, Clone, Debug)]
pub struct ProcessingEnv<'a> {
    options: &'a FxHashMap<String, String>,
    max_rounds: u32,
}

impl<'a> ProcessingEnv<'a> {
    pub(crate) fn new(options: &'a FxHashMap<String, String>, max_rounds: u32) -> Self {
        ProcessingEnv {
            options,
            max_rounds,
        }
    }

    /// Value of processor option `key`.
    pub fn option(&self, key: &str) -> Option<&'a str> {
        self.options.get(key).map(String::as_str)
    }

    pub fn options(&self) -> &'a FxHashMap<String, String> {
        self.options
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }
}

/// A compiler extension pass.
pub trait Processor: Send {
    /// Name used in diagnostics and faults.
    fn name(&self) -> &str;

    /// Annotations this processor handles, by simple or qualified name.
    /// [`ALL_ANNOTATIONS`] claims every round.
    fn supported_annotations(&self) -> Vec<String>;

    /// Called once before the first round.
    fn init(&mut self, env: &ProcessingEnv<'_>) -> Result<(), ProcessorError> {
        let _ = env;
        Ok(())
    }

    /// Process one round.
    fn process(
        &mut self,
        round: &RoundEnv<'_>,
        ctx: &mut ProcessingContext<'_>,
    ) -> Result<(), ProcessorError>;
}
