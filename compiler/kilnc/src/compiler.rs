//! Configurable entry point for compilations.

use kiln_ir::SourceUnit;

use crate::options::CompileOptions;
use crate::processor::Processor;
use crate::result::CompilationResult;
use crate::session::Session;

/// Collects processors and options, then compiles.
///
/// ```ignore
/// let result = Compiler::new()
///     .processor(BuilderProcessor::default())
///     .option("builder.suffix", "Builder")
///     .warnings_as_errors(true)
///     .compile(&[SourceUnit::for_type("p.Point", text)]);
/// ```
#[derive(Default)]
pub struct Compiler {
    processors: Vec<Box<dyn Processor>>,
    options: CompileOptions,
}

impl Compiler {
    pub fn new() -> Self {
        Compiler::default()
    }

    /// Register a processor. Processors run in registration order.
    #[must_use]
    pub fn processor(mut self, processor: impl Processor + 'static) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    #[must_use]
    pub fn processors(mut self, processors: impl IntoIterator<Item = Box<dyn Processor>>) -> Self {
        self.processors.extend(processors);
        self
    }

    /// Replace every option at once.
    #[must_use]
    pub fn options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn max_rounds(mut self, max_rounds: u32) -> Self {
        self.options.max_rounds = max_rounds;
        self
    }

    #[must_use]
    pub fn warnings_as_errors(mut self, enabled: bool) -> Self {
        self.options.warnings_as_errors = enabled;
        self
    }

    /// Skip the semantic checker; only parse errors and processor output
    /// are reported.
    #[must_use]
    pub fn without_checker(mut self) -> Self {
        self.options.run_checker = false;
        self
    }

    /// Set processor option `key`.
    #[must_use]
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.processor_options.insert(key.into(), value.into());
        self
    }

    /// Set a processor option from `-Akey=value` form.
    #[must_use]
    pub fn option_arg(mut self, arg: &str) -> Self {
        self.options = self.options.with_option_arg(arg);
        self
    }

    pub fn compile_options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compile `units` in a fresh session. Consumes the compiler, since
    /// processors carry state across rounds.
    pub fn compile(self, units: &[SourceUnit]) -> CompilationResult {
        Session::new(units, self.processors, self.options).run()
    }
}
