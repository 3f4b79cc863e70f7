//! Compilation options.

use rustc_hash::FxHashMap;

/// Default cap on processing rounds that see new roots.
pub const DEFAULT_MAX_ROUNDS: u32 = 16;

/// Options of one compilation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileOptions {
    /// Rounds with new roots allowed before processing is aborted.
    pub max_rounds: u32,
    /// Turn warnings into a failed compilation (`-Werror`).
    pub warnings_as_errors: bool,
    /// Run the semantic checker after processing.
    pub run_checker: bool,
    /// Processor options, `-Akey=value`.
    pub processor_options: FxHashMap<String, String>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            max_rounds: DEFAULT_MAX_ROUNDS,
            warnings_as_errors: false,
            run_checker: true,
            processor_options: FxHashMap::default(),
        }
    }
}

impl CompileOptions {
    /// Parse a processor option of the form `key=value` or `key`.
    ///
    /// A bare key maps to the empty string. A leading `-A` is accepted.
    pub fn with_option_arg(mut self, arg: &str) -> Self {
        let arg = arg.strip_prefix("-A").unwrap_or(arg);
        let (key, value) = arg.split_once('=').unwrap_or((arg, ""));
        self.processor_options
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn option(&self, key: &str) -> Option<&str> {
        self.processor_options.get(key).map(String::as_str)
    }
}
