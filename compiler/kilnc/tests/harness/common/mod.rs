//! Processors and helpers shared by the harness tests.

use std::sync::{Arc, Mutex};

use kiln_ir::{Member, ModifierSet};
use kilnc::processor::ALL_ANNOTATIONS;
use kilnc::{
    CompilationResult, DiagnosticKind, ElementKind, Processor, ProcessorError, ProcessingContext,
    ProcessingEnv, RoundEnv, SourceUnit,
};

/// `package p; ... class Point` with a `@Builder`.
pub const POINT: &str = "\
package p;

@Builder
public class Point {
    private int x;
    private String label;

    public Point() {}
}
";

/// What [`BuilderProcessor`] generates for [`POINT`], formatted differently.
pub const POINT_BUILDER_GOLDEN: &str = "\
package p;

// golden copy, hand formatted
public final class PointBuilder
{
    private int x;
    private String label;

    public PointBuilder x(int x) { this.x = x; return this; }

    public PointBuilder label(String label) { this.label = label; return this; }

    public Point build() { return new Point(); }
}
";

pub fn unit(qualified_type: &str, text: &str) -> SourceUnit {
    SourceUnit::for_type(qualified_type, text)
}

pub fn boxed(processor: impl Processor + 'static) -> Vec<Box<dyn Processor>> {
    vec![Box::new(processor)]
}

/// Assert success, printing the whole result otherwise.
#[track_caller]
pub fn assert_success(result: &CompilationResult) {
    assert!(result.is_success(), "{result}");
}

/// Generates `<Type><suffix>` with a setter per field for every class
/// annotated `@Builder`. The suffix comes from option `builder.suffix`.
pub struct BuilderProcessor {
    suffix: String,
}

impl Default for BuilderProcessor {
    fn default() -> Self {
        BuilderProcessor {
            suffix: "Builder".to_string(),
        }
    }
}

impl Processor for BuilderProcessor {
    fn name(&self) -> &str {
        "builder"
    }

    fn supported_annotations(&self) -> Vec<String> {
        vec!["Builder".to_string()]
    }

    fn init(&mut self, env: &ProcessingEnv<'_>) -> Result<(), ProcessorError> {
        if let Some(suffix) = env.option("builder.suffix") {
            self.suffix = suffix.to_string();
        }
        Ok(())
    }

    fn process(
        &mut self,
        round: &RoundEnv<'_>,
        ctx: &mut ProcessingContext<'_>,
    ) -> Result<(), ProcessorError> {
        for element in round.elements_annotated_with("Builder") {
            let Some(decl) = element.type_decl() else {
                ctx.messager()
                    .error_at("@Builder applies to classes only", &element);
                continue;
            };
            let fields: Vec<(String, String)> = decl
                .members
                .iter()
                .filter_map(|m| match m {
                    Member::Field(f) if !f.modifiers.contains(ModifierSet::STATIC) => Some(f),
                    _ => None,
                })
                .flat_map(|f| f.declarators.iter().map(|d| (f.ty.to_string(), d.name.clone())))
                .collect();
            if fields.is_empty() {
                ctx.messager()
                    .warning_at(format!("{} has no fields to build", decl.name), &element);
            }

            let owner = element.qualified_name();
            let (package, ty) = owner.rsplit_once('.').unwrap_or(("", owner.as_str()));
            let builder = format!("{ty}{}", self.suffix);
            let mut text = String::new();
            if !package.is_empty() {
                text.push_str(&format!("package {package};\n\n"));
            }
            text.push_str(&format!("public final class {builder} {{\n"));
            for (field_ty, name) in &fields {
                text.push_str(&format!("    private {field_ty} {name};\n"));
            }
            for (field_ty, name) in &fields {
                text.push_str(&format!(
                    "\n    public {builder} {name}({field_ty} {name}) {{\n        this.{name} = {name};\n        return this;\n    }}\n"
                ));
            }
            text.push_str(&format!("\n    public {ty} build() {{\n        return new {ty}();\n    }}\n}}\n"));

            let qualified = if package.is_empty() {
                builder
            } else {
                format!("{package}.{builder}")
            };
            ctx.generate_source(&qualified, text)?;
        }
        Ok(())
    }
}

/// Reports an error at every non-final field of an `@Immutable` class.
pub struct ImmutableProcessor;

impl Processor for ImmutableProcessor {
    fn name(&self) -> &str {
        "immutable"
    }

    fn supported_annotations(&self) -> Vec<String> {
        vec!["com.example.Immutable".to_string()]
    }

    fn process(
        &mut self,
        round: &RoundEnv<'_>,
        ctx: &mut ProcessingContext<'_>,
    ) -> Result<(), ProcessorError> {
        for ty in round.elements_annotated_with("com.example.Immutable") {
            for field in round.elements() {
                if field.kind() == ElementKind::Field
                    && field.owner() == ty.qualified_name()
                    && !field.modifiers().contains(ModifierSet::FINAL)
                {
                    ctx.messager().error_at(
                        format!("field {} of {} must be final", field.simple_name(), ty.simple_name()),
                        &field,
                    );
                }
            }
        }
        Ok(())
    }
}

/// One observed invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundRecord {
    pub round: u32,
    pub processing_over: bool,
    pub error_raised: bool,
    pub roots: Vec<String>,
}

pub type RoundLog = Arc<Mutex<Vec<RoundRecord>>>;

/// Records every round it is invoked in.
pub struct RecordingProcessor {
    supported: Vec<String>,
    log: RoundLog,
}

impl RecordingProcessor {
    pub fn new(supported: &[&str]) -> (Self, RoundLog) {
        let log = RoundLog::default();
        let processor = RecordingProcessor {
            supported: supported.iter().map(ToString::to_string).collect(),
            log: Arc::clone(&log),
        };
        (processor, log)
    }
}

impl Processor for RecordingProcessor {
    fn name(&self) -> &str {
        "recorder"
    }

    fn supported_annotations(&self) -> Vec<String> {
        self.supported.clone()
    }

    fn process(
        &mut self,
        round: &RoundEnv<'_>,
        _ctx: &mut ProcessingContext<'_>,
    ) -> Result<(), ProcessorError> {
        let record = RoundRecord {
            round: round.round_number(),
            processing_over: round.processing_over(),
            error_raised: round.error_raised(),
            roots: round.roots().iter().map(|r| r.source.name().to_string()).collect(),
        };
        self.log
            .lock()
            .map_err(|_| ProcessorError::new("round log poisoned"))?
            .push(record);
        Ok(())
    }
}

/// Generates `gen.Step<n>` in round `n`, for `steps` rounds.
pub struct ChainProcessor {
    pub steps: u32,
}

impl Processor for ChainProcessor {
    fn name(&self) -> &str {
        "chain"
    }

    fn supported_annotations(&self) -> Vec<String> {
        vec![ALL_ANNOTATIONS.to_string()]
    }

    fn process(
        &mut self,
        round: &RoundEnv<'_>,
        ctx: &mut ProcessingContext<'_>,
    ) -> Result<(), ProcessorError> {
        let n = round.round_number();
        if !round.processing_over() && n <= self.steps {
            ctx.generate_source(&format!("gen.Step{n}"), format!("package gen;\nclass Step{n} {{}}\n"))?;
        }
        Ok(())
    }
}

/// Tries to generate in the final round and propagates the refusal.
pub struct LateProcessor;

impl Processor for LateProcessor {
    fn name(&self) -> &str {
        "late"
    }

    fn supported_annotations(&self) -> Vec<String> {
        vec![ALL_ANNOTATIONS.to_string()]
    }

    fn process(
        &mut self,
        round: &RoundEnv<'_>,
        ctx: &mut ProcessingContext<'_>,
    ) -> Result<(), ProcessorError> {
        if round.processing_over() {
            ctx.generate_source("gen.Late", "package gen; class Late {}")?;
        }
        Ok(())
    }
}

/// Generates the same unit twice and reports the refusal as an error.
pub struct DuplicatingProcessor;

impl Processor for DuplicatingProcessor {
    fn name(&self) -> &str {
        "duplicating"
    }

    fn supported_annotations(&self) -> Vec<String> {
        vec![ALL_ANNOTATIONS.to_string()]
    }

    fn process(
        &mut self,
        round: &RoundEnv<'_>,
        ctx: &mut ProcessingContext<'_>,
    ) -> Result<(), ProcessorError> {
        if round.round_number() != 1 {
            return Ok(());
        }
        for _ in 0..2 {
            if let Err(err) = ctx.generate_source("gen.Dup", "package gen; class Dup {}") {
                ctx.messager().print_message(DiagnosticKind::Error, err.to_string());
            }
        }
        Ok(())
    }
}

/// Panics in round 1.
pub struct PanickingProcessor;

impl Processor for PanickingProcessor {
    fn name(&self) -> &str {
        "panicking"
    }

    fn supported_annotations(&self) -> Vec<String> {
        vec![ALL_ANNOTATIONS.to_string()]
    }

    fn process(
        &mut self,
        _round: &RoundEnv<'_>,
        _ctx: &mut ProcessingContext<'_>,
    ) -> Result<(), ProcessorError> {
        panic!("boom: processor state corrupted")
    }
}

/// Returns an error from `init` or `process`.
pub struct FailingProcessor {
    pub in_init: bool,
}

impl Processor for FailingProcessor {
    fn name(&self) -> &str {
        "failing"
    }

    fn supported_annotations(&self) -> Vec<String> {
        vec![ALL_ANNOTATIONS.to_string()]
    }

    fn init(&mut self, _env: &ProcessingEnv<'_>) -> Result<(), ProcessorError> {
        if self.in_init {
            return Err(ProcessorError::new("cannot start"));
        }
        Ok(())
    }

    fn process(
        &mut self,
        _round: &RoundEnv<'_>,
        _ctx: &mut ProcessingContext<'_>,
    ) -> Result<(), ProcessorError> {
        Err(ProcessorError::new("unsupported input"))
    }
}

/// Generates one fixed unit in round 1.
pub struct FixedProcessor {
    pub qualified_type: &'static str,
    pub text: &'static str,
}

impl Processor for FixedProcessor {
    fn name(&self) -> &str {
        "fixed"
    }

    fn supported_annotations(&self) -> Vec<String> {
        vec![ALL_ANNOTATIONS.to_string()]
    }

    fn process(
        &mut self,
        round: &RoundEnv<'_>,
        ctx: &mut ProcessingContext<'_>,
    ) -> Result<(), ProcessorError> {
        if round.round_number() == 1 {
            ctx.generate_source(self.qualified_type, self.text)?;
        }
        Ok(())
    }
}

/// Panics while being registered: in `name` or in `supported_annotations`.
pub struct UnregistrableProcessor {
    pub in_name: bool,
}

impl Processor for UnregistrableProcessor {
    fn name(&self) -> &str {
        if self.in_name {
            panic!("name lookup failed");
        }
        "unregistrable"
    }

    fn supported_annotations(&self) -> Vec<String> {
        panic!("supported types lookup failed")
    }

    fn process(
        &mut self,
        _round: &RoundEnv<'_>,
        _ctx: &mut ProcessingContext<'_>,
    ) -> Result<(), ProcessorError> {
        Ok(())
    }
}
