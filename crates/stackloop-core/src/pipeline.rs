//! # Pipeline
//!
//! Sample → decode → resolve → detect, against an explicit host context.

use tracing::{debug, info, instrument};

use crate::config::SampleConfig;
use crate::cycle::{detect, CycleMatch};
use crate::debugger::{DebuggerHost, HostContext};
use crate::decode::decode_addresses;
use crate::error::{Result, StackloopError};
use crate::report::render;
use crate::sampler::MemorySampler;
use crate::sequence::{build_sequence, SymbolicSequence};
use crate::symbols::SymbolResolver;
use crate::types::{Address, ProcessId, StackSample};

/// Everything one run produced
#[derive(Debug, Clone)]
pub struct Diagnosis
{
    /// The raw stack window
    pub sample: StackSample,
    /// Decoded stack words, one per pointer
    pub addresses: Vec<Address>,
    /// Stack words that resolved to functions
    pub sequence: SymbolicSequence,
    /// The recurring pattern, if any
    pub cycle: Option<CycleMatch<String>>,
    /// Symbol lookups forwarded to the host
    pub symbol_lookups: usize,
}

impl Diagnosis
{
    /// Whether a recurring pattern was found.
    pub fn is_found(&self) -> bool
    {
        self.cycle.is_some()
    }

    /// Human-readable report; see [`crate::report::render`].
    pub fn report(&self) -> String
    {
        render(self.cycle.as_ref(), &self.sequence)
    }
}

/// Run the full diagnosis against `host`
///
/// `expression` selects the start address and defaults to the stack pointer
/// register of the host's architecture. It must evaluate to a `void *`.
///
/// ## Errors
///
/// In the order they are checked:
///
/// - `InvalidArgument`: bad configuration, or the expression is not a `void *`
/// - `Expression`: the expression cannot be evaluated
/// - `MultipleOrNoTargets`: the host is not attached to exactly one process
/// - `MemoryAccess`: the stack window cannot be read
/// - `ByteAlignment`: strict alignment and a partial trailing pointer
#[instrument(level = "debug", skip(host, config))]
pub fn diagnose<H>(host: &H, expression: Option<&str>, config: &SampleConfig) -> Result<Diagnosis>
where
    H: DebuggerHost + ?Sized,
{
    config.validate()?;

    let expression = expression
        .map(str::trim)
        .filter(|expression| !expression.is_empty())
        .unwrap_or_else(|| host.architecture().default_stack_expression());

    let value = host.evaluate_expression(expression)?;
    let start = value.as_void_pointer().ok_or_else(|| {
        StackloopError::InvalidArgument(format!("not an address: `{expression}` has type `{}`", value.ty))
    })?;
    debug!(expression, %start, "Evaluated start address");

    let context = HostContext::new(&host, &host);
    sample_and_detect(context, &host.current_inferiors(), start, config)
}

/// Run the pipeline from an already-evaluated start address
///
/// ## Errors
///
/// - `MultipleOrNoTargets`, `MemoryAccess`, `ByteAlignment`
pub fn sample_and_detect(
    context: HostContext<'_>,
    inferiors: &[ProcessId],
    start: Address,
    config: &SampleConfig,
) -> Result<Diagnosis>
{
    let sampler = MemorySampler::new(inferiors, context.memory())?;
    let sample = sampler.sample(start, config.sample_length)?;

    let addresses = decode_addresses(sample.bytes(), config.layout, config.alignment)?;

    let mut resolver = SymbolResolver::new(context.symbols());
    let sequence = build_sequence(&addresses, &mut resolver);

    let cycle = detect(&sequence.identifiers()).map(|found| CycleMatch {
        start_index: found.start_index,
        pattern: found.pattern.into_iter().map(str::to_string).collect(),
    });

    match &cycle {
        Some(found) => info!(
            pid = %sampler.inferior(),
            start_index = found.start_index,
            length = found.pattern.len(),
            "Found recurring call pattern"
        ),
        None => info!(pid = %sampler.inferior(), frames = sequence.len(), "No recurring call pattern"),
    }

    Ok(Diagnosis {
        sample,
        addresses,
        sequence,
        cycle,
        symbol_lookups: resolver.lookups(),
    })
}
