use std::process;

use clap::Parser;
use stackloop_core::decode::AlignmentPolicy;
use stackloop_core::{attach_host, diagnose, Diagnosis, ProcessId, SampleConfig};
use stackloop_utils::{debug, init_logging, init_logging_with_level, LogFormat, LogLevel};

/// Find the recurring call pattern behind a stack overflow.
#[derive(Parser, Debug)]
#[command(name = "stackloop")]
#[command(version)]
#[command(
    about = "Find the recurring call pattern behind a stack overflow",
    long_about = "Attaches to a stopped or running process, samples its stack, and prints the shortest \
                  sequence of functions whose repetition makes up the stack."
)]
struct Cli
{
    /// Process ID (PID) to attach to
    pid: u32,

    /// Start address expression (default: the stack pointer, e.g. `$rsp`)
    ///
    /// Supports registers, hex/decimal literals, `+`, `-`, parentheses, and
    /// `(void *)` casts: `'$rsp + 0x40'`, `'(void *) 0x7ffc1000'`.
    address: Option<String>,

    /// Number of bytes of stack to sample
    #[arg(short, long, default_value_t = stackloop_core::config::DEFAULT_SAMPLE_LENGTH)]
    length: usize,

    /// Fail instead of truncating when the length is not a whole number of pointers
    #[arg(long, default_value_t = false)]
    strict_alignment: bool,

    /// Log level (error, warn, info, debug, trace); overrides `RUST_LOG`
    #[arg(long)]
    log_level: Option<LogLevel>,
}

fn main()
{
    let cli = Cli::parse();

    let guard = match cli.log_level {
        Some(level) => init_logging_with_level(level, log_format()),
        None => init_logging(),
    };
    let _guard = match guard {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn log_format() -> LogFormat
{
    std::env::var(stackloop_utils::logging::LOG_FORMAT_ENV)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_default()
}

fn run(cli: &Cli) -> stackloop_core::Result<()>
{
    let host = attach_host(ProcessId::from(cli.pid))?;

    let alignment = if cli.strict_alignment {
        AlignmentPolicy::Strict
    } else {
        AlignmentPolicy::Truncate
    };
    let config = SampleConfig::for_architecture(host.architecture())
        .with_sample_length(cli.length)?
        .with_alignment(alignment);

    let diagnosis = diagnose(host.as_ref(), cli.address.as_deref(), &config)?;
    debug!(
        frames = diagnosis.sequence.len(),
        words = diagnosis.addresses.len(),
        lookups = diagnosis.symbol_lookups,
        "Diagnosis complete"
    );

    let report = diagnosis.report();
    match report_stream(&diagnosis) {
        ReportStream::Stdout => println!("{}", report.trim_end()),
        ReportStream::Stderr => eprintln!("{}", report.trim_end()),
    }
    Ok(())
}

/// Where a finished diagnosis is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReportStream
{
    Stdout,
    Stderr,
}

/// Found patterns go to stdout; "not found" is a diagnostic and goes to
/// stderr. Both exit with status 0.
fn report_stream(diagnosis: &Diagnosis) -> ReportStream
{
    if diagnosis.is_found() {
        ReportStream::Stdout
    } else {
        ReportStream::Stderr
    }
}

#[cfg(test)]
mod tests
{
    use clap::CommandFactory;
    use stackloop_core::cycle::CycleMatch;
    use stackloop_core::sequence::SymbolicSequence;
    use stackloop_core::types::{Address, StackSample};

    use super::*;

    fn diagnosis(cycle: Option<CycleMatch<String>>) -> Diagnosis
    {
        Diagnosis {
            sample: StackSample::new(Address::from(0x7ffd_0000), vec![0; 8]),
            addresses: vec![Address::ZERO],
            sequence: SymbolicSequence::default(),
            cycle,
            symbol_lookups: 1,
        }
    }

    #[test]
    fn test_found_report_goes_to_stdout()
    {
        let found = CycleMatch {
            start_index: 0,
            pattern: vec!["walk".to_string()],
        };
        assert_eq!(report_stream(&diagnosis(Some(found))), ReportStream::Stdout);
    }

    #[test]
    fn test_not_found_report_goes_to_stderr()
    {
        let diagnosis = diagnosis(None);
        assert_eq!(report_stream(&diagnosis), ReportStream::Stderr);
        assert_eq!(diagnosis.report(), stackloop_core::report::NOT_FOUND_MESSAGE);
    }

    #[test]
    fn test_cli_definition()
    {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults()
    {
        let cli = Cli::try_parse_from(["stackloop", "4242"]).unwrap();
        assert_eq!(cli.pid, 4242);
        assert_eq!(cli.address, None);
        assert_eq!(cli.length, 1024);
        assert!(!cli.strict_alignment);
        assert_eq!(cli.log_level, None);
    }

    #[test]
    fn test_cli_all_arguments()
    {
        let cli = Cli::try_parse_from([
            "stackloop",
            "4242",
            "$sp + 16",
            "--length",
            "4096",
            "--strict-alignment",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.address.as_deref(), Some("$sp + 16"));
        assert_eq!(cli.length, 4096);
        assert!(cli.strict_alignment);
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
    }

    #[test]
    fn test_cli_rejects_bad_input()
    {
        assert!(Cli::try_parse_from(["stackloop"]).is_err());
        assert!(Cli::try_parse_from(["stackloop", "not-a-pid"]).is_err());
        assert!(Cli::try_parse_from(["stackloop", "1", "--log-level", "loud"]).is_err());
    }
}
