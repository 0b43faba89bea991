use std::fs;
use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use glob::glob;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use vmcparser_core::transport::{
    BUF_SIZE_MAX_MTU, DEFAULT_PORT, ReceiverConfig, TransportError, UdpReceiver,
};
use vmcparser_core::vmc::{AddressFilter, VmcMessage};

const LONG_VERSION: &str = env!("VMCPARSER_LONG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "vmcparser")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decoder for Virtual Motion Capture (VMC) traffic over OSC.",
    long_about = None,
    after_help = "Examples:\n  vmcparser listen --bind 0.0.0.0:39539 --filter /VMC/Ext/Bone/Pos\n  vmcparser pcap analyse capture.pcapng -o report.json\n  vmcparser pcap analyse capture.pcap --stdout --pretty"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Receive VMC messages over UDP and print them as JSON lines.
    Listen {
        /// Local address to bind
        #[arg(long, default_value_t = default_bind())]
        bind: String,

        /// Receive buffer size in bytes
        #[arg(long, default_value_t = BUF_SIZE_MAX_MTU)]
        buffer_size: usize,

        /// Read timeout in milliseconds
        #[arg(long, default_value_t = 1000)]
        timeout_ms: u64,

        /// Only decode these addresses (repeatable)
        #[arg(long = "filter", value_name = "ADDRESS")]
        filters: Vec<String>,

        /// Stop after this many messages
        #[arg(long)]
        count: Option<usize>,

        /// Pretty-print each message
        #[arg(long)]
        pretty: bool,
    },
    /// Operations on PCAP/PCAPNG inputs.
    Pcap {
        #[command(subcommand)]
        command: PcapCommands,
    },
}

#[derive(Subcommand, Debug)]
enum PcapCommands {
    /// Replay a capture through the VMC decoder and write a JSON report.
    #[command(alias = "analyze")]
    #[command(
        after_help = "Examples:\n  vmcparser pcap analyse capture.pcapng -o report.json\n  vmcparser pcap analyze capture.pcap --stdout --filter /VMC/Ext/Root/Pos"
    )]
    Analyse {
        /// Path to a .pcap or .pcapng file
        input: PathBuf,

        /// Output report path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        report: Option<PathBuf>,

        /// Write JSON report to stdout
        #[arg(long, conflicts_with = "report")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,

        /// Exit with a non-zero code if decode errors are present
        #[arg(long)]
        strict: bool,

        /// List decode errors after analysis
        #[arg(long)]
        list_errors: bool,

        /// Only decode these addresses (repeatable)
        #[arg(long = "filter", value_name = "ADDRESS")]
        filters: Vec<String>,
    },
}

#[derive(Debug)]
struct AnalyseArgs {
    input: PathBuf,
    report: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    compact: bool,
    quiet: bool,
    strict: bool,
    list_errors: bool,
    filter: AddressFilter,
}

/// One line of `listen` output: the sender plus the flattened record.
#[derive(Serialize)]
struct ReceivedMessage<'m, 'a> {
    peer: SocketAddr,
    #[serde(flatten)]
    message: &'m VmcMessage<'a>,
}

fn default_bind() -> String {
    format!("0.0.0.0:{DEFAULT_PORT}")
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Listen {
            bind,
            buffer_size,
            timeout_ms,
            filters,
            count,
            pretty,
        } => cmd_listen(&bind, buffer_size, timeout_ms, filters, count, pretty),
        Commands::Pcap { command } => match command {
            PcapCommands::Analyse {
                input,
                report,
                stdout,
                pretty,
                compact,
                quiet,
                strict,
                list_errors,
                filters,
            } => cmd_pcap_analyse(AnalyseArgs {
                input,
                report,
                stdout,
                pretty,
                compact,
                quiet,
                strict,
                list_errors,
                filter: AddressFilter::new(filters),
            }),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

/// `RUST_LOG` wins; otherwise the level follows the `-v` count.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

fn cmd_listen(
    bind: &str,
    buffer_size: usize,
    timeout_ms: u64,
    filters: Vec<String>,
    count: Option<usize>,
    pretty: bool,
) -> Result<(), CliError> {
    if timeout_ms == 0 {
        return Err(CliError::new(
            "timeout must be greater than zero",
            Some("pass --timeout-ms with a positive value".to_string()),
        ));
    }
    let config = ReceiverConfig::default()
        .with_buffer_size(buffer_size)
        .with_read_timeout(Some(Duration::from_millis(timeout_ms)));
    let mut receiver = UdpReceiver::bind(bind, config).map_err(|err| {
        CliError::new(
            format!("cannot listen on {bind}: {err}"),
            Some("check the address and that the port is free".to_string()),
        )
    })?;
    let filter = AddressFilter::new(filters);
    let local = receiver
        .local_addr()
        .map_err(|err| CliError::new(err.to_string(), None))?;
    info!(%local, filtered = !filter.is_empty(), "listening for VMC messages");

    let stdout = io::stdout();
    let mut seen = 0usize;
    while count.is_none_or(|limit| seen < limit) {
        let mut out = stdout.lock();
        let outcome = receiver.recv(&filter, |peer, _raw, message| {
            if count.is_some_and(|limit| seen >= limit) {
                return Ok(());
            }
            let line = ReceivedMessage { peer, message };
            let line = if pretty {
                serde_json::to_string_pretty(&line)
            } else {
                serde_json::to_string(&line)
            }
            .map_err(io::Error::other)?;
            debug!(%peer, kind = message.kind(), "message decoded");
            seen += 1;
            writeln!(out, "{line}")
        });
        match outcome {
            Ok(_) => out.flush().context("Failed to write to stdout")?,
            Err(err) if err.is_timeout() => continue,
            Err(TransportError::Handler(err)) => {
                return Err(CliError::new(format!("failed to write message: {err}"), None));
            }
            Err(err) => {
                // Malformed datagrams are reported and the loop carries on.
                eprintln!("warning: {err}");
            }
        }
    }
    Ok(())
}

fn cmd_pcap_analyse(args: AnalyseArgs) -> Result<(), CliError> {
    let AnalyseArgs {
        input,
        report,
        stdout,
        pretty,
        compact,
        quiet,
        strict,
        list_errors,
        filter,
    } = args;

    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;
    let input_abs = fs::canonicalize(&resolved_input)
        .with_context(|| format!("Failed to resolve input path: {}", resolved_input.display()))?;
    let report = if stdout {
        None
    } else {
        Some(report.ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?)
    };

    if let Some(report_path) = report.as_ref() {
        let report_abs = report_path
            .parent()
            .map(|parent| {
                if parent.as_os_str().is_empty() {
                    fs::canonicalize(".")
                } else {
                    fs::canonicalize(parent)
                }
            })
            .transpose()
            .with_context(|| format!("Failed to resolve output path: {}", report_path.display()))?;
        if let Some(report_dir) = report_abs {
            let report_target = report_dir.join(
                report_path
                    .file_name()
                    .ok_or_else(|| anyhow::anyhow!("Invalid report path"))?,
            );
            if report_target == input_abs {
                return Err(CliError::new(
                    format!(
                        "report path must differ from input: {}",
                        report_path.display()
                    ),
                    Some("choose a different output path".to_string()),
                ));
            }
        }
    }

    let meta = fs::metadata(&resolved_input)
        .with_context(|| format!("Failed to read input file: {}", resolved_input.display()))?;
    if !meta.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }

    info!(input = %resolved_input.display(), "analysing capture");
    let rep = vmcparser_core::analyze_pcap_file(&resolved_input, &filter)
        .context("PCAP/PCAPNG analysis failed")?;
    let json = serialize_report(&rep, pretty, compact)?;

    match report {
        None => print!("{}", json),
        Some(report) => {
            if let Some(parent) = report.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create output directory: {}", parent.display())
                    })?;
                }
            }
            fs::write(&report, json)
                .with_context(|| format!("Failed to write report: {}", report.display()))?;
            if !quiet {
                eprintln!("OK: report written -> {}", report.display());
            }
        }
    }

    if list_errors && !quiet {
        print_errors(&rep);
    }
    if strict && !rep.errors.is_empty() {
        return Err(CliError::new(
            "decode errors detected",
            Some("use --list-errors to inspect".to_string()),
        ));
    }
    Ok(())
}

fn serialize_report(
    rep: &vmcparser_core::Report,
    pretty: bool,
    compact: bool,
) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn print_errors(rep: &vmcparser_core::Report) {
    if rep.errors.is_empty() {
        eprintln!("Decode errors: none");
        return;
    }
    eprintln!("Decode errors:");
    for entry in &rep.errors {
        eprintln!("  {} ({})", entry.id, entry.count);
    }
}

fn validate_input_file(input: &PathBuf) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "pcap" && ext != "pcapng" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .pcap or .pcapng file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &PathBuf) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.clone());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    match matches.len() {
        0 => Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected .pcap or .pcapng".to_string()),
        )),
        1 => Ok(matches.remove(0)),
        total => {
            let mut message = format!("multiple files match pattern '{pattern}' ({total} matches)");
            let listed = matches
                .iter()
                .take(3)
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            message.push_str("; matches: ");
            message.push_str(&listed);
            if total > 3 {
                message.push_str(", ...");
            }
            Err(CliError::new(
                message,
                Some("pass a single capture file, or run once per file".to_string()),
            ))
        }
    }
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
