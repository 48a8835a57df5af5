//! dsir CLI: elaborates HDL AST documents into DynStruct IR.
//!
//! `dsir elaborate` prints the elaborated modules as text or JSON, and
//! `dsir check` elaborates and verifies them, printing only diagnostics.

#![warn(missing_docs)]

mod check;
mod elaborate;
mod pipeline;

use std::io::IsTerminal;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use dsir_common::Arithmetic;
use dsir_config::OutputFormat;
use tracing_subscriber::EnvFilter;

/// dsir, the DynStruct IR elaborator.
#[derive(Parser, Debug)]
#[command(name = "dsir", version, about = "DynStruct IR elaborator")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `dsir.toml` file or the directory containing one.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Elaborate AST documents and print the IR.
    Elaborate(ElaborateArgs),
    /// Elaborate and verify AST documents, printing only diagnostics.
    Check(CheckArgs),
}

/// Arguments for `dsir elaborate`.
#[derive(Parser, Debug)]
pub struct ElaborateArgs {
    /// AST documents to elaborate. Defaults to the config's `sources`.
    pub files: Vec<String>,

    /// Output format for the IR and diagnostics.
    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Overflow policy for constant folding.
    #[arg(long, value_enum)]
    pub arithmetic: Option<ArithmeticArg>,

    /// Elaborate translation-unit modules one at a time.
    #[arg(long)]
    pub sequential: bool,
}

/// Arguments for `dsir check`.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// AST documents to check. Defaults to the config's `sources`.
    pub files: Vec<String>,

    /// Output format for diagnostics.
    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

impl ColorChoice {
    /// Whether to color output written to a stream that is (or is not) a
    /// terminal.
    pub fn enabled(self, is_terminal: bool) -> bool {
        match self {
            ColorChoice::Auto => is_terminal,
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

/// Output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

impl From<ReportFormat> for OutputFormat {
    fn from(format: ReportFormat) -> Self {
        match format {
            ReportFormat::Text => OutputFormat::Text,
            ReportFormat::Json => OutputFormat::Json,
        }
    }
}

/// Overflow policy selectable on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ArithmeticArg {
    /// Two's-complement wrapping.
    Wrapping,
    /// Overflow is an elaboration error.
    Checked,
}

impl From<ArithmeticArg> for Arithmetic {
    fn from(arg: ArithmeticArg) -> Self {
        match arg {
            ArithmeticArg::Wrapping => Arithmetic::Wrapping,
            ArithmeticArg::Checked => Arithmetic::Checked,
        }
    }
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a config file or project directory.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = cli.color.enabled(std::io::stderr().is_terminal());

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };
    init_tracing(&global);

    let result = match cli.command {
        Command::Elaborate(ref args) => elaborate::run(args, &global),
        Command::Check(ref args) => check::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` wins over the flags.
fn init_tracing(global: &GlobalArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(global)));
    // A subscriber may already be installed when embedded in a test harness.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(global.color)
        .with_target(false)
        .try_init();
}

fn default_log_level(global: &GlobalArgs) -> &'static str {
    if global.quiet {
        "error"
    } else if global.verbose {
        "debug"
    } else {
        "warn"
    }
}
