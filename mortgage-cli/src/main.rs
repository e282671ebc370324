use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{debug, warn};

use mortgage_cli::{config::CliConfig, config::DEFAULT_CONFIG_FILE, interactive, logging};
use mortgage_core::{Field, MortgageForm, MortgageType, SubmitError};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Mortgage repayment calculator.
///
/// Validates a loan amount, term and interest rate, then prints the monthly
/// payment, total interest and total amount repayable.
#[derive(Debug, Parser)]
#[command(name = "mortgage", version, about)]
struct Cli {
    /// Configuration file (TOML). Defaults to `mortgage.toml` in the working
    /// directory; a missing file means built-in defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `info,mortgage_core=debug`.
    /// Overrides the configuration file, which overrides `RUST_LOG`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Suppress console log output (file logging is unaffected).
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Calculate repayments for one set of inputs.
    Calc(CalcArgs),
    /// Prompt for the inputs line by line.
    Interactive,
}

#[derive(Debug, Args)]
struct CalcArgs {
    /// Amount borrowed, e.g. `200000` or `200,000`.
    #[arg(long)]
    amount: String,

    /// Term in years.
    #[arg(long)]
    term: String,

    /// Annual interest rate in percent.
    #[arg(long)]
    rate: String,

    /// `repayment` or `interest-only`.
    #[arg(long = "type", value_parser = parse_mortgage_type, default_value = "repayment")]
    mortgage_type: MortgageType,
}

fn parse_mortgage_type(s: &str) -> Result<MortgageType, String> {
    MortgageType::parse(s).ok_or_else(|| {
        let expected: Vec<_> = MortgageType::all().iter().map(|t| t.as_str()).collect();
        format!("expected one of: {}", expected.join(", "))
    })
}

// ─── setup ───────────────────────────────────────────────────────────────────

fn load_config(cli: &Cli) -> anyhow::Result<CliConfig> {
    let config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::load_or_default(Path::new(DEFAULT_CONFIG_FILE))?,
    };
    Ok(config)
}

fn apply_logging(
    cli: &Cli,
    config: &CliConfig,
) -> anyhow::Result<()> {
    let configured = config.logging.level.as_deref();
    if let Some(level) = logging::level_override(cli.log_level.as_deref(), configured) {
        logging::set_log_level(level)?;
    }

    if cli.quiet {
        logging::set_console_enabled(false);
    }

    if let Some(path) = cli.log_file.as_ref().or(config.logging.file.as_ref()) {
        logging::enable_file_logging(path)?;
        debug!(path = %path.display(), "file logging enabled");
    }
    Ok(())
}

// ─── commands ────────────────────────────────────────────────────────────────

fn run_calc(
    form: &mut MortgageForm,
    args: CalcArgs,
) -> anyhow::Result<ExitCode> {
    form.set_field(Field::Amount, args.amount);
    form.set_field(Field::Term, args.term);
    form.set_field(Field::Rate, args.rate);
    form.set_mortgage_type(args.mortgage_type);

    match form.submit() {
        Ok(result) => {
            let mut stdout = io::stdout().lock();
            write!(stdout, "{result}").context("failed to write result")?;
            Ok(ExitCode::SUCCESS)
        }
        Err(SubmitError::Invalid(errors)) => {
            let mut stderr = io::stderr().lock();
            for (field, error) in errors.iter() {
                writeln!(stderr, "{}: {error}", field.label())?;
            }
            Ok(ExitCode::from(2))
        }
        Err(err @ SubmitError::Busy) => {
            warn!(%err, "calculation refused");
            Ok(ExitCode::FAILURE)
        }
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<ExitCode> {
    logging::init_default_logging();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    apply_logging(&cli, &config)?;

    let mut form =
        MortgageForm::new(config.validation.clone()).context("invalid validation limits")?;

    match cli.command {
        Command::Calc(args) => run_calc(&mut form, args),
        Command::Interactive => {
            let stdin = io::stdin().lock();
            let stdout = io::stdout().lock();
            interactive::run(&mut form, stdin, stdout)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
