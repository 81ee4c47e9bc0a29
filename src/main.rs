use anyhow::Result;
use aurum::core::ReportPeriod;
use aurum::core::ValuationScope;
use aurum::core::log::init_logging;
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Replace quantities with seeded stand-ins so output can be shared
    #[arg(short, long, global = true)]
    anonymize: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct PeriodArg {
    /// Reporting period: 1D, 1W, 1M, 1Y, YTD or MAX
    #[arg(short, long, default_value = "1M")]
    period: ReportPeriod,
}

#[derive(Args)]
#[group(multiple = false)]
struct ScopeArgs {
    /// Only holdings of instruments in this category
    #[arg(long)]
    category: Option<String>,
    /// Only holdings in this account
    #[arg(long)]
    account: Option<String>,
    /// Only holdings of this instrument
    #[arg(long)]
    holding: Option<String>,
}

impl From<ScopeArgs> for ValuationScope {
    fn from(args: ScopeArgs) -> ValuationScope {
        match (args.category, args.account, args.holding) {
            (Some(id), _, _) => ValuationScope::Category(id),
            (_, Some(id), _) => ValuationScope::Account(id),
            (_, _, Some(id)) => ValuationScope::Holding(id),
            _ => ValuationScope::Portfolio,
        }
    }
}

impl From<Commands> for aurum::AppCommand {
    fn from(cmd: Commands) -> aurum::AppCommand {
        match cmd {
            Commands::Import { file } => aurum::AppCommand::Import { file },
            Commands::Summary(p) => aurum::AppCommand::Summary { period: p.period },
            Commands::Series { period, scope } => aurum::AppCommand::Series {
                period: period.period,
                scope: scope.into(),
            },
            Commands::Compare(p) => aurum::AppCommand::Compare { period: p.period },
            Commands::Gold(p) => aurum::AppCommand::Gold { period: p.period },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Import prices and exchange rates from a YAML file
    Import { file: PathBuf },
    /// Display holdings and totals over a period
    Summary(PeriodArg),
    /// Display the value series of the portfolio or part of it
    Series {
        #[command(flatten)]
        period: PeriodArg,
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Compare the portfolio with the configured benchmark
    Compare(PeriodArg),
    /// Display the portfolio value in troy ounces of gold
    Gold(PeriodArg),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => aurum::cli::setup::setup(),
        Some(cmd) => aurum::run_command(cmd.into(), cli.config_path.as_deref(), cli.anonymize),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
