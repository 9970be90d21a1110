mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::amortization::{LoanTermsArgs, RateArgs, ScheduleArgs, SolveArgs, TenureArgs};
use commands::comparison::{InflationArgs, SipArgs};
use commands::loan::{CatalogueArgs, ChargesArgs, LoanArgs, TaxArgs};
use commands::whatif::{AdjustArgs, PrepaymentArgs, TopUpArgs};

/// Loan EMI, amortization and what-if calculations
#[derive(Parser)]
#[command(
    name = "emi",
    version,
    about = "Loan EMI, amortization and what-if calculations",
    long_about = "A CLI for reducing-balance loan calculations with decimal precision. \
                  Computes EMIs and amortization schedules, solves for tenure or rate, \
                  and analyses prepayments, top-ups, SIP alternatives and inflation."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log engine diagnostics to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly installment for a loan
    Emi(LoanTermsArgs),
    /// Month-by-month amortization schedule, with optional prepayments
    Schedule(ScheduleArgs),
    /// Full loan computation: EMI, schedule, charges and tax benefit
    Loan(LoanArgs),
    /// Tenure needed to repay a loan with a given EMI
    Tenure(TenureArgs),
    /// Interest rate implied by an EMI and tenure
    Rate(RateArgs),
    /// Derive any one of EMI / rate / tenure from the other two
    Solve(SolveArgs),
    /// Home / education loan tax deduction estimate
    Tax(TaxArgs),
    /// Foreclosure and late-payment charges
    Charges(ChargesArgs),
    /// Typical terms for a loan category and type
    Catalogue(CatalogueArgs),
    /// Impact of a lump-sum prepayment
    Prepayment(PrepaymentArgs),
    /// Top-up loan: merged versus separate
    TopUp(TopUpArgs),
    /// Change one variable, hold another, solve the third
    Adjust(AdjustArgs),
    /// Paying an EMI versus investing it in a SIP
    Sip(SipArgs),
    /// Real cost of a loan under inflation
    Inflation(InflationArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Emi(args) => commands::amortization::run_emi(args),
        Commands::Schedule(args) => commands::amortization::run_schedule(args),
        Commands::Loan(args) => commands::loan::run_loan(args),
        Commands::Tenure(args) => commands::amortization::run_tenure(args),
        Commands::Rate(args) => commands::amortization::run_rate(args),
        Commands::Solve(args) => commands::amortization::run_solve(args),
        Commands::Tax(args) => commands::loan::run_tax(args),
        Commands::Charges(args) => commands::loan::run_charges(args),
        Commands::Catalogue(args) => commands::loan::run_catalogue(args),
        Commands::Prepayment(args) => commands::whatif::run_prepayment(args),
        Commands::TopUp(args) => commands::whatif::run_top_up(args),
        Commands::Adjust(args) => commands::whatif::run_adjust(args),
        Commands::Sip(args) => commands::comparison::run_sip(args),
        Commands::Inflation(args) => commands::comparison::run_inflation(args),
        Commands::Version => {
            println!("emi {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {e:?}");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
