use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use spendlens_coach::{SavingsCoach, UserProfile};
use spendlens_core::{
    CategoryPolicy, MonthlyPolicy, detect_by_category, detect_by_month, from_rows,
    monthly_summary, synthesize,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod csv_source;
mod render;

#[derive(Parser, Debug)]
#[command(name = "spendlens", version, about = "Spending analytics over transaction exports")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a transaction CSV and print the insights panel
    Report {
        /// Path to the transactions CSV (id,date,type,category,note,amount)
        #[arg(long)]
        file: PathBuf,
    },

    /// Personalized savings recommendations
    Coach {
        #[arg(long)]
        file: PathBuf,

        /// Monthly income, major currency units
        #[arg(long)]
        income: Decimal,

        /// Scoring artifact path (heuristic fallback when absent)
        #[arg(long, default_value = "model_budget.json")]
        model: PathBuf,
    },

    /// List unusual transactions from both detectors
    Anomalies {
        #[arg(long)]
        file: PathBuf,

        /// Per-category z-score threshold
        #[arg(long, default_value_t = 2.0)]
        threshold: f64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Report { file } => report(file)?,
        Command::Coach {
            file,
            income,
            model,
        } => coach(file, income, model)?,
        Command::Anomalies { file, threshold } => anomalies(file, threshold)?,
    }
    Ok(())
}

fn report(file: PathBuf) -> Result<()> {
    let rows = csv_source::read_rows(&file)?;
    tracing::debug!(rows = rows.len(), "loaded transactions");
    let (txns, quality) = from_rows(&rows);

    let detected = detect_by_category(&txns, CategoryPolicy::default());
    let insights = synthesize(&txns, &detected, &[]);
    let months = monthly_summary(&txns);

    print!("{}", render::insights_panel(&months, &insights, &quality));
    Ok(())
}

fn coach(file: PathBuf, income: Decimal, model: PathBuf) -> Result<()> {
    let rows = csv_source::read_rows(&file)?;
    let (txns, _) = from_rows(&rows);

    let coach = SavingsCoach::new(model);
    let report = coach.advise(&UserProfile::new(income), &txns);

    print!("{}", render::coach_panel(income, &report));
    Ok(())
}

fn anomalies(file: PathBuf, threshold: f64) -> Result<()> {
    let rows = csv_source::read_rows(&file)?;
    let (txns, _) = from_rows(&rows);

    let by_cat = detect_by_category(
        &txns,
        CategoryPolicy {
            threshold,
            ..CategoryPolicy::default()
        },
    );
    let by_month = detect_by_month(&txns, MonthlyPolicy::default());

    print!("{}", render::anomalies_panel(&by_cat, &by_month));
    Ok(())
}
