use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::warn;

use printquote::currency::{self, DEFAULT_QUOTE_URL};
use printquote::{Filament, JobInputs, PriceBreakdown, PricingSession, FILAMENT_SLOTS};

#[derive(Parser)]
#[command(name = "printquote", version, about = "Pricing calculator for 3D-printing services")]
struct Cli {
    /// Path to the settings database (defaults to the platform data dir)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Bootstrap document used to seed an empty database
    #[arg(long, global = true)]
    seed: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or edit the cost configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
    /// Manage the filament catalog
    Filament {
        #[command(subcommand)]
        action: FilamentCommands,
    },
    /// Refresh the USD exchange rate from the quote service
    Rate,
    /// Compute the price breakdown for one print job
    Quote(QuoteArgs),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the current configuration
    Show,
    /// Update configuration fields (only the supplied flags change)
    Set(ConfigSetArgs),
}

#[derive(Args)]
struct ConfigSetArgs {
    /// Electricity price per kWh
    #[arg(long)]
    kwh_price: Option<f64>,
    /// Printer power draw in kW
    #[arg(long)]
    printer_consumption: Option<f64>,
    /// Hourly rate for design work
    #[arg(long)]
    design_cost_per_hour: Option<f64>,
    /// Hourly rate for manual labor
    #[arg(long)]
    labor_cost_per_hour: Option<f64>,
    /// Hourly rate for printer time
    #[arg(long)]
    print_cost_per_hour: Option<f64>,
    /// Hourly share of printer amortization
    #[arg(long)]
    amortization_cost_per_hour: Option<f64>,
    /// Monthly maintenance budget
    #[arg(long)]
    maintenance_monthly: Option<f64>,
    /// Other monthly overhead
    #[arg(long)]
    parallel_expenses: Option<f64>,
    /// Error margin percentage applied to variable costs
    #[arg(long)]
    error_margin: Option<f64>,
    /// USD to UYU exchange rate
    #[arg(long)]
    usd_to_uy: Option<f64>,
    /// Refresh the exchange rate automatically
    #[arg(long)]
    use_auto_usd: Option<bool>,
}

#[derive(Subcommand)]
enum FilamentCommands {
    /// List the catalog with positions
    List,
    /// Append a filament to the catalog
    Add {
        #[arg(long)]
        name: String,
        /// Material category (PLA, PETG, ...)
        #[arg(long)]
        material: String,
        #[arg(long)]
        color: String,
        /// Cost per kilogram in USD
        #[arg(long)]
        price: f64,
    },
    /// Remove the filament at the given position
    Remove { position: usize },
}

#[derive(Args)]
struct QuoteArgs {
    /// Design hours
    #[arg(long, default_value_t = 0.0)]
    design: f64,
    /// Manual labor hours
    #[arg(long, default_value_t = 0.0)]
    labor: f64,
    /// Printing hours
    #[arg(long, default_value_t = 0.0)]
    printing: f64,
    /// Flat packaging cost, USD
    #[arg(long, default_value_t = 0.0)]
    packaging: f64,
    /// Other flat costs, USD
    #[arg(long, default_value_t = 0.0)]
    extra: f64,
    /// Profit margin percentage
    #[arg(long, default_value_t = 0.0)]
    profit: f64,
    /// Filament usage as POSITION:GRAMS (repeatable, up to 5)
    #[arg(long = "filament", value_name = "POS:GRAMS")]
    filaments: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let db_path = match cli.db {
        Some(path) => path,
        None => default_db_path()?,
    };
    let mut session = PricingSession::open_with_seed(&db_path, cli.seed.as_deref())
        .context("Failed to initialize pricing session")?;

    match cli.command {
        Commands::Config { action } => match action {
            ConfigCommands::Show => {
                println!("{}", serde_json::to_string_pretty(session.config())?);
            }
            ConfigCommands::Set(args) => {
                let toggled_on = apply_config_set(&mut session, args)?;
                println!("Configuration saved");
                if toggled_on {
                    refresh_rate_best_effort(&mut session).await;
                }
            }
        },
        Commands::Filament { action } => match action {
            FilamentCommands::List => {
                if session.filaments().is_empty() {
                    println!("Catalog is empty");
                }
                for (position, filament) in session.filaments().iter().enumerate() {
                    println!(
                        "{:>3}  {} ({}) - {} - {:.2} USD/kg",
                        position, filament.name, filament.material, filament.color, filament.price
                    );
                }
            }
            FilamentCommands::Add {
                name,
                material,
                color,
                price,
            } => {
                let position = session.add_filament(Filament {
                    name,
                    material,
                    color,
                    price,
                })?;
                println!("Added filament at position {}", position);
            }
            FilamentCommands::Remove { position } => {
                let removed = session.remove_filament(position)?;
                println!("Removed '{}' from position {}", removed.name, position);
            }
        },
        Commands::Rate => {
            let client = reqwest::Client::new();
            let rate = currency::fetch_rate(&client, DEFAULT_QUOTE_URL).await?;
            session.apply_exchange_rate(rate)?;
            println!("Exchange rate updated: 1 USD = {:.2} UYU", rate);
        }
        Commands::Quote(args) => {
            // Mirror the original app: refresh the rate at startup when
            // auto mode is on, but never let a failed fetch block a quote.
            if session.config().use_auto_usd {
                refresh_rate_best_effort(&mut session).await;
            }
            let job = build_job(&args)?;
            print_breakdown(&session.quote(&job));
        }
    }

    Ok(())
}

/// Apply the supplied `config set` flags. Returns true when `useAutoUSD`
/// was switched on by this invocation.
fn apply_config_set(session: &mut PricingSession, args: ConfigSetArgs) -> Result<bool> {
    let mut config = session.config().clone();
    let was_auto = config.use_auto_usd;

    if let Some(v) = args.kwh_price {
        config.kwh_price = v;
    }
    if let Some(v) = args.printer_consumption {
        config.printer_consumption = v;
    }
    if let Some(v) = args.design_cost_per_hour {
        config.design_cost_per_hour = v;
    }
    if let Some(v) = args.labor_cost_per_hour {
        config.labor_cost_per_hour = v;
    }
    if let Some(v) = args.print_cost_per_hour {
        config.print_cost_per_hour = v;
    }
    if let Some(v) = args.amortization_cost_per_hour {
        config.amortization_cost_per_hour = v;
    }
    if let Some(v) = args.maintenance_monthly {
        config.maintenance_monthly = v;
    }
    if let Some(v) = args.parallel_expenses {
        config.parallel_expenses = v;
    }
    if let Some(v) = args.error_margin {
        config.error_margin = v;
    }
    if let Some(v) = args.usd_to_uy {
        config.usd_to_uy = v;
    }
    if let Some(v) = args.use_auto_usd {
        config.use_auto_usd = v;
    }

    let toggled_on = config.use_auto_usd && !was_auto;
    session.update_config(config)?;
    Ok(toggled_on)
}

/// Refresh the exchange rate, reporting failure without aborting. The
/// last-known rate stays in place when the quote service is unreachable.
async fn refresh_rate_best_effort(session: &mut PricingSession) {
    let client = reqwest::Client::new();
    match session.refresh_exchange_rate(&client, DEFAULT_QUOTE_URL).await {
        Ok(Some(rate)) => println!("Exchange rate updated: 1 USD = {:.2} UYU", rate),
        Ok(None) => {}
        Err(e) => {
            warn!("Exchange rate refresh failed: {}", e);
            eprintln!(
                "Could not refresh the exchange rate ({}), keeping 1 USD = {:.2} UYU",
                e,
                session.config().usd_to_uy
            );
        }
    }
}

fn build_job(args: &QuoteArgs) -> Result<JobInputs> {
    if args.filaments.len() > FILAMENT_SLOTS {
        bail!("At most {} filament slots are supported", FILAMENT_SLOTS);
    }

    let mut job = JobInputs {
        design: args.design,
        labor: args.labor,
        printing: args.printing,
        packaging: args.packaging,
        extra: args.extra,
        profit: args.profit,
        ..JobInputs::default()
    };
    for (slot, spec) in args.filaments.iter().enumerate() {
        let (position, weight_grams) = parse_filament_spec(spec)?;
        job.set_slot(slot, position, weight_grams);
    }
    Ok(job)
}

/// Parse a `POSITION:GRAMS` filament usage argument.
fn parse_filament_spec(spec: &str) -> Result<(usize, f64)> {
    let (position, weight) = spec
        .split_once(':')
        .ok_or_else(|| anyhow!("Expected POS:GRAMS, got '{}'", spec))?;
    let position: usize = position
        .trim()
        .parse()
        .with_context(|| format!("Invalid catalog position in '{}'", spec))?;
    let weight: f64 = weight
        .trim()
        .parse()
        .with_context(|| format!("Invalid weight in '{}'", spec))?;
    Ok((position, weight))
}

fn print_breakdown(breakdown: &PriceBreakdown) {
    println!("Filament:            {:>10.2} USD", breakdown.filament_cost);
    println!("Electricity:         {:>10.2} USD", breakdown.electricity);
    println!("Maintenance:         {:>10.2} USD", breakdown.maintenance);
    println!("Parallel expenses:   {:>10.2} USD", breakdown.parallel_expenses);
    println!("Design:              {:>10.2} USD", breakdown.design_cost);
    println!("Labor:               {:>10.2} USD", breakdown.labor_cost);
    println!("Printing:            {:>10.2} USD", breakdown.print_cost);
    println!("Amortization:        {:>10.2} USD", breakdown.amortization_cost);
    println!("Packaging:           {:>10.2} USD", breakdown.packaging);
    println!("Extra:               {:>10.2} USD", breakdown.extra);
    println!("---");
    println!("Variable cost:       {:>10.2} USD", breakdown.variable_cost);
    println!("Fixed cost:          {:>10.2} USD", breakdown.fixed_cost);
    println!("Total:               {:>10.2} USD", breakdown.total_before_margin);
    println!("With error margin:   {:>10.2} USD", breakdown.total_with_error_margin);
    println!("Final price:         {:>10.2} USD", breakdown.final_price_usd);
    println!("Final price (UYU):   {:>10.2} UYU", breakdown.final_price_local);
}

/// Settings database under the platform data directory, e.g.
/// `~/.local/share/printquote/printquote.db`.
fn default_db_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().ok_or_else(|| anyhow!("No platform data directory found"))?;
    Ok(data_dir.join("printquote").join("printquote.db"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filament_spec() {
        assert_eq!(parse_filament_spec("0:50").unwrap(), (0, 50.0));
        assert_eq!(parse_filament_spec("3 : 12.5").unwrap(), (3, 12.5));
        assert!(parse_filament_spec("50").is_err());
        assert!(parse_filament_spec("a:50").is_err());
        assert!(parse_filament_spec("0:grams").is_err());
    }
}
