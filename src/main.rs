use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use funnel::{client, config::Config, server};
use funnel_sdk::{LeadStatus, NewLead, NewPurchase, PaymentStatus};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "funnel", version, about = "Record purchases and leads for a sales funnel")]
struct Cli {
    /// API endpoint used by client commands (overrides FUNNEL_API_BASE)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Local fallback store file (overrides FUNNEL_DATA_FILE)
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    /// Use only the local store, never the API
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the API server
    Serve,
    #[command(flatten)]
    Client(ClientCommand),
}

#[derive(Subcommand)]
enum ClientCommand {
    /// Create, list or update purchases
    Purchase {
        #[command(subcommand)]
        action: PurchaseCommand,
    },
    /// Create, list or update leads
    Lead {
        #[command(subcommand)]
        action: LeadCommand,
    },
    /// Print funnel analytics as JSON
    Analytics,
    /// Print a collection as CSV
    Export {
        #[arg(value_enum)]
        kind: ExportKind,
    },
    /// Clear the local fallback store
    Clear,
}

#[derive(Subcommand)]
enum PurchaseCommand {
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        product_id: i64,
        #[arg(long)]
        product_name: String,
        #[arg(long)]
        amount: f64,
        #[arg(long, default_value = "pending", value_parser = parse_payment_status)]
        status: PaymentStatus,
        #[arg(long)]
        order_id: Option<String>,
    },
    List,
    Update {
        id: String,
        #[arg(long, value_parser = parse_payment_status)]
        status: PaymentStatus,
        #[arg(long)]
        payment_id: Option<String>,
    },
}

#[derive(Subcommand)]
enum LeadCommand {
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        product_interest: Option<i64>,
    },
    List,
    Update {
        id: String,
        #[arg(long, value_parser = parse_lead_status)]
        status: LeadStatus,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportKind {
    Purchases,
    Leads,
}

fn parse_payment_status(s: &str) -> Result<PaymentStatus, String> {
    s.parse()
        .map_err(|_| format!("invalid payment status '{}' (pending, success, failed)", s))
}

fn parse_lead_status(s: &str) -> Result<LeadStatus, String> {
    s.parse().map_err(|_| {
        format!(
            "invalid lead status '{}' (lead, payment_initiated, purchased)",
            s
        )
    })
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(api_base) = cli.api_base {
        config.api_base = api_base;
    }
    if cli.data_file.is_some() {
        config.data_file = cli.data_file;
    }
    config.offline |= cli.offline;

    match cli.command {
        Command::Serve => server::serve(&config).await,
        Command::Client(command) => run_client(command, &config).await,
    }
}

async fn run_client(command: ClientCommand, config: &Config) -> anyhow::Result<()> {
    let tracker = client::build_tracker(config)?;

    match command {
        ClientCommand::Purchase { action } => match action {
            PurchaseCommand::Create {
                name,
                email,
                phone,
                product_id,
                product_name,
                amount,
                status,
                order_id,
            } => {
                let purchase = tracker
                    .save_purchase(NewPurchase {
                        customer_name: name,
                        customer_email: email,
                        customer_phone: phone,
                        product_id,
                        product_name,
                        amount,
                        payment_status: status,
                        payment_id: None,
                        order_id,
                    })
                    .await;
                print_json(&purchase)?;
            }
            PurchaseCommand::List => print_json(&tracker.list_purchases().await)?,
            PurchaseCommand::Update {
                id,
                status,
                payment_id,
            } => match tracker.update_purchase_status(&id, status, payment_id).await {
                Some(purchase) => print_json(&purchase)?,
                None => tracing::warn!("Purchase {} not found", id),
            },
        },
        ClientCommand::Lead { action } => match action {
            LeadCommand::Create {
                name,
                email,
                phone,
                product_interest,
            } => {
                let lead = tracker
                    .save_lead(NewLead {
                        name,
                        email,
                        phone,
                        product_interest,
                        status: LeadStatus::Lead,
                    })
                    .await;
                print_json(&lead)?;
            }
            LeadCommand::List => print_json(&tracker.list_leads().await)?,
            LeadCommand::Update { id, status } => {
                match tracker.update_lead_status(&id, status).await {
                    Some(lead) => print_json(&lead)?,
                    None => tracing::warn!("Lead {} not found", id),
                }
            }
        },
        ClientCommand::Analytics => print_json(&tracker.analytics().await)?,
        ClientCommand::Export { kind } => {
            let csv = match kind {
                ExportKind::Purchases => tracker.export_purchases_csv().await,
                ExportKind::Leads => tracker.export_leads_csv().await,
            };
            println!("{}", csv);
        }
        ClientCommand::Clear => {
            tracker.clear_all();
            tracing::info!("Local store cleared");
        }
    }

    Ok(())
}
