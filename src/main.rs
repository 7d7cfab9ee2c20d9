mod audit;
mod categorizer;
mod cli;
mod db;
mod error;
mod fmt;
mod models;
#[cfg(feature = "pdf")]
mod pdf;
mod reports;
mod settings;
mod store;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{
    CashCommands, Cli, Commands, Context, ExportCommands, ItemsCommands, KosCommands,
    ReportCommands,
};
use models::{CashEntryPatch, InventoryItemPatch, KosTransactionPatch, NewInventoryItem};

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("warung=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ctx = Context::new(settings::load_settings(), cli.data_dir.as_deref());

    let result = match cli.command {
        Commands::Init { business_name, kos_name } => cli::init::run(&ctx, business_name, kos_name),
        Commands::Status => cli::status::run(&ctx),
        Commands::Items { command } => match command {
            ItemsCommands::Add {
                code,
                name,
                opening,
                stock_in,
                stock_out,
                transfer_note,
                price,
                cost,
            } => cli::items::add(
                &ctx,
                NewInventoryItem {
                    code,
                    name,
                    opening_stock: opening,
                    stock_in,
                    stock_out,
                    transfer_note,
                    sale_price: price,
                    base_cost: cost,
                },
            ),
            ItemsCommands::List { search } => cli::items::list(&ctx, search.as_deref()),
            ItemsCommands::Update {
                id,
                code,
                name,
                opening,
                stock_in,
                stock_out,
                transfer_note,
                clear_transfer_note,
                price,
                cost,
            } => cli::items::update(
                &ctx,
                id,
                InventoryItemPatch {
                    code,
                    name,
                    opening_stock: opening,
                    stock_in,
                    stock_out,
                    transfer_note: cli::nullable(transfer_note, clear_transfer_note),
                    sale_price: price,
                    base_cost: cost,
                },
            ),
            ItemsCommands::Delete { id } => cli::items::delete(&ctx, id),
        },
        Commands::Cash { command } => match command {
            CashCommands::Add { date, counts, rice, barter } => {
                cli::cash::add(&ctx, date, &counts, rice, barter)
            }
            CashCommands::List => cli::cash::list(&ctx),
            CashCommands::Update { id, date, counts, rice, clear_rice, barter, clear_barter } => {
                cli::cash::update(
                    &ctx,
                    id,
                    CashEntryPatch {
                        date,
                        counts: counts.as_array(),
                        rice_purchase: cli::nullable(rice, clear_rice),
                        barter: cli::nullable(barter, clear_barter),
                    },
                )
            }
            CashCommands::Delete { id } => cli::cash::delete(&ctx, id),
        },
        Commands::Kos { command } => match command {
            KosCommands::Add { date, description, receipt, expense } => {
                cli::kos::add(&ctx, date, description, receipt, expense)
            }
            KosCommands::List => cli::kos::list(&ctx),
            KosCommands::Update { id, date, description, receipt, expense } => cli::kos::update(
                &ctx,
                id,
                KosTransactionPatch { date, description, receipt, expense },
            ),
            KosCommands::Delete { id } => cli::kos::delete(&ctx, id),
        },
        Commands::Dashboard { month, year } => cli::dashboard::run(&ctx, month, year),
        Commands::Report { command } => match command {
            ReportCommands::Inventory { search } => cli::report::inventory(&ctx, search.as_deref()),
            ReportCommands::Cash => cli::report::cash(&ctx),
            ReportCommands::Kos => cli::report::kos(&ctx),
        },
        Commands::Export { command } => match command {
            ExportCommands::Inventory { search, format, output } => {
                cli::export::inventory(&ctx, search.as_deref(), format, output.as_deref()).map(|_| ())
            }
            ExportCommands::Cash { format, output } => {
                cli::export::cash(&ctx, format, output.as_deref()).map(|_| ())
            }
            ExportCommands::Kos { format, output } => {
                cli::export::kos(&ctx, format, output.as_deref()).map(|_| ())
            }
            ExportCommands::All { format, output_dir } => {
                cli::export::all(&ctx, format, output_dir.as_deref()).map(|_| ())
            }
        },
        Commands::Check => cli::check::run(&ctx),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
