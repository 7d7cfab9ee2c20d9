pub mod cash;
pub mod check;
pub mod dashboard;
pub mod export;
pub mod init;
pub mod items;
pub mod kos;
pub mod report;
pub mod status;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rusqlite::Connection;

use crate::db::{get_connection, DB_FILE};
use crate::error::{Result, WarungError};
use crate::settings::{shellexpand_path, Settings};

/// Everything a command needs to know about where it runs. Built once in
/// `main` and handed down; commands never read settings on their own.
pub struct Context {
    pub settings: Settings,
    pub data_dir: PathBuf,
}

impl Context {
    pub fn new(mut settings: Settings, data_dir_override: Option<&str>) -> Self {
        if let Some(dir) = data_dir_override {
            settings.data_dir = shellexpand_path(dir);
        }
        let data_dir = PathBuf::from(&settings.data_dir);
        Self { settings, data_dir }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE)
    }

    pub fn exports_dir(&self) -> PathBuf {
        self.data_dir.join("exports")
    }

    /// Opens the existing database; does not create one.
    pub fn open(&self) -> Result<Connection> {
        let path = self.db_path();
        if !path.exists() {
            return Err(WarungError::Other(format!(
                "No database found at {}. Run `warung init` first.",
                path.display()
            )));
        }
        get_connection(&path)
    }
}

/// Patch value for a nullable column: a given value wins, `clear` writes
/// NULL, neither leaves the column alone.
pub fn nullable<T>(value: Option<T>, clear: bool) -> Option<Option<T>> {
    match (value, clear) {
        (Some(v), _) => Some(Some(v)),
        (None, true) => Some(None),
        (None, false) => None,
    }
}

#[derive(Parser)]
#[command(name = "warung", about = "Bookkeeping for a small shop and boarding house.")]
pub struct Cli {
    /// Data directory (overrides settings for this run)
    #[arg(long = "data-dir", global = true, env = "WARUNG_DATA_DIR")]
    pub data_dir: Option<String>,

    /// Log debug detail to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the data directory and database, and save settings.
    Init {
        /// Business name printed on reports
        #[arg(long = "business-name")]
        business_name: Option<String>,
        /// Boarding house name printed on reports
        #[arg(long = "kos-name")]
        kos_name: Option<String>,
    },
    /// Show settings and record counts.
    Status,
    /// Manage inventory items.
    Items {
        #[command(subcommand)]
        command: ItemsCommands,
    },
    /// Manage daily cash counts.
    Cash {
        #[command(subcommand)]
        command: CashCommands,
    },
    /// Manage kos (boarding house) transactions.
    Kos {
        #[command(subcommand)]
        command: KosCommands,
    },
    /// Summary cards and charts data.
    Dashboard {
        /// Month number 1-12 (default: current month)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
        /// Only count cash and kos records from this year
        #[arg(long)]
        year: Option<i32>,
    },
    /// Show a report table.
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// Write a report to a PDF or CSV file.
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },
    /// Verify stored closing stock and cash totals.
    Check,
}

#[derive(Subcommand)]
pub enum ItemsCommands {
    /// Add an inventory item.
    Add {
        /// Unique item code, e.g. 'B001'
        #[arg(long)]
        code: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "0")]
        opening: i64,
        /// Units received
        #[arg(long = "stock-in", default_value = "0")]
        stock_in: i64,
        /// Units sold or dispatched
        #[arg(long = "stock-out", default_value = "0")]
        stock_out: i64,
        /// Where dispatched stock went
        #[arg(long = "transfer-note")]
        transfer_note: Option<String>,
        /// Sale price in rupiah
        #[arg(long, default_value = "0")]
        price: i64,
        /// Base cost in rupiah
        #[arg(long, default_value = "0")]
        cost: i64,
    },
    /// List inventory items.
    List {
        /// Filter by name or code
        #[arg(long)]
        search: Option<String>,
    },
    /// Update fields of an item.
    Update {
        /// Item ID (shown in `warung items list`)
        id: i64,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        opening: Option<i64>,
        #[arg(long = "stock-in")]
        stock_in: Option<i64>,
        #[arg(long = "stock-out")]
        stock_out: Option<i64>,
        #[arg(long = "transfer-note", conflicts_with = "clear_transfer_note")]
        transfer_note: Option<String>,
        /// Remove the transfer note
        #[arg(long = "clear-transfer-note")]
        clear_transfer_note: bool,
        #[arg(long)]
        price: Option<i64>,
        #[arg(long)]
        cost: Option<i64>,
    },
    /// Delete an item.
    Delete { id: i64 },
}

/// Denomination counts. Unset counts are 0 on add and unchanged on update.
#[derive(Args, Default)]
pub struct CountArgs {
    #[arg(long = "rp100k")]
    pub rp100k: Option<i64>,
    #[arg(long = "rp50k")]
    pub rp50k: Option<i64>,
    #[arg(long = "rp20k")]
    pub rp20k: Option<i64>,
    #[arg(long = "rp10k")]
    pub rp10k: Option<i64>,
    #[arg(long = "rp5k")]
    pub rp5k: Option<i64>,
    #[arg(long = "rp2k")]
    pub rp2k: Option<i64>,
    #[arg(long = "rp1k")]
    pub rp1k: Option<i64>,
    #[arg(long = "rp500")]
    pub rp500: Option<i64>,
}

impl CountArgs {
    pub fn as_array(&self) -> [Option<i64>; 8] {
        [
            self.rp100k, self.rp50k, self.rp20k, self.rp10k,
            self.rp5k, self.rp2k, self.rp1k, self.rp500,
        ]
    }
}

#[derive(Subcommand)]
pub enum CashCommands {
    /// Record a day's cash count.
    Add {
        /// YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
        #[command(flatten)]
        counts: CountArgs,
        /// Rice purchase paid from the drawer (not counted in total)
        #[arg(long)]
        rice: Option<i64>,
        /// Barter amount (not counted in total)
        #[arg(long)]
        barter: Option<i64>,
    },
    /// List cash counts, newest first.
    List,
    /// Update a cash count.
    Update {
        /// Entry ID (shown in `warung cash list`)
        id: i64,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[command(flatten)]
        counts: CountArgs,
        #[arg(long, conflicts_with = "clear_rice")]
        rice: Option<i64>,
        /// Remove the rice purchase amount
        #[arg(long = "clear-rice")]
        clear_rice: bool,
        #[arg(long, conflicts_with = "clear_barter")]
        barter: Option<i64>,
        /// Remove the barter amount
        #[arg(long = "clear-barter")]
        clear_barter: bool,
    },
    /// Delete a cash count.
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum KosCommands {
    /// Record a kos receipt or expense.
    Add {
        /// YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// What the money was for, e.g. 'Sewa kamar 3' or 'Bayar listrik'
        #[arg(long)]
        description: String,
        #[arg(long, default_value = "0")]
        receipt: i64,
        #[arg(long, default_value = "0")]
        expense: i64,
    },
    /// List transactions with running balance.
    List,
    /// Update a transaction.
    Update {
        /// Transaction ID (shown in `warung kos list`)
        id: i64,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        receipt: Option<i64>,
        #[arg(long)]
        expense: Option<i64>,
    },
    /// Delete a transaction.
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Stock report with levels.
    Inventory {
        #[arg(long)]
        search: Option<String>,
    },
    /// Daily cash report with column totals.
    Cash,
    /// Kos ledger with running balance.
    Kos,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Pdf,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Csv => "csv",
        }
    }
}

#[derive(Subcommand)]
pub enum ExportCommands {
    /// Export the stock report.
    Inventory {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_enum, default_value_t = ExportFormat::Pdf)]
        format: ExportFormat,
        /// Output file path
        #[arg(long)]
        output: Option<String>,
    },
    /// Export the daily cash report.
    Cash {
        #[arg(long, value_enum, default_value_t = ExportFormat::Pdf)]
        format: ExportFormat,
        #[arg(long)]
        output: Option<String>,
    },
    /// Export the kos ledger.
    Kos {
        #[arg(long, value_enum, default_value_t = ExportFormat::Pdf)]
        format: ExportFormat,
        #[arg(long)]
        output: Option<String>,
    },
    /// Export all three reports.
    All {
        #[arg(long, value_enum, default_value_t = ExportFormat::Pdf)]
        format: ExportFormat,
        /// Output directory
        #[arg(long = "output-dir")]
        output_dir: Option<String>,
    },
}
