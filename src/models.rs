use chrono::NaiveDate;

use crate::error::{Result, WarungError};

/// Face values of the counted notes and coins, largest first.
pub const DENOMINATIONS: [i64; 8] = [100_000, 50_000, 20_000, 10_000, 5_000, 2_000, 1_000, 500];

/// Column labels matching `DENOMINATIONS`.
pub const DENOMINATION_LABELS: [&str; 8] = ["100rb", "50rb", "20rb", "10rb", "5rb", "2rb", "1rb", "500"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryItem {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub opening_stock: i64,
    pub stock_in: i64,
    pub stock_out: i64,
    pub transfer_note: Option<String>,
    /// Written by the store; authoritative.
    pub closing_stock: i64,
    pub sale_price: i64,
    pub base_cost: i64,
}

#[derive(Debug, Clone, Default)]
pub struct NewInventoryItem {
    pub code: String,
    pub name: String,
    pub opening_stock: i64,
    pub stock_in: i64,
    pub stock_out: i64,
    pub transfer_note: Option<String>,
    pub sale_price: i64,
    pub base_cost: i64,
}

#[derive(Debug, Clone, Default)]
pub struct InventoryItemPatch {
    pub code: Option<String>,
    pub name: Option<String>,
    pub opening_stock: Option<i64>,
    pub stock_in: Option<i64>,
    pub stock_out: Option<i64>,
    /// `Some(None)` clears the note.
    pub transfer_note: Option<Option<String>>,
    pub sale_price: Option<i64>,
    pub base_cost: Option<i64>,
}

/// Counts per denomination, in `DENOMINATIONS` order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Denominations(pub [i64; 8]);

impl Denominations {
    pub fn counts(&self) -> &[i64; 8] {
        &self.0
    }

    /// Value of the counted cash, side amounts not included.
    pub fn value(&self) -> i64 {
        self.0.iter().zip(DENOMINATIONS).map(|(n, face)| n * face).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CashEntry {
    pub id: i64,
    pub date: NaiveDate,
    pub counts: Denominations,
    pub rice_purchase: Option<i64>,
    pub barter: Option<i64>,
    /// Written by the store; authoritative.
    pub total: i64,
}

#[derive(Debug, Clone)]
pub struct NewCashEntry {
    pub date: NaiveDate,
    pub counts: Denominations,
    pub rice_purchase: Option<i64>,
    pub barter: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct CashEntryPatch {
    pub date: Option<NaiveDate>,
    /// Per-denomination replacement counts; `None` leaves that column alone.
    pub counts: [Option<i64>; 8],
    /// `Some(None)` clears the amount; same for `barter`.
    pub rice_purchase: Option<Option<i64>>,
    pub barter: Option<Option<i64>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KosTransaction {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub receipt: i64,
    pub expense: i64,
}

#[derive(Debug, Clone)]
pub struct NewKosTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub receipt: i64,
    pub expense: i64,
}

#[derive(Debug, Clone, Default)]
pub struct KosTransactionPatch {
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub receipt: Option<i64>,
    pub expense: Option<i64>,
}

/// Full, ordered contents of the three collections at one point in time.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Ordered by code.
    pub items: Vec<InventoryItem>,
    /// Newest first.
    pub cash: Vec<CashEntry>,
    /// Oldest first.
    pub kos: Vec<KosTransaction>,
}

// ---------------------------------------------------------------------------
// Boundary checks
// ---------------------------------------------------------------------------

fn non_negative(field: &str, value: i64) -> Result<()> {
    if value < 0 {
        return Err(WarungError::Invalid(format!("{field} must not be negative (got {value})")));
    }
    Ok(())
}

fn non_negative_opt(field: &str, value: Option<i64>) -> Result<()> {
    value.map_or(Ok(()), |v| non_negative(field, v))
}

fn non_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(WarungError::Invalid(format!("{field} must not be empty")));
    }
    Ok(())
}

impl NewInventoryItem {
    pub fn validate(&self) -> Result<()> {
        non_blank("code", &self.code)?;
        non_blank("name", &self.name)?;
        non_negative("opening stock", self.opening_stock)?;
        non_negative("stock in", self.stock_in)?;
        non_negative("stock out", self.stock_out)?;
        non_negative("sale price", self.sale_price)?;
        non_negative("base cost", self.base_cost)
    }
}

impl InventoryItemPatch {
    pub fn validate(&self) -> Result<()> {
        if let Some(code) = &self.code {
            non_blank("code", code)?;
        }
        if let Some(name) = &self.name {
            non_blank("name", name)?;
        }
        non_negative_opt("opening stock", self.opening_stock)?;
        non_negative_opt("stock in", self.stock_in)?;
        non_negative_opt("stock out", self.stock_out)?;
        non_negative_opt("sale price", self.sale_price)?;
        non_negative_opt("base cost", self.base_cost)
    }
}

impl NewCashEntry {
    pub fn validate(&self) -> Result<()> {
        for (label, n) in DENOMINATION_LABELS.iter().zip(self.counts.counts()) {
            non_negative(label, *n)?;
        }
        non_negative_opt("rice purchase", self.rice_purchase)?;
        non_negative_opt("barter", self.barter)
    }
}

impl CashEntryPatch {
    pub fn validate(&self) -> Result<()> {
        for (label, n) in DENOMINATION_LABELS.iter().zip(self.counts) {
            non_negative_opt(label, n)?;
        }
        non_negative_opt("rice purchase", self.rice_purchase.flatten())?;
        non_negative_opt("barter", self.barter.flatten())
    }
}

impl NewKosTransaction {
    pub fn validate(&self) -> Result<()> {
        non_blank("description", &self.description)?;
        non_negative("receipt", self.receipt)?;
        non_negative("expense", self.expense)
    }
}

impl KosTransactionPatch {
    pub fn validate(&self) -> Result<()> {
        if let Some(desc) = &self.description {
            non_blank("description", desc)?;
        }
        non_negative_opt("receipt", self.receipt)?;
        non_negative_opt("expense", self.expense)
    }
}
