//! Dashboard aggregates and report views derived from store snapshots.
//!
//! Everything here is a pure function of its inputs: no I/O, no retained
//! state. Callers fetch a fresh snapshot and recompute in full.

use chrono::Datelike;

use crate::categorizer::{expense_breakdown, CategoryTotal, ExpenseCategory};
use crate::fmt::{day_month, month_abbrev};
use crate::models::{CashEntry, InventoryItem, KosTransaction, Snapshot};

/// Items below this many units count as critical stock.
pub const CRITICAL_STOCK: i64 = 10;
/// Items below this many units (and not critical) are running low.
pub const LOW_STOCK: i64 = 25;

// ---------------------------------------------------------------------------
// Monthly summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthlySummary {
    pub income: i64,
    pub expense: i64,
    pub net: i64,
}

/// Income, kos expense and net for calendar month `month` (1-12).
///
/// Only the month component is compared, so the same month of every year in
/// the snapshot contributes.
pub fn monthly_summary(month: u32, cash: &[CashEntry], kos: &[KosTransaction]) -> MonthlySummary {
    let cash_income: i64 = cash
        .iter()
        .filter(|c| c.date.month() == month)
        .map(|c| c.total)
        .sum();
    let (kos_income, expense) = kos
        .iter()
        .filter(|t| t.date.month() == month)
        .fold((0i64, 0i64), |(r, e), t| (r + t.receipt, e + t.expense));

    let income = cash_income + kos_income;
    MonthlySummary {
        income,
        expense,
        net: income - expense,
    }
}

// ---------------------------------------------------------------------------
// Inventory rollup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InventoryRollup {
    pub total_units: i64,
    pub item_count: usize,
    pub critical_count: usize,
}

pub fn inventory_rollup(items: &[InventoryItem]) -> InventoryRollup {
    rollup(items)
}

fn rollup<'a>(items: impl IntoIterator<Item = &'a InventoryItem>) -> InventoryRollup {
    items.into_iter().fold(InventoryRollup::default(), |mut acc, item| {
        acc.total_units += item.closing_stock;
        acc.item_count += 1;
        if item.closing_stock < CRITICAL_STOCK {
            acc.critical_count += 1;
        }
        acc
    })
}

// ---------------------------------------------------------------------------
// Time series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DailyCashPoint {
    /// dd/mm
    pub label: String,
    /// Total in thousands of rupiah.
    pub thousands: f64,
}

/// One point per cash entry, oldest first.
///
/// The store hands entries over newest first; this reverses them once and
/// does not sort.
pub fn daily_cash_series(cash: &[CashEntry]) -> Vec<DailyCashPoint> {
    cash.iter()
        .map(|c| DailyCashPoint {
            label: day_month(c.date),
            thousands: c.total as f64 / 1000.0,
        })
        .rev()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthBucket {
    /// Short month name, e.g. "Mar". Years are not distinguished.
    pub name: &'static str,
    pub income: i64,
    pub expense: i64,
}

fn bucket<'a>(buckets: &'a mut Vec<MonthBucket>, name: &'static str) -> &'a mut MonthBucket {
    match buckets.iter().position(|b| b.name == name) {
        Some(i) => &mut buckets[i],
        None => {
            buckets.push(MonthBucket { name, income: 0, expense: 0 });
            let last = buckets.len() - 1;
            &mut buckets[last]
        }
    }
}

/// Income and expense per month name, buckets in first-seen order: cash
/// entries first, then kos transactions.
pub fn monthly_series(cash: &[CashEntry], kos: &[KosTransaction]) -> Vec<MonthBucket> {
    let mut buckets = Vec::new();
    for c in cash {
        bucket(&mut buckets, month_abbrev(c.date.month())).income += c.total;
    }
    for t in kos {
        let b = bucket(&mut buckets, month_abbrev(t.date.month()));
        b.income += t.receipt;
        b.expense += t.expense;
    }
    buckets
}

// ---------------------------------------------------------------------------
// Running balance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalancedRow<'a> {
    pub txn: &'a KosTransaction,
    pub balance: i64,
}

/// Cumulative receipts minus expenses, scanned left to right in the order
/// given. The caller owns the ordering.
pub fn running_balance(kos: &[KosTransaction]) -> Vec<BalancedRow<'_>> {
    kos.iter()
        .scan(0i64, |balance, txn| {
            *balance += txn.receipt - txn.expense;
            Some(BalancedRow { txn, balance: *balance })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Expense category shares
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category: ExpenseCategory,
    pub total: i64,
    /// Percent of the categorised expense total, 0-100.
    pub percent: f64,
}

pub fn category_shares(totals: &[CategoryTotal]) -> Vec<CategoryShare> {
    let sum: i64 = totals.iter().map(|c| c.total).sum();
    totals
        .iter()
        .map(|c| CategoryShare {
            category: c.category,
            total: c.total,
            percent: if sum == 0 { 0.0 } else { c.total as f64 * 100.0 / sum as f64 },
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

pub struct Dashboard {
    pub month: u32,
    pub summary: MonthlySummary,
    pub inventory: InventoryRollup,
    pub monthly: Vec<MonthBucket>,
    pub daily_cash: Vec<DailyCashPoint>,
    pub expense_categories: Vec<CategoryShare>,
}

pub fn dashboard(month: u32, snapshot: &Snapshot) -> Dashboard {
    Dashboard {
        month,
        summary: monthly_summary(month, &snapshot.cash, &snapshot.kos),
        inventory: inventory_rollup(&snapshot.items),
        monthly: monthly_series(&snapshot.cash, &snapshot.kos),
        daily_cash: daily_cash_series(&snapshot.cash),
        expense_categories: category_shares(&expense_breakdown(&snapshot.kos)),
    }
}

/// Keeps only cash entries and kos transactions dated in `year`. Items are
/// not dated and pass through untouched.
pub fn restrict_to_year(snapshot: &Snapshot, year: i32) -> Snapshot {
    Snapshot {
        items: snapshot.items.clone(),
        cash: snapshot.cash.iter().filter(|c| c.date.year() == year).cloned().collect(),
        kos: snapshot.kos.iter().filter(|t| t.date.year() == year).cloned().collect(),
    }
}

// ---------------------------------------------------------------------------
// Inventory report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockLevel {
    Critical,
    Low,
    Ok,
}

impl StockLevel {
    pub fn of(closing_stock: i64) -> Self {
        if closing_stock < CRITICAL_STOCK {
            StockLevel::Critical
        } else if closing_stock < LOW_STOCK {
            StockLevel::Low
        } else {
            StockLevel::Ok
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StockLevel::Critical => "Kritis",
            StockLevel::Low => "Menipis",
            StockLevel::Ok => "Aman",
        }
    }
}

pub struct InventoryReport<'a> {
    pub rows: Vec<&'a InventoryItem>,
    pub rollup: InventoryRollup,
}

/// Items whose name or code contains `search` (case-insensitive).
pub fn inventory_report<'a>(items: &'a [InventoryItem], search: Option<&str>) -> InventoryReport<'a> {
    let needle = search.map(str::to_lowercase).unwrap_or_default();
    let rows: Vec<&InventoryItem> = items
        .iter()
        .filter(|i| {
            needle.is_empty()
                || i.name.to_lowercase().contains(&needle)
                || i.code.to_lowercase().contains(&needle)
        })
        .collect();
    InventoryReport {
        rollup: rollup(rows.iter().copied()),
        rows,
    }
}

// ---------------------------------------------------------------------------
// Daily cash report
// ---------------------------------------------------------------------------

pub struct CashReport<'a> {
    pub rows: &'a [CashEntry],
    /// Column sums per denomination.
    pub count_totals: [i64; 8],
    pub grand_total: i64,
}

pub fn cash_report(cash: &[CashEntry]) -> CashReport<'_> {
    let mut count_totals = [0i64; 8];
    for entry in cash {
        for (sum, n) in count_totals.iter_mut().zip(entry.counts.counts()) {
            *sum += n;
        }
    }
    CashReport {
        rows: cash,
        count_totals,
        grand_total: cash.iter().map(|c| c.total).sum(),
    }
}

// ---------------------------------------------------------------------------
// Kos report
// ---------------------------------------------------------------------------

pub struct KosReport<'a> {
    pub rows: Vec<BalancedRow<'a>>,
    pub total_receipt: i64,
    pub total_expense: i64,
    pub balance: i64,
}

pub fn kos_report(kos: &[KosTransaction]) -> KosReport<'_> {
    let total_receipt: i64 = kos.iter().map(|t| t.receipt).sum();
    let total_expense: i64 = kos.iter().map(|t| t.expense).sum();
    KosReport {
        rows: running_balance(kos),
        total_receipt,
        total_expense,
        balance: total_receipt - total_expense,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::Denominations;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn cash(id: i64, date: NaiveDate, total: i64) -> CashEntry {
        CashEntry { id, date, counts: Denominations::default(), rice_purchase: None, barter: None, total }
    }

    fn kos(id: i64, date: NaiveDate, desc: &str, receipt: i64, expense: i64) -> KosTransaction {
        KosTransaction { id, date, description: desc.into(), receipt, expense }
    }

    fn item(code: &str, name: &str, closing: i64) -> InventoryItem {
        InventoryItem {
            id: 0,
            code: code.into(),
            name: name.into(),
            opening_stock: closing,
            stock_in: 0,
            stock_out: 0,
            transfer_note: None,
            closing_stock: closing,
            sale_price: 0,
            base_cost: 0,
        }
    }

    fn balances(rows: &[BalancedRow]) -> Vec<i64> {
        rows.iter().map(|r| r.balance).collect()
    }

    #[test]
    fn test_empty_snapshots_give_zero_summary() {
        assert_eq!(monthly_summary(3, &[], &[]), MonthlySummary::default());
    }

    #[test]
    fn test_monthly_summary_merges_income_sources() {
        let cash = vec![cash(1, date(2025, 3, 2), 400_000), cash(2, date(2025, 2, 28), 999)];
        let kos = vec![
            kos(1, date(2025, 3, 1), "Sewa kamar 1", 750_000, 0),
            kos(2, date(2025, 3, 10), "Bayar listrik", 0, 120_000),
            kos(3, date(2025, 4, 1), "Sewa kamar 2", 750_000, 0),
        ];
        let s = monthly_summary(3, &cash, &kos);
        assert_eq!(s.income, 1_150_000);
        assert_eq!(s.expense, 120_000);
        assert_eq!(s.net, 1_030_000);
    }

    #[test]
    fn test_monthly_summary_ignores_year() {
        let cash = vec![cash(1, date(2025, 3, 2), 100), cash(2, date(2024, 3, 2), 50)];
        assert_eq!(monthly_summary(3, &cash, &[]).income, 150);
    }

    #[test]
    fn test_inventory_rollup() {
        let items = vec![item("A", "a", 5), item("B", "b", 15), item("C", "c", 9)];
        let r = inventory_rollup(&items);
        assert_eq!(r.critical_count, 2);
        assert_eq!(r.total_units, 29);
        assert_eq!(r.item_count, 3);
        assert_eq!(inventory_rollup(&[]), InventoryRollup::default());
    }

    #[test]
    fn test_critical_threshold_is_strict() {
        let r = inventory_rollup(&[item("A", "a", 10)]);
        assert_eq!(r.critical_count, 0);
    }

    #[test]
    fn test_daily_series_reverses_without_sorting() {
        // Deliberately not in date order: output must be the exact reverse.
        let cash = vec![
            cash(1, date(2025, 3, 5), 250_000),
            cash(2, date(2025, 3, 7), 100_000),
            cash(3, date(2025, 3, 1), 1_500),
        ];
        let series = daily_cash_series(&cash);
        let labels: Vec<&str> = series.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["01/03", "07/03", "05/03"]);
        assert_eq!(series[0].thousands, 1.5);
        assert_eq!(series[2].thousands, 250.0);
    }

    #[test]
    fn test_monthly_series_merges_cash_and_kos() {
        let cash = vec![cash(1, date(2025, 3, 4), 100)];
        let kos = vec![kos(1, date(2025, 3, 9), "Sewa", 50, 30)];
        assert_eq!(
            monthly_series(&cash, &kos),
            vec![MonthBucket { name: "Mar", income: 150, expense: 30 }]
        );
    }

    #[test]
    fn test_monthly_series_bucket_order_and_year_collision() {
        let cash = vec![
            cash(1, date(2025, 4, 2), 10),
            cash(2, date(2025, 3, 2), 20),
            cash(3, date(2024, 4, 2), 5),
        ];
        let kos = vec![kos(1, date(2025, 1, 2), "Sewa", 7, 0)];
        let series = monthly_series(&cash, &kos);
        let names: Vec<&str> = series.iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["Apr", "Mar", "Jan"]);
        assert_eq!(series[0].income, 15);
        assert_eq!(series[2], MonthBucket { name: "Jan", income: 7, expense: 0 });
    }

    #[test]
    fn test_running_balance() {
        let d = date(2025, 1, 1);
        let kos = vec![kos(1, d, "a", 1000, 0), kos(2, d, "b", 0, 400), kos(3, d, "c", 200, 0)];
        let rows = running_balance(&kos);
        assert_eq!(balances(&rows), vec![1000, 600, 800]);
        assert_eq!(rows[1].txn.id, 2);
    }

    #[test]
    fn test_running_balance_is_idempotent() {
        let d = date(2025, 1, 1);
        let kos = vec![kos(1, d, "a", 1000, 0), kos(2, d, "b", 0, 400)];
        assert_eq!(running_balance(&kos), running_balance(&kos));
    }

    #[test]
    fn test_running_balance_depends_on_order() {
        let d = date(2025, 1, 1);
        let mut kos = vec![kos(1, d, "a", 1000, 0), kos(2, d, "b", 0, 400), kos(3, d, "c", 200, 0)];
        let forward = balances(&running_balance(&kos));
        kos.reverse();
        let backward = balances(&running_balance(&kos));
        assert_eq!(backward, vec![200, -200, 800]);
        assert_ne!(forward, backward);
    }

    #[test]
    fn test_running_balance_empty() {
        assert!(running_balance(&[]).is_empty());
    }

    #[test]
    fn test_dashboard_assembles_all_views() {
        let snapshot = Snapshot {
            items: vec![item("A", "a", 3)],
            cash: vec![cash(1, date(2025, 3, 4), 100_000)],
            kos: vec![kos(1, date(2025, 3, 9), "Bayar listrik bulan ini", 0, 50_000)],
        };
        let d = dashboard(3, &snapshot);
        assert_eq!(d.summary.net, 50_000);
        assert_eq!(d.inventory.critical_count, 1);
        assert_eq!(d.monthly.len(), 1);
        assert_eq!(d.daily_cash.len(), 1);
        assert_eq!(d.expense_categories[0].category, ExpenseCategory::Electricity);
    }

    #[test]
    fn test_category_shares() {
        let kos = vec![
            kos(1, date(2025, 3, 1), "Bayar listrik", 0, 60_000),
            kos(2, date(2025, 3, 2), "beli galon", 0, 20_000),
            kos(3, date(2025, 3, 3), "Tagihan wifi", 0, 20_000),
        ];
        let shares = category_shares(&expense_breakdown(&kos));
        let percents: Vec<f64> = shares.iter().map(|s| s.percent).collect();
        assert_eq!(percents, vec![60.0, 20.0, 20.0]);
        assert_eq!(shares[0].category, ExpenseCategory::Electricity);
        assert_eq!(shares[0].total, 60_000);
        assert!(category_shares(&[]).is_empty());
    }

    #[test]
    fn test_restrict_to_year() {
        let snapshot = Snapshot {
            items: vec![item("A", "a", 3)],
            cash: vec![cash(1, date(2025, 3, 4), 100), cash(2, date(2024, 3, 4), 50)],
            kos: vec![kos(1, date(2024, 3, 9), "Sewa", 10, 0)],
        };
        let scoped = restrict_to_year(&snapshot, 2025);
        assert_eq!(scoped.items.len(), 1);
        assert_eq!(scoped.cash.len(), 1);
        assert!(scoped.kos.is_empty());
        assert_eq!(monthly_summary(3, &scoped.cash, &scoped.kos).income, 100);
    }

    #[test]
    fn test_stock_levels() {
        assert_eq!(StockLevel::of(9), StockLevel::Critical);
        assert_eq!(StockLevel::of(10), StockLevel::Low);
        assert_eq!(StockLevel::of(24), StockLevel::Low);
        assert_eq!(StockLevel::of(25), StockLevel::Ok);
    }

    #[test]
    fn test_inventory_report_search() {
        let items = vec![item("B001", "Beras 5kg", 30), item("G001", "Gula Pasir", 4), item("M01", "Minyak", 12)];
        let report = inventory_report(&items, Some("gula"));
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rollup.critical_count, 1);
        let report = inventory_report(&items, Some("b0"));
        assert_eq!(report.rows[0].code, "B001");
        let report = inventory_report(&items, None);
        assert_eq!(report.rollup.total_units, 46);
    }

    #[test]
    fn test_inventory_report_rollup_matches_dashboard_rollup() {
        let items = vec![item("B001", "Beras 5kg", 30), item("G001", "Gula Pasir", 4), item("M01", "Minyak", 9)];
        let report = inventory_report(&items, None);
        assert_eq!(report.rollup, inventory_rollup(&items));
        assert_eq!(report.rollup.critical_count, 2);
    }

    #[test]
    fn test_cash_report_column_totals() {
        let mut a = cash(1, date(2025, 3, 2), 150_500);
        a.counts = Denominations([1, 1, 0, 0, 0, 0, 0, 1]);
        let mut b = cash(2, date(2025, 3, 1), 100_000);
        b.counts = Denominations([1, 0, 0, 0, 0, 0, 0, 0]);
        let entries = vec![a, b];
        let report = cash_report(&entries);
        assert_eq!(report.count_totals, [2, 1, 0, 0, 0, 0, 0, 1]);
        assert_eq!(report.grand_total, 250_500);
        assert_eq!(report.rows.len(), 2);
    }

    #[test]
    fn test_kos_report_totals() {
        let d = date(2025, 1, 1);
        let kos = vec![kos(1, d, "Sewa", 1000, 0), kos(2, d, "Wifi", 0, 400)];
        let report = kos_report(&kos);
        assert_eq!(report.total_receipt, 1000);
        assert_eq!(report.total_expense, 400);
        assert_eq!(report.balance, 600);
        assert_eq!(report.rows.last().map(|r| r.balance), Some(report.balance));
    }
}
