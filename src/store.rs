use rusqlite::types::ToSql;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row};

use crate::db::DENOMINATION_COLUMNS;
use crate::error::{Result, WarungError};
use crate::models::*;

const ITEM_COLUMNS: &str = "id, code, name, opening_stock, stock_in, stock_out, transfer_note, \
                            closing_stock, sale_price, base_cost";
const CASH_COLUMNS: &str = "id, date, n_100k, n_50k, n_20k, n_10k, n_5k, n_2k, n_1k, n_500, \
                            rice_purchase, barter, total";
const KOS_COLUMNS: &str = "id, date, description, receipt, expense";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Collects `column = ?n` assignments for the fields a patch actually sets.
#[derive(Default)]
struct Assignments<'a> {
    sets: Vec<String>,
    values: Vec<&'a dyn ToSql>,
}

impl<'a> Assignments<'a> {
    fn push<T: ToSql>(&mut self, column: &str, value: &'a Option<T>) {
        if let Some(v) = value {
            self.values.push(v);
            self.sets.push(format!("{column} = ?{}", self.values.len()));
        }
    }

    /// Runs the UPDATE. Returns `NotFound` when no row has `id`.
    fn apply(mut self, conn: &Connection, table: &str, kind: &'static str, id: &'a i64) -> Result<()> {
        if self.sets.is_empty() {
            let exists: Option<i64> = conn
                .query_row(&format!("SELECT id FROM {table} WHERE id = ?1"), [id], |r| r.get(0))
                .optional()?;
            return exists.map(|_| ()).ok_or(WarungError::NotFound { kind, id: *id });
        }
        self.values.push(id);
        let sql = format!(
            "UPDATE {table} SET {} WHERE id = ?{}",
            self.sets.join(", "),
            self.values.len()
        );
        let changed = conn.execute(&sql, self.values.as_slice())?;
        if changed == 0 {
            return Err(WarungError::NotFound { kind, id: *id });
        }
        tracing::debug!(table, id, fields = self.sets.len(), "updated row");
        Ok(())
    }
}

fn delete_row(conn: &Connection, table: &str, kind: &'static str, id: i64) -> Result<()> {
    let changed = conn.execute(&format!("DELETE FROM {table} WHERE id = ?1"), [id])?;
    if changed == 0 {
        return Err(WarungError::NotFound { kind, id });
    }
    tracing::debug!(table, id, "deleted row");
    Ok(())
}

fn map_duplicate(err: rusqlite::Error, code: &str) -> WarungError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
            WarungError::DuplicateCode(code.to_string())
        }
        _ => WarungError::Db(err),
    }
}

// ---------------------------------------------------------------------------
// Inventory items
// ---------------------------------------------------------------------------

fn item_from_row(row: &Row) -> rusqlite::Result<InventoryItem> {
    Ok(InventoryItem {
        id: row.get(0)?,
        code: row.get(1)?,
        name: row.get(2)?,
        opening_stock: row.get(3)?,
        stock_in: row.get(4)?,
        stock_out: row.get(5)?,
        transfer_note: row.get(6)?,
        closing_stock: row.get(7)?,
        sale_price: row.get(8)?,
        base_cost: row.get(9)?,
    })
}

pub fn list_items(conn: &Connection) -> Result<Vec<InventoryItem>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ITEM_COLUMNS} FROM inventory_items ORDER BY code ASC"
    ))?;
    let rows = stmt
        .query_map([], item_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn get_item(conn: &Connection, id: i64) -> Result<InventoryItem> {
    conn.query_row(
        &format!("SELECT {ITEM_COLUMNS} FROM inventory_items WHERE id = ?1"),
        [id],
        item_from_row,
    )
    .optional()?
    .ok_or(WarungError::NotFound { kind: "item", id })
}

pub fn insert_item(conn: &Connection, item: &NewInventoryItem) -> Result<i64> {
    item.validate()?;
    conn.execute(
        "INSERT INTO inventory_items \
         (code, name, opening_stock, stock_in, stock_out, transfer_note, sale_price, base_cost) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            item.code,
            item.name,
            item.opening_stock,
            item.stock_in,
            item.stock_out,
            item.transfer_note,
            item.sale_price,
            item.base_cost,
        ],
    )
    .map_err(|e| map_duplicate(e, &item.code))?;
    let id = conn.last_insert_rowid();
    tracing::debug!(id, code = %item.code, "inserted inventory item");
    Ok(id)
}

pub fn update_item(conn: &Connection, id: i64, patch: &InventoryItemPatch) -> Result<()> {
    patch.validate()?;
    let mut a = Assignments::default();
    a.push("code", &patch.code);
    a.push("name", &patch.name);
    a.push("opening_stock", &patch.opening_stock);
    a.push("stock_in", &patch.stock_in);
    a.push("stock_out", &patch.stock_out);
    a.push("transfer_note", &patch.transfer_note);
    a.push("sale_price", &patch.sale_price);
    a.push("base_cost", &patch.base_cost);
    a.apply(conn, "inventory_items", "item", &id).map_err(|e| match (e, &patch.code) {
        (WarungError::Db(db), Some(code)) => map_duplicate(db, code),
        (e, _) => e,
    })
}

pub fn delete_item(conn: &Connection, id: i64) -> Result<()> {
    delete_row(conn, "inventory_items", "item", id)
}

// ---------------------------------------------------------------------------
// Cash entries
// ---------------------------------------------------------------------------

fn cash_from_row(row: &Row) -> rusqlite::Result<CashEntry> {
    let mut counts = [0i64; 8];
    for (i, n) in counts.iter_mut().enumerate() {
        *n = row.get(2 + i)?;
    }
    Ok(CashEntry {
        id: row.get(0)?,
        date: row.get(1)?,
        counts: Denominations(counts),
        rice_purchase: row.get(10)?,
        barter: row.get(11)?,
        total: row.get(12)?,
    })
}

/// Newest first.
pub fn list_cash(conn: &Connection) -> Result<Vec<CashEntry>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CASH_COLUMNS} FROM cash_entries ORDER BY date DESC, id DESC"
    ))?;
    let rows = stmt
        .query_map([], cash_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn get_cash(conn: &Connection, id: i64) -> Result<CashEntry> {
    conn.query_row(
        &format!("SELECT {CASH_COLUMNS} FROM cash_entries WHERE id = ?1"),
        [id],
        cash_from_row,
    )
    .optional()?
    .ok_or(WarungError::NotFound { kind: "cash entry", id })
}

pub fn insert_cash(conn: &Connection, entry: &NewCashEntry) -> Result<i64> {
    entry.validate()?;
    let c = entry.counts.counts();
    conn.execute(
        "INSERT INTO cash_entries \
         (date, n_100k, n_50k, n_20k, n_10k, n_5k, n_2k, n_1k, n_500, rice_purchase, barter) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        rusqlite::params![
            entry.date,
            c[0],
            c[1],
            c[2],
            c[3],
            c[4],
            c[5],
            c[6],
            c[7],
            entry.rice_purchase,
            entry.barter,
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::debug!(id, date = %entry.date, "inserted cash entry");
    Ok(id)
}

pub fn update_cash(conn: &Connection, id: i64, patch: &CashEntryPatch) -> Result<()> {
    patch.validate()?;
    let mut a = Assignments::default();
    a.push("date", &patch.date);
    for (column, count) in DENOMINATION_COLUMNS.iter().zip(&patch.counts) {
        a.push(column, count);
    }
    a.push("rice_purchase", &patch.rice_purchase);
    a.push("barter", &patch.barter);
    a.apply(conn, "cash_entries", "cash entry", &id)
}

pub fn delete_cash(conn: &Connection, id: i64) -> Result<()> {
    delete_row(conn, "cash_entries", "cash entry", id)
}

// ---------------------------------------------------------------------------
// Kos transactions
// ---------------------------------------------------------------------------

fn kos_from_row(row: &Row) -> rusqlite::Result<KosTransaction> {
    Ok(KosTransaction {
        id: row.get(0)?,
        date: row.get(1)?,
        description: row.get(2)?,
        receipt: row.get(3)?,
        expense: row.get(4)?,
    })
}

/// Oldest first; the running balance depends on this order.
pub fn list_kos(conn: &Connection) -> Result<Vec<KosTransaction>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {KOS_COLUMNS} FROM kos_transactions ORDER BY date ASC, id ASC"
    ))?;
    let rows = stmt
        .query_map([], kos_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn get_kos(conn: &Connection, id: i64) -> Result<KosTransaction> {
    conn.query_row(
        &format!("SELECT {KOS_COLUMNS} FROM kos_transactions WHERE id = ?1"),
        [id],
        kos_from_row,
    )
    .optional()?
    .ok_or(WarungError::NotFound { kind: "kos transaction", id })
}

pub fn insert_kos(conn: &Connection, txn: &NewKosTransaction) -> Result<i64> {
    txn.validate()?;
    conn.execute(
        "INSERT INTO kos_transactions (date, description, receipt, expense) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![txn.date, txn.description, txn.receipt, txn.expense],
    )?;
    let id = conn.last_insert_rowid();
    tracing::debug!(id, date = %txn.date, "inserted kos transaction");
    Ok(id)
}

pub fn update_kos(conn: &Connection, id: i64, patch: &KosTransactionPatch) -> Result<()> {
    patch.validate()?;
    let mut a = Assignments::default();
    a.push("date", &patch.date);
    a.push("description", &patch.description);
    a.push("receipt", &patch.receipt);
    a.push("expense", &patch.expense);
    a.apply(conn, "kos_transactions", "kos transaction", &id)
}

pub fn delete_kos(conn: &Connection, id: i64) -> Result<()> {
    delete_row(conn, "kos_transactions", "kos transaction", id)
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

pub fn load_snapshot(conn: &Connection) -> Result<Snapshot> {
    Ok(Snapshot {
        items: list_items(conn)?,
        cash: list_cash(conn)?,
        kos: list_kos(conn)?,
    })
}
