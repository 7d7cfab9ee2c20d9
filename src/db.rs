use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;

pub const DB_FILE: &str = "warung.db";

// Derived columns are computed by SQLite on every write; readers trust them.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS inventory_items (
    id INTEGER PRIMARY KEY,
    code TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    opening_stock INTEGER NOT NULL DEFAULT 0,
    stock_in INTEGER NOT NULL DEFAULT 0,
    stock_out INTEGER NOT NULL DEFAULT 0,
    transfer_note TEXT,
    closing_stock INTEGER GENERATED ALWAYS AS (opening_stock + stock_in - stock_out) STORED,
    sale_price INTEGER NOT NULL DEFAULT 0,
    base_cost INTEGER NOT NULL DEFAULT 0,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS cash_entries (
    id INTEGER PRIMARY KEY,
    date TEXT NOT NULL,
    n_100k INTEGER NOT NULL DEFAULT 0,
    n_50k INTEGER NOT NULL DEFAULT 0,
    n_20k INTEGER NOT NULL DEFAULT 0,
    n_10k INTEGER NOT NULL DEFAULT 0,
    n_5k INTEGER NOT NULL DEFAULT 0,
    n_2k INTEGER NOT NULL DEFAULT 0,
    n_1k INTEGER NOT NULL DEFAULT 0,
    n_500 INTEGER NOT NULL DEFAULT 0,
    rice_purchase INTEGER,
    barter INTEGER,
    total INTEGER GENERATED ALWAYS AS (
        n_100k * 100000 + n_50k * 50000 + n_20k * 20000 + n_10k * 10000
        + n_5k * 5000 + n_2k * 2000 + n_1k * 1000 + n_500 * 500
    ) STORED,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS kos_transactions (
    id INTEGER PRIMARY KEY,
    date TEXT NOT NULL,
    description TEXT NOT NULL,
    receipt INTEGER NOT NULL DEFAULT 0,
    expense INTEGER NOT NULL DEFAULT 0,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_cash_entries_date ON cash_entries(date);
CREATE INDEX IF NOT EXISTS idx_kos_transactions_date ON kos_transactions(date);
";

/// Denomination columns of `cash_entries`, in `models::DENOMINATIONS` order.
pub const DENOMINATION_COLUMNS: [&str; 8] =
    ["n_100k", "n_50k", "n_20k", "n_10k", "n_5k", "n_2k", "n_1k", "n_500"];

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn test_db() -> (tempfile::TempDir, Connection) {
    let dir = tempfile::tempdir().unwrap();
    let conn = get_connection(&dir.path().join("test.db")).unwrap();
    init_db(&conn).unwrap();
    (dir, conn)
}
