use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::Context;
use crate::error::Result;
use crate::fmt::{long_date, rupiah, rupiah_or_dash};
use crate::models::{KosTransactionPatch, NewKosTransaction};
use crate::reports::kos_report;
use crate::store;

pub fn add(
    ctx: &Context,
    date: Option<chrono::NaiveDate>,
    description: String,
    receipt: i64,
    expense: i64,
) -> Result<()> {
    let conn = ctx.open()?;
    let txn = NewKosTransaction {
        date: date.unwrap_or_else(|| chrono::Local::now().date_naive()),
        description,
        receipt,
        expense,
    };
    let id = store::insert_kos(&conn, &txn)?;
    println!("Added kos transaction {id}: {} on {}", txn.description, long_date(txn.date));
    Ok(())
}

pub(crate) fn balance_cell(balance: i64) -> Cell {
    if balance >= 0 {
        Cell::new(rupiah(balance).green().to_string())
    } else {
        Cell::new(rupiah(balance).red().to_string())
    }
}

pub fn list(ctx: &Context) -> Result<()> {
    let conn = ctx.open()?;
    let txns = store::list_kos(&conn)?;

    if txns.is_empty() {
        println!("No kos transactions.");
        return Ok(());
    }

    let report = kos_report(&txns);
    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Description", "Receipt", "Expense", "Balance"]);
    for row in &report.rows {
        table.add_row(vec![
            Cell::new(row.txn.id),
            Cell::new(row.txn.date),
            Cell::new(&row.txn.description),
            Cell::new(rupiah_or_dash(row.txn.receipt)),
            Cell::new(rupiah_or_dash(row.txn.expense)),
            balance_cell(row.balance),
        ]);
    }
    println!("Kos Transactions ({})\n{table}", txns.len());
    Ok(())
}

pub fn update(ctx: &Context, id: i64, patch: KosTransactionPatch) -> Result<()> {
    let conn = ctx.open()?;
    store::update_kos(&conn, id, &patch)?;
    let txn = store::get_kos(&conn, id)?;
    println!("Updated kos transaction {id}: {} on {}", txn.description, long_date(txn.date));
    Ok(())
}

pub fn delete(ctx: &Context, id: i64) -> Result<()> {
    let conn = ctx.open()?;
    let txn = store::get_kos(&conn, id)?;
    store::delete_kos(&conn, id)?;
    println!("Deleted kos transaction {id}: {}", txn.description);
    Ok(())
}
