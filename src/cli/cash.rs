use comfy_table::{Cell, Table};

use crate::cli::{Context, CountArgs};
use crate::error::Result;
use crate::fmt::{long_date, rupiah};
use crate::models::{CashEntryPatch, Denominations, NewCashEntry, DENOMINATION_LABELS};
use crate::store;

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn add(
    ctx: &Context,
    date: Option<chrono::NaiveDate>,
    counts: &CountArgs,
    rice: Option<i64>,
    barter: Option<i64>,
) -> Result<()> {
    let conn = ctx.open()?;
    let entry = NewCashEntry {
        date: date.unwrap_or_else(today),
        counts: Denominations(counts.as_array().map(|n| n.unwrap_or(0))),
        rice_purchase: rice,
        barter,
    };
    let id = store::insert_cash(&conn, &entry)?;
    let saved = store::get_cash(&conn, id)?;
    println!("Added cash entry {id} for {}: {}", long_date(saved.date), rupiah(saved.total));
    Ok(())
}

pub fn list(ctx: &Context) -> Result<()> {
    let conn = ctx.open()?;
    let entries = store::list_cash(&conn)?;

    if entries.is_empty() {
        println!("No cash entries.");
        return Ok(());
    }

    let mut header = vec!["ID", "Date"];
    header.extend(DENOMINATION_LABELS);
    header.extend(["Beras", "Barter", "Total"]);

    let mut table = Table::new();
    table.set_header(header);
    for e in &entries {
        let mut row = vec![Cell::new(e.id), Cell::new(e.date)];
        row.extend(e.counts.counts().iter().map(Cell::new));
        row.push(Cell::new(e.rice_purchase.map(rupiah).unwrap_or_default()));
        row.push(Cell::new(e.barter.map(rupiah).unwrap_or_default()));
        row.push(Cell::new(rupiah(e.total)));
        table.add_row(row);
    }
    println!("Cash Entries ({})\n{table}", entries.len());
    Ok(())
}

pub fn update(ctx: &Context, id: i64, patch: CashEntryPatch) -> Result<()> {
    let conn = ctx.open()?;
    store::update_cash(&conn, id, &patch)?;
    let entry = store::get_cash(&conn, id)?;
    println!("Updated cash entry {id} for {}: {}", long_date(entry.date), rupiah(entry.total));
    Ok(())
}

pub fn delete(ctx: &Context, id: i64) -> Result<()> {
    let conn = ctx.open()?;
    let entry = store::get_cash(&conn, id)?;
    store::delete_cash(&conn, id)?;
    println!("Deleted cash entry {id} for {}", long_date(entry.date));
    Ok(())
}
