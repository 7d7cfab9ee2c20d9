use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::Context;
use crate::error::Result;
use crate::fmt::{number, rupiah};
use crate::models::{InventoryItemPatch, NewInventoryItem};
use crate::reports::{inventory_report, StockLevel};
use crate::store;

pub fn add(ctx: &Context, item: NewInventoryItem) -> Result<()> {
    let conn = ctx.open()?;
    let id = store::insert_item(&conn, &item)?;
    let saved = store::get_item(&conn, id)?;
    println!(
        "Added item {id}: {} {} (closing stock {})",
        saved.code,
        saved.name,
        number(saved.closing_stock)
    );
    Ok(())
}

pub(crate) fn level_cell(closing_stock: i64) -> Cell {
    let level = StockLevel::of(closing_stock);
    let text = format!("{} ({})", number(closing_stock), level.label());
    match level {
        StockLevel::Critical => Cell::new(text.red().bold()),
        StockLevel::Low => Cell::new(text.yellow()),
        StockLevel::Ok => Cell::new(text.green()),
    }
}

pub fn list(ctx: &Context, search: Option<&str>) -> Result<()> {
    let conn = ctx.open()?;
    let items = store::list_items(&conn)?;
    let report = inventory_report(&items, search);

    if report.rows.is_empty() {
        println!("No items found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Code", "Name", "Closing", "Sale Price", "Base Cost", "Transfer"]);
    for item in &report.rows {
        table.add_row(vec![
            Cell::new(item.id),
            Cell::new(&item.code),
            Cell::new(&item.name),
            level_cell(item.closing_stock),
            Cell::new(rupiah(item.sale_price)),
            Cell::new(rupiah(item.base_cost)),
            Cell::new(item.transfer_note.as_deref().unwrap_or("")),
        ]);
    }
    println!("Items ({})\n{table}", report.rows.len());
    Ok(())
}

pub fn update(ctx: &Context, id: i64, patch: InventoryItemPatch) -> Result<()> {
    let conn = ctx.open()?;
    store::update_item(&conn, id, &patch)?;
    let item = store::get_item(&conn, id)?;
    println!(
        "Updated item {id}: {} {} (closing stock {})",
        item.code,
        item.name,
        number(item.closing_stock)
    );
    Ok(())
}

pub fn delete(ctx: &Context, id: i64) -> Result<()> {
    let conn = ctx.open()?;
    let item = store::get_item(&conn, id)?;
    store::delete_item(&conn, id)?;
    println!("Deleted item {id}: {} {}", item.code, item.name);
    Ok(())
}
