use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::items::level_cell;
use crate::cli::kos::balance_cell;
use crate::cli::Context;
use crate::error::Result;
use crate::fmt::{long_date, number, rupiah, rupiah_or_dash};
use crate::models::DENOMINATION_LABELS;
use crate::reports;
use crate::store;

pub fn inventory(ctx: &Context, search: Option<&str>) -> Result<()> {
    let conn = ctx.open()?;
    let items = store::list_items(&conn)?;
    let data = reports::inventory_report(&items, search);

    let mut table = Table::new();
    table.set_header(vec!["Code", "Name", "Opening", "In", "Out", "Closing", "Sale Price"]);
    for item in &data.rows {
        table.add_row(vec![
            Cell::new(&item.code),
            Cell::new(&item.name),
            Cell::new(number(item.opening_stock)),
            Cell::new(number(item.stock_in)),
            Cell::new(number(item.stock_out)),
            level_cell(item.closing_stock),
            Cell::new(rupiah(item.sale_price)),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(format!("{} items", data.rollup.item_count)),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(number(data.rollup.total_units)),
        Cell::new(""),
    ]);
    println!("Stock Report - {}\n{table}", ctx.settings.business_name);
    if data.rollup.critical_count > 0 {
        println!(
            "{}",
            format!("{} item(s) below {} units", data.rollup.critical_count, reports::CRITICAL_STOCK).red()
        );
    }
    Ok(())
}

pub fn cash(ctx: &Context) -> Result<()> {
    let conn = ctx.open()?;
    let entries = store::list_cash(&conn)?;
    let data = reports::cash_report(&entries);

    let mut header = vec!["Date"];
    header.extend(DENOMINATION_LABELS);
    header.push("Total");

    let mut table = Table::new();
    table.set_header(header);
    for e in data.rows {
        let mut row = vec![Cell::new(long_date(e.date))];
        row.extend(e.counts.counts().iter().map(|n| Cell::new(number(*n))));
        row.push(Cell::new(rupiah(e.total)));
        table.add_row(row);
    }
    let mut footer = vec![Cell::new("Total".bold())];
    footer.extend(data.count_totals.iter().map(|n| Cell::new(number(*n))));
    footer.push(Cell::new(rupiah(data.grand_total).bold()));
    table.add_row(footer);

    println!("Daily Cash Report - {}\n{table}", ctx.settings.business_name);
    Ok(())
}

pub fn kos(ctx: &Context) -> Result<()> {
    let conn = ctx.open()?;
    let txns = store::list_kos(&conn)?;
    let data = reports::kos_report(&txns);

    let mut table = Table::new();
    table.set_header(vec!["Date", "Description", "Receipt", "Expense", "Balance"]);
    for row in &data.rows {
        table.add_row(vec![
            Cell::new(long_date(row.txn.date)),
            Cell::new(&row.txn.description),
            Cell::new(rupiah_or_dash(row.txn.receipt)),
            Cell::new(rupiah_or_dash(row.txn.expense)),
            balance_cell(row.balance),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(""),
        Cell::new(rupiah(data.total_receipt)),
        Cell::new(rupiah(data.total_expense)),
        balance_cell(data.balance),
    ]);
    println!("Kos Ledger - {}\n{table}", ctx.settings.kos_name);
    Ok(())
}
