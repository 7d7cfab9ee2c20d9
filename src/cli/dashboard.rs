use chrono::Datelike;
use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::Context;
use crate::error::Result;
use crate::fmt::{month_name, rupiah, rupiah_short};
use crate::reports::{self, Dashboard};
use crate::store;

pub fn run(ctx: &Context, month: Option<u32>, year: Option<i32>) -> Result<()> {
    let conn = ctx.open()?;
    let mut snapshot = store::load_snapshot(&conn)?;
    if let Some(y) = year {
        snapshot = reports::restrict_to_year(&snapshot, y);
    }
    let month = month.unwrap_or_else(|| chrono::Local::now().month());
    let data = reports::dashboard(month, &snapshot);

    let scope = match year {
        Some(y) => format!("{} {y}", month_name(data.month)),
        None => month_name(data.month).to_string(),
    };
    println!("{} - {scope}\n", ctx.settings.business_name.bold());
    print_cards(&data);
    print_monthly(&data);
    print_daily(&data);
    print_categories(&data, &ctx.settings.kos_name);
    Ok(())
}

fn print_cards(data: &Dashboard) {
    let s = &data.summary;
    let inv = &data.inventory;
    let profit = if s.net >= 0 {
        rupiah_short(s.net).green().bold().to_string()
    } else {
        rupiah_short(s.net).red().bold().to_string()
    };
    let critical = if inv.critical_count > 0 {
        format!("{} item", inv.critical_count).red().bold().to_string()
    } else {
        format!("{} item", inv.critical_count)
    };

    let mut table = Table::new();
    table.set_header(vec!["", "Value", "Detail"]);
    table.add_row(vec![
        Cell::new("Income (this month)"),
        Cell::new(rupiah_short(s.income)),
        Cell::new("Shop cash + kos receipts"),
    ]);
    table.add_row(vec![
        Cell::new("Profit (this month)"),
        Cell::new(profit),
        Cell::new(format!("Income - kos expenses ({})", rupiah(s.expense))),
    ]);
    table.add_row(vec![
        Cell::new("Stock units"),
        Cell::new(inv.total_units),
        Cell::new(format!("{} kinds of goods", inv.item_count)),
    ]);
    table.add_row(vec![
        Cell::new("Critical stock"),
        Cell::new(critical),
        Cell::new(format!("Below {} units", reports::CRITICAL_STOCK)),
    ]);
    println!("{table}");
}

fn print_monthly(data: &Dashboard) {
    if data.monthly.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec!["Month", "Income", "Expense"]);
    for b in &data.monthly {
        table.add_row(vec![
            Cell::new(b.name),
            Cell::new(rupiah(b.income)),
            Cell::new(rupiah(b.expense)),
        ]);
    }
    println!("\nIncome vs Expense\n{table}");
}

fn print_daily(data: &Dashboard) {
    if data.daily_cash.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec!["Date", "Cash In (thousands)"]);
    for p in &data.daily_cash {
        table.add_row(vec![Cell::new(&p.label), Cell::new(format!("{:.1}", p.thousands))]);
    }
    println!("\nDaily Cash\n{table}");
}

fn print_categories(data: &Dashboard, kos_name: &str) {
    if data.expense_categories.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec!["Category", "Amount", "%"]);
    for c in &data.expense_categories {
        table.add_row(vec![
            Cell::new(c.category.label()),
            Cell::new(rupiah(c.total)),
            Cell::new(format!("{:.0}%", c.percent)),
        ]);
    }
    println!("\nExpense Categories - {kos_name}\n{table}");
}
