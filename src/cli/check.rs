use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::audit;
use crate::cli::Context;
use crate::error::Result;
use crate::fmt::number;
use crate::store;

pub fn run(ctx: &Context) -> Result<()> {
    let conn = ctx.open()?;
    let snapshot = store::load_snapshot(&conn)?;
    let result = audit::check(&snapshot);

    if result.is_clean() {
        println!(
            "{}",
            format!("All {} records consistent.", result.checked).green()
        );
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Kind", "ID", "Reference", "Stored", "Expected", "Difference"]);
    for m in &result.mismatches {
        table.add_row(vec![
            Cell::new(m.kind.label()),
            Cell::new(m.id),
            Cell::new(&m.reference),
            Cell::new(number(m.stored)),
            Cell::new(number(m.expected)),
            Cell::new(number(m.discrepancy()).red().to_string()),
        ]);
    }
    println!(
        "{}\n{table}",
        format!("{} of {} records disagree with their inputs.", result.mismatches.len(), result.checked)
            .red()
            .bold()
    );
    Ok(())
}
