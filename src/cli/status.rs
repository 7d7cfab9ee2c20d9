use crate::cli::Context;
use crate::error::Result;
use crate::settings::settings_path;

pub fn run(ctx: &Context) -> Result<()> {
    let db_path = ctx.db_path();

    println!("Business:   {}", ctx.settings.business_name);
    println!("Kos:        {}", ctx.settings.kos_name);
    println!("Settings:   {}", settings_path().display());
    println!("Data dir:   {}", ctx.data_dir.display());
    println!("Database:   {}", db_path.display());

    if db_path.exists() {
        let conn = ctx.open()?;
        let count = |table: &str| -> Result<i64> {
            Ok(conn.query_row(&format!("SELECT count(*) FROM {table}"), [], |r| r.get(0))?)
        };

        println!();
        println!("Items:         {}", count("inventory_items")?);
        println!("Cash entries:  {}", count("cash_entries")?);
        println!("Kos entries:   {}", count("kos_transactions")?);
    } else {
        println!();
        println!("Database not found. Run `warung init` to set up.");
    }

    Ok(())
}
