use crate::cli::Context;
use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::settings::save_settings;

pub fn run(ctx: &Context, business_name: Option<String>, kos_name: Option<String>) -> Result<()> {
    let mut settings = ctx.settings.clone();
    if let Some(name) = business_name {
        settings.business_name = name;
    }
    if let Some(name) = kos_name {
        settings.kos_name = name;
    }
    save_settings(&settings)?;

    std::fs::create_dir_all(&ctx.data_dir)?;
    std::fs::create_dir_all(ctx.exports_dir())?;

    let conn = get_connection(&ctx.db_path())?;
    init_db(&conn)?;

    tracing::info!(path = %ctx.db_path().display(), "database ready");
    println!("Initialized warung at {}", ctx.data_dir.display());
    Ok(())
}
