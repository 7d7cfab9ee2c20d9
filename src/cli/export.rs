use std::path::{Path, PathBuf};

use crate::cli::{Context, ExportFormat};
use crate::error::{Result, WarungError};
use crate::models::DENOMINATION_LABELS;
use crate::reports::{self, CashReport, InventoryReport, KosReport, StockLevel};
use crate::store;

/// A rendered-but-not-yet-serialised report.
enum Document<'a> {
    Inventory(InventoryReport<'a>),
    Cash(CashReport<'a>),
    Kos(KosReport<'a>),
}

impl Document<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Document::Inventory(_) => "stok-barang",
            Document::Cash(_) => "kas-harian",
            Document::Kos(_) => "transaksi-kos",
        }
    }
}

fn default_name(doc: &Document, format: ExportFormat) -> String {
    let date = chrono::Local::now().format("%Y-%m-%d");
    format!("laporan-{}-{date}.{}", doc.kind(), format.extension())
}

fn write_bytes(bytes: &[u8], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "report written");
    println!("Wrote {}", path.display());
    Ok(())
}

fn csv_bytes(doc: &Document) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    match doc {
        Document::Inventory(report) => {
            wtr.write_record([
                "code", "name", "opening_stock", "stock_in", "stock_out",
                "closing_stock", "transfer_note", "sale_price", "base_cost", "level",
            ])?;
            for item in &report.rows {
                wtr.write_record([
                    item.code.clone(),
                    item.name.clone(),
                    item.opening_stock.to_string(),
                    item.stock_in.to_string(),
                    item.stock_out.to_string(),
                    item.closing_stock.to_string(),
                    item.transfer_note.clone().unwrap_or_default(),
                    item.sale_price.to_string(),
                    item.base_cost.to_string(),
                    StockLevel::of(item.closing_stock).label().to_string(),
                ])?;
            }
        }
        Document::Cash(report) => {
            let mut header = vec!["date"];
            header.extend(DENOMINATION_LABELS);
            header.extend(["rice_purchase", "barter", "total"]);
            wtr.write_record(&header)?;
            for e in report.rows {
                let mut row = vec![e.date.to_string()];
                row.extend(e.counts.counts().iter().map(i64::to_string));
                row.push(e.rice_purchase.map(|v| v.to_string()).unwrap_or_default());
                row.push(e.barter.map(|v| v.to_string()).unwrap_or_default());
                row.push(e.total.to_string());
                wtr.write_record(&row)?;
            }
            let mut footer = vec!["TOTAL".to_string()];
            footer.extend(report.count_totals.iter().map(i64::to_string));
            footer.extend([String::new(), String::new(), report.grand_total.to_string()]);
            wtr.write_record(&footer)?;
        }
        Document::Kos(report) => {
            wtr.write_record(["date", "description", "receipt", "expense", "balance"])?;
            for row in &report.rows {
                wtr.write_record([
                    row.txn.date.to_string(),
                    row.txn.description.clone(),
                    row.txn.receipt.to_string(),
                    row.txn.expense.to_string(),
                    row.balance.to_string(),
                ])?;
            }
            wtr.write_record([
                "TOTAL".to_string(),
                String::new(),
                report.total_receipt.to_string(),
                report.total_expense.to_string(),
                report.balance.to_string(),
            ])?;
        }
    }
    wtr.into_inner().map_err(|e| WarungError::Io(e.into_error()))
}

#[cfg(feature = "pdf")]
fn pdf_bytes(ctx: &Context, doc: &Document) -> Result<Vec<u8>> {
    match doc {
        Document::Inventory(r) => crate::pdf::render_inventory(r, &ctx.settings.business_name),
        Document::Cash(r) => crate::pdf::render_cash(r, &ctx.settings.business_name),
        Document::Kos(r) => crate::pdf::render_kos(r, &ctx.settings.kos_name),
    }
}

#[cfg(not(feature = "pdf"))]
fn pdf_bytes(_ctx: &Context, _doc: &Document) -> Result<Vec<u8>> {
    Err(WarungError::Other(
        "PDF export is not available in this build. Use --format csv.".into(),
    ))
}

fn export(ctx: &Context, doc: &Document, format: ExportFormat, path: &Path) -> Result<()> {
    let bytes = match format {
        ExportFormat::Pdf => pdf_bytes(ctx, doc)?,
        ExportFormat::Csv => csv_bytes(doc)?,
    };
    write_bytes(&bytes, path)
}

fn target(ctx: &Context, doc: &Document, format: ExportFormat, output: Option<&str>) -> PathBuf {
    match output {
        Some(p) => PathBuf::from(p),
        None => ctx.exports_dir().join(default_name(doc, format)),
    }
}

pub fn inventory(
    ctx: &Context,
    search: Option<&str>,
    format: ExportFormat,
    output: Option<&str>,
) -> Result<PathBuf> {
    let conn = ctx.open()?;
    let items = store::list_items(&conn)?;
    let doc = Document::Inventory(reports::inventory_report(&items, search));
    let path = target(ctx, &doc, format, output);
    export(ctx, &doc, format, &path)?;
    Ok(path)
}

pub fn cash(ctx: &Context, format: ExportFormat, output: Option<&str>) -> Result<PathBuf> {
    let conn = ctx.open()?;
    let entries = store::list_cash(&conn)?;
    let doc = Document::Cash(reports::cash_report(&entries));
    let path = target(ctx, &doc, format, output);
    export(ctx, &doc, format, &path)?;
    Ok(path)
}

pub fn kos(ctx: &Context, format: ExportFormat, output: Option<&str>) -> Result<PathBuf> {
    let conn = ctx.open()?;
    let txns = store::list_kos(&conn)?;
    let doc = Document::Kos(reports::kos_report(&txns));
    let path = target(ctx, &doc, format, output);
    export(ctx, &doc, format, &path)?;
    Ok(path)
}

/// Writes all three reports into `output_dir` (default: the exports folder).
pub fn all(ctx: &Context, format: ExportFormat, output_dir: Option<&str>) -> Result<Vec<PathBuf>> {
    let dir = output_dir.map(PathBuf::from).unwrap_or_else(|| ctx.exports_dir());
    let conn = ctx.open()?;
    let snapshot = store::load_snapshot(&conn)?;

    let docs = [
        Document::Inventory(reports::inventory_report(&snapshot.items, None)),
        Document::Cash(reports::cash_report(&snapshot.cash)),
        Document::Kos(reports::kos_report(&snapshot.kos)),
    ];
    let mut paths = Vec::with_capacity(docs.len());
    for doc in &docs {
        let path = dir.join(default_name(doc, format));
        export(ctx, doc, format, &path)?;
        paths.push(path);
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_connection, init_db};
    use crate::models::{NewCashEntry, NewInventoryItem, NewKosTransaction, Denominations};
    use crate::settings::Settings;
    use chrono::NaiveDate;

    fn seeded_ctx() -> (tempfile::TempDir, Context) {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::new(Settings::default(), dir.path().to_str());
        let conn = get_connection(&ctx.db_path()).unwrap();
        init_db(&conn).unwrap();
        store::insert_item(
            &conn,
            &NewInventoryItem {
                code: "B001".into(),
                name: "Beras, 5kg".into(),
                opening_stock: 20,
                stock_in: 5,
                stock_out: 3,
                sale_price: 72_000,
                ..Default::default()
            },
        )
        .unwrap();
        store::insert_cash(
            &conn,
            &NewCashEntry {
                date: NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
                counts: Denominations([1, 0, 0, 0, 0, 0, 0, 2]),
                rice_purchase: Some(50_000),
                barter: None,
            },
        )
        .unwrap();
        for (d, desc, r, e) in [(1, "Sewa kamar 1", 500_000, 0), (3, "Bayar listrik", 0, 150_000)] {
            store::insert_kos(
                &conn,
                &NewKosTransaction {
                    date: NaiveDate::from_ymd_opt(2025, 3, d).unwrap(),
                    description: desc.into(),
                    receipt: r,
                    expense: e,
                },
            )
            .unwrap();
        }
        (dir, ctx)
    }

    #[test]
    fn test_inventory_csv_quotes_and_levels() {
        let (_dir, ctx) = seeded_ctx();
        let path = inventory(&ctx, None, ExportFormat::Csv, None).unwrap();
        assert!(path.starts_with(ctx.exports_dir()));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("laporan-stok-barang-") && name.ends_with(".csv"));

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("code,name,opening_stock"));
        assert_eq!(lines.next().unwrap(), "B001,\"Beras, 5kg\",20,5,3,22,,72000,0,Menipis");
    }

    #[test]
    fn test_cash_csv_footer_excludes_side_amounts() {
        let (dir, ctx) = seeded_ctx();
        let out = dir.path().join("kas.csv");
        cash(&ctx, ExportFormat::Csv, out.to_str()).unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], "2025-03-02,1,0,0,0,0,0,0,2,50000,,101000");
        assert_eq!(rows[2], "TOTAL,1,0,0,0,0,0,0,2,,,101000");
    }

    #[test]
    fn test_kos_csv_running_balance() {
        let (dir, ctx) = seeded_ctx();
        let out = dir.path().join("nested").join("kos.csv");
        kos(&ctx, ExportFormat::Csv, out.to_str()).unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows[1], "2025-03-01,Sewa kamar 1,500000,0,500000");
        assert_eq!(rows[2], "2025-03-03,Bayar listrik,0,150000,350000");
        assert_eq!(rows[3], "TOTAL,,500000,150000,350000");
    }

    #[test]
    fn test_all_writes_three_files() {
        let (dir, ctx) = seeded_ctx();
        let out_dir = dir.path().join("bundle");
        let paths = all(&ctx, ExportFormat::Csv, out_dir.to_str()).unwrap();
        assert_eq!(paths.len(), 3);
        for p in &paths {
            assert!(p.exists());
            assert!(p.starts_with(&out_dir));
        }
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn test_pdf_export() {
        let (_dir, ctx) = seeded_ctx();
        let path = kos(&ctx, ExportFormat::Pdf, None).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
