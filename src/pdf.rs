use std::io::BufWriter;

use printpdf::*;

use crate::error::{Result, WarungError};
use crate::fmt::{long_date, number, rupiah, rupiah_or_dash};
use crate::models::DENOMINATION_LABELS;
use crate::reports::{CashReport, InventoryReport, KosReport};

// A4 portrait dimensions (mm); landscape swaps them.
const A4_SHORT: f32 = 210.0;
const A4_LONG: f32 = 297.0;
const MARGIN_TOP: f32 = 20.0;
const MARGIN_BOTTOM: f32 = 20.0;
const MARGIN_LEFT: f32 = 14.0;
const MARGIN_RIGHT: f32 = 14.0;
const ROW_H: f32 = 5.5;
const FONT_SIZE: f32 = 9.0;
const TITLE_SIZE: f32 = 15.0;
const SUBTITLE_SIZE: f32 = 10.0;

fn approx_text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.18
}

#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
}

struct Col {
    width: f32,
    align: Align,
}

fn pdf_err<E: std::fmt::Debug>(e: E) -> WarungError {
    WarungError::Pdf(format!("{e:?}"))
}

struct PdfWriter {
    doc: PdfDocumentReference,
    font: IndirectFontRef,
    font_bold: IndirectFontRef,
    current_page: PdfPageIndex,
    current_layer: PdfLayerIndex,
    page_w: f32,
    page_h: f32,
    y: f32,
}

impl PdfWriter {
    fn new(title: &str, landscape: bool) -> Result<Self> {
        let (page_w, page_h) = if landscape { (A4_LONG, A4_SHORT) } else { (A4_SHORT, A4_LONG) };
        let (doc, page, layer) = PdfDocument::new(title, Mm(page_w), Mm(page_h), "Layer 1");
        let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
        let font_bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_err)?;
        Ok(Self {
            doc,
            font,
            font_bold,
            current_page: page,
            current_layer: layer,
            page_w,
            page_h,
            y: MARGIN_TOP,
        })
    }

    fn content_width(&self) -> f32 {
        self.page_w - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn pdf_y(&self) -> f32 {
        self.page_h - self.y
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(self.page_w), Mm(self.page_h), "Layer");
        self.current_page = page;
        self.current_layer = layer;
        self.y = MARGIN_TOP;
    }

    fn ensure_space(&mut self, needed: f32) {
        if self.y + needed > self.page_h - MARGIN_BOTTOM {
            self.new_page();
        }
    }

    fn text(&self, s: &str, x: f32, size: f32, bold: bool) {
        let font = if bold { &self.font_bold } else { &self.font };
        let layer = self.doc.get_page(self.current_page).get_layer(self.current_layer);
        layer.use_text(s, size, Mm(x), Mm(self.pdf_y()), font);
    }

    fn hline(&self) {
        let layer = self.doc.get_page(self.current_page).get_layer(self.current_layer);
        layer.set_outline_thickness(0.5);
        let line = Line {
            points: vec![
                (Point::new(Mm(MARGIN_LEFT), Mm(self.pdf_y())), false),
                (Point::new(Mm(self.page_w - MARGIN_RIGHT), Mm(self.pdf_y())), false),
            ],
            is_closed: false,
        };
        layer.add_line(line);
    }

    fn header(&mut self, title: &str, business: &str) {
        self.text(title, MARGIN_LEFT, TITLE_SIZE, true);
        self.y += 7.0;
        if !business.is_empty() {
            self.text(business, MARGIN_LEFT, SUBTITLE_SIZE, false);
            self.y += 5.0;
        }
        let ts = format!(
            "Dicetak {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M")
        );
        self.text(&ts, MARGIN_LEFT, 8.0, false);
        self.y += 5.0;
        self.hline();
        self.y += 5.0;
    }

    /// Splits the content width by relative weights.
    fn columns(&self, widths: &[(f32, Align)]) -> Vec<Col> {
        let total: f32 = widths.iter().map(|(w, _)| w).sum();
        let width = self.content_width();
        widths.iter()
            .map(|(w, align)| Col { width: width * w / total, align: *align })
            .collect()
    }

    fn cells(&self, cols: &[Col], values: &[&str], bold: bool) {
        let mut x = MARGIN_LEFT;
        for (col, value) in cols.iter().zip(values) {
            match col.align {
                Align::Left => self.text(value, x, FONT_SIZE, bold),
                Align::Right => {
                    let tw = approx_text_width(value, FONT_SIZE);
                    self.text(value, x + col.width - tw, FONT_SIZE, bold);
                }
            }
            x += col.width;
        }
    }

    fn table_header(&mut self, cols: &[Col], headers: &[&str]) {
        self.ensure_space(ROW_H * 2.0);
        self.cells(cols, headers, true);
        self.y += ROW_H;
        self.hline();
        self.y += 2.0;
    }

    /// Writes a row, repeating the header at the top of a fresh page.
    fn table_row(&mut self, cols: &[Col], headers: &[&str], values: &[&str], bold: bool) {
        if self.y + ROW_H > self.page_h - MARGIN_BOTTOM {
            self.new_page();
            self.table_header(cols, headers);
        }
        self.cells(cols, values, bold);
        self.y += ROW_H;
    }

    fn separator(&mut self) {
        self.hline();
        self.y += 2.0;
    }

    fn to_bytes(self) -> Result<Vec<u8>> {
        let mut buf = BufWriter::new(Vec::new());
        self.doc.save(&mut buf).map_err(pdf_err)?;
        buf.into_inner().map_err(|e| WarungError::Pdf(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Render functions
// ---------------------------------------------------------------------------

pub fn render_inventory(report: &InventoryReport, business: &str) -> Result<Vec<u8>> {
    let title = "Laporan Stok Barang";
    let mut pdf = PdfWriter::new(title, false)?;
    pdf.header(title, business);

    let cols = pdf.columns(&[
        (14.0, Align::Left),
        (40.0, Align::Left),
        (12.0, Align::Right),
        (10.0, Align::Right),
        (10.0, Align::Right),
        (12.0, Align::Right),
        (20.0, Align::Right),
    ]);
    let headers = ["Kode", "Nama Barang", "Stok Awal", "Masuk", "Keluar", "Stok Akhir", "Harga Jual"];
    pdf.table_header(&cols, &headers);

    for item in &report.rows {
        let values = [
            item.code.clone(),
            item.name.clone(),
            number(item.opening_stock),
            number(item.stock_in),
            number(item.stock_out),
            number(item.closing_stock),
            number(item.sale_price),
        ];
        let refs: Vec<&str> = values.iter().map(String::as_str).collect();
        pdf.table_row(&cols, &headers, &refs, false);
    }

    pdf.separator();
    let count = format!("{} barang", report.rollup.item_count);
    let units = number(report.rollup.total_units);
    pdf.table_row(&cols, &headers, &["Total", &count, "", "", "", &units, ""], true);

    pdf.to_bytes()
}

pub fn render_cash(report: &CashReport, business: &str) -> Result<Vec<u8>> {
    let title = "Laporan Penerimaan Kas Harian";
    let mut pdf = PdfWriter::new(title, true)?;
    pdf.header(title, business);

    let mut widths = vec![(30.0, Align::Left)];
    widths.extend([(10.0, Align::Right); 8]);
    widths.push((28.0, Align::Right));
    let cols = pdf.columns(&widths);

    let mut headers = vec!["Tanggal"];
    headers.extend(DENOMINATION_LABELS);
    headers.push("Total");
    pdf.table_header(&cols, &headers);

    for entry in report.rows {
        let mut values = vec![long_date(entry.date)];
        values.extend(entry.counts.counts().iter().map(|n| number(*n)));
        values.push(rupiah(entry.total));
        let refs: Vec<&str> = values.iter().map(String::as_str).collect();
        pdf.table_row(&cols, &headers, &refs, false);
    }

    pdf.separator();
    let mut footer = vec!["Total".to_string()];
    footer.extend(report.count_totals.iter().map(|n| number(*n)));
    footer.push(rupiah(report.grand_total));
    let refs: Vec<&str> = footer.iter().map(String::as_str).collect();
    pdf.table_row(&cols, &headers, &refs, true);

    pdf.to_bytes()
}

pub fn render_kos(report: &KosReport, kos_name: &str) -> Result<Vec<u8>> {
    let title = "Laporan Transaksi Kos";
    let mut pdf = PdfWriter::new(title, false)?;
    pdf.header(title, kos_name);

    let cols = pdf.columns(&[
        (24.0, Align::Left),
        (44.0, Align::Left),
        (22.0, Align::Right),
        (22.0, Align::Right),
        (22.0, Align::Right),
    ]);
    let headers = ["Tanggal", "Uraian", "Penerimaan", "Pengeluaran", "Saldo"];
    pdf.table_header(&cols, &headers);

    for row in &report.rows {
        let values = [
            long_date(row.txn.date),
            row.txn.description.clone(),
            rupiah_or_dash(row.txn.receipt),
            rupiah_or_dash(row.txn.expense),
            rupiah(row.balance),
        ];
        let refs: Vec<&str> = values.iter().map(String::as_str).collect();
        pdf.table_row(&cols, &headers, &refs, false);
    }

    pdf.separator();
    let receipt = rupiah(report.total_receipt);
    let expense = rupiah(report.total_expense);
    let balance = rupiah(report.balance);
    pdf.table_row(&cols, &headers, &["Total", "", &receipt, &expense, &balance], true);

    pdf.to_bytes()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::*;
    use crate::reports::{cash_report, inventory_report, kos_report};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn test_render_inventory_produces_pdf() {
        let items = vec![InventoryItem {
            id: 1,
            code: "B001".into(),
            name: "Beras 5kg".into(),
            opening_stock: 20,
            stock_in: 5,
            stock_out: 3,
            transfer_note: None,
            closing_stock: 22,
            sale_price: 72_000,
            base_cost: 65_000,
        }];
        let bytes = render_inventory(&inventory_report(&items, None), "Jamfadly Mart").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_cash_produces_pdf() {
        let entries = vec![CashEntry {
            id: 1,
            date: date(2),
            counts: Denominations([3, 2, 0, 1, 0, 0, 4, 2]),
            rice_purchase: None,
            barter: None,
            total: 415_000,
        }];
        let bytes = render_cash(&cash_report(&entries), "Jamfadly Mart").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_kos_paginates_long_ledgers() {
        let txns: Vec<KosTransaction> = (1..=120)
            .map(|i| KosTransaction {
                id: i,
                date: date(1 + (i as u32 % 28)),
                description: format!("Sewa kamar {i}"),
                receipt: 500_000,
                expense: if i % 5 == 0 { 120_000 } else { 0 },
            })
            .collect();
        let bytes = render_kos(&kos_report(&txns), "Kos Rosely").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_empty_reports() {
        assert!(render_inventory(&inventory_report(&[], None), "").unwrap().starts_with(b"%PDF"));
        assert!(render_cash(&cash_report(&[]), "").unwrap().starts_with(b"%PDF"));
        assert!(render_kos(&kos_report(&[]), "").unwrap().starts_with(b"%PDF"));
    }
}
