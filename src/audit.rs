use crate::models::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchKind {
    ClosingStock,
    CashTotal,
}

impl MismatchKind {
    pub fn label(self) -> &'static str {
        match self {
            MismatchKind::ClosingStock => "closing stock",
            MismatchKind::CashTotal => "cash total",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub kind: MismatchKind,
    pub id: i64,
    /// Business-facing reference: item code or entry date.
    pub reference: String,
    pub stored: i64,
    pub expected: i64,
}

impl Mismatch {
    pub fn discrepancy(&self) -> i64 {
        self.stored - self.expected
    }
}

pub struct AuditResult {
    pub checked: usize,
    pub mismatches: Vec<Mismatch>,
}

impl AuditResult {
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Recomputes the store's derived fields and reports every row where the
/// stored value disagrees.
pub fn check(snapshot: &Snapshot) -> AuditResult {
    let mut mismatches = Vec::new();

    for item in &snapshot.items {
        let expected = item.opening_stock + item.stock_in - item.stock_out;
        if item.closing_stock != expected {
            mismatches.push(Mismatch {
                kind: MismatchKind::ClosingStock,
                id: item.id,
                reference: item.code.clone(),
                stored: item.closing_stock,
                expected,
            });
        }
    }

    for entry in &snapshot.cash {
        let expected = entry.counts.value();
        if entry.total != expected {
            mismatches.push(Mismatch {
                kind: MismatchKind::CashTotal,
                id: entry.id,
                reference: entry.date.to_string(),
                stored: entry.total,
                expected,
            });
        }
    }

    for m in &mismatches {
        tracing::warn!(
            kind = m.kind.label(),
            id = m.id,
            stored = m.stored,
            expected = m.expected,
            "derived field mismatch"
        );
    }

    AuditResult {
        checked: snapshot.items.len() + snapshot.cash.len(),
        mismatches,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::db::test_db;
    use crate::models::*;
    use crate::store;

    #[test]
    fn test_store_written_rows_are_clean() {
        let (_dir, conn) = test_db();
        store::insert_item(
            &conn,
            &NewInventoryItem { code: "B001".into(), name: "Beras".into(), opening_stock: 5, stock_in: 3, ..Default::default() },
        )
        .unwrap();
        store::insert_cash(
            &conn,
            &NewCashEntry {
                date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
                counts: Denominations([1, 0, 2, 0, 0, 0, 0, 4]),
                rice_purchase: Some(60_000),
                barter: Some(5_000),
            },
        )
        .unwrap();
        let result = check(&store::load_snapshot(&conn).unwrap());
        assert_eq!(result.checked, 2);
        assert!(result.is_clean());
    }

    #[test]
    fn test_detects_tampered_closing_stock() {
        let snapshot = Snapshot {
            items: vec![InventoryItem {
                id: 7,
                code: "G01".into(),
                name: "Gula".into(),
                opening_stock: 10,
                stock_in: 5,
                stock_out: 2,
                transfer_note: None,
                closing_stock: 20,
                sale_price: 0,
                base_cost: 0,
            }],
            ..Default::default()
        };
        let result = check(&snapshot);
        assert_eq!(result.mismatches.len(), 1);
        let m = &result.mismatches[0];
        assert_eq!(m.kind, MismatchKind::ClosingStock);
        assert_eq!(m.expected, 13);
        assert_eq!(m.discrepancy(), 7);
    }

    #[test]
    fn test_detects_cash_total_including_side_amounts() {
        let snapshot = Snapshot {
            cash: vec![CashEntry {
                id: 3,
                date: NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
                counts: Denominations([1, 0, 0, 0, 0, 0, 0, 0]),
                rice_purchase: Some(50_000),
                barter: None,
                total: 150_000,
            }],
            ..Default::default()
        };
        let result = check(&snapshot);
        assert!(!result.is_clean());
        assert_eq!(result.mismatches[0].reference, "2025-03-02");
        assert_eq!(result.mismatches[0].expected, 100_000);
    }
}
