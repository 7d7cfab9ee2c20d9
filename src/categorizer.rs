use crate::models::KosTransaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseCategory {
    Electricity,
    Wifi,
    Cleaning,
    Security,
    Other,
}

impl ExpenseCategory {
    pub fn label(self) -> &'static str {
        match self {
            ExpenseCategory::Electricity => "Listrik",
            ExpenseCategory::Wifi => "Wifi",
            ExpenseCategory::Cleaning => "Kebersihan",
            ExpenseCategory::Security => "Keamanan",
            ExpenseCategory::Other => "Lain-lain",
        }
    }
}

// Checked in order; the first keyword found wins.
const RULES: &[(&str, ExpenseCategory)] = &[
    ("listrik", ExpenseCategory::Electricity),
    ("wifi", ExpenseCategory::Wifi),
    ("sampah", ExpenseCategory::Cleaning),
    ("keamanan", ExpenseCategory::Security),
];

pub fn categorize(description: &str) -> ExpenseCategory {
    let desc_lower = description.to_lowercase();
    RULES
        .iter()
        .find(|(keyword, _)| desc_lower.contains(keyword))
        .map(|(_, category)| *category)
        .unwrap_or(ExpenseCategory::Other)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: ExpenseCategory,
    pub total: i64,
}

/// Expense totals per category, in the order each category is first seen.
/// Transactions without an expense are skipped.
pub fn expense_breakdown(kos: &[KosTransaction]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for txn in kos.iter().filter(|t| t.expense > 0) {
        let category = categorize(&txn.description);
        match totals.iter_mut().find(|c| c.category == category) {
            Some(existing) => existing.total += txn.expense,
            None => totals.push(CategoryTotal { category, total: txn.expense }),
        }
    }
    totals
}
