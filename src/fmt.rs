use chrono::{Datelike, NaiveDate};

const MONTH_ABBREV: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

const MONTH_NAMES: [&str; 12] = [
    "Januari", "Februari", "Maret", "April", "Mei", "Juni",
    "Juli", "Agustus", "September", "Oktober", "November", "Desember",
];

/// Integer with `.` thousands separators: 1.234.567
pub fn number(val: i64) -> String {
    let digits = val.unsigned_abs().to_string();
    let mut with_dots = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_dots.push('.');
        }
        with_dots.push(c);
    }
    let with_dots: String = with_dots.chars().rev().collect();
    if val < 0 {
        format!("-{with_dots}")
    } else {
        with_dots
    }
}

/// Rupiah amount: Rp 1.234.567
pub fn rupiah(val: i64) -> String {
    if val < 0 {
        format!("-Rp {}", number(-val))
    } else {
        format!("Rp {}", number(val))
    }
}

/// Rupiah amount, `-` for zero (kos ledger columns).
pub fn rupiah_or_dash(val: i64) -> String {
    if val == 0 {
        "-".to_string()
    } else {
        rupiah(val)
    }
}

/// Compact card value: Rp 1.2Jt, Rp 15.0Rb, Rp 500
pub fn rupiah_short(val: i64) -> String {
    let v = val as f64;
    if v >= 1e6 {
        format!("Rp {:.1}Jt", v / 1e6)
    } else if v >= 1e3 {
        format!("Rp {:.1}Rb", v / 1e3)
    } else {
        format!("Rp {val}")
    }
}

/// Month number (1-12) to its short Indonesian name.
pub fn month_abbrev(month: u32) -> &'static str {
    MONTH_ABBREV[(month.clamp(1, 12) - 1) as usize]
}

pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES[(month.clamp(1, 12) - 1) as usize]
}

/// Chart label: 05/03
pub fn day_month(date: NaiveDate) -> String {
    date.format("%d/%m").to_string()
}

/// Report date: 05 Maret 2025
pub fn long_date(date: NaiveDate) -> String {
    format!("{:02} {} {}", date.day(), month_name(date.month()), date.year())
}
