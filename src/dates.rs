use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};

use crate::error::{InvoiceError, Result};

/// First calendar day of the given month.
fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).expect("month is always in 1..=12")
}

/// Last calendar day of the given month, computed as the first day of the
/// next month minus one day so that month lengths and leap years fall out of
/// calendar arithmetic rather than a lookup table.
pub fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    first_of_month(next_year, next_month)
        .checked_sub_days(Days::new(1))
        .expect("first of month always has a predecessor")
}

/// True when `now` falls within the last 7 days of its month: the distance
/// to the month's final midnight, in whole hours, is at most 7 * 24.
pub fn is_last_week_of_month(now: DateTime<Utc>) -> bool {
    let last_day = last_day_of_month(now.year(), now.month())
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time")
        .and_utc();

    (last_day - now).num_hours() <= 7 * 24
}

/// Automatic invoice date: the end of the current month when we are in its
/// last week, otherwise the end of the previous month.
pub fn automatic_invoice_date(now: DateTime<Utc>) -> NaiveDate {
    if is_last_week_of_month(now) {
        last_day_of_month(now.year(), now.month())
    } else {
        first_of_month(now.year(), now.month())
            .checked_sub_days(Days::new(1))
            .expect("first of month always has a predecessor")
    }
}

/// Parse a caller-supplied override date in DD-MM-YY form. The override is
/// used verbatim; no last-week-of-month policy applies to it.
pub fn parse_override_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, "%d-%m-%y").map_err(|e| InvoiceError::DateParse {
        input: input.to_string(),
        source: e,
    })
}

/// Invoice number derived from the invoice date: INV-<year>-<zero-padded month>.
pub fn invoice_number(date: NaiveDate) -> String {
    format!("INV-{}-{:02}", date.year(), date.month())
}

/// Due date: plain calendar addition of the payment term, no business-day logic.
pub fn due_date(invoice_date: NaiveDate, payment_terms_days: u32) -> NaiveDate {
    invoice_date
        .checked_add_days(Days::new(u64::from(payment_terms_days)))
        .unwrap_or(invoice_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap()
    }

    fn date(y: i32, mo: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, mo, d).unwrap()
    }

    #[test]
    fn last_day_handles_month_lengths_and_leap_years() {
        assert_eq!(last_day_of_month(2024, 1), date(2024, 1, 31));
        assert_eq!(last_day_of_month(2024, 2), date(2024, 2, 29));
        assert_eq!(last_day_of_month(2023, 2), date(2023, 2, 28));
        assert_eq!(last_day_of_month(2024, 4), date(2024, 4, 30));
        assert_eq!(last_day_of_month(2024, 12), date(2024, 12, 31));
    }

    #[test]
    fn last_week_predicate() {
        // 2024-01-24 00:00 is exactly 7 days before the final midnight.
        assert!(is_last_week_of_month(utc(2024, 1, 24, 0)));
        assert!(is_last_week_of_month(utc(2024, 1, 30, 12)));
        assert!(!is_last_week_of_month(utc(2024, 1, 23, 0)));
        assert!(!is_last_week_of_month(utc(2024, 1, 3, 9)));
    }

    #[test]
    fn mid_month_selects_previous_month_end() {
        assert_eq!(automatic_invoice_date(utc(2024, 3, 10, 9)), date(2024, 2, 29));
    }

    #[test]
    fn last_week_selects_current_month_end() {
        assert_eq!(automatic_invoice_date(utc(2024, 3, 28, 9)), date(2024, 3, 31));
    }

    #[test]
    fn previous_month_rolls_over_year_boundary() {
        assert_eq!(automatic_invoice_date(utc(2024, 1, 3, 9)), date(2023, 12, 31));
    }

    #[test]
    fn current_month_end_rolls_over_year_boundary() {
        assert_eq!(automatic_invoice_date(utc(2024, 12, 28, 9)), date(2024, 12, 31));
    }

    #[test]
    fn override_date_parses_verbatim() {
        assert_eq!(parse_override_date("15-03-24").unwrap(), date(2024, 3, 15));
        assert_eq!(parse_override_date("28-02-24").unwrap(), date(2024, 2, 28));
    }

    #[test]
    fn override_date_rejects_garbage() {
        assert!(matches!(
            parse_override_date("2024-03-15").unwrap_err(),
            InvoiceError::DateParse { .. }
        ));
        assert!(parse_override_date("99-99-99").is_err());
    }

    #[test]
    fn invoice_number_is_zero_padded() {
        assert_eq!(invoice_number(date(2024, 1, 31)), "INV-2024-01");
        assert_eq!(invoice_number(date(2024, 12, 31)), "INV-2024-12");
    }

    #[test]
    fn due_date_is_exact_calendar_addition() {
        assert_eq!(due_date(date(2024, 1, 31), 30), date(2024, 3, 1));
        assert_eq!(due_date(date(2024, 2, 28), 30), date(2024, 3, 29));
        assert_eq!(due_date(date(2024, 12, 15), 30), date(2025, 1, 14));
    }
}
