// src/core/date.rs
use crate::core::types::OrdinalDate;
use crate::error::DateError;

/// Julian day number of 31 Dec 1600, so that 1 Jan 1601 is ordinal 1.
const EPOCH_OFFSET: i64 = 2_305_813;

/// Converts `YYYYMMDD` (8+ characters, extra ignored) or `YYMMDD` (up to 7
/// characters) to an ordinal day count.
///
/// Two-digit years 00–30 are 2000–2030, 31–99 are 1931–1999.
pub fn to_ordinal(date: &str) -> Result<OrdinalDate, DateError> {
    let (year, month, day) = if date.chars().count() > 7 {
        (
            field(date, 0..4)?,
            field(date, 4..6)?,
            field(date, 6..8)?,
        )
    } else {
        let yy = field(date, 0..2)?;
        let year = if yy <= 30 { 2000 + yy } else { 1900 + yy };
        (year, field(date, 2..4)?, field(date, 4..6)?)
    };

    if !(1..=12).contains(&month) {
        return Err(DateError::new(date, "month out of range"));
    }
    if day <= 0 {
        return Err(DateError::new(date, "day must be positive"));
    }
    if day > days_in_month(year, month) {
        return Err(DateError::new(date, "day exceeds length of month"));
    }

    Ok(julian_day(year, month, day) - EPOCH_OFFSET)
}

fn field(date: &str, range: std::ops::Range<usize>) -> Result<i64, DateError> {
    let digits = date
        .get(range)
        .ok_or_else(|| DateError::new(date, "too short"))?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DateError::new(date, "non-digit field"));
    }
    digits
        .parse()
        .map_err(|_| DateError::new(date, "non-digit field"))
}

pub fn is_leap_year(year: i64) -> bool {
    if year % 400 == 0 {
        true
    } else if year % 100 == 0 {
        false
    } else {
        year % 4 == 0
    }
}

fn days_in_month(year: i64, month: i64) -> i64 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Proleptic Gregorian date to Julian day number.
fn julian_day(year: i64, month: i64, day: i64) -> i64 {
    let adj = if month < 3 { 1 } else { 0 };
    let y = year + 4800 - adj;
    let m = month + 12 * adj - 3;
    day + (153 * m + 2).div_euclid(5) + 365 * y + y.div_euclid(4) - y.div_euclid(100)
        + y.div_euclid(400)
        - 32045
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_reference_julian_days() {
        let table = [
            ("20130926", 2_456_562),
            ("090120", 2_454_852),
            ("510724", 2_433_852),
            ("19411207", 2_430_336),
            ("18631119", 2_401_829),
            ("17760704", 2_369_916),
            ("16010101", 2_305_814),
        ];
        for (input, julian) in table {
            assert_eq!(to_ordinal(input).unwrap(), julian - EPOCH_OFFSET, "{input}");
        }
        assert_eq!(to_ordinal("16010101").unwrap(), 1);
    }

    #[test]
    fn calendar_validity() {
        assert!(to_ordinal("20100931").is_err());
        assert!(to_ordinal("20120229").is_ok());
        assert!(to_ordinal("20100229").is_err());
        assert!(to_ordinal("20000229").is_ok());
        assert!(to_ordinal("19000229").is_err());
        assert!(to_ordinal("20101300").is_err());
        assert!(to_ordinal("20100100").is_err());
    }

    #[test]
    fn rejects_garbage_but_ignores_trailing_text() {
        assert!(to_ordinal("2013O926").is_err());
        assert!(to_ordinal("1301").is_err());
        assert!(to_ordinal("").is_err());
        assert_eq!(to_ordinal("20130926]xyz"), to_ordinal("20130926"));
    }

    #[test]
    fn two_digit_year_pivot() {
        assert_eq!(to_ordinal("300101"), to_ordinal("20300101"));
        assert_eq!(to_ordinal("310101"), to_ordinal("19310101"));
        assert!(to_ordinal("19411207").unwrap() > to_ordinal("18631119").unwrap());
    }
}
