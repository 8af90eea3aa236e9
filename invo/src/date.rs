use crate::result::{Error, Result};

use std::ops::Range;

use chrono::{Datelike, Months, NaiveDate};

/// A calendar month, the granularity of the analytics cycle
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Month {
    pub year: i32,
    pub month: i32,
}

impl Month {
    pub fn calendar(year: i32, month: i32) -> Self {
        Month { year, month }
    }

    pub fn of(date: NaiveDate) -> Self {
        Month {
            year: date.year(),
            month: date.month() as i32,
        }
    }

    /// The first day of the month, used as the analytics cycle key
    pub fn first_day(&self) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month as u32, 1)
            .ok_or(Error::InvalidMonth(self.year, self.month))
    }

    pub fn as_date_range(&self) -> Result<Range<NaiveDate>> {
        let from = self.first_day()?;
        let to = from + Months::new(1);

        Ok(from..to)
    }
}

/// Whether two dates fall in the same month of the same year
pub fn same_cycle(a: NaiveDate, b: NaiveDate) -> bool {
    Month::of(a) == Month::of(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::prelude::{assert_eq, Result, *};

    #[test]
    fn month_calendar() -> Result<()> {
        let month = Month::calendar(12, -6);
        let result = month.as_date_range();

        assert!(matches!(result, Err(Error::InvalidMonth(12, -6))));

        let month = Month::calendar(2024, 2);
        let range = month.as_date_range()?;

        assert_eq!(NaiveDate::from_ymd_opt(2024, 2, 1), Some(range.start));
        assert_eq!(NaiveDate::from_ymd_opt(2024, 3, 1), Some(range.end));

        Ok(())
    }

    #[test]
    fn month_of() -> Result<()> {
        let month = Month::of(test::date(2024, 12, 31));

        assert_eq!(Month::calendar(2024, 12), month);
        assert_eq!(test::date(2024, 12, 1), month.first_day()?);

        Ok(())
    }

    #[test]
    fn cycles() {
        assert!(same_cycle(test::date(2022, 1, 5), test::date(2022, 1, 31)));
        assert!(!same_cycle(test::date(2022, 1, 5), test::date(2022, 2, 5)));
        assert!(!same_cycle(test::date(2022, 1, 5), test::date(2023, 1, 5)));
    }
}
