//! Upload destination templates
//!
//! Destinations are configured as templates over a small token vocabulary
//! resolved from the run date and crawler name. Week and year come from the
//! ISO week calendar, so the first days of January can resolve into the
//! previous ISO year.

use chrono::{Datelike, NaiveDate};

/// Resolves `{year} {month} {week} {day} {botname}` tokens in a destination
/// template. Unknown text is passed through untouched.
pub fn resolve_destination(template: &str, bot_name: &str, run_date: NaiveDate) -> String {
    let iso_week = run_date.iso_week();

    template
        .replace("{year}", &iso_week.year().to_string())
        .replace("{month}", &run_date.month().to_string())
        .replace("{week}", &iso_week.week().to_string())
        .replace("{day}", &run_date.day().to_string())
        .replace("{botname}", bot_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_all_tokens() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

        let resolved = resolve_destination(
            "{year}/{month}/{week}/{botname}.json",
            "century21_pt",
            date,
        );
        assert_eq!(resolved, "2024/3/11/century21_pt.json");
    }

    #[test]
    fn resolves_day_token() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

        let resolved = resolve_destination("{day}-{botname}", "century21_pt", date);
        assert_eq!(resolved, "15-century21_pt");
    }

    #[test]
    fn year_follows_the_iso_week_calendar() {
        // 2021-01-01 belongs to ISO week 53 of 2020
        let date = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();

        let resolved = resolve_destination("{year}/{week}", "bot", date);
        assert_eq!(resolved, "2020/53");
    }

    #[test]
    fn template_without_tokens_is_unchanged() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

        assert_eq!(
            resolve_destination("fixed/path.json", "bot", date),
            "fixed/path.json"
        );
    }
}
