use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonRange {
    pub name: &'static str,
    pub begin: NaiveDate,
    pub end: NaiveDate,
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

/// Spring (Mar–May), summer (Jun–Aug), fall (Sep–Nov) and winter (Dec through
/// the end of the following February). End dates are inclusive.
pub fn meteorological_season_ranges(year: i32) -> Vec<SeasonRange> {
    let winter_end = ymd(year + 1, 3, 1).pred_opt().unwrap_or(NaiveDate::MAX);

    vec![
        SeasonRange { name: "spring", begin: ymd(year, 3, 1), end: ymd(year, 5, 31) },
        SeasonRange { name: "summer", begin: ymd(year, 6, 1), end: ymd(year, 8, 31) },
        SeasonRange { name: "fall", begin: ymd(year, 9, 1), end: ymd(year, 11, 30) },
        SeasonRange { name: "winter", begin: ymd(year, 12, 1), end: winter_end },
    ]
}
