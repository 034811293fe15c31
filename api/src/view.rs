//! Pure builders turning provider data into display shapes. Nothing here
//! fails: missing data becomes a sentinel string or an omitted field.

use crate::{RecordEntry, RecordStat, StandingsEntry, TeamProfile, TeamStyle};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

pub const UNKNOWN: &str = "Unknown";
pub const NO_NEXT_GAME: &str = "No upcoming game";
pub const BYE_WEEK_MESSAGE: &str = "This team is coming up on a bye week. Check back next week.";

/// Minimum stat value kept on the chart.
pub const CHART_MIN_VALUE: f64 = 5.0;

// ---------------------------------------------------------------------------
// Team summary card
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct TeamSummaryViewModel {
    pub id: String,
    pub abbreviation: String,
    pub title: String,
    pub logo: Option<String>,
    /// "<name> on <M/D/YYYY>", the bare name when the date is unusable, or
    /// [`NO_NEXT_GAME`].
    pub next_game: String,
    pub bye_week: bool,
    pub record: RecordEntry,
    pub rank: Option<u32>,
    pub standing: Option<String>,
}

/// Summary card in the local time zone. `None` until the profile carries a
/// season record.
pub fn build_team_summary(profile: &TeamProfile) -> Option<TeamSummaryViewModel> {
    build_team_summary_in(profile, &Local)
}

pub fn build_team_summary_in<Tz: TimeZone>(
    profile: &TeamProfile,
    tz: &Tz,
) -> Option<TeamSummaryViewModel>
where
    Tz::Offset: std::fmt::Display,
{
    let record = profile.season_record()?.clone();

    let (next_game, bye_week) = match profile.upcoming() {
        Some(fixture) => {
            let date = fixture.date.as_deref().and_then(|d| format_fixture_date(d, tz));
            let label = match date {
                Some(date) => format!("{} on {date}", fixture.name),
                None => fixture.name.clone(),
            };
            (label, false)
        }
        None => (NO_NEXT_GAME.to_string(), true),
    };

    Some(TeamSummaryViewModel {
        id: profile.id.clone(),
        abbreviation: profile.abbreviation.clone(),
        title: profile.display_name.clone(),
        logo: profile.logo_url().map(str::to_owned),
        next_game,
        bye_week,
        record,
        rank: profile.rank,
        standing: profile.standing_summary.clone(),
    })
}

/// `M/D/YYYY` in `tz`, the way a US locale prints a short date.
pub fn format_fixture_date<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<String>
where
    Tz::Offset: std::fmt::Display,
{
    let utc = parse_fixture_date(raw)?;
    Some(utc.with_timezone(tz).format("%-m/%-d/%Y").to_string())
}

fn parse_fixture_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    // ESPN drops the seconds: "2024-09-07T16:00Z"
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%MZ")
        .ok()
        .map(|naive| naive.and_utc())
}

// ---------------------------------------------------------------------------
// Standings table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct StandingsViewModel {
    pub id: String,
    pub name: String,
    pub logo: Option<String>,
    pub rank: Option<u32>,
    pub record: String,
    pub conference_record: String,
}

/// One row per entry, in provider order.
pub fn build_standings_rows(standings: &[StandingsEntry]) -> Vec<StandingsViewModel> {
    standings
        .iter()
        .map(|entry| StandingsViewModel {
            id: entry.team_id.clone(),
            name: entry.team_name.clone(),
            logo: entry.logo_url.clone(),
            rank: entry.rank,
            record: display_or_unknown(
                entry.stat_by_name("overall").and_then(|s| s.display_value.as_deref()),
            ),
            conference_record: display_or_unknown(
                entry.stat_by_abbreviation("CONF").and_then(|s| s.display_value.as_deref()),
            ),
        })
        .collect()
}

fn display_or_unknown(value: Option<&str>) -> String {
    value.unwrap_or(UNKNOWN).to_string()
}

// ---------------------------------------------------------------------------
// Scoring chart
// ---------------------------------------------------------------------------

/// Identity and colors for the chart series.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartAppearance {
    pub abbreviation: String,
    pub color: String,
    pub alternate_color: String,
}

impl ChartAppearance {
    pub fn new(abbreviation: &str, style: &TeamStyle) -> Self {
        Self {
            abbreviation: abbreviation.to_owned(),
            color: style.color.clone(),
            alternate_color: style.background_color.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartDataset {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartSeries>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub background_color: String,
    pub border_color: String,
    pub data: Vec<f64>,
}

/// Scoring stats worth charting: value of at least [`CHART_MIN_VALUE`] and a
/// name mentioning "points".
pub fn build_chart_dataset(stats: &[RecordStat], appearance: &ChartAppearance) -> ChartDataset {
    let kept: Vec<&RecordStat> = stats.iter().filter(|s| is_chartable(s)).collect();

    ChartDataset {
        labels: kept.iter().map(|s| camel_case_to_proper_case(&s.name)).collect(),
        datasets: vec![ChartSeries {
            label: appearance.abbreviation.clone(),
            background_color: appearance.color.clone(),
            border_color: appearance.alternate_color.clone(),
            data: kept.iter().map(|s| s.value).collect(),
        }],
    }
}

fn is_chartable(stat: &RecordStat) -> bool {
    stat.value >= CHART_MIN_VALUE && stat.name.to_lowercase().contains("points")
}

/// "totalPoints" → "Total Points".
pub fn camel_case_to_proper_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    for c in name.chars() {
        match prev {
            None => out.extend(c.to_uppercase()),
            Some(p) => {
                if c.is_uppercase() && (p.is_lowercase() || p.is_ascii_digit()) {
                    out.push(' ');
                }
                out.push(c);
            }
        }
        prev = Some(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FixtureSummary, StandingsStat};

    fn stat(name: &str, value: f64) -> RecordStat {
        RecordStat { name: name.into(), value }
    }

    fn profile() -> TeamProfile {
        TeamProfile {
            id: "99".into(),
            abbreviation: "XYZ".into(),
            display_name: "Xavier Yaks".into(),
            logos: vec!["https://logo/99.png".into()],
            color: "FF0000".into(),
            alternate_color: "00FF00".into(),
            conference_id: Some("5".into()),
            record: vec![RecordEntry {
                summary: "10-2".into(),
                stats: vec![stat("totalPoints", 42.0)],
            }],
            rank: Some(12),
            standing_summary: Some("2nd in Big Conf".into()),
            ..Default::default()
        }
    }

    fn appearance() -> ChartAppearance {
        ChartAppearance::new("XYZ", &TeamStyle::from_provider_hex("FF0000", "00FF00"))
    }

    #[test]
    fn test_summary_without_next_event_is_bye_week() {
        let summary = build_team_summary_in(&profile(), &Utc).unwrap();
        assert!(summary.bye_week);
        assert_eq!(summary.next_game, NO_NEXT_GAME);
        assert_eq!(summary.title, "Xavier Yaks");
        assert_eq!(summary.record.summary, "10-2");
        assert_eq!(summary.logo.as_deref(), Some("https://logo/99.png"));
    }

    #[test]
    fn test_summary_formats_next_game() {
        let mut p = profile();
        p.next_event = vec![FixtureSummary {
            date: Some("2024-09-07T16:00Z".into()),
            name: "Xavier Yaks at Rival U".into(),
            short_name: None,
        }];
        let summary = build_team_summary_in(&p, &Utc).unwrap();
        assert!(!summary.bye_week);
        assert_eq!(summary.next_game, "Xavier Yaks at Rival U on 9/7/2024");
    }

    #[test]
    fn test_summary_with_unparseable_date_keeps_name() {
        let mut p = profile();
        p.next_event = vec![FixtureSummary {
            date: Some("next saturday".into()),
            name: "XYZ vs ABC".into(),
            short_name: None,
        }];
        assert_eq!(build_team_summary_in(&p, &Utc).unwrap().next_game, "XYZ vs ABC");
    }

    #[test]
    fn test_summary_deferred_without_record() {
        let mut p = profile();
        p.record.clear();
        assert!(build_team_summary(&p).is_none());
    }

    #[test]
    fn test_rfc3339_dates_parse() {
        assert_eq!(
            format_fixture_date("2023-11-25T20:30:00Z", &Utc).as_deref(),
            Some("11/25/2023")
        );
    }

    #[test]
    fn test_standings_missing_conf_is_unknown() {
        let entries = vec![
            StandingsEntry {
                team_id: "99".into(),
                team_name: "Xavier Yaks".into(),
                stats: vec![StandingsStat {
                    name: "overall".into(),
                    display_value: Some("10-2".into()),
                    ..Default::default()
                }],
                ..Default::default()
            },
            StandingsEntry {
                team_id: "4".into(),
                team_name: "Other".into(),
                rank: Some(1),
                stats: vec![StandingsStat {
                    name: "vsConf".into(),
                    abbreviation: Some("CONF".into()),
                    display_value: Some("7-1".into()),
                    value: Some(0.875),
                }],
                ..Default::default()
            },
        ];

        let rows = build_standings_rows(&entries);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].record, "10-2");
        assert_eq!(rows[0].conference_record, UNKNOWN);
        assert_eq!(rows[1].id, "4");
        assert_eq!(rows[1].record, UNKNOWN);
        assert_eq!(rows[1].conference_record, "7-1");
    }

    #[test]
    fn test_chart_filters_on_value_and_name() {
        let stats = vec![
            stat("totalPoints", 42.0),
            stat("pointsAgainst", 4.9),
            stat("rushingYards", 900.0),
            stat("avgPointsFor", 31.5),
            stat("POINTS", 5.0),
        ];
        let chart = build_chart_dataset(&stats, &appearance());

        assert_eq!(chart.labels, vec!["Total Points", "Avg Points For", "POINTS"]);
        let series = &chart.datasets[0];
        assert_eq!(series.data, vec![42.0, 31.5, 5.0]);
        assert_eq!(series.label, "XYZ");
        assert_eq!(series.background_color, "#FF0000");
        assert_eq!(series.border_color, "#00FF00");
        assert!(series.data.iter().all(|v| *v >= CHART_MIN_VALUE));
    }

    #[test]
    fn test_chart_is_idempotent() {
        let stats = vec![stat("pointsFor", 30.0), stat("totalPoints", 400.0)];
        assert_eq!(
            build_chart_dataset(&stats, &appearance()),
            build_chart_dataset(&stats, &appearance())
        );
    }

    #[test]
    fn test_camel_case_to_proper_case() {
        assert_eq!(camel_case_to_proper_case("totalPoints"), "Total Points");
        assert_eq!(camel_case_to_proper_case("points"), "Points");
        assert_eq!(camel_case_to_proper_case("avgPointsPerGame"), "Avg Points Per Game");
        assert_eq!(camel_case_to_proper_case(""), "");
    }
}
