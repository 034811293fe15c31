pub mod aggregate;
pub mod client;
pub mod espn;
pub mod favorites;
pub mod store;
pub mod style;
pub mod view;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of the provider wire format
// ---------------------------------------------------------------------------

/// Canonical descriptive and statistical record for one team in one season.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamProfile {
    pub id: String,
    pub abbreviation: String,
    pub display_name: String,
    pub logos: Vec<String>,
    pub color: String,           // raw hex from the provider, no leading '#'
    pub alternate_color: String, // raw hex from the provider, no leading '#'
    pub conference_id: Option<String>,
    pub next_event: Vec<FixtureSummary>,
    pub record: Vec<RecordEntry>,
    pub rank: Option<u32>,
    pub standing_summary: Option<String>,
    pub links: Vec<TeamLink>,
}

impl TeamProfile {
    pub fn logo_url(&self) -> Option<&str> {
        self.logos.first().map(String::as_str)
    }

    /// The season record is the first record item. A profile without one is
    /// not ready for display yet.
    pub fn season_record(&self) -> Option<&RecordEntry> {
        self.record.first()
    }

    pub fn upcoming(&self) -> Option<&FixtureSummary> {
        self.next_event.first()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordEntry {
    pub summary: String, // "10-2"
    pub stats: Vec<RecordStat>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStat {
    pub name: String, // camelCase, e.g. "totalPoints"
    pub value: f64,
}

/// A scheduled game. No fixture at all means a bye week.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixtureSummary {
    pub date: Option<String>, // ISO 8601 as sent by the provider
    pub name: String,         // "Texas at Michigan"
    pub short_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamLink {
    pub text: String,
    pub href: String,
}

/// One team's rank and record within its conference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StandingsEntry {
    pub team_id: String,
    pub team_name: String,
    pub logo_url: Option<String>,
    pub rank: Option<u32>,
    pub stats: Vec<StandingsStat>,
}

impl StandingsEntry {
    pub fn stat_by_name(&self, name: &str) -> Option<&StandingsStat> {
        self.stats.iter().find(|s| s.name == name)
    }

    pub fn stat_by_abbreviation(&self, abbreviation: &str) -> Option<&StandingsStat> {
        self.stats
            .iter()
            .find(|s| s.abbreviation.as_deref() == Some(abbreviation))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StandingsStat {
    pub name: String,
    pub abbreviation: Option<String>,
    pub display_value: Option<String>,
    pub value: Option<f64>,
}

/// The pair of colors used to theme a team's display. Persisted verbatim, so
/// the field names match what earlier sessions wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStyle {
    pub color: String,
    #[serde(rename = "backgroundColor")]
    pub background_color: String,
}

impl TeamStyle {
    /// Build a style from the provider's bare hex fields ("FF0000").
    pub fn from_provider_hex(color: &str, alternate_color: &str) -> Self {
        Self {
            color: format!("#{color}"),
            background_color: format!("#{alternate_color}"),
        }
    }
}

/// A user-marked team. The registry holds at most one entry per id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    pub id: String,
    pub name: String,
}

/// Query-string parameters forwarded verbatim to every provider call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters for one season. `None` lets the provider pick its current one.
    pub fn for_season(season: Option<&str>) -> Self {
        let mut params = Self::new();
        if let Some(season) = season.filter(|s| !s.trim().is_empty()) {
            params.push("season", season.trim());
        }
        params
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
