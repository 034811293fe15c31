/// ESPN-shaped raw wire types — serde shapes for deserializing provider responses.
/// These map to our clean domain types via the mapping functions in client.rs.
use serde::{Deserialize, Deserializer};

// ---------------------------------------------------------------------------
// Team information
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct TeamInfoResponse {
    #[serde(default, deserialize_with = "opt_id")]
    pub id: Option<String>,
    pub abbreviation: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    pub logos: Option<Vec<EspnLogo>>,
    pub color: Option<String>,
    #[serde(rename = "alternateColor")]
    pub alternate_color: Option<String>,
    pub groups: Option<EspnGroups>,
    #[serde(rename = "nextEvent")]
    pub next_event: Option<Vec<EspnEvent>>,
    pub record: Option<EspnRecord>,
    pub rank: Option<u32>,
    #[serde(rename = "standingSummary")]
    pub standing_summary: Option<String>,
    pub links: Option<Vec<EspnLink>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnLogo {
    pub href: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnGroups {
    #[serde(default, deserialize_with = "opt_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "opt_id")]
    pub parent: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnEvent {
    pub id: Option<String>,
    pub date: Option<String>, // ISO 8601, often minute precision ("2024-09-07T16:00Z")
    pub name: Option<String>,
    #[serde(rename = "shortName")]
    pub short_name: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnRecord {
    pub items: Option<Vec<EspnRecordItem>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnRecordItem {
    pub summary: Option<String>,
    pub stats: Option<Vec<EspnStat>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnStat {
    pub name: Option<String>,
    pub abbreviation: Option<String>,
    #[serde(rename = "displayValue")]
    pub display_value: Option<String>,
    pub value: Option<f64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnLink {
    pub text: Option<String>,
    pub href: Option<String>,
}

// ---------------------------------------------------------------------------
// Conference standings
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct StandingsResponse {
    pub entries: Option<Vec<EspnStandingsEntry>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnStandingsEntry {
    pub team: Option<EspnStandingsTeam>,
    pub stats: Option<Vec<EspnStat>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnStandingsTeam {
    #[serde(default, deserialize_with = "opt_id")]
    pub id: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    pub logos: Option<Vec<EspnLogo>>,
    pub rank: Option<u32>,
}

/// Team and group ids arrive as strings from ESPN but as bare numbers from
/// some mirrors. Keep them opaque either way.
fn opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Id>::deserialize(deserializer)?.map(|id| match id {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    }))
}
