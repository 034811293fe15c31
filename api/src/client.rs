use crate::espn::{EspnLogo, EspnStat, StandingsResponse, TeamInfoResponse};
use crate::{
    FixtureSummary, QueryParams, RecordEntry, RecordStat, StandingsEntry, StandingsStat,
    TeamLink, TeamProfile,
};
use log::debug;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::fmt;
use std::future::Future;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

/// Default provider root. The provider proxies ESPN's college football data
/// under `/team/{id}/information` and `/conferences/{id}/standings`.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:3001/api/cfb";

/// Which of the two provider calls produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStage {
    Team,
    Standings,
}

impl fmt::Display for FetchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStage::Team => write!(f, "team"),
            FetchStage::Standings => write!(f, "standings"),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Parsing(serde_json::Error, String),
    /// Any non-2xx response, whatever the body looks like.
    Upstream {
        stage: FetchStage,
        url: String,
        status: u16,
        payload: serde_json::Value,
    },
    Other(String),
}

impl ApiError {
    /// The stage of an upstream rejection, if this is one.
    pub fn stage(&self) -> Option<FetchStage> {
        match self {
            ApiError::Upstream { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::Upstream { stage, url, status, payload } => {
                write!(f, "Upstream {stage} error for {url}: HTTP {status}")?;
                match payload {
                    serde_json::Value::Null => Ok(()),
                    serde_json::Value::String(s) if s.is_empty() => Ok(()),
                    other => write!(f, " ({other})"),
                }
            }
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Source of raw team and standings data. `CfbApi` talks HTTP; tests swap in
/// canned providers.
pub trait TeamDataProvider {
    fn team_info(
        &self,
        team_id: &str,
        query: &QueryParams,
    ) -> impl Future<Output = ApiResult<TeamProfile>> + Send;

    fn conference_standings(
        &self,
        conference_id: &str,
        query: &QueryParams,
    ) -> impl Future<Output = ApiResult<Vec<StandingsEntry>>> + Send;
}

/// College football API client.
#[derive(Debug, Clone)]
pub struct CfbApi {
    client: Client,
    base_url: String,
    timeout: Option<Duration>,
}

impl Default for CfbApi {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

impl CfbApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent("cfbtui/0.1 (terminal team viewer)")
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            timeout: None,
        }
    }

    /// Per-request timeout. Unset means a hung request waits indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URL plus `segments`, each percent-encoded as a single path
    /// segment, so ids can never add path levels or a query of their own.
    fn endpoint(&self, segments: &[&str], query: &QueryParams) -> ApiResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::Other(format!("invalid url {}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Other(format!("cannot append a path to {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.pairs());
        }
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        stage: FetchStage,
        segments: &[&str],
        query: &QueryParams,
    ) -> ApiResult<T> {
        let url = self.endpoint(segments, query)?;
        let url_str = url.to_string();
        debug!("GET {url_str}");

        let mut request = self.client.get(url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url_str.clone()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e, url_str.clone()))?;

        if !status.is_success() {
            let payload = serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body));
            return Err(ApiError::Upstream {
                stage,
                url: url_str,
                status: status.as_u16(),
                payload,
            });
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Parsing(e, url_str))
    }
}

impl TeamDataProvider for CfbApi {
    async fn team_info(&self, team_id: &str, query: &QueryParams) -> ApiResult<TeamProfile> {
        let segments = ["team", team_id, "information"];
        let raw: TeamInfoResponse = self.get(FetchStage::Team, &segments, query).await?;
        Ok(map_team_info(raw))
    }

    async fn conference_standings(
        &self,
        conference_id: &str,
        query: &QueryParams,
    ) -> ApiResult<Vec<StandingsEntry>> {
        let segments = ["conferences", conference_id, "standings"];
        let raw: StandingsResponse = self.get(FetchStage::Standings, &segments, query).await?;
        Ok(map_standings(raw))
    }
}

// ---------------------------------------------------------------------------
// Mapping: wire types → clean domain types
// ---------------------------------------------------------------------------

fn map_team_info(raw: TeamInfoResponse) -> TeamProfile {
    let next_event = raw
        .next_event
        .unwrap_or_default()
        .into_iter()
        .map(|e| FixtureSummary {
            date: e.date,
            name: e.name.unwrap_or_default(),
            short_name: e.short_name,
        })
        .collect();

    let record = raw
        .record
        .and_then(|r| r.items)
        .unwrap_or_default()
        .into_iter()
        .map(|item| RecordEntry {
            summary: item.summary.unwrap_or_default(),
            stats: item
                .stats
                .unwrap_or_default()
                .into_iter()
                .filter_map(|s| {
                    Some(RecordStat {
                        name: s.name?,
                        value: s.value.unwrap_or_default(),
                    })
                })
                .collect(),
        })
        .collect();

    let links = raw
        .links
        .unwrap_or_default()
        .into_iter()
        .filter_map(|l| {
            Some(TeamLink {
                text: l.text.unwrap_or_default(),
                href: l.href?,
            })
        })
        .collect();

    TeamProfile {
        id: raw.id.unwrap_or_default(),
        abbreviation: raw.abbreviation.unwrap_or_default(),
        display_name: raw.display_name.unwrap_or_default(),
        logos: map_logos(raw.logos),
        color: raw.color.unwrap_or_default(),
        alternate_color: raw.alternate_color.unwrap_or_default(),
        conference_id: raw.groups.and_then(|g| g.id),
        next_event,
        record,
        rank: raw.rank,
        standing_summary: raw.standing_summary,
        links,
    }
}

fn map_standings(raw: StandingsResponse) -> Vec<StandingsEntry> {
    raw.entries
        .unwrap_or_default()
        .into_iter()
        .map(|entry| {
            let team = entry.team.unwrap_or_default();
            StandingsEntry {
                team_id: team.id.unwrap_or_default(),
                team_name: team.display_name.unwrap_or_default(),
                logo_url: map_logos(team.logos).into_iter().next(),
                rank: team.rank,
                stats: entry
                    .stats
                    .unwrap_or_default()
                    .into_iter()
                    .map(map_standings_stat)
                    .collect(),
            }
        })
        .collect()
}

fn map_standings_stat(s: EspnStat) -> StandingsStat {
    StandingsStat {
        name: s.name.unwrap_or_default(),
        abbreviation: s.abbreviation,
        display_value: s.display_value,
        value: s.value,
    }
}

fn map_logos(logos: Option<Vec<EspnLogo>>) -> Vec<String> {
    logos
        .unwrap_or_default()
        .into_iter()
        .filter_map(|l| l.href)
        .collect()
}
