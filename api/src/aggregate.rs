use crate::client::{ApiError, ApiResult, TeamDataProvider};
use crate::style::StyleCache;
use crate::{FixtureSummary, QueryParams, StandingsEntry, TeamProfile, TeamStyle};
use log::{debug, warn};

/// Everything one team page needs from the provider.
#[derive(Debug)]
pub struct TeamAggregate {
    pub profile: TeamProfile,
    /// `None` when the standings call failed or the team has no conference.
    pub standings: Option<Vec<StandingsEntry>>,
    /// `None` means a bye week.
    pub next_event: Option<Vec<FixtureSummary>>,
    pub style: TeamStyle,
    /// Why standings are missing, if they were requested and failed.
    pub standings_error: Option<ApiError>,
}

/// Runs the two dependent provider calls for a team page: team info first,
/// then the standings of the conference that info names.
pub struct TeamProfileAggregator<P> {
    provider: P,
    styles: StyleCache,
}

impl<P: TeamDataProvider> TeamProfileAggregator<P> {
    pub fn new(provider: P, styles: StyleCache) -> Self {
        Self { provider, styles }
    }

    /// Fetch and merge one team page.
    ///
    /// A failed team call fails the whole aggregate and leaves the style cache
    /// untouched. A failed standings call only drops the standings.
    pub async fn fetch_team_aggregate(
        &self,
        team_id: &str,
        query: &QueryParams,
    ) -> ApiResult<TeamAggregate> {
        debug!("fetching team {team_id}");
        let profile = self.provider.team_info(team_id, query).await?;

        let (standings, standings_error) = match profile.conference_id.as_deref() {
            Some(conference_id) => {
                debug!("fetching standings for conference {conference_id}");
                match self.provider.conference_standings(conference_id, query).await {
                    Ok(entries) => (Some(entries), None),
                    Err(e) => {
                        warn!("standings unavailable for team {team_id}: {e}");
                        (None, Some(e))
                    }
                }
            }
            None => {
                debug!("team {team_id} has no conference, skipping standings");
                (None, None)
            }
        };

        let style = TeamStyle::from_provider_hex(&profile.color, &profile.alternate_color);
        self.styles.set_style(&profile.id, &style);

        let next_event = Some(profile.next_event.clone()).filter(|events| !events.is_empty());

        Ok(TeamAggregate {
            profile,
            standings,
            next_event,
            style,
            standings_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{CfbApi, FetchStage};
    use crate::store::{KeyValueStore, MemoryStore};
    use crate::view::{build_chart_dataset, build_standings_rows, ChartAppearance};
    use mockito::Matcher;
    use std::sync::Arc;

    const TEAM_99: &str = r#"{
        "id": "99",
        "abbreviation": "XYZ",
        "color": "FF0000",
        "alternateColor": "00FF00",
        "groups": {"id": "5"},
        "record": {"items": [{"stats": [{"name": "totalPoints", "value": 42}]}]}
    }"#;

    const STANDINGS_5: &str = r#"{
        "entries": [
            {"team": {"id": "99"}, "stats": [{"name": "overall", "displayValue": "10-2"}]}
        ]
    }"#;

    fn aggregator(server: &mockito::ServerGuard) -> (Arc<MemoryStore>, TeamProfileAggregator<CfbApi>) {
        let store = Arc::new(MemoryStore::new());
        let styles = StyleCache::new(store.clone());
        (store, TeamProfileAggregator::new(CfbApi::new(server.url()), styles))
    }

    #[tokio::test]
    async fn test_full_pipeline_scenario() {
        let mut server = mockito::Server::new_async().await;
        let team = server
            .mock("GET", "/team/99/information")
            .match_query(Matcher::UrlEncoded("season".into(), "2023".into()))
            .with_status(200)
            .with_body(TEAM_99)
            .create_async()
            .await;
        let standings = server
            .mock("GET", "/conferences/5/standings")
            .match_query(Matcher::UrlEncoded("season".into(), "2023".into()))
            .with_status(200)
            .with_body(STANDINGS_5)
            .create_async()
            .await;

        let (store, aggregator) = aggregator(&server);
        let aggregate = aggregator
            .fetch_team_aggregate("99", &QueryParams::for_season(Some("2023")))
            .await
            .unwrap();

        team.assert_async().await;
        standings.assert_async().await;

        let cached: serde_json::Value =
            serde_json::from_str(&store.get("team_style_99").unwrap()).unwrap();
        assert_eq!(
            cached,
            serde_json::json!({"color": "#FF0000", "backgroundColor": "#00FF00"})
        );

        let record = aggregate.profile.season_record().unwrap();
        let chart = build_chart_dataset(
            &record.stats,
            &ChartAppearance::new(&aggregate.profile.abbreviation, &aggregate.style),
        );
        assert_eq!(chart.labels, vec!["Total Points"]);
        assert_eq!(chart.datasets[0].data, vec![42.0]);

        let rows = build_standings_rows(aggregate.standings.as_deref().unwrap());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "99");
        assert_eq!(rows[0].record, "10-2");
        assert_eq!(rows[0].conference_record, "Unknown");
        assert!(aggregate.next_event.is_none());
    }

    #[tokio::test]
    async fn test_team_failure_skips_standings_and_style() {
        let mut server = mockito::Server::new_async().await;
        let _team = server
            .mock("GET", "/team/99/information")
            .with_status(500)
            .with_body(r#"{"error": "boom"}"#)
            .create_async()
            .await;
        let standings = server
            .mock("GET", Matcher::Regex("^/conferences/".into()))
            .expect(0)
            .create_async()
            .await;

        let (store, aggregator) = aggregator(&server);
        let err = aggregator
            .fetch_team_aggregate("99", &QueryParams::new())
            .await
            .unwrap_err();

        assert_eq!(err.stage(), Some(FetchStage::Team));
        standings.assert_async().await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_standings_failure_degrades() {
        let mut server = mockito::Server::new_async().await;
        let _team = server
            .mock("GET", "/team/99/information")
            .with_status(200)
            .with_body(TEAM_99)
            .create_async()
            .await;
        let _standings = server
            .mock("GET", "/conferences/5/standings")
            .with_status(500)
            .create_async()
            .await;

        let (store, aggregator) = aggregator(&server);
        let aggregate = aggregator
            .fetch_team_aggregate("99", &QueryParams::new())
            .await
            .unwrap();

        assert!(aggregate.standings.is_none());
        assert_eq!(
            aggregate.standings_error.as_ref().and_then(ApiError::stage),
            Some(FetchStage::Standings)
        );
        assert_eq!(aggregate.profile.abbreviation, "XYZ");
        assert!(store.get("team_style_99").is_some());
    }

    #[tokio::test]
    async fn test_no_conference_means_no_standings_call() {
        let mut server = mockito::Server::new_async().await;
        let _team = server
            .mock("GET", "/team/12/information")
            .with_status(200)
            .with_body(
                r#"{"id": "12", "abbreviation": "IND", "color": "000000", "alternateColor": "ffffff",
                    "nextEvent": [{"date": "2024-09-07T16:00Z", "name": "IND at ABC"}]}"#,
            )
            .create_async()
            .await;
        let standings = server
            .mock("GET", Matcher::Regex("^/conferences/".into()))
            .expect(0)
            .create_async()
            .await;

        let (_, aggregator) = aggregator(&server);
        let aggregate = aggregator
            .fetch_team_aggregate("12", &QueryParams::new())
            .await
            .unwrap();

        standings.assert_async().await;
        assert!(aggregate.standings.is_none());
        assert!(aggregate.standings_error.is_none());
        assert_eq!(aggregate.next_event.map(|e| e.len()), Some(1));
    }
}
