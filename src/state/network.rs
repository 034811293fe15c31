use crate::state::messages::{NetworkRequest, NetworkResponse};
use crate::state::team_page::LoadTicket;
use cfb_api::aggregate::TeamProfileAggregator;
use cfb_api::client::TeamDataProvider;
use log::{debug, error};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Runs team page loads in the background. A new load supersedes (and
/// aborts) any still in flight, so a hung request for a team the user has
/// already left never holds up the current one. Every response carries the
/// epoch of its request so the UI can drop the ones it no longer wants.
pub struct NetworkWorker<P> {
    aggregator: Arc<TeamProfileAggregator<P>>,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl<P> NetworkWorker<P>
where
    P: TeamDataProvider + Send + Sync + 'static,
{
    pub fn new(
        aggregator: TeamProfileAggregator<P>,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        let mut in_flight: JoinSet<NetworkResponse> = JoinSet::new();
        let mut last_ok = true;

        loop {
            tokio::select! {
                request = self.requests.recv() => {
                    let Some(request) = request else {
                        break;
                    };
                    if !self.is_loading.load(Ordering::Relaxed) {
                        self.start_loading_animation().await;
                    }
                    match request {
                        NetworkRequest::LoadTeam(ticket) => {
                            if !in_flight.is_empty() {
                                debug!("superseding {} in-flight load(s)", in_flight.len());
                                in_flight.abort_all();
                            }
                            let aggregator = Arc::clone(&self.aggregator);
                            in_flight.spawn(async move { load_team(&aggregator, ticket).await });
                        }
                    }
                }

                Some(joined) = in_flight.join_next() => {
                    match joined {
                        Ok(response) => {
                            debug!("network request complete");
                            last_ok = !matches!(response, NetworkResponse::TeamFailed { .. });
                            if let Err(e) = self.responses.send(response).await {
                                error!("Failed to send network response: {e}");
                                break;
                            }
                        }
                        Err(e) if e.is_cancelled() => {}
                        Err(e) => {
                            error!("team load task failed: {e}");
                            last_ok = false;
                        }
                    }
                    if in_flight.is_empty() {
                        self.stop_loading_animation(last_ok).await;
                    }
                }
            }
        }
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}

async fn load_team<P: TeamDataProvider>(
    aggregator: &TeamProfileAggregator<P>,
    ticket: LoadTicket,
) -> NetworkResponse {
    let LoadTicket { epoch, team_id, query } = ticket;
    debug!("loading team {team_id} (epoch {epoch})");
    match aggregator.fetch_team_aggregate(&team_id, &query).await {
        Ok(aggregate) => NetworkResponse::TeamLoaded {
            epoch,
            aggregate: Box::new(aggregate),
        },
        Err(error) => NetworkResponse::TeamFailed { epoch, error },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfb_api::client::ApiResult;
    use cfb_api::store::MemoryStore;
    use cfb_api::style::StyleCache;
    use cfb_api::{QueryParams, StandingsEntry, TeamProfile};

    /// Team "stuck" never answers; any other team answers at once.
    struct StuckOnOneTeam;

    impl TeamDataProvider for StuckOnOneTeam {
        async fn team_info(&self, team_id: &str, _query: &QueryParams) -> ApiResult<TeamProfile> {
            if team_id == "stuck" {
                std::future::pending::<()>().await;
            }
            Ok(TeamProfile { id: team_id.to_string(), ..Default::default() })
        }

        async fn conference_standings(
            &self,
            _conference_id: &str,
            _query: &QueryParams,
        ) -> ApiResult<Vec<StandingsEntry>> {
            Ok(Vec::new())
        }
    }

    fn ticket(epoch: u64, team_id: &str) -> LoadTicket {
        LoadTicket { epoch, team_id: team_id.into(), query: QueryParams::new() }
    }

    fn spawn_worker() -> (mpsc::Sender<NetworkRequest>, mpsc::Receiver<NetworkResponse>) {
        let aggregator =
            TeamProfileAggregator::new(StuckOnOneTeam, StyleCache::new(Arc::new(MemoryStore::new())));
        let (req_tx, req_rx) = mpsc::channel(8);
        let (resp_tx, resp_rx) = mpsc::channel(64);
        tokio::spawn(NetworkWorker::new(aggregator, req_rx, resp_tx).run());
        (req_tx, resp_rx)
    }

    async fn next_team_response(responses: &mut mpsc::Receiver<NetworkResponse>) -> NetworkResponse {
        loop {
            match responses.recv().await {
                Some(NetworkResponse::LoadingStateChanged { .. }) => continue,
                Some(other) => return other,
                None => panic!("worker stopped"),
            }
        }
    }

    #[tokio::test]
    async fn test_hung_load_does_not_block_newer_one() {
        let (requests, mut responses) = spawn_worker();
        requests.send(NetworkRequest::LoadTeam(ticket(1, "stuck"))).await.unwrap();
        requests.send(NetworkRequest::LoadTeam(ticket(2, "2"))).await.unwrap();

        let response = tokio::time::timeout(
            Duration::from_secs(5),
            next_team_response(&mut responses),
        )
        .await
        .expect("newest load should finish");

        match response {
            NetworkResponse::TeamLoaded { epoch, aggregate } => {
                assert_eq!(epoch, 2);
                assert_eq!(aggregate.profile.id, "2");
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_spinner_stops_after_last_load() {
        let (requests, mut responses) = spawn_worker();
        requests.send(NetworkRequest::LoadTeam(ticket(1, "7"))).await.unwrap();

        let settled = tokio::time::timeout(Duration::from_secs(5), async {
            let mut loaded = false;
            while let Some(response) = responses.recv().await {
                match response {
                    NetworkResponse::TeamLoaded { epoch, .. } => {
                        assert_eq!(epoch, 1);
                        loaded = true;
                    }
                    NetworkResponse::LoadingStateChanged { loading_state }
                        if loaded && !loading_state.is_loading =>
                    {
                        return loading_state;
                    }
                    _ => {}
                }
            }
            panic!("worker stopped");
        })
        .await
        .expect("spinner should settle");

        assert_eq!(settled.spinner_char, ' ');
    }
}
