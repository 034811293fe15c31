use crate::state::network::LoadingState;
use crate::state::team_page::LoadTicket;
use cfb_api::aggregate::TeamAggregate;
use cfb_api::client::ApiError;
use crossterm::event::KeyEvent;

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadTeam(LoadTicket),
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    TeamLoaded { epoch: u64, aggregate: Box<TeamAggregate> },
    TeamFailed { epoch: u64, error: ApiError },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
