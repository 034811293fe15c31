use crate::app::App;
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;

    if guard.state.input.composing {
        let ticket = match key_event.code {
            KeyCode::Enter => guard.submit_team_input(),
            KeyCode::Esc => {
                guard.state.input.cancel();
                None
            }
            KeyCode::Backspace => {
                guard.state.input.backspace();
                None
            }
            Char(c) => {
                guard.state.input.push(c);
                None
            }
            _ => None,
        };
        drop(guard);
        if let Some(ticket) = ticket {
            let _ = network_requests.send(NetworkRequest::LoadTeam(ticket)).await;
        }
        return;
    }

    let ticket = match (key_event.code, key_event.modifiers) {
        // Quit
        (Char('q'), _) | (Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Page requests
        (Char('r'), _) => guard.reload(),
        (Char('['), _) => guard.change_season(-1),
        (Char(']'), _) => guard.change_season(1),
        (Char('/'), _) => {
            guard.state.input.begin();
            None
        }
        (KeyCode::Enter, _) => guard.open_selected(),
        (Char(c @ '1'..='9'), _) => {
            let index = c as usize - '1' as usize;
            guard.open_favorite(index)
        }

        // Favorites
        (Char('f') | Char('*'), _) => {
            guard.mark_favorite();
            None
        }

        // Navigation
        (Char('j') | KeyCode::Down, _) => {
            guard.select_down();
            None
        }
        (Char('k') | KeyCode::Up, _) => {
            guard.select_up();
            None
        }
        (KeyCode::Tab, _) => {
            guard.toggle_focus();
            None
        }

        // Global
        (Char('?'), _) => {
            guard.toggle_help();
            None
        }
        (KeyCode::Esc, _) => {
            guard.state.show_help = false;
            None
        }
        (Char('z'), _) => {
            guard.toggle_full_screen();
            None
        }
        (Char('"'), _) => {
            guard.toggle_show_logs();
            None
        }

        _ => None,
    };

    drop(guard);
    if let Some(ticket) = ticket {
        let _ = network_requests.send(NetworkRequest::LoadTeam(ticket)).await;
    }
}
