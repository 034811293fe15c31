use crate::state::team_page::TeamPageState;
use cfb_api::FavoriteEntry;

/// Which panel the arrow keys drive.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Standings,
    Favorites,
}

/// Team id typed by the user, opened on Enter.
#[derive(Debug, Default)]
pub struct TeamInput {
    pub composing: bool,
    pub buffer: String,
}

impl TeamInput {
    pub fn begin(&mut self) {
        self.composing = true;
        self.buffer.clear();
    }

    pub fn push(&mut self, c: char) {
        if !c.is_control() {
            self.buffer.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.buffer.pop();
    }

    pub fn cancel(&mut self) {
        self.composing = false;
        self.buffer.clear();
    }

    /// Finish composing; `None` for a blank entry.
    pub fn submit(&mut self) -> Option<String> {
        self.composing = false;
        let value = self.buffer.trim().to_string();
        self.buffer.clear();
        Some(value).filter(|v| !v.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AppState {
    pub page: TeamPageState,
    pub favorites: Vec<FavoriteEntry>,
    pub focus: Focus,
    pub selected_standing: usize,
    pub selected_favorite: usize,
    pub input: TeamInput,
    pub show_logs: bool,
    pub show_help: bool,
    pub last_error: Option<String>,
}

impl AppState {
    pub fn new(favorites: Vec<FavoriteEntry>) -> Self {
        Self { favorites, ..Self::default() }
    }

    pub fn is_favorite(&self, team_id: &str) -> bool {
        self.favorites.iter().any(|f| f.id == team_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_submit_trims_and_rejects_blank() {
        let mut input = TeamInput::default();
        input.begin();
        for c in " 333 ".chars() {
            input.push(c);
        }
        assert_eq!(input.submit(), Some("333".to_string()));
        assert!(!input.composing);

        input.begin();
        input.push(' ');
        assert_eq!(input.submit(), None);
    }

    #[test]
    fn test_input_backspace_and_cancel() {
        let mut input = TeamInput::default();
        input.begin();
        input.push('1');
        input.push('2');
        input.backspace();
        assert_eq!(input.buffer, "1");
        input.cancel();
        assert!(input.buffer.is_empty());
        assert!(!input.composing);
    }
}
