use tui::layout::{Constraint, Layout, Rect, Size};
pub const HEADER_HEIGHT: u16 = 3;
pub const FAVORITES_WIDTH: u16 = 24;
pub const LOG_HEIGHT: u16 = 10;

/// Pre-computed layout areas for the main draw loop.
pub struct LayoutAreas {
    pub header: [Rect; 2],
    pub favorites: Rect,
    pub main: Rect,
    pub logs: Rect,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        let rect = Rect::new(0, 0, size.width, size.height);
        Self::from_rect(rect, false, false)
    }

    pub fn update(&mut self, area: Rect, full_screen: bool, show_logs: bool) {
        *self = Self::from_rect(area, full_screen, show_logs);
    }

    fn from_rect(area: Rect, full_screen: bool, show_logs: bool) -> Self {
        let (body, logs) = if show_logs {
            let [body, logs] =
                Layout::vertical([Constraint::Fill(1), Constraint::Length(LOG_HEIGHT)]).areas(area);
            (body, logs)
        } else {
            (area, Rect::ZERO)
        };

        if full_screen {
            return LayoutAreas {
                header: [Rect::ZERO, Rect::ZERO],
                favorites: Rect::ZERO,
                main: body,
                logs,
            };
        }

        let [header, rest] =
            Layout::vertical([Constraint::Length(HEADER_HEIGHT), Constraint::Fill(1)]).areas(body);
        let [favorites, main] =
            Layout::horizontal([Constraint::Length(FAVORITES_WIDTH), Constraint::Fill(1)])
                .areas(rest);

        LayoutAreas {
            header: Self::split_header(header),
            favorites,
            main,
            logs,
        }
    }

    fn split_header(area: Rect) -> [Rect; 2] {
        Layout::horizontal([Constraint::Percentage(85), Constraint::Percentage(15)]).areas(area)
    }
}

/// Page body once a team is loaded.
pub struct PageAreas {
    pub summary: Rect,
    pub standings: Rect,
    pub chart: Rect,
    pub next_event: Rect,
}

impl PageAreas {
    pub const SUMMARY_HEIGHT: u16 = 8;

    pub fn from_rect(area: Rect) -> Self {
        let [summary, panels, next_event] = Layout::vertical([
            Constraint::Length(Self::SUMMARY_HEIGHT),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .areas(area);
        let [standings, chart] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(panels);
        PageAreas { summary, standings, chart, next_event }
    }
}
