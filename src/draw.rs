use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{
    Bar, BarChart, BarGroup, Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table,
    TableState, Wrap,
};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::App;
use crate::state::app_state::Focus;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::state::team_page::PagePhase;
use crate::ui::layout::{LayoutAreas, PageAreas};
use cfb_api::view::{BYE_WEEK_MESSAGE, ChartDataset};

const HELP_TEXT: &str = "q quit   / open team id   Enter open selected   Tab switch panel   j/k move
1-9 open favorite   f mark favorite   [ ] previous/next season   r reload
z full screen   \" logs   ? close help";

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let _ = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_header(f, layout.header, app);
            draw_favorites(f, layout.favorites, app);
        }

        draw_page(f, layout.main, app);

        if app.state.show_logs {
            draw_logs(f, layout.logs);
        }
        if app.state.input.composing {
            draw_team_input(f, f.area(), app);
        }
        if app.state.show_help {
            draw_help(f, f.area());
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

/// "#RRGGBB" (or bare "RRGGBB") to a terminal color.
pub fn hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

/// Primary and accent colors for the page, falling back to plain white/gray.
fn team_colors(app: &App) -> (Color, Color) {
    let style = app.state.page.style();
    let primary = style.and_then(|s| hex_color(&s.color)).unwrap_or(Color::White);
    let accent = style
        .and_then(|s| hex_color(&s.background_color))
        .unwrap_or(Color::Gray);
    (primary, accent)
}

fn draw_header(f: &mut Frame, header: [Rect; 2], app: &App) {
    let (primary, _) = team_colors(app);
    let page = &app.state.page;

    let mut spans = vec![Span::styled(
        " cfbtui ",
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(key) = page.key() {
        let name = page
            .profile()
            .map(|p| p.display_name.clone())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("team {}", key.team_id));
        spans.push(Span::styled(name, Style::default().fg(primary)));
        spans.push(Span::raw(format!(
            "  season {}",
            key.season.as_deref().unwrap_or("current")
        )));
        if app.current_is_favorite() {
            spans.push(Span::styled("  ★", Style::default().fg(Color::Yellow)));
        }
    }

    f.render_widget(
        Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(BorderType::Rounded),
        ),
        header[0],
    );

    let status = page
        .loaded_at()
        .map(|t| format!("upd {t}"))
        .unwrap_or_default();
    f.render_widget(
        Paragraph::new(status)
            .alignment(Alignment::Right)
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                    .border_type(BorderType::Rounded),
            ),
        header[1],
    );
}

fn draw_favorites(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.state.focus == Focus::Favorites;
    let border = if focused { Color::White } else { Color::DarkGray };
    let block = default_border(border).title(" Favorites ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.state.favorites.is_empty() {
        f.render_widget(
            Paragraph::new("No favorites yet.\nPress f on a team.")
                .style(Style::default().fg(Color::DarkGray))
                .wrap(Wrap { trim: true }),
            inner,
        );
        return;
    }

    let current = app.state.page.key().map(|k| k.team_id.as_str());
    let lines: Vec<Line> = app
        .state
        .favorites
        .iter()
        .enumerate()
        .map(|(i, fav)| {
            let mut style = Style::default();
            if Some(fav.id.as_str()) == current {
                style = style.add_modifier(Modifier::BOLD);
            }
            if focused && i == app.state.selected_favorite {
                style = style.add_modifier(Modifier::REVERSED);
            }
            let hotkey = if i < 9 { format!("{} ", i + 1) } else { "  ".to_string() };
            Line::from(vec![
                Span::styled(hotkey, Style::default().fg(Color::DarkGray)),
                Span::styled(fav.name.clone(), style),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_page(f: &mut Frame, area: Rect, app: &App) {
    let (primary, _) = team_colors(app);
    match &app.state.page.phase {
        PagePhase::Idle => draw_centered(
            f,
            area,
            "No team selected. Press / to enter a team id, or 1-9 for a favorite.",
            Style::default().fg(Color::Gray),
        ),
        PagePhase::Loading => {
            draw_centered(f, area, "Loading team...", Style::default().fg(primary))
        }
        PagePhase::Failed { message } => draw_centered(
            f,
            area,
            &format!("Could not load this team.\n{message}\nPress r to retry."),
            Style::default().fg(Color::Red),
        ),
        PagePhase::Loaded => draw_loaded(f, area, app),
    }
}

fn draw_centered(f: &mut Frame, area: Rect, text: &str, style: Style) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Fill(1),
    ])
    .areas(inner);
    f.render_widget(
        Paragraph::new(text.to_string())
            .style(style)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        middle,
    );
}

fn draw_loaded(f: &mut Frame, area: Rect, app: &App) {
    // A profile without a season record is not ready to render yet.
    let Some(summary) = app.state.page.summary() else {
        draw_centered(
            f,
            area,
            "Waiting for season record...",
            Style::default().fg(Color::DarkGray),
        );
        return;
    };

    let (primary, accent) = team_colors(app);
    let areas = PageAreas::from_rect(area);

    // Summary card
    let star = if app.current_is_favorite() { " ★" } else { "" };
    let title = format!(" {} ({}){star} ", summary.title, summary.abbreviation);
    let block = default_border(primary).title(Span::styled(
        title,
        Style::default().fg(primary).add_modifier(Modifier::BOLD),
    ));
    let label = Style::default().fg(Color::DarkGray);
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Record     ", label),
            Span::raw(summary.record.summary.clone()),
        ]),
        Line::from(vec![
            Span::styled("Rank       ", label),
            Span::raw(summary.rank.map(|r| format!("#{r}")).unwrap_or_else(|| "-".into())),
        ]),
        Line::from(vec![
            Span::styled("Standing   ", label),
            Span::raw(summary.standing.clone().unwrap_or_else(|| "-".into())),
        ]),
        Line::from(vec![
            Span::styled("Next Game  ", label),
            Span::raw(summary.next_game.clone()),
        ]),
    ];
    if let Some(profile) = app.state.page.profile()
        && let Some(link) = profile.links.first()
    {
        lines.push(Line::from(vec![
            Span::styled("Link       ", label),
            Span::styled(link.href.clone(), Style::default().fg(accent)),
        ]));
    }
    f.render_widget(Paragraph::new(lines).block(block), areas.summary);

    draw_standings(f, areas.standings, app, primary);

    if let Some(chart) = app.state.page.chart() {
        draw_chart(f, areas.chart, &chart);
    }

    // Next matchup, or the bye week note
    let next = if summary.bye_week {
        Paragraph::new(BYE_WEEK_MESSAGE).style(Style::default().fg(Color::Gray))
    } else {
        Paragraph::new(format!("Next up: {}", summary.next_game))
    };
    f.render_widget(next.block(default_border(Color::DarkGray)), areas.next_event);
}

fn draw_standings(f: &mut Frame, area: Rect, app: &App, primary: Color) {
    let focused = app.state.focus == Focus::Standings;
    let border = if focused { Color::White } else { Color::DarkGray };
    let block = default_border(border).title(" Conference Standings ");

    let Some(rows) = app.state.page.standings_rows() else {
        let reason = app
            .state
            .page
            .standings_error()
            .map(|_| "Standings unavailable.")
            .unwrap_or("No conference standings.");
        f.render_widget(
            Paragraph::new(reason)
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
            area,
        );
        return;
    };

    let active = app.state.page.key().map(|k| k.team_id.clone());
    let table_rows: Vec<Row> = rows
        .iter()
        .map(|row| {
            let style = if Some(&row.id) == active.as_ref() {
                Style::default().fg(primary).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(row.rank.map(|r| r.to_string()).unwrap_or_default()),
                Cell::from(row.name.clone()),
                Cell::from(row.record.clone()),
                Cell::from(row.conference_record.clone()),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        table_rows,
        [
            Constraint::Length(4),
            Constraint::Fill(1),
            Constraint::Length(8),
            Constraint::Length(8),
        ],
    )
    .header(
        Row::new(vec!["Rk", "Team", "Overall", "Conf"])
            .style(Style::default().add_modifier(Modifier::UNDERLINED)),
    )
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .block(block);

    let mut state = TableState::default();
    if focused {
        state.select(Some(app.state.selected_standing));
    }
    f.render_stateful_widget(table, area, &mut state);
}

fn draw_chart(f: &mut Frame, area: Rect, chart: &ChartDataset) {
    let Some(series) = chart.datasets.first() else {
        return;
    };
    let fill = hex_color(&series.background_color).unwrap_or(Color::White);
    let border = hex_color(&series.border_color).unwrap_or(Color::Gray);
    let block = default_border(border).title(format!(" {} Scoring ", series.label));

    if chart.labels.is_empty() {
        f.render_widget(
            Paragraph::new("No scoring stats to chart.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
            area,
        );
        return;
    }

    let bars: Vec<Bar> = chart
        .labels
        .iter()
        .zip(&series.data)
        .map(|(label, value)| {
            Bar::default()
                .value(value.round().max(0.0) as u64)
                .label(Line::from(label.clone()))
                .text_value(format_stat(*value))
        })
        .collect();

    let inner_width = area.width.saturating_sub(2);
    let count = bars.len() as u16;
    let bar_width = (inner_width / count.max(1)).saturating_sub(1).clamp(3, 14);

    f.render_widget(
        BarChart::default()
            .block(block)
            .data(BarGroup::default().bars(&bars))
            .bar_width(bar_width)
            .bar_gap(1)
            .bar_style(Style::default().fg(fill))
            .value_style(Style::default().fg(Color::Black).bg(fill)),
        area,
    );
}

fn format_stat(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

fn draw_logs(f: &mut Frame, area: Rect) {
    f.render_widget(
        TuiLoggerWidget::default().block(default_border(Color::DarkGray).title(" Logs ")),
        area,
    );
}

fn draw_team_input(f: &mut Frame, area: Rect, app: &App) {
    let popup = centered_rect(area, 40, 3);
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(format!("{}_", app.state.input.buffer))
            .block(default_border(Color::White).title(" Team id ")),
        popup,
    );
}

fn draw_help(f: &mut Frame, area: Rect) {
    let popup = centered_rect(area, 80, 5);
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(HELP_TEXT)
            .wrap(Wrap { trim: false })
            .block(default_border(Color::White).title(" Help ")),
        popup,
    );
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(team_colors(app).0),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(3), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color() {
        assert_eq!(hex_color("#FF0000"), Some(Color::Rgb(255, 0, 0)));
        assert_eq!(hex_color("00ff7f"), Some(Color::Rgb(0, 255, 127)));
        assert_eq!(hex_color("#"), None);
        assert_eq!(hex_color("#GG0000"), None);
    }

    #[test]
    fn test_format_stat() {
        assert_eq!(format_stat(42.0), "42");
        assert_eq!(format_stat(31.46), "31.5");
    }

    #[test]
    fn test_centered_rect_clamps() {
        let r = centered_rect(Rect::new(0, 0, 20, 4), 40, 3);
        assert_eq!(r, Rect::new(0, 0, 20, 3));
    }
}
