use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{CellTag, Position, Scene, WormId, WormStatus};
use crate::metrics::GameMetrics;

/// Body colour per worm: green for the first, blue for the second
fn worm_color(id: WormId) -> Color {
    match id.index() {
        0 => Color::Green,
        1 => Color::Blue,
        _ => Color::Magenta,
    }
}

fn head_color(id: WormId) -> Color {
    match id.index() {
        0 => Color::LightGreen,
        1 => Color::LightBlue,
        _ => Color::LightMagenta,
    }
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, scene: &Scene, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(scene, metrics);
        frame.render_widget(stats, chunks[0]);

        if scene.game_over {
            let game_over = self.render_game_over(scene);
            frame.render_widget(game_over, chunks[1]);
        } else {
            let grid = self.render_grid(scene);
            frame.render_widget(grid, chunks[1]);
        }

        let controls = self.render_controls(scene);
        frame.render_widget(controls, chunks[2]);
    }

    /// Title screen shown before the first game
    pub fn render_start(&self, frame: &mut Frame) {
        let text = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    " Battle ",
                    Style::default()
                        .fg(Color::White)
                        .bg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                Span::styled(
                    "Worms",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Press any key to play",
                Style::default().fg(Color::Gray),
            )),
        ];

        let title = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_type(BorderType::Double));
        frame.render_widget(title, frame.area());
    }

    fn render_cell(tag: Option<CellTag>) -> Span<'static> {
        match tag {
            Some(CellTag::WormHead(id)) => Span::styled(
                "■ ",
                Style::default()
                    .fg(head_color(id))
                    .add_modifier(Modifier::BOLD),
            ),
            Some(CellTag::WormBody(id)) => Span::styled("□ ", Style::default().fg(worm_color(id))),
            Some(CellTag::Tongue(_)) => Span::styled(
                "× ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Some(CellTag::Apple) => Span::styled(
                "O ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Some(CellTag::Stone) => Span::styled("▓▓", Style::default().fg(Color::Gray)),
            None => Span::styled(". ", Style::default().fg(Color::DarkGray)),
        }
    }

    fn render_grid(&self, scene: &Scene) -> Paragraph<'static> {
        let cells = scene.cell_map();
        let mut lines = Vec::with_capacity(scene.height);

        for y in 0..scene.height {
            let spans: Vec<Span> = (0..scene.width)
                .map(|x| {
                    let pos = Position::new(x as i32, y as i32);
                    Self::render_cell(cells.get(&pos).copied())
                })
                .collect();

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Battle Worms "),
            )
            .alignment(Alignment::Center)
    }

    fn score_spans(status: &WormStatus) -> Vec<Span<'static>> {
        let mut spans = vec![
            Span::styled(
                format!("Worm {}: ", status.id.number()),
                Style::default().fg(worm_color(status.id)),
            ),
            Span::styled(
                status.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ];

        if !status.alive {
            spans.push(Span::styled(" (dead)", Style::default().fg(Color::Red)));
        } else if status.biting {
            spans.push(Span::styled(" (biting)", Style::default().fg(Color::Yellow)));
        } else if status.zombie {
            // Whole seconds left, rounded up
            let secs = status.zombie_remaining.as_millis().div_ceil(1000);
            spans.push(Span::styled(
                format!(" (zombie {secs}s)"),
                Style::default().fg(Color::Yellow),
            ));
        }

        spans.push(Span::raw("    "));
        spans
    }

    fn render_stats(&self, scene: &Scene, metrics: &GameMetrics) -> Paragraph<'static> {
        let mut spans: Vec<Span> = scene.worms.iter().flat_map(Self::score_spans).collect();

        spans.extend([
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.high_score.to_string(), Style::default().fg(Color::White)),
        ]);

        if scene.worms.len() > 1 {
            let tally = scene
                .worms
                .iter()
                .map(|w| metrics.wins.get(w.id.index()).copied().unwrap_or(0).to_string())
                .collect::<Vec<_>>()
                .join("-");
            spans.extend([
                Span::raw("    "),
                Span::styled("Wins: ", Style::default().fg(Color::Yellow)),
                Span::styled(tally, Style::default().fg(Color::White)),
                Span::raw("  "),
                Span::styled("Draws: ", Style::default().fg(Color::Yellow)),
                Span::styled(metrics.draws.to_string(), Style::default().fg(Color::White)),
            ]);
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }

    fn render_game_over(&self, scene: &Scene) -> Paragraph<'static> {
        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
        ];

        for status in &scene.worms {
            text.push(Line::from(vec![
                Span::styled(
                    format!("Worm {} final score: ", status.id.number()),
                    Style::default().fg(worm_color(status.id)),
                ),
                Span::styled(
                    status.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(
                        " (length {}, {}s alive)",
                        status.length, status.life_duration
                    ),
                    Style::default().fg(Color::Gray),
                ),
            ]));
        }

        if scene.worms.len() > 1 {
            text.push(Line::from(""));
            let verdict = match scene.winner {
                Some(id) => Span::styled(
                    format!("Worm {} wins!", id.number()),
                    Style::default()
                        .fg(worm_color(id))
                        .add_modifier(Modifier::BOLD),
                ),
                None => Span::styled("No winner", Style::default().fg(Color::Gray)),
            };
            text.push(Line::from(verdict));
        }

        text.push(Line::from(""));
        text.push(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled(
                "R",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Q",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to quit", Style::default().fg(Color::Gray)),
        ]));

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, scene: &Scene) -> Paragraph<'static> {
        let line = if scene.worms.len() > 1 {
            Line::from(vec![
                Span::styled("WASD", Style::default().fg(worm_color(WormId(0)))),
                Span::raw(" + "),
                Span::styled("E", Style::default().fg(worm_color(WormId(0)))),
                Span::raw(" bite | "),
                Span::styled("↑↓←→", Style::default().fg(worm_color(WormId(1)))),
                Span::raw(" + "),
                Span::styled("/", Style::default().fg(worm_color(WormId(1)))),
                Span::raw(" bite | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ])
        } else {
            Line::from(vec![
                Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
                Span::raw(" or "),
                Span::styled("WASD", Style::default().fg(Color::Cyan)),
                Span::raw(" to move | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ])
        };

        Paragraph::new(line).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
