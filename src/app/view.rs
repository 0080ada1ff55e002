//! Player screen: channel indicators, key reference and a status bar.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::channel::PlayState;

use super::keys::help_lines;
use super::App;

pub fn draw(frame: &mut Frame, app: &App) {
    let size = frame.area();
    let channel_rows = app.session().channel_count() as u16 + 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(channel_rows),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(size);

    draw_channels(frame, app, chunks[0]);
    draw_help(frame, app, chunks[1]);
    draw_status(frame, app, chunks[2]);
}

fn draw_channels(frame: &mut Frame, app: &App, area: Rect) {
    let session = app.session();
    let lines: Vec<Line> = (0..session.channel_count())
        .map(|ch| {
            let active = session.controller.is_active(ch);
            let (mark, style) = if active {
                (
                    "\u{25cf} ON ",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ("\u{25cb} OFF", Style::default().fg(Color::DarkGray))
            };
            let name = session.channel_name(ch).unwrap_or("?");
            let position = match session.controller.player(ch).and_then(|p| p.cursor()) {
                Some(c) => format!("sound {} step {:2}", c.sound, c.step),
                None => String::new(),
            };
            Line::from(vec![
                Span::raw(format!(" #{ch} ")),
                Span::styled(mark, style),
                Span::raw(format!(" {name:<10} ")),
                Span::styled(position, Style::default().fg(Color::Cyan)),
            ])
        })
        .collect();

    let block = Block::default().borders(Borders::ALL).title(" Channels ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_help(frame: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = help_lines(&app.session().presets)
        .into_iter()
        .map(|(key, text)| {
            Line::from(vec![
                Span::styled(
                    format!(" {key:>5} "),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(text),
            ])
        })
        .collect();

    let block = Block::default().borders(Borders::ALL).title(" Keys ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let clock = app.clock();
    let playing = app
        .session()
        .controller
        .players()
        .iter()
        .any(|p| p.state() != PlayState::Stopped);

    let transport = if clock.is_paused() {
        Span::styled(" PAUSE ", Style::default().fg(Color::Black).bg(Color::Yellow))
    } else if playing {
        Span::styled(" PLAY ", Style::default().fg(Color::Black).bg(Color::Green))
    } else {
        Span::styled(" STOP ", Style::default().fg(Color::Black).bg(Color::DarkGray))
    };

    let line = Line::from(vec![
        transport,
        Span::raw(format!(
            " {:6.1}s @ {} fps | ",
            clock.elapsed_secs(),
            clock.fps()
        )),
        Span::raw(app.status()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
