use std::time::Instant;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, LoginFocus};
use crate::routes::Destination;

use super::styles;

pub fn render(frame: &mut Frame, app: &App, now: Instant) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);

    match app.screen {
        Destination::Home => render_home(frame, chunks[1]),
        Destination::Login => render_login(frame, app, chunks[1], now),
        Destination::Dashboard => render_dashboard(frame, app, chunks[1]),
    }

    render_status_bar(frame, app, chunks[2]);

    if app.show_inspector {
        render_inspector_overlay(frame, app);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!("  Gatehouse — {}", app.screen.title());
    let title_line = Line::from(Span::styled(title, styles::title_style()));

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_home(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Welcome.", styles::title_style())),
        Line::from(""),
        Line::from("This screen is public; the dashboard is not."),
        Line::from(""),
        Line::from(vec![
            Span::styled("[l]", styles::help_key_style()),
            Span::raw(" login   "),
            Span::styled("[d]", styles::help_key_style()),
            Span::raw(" dashboard   "),
            Span::styled("[q]", styles::help_key_style()),
            Span::raw(" quit"),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        area,
    );
}

fn render_login(frame: &mut Frame, app: &App, area: Rect, now: Instant) {
    let form_area = centered_rect(area, 46, 14);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Email field
            Constraint::Length(1), // Email error
            Constraint::Length(3), // Password field
            Constraint::Length(1), // Password error
            Constraint::Length(3), // Submit button
            Constraint::Length(1), // Alert
            Constraint::Min(0),
        ])
        .split(form_area);

    let email_focused = app.login.focus == LoginFocus::Email;
    let email = Paragraph::new(app.login.email.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Email ")
            .border_style(styles::border_style(email_focused)),
    );
    frame.render_widget(email, chunks[0]);
    render_field_error(frame, app, LoginFocus::Email, chunks[1]);

    let password_focused = app.login.focus == LoginFocus::Password;
    let masked;
    let password_text = if app.login.password_revealed(now) {
        app.login.password.as_str()
    } else {
        masked = "\u{2022}".repeat(app.login.password.chars().count());
        masked.as_str()
    };
    let password = Paragraph::new(password_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Password (ctrl+r reveals) ")
            .border_style(styles::border_style(password_focused)),
    );
    frame.render_widget(password, chunks[2]);
    render_field_error(frame, app, LoginFocus::Password, chunks[3]);

    let label = if app.login.submitting {
        "Submitting..."
    } else {
        "[ Submit ]"
    };
    let button_focused = app.login.focus == LoginFocus::Button;
    let button = Paragraph::new(Span::styled(
        label,
        styles::button_style(app.login.is_submittable(), button_focused),
    ))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styles::border_style(button_focused)),
    );
    frame.render_widget(button, chunks[4]);

    if let Some(ref alert) = app.login.alert {
        frame.render_widget(
            Paragraph::new(Span::styled(alert.as_str(), styles::error_style()))
                .alignment(Alignment::Center),
            chunks[5],
        );
    }
}

fn render_field_error(frame: &mut Frame, app: &App, field: LoginFocus, area: Rect) {
    if let Some(message) = app.login.visible_error(field) {
        frame.render_widget(
            Paragraph::new(Span::styled(message, styles::error_style())),
            area,
        );
    }
}

fn render_dashboard(frame: &mut Frame, app: &App, area: Rect) {
    // The route guard prevents reaching this screen unauthenticated, but a
    // session can expire while it is showing.
    let lines = match app.session() {
        Some(session) => vec![
            Line::from(""),
            Line::from(Span::styled("Dashboard", styles::title_style())),
            Line::from(""),
            Line::from(format!(
                "Signed in as {} (uid {})",
                session.identity.name, session.identity.uid
            )),
            Line::from(Span::styled(
                format!(
                    "Session expires in {}m",
                    session.token.minutes_until_expiry()
                ),
                styles::muted_style(),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("[x]", styles::help_key_style()),
                Span::raw(" sign out   "),
                Span::styled("[h]", styles::help_key_style()),
                Span::raw(" home   "),
                Span::styled("[q]", styles::help_key_style()),
                Span::raw(" quit"),
            ]),
        ],
        None => vec![
            Line::from(""),
            Line::from(Span::styled("Session expired.", styles::error_style())),
        ],
    };
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        area,
    );
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = if app.is_authenticated() {
        "authenticated"
    } else {
        "not authenticated"
    };
    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled(status, styles::highlight_style()),
    ]);
    frame.render_widget(
        Paragraph::new(line).style(styles::status_bar_style()),
        area,
    );
}

fn render_inspector_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect(frame.area(), 60, 10);
    frame.render_widget(Clear, area);

    let body = match app.session() {
        Some(session) => vec![
            Line::from(format!("identity: {} / {}", session.identity.name, session.identity.uid)),
            Line::from(format!("scheme:   {}", session.token.scheme)),
            Line::from(format!(
                "expires:  {}",
                session
                    .token
                    .expires_at()
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "undecodable".to_string())
            )),
        ],
        None => vec![Line::from("no valid session")],
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Session inspector (dev) ")
        .border_style(styles::border_style(true));
    frame.render_widget(Paragraph::new(body).block(block), area);
}

/// Fixed-size rect centered in `area`, clamped to fit.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
