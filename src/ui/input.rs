//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes. Every navigation key goes through
//! `App::navigate`, which re-queries the session gate; nothing caches the
//! authentication answer between events.

use std::time::Instant;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, LoginFocus};
use crate::routes::Destination;

/// Handle a key event. Returns true if the app should quit.
///
/// Handlers never suspend: submitting the login form only arms the
/// request, and the event loop performs the backend call after drawing
/// the disabled control.
pub fn handle_input(app: &mut App, key: KeyEvent, now: Instant) -> Result<bool> {
    // Re-apply the guard to the current screen first, so a session that
    // expired since the last event redirects before the key does anything.
    app.navigate(app.screen);

    // Dev-only session inspector.
    if key.code == KeyCode::F(12) {
        app.toggle_inspector();
        return Ok(false);
    }
    if app.show_inspector {
        // Any other key dismisses the overlay.
        app.show_inspector = false;
        return Ok(false);
    }

    match app.screen {
        Destination::Home => handle_home_input(app, key),
        Destination::Login => handle_login_input(app, key, now),
        Destination::Dashboard => handle_dashboard_input(app, key),
    }
}

fn handle_home_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
        KeyCode::Char('l') => app.navigate(Destination::Login),
        KeyCode::Char('d') => app.navigate(Destination::Dashboard),
        _ => {}
    }
    Ok(false)
}

fn handle_login_input(app: &mut App, key: KeyEvent, now: Instant) -> Result<bool> {
    // Ignore everything while a login attempt is armed or in flight.
    if app.login.submitting {
        return Ok(false);
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('r') && app.login.focus == LoginFocus::Password {
            app.login.toggle_reveal(now);
        }
        return Ok(false);
    }

    match key.code {
        KeyCode::Esc => {
            app.navigate(Destination::Home);
        }
        KeyCode::Down | KeyCode::Tab => {
            app.login.focus_next();
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.login.focus_prev();
        }
        KeyCode::Enter => match app.login.focus {
            LoginFocus::Email => {
                app.login.focus = LoginFocus::Password;
            }
            LoginFocus::Password => {
                app.login.focus = LoginFocus::Button;
            }
            LoginFocus::Button => {
                app.request_login();
            }
        },
        KeyCode::Backspace => {
            app.login.backspace();
        }
        KeyCode::Char(c) => {
            app.login.push_char(c);
        }
        _ => {}
    }
    Ok(false)
}

fn handle_dashboard_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
        KeyCode::Char('x') => app.sign_out(),
        KeyCode::Char('h') => app.navigate(Destination::Home),
        _ => {}
    }
    Ok(false)
}
