use crate::app::App;
use crate::state::app_state::Focus;
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

    if matches!(key_event.code, Char('c')) && key_event.modifiers.contains(KeyModifiers::CONTROL) {
        crate::cleanup_terminal();
        std::process::exit(0);
    }

    // A blocking notification swallows everything until dismissed.
    if guard.state.notification.is_some() {
        if matches!(key_event.code, KeyCode::Enter | KeyCode::Esc) {
            guard.dismiss_notification();
        }
        return;
    }

    if guard.state.page.edit.is_some() {
        let request = handle_edit_keys(key_event, &mut guard);
        drop(guard);
        if let Some(request) = request {
            let _ = network_requests.send(request).await;
        }
        return;
    }

    if guard.state.show_help {
        if matches!(key_event.code, KeyCode::Esc | Char('?') | Char('q')) {
            guard.toggle_help();
        }
        return;
    }

    let request = match (guard.state.focus, key_event.code) {
        (_, Char('q')) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }
        (_, KeyCode::Tab) => {
            guard.switch_focus();
            None
        }
        (_, Char('r')) => guard.refresh(),
        (_, Char('S')) => guard.trigger_scrape(),
        (_, Char('?')) => {
            guard.toggle_help();
            None
        }
        (_, Char('"')) => {
            guard.toggle_show_logs();
            None
        }

        // League selector
        (Focus::Leagues, Char('j') | KeyCode::Down) => {
            guard.league_cursor_down();
            None
        }
        (Focus::Leagues, Char('k') | KeyCode::Up) => {
            guard.league_cursor_up();
            None
        }
        (Focus::Leagues, KeyCode::Enter) => guard.select_league_under_cursor(),

        // Standings table
        (Focus::Standings, Char('j') | KeyCode::Down) => {
            guard.row_cursor_down();
            None
        }
        (Focus::Standings, Char('k') | KeyCode::Up) => {
            guard.row_cursor_up();
            None
        }
        (Focus::Standings, Char('K')) => {
            guard.move_selected_up();
            None
        }
        (Focus::Standings, Char('J')) => {
            guard.move_selected_down();
            None
        }
        (Focus::Standings, Char('l') | KeyCode::Right) => {
            guard.next_stage();
            None
        }
        (Focus::Standings, Char('h') | KeyCode::Left) => {
            guard.prev_stage();
            None
        }
        (Focus::Standings, Char('s')) => guard.save_order(),
        (Focus::Standings, Char('t')) => guard.toggle_selected_status(),
        (Focus::Standings, Char('e') | KeyCode::Enter) => {
            guard.open_edit();
            None
        }
        (Focus::Standings, KeyCode::Esc) => {
            guard.switch_focus();
            None
        }

        _ => None,
    };

    drop(guard);
    if let Some(request) = request {
        let _ = network_requests.send(request).await;
    }
}

fn handle_edit_keys(key_event: KeyEvent, app: &mut App) -> Option<NetworkRequest> {
    match key_event.code {
        KeyCode::Esc => {
            app.close_edit();
            None
        }
        KeyCode::Enter => app.submit_edit(),
        KeyCode::Tab | KeyCode::Down => {
            app.edit_form_mut()?.focus_next();
            None
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.edit_form_mut()?.focus_prev();
            None
        }
        KeyCode::Backspace => {
            app.edit_form_mut()?.backspace();
            None
        }
        Char(c) => {
            app.edit_form_mut()?.push_char(c);
            None
        }
        _ => None,
    }
}
