pub mod details_pane;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod lock_screen;
pub mod mistake_pane;
pub mod modal;
pub mod mode_bar;
pub mod stats_pane;
pub mod styles;

use crate::app::AppState;
use crate::domain::Tab;
use chrono::{DateTime, Local};
use details_pane::render_details_pane;
use input_form::{render_input_form, render_mistake_form};
use keybindings::{render_keybindings, render_tabs};
use layout::create_layout;
use list_pane::render_list_pane;
use lock_screen::render_lock_screen;
use mistake_pane::{render_mistake_details, render_mistake_list};
use modal::{render_confirm_delete_modal, render_confirm_quit_modal, render_notice_modal};
use mode_bar::render_mode_bar;
use ratatui::Frame;
use stats_pane::render_stats_pane;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState, now: DateTime<Local>) {
    let size = f.size();

    // Full screen lock: nothing else is drawn
    if app.is_lock_screen() {
        render_lock_screen(f, app, size, now);
        return;
    }

    let layout = create_layout(size);

    render_keybindings(f, layout.keybindings_area);
    render_mode_bar(f, app, layout.mode_bar_area, now);
    render_tabs(f, layout.tabs_area, app.tab);

    match app.tab {
        Tab::Stats => render_stats_pane(f, app, layout.main_area, now),
        Tab::Mistakes => {
            render_mistake_list(f, app, layout.list_area);
            render_mistake_details(f, app, layout.details_area);
        }
        Tab::Pending | Tab::Completed => {
            render_list_pane(f, app, layout.list_area, now);
            render_details_pane(f, app, layout.details_area, now);
        }
    }

    // Modals
    render_input_form(f, app, size);
    render_mistake_form(f, app, size);
    render_notice_modal(f, app, size);
    render_confirm_quit_modal(f, app, size);
    render_confirm_delete_modal(f, app, size);
}
