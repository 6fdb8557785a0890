use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main layout structure
pub struct MainLayout {
    pub keybindings_area: Rect,
    pub mode_bar_area: Rect,
    pub tabs_area: Rect,
    /// Whole content area (stats tab)
    pub main_area: Rect,
    pub list_area: Rect,
    pub details_area: Rect,
}

/// Create the main layout
/// - Top bar: keybindings (1 row)
/// - Mode bar: mode, countdown status, lock label (4 rows)
/// - Tab strip (1 row)
/// - Main area: List (70%) | Details (30%)
pub fn create_layout(area: Rect) -> MainLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Keybindings bar
            Constraint::Length(4), // Mode bar
            Constraint::Length(1), // Tabs
            Constraint::Min(0),    // Main content
        ])
        .split(area);

    let main_area = main_chunks[3];
    let horizontal_split = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(70), // List pane
            Constraint::Percentage(30), // Details pane
        ])
        .split(main_area);

    MainLayout {
        keybindings_area: main_chunks[0],
        mode_bar_area: main_chunks[1],
        tabs_area: main_chunks[2],
        main_area,
        list_area: horizontal_split[0],
        details_area: horizontal_split[1],
    }
}

/// Create centered modal area
pub fn create_modal_area(area: Rect) -> Rect {
    centered(area, 16, 60)
}

/// Create the unlock dialog area inside the lock screen
pub fn create_unlock_area(area: Rect) -> Rect {
    centered(area, 12, 50)
}

fn centered(area: Rect, height: u16, width_percent: u16) -> Rect {
    let side = (100 - width_percent) / 2;
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Length(height),
            Constraint::Percentage(25),
        ])
        .split(area);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(side),
            Constraint::Percentage(width_percent),
            Constraint::Percentage(side),
        ])
        .split(vertical_chunks[1]);

    horizontal_chunks[1]
}
