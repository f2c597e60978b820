//! Screen layout definitions for the TUI

use ratatui::layout::{Constraint, Layout, Rect};

/// Screen areas for the main layout
#[derive(Debug, Clone, Copy)]
pub struct ScreenAreas {
    /// Title, tool tabs and the cluster navigation menu
    pub header: Rect,
    pub body: Rect,
    /// Notifications and key hints
    pub status: Rect,
}

/// Split the screen; the cluster tool gets an extra header row for its
/// navigation menu.
pub fn create(area: Rect, cluster_tool: bool) -> ScreenAreas {
    let header_height = if cluster_tool { 4 } else { 3 };
    let chunks = Layout::vertical([
        Constraint::Length(header_height),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .split(area);

    ScreenAreas {
        header: chunks[0],
        body: chunks[1],
        status: chunks[2],
    }
}

/// Rows available inside a bordered block of `area`
pub fn inner_rows(area: Rect) -> usize {
    area.height.saturating_sub(2) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_tool_layout() {
        let layout = create(Rect::new(0, 0, 80, 24), false);
        assert_eq!(layout.header.height, 3);
        assert_eq!(layout.body.height, 20);
        assert_eq!(layout.status.height, 1);
        assert_eq!(layout.status.y, 23);
    }

    #[test]
    fn test_cluster_tool_layout_has_nav_row() {
        let layout = create(Rect::new(0, 0, 80, 24), true);
        assert_eq!(layout.header.height, 4);
        assert_eq!(layout.body.y, 4);
    }

    #[test]
    fn test_layout_areas_contiguous() {
        let area = Rect::new(0, 0, 80, 24);
        for cluster_tool in [false, true] {
            let layout = create(area, cluster_tool);
            assert_eq!(
                layout.header.height + layout.body.height + layout.status.height,
                area.height
            );
        }
    }

    #[test]
    fn test_inner_rows_saturates() {
        assert_eq!(inner_rows(Rect::new(0, 0, 10, 1)), 0);
        assert_eq!(inner_rows(Rect::new(0, 0, 10, 12)), 10);
    }
}
