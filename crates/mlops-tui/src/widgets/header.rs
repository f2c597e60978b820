//! Header bar: app title, tool tabs, route title and the cluster navigation
//! menu.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use mlops_app::route::{nav_items, Route};

use crate::theme::{palette, styles};

pub struct MainHeader<'a> {
    route: &'a Route,
}

impl<'a> MainHeader<'a> {
    pub fn new(route: &'a Route) -> Self {
        Self { route }
    }

    fn tool_tab(key: char, label: &'static str, active: bool) -> Vec<Span<'static>> {
        let style = if active {
            styles::focused_selected()
        } else {
            styles::text_secondary()
        };
        vec![
            Span::styled(format!("[{key}]"), styles::keybinding()),
            Span::styled(format!(" {label} "), style),
            Span::raw("  "),
        ]
    }

    fn title_line(&self) -> Line<'static> {
        let cluster_tool = self.route.is_cluster_tool();
        let mut spans = vec![
            Span::styled("● ", styles::accent()),
            Span::styled("mlops-console", styles::accent_bold()),
            Span::raw("   "),
        ];
        spans.extend(Self::tool_tab('1', "Codes", !cluster_tool));
        spans.extend(Self::tool_tab('2', "Clusters", cluster_tool));
        spans.push(Span::styled("│ ", styles::text_muted()));
        spans.push(Span::styled(
            self.route.title(),
            Style::default()
                .fg(palette::TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        ));
        Line::from(spans)
    }

    fn nav_line(&self) -> Line<'static> {
        let mut spans = vec![Span::styled("Tab ", styles::keybinding())];
        for item in nav_items(self.route) {
            let style = if item.active {
                styles::focused_selected()
            } else if item.enabled() {
                styles::text_primary()
            } else {
                styles::text_muted().add_modifier(Modifier::CROSSED_OUT)
            };
            spans.push(Span::styled(format!(" {} ", item.label), style));
            spans.push(Span::raw(" "));
        }
        Line::from(spans)
    }
}

impl Widget for MainHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false).style(Style::default().bg(palette::CARD_BG));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let mut lines = vec![self.title_line()];
        if self.route.is_cluster_tool() && inner.height >= 2 {
            lines.push(self.nav_line());
        }
        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use mlops_core::ResourceKind;

    #[test]
    fn test_code_tool_header() {
        let mut term = TestTerminal::with_size(100, 3);
        term.render_widget(MainHeader::new(&Route::CodeList), term.area());

        assert!(term.buffer_contains("mlops-console"));
        assert!(term.buffer_contains("[1] Codes"));
        assert!(term.buffer_contains("[2] Clusters"));
        assert!(!term.buffer_contains("Deployments"));
    }

    #[test]
    fn test_cluster_tool_header_shows_nav() {
        let mut term = TestTerminal::with_size(100, 4);
        let route = Route::ResourceList {
            cluster: "dev".into(),
            kind: ResourceKind::Pods,
        };
        term.render_widget(MainHeader::new(&route), term.area());

        assert!(term.line_contains(2, "Clusters"));
        assert!(term.line_contains(2, "Pods"));
        assert!(term.line_contains(2, "Deployments"));
    }

    #[test]
    fn test_header_in_tiny_area() {
        let mut term = TestTerminal::with_size(10, 2);
        term.render_widget(MainHeader::new(&Route::ClusterList), term.area());
        assert!(!term.content().is_empty());
    }
}
