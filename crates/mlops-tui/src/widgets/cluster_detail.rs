//! Cluster overview cards

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use mlops_app::remote::RemoteData;
use mlops_core::ClusterDetails;

use super::remote_placeholder;
use crate::theme::styles;

pub struct ClusterOverview<'a> {
    cluster: &'a str,
    details: &'a RemoteData<ClusterDetails>,
}

impl<'a> ClusterOverview<'a> {
    pub fn new(cluster: &'a str, details: &'a RemoteData<ClusterDetails>) -> Self {
        Self { cluster, details }
    }
}

fn card(title: &str, value: String, area: Rect, buf: &mut Buffer) {
    let block = styles::glass_block(false).title(format!(" {title} "));
    let inner = block.inner(area);
    block.render(area, buf);
    Paragraph::new(Line::from(Span::styled(value, styles::accent_bold())))
        .wrap(Wrap { trim: true })
        .render(inner, buf);
}

impl Widget for ClusterOverview<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [title, cards, hint] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(8),
            Constraint::Min(0),
        ])
        .areas(area);

        Paragraph::new(Line::from(vec![
            Span::styled("Cluster ", styles::text_secondary()),
            Span::styled(self.cluster.to_string(), styles::accent_bold()),
        ]))
        .render(title, buf);

        if let Some(placeholder) = remote_placeholder(self.details, "cluster details") {
            placeholder.render(cards, buf);
            return;
        }
        let Some(details) = self.details.data() else {
            return;
        };

        let [top, bottom] =
            Layout::vertical([Constraint::Length(4), Constraint::Length(4)]).areas(cards);
        let [nodes, pods] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(top);
        let [services, deployments] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(bottom);

        card("Nodes", details.node_count.to_string(), nodes, buf);
        card(
            &format!("Pods ({})", details.pod_summary.total()),
            details.pod_summary.describe(),
            pods,
            buf,
        );
        card("Services", details.service_count.to_string(), services, buf);
        card(
            "Deployments",
            details.deployment_count.to_string(),
            deployments,
            buf,
        );

        Paragraph::new(Span::styled(
            "Tab/Shift+Tab to browse nodes, pods, services and deployments",
            styles::text_muted(),
        ))
        .render(hint, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{loaded, TestTerminal};
    use mlops_core::PodSummary;

    #[test]
    fn test_renders_counts() {
        let mut term = TestTerminal::with_size(120, 20);
        let details = loaded(ClusterDetails {
            node_count: 3,
            pod_summary: PodSummary {
                running: 2,
                succeeded: 0,
                pending: 1,
                failed: 0,
            },
            service_count: 4,
            deployment_count: 5,
        });
        term.render_widget(ClusterOverview::new("dev", &details), term.area());

        assert!(term.buffer_contains("Cluster dev"));
        assert!(term.buffer_contains("Nodes"));
        assert!(term.buffer_contains("2 Running, 0 Succeeded, 1 Pending, 0 Failed"));
        assert!(term.buffer_contains("Deployments"));
    }

    #[test]
    fn test_loading_state() {
        let mut term = TestTerminal::new();
        let mut details = RemoteData::<ClusterDetails>::new();
        details.request(Some("dev".into()));
        term.render_widget(ClusterOverview::new("dev", &details), term.area());

        assert!(term.buffer_contains("Loading cluster details"));
    }
}
