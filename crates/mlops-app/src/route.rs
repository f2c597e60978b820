//! Routes and route-derived selection
//!
//! The current [`Route`] is the single source of truth for "where the user
//! is". The selected cluster and the cluster-scoped navigation menu are pure
//! functions of it, recomputed on every render; nothing else can change them.

use std::fmt;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

use mlops_core::ResourceKind;

/// Characters escaped inside a path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A screen in the console.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    CodeList,
    CodeCreate,
    CodeDetail {
        id: i64,
    },
    ClusterList,
    ClusterDetail {
        cluster: String,
    },
    ResourceList {
        cluster: String,
        kind: ResourceKind,
    },
    ResourceDetail {
        cluster: String,
        kind: ResourceKind,
        name: String,
        namespace: Option<String>,
    },
    PodLogs {
        cluster: String,
        pod: String,
        namespace: String,
    },
}

impl Route {
    /// Parse a path such as `/clusters/dev/pods/web-1/logs?namespace=prod`.
    ///
    /// Code tool routes live under `/codes`. Unknown paths yield `None`.
    pub fn parse(path: &str) -> Option<Self> {
        let (path, query) = match path.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (path, None),
        };
        let namespace = query.and_then(|q| query_param(q, "namespace"));
        let segments: Vec<String> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(decode)
            .collect();
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

        let route = match segments.as_slice() {
            [] | ["codes"] => Route::CodeList,
            ["codes", "new"] => Route::CodeCreate,
            ["codes", id] => Route::CodeDetail { id: id.parse().ok()? },
            ["clusters"] => Route::ClusterList,
            ["clusters", cluster] => Route::ClusterDetail {
                cluster: cluster.to_string(),
            },
            ["clusters", cluster, kind] => Route::ResourceList {
                cluster: cluster.to_string(),
                kind: ResourceKind::parse(kind)?,
            },
            ["clusters", cluster, "pods", pod, "logs"] => Route::PodLogs {
                cluster: cluster.to_string(),
                pod: pod.to_string(),
                namespace: namespace.unwrap_or_else(|| "default".to_string()),
            },
            ["clusters", cluster, kind, name] => Route::ResourceDetail {
                cluster: cluster.to_string(),
                kind: ResourceKind::parse(kind)?,
                name: name.to_string(),
                namespace,
            },
            _ => return None,
        };
        Some(route)
    }

    /// Canonical path for this route; `Route::parse(&r.path()) == Some(r)`.
    pub fn path(&self) -> String {
        match self {
            Route::CodeList => "/codes".to_string(),
            Route::CodeCreate => "/codes/new".to_string(),
            Route::CodeDetail { id } => format!("/codes/{id}"),
            Route::ClusterList => "/clusters".to_string(),
            Route::ClusterDetail { cluster } => format!("/clusters/{}", encode(cluster)),
            Route::ResourceList { cluster, kind } => {
                format!("/clusters/{}/{}", encode(cluster), kind)
            }
            Route::ResourceDetail {
                cluster,
                kind,
                name,
                namespace,
            } => {
                let base = format!("/clusters/{}/{}/{}", encode(cluster), kind, encode(name));
                match namespace {
                    Some(ns) => format!("{base}?namespace={}", encode(ns)),
                    None => base,
                }
            }
            Route::PodLogs {
                cluster,
                pod,
                namespace,
            } => format!(
                "/clusters/{}/pods/{}/logs?namespace={}",
                encode(cluster),
                encode(pod),
                encode(namespace)
            ),
        }
    }

    /// Where "back" goes when there is no history
    pub fn parent(&self) -> Option<Route> {
        match self {
            Route::CodeList | Route::ClusterList => None,
            Route::CodeCreate | Route::CodeDetail { .. } => Some(Route::CodeList),
            Route::ClusterDetail { .. } => Some(Route::ClusterList),
            Route::ResourceList { cluster, .. } => Some(Route::ClusterDetail {
                cluster: cluster.clone(),
            }),
            Route::ResourceDetail { cluster, kind, .. } => Some(Route::ResourceList {
                cluster: cluster.clone(),
                kind: *kind,
            }),
            Route::PodLogs {
                cluster,
                pod,
                namespace,
            } => Some(Route::ResourceDetail {
                cluster: cluster.clone(),
                kind: ResourceKind::Pods,
                name: pod.clone(),
                namespace: Some(namespace.clone()),
            }),
        }
    }

    /// Belongs to the cluster tool (as opposed to the code tool)
    pub fn is_cluster_tool(&self) -> bool {
        !matches!(
            self,
            Route::CodeList | Route::CodeCreate | Route::CodeDetail { .. }
        )
    }

    pub fn title(&self) -> String {
        match self {
            Route::CodeList => "Codes".to_string(),
            Route::CodeCreate => "New Code".to_string(),
            Route::CodeDetail { id } => format!("Code #{id}"),
            Route::ClusterList => "Clusters".to_string(),
            Route::ClusterDetail { cluster } => format!("Cluster {cluster}"),
            Route::ResourceList { cluster, kind } => format!("{} in {cluster}", kind.title()),
            Route::ResourceDetail { kind, name, .. } => format!("{} {name}", kind.title()),
            Route::PodLogs { pod, .. } => format!("Logs: {pod}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

fn encode(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

fn decode(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

fn query_param(query: &str, name: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
        (k == name).then(|| decode(v))
    })
}

/// The cluster the current route is scoped to, if any.
pub fn selected_cluster(route: &Route) -> Option<&str> {
    match route {
        Route::ClusterDetail { cluster }
        | Route::ResourceList { cluster, .. }
        | Route::ResourceDetail { cluster, .. }
        | Route::PodLogs { cluster, .. } => Some(cluster),
        _ => None,
    }
}

/// One entry of the cluster tool's navigation menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    /// `None` when the entry is disabled (no cluster selected)
    pub target: Option<Route>,
    pub active: bool,
}

impl NavItem {
    pub fn enabled(&self) -> bool {
        self.target.is_some()
    }
}

/// Build the navigation menu for `route`.
///
/// Resource entries link into the selected cluster and are disabled when no
/// cluster is selected.
pub fn nav_items(route: &Route) -> Vec<NavItem> {
    let cluster = selected_cluster(route);
    let mut items = vec![NavItem {
        label: "Clusters",
        target: Some(Route::ClusterList),
        active: matches!(route, Route::ClusterList),
    }];
    for kind in ResourceKind::NAVIGABLE {
        let active = match route {
            Route::ResourceList { kind: k, .. } | Route::ResourceDetail { kind: k, .. } => {
                *k == kind
            }
            Route::PodLogs { .. } => kind == ResourceKind::Pods,
            _ => false,
        };
        items.push(NavItem {
            label: kind.title(),
            target: cluster.map(|c| Route::ResourceList {
                cluster: c.to_string(),
                kind,
            }),
            active,
        });
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_routes() -> Vec<Route> {
        vec![
            Route::CodeList,
            Route::CodeCreate,
            Route::CodeDetail { id: 42 },
            Route::ClusterList,
            Route::ClusterDetail {
                cluster: "dev cluster".into(),
            },
            Route::ResourceList {
                cluster: "dev".into(),
                kind: ResourceKind::Services,
            },
            Route::ResourceDetail {
                cluster: "dev".into(),
                kind: ResourceKind::Pods,
                name: "web/1".into(),
                namespace: Some("prod".into()),
            },
            Route::ResourceDetail {
                cluster: "dev".into(),
                kind: ResourceKind::Nodes,
                name: "dev-control-plane".into(),
                namespace: None,
            },
            Route::PodLogs {
                cluster: "dev".into(),
                pod: "web-1".into(),
                namespace: "kube system".into(),
            },
        ]
    }

    #[test]
    fn test_path_parse_roundtrip() {
        for route in all_routes() {
            assert_eq!(Route::parse(&route.path()), Some(route.clone()), "{route:?}");
        }
    }

    #[test]
    fn test_parse_decodes_segments() {
        let route = Route::parse("/clusters/my%20cluster").unwrap();
        assert_eq!(selected_cluster(&route), Some("my cluster"));
    }

    #[test]
    fn test_parse_logs_defaults_namespace() {
        assert_eq!(
            Route::parse("/clusters/dev/pods/web/logs"),
            Some(Route::PodLogs {
                cluster: "dev".into(),
                pod: "web".into(),
                namespace: "default".into(),
            })
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(Route::parse("/clusters/dev/secrets"), None);
        assert_eq!(Route::parse("/codes/abc"), None);
        assert_eq!(Route::parse("/nowhere"), None);
    }

    #[test]
    fn test_root_is_code_list() {
        assert_eq!(Route::parse("/"), Some(Route::CodeList));
    }

    #[test]
    fn test_selected_cluster_derivation() {
        assert_eq!(selected_cluster(&Route::ClusterList), None);
        assert_eq!(selected_cluster(&Route::CodeDetail { id: 1 }), None);
        let logs = Route::parse("/clusters/dev/pods/web/logs").unwrap();
        assert_eq!(selected_cluster(&logs), Some("dev"));
    }

    #[test]
    fn test_nav_items_disabled_without_cluster() {
        let items = nav_items(&Route::ClusterList);
        assert_eq!(items.len(), 5);
        assert!(items[0].enabled());
        assert!(items[0].active);
        assert!(items[1..].iter().all(|i| !i.enabled()));
    }

    #[test]
    fn test_nav_items_scoped_to_selected_cluster() {
        let route = Route::ResourceList {
            cluster: "dev".into(),
            kind: ResourceKind::Pods,
        };
        let items = nav_items(&route);
        let pods = items.iter().find(|i| i.label == "Pods").unwrap();
        assert!(pods.active);
        assert_eq!(
            pods.target,
            Some(Route::ResourceList {
                cluster: "dev".into(),
                kind: ResourceKind::Pods
            })
        );
        let nodes = items.iter().find(|i| i.label == "Nodes").unwrap();
        assert!(!nodes.active);
        assert!(nodes.enabled());
    }

    #[test]
    fn test_parent_chain_ends_at_list() {
        let mut route = Route::parse("/clusters/dev/pods/web/logs").unwrap();
        let mut hops = 0;
        while let Some(parent) = route.parent() {
            route = parent;
            hops += 1;
        }
        assert_eq!(route, Route::ClusterList);
        assert_eq!(hops, 4);
    }
}
