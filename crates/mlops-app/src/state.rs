//! Application state (Model in TEA pattern)

use serde_json::Value;

use mlops_core::{Cluster, ClusterDetails, Code, ResourceKind, ResourceList, Task};

use crate::code_detail::{Reselect, VersionSelection};
use crate::config::Settings;
use crate::confirm_dialog::ConfirmDialogState;
use crate::debounce::DebouncedHeight;
use crate::diff::VersionDiffState;
use crate::forms::{CodeCreateForm, CreateClusterForm};
use crate::log_stream::LogStreamState;
use crate::notifications::Notifications;
use crate::poller::TaskPoller;
use crate::remote::RemoteData;
use crate::route::Route;
use crate::selection::Selection;
use crate::text_buffer::TextBuffer;

/// Current UI mode; decides who receives key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiMode {
    #[default]
    Normal,
    /// Typing into the code list search box
    Search,
    /// Editing the selected version's script
    EditContent,
    /// Editing the selected parsing result version as JSON
    EditJson,
    /// Renaming the open code
    Rename,
    /// Version diff modal
    Diff,
    /// Create-cluster modal
    CreateCluster,
    ConfirmDialog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppPhase {
    #[default]
    Running,
    Quitting,
}

// ─────────────────────────────────────────────────────────────────────────────
// Code Tool
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct CodeListState {
    pub data: RemoteData<Vec<Code>>,
    pub selection: Selection,
    /// Row under the cursor, an index into [`Self::visible`]
    pub cursor: usize,
    pub search: TextBuffer,
    /// Bulk delete in flight
    pub deleting: bool,
}

impl CodeListState {
    /// Codes matching the search box
    pub fn visible(&self) -> Vec<&Code> {
        let query = self.search.text();
        let query = query.trim();
        self.data
            .data()
            .map(|codes| codes.iter().filter(|c| c.name_matches(query)).collect())
            .unwrap_or_default()
    }

    pub fn current(&self) -> Option<&Code> {
        self.visible().get(self.cursor).copied()
    }

    pub fn clamp_cursor(&mut self) {
        let len = self.visible().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }
}

#[derive(Debug, Clone)]
pub struct CodeDetailState {
    pub data: RemoteData<Code>,
    pub selection: VersionSelection,
    /// Selection rule for the next successful fetch
    pub pending_reselect: Reselect,
    pub height: DebouncedHeight,
    pub rename: TextBuffer,
    pub diff: Option<VersionDiffState>,
    /// Inline error for the JSON editor
    pub json_error: Option<String>,
    /// A save, parse or rename is in flight
    pub saving: bool,
}

impl CodeDetailState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            data: RemoteData::new(),
            selection: VersionSelection::new(),
            pending_reselect: Reselect::Latest,
            height: DebouncedHeight::new(settings.editor.height_debounce()),
            rename: TextBuffer::single_line(""),
            diff: None,
            json_error: None,
            saving: false,
        }
    }

    pub fn code(&self) -> Option<&Code> {
        self.data.data()
    }

    /// Editor rows after the debounced height recomputation
    pub fn editor_rows(&self) -> u16 {
        self.height.rows()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Cluster Tool
// ─────────────────────────────────────────────────────────────────────────────

/// Create-cluster modal: form plus the creation task being polled
#[derive(Debug, Clone, Default)]
pub struct CreateClusterModal {
    pub form: CreateClusterForm,
    pub poller: TaskPoller,
    /// Submitted and not yet answered
    pub submitting: bool,
    /// Tag of the latest submission from this modal
    pub submission: u64,
    pub error: Option<String>,
    /// Last status report of the creation task
    pub status: Option<Task>,
}

impl CreateClusterModal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inputs are locked while the request or the task is in flight
    pub fn is_busy(&self) -> bool {
        self.submitting || self.poller.is_active()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClusterListState {
    pub data: RemoteData<Vec<Cluster>>,
    pub cursor: usize,
    pub create: Option<CreateClusterModal>,
    /// Last submission tag handed out; outlives any one modal
    pub submissions: u64,
}

impl ClusterListState {
    pub fn current(&self) -> Option<&Cluster> {
        self.data.data()?.get(self.cursor)
    }
}

#[derive(Debug, Clone)]
pub struct ResourceListState {
    pub data: RemoteData<ResourceList>,
    /// Pods only: list across every namespace
    pub all_namespaces: bool,
    pub cursor: usize,
}

impl Default for ResourceListState {
    fn default() -> Self {
        Self {
            data: RemoteData::new(),
            all_namespaces: true,
            cursor: 0,
        }
    }
}

impl ResourceListState {
    pub fn current(&self) -> Option<&Value> {
        self.data.data()?.items.get(self.cursor)
    }

    /// `all_namespaces` query value for `kind`, `None` when not applicable
    pub fn all_namespaces_for(&self, kind: ResourceKind) -> Option<bool> {
        kind.supports_all_namespaces().then_some(self.all_namespaces)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailTab {
    #[default]
    Details,
    Yaml,
    Logs,
}

impl DetailTab {
    /// Tabs shown for `kind`; only pods have logs
    pub fn available(kind: ResourceKind) -> &'static [DetailTab] {
        if kind == ResourceKind::Pods {
            &[DetailTab::Details, DetailTab::Yaml, DetailTab::Logs]
        } else {
            &[DetailTab::Details, DetailTab::Yaml]
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DetailTab::Details => "Details",
            DetailTab::Yaml => "YAML",
            DetailTab::Logs => "Logs",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResourceDetailState {
    pub data: RemoteData<Value>,
    pub tab: DetailTab,
    pub scroll: usize,
}

// ─────────────────────────────────────────────────────────────────────────────
// AppState
// ─────────────────────────────────────────────────────────────────────────────

/// Complete application state (the Model in TEA)
#[derive(Debug, Clone)]
pub struct AppState {
    pub route: Route,
    /// Routes to return to with Back
    pub history: Vec<Route>,
    pub ui_mode: UiMode,
    pub phase: AppPhase,
    pub settings: Settings,
    pub notifications: Notifications,
    pub confirm_dialog: Option<ConfirmDialogState>,

    pub codes: CodeListState,
    pub code_create: CodeCreateForm,
    pub code_detail: CodeDetailState,

    pub clusters: ClusterListState,
    pub cluster_details: RemoteData<ClusterDetails>,
    pub resources: ResourceListState,
    pub resource_detail: ResourceDetailState,
    pub logs: LogStreamState,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(Settings::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        let refresh = settings.ui.refresh_interval();
        Self {
            route: Route::default(),
            history: Vec::new(),
            ui_mode: UiMode::Normal,
            phase: AppPhase::Running,
            notifications: Notifications::new(settings.ui.notification_ttl()),
            confirm_dialog: None,
            codes: CodeListState::default(),
            code_create: CodeCreateForm::new(),
            code_detail: CodeDetailState::new(&settings),
            clusters: ClusterListState {
                data: RemoteData::new().with_refresh(refresh),
                ..Default::default()
            },
            cluster_details: RemoteData::new().with_refresh(refresh),
            resources: ResourceListState {
                data: RemoteData::new().with_refresh(refresh),
                ..Default::default()
            },
            resource_detail: ResourceDetailState::default(),
            logs: LogStreamState::new(),
            settings,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.phase == AppPhase::Quitting
    }

    pub fn request_quit(&mut self) {
        self.phase = AppPhase::Quitting;
    }

    pub fn show_dialog(&mut self, dialog: ConfirmDialogState) {
        self.confirm_dialog = Some(dialog);
        self.ui_mode = UiMode::ConfirmDialog;
    }

    pub fn close_dialog(&mut self) {
        self.confirm_dialog = None;
        self.ui_mode = UiMode::Normal;
    }

    /// Cluster the current route is scoped to
    pub fn selected_cluster(&self) -> Option<&str> {
        crate::route::selected_cluster(&self.route)
    }
}
