//! Compare page: side-by-side attribute table for selected indicators.
//!
//! # Resolution
//!
//! ```text
//!   session_id? ──yes──▶ get_recommendations ──▶ keep requested ids ──▶ any? ──yes──▶ live
//!       │                       │                                        │
//!       no                    error                                      no
//!       │                       │                                        │
//!       └───────────────────────┴──────────▶ demo table, same ids ◀──────┘
//! ```
//!
//! Live columns follow the order of the session's recommendation set; demo
//! columns follow the order of `ids`. An empty resolution is an explicit
//! state, never an empty table.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::api::{ApiError, IndicatorApi, RecommendationsResponse};
use crate::catalog::fallback_by_id;
use crate::lifecycle::{Mount, Ticket};
use crate::models::{Component, Indicator, Level, Priority, Tone};
use crate::route::{CompareParams, ResultsParams, Route};
use crate::views::results::DataSource;

/// Text of the empty state.
pub const EMPTY_STATE: &str = "No indicators selected for comparison";

/// One column of the comparison table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonEntry {
    pub id: i64,
    pub name: String,
    pub component: Component,
    pub class: String,
    pub cost: Level,
    pub accuracy: Level,
    pub ease: Level,
    pub method_count: usize,
    pub principle: String,
    pub criterion: String,
    pub priority: Priority,
    pub definition: String,
}

impl From<&Indicator> for ComparisonEntry {
    fn from(i: &Indicator) -> Self {
        Self {
            id: i.id,
            name: i.name.clone(),
            component: i.component,
            class: i.class.clone(),
            cost: i.cost,
            accuracy: i.accuracy,
            ease: i.ease,
            method_count: i.methods.len(),
            principle: i.principle.clone(),
            criterion: i.criterion.clone(),
            priority: i.priority,
            definition: i.definition.clone(),
        }
    }
}

/// A table cell. Level cells carry the badge tone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<Tone>,
}

impl Cell {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: None,
        }
    }

    fn level(level: Level) -> Self {
        Self {
            text: level.as_str().to_string(),
            tone: Some(level.tone()),
        }
    }
}

/// One attribute across every column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    pub kind: RowKind,
    pub label: &'static str,
    pub cells: Vec<Cell>,
}

/// The compared attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Component,
    Class,
    Cost,
    Accuracy,
    Ease,
    Methods,
    Principle,
    Criterion,
    Priority,
    Definition,
}

impl RowKind {
    /// Rows, top to bottom.
    pub const ALL: [RowKind; 10] = [
        RowKind::Component,
        RowKind::Class,
        RowKind::Cost,
        RowKind::Accuracy,
        RowKind::Ease,
        RowKind::Methods,
        RowKind::Principle,
        RowKind::Criterion,
        RowKind::Priority,
        RowKind::Definition,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RowKind::Component => "Component",
            RowKind::Class => "Class",
            RowKind::Cost => "Cost",
            RowKind::Accuracy => "Accuracy",
            RowKind::Ease => "Ease of Use",
            RowKind::Methods => "Methods Available",
            RowKind::Principle => "Principle",
            RowKind::Criterion => "Criterion",
            RowKind::Priority => "Priority",
            RowKind::Definition => "Definition",
        }
    }

    fn cell(&self, e: &ComparisonEntry) -> Cell {
        match self {
            RowKind::Component => Cell::plain(e.component.as_str()),
            RowKind::Class => Cell::plain(e.class.as_str()),
            RowKind::Cost => Cell::level(e.cost),
            RowKind::Accuracy => Cell::level(e.accuracy),
            RowKind::Ease => Cell::level(e.ease),
            RowKind::Methods => Cell::plain(format!("{} methods", e.method_count)),
            RowKind::Principle => Cell::plain(e.principle.as_str()),
            RowKind::Criterion => Cell::plain(e.criterion.as_str()),
            RowKind::Priority => Cell::plain(e.priority.as_str()),
            RowKind::Definition => Cell::plain(e.definition.as_str()),
        }
    }
}

fn resolve_from(source: &[Indicator], ids: &[i64]) -> Vec<ComparisonEntry> {
    source
        .iter()
        .filter(|i| ids.contains(&i.id))
        .map(ComparisonEntry::from)
        .collect()
}

/// A recommendation fetch in flight.
#[derive(Debug)]
pub struct PendingResolve {
    ticket: Ticket,
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct CompareView {
    ids: Vec<i64>,
    session_id: Option<String>,
    entries: Vec<ComparisonEntry>,
    source: Option<DataSource>,
    error: Option<String>,
    loading: bool,
    #[serde(skip)]
    mount: Mount,
}

impl CompareView {
    /// Build the page for `params`.
    ///
    /// Without a session, or with nothing requested, the page resolves
    /// against the demo table immediately.
    pub fn from_params(params: &CompareParams) -> Self {
        let mut view = Self {
            ids: params.ids.clone(),
            session_id: params.session_id.clone(),
            entries: Vec::new(),
            source: None,
            error: None,
            loading: false,
            mount: Mount::new(),
        };
        if view.session_id.is_none() || view.ids.is_empty() {
            view.resolve_fallback();
        }
        view
    }

    fn resolve_fallback(&mut self) {
        self.entries = self
            .ids
            .iter()
            .filter_map(|id| fallback_by_id(*id))
            .map(|i| ComparisonEntry::from(&i))
            .collect();
        self.source = Some(DataSource::Fallback);
    }

    /// Start the session fetch. `None` when already resolved or in flight.
    pub fn begin_resolve(&mut self) -> Option<PendingResolve> {
        if self.source.is_some() || self.loading {
            return None;
        }
        let session_id = self.session_id.clone()?;
        self.mount.invalidate();
        self.loading = true;
        Some(PendingResolve {
            ticket: self.mount.ticket(),
            session_id,
        })
    }

    /// Apply the fetch result. Returns `false` if the page was left meanwhile.
    pub fn finish_resolve(
        &mut self,
        pending: PendingResolve,
        result: Result<RecommendationsResponse, ApiError>,
    ) -> bool {
        if !pending.ticket.is_current() {
            debug!(session = %pending.session_id, "dropping stale comparison fetch");
            return false;
        }
        self.loading = false;
        match result {
            Ok(resp) => {
                let live = resolve_from(&resp.indicators, &self.ids);
                if live.is_empty() {
                    info!(session = %pending.session_id, "no live matches, comparing demo data");
                    self.resolve_fallback();
                } else {
                    self.entries = live;
                    self.source = Some(DataSource::Live);
                }
            }
            Err(e) => {
                warn!(session = %pending.session_id, error = %e, "comparison fetch failed");
                self.error = Some(e.message().to_string());
                self.resolve_fallback();
            }
        }
        true
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_resolved(&self) -> bool {
        self.source.is_some()
    }

    /// Whether the columns come from the demo table.
    pub fn is_demo(&self) -> bool {
        self.source == Some(DataSource::Fallback)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn entries(&self) -> &[ComparisonEntry] {
        &self.entries
    }

    /// Resolved and nothing to show.
    pub fn is_empty_state(&self) -> bool {
        self.is_resolved() && self.entries.is_empty()
    }

    /// Header text, e.g. `"2 indicators selected"`.
    pub fn header(&self) -> String {
        format!("{} indicators selected", self.entries.len())
    }

    pub fn rows(&self) -> Vec<ComparisonRow> {
        RowKind::ALL
            .into_iter()
            .map(|kind| ComparisonRow {
                kind,
                label: kind.label(),
                cells: self.entries.iter().map(|e| kind.cell(e)).collect(),
            })
            .collect()
    }

    /// Link back to Results asking it to drop `id` from the carried selection.
    pub fn remove_route(&self, id: i64) -> Route {
        Route::Results(ResultsParams {
            session_id: self.session_id.clone(),
            ids: self.entries.iter().map(|e| e.id).collect(),
            remove: Some(id),
        })
    }

    /// Link back to Results, keeping the session when known.
    pub fn back_route(&self) -> Route {
        Route::results(self.session_id.as_deref())
    }

    pub fn unmount(&self) {
        self.mount.invalidate();
    }
}

/// Build the page for `params` and run its fetch, if any, to completion.
pub async fn resolve(params: &CompareParams, api: &dyn IndicatorApi) -> CompareView {
    let mut view = CompareView::from_params(params);
    if let Some(pending) = view.begin_resolve() {
        let result = api.get_recommendations(&pending.session_id).await;
        view.finish_resolve(pending, result);
    }
    view
}
