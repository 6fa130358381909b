//! Results page: the recommendation set, filters, and comparison picks.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::api::{ApiError, IndicatorApi, RecommendationsResponse};
use crate::catalog::fallback_indicators;
use crate::filter::{FilterValue, IndicatorFilters};
use crate::lifecycle::{Mount, Ticket};
use crate::models::{Component, Indicator, Level};
use crate::route::{ChatParams, ResultsParams, Route};
use crate::selection::SelectionSet;

/// Where the indicators on screen came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// The recommendation set for the current session.
    Live,
    /// The static demo catalog.
    Fallback,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

/// A recommendation fetch in flight.
#[derive(Debug)]
pub struct PendingLoad {
    ticket: Ticket,
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct ResultsView {
    session_id: Option<String>,
    indicators: Vec<Indicator>,
    source: DataSource,
    loading: bool,
    loaded: bool,
    error: Option<String>,
    notice: Option<String>,
    filters: IndicatorFilters,
    selection: SelectionSet,
    view_mode: ViewMode,
    expanded: Option<i64>,
    #[serde(skip)]
    mount: Mount,
}

impl ResultsView {
    /// Build the page for `params`.
    ///
    /// Without a session the demo catalog is shown straight away and no fetch
    /// is needed. `ids` minus `remove` seeds the comparison selection.
    pub fn from_params(params: &ResultsParams) -> Self {
        let mut selection = SelectionSet::from_ids(params.ids.iter().copied());
        if let Some(id) = params.remove {
            selection.remove(id);
        }

        let mut view = Self {
            session_id: params.session_id.clone(),
            indicators: Vec::new(),
            source: DataSource::Live,
            loading: false,
            loaded: false,
            error: None,
            notice: None,
            filters: IndicatorFilters::default(),
            selection,
            view_mode: ViewMode::default(),
            expanded: None,
            mount: Mount::new(),
        };
        if view.session_id.is_none() {
            view.adopt_fallback();
        }
        view
    }

    fn adopt_fallback(&mut self) {
        self.indicators = fallback_indicators();
        self.source = DataSource::Fallback;
        self.loaded = true;
        self.selection.retain_known(&self.indicators);
    }

    /// Start fetching the session's recommendations.
    ///
    /// `None` when there is no session or a fetch is already in flight.
    pub fn begin_load(&mut self) -> Option<PendingLoad> {
        let session_id = self.session_id.clone()?;
        if self.loading {
            return None;
        }
        self.mount.invalidate();
        self.loading = true;
        Some(PendingLoad {
            ticket: self.mount.ticket(),
            session_id,
        })
    }

    /// Apply a fetch result, replacing the whole indicator set.
    ///
    /// Empty results fall back quietly; errors fall back and raise a banner.
    /// Returns `false` if the page was left meanwhile.
    pub fn finish_load(
        &mut self,
        pending: PendingLoad,
        result: Result<RecommendationsResponse, ApiError>,
    ) -> bool {
        if !pending.ticket.is_current() {
            debug!(session = %pending.session_id, "dropping stale recommendations");
            return false;
        }
        self.loading = false;
        self.error = None;
        self.notice = None;
        match result {
            Ok(resp) if !resp.indicators.is_empty() => {
                info!(
                    session = %pending.session_id,
                    count = resp.indicators.len(),
                    "loaded recommendations"
                );
                self.indicators = resp.indicators;
                self.source = DataSource::Live;
                self.loaded = true;
                self.notice = resp.message;
                self.selection.retain_known(&self.indicators);
            }
            Ok(resp) => {
                info!(session = %pending.session_id, "no recommendations, showing demo data");
                self.notice = resp.message;
                self.adopt_fallback();
            }
            Err(e) => {
                warn!(session = %pending.session_id, error = %e, "recommendations failed");
                self.error = Some(e.message().to_string());
                self.adopt_fallback();
            }
        }
        true
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn using_fallback(&self) -> bool {
        self.source == DataSource::Fallback
    }

    pub fn source(&self) -> DataSource {
        self.source
    }

    /// Error banner text, set only when the fetch failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Informational message the service attached to its reply.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// The whole active set, ignoring filters.
    pub fn indicators(&self) -> &[Indicator] {
        &self.indicators
    }

    /// The active set after filtering.
    pub fn visible(&self) -> Vec<&Indicator> {
        self.filters.apply(&self.indicators)
    }

    /// Header text, e.g. `"4 indicators found"`.
    pub fn count_label(&self) -> String {
        format!("{} indicators found", self.visible().len())
    }

    pub fn filters(&self) -> &IndicatorFilters {
        &self.filters
    }

    pub fn set_component_filter(&mut self, value: FilterValue<Component>) {
        self.filters.component = value;
    }

    pub fn set_cost_filter(&mut self, value: FilterValue<Level>) {
        self.filters.cost = value;
    }

    pub fn set_ease_filter(&mut self, value: FilterValue<Level>) {
        self.filters.ease = value;
    }

    pub fn reset_filters(&mut self) {
        self.filters.reset();
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn is_selected(&self, id: i64) -> bool {
        self.selection.contains(id)
    }

    /// Flip `id` in or out of the comparison set. Returns whether it is now selected.
    pub fn toggle_selection(&mut self, id: i64) -> bool {
        self.selection.toggle(id)
    }

    /// The "Compare (n)" link, present once something is selected.
    pub fn compare_route(&self) -> Option<Route> {
        if self.selection.is_empty() {
            None
        } else {
            Some(Route::compare(
                self.selection.ids(),
                self.session_id.as_deref(),
            ))
        }
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    /// Expand `id`'s card, or collapse it if it is already the expanded one.
    pub fn toggle_expand(&mut self, id: i64) {
        self.expanded = if self.expanded == Some(id) {
            None
        } else {
            Some(id)
        };
    }

    pub fn expanded(&self) -> Option<i64> {
        self.expanded
    }

    /// Back link to the conversation.
    pub fn chat_route(&self) -> Route {
        Route::Chat(ChatParams {
            session_id: self.session_id.clone(),
            ..Default::default()
        })
    }

    pub fn unmount(&self) {
        self.mount.invalidate();
    }
}

/// Build the page for `params` and run its fetch, if any, to completion.
pub async fn load(params: &ResultsParams, api: &dyn IndicatorApi) -> ResultsView {
    let mut view = ResultsView::from_params(params);
    if let Some(pending) = view.begin_load() {
        let result = api.get_recommendations(&pending.session_id).await;
        view.finish_load(pending, result);
    }
    view
}
