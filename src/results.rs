//! `cba results`: the recommendation set with filters and comparison picks.

use anyhow::Result;

use cba_core::api::IndicatorApi;
use cba_core::filter::{FilterValue, IndicatorFilters};
use cba_core::models::{Component, Indicator, Level};
use cba_core::route::ResultsParams;
use cba_core::views::results::{self, ResultsView, ViewMode};

use crate::render::{self, badge, OutputFormat};

/// Everything `cba results` can do to the page after it loads.
#[derive(Debug, Clone, Default)]
pub struct ResultsOptions {
    pub filters: IndicatorFilters,
    /// IDs to toggle in the comparison set, in order.
    pub select: Vec<i64>,
    pub view_mode: ViewMode,
    pub expand: Option<i64>,
}

impl ResultsOptions {
    pub fn new(
        component: FilterValue<Component>,
        cost: FilterValue<Level>,
        ease: FilterValue<Level>,
    ) -> Self {
        Self {
            filters: IndicatorFilters {
                component,
                cost,
                ease,
            },
            ..Default::default()
        }
    }
}

/// Load the page and apply `options` the way a user would click through it.
pub async fn open_results(
    api: &dyn IndicatorApi,
    params: &ResultsParams,
    options: &ResultsOptions,
) -> ResultsView {
    let mut view = results::load(params, api).await;
    view.set_component_filter(options.filters.component);
    view.set_cost_filter(options.filters.cost);
    view.set_ease_filter(options.filters.ease);
    for id in &options.select {
        view.toggle_selection(*id);
    }
    view.set_view_mode(options.view_mode);
    if let Some(id) = options.expand {
        view.toggle_expand(id);
    }
    view
}

fn card(out: &mut String, view: &ResultsView, indicator: &Indicator) {
    let mark = if view.is_selected(indicator.id) {
        "[Selected]"
    } else {
        "[Compare]"
    };
    out.push_str(&format!("[{}] {}  {}\n", indicator.id, indicator.name, mark));
    out.push_str(&format!(
        "     {} · {} · {}\n",
        indicator.component, indicator.class, indicator.priority
    ));
    out.push_str(&format!(
        "     Cost: {}  Accuracy: {}  Ease: {}\n",
        badge(indicator.cost),
        badge(indicator.accuracy),
        badge(indicator.ease)
    ));

    if view.expanded() == Some(indicator.id) {
        if !indicator.definition.is_empty() {
            out.push_str(&render::wrap(&indicator.definition, 70, "     "));
            out.push('\n');
        }
        out.push_str(&format!(
            "     {} / {}\n",
            indicator.principle, indicator.criterion
        ));
        out.push_str(&format!("     Methods ({}):\n", indicator.methods.len()));
        for m in &indicator.methods {
            out.push_str(&format!(
                "       - {}  (cost {}, accuracy {}, ease {})\n",
                m.name,
                badge(m.cost),
                badge(m.accuracy),
                badge(m.ease)
            ));
        }
    }
}

fn row(out: &mut String, view: &ResultsView, indicator: &Indicator) {
    let mark = if view.is_selected(indicator.id) { "*" } else { " " };
    out.push_str(&format!(
        "{} {:>4}  {:<32} {:<14} cost {:<6} accuracy {:<6} ease {}\n",
        mark,
        indicator.id,
        indicator.name,
        indicator.component.as_str(),
        indicator.cost.as_str(),
        indicator.accuracy.as_str(),
        indicator.ease.as_str()
    ));
}

pub fn format_results(view: &ResultsView) -> String {
    let mut out = String::from("Recommended Indicators\n");
    out.push_str(&view.count_label());
    if view.using_fallback() {
        out.push_str(" (demo data)");
    }
    out.push('\n');
    if let Some(notice) = view.notice() {
        out.push_str(notice);
        out.push('\n');
    }
    let f = view.filters();
    if !f.is_unfiltered() {
        out.push_str(&format!(
            "Filters: component={} cost={} ease={}\n",
            f.component, f.cost, f.ease
        ));
    }
    out.push('\n');

    let visible = view.visible();
    if visible.is_empty() {
        out.push_str("No indicators match these filters. Reset Filters to see all.\n");
    }
    for indicator in visible {
        match view.view_mode() {
            ViewMode::Grid => {
                card(&mut out, view, indicator);
                out.push('\n');
            }
            ViewMode::List => row(&mut out, view, indicator),
        }
    }

    if let Some(route) = view.compare_route() {
        out.push_str(&format!(
            "\nCompare ({}): {}\n",
            view.selection().len(),
            route
        ));
    }
    out
}

/// CLI entry point for `cba results`.
pub async fn run_results(
    api: &dyn IndicatorApi,
    params: &ResultsParams,
    options: &ResultsOptions,
    format: OutputFormat,
) -> Result<()> {
    let view = open_results(api, params, options).await;
    if let Some(err) = view.error() {
        render::banner(err);
    }
    match format {
        OutputFormat::Json => render::print_json(&view)?,
        OutputFormat::Text => print!("{}", format_results(&view)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cba_core::api::memory::InMemoryApi;

    #[tokio::test]
    async fn demo_data_is_labelled() {
        let api = InMemoryApi::new();
        let view = open_results(&api, &ResultsParams::default(), &ResultsOptions::default()).await;
        let text = format_results(&view);
        assert!(text.contains("4 indicators found (demo data)"));
        assert!(text.contains("[47] Species Diversity Index  [Compare]"));
        assert!(!text.contains("Compare ("));
    }

    #[tokio::test]
    async fn selection_and_filters_show_up() {
        let api = InMemoryApi::new();
        let mut options = ResultsOptions::new(
            FilterValue::Only(Component::Abiotic),
            FilterValue::All,
            FilterValue::All,
        );
        options.select = vec![89, 12];
        options.expand = Some(89);
        let view = open_results(&api, &ResultsParams::default(), &options).await;
        let text = format_results(&view);
        assert!(text.contains("2 indicators found"));
        assert!(text.contains("Filters: component=Abiotic cost=all ease=all"));
        assert!(text.contains("[89] Soil Organic Carbon  [Selected]"));
        assert!(text.contains("Methods (3):"));
        assert!(text.contains("Compare (2): /compare?ids=89,12"));
    }

    #[tokio::test]
    async fn empty_filter_result_says_so() {
        let api = InMemoryApi::new();
        let options = ResultsOptions::new(
            FilterValue::Only(Component::Biotic),
            FilterValue::Only(Level::Low),
            FilterValue::All,
        );
        let view = open_results(&api, &ResultsParams::default(), &options).await;
        assert!(format_results(&view).contains("No indicators match"));
    }
}
