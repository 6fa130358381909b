//! `cba open <ROUTE>`: dispatch a page link to its command.
//!
//! Lets links printed by one page (`/compare?ids=47,89&session_id=S`) be
//! pasted straight back in.

use anyhow::{bail, Result};

use cba_core::api::IndicatorApi;
use cba_core::route::Route;

use crate::render::OutputFormat;
use crate::results::ResultsOptions;
use crate::{chat, compare, home, results};

pub async fn run_open(api: &dyn IndicatorApi, link: &str, format: OutputFormat) -> Result<()> {
    let route = Route::parse(link)?;
    tracing::debug!(%route, "opening page");
    match route {
        Route::Home => home::run_home(),
        Route::Upload => bail!("the upload page needs a file: run `cba upload <FILE>`"),
        Route::Chat(params) => chat::run_chat(api, &params, format).await?,
        Route::Results(params) => {
            results::run_results(api, &params, &ResultsOptions::default(), format).await?
        }
        Route::Compare(params) => compare::run_compare(api, &params, format).await?,
    }
    Ok(())
}
