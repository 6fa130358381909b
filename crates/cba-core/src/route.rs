//! Typed page routes and their query-parameter schema.
//!
//! Pages never share memory. Everything one page hands to the next travels
//! in a [`Route`], which renders to and parses from a path plus query string:
//!
//! | Route | Parameters |
//! |-------|------------|
//! | `/` | none |
//! | `/upload` | none |
//! | `/chat` | `location`, `commodity`, `budget`, `capacity`, `session_id` |
//! | `/results` | `session_id`, `ids`, `remove` |
//! | `/compare` | `ids`, `session_id` |
//!
//! `ids` is a comma-joined list of integers. Tokens that are not integers are
//! dropped when parsing, never turned into placeholder entries.

use std::fmt;

use url::form_urlencoded;

/// Parameters accepted by the chat page.
///
/// `Some("")` renders as an empty parameter (`commodity=`) but parses back as
/// `None`, matching how an upload hands over fields it could not find.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatParams {
    pub location: Option<String>,
    pub commodity: Option<String>,
    pub budget: Option<String>,
    pub capacity: Option<String>,
    pub session_id: Option<String>,
}

/// Parameters accepted by the results page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultsParams {
    pub session_id: Option<String>,
    /// Indicators to pre-select for comparison.
    pub ids: Vec<i64>,
    /// Indicator to drop from `ids`, set by the compare page's remove link.
    pub remove: Option<i64>,
}

/// Parameters accepted by the compare page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompareParams {
    pub ids: Vec<i64>,
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Upload,
    Chat(ChatParams),
    Results(ResultsParams),
    Compare(CompareParams),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("unknown page: '{0}'")]
    UnknownPath(String),
    #[error("invalid URL '{0}': {1}")]
    InvalidUrl(String, String),
}

/// Parse a comma-separated ID list, dropping non-integer tokens and repeats.
pub fn parse_ids(raw: &str) -> Vec<i64> {
    let mut ids = Vec::new();
    for token in raw.split(',') {
        if let Ok(id) = token.trim().parse::<i64>() {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}

pub fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn non_empty(v: String) -> Option<String> {
    if v.is_empty() {
        None
    } else {
        Some(v)
    }
}

/// Ordered query-string builder.
struct Query {
    parts: Vec<String>,
}

impl Query {
    fn new() -> Self {
        Self { parts: Vec::new() }
    }

    fn opt(&mut self, key: &str, value: Option<&str>) {
        if let Some(v) = value {
            let encoded: String = form_urlencoded::byte_serialize(v.as_bytes()).collect();
            self.parts.push(format!("{}={}", key, encoded));
        }
    }

    /// Digits and commas need no escaping; keep `ids=47,89` readable.
    fn ids(&mut self, ids: &[i64]) {
        if !ids.is_empty() {
            self.parts.push(format!("ids={}", join_ids(ids)));
        }
    }

    fn finish(self, path: &str) -> String {
        if self.parts.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, self.parts.join("&"))
        }
    }
}

impl Route {
    /// Parse `/path?query`. A full `http(s)://host/path?query` URL is also accepted.
    pub fn parse(input: &str) -> Result<Route, RouteError> {
        let input = input.trim();
        let (path, query) = if input.contains("://") {
            let url = url::Url::parse(input)
                .map_err(|e| RouteError::InvalidUrl(input.to_string(), e.to_string()))?;
            (url.path().to_string(), url.query().unwrap_or("").to_string())
        } else {
            match input.split_once('?') {
                Some((p, q)) => (p.to_string(), q.to_string()),
                None => (input.to_string(), String::new()),
            }
        };

        let pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let get = |key: &str| -> Option<String> {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .and_then(|(_, v)| non_empty(v.clone()))
        };

        let normalized = path.trim_end_matches('/');
        match normalized {
            "" => Ok(Route::Home),
            "/upload" => Ok(Route::Upload),
            "/chat" => Ok(Route::Chat(ChatParams {
                location: get("location"),
                commodity: get("commodity"),
                budget: get("budget"),
                capacity: get("capacity"),
                session_id: get("session_id"),
            })),
            "/results" => Ok(Route::Results(ResultsParams {
                session_id: get("session_id"),
                ids: get("ids").map(|s| parse_ids(&s)).unwrap_or_default(),
                remove: get("remove").and_then(|s| s.trim().parse().ok()),
            })),
            "/compare" => Ok(Route::Compare(CompareParams {
                ids: get("ids").map(|s| parse_ids(&s)).unwrap_or_default(),
                session_id: get("session_id"),
            })),
            other => Err(RouteError::UnknownPath(other.to_string())),
        }
    }

    /// Chat route for handing upload findings to the conversation.
    ///
    /// All three fields are always present, empty when the upload did not find them.
    pub fn chat_handoff(location: Option<&str>, commodity: Option<&str>, budget: Option<&str>) -> Route {
        Route::Chat(ChatParams {
            location: Some(location.unwrap_or("").to_string()),
            commodity: Some(commodity.unwrap_or("").to_string()),
            budget: Some(budget.unwrap_or("").to_string()),
            capacity: None,
            session_id: None,
        })
    }

    pub fn results(session_id: Option<&str>) -> Route {
        Route::Results(ResultsParams {
            session_id: session_id.map(str::to_string),
            ..Default::default()
        })
    }

    pub fn compare(ids: &[i64], session_id: Option<&str>) -> Route {
        Route::Compare(CompareParams {
            ids: ids.to_vec(),
            session_id: session_id.map(str::to_string),
        })
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = match self {
            Route::Home => "/".to_string(),
            Route::Upload => "/upload".to_string(),
            Route::Chat(p) => {
                let mut q = Query::new();
                q.opt("location", p.location.as_deref());
                q.opt("commodity", p.commodity.as_deref());
                q.opt("budget", p.budget.as_deref());
                q.opt("capacity", p.capacity.as_deref());
                q.opt("session_id", p.session_id.as_deref());
                q.finish("/chat")
            }
            Route::Results(p) => {
                let mut q = Query::new();
                q.opt("session_id", p.session_id.as_deref());
                q.ids(&p.ids);
                if let Some(id) = p.remove {
                    q.parts.push(format!("remove={}", id));
                }
                q.finish("/results")
            }
            Route::Compare(p) => {
                let mut q = Query::new();
                q.ids(&p.ids);
                q.opt("session_id", p.session_id.as_deref());
                q.finish("/compare")
            }
        };
        f.write_str(&rendered)
    }
}
