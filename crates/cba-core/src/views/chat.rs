//! Chat page: conversational intake.
//!
//! The first assistant turn is the only text produced locally. Everything
//! after that comes from the service, including any change to the project
//! profile: user text is never parsed on this side.

use serde::Serialize;
use tracing::{debug, warn};

use crate::api::{ApiError, ChatResponse, IndicatorApi};
use crate::lifecycle::{Mount, Ticket};
use crate::models::{ChatTurn, ProjectProfile, REQUIRED_FIELDS};
use crate::route::{ChatParams, Route};

pub const GENERIC_GREETING: &str = "Hello! I'll help you find the perfect indicators for your \
project. Let's start by understanding your project. Where is your project located?";

/// Assistant turn appended when a chat call fails.
pub const ERROR_REPLY: &str = "Sorry, I encountered an error. Please try again.";

fn or_not_found(v: Option<&str>) -> &str {
    v.filter(|s| !s.is_empty()).unwrap_or("not found")
}

/// Opening line, depending on whether an upload seeded the profile.
pub fn greeting(profile: &ProjectProfile) -> String {
    if profile.has_upload_fields() {
        format!(
            "I see you uploaded a file! I found: Location: {}, Commodity: {}, Budget: {}. \
             Now, what are your main expected outcomes? What do you want to measure or improve?",
            or_not_found(profile.location.as_deref()),
            or_not_found(profile.commodity.as_deref()),
            or_not_found(profile.budget.as_deref()),
        )
    } else {
        GENERIC_GREETING.to_string()
    }
}

/// A user turn on its way to the service.
#[derive(Debug)]
pub struct PendingTurn {
    ticket: Ticket,
    pub message: String,
    pub session_id: Option<String>,
    pub profile: ProjectProfile,
}

#[derive(Debug, Serialize)]
pub struct ChatView {
    turns: Vec<ChatTurn>,
    profile: ProjectProfile,
    session_id: Option<String>,
    loading: bool,
    has_recommendations: bool,
    #[serde(skip)]
    mount: Mount,
}

impl ChatView {
    pub fn from_params(params: &ChatParams) -> Self {
        let profile = ProjectProfile {
            location: params.location.clone(),
            commodity: params.commodity.clone(),
            budget: params.budget.clone(),
            outcomes: None,
            capacity: params.capacity.clone(),
        };
        Self {
            turns: vec![ChatTurn::assistant(greeting(&profile))],
            profile,
            session_id: params.session_id.clone(),
            loading: false,
            has_recommendations: false,
            mount: Mount::new(),
        }
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn profile(&self) -> &ProjectProfile {
        &self.profile
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the service has said recommendations exist for this session.
    pub fn has_recommendations(&self) -> bool {
        self.has_recommendations
    }

    pub fn is_complete(&self) -> bool {
        self.profile.is_complete()
    }

    /// Header text, e.g. `"2/4 required fields"`.
    pub fn progress_label(&self) -> String {
        format!(
            "{}/{} required fields",
            self.profile.required_present(),
            REQUIRED_FIELDS
        )
    }

    /// Start a turn. Blank input, or a turn already in flight, is ignored.
    pub fn begin_send(&mut self, input: &str) -> Option<PendingTurn> {
        let message = input.trim();
        if message.is_empty() || self.loading {
            return None;
        }
        self.turns.push(ChatTurn::user(message));
        self.loading = true;
        Some(PendingTurn {
            ticket: self.mount.ticket(),
            message: message.to_string(),
            session_id: self.session_id.clone(),
            profile: self.profile.clone(),
        })
    }

    /// Apply the service's reply. Returns `false` if the page was left meanwhile.
    pub fn finish_send(
        &mut self,
        pending: PendingTurn,
        result: Result<ChatResponse, ApiError>,
    ) -> bool {
        if !pending.ticket.is_current() {
            debug!("dropping chat reply for unmounted page");
            return false;
        }
        match result {
            Ok(reply) => {
                self.session_id = Some(reply.session_id);
                if let Some(profile) = reply.profile {
                    self.profile = profile;
                }
                if reply.has_recommendations == Some(true) {
                    self.has_recommendations = true;
                }
                self.turns.push(ChatTurn::assistant(reply.response));
            }
            Err(e) => {
                warn!(error = %e, "chat failed");
                self.turns.push(ChatTurn::assistant(ERROR_REPLY));
            }
        }
        self.loading = false;
        true
    }

    /// The "View Recommendations" link, offered once the profile is complete.
    pub fn results_route(&self) -> Option<Route> {
        if self.is_complete() {
            Some(Route::results(self.session_id.as_deref()))
        } else {
            None
        }
    }

    pub fn unmount(&self) {
        self.mount.invalidate();
    }
}

/// Run one full turn: append the user text, call the service, append the reply.
///
/// Returns `false` when the input was ignored.
pub async fn send(view: &mut ChatView, api: &dyn IndicatorApi, input: &str) -> bool {
    let Some(pending) = view.begin_send(input) else {
        return false;
    };
    let result = api
        .chat(
            &pending.message,
            pending.session_id.as_deref(),
            Some(&pending.profile),
        )
        .await;
    view.finish_send(pending, result);
    true
}
