//! `cba chat`: the intake conversation on stdin.
//!
//! Each non-empty line is one user turn. `/profile` prints the profile
//! sidebar, `/quit` (or end of input) ends the session.

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use cba_core::api::IndicatorApi;
use cba_core::models::{ChatTurn, ProfileField, Role};
use cba_core::route::ChatParams;
use cba_core::views::chat::{self, ChatView};

use crate::render::{self, OutputFormat};

const QUIT: &str = "/quit";
const PROFILE: &str = "/profile";

pub fn format_turn(turn: &ChatTurn) -> String {
    let who = match turn.role {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    format!("[{}]\n{}\n", who, render::wrap(&turn.content, 76, "  "))
}

pub fn format_profile(view: &ChatView) -> String {
    let profile = view.profile();
    let mut out = format!(
        "Project Profile: {} ({}%)\n",
        view.progress_label(),
        profile.progress_percent()
    );
    for field in ProfileField::ALL {
        out.push_str(&format!(
            "  {:<20} {}\n",
            field.label(),
            profile.get(field).unwrap_or("-")
        ));
    }
    if let Some(route) = view.results_route() {
        out.push_str(&format!("View Recommendations: {}\n", route));
    }
    out
}

/// Drive a conversation from `input` until it ends, echoing turns to stdout.
pub async fn converse<R>(
    api: &dyn IndicatorApi,
    params: &ChatParams,
    input: R,
    prompt: bool,
    echo: bool,
) -> Result<ChatView>
where
    R: AsyncBufRead + Unpin,
{
    let mut view = ChatView::from_params(params);
    if echo {
        print!("{}", format_turn(&view.turns()[0]));
    }

    let mut lines = input.lines();
    loop {
        if prompt {
            use std::io::Write;
            print!("> ");
            std::io::stdout().flush()?;
        }
        let Some(line) = lines.next_line().await? else {
            break;
        };
        match line.trim() {
            QUIT => break,
            PROFILE => {
                if echo {
                    print!("{}", format_profile(&view));
                }
                continue;
            }
            _ => {}
        }

        let was_complete = view.is_complete();
        if !chat::send(&mut view, api, &line).await {
            continue;
        }
        if echo {
            if let Some(reply) = view.turns().last() {
                print!("{}", format_turn(reply));
            }
            if !was_complete {
                if let Some(route) = view.results_route() {
                    println!("View Recommendations: {}", route);
                }
            }
        }
    }
    view.unmount();
    Ok(view)
}

/// CLI entry point for `cba chat`.
pub async fn run_chat(api: &dyn IndicatorApi, params: &ChatParams, format: OutputFormat) -> Result<()> {
    let interactive = atty::is(atty::Stream::Stdin);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let echo = format == OutputFormat::Text;
    let view = converse(api, params, stdin, interactive && echo, echo).await?;

    match format {
        OutputFormat::Json => render::print_json(&view)?,
        OutputFormat::Text => {
            if let Some(session) = view.session_id() {
                println!("session: {}", session);
            }
        }
    }
    Ok(())
}
