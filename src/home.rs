//! Landing page: the two ways into the flow.

use cba_core::route::Route;

pub struct EntryPoint {
    pub title: &'static str,
    pub summary: &'static str,
    pub route: Route,
}

pub fn entry_points() -> Vec<EntryPoint> {
    vec![
        EntryPoint {
            title: "Upload Project File",
            summary: "Have a project document? Upload a PDF or Excel file and let the \
                      assistant extract the project details.",
            route: Route::Upload,
        },
        EntryPoint {
            title: "Start from Scratch",
            summary: "Building a new project? Chat with the assistant to define it and \
                      get personalized indicator recommendations.",
            route: Route::Chat(Default::default()),
        },
    ]
}

pub fn format_home() -> String {
    let mut out = String::from("CBA Indicator Selection\nCircular Bioeconomy Alliance\n\n");
    for entry in entry_points() {
        out.push_str(&format!("  {:<22} {}\n", entry.title, entry.route));
        out.push_str(&crate::render::wrap(entry.summary, 64, "      "));
        out.push('\n');
    }
    out
}

/// CLI entry point for `cba home`.
pub fn run_home() {
    print!("{}", format_home());
}
