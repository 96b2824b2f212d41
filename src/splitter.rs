use log::{debug, warn};

/// Split raw input into statement bodies.
///
/// `#` line comments are stripped first, then statements are split on `;`,
/// so a semicolon inside a comment does not terminate a statement. Empty
/// bodies are dropped, and a few statement kinds handled here rather than
/// by the classifier: bare `data` / `end` section markers are ignored, and
/// the unsupported `fix` directive is skipped with a warning.
pub fn statements(text: &str) -> impl Iterator<Item = String> {
    let cleaned = strip_comments(text);
    let stmts: Vec<String> = cleaned
        .split(';')
        .filter_map(|raw| {
            let body = raw.trim();
            if body.is_empty() {
                return None;
            }
            match first_word(body) {
                Some("fix") => {
                    warn!("skipping unsupported statement: fix");
                    None
                }
                Some("data") | Some("end") if body.split_whitespace().count() == 1 => {
                    debug!("ignoring section marker: {body}");
                    None
                }
                _ => Some(body.to_string()),
            }
        })
        .collect();
    stmts.into_iter()
}

/// Cut each line at its `#` comment
fn strip_comments(raw: &str) -> String {
    let lines: Vec<&str> = raw
        .lines()
        .map(|line| line.split('#').next().unwrap_or(""))
        .collect();
    lines.join("\n")
}

fn first_word(body: &str) -> Option<&str> {
    body.split_whitespace().next()
}
