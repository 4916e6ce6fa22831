use std::path::PathBuf;
use zakai_session::Session;

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Upload(PathBuf),
    History,
    Quit,
    Help,
    Text(String),
    Empty,
}

pub const HELP: &str = "Commands:\n  \
    /upload <path>  send a document (pdf, doc, docx, xls, xlsx) or image (png, jpg, jpeg, gif, webp)\n  \
    /history        list the conversation so far\n  \
    /quit           end the session\n\
    Anything else is sent as a message.";

pub fn parse_line(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }

    let (head, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    match head {
        "/upload" if !rest.trim().is_empty() => Command::Upload(PathBuf::from(unquote(rest.trim()))),
        "/upload" | "/help" => Command::Help,
        "/history" => Command::History,
        "/quit" | "/exit" => Command::Quit,
        _ => Command::Text(line.to_string()),
    }
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(s)
}

/// One line per message: the role and the first 50 characters.
pub fn history_outline(session: &Session) -> Vec<String> {
    session
        .transcript()
        .history()
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let first_line = m.content.replace('\n', " ");
            let mut preview: String = first_line.chars().take(50).collect();
            if first_line.chars().count() > 50 {
                preview.push('…');
            }
            format!("{:>3}. {}: {preview}", i + 1, m.role)
        })
        .collect()
}
