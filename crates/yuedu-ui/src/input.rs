use std::io::BufRead;

/// A line typed at the reader prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Look up the term with this number
    Click(usize),
    Open(String),
    Close,
    Resume,
    Quit,
    Redraw,
    /// Page down
    Next,
    /// Page up
    Prev,
    Help,
    Unknown(String),
}

pub const HELP: &str =
    "<n> look up term n | open <url> | c close popup | n/p page | r resume | l redraw | q quit";

pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if let Ok(number) = line.parse::<usize>() {
        return Some(Command::Click(number));
    }

    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match word.to_lowercase().as_str() {
        "open" | "o" if !rest.is_empty() => Command::Open(rest.to_string()),
        _ if word.starts_with("http://") || word.starts_with("https://") => {
            Command::Open(line.to_string())
        }
        "c" | "close" => Command::Close,
        "r" | "resume" => Command::Resume,
        "q" | "quit" | "exit" => Command::Quit,
        "l" | "redraw" => Command::Redraw,
        "n" | "next" => Command::Next,
        "p" | "prev" => Command::Prev,
        "?" | "h" | "help" => Command::Help,
        _ => Command::Unknown(line.to_string()),
    };
    Some(command)
}

/// Forward input lines as commands until `Quit`, EOF, a read error or a
/// closed receiver. Blocking; meant for a dedicated thread.
pub fn read_commands(input: impl BufRead, command_tx: kanal::Sender<Command>) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("[UI] stdin read failed: {e}");
                break;
            }
        };

        let Some(command) = parse_command(&line) else {
            continue;
        };
        let quit = command == Command::Quit;
        if command_tx.send(command).is_err() || quit {
            return;
        }
    }

    // EOF behaves like quit
    let _ = command_tx.send(Command::Quit);
}
