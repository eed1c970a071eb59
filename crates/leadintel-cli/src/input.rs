//! Operator input: one command per line.

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetName(String),
    SetDomain(String),
    SetPersona(String),
    Submit,
    /// 1-based position in the recent-leads list.
    OpenIndex(usize),
    OpenId(String),
    Back,
    New,
    Resume,
    Refresh,
    Show,
    Help,
    Quit,
}

/// Parse one line. Field commands take the rest of the line verbatim, so
/// `name` alone clears the company name.
pub fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let cmd = match word.to_ascii_lowercase().as_str() {
        "name" | "company" => Command::SetName(rest.to_string()),
        "domain" => Command::SetDomain(rest.to_string()),
        "persona" | "icp" => Command::SetPersona(rest.to_string()),
        "submit" | "go" => Command::Submit,
        "open" => match rest {
            "" => return Err("usage: open <number|id>".into()),
            r => match r.parse::<usize>() {
                Ok(0) => return Err("history numbers start at 1".into()),
                Ok(n) => Command::OpenIndex(n),
                Err(_) => Command::OpenId(r.to_string()),
            },
        },
        "back" => Command::Back,
        "new" => Command::New,
        "resume" => Command::Resume,
        "refresh" | "history" => Command::Refresh,
        "" | "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command `{other}` (try `help`)")),
    };
    Ok(cmd)
}
