// Commands typed at the interactive prompt.

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    /// Anything that is not a `:` command is a search query.
    Search(String),
    /// Toggle a user, given as its position in the list or its login.
    Toggle(String),
    ExpandAll,
    CollapseAll,
    Help,
    Quit,
    Unknown(String),
}

pub const HELP: &str = "\
Type a GitHub username fragment and press Enter to search.
  :t, :toggle <n|login>   show or hide a user's repositories
  :e, :expand             show every user's repositories
  :c, :collapse           hide all repositories
  :h, :help               this help
  :q, :quit               exit";

impl Command {
    pub fn parse(line: &str) -> Command {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix(':') else {
            return Command::Search(line.to_string());
        };
        let mut parts = rest.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or_default();
        let arg = parts.next().map(str::trim).unwrap_or_default();
        match (name, arg) {
            ("t" | "toggle", arg) if !arg.is_empty() => Command::Toggle(arg.to_string()),
            ("e" | "expand", "") => Command::ExpandAll,
            ("c" | "collapse", "") => Command::CollapseAll,
            ("h" | "help", "") => Command::Help,
            ("q" | "quit", "") => Command::Quit,
            _ => Command::Unknown(trimmed.to_string()),
        }
    }
}
