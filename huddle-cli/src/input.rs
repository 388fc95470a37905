pub const HELP: &str =
    "Type to chat. Commands: /pin <id>, /audio <id>, /video <id>, /share, /who, /help, /quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Chat(String),
    Pin(String),
    Audio(String),
    Video(String),
    Share,
    Who,
    Help,
    Quit,
}

impl Input {
    /// `None` for blank lines. Unknown or incomplete commands show the help.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let Some(command) = line.strip_prefix('/') else {
            return Some(Input::Chat(line.to_owned()));
        };

        let mut parts = command.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let arg = parts.next().map(str::to_owned);

        let input = match (name, arg) {
            ("pin", Some(id)) => Input::Pin(id),
            ("audio", Some(id)) => Input::Audio(id),
            ("video", Some(id)) => Input::Video(id),
            ("share", _) => Input::Share,
            ("who", _) => Input::Who,
            ("quit" | "exit", _) => Input::Quit,
            _ => Input::Help,
        };
        Some(input)
    }
}
