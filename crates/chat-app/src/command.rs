/// One line of terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Message(String),
    Advice,
    Clear,
    Help,
    Quit,
    Empty,
}

pub const HELP_TEXT: &str = "\
Type a message and press enter to talk to Compass.
  /advice  personalized advice from the latest reference responses
  /clear   start over
  /help    show this help
  /quit    exit";

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }

        match line {
            "/advice" => Self::Advice,
            "/clear" => Self::Clear,
            "/help" => Self::Help,
            "/quit" | "/exit" => Self::Quit,
            _ => Self::Message(line.to_string()),
        }
    }
}
