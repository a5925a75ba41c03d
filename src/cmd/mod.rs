use teloxide::utils::command::{BotCommands, ParseError};

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "show usage")]
    Start,
    #[command(description = "show usage")]
    Help,
    #[command(description = "off")]
    Ping,
    #[command(description = "countdown card until 3 May 2026")]
    Gen,
    #[command(description = "NEET countdown card")]
    Neet,
    #[command(description = "JEE countdown card")]
    Jee,
    #[command(description = "off")]
    SetNeet(String),
    #[command(description = "off")]
    SetJee(String),
    #[command(description = "a random motivational quote")]
    Quote,
    #[command(description = "show your user info")]
    Me,
    #[command(description = "show info of the replied user")]
    Info,
    #[command(description = "ban the replied or mentioned user")]
    Ban(String),
    #[command(description = "unban the replied or mentioned user")]
    Unban(String),
    #[command(description = "kick the replied or mentioned user")]
    Kick(String),
    #[command(description = "mute the replied or mentioned user")]
    Mute(String),
    #[command(description = "unmute the replied or mentioned user")]
    Unmute(String),
    #[command(description = "warn the replied or mentioned user, banned at 3 warnings")]
    Warn(String),
    #[command(description = "promote the replied or mentioned user to admin")]
    Promote(String),
    #[command(description = "demote the replied or mentioned admin")]
    Demote(String),
}

/// Parses a command case-insensitively. `/NEET@MyBot` and `/neet` are the
/// same command, arguments keep their case. Commands without parameters
/// ignore any trailing text.
pub fn parse(text: &str, bot_name: &str) -> Option<Command> {
    let text = text.trim_start();
    if !text.starts_with('/') {
        return None;
    }

    let (head, rest) = text.split_at(text.find(char::is_whitespace).unwrap_or(text.len()));
    let (head, bot_name) = (head.to_lowercase(), bot_name.to_lowercase());

    match Command::parse(&format!("{head}{rest}"), &bot_name) {
        Ok(cmd) => Some(cmd),
        Err(ParseError::TooManyArguments { .. }) => Command::parse(&head, &bot_name).ok(),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOT: &str = "ExamCountdownBot";

    #[test]
    fn case_insensitive() {
        assert_eq!(parse("/gen", BOT), Some(Command::Gen));
        assert_eq!(parse("/GEN", BOT), Some(Command::Gen));
        assert_eq!(parse("/Neet", BOT), Some(Command::Neet));
        assert_eq!(parse("/jee@examcountdownbot", BOT), Some(Command::Jee));
        assert_eq!(parse("/JEE@ExamCountdownBot", BOT), Some(Command::Jee));
    }

    #[test]
    fn arguments_keep_case() {
        assert_eq!(
            parse("/SetNeet 03-05-2026", BOT),
            Some(Command::SetNeet("03-05-2026".into()))
        );
        assert_eq!(
            parse("/ban @Some_User", BOT),
            Some(Command::Ban("@Some_User".into()))
        );
    }

    #[test]
    fn trailing_text_is_ignored() {
        assert_eq!(parse("/gen some text", BOT), Some(Command::Gen));
        assert_eq!(parse("/NEET extra words", BOT), Some(Command::Neet));
        assert_eq!(parse("/quote@ExamCountdownBot please", BOT), Some(Command::Quote));
        assert_eq!(
            parse("/warn @Some_User spamming links", BOT),
            Some(Command::Warn("@Some_User spamming links".into()))
        );
        assert_eq!(parse("/unknown some text", BOT), None);
        assert_eq!(parse("/gen@OtherBot some text", BOT), None);
    }

    #[test]
    fn rejects_others() {
        assert_eq!(parse("gen", BOT), None);
        assert_eq!(parse("/gen@OtherBot", BOT), None);
        assert_eq!(parse("/unknown", BOT), None);
        assert_eq!(parse("", BOT), None);
    }
}
