use timer_core::DurationFields;

use crate::app::Panel;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Command {
    StartStop,
    Lap,
    Reset,
    Show(Panel),
    SetDuration(DurationFields),
    Help,
    Quit,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command '{0}', type 'help' for a list")]
    Unknown(String),
    #[error("usage: set <hours> [minutes] [seconds]")]
    SetUsage,
}

pub const HELP_TEXT: &str = "\
  s, start     start / pause the active panel
  l, lap       record a lap (stopwatch)
  r, reset     reset the active panel
  sw           show the stopwatch
  t, timer     show the timer
  set H M S    set the timer duration
  ?, help      toggle this help
  q, quit      exit";

/// Parse one input line. Blank lines are not commands.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };

    let cmd = match head.to_ascii_lowercase().as_str() {
        "s" | "start" | "pause" => Command::StartStop,
        "l" | "lap" => Command::Lap,
        "r" | "reset" => Command::Reset,
        "sw" | "stopwatch" => Command::Show(Panel::Stopwatch),
        "t" | "timer" => Command::Show(Panel::Timer),
        "?" | "h" | "help" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        "set" => {
            let fields: Vec<&str> = words.by_ref().take(4).collect();
            if fields.is_empty() || fields.len() > 3 {
                return Err(CommandError::SetUsage);
            }
            let field = |i: usize| fields.get(i).copied().unwrap_or("");
            return Ok(Some(Command::SetDuration(DurationFields::new(
                field(0),
                field(1),
                field(2),
            ))));
        }
        _ => return Err(CommandError::Unknown(head.to_string())),
    };
    Ok(Some(cmd))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("s", Command::StartStop ; "short_start")]
    #[test_case("  START ", Command::StartStop ; "padded_upper")]
    #[test_case("lap", Command::Lap ; "lap")]
    #[test_case("r", Command::Reset ; "reset")]
    #[test_case("t", Command::Show(Panel::Timer) ; "timer")]
    #[test_case("sw", Command::Show(Panel::Stopwatch) ; "stopwatch")]
    #[test_case("?", Command::Help ; "help")]
    #[test_case("q", Command::Quit ; "quit")]
    fn test_parse_simple(line: &str, expected: Command) {
        assert_eq!(parse_command(line), Ok(Some(expected)));
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(parse_command("   "), Ok(None));
    }

    #[test]
    fn test_set_keeps_raw_text() {
        assert_eq!(
            parse_command("set 0 1x 30"),
            Ok(Some(Command::SetDuration(DurationFields::new("0", "1x", "30"))))
        );
        assert_eq!(
            parse_command("set 2"),
            Ok(Some(Command::SetDuration(DurationFields::new("2", "", ""))))
        );
    }

    #[test_case("set" ; "no_fields")]
    #[test_case("set 1 2 3 4" ; "too_many_fields")]
    fn test_set_usage(line: &str) {
        assert_eq!(parse_command(line), Err(CommandError::SetUsage));
    }

    #[test]
    fn test_unknown() {
        let err = parse_command("jump now").unwrap_err();
        assert_eq!(err, CommandError::Unknown("jump".into()));
        assert!(err.to_string().contains("'jump'"));
    }
}
