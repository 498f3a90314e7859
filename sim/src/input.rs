use sugarmummy_shared::calendar::{CalendarEntry, DateTime, Description, Event, Reminder, Repetition};
use sugarmummy_shared::commands::Commands;
use sugarmummy_shared::error::Error;

pub const HELP: &str = "commands: \
remind <yyyy-mm-dd> <HH:MM> <once|daily|weekly> <description> | \
event <yyyy-mm-dd> <HH:MM> <description> | \
delete <yyyy-mm-dd> <HH:MM> <once|daily|weekly> <description> | \
schedule | stop | quit";

/// Turns one console line into a bus command.
pub fn parse_line(line: &str) -> Result<Commands, Error> {
    let mut words = line.split_whitespace();

    let keyword = words.next().unwrap_or_default();

    match keyword {
        "remind" => Ok(Commands::AddEntry(parse_reminder(&mut words)?)),
        "delete" => Ok(Commands::DeleteEntry(parse_reminder(&mut words)?)),
        "event" => {
            let date_time = parse_date_time(&mut words)?;
            let description = Description::new(words.collect::<Vec<_>>().join(" "))?;

            Ok(Commands::AddEntry(Event::new(description, date_time).into()))
        }
        "schedule" => Ok(Commands::Schedule),
        "stop" => Ok(Commands::StopReminders),
        "quit" | "exit" => Ok(Commands::Shutdown),
        other => Err(Error::Parse(format!("unknown command '{}'. {}", other, HELP))),
    }
}

fn parse_reminder<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<CalendarEntry, Error> {
    let date_time = parse_date_time(words)?;

    let repetition: Repetition = words
        .next()
        .ok_or_else(|| Error::Parse("missing repetition".to_string()))?
        .parse()?;

    let description = Description::new(words.collect::<Vec<_>>().join(" "))?;

    Ok(Reminder::new(description, date_time, repetition).into())
}

fn parse_date_time<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<DateTime, Error> {
    let (Some(date), Some(time)) = (words.next(), words.next()) else {
        return Err(Error::Parse("expected <yyyy-mm-dd> <HH:MM>".to_string()));
    };

    format!("{} {}", date, time).parse()
}
