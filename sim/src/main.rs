use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use log::{error, info};
use sugarmummy_shared::calendar::{Description, Reminder, Repetition};
use sugarmummy_shared::clock::{Clock, SystemClock};
use sugarmummy_shared::commands::Commands;
use sugarmummy_shared::config::Config;
use sugarmummy_shared::message_bus::{BusSender, MessageBus};
use sugarmummy_shared::modules::calendar_module::CalendarModule;
use sugarmummy_shared::modules::logging_module::LoggingModule;
use sugarmummy_shared::modules::persister_module::PersisterModule;
use sugarmummy_shared::modules::reminder_module::ReminderModule;
use sugarmummy_shared::persistence::PersistenceUnitKind;
use tokio::join;

mod input;

#[derive(Parser, Debug)]
#[command(about = "Console runner for the reminder scheduler")]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Adds a one-off reminder due in the next minute
    #[arg(long)]
    demo: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    info!("{:?}", config);

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_time()
        .worker_threads(config.worker_threads)
        .build()?;

    rt.block_on(main_async(config, args.demo));

    Ok(())
}

async fn main_async(config: Config, demo: bool) {
    let message_bus = MessageBus::new();

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let logging_task = LoggingModule::start(message_bus.clone());
    let persister_task = PersisterModule::start(message_bus.clone(), &config.state_dir);
    let calendar_task = CalendarModule::start(message_bus.clone());
    let reminder_task = ReminderModule::start(message_bus.clone(), clock.clone());

    let startup_sequence = async move {
        message_bus.send_cmd(Commands::Restore(PersistenceUnitKind::CalendarState));

        if demo {
            let due = clock.now_date_time().truncated_to_minute().plus_minutes(1);

            match Description::new("Demo reminder") {
                Ok(description) => {
                    let reminder = Reminder::new(description, due, Repetition::Once);
                    message_bus.send_cmd(Commands::AddEntry(reminder.into()));
                }
                Err(err) => error!("{}", err),
            }
        }

        if let Err(err) = read_input(message_bus.sender()).await {
            error!("{}", err);
        }
    };

    let (_, _, calendar, _, _) = join!(
        logging_task,
        persister_task,
        calendar_task,
        reminder_task,
        startup_sequence
    );

    info!(
        "done, {} entries and {} past reminders",
        calendar.entries().len(),
        calendar.past_reminders().len()
    );
}

/// Feeds console lines to the bus until `quit` or end of input.
async fn read_input(input_bus: BusSender) -> Result<(), tokio::task::JoinError> {
    tokio::task::spawn_blocking(move || {
        println!("{}", input::HELP);

        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };

            if line.trim().is_empty() {
                continue;
            }

            match input::parse_line(&line) {
                Ok(command) => {
                    let shutdown = matches!(command, Commands::Shutdown);
                    input_bus.send_cmd(command);

                    if shutdown {
                        return;
                    }
                }
                Err(err) => error!("{}", err),
            }
        }

        input_bus.send_cmd(Commands::Shutdown);
    })
    .await
}
