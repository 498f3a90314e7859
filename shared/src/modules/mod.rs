pub mod calendar_module;
pub mod logging_module;
pub mod persister_module;
pub mod reminder_module;
