use super::setup::{get_usage, get_version};
use colored::Colorize;
use shutter::commands::ShutterCommand;
use shutter::dispatch::Outcome;
use shutter::error::ShutterError;
use shutter::handlers::{CmdMessage, MessageLevel};

/// Prints whatever the outcome calls for and returns the process exit code
pub(super) fn render_outcome(outcome: &Outcome) -> i32 {
    match outcome {
        Outcome::Usage => print_usage(),
        Outcome::Version => println!("{}", get_version()),
        Outcome::CommandHelp(command) | Outcome::MissingArguments(command) => {
            print_command_help(*command)
        }
        Outcome::Completed { result, .. } => print_messages(&result.messages),
    }
    outcome.exit_code()
}

fn print_usage() {
    println!();
    print!("{}", get_usage());
}

fn print_command_help(command: ShutterCommand) {
    println!();
    print!("{}", command.help_text());
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
        }
    }
}

/// Writes a terminal error to stderr
pub fn report_error(error: &ShutterError) {
    eprintln!("{}", error.to_string().red());
}
