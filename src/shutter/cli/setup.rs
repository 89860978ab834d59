use clap::Parser;
use shutter::commands::{CommandGroup, ShutterCommand};
use shutter::dispatch::{Flags, ParsedInput};
use std::sync::OnceLock;
use tracing::debug;

/// Returns the version string, stamped by `build.rs`. See [`format_version`].
pub fn get_version() -> &'static str {
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        format_version(
            env!("CARGO_PKG_VERSION"),
            env!("GIT_HASH"),
            env!("GIT_COMMIT_DATE"),
            env!("IS_RELEASE") == "true",
        )
    })
}

/// "0.4.0" for releases or builds outside git, "0.4.0@1f3e9ab 2026-03-02 09:12" otherwise.
pub fn format_version(
    version: &str,
    git_hash: &str,
    commit_date: &str,
    is_release: bool,
) -> String {
    if is_release || git_hash.is_empty() {
        version.to_string()
    } else {
        format!("{}@{} {}", version, git_hash, commit_date)
    }
}

/// Raw command line. clap only collects the tokens here; sorting them into
/// flags and positionals happens in [`Cli::into_input`], and choosing between
/// usage, version, help and a command is left to the dispatcher.
#[derive(Parser, Debug)]
#[command(
    name = "shutter",
    bin_name = "shutter",
    disable_help_flag = true,
    disable_version_flag = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Command name, its arguments and any of --help, --version,
    /// --awaitCompletion, --local
    #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
    pub tokens: Vec<String>,
}

impl Cli {
    /// Known flags may appear anywhere and any number of times. Other `--name`
    /// flags are ignored. Everything else is positional, including single-dash
    /// values such as `-1`, and every token after a `--`.
    pub fn into_input(self) -> ParsedInput {
        let mut positionals = Vec::new();
        let mut flags = Flags::default();
        let mut tokens = self.tokens.into_iter();

        while let Some(token) = tokens.next() {
            match token.as_str() {
                "--" => {
                    positionals.extend(tokens.by_ref());
                    break;
                }
                "-h" | "--help" => flags.help = true,
                "--version" => flags.version = true,
                "--awaitCompletion" | "--await-completion" => flags.await_completion = true,
                "--local" => flags.local = true,
                flag if flag.starts_with("--") => debug!(flag, "ignoring unknown flag"),
                _ => positionals.push(token),
            }
        }

        ParsedInput::new(positionals, flags)
    }
}

/// Returns the top level usage text, commands grouped as in [`CommandGroup`]
pub fn get_usage() -> String {
    let mut output = String::new();
    output.push_str("  Usage\n");
    output.push_str("    $ shutter <command> [<arguments>]\n");

    for group in CommandGroup::all() {
        output.push('\n');
        output.push_str(&format!("  {}\n", group.heading()));
        for command in ShutterCommand::ALL
            .into_iter()
            .filter(|c| c.group() == *group)
        {
            output.push_str(&format!(
                "    {:<16}  {}\n",
                command.name(),
                command.summary()
            ));
        }
    }

    output.push('\n');
    output.push_str("  Options\n");
    output.push_str("    --help            Show this help.\n");
    output.push_str("    --version         Show the version.\n");
    output.push_str("    --awaitCompletion Wait for rendering to finish.\n");
    output.push_str("    --local           Render against a local service.\n");
    output
}
