//! The command registry.
//!
//! Commands form a closed set: parsing a name either yields one of the
//! [`ShutterCommand`] variants or nothing, in which case the dispatcher reports
//! the name as unknown. Everything the dispatcher needs to know about a command
//! (argument threshold, help text, config tolerance) is answered here.

use std::fmt;

/// How commands are grouped in the top level usage text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Main,
    LowLevel,
}

impl CommandGroup {
    pub fn heading(&self) -> &'static str {
        match self {
            CommandGroup::Main => "Commands",
            CommandGroup::LowLevel => "Low-level commands",
        }
    }

    /// Returns all groups in display order
    pub fn all() -> &'static [CommandGroup] {
        &[CommandGroup::Main, CommandGroup::LowLevel]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShutterCommand {
    Authenticate,
    Update,
    Pull,
    Snapshot,
}

impl ShutterCommand {
    /// All registered commands in display order.
    pub const ALL: [ShutterCommand; 4] = [
        ShutterCommand::Authenticate,
        ShutterCommand::Update,
        ShutterCommand::Pull,
        ShutterCommand::Snapshot,
    ];

    /// Looks up a command by the name typed on the command line.
    ///
    /// Matching is exact: `Snapshot` or `snap` are unknown commands.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            ShutterCommand::Authenticate => "authenticate",
            ShutterCommand::Update => "update",
            ShutterCommand::Pull => "pull",
            ShutterCommand::Snapshot => "snapshot",
        }
    }

    pub fn group(self) -> CommandGroup {
        match self {
            ShutterCommand::Authenticate | ShutterCommand::Update => CommandGroup::Main,
            ShutterCommand::Pull | ShutterCommand::Snapshot => CommandGroup::LowLevel,
        }
    }

    /// One line description used in the usage listing.
    pub fn summary(self) -> &'static str {
        match self {
            ShutterCommand::Authenticate => "Save authentication token.",
            ShutterCommand::Update => "Selectively update local snapshots.",
            ShutterCommand::Pull => "Download rendered snapshot or diff.",
            ShutterCommand::Snapshot => "Upload page for rendering.",
        }
    }

    /// Fewest positional arguments the command accepts, if it enforces a floor.
    pub fn minimum_args(self) -> Option<usize> {
        match self {
            ShutterCommand::Authenticate => Some(1),
            ShutterCommand::Update => None,
            ShutterCommand::Pull => Some(1),
            ShutterCommand::Snapshot => Some(2),
        }
    }

    /// `authenticate` runs before any `.shutterrc` exists, so a failed config
    /// load must not stop it.
    pub fn tolerates_missing_config(self) -> bool {
        matches!(self, ShutterCommand::Authenticate)
    }

    fn arguments(self) -> &'static [(&'static str, &'static str)] {
        match self {
            ShutterCommand::Authenticate => &[("token", "Token issued for your account.")],
            ShutterCommand::Update => &[(
                "snapshot-name",
                "Snapshots to update. Updates all snapshots when omitted.",
            )],
            ShutterCommand::Pull => &[("snapshot-id", "Snapshot or diff to download.")],
            ShutterCommand::Snapshot => &[
                ("name", "Name of the snapshot."),
                ("file", "HTML page to upload for rendering."),
            ],
        }
    }

    fn usage_arguments(self) -> &'static str {
        match self {
            ShutterCommand::Authenticate => "<token>",
            ShutterCommand::Update => "[<snapshot-name>...]",
            ShutterCommand::Pull => "<snapshot-id>",
            ShutterCommand::Snapshot => "<name> <file>",
        }
    }

    /// Help text shown for `shutter <command> --help` and on missing arguments.
    pub fn help_text(self) -> String {
        let mut text = String::new();
        text.push_str("  Usage\n");
        text.push_str(&format!(
            "    $ shutter {} {}\n",
            self.name(),
            self.usage_arguments()
        ));
        text.push('\n');
        text.push_str(&format!("  {}\n", self.summary()));

        let arguments = self.arguments();
        if !arguments.is_empty() {
            text.push('\n');
            text.push_str("  Arguments\n");
            for (name, about) in arguments {
                text.push_str(&format!("    {:<16}  {}\n", name, about));
            }
        }
        text
    }
}

impl fmt::Display for ShutterCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
