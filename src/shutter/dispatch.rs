//! # Dispatch
//!
//! Turns a [`ParsedInput`] into exactly one of: usage text, the version, a
//! command's help text, an error, or a single command invocation.
//!
//! Dispatch happens in two steps:
//!
//! 1. [`resolve`] is a pure decision over the parsed input. It never touches the
//!    filesystem or environment, so help, version and argument checks cost nothing.
//! 2. [`Dispatcher::run`] acts on the resolution. Only an invocation loads the
//!    configuration, works out the API endpoint and calls the handler.
//!
//! The endpoint is never written back into the process environment. It travels
//! to the handler inside [`CommandContext`].

use crate::commands::ShutterCommand;
use crate::config::{ConfigLoader, ShutterConfig};
use crate::error::{Result, ShutterError};
use crate::handlers::{CmdResult, CommandHandler};
use tracing::{debug, warn};

/// Environment variable that overrides the API endpoint.
pub const API_ENV: &str = "SHUTTER_API";

/// Flags recognized on the command line. All of them are passed to the handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub await_completion: bool,
    pub local: bool,
    pub help: bool,
    pub version: bool,
}

/// Positional arguments (command name first) and flags of one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedInput {
    pub positionals: Vec<String>,
    pub flags: Flags,
}

impl ParsedInput {
    pub fn new(positionals: Vec<String>, flags: Flags) -> Self {
        Self { positionals, flags }
    }
}

/// The parts of the process environment dispatch depends on, read once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    pub api_override: Option<String>,
}

impl Environment {
    pub fn from_process() -> Self {
        Self {
            api_override: std::env::var(API_ENV).ok().filter(|v| !v.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointSource {
    Environment,
    Config,
    /// Neither set one; collaborators fall back to their own default.
    Unset,
}

/// Everything a handler gets besides its arguments and flags.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandContext {
    pub endpoint: Option<String>,
    pub endpoint_source: EndpointSource,
    /// `None` only when loading failed and the command tolerates that.
    pub config: Option<ShutterConfig>,
}

impl CommandContext {
    /// An endpoint set in the environment always wins over the config's `serviceHost`.
    pub fn resolve(env: &Environment, config: Option<ShutterConfig>) -> Self {
        let (endpoint, endpoint_source) = if let Some(value) = &env.api_override {
            (Some(value.clone()), EndpointSource::Environment)
        } else if let Some(host) = config.as_ref().and_then(ShutterConfig::service_host) {
            (Some(host), EndpointSource::Config)
        } else {
            (None, EndpointSource::Unset)
        };

        Self {
            endpoint,
            endpoint_source,
            config,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.config.as_ref()?.token.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Usage,
    Version,
    CommandHelp(ShutterCommand),
    UnknownCommand(String),
    MissingArguments {
        command: ShutterCommand,
        supplied: usize,
    },
    Invoke {
        command: ShutterCommand,
        args: Vec<String>,
    },
}

/// Decides what an invocation does. The first matching rule wins:
///
/// 1. no positionals, or `--help` without a known command: usage
/// 2. `--version`: version
/// 3. known command with `--help`: that command's help
/// 4. unknown command name: error
/// 5. fewer arguments than the command's minimum: command help, as a failure
/// 6. otherwise: invoke the command
pub fn resolve(input: &ParsedInput) -> Resolution {
    let flags = input.flags;
    let Some((name, rest)) = input.positionals.split_first() else {
        return Resolution::Usage;
    };
    let command = ShutterCommand::from_name(name);

    if flags.help && command.is_none() {
        return Resolution::Usage;
    }
    if flags.version {
        return Resolution::Version;
    }
    let Some(command) = command else {
        return Resolution::UnknownCommand(name.clone());
    };
    if flags.help {
        return Resolution::CommandHelp(command);
    }
    match command.minimum_args() {
        Some(minimum) if rest.len() < minimum => Resolution::MissingArguments {
            command,
            supplied: rest.len(),
        },
        _ => Resolution::Invoke {
            command,
            args: rest.to_vec(),
        },
    }
}

/// What the CLI should render once dispatch is done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Usage,
    Version,
    CommandHelp(ShutterCommand),
    MissingArguments(ShutterCommand),
    Completed {
        command: ShutterCommand,
        result: CmdResult,
    },
}

impl Outcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::MissingArguments(_) => 1,
            _ => 0,
        }
    }
}

pub struct Dispatcher<L, H> {
    loader: L,
    handler: H,
    env: Environment,
}

impl<L: ConfigLoader, H: CommandHandler> Dispatcher<L, H> {
    pub fn new(loader: L, handler: H, env: Environment) -> Self {
        Self {
            loader,
            handler,
            env,
        }
    }

    pub async fn run(&self, input: ParsedInput) -> Result<Outcome> {
        let resolution = resolve(&input);
        debug!(?resolution, "resolved input");

        match resolution {
            Resolution::Usage => Ok(Outcome::Usage),
            Resolution::Version => Ok(Outcome::Version),
            Resolution::CommandHelp(command) => Ok(Outcome::CommandHelp(command)),
            Resolution::UnknownCommand(name) => Err(ShutterError::UnknownCommand(name)),
            Resolution::MissingArguments { command, supplied } => {
                debug!(%command, supplied, "not enough arguments");
                Ok(Outcome::MissingArguments(command))
            }
            Resolution::Invoke { command, args } => {
                let result = self.invoke(command, &args, input.flags).await?;
                Ok(Outcome::Completed { command, result })
            }
        }
    }

    async fn invoke(
        &self,
        command: ShutterCommand,
        args: &[String],
        flags: Flags,
    ) -> Result<CmdResult> {
        let config = match self.loader.load().await {
            Ok(config) => Some(config),
            Err(err) if command.tolerates_missing_config() => {
                debug!(%command, error = %err, "ignoring config load failure");
                None
            }
            Err(err) => {
                warn!(%command, error = %err, "config load failed");
                return Err(err);
            }
        };

        let context = CommandContext::resolve(&self.env, config);
        debug!(
            %command,
            endpoint = ?context.endpoint,
            source = ?context.endpoint_source,
            "invoking handler"
        );
        self.handler.run(command, args, flags, &context).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::{Cell, RefCell};
    use std::path::PathBuf;

    fn input(args: &[&str], flags: Flags) -> ParsedInput {
        ParsedInput::new(args.iter().map(|s| s.to_string()).collect(), flags)
    }

    fn help() -> Flags {
        Flags {
            help: true,
            ..Default::default()
        }
    }

    fn version() -> Flags {
        Flags {
            version: true,
            ..Default::default()
        }
    }

    // --- resolve ---

    #[test]
    fn test_no_positionals_is_usage() {
        assert_eq!(resolve(&input(&[], Flags::default())), Resolution::Usage);
        assert_eq!(resolve(&input(&[], version())), Resolution::Usage);
        assert_eq!(resolve(&input(&[], help())), Resolution::Usage);
    }

    #[test]
    fn test_help_with_unknown_command_is_usage() {
        assert_eq!(resolve(&input(&["bogus"], help())), Resolution::Usage);
    }

    #[test]
    fn test_version_beats_command_help_and_unknown_command() {
        let both = Flags {
            help: true,
            version: true,
            ..Default::default()
        };
        assert_eq!(resolve(&input(&["pull"], both)), Resolution::Version);
        assert_eq!(resolve(&input(&["bogus"], version())), Resolution::Version);
    }

    #[test]
    fn test_known_command_with_help() {
        assert_eq!(
            resolve(&input(&["snapshot"], help())),
            Resolution::CommandHelp(ShutterCommand::Snapshot)
        );
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            resolve(&input(&["render", "x"], Flags::default())),
            Resolution::UnknownCommand("render".to_string())
        );
    }

    #[test]
    fn test_missing_arguments() {
        assert_eq!(
            resolve(&input(&["snapshot", "home"], Flags::default())),
            Resolution::MissingArguments {
                command: ShutterCommand::Snapshot,
                supplied: 1
            }
        );
    }

    #[test]
    fn test_invoke_without_minimum() {
        assert_eq!(
            resolve(&input(&["update"], Flags::default())),
            Resolution::Invoke {
                command: ShutterCommand::Update,
                args: vec![]
            }
        );
    }

    #[test]
    fn test_invoke_passes_remaining_arguments() {
        assert_eq!(
            resolve(&input(&["snapshot", "home", "index.html", "extra"], Flags::default())),
            Resolution::Invoke {
                command: ShutterCommand::Snapshot,
                args: vec![
                    "home".to_string(),
                    "index.html".to_string(),
                    "extra".to_string()
                ]
            }
        );
    }

    // --- endpoint ---

    fn config_with_host(host: serde_json::Value) -> ShutterConfig {
        ShutterConfig {
            service_host: Some(host),
            ..Default::default()
        }
    }

    #[test]
    fn test_endpoint_from_config_when_environment_unset() {
        let context = CommandContext::resolve(
            &Environment::default(),
            Some(config_with_host(json!("https://x"))),
        );
        assert_eq!(context.endpoint.as_deref(), Some("https://x"));
        assert_eq!(context.endpoint_source, EndpointSource::Config);
    }

    #[test]
    fn test_environment_override_is_kept() {
        let env = Environment {
            api_override: Some("https://from-env".to_string()),
        };
        let context = CommandContext::resolve(&env, Some(config_with_host(json!("https://x"))));
        assert_eq!(context.endpoint.as_deref(), Some("https://from-env"));
        assert_eq!(context.endpoint_source, EndpointSource::Environment);
    }

    #[test]
    fn test_no_endpoint_without_override_or_service_host() {
        let context = CommandContext::resolve(
            &Environment::default(),
            Some(config_with_host(json!("undefined"))),
        );
        assert_eq!(context.endpoint, None);
        assert_eq!(context.endpoint_source, EndpointSource::Unset);

        let context =
            CommandContext::resolve(&Environment::default(), Some(ShutterConfig::default()));
        assert_eq!(context.endpoint, None);

        let context = CommandContext::resolve(&Environment::default(), None);
        assert_eq!(context.endpoint, None);
    }

    // --- Dispatcher ---

    struct StubLoader {
        config: Option<ShutterConfig>,
        loads: Cell<usize>,
    }

    impl StubLoader {
        fn ok(config: ShutterConfig) -> Self {
            Self {
                config: Some(config),
                loads: Cell::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                config: None,
                loads: Cell::new(0),
            }
        }
    }

    impl ConfigLoader for &StubLoader {
        async fn load(&self) -> Result<ShutterConfig> {
            self.loads.set(self.loads.get() + 1);
            self.config
                .clone()
                .ok_or_else(|| ShutterError::ConfigNotFound(PathBuf::from("/project")))
        }
    }

    #[derive(Debug)]
    struct Invocation {
        command: ShutterCommand,
        args: Vec<String>,
        flags: Flags,
        context: CommandContext,
    }

    #[derive(Default)]
    struct RecordingHandler {
        invocations: RefCell<Vec<Invocation>>,
        fail: bool,
    }

    impl CommandHandler for &RecordingHandler {
        async fn run(
            &self,
            command: ShutterCommand,
            args: &[String],
            flags: Flags,
            context: &CommandContext,
        ) -> Result<CmdResult> {
            self.invocations.borrow_mut().push(Invocation {
                command,
                args: args.to_vec(),
                flags,
                context: context.clone(),
            });
            if self.fail {
                return Err(ShutterError::handler(command.name(), "boom"));
            }
            Ok(CmdResult::default())
        }
    }

    #[tokio::test]
    async fn test_version_does_not_load_config_or_invoke() {
        let loader = StubLoader::ok(ShutterConfig::default());
        let handler = RecordingHandler::default();
        let dispatcher = Dispatcher::new(&loader, &handler, Environment::default());

        let flags = Flags {
            version: true,
            local: true,
            await_completion: true,
            help: false,
        };
        let outcome = dispatcher.run(input(&["pull", "1"], flags)).await.unwrap();

        assert_eq!(outcome, Outcome::Version);
        assert_eq!(outcome.exit_code(), 0);
        assert_eq!(loader.loads.get(), 0);
        assert!(handler.invocations.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_command_is_an_error() {
        let loader = StubLoader::ok(ShutterConfig::default());
        let handler = RecordingHandler::default();
        let dispatcher = Dispatcher::new(&loader, &handler, Environment::default());

        let err = dispatcher
            .run(input(&["render"], Flags::default()))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Unknown command: render");
        assert_eq!(loader.loads.get(), 0);
    }

    #[tokio::test]
    async fn test_missing_arguments_exit_with_failure() {
        let loader = StubLoader::ok(ShutterConfig::default());
        let handler = RecordingHandler::default();
        let dispatcher = Dispatcher::new(&loader, &handler, Environment::default());

        let outcome = dispatcher
            .run(input(&["pull"], Flags::default()))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::MissingArguments(ShutterCommand::Pull));
        assert_eq!(outcome.exit_code(), 1);
        assert!(handler.invocations.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_authenticate_runs_when_config_fails() {
        let loader = StubLoader::failing();
        let handler = RecordingHandler::default();
        let dispatcher = Dispatcher::new(&loader, &handler, Environment::default());

        let outcome = dispatcher
            .run(input(&["authenticate", "tok"], Flags::default()))
            .await
            .unwrap();

        assert!(matches!(outcome, Outcome::Completed { .. }));
        let invocations = handler.invocations.borrow();
        assert_eq!(invocations.len(), 1);
        assert_eq!(invocations[0].command, ShutterCommand::Authenticate);
        assert_eq!(invocations[0].args, vec!["tok".to_string()]);
        assert_eq!(invocations[0].context.config, None);
    }

    #[tokio::test]
    async fn test_other_commands_fail_when_config_fails() {
        let loader = StubLoader::failing();
        let handler = RecordingHandler::default();
        let dispatcher = Dispatcher::new(&loader, &handler, Environment::default());

        let err = dispatcher
            .run(input(&["snapshot", "home", "index.html"], Flags::default()))
            .await
            .unwrap_err();

        assert!(matches!(err, ShutterError::ConfigNotFound(_)));
        assert_eq!(loader.loads.get(), 1);
        assert!(handler.invocations.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_handler_sees_config_endpoint_and_flags() {
        let loader = StubLoader::ok(config_with_host(json!("https://x")));
        let handler = RecordingHandler::default();
        let dispatcher = Dispatcher::new(&loader, &handler, Environment::default());

        let flags = Flags {
            local: true,
            ..Default::default()
        };
        dispatcher.run(input(&["pull", "42"], flags)).await.unwrap();

        let invocations = handler.invocations.borrow();
        assert_eq!(invocations[0].context.endpoint.as_deref(), Some("https://x"));
        assert!(invocations[0].flags.local);
        assert_eq!(invocations[0].args, vec!["42".to_string()]);
    }

    #[tokio::test]
    async fn test_environment_override_survives_config() {
        let loader = StubLoader::ok(config_with_host(json!("https://other")));
        let handler = RecordingHandler::default();
        let env = Environment {
            api_override: Some("https://pinned".to_string()),
        };
        let dispatcher = Dispatcher::new(&loader, &handler, env);

        dispatcher
            .run(input(&["update"], Flags::default()))
            .await
            .unwrap();

        assert_eq!(
            handler.invocations.borrow()[0].context.endpoint.as_deref(),
            Some("https://pinned")
        );
    }

    #[tokio::test]
    async fn test_handler_failure_propagates() {
        let loader = StubLoader::ok(ShutterConfig::default());
        let handler = RecordingHandler {
            fail: true,
            ..Default::default()
        };
        let dispatcher = Dispatcher::new(&loader, &handler, Environment::default());

        let err = dispatcher
            .run(input(&["update"], Flags::default()))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "update failed: boom");
        assert_eq!(handler.invocations.borrow().len(), 1);
    }
}
