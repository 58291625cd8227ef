//! Builder for a single supervisord `[program:*]` section.
use std::{collections::BTreeMap, fmt};

use strum_macros::{AsRefStr, EnumString};

use crate::{
    constants::{
        AUTO_RESTART_MODES, DEFAULT_AUTO_START, DEFAULT_EXIT_CODES, DEFAULT_KILL_AS_GROUP,
        DEFAULT_LOG_BACKUPS, DEFAULT_LOG_MAX_BYTES, DEFAULT_NUM_PROCS, DEFAULT_PRIORITY,
        DEFAULT_PROCESS_NAME, DEFAULT_REDIRECT_STDERR, DEFAULT_START_RETRIES,
        DEFAULT_START_SECS, DEFAULT_STOP_AS_GROUP, DEFAULT_STOP_SIGNAL,
        DEFAULT_STOP_WAIT_SECS,
    },
    error::{ConfigError, Result, require_non_blank},
    opt::Opt,
    render,
};

/// String forms accepted by supervisord's `autorestart` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum RestartMode {
    False,
    True,
    Unexpected,
}

/// Value of `autorestart`: either a plain boolean or one of the string modes.
///
/// Both shapes are kept apart so the rendered line reflects whichever setter
/// ran last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoRestart {
    Flag(bool),
    Mode(RestartMode),
}

impl fmt::Display for AutoRestart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutoRestart::Flag(flag) => write!(f, "{flag}"),
            AutoRestart::Mode(mode) => f.write_str(mode.as_ref()),
        }
    }
}

/// Settings for one supervised program.
///
/// The four identity fields are validated at construction and cannot be changed
/// afterwards. Every other field is an [`Opt`] that only shows up in rendered
/// output once its `with_*` setter has been called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramConfig {
    name: String,
    user: String,
    root: String,
    log_dir: String,

    /// Environment variables passed to the program.
    pub environment: Opt<BTreeMap<String, String>>,

    /// Start on supervisord startup.
    pub auto_start: Opt<bool>,
    /// Restart policy after the program exits.
    pub auto_restart: Opt<AutoRestart>,
    /// Maximum serial start attempts.
    pub start_retries: Opt<u32>,
    /// Seconds to stay up before a start counts as successful.
    pub start_secs: Opt<u32>,

    /// Rotation size shared by the stdout and stderr logs.
    pub log_max_bytes: Opt<String>,
    /// Rotated file count shared by the stdout and stderr logs.
    pub log_backups: Opt<u32>,
    /// Send stderr to the stdout log.
    pub redirect_stderr: Opt<bool>,

    pub stop_as_group: Opt<bool>,
    pub stop_wait_secs: Opt<u32>,
    pub kill_as_group: Opt<bool>,
    /// Signal name without the `SIG` prefix (TERM, INT, QUIT, ...).
    pub stop_signal: Opt<String>,
    /// Start order, low starts first.
    pub priority: Opt<i32>,
    pub exit_codes: Opt<Vec<i32>>,

    /// Instance count.
    pub num_procs: Opt<u32>,
    /// Instance name template, required by supervisord when `num_procs > 1`.
    pub process_name: Opt<String>,
}

impl ProgramConfig {
    /// Creates a program with supervisord's standard defaults, none of them set.
    ///
    /// # Errors
    /// Returns [`ConfigError::Validation`] if any argument is blank, or if
    /// `name` is not usable as a file name under `<root>/bin` and `<log_dir>`.
    pub fn new(
        name: impl Into<String>,
        root: impl Into<String>,
        user: impl Into<String>,
        log_dir: impl Into<String>,
    ) -> Result<Self> {
        let (name, root, user, log_dir) =
            (name.into(), root.into(), user.into(), log_dir.into());
        require_non_blank("name", &name)?;
        if name.contains('/') || name == "." || name == ".." {
            return Err(ConfigError::validation(
                "name",
                format!("'{name}' must be a single path segment"),
            ));
        }
        require_non_blank("root", &root)?;
        require_non_blank("user", &user)?;
        require_non_blank("log_dir", &log_dir)?;

        Ok(Self {
            name,
            user,
            root,
            log_dir,

            environment: Opt::new(BTreeMap::new()),

            auto_start: Opt::new(DEFAULT_AUTO_START),
            auto_restart: Opt::new(AutoRestart::Mode(RestartMode::Unexpected)),
            start_retries: Opt::new(DEFAULT_START_RETRIES),
            start_secs: Opt::new(DEFAULT_START_SECS),

            log_max_bytes: Opt::new(DEFAULT_LOG_MAX_BYTES.to_string()),
            log_backups: Opt::new(DEFAULT_LOG_BACKUPS),
            redirect_stderr: Opt::new(DEFAULT_REDIRECT_STDERR),

            stop_as_group: Opt::new(DEFAULT_STOP_AS_GROUP),
            stop_wait_secs: Opt::new(DEFAULT_STOP_WAIT_SECS),
            kill_as_group: Opt::new(DEFAULT_KILL_AS_GROUP),
            stop_signal: Opt::new(DEFAULT_STOP_SIGNAL.to_string()),
            priority: Opt::new(DEFAULT_PRIORITY),
            exit_codes: Opt::new(DEFAULT_EXIT_CODES.to_vec()),

            num_procs: Opt::new(DEFAULT_NUM_PROCS),
            process_name: Opt::new(DEFAULT_PROCESS_NAME.to_string()),
        })
    }

    /// Program name, used for the section header, command and log files.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Account the program runs as.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Working directory; the command lives in `<root>/bin/<name>`.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Directory holding the stdout and stderr logs.
    pub fn log_dir(&self) -> &str {
        &self.log_dir
    }

    /// Renders this program as a `[program:*]` section.
    pub fn render(&self) -> Result<String> {
        render::render_program(self)
    }

    /// Sets the environment variables passed to the program.
    pub fn with_environment<I, K, V>(mut self, environment: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.environment.set(
            environment
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        );
        self
    }

    /// Sets whether the program starts with supervisord.
    pub fn with_auto_start(mut self, auto_start: bool) -> Self {
        self.auto_start.set(auto_start);
        self
    }

    /// Sets `autorestart` to a plain boolean.
    pub fn with_auto_restart(mut self, auto_restart: bool) -> Self {
        self.auto_restart.set(AutoRestart::Flag(auto_restart));
        self
    }

    /// Sets `autorestart` from a typed mode.
    pub fn with_restart_mode(mut self, mode: RestartMode) -> Self {
        self.auto_restart.set(AutoRestart::Mode(mode));
        self
    }

    /// Sets `autorestart` from its string form.
    ///
    /// # Errors
    /// Returns [`ConfigError::Validation`] unless `mode` is exactly one of
    /// [`AUTO_RESTART_MODES`].
    pub fn with_auto_restart_mode(self, mode: &str) -> Result<Self> {
        let parsed = mode.parse::<RestartMode>().map_err(|_| {
            ConfigError::validation(
                "autorestart",
                format!(
                    "'{mode}' is not one of {}",
                    AUTO_RESTART_MODES.join(", ")
                ),
            )
        })?;
        Ok(self.with_restart_mode(parsed))
    }

    /// Sets the number of serial start attempts before giving up.
    pub fn with_start_retries(mut self, start_retries: u32) -> Self {
        self.start_retries.set(start_retries);
        self
    }

    /// Sets how long the program must stay up to count as started.
    pub fn with_start_secs(mut self, start_secs: u32) -> Self {
        self.start_secs.set(start_secs);
        self
    }

    /// Sets the rotation size for both stdout and stderr logs (e.g. `"50MB"`).
    pub fn with_log_max_bytes(mut self, log_max_bytes: impl Into<String>) -> Self {
        self.log_max_bytes.set(log_max_bytes.into());
        self
    }

    /// Sets the rotated file count for both stdout and stderr logs.
    pub fn with_log_backups(mut self, log_backups: u32) -> Self {
        self.log_backups.set(log_backups);
        self
    }

    /// Sets whether stderr is written to the stdout log.
    pub fn with_redirect_stderr(mut self, redirect_stderr: bool) -> Self {
        self.redirect_stderr.set(redirect_stderr);
        self
    }

    /// Sets whether the stop signal goes to the whole process group.
    pub fn with_stop_as_group(mut self, stop_as_group: bool) -> Self {
        self.stop_as_group.set(stop_as_group);
        self
    }

    /// Sets the seconds to wait for a clean exit before SIGKILL.
    pub fn with_stop_wait_secs(mut self, stop_wait_secs: u32) -> Self {
        self.stop_wait_secs.set(stop_wait_secs);
        self
    }

    /// Sets whether SIGKILL goes to the whole process group.
    pub fn with_kill_as_group(mut self, kill_as_group: bool) -> Self {
        self.kill_as_group.set(kill_as_group);
        self
    }

    /// Sets the stop signal name (TERM, INT, QUIT, ...).
    pub fn with_stop_signal(mut self, stop_signal: impl Into<String>) -> Self {
        self.stop_signal.set(stop_signal.into());
        self
    }

    /// Sets the start order; lower values start first.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority.set(priority);
        self
    }

    /// Sets the exit codes treated as expected.
    pub fn with_exit_codes(mut self, exit_codes: impl IntoIterator<Item = i32>) -> Self {
        self.exit_codes.set(exit_codes.into_iter().collect());
        self
    }

    /// Sets the number of process instances.
    pub fn with_num_procs(mut self, num_procs: u32) -> Self {
        self.num_procs.set(num_procs);
        self
    }

    /// Sets the instance name template, e.g. `%(program_name)s_%(process_num)02d`.
    pub fn with_process_name(mut self, process_name: impl Into<String>) -> Self {
        self.process_name.set(process_name.into());
        self
    }
}
