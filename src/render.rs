//! Serialization of program and group configuration into supervisord INI text.
//!
//! Rendering is a pure read-only pass. Identity lines (header, user, directory,
//! command and both log files) are always written; every other directive is
//! written only when its value was explicitly set, in a fixed order that does
//! not depend on which fields are present.
use std::{fmt::Display, path::PathBuf};

use normalize_path::NormalizePath;
use tracing::debug;

use crate::{
    constants::{BIN_DIR, STDERR_LOG_EXT, STDOUT_LOG_EXT},
    error::{ConfigError, Result},
    group::GroupConfig,
    opt::Opt,
    program::ProgramConfig,
};

/// Renders one `[program:*]` section.
///
/// The result ends with exactly one trailing newline.
///
/// # Errors
/// Returns [`ConfigError::Invariant`] if a required field is blank. This cannot
/// happen for a program built through [`ProgramConfig::new`].
pub fn render_program(program: &ProgramConfig) -> Result<String> {
    for (field, value) in [
        ("name", program.name()),
        ("root", program.root()),
        ("user", program.user()),
        ("log_dir", program.log_dir()),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::Invariant(format!(
                "program {field} is blank at render time"
            )));
        }
    }

    let name = program.name();
    let mut lines = Lines::default();

    lines.raw(format!("[program:{name}]"));
    lines.always("user            = ", program.user());
    lines.always("directory       = ", program.root());
    lines.always(
        "command         = ",
        join_clean(program.root(), &[BIN_DIR, name]).display(),
    );
    if let Some(environment) = program.environment.explicit() {
        let joined = environment
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(",");
        if !joined.is_empty() {
            lines.always("environment     = ", joined);
        }
    }
    lines.set("autostart       = ", &program.auto_start);
    lines.set("autorestart     = ", &program.auto_restart);
    lines.set("startretries    = ", &program.start_retries);
    lines.set("startsecs       = ", &program.start_secs);

    // Rotation settings repeat under both log files.
    lines.always(
        "stdout_logfile  = ",
        log_path(program.log_dir(), name, STDOUT_LOG_EXT),
    );
    lines.set("stdout_logfile_maxbytes = ", &program.log_max_bytes);
    lines.set("stdout_logfile_backups = ", &program.log_backups);
    lines.always(
        "stderr_logfile  = ",
        log_path(program.log_dir(), name, STDERR_LOG_EXT),
    );
    lines.set("stderr_logfile_maxbytes = ", &program.log_max_bytes);
    lines.set("stderr_logfile_backups = ", &program.log_backups);
    lines.set("redirect_stderr = ", &program.redirect_stderr);

    lines.set("stopasgroup     = ", &program.stop_as_group);
    lines.set("stopwaitsecs    = ", &program.stop_wait_secs);
    lines.set("killasgroup     = ", &program.kill_as_group);
    lines.set("stopsignal      = ", &program.stop_signal);
    lines.set("priority        = ", &program.priority);
    if let Some(codes) = program.exit_codes.explicit() {
        lines.always("exitcodes       = ", join_ints(codes));
    }
    lines.set("numprocs        = ", &program.num_procs);
    lines.set("process_name    = ", &program.process_name);

    debug!(program = name, lines = lines.len(), "rendered program section");
    Ok(lines.finish())
}

/// Renders a `[group:*]` section followed by each member's program section.
///
/// # Errors
/// Returns [`ConfigError::EmptyGroup`] if the group has no programs,
/// [`ConfigError::Invariant`] if its name is blank, or any error from
/// [`render_program`].
pub fn render_group(group: &GroupConfig) -> Result<String> {
    if group.name().trim().is_empty() {
        return Err(ConfigError::Invariant("group name is blank at render time".into()));
    }
    if group.programs().is_empty() {
        return Err(ConfigError::EmptyGroup {
            group: group.name().to_string(),
        });
    }

    let mut lines = Lines::default();
    lines.raw(format!("[group:{}]", group.name()));
    lines.raw(format!("programs={}", group.program_names().join(",")));
    lines.raw(String::new());

    for program in group.programs() {
        lines.raw(String::new());
        lines.raw(render_program(program)?.trim().to_string());
    }

    debug!(
        group = group.name(),
        programs = group.programs().len(),
        "rendered group section"
    );
    Ok(lines.finish())
}

fn log_path(log_dir: &str, name: &str, ext: &str) -> String {
    let file = format!("{name}.{ext}");
    join_clean(log_dir, &[file.as_str()]).display().to_string()
}

/// Joins `segments` under `base` and resolves `.` and `..` lexically.
///
/// Leading separators on a segment are dropped so it always nests under `base`.
fn join_clean(base: &str, segments: &[&str]) -> PathBuf {
    let mut path = PathBuf::from(base);
    for segment in segments {
        path.push(segment.trim_start_matches('/'));
    }
    path.normalize()
}

fn join_ints(values: &[i32]) -> String {
    values
        .iter()
        .map(i32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Newline-terminated output accumulator.
#[derive(Default)]
struct Lines(Vec<String>);

impl Lines {
    fn raw(&mut self, line: String) {
        self.0.push(line);
    }

    fn always(&mut self, label: &str, value: impl Display) {
        self.0.push(format!("{label}{value}"));
    }

    fn set<T: Display>(&mut self, label: &str, opt: &Opt<T>) {
        if let Some(value) = opt.explicit() {
            self.always(label, value);
        }
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn finish(self) -> String {
        let mut out = self.0.join("\n");
        out.push('\n');
        out
    }
}
