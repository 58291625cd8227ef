//! Constants and default values for generated supervisord configuration.
//!
//! This module centralizes the supervisord defaults every program starts from,
//! the file layout conventions used when deriving command and log paths, and
//! the manifest file names the CLI looks for.

// ============================================================================
// Supervisord Defaults
// ============================================================================

/// Start the program when supervisord starts.
pub const DEFAULT_AUTO_START: bool = true;

/// Number of serial failure attempts before giving up on a start.
pub const DEFAULT_START_RETRIES: u32 = 3;

/// Seconds a program must stay up to count as successfully started.
pub const DEFAULT_START_SECS: u32 = 1;

/// Maximum size of a log file before it is rotated.
pub const DEFAULT_LOG_MAX_BYTES: &str = "50MB";

/// Number of rotated log files kept around.
pub const DEFAULT_LOG_BACKUPS: u32 = 10;

/// Keep stderr in its own log file.
pub const DEFAULT_REDIRECT_STDERR: bool = false;

/// Send the stop signal to the whole process group.
pub const DEFAULT_STOP_AS_GROUP: bool = false;

/// Seconds to wait for a clean exit before escalating to SIGKILL.
pub const DEFAULT_STOP_WAIT_SECS: u32 = 10;

/// Send SIGKILL to the whole process group.
pub const DEFAULT_KILL_AS_GROUP: bool = false;

/// Signal used to ask a program to stop.
pub const DEFAULT_STOP_SIGNAL: &str = "TERM";

/// Relative start order. Lower values start first and stop last.
pub const DEFAULT_PRIORITY: i32 = 999;

/// Exit codes considered expected.
pub const DEFAULT_EXIT_CODES: [i32; 1] = [0];

/// Number of process instances started for a program.
pub const DEFAULT_NUM_PROCS: u32 = 1;

/// Template used to name each process instance.
pub const DEFAULT_PROCESS_NAME: &str = "%(program_name)s";

/// Values accepted by `autorestart` when given as a string.
pub const AUTO_RESTART_MODES: [&str; 3] = ["false", "true", "unexpected"];

// ============================================================================
// Path Layout
// ============================================================================

/// Directory under a program root holding its executable.
pub const BIN_DIR: &str = "bin";

/// Extension for the stdout log file.
pub const STDOUT_LOG_EXT: &str = "log";

/// Extension for the stderr log file.
pub const STDERR_LOG_EXT: &str = "err";

// ============================================================================
// Manifest Discovery
// ============================================================================

/// Manifest file looked up first when `--config` is omitted.
pub const DEFAULT_MANIFEST: &str = "supervisorgen.yaml";

/// Fallback manifest file name.
pub const FALLBACK_MANIFEST: &str = "sgen.yaml";
