//! YAML manifests describing programs and groups to generate.
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::{
    collections::{BTreeMap, HashMap, HashSet},
    env, fs,
    path::Path,
};
use tracing::{info, warn};

use crate::{
    constants::{DEFAULT_MANIFEST, FALLBACK_MANIFEST},
    error::{ConfigError, Result},
    group::GroupConfig,
    program::ProgramConfig,
};

const ENV_VAR_PATTERN: &str =
    r"\$\$|\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)";

/// Represents the structure of the manifest file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Manifest format version.
    pub version: String,
    /// Programs in declaration order.
    #[serde(default)]
    pub programs: Vec<ProgramEntry>,
    /// Groups in declaration order.
    #[serde(default)]
    pub groups: Vec<GroupEntry>,
}

/// A program as written in the manifest.
///
/// Keys left out of the manifest stay unset on the built [`ProgramConfig`] and
/// therefore never appear in the rendered section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProgramEntry {
    pub name: String,
    pub root: String,
    pub user: String,
    pub log_dir: String,
    pub environment: Option<BTreeMap<String, String>>,
    pub autostart: Option<bool>,
    pub autorestart: Option<AutoRestartEntry>,
    pub startretries: Option<u32>,
    pub startsecs: Option<u32>,
    pub log_max_bytes: Option<String>,
    pub log_backups: Option<u32>,
    pub redirect_stderr: Option<bool>,
    pub stopasgroup: Option<bool>,
    pub stopwaitsecs: Option<u32>,
    pub killasgroup: Option<bool>,
    pub stopsignal: Option<String>,
    pub priority: Option<i32>,
    pub exitcodes: Option<Vec<i32>>,
    pub numprocs: Option<u32>,
    pub process_name: Option<String>,
}

/// `autorestart` accepts a YAML boolean or one of the string modes.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AutoRestartEntry {
    Flag(bool),
    Mode(String),
}

/// A group as written in the manifest, referencing programs by name.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupEntry {
    pub name: String,
    pub programs: Vec<String>,
}

/// Machine-readable overview printed by `sgen list --json`.
#[derive(Debug, Serialize)]
pub struct ManifestSummary<'a> {
    pub programs: Vec<ProgramSummary<'a>>,
    pub groups: Vec<GroupSummary<'a>>,
}

#[derive(Debug, Serialize)]
pub struct ProgramSummary<'a> {
    pub name: &'a str,
    pub user: &'a str,
    pub root: &'a str,
    pub groups: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct GroupSummary<'a> {
    pub name: &'a str,
    pub programs: Vec<&'a str>,
}

impl ProgramEntry {
    /// Builds a typed configuration, forwarding only the keys that were present.
    pub fn build(&self) -> Result<ProgramConfig> {
        let mut program =
            ProgramConfig::new(&self.name, &self.root, &self.user, &self.log_dir)?;

        if let Some(environment) = &self.environment {
            program = program.with_environment(environment.clone());
        }
        if let Some(autostart) = self.autostart {
            program = program.with_auto_start(autostart);
        }
        match &self.autorestart {
            Some(AutoRestartEntry::Flag(flag)) => {
                program = program.with_auto_restart(*flag);
            }
            Some(AutoRestartEntry::Mode(mode)) => {
                program = program.with_auto_restart_mode(mode)?;
            }
            None => {}
        }
        if let Some(retries) = self.startretries {
            program = program.with_start_retries(retries);
        }
        if let Some(secs) = self.startsecs {
            program = program.with_start_secs(secs);
        }
        if let Some(max_bytes) = &self.log_max_bytes {
            program = program.with_log_max_bytes(max_bytes.as_str());
        }
        if let Some(backups) = self.log_backups {
            program = program.with_log_backups(backups);
        }
        if let Some(redirect) = self.redirect_stderr {
            program = program.with_redirect_stderr(redirect);
        }
        if let Some(stop_as_group) = self.stopasgroup {
            program = program.with_stop_as_group(stop_as_group);
        }
        if let Some(secs) = self.stopwaitsecs {
            program = program.with_stop_wait_secs(secs);
        }
        if let Some(kill_as_group) = self.killasgroup {
            program = program.with_kill_as_group(kill_as_group);
        }
        if let Some(signal) = &self.stopsignal {
            program = program.with_stop_signal(signal.as_str());
        }
        if let Some(priority) = self.priority {
            program = program.with_priority(priority);
        }
        if let Some(codes) = &self.exitcodes {
            program = program.with_exit_codes(codes.iter().copied());
        }
        if let Some(num_procs) = self.numprocs {
            program = program.with_num_procs(num_procs);
        }
        if let Some(process_name) = &self.process_name {
            program = program.with_process_name(process_name.as_str());
        }

        Ok(program)
    }
}

impl Manifest {
    /// Parses manifest YAML that has already been read into memory.
    ///
    /// Environment references are expanded inside string values only, after the
    /// document structure is known. Comments and mapping keys are never
    /// touched, and `$$` stands for a literal `$`.
    pub fn parse(content: &str) -> Result<Self> {
        let mut document: Value =
            serde_yaml::from_str(content).map_err(ConfigError::ManifestParse)?;
        expand_values(&env_var_regex()?, &mut document)?;
        let manifest: Manifest =
            serde_yaml::from_value(document).map_err(ConfigError::ManifestParse)?;
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<()> {
        let mut program_names = HashSet::new();
        for entry in &self.programs {
            if !program_names.insert(entry.name.as_str()) {
                return Err(ConfigError::validation(
                    "programs",
                    format!("program '{}' is declared more than once", entry.name),
                ));
            }
            // Surface blank fields and bad modes at load time.
            entry.build()?;
        }

        let mut group_names = HashSet::new();
        let mut memberships: HashMap<&str, usize> = HashMap::new();
        for group in &self.groups {
            if !group_names.insert(group.name.as_str()) {
                return Err(ConfigError::validation(
                    "groups",
                    format!("group '{}' is declared more than once", group.name),
                ));
            }
            GroupConfig::new(group.name.as_str())?;
            if group.programs.is_empty() {
                return Err(ConfigError::validation(
                    "groups",
                    format!("group '{}' lists no programs", group.name),
                ));
            }
            let mut members = HashSet::new();
            for member in &group.programs {
                if !members.insert(member.as_str()) {
                    return Err(ConfigError::validation(
                        "groups",
                        format!("group '{}' lists program '{member}' twice", group.name),
                    ));
                }
                if !program_names.contains(member.as_str()) {
                    return Err(ConfigError::validation(
                        "groups",
                        format!(
                            "group '{}' references unknown program '{member}'",
                            group.name
                        ),
                    ));
                }
                *memberships.entry(member.as_str()).or_default() += 1;
            }
        }

        for (program, count) in memberships {
            if count > 1 {
                warn!("Program '{program}' belongs to {count} groups");
            }
        }

        Ok(())
    }

    /// Builds the named program.
    pub fn program(&self, name: &str) -> Result<ProgramConfig> {
        self.programs
            .iter()
            .find(|entry| entry.name == name)
            .ok_or_else(|| {
                ConfigError::validation("program", format!("unknown program '{name}'"))
            })?
            .build()
    }

    /// Builds the named group with its member programs in listed order.
    pub fn group(&self, name: &str) -> Result<GroupConfig> {
        let entry = self
            .groups
            .iter()
            .find(|group| group.name == name)
            .ok_or_else(|| {
                ConfigError::validation("group", format!("unknown group '{name}'"))
            })?;

        let mut group = GroupConfig::new(&entry.name)?;
        for member in &entry.programs {
            group.add_program(self.program(member)?);
        }
        Ok(group)
    }

    /// Renders every group, then every program no group claims.
    ///
    /// Sections are separated by a single blank line.
    pub fn render_all(&self) -> Result<String> {
        let grouped: HashSet<&str> = self
            .groups
            .iter()
            .flat_map(|group| group.programs.iter().map(String::as_str))
            .collect();

        let mut sections = Vec::new();
        for group in &self.groups {
            sections.push(self.group(&group.name)?.render()?);
        }
        for entry in &self.programs {
            if !grouped.contains(entry.name.as_str()) {
                sections.push(entry.build()?.render()?);
            }
        }

        Ok(sections.join("\n"))
    }

    /// Summarizes programs and group membership.
    pub fn summary(&self) -> ManifestSummary<'_> {
        let programs = self
            .programs
            .iter()
            .map(|entry| ProgramSummary {
                name: &entry.name,
                user: &entry.user,
                root: &entry.root,
                groups: self
                    .groups
                    .iter()
                    .filter(|group| group.programs.contains(&entry.name))
                    .map(|group| group.name.as_str())
                    .collect(),
            })
            .collect();
        let groups = self
            .groups
            .iter()
            .map(|group| GroupSummary {
                name: &group.name,
                programs: group.programs.iter().map(String::as_str).collect(),
            })
            .collect();

        ManifestSummary { programs, groups }
    }
}

fn env_var_regex() -> Result<Regex> {
    Regex::new(ENV_VAR_PATTERN).map_err(|err| ConfigError::Invariant(err.to_string()))
}

/// Expands environment references in every string value of a parsed document.
fn expand_values(re: &Regex, value: &mut Value) -> Result<()> {
    match value {
        Value::String(text) => *text = expand_env_vars(re, text)?,
        Value::Sequence(items) => {
            for item in items {
                expand_values(re, item)?;
            }
        }
        Value::Mapping(map) => {
            for (_, item) in map.iter_mut() {
                expand_values(re, item)?;
            }
        }
        Value::Tagged(tagged) => expand_values(re, &mut tagged.value)?,
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
    Ok(())
}

/// Expands `${VAR}` and `$VAR` references from the process environment.
/// `$$` produces a literal `$`.
fn expand_env_vars(re: &Regex, input: &str) -> Result<String> {
    let mut expanded = String::with_capacity(input.len());
    let mut last = 0;
    for caps in re.captures_iter(input) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        expanded.push_str(&input[last..whole.start()]);
        match caps.get(1).or_else(|| caps.get(2)) {
            Some(var) => {
                let value = env::var(var.as_str())
                    .map_err(|_| ConfigError::MissingEnvVar(var.as_str().to_string()))?;
                expanded.push_str(&value);
            }
            None => expanded.push('$'),
        }
        last = whole.end();
    }
    expanded.push_str(&input[last..]);
    Ok(expanded)
}

/// Loads and validates a manifest, expanding environment variables.
///
/// Without an explicit path, `supervisorgen.yaml` is tried first and
/// `sgen.yaml` second.
pub fn load_manifest(manifest_path: Option<&str>) -> Result<Manifest> {
    let manifest_path = manifest_path.map(Path::new).unwrap_or_else(|| {
        if Path::new(DEFAULT_MANIFEST).exists() {
            Path::new(DEFAULT_MANIFEST)
        } else {
            Path::new(FALLBACK_MANIFEST)
        }
    });

    let content = fs::read_to_string(manifest_path).map_err(|e| {
        ConfigError::ManifestRead(std::io::Error::new(
            e.kind(),
            format!("{} ({})", e, manifest_path.display()),
        ))
    })?;

    let manifest = Manifest::parse(&content)?;
    info!(
        "Loaded manifest {:?} with {} program(s) and {} group(s)",
        manifest_path,
        manifest.programs.len(),
        manifest.groups.len()
    );
    Ok(manifest)
}
