//! Named collections of programs rendered as a supervisord `[group:*]` section.
use crate::{
    error::{Result, require_non_blank},
    program::ProgramConfig,
    render,
};

/// An ordered set of programs managed together by supervisord.
///
/// Programs render in insertion order. Name uniqueness is not enforced here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupConfig {
    name: String,
    programs: Vec<ProgramConfig>,
}

impl GroupConfig {
    /// Creates an empty group.
    ///
    /// # Errors
    /// Returns a validation error if `name` is blank.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        require_non_blank("group", &name)?;
        Ok(Self {
            name,
            programs: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn programs(&self) -> &[ProgramConfig] {
        &self.programs
    }

    /// Member names in insertion order, as listed on the `programs=` line.
    pub fn program_names(&self) -> Vec<&str> {
        self.programs.iter().map(ProgramConfig::name).collect()
    }

    /// Appends a program, for use in loops.
    pub fn add_program(&mut self, program: ProgramConfig) -> &mut Self {
        self.programs.push(program);
        self
    }

    /// Appends a program, for use in builder chains.
    pub fn with_program(mut self, program: ProgramConfig) -> Self {
        self.programs.push(program);
        self
    }

    /// Renders the group header followed by every member program.
    pub fn render(&self) -> Result<String> {
        render::render_group(self)
    }
}
