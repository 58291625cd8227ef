//! Values that remember whether they were explicitly assigned.

/// A configuration value paired with a flag recording whether it was set.
///
/// The default passed to [`Opt::new`] stays readable through [`Opt::get`], but
/// only [`Opt::set`] flips the flag. This keeps zero values such as `0` or
/// `false` distinguishable from "never touched".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opt<T> {
    value: T,
    is_set: bool,
}

impl<T> Opt<T> {
    /// Wraps a default value without marking it as set.
    pub fn new(default: T) -> Self {
        Self {
            value: default,
            is_set: false,
        }
    }

    /// Returns the current value regardless of whether it was set.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Stores `value` and marks it as explicitly set.
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.is_set = true;
    }

    /// True once [`Opt::set`] has been called.
    pub fn is_set(&self) -> bool {
        self.is_set
    }

    /// The value if it was explicitly set, `None` otherwise.
    pub fn explicit(&self) -> Option<&T> {
        self.is_set.then_some(&self.value)
    }
}
