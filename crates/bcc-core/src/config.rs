//! Compiler options.
//!
//! Options are plain values chosen by the driver; the compiler reads
//! them but never changes them.

/// How constructs outside POSIX bc are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PosixMode {
    /// Accept silently.
    #[default]
    Off,
    /// Accept and record a warning.
    Warn,
    /// Reject with a POSIX error.
    Error,
}

impl PosixMode {
    /// Strict mode when `POSIXLY_CORRECT` is set, otherwise [`PosixMode::Off`].
    pub fn from_env() -> Self {
        if std::env::var_os("POSIXLY_CORRECT").is_some() {
            PosixMode::Error
        } else {
            PosixMode::Off
        }
    }

    /// Whether POSIX violations are reported at all.
    #[inline]
    pub fn is_checked(self) -> bool {
        self != PosixMode::Off
    }
}

/// Upper bounds on the program's name and constant tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Limits {
    /// Distinct scalar variable names.
    pub max_vars: usize,
    /// Distinct array names.
    pub max_arrays: usize,
    /// Functions, including the reserved main and read functions.
    pub max_functions: usize,
    /// Distinct number and string literals.
    pub max_constants: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_vars: u32::MAX as usize,
            max_arrays: u32::MAX as usize,
            max_functions: u32::MAX as usize,
            max_constants: u32::MAX as usize,
        }
    }
}

/// Options for one compiler session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompilerOptions {
    pub posix: PosixMode,
    pub limits: Limits,
}

impl CompilerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the POSIX strictness.
    pub fn with_posix(mut self, posix: PosixMode) -> Self {
        self.posix = posix;
        self
    }

    /// Set the table limits.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_permissive() {
        let options = CompilerOptions::new();
        assert_eq!(options.posix, PosixMode::Off);
        assert!(!options.posix.is_checked());
        assert!(options.limits.max_vars > 1 << 20);
    }

    #[test]
    fn builder_methods() {
        let limits = Limits {
            max_vars: 4,
            ..Limits::default()
        };
        let options = CompilerOptions::new()
            .with_posix(PosixMode::Warn)
            .with_limits(limits);
        assert!(options.posix.is_checked());
        assert_eq!(options.limits.max_vars, 4);
    }
}
