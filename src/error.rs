//! Error type shared across the crate.
//!
//! Every failure carries the process exit code it should map to, so `main`
//! can stay a thin shell. Codes:
//!
//! - 2: file I/O (missing model files, unreadable/unwritable paths)
//! - 3: template problems (expected field markers not found)
//! - 4: invalid parameters (non-physical mass/metallicity)
//! - 5: environment (bad MESA install, unsupported version, launch failures)

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// File I/O failure (exit code 2).
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// Malformed or incompatible template (exit code 3).
    pub fn template(message: impl Into<String>) -> Self {
        Self::new(3, message)
    }

    /// Invalid user parameter (exit code 4).
    pub fn params(message: impl Into<String>) -> Self {
        Self::new(4, message)
    }

    /// Environment problem: MESA install, version, or launch (exit code 5).
    pub fn env(message: impl Into<String>) -> Self {
        Self::new(5, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
