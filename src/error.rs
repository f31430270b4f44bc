/// Exit code for bad input: flags, configuration, empty questions.
pub const EXIT_USAGE: u8 = 2;
/// Exit code for runtime failures: network, terminal, filesystem.
pub const EXIT_RUNTIME: u8 = 4;

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

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, message)
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(EXIT_RUNTIME, message)
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

impl From<crate::data::ApiError> for AppError {
    fn from(err: crate::data::ApiError) -> Self {
        Self::runtime(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_pick_exit_codes() {
        assert_eq!(AppError::usage("bad flag").exit_code(), EXIT_USAGE);
        assert_eq!(AppError::runtime("socket closed").exit_code(), EXIT_RUNTIME);
        assert_eq!(AppError::new(7, "x").exit_code(), 7);
    }

    #[test]
    fn display_is_the_bare_message() {
        let err = AppError::runtime("Could not reach backend");
        assert_eq!(err.to_string(), "Could not reach backend");
        assert_eq!(format!("{err:?}"), r#"AppError { exit_code: 4, message: "Could not reach backend" }"#);
    }
}
