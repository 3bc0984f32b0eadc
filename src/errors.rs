//! Unified error handling.
//!
//! Error variants are generated by a macro so every variant carries a
//! stable code and a type name alongside its message.

use std::fmt;

/// Defines the error enum plus:
/// - code() - stable error code
/// - error_type() - human readable type name
/// - message() - error detail
/// - snake_case convenience constructors
macro_rules! define_essaysystem_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum EssaySystemError {
            $($variant(String),)*
        }

        impl EssaySystemError {
            pub fn code(&self) -> &'static str {
                match self {
                    $(EssaySystemError::$variant(_) => $code,)*
                }
            }

            pub fn error_type(&self) -> &'static str {
                match self {
                    $(EssaySystemError::$variant(_) => $type_name,)*
                }
            }

            pub fn message(&self) -> &str {
                match self {
                    $(EssaySystemError::$variant(msg) => msg,)*
                }
            }
        }

        paste::paste! {
            impl EssaySystemError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        EssaySystemError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_essaysystem_errors! {
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    DatabaseOperation("E003", "Database Operation Error"),
    FileOperation("E004", "File Operation Error"),
    Validation("E005", "Validation Error"),
    NotFound("E006", "Resource Not Found"),
    Serialization("E007", "Serialization Error"),
    DateParse("E008", "Date Parse Error"),
    Authentication("E009", "Authentication Error"),
    Authorization("E010", "Authorization Error"),
    CacheConnection("E011", "Cache Connection Error"),
    CachePluginNotFound("E012", "Cache Plugin Not Found"),
    Configuration("E013", "Configuration Error"),
    OcrService("E014", "OCR Service Error"),
    OcrEmptyResult("E015", "OCR Empty Result"),
    AiService("E016", "AI Service Error"),
    InvalidAiResponse("E017", "Invalid AI Response"),
    TranscriptionTooShort("E018", "Transcription Too Short"),
    PreconditionFailed("E019", "Precondition Failed"),
}

impl EssaySystemError {
    /// Colored output for development builds.
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for EssaySystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for EssaySystemError {}

impl From<sea_orm::DbErr> for EssaySystemError {
    fn from(err: sea_orm::DbErr) -> Self {
        EssaySystemError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for EssaySystemError {
    fn from(err: std::io::Error) -> Self {
        EssaySystemError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for EssaySystemError {
    fn from(err: serde_json::Error) -> Self {
        EssaySystemError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for EssaySystemError {
    fn from(err: chrono::ParseError) -> Self {
        EssaySystemError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EssaySystemError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(EssaySystemError::database_config("test").code(), "E001");
        assert_eq!(EssaySystemError::validation("test").code(), "E005");
        assert_eq!(EssaySystemError::ocr_empty_result("test").code(), "E015");
        assert_eq!(EssaySystemError::invalid_ai_response("test").code(), "E017");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            EssaySystemError::ocr_service("test").error_type(),
            "OCR Service Error"
        );
        assert_eq!(
            EssaySystemError::transcription_too_short("test").error_type(),
            "Transcription Too Short"
        );
    }

    #[test]
    fn test_error_message() {
        let err = EssaySystemError::invalid_ai_response("missing competency_3");
        assert_eq!(err.message(), "missing competency_3");
    }

    #[test]
    fn test_format_simple() {
        let err = EssaySystemError::precondition_failed("essay not transcribed");
        let formatted = err.format_simple();
        assert!(formatted.contains("Precondition Failed"));
        assert!(formatted.contains("essay not transcribed"));
    }
}
