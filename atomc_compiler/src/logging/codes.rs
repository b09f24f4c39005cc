//! Error and success codes with their classification metadata
//!
//! Single source of truth for every code the front end logs. Each stage has
//! its own module of [`Code`] constants; the registry maps a code string to
//! its [`ErrorMetadata`].

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Critical" => Some(Severity::Critical),
            "High" => Some(Severity::High),
            "Medium" => Some(Severity::Medium),
            "Low" => Some(Severity::Low),
            _ => None,
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub const fn new(
        code: Code,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code: code.0,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
    pub const CONFIGURATION_ERROR: Code = Code::new("ERR003");
}

/// File processing error codes
pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const TOO_MANY_LINES: Code = Code::new("E008");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
}

/// Lexical analysis error codes
pub mod lexical {
    use super::Code;

    pub const INVALID_CHARACTER: Code = Code::new("E020");
    pub const UNTERMINATED_STRING: Code = Code::new("E021");
    pub const MALFORMED_NUMBER: Code = Code::new("E022");
    pub const IDENTIFIER_TOO_LONG: Code = Code::new("E023");
    pub const STRING_TOO_LARGE: Code = Code::new("E024");
    pub const INVALID_CHAR_LITERAL: Code = Code::new("E025");
    pub const INVALID_ESCAPE: Code = Code::new("E026");
    pub const TOO_MANY_TOKENS: Code = Code::new("E027");
    pub const UNTERMINATED_COMMENT: Code = Code::new("E028");
    pub const INCOMPLETE_OPERATOR: Code = Code::new("E029");
}

/// Syntax analysis error codes
pub mod syntax {
    use super::Code;

    /// A committed rule is missing a required token
    pub const EXPECTED_TOKEN: Code = Code::new("E040");
    /// The unit rule did not match
    pub const TOP_LEVEL_ERROR: Code = Code::new("E041");
    pub const MAX_RECURSION_DEPTH: Code = Code::new("E042");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const PIPELINE_COMPLETE: Code = Code::new("I001");
    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const PARSE_COMPLETE: Code = Code::new("I040");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

const REGISTERED: &[ErrorMetadata] = &[
    // System
    ErrorMetadata::new(
        system::INTERNAL_ERROR,
        "System",
        Severity::Critical,
        false,
        true,
        "Critical internal error",
        "File a bug report with the input that triggered it",
    ),
    ErrorMetadata::new(
        system::INITIALIZATION_FAILURE,
        "System",
        Severity::Critical,
        false,
        true,
        "Front end initialization failure",
        "Check logging configuration and code registry",
    ),
    ErrorMetadata::new(
        system::CONFIGURATION_ERROR,
        "System",
        Severity::High,
        false,
        true,
        "Runtime configuration could not be loaded",
        "Check the configuration file path and TOML syntax",
    ),
    // File processing
    ErrorMetadata::new(
        file_processing::FILE_NOT_FOUND,
        "FileProcessing",
        Severity::Medium,
        false,
        true,
        "Source file not found",
        "Check the file path",
    ),
    ErrorMetadata::new(
        file_processing::INVALID_EXTENSION,
        "FileProcessing",
        Severity::Medium,
        false,
        true,
        "Source file does not have a .c or .atomc extension",
        "Rename the file or disable the extension requirement",
    ),
    ErrorMetadata::new(
        file_processing::FILE_TOO_LARGE,
        "FileProcessing",
        Severity::High,
        false,
        true,
        "Source file exceeds the maximum size",
        "Split the program or raise the configured limit",
    ),
    ErrorMetadata::new(
        file_processing::TOO_MANY_LINES,
        "FileProcessing",
        Severity::High,
        false,
        true,
        "Source file exceeds the maximum line count",
        "Split the program or raise the configured limit",
    ),
    ErrorMetadata::new(
        file_processing::PERMISSION_DENIED,
        "FileProcessing",
        Severity::Medium,
        false,
        true,
        "Permission denied reading source file",
        "Check file permissions",
    ),
    ErrorMetadata::new(
        file_processing::IO_ERROR,
        "FileProcessing",
        Severity::High,
        false,
        true,
        "I/O error reading source file",
        "Check the file system and retry",
    ),
    ErrorMetadata::new(
        file_processing::INVALID_PATH,
        "FileProcessing",
        Severity::Medium,
        false,
        true,
        "Path is not a regular file",
        "Pass the path of a source file",
    ),
    // Lexical
    ErrorMetadata::new(
        lexical::INVALID_CHARACTER,
        "Lexical",
        Severity::High,
        false,
        true,
        "Byte that cannot start any token",
        "Remove the character or move it into a literal or comment",
    ),
    ErrorMetadata::new(
        lexical::UNTERMINATED_STRING,
        "Lexical",
        Severity::High,
        false,
        true,
        "String literal not closed on its line",
        "Add the closing double quote",
    ),
    ErrorMetadata::new(
        lexical::MALFORMED_NUMBER,
        "Lexical",
        Severity::High,
        false,
        true,
        "Numeric literal with missing digits or out of range",
        "Check hex prefixes, fractions and exponents",
    ),
    ErrorMetadata::new(
        lexical::IDENTIFIER_TOO_LONG,
        "Lexical",
        Severity::Medium,
        false,
        true,
        "Identifier exceeds the maximum length",
        "Use a shorter name",
    ),
    ErrorMetadata::new(
        lexical::STRING_TOO_LARGE,
        "Lexical",
        Severity::Medium,
        false,
        true,
        "String literal exceeds the maximum size",
        "Shorten the literal",
    ),
    ErrorMetadata::new(
        lexical::INVALID_CHAR_LITERAL,
        "Lexical",
        Severity::High,
        false,
        true,
        "Character literal must hold exactly one byte or escape",
        "Check the quotes around the character",
    ),
    ErrorMetadata::new(
        lexical::INVALID_ESCAPE,
        "Lexical",
        Severity::High,
        false,
        true,
        "Escape sequence outside the supported set",
        "Use one of \\a \\b \\t \\n \\v \\f \\r \\0 \\? \\\" \\' \\\\",
    ),
    ErrorMetadata::new(
        lexical::TOO_MANY_TOKENS,
        "Lexical",
        Severity::High,
        false,
        true,
        "Token count exceeds the maximum",
        "Split the program or raise the configured limit",
    ),
    ErrorMetadata::new(
        lexical::UNTERMINATED_COMMENT,
        "Lexical",
        Severity::High,
        false,
        true,
        "Block comment not closed before end of input",
        "Add the closing */",
    ),
    ErrorMetadata::new(
        lexical::INCOMPLETE_OPERATOR,
        "Lexical",
        Severity::High,
        false,
        true,
        "Single & or | outside a logical operator",
        "Use && or ||",
    ),
    // Syntax
    ErrorMetadata::new(
        syntax::EXPECTED_TOKEN,
        "Syntax",
        Severity::High,
        false,
        true,
        "A construct is missing a required token",
        "Fix the construct at the reported line",
    ),
    ErrorMetadata::new(
        syntax::TOP_LEVEL_ERROR,
        "Syntax",
        Severity::High,
        false,
        true,
        "Only struct, function and variable declarations are allowed at top level",
        "Move statements into a function body",
    ),
    ErrorMetadata::new(
        syntax::MAX_RECURSION_DEPTH,
        "Syntax",
        Severity::High,
        false,
        true,
        "Nesting exceeds the maximum parse depth",
        "Reduce nesting or raise the configured limit",
    ),
    // Success
    ErrorMetadata::new(
        success::PIPELINE_COMPLETE,
        "Pipeline",
        Severity::Low,
        true,
        false,
        "All front end stages completed",
        "None",
    ),
    ErrorMetadata::new(
        success::SYSTEM_INITIALIZATION_COMPLETED,
        "System",
        Severity::Low,
        true,
        false,
        "Front end initialized",
        "None",
    ),
    ErrorMetadata::new(
        success::FILE_PROCESSING_SUCCESS,
        "FileProcessing",
        Severity::Low,
        true,
        false,
        "Source file loaded",
        "Continue to lexical analysis",
    ),
    ErrorMetadata::new(
        success::TOKENIZATION_COMPLETE,
        "Lexical",
        Severity::Low,
        true,
        false,
        "Tokenization completed",
        "Continue to syntax analysis",
    ),
    ErrorMetadata::new(
        success::PARSE_COMPLETE,
        "Syntax",
        Severity::Low,
        true,
        false,
        "Compilation unit recognized",
        "None",
    ),
];

/// Registry keyed by code string
static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        REGISTERED
            .iter()
            .map(|metadata| (metadata.code, metadata.clone()))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get error metadata for a specific code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get error severity from code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Get human-readable description for code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for code
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get category from code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

/// Success codes start with `I`
pub fn is_success_code(code: &str) -> bool {
    code.starts_with('I')
}

/// Verify that each code has registry metadata, naming the first one missing
pub fn ensure_registered(codes: &[Code]) -> Result<(), String> {
    match codes.iter().find(|code| get_error_metadata(code.as_str()).is_none()) {
        Some(code) => Err(format!("Code {} has no registry entry", code)),
        None => Ok(()),
    }
}
