//! Requirement and output-path validation
//!
//! Both validators are pure: they never touch the filesystem and never fail,
//! they only describe what is wrong with their input.


use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Error reported for requirement text that is empty after trimming
pub const EMPTY_REQUIREMENTS_ERROR: &str = "requirements cannot be empty or invalid";

/// Outcome of a validation step.
///
/// `is_valid` is derived from `errors` on construction, so a result can never
/// carry errors while claiming to be valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawValidationResult")]
pub struct ValidationResult {
    is_valid: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
}

/// Wire shape of [`ValidationResult`]; any incoming `is_valid` is ignored
#[derive(Deserialize)]
struct RawValidationResult {
    #[serde(default)]
    errors: Vec<String>,
    #[serde(default)]
    warnings: Vec<String>,
}

impl From<RawValidationResult> for ValidationResult {
    #[inline]
    fn from(raw: RawValidationResult) -> Self {
        Self::new(raw.errors, raw.warnings)
    }
}

impl ValidationResult {
    #[inline]
    pub fn new(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    #[inline]
    pub fn valid() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    #[inline]
    pub fn invalid(error: impl Into<String>) -> Self {
        Self::new(vec![error.into()], Vec::new())
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    #[inline]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    #[inline]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// All errors joined into a single human-readable line
    #[inline]
    pub fn error_summary(&self) -> String {
        self.errors.join("; ")
    }
}

/// Reject requirement text that is empty or whitespace-only
#[inline]
pub fn validate_requirements(text: &str) -> ValidationResult {
    if text.trim().is_empty() {
        ValidationResult::invalid(EMPTY_REQUIREMENTS_ERROR)
    } else {
        ValidationResult::valid()
    }
}

/// Check an output directory for traversal and unexpected normalization.
///
/// Symlinks and permissions are not inspected; the writer reports those as
/// persistence failures.
#[inline]
pub fn validate_path_security(path: &str) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if path.trim().is_empty() {
        errors.push("output path cannot be empty".to_string());
        return ValidationResult::new(errors, warnings);
    }

    if path.contains("../") || path.contains("..\\") || has_parent_component(path) {
        errors.push(format!("directory traversal detected in path: {}", path));
    }

    let normalized = lexical_normalize(path);
    if normalized.as_os_str() != comparable_form(path) {
        errors.push(format!(
            "path normalizes unexpectedly: {} -> {}",
            path,
            normalized.display()
        ));
    }

    if Path::new(path).is_absolute() {
        warnings.push(format!("absolute output path: {}", path));
    }

    ValidationResult::new(errors, warnings)
}

/// An output directory that has been through [`validate_path_security`].
///
/// Built once per request and handed straight to the writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurePath {
    raw: String,
    sanitized: PathBuf,
    is_safe: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl SecurePath {
    #[inline]
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let validation = validate_path_security(&raw);
        Self {
            sanitized: lexical_normalize(&raw),
            is_safe: validation.is_valid(),
            errors: validation.errors,
            warnings: validation.warnings,
            raw,
        }
    }

    #[inline]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[inline]
    pub fn sanitized(&self) -> &Path {
        &self.sanitized
    }

    #[inline]
    pub fn is_safe(&self) -> bool {
        self.is_safe
    }

    #[inline]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    #[inline]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

fn has_parent_component(path: &str) -> bool {
    path.split(['/', '\\']).any(|segment| segment == "..")
}

/// Rebuild the path from its components, dropping `.` segments and
/// repeated separators. `..` is kept so traversal stays visible.
fn lexical_normalize(path: &str) -> PathBuf {
    let normalized: PathBuf = Path::new(path)
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect();

    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

/// The raw path as it should look once normalized: a single leading `./`
/// and trailing separators are tolerated.
fn comparable_form(path: &str) -> &str {
    let path = path
        .strip_prefix("./")
        .or_else(|| path.strip_prefix(".\\"))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(path);

    let trimmed = path.trim_end_matches(['/', '\\']);
    if trimmed.is_empty() { path } else { trimmed }
}
