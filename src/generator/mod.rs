//! Specification generation pipeline
//!
//! A request moves through validation, normalization, formatting, output
//! path checks and persistence in a fixed order. Any step can end the request
//! with a [`GenerationError`]; nothing here panics or leaks an internal error
//! to the caller.

pub mod formatter;
pub mod identifier;
pub mod normalize;
pub mod validation;
pub mod writer;

#[cfg(test)]
mod tests;

pub use formatter::{SpecificationContent, SpecificationResult};
pub use identifier::{SpecificationFilename, SpecificationId};
pub use normalize::NormalizedText;
pub use validation::{SecurePath, ValidationResult, validate_path_security, validate_requirements};
pub use writer::{SpecificationWriter, WriteError, WriteMode};

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::logging::Logger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationErrorKind {
    InvalidInput,
    UnsafePath,
    PersistenceFailure,
    TimedOut,
}

impl fmt::Display for GenerationErrorKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput => write!(f, "invalid_input"),
            Self::UnsafePath => write!(f, "unsafe_path"),
            Self::PersistenceFailure => write!(f, "persistence_failure"),
            Self::TimedOut => write!(f, "timed_out"),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Unsafe output path: {0}")]
    UnsafePath(String),
    #[error("Failed to persist specification: {0}")]
    PersistenceFailure(String),
    #[error("Generation timed out after {}ms", .0.as_millis())]
    TimedOut(Duration),
}

impl GenerationError {
    #[inline]
    pub fn kind(&self) -> GenerationErrorKind {
        match self {
            Self::InvalidInput(_) => GenerationErrorKind::InvalidInput,
            Self::UnsafePath(_) => GenerationErrorKind::UnsafePath,
            Self::PersistenceFailure(_) => GenerationErrorKind::PersistenceFailure,
            Self::TimedOut(_) => GenerationErrorKind::TimedOut,
        }
    }
}

/// Where a request is in the pipeline. Stages only ever move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum GenerationStage {
    Received,
    Validated,
    Normalized,
    Formatted,
    PathChecked,
    Persisted,
    Completed,
}

/// A successful generation and where it landed on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedSpecification {
    pub result: SpecificationResult,
    pub path: PathBuf,
}

/// Everything a request produces before anything is written
#[derive(Debug, Clone)]
pub struct PreparedSpecification {
    pub normalized: NormalizedText,
    pub result: SpecificationResult,
    pub json: String,
}

pub struct SpecificationGenerator {
    writer: SpecificationWriter,
    logger: Arc<dyn Logger>,
}

impl fmt::Debug for SpecificationGenerator {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecificationGenerator")
            .field("writer", &self.writer)
            .finish_non_exhaustive()
    }
}

impl SpecificationGenerator {
    #[inline]
    pub fn new(writer: SpecificationWriter, logger: Arc<dyn Logger>) -> Self {
        Self { writer, logger }
    }

    #[inline]
    pub fn writer(&self) -> &SpecificationWriter {
        &self.writer
    }

    /// Validate, normalize and format without touching the filesystem.
    ///
    /// Emptiness is checked on the raw text and again after normalization, so
    /// input made only of stripped characters is rejected too.
    #[inline]
    pub fn prepare(
        &self,
        requirements_text: &str,
    ) -> Result<PreparedSpecification, GenerationError> {
        let mut stage = GenerationStage::Received;

        let validation = validate_requirements(requirements_text);
        if !validation.is_valid() {
            let error = GenerationError::InvalidInput(validation.error_summary());
            return Err(self.fail(stage, error));
        }
        stage = advance(stage, GenerationStage::Validated);

        let normalized = normalize::normalize(requirements_text);
        let validation = validate_requirements(normalized.as_str());
        if !validation.is_valid() {
            let error = GenerationError::InvalidInput(validation.error_summary());
            return Err(self.fail(stage, error));
        }
        stage = advance(stage, GenerationStage::Normalized);

        let result = SpecificationResult::new(
            identifier::derive_id(&normalized),
            formatter::format(&normalized),
            identifier::derive_filename(&normalized),
        );
        let json = result.content().to_json().map_err(|e| {
            let message = format!("could not serialize specification: {}", e);
            self.fail(stage, GenerationError::PersistenceFailure(message))
        })?;
        advance(stage, GenerationStage::Formatted);

        Ok(PreparedSpecification {
            normalized,
            result,
            json,
        })
    }

    /// Run the full pipeline and write `<output_directory>/<filename>`
    #[inline]
    pub fn generate_specification(
        &self,
        requirements_text: &str,
        output_directory: &str,
    ) -> Result<GeneratedSpecification, GenerationError> {
        self.logger.info(&format!(
            "Generating specification into {} ({} characters of requirements)",
            output_directory,
            requirements_text.chars().count()
        ));

        let prepared = self.prepare(requirements_text)?;
        let mut stage = GenerationStage::Formatted;

        let directory = SecurePath::new(output_directory);
        if !directory.is_safe() {
            return Err(self.fail(
                stage,
                GenerationError::UnsafePath(format!(
                    "{} ({})",
                    output_directory,
                    directory.errors().join("; ")
                )),
            ));
        }
        for warning in directory.warnings() {
            self.logger.warning(warning);
        }
        stage = advance(stage, GenerationStage::PathChecked);

        let filename = prepared.result.filename().as_str();
        let path = self
            .writer
            .write(&prepared.json, &directory, filename)
            .map_err(|e| self.fail(stage, GenerationError::PersistenceFailure(e.to_string())))?;
        stage = advance(stage, GenerationStage::Persisted);

        self.logger.info(&format!(
            "Specification {} written to {}",
            prepared.result.id(),
            path.display()
        ));
        advance(stage, GenerationStage::Completed);

        Ok(GeneratedSpecification {
            result: prepared.result,
            path,
        })
    }

    /// Run [`Self::generate_specification`] on the blocking pool under a
    /// wall-clock budget.
    ///
    /// On timeout the caller gets [`GenerationError::TimedOut`] but the
    /// pipeline keeps running, so a write that already started still finishes.
    #[inline]
    pub async fn generate_with_budget(
        self: Arc<Self>,
        requirements_text: String,
        output_directory: String,
        budget: Duration,
    ) -> Result<GeneratedSpecification, GenerationError> {
        let logger = Arc::clone(&self.logger);
        let task = tokio::task::spawn_blocking(move || {
            self.generate_specification(&requirements_text, &output_directory)
        });

        match tokio::time::timeout(budget, task).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(join_error)) => {
                let error = GenerationError::PersistenceFailure(format!(
                    "generation task did not complete: {}",
                    join_error
                ));
                logger.error(&error.to_string());
                Err(error)
            }
            Err(_) => {
                let error = GenerationError::TimedOut(budget);
                logger.error(&error.to_string());
                Err(error)
            }
        }
    }

    fn fail(&self, stage: GenerationStage, error: GenerationError) -> GenerationError {
        self.logger.error(&format!(
            "Generation failed after {:?} [{}]: {}",
            stage,
            error.kind(),
            error
        ));
        error
    }
}

fn advance(from: GenerationStage, to: GenerationStage) -> GenerationStage {
    debug_assert!(from < to, "pipeline stages only move forward");
    debug!("Generation stage {:?} -> {:?}", from, to);
    to
}
