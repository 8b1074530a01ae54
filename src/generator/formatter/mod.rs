//! Specification document assembly
//!
//! Turns normalized requirement text into the JSON document that gets
//! persisted. Everything except `created_at` is a pure function of the
//! input text.


use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::identifier::{SpecificationFilename, SpecificationId};
use super::normalize::NormalizedText;

const DESCRIPTION_WORDS: usize = 15;
const TITLE_WORDS: usize = 6;

pub const ARCHITECTURE: &str = "hexagonal";
pub const SPECIFICATIONS_COMPONENT: &str = "ctxfy/specifications/";
pub const DASHBOARD_COMPONENTS: [&str; 2] = ["frontend/dashboard", "backend/metrics-service"];
pub const API_COMPONENT: &str = "api/gateway";

pub const INTERFACES: [&str; 2] = ["MCP tool: generate_specification", "JSON file output"];
pub const SECURITY: [&str; 2] = [
    "input sanitization of requirement text",
    "directory traversal protection on output paths",
];

pub const BASE_CRITERIA: [&str; 3] = [
    "Specification is saved as valid JSON",
    "Specification file is stored in the configured specifications directory",
    "Specification is machine-readable by downstream tooling",
];
pub const METRICS_CRITERION: &str = "Dashboard displays metrics in real time";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecificationContent {
    pub title: String,
    pub description: String,
    pub business_requirements: String,
    pub architecture: String,
    pub components: Vec<String>,
    pub interfaces: Vec<String>,
    pub security: Vec<String>,
    pub acceptance_criteria: Vec<String>,
    pub created_at: String,
}

impl SpecificationContent {
    /// Indented JSON with non-ASCII characters left as-is
    #[inline]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Build the document stamped with the current UTC time
#[inline]
pub fn format(normalized: &NormalizedText) -> SpecificationContent {
    format_at(normalized, Utc::now())
}

#[inline]
pub fn format_at(normalized: &NormalizedText, created_at: DateTime<Utc>) -> SpecificationContent {
    let lowered = normalized.as_str().to_lowercase();

    SpecificationContent {
        title: title(normalized),
        description: description(normalized),
        business_requirements: normalized.as_str().to_string(),
        architecture: ARCHITECTURE.to_string(),
        components: components(&lowered),
        interfaces: INTERFACES.iter().map(ToString::to_string).collect(),
        security: SECURITY.iter().map(ToString::to_string).collect(),
        acceptance_criteria: acceptance_criteria(&lowered),
        created_at: created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
    }
}

fn title(normalized: &NormalizedText) -> String {
    let words: Vec<&str> = normalized.words().take(TITLE_WORDS).collect();
    if words.is_empty() {
        "Specification".to_string()
    } else {
        format!("Specification: {}", words.join(" "))
    }
}

fn description(normalized: &NormalizedText) -> String {
    let words: Vec<&str> = normalized.words().collect();
    if words.len() > DESCRIPTION_WORDS {
        format!("{}...", words[..DESCRIPTION_WORDS].join(" "))
    } else {
        words.join(" ")
    }
}

fn components(lowered: &str) -> Vec<String> {
    let mut components = vec![SPECIFICATIONS_COMPONENT.to_string()];

    if lowered.contains("dashboard") {
        components.extend(DASHBOARD_COMPONENTS.iter().map(ToString::to_string));
    }

    if lowered.contains("api") || lowered.contains("interface") {
        components.push(API_COMPONENT.to_string());
    }

    components
}

fn acceptance_criteria(lowered: &str) -> Vec<String> {
    let mut criteria: Vec<String> = BASE_CRITERIA.iter().map(ToString::to_string).collect();

    if lowered.contains("metrics") || lowered.contains("métricas") || lowered.contains("metricas")
    {
        criteria.push(METRICS_CRITERION.to_string());
    }

    criteria
}

/// The immutable outcome of one generation.
///
/// The `with_*` methods return a modified copy and leave `self` untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecificationResult {
    id: SpecificationId,
    content: SpecificationContent,
    filename: SpecificationFilename,
}

impl SpecificationResult {
    #[inline]
    pub fn new(
        id: SpecificationId,
        content: SpecificationContent,
        filename: SpecificationFilename,
    ) -> Self {
        Self {
            id,
            content,
            filename,
        }
    }

    #[inline]
    pub fn id(&self) -> &SpecificationId {
        &self.id
    }

    #[inline]
    pub fn content(&self) -> &SpecificationContent {
        &self.content
    }

    #[inline]
    pub fn filename(&self) -> &SpecificationFilename {
        &self.filename
    }

    #[inline]
    #[must_use]
    pub fn with_id(&self, id: SpecificationId) -> Self {
        Self {
            id,
            ..self.clone()
        }
    }

    #[inline]
    #[must_use]
    pub fn with_content(&self, content: SpecificationContent) -> Self {
        Self {
            content,
            ..self.clone()
        }
    }

    #[inline]
    #[must_use]
    pub fn with_filename(&self, filename: SpecificationFilename) -> Self {
        Self {
            filename,
            ..self.clone()
        }
    }
}
