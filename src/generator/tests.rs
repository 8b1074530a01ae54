use super::*;
use crate::logging::{LogLevel, MemoryLogger};
use std::fs;
use tempfile::TempDir;

fn generator_with_logger(mode: WriteMode) -> (SpecificationGenerator, Arc<MemoryLogger>) {
    let logger = Arc::new(MemoryLogger::new());
    let generator = SpecificationGenerator::new(
        SpecificationWriter::new(mode),
        Arc::clone(&logger) as Arc<dyn Logger>,
    );
    (generator, logger)
}

fn output_dir(temp_dir: &TempDir) -> String {
    temp_dir.path().join("specs").to_string_lossy().into_owned()
}

#[test]
fn dashboard_requirements_produce_a_file() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    let (generator, logger) = generator_with_logger(WriteMode::Overwrite);

    let generated = generator
        .generate_specification("User needs a dashboard for metrics", &output_dir(&temp_dir))
        .expect("generation succeeds");

    assert_eq!(
        generated.result.filename().as_str(),
        "spec_user_needs_dashboard.json"
    );
    assert_eq!(generated.path, temp_dir.path().join("specs/spec_user_needs_dashboard.json"));

    let written = fs::read_to_string(&generated.path).expect("file is readable");
    let content: SpecificationContent = serde_json::from_str(&written).expect("valid JSON");
    assert_eq!(&content, generated.result.content());
    assert!(content.components.contains(&"frontend/dashboard".to_string()));
    assert!(content.components.contains(&"backend/metrics-service".to_string()));

    let infos = logger.messages_at(LogLevel::Info);
    assert_eq!(infos.len(), 2);
    assert!(infos[1].contains(generated.result.id().as_str()));
    assert!(logger.messages_at(LogLevel::Error).is_empty());
}

#[test]
fn empty_requirements_fail_without_touching_disk() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    let (generator, logger) = generator_with_logger(WriteMode::Overwrite);

    let error = generator
        .generate_specification("", &output_dir(&temp_dir))
        .expect_err("empty input is rejected");

    assert_eq!(error.kind(), GenerationErrorKind::InvalidInput);
    assert!(error.to_string().contains(validation::EMPTY_REQUIREMENTS_ERROR));
    assert!(!temp_dir.path().join("specs").exists());
    assert_eq!(logger.messages_at(LogLevel::Error).len(), 1);
}

#[test]
fn symbol_only_requirements_are_invalid_after_normalization() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    let (generator, _logger) = generator_with_logger(WriteMode::Overwrite);

    let error = generator
        .generate_specification("@#$%^&*", &output_dir(&temp_dir))
        .expect_err("symbols only is rejected");

    assert_eq!(error.kind(), GenerationErrorKind::InvalidInput);
    assert!(!temp_dir.path().join("specs").exists());
}

#[test]
fn traversal_output_directory_is_unsafe() {
    let (generator, logger) = generator_with_logger(WriteMode::Overwrite);

    let error = generator
        .generate_specification("User needs a dashboard for metrics", "../../etc")
        .expect_err("traversal is rejected");

    assert_eq!(error.kind(), GenerationErrorKind::UnsafePath);
    assert!(error.to_string().contains("../../etc"));
    assert_eq!(logger.messages_at(LogLevel::Error).len(), 1);
}

#[test]
fn write_failures_become_persistence_failures() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    let blocker = temp_dir.path().join("blocker");
    fs::write(&blocker, "file in the way").expect("create blocking file");
    let (generator, _logger) = generator_with_logger(WriteMode::Overwrite);

    let error = generator
        .generate_specification(
            "Export quarterly reports",
            &blocker.join("specs").to_string_lossy(),
        )
        .expect_err("cannot write beneath a file");

    assert_eq!(error.kind(), GenerationErrorKind::PersistenceFailure);
}

#[test]
fn identical_requirements_overwrite_by_default() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    let (generator, _logger) = generator_with_logger(WriteMode::Overwrite);
    let dir = output_dir(&temp_dir);

    let first = generator
        .generate_specification("Export quarterly reports", &dir)
        .expect("first generation succeeds");
    let second = generator
        .generate_specification("Export quarterly reports", &dir)
        .expect("second generation succeeds");

    assert_eq!(first.path, second.path);
    assert_eq!(first.result.id(), second.result.id());
    let written = fs::read_to_string(&second.path).expect("file is readable");
    assert!(written.contains(&second.result.content().created_at));
}

#[test]
fn fail_if_exists_mode_reports_persistence_failure() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    let (generator, _logger) = generator_with_logger(WriteMode::FailIfExists);
    let dir = output_dir(&temp_dir);

    generator
        .generate_specification("Export quarterly reports", &dir)
        .expect("first generation succeeds");
    let error = generator
        .generate_specification("Export quarterly reports", &dir)
        .expect_err("second generation is refused");

    assert_eq!(error.kind(), GenerationErrorKind::PersistenceFailure);
    assert!(error.to_string().contains("already exists"));
}

#[test]
fn prepare_does_not_write() {
    let (generator, logger) = generator_with_logger(WriteMode::Overwrite);

    let prepared = generator
        .prepare("  Build an API for metrics!  ")
        .expect("preparation succeeds");

    assert_eq!(prepared.normalized.as_str(), "Build an API for metrics");
    assert!(prepared.json.contains("api/gateway"));
    assert!(logger.entries().is_empty());
}

#[test]
fn stages_are_ordered() {
    assert!(GenerationStage::Received < GenerationStage::Validated);
    assert!(GenerationStage::PathChecked < GenerationStage::Persisted);
    assert!(GenerationStage::Persisted < GenerationStage::Completed);
}

#[tokio::test]
async fn budgeted_generation_succeeds_within_budget() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    let (generator, _logger) = generator_with_logger(WriteMode::Overwrite);

    let generated = Arc::new(generator)
        .generate_with_budget(
            "User needs a dashboard for metrics".to_string(),
            output_dir(&temp_dir),
            Duration::from_secs(10),
        )
        .await
        .expect("generation succeeds");

    assert!(generated.path.exists());
}

#[tokio::test]
async fn budgeted_generation_passes_domain_errors_through() {
    let (generator, _logger) = generator_with_logger(WriteMode::Overwrite);

    let error = Arc::new(generator)
        .generate_with_budget(
            "   ".to_string(),
            "specs".to_string(),
            Duration::from_secs(10),
        )
        .await
        .expect_err("blank input is rejected");

    assert_eq!(error.kind(), GenerationErrorKind::InvalidInput);
}

#[tokio::test]
async fn exhausted_budget_reports_timed_out() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    let (generator, logger) = generator_with_logger(WriteMode::Overwrite);

    let error = Arc::new(generator)
        .generate_with_budget(
            "User needs a dashboard for metrics".to_string(),
            output_dir(&temp_dir),
            Duration::ZERO,
        )
        .await
        .expect_err("a zero budget cannot be met");

    assert_eq!(error.kind(), GenerationErrorKind::TimedOut);
    assert_eq!(error, GenerationError::TimedOut(Duration::ZERO));
    assert!(
        logger
            .messages_at(LogLevel::Error)
            .contains(&"Generation timed out after 0ms".to_string())
    );
}

#[tokio::test]
async fn concurrent_identical_requests_both_succeed() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    let (generator, _logger) = generator_with_logger(WriteMode::Overwrite);
    let generator = Arc::new(generator);
    let dir = output_dir(&temp_dir);

    let first = Arc::clone(&generator).generate_with_budget(
        "Export quarterly reports".to_string(),
        dir.clone(),
        Duration::from_secs(10),
    );
    let second = Arc::clone(&generator).generate_with_budget(
        "Export quarterly reports".to_string(),
        dir,
        Duration::from_secs(10),
    );
    let (first, second) = tokio::join!(first, second);

    let first = first.expect("first succeeds");
    let second = second.expect("second succeeds");
    assert_eq!(first.path, second.path);

    let written = fs::read_to_string(&first.path).expect("file is readable");
    let content: SpecificationContent = serde_json::from_str(&written).expect("complete JSON");
    assert!(
        content.created_at == first.result.content().created_at
            || content.created_at == second.result.content().created_at
    );
}

#[test]
fn error_kinds_display_as_snake_case() {
    assert_eq!(GenerationErrorKind::UnsafePath.to_string(), "unsafe_path");
    let error = GenerationError::TimedOut(Duration::from_millis(250));
    assert_eq!(error.to_string(), "Generation timed out after 250ms");
    assert_eq!(error.kind(), GenerationErrorKind::TimedOut);
}
