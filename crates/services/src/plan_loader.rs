use std::path::Path;

use reading_core::model::{Plan, PlanDocument};

use crate::error::PlanLoadError;

/// Parse and validate a JSON plan document.
///
/// # Errors
///
/// Returns `PlanLoadError::Format` for malformed JSON and
/// `PlanLoadError::Plan` for structurally invalid plans.
pub fn parse_plan(json: &str) -> Result<Plan, PlanLoadError> {
    let document: PlanDocument = serde_json::from_str(json)?;
    Ok(document.into_plan()?)
}

/// Read a plan document from disk.
///
/// # Errors
///
/// Returns `PlanLoadError::Io` if the file cannot be read, otherwise the
/// errors of [`parse_plan`].
pub fn load_plan_file(path: &Path) -> Result<Plan, PlanLoadError> {
    let json = std::fs::read_to_string(path).map_err(|source| PlanLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let plan = parse_plan(&json)?;
    tracing::info!(path = %path.display(), months = plan.len(), "loaded reading plan");
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reading_core::model::{MonthId, PlanError};
    use std::io::Write;

    const PLAN: &str = r#"{
        "months": [
            {"id": "jan", "name": "Janeiro", "readings": {"1": "Gn 1-3", "2": "Gn 4-7"}},
            {"id": "fev", "name": "Fevereiro", "readings": {"1": "Êx 1-4"}, "chapterCounts": {"1": 4}}
        ]
    }"#;

    #[test]
    fn parses_plan_in_document_order() {
        let plan = parse_plan(PLAN).unwrap();
        let ids: Vec<&str> = plan.months().iter().map(|m| m.id().as_str()).collect();
        assert_eq!(ids, vec!["jan", "fev"]);
    }

    #[test]
    fn rejects_malformed_json() {
        let err = parse_plan("{\"months\": [").unwrap_err();
        assert!(matches!(err, PlanLoadError::Format(_)));
    }

    #[test]
    fn rejects_invalid_plan() {
        let json = r#"{"months": [
            {"id": "jan", "name": "Janeiro", "readings": {}},
            {"id": "jan", "name": "Again", "readings": {}}
        ]}"#;
        let err = parse_plan(json).unwrap_err();
        assert!(matches!(
            err,
            PlanLoadError::Plan(PlanError::DuplicateMonthId(ref id)) if *id == MonthId::new("jan")
        ));
    }

    #[test]
    fn loads_plan_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(PLAN.as_bytes()).unwrap();

        let plan = load_plan_file(file.path()).unwrap();
        assert_eq!(plan.len(), 2);
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let err = load_plan_file(&path).unwrap_err();
        match err {
            PlanLoadError::Io { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other}"),
        }
    }
}
