//! Results file writer.
//!
//! The results file is a single JSON object (company → founder names),
//! pretty-printed with two-space indentation and written once per run.

use std::path::Path;

use tracing::{info, instrument};

use founderlens_shared::{FounderLensError, Result, ResultMapping};

/// Render the results as pretty-printed JSON (no trailing newline).
pub fn render_results(results: &ResultMapping) -> Result<String> {
    serde_json::to_string_pretty(results)
        .map_err(|e| FounderLensError::validation(format!("failed to serialize results: {e}")))
}

/// Write the results file, creating parent directories as needed.
#[instrument(skip_all, fields(path = %path.display(), companies = results.len()))]
pub fn write_results(path: &Path, results: &ResultMapping) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| FounderLensError::io(parent, e))?;
    }

    let json = render_results(results)?;
    std::fs::write(path, json).map_err(|e| FounderLensError::io(path, e))?;

    info!("wrote results file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn render_uses_two_space_indent() {
        let mut results = ResultMapping::new();
        results.insert(
            "Airbnb".into(),
            vec!["Brian Chesky".into(), "Joe Gebbia".into()],
        );
        results.insert("Stealth".into(), vec![]);

        let json = render_results(&results).unwrap();
        assert_eq!(
            json,
            "{\n  \"Airbnb\": [\n    \"Brian Chesky\",\n    \"Joe Gebbia\"\n  ],\n  \"Stealth\": []\n}"
        );
    }

    #[test]
    fn render_empty_mapping() {
        assert_eq!(render_results(&ResultMapping::new()).unwrap(), "{}");
    }

    #[test]
    fn write_creates_parent_dirs() {
        let tmp_dir = std::env::temp_dir().join(format!("fl-output-test-{}", Uuid::now_v7()));
        let path = tmp_dir.join("nested").join("founders.json");

        let mut results = ResultMapping::new();
        results.insert("Acme".into(), vec!["Jane Doe".into()]);
        write_results(&path, &results).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed["Acme"][0], "Jane Doe");

        let _ = std::fs::remove_dir_all(&tmp_dir);
    }
}
