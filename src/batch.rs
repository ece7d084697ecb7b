use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::{DependencyInput, DependencyKind, ProcessRequest};

/// Read a batch from `path`, or from stdin when `path` is `-`.
pub fn read_batch(path: &Path, kind: &DependencyKind) -> Result<Vec<DependencyInput>> {
    let content = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read batch from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read batch file: {}", path.display()))?
    };

    parse_batch(&content, kind)
}

/// Parse a batch.
///
/// Content starting with `{` is a JSON request `{"dependencies": [...]}`.
/// Anything else is plain text: every line that is not blank and not a `#`
/// comment becomes one item of `kind`.
pub fn parse_batch(content: &str, kind: &DependencyKind) -> Result<Vec<DependencyInput>> {
    if content.trim_start().starts_with('{') {
        let request: ProcessRequest =
            serde_json::from_str(content).context("Failed to parse JSON batch request")?;
        return Ok(request.dependencies);
    }

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| DependencyInput::new(kind.clone(), line))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ecosystem;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_plain_text_lines() {
        let content = "# runtime deps\nrequests>=2.28\n\n  flask==3.0.0  \n# end\n";
        let batch =
            parse_batch(content, &DependencyKind::ManifestEntry(Ecosystem::Python)).unwrap();
        assert_eq!(
            batch,
            vec![
                DependencyInput::new(
                    DependencyKind::ManifestEntry(Ecosystem::Python),
                    "requests>=2.28"
                ),
                DependencyInput::new(
                    DependencyKind::ManifestEntry(Ecosystem::Python),
                    "flask==3.0.0"
                ),
            ]
        );
    }

    #[test]
    fn test_json_request_keeps_item_kinds() {
        let content = r#"
            {"dependencies": [
                {"dataType": "link", "data": "https://github.com/acme/widget"},
                {"dataType": "name", "data": "left-pad"},
                {"dataType": "maven", "data": "org.acme:core:1.0"}
            ]}"#;
        let batch = parse_batch(content, &DependencyKind::Name).unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0].data_type, DependencyKind::RepositoryLink);
        assert_eq!(batch[1].data_type, DependencyKind::Name);
        assert_eq!(
            batch[2].data_type,
            DependencyKind::Unsupported("maven".to_string())
        );
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(parse_batch(r#"{"dependencies": [}"#, &DependencyKind::Name).is_err());
    }

    #[test]
    fn test_read_batch_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "https://github.com/acme/widget").unwrap();
        writeln!(file, "https://github.com/acme/gadget").unwrap();

        let batch = read_batch(file.path(), &DependencyKind::RepositoryLink).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[1].data, "https://github.com/acme/gadget");
    }

    #[test]
    fn test_missing_file() {
        let err = read_batch(Path::new("/nonexistent/batch.txt"), &DependencyKind::Name)
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/batch.txt"));
    }
}
