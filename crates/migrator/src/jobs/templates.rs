//! JSON seed and template files under the data directory

use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::driver::{MigrateError, Result};

pub const PRODUCT_ATTRIBUTES_FILE: &str = "productAttributes.json";
pub const PRODUCT_TYPES_FILE: &str = "productTypes.json";
pub const PRODUCT_CATEGORIES_FILE: &str = "productCategories.json";
pub const DOCUMENT_TEMPLATE_FILE: &str = "documentTemplate.json";
pub const DOCUMENT_TYPE_TEMPLATE_FILE: &str = "documentTypeTemplate.json";
pub const DOCUMENT_LIST_TEMPLATE_FILE: &str = "documentListTemplate.json";

/// Read a file holding one JSON value
pub fn load_template<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).map_err(|source| MigrateError::TemplateRead {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "Loaded template");

    serde_json::from_str(&text).map_err(|source| MigrateError::TemplateParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a file holding a JSON array of items
pub fn load_templates<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    load_template(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::AttributeDraft;
    use tempfile::tempdir;

    #[test]
    fn reads_array_of_drafts() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(PRODUCT_ATTRIBUTES_FILE);
        fs::write(
            &path,
            r#"[{"attributeCode":"color","adminName":"Color"},{"attributeCode":"size"}]"#,
        )
        .unwrap();

        let drafts: Vec<AttributeDraft> = load_templates(&path).unwrap();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[1].attribute_code.as_deref(), Some("size"));
    }

    #[test]
    fn missing_file_is_fatal() {
        let dir = tempdir().unwrap();
        let err = load_templates::<AttributeDraft>(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, MigrateError::TemplateRead { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn malformed_json_is_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(PRODUCT_TYPES_FILE);
        fs::write(&path, "{not json").unwrap();

        let err = load_templates::<serde_json::Value>(&path).unwrap_err();
        assert!(matches!(err, MigrateError::TemplateParse { .. }));
        assert!(err.is_fatal());
    }
}
