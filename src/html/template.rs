//! Page templates
//!
//! Templates are plain HTML with `$MESSAGE$`, `$RECENTHASH$` and
//! `$GITFILELIST$` placeholders. Embedded copies are used unless a template
//! directory is configured.

use std::path::Path;

use crate::error::AppError;

pub const MESSAGE: &str = "$MESSAGE$";
pub const RECENT_HASH: &str = "$RECENTHASH$";
pub const FILE_LIST: &str = "$GITFILELIST$";

const SOURCES_FILE: &str = "load_sources.html";
const STUDIES_FILE: &str = "load_studies.html";
const SEARCH_FILE: &str = "search_studies.html";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTemplate {
    html: String,
}

impl PageTemplate {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.html
    }

    /// The message goes in last so submitted text is never expanded
    pub fn fill(&self, message: &str, recent_hash: &str, file_list: &str) -> String {
        self.html
            .replace(FILE_LIST, file_list)
            .replace(RECENT_HASH, recent_hash)
            .replace(MESSAGE, message)
    }
}

/// The three page templates
#[derive(Debug, Clone)]
pub struct Templates {
    pub sources: PageTemplate,
    pub studies: PageTemplate,
    pub search: PageTemplate,
}

impl Default for Templates {
    fn default() -> Self {
        Self {
            sources: PageTemplate::new(include_str!("../../templates/load_sources.html")),
            studies: PageTemplate::new(include_str!("../../templates/load_studies.html")),
            search: PageTemplate::new(include_str!("../../templates/search_studies.html")),
        }
    }
}

impl Templates {
    /// Read templates from `dir`, or fall back to the embedded ones
    pub fn load(dir: Option<&Path>) -> Result<Self, AppError> {
        let Some(dir) = dir else {
            return Ok(Self::default());
        };

        tracing::info!("Loading page templates from {}", dir.display());

        let read = |name: &str| -> Result<PageTemplate, AppError> {
            let path = dir.join(name);
            let html = std::fs::read_to_string(&path).map_err(|e| {
                AppError::Internal(format!("Failed to read template {}: {}", path.display(), e))
            })?;
            if !html.contains(MESSAGE) {
                tracing::warn!("Template {} has no {} placeholder", path.display(), MESSAGE);
            }
            Ok(PageTemplate::new(html))
        };

        Ok(Self {
            sources: read(SOURCES_FILE)?,
            studies: read(STUDIES_FILE)?,
            search: read(SEARCH_FILE)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_templates_have_placeholders() {
        let templates = Templates::default();
        for page in [&templates.sources, &templates.studies] {
            assert!(page.as_str().contains(MESSAGE));
            assert!(page.as_str().contains(RECENT_HASH));
            assert!(page.as_str().contains(FILE_LIST));
        }
        assert!(templates.search.as_str().contains(MESSAGE));
    }

    #[test]
    fn test_fill() {
        let page = PageTemplate::new("<p>$MESSAGE$</p><i>$RECENTHASH$</i><ul>$GITFILELIST$</ul>");
        assert_eq!(
            page.fill("hi", "abc", "<li>1</li>"),
            "<p>hi</p><i>abc</i><ul><li>1</li></ul>"
        );
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SOURCES_FILE), "sources $MESSAGE$").unwrap();
        std::fs::write(dir.path().join(STUDIES_FILE), "studies $MESSAGE$").unwrap();
        std::fs::write(dir.path().join(SEARCH_FILE), "search").unwrap();

        let templates = Templates::load(Some(dir.path())).unwrap();
        assert_eq!(templates.sources.as_str(), "sources $MESSAGE$");
        assert_eq!(templates.search.as_str(), "search");
    }

    #[test]
    fn test_load_missing_template_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SOURCES_FILE), "sources").unwrap();

        assert!(matches!(
            Templates::load(Some(dir.path())),
            Err(AppError::Internal(_))
        ));
    }
}
