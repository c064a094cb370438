//! Key-value page input

use crate::error::DesignerError;
use std::path::Path;
use tracing::debug;

/// One page worth of source material
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInput {
    /// Title of the source document (never blank)
    pub document_title: String,

    /// Free text describing the page
    pub page_data: String,
}

impl PageInput {
    /// Build an input, rejecting a blank title
    pub fn new(
        document_title: impl Into<String>,
        page_data: impl Into<String>,
    ) -> Result<Self, DesignerError> {
        let document_title = document_title.into().trim().to_string();
        if document_title.is_empty() {
            return Err(DesignerError::MissingField("document_title".to_string()));
        }
        Ok(Self {
            document_title,
            page_data: page_data.into().trim().to_string(),
        })
    }

    /// Parse `key: value` lines
    ///
    /// The first `:` (or full-width `：`) on a line separates key from value;
    /// lines without a separator and unknown keys are ignored, and a repeated
    /// key keeps its last value.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagesmith_designer::PageInput;
    ///
    /// let input = PageInput::parse("document_title: 区块测试\npage_data：A。B。C").unwrap();
    /// assert_eq!(input.document_title, "区块测试");
    /// assert_eq!(input.page_data, "A。B。C");
    /// ```
    pub fn parse(text: &str) -> Result<Self, DesignerError> {
        let mut document_title = None;
        let mut page_data = None;

        for line in text.lines() {
            let Some((key, value)) = split_pair(line) else {
                continue;
            };
            match key {
                "document_title" => document_title = Some(value),
                "page_data" => page_data = Some(value),
                _ => debug!("Ignoring input key '{}'", key),
            }
        }

        Self::new(document_title.unwrap_or_default(), page_data.unwrap_or_default())
    }

    /// Read and parse an input file
    pub async fn load(path: &Path) -> Result<Self, DesignerError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| DesignerError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::parse(&text)
    }
}

fn split_pair(line: &str) -> Option<(&str, &str)> {
    let index = line.find([':', '：'])?;
    let separator_len = line[index..].chars().next()?.len_utf8();
    let key = line[..index].trim();
    let value = line[index + separator_len..].trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_basic() {
        let input = PageInput::parse("document_title: Roadmap\npage_data: Plan. Build. Ship.").unwrap();
        assert_eq!(input.document_title, "Roadmap");
        assert_eq!(input.page_data, "Plan. Build. Ship.");
    }

    #[test]
    fn test_first_colon_splits() {
        let input = PageInput::parse("document_title: Q3: review\npage_data: a: b").unwrap();
        assert_eq!(input.document_title, "Q3: review");
        assert_eq!(input.page_data, "a: b");
    }

    #[test]
    fn test_full_width_colon() {
        let input = PageInput::parse("document_title：数据驱动").unwrap();
        assert_eq!(input.document_title, "数据驱动");
    }

    #[test]
    fn test_page_data_defaults_to_empty() {
        let input = PageInput::parse("document_title: Only title").unwrap();
        assert_eq!(input.page_data, "");
    }

    #[test]
    fn test_unknown_keys_and_noise_ignored() {
        let input = PageInput::parse("author: someone\nno separator here\n: empty key\ndocument_title: T").unwrap();
        assert_eq!(input.document_title, "T");
    }

    #[test]
    fn test_missing_title() {
        let result = PageInput::parse("page_data: something");
        assert!(matches!(result, Err(DesignerError::MissingField(f)) if f == "document_title"));
    }

    #[test]
    fn test_blank_title() {
        let result = PageInput::parse("document_title:    \npage_data: x");
        assert!(matches!(result, Err(DesignerError::MissingField(_))));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "document_title: From disk").unwrap();
        writeln!(file, "page_data: Line one").unwrap();

        let input = PageInput::load(file.path()).await.unwrap();
        assert_eq!(input.document_title, "From disk");
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = PageInput::load(Path::new("/nonexistent/pagesmith/input.txt")).await;
        assert!(matches!(result, Err(DesignerError::Io { .. })));
    }
}
