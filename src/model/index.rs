use crate::error::{DashError, Result};

pub const DEFAULT_INDEX_NAME: &str = "cf";

/// Names the generated script binds itself, which an index must not shadow
const RESERVED_NAMES: [&str; 15] = [
    "d3", "dc", "crossfilter", "element", "crossfilterData", "displayId",
    "all", "count", "chartId", "dim", "group", "_group", "chart", "min", "max",
];

/// Reserved words and literals that cannot name a variable
const KEYWORDS: [&str; 46] = [
    "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for",
    "function", "if", "implements", "import", "in", "instanceof", "interface", "let",
    "new", "null", "package", "private", "protected", "public", "return", "static",
    "super", "switch", "this", "throw", "true", "try", "typeof", "var", "void",
    "while", "with", "yield", "await",
];

/// Handle to the shared filtering index every fragment of a dashboard reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexHandle {
    name: String,
}

impl IndexHandle {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let mut chars = name.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$');
        let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');

        let reserved = RESERVED_NAMES.contains(&name.as_str()) || KEYWORDS.contains(&name.as_str());
        if !valid_start || !valid_rest || reserved {
            return Err(DashError::InvalidIndexName(name));
        }
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for IndexHandle {
    fn default() -> Self {
        Self { name: DEFAULT_INDEX_NAME.to_string() }
    }
}

impl std::fmt::Display for IndexHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert_eq!(IndexHandle::default().name(), "cf");
        assert!(IndexHandle::new("sales_cf").is_ok());
        assert!(IndexHandle::new("$idx2").is_ok());
    }

    #[test]
    fn test_invalid_names() {
        assert!(IndexHandle::new("").is_err());
        assert!(IndexHandle::new("2cf").is_err());
        assert!(IndexHandle::new("c-f").is_err());
        assert!(IndexHandle::new("dc").is_err());
        assert!(IndexHandle::new("dim").is_err());
    }

    #[test]
    fn test_keywords_rejected() {
        for keyword in ["var", "new", "function", "this", "class", "return", "true", "false", "null", "let", "const", "if", "in"] {
            assert!(IndexHandle::new(keyword).is_err(), "{}", keyword);
        }
        assert!(IndexHandle::new("newest").is_ok());
    }
}
