use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use sectree::{BranchState, EngineSettings, TreeElement};
use serde::Deserialize;

/// Element record read from the input file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Entry {
    pub id: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub rank: i64,
    #[serde(default)]
    pub collapsed: bool,
    #[serde(default)]
    pub title: String,
}

impl Entry {
    /// Title to display, falling back to the id.
    pub fn label(&self) -> &str {
        if self.title.is_empty() {
            &self.id
        } else {
            &self.title
        }
    }
}

impl TreeElement for Entry {
    type Id = String;

    fn id(&self) -> &String {
        &self.id
    }

    fn parent_id(&self) -> Option<&String> {
        self.parent.as_ref()
    }

    fn rank(&self) -> i64 {
        self.rank
    }

    fn initial_state(&self) -> BranchState {
        if self.collapsed {
            BranchState::Collapsed
        } else {
            BranchState::Expanded
        }
    }

    fn root_element() -> Self {
        Self {
            id: String::new(),
            parent: None,
            rank: 0,
            collapsed: false,
            title: "root".to_string(),
        }
    }
}

pub fn parse_entries(json: &str) -> Result<Vec<Entry>> {
    serde_json::from_str(json).context("element list is not valid JSON")
}

pub fn load_entries(path: &Path) -> Result<Vec<Entry>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_entries(&json)
        .with_context(|| format!("failed to parse {}", path.display()))
}

pub fn load_settings(path: &Path) -> Result<EngineSettings> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("failed to parse settings {}", path.display()))
}

#[cfg(test)]
mod tests {
    use sectree::{BranchState, SectionTree, TreeElement};

    use super::parse_entries;

    const OUTLINE: &str = r#"[
        { "id": "docs", "parent": null, "rank": 0, "title": "Docs" },
        { "id": "intro", "parent": "docs", "rank": 0, "title": "Intro" },
        { "id": "guide", "parent": "docs", "rank": 1, "collapsed": true },
        { "id": "setup", "parent": "guide", "rank": 0, "title": "Setup" }
    ]"#;

    #[test]
    fn given_outline_when_parsed_then_optional_fields_default() {
        let entries = parse_entries(OUTLINE).expect("valid outline");

        assert_eq!(entries.len(), 4);
        assert_eq!(entries[2].label(), "guide");
        assert_eq!(entries[2].initial_state(), BranchState::Collapsed);
        assert_eq!(entries[1].parent_id().map(String::as_str), Some("docs"));
    }

    #[test]
    fn given_outline_when_built_then_collapsed_flag_is_honoured() {
        let entries = parse_entries(OUTLINE).expect("valid outline");

        let tree = SectionTree::new(entries).expect("tree builds");

        let headers: Vec<_> =
            tree.sections().iter().map(|s| s.header.label()).collect();
        assert_eq!(headers, vec!["Docs", "guide"]);
        assert!(tree.sections()[1].rows.is_empty());
    }

    #[test]
    fn given_malformed_json_when_parsed_then_error_has_context() {
        let err = parse_entries("[{ \"id\": 1 }]").expect_err("bad id type");

        assert!(err.to_string().contains("not valid JSON"));
    }
}
