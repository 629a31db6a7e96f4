use serde::{Deserialize, Serialize};

/// Element kinds the break commands need to recognise.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakConfig {
    /// Kind of a single list entry
    pub list_item: String,

    /// Kinds that hold list items (bulleted, numbered, checklists)
    pub list_kinds: Vec<String>,

    /// Kind of the paragraph inserted when leaving a list
    pub paragraph: String,

    /// Element kinds that live inside a block and are never split as one
    pub inline_kinds: Vec<String>,
}

impl Default for BreakConfig {
    fn default() -> Self {
        Self {
            list_item: "list-item".to_string(),
            list_kinds: vec![
                "list".to_string(),
                "numbered-list".to_string(),
                "checklist".to_string(),
            ],
            paragraph: "paragraph".to_string(),
            inline_kinds: vec!["link".to_string()],
        }
    }
}

impl BreakConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_list(&self, kind: &str) -> bool {
        self.list_kinds.iter().any(|k| k == kind)
    }

    pub fn is_list_item(&self, kind: &str) -> bool {
        self.list_item == kind
    }

    pub fn is_inline(&self, kind: &str) -> bool {
        self.inline_kinds.iter().any(|k| k == kind)
    }
}
