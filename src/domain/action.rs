use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Entry in the append-only user action log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Clip,
    Dismiss,
    ContentIdea,
    Save,
    Read,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Clip => "clip",
            ActionKind::Dismiss => "dismiss",
            ActionKind::ContentIdea => "content_idea",
            ActionKind::Save => "save",
            ActionKind::Read => "read",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "clip" => Some(ActionKind::Clip),
            "dismiss" => Some(ActionKind::Dismiss),
            "content_idea" => Some(ActionKind::ContentIdea),
            "save" => Some(ActionKind::Save),
            "read" => Some(ActionKind::Read),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAction {
    pub id: i64,
    pub item_id: i64,
    pub action: ActionKind,
    pub created_at: DateTime<Utc>,
    pub metadata_json: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_kind_round_trip() {
        for kind in [
            ActionKind::Clip,
            ActionKind::Dismiss,
            ActionKind::ContentIdea,
            ActionKind::Save,
            ActionKind::Read,
        ] {
            assert_eq!(ActionKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ActionKind::parse("star"), None);
    }
}
