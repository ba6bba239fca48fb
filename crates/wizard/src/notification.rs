use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationVariant {
    Default,
    Destructive,
}

/// A transient toast shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl Notification {
    pub fn success(description: impl Into<String>) -> Self {
        Self {
            title: "Success".into(),
            description: description.into(),
            variant: NotificationVariant::Default,
        }
    }

    pub fn failure(description: impl Into<String>) -> Self {
        Self {
            title: "Error".into(),
            description: description.into(),
            variant: NotificationVariant::Destructive,
        }
    }
}
