//! Flash notifications shown once after a redirect

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationVariant {
    #[default]
    Primary,
    Gray,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationIcon {
    pub name: String,
    pub variant: NotificationVariant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub icon: NotificationIcon,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            icon: NotificationIcon {
                name: "success".to_string(),
                variant: NotificationVariant::Success,
            },
        }
    }

    pub fn with_icon(mut self, name: impl Into<String>, variant: NotificationVariant) -> Self {
        self.icon = NotificationIcon {
            name: name.into(),
            variant,
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_json() {
        let n = Notification::new("Location deleted", "Gone")
            .with_icon("trash", NotificationVariant::Error);
        let json = serde_json::to_value(&n).unwrap();

        assert_eq!(json["icon"]["name"], "trash");
        assert_eq!(json["icon"]["variant"], "error");
    }
}
