use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One unit of rendered report output.
///
/// The order of items returned by a handler is the document order for
/// that section; nothing downstream may reorder them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Item {
    Heading { text: String, level: u8 },
    Text { text: String },
    Image {
        path: PathBuf,
        device_label: Option<String>,
    },
}

impl Item {
    pub fn heading(text: impl Into<String>) -> Self {
        Item::Heading {
            text: text.into(),
            level: 1,
        }
    }

    pub fn subheading(text: impl Into<String>) -> Self {
        Item::Heading {
            text: text.into(),
            level: 2,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Item::Text { text: text.into() }
    }

    /// Chart artifact reference; `device_label` names the device the
    /// chart belongs to, absent for cross-device synthesis images.
    pub fn image(path: impl Into<PathBuf>, device_label: Option<String>) -> Self {
        Item::Image {
            path: path.into(),
            device_label,
        }
    }
}
