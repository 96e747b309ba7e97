use crate::time::LocalZone;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Extractor settings, loadable from camelCase JSON:
///
/// ```json
/// { "localOffsetMinutes": 60, "labelFormat": "YYYY-MM-DD HH:mm" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExtractorConfig {
    /// Minutes east of UTC for offset-less literals. Absent means the system timezone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_offset_minutes: Option<i32>,
    /// dayjs pattern used for temporal labels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_format: Option<String>,
}

impl ExtractorConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| Error::InvalidConfig {
            message: format!("{}: {err}", path.display()),
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        self.local_zone().map(|_| ())
    }

    pub fn local_zone(&self) -> Result<LocalZone> {
        match self.local_offset_minutes {
            None => Ok(LocalZone::System),
            Some(mins) => LocalZone::fixed_minutes(mins).ok_or_else(|| Error::InvalidConfig {
                message: format!("localOffsetMinutes out of range: {mins}"),
            }),
        }
    }

    /// Layers `other` on top of `self`; fields set in `other` win.
    pub fn merged_with(mut self, other: ExtractorConfig) -> Self {
        if other.local_offset_minutes.is_some() {
            self.local_offset_minutes = other.local_offset_minutes;
        }
        if other.label_format.is_some() {
            self.label_format = other.label_format;
        }
        self
    }
}
