use serde::{Deserialize, Serialize};

/// Identity options a robot is constructed with.
///
/// Every field is optional and stored verbatim; nothing here is checked
/// for format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Display name of the robot.
    pub name: Option<String>,
    /// Avatar image.
    pub image_url: Option<String>,
    /// Profile page.
    pub profile_url: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn with_profile_url(mut self, url: impl Into<String>) -> Self {
        self.profile_url = Some(url.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_deserializes() {
        let config: Config = serde_json::from_str(r#"{"name":"Echoey"}"#).unwrap();
        assert_eq!(config.name.as_deref(), Some("Echoey"));
        assert_eq!(config.image_url, None);
        assert_eq!(config.profile_url, None);
    }

    #[test]
    fn test_values_are_not_validated() {
        let config: Config =
            serde_json::from_str(r#"{"image_url":"not a url","profile_url":""}"#).unwrap();
        assert_eq!(config.image_url.as_deref(), Some("not a url"));
        assert_eq!(config.profile_url.as_deref(), Some(""));
    }
}
