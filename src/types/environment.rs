use std::fmt;

/// Identifies the client that triggered an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum TriggerEnvironment {
    AndroidClient,
    WebClient,
    Server,
}

impl TriggerEnvironment {
    /// Name stored in the value map's `environment` entry.
    #[must_use]
    pub fn client_name(self) -> &'static str {
        match self {
            TriggerEnvironment::AndroidClient => "android",
            TriggerEnvironment::WebClient => "web",
            TriggerEnvironment::Server => "server",
        }
    }
}

impl fmt::Display for TriggerEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.client_name())
    }
}
