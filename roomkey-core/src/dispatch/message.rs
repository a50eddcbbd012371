//! Invitation text message template

use crate::config::DispatchConfig;

/// Renders the fixed invitation text around an install link and a code
#[derive(Debug, Clone)]
pub struct InvitationMessage {
    app_name: String,
    install_link: String,
}

impl InvitationMessage {
    pub fn new(app_name: impl Into<String>, install_link: impl Into<String>) -> Self {
        Self { app_name: app_name.into(), install_link: install_link.into() }
    }

    pub fn from_config(config: &DispatchConfig) -> Self {
        Self::new(config.app_name.clone(), config.install_link.clone())
    }

    pub fn install_link(&self) -> &str {
        &self.install_link
    }

    pub fn body(&self, code: &str) -> String {
        format!(
            "You've been invited to use the {}! Download here: {} and use invitation code: {}",
            self.app_name, self.install_link, code
        )
    }
}

impl Default for InvitationMessage {
    fn default() -> Self {
        Self::from_config(&DispatchConfig::default())
    }
}
