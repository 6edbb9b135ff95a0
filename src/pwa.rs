//! Progressive-web-app affordances derived from what the client says it supports.
//! Anything unsupported turns the matching affordance off; nothing here fails.

use serde::{Deserialize, Serialize};

use crate::settings::Preferences;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPermission {
    Granted,
    Denied,
    /// Browser will ask on first request
    #[serde(rename = "default")]
    Prompt,
    #[default]
    Unsupported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientCapabilities {
    pub service_worker: bool,
    pub notifications: NotificationPermission,
    /// Already running as an installed app
    pub standalone: bool,
    pub online: bool,
}

impl Default for ClientCapabilities {
    fn default() -> Self {
        Self {
            service_worker: false,
            notifications: NotificationPermission::Unsupported,
            standalone: false,
            online: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Affordances {
    pub install_prompt: bool,
    /// Offer the "enable notifications" button
    pub notification_opt_in: bool,
    pub notifications_active: bool,
    pub offline_banner: bool,
    pub offline_cache: bool,
}

pub fn affordances(caps: &ClientCapabilities, prefs: &Preferences) -> Affordances {
    let notifications_active =
        caps.notifications == NotificationPermission::Granted && prefs.notifications_enabled;

    Affordances {
        install_prompt: caps.service_worker && !caps.standalone && !prefs.install_prompt_dismissed,
        notification_opt_in: matches!(
            caps.notifications,
            NotificationPermission::Prompt | NotificationPermission::Granted
        ) && !notifications_active,
        notifications_active,
        offline_banner: !caps.online,
        offline_cache: caps.service_worker,
    }
}
