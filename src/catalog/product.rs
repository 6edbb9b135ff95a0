use serde::{Deserialize, Serialize};

use crate::catalog::{region::RegionCode, LocalizedText};
use crate::utils::money::Fcfa;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: LocalizedText,
    pub price: Fcfa,
    pub stock: u32,
    pub vendor_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: String,
    pub name: String,
    pub region: RegionCode,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactChannel {
    Call,
    Sms,
    Email,
}

/// One button on the vendor contact sheet. Missing vendor data disables it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactOption {
    pub channel: ContactChannel,
    pub enabled: bool,
    pub target: Option<String>,
}

impl Vendor {
    pub fn contact_options(&self) -> Vec<ContactOption> {
        let phone = self.phone.as_deref().map(str::trim).filter(|p| !p.is_empty());
        let email = self.email.as_deref().map(str::trim).filter(|e| !e.is_empty());

        let option = |channel, target: Option<&str>| ContactOption {
            channel,
            enabled: target.is_some(),
            target: target.map(str::to_string),
        };

        vec![
            option(ContactChannel::Call, phone).with_scheme("tel:"),
            option(ContactChannel::Sms, phone).with_scheme("sms:"),
            option(ContactChannel::Email, email).with_scheme("mailto:"),
        ]
    }
}

impl ContactOption {
    fn with_scheme(mut self, scheme: &str) -> Self {
        self.target = self.target.map(|t| format!("{}{}", scheme, t));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vendor(phone: Option<&str>, email: Option<&str>) -> Vendor {
        Vendor {
            id: "v".into(),
            name: "Vendor".into(),
            region: RegionCode::Lt,
            phone: phone.map(str::to_string),
            email: email.map(str::to_string),
        }
    }

    #[test]
    fn test_all_channels_enabled() {
        let options = vendor(Some("+237677001122"), Some("a@b.cm")).contact_options();
        assert!(options.iter().all(|o| o.enabled));
        assert_eq!(options[0].target.as_deref(), Some("tel:+237677001122"));
        assert_eq!(options[1].target.as_deref(), Some("sms:+237677001122"));
        assert_eq!(options[2].target.as_deref(), Some("mailto:a@b.cm"));
    }

    #[test]
    fn test_missing_data_disables_channel() {
        let options = vendor(None, Some("  ")).contact_options();
        assert_eq!(options.len(), 3);
        assert!(options.iter().all(|o| !o.enabled && o.target.is_none()));
    }
}
