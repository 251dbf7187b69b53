use serde::{Deserialize, Serialize};

/// Display-only store contact settings shown in the page chrome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreSettings {
    pub store_name: String,
    pub contact_email: String,
    pub phone_number: String,
    pub address: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            store_name: "Anu Gadget".into(),
            contact_email: "Gbadamosia21@gmail.com".into(),
            phone_number: "+234 812 770 4308".into(),
            address: "3/9 Olukoleosho Ikeja Mokland Plaza".into(),
        }
    }
}

impl StoreSettings {
    /// Field-wise defaulting: a blank stored field falls back to its
    /// default just like an absent one.
    pub fn or_defaults(mut self) -> Self {
        let defaults = StoreSettings::default();
        if self.store_name.trim().is_empty() {
            self.store_name = defaults.store_name;
        }
        if self.contact_email.trim().is_empty() {
            self.contact_email = defaults.contact_email;
        }
        if self.phone_number.trim().is_empty() {
            self.phone_number = defaults.phone_number;
        }
        if self.address.trim().is_empty() {
            self.address = defaults.address;
        }
        self
    }
}
