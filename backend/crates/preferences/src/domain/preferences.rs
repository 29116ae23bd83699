//! Preferences
//!
//! One instance per client. Serialized as a single camelCase JSON object;
//! missing fields take their defaults so older stored objects still load.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::domain::theme::ColorScheme;

const KG_PER_LB: f64 = 0.453_592_37;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[display("light")]
    Light,
    #[display("dark")]
    Dark,
    /// Follow the operating system's color scheme
    #[default]
    #[display("system")]
    System,
}

impl Theme {
    /// Effective scheme given the current system signal
    pub fn resolve(&self, system: ColorScheme) -> ColorScheme {
        match self {
            Theme::Light => ColorScheme::Light,
            Theme::Dark => ColorScheme::Dark,
            Theme::System => system,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    #[display("metric")]
    Metric,
    #[display("imperial")]
    Imperial,
}

impl Units {
    /// Format an emission amount given in kilograms of CO₂-equivalent
    pub fn format_emissions(&self, kg: f64) -> String {
        let kg = if kg.is_finite() { kg } else { 0.0 };
        match self {
            Units::Metric if kg.abs() >= 1000.0 => format!("{:.2} t CO₂e", kg / 1000.0),
            Units::Metric => format!("{:.1} kg CO₂e", kg),
            Units::Imperial => format!("{:.1} lb CO₂e", kg / KG_PER_LB),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrivacySettings {
    pub profile_public: bool,
    pub share_analytics: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            profile_public: true,
            share_analytics: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub theme: Theme,
    /// Language code, e.g. `en`
    pub language: String,
    /// ISO 4217 currency code
    pub currency: String,
    pub units: Units,
    pub privacy: PrivacySettings,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            language: "en".to_string(),
            currency: "USD".to_string(),
            units: Units::default(),
            privacy: PrivacySettings::default(),
        }
    }
}
