//! Agencies the service generates paperwork for, and their fixed document text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Agency {
    #[default]
    Attentive,
    Abode,
}

/// Per-agency strings and template files. Immutable; selected by `Agency::profile`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgencyProfile {
    pub trainer_name: &'static str,
    pub trainer_credentials: &'static str,
    pub organization_name: &'static str,
    /// Certificate background, relative to the template directory.
    pub certificate_template: &'static str,
    /// Pre/post test form, relative to the template directory.
    pub test_template: &'static str,
}

const ATTENTIVE: AgencyProfile = AgencyProfile {
    trainer_name: "Joel Posen",
    trainer_credentials: "BS/SC Supervisor",
    organization_name: "Attentive Care Service Coordination",
    certificate_template: "CERTIFICATE-_Attentive_JP.pdf",
    test_template: "SC_Testing_Attentive_Final.pdf",
};

const ABODE: AgencyProfile = AgencyProfile {
    trainer_name: "Lipa Lefkowitz",
    trainer_credentials: "BS/SC Supervisor",
    organization_name: "Abode Care Service Coordination",
    certificate_template: "CERTIFICATE-_Abode_LL.pdf",
    test_template: "SC_Testing_Abode_Final.pdf",
};

impl Agency {
    pub fn profile(self) -> &'static AgencyProfile {
        match self {
            Agency::Attentive => &ATTENTIVE,
            Agency::Abode => &ABODE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Agency::Attentive => "Attentive",
            Agency::Abode => "Abode",
        }
    }
}

impl fmt::Display for Agency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Agency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "attentive" => Ok(Agency::Attentive),
            "abode" => Ok(Agency::Abode),
            other => Err(format!(
                "unknown agency '{other}' (expected \"Attentive\" or \"Abode\")"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_agency_is_attentive() {
        assert_eq!(Agency::default(), Agency::Attentive);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Abode".parse::<Agency>(), Ok(Agency::Abode));
        assert_eq!("ABODE".parse::<Agency>(), Ok(Agency::Abode));
        assert_eq!(" attentive ".parse::<Agency>(), Ok(Agency::Attentive));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "Acme".parse::<Agency>().unwrap_err();
        assert!(err.contains("acme"), "{err}");
    }

    #[test]
    fn test_profiles_switch_trainer_and_org() {
        let attentive = Agency::Attentive.profile();
        let abode = Agency::Abode.profile();
        assert_eq!(attentive.trainer_name, "Joel Posen");
        assert_eq!(abode.trainer_name, "Lipa Lefkowitz");
        assert_eq!(
            attentive.organization_name,
            "Attentive Care Service Coordination"
        );
        assert_eq!(abode.organization_name, "Abode Care Service Coordination");
        assert_ne!(attentive.certificate_template, abode.certificate_template);
        assert_ne!(attentive.test_template, abode.test_template);
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for agency in [Agency::Attentive, Agency::Abode] {
            assert_eq!(agency.to_string().parse::<Agency>(), Ok(agency));
        }
    }
}
