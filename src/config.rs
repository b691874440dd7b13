#![allow(non_snake_case)]

//! Settings for the entry points of this crate, readable from YAML.
//!
//! The functions here make use of serde_ignored to catch typos in the config.

use std::io::Read;

use rsp2_kpoints::Threading;
use rsp2_spacegroup::OriginChoice;

/// Provides an alternative to serde_yaml::from_reader that warns about
/// unused keys.
pub trait YamlRead: for <'de> serde::Deserialize<'de> {
    fn from_reader(mut r: impl Read) -> Result<Self, serde_yaml::Error>
    { YamlRead::from_dyn_reader(&mut r) }

    fn from_dyn_reader(r: &mut dyn Read) -> Result<Self, serde_yaml::Error> {
        // serde_ignored needs a Deserializer.
        // serde_yaml doesn't expose one that is constructable from a Read,
        // but it does impl Deserialize for Value.
        Self::from_value(serde_yaml::from_reader(r)?)
    }

    fn from_value(value: serde_yaml::Value) -> Result<Self, serde_yaml::Error>;
}

macro_rules! derive_yaml_read {
    ($Type:ty) => {
        impl YamlRead for $Type {
            fn from_value(value: serde_yaml::Value) -> Result<$Type, serde_yaml::Error> {
                serde_ignored::deserialize(
                    value,
                    |path| warn!("Unused config item (possible typo?): {}", path),
                )
            }
        }
    };
}

#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    /// Cartesian distance within which two atoms are considered to coincide.
    #[serde(default = "_settings__symprec")]
    pub symprec: f64,

    /// Tolerance on translations (in fractional units) when identifying
    /// the space group type.  The tolerance of the symmetry search is used
    /// if it is larger.
    #[serde(default = "_settings__classify_tolerance")]
    pub classify_tolerance: f64,

    /// Use `k -> -k` when reducing k-points.
    #[serde(default = "_settings__time_reversal")]
    pub time_reversal: bool,

    #[serde(default)]
    pub threading: Threading,

    /// Setting reported for space group types with two origin choices.
    #[serde(default)]
    pub origin_choice: Origin,
}
derive_yaml_read!{Settings}
fn _settings__symprec() -> f64 { 1e-5 }
fn _settings__classify_tolerance() -> f64 { 1e-3 }
fn _settings__time_reversal() -> bool { true }

impl Default for Settings {
    fn default() -> Self { from_empty_mapping().unwrap() }
}

// an origin choice that serializes as the integer 1 or 2
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Origin(pub OriginChoice);

impl serde::Serialize for Origin {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where S: serde::Serializer,
    {
        let n = match self.0 {
            OriginChoice::One => 1i32,
            OriginChoice::Two => 2i32,
        };
        serde::Serialize::serialize(&n, serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Origin {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where D: serde::Deserializer<'de>,
    {
        use serde::de::Unexpected;
        use serde::de::Error;
        match serde::Deserialize::deserialize(deserializer)? {
            1i64 => Ok(Origin(OriginChoice::One)),
            2i64 => Ok(Origin(OriginChoice::Two)),
            n => Err(Error::invalid_value(Unexpected::Signed(n), &"an origin choice of 1 or 2")),
        }
    }
}

fn from_empty_mapping<T: for<'de> serde::Deserialize<'de>>() -> serde_yaml::Result<T> {
    use serde_yaml::{from_value, Value, Mapping};
    from_value(Value::Mapping(Mapping::new()))
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.symprec, 1e-5);
        assert_eq!(settings.classify_tolerance, 1e-3);
        assert_eq!(settings.time_reversal, true);
        assert_eq!(settings.threading, Threading::Rayon);
        assert_eq!(settings.origin_choice, Origin(OriginChoice::One));
    }

    #[test]
    fn kebab_case() {
        let yaml = "
symprec: 0.001
classify-tolerance: 0.01
time-reversal: false
threading: serial
origin-choice: 2
";
        let settings = Settings::from_reader(yaml.as_bytes()).unwrap();
        assert_eq!(settings, Settings {
            symprec: 0.001,
            classify_tolerance: 0.01,
            time_reversal: false,
            threading: Threading::Serial,
            origin_choice: Origin(OriginChoice::Two),
        });
    }

    #[test]
    fn unused_keys_are_not_fatal() {
        let yaml = "
symprec: 0.0001
sym-prec: 0.001
";
        let settings = Settings::from_reader(yaml.as_bytes()).unwrap();
        assert_eq!(settings.symprec, 0.0001);
    }

    #[test]
    fn bad_values() {
        assert!(Settings::from_reader("origin-choice: 3".as_bytes()).is_err());
        assert!(Settings::from_reader("threading: lammps".as_bytes()).is_err());
    }

    #[test]
    fn json_round_trip() {
        let settings = Settings {
            symprec: 2e-5,
            origin_choice: Origin(OriginChoice::Two),
            threading: Threading::Serial,
            ..Settings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"origin-choice\":2"));
        assert!(json.contains("\"threading\":\"serial\""));
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }
}
