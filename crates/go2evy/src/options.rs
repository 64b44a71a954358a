use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Represents options provided to the tool. Most of these are
/// configured via a toml file; some over command line flags, which win
/// over file values.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Name of the external conformance executable.
    pub evy_binary: String,
    /// Whether to run the conformance check on every artifact.
    pub run_conformance: bool,
    /// Verbosity level for logging.
    pub verbosity_level: LevelFilter,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            evy_binary: "evy".to_string(),
            run_conformance: false,
            verbosity_level: LevelFilter::Info,
        }
    }
}

impl Options {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            None => Ok(Self::default()),
            Some(path) => {
                let text = fs::read_to_string(path)?;
                Ok(toml::from_str(&text)?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let options = Options::default();
        assert_eq!(options.evy_binary, "evy");
        assert!(!options.run_conformance);
    }

    #[test]
    fn toml_round_trip() {
        let options: Options =
            toml::from_str("evy_binary = \"/usr/local/bin/evy\"\nrun_conformance = true\n")
                .unwrap();
        assert_eq!(options.evy_binary, "/usr/local/bin/evy");
        assert!(options.run_conformance);
    }
}
