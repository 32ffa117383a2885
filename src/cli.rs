//! Command-line interface parsing for MeteoSpain CLI
//!
//! Handles argument parsing with clap and the resolution of a province +
//! municipality pair (or a raw 5-digit code) into the location code the
//! forecast API expects.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::data::reference;

/// Error types for CLI argument resolution
#[derive(Debug, Error)]
pub enum CliError {
    /// The supplied location code is not 5 ASCII digits
    #[error("Invalid location code '{0}': expected 5 digits, e.g. 08019")]
    InvalidLocationCode(String),

    /// Neither a code nor a province/municipality pair was given
    #[error("Specify a location code, or --province and --municipality")]
    MissingLocation,

    /// Name-based lookup needs the municipality dictionary file
    #[error("Looking up by name requires --municipalities <FILE>")]
    MissingDictionary,

    /// The dictionary file could not be read
    #[error("Failed to read municipality dictionary '{0}': {1}")]
    DictionaryRead(String, std::io::Error),

    /// The dictionary file could not be parsed
    #[error("Failed to parse municipality dictionary '{0}': {1}")]
    DictionaryParse(String, serde_json::Error),

    /// The province name matched nothing in the static table
    #[error("Unknown province: '{0}'")]
    UnknownProvince(String),

    /// The municipality name matched nothing within the province
    #[error("Unknown municipality '{0}' in province '{1}'")]
    UnknownMunicipality(String, String),
}

/// MeteoSpain CLI - hourly weather forecasts for Spanish municipalities
#[derive(Parser, Debug)]
#[command(name = "meteospain")]
#[command(about = "Hourly weather forecasts for Spanish municipalities from AEMET OpenData")]
#[command(version)]
pub struct Cli {
    /// 5-digit province+municipality location code, e.g. 08019 for Barcelona
    pub code: Option<String>,

    /// Province name, used together with --municipality to look up the code
    #[arg(long, conflicts_with = "code", requires = "municipality")]
    pub province: Option<String>,

    /// Municipality name within --province
    #[arg(long, requires = "province")]
    pub municipality: Option<String>,

    /// Path to the INE municipality dictionary JSON file
    #[arg(long, value_name = "FILE")]
    pub municipalities: Option<PathBuf>,

    /// AEMET OpenData API key
    #[arg(long, env = "AEMET_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 15)]
    pub timeout_secs: u64,

    /// Print the forecast as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Limit output to the first N days
    #[arg(long, value_name = "N")]
    pub days: Option<usize>,
}

/// Resolves the CLI arguments into the 5-digit location code
///
/// A directly supplied code is validated as-is; a province/municipality pair
/// is looked up through the static province table and the dictionary file.
pub fn resolve_location_code(cli: &Cli) -> Result<String, CliError> {
    if let Some(code) = &cli.code {
        if !reference::is_valid_location_code(code) {
            return Err(CliError::InvalidLocationCode(code.clone()));
        }
        return Ok(code.clone());
    }

    match (&cli.province, &cli.municipality) {
        (Some(province), Some(municipality)) => {
            let path = cli
                .municipalities
                .as_ref()
                .ok_or(CliError::MissingDictionary)?;
            let display = path.display().to_string();
            let json = std::fs::read_to_string(path)
                .map_err(|e| CliError::DictionaryRead(display.clone(), e))?;
            lookup_code(province, municipality, &json, &display)
        }
        _ => Err(CliError::MissingLocation),
    }
}

/// Looks up a province/municipality pair in a dictionary JSON text
fn lookup_code(
    province: &str,
    municipality: &str,
    dictionary_json: &str,
    dictionary_name: &str,
) -> Result<String, CliError> {
    let matched_province = reference::find_province(province)
        .ok_or_else(|| CliError::UnknownProvince(province.to_string()))?;

    let municipalities = reference::load_municipalities(dictionary_json)
        .map_err(|e| CliError::DictionaryParse(dictionary_name.to_string(), e))?;

    let matched = reference::find_municipality(&municipalities, matched_province.code, municipality)
        .ok_or_else(|| {
            CliError::UnknownMunicipality(
                municipality.to_string(),
                matched_province.name.to_string(),
            )
        })?;

    Ok(reference::location_code(matched.cpro, matched.cmun))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(args)
    }

    #[test]
    fn test_cli_parse_code_only() {
        let cli = parse(&["meteospain", "08019", "--api-key", "k"]);
        assert_eq!(cli.code.as_deref(), Some("08019"));
        assert_eq!(cli.timeout_secs, 15);
        assert!(!cli.json);
    }

    #[test]
    fn test_cli_parse_names() {
        let cli = parse(&[
            "meteospain",
            "--province",
            "Barcelona",
            "--municipality",
            "Igualada",
            "--municipalities",
            "dict.json",
            "--api-key",
            "k",
        ]);
        assert_eq!(cli.province.as_deref(), Some("Barcelona"));
        assert_eq!(cli.municipality.as_deref(), Some("Igualada"));
    }

    #[test]
    fn test_cli_rejects_code_with_province() {
        let result = Cli::try_parse_from([
            "meteospain",
            "08019",
            "--province",
            "Barcelona",
            "--municipality",
            "Barcelona",
            "--api-key",
            "k",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_municipality_requires_province() {
        let result = Cli::try_parse_from([
            "meteospain",
            "--municipality",
            "Igualada",
            "--api-key",
            "k",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_valid_code_passes_through() {
        let cli = parse(&["meteospain", "28079", "--api-key", "k"]);
        assert_eq!(resolve_location_code(&cli).unwrap(), "28079");
    }

    #[test]
    fn test_resolve_invalid_code() {
        let cli = parse(&["meteospain", "8019", "--api-key", "k"]);
        let result = resolve_location_code(&cli);
        assert!(matches!(result, Err(CliError::InvalidLocationCode(_))));
    }

    #[test]
    fn test_resolve_without_location() {
        let cli = parse(&["meteospain", "--api-key", "k"]);
        assert!(matches!(
            resolve_location_code(&cli),
            Err(CliError::MissingLocation)
        ));
    }

    #[test]
    fn test_resolve_names_without_dictionary() {
        let cli = parse(&[
            "meteospain",
            "--province",
            "Barcelona",
            "--municipality",
            "Igualada",
            "--api-key",
            "k",
        ]);
        assert!(matches!(
            resolve_location_code(&cli),
            Err(CliError::MissingDictionary)
        ));
    }

    const DICTIONARY: &str = r#"[
        {"CPRO": 8, "CMUN": 19, "NOMBRE": "Barcelona"},
        {"CPRO": 8, "CMUN": 102, "NOMBRE": "Igualada"}
    ]"#;

    #[test]
    fn test_lookup_code_by_names() {
        let code = lookup_code("barcelona", "igualada", DICTIONARY, "dict.json").unwrap();
        assert_eq!(code, "08102");
    }

    #[test]
    fn test_lookup_code_unknown_province() {
        let result = lookup_code("Atlantis", "Igualada", DICTIONARY, "dict.json");
        assert!(matches!(result, Err(CliError::UnknownProvince(_))));
    }

    #[test]
    fn test_lookup_code_unknown_municipality() {
        let result = lookup_code("Barcelona", "Nowhere", DICTIONARY, "dict.json");
        assert!(matches!(result, Err(CliError::UnknownMunicipality(_, _))));
    }

    #[test]
    fn test_lookup_code_bad_dictionary() {
        let result = lookup_code("Barcelona", "Igualada", "not json", "dict.json");
        assert!(matches!(result, Err(CliError::DictionaryParse(_, _))));
    }
}
