//! Static reference data for Spanish provinces and municipalities
//!
//! The 52-province table is embedded; the municipality dictionary (~8000
//! entries upstream) is loaded from a caller-supplied JSON file in the INE
//! dictionary format: `[{"CPRO": 8, "CMUN": 19, "NOMBRE": "Barcelona"}, ...]`.

use serde::Deserialize;

/// A Spanish province with its INE code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Province {
    /// INE province code (1-52)
    pub code: u8,
    /// Province name
    pub name: &'static str,
}

/// A municipality entry from the INE dictionary file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Municipality {
    /// INE province code
    #[serde(rename = "CPRO")]
    pub cpro: u8,
    /// INE municipality code within the province
    #[serde(rename = "CMUN")]
    pub cmun: u16,
    /// Municipality name
    #[serde(rename = "NOMBRE")]
    pub name: String,
}

/// Static array of all Spanish provinces, ordered by INE code
pub static PROVINCES: [Province; 52] = [
    Province { code: 1, name: "Araba/Álava" },
    Province { code: 2, name: "Albacete" },
    Province { code: 3, name: "Alicante/Alacant" },
    Province { code: 4, name: "Almería" },
    Province { code: 5, name: "Ávila" },
    Province { code: 6, name: "Badajoz" },
    Province { code: 7, name: "Illes Balears" },
    Province { code: 8, name: "Barcelona" },
    Province { code: 9, name: "Burgos" },
    Province { code: 10, name: "Cáceres" },
    Province { code: 11, name: "Cádiz" },
    Province { code: 12, name: "Castellón/Castelló" },
    Province { code: 13, name: "Ciudad Real" },
    Province { code: 14, name: "Córdoba" },
    Province { code: 15, name: "A Coruña" },
    Province { code: 16, name: "Cuenca" },
    Province { code: 17, name: "Girona" },
    Province { code: 18, name: "Granada" },
    Province { code: 19, name: "Guadalajara" },
    Province { code: 20, name: "Gipuzkoa" },
    Province { code: 21, name: "Huelva" },
    Province { code: 22, name: "Huesca" },
    Province { code: 23, name: "Jaén" },
    Province { code: 24, name: "León" },
    Province { code: 25, name: "Lleida" },
    Province { code: 26, name: "La Rioja" },
    Province { code: 27, name: "Lugo" },
    Province { code: 28, name: "Madrid" },
    Province { code: 29, name: "Málaga" },
    Province { code: 30, name: "Murcia" },
    Province { code: 31, name: "Navarra" },
    Province { code: 32, name: "Ourense" },
    Province { code: 33, name: "Asturias" },
    Province { code: 34, name: "Palencia" },
    Province { code: 35, name: "Las Palmas" },
    Province { code: 36, name: "Pontevedra" },
    Province { code: 37, name: "Salamanca" },
    Province { code: 38, name: "Santa Cruz de Tenerife" },
    Province { code: 39, name: "Cantabria" },
    Province { code: 40, name: "Segovia" },
    Province { code: 41, name: "Sevilla" },
    Province { code: 42, name: "Soria" },
    Province { code: 43, name: "Tarragona" },
    Province { code: 44, name: "Teruel" },
    Province { code: 45, name: "Toledo" },
    Province { code: 46, name: "Valencia/València" },
    Province { code: 47, name: "Valladolid" },
    Province { code: 48, name: "Bizkaia" },
    Province { code: 49, name: "Zamora" },
    Province { code: 50, name: "Zaragoza" },
    Province { code: 51, name: "Ceuta" },
    Province { code: 52, name: "Melilla" },
];

/// Get a province by its INE code
pub fn get_province_by_code(code: u8) -> Option<&'static Province> {
    PROVINCES.iter().find(|p| p.code == code)
}

/// Find a province by name, case-insensitively
///
/// Bilingual province names are stored as "A/B"; either half matches.
pub fn find_province(name: &str) -> Option<&'static Province> {
    let wanted = name.trim().to_lowercase();
    PROVINCES.iter().find(|p| {
        p.name.to_lowercase() == wanted
            || p.name
                .split('/')
                .any(|variant| variant.to_lowercase() == wanted)
    })
}

/// Parses the INE municipality dictionary from its JSON text
pub fn load_municipalities(json: &str) -> Result<Vec<Municipality>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Returns the municipalities of one province, sorted by name
pub fn municipalities_for_province(
    municipalities: &[Municipality],
    cpro: u8,
) -> Vec<&Municipality> {
    let mut subset: Vec<&Municipality> =
        municipalities.iter().filter(|m| m.cpro == cpro).collect();
    subset.sort_by(|a, b| a.name.cmp(&b.name));
    subset
}

/// Find a municipality of a province by name, case-insensitively
pub fn find_municipality<'a>(
    municipalities: &'a [Municipality],
    cpro: u8,
    name: &str,
) -> Option<&'a Municipality> {
    let wanted = name.trim().to_lowercase();
    municipalities
        .iter()
        .find(|m| m.cpro == cpro && m.name.to_lowercase() == wanted)
}

/// Builds the 5-digit location code used as the forecast API path key
///
/// Province 8 + municipality 19 yield "08019".
pub fn location_code(cpro: u8, cmun: u16) -> String {
    format!("{cpro:02}{cmun:03}")
}

/// Checks that a directly supplied location code is exactly 5 ASCII digits
pub fn is_valid_location_code(code: &str) -> bool {
    code.len() == 5 && code.bytes().all(|b| b.is_ascii_digit())
}
