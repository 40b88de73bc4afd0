//! Bundled language definitions.

use crate::config::parse_language_toml;
use crate::transcriber::OrthoPhonology;

/// TOML source of the bundled Gothic definition.
pub const GOTHIC_TOML: &str = include_str!("gothic.toml");

/// Names accepted by [`by_name`].
pub const NAMES: &[&str] = &["gothic"];

/// Gothic, with velar nasal assimilation, spirantization, fricative voicing
/// and final devoicing.
pub fn gothic() -> OrthoPhonology {
    parse_language_toml(GOTHIC_TOML).expect("bundled Gothic definition must be valid")
}

/// Look up a bundled language by name (case-insensitive).
pub fn by_name(name: &str) -> Option<OrthoPhonology> {
    match name.to_ascii_lowercase().as_str() {
        "gothic" | "got" => Some(gothic()),
        _ => None,
    }
}
