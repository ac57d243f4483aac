//! Display names for the ONS electrical subsystems.

/// Code to display name, as published by ONS. Presentation only: row
/// filtering always uses the raw codes as they appear in the data.
static SUBSYSTEM_NAMES: &[(&str, &str)] = &[
    ("NE", "Nordeste"),
    ("SE", "Sudeste/Centro-Oeste"),
    ("N", "Norte"),
    ("S", "Sul"),
    ("SIN", "Sistema Interligado Nacional"),
];

/// Human-readable name for a subsystem code, falling back to the raw code
/// when unmapped.
pub fn display_name(code: &str) -> &str {
    SUBSYSTEM_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or(code)
}
