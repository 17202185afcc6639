//! Canonical forms for manufacturer, model and serial strings.

/// Serial strings emitted by BIOS/EDID firmware when no real serial was burned in.
const PLACEHOLDER_SERIALS: &[&str] = &[
    "to be filled by o.e.m.",
    "to be filled by oem",
    "default string",
    "0123456789",
    "123456789",
    "none",
    "unknown",
    "not specified",
    "not available",
    "n/a",
    "system serial number",
    "chassis serial number",
    "default_monitor",
    "default monitor",
    "empty",
    "aabbccddeeff",
];

/// Uppercase and trim a serial. Letters are never altered beyond case.
pub fn normalize_serial(serial: &str) -> String {
    serial.trim().to_uppercase()
}

/// Returns true when a serial cannot identify a unit.
///
/// Covers empty values, the known OEM placeholder set, and strings made of a single
/// repeated digit (`0`, `00000000`, `1111111`).
///
/// # Examples
///
/// ```
/// use sniper::matching::is_placeholder_serial;
///
/// assert!(is_placeholder_serial("To Be Filled By O.E.M."));
/// assert!(is_placeholder_serial("  "));
/// assert!(is_placeholder_serial("00000000"));
/// assert!(!is_placeholder_serial("5CG1234XYZ"));
/// ```
pub fn is_placeholder_serial(serial: &str) -> bool {
    let value = serial.trim().to_lowercase();
    if value.is_empty() {
        return true;
    }
    if PLACEHOLDER_SERIALS.contains(&value.as_str()) {
        return true;
    }

    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_digit() => chars.all(|c| c == first),
        _ => false,
    }
}

/// Lowercase, collapse internal whitespace and trim. Used for display-name equality only.
pub fn normalize_model_name(model: &str) -> String {
    model
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strip a brand prefix from a raw monitor model string.
///
/// A leading 2-4 letter all-caps token that differs from the manufacturer name is
/// treated as an EDID vendor code (`PHL`, `GSM`, `SAM`) and removed. Otherwise a
/// leading manufacturer name is removed. The model is returned unchanged when
/// stripping would leave nothing.
///
/// # Examples
///
/// ```
/// use sniper::matching::clean_model_name;
///
/// assert_eq!(clean_model_name("Philips", "PHL 275V8"), "275V8");
/// assert_eq!(clean_model_name("HP", "HP M24fe FHD"), "M24fe FHD");
/// assert_eq!(clean_model_name("Dell", "P2419H"), "P2419H");
/// ```
pub fn clean_model_name(manufacturer: &str, raw_model: &str) -> String {
    let model = raw_model.trim();
    let manufacturer = manufacturer.trim();

    if let Some((first, rest)) = model.split_once(char::is_whitespace) {
        let rest = rest.trim();
        if is_edid_code(first) && !first.eq_ignore_ascii_case(manufacturer) && !rest.is_empty() {
            return rest.to_string();
        }
    }

    if !manufacturer.is_empty() {
        let prefix_len = manufacturer.len();
        if model.len() > prefix_len
            && model.is_char_boundary(prefix_len)
            && model[..prefix_len].eq_ignore_ascii_case(manufacturer)
        {
            let rest = model[prefix_len..].trim_start_matches([' ', '-', '_']).trim();
            // Only strip on a word boundary: "HPX25" is not "HP" + "X25".
            let on_boundary = model[prefix_len..]
                .chars()
                .next()
                .is_some_and(|c| !c.is_alphanumeric());
            if on_boundary && !rest.is_empty() {
                return rest.to_string();
            }
        }
    }

    model.to_string()
}

fn is_edid_code(token: &str) -> bool {
    (2..=4).contains(&token.len()) && token.chars().all(|c| c.is_ascii_uppercase())
}
