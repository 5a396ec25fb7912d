//! Formatting helpers shared by the alerts and the terminal UI.

/// Format a Pokémon `name` into a human-friendly form.
///
/// Examples: `mr-mime` -> `Mr Mime`, `ho_oh` -> `Ho Oh`.
pub fn format_name(name: &str) -> String {
    let replaced = name.replace('-', " ").replace('_', " ");
    let parts: Vec<String> = replaced
        .split_whitespace()
        .map(|w| {
            let mut chs = w.chars();
            match chs.next() {
                None => String::new(),
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chs.as_str().to_lowercase()
                }
            }
        })
        .collect();
    parts.join(" ")
}

/// Uppercase the first character only: `mr-mime` -> `Mr-mime`.
pub fn capitalize(s: &str) -> String {
    let mut chs = s.chars();
    match chs.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chs.as_str(),
    }
}

/// Zero-padded catalog number: `25` -> `#025`.
pub fn format_id(id: u32) -> String {
    format!("#{:03}", id)
}

/// Catalog measurements are tenths of a unit: `69` -> `6.9`.
pub fn format_tenths(value: u32) -> String {
    format!("{}.{}", value / 10, value % 10)
}

/// Background colour for a type badge.
pub fn type_color(kind: &str) -> (u8, u8, u8) {
    match kind.to_lowercase().as_str() {
        "normal" => (168, 168, 120),
        "fire" => (240, 128, 48),
        "water" => (104, 144, 240),
        "grass" => (120, 200, 80),
        "electric" => (248, 208, 48),
        "ice" => (152, 216, 216),
        "fighting" => (192, 48, 40),
        "poison" => (160, 64, 160),
        "ground" => (224, 192, 104),
        "flying" => (168, 144, 240),
        "psychic" => (248, 88, 136),
        "bug" => (168, 184, 32),
        "rock" => (184, 160, 56),
        "ghost" => (112, 88, 152),
        "dragon" => (112, 56, 248),
        "dark" => (112, 88, 72),
        "steel" => (184, 184, 208),
        "fairy" => (238, 153, 172),
        _ => (200, 200, 200),
    }
}

/// Black or white, whichever reads better on `(r, g, b)`.
pub fn contrast_is_dark(r: u8, g: u8, b: u8) -> bool {
    let lum = 0.2126 * (r as f32) + 0.7152 * (g as f32) + 0.0722 * (b as f32);
    lum > 160.0
}
