//! Presentation helpers used by the view-models and the UI (formatting, lookups, images).
//! Everything here is pure so it can be unit tested without a terminal or network.

use crate::config::Locale;

/// Theoretical maximum of a single base stat; bars are scaled against it.
pub const STAT_MAX: u32 = 255;

/// Color used for unknown types and for records without types.
pub const DEFAULT_TYPE_COLOR: &str = "#68A090";

/// Capitalize the first character of a catalog name.
///
/// Examples: `bulbasaur` -> `Bulbasaur`, `mr-mime` -> `Mr-mime`.
pub fn format_name(name: &str) -> String {
    let mut chs = name.chars();
    match chs.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chs.as_str(),
    }
}

/// Hectograms to kilograms, one decimal place.
pub fn format_weight(weight: u32) -> String {
    format!("{:.1}", weight as f64 / 10.0)
}

/// Decimetres to metres, one decimal place.
pub fn format_height(height: u32) -> String {
    format!("{:.1}", height as f64 / 10.0)
}

/// Fill fraction of a stat bar, clamped to 1.0.
pub fn stat_fraction(value: u32) -> f64 {
    (value as f64 / STAT_MAX as f64).min(1.0)
}

pub fn type_color(type_name: &str) -> &'static str {
    match type_name {
        "normal" => "#A8A878",
        "fire" => "#F08030",
        "water" => "#6890F0",
        "electric" => "#F8D030",
        "grass" => "#78C850",
        "ice" => "#98D8D8",
        "fighting" => "#C03028",
        "poison" => "#A040A0",
        "ground" => "#E0C068",
        "flying" => "#A890F0",
        "psychic" => "#F85888",
        "bug" => "#A8B820",
        "rock" => "#B8A038",
        "ghost" => "#705898",
        "dragon" => "#7038F8",
        "dark" => "#705848",
        "steel" => "#B8B8D0",
        "fairy" => "#EE99AC",
        _ => DEFAULT_TYPE_COLOR,
    }
}

/// Parse a `#RRGGBB` string into components. Malformed input yields `None`.
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let h = hex.strip_prefix('#')?;
    if h.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&h[0..2], 16).ok()?;
    let g = u8::from_str_radix(&h[2..4], 16).ok()?;
    let b = u8::from_str_radix(&h[4..6], 16).ok()?;
    Some((r, g, b))
}

pub fn type_rgb(type_name: &str) -> (u8, u8, u8) {
    hex_to_rgb(type_color(type_name)).unwrap_or((104, 160, 144))
}

/// Display label for a stat. Unknown stat names are returned as-is.
pub fn stat_label(stat_name: &str, locale: Locale) -> String {
    let label = match (locale, stat_name) {
        (Locale::En, "hp") => "HP",
        (Locale::En, "attack") => "Attack",
        (Locale::En, "defense") => "Defense",
        (Locale::En, "special-attack") => "Sp. Atk",
        (Locale::En, "special-defense") => "Sp. Def",
        (Locale::En, "speed") => "Speed",
        (Locale::Es, "hp") => "PS",
        (Locale::Es, "attack") => "Ataque",
        (Locale::Es, "defense") => "Defensa",
        (Locale::Es, "special-attack") => "At. Esp.",
        (Locale::Es, "special-defense") => "Def. Esp.",
        (Locale::Es, "speed") => "Velocidad",
        (_, other) => other,
    };
    label.to_string()
}

/// Pull the numeric id out of a resource URL like `.../pokemon/25/`. The id
/// must be followed by a slash. Returns 0 if absent.
pub fn extract_id_from_url(url: &str) -> u32 {
    url.split("/pokemon/")
        .skip(1)
        .find_map(|rest| {
            let (digits, _) = rest.split_once('/')?;
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            digits.parse().ok()
        })
        .unwrap_or(0)
}

pub fn share_text(name: &str, id: u32, locale: Locale) -> String {
    match locale {
        Locale::En => format!("Check out this Pokémon! {} #{:03}", format_name(name), id),
        Locale::Es => format!("¡Mira este Pokémon! {} #{:03}", format_name(name), id),
    }
}

/// Edge length of the sprite thumbnails kept in memory.
pub const THUMB_SIZE: u32 = 48;

/// Decode image bytes into a square RGBA thumbnail. Non-images yield `None`.
pub fn decode_thumb(bytes: &[u8]) -> Option<image::RgbaImage> {
    let img = image::load_from_memory(bytes).ok()?.to_rgba8();
    Some(image::imageops::resize(
        &img,
        THUMB_SIZE,
        THUMB_SIZE,
        image::imageops::FilterType::Lanczos3,
    ))
}

/// Resize `thumb` to `w` x `h` and return RGB rows for block rendering.
pub fn sprite_rows(thumb: &image::RgbaImage, w: u32, h: u32) -> Vec<Vec<(u8, u8, u8)>> {
    let resized = image::imageops::resize(thumb, w, h, image::imageops::FilterType::Triangle);
    let mut rows: Vec<Vec<(u8, u8, u8)>> = Vec::with_capacity(resized.height() as usize);
    for y in 0..resized.height() {
        let mut row = Vec::with_capacity(resized.width() as usize);
        for x in 0..resized.width() {
            let p = resized.get_pixel(x, y);
            // transparent pixels render as the terminal background
            if p[3] < 32 {
                row.push((0, 0, 0));
            } else {
                row.push((p[0], p[1], p[2]));
            }
        }
        rows.push(row);
    }
    rows
}
