//! Font descriptor for the lock screen text.

/// Font configuration for text rendering.
///
/// Describes which font to use by family name, weight, and point size. The
/// lock screen loads exactly one font for its whole lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    /// Font family name (e.g., "Monospace", "Sans", "JetBrains Mono")
    pub family: String,

    /// Font weight (e.g., "normal", "bold", "light" or numeric 100-900)
    pub weight: String,

    /// Point size
    pub size: f64,
}

impl FontDescriptor {
    /// Creates a new font descriptor with the specified parameters.
    pub fn new(family: String, weight: String, size: f64) -> Self {
        Self {
            family,
            weight,
            size,
        }
    }

    /// Converts this font descriptor to a Pango font description string.
    ///
    /// Format: "Family Weight Size", e.g. "Monospace Bold 42"
    pub fn to_pango_string(&self) -> String {
        let mut parts = vec![self.family.clone()];

        if !self.weight.eq_ignore_ascii_case("normal") {
            parts.push(capitalize_first(&self.weight));
        }

        parts.push(format!("{}", self.size.round() as i32));

        parts.join(" ")
    }

    /// Builds the Pango description used for every layout on the lock surface.
    pub fn to_pango(&self) -> pango::FontDescription {
        pango::FontDescription::from_string(&self.to_pango_string())
    }
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self {
            family: "Monospace".to_string(),
            weight: "bold".to_string(),
            size: 42.0,
        }
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}
