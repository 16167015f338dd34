//! crates/slidecraft_core/src/theme.rs
//!
//! The fixed palette of named themes and the resolver that maps a
//! presentation's brand colours onto it.

use crate::domain::SlideColors;

/// A named theme: the brand colour pair that selects it and the slide colours it supplies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePreset {
    pub name: &'static str,
    pub primary_color: &'static str,
    pub secondary_color: &'static str,
    pub background_color: &'static str,
    pub text_color: &'static str,
    pub heading_color: &'static str,
}

impl ThemePreset {
    pub fn colors(&self) -> SlideColors {
        SlideColors {
            background_color: self.background_color.to_string(),
            text_color: self.text_color.to_string(),
            heading_color: self.heading_color.to_string(),
        }
    }

    fn matches(&self, primary: &str, secondary: &str) -> bool {
        self.primary_color.eq_ignore_ascii_case(primary.trim())
            && self.secondary_color.eq_ignore_ascii_case(secondary.trim())
    }
}

pub const LIGHT: ThemePreset = ThemePreset {
    name: "light",
    primary_color: "#3B82F6",
    secondary_color: "#1E40AF",
    background_color: "#FFFFFF",
    text_color: "#1F2937",
    heading_color: "#111827",
};

/// Every preset, in picker order. The single source for resolver and UI alike.
pub static THEME_PRESETS: [ThemePreset; 7] = [
    LIGHT,
    ThemePreset {
        name: "dark",
        primary_color: "#6366F1",
        secondary_color: "#4F46E5",
        background_color: "#1F2937",
        text_color: "#F9FAFB",
        heading_color: "#FFFFFF",
    },
    ThemePreset {
        name: "midnight",
        primary_color: "#8B5CF6",
        secondary_color: "#6D28D9",
        background_color: "#0F172A",
        text_color: "#E2E8F0",
        heading_color: "#F8FAFC",
    },
    ThemePreset {
        name: "forest",
        primary_color: "#10B981",
        secondary_color: "#047857",
        background_color: "#F0FDF4",
        text_color: "#14532D",
        heading_color: "#166534",
    },
    ThemePreset {
        name: "sunset",
        primary_color: "#F97316",
        secondary_color: "#DC2626",
        background_color: "#FFF7ED",
        text_color: "#7C2D12",
        heading_color: "#9A3412",
    },
    ThemePreset {
        name: "ocean",
        primary_color: "#0EA5E9",
        secondary_color: "#0369A1",
        background_color: "#F0F9FF",
        text_color: "#0C4A6E",
        heading_color: "#075985",
    },
    ThemePreset {
        name: "corporate",
        primary_color: "#1E3A8A",
        secondary_color: "#64748B",
        background_color: "#F8FAFC",
        text_color: "#334155",
        heading_color: "#1E3A8A",
    },
];

/// The outcome of resolving a colour pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedTheme {
    /// The pair matched one of the named presets.
    Preset(&'static ThemePreset),
    /// Nothing matched; the light preset applies.
    Default,
}

impl ResolvedTheme {
    pub fn preset(&self) -> &'static ThemePreset {
        match self {
            ResolvedTheme::Preset(preset) => preset,
            ResolvedTheme::Default => &THEME_PRESETS[0],
        }
    }

    pub fn colors(&self) -> SlideColors {
        self.preset().colors()
    }
}

/// Maps a brand colour pair to the theme whose slide colours new slides inherit.
///
/// Total: an unmatched pair is the default branch, never an error.
pub fn resolve_theme_defaults(primary_color: &str, secondary_color: &str) -> ResolvedTheme {
    THEME_PRESETS
        .iter()
        .find(|preset| preset.matches(primary_color, secondary_color))
        .map(ResolvedTheme::Preset)
        .unwrap_or(ResolvedTheme::Default)
}

pub fn find_preset(name: &str) -> Option<&'static ThemePreset> {
    THEME_PRESETS
        .iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_preset_resolves_to_itself() {
        for preset in THEME_PRESETS.iter() {
            let resolved = resolve_theme_defaults(preset.primary_color, preset.secondary_color);
            assert_eq!(resolved, ResolvedTheme::Preset(preset));
            assert_eq!(resolved.colors(), preset.colors());
        }
    }

    #[test]
    fn unmatched_pair_falls_back_to_light() {
        let resolved = resolve_theme_defaults("#123456", "#654321");
        assert_eq!(resolved, ResolvedTheme::Default);
        assert_eq!(resolved.colors(), LIGHT.colors());
    }

    #[test]
    fn swapped_pair_does_not_match() {
        let ocean = find_preset("ocean").unwrap();
        let resolved = resolve_theme_defaults(ocean.secondary_color, ocean.primary_color);
        assert_eq!(resolved, ResolvedTheme::Default);
    }

    #[test]
    fn hex_case_is_ignored() {
        let resolved = resolve_theme_defaults("#10b981", " #047857 ");
        assert_eq!(resolved.preset().name, "forest");
    }

    #[test]
    fn resolver_has_exactly_eight_outcomes() {
        let mut inputs: Vec<(String, String)> = THEME_PRESETS
            .iter()
            .map(|p| (p.primary_color.to_string(), p.secondary_color.to_string()))
            .collect();
        inputs.push(("".into(), "".into()));
        inputs.push(("not a colour".into(), "#FFFFFF".into()));
        inputs.push(("#000000".into(), "#000000".into()));

        let outcomes: HashSet<String> = inputs
            .iter()
            .map(|(p, s)| match resolve_theme_defaults(p, s) {
                ResolvedTheme::Preset(preset) => preset.name.to_string(),
                ResolvedTheme::Default => "default".to_string(),
            })
            .collect();
        assert_eq!(outcomes.len(), 8);
    }

    #[test]
    fn preset_names_are_unique() {
        let names: HashSet<&str> = THEME_PRESETS.iter().map(|p| p.name).collect();
        assert_eq!(names.len(), THEME_PRESETS.len());
    }
}
