//! Layout domain types

use serde::{Deserialize, Serialize};

/// Stock layouts, in the order they are offered to operators.
const DEFAULT_LAYOUTS: &[(&str, &str)] = &[
    ("4:3 1 Player", "4_3"),
    ("4:3 2 Player", "4_3_2p"),
    ("4:3 3 Player", "4_3_3p"),
    ("4:3 4 Player (Currently unused)", "4_3-4p"),
    ("16:9 1 Player", "16_9"),
    ("16:9 2 Player (Currently unused)", "16_9_2p"),
    ("16:9 3 Player", "16_9_3p"),
    ("16:9 4 Player (Currently unused)", "16_9_4p"),
    ("3:2 1 Player", "3_2"),
    ("9:16 2 Player", "9_16_2p"),
];

/// A video layout preset
///
/// `name` is the label shown to operators, `code` is the stable identifier
/// used by graphics and run data. Codes are matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutDescriptor {
    pub name: String,
    pub code: String,
}

impl LayoutDescriptor {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }

    /// Whether `code` identifies this layout. An empty code never matches.
    pub fn matches(&self, code: &str) -> bool {
        !code.is_empty() && self.code.to_lowercase() == code.to_lowercase()
    }
}

impl std::fmt::Display for LayoutDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

/// Returns the stock layout catalog.
pub fn default_layouts() -> Vec<LayoutDescriptor> {
    DEFAULT_LAYOUTS
        .iter()
        .map(|(name, code)| LayoutDescriptor::new(*name, *code))
        .collect()
}

/// Case-insensitive lookup by code.
pub fn find_layout<'a>(layouts: &'a [LayoutDescriptor], code: &str) -> Option<&'a LayoutDescriptor> {
    layouts.iter().find(|layout| layout.matches(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layouts_have_unique_codes() {
        let layouts = default_layouts();
        assert_eq!(layouts.len(), 10);
        for (i, a) in layouts.iter().enumerate() {
            for b in &layouts[i + 1..] {
                assert!(!a.matches(&b.code), "{} duplicates {}", a, b);
            }
        }
    }

    #[test]
    fn test_find_layout_ignores_case() {
        let layouts = default_layouts();
        for layout in &layouts {
            let upper = find_layout(&layouts, &layout.code.to_uppercase());
            let exact = find_layout(&layouts, &layout.code);
            assert_eq!(upper, Some(layout));
            assert_eq!(exact, upper);
        }
    }

    #[test]
    fn test_find_layout_empty_code() {
        let layouts = default_layouts();
        assert!(find_layout(&layouts, "").is_none());
        assert!(find_layout(&layouts, "21_9").is_none());
    }
}
