// Color palette for grouped series and fixed color names

use std::collections::HashMap;

/// Color palette for categorical data
pub struct ColorPalette {
    colors: Vec<String>,
}

impl ColorPalette {
    /// Category10 palette (D3-inspired)
    pub fn category10() -> Self {
        ColorPalette {
            colors: [
                "blue", "orange", "green", "red", "purple", "brown", "pink", "gray", "olive",
                "cyan",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }

    /// Color for an index, wrapping around the palette
    pub fn get_color(&self, index: usize) -> String {
        self.colors[index % self.colors.len()].clone()
    }

    /// Map each group key to a palette color, in the given order
    pub fn assign_colors(&self, group_keys: &[String]) -> HashMap<String, String> {
        group_keys
            .iter()
            .enumerate()
            .map(|(i, key)| (key.clone(), self.get_color(i)))
            .collect()
    }
}

/// Resolve a color name or `#rrggbb` string to RGB
pub fn rgb(name: &str) -> Option<(u8, u8, u8)> {
    let name = name.trim();
    if let Some(hex) = name.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        return Some((channel(0)?, channel(2)?, channel(4)?));
    }

    let rgb = match name.to_ascii_lowercase().as_str() {
        // category10 values
        "blue" => (31, 119, 180),
        "orange" => (255, 127, 14),
        "green" => (44, 160, 44),
        "red" => (214, 39, 40),
        "purple" => (148, 103, 189),
        "brown" => (140, 86, 75),
        "pink" => (227, 119, 194),
        "gray" | "grey" => (127, 127, 127),
        "olive" => (188, 189, 34),
        "cyan" => (23, 190, 207),
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "yellow" => (255, 221, 0),
        _ => return None,
    };
    Some(rgb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_palette_category10() {
        let palette = ColorPalette::category10();
        assert_eq!(palette.get_color(0), "blue");
        assert_eq!(palette.get_color(9), "cyan");
        assert_eq!(palette.get_color(10), "blue");
    }

    #[test]
    fn test_color_palette_assign_colors() {
        let palette = ColorPalette::category10();
        let groups = vec![
            "setosa".to_string(),
            "versicolor".to_string(),
            "virginica".to_string(),
        ];
        let colors = palette.assign_colors(&groups);
        assert_eq!(colors["setosa"], "blue");
        assert_eq!(colors["versicolor"], "orange");
        assert_eq!(colors["virginica"], "green");
    }

    #[test]
    fn test_rgb_named_and_hex() {
        assert_eq!(rgb("blue"), Some((31, 119, 180)));
        assert_eq!(rgb("Grey"), Some((127, 127, 127)));
        assert_eq!(rgb("#ff0080"), Some((255, 0, 128)));
        assert_eq!(rgb("#ff00"), None);
        assert_eq!(rgb("#gg0000"), None);
        assert_eq!(rgb("mauve"), None);
    }

    #[test]
    fn test_every_palette_color_resolves() {
        let palette = ColorPalette::category10();
        for i in 0..10 {
            assert!(rgb(&palette.get_color(i)).is_some());
        }
    }
}
