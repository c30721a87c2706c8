// Category -> color resolution

/// Color for labels the fixed map does not know
pub const DEFAULT_COLOR: &str = "#888888";

/// Fixed party colors
pub const PARTY_COLORS: &[(&str, &str)] = &[
    ("CDU/CSU", "#000000"),
    ("CSU", "#008AC5"),
    ("SPD", "#E3000F"),
    ("FDP", "#FFED00"),
    ("AfD", "#009EE0"),
    ("Grüne", "#1AA037"),
    ("BSW", "#7E234F"),
    ("Bündnis 90/Die Grünen", "#1AA037"),
    ("Die Linke", "#BE3075"),
    ("LINKE", "#BE3075"),
    ("Freie Wähler", "#FF8C00"),
    ("PIRATEN", "#FF8800"),
    ("Andere", "#C0C0C0"),
    ("Sonstige", "#A0A0A0"),
];

/// Qualitative colorway for charts without a fixed map
pub const QUALITATIVE_COLORS: &[&str] = &[
    "#636EFA", "#EF553B", "#00CC96", "#AB63FA", "#FFA15A",
    "#19D3F3", "#FF6692", "#B6E880", "#FF97FF", "#FECB52",
];

/// Colors for a list of labels plus the order they must be displayed in.
/// `colors[i]` belongs to `order[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorAssignment {
    pub colors: Vec<String>,
    pub order: Vec<String>,
}

impl ColorAssignment {
    pub fn color_of(&self, label: &str) -> Option<&str> {
        self.order
            .iter()
            .position(|l| l == label)
            .map(|idx| self.colors[idx].as_str())
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order.iter().map(String::as_str).zip(self.colors.iter().map(String::as_str))
    }
}

/// Read-only color source
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorPalette {
    /// Label lookup with a single fallback color
    Fixed {
        map: &'static [(&'static str, &'static str)],
        default: &'static str,
    },
    /// Colors handed out by position, wrapping around
    Cycle(&'static [&'static str]),
}

impl ColorPalette {
    pub const fn party() -> Self {
        ColorPalette::Fixed { map: PARTY_COLORS, default: DEFAULT_COLOR }
    }

    pub const fn qualitative() -> Self {
        ColorPalette::Cycle(QUALITATIVE_COLORS)
    }

    /// Color for the label at `index` of the display order
    pub fn color_for(&self, label: &str, index: usize) -> &'static str {
        match self {
            ColorPalette::Fixed { map, default } => map
                .iter()
                .find(|(known, _)| *known == label)
                .map(|(_, color)| *color)
                .unwrap_or(*default),
            ColorPalette::Cycle(colors) if colors.is_empty() => DEFAULT_COLOR,
            ColorPalette::Cycle(colors) => colors[index % colors.len()],
        }
    }

    /// Resolve a color per label and freeze the display order
    pub fn assign_colors(&self, labels: &[String]) -> ColorAssignment {
        let colors = labels
            .iter()
            .enumerate()
            .map(|(i, label)| self.color_for(label, i).to_string())
            .collect();
        ColorAssignment { colors, order: labels.to_vec() }
    }
}
