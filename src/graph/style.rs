use super::Category;

/// Per-category visual attributes plus the repulsion mass the engine uses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CategoryStyle {
    pub color: [u8; 3],
    pub radius: f32,
    pub icon: char,
    pub mass: f32,
}

impl Category {
    pub fn style(self) -> CategoryStyle {
        let (color, radius, icon) = match self {
            Self::Area => ([0x00, 0xd4, 0xc8], 22.0, 'Ⓣ'),
            Self::Target => ([0x8b, 0x5c, 0xf6], 16.0, '◉'),
            Self::Compound => ([0xf5, 0x9e, 0x0b], 18.0, '◈'),
            Self::Paper => ([0x3b, 0x82, 0xf6], 13.0, '▣'),
            Self::Model => ([0x10, 0xb9, 0x81], 17.0, '⬡'),
            Self::Regulator => ([0xf4, 0x3f, 0x5e], 19.0, 'Ⓡ'),
        };

        CategoryStyle {
            color,
            radius,
            icon,
            mass: 1.0,
        }
    }
}

/// Stroke colour for a relation tag; unknown relations fall back to slate.
pub fn relation_color(relation: &str) -> [u8; 3] {
    match relation {
        "INHIBITS" => [0xf4, 0x3f, 0x5e],
        "KEY_TARGET" => [0x00, 0xd4, 0xc8],
        "STUDIES" => [0x3b, 0x82, 0xf6],
        "VALIDATES" => [0x10, 0xb9, 0x81],
        "APPROVED_BY" => [0xf5, 0x9e, 0x0b],
        "PREDICTS_IN" => [0x8b, 0x5c, 0xf6],
        "IN_AREA" => [0x64, 0x74, 0x8b],
        _ => [0x33, 0x41, 0x55],
    }
}
