use serde::{Deserialize, Serialize};

use crate::session::Compound;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const YELLOW: Rgb = Rgb::new(255, 255, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const GREEN: Rgb = Rgb::new(0, 128, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);
    pub const GRAY: Rgb = Rgb::new(128, 128, 128);
    pub const GOLD: Rgb = Rgb::new(255, 215, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

pub fn compound_color(compound: Compound) -> Rgb {
    match compound {
        Compound::Soft => Rgb::RED,
        Compound::Medium => Rgb::YELLOW,
        Compound::Hard => Rgb::WHITE,
        Compound::Intermediate => Rgb::GREEN,
        Compound::Wet => Rgb::BLUE,
        Compound::Unknown => Rgb::GRAY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_colors_are_distinct() {
        let colors = Compound::ALL.map(compound_color);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(compound_color(Compound::Unknown), Rgb::GRAY);
    }
}
