use std::fmt;

use serde::{Deserialize, Serialize};

/// Circuits offered in the dashboard's circuit selector.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Circuit {
    AlbertPark,
    Bahrain,
    Imola,
    Miami,
    Catalunya,
    Monaco,
    Baku,
    Montreal,
    RedBullRing,
    Silverstone,
    Hungaroring,
    Spa,
    Zandvoort,
    #[default]
    Monza,
    Singapore,
    Suzuka,
    Austin,
    MexicoCity,
    Interlagos,
    LasVegas,
    YasMarina,
}

impl Circuit {
    pub const ALL: [Circuit; 21] = [
        Circuit::AlbertPark,
        Circuit::Bahrain,
        Circuit::Imola,
        Circuit::Miami,
        Circuit::Catalunya,
        Circuit::Monaco,
        Circuit::Baku,
        Circuit::Montreal,
        Circuit::RedBullRing,
        Circuit::Silverstone,
        Circuit::Hungaroring,
        Circuit::Spa,
        Circuit::Zandvoort,
        Circuit::Monza,
        Circuit::Singapore,
        Circuit::Suzuka,
        Circuit::Austin,
        Circuit::MexicoCity,
        Circuit::Interlagos,
        Circuit::LasVegas,
        Circuit::YasMarina,
    ];

    /// Event identifier handed to the session provider.
    pub fn name(&self) -> &'static str {
        match self {
            Circuit::AlbertPark => "Albert Park",
            Circuit::Bahrain => "Bahrain",
            Circuit::Imola => "Imola",
            Circuit::Miami => "Miami",
            Circuit::Catalunya => "Catalunya",
            Circuit::Monaco => "Monaco",
            Circuit::Baku => "Baku",
            Circuit::Montreal => "Montreal",
            Circuit::RedBullRing => "Red Bull Ring",
            Circuit::Silverstone => "Silverstone",
            Circuit::Hungaroring => "Hungaroring",
            Circuit::Spa => "Spa",
            Circuit::Zandvoort => "Zandvoort",
            Circuit::Monza => "Monza",
            Circuit::Singapore => "Singapore",
            Circuit::Suzuka => "Suzuka",
            Circuit::Austin => "Austin",
            Circuit::MexicoCity => "Mexico City",
            Circuit::Interlagos => "Interlagos",
            Circuit::LasVegas => "Las Vegas",
            Circuit::YasMarina => "Yas Marina",
        }
    }

    pub fn flag(&self) -> &'static str {
        match self {
            Circuit::AlbertPark => "🇦🇺",
            Circuit::Bahrain => "🇧🇭",
            Circuit::Imola | Circuit::Monza => "🇮🇹",
            Circuit::Miami | Circuit::Austin | Circuit::LasVegas => "🇺🇸",
            Circuit::Catalunya => "🇪🇸",
            Circuit::Monaco => "🇲🇨",
            Circuit::Baku => "🇦🇿",
            Circuit::Montreal => "🇨🇦",
            Circuit::RedBullRing => "🇦🇹",
            Circuit::Silverstone => "🇬🇧",
            Circuit::Hungaroring => "🇭🇺",
            Circuit::Spa => "🇧🇪",
            Circuit::Zandvoort => "🇳🇱",
            Circuit::Singapore => "🇸🇬",
            Circuit::Suzuka => "🇯🇵",
            Circuit::MexicoCity => "🇲🇽",
            Circuit::Interlagos => "🇧🇷",
            Circuit::YasMarina => "🇦🇪",
        }
    }

    /// Label shown in the selector, name followed by flag.
    pub fn label(&self) -> String {
        format!("{} {}", self.name(), self.flag())
    }

    pub fn from_label(label: &str) -> Option<Circuit> {
        let label = label.trim();
        Circuit::ALL
            .into_iter()
            .find(|c| c.label() == label || c.name().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
