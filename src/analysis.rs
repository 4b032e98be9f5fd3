use std::fmt;

/// Entries of the analysis menu, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Analysis {
    #[default]
    DatasetOverview,
    PassengerSex,
    PassengerClass,
    EmbarkationPort,
    PassengerName,
    AgeVsFare,
    Survival,
    All,
}

/// One renderable dashboard section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Overview,
    Sex,
    Class,
    Ports,
    Names,
    AgeFare,
    Survival,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::Overview,
        Section::Sex,
        Section::Class,
        Section::Ports,
        Section::Names,
        Section::AgeFare,
        Section::Survival,
    ];
}

impl Analysis {
    pub const MENU: [Analysis; 8] = [
        Analysis::DatasetOverview,
        Analysis::PassengerSex,
        Analysis::PassengerClass,
        Analysis::EmbarkationPort,
        Analysis::PassengerName,
        Analysis::AgeVsFare,
        Analysis::Survival,
        Analysis::All,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Analysis::DatasetOverview => "Dataset Overview",
            Analysis::PassengerSex => "Passenger Sex Analysis",
            Analysis::PassengerClass => "Passenger Class Analysis",
            Analysis::EmbarkationPort => "Embarkation Port Analysis",
            Analysis::PassengerName => "Passenger Name Analysis",
            Analysis::AgeVsFare => "Age vs Fare Analysis",
            Analysis::Survival => "Survival Analysis",
            Analysis::All => "All Analyses",
        }
    }

    /// Sections to render for this selection, top to bottom.
    pub fn sections(self) -> Vec<Section> {
        match self {
            Analysis::DatasetOverview => vec![Section::Overview],
            Analysis::PassengerSex => vec![Section::Sex],
            Analysis::PassengerClass => vec![Section::Class],
            Analysis::EmbarkationPort => vec![Section::Ports],
            Analysis::PassengerName => vec![Section::Names],
            Analysis::AgeVsFare => vec![Section::AgeFare],
            Analysis::Survival => vec![Section::Survival],
            Analysis::All => Section::ALL.to_vec(),
        }
    }
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
