use serde::{Deserialize, Serialize};

/// Museum category. The wire value doubles as the `museum_type` list filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MuseumType {
    MemorialReserve,
    HistoricalMemorialReserve,
    Art,
    MuseumReserve,
    Estate,
    PalaceParkEnsemble,
    HistoricalArchitecturalReserve,
}

impl MuseumType {
    pub const ALL: &'static [MuseumType] = &[
        MuseumType::MemorialReserve,
        MuseumType::HistoricalMemorialReserve,
        MuseumType::Art,
        MuseumType::MuseumReserve,
        MuseumType::Estate,
        MuseumType::PalaceParkEnsemble,
        MuseumType::HistoricalArchitecturalReserve,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MemorialReserve => "memorial_reserve",
            Self::HistoricalMemorialReserve => "historical_memorial_reserve",
            Self::Art => "art",
            Self::MuseumReserve => "museum_reserve",
            Self::Estate => "estate",
            Self::PalaceParkEnsemble => "palace_park_ensemble",
            Self::HistoricalArchitecturalReserve => "historical_architectural_reserve",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase().replace('-', "_");
        Self::ALL.iter().copied().find(|t| t.as_str() == s)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::MemorialReserve => "Memorial reserve museum",
            Self::HistoricalMemorialReserve => "Historical memorial reserve",
            Self::Art => "Art museum",
            Self::MuseumReserve => "Museum reserve",
            Self::Estate => "Estate museum",
            Self::PalaceParkEnsemble => "Palace and park ensemble",
            Self::HistoricalArchitecturalReserve => "Historical architectural reserve",
        }
    }

    /// Next category in display order, `None` after the last one.
    /// Used to cycle the list filter through "all" and every category.
    pub fn cycle(current: Option<Self>) -> Option<Self> {
        match current {
            None => Some(Self::ALL[0]),
            Some(t) => {
                let idx = Self::ALL.iter().position(|x| *x == t).unwrap_or(0);
                Self::ALL.get(idx + 1).copied()
            }
        }
    }
}

/// A museum registered under an owning organization.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Museum {
    pub id: i64,
    /// Organization id; not checked client-side
    pub id_owner: i64,
    pub inn: String,
    pub kpp: Option<String>,
    pub founder: Option<String>,
    pub museum_activity_in_charter: bool,
    pub name: String,
    pub museum_legal_status: Option<String>,
    pub is_memorial_reserve_museum: bool,
    pub is_historical_memorial_reserve: bool,
    pub is_art_museum: bool,
    pub is_museum_reserve: bool,
    pub is_estate_museum: bool,
    pub is_palace_park_ensemble: bool,
    pub is_historical_architectural_reserve: bool,
    pub annual_visitor_capacity: Option<i64>,
    pub internal_visitors_count: Option<i64>,
    pub external_visitors_count: Option<i64>,
    pub is_valuable_cultural_heritage: bool,
    pub valuable_museum_items_count: Option<i64>,
}

impl Museum {
    pub fn has_type(&self, museum_type: MuseumType) -> bool {
        match museum_type {
            MuseumType::MemorialReserve => self.is_memorial_reserve_museum,
            MuseumType::HistoricalMemorialReserve => self.is_historical_memorial_reserve,
            MuseumType::Art => self.is_art_museum,
            MuseumType::MuseumReserve => self.is_museum_reserve,
            MuseumType::Estate => self.is_estate_museum,
            MuseumType::PalaceParkEnsemble => self.is_palace_park_ensemble,
            MuseumType::HistoricalArchitecturalReserve => self.is_historical_architectural_reserve,
        }
    }

    /// Category labels in display order, heritage flag last.
    pub fn type_labels(&self) -> Vec<&'static str> {
        let mut labels: Vec<&'static str> = MuseumType::ALL
            .iter()
            .filter(|t| self.has_type(**t))
            .map(|t| t.label())
            .collect();
        if self.is_valuable_cultural_heritage {
            labels.push("Valuable cultural heritage");
        }
        labels
    }

    /// Visitor and collection counts with their labels
    pub fn stats(&self) -> [(&'static str, Option<i64>); 4] {
        [
            ("Visitor capacity", self.annual_visitor_capacity),
            ("Internal visitors", self.internal_visitors_count),
            ("External visitors", self.external_visitors_count),
            ("Valuable museum items", self.valuable_museum_items_count),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CreateMuseum {
    pub id_owner: i64,
    pub inn: String,
    pub kpp: Option<String>,
    pub founder: Option<String>,
    pub museum_activity_in_charter: bool,
    pub name: String,
    pub museum_legal_status: Option<String>,
    pub is_memorial_reserve_museum: bool,
    pub is_historical_memorial_reserve: bool,
    pub is_art_museum: bool,
    pub is_museum_reserve: bool,
    pub is_estate_museum: bool,
    pub is_palace_park_ensemble: bool,
    pub is_historical_architectural_reserve: bool,
    pub annual_visitor_capacity: Option<i64>,
    pub internal_visitors_count: Option<i64>,
    pub external_visitors_count: Option<i64>,
    pub is_valuable_cultural_heritage: bool,
    pub valuable_museum_items_count: Option<i64>,
}

impl CreateMuseum {
    pub fn set_type(&mut self, museum_type: MuseumType, value: bool) {
        let flag = match museum_type {
            MuseumType::MemorialReserve => &mut self.is_memorial_reserve_museum,
            MuseumType::HistoricalMemorialReserve => &mut self.is_historical_memorial_reserve,
            MuseumType::Art => &mut self.is_art_museum,
            MuseumType::MuseumReserve => &mut self.is_museum_reserve,
            MuseumType::Estate => &mut self.is_estate_museum,
            MuseumType::PalaceParkEnsemble => &mut self.is_palace_park_ensemble,
            MuseumType::HistoricalArchitecturalReserve => {
                &mut self.is_historical_architectural_reserve
            }
        };
        *flag = value;
    }

    pub fn into_update(self, id: i64) -> UpdateMuseum {
        UpdateMuseum { id, museum: self }
    }
}

/// Update payload: the create fields plus the museum id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateMuseum {
    pub id: i64,
    #[serde(flatten)]
    pub museum: CreateMuseum,
}

impl From<&Museum> for CreateMuseum {
    fn from(m: &Museum) -> Self {
        Self {
            id_owner: m.id_owner,
            inn: m.inn.clone(),
            kpp: m.kpp.clone(),
            founder: m.founder.clone(),
            museum_activity_in_charter: m.museum_activity_in_charter,
            name: m.name.clone(),
            museum_legal_status: m.museum_legal_status.clone(),
            is_memorial_reserve_museum: m.is_memorial_reserve_museum,
            is_historical_memorial_reserve: m.is_historical_memorial_reserve,
            is_art_museum: m.is_art_museum,
            is_museum_reserve: m.is_museum_reserve,
            is_estate_museum: m.is_estate_museum,
            is_palace_park_ensemble: m.is_palace_park_ensemble,
            is_historical_architectural_reserve: m.is_historical_architectural_reserve,
            annual_visitor_capacity: m.annual_visitor_capacity,
            internal_visitors_count: m.internal_visitors_count,
            external_visitors_count: m.external_visitors_count,
            is_valuable_cultural_heritage: m.is_valuable_cultural_heritage,
            valuable_museum_items_count: m.valuable_museum_items_count,
        }
    }
}
