use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// One decklist as EDHREC serves it: lines of `"<qty> <card name>"`.
pub type Deck = Vec<String>;

/// Card name to total quantity across all analyzed decks.
pub type CardCounts = HashMap<String, u32>;

fn default_max_decks() -> usize {
    20
}

fn default_max_price() -> f64 {
    500.0
}

/// Parameters of a single analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRequest {
    pub commander: String,
    #[serde(default = "default_max_decks")]
    pub max_decks: usize,
    #[serde(default)]
    pub min_price: f64,
    #[serde(default = "default_max_price")]
    pub max_price: f64,
}

impl RunRequest {
    pub fn new(commander: impl Into<String>) -> Self {
        Self {
            commander: commander.into(),
            max_decks: default_max_decks(),
            min_price: 0.0,
            max_price: default_max_price(),
        }
    }

    pub fn with_max_decks(mut self, max_decks: usize) -> Self {
        self.max_decks = max_decks;
        self
    }

    pub fn with_price_range(mut self, min_price: f64, max_price: f64) -> Self {
        self.min_price = min_price;
        self.max_price = max_price;
        self
    }
}

/// A row of the EDHREC deck table. Unused columns are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckEntry {
    pub urlhash: String,
    pub savedate: String,
    pub price: f64,
}

impl DeckEntry {
    pub fn saved_on(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.savedate, "%Y-%m-%d").ok()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeckTable {
    #[serde(default)]
    pub table: Vec<DeckEntry>,
}

pub const UNKNOWN_TYPE_LINE: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardMetadata {
    pub type_line: String,
    pub image_url: Option<String>,
    pub scryfall_uri: Option<String>,
}

impl CardMetadata {
    pub fn unknown() -> Self {
        Self::from_type_line(UNKNOWN_TYPE_LINE)
    }

    pub fn from_type_line(type_line: impl Into<String>) -> Self {
        Self {
            type_line: type_line.into(),
            image_url: None,
            scryfall_uri: None,
        }
    }
}

/// Card types in classification order; the first one found in a type line wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CardType {
    Creature,
    Instant,
    Sorcery,
    Artifact,
    Enchantment,
    Planeswalker,
    Battle,
    Land,
    Unknown,
}

impl CardType {
    pub const ALL: [CardType; 9] = [
        CardType::Creature,
        CardType::Instant,
        CardType::Sorcery,
        CardType::Artifact,
        CardType::Enchantment,
        CardType::Planeswalker,
        CardType::Battle,
        CardType::Land,
        CardType::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Creature => "Creature",
            CardType::Instant => "Instant",
            CardType::Sorcery => "Sorcery",
            CardType::Artifact => "Artifact",
            CardType::Enchantment => "Enchantment",
            CardType::Planeswalker => "Planeswalker",
            CardType::Battle => "Battle",
            CardType::Land => "Land",
            CardType::Unknown => "Unknown",
        }
    }

    pub fn classify(type_line: &str) -> CardType {
        CardType::ALL
            .iter()
            .copied()
            .filter(|t| *t != CardType::Unknown)
            .find(|t| type_line.contains(t.as_str()))
            .unwrap_or(CardType::Unknown)
    }

    /// File name used for this group's text report.
    pub fn report_file_name(&self) -> String {
        format!("cards_{}.txt", self.as_str().to_lowercase())
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counted cards bucketed by type. Every type is present, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeGroups(pub BTreeMap<CardType, BTreeMap<String, u32>>);

impl Default for TypeGroups {
    fn default() -> Self {
        Self(CardType::ALL.iter().map(|t| (*t, BTreeMap::new())).collect())
    }
}

impl TypeGroups {
    pub fn insert(&mut self, card_type: CardType, card: String, count: u32) {
        self.0.entry(card_type).or_default().insert(card, count);
    }

    pub fn non_empty(&self) -> impl Iterator<Item = (&CardType, &BTreeMap<String, u32>)> {
        self.0.iter().filter(|(_, cards)| !cards.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardCount {
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSummary {
    pub name: String,
    pub count: u32,
    pub card_type: CardType,
    #[serde(flatten)]
    pub metadata: CardMetadata,
}

/// Where a run parameter came from; recorded in report headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueSource {
    Cli,
    File,
    Prompt,
    Api,
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ValueSource::Cli => "CLI",
            ValueSource::File => "file",
            ValueSource::Prompt => "prompt",
            ValueSource::Api => "API",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSources {
    pub commander: ValueSource,
    pub recent: ValueSource,
    pub min_price: ValueSource,
    pub max_price: ValueSource,
}

impl InputSources {
    pub fn all(source: ValueSource) -> Self {
        Self {
            commander: source,
            recent: source,
            min_price: source,
            max_price: source,
        }
    }
}

impl fmt::Display for InputSources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "commander={}, recent={}, min_price={}, max_price={}",
            self.commander, self.recent, self.min_price, self.max_price
        )
    }
}

/// Decks pulled from EDHREC for one request.
#[derive(Debug, Clone)]
pub struct ExtractedDecks {
    pub formatted_name: String,
    pub selected_hashes: Vec<String>,
    pub decks: Vec<Deck>,
}

/// Result of a completed analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub commander: String,
    pub formatted_name: String,
    pub max_decks: usize,
    pub min_price: f64,
    pub max_price: f64,
    pub decks_selected: usize,
    pub decks_analyzed: usize,
    pub cards: Vec<CardSummary>,
    pub by_type: BTreeMap<CardType, Vec<CardCount>>,
    #[serde(skip)]
    pub decks: Vec<Deck>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_request_defaults() {
        let req: RunRequest = serde_json::from_str(r#"{"commander": "Atraxa"}"#).unwrap();
        assert_eq!(req.max_decks, 20);
        assert_eq!(req.min_price, 0.0);
        assert_eq!(req.max_price, 500.0);
    }

    #[test]
    fn test_classify_uses_declared_order() {
        assert_eq!(
            CardType::classify("Artifact Creature — Golem"),
            CardType::Creature
        );
        assert_eq!(
            CardType::classify("Enchantment Land — Urza's Saga"),
            CardType::Enchantment
        );
        assert_eq!(
            CardType::classify("Legendary Planeswalker — Teferi"),
            CardType::Planeswalker
        );
        assert_eq!(CardType::classify("Basic Land — Forest"), CardType::Land);
        assert_eq!(CardType::classify("Unknown"), CardType::Unknown);
        assert_eq!(CardType::classify(""), CardType::Unknown);
    }

    #[test]
    fn test_type_groups_default_has_every_type() {
        let groups = TypeGroups::default();
        assert_eq!(groups.0.len(), CardType::ALL.len());
        assert_eq!(groups.non_empty().count(), 0);
    }

    #[test]
    fn test_report_file_name() {
        assert_eq!(CardType::Planeswalker.report_file_name(), "cards_planeswalker.txt");
    }

    #[test]
    fn test_deck_entry_date_parsing() {
        let entry: DeckEntry = serde_json::from_value(serde_json::json!({
            "urlhash": "abc",
            "savedate": "2024-03-09",
            "price": 312,
            "tags": ["combo"]
        }))
        .unwrap();
        assert_eq!(entry.saved_on(), NaiveDate::from_ymd_opt(2024, 3, 9));
        assert_eq!(entry.price, 312.0);
    }
}
