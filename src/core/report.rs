use crate::domain::model::{CardCount, CardSummary, Deck, InputSources, RunRequest};
use crate::utils::error::{AnalyzerError, Result};
use chrono::{DateTime, Local};

pub const MASTER_COUNTS_FILE: &str = "master_card_counts.txt";
pub const CARD_COUNTS_CSV_FILE: &str = "card_counts.csv";

/// Run parameters embedded at the top of every report file.
#[derive(Debug, Clone)]
pub struct RunMetadata {
    pub timestamp: DateTime<Local>,
    pub commander: String,
    pub max_decks: usize,
    pub min_price: f64,
    pub max_price: f64,
    pub sources: InputSources,
}

impl RunMetadata {
    pub fn new(request: &RunRequest, sources: InputSources) -> Self {
        Self {
            timestamp: Local::now(),
            commander: request.commander.clone(),
            max_decks: request.max_decks,
            min_price: request.min_price,
            max_price: request.max_price,
            sources,
        }
    }

    pub fn header(&self) -> String {
        [
            "Commander Run Metadata".to_string(),
            "======================".to_string(),
            String::new(),
            format!("Timestamp: {}", self.timestamp.format("%Y-%m-%d %H:%M:%S%.6f")),
            format!("Commander: {}", self.commander),
            format!("Max Decks: {}", self.max_decks),
            format!("Min Price: {}", self.min_price),
            format!("Max Price: {}", self.max_price),
            format!("Input Source: {}", self.sources),
            String::new(),
            "Results".to_string(),
            "======".to_string(),
            String::new(),
        ]
        .join("\n")
    }
}

fn with_header(header: &str) -> String {
    if header.is_empty() {
        String::new()
    } else {
        format!("{}\n", header)
    }
}

/// `"{count}  {card}"` per line, in the given order.
pub fn render_count_list(header: &str, counts: &[CardCount]) -> String {
    let mut out = with_header(header);
    for card in counts {
        out.push_str(&format!("{}  {}\n", card.count, card.name));
    }
    out
}

/// Every deck's lines followed by a blank line.
pub fn render_decklists(header: &str, decks: &[Deck]) -> String {
    let mut out = with_header(header);
    for deck in decks {
        out.push_str(&deck.join("\n"));
        out.push_str("\n\n");
    }
    out
}

pub fn render_card_csv(cards: &[CardSummary]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["count", "card", "type", "type_line", "image_url", "scryfall_uri"])?;

    for card in cards {
        writer.write_record([
            card.count.to_string().as_str(),
            card.name.as_str(),
            card.card_type.as_str(),
            card.metadata.type_line.as_str(),
            card.metadata.image_url.as_deref().unwrap_or(""),
            card.metadata.scryfall_uri.as_deref().unwrap_or(""),
        ])?;
    }

    let data = writer
        .into_inner()
        .map_err(|e| AnalyzerError::ProcessingError {
            message: format!("CSV flush failed: {}", e),
        })?;
    String::from_utf8(data).map_err(|e| AnalyzerError::ProcessingError {
        message: format!("CSV output is not UTF-8: {}", e),
    })
}

pub fn decklists_file_name(formatted_name: &str) -> String {
    format!("{}-decklists.txt", formatted_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CardMetadata, CardType, ValueSource};

    fn counts(items: &[(&str, u32)]) -> Vec<CardCount> {
        items
            .iter()
            .map(|(name, count)| CardCount {
                name: name.to_string(),
                count: *count,
            })
            .collect()
    }

    #[test]
    fn test_header_layout() {
        let request = RunRequest::new("Krenko, Mob Boss")
            .with_max_decks(20)
            .with_price_range(0.0, 450.5);
        let header = RunMetadata::new(&request, InputSources::all(ValueSource::Api)).header();
        let lines: Vec<&str> = header.lines().collect();

        assert_eq!(lines[0], "Commander Run Metadata");
        assert_eq!(lines[1], "======================");
        assert!(lines[3].starts_with("Timestamp: "));
        assert_eq!(lines[4], "Commander: Krenko, Mob Boss");
        assert_eq!(lines[5], "Max Decks: 20");
        assert_eq!(lines[6], "Min Price: 0");
        assert_eq!(lines[7], "Max Price: 450.5");
        assert_eq!(
            lines[8],
            "Input Source: commander=API, recent=API, min_price=API, max_price=API"
        );
        assert_eq!(lines[10], "Results");
        assert_eq!(lines[11], "======");
    }

    #[test]
    fn test_render_count_list() {
        let out = render_count_list("HEADER", &counts(&[("Sol Ring", 12), ("Island", 3)]));
        assert_eq!(out, "HEADER\n12  Sol Ring\n3  Island\n");

        let bare = render_count_list("", &counts(&[("Sol Ring", 1)]));
        assert_eq!(bare, "1  Sol Ring\n");
    }

    #[test]
    fn test_render_decklists() {
        let decks = vec![
            vec!["1 Sol Ring".to_string(), "1 Island".to_string()],
            vec!["1 Forest".to_string()],
        ];
        let out = render_decklists("", &decks);
        assert_eq!(out, "1 Sol Ring\n1 Island\n\n1 Forest\n\n");
    }

    #[test]
    fn test_render_card_csv_quotes_names() {
        let cards = vec![CardSummary {
            name: "Krenko, Mob Boss".to_string(),
            count: 4,
            card_type: CardType::Creature,
            metadata: CardMetadata::from_type_line("Legendary Creature — Goblin Warrior"),
        }];

        let csv = render_card_csv(&cards).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("count,card,type,type_line,image_url,scryfall_uri")
        );
        assert_eq!(
            lines.next(),
            Some("4,\"Krenko, Mob Boss\",Creature,Legendary Creature — Goblin Warrior,,")
        );
    }
}
