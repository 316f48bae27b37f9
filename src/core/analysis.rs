use crate::domain::model::{
    CardCount, CardCounts, CardType, Deck, DeckTable, RunRequest, TypeGroups,
};
use crate::utils::error::{AnalyzerError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_price_range, Validate,
};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("static pattern is valid"));

/// EDHREC url slug for a commander: `"Atraxa, Praetors' Voice"` -> `atraxa-praetors-voice`.
pub fn format_commander_name(commander_name: &str) -> String {
    NON_WORD
        .replace_all(commander_name, "")
        .to_lowercase()
        .replace(' ', "-")
        .replace('\'', "")
}

/// Newest decks first, keep those priced within `[min_price, max_price]`,
/// then take `recent` of them.
pub fn filter_deck_hashes(
    deck_table: &DeckTable,
    recent: usize,
    min_price: f64,
    max_price: f64,
) -> Result<Vec<String>> {
    let mut dated = deck_table
        .table
        .iter()
        .map(|entry| {
            entry
                .saved_on()
                .map(|date| (date, entry))
                .ok_or_else(|| AnalyzerError::UpstreamDataError {
                    service: "EDHREC".to_string(),
                    message: format!(
                        "Deck {} has an invalid savedate '{}'",
                        entry.urlhash, entry.savedate
                    ),
                })
        })
        .collect::<Result<Vec<_>>>()?;

    // stable, so same-day decks keep table order
    dated.sort_by(|a, b| b.0.cmp(&a.0));

    Ok(dated
        .into_iter()
        .map(|(_, entry)| entry)
        .filter(|entry| min_price <= entry.price && entry.price <= max_price)
        .take(recent)
        .map(|entry| entry.urlhash.clone())
        .collect())
}

/// Sum quantities per card, saturating at `u32::MAX`. Lines that are not
/// `"<qty> <name>"` are skipped.
pub fn count_cards(all_decks: &[Deck]) -> CardCounts {
    let mut card_counts = CardCounts::new();

    for deck in all_decks {
        for line in deck {
            let Some((qty_str, card_name)) = line.split_once(' ') else {
                continue;
            };
            let Ok(qty) = qty_str.parse::<u32>() else {
                continue;
            };
            let card_name = card_name.trim();
            if card_name.is_empty() {
                continue;
            }
            let total = card_counts.entry(card_name.to_string()).or_insert(0);
            *total = total.saturating_add(qty);
        }
    }

    card_counts
}

/// Bucket cards by the type found in their type line; cards without a
/// known type line land in `Unknown`.
pub fn group_cards_by_type(
    card_counts: &CardCounts,
    type_lines: &HashMap<String, String>,
) -> TypeGroups {
    let mut groups = TypeGroups::default();

    for (card, count) in card_counts {
        let card_type = type_lines
            .get(card)
            .map(|line| CardType::classify(line))
            .unwrap_or(CardType::Unknown);
        groups.insert(card_type, card.clone(), *count);
    }

    groups
}

/// Highest count first; ties by name.
pub fn sorted_counts<'a, I>(counts: I) -> Vec<CardCount>
where
    I: IntoIterator<Item = (&'a String, &'a u32)>,
{
    let mut sorted: Vec<CardCount> = counts
        .into_iter()
        .map(|(name, count)| CardCount {
            name: name.clone(),
            count: *count,
        })
        .collect();
    sorted.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    sorted
}

impl Validate for RunRequest {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("commander", &self.commander)?;
        if format_commander_name(&self.commander).trim_matches('-').is_empty() {
            return Err(AnalyzerError::ValidationError {
                message: format!(
                    "Commander name '{}' has no letters or digits",
                    self.commander
                ),
            });
        }
        validate_positive_number("max_decks", self.max_decks, 1)?;
        validate_price_range(self.min_price, self.max_price)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::DeckEntry;

    fn entry(urlhash: &str, savedate: &str, price: f64) -> DeckEntry {
        DeckEntry {
            urlhash: urlhash.to_string(),
            savedate: savedate.to_string(),
            price,
        }
    }

    fn deck(lines: &[&str]) -> Deck {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_format_commander_name() {
        assert_eq!(
            format_commander_name("Atraxa, Praetors' Voice"),
            "atraxa-praetors-voice"
        );
        assert_eq!(format_commander_name("Krenko, Mob Boss"), "krenko-mob-boss");
        assert_eq!(
            format_commander_name("Urza, Lord High Artificer"),
            "urza-lord-high-artificer"
        );
        assert_eq!(format_commander_name("Jhoira // Weatherlight"), "jhoira--weatherlight");
        assert_eq!(format_commander_name("Lim-Dûl the Necromancer"), "limdûl-the-necromancer");
    }

    #[test]
    fn test_filter_orders_by_date_then_price_then_limit() {
        let table = DeckTable {
            table: vec![
                entry("old-cheap", "2023-05-01", 50.0),
                entry("new-pricey", "2024-06-01", 900.0),
                entry("newest", "2024-07-15", 300.0),
                entry("mid", "2024-01-20", 200.0),
                entry("edge-low", "2024-03-03", 100.0),
            ],
        };

        let hashes = filter_deck_hashes(&table, 10, 100.0, 300.0).unwrap();
        assert_eq!(hashes, vec!["newest", "edge-low", "mid"]);

        let limited = filter_deck_hashes(&table, 2, 0.0, 1000.0).unwrap();
        assert_eq!(limited, vec!["newest", "new-pricey"]);

        assert!(filter_deck_hashes(&table, 0, 0.0, 1000.0).unwrap().is_empty());
    }

    #[test]
    fn test_filter_rejects_bad_dates() {
        let table = DeckTable {
            table: vec![entry("bad", "15/07/2024", 100.0)],
        };
        let err = filter_deck_hashes(&table, 5, 0.0, 500.0).unwrap_err();
        assert!(matches!(err, AnalyzerError::UpstreamDataError { .. }));
        assert!(err.is_upstream());
    }

    #[test]
    fn test_count_cards_sums_and_skips() {
        let decks = vec![
            deck(&["1 Sol Ring", "30 Mountain", "1 Goblin Bombardment"]),
            deck(&["1 Sol Ring", "28 Mountain", "Commander", "x Bad Line", "-1 Negative", "2 "]),
        ];

        let counts = count_cards(&decks);

        assert_eq!(counts.get("Sol Ring"), Some(&2));
        assert_eq!(counts.get("Mountain"), Some(&58));
        assert_eq!(counts.get("Goblin Bombardment"), Some(&1));
        assert_eq!(counts.len(), 3);
    }

    #[test]
    fn test_count_cards_saturates_huge_quantities() {
        let decks = vec![deck(&["4294967295 Sol Ring"]), deck(&["1 Sol Ring"])];

        let counts = count_cards(&decks);

        assert_eq!(counts.get("Sol Ring"), Some(&u32::MAX));
    }

    #[test]
    fn test_count_cards_keeps_full_name_after_first_space() {
        let counts = count_cards(&[deck(&["1 Fire // Ice"])]);
        assert_eq!(counts.get("Fire // Ice"), Some(&1));
    }

    #[test]
    fn test_group_cards_by_type() {
        let counts: CardCounts = [
            ("Sol Ring".to_string(), 3),
            ("Krenko, Tin Street Kingpin".to_string(), 2),
            ("Dryad Arbor".to_string(), 1),
            ("Mystery".to_string(), 1),
        ]
        .into_iter()
        .collect();
        let type_lines: HashMap<String, String> = [
            ("Sol Ring", "Artifact"),
            ("Krenko, Tin Street Kingpin", "Legendary Creature — Goblin Warrior"),
            ("Dryad Arbor", "Land Creature — Forest Dryad"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let groups = group_cards_by_type(&counts, &type_lines);

        assert_eq!(groups.0.get(&CardType::Artifact).unwrap().get("Sol Ring"), Some(&3));
        let creatures = groups.0.get(&CardType::Creature).unwrap();
        assert!(creatures.contains_key("Dryad Arbor"));
        assert!(creatures.contains_key("Krenko, Tin Street Kingpin"));
        assert!(groups.0.get(&CardType::Land).unwrap().is_empty());
        assert!(groups.0.get(&CardType::Unknown).unwrap().contains_key("Mystery"));
    }

    #[test]
    fn test_sorted_counts_ties_by_name() {
        let counts: CardCounts = [
            ("Island".to_string(), 5),
            ("Arcane Signet".to_string(), 5),
            ("Sol Ring".to_string(), 9),
        ]
        .into_iter()
        .collect();

        let names: Vec<String> = sorted_counts(&counts).into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Sol Ring", "Arcane Signet", "Island"]);
    }

    #[test]
    fn test_run_request_validation() {
        assert!(RunRequest::new("Krenko, Mob Boss").validate().is_ok());
        assert!(RunRequest::new("  ").validate().is_err());
        assert!(RunRequest::new("!!!").validate().is_err());
        assert!(RunRequest::new("Krenko").with_max_decks(0).validate().is_err());
        assert!(RunRequest::new("Krenko")
            .with_price_range(400.0, 100.0)
            .validate()
            .is_err());
    }
}
