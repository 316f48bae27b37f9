use crate::core::analysis::{
    count_cards, filter_deck_hashes, format_commander_name, group_cards_by_type, sorted_counts,
};
use crate::core::context::AnalyzerContext;
use crate::core::report::{
    decklists_file_name, render_card_csv, render_count_list, render_decklists, RunMetadata,
    CARD_COUNTS_CSV_FILE, MASTER_COUNTS_FILE,
};
use crate::core::{Pipeline, Storage};
use crate::domain::model::{
    AnalysisReport, CardCount, CardSummary, CardType, ExtractedDecks, InputSources, RunRequest,
};
use crate::utils::error::{AnalyzerError, Result};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

const REPORT_SUBDIR: &str = "edhrec-decklists";

/// One commander analysis: EDHREC decks in, card statistics and text reports out.
pub struct DeckPipeline<S: Storage> {
    context: Arc<AnalyzerContext>,
    storage: S,
    request: RunRequest,
    sources: InputSources,
}

impl<S: Storage> DeckPipeline<S> {
    pub fn new(
        context: Arc<AnalyzerContext>,
        storage: S,
        request: RunRequest,
        sources: InputSources,
    ) -> Self {
        Self {
            context,
            storage,
            request,
            sources,
        }
    }

    fn report_dir(formatted_name: &str) -> String {
        format!("{}/{}", formatted_name, REPORT_SUBDIR)
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for DeckPipeline<S> {
    async fn extract(&self) -> Result<ExtractedDecks> {
        let formatted_name = format_commander_name(&self.request.commander);
        if formatted_name.is_empty() {
            return Err(AnalyzerError::ValidationError {
                message: format!(
                    "Commander name '{}' is empty once formatted",
                    self.request.commander
                ),
            });
        }

        let edhrec = &self.context.edhrec;
        edhrec.build_id().await?;
        let deck_table = edhrec.fetch_deck_table(&formatted_name).await?;
        tracing::debug!(
            "Deck table for {} has {} entries",
            formatted_name,
            deck_table.table.len()
        );

        let selected_hashes = filter_deck_hashes(
            &deck_table,
            self.request.max_decks,
            self.request.min_price,
            self.request.max_price,
        )?;
        tracing::info!("Using {} deck hashes", selected_hashes.len());

        let decks = edhrec
            .fetch_decks_with_progress(&selected_hashes, |completed, total| {
                tracing::info!("Fetched {}/{} decks", completed, total);
            })
            .await;

        Ok(ExtractedDecks {
            formatted_name,
            selected_hashes,
            decks,
        })
    }

    async fn transform(&self, data: ExtractedDecks) -> Result<AnalysisReport> {
        let card_counts = count_cards(&data.decks);
        let ordered = sorted_counts(&card_counts);
        tracing::info!(
            "Classifying {} distinct cards from {} decks",
            ordered.len(),
            data.decks.len()
        );

        let scryfall = &self.context.scryfall;
        let mut type_lines = HashMap::with_capacity(ordered.len());
        let mut cards = Vec::with_capacity(ordered.len());
        for (index, card) in ordered.iter().enumerate() {
            let type_line = scryfall.card_type(&card.name).await?;
            let metadata = scryfall.card_metadata(&card.name).await?;

            cards.push(CardSummary {
                name: card.name.clone(),
                count: card.count,
                card_type: CardType::classify(&type_line),
                metadata,
            });
            type_lines.insert(card.name.clone(), type_line);

            if (index + 1) % 50 == 0 {
                tracing::info!("Classified {}/{} cards", index + 1, ordered.len());
            }
        }

        let type_groups = group_cards_by_type(&card_counts, &type_lines);
        let by_type: BTreeMap<CardType, _> = type_groups
            .non_empty()
            .map(|(card_type, group)| (*card_type, sorted_counts(group)))
            .collect();

        Ok(AnalysisReport {
            commander: self.request.commander.clone(),
            formatted_name: data.formatted_name,
            max_decks: self.request.max_decks,
            min_price: self.request.min_price,
            max_price: self.request.max_price,
            decks_selected: data.selected_hashes.len(),
            decks_analyzed: data.decks.len(),
            cards,
            by_type,
            decks: data.decks,
        })
    }

    async fn load(&self, result: &AnalysisReport) -> Result<String> {
        let dir = Self::report_dir(&result.formatted_name);
        self.storage.reset_dir(&dir).await?;
        tracing::info!("Output directory cleaned: {}", self.storage.location(&dir));

        let header = RunMetadata::new(&self.request, self.sources).header();

        let master = result
            .cards
            .iter()
            .map(|card| CardCount {
                name: card.name.clone(),
                count: card.count,
            })
            .collect::<Vec<_>>();
        self.storage
            .write_file(
                &format!("{}/{}", dir, MASTER_COUNTS_FILE),
                render_count_list(&header, &master).as_bytes(),
            )
            .await?;

        for (card_type, counts) in &result.by_type {
            self.storage
                .write_file(
                    &format!("{}/{}", dir, card_type.report_file_name()),
                    render_count_list(&header, counts).as_bytes(),
                )
                .await?;
        }

        self.storage
            .write_file(
                &format!("{}/{}", dir, decklists_file_name(&result.formatted_name)),
                render_decklists(&header, &result.decks).as_bytes(),
            )
            .await?;

        self.storage
            .write_file(
                &format!("{}/{}", dir, CARD_COUNTS_CSV_FILE),
                render_card_csv(&result.cards)?.as_bytes(),
            )
            .await?;

        tracing::debug!("Wrote {} type reports", result.by_type.len());
        Ok(self.storage.location(&dir))
    }
}
