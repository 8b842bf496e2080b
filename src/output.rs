use anyhow::{Context, Result};
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::types::{Archetype, ContrastPair, GameTranscript, OutcomeWeights, TopicExample};

/// The kinds of table a run can write, each with a fixed header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Game,
    Probabilities,
    StochasticGames,
    ContrastPairs,
}

impl RunKind {
    pub fn header(&self) -> &'static [&'static str] {
        match self {
            RunKind::Game => &["Prompt", "Response"],
            RunKind::Probabilities => &["", "Probability"],
            RunKind::StochasticGames => &["Topic", "Example"],
            RunKind::ContrastPairs => &["Topic", "First Example", "Contrasting Example"],
        }
    }
}

/// CSV file that starts with the header of its run kind
pub struct TableWriter {
    path: PathBuf,
    kind: RunKind,
    writer: csv::Writer<File>,
    rows: usize,
}

impl TableWriter {
    pub fn create(path: impl AsRef<Path>, kind: RunKind) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        writer
            .write_record(kind.header())
            .with_context(|| format!("Failed to write header to {}", path.display()))?;
        Ok(Self {
            path,
            kind,
            writer,
            rows: 0,
        })
    }

    pub fn write_row<I, T>(&mut self, row: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.writer
            .write_record(row)
            .with_context(|| format!("Failed to write {:?} row to {}", self.kind, self.path.display()))?;
        self.rows += 1;
        Ok(())
    }

    /// Flushes to disk and returns the number of data rows written
    pub fn finish(mut self) -> Result<usize> {
        self.writer
            .flush()
            .with_context(|| format!("Failed to flush {}", self.path.display()))?;
        Ok(self.rows)
    }
}

/// One row per round; the closing round has an empty response cell
pub fn write_transcript(path: impl AsRef<Path>, transcript: &GameTranscript) -> Result<usize> {
    let mut table = TableWriter::create(path, RunKind::Game)?;
    for round in &transcript.rounds {
        table.write_row([
            round.narrator_output.as_str(),
            round.decision_maker_output.as_deref().unwrap_or(""),
        ])?;
    }
    table.finish()
}

/// Probability each archetype assigns to each payoff value
pub fn write_probabilities(path: impl AsRef<Path>, weights: &OutcomeWeights) -> Result<usize> {
    let mut table = TableWriter::create(path, RunKind::Probabilities)?;
    let payoffs = &weights.payoffs;
    for archetype in Archetype::ALL {
        let (p_low, p_mid, p_high) = archetype.distribution(&weights.chances);
        for (payoff, chance) in [(payoffs.low, p_low), (payoffs.mid, p_mid), (payoffs.high, p_high)] {
            table.write_row([
                format!("{} P(payoff={})", archetype, payoff),
                chance.to_string(),
            ])?;
        }
    }
    table.finish()
}

pub fn write_topic_examples(path: impl AsRef<Path>, examples: &[TopicExample]) -> Result<usize> {
    let mut table = TableWriter::create(path, RunKind::StochasticGames)?;
    for example in examples {
        table.write_row([example.topic.as_str(), example.example.as_str()])?;
    }
    table.finish()
}

pub fn write_contrast_pairs(path: impl AsRef<Path>, pairs: &[ContrastPair]) -> Result<usize> {
    let mut table = TableWriter::create(path, RunKind::ContrastPairs)?;
    for pair in pairs {
        table.write_row([pair.topic.as_str(), pair.first.as_str(), pair.contrasting.as_str()])?;
    }
    table.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChanceTriple, PayoffMagnitudes, RoundRecord};
    use std::fs;

    #[test]
    fn transcript_has_header_and_empty_closing_cell() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pairs.csv");
        let transcript = GameTranscript {
            weights: OutcomeWeights::new(ChanceTriple::new(0.2, 0.3, 0.5), PayoffMagnitudes::default()),
            rounds: vec![
                RoundRecord::decision("Scenario, with comma", "A"),
                RoundRecord::closing("The end"),
            ],
        };
        assert_eq!(write_transcript(&path, &transcript).unwrap(), 2);
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Prompt,Response\n\"Scenario, with comma\",A\nThe end,\n");
    }

    #[test]
    fn probabilities_follow_archetype_permutations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("probabilities.csv");
        let weights = OutcomeWeights::new(ChanceTriple::new(0.2, 0.3, 0.5), PayoffMagnitudes::default());
        assert_eq!(write_probabilities(&path, &weights).unwrap(), 9);
        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], ",Probability");
        assert_eq!(lines[1], "Cooperative P(payoff=1),0.2");
        assert_eq!(lines[3], "Cooperative P(payoff=10),0.5");
        assert_eq!(lines[4], "Deceptive P(payoff=1),0.3");
        assert_eq!(lines[5], "Deceptive P(payoff=5),0.5");
        assert_eq!(lines[7], "Aggressive P(payoff=1),0.5");
        assert_eq!(lines[9], "Aggressive P(payoff=10),0.2");
    }

    #[test]
    fn contrast_pairs_have_three_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contrast.csv");
        let pairs = vec![ContrastPair {
            topic: "trust".into(),
            first: "first".into(),
            contrasting: "second".into(),
        }];
        write_contrast_pairs(&path, &pairs).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Topic,First Example,Contrasting Example\ntrust,first,second\n");
    }
}
