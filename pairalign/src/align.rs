use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow, bail, ensure};
use clap::Parser;
use lib_pairalign::{
    Alignment, AlignmentConfiguration, GapPenalty, IdentityMode, Score, align_optimal,
    align_ungapped, alphabet::Alphabet, sequence::CodedSequence,
    substitution_matrix::SubstitutionMatrix,
};
use log::{LevelFilter, debug, info};
use serde::{Deserialize, Serialize};
use simplelog::{ColorChoice, TermLogger, TerminalMode};

#[derive(Parser)]
pub struct Cli {
    #[clap(long, short = 'l', default_value = "info")]
    log_level: LevelFilter,

    /// The first sequence.
    #[clap(long, short = 'f')]
    first: String,

    /// The second sequence.
    #[clap(long, short = 's')]
    second: String,

    /// The scoring configuration file in toml format.
    #[clap(long, short = 'c', default_value = "sample_config/scoring.toml")]
    configuration: PathBuf,

    /// The symbols of the alphabet, in code order.
    ///
    /// Both sequences must consist of these symbols only.
    #[clap(long, short = 'a', default_value = "ACGT")]
    alphabet: String,

    /// Compute a local instead of a global alignment.
    #[clap(long)]
    local: bool,

    /// Do not penalise gaps at the start and end of the sequences.
    #[clap(long)]
    no_terminal_penalty: bool,

    /// The maximum amount of co-optimal alignments to report.
    #[clap(long)]
    max_number: Option<usize>,

    /// Align position by position without gaps.
    ///
    /// This requires sequences of equal length.
    #[clap(long, conflicts_with_all = ["local", "no_terminal_penalty", "max_number"])]
    ungapped: bool,

    /// The file to store the alignments in toml format.
    #[clap(long, short = 'o')]
    output: Option<PathBuf>,
}

/// The contents of a scoring configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScoringConfig {
    match_score: i32,
    mismatch_score: i32,
    gap_penalty: Option<i32>,
    gap_open: Option<i32>,
    gap_extend: Option<i32>,
    terminal_penalty: Option<bool>,
    local: Option<bool>,
    max_number: Option<usize>,
}

#[derive(Debug, Serialize)]
struct AlignmentOutput {
    score: Score,
    #[serde(skip_serializing_if = "Option::is_none")]
    configuration: Option<AlignmentConfiguration>,
    alignments: Vec<AlignmentRecord>,
}

#[derive(Debug, Serialize)]
struct AlignmentRecord {
    first: String,
    second: String,
    cigar: String,
    identity: f64,
}

pub fn cli(cli: Cli) -> Result<()> {
    if TermLogger::init(
        cli.log_level,
        Default::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .is_err()
    {
        debug!("Logger was initialised already");
    }

    let alphabet = Alphabet::new(cli.alphabet.as_bytes())
        .with_context(|| format!("Invalid alphabet '{}'", cli.alphabet))?;
    let first = CodedSequence::from_symbols(alphabet.clone(), cli.first.as_bytes())
        .context("First sequence contains non-alphabet character")?;
    let second = CodedSequence::from_symbols(alphabet.clone(), cli.second.as_bytes())
        .context("Second sequence contains non-alphabet character")?;

    info!("Loading scoring configuration {:?}", cli.configuration);
    let scoring_config = ScoringConfig::read(&cli.configuration)?;
    let substitution_matrix = SubstitutionMatrix::new_base_agnostic(
        "match/mismatch",
        alphabet,
        scoring_config.match_score,
        scoring_config.mismatch_score,
    );

    let (alignments, configuration) = if cli.ungapped {
        info!("Computing ungapped alignment");
        let alignment = align_ungapped(&first, &second, &substitution_matrix)?;
        (vec![alignment], None)
    } else {
        let configuration = scoring_config.alignment_configuration(&cli)?;
        info!(
            "Computing {} alignments",
            if configuration.local {
                "local"
            } else {
                "global"
            }
        );
        let alignments = align_optimal(&first, &second, &substitution_matrix, &configuration)?;
        (alignments, Some(configuration))
    };

    let score = alignments
        .first()
        .map(Alignment::score)
        .ok_or_else(|| anyhow!("Aligner returned no alignment"))?;
    println!("Score: {score}");
    println!("Alignments: {}", alignments.len());
    for alignment in &alignments {
        println!();
        println!("{}", alignment.cigar());
        println!("{alignment}");
    }

    if let Some(output) = &cli.output {
        info!("Writing alignments to {output:?}");
        let output_data = AlignmentOutput {
            score,
            configuration,
            alignments: alignments.iter().map(AlignmentRecord::from).collect(),
        };
        let mut output = BufWriter::new(
            File::create(output).with_context(|| format!("Cannot create output file {output:?}"))?,
        );
        write!(output, "{}", toml::to_string(&output_data)?)?;
        output.flush()?;
    }

    Ok(())
}

impl ScoringConfig {
    fn read(path: &Path) -> Result<Self> {
        let mut config_file = BufReader::new(
            File::open(path).with_context(|| format!("Cannot open configuration file {path:?}"))?,
        );
        let mut config = String::new();
        config_file.read_to_string(&mut config)?;
        Self::parse(&config).with_context(|| format!("Cannot parse configuration file {path:?}"))
    }

    fn parse(config: &str) -> Result<Self> {
        Ok(toml::from_str(config)?)
    }

    fn gap_penalty(&self) -> Result<GapPenalty> {
        Ok(match (self.gap_penalty, self.gap_open, self.gap_extend) {
            (Some(penalty), None, None) => GapPenalty::general(penalty)?,
            (None, Some(open), Some(extend)) => GapPenalty::affine(open, extend)?,
            (None, None, None) => bail!("No gap penalty configured"),
            (Some(_), _, _) => {
                bail!("Either gap_penalty or gap_open and gap_extend can be configured, not both")
            }
            (None, _, _) => bail!("Both gap_open and gap_extend must be configured"),
        })
    }

    /// Combines the file configuration with the command line.
    ///
    /// The command line takes precedence.
    fn alignment_configuration(&self, cli: &Cli) -> Result<AlignmentConfiguration> {
        let defaults = AlignmentConfiguration::default();
        let max_number = cli
            .max_number
            .or(self.max_number)
            .unwrap_or(defaults.max_number);
        ensure!(max_number > 0, "The maximum number of alignments must be positive");

        Ok(AlignmentConfiguration::new(self.gap_penalty()?)
            .with_terminal_penalty(
                !cli.no_terminal_penalty
                    && self.terminal_penalty.unwrap_or(defaults.terminal_penalty),
            )
            .with_local(cli.local || self.local.unwrap_or(defaults.local))
            .with_max_number(max_number))
    }
}

impl From<&Alignment> for AlignmentRecord {
    fn from(alignment: &Alignment) -> Self {
        let render = |symbols: Vec<Option<u8>>| -> String {
            symbols
                .into_iter()
                .map(|symbol| symbol.map(char::from).unwrap_or('-'))
                .collect()
        };
        let (first, second): (Vec<_>, Vec<_>) = alignment.symbols().into_iter().unzip();

        Self {
            first: render(first),
            second: render(second),
            cigar: alignment.cigar(),
            identity: alignment.identity(IdentityMode::default()).raw(),
        }
    }
}
