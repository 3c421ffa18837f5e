use cardmatch::frame::io::load_color_image;
use cardmatch::{
    BinaryConfig, BinaryStrategy, Deck, DetectConfig, Detection, Detector, ExtractConfig,
    FeatureConfig, FeatureStrategy, GameEvaluator, HighCardGame, MatchConfig, NormalizeConfig,
    Outcome, QuadConfig, QuadStrategy, Strategy, VerifyConfig,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "CardMatch CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for the detection stages.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum StrategyConfig {
    #[default]
    Binary,
    Feature,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum QuadStrategyConfig {
    #[default]
    BoundingRect,
    DiagonalPairing,
    EdgeIntersection,
}

impl From<QuadStrategyConfig> for QuadStrategy {
    fn from(value: QuadStrategyConfig) -> Self {
        match value {
            QuadStrategyConfig::BoundingRect => QuadStrategy::BoundingRect,
            QuadStrategyConfig::DiagonalPairing => QuadStrategy::DiagonalPairing,
            QuadStrategyConfig::EdgeIntersection => QuadStrategy::EdgeIntersection,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ExtractConfigJson {
    blur_sigma: f32,
    threshold: u8,
    canny_low: f32,
    canny_high: f32,
    min_points: usize,
    outermost_only: bool,
}

impl Default for ExtractConfigJson {
    fn default() -> Self {
        let cfg = ExtractConfig::default();
        Self {
            blur_sigma: cfg.blur_sigma,
            threshold: cfg.threshold,
            canny_low: cfg.canny_low,
            canny_high: cfg.canny_high,
            min_points: cfg.min_points,
            outermost_only: cfg.outermost_only,
        }
    }
}

impl From<ExtractConfigJson> for ExtractConfig {
    fn from(value: ExtractConfigJson) -> Self {
        Self {
            blur_sigma: value.blur_sigma,
            threshold: value.threshold,
            canny_low: value.canny_low,
            canny_high: value.canny_high,
            min_points: value.min_points,
            outermost_only: value.outermost_only,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct QuadConfigJson {
    strategy: QuadStrategyConfig,
    epsilon_fraction: f64,
    diagonal_angle_deg: (f32, f32),
    min_edge_length: f32,
}

impl Default for QuadConfigJson {
    fn default() -> Self {
        let cfg = QuadConfig::default();
        Self {
            strategy: QuadStrategyConfig::BoundingRect,
            epsilon_fraction: cfg.epsilon_fraction,
            diagonal_angle_deg: cfg.diagonal_angle_deg,
            min_edge_length: cfg.min_edge_length,
        }
    }
}

impl From<QuadConfigJson> for QuadConfig {
    fn from(value: QuadConfigJson) -> Self {
        Self {
            strategy: value.strategy.into(),
            epsilon_fraction: value.epsilon_fraction,
            diagonal_angle_deg: value.diagonal_angle_deg,
            min_edge_length: value.min_edge_length,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct NormalizeConfigJson {
    size: u32,
    blur_sigma: f32,
    block_size: u32,
    offset: i16,
}

impl Default for NormalizeConfigJson {
    fn default() -> Self {
        let cfg = NormalizeConfig::default();
        Self {
            size: cfg.size,
            blur_sigma: cfg.blur_sigma,
            block_size: cfg.block_size,
            offset: cfg.offset,
        }
    }
}

impl From<NormalizeConfigJson> for NormalizeConfig {
    fn from(value: NormalizeConfigJson) -> Self {
        Self {
            size: value.size,
            blur_sigma: value.blur_sigma,
            block_size: value.block_size,
            offset: value.offset,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct BinaryConfigJson {
    diff_blur_radius: u32,
    diff_threshold: u8,
    prebinarized_deck: bool,
}

impl Default for BinaryConfigJson {
    fn default() -> Self {
        let cfg = BinaryConfig::default();
        Self {
            diff_blur_radius: cfg.diff_blur_radius,
            diff_threshold: cfg.diff_threshold,
            prebinarized_deck: cfg.prebinarized_deck,
        }
    }
}

impl From<BinaryConfigJson> for BinaryConfig {
    fn from(value: BinaryConfigJson) -> Self {
        Self {
            diff_blur_radius: value.diff_blur_radius,
            diff_threshold: value.diff_threshold,
            prebinarized_deck: value.prebinarized_deck,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct FeatureConfigJson {
    fast_threshold: u8,
    max_keypoints: usize,
    nms_radius: u32,
    blur_sigma: f32,
    pattern_seed: u64,
}

impl Default for FeatureConfigJson {
    fn default() -> Self {
        let cfg = FeatureConfig::default();
        Self {
            fast_threshold: cfg.fast_threshold,
            max_keypoints: cfg.max_keypoints,
            nms_radius: cfg.nms_radius,
            blur_sigma: cfg.blur_sigma,
            pattern_seed: cfg.pattern_seed,
        }
    }
}

impl From<FeatureConfigJson> for FeatureConfig {
    fn from(value: FeatureConfigJson) -> Self {
        Self {
            fast_threshold: value.fast_threshold,
            max_keypoints: value.max_keypoints,
            nms_radius: value.nms_radius,
            blur_sigma: value.blur_sigma,
            pattern_seed: value.pattern_seed,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct VerifyConfigJson {
    max_distance: u32,
    ransac_threshold: f32,
    ransac_iterations: usize,
    seed: u64,
}

impl Default for VerifyConfigJson {
    fn default() -> Self {
        let cfg = VerifyConfig::default();
        Self {
            max_distance: cfg.max_distance,
            ransac_threshold: cfg.ransac_threshold,
            ransac_iterations: cfg.ransac_iterations,
            seed: cfg.seed,
        }
    }
}

impl From<VerifyConfigJson> for VerifyConfig {
    fn from(value: VerifyConfigJson) -> Self {
        Self {
            max_distance: value.max_distance,
            ransac_threshold: value.ransac_threshold,
            ransac_iterations: value.ransac_iterations,
            seed: value.seed,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    image_path: String,
    deck_list_path: String,
    deck_image_path: String,
    expected_cards: usize,
    output_path: Option<String>,
    strategy: StrategyConfig,
    parallel: bool,
    extract: ExtractConfigJson,
    quad: QuadConfigJson,
    normalize: NormalizeConfigJson,
    binary: BinaryConfigJson,
    features: FeatureConfigJson,
    verify: VerifyConfigJson,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_path: String::new(),
            deck_list_path: String::new(),
            deck_image_path: String::new(),
            expected_cards: 4,
            output_path: None,
            strategy: StrategyConfig::default(),
            parallel: false,
            extract: ExtractConfigJson::default(),
            quad: QuadConfigJson::default(),
            normalize: NormalizeConfigJson::default(),
            binary: BinaryConfigJson::default(),
            features: FeatureConfigJson::default(),
            verify: VerifyConfigJson::default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CardRecord {
    rank: Option<String>,
    suit: Option<String>,
    deck_index: Option<usize>,
    score: Option<i64>,
    flipped: bool,
    corners: [[f32; 2]; 4],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
enum OutcomeRecord {
    Winner { index: usize },
    Tie { indices: Vec<usize> },
    Empty,
}

impl OutcomeRecord {
    /// Translates hand positions into indices of the output `cards` array.
    fn for_regions(outcome: Outcome, regions: &[usize]) -> Self {
        let region = |pos: usize| regions.get(pos).copied().unwrap_or(pos);
        match outcome {
            Outcome::Winner(pos) => OutcomeRecord::Winner {
                index: region(pos),
            },
            Outcome::Tie(positions) => OutcomeRecord::Tie {
                indices: positions.into_iter().map(region).collect(),
            },
            Outcome::Empty => OutcomeRecord::Empty,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    insufficient: bool,
    found: usize,
    expected: usize,
    cards: Vec<CardRecord>,
    outcome: Option<OutcomeRecord>,
}

fn build_strategy(
    kind: StrategyConfig,
    normalize: NormalizeConfig,
    binary: BinaryConfigJson,
    features: FeatureConfigJson,
    verify: VerifyConfigJson,
) -> Result<Box<dyn Strategy>, Box<dyn std::error::Error>> {
    let strategy: Box<dyn Strategy> = match kind {
        StrategyConfig::Binary => Box::new(BinaryStrategy::new(normalize, binary.into())?),
        StrategyConfig::Feature => Box::new(FeatureStrategy::new(
            normalize,
            features.into(),
            verify.into(),
        )?),
    };
    Ok(strategy)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("cardmatch=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.image_path.is_empty()
        || config.deck_list_path.is_empty()
        || config.deck_image_path.is_empty()
    {
        return Err("image_path, deck_list_path and deck_image_path must be set".into());
    }
    if config.expected_cards == 0 {
        return Err("expected_cards must be at least 1".into());
    }

    let Config {
        image_path,
        deck_list_path,
        deck_image_path,
        expected_cards: expected,
        output_path,
        strategy,
        parallel,
        extract,
        quad,
        normalize,
        binary,
        features,
        verify,
    } = config;

    let strategy = build_strategy(strategy, normalize.into(), binary, features, verify)?;
    let deck = Deck::load(&deck_list_path, &deck_image_path, &strategy)?;
    tracing::info!(cards = deck.len(), "deck loaded");

    let detect_cfg = DetectConfig {
        extract: extract.into(),
        quad: quad.into(),
        matching: MatchConfig { parallel },
    };
    let detector = Detector::new(deck, strategy, detect_cfg)?;

    let image = load_color_image(&image_path)?;
    let detection = detector.detect(&image, expected)?;

    let output = match &detection {
        Detection::Insufficient { found, expected } => Output {
            insufficient: true,
            found: *found,
            expected: *expected,
            cards: Vec::new(),
            outcome: None,
        },
        Detection::Cards(cards) => {
            let records = cards
                .iter()
                .map(|d| CardRecord {
                    rank: d.matched.as_ref().map(|m| m.card.symbol().to_string()),
                    suit: d.matched.as_ref().map(|m| m.card.suit().to_string()),
                    deck_index: d.matched.as_ref().map(|m| m.index),
                    score: d.matched.as_ref().map(|m| m.score),
                    flipped: d.matched.as_ref().is_some_and(|m| m.flipped),
                    corners: d.quad.corners().map(|p| [p.x, p.y]),
                })
                .collect();
            Output {
                insufficient: false,
                found: cards.len(),
                expected,
                cards: records,
                outcome: Some(OutcomeRecord::for_regions(
                    HighCardGame.evaluate(&detection.hand()),
                    &detection.hand_regions(),
                )),
            }
        }
    };
    let json = serde_json::to_string_pretty(&output)?;

    match output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
