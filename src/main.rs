use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use podium::{
    AnalysisInput, AnalysisMode, Analyzer, AnalyzerConfig, ConsoleSpeaker, DebateContext,
    HumanReport, LineSource, LiveConfig, PracticeSession, Role, SegmentConfig, SessionAggregates,
    SessionReport, SparringConfig, SparringPartner, StructureElement, builtin_motions, find_motion,
    format_outcome, load_transcript, replay, run_live, seeded_rng,
};

#[derive(Parser)]
#[command(name = "podium")]
#[command(author, version, about = "Heuristic speech and argument analysis for debate practice", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CommonArgs {
    /// Analyzer config file (JSON); missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for score jitter, for reproducible output
    #[arg(long, env = "PODIUM_SEED")]
    seed: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single argument
    Analyze {
        /// Text to analyze
        text: Option<String>,

        /// Read the text from a file instead
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// essay, speech or practice
        #[arg(long, default_value = "essay")]
        mode: AnalysisMode,

        /// Debate motion the argument should address
        #[arg(long)]
        motion: Option<String>,

        /// government or opposition
        #[arg(long, default_value = "government")]
        role: Role,

        /// Expected structure elements, e.g. point,evidence,explanation,link
        #[arg(long, value_delimiter = ',')]
        expect: Vec<StructureElement>,

        /// Seconds the text took to say; sets the pace in speech mode
        #[arg(long)]
        elapsed: Option<f64>,

        /// Print the full outcome as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Replay a recorded speech through the live feedback pipeline
    Session {
        /// Transcript file (Deepgram JSON, or text with one utterance per line)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the JSON report; printed to stdout when absent
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file for a human-readable report
        #[arg(long)]
        human_readable: Option<PathBuf>,

        #[arg(long)]
        motion: Option<String>,

        #[arg(long, default_value = "government")]
        role: Role,

        #[arg(long, default_value = "speech")]
        mode: AnalysisMode,

        /// Silence in milliseconds that ends an utterance
        #[arg(long, default_value = "800")]
        max_pause_ms: u64,

        /// Seconds between argument reviews of recent speech
        #[arg(long, default_value = "3")]
        review_interval: u64,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Live feedback on utterances read from stdin, one per line
    Live {
        #[arg(long)]
        motion: Option<String>,

        #[arg(long, default_value = "government")]
        role: Role,

        #[arg(long, default_value = "speech")]
        mode: AnalysisMode,

        /// Seconds between argument reviews of recent speech
        #[arg(long, default_value = "3")]
        review_interval: u64,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Debate a simulated opponent on a built-in motion
    Spar {
        /// Motion id (see `podium motions`)
        #[arg(long, default_value = "homework-ban")]
        motion: String,

        /// Your side of the motion
        #[arg(long, default_value = "government")]
        role: Role,

        /// Number of rounds
        #[arg(long, default_value = "6")]
        rounds: u32,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// List the built-in motions
    Motions,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            text,
            file,
            mode,
            motion,
            role,
            expect,
            elapsed,
            json,
            common,
        } => {
            setup_logging(common.verbose);
            let text = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read file: {:?}", path))?,
                (None, None) => bail!("Provide the text to analyze or --file"),
            };
            let context = build_context(motion, role).with_expected_elements(expect);
            let input = build_input(&text, context, elapsed)?;
            analyze_text(&input, mode, json, &common)
        }
        Commands::Session {
            input,
            output,
            human_readable,
            motion,
            role,
            mode,
            max_pause_ms,
            review_interval,
            common,
        } => {
            setup_logging(common.verbose);
            let segments = SegmentConfig {
                max_pause_ms,
                ..Default::default()
            };
            let live = LiveConfig {
                review_interval: Duration::from_secs(review_interval),
                ..Default::default()
            };
            replay_session(
                input,
                output,
                human_readable,
                build_context(motion, role),
                mode,
                &segments,
                &live,
                &common,
            )
        }
        Commands::Live {
            motion,
            role,
            mode,
            review_interval,
            common,
        } => {
            setup_logging(common.verbose);
            let live = LiveConfig {
                review_interval: Duration::from_secs(review_interval),
                ..Default::default()
            };
            live_session(build_context(motion, role), mode, &live, &common).await
        }
        Commands::Spar {
            motion,
            role,
            rounds,
            common,
        } => {
            setup_logging(common.verbose);
            spar(&motion, role, rounds, &common).await
        }
        Commands::Motions => {
            list_motions();
            Ok(())
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn load_analyzer(common: &CommonArgs) -> Result<Analyzer> {
    let config = match &common.config {
        Some(path) => {
            info!("Loading analyzer config from {:?}", path);
            AnalyzerConfig::from_file(path)?
        }
        None => AnalyzerConfig::default(),
    };
    Ok(Analyzer::new(config))
}

fn build_context(motion: Option<String>, role: Role) -> DebateContext {
    DebateContext {
        motion,
        role,
        ..Default::default()
    }
}

fn build_input(text: &str, context: DebateContext, elapsed: Option<f64>) -> Result<AnalysisInput> {
    let input = AnalysisInput::new(text, context);
    let Some(secs) = elapsed else {
        return Ok(input);
    };
    let elapsed = Duration::try_from_secs_f64(secs)
        .with_context(|| format!("Invalid --elapsed {}: expected non-negative seconds", secs))?;
    Ok(input.at(elapsed))
}

fn analyze_text(
    input: &AnalysisInput,
    mode: AnalysisMode,
    json: bool,
    common: &CommonArgs,
) -> Result<()> {
    let analyzer = load_analyzer(common)?;
    let mut rng = seeded_rng(common.seed);
    let outcome = analyzer.analyze(mode, input, &SessionAggregates::default(), &mut rng);

    if json {
        let rendered =
            serde_json::to_string_pretty(&outcome).context("Failed to serialize outcome")?;
        println!("{}", rendered);
    } else {
        print!("{}", format_outcome(&outcome));
    }
    Ok(())
}

fn replay_session(
    input: PathBuf,
    output: Option<PathBuf>,
    human_readable: Option<PathBuf>,
    context: DebateContext,
    mode: AnalysisMode,
    segments: &SegmentConfig,
    live: &LiveConfig,
    common: &CommonArgs,
) -> Result<()> {
    info!("Loading transcript from {:?}", input);
    let utterances =
        load_transcript(&input, segments).context("Failed to parse input transcript")?;
    if utterances.is_empty() {
        warn!("Transcript contains no speech");
    }
    info!("Loaded {} utterances", utterances.len());

    let analyzer = load_analyzer(common)?;
    let mut session = PracticeSession::new(analyzer, context, mode, seeded_rng(common.seed));
    let result = replay(&mut session, &utterances, live);
    let report = SessionReport::from_replay(&session, &result);

    match &output {
        Some(path) => {
            report.write_json(path)?;
            info!("Report written to {:?}", path);
        }
        None => {
            let rendered =
                serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
            println!("{}", rendered);
        }
    }

    if let Some(path) = &human_readable {
        HumanReport::new(&report).write_file(path)?;
        info!("Human-readable report written to {:?}", path);
    }

    let summary = &report.summary;
    info!(
        "Complete: {} utterances, {:.0} wpm, {} fillers, average score {}",
        summary.utterances, summary.words_per_minute, summary.total_fillers, summary.average_score
    );
    Ok(())
}

async fn live_session(
    context: DebateContext,
    mode: AnalysisMode,
    live: &LiveConfig,
    common: &CommonArgs,
) -> Result<()> {
    let analyzer = load_analyzer(common)?;
    let mut session = PracticeSession::new(analyzer, context, mode, seeded_rng(common.seed));
    let mut source = LineSource::new(BufReader::new(tokio::io::stdin()));
    let mut speaker = ConsoleSpeaker::new(std::io::stdout());

    info!(
        "Listening on stdin in {} mode, one utterance per line",
        session.mode()
    );
    run_live(&mut session, &mut source, &mut speaker, live).await?;

    if let Some(report) = session.latest() {
        info!("Last utterance scored {}", report.scores.overall);
    }

    let summary = session.summary();
    info!(
        "Session over: {} utterances, {:.0} wpm, {} fillers, average score {}",
        summary.utterances, summary.words_per_minute, summary.total_fillers, summary.average_score
    );
    Ok(())
}

async fn spar(motion_id: &str, role: Role, rounds: u32, common: &CommonArgs) -> Result<()> {
    let Some(brief) = find_motion(motion_id) else {
        bail!("Unknown motion {:?}; run `podium motions` to list them", motion_id);
    };
    let analyzer = load_analyzer(common)?;
    let mut rng = seeded_rng(common.seed);
    let context = DebateContext::new(brief.motion.clone(), role);

    let config = SparringConfig {
        max_rounds: rounds.max(2),
        ..Default::default()
    };
    let max_rounds = config.max_rounds;
    let mut partner = SparringPartner::new(brief, role, config);
    println!("Opponent: {}", partner.welcome());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while !partner.is_finished() {
        println!("Round {}/{}:", partner.round(), max_rounds);
        let Some(line) = lines
            .next_line()
            .await
            .context("Failed to read argument")?
        else {
            break;
        };
        let argument = line.trim();
        if argument.is_empty() {
            continue;
        }

        let input = AnalysisInput::new(argument, context.clone());
        let outcome = analyzer.analyze(
            AnalysisMode::Essay,
            &input,
            &SessionAggregates::default(),
            &mut rng,
        );
        if let Some(item) = outcome.feedback.first().filter(|i| i.is_negative()) {
            println!("Coach: {}: {}", item.title, item.message);
        }

        let rebuttal = partner.respond(argument, &mut rng);
        println!("Opponent (round {}): {}", rebuttal.round, rebuttal.text);
    }

    println!("Debate score: {}", partner.final_score());
    Ok(())
}

fn list_motions() {
    for brief in builtin_motions() {
        println!("{}  [{:?}, {} min]", brief.id, brief.difficulty, brief.time_limit_secs / 60);
        println!("    {}", brief.motion);
        println!("    {}", brief.description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podium::models::FeedbackCategory;

    fn parse_analyze(args: &[&str]) -> (String, DebateContext, Option<f64>, AnalysisMode) {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Analyze {
                text,
                motion,
                role,
                elapsed,
                mode,
                ..
            } => (text.unwrap(), build_context(motion, role), elapsed, mode),
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_elapsed_sets_speech_pace() {
        let (text, context, elapsed, mode) = parse_analyze(&[
            "podium",
            "analyze",
            "homework takes away time from family life",
            "--mode",
            "speech",
            "--motion",
            "This house would ban homework",
            "--elapsed",
            "3",
        ]);
        let input = build_input(&text, context, elapsed).unwrap();
        assert_eq!(input.elapsed, Some(Duration::from_secs(3)));

        let outcome = Analyzer::default().analyze(
            mode,
            &input,
            &SessionAggregates::default(),
            &mut seeded_rng(Some(1)),
        );
        // 7 words in 3 seconds is 140 wpm
        assert!(!outcome.has_category(FeedbackCategory::Pace));
    }

    #[test]
    fn test_without_elapsed_input_is_untimed() {
        let (text, context, elapsed, _) = parse_analyze(&["podium", "analyze", "homework is bad"]);
        let input = build_input(&text, context, elapsed).unwrap();
        assert_eq!(input.elapsed, None);
    }

    #[test]
    fn test_negative_elapsed_is_rejected() {
        let context = DebateContext::default();
        assert!(build_input("homework", context.clone(), Some(-1.0)).is_err());
        assert!(build_input("homework", context, Some(f64::NAN)).is_err());
    }
}
