//! Parlay Engine CLI
//!
//! 1. Loads settings (file, then `PARLAY_*` environment)
//! 2. Picks data sources: bundled sample matchups, live or sample odds
//! 3. Runs the predictor / parlay assembler
//! 4. Prints the result

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

use parlay_engine::analysis::{BettingMode, GeneratedParlay, Pick, Predictor};
use parlay_engine::feed::suggest_value_bets;
use parlay_engine::models::{BetType, Sport};
use parlay_engine::odds::format_american;
use parlay_engine::parlay::ParlaySummary;
use parlay_engine::payout::calculate_payout;
use parlay_engine::provider::{
    sample::UPCOMING, MatchupSource, OddsApiClient, OddsSource, SampleProvider,
};
use parlay_engine::Settings;

#[derive(Parser, Debug)]
#[command(name = "parlay-engine")]
#[command(version, about = "Parlay odds, payouts and matchup picks", long_about = None)]
struct Cli {
    /// Settings file (defaults to ./parlay.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a parlay from the strongest picks of a sport's slate
    Generate {
        sport: Sport,
        #[arg(long)]
        legs: Option<usize>,
        #[arg(long)]
        stake: Option<f64>,
        #[arg(long)]
        mode: Option<BettingMode>,
        /// Comma-separated: moneyline,spread,total
        #[arg(long, value_delimiter = ',')]
        types: Option<Vec<BetType>>,
    },

    /// Explain the pick for one matchup
    Analyze {
        sport: Sport,
        /// Home team abbreviation
        home: String,
        /// Away team abbreviation
        away: String,
        #[arg(long)]
        mode: Option<BettingMode>,
    },

    /// List a sport's matchups
    Matchups { sport: Sport },

    /// Rank posted prices by implied probability
    Suggest {
        /// Odds API sport key
        #[arg(long, default_value = UPCOMING)]
        sport: String,
        /// Use bundled odds instead of the live API
        #[arg(long)]
        sample: bool,
        #[arg(long)]
        min_prob: Option<f64>,
    },

    /// Payout for a stake across American odds
    Payout {
        #[arg(long)]
        stake: f64,
        #[arg(required = true, allow_hyphen_values = true)]
        odds: Vec<i32>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;
    if settings.odds_api.api_key.is_none() {
        settings.odds_api.api_key = std::env::var("ODDS_API_KEY").ok();
    }

    // Initialize logging
    let level = tracing::Level::from_str(&settings.log_level).unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let matchup_source = SampleProvider::new();

    match cli.command {
        Commands::Generate {
            sport,
            legs,
            stake,
            mode,
            types,
        } => {
            let mut options = settings.parlay_options();
            options.legs = legs.or(options.legs);
            options.stake = stake.unwrap_or(options.stake);
            options.mode = mode.unwrap_or(options.mode);
            if let Some(types) = types {
                options.bet_types = types;
            }

            let matchups = matchup_source.matchups(sport).await?;
            if matchups.is_empty() {
                let source = MatchupSource::name(&matchup_source);
                bail!("no {sport} matchups available from {source}");
            }
            info!(%sport, count = matchups.len(), mode = %options.mode, "generating parlay");

            let generated = settings.predictor()?.generate_parlay(&matchups, &options)?;
            print_generated(&generated)?;
        }

        Commands::Analyze {
            sport,
            home,
            away,
            mode,
        } => {
            let matchups = matchup_source.matchups(sport).await?;
            let matchup = matchups
                .iter()
                .find(|m| {
                    m.home.abbreviation.eq_ignore_ascii_case(&home)
                        && m.away.abbreviation.eq_ignore_ascii_case(&away)
                })
                .with_context(|| format!("no {sport} matchup with {away} at {home}"))?;

            let predictor: Predictor = settings.predictor()?;
            let mode = mode.unwrap_or(settings.mode);
            let pick = predictor.predict_allowing(matchup, mode, &settings.bet_types);
            print_pick(&pick);
        }

        Commands::Matchups { sport } => {
            for m in matchup_source.matchups(sport).await? {
                let kickoff = m
                    .game_time
                    .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
                    .unwrap_or_else(|| "TBD".to_string());
                println!(
                    "{:<14} {} ({}) @ {} ({})  {}",
                    m.id,
                    m.away.name,
                    m.away.record(),
                    m.home.name,
                    m.home.record(),
                    kickoff
                );
            }
        }

        Commands::Suggest {
            sport,
            sample,
            min_prob,
        } => {
            let source: Box<dyn OddsSource> = if sample {
                Box::new(SampleProvider::new())
            } else {
                Box::new(
                    OddsApiClient::from_settings(&settings.odds_api)
                        .context("live odds need an API key (set ODDS_API_KEY or use --sample)")?,
                )
            };

            let events = source.events(&sport).await?;
            if events.is_empty() {
                warn!(%sport, source = source.name(), "no events returned");
            }

            let floor = min_prob.unwrap_or(settings.min_implied_probability);
            for bet in suggest_value_bets(&events, floor) {
                println!(
                    "{:>5.1}%  {}  [{}]",
                    bet.implied_probability * 100.0,
                    bet.selection,
                    bet.selection.game
                );
            }
        }

        Commands::Payout { stake, odds } => {
            let display = calculate_payout(stake, &odds)?.display();
            println!("Legs:            {}", display.num_legs);
            println!(
                "Combined odds:   {} ({})",
                display.combined_american, display.combined_decimal
            );
            println!("Implied prob:    {}%", display.implied_probability_pct);
            println!("Stake:           ${}", display.stake);
            println!("Payout:          ${}", display.total_payout);
            println!("Profit:          ${}", display.profit);
        }
    }

    Ok(())
}

fn print_pick(pick: &Pick) {
    let bet = match (pick.market, pick.odds) {
        (Some(market), Some(odds)) => match pick.line {
            Some(line) => format!(
                "{} {} {:+.1} @ {}",
                pick.selection_name(),
                market,
                line,
                format_american(odds)
            ),
            None => format!(
                "{} {} @ {}",
                pick.selection_name(),
                market,
                format_american(odds)
            ),
        },
        _ => "no bet".to_string(),
    };

    println!("{}", pick.game);
    println!(
        "  Pick: {} ({:?}), confidence {:.2} [{}], est. win {:.1}%",
        pick.team,
        pick.side,
        pick.confidence,
        pick.tier,
        pick.win_probability * 100.0
    );
    println!("  Bet:  {bet}");
    for factor in &pick.factors {
        println!("    {:+.3}  {}", factor.contribution, factor.explanation);
    }
}

fn print_generated(generated: &GeneratedParlay) -> anyhow::Result<()> {
    if generated.parlay.is_empty() {
        println!("No picks qualified for a {} parlay.", generated.mode);
        return Ok(());
    }

    for pick in &generated.picks {
        print_pick(pick);
    }
    println!();
    print_summary(&generated.parlay.summarize()?);
    println!("Average confidence: {:.2}", generated.average_confidence());
    Ok(())
}

fn print_summary(summary: &ParlaySummary) {
    let display = summary.payout.display();
    println!("{}", summary.name.as_deref().unwrap_or("Parlay"));
    for (i, leg) in summary.legs.iter().enumerate() {
        println!("  {}. {}  [{}]", i + 1, leg, leg.game);
    }
    println!("  Combined odds: {} ({})", display.combined_american, display.combined_decimal);
    println!("  Implied probability: {}%", display.implied_probability_pct);
    println!("  Model win probability: {:.2}%", summary.win_probability * 100.0);
    println!(
        "  Stake ${} pays ${} (profit ${})",
        display.stake, display.total_payout, display.profit
    );
}
