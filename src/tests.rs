//! Integration tests for parlay-engine

#[cfg(test)]
mod tests {
    use crate::analysis::factors::{FactorAnalyzer, FactorKind, WEIGHT_SUM_TOLERANCE};
    use crate::analysis::pick::ConfidenceTier;
    use crate::analysis::predictor::{ParlayOptions, Predictor};
    use crate::analysis::presets::BettingMode;
    use crate::feed::suggest_value_bets;
    use crate::models::{BetType, MarketType, Side, Sport};
    use crate::parlay::Parlay;
    use crate::payout::calculate_payout;
    use crate::provider::SampleProvider;

    #[test]
    fn test_summary_matches_payout_calculator() {
        let provider = SampleProvider::new();
        let mut parlay = Parlay::new();
        for suggestion in suggest_value_bets(&provider.sample_events(), 0.52)
            .into_iter()
            .filter(|s| s.selection.market == MarketType::HeadToHead)
        {
            parlay.add_selection(suggestion.selection).unwrap();
        }
        parlay.set_stake(20.0).unwrap();

        let summary = parlay.summarize().unwrap();
        let direct = calculate_payout(20.0, &parlay.odds()).unwrap();
        assert_eq!(summary.payout, direct);
        assert_eq!(summary.legs.len(), 3);
    }

    #[test]
    fn test_sample_matchups_keep_weights_normalized() {
        let provider = SampleProvider::new();
        let analyzer = FactorAnalyzer::default();
        for sport in [Sport::Nfl, Sport::Nba] {
            for matchup in provider.sample_matchups(sport) {
                let analysis = analyzer.analyze(&matchup);
                assert!(
                    (analysis.weight_sum() - 1.0).abs() < WEIGHT_SUM_TOLERANCE,
                    "{}: {}",
                    matchup.id,
                    analysis.weight_sum()
                );
                assert!((-1.0..=1.0).contains(&analysis.raw_score));
            }
        }
    }

    #[test]
    fn test_dome_game_drops_weather() {
        let provider = SampleProvider::new();
        let dome = provider
            .sample_matchups(Sport::Nfl)
            .into_iter()
            .find(|m| m.id == "nfl-phi-dal")
            .unwrap();
        let pick = Predictor::default().predict(&dome, BettingMode::Normal);
        assert!(pick.factors.iter().all(|f| f.kind != FactorKind::Weather));
        assert!(pick.explanations().iter().all(|e| !e.starts_with("Weather")));
    }

    #[test]
    fn test_sample_nfl_slate_in_each_mode() {
        let provider = SampleProvider::new();
        let matchups = provider.sample_matchups(Sport::Nfl);
        let predictor = Predictor::default();

        for mode in [BettingMode::Safe, BettingMode::Normal, BettingMode::Aggressive] {
            let options = ParlayOptions {
                mode,
                stake: 10.0,
                ..ParlayOptions::default()
            };
            let generated = predictor.generate_parlay(&matchups, &options).unwrap();
            let policy = predictor.policy(mode);
            assert!(generated.parlay.len() <= policy.default_legs);
            for pick in &generated.picks {
                let bet_type = pick.bet_type().unwrap();
                assert!(policy.preferences(pick.tier).contains(&bet_type), "{mode}: {pick:?}");
            }
        }
    }

    #[test]
    fn test_safe_mode_only_high_confidence_moneylines() {
        let provider = SampleProvider::new();
        let predictor = Predictor::default();
        for matchup in provider.sample_matchups(Sport::Nba) {
            let pick = predictor.predict(&matchup, BettingMode::Safe);
            match pick.tier {
                ConfidenceTier::High => assert_eq!(pick.bet_type(), Some(BetType::Moneyline)),
                _ => assert!(pick.market.is_none()),
            }
        }
    }

    #[test]
    fn test_picked_team_matches_side() {
        let provider = SampleProvider::new();
        let predictor = Predictor::default();
        for matchup in provider.sample_matchups(Sport::Nba) {
            let pick = predictor.predict(&matchup, BettingMode::Aggressive);
            let expected = match pick.side {
                Side::Home => &matchup.home.name,
                Side::Away => &matchup.away.name,
            };
            assert_eq!(&pick.team, expected);
            assert_eq!(pick.side == Side::Away, pick.raw_score < 0.0);
        }
    }
}
