//! Expected-value comparison of the three move archetypes.

use serde::Serialize;

use crate::types::{Archetype, OutcomeWeights};

/// An archetype together with its expected payoff
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scored {
    pub archetype: Archetype,
    pub expected_payoff: f64,
}

/// Expected stage payoff of playing `archetype` under `weights`
pub fn expected_payoff(archetype: Archetype, weights: &OutcomeWeights) -> f64 {
    let (p_low, p_mid, p_high) = archetype.distribution(&weights.chances);
    let payoffs = &weights.payoffs;
    p_high * payoffs.high + p_mid * payoffs.mid + p_low * payoffs.low
}

/// All three archetypes in declaration order
pub fn score_all(weights: &OutcomeWeights) -> [Scored; 3] {
    Archetype::ALL.map(|archetype| Scored {
        archetype,
        expected_payoff: expected_payoff(archetype, weights),
    })
}

/// The archetype with the highest expected payoff. Ties go to the earlier archetype.
pub fn best_archetype(weights: &OutcomeWeights) -> Scored {
    let [first, rest @ ..] = score_all(weights);
    rest.into_iter().fold(first, |best, candidate| {
        if candidate.expected_payoff > best.expected_payoff {
            candidate
        } else {
            best
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChanceTriple, PayoffMagnitudes};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn worked_example() {
        let weights = OutcomeWeights::new(
            ChanceTriple::new(0.2, 0.3, 0.5),
            PayoffMagnitudes::new(1.0, 5.0, 10.0),
        );
        let [coop, decept, aggr] = score_all(&weights);
        assert!(close(coop.expected_payoff, 6.7));
        assert!(close(decept.expected_payoff, 4.8));
        assert!(close(aggr.expected_payoff, 4.0));

        let best = best_archetype(&weights);
        assert_eq!(best.archetype, Archetype::Cooperative);
        assert!(close(best.expected_payoff, 6.7));
    }

    #[test]
    fn ties_go_to_declaration_order() {
        // equal payoffs make every archetype worth the same
        let weights = OutcomeWeights::new(
            ChanceTriple::new(0.25, 0.25, 0.5),
            PayoffMagnitudes::new(4.0, 4.0, 4.0),
        );
        assert_eq!(best_archetype(&weights).archetype, Archetype::Cooperative);

        // deceptive and aggressive tie when mid == high chance and cooperative loses
        let weights = OutcomeWeights::new(
            ChanceTriple::new(0.5, 0.25, 0.25),
            PayoffMagnitudes::new(0.0, 1.0, 10.0),
        );
        let [coop, decept, aggr] = score_all(&weights);
        assert!(close(decept.expected_payoff, aggr.expected_payoff));
        assert!(decept.expected_payoff > coop.expected_payoff);
        assert_eq!(best_archetype(&weights).archetype, Archetype::Deceptive);
    }

    #[test]
    fn aggressive_can_win() {
        // low payoff is the big one, and aggressive puts the high chance on it
        let weights = OutcomeWeights::new(
            ChanceTriple::new(0.1, 0.3, 0.6),
            PayoffMagnitudes::new(20.0, 5.0, 1.0),
        );
        assert_eq!(best_archetype(&weights).archetype, Archetype::Aggressive);
    }

    #[test]
    fn best_is_always_the_maximum() {
        let mut rng = StdRng::seed_from_u64(42);
        for i in 0..200 {
            let chances = ChanceTriple::sample(&mut rng);
            let payoffs = PayoffMagnitudes::new(1.0 + i as f64, 5.0, 10.0 + (i % 7) as f64);
            let weights = OutcomeWeights::new(chances, payoffs);
            let best = best_archetype(&weights);
            let max = score_all(&weights)
                .iter()
                .map(|s| s.expected_payoff)
                .fold(f64::NEG_INFINITY, f64::max);
            assert_eq!(best.expected_payoff, max);
            assert!(Archetype::ALL.contains(&best.archetype));
        }
    }
}
