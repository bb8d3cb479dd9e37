use tracing::{instrument, trace};

use crate::ai::board_cache::PocketCaches;
use crate::ai::context::{ActionKind, BettingRound, DecisionContext, OpponentView};
use crate::ai::errors::Result;
use crate::ai::hand_probability::HandProbabilityMatrix;
use crate::ai::hand_selection::HandSelectionScheme;
use crate::ai::rule_engine::HandStrengths;
use crate::ai::simple_bias::SimpleBias;
use crate::core::Pocket;

/// Bias table for an opponent who chose to play this hand, picked by how
/// often they pay to see a flop. Opponents who didn't pay get no bias.
fn bias_table(view: &OpponentView<'_>) -> Option<usize> {
    view.paid_to_play
        .then(|| (view.model.hands_paid_percent(0.3) * 100.0) as usize / 10)
}

/// What an opponent is known to have done before the flop.
fn pre_flop_action(view: &OpponentView<'_>) -> Option<ActionKind> {
    if view.first_raiser_pre_flop || view.last_raiser_pre_flop {
        Some(ActionKind::Raise)
    } else if view.paid_to_play {
        Some(ActionKind::Call)
    } else {
        None
    }
}

/// Work out every strength the rules read for the hand in `ctx`.
///
/// Before the flop that's only the starting hand strength, from `scheme`
/// when it has groups and from the bias tables otherwise. After the flop
/// each live opponent's holdings are weighted by how they play, by the
/// scheme when they put chips in before the flop, and by how good the
/// holding is on this board. The weighted results are averaged over the
/// opponents.
#[instrument(level = "trace", skip_all, fields(round = %ctx.round, pocket = %ctx.pocket))]
pub fn hand_strengths(
    caches: &mut PocketCaches,
    ctx: &DecisionContext<'_>,
    scheme: Option<&HandSelectionScheme>,
) -> Result<HandStrengths> {
    if ctx.round == BettingRound::PreFlop {
        let pre_flop = match scheme.filter(|s| s.has_groups()) {
            Some(scheme) => scheme.hand_strength_pocket(&ctx.pocket),
            None => SimpleBias::pocket_strength(&ctx.pocket),
        };
        return Ok(HandStrengths {
            pre_flop,
            ..Default::default()
        });
    }

    let community = ctx.community;
    let pocket = ctx.pocket;
    let scores = caches.scores(community)?;
    let ranks = caches.ranks(community)?;
    let odds = match ctx.round {
        BettingRound::River => None,
        _ => Some(caches.odds(community, pocket)?),
    };

    let single = ranks.raw_hand_strength(&pocket);
    let exponent = ctx.players_with_cards.saturating_sub(1).max(1) as i32;
    let ours = scores.score(&pocket);
    let known = community | pocket.to_set();
    let holdings: Vec<Pocket> = Pocket::all().filter(|p| p.is_disjoint(&known)).collect();

    let (mut biased_sum, mut draw_sum, mut counted) = (0.0f32, 0.0f32, 0usize);
    for view in ctx.live_opponents() {
        let table = bias_table(view);
        let mut range = HandProbabilityMatrix::new();
        range.adjust_weights_pre_flop(scheme, &view.player, pre_flop_action(view), &pocket);
        let (mut total, mut ahead, mut effective) = (0.0f32, 0.0f32, 0.0f32);
        for holding in &holdings {
            let bias = table.map_or(1.0, |t| SimpleBias::bias_value_pocket(t, holding));
            let weight =
                bias * range.probability_pocket(holding) * ranks.raw_hand_strength(holding);
            if weight <= 0.0 {
                continue;
            }
            total += weight;
            // Ties go our way.
            if scores.score(holding) <= ours {
                ahead += weight;
            }
            if let Some(odds) = &odds {
                effective += weight * odds.effective_hand_strength_vs(holding)?;
            }
        }
        if total > 0.0 {
            biased_sum += ahead / total;
            draw_sum += effective / total;
            counted += 1;
        }
        trace!(
            opponent = %view.player.name,
            ?table,
            ahead = ahead / total.max(f32::MIN_POSITIVE),
            "weighted opponent holdings"
        );
    }

    let biased = if counted == 0 {
        single
    } else {
        biased_sum / counted as f32
    };
    let (positive_potential, negative_potential, draw) = match &odds {
        Some(odds) => {
            let draw = if counted == 0 {
                odds.effective_hand_strength()
            } else {
                draw_sum / counted as f32
            };
            (odds.positive_potential(), odds.negative_potential(), draw)
        }
        None => (0.0, 0.0, biased),
    };

    Ok(HandStrengths {
        pre_flop: 0.0,
        raw: single.powi(exponent),
        biased,
        positive_potential,
        negative_potential,
        draw,
        apparent: biased,
    })
}
