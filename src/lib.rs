//! holdem_ai is the decision core of a rule driven Texas Hold'em player.
//!
//! Given hole cards, a board and what has been seen of the other players it
//! works out how strong the hand is now and how it could develop, scores
//! every possible betting outcome with a set of weighted rules, and picks
//! and sizes an action.
//!
//! # Deciding an action
//!
//! ```
//! use holdem_ai::ai::{
//!     DecisionContext, OpponentModel, OpponentView, Personality, PlayerInfo,
//!     PositionCategory, Strategy, V2Strategy,
//! };
//! use holdem_ai::core::{CardBitSet, Pocket};
//!
//! let model = OpponentModel::new();
//! let pocket = Pocket::from_str_cards("AsAh").unwrap();
//! let mut ctx =
//!     DecisionContext::new(pocket, CardBitSet::new(), PlayerInfo::new(0, "me", 1000), 20)
//!         .unwrap();
//! ctx.to_call = 20;
//! ctx.pot = 30;
//! ctx.players_with_cards = 2;
//! ctx.opponents.push(OpponentView::new(
//!     PlayerInfo::new(1, "them", 1000),
//!     PositionCategory::Big,
//!     &model,
//! ));
//!
//! let mut strategy = V2Strategy::new(Personality::default(), Some(42));
//! let decision = strategy.decide(&ctx).unwrap();
//! println!("{:?} because {}", decision.action, decision.explanation);
//! ```

/// Cards, sets of cards and hand ranking. Only what the decision core
/// needs.
pub mod core;

/// Hand strength, opponent modelling, rules and strategies.
pub mod ai;
