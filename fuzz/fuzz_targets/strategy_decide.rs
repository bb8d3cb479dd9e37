#![no_main]

extern crate arbitrary;
extern crate holdem_ai;
extern crate libfuzzer_sys;

use holdem_ai::ai::{
    DecisionContext, OpponentModel, OpponentView, Personality, PlayerAction, PlayerInfo,
    PositionCategory, PotStatus, Strategy, V2Strategy,
};
use holdem_ai::core::{Card, CardBitSet, Pocket};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, arbitrary::Arbitrary)]
struct DecideInput {
    pub cards: [u8; 7],
    pub board_len: u8,
    pub pot_status: PotStatus,
    pub position: PositionCategory,
    pub chips: u16,
    pub pot: u16,
    pub to_call: u16,
    pub big_blind: u8,
    pub opponents: u8,
    pub yet_to_act: u8,
    pub has_acted: bool,
    pub tightness: u8,
    pub aggression: u8,
    pub seed: u64,
}

fuzz_target!(|input: DecideInput| {
    let mut cards = CardBitSet::new();
    let mut dealt = Vec::new();
    for c in input.cards {
        let card = match Card::from_index(c as usize % 52) {
            Some(card) => card,
            None => return,
        };
        if !cards.insert(card) {
            return;
        }
        dealt.push(card);
    }
    let pocket = match Pocket::new(dealt[0], dealt[1]) {
        Some(p) => p,
        None => return,
    };
    let board_len = match input.board_len % 4 {
        0 => 0,
        n => n as usize + 2,
    };
    let community: CardBitSet = dealt[2..2 + board_len].iter().copied().collect();

    let model = OpponentModel::new();
    let player = PlayerInfo::new(0, "fuzz", input.chips as u32);
    let mut ctx = match DecisionContext::new(pocket, community, player, input.big_blind as u32) {
        Ok(ctx) => ctx,
        Err(_) => return,
    };
    let opponents = (input.opponents % 9 + 1) as usize;
    ctx.pot_status = input.pot_status;
    ctx.position = input.position;
    ctx.pot = input.pot as u32;
    ctx.to_call = input.to_call as u32;
    ctx.players_with_cards = opponents + 1;
    ctx.players_yet_to_act = input.yet_to_act as usize % (opponents + 1);
    ctx.has_acted_this_round = input.has_acted;
    ctx.opponents = (1..=opponents)
        .map(|seat| {
            let player = PlayerInfo::new(seat, format!("villain {seat}"), input.chips as u32);
            OpponentView::new(player, PositionCategory::Late, &model)
        })
        .collect();

    let personality = Personality {
        tightness: input.tightness as f32 / 255.0,
        aggression: input.aggression as f32 / 255.0,
        ..Default::default()
    };
    let mut strategy = V2Strategy::new(personality, Some(input.seed));
    let decision = strategy.decide(&ctx).unwrap();

    let room = ctx.player.chips.saturating_sub(ctx.to_call);
    match decision.action {
        PlayerAction::Raise(amount) => {
            assert!(amount > 0);
            assert!(amount <= room);
            assert_eq!(amount, decision.amount);
        }
        PlayerAction::Fold => assert!(ctx.to_call > 0),
        PlayerAction::Check => assert_eq!(0, ctx.to_call),
        PlayerAction::Call => assert!(ctx.to_call > 0),
    }
});
