//! Sector scan action: pay energy, mark a signal, maybe overfly.

use crate::actions::{log_spend, ErrorCode, Validation};
use crate::core::{PlayerId, ResourceKind, SectorId};
use crate::state::Game;
use crate::systems::{scanning, standing, ExecutionContext};

pub(crate) fn validate(game: &Game, player: PlayerId, sector: SectorId, validation: &mut Validation) {
    match game.board.sector(sector) {
        None => validation.error(ErrorCode::UnknownSector, "Secteur inconnu"),
        Some(entry) => {
            if entry.open_slots() == 0 {
                validation.error(ErrorCode::SectorFull, "Le secteur est complet");
            }
        }
    }
    let cost = scan_cost(game, player);
    if game.player(player).energy < cost {
        validation.error(
            ErrorCode::InsufficientEnergy,
            format!("Énergie insuffisante (Requis: {cost})"),
        );
    }
}

pub(crate) fn execute(game: &mut Game, player: PlayerId, sector: SectorId, ctx: &mut ExecutionContext) {
    let cost = scan_cost(game, player);
    game.player_mut(player).spend_energy(cost);
    log_spend(game, ctx, player, ResourceKind::Energy, cost);
    scanning::scan_sector(game, player, sector, ctx);
}

fn scan_cost(game: &Game, player: PlayerId) -> u8 {
    game.options
        .scan_cost
        .saturating_sub(standing::discount(game, player, standing::CostKind::Scan))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{validate as validate_action, Action};
    use crate::cards::{Card, CardLibrary};
    use crate::core::{CardId, SequenceId};
    use crate::effects::CardEffect;
    use crate::oracle::RingOracle;
    use crate::state::GameOptions;

    fn fixture() -> (Game, CardLibrary, RingOracle) {
        let mut library = CardLibrary::new();
        for i in 0..12 {
            library.register(Card::new(CardId::new(i), format!("Carte {i}")));
        }
        let game = Game::new(&["Ada", "Grace"], &library, GameOptions::default());
        (game, library, RingOracle::new())
    }

    #[test]
    fn test_scan_needs_energy_and_open_slot() {
        let (mut game, library, oracle) = fixture();
        let player = PlayerId::new(0);
        let action = Action::ScanSector { sector: SectorId::new(0) };

        assert!(validate_action(&game, &library, &oracle, player, &action).is_ok());

        game.player_mut(player).energy = 1;
        let validation = validate_action(&game, &library, &oracle, player, &action);
        assert_eq!(validation.errors[0].code, ErrorCode::InsufficientEnergy);
        assert_eq!(validation.errors[0].message, "Énergie insuffisante (Requis: 2)");

        game.player_mut(player).energy = 4;
        let slots = game.board.sector(SectorId::new(0)).map_or(0, |s| s.slots);
        for _ in 0..slots {
            game.board.sector_mut(SectorId::new(0)).unwrap().marks.push_back(PlayerId::new(1));
        }
        let validation = validate_action(&game, &library, &oracle, player, &action);
        assert_eq!(validation.errors[0].code, ErrorCode::SectorFull);
    }

    #[test]
    fn test_scan_discount_lowers_the_bill() {
        let (mut game, library, oracle) = fixture();
        let player = PlayerId::new(0);
        standing::register_permanents(
            &mut game,
            player,
            CardId::new(4),
            &[CardEffect::ScanDiscount { amount: 1 }],
        );

        let mut ctx = ExecutionContext::new(&library, &oracle, SequenceId::new(1));
        execute(&mut game, player, SectorId::new(3), &mut ctx);

        assert_eq!(game.player(player).energy, 1);
        assert_eq!(game.signals_of(player), 1);
        assert!(ctx.history.iter().any(|e| e.message == "Ada dépense 1 énergie"));
    }
}
