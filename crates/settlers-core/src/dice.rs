//! Dice rolls, resource income and the robber.

use crate::board::{Board, PlayerId, Resource, TileId};
use crate::game::{GameError, Violation};
use crate::player::Player;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The roll that moves the robber instead of paying out
pub const ROBBER_ROLL: u8 = 7;

/// How a roll in 2..=12 is produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiceMode {
    /// Sum of two six-sided dice, as with physical dice
    #[default]
    TwoDice,
    /// Every total from 2 to 12 equally likely
    Flat,
}

impl DiceMode {
    pub fn roll<R: Rng>(&self, rng: &mut R) -> u8 {
        match self {
            DiceMode::TwoDice => rng.gen_range(1..=6) + rng.gen_range(1..=6),
            DiceMode::Flat => rng.gen_range(2..=12),
        }
    }
}

/// One payout to one player after a roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Income {
    pub player: PlayerId,
    pub resource: Resource,
    pub amount: u32,
}

/// Pay every settlement and city bordering a tile whose token matches `roll`.
///
/// Tiles under the robber are skipped one by one; the rest of the scan
/// carries on, so one blocked tile never costs another player their income.
pub fn distribute_resources(board: &Board, players: &mut [Player], roll: u8) -> Vec<Income> {
    let mut paid = Vec::new();

    for player in players.iter_mut() {
        let mut earned: Vec<(Resource, u32)> = Vec::new();

        for structure in &player.structures {
            let Some(site) = structure.site() else {
                continue;
            };
            for tile in site.surrounding_tiles.iter().filter_map(|id| board.tile(*id)) {
                if tile.token != Some(roll) {
                    continue;
                }
                if tile.has_robber {
                    debug!(player = player.id, tile = tile.id, "income blocked by robber");
                    continue;
                }
                if let Some(resource) = tile.resource() {
                    earned.push((resource, structure.resource_multiplier()));
                }
            }
        }

        for (resource, amount) in earned {
            player.receive(resource, amount);
            paid.push(Income {
                player: player.id,
                resource,
                amount,
            });
        }
    }

    debug!(roll, payouts = paid.len(), "resources distributed");
    paid
}

/// Move the robber onto another tile, returning the tile it left
pub fn relocate_robber(board: &mut Board, to: TileId) -> Result<TileId, GameError> {
    if board.tile(to).is_none() {
        return Err(GameError::NoSuchTile);
    }
    if board.robber_tile() == to {
        return Err(GameError::InvalidPlacement(Violation::RobberMustMove));
    }
    Ok(board.move_robber(to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{HexTile, LocationId};
    use crate::geometry::{Point, TILE_CENTERS};
    use crate::rules::try_place_settlement;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Every tile is wood on a 4, except the top-left and bottom-right tiles which
    /// roll on 6. The robber starts on the top-left tile.
    fn fixed_board() -> Board {
        let tiles = TILE_CENTERS
            .iter()
            .enumerate()
            .map(|(i, center)| {
                let token = if i == 0 || i == 18 { 6 } else { 4 };
                let mut tile = HexTile::new_resource(i, *center, Resource::Wood, token);
                tile.has_robber = i == 0;
                tile
            })
            .collect();
        Board::with_tiles(tiles)
    }

    fn settle(board: &mut Board, player: &mut Player, at: Point) -> LocationId {
        let id = board.location_id(at).unwrap();
        try_place_settlement(board, id, player, true).unwrap();
        id
    }

    fn frequencies(mode: DiceMode) -> [f64; 13] {
        let mut rng = StdRng::seed_from_u64(2023);
        let mut counts = [0u32; 13];
        for _ in 0..10_000 {
            let roll = mode.roll(&mut rng);
            assert!((2..=12).contains(&roll));
            counts[roll as usize] += 1;
        }
        counts.map(|c| c as f64 / 10_000.0)
    }

    #[test]
    fn test_two_dice_distribution() {
        let freq = frequencies(DiceMode::TwoDice);
        assert!((freq[7] - 6.0 / 36.0).abs() < 0.02, "7 came up {}", freq[7]);
        assert!((freq[2] - 1.0 / 36.0).abs() < 0.01, "2 came up {}", freq[2]);
        assert!((freq[12] - 1.0 / 36.0).abs() < 0.01, "12 came up {}", freq[12]);
    }

    #[test]
    fn test_flat_distribution() {
        let freq = frequencies(DiceMode::Flat);
        for value in 2..=12 {
            assert!((freq[value] - 1.0 / 11.0).abs() < 0.02, "{value} came up {}", freq[value]);
        }
    }

    #[test]
    fn test_matching_tile_pays_settlement() {
        let mut board = fixed_board();
        let mut players = vec![Player::new(0, "A".into())];
        // Bottom vertex of the bottom-right tile touches only that tile
        settle(&mut board, &mut players[0], Point::new(529, 520));

        let paid = distribute_resources(&board, &mut players, 6);

        assert_eq!(
            paid,
            vec![Income {
                player: 0,
                resource: Resource::Wood,
                amount: 1
            }]
        );
        assert_eq!(players[0].resources.wood, 1);
    }

    #[test]
    fn test_non_matching_roll_pays_nothing() {
        let mut board = fixed_board();
        let mut players = vec![Player::new(0, "A".into())];
        settle(&mut board, &mut players[0], Point::new(529, 520));

        assert!(distribute_resources(&board, &mut players, 8).is_empty());
        assert!(players[0].resources.is_empty());
    }

    #[test]
    fn test_robber_tile_skipped_without_stopping_scan() {
        let mut board = fixed_board();
        let mut players = vec![Player::new(0, "A".into()), Player::new(1, "B".into())];
        // Player 0 sits only on the robbed tile, player 1 only on the open one
        settle(&mut board, &mut players[0], Point::new(321, 40));
        settle(&mut board, &mut players[1], Point::new(529, 520));

        let paid = distribute_resources(&board, &mut players, 6);

        assert!(players[0].resources.is_empty());
        assert_eq!(players[1].resources.wood, 1);
        assert_eq!(paid.len(), 1);
        assert_eq!(paid[0].player, 1);
    }

    #[test]
    fn test_city_pays_double() {
        let mut board = fixed_board();
        let mut players = vec![Player::new(0, "A".into())];
        let at = settle(&mut board, &mut players[0], Point::new(529, 520));
        players[0].resources = crate::player::ResourceHand::with_amounts(2, 0, 0, 3, 0);
        crate::rules::try_place_city(&mut board, at, &mut players[0]).unwrap();

        distribute_resources(&board, &mut players, 6);
        assert_eq!(players[0].resources.wood, 2);
    }

    #[test]
    fn test_shared_corner_pays_each_matching_tile() {
        let mut board = fixed_board();
        let mut players = vec![Player::new(0, "A".into())];
        // (373, 250) touches three tiles, all rolling on 4
        settle(&mut board, &mut players[0], Point::new(373, 250));

        let paid = distribute_resources(&board, &mut players, 4);
        assert_eq!(paid.len(), 3);
        assert_eq!(players[0].resources.wood, 3);
    }

    #[test]
    fn test_relocate_robber() {
        let mut board = fixed_board();
        assert_eq!(relocate_robber(&mut board, 5), Ok(0));
        assert_eq!(board.robber_tile(), 5);
        assert!(board.tile(5).unwrap().has_robber);
        assert!(!board.tile(0).unwrap().has_robber);
    }

    #[test]
    fn test_relocate_robber_rejects_same_or_unknown_tile() {
        let mut board = fixed_board();
        assert_eq!(
            relocate_robber(&mut board, 0),
            Err(GameError::InvalidPlacement(Violation::RobberMustMove))
        );
        assert_eq!(relocate_robber(&mut board, 40), Err(GameError::NoSuchTile));
        assert_eq!(board.robber_tile(), 0);
    }
}
