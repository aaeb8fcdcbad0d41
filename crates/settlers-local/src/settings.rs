//! Game settings read from the environment.

use settlers_core::config::PLAYER_COUNT;
use settlers_core::{DiceMode, GameConfig, RoadRule};
use thiserror::Error;

pub const SEED_VAR: &str = "SETTLERS_SEED";
pub const DICE_VAR: &str = "SETTLERS_DICE";
pub const ROAD_RULE_VAR: &str = "SETTLERS_ROAD_RULE";
pub const PLAYERS_VAR: &str = "SETTLERS_PLAYERS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("SETTLERS_SEED must be an unsigned integer, got {0:?}")]
    InvalidSeed(String),

    #[error("SETTLERS_DICE must be \"two-dice\" or \"flat\", got {0:?}")]
    InvalidDice(String),

    #[error("SETTLERS_ROAD_RULE must be \"strict\" or \"lenient\", got {0:?}")]
    InvalidRoadRule(String),

    #[error("SETTLERS_PLAYERS must name four players, got {0}")]
    PlayerCount(usize),
}

/// Build the game settings from process environment variables
pub fn config_from_env() -> Result<GameConfig, SettingsError> {
    config_from(|key| std::env::var(key).ok())
}

/// Build the game settings from any variable lookup. Unset or empty
/// variables keep their defaults.
pub fn config_from<F>(lookup: F) -> Result<GameConfig, SettingsError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let mut config = GameConfig::default();

    if let Some(seed) = get(SEED_VAR) {
        config.seed = Some(
            seed.trim()
                .parse()
                .map_err(|_| SettingsError::InvalidSeed(seed.clone()))?,
        );
    }

    if let Some(dice) = get(DICE_VAR) {
        config.dice = match dice.trim() {
            "two-dice" => DiceMode::TwoDice,
            "flat" => DiceMode::Flat,
            _ => return Err(SettingsError::InvalidDice(dice)),
        };
    }

    if let Some(rule) = get(ROAD_RULE_VAR) {
        config.road_rule = match rule.trim() {
            "strict" => RoadRule::Strict,
            "lenient" => RoadRule::Lenient,
            _ => return Err(SettingsError::InvalidRoadRule(rule)),
        };
    }

    if let Some(players) = get(PLAYERS_VAR) {
        let names: Vec<String> = players
            .split(',')
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        if names.len() != PLAYER_COUNT {
            return Err(SettingsError::PlayerCount(names.len()));
        }
        config.player_names = names;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_empty_environment_gives_defaults() {
        assert_eq!(config_from(lookup(&[])), Ok(GameConfig::default()));
    }

    #[test]
    fn test_all_variables() {
        let config = config_from(lookup(&[
            (SEED_VAR, "1234"),
            (DICE_VAR, "flat"),
            (ROAD_RULE_VAR, "lenient"),
            (PLAYERS_VAR, "Ann, Bo ,Cy,Di"),
        ]))
        .unwrap();

        assert_eq!(config.seed, Some(1234));
        assert_eq!(config.dice, DiceMode::Flat);
        assert_eq!(config.road_rule, RoadRule::Lenient);
        assert_eq!(config.player_names, vec!["Ann", "Bo", "Cy", "Di"]);
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let config = config_from(lookup(&[(SEED_VAR, "  "), (DICE_VAR, "")])).unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_bad_values_rejected() {
        assert_eq!(
            config_from(lookup(&[(SEED_VAR, "-3")])),
            Err(SettingsError::InvalidSeed("-3".into()))
        );
        assert_eq!(
            config_from(lookup(&[(DICE_VAR, "d20")])),
            Err(SettingsError::InvalidDice("d20".into()))
        );
        assert_eq!(
            config_from(lookup(&[(ROAD_RULE_VAR, "loose")])),
            Err(SettingsError::InvalidRoadRule("loose".into()))
        );
        assert_eq!(
            config_from(lookup(&[(PLAYERS_VAR, "Ann,Bo")])),
            Err(SettingsError::PlayerCount(2))
        );
    }
}
