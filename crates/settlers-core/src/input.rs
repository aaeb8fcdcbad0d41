//! Turning pointer clicks into game actions.
//!
//! The [`Controller`] is fed one [`InputEvent`] at a time and never blocks, so
//! it can sit behind any event source: a terminal, a window, or a script.

use crate::actions::{GameAction, GameEvent, RenderSink};
use crate::board::{LocationId, Resource};
use crate::game::{GameError, GamePhase, GameState, SetupPlacing, TurnStage};
use crate::geometry::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// A raw pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    Quit,
    PointerDown { x: i32, y: i32 },
    /// A click
    PointerUp { x: i32, y: i32 },
}

/// Somewhere input events come from
pub trait InputSource {
    fn next_event(&mut self) -> InputEvent;
}

/// Replays a fixed list of events, then quits
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    events: VecDeque<InputEvent>,
}

impl ScriptedInput {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    /// A click at each point in order
    pub fn clicks(points: impl IntoIterator<Item = Point>) -> Self {
        Self::new(
            points
                .into_iter()
                .map(|p| InputEvent::PointerUp { x: p.x, y: p.y }),
        )
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl InputSource for ScriptedInput {
    fn next_event(&mut self) -> InputEvent {
        self.events.pop_front().unwrap_or(InputEvent::Quit)
    }
}

/// Buttons on the control panel to the right of the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Button {
    Roll,
    Settlement,
    Road,
    City,
    Trade,
    EndTurn,
    Resource(Resource),
}

const BUTTON_WIDTH: i32 = 60;
const BUTTON_HEIGHT: i32 = 65;

const fn button(x: i32, y: i32) -> Rect {
    Rect::new(x, y, BUTTON_WIDTH, BUTTON_HEIGHT)
}

/// Panel layout: actions in the left column, resources in the right
pub const CONTROL_PANEL: [(Button, Rect); 11] = [
    (Button::Roll, button(1030, 30)),
    (Button::Settlement, button(1030, 110)),
    (Button::Road, button(1030, 190)),
    (Button::City, button(1030, 270)),
    (Button::Trade, button(1030, 350)),
    (Button::EndTurn, button(1030, 430)),
    (Button::Resource(Resource::Wheat), button(1110, 30)),
    (Button::Resource(Resource::Wool), button(1110, 110)),
    (Button::Resource(Resource::Wood), button(1110, 190)),
    (Button::Resource(Resource::Ore), button(1110, 270)),
    (Button::Resource(Resource::Brick), button(1110, 350)),
];

/// The panel button under a point, if any
pub fn button_at(point: Point) -> Option<Button> {
    CONTROL_PANEL
        .iter()
        .find(|(_, rect)| rect.contains(point))
        .map(|(button, _)| *button)
}

/// Center of a button, handy for scripting clicks
pub fn button_center(target: Button) -> Option<Point> {
    CONTROL_PANEL
        .iter()
        .find(|(button, _)| *button == target)
        .map(|(_, rect)| Point::new(rect.x + rect.width / 2, rect.y + rect.height / 2))
}

/// What board clicks mean while building
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Idle,
    Settlement,
    Road,
    City,
    Trade {
        give: Option<Resource>,
    },
}

/// Whether to keep reading input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Input interpreter for one game
#[derive(Debug, Clone, Default)]
pub struct Controller {
    mode: Mode,
    /// First end of a road being drawn
    road_start: Option<LocationId>,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Handle one event. Rejected clicks are reported through the sink and the
    /// game carries on.
    pub fn feed<S: RenderSink>(
        &mut self,
        game: &mut GameState,
        event: InputEvent,
        sink: &mut S,
    ) -> Flow {
        let point = match event {
            InputEvent::Quit => return Flow::Quit,
            InputEvent::PointerDown { .. } => return Flow::Continue,
            InputEvent::PointerUp { x, y } => Point::new(x, y),
        };

        let phase = game.phase;
        let outcome = self
            .interpret(game, point)
            .and_then(|action| match action {
                Some(action) => game.apply_action(action).map(Some),
                None => Ok(None),
            });

        match outcome {
            Ok(Some(events)) => {
                for event in events {
                    sink.notify(event);
                }
                if game.phase != phase {
                    self.reset();
                }
            }
            Ok(None) => {}
            Err(error) => self.reject(game, error, sink),
        }

        Flow::Continue
    }

    fn reset(&mut self) {
        self.mode = Mode::Idle;
        self.road_start = None;
    }

    fn reject<S: RenderSink>(&mut self, game: &GameState, error: GameError, sink: &mut S) {
        warn!(player = game.current_player, %error, "input rejected");
        self.road_start = None;
        sink.notify(GameEvent::TurnTextChanged {
            text: format!("{error}. {}", game.prompt()),
        });
    }

    /// Work out which action a click stands for, if any yet
    fn interpret(&mut self, game: &GameState, point: Point) -> Result<Option<GameAction>, GameError> {
        let button = button_at(point);

        match game.phase {
            GamePhase::SetupForward { placing } | GamePhase::SetupBackward { placing } => {
                if button.is_some() {
                    return Ok(None);
                }
                let location = game.board.location_at(point)?;
                match placing {
                    SetupPlacing::Settlement => Ok(Some(GameAction::PlaceSettlement(location))),
                    SetupPlacing::Road => Ok(self.road_click(location)),
                }
            }

            GamePhase::Turn(TurnStage::AwaitingRoll) => match button {
                Some(Button::Roll) => Ok(Some(GameAction::RollDice)),
                _ => Ok(None),
            },

            GamePhase::Turn(TurnStage::AwaitingRobber) => {
                if button.is_some() {
                    return Ok(None);
                }
                let tile = game.board.tile_at(point)?;
                Ok(Some(GameAction::MoveRobber(tile)))
            }

            GamePhase::Turn(TurnStage::Building) => match button {
                Some(button) => Ok(self.press(button)),
                None => self.building_click(game, point),
            },
        }
    }

    fn press(&mut self, button: Button) -> Option<GameAction> {
        self.road_start = None;
        let (mode, action) = match (button, self.mode) {
            (Button::Roll, mode) => (mode, None),
            (Button::Settlement, _) => (Mode::Settlement, None),
            (Button::Road, _) => (Mode::Road, None),
            (Button::City, _) => (Mode::City, None),
            (Button::Trade, _) => (Mode::Trade { give: None }, None),
            (Button::EndTurn, _) => (Mode::Idle, Some(GameAction::EndTurn)),
            (Button::Resource(give), Mode::Trade { give: None }) => {
                (Mode::Trade { give: Some(give) }, None)
            }
            (Button::Resource(receive), Mode::Trade { give: Some(give) }) => {
                (Mode::Idle, Some(GameAction::BankTrade { give, receive }))
            }
            (Button::Resource(_), mode) => (mode, None),
        };
        debug!(?button, ?mode, "panel button pressed");
        self.mode = mode;
        action
    }

    fn building_click(
        &mut self,
        game: &GameState,
        point: Point,
    ) -> Result<Option<GameAction>, GameError> {
        let action = match self.mode {
            Mode::Settlement => Some(GameAction::PlaceSettlement(game.board.location_at(point)?)),
            Mode::City => Some(GameAction::PlaceCity(game.board.location_at(point)?)),
            Mode::Road => self.road_click(game.board.location_at(point)?),
            Mode::Idle | Mode::Trade { .. } => None,
        };
        Ok(action)
    }

    /// Roads take two clicks; clicking the first end again cancels
    fn road_click(&mut self, location: LocationId) -> Option<GameAction> {
        match self.road_start.take() {
            None => {
                self.road_start = Some(location);
                None
            }
            Some(start) if start == location => None,
            Some(start) => Some(GameAction::PlaceRoad(start, location)),
        }
    }
}

/// Drive a game from an input source until it quits
pub fn run<I: InputSource, S: RenderSink>(game: &mut GameState, input: &mut I, sink: &mut S) {
    for event in game.announce() {
        sink.notify(event);
    }

    let mut controller = Controller::new();
    loop {
        let event = input.next_event();
        if controller.feed(game, event, sink) == Flow::Quit {
            info!(turn = game.turn_number, "quit");
            break;
        }
    }
}
