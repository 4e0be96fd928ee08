//! A local stand-in for the game server: holds both players' boards, applies
//! submitted actions, plays a simple random opponent, and serves the sync
//! payloads the engine consumes.
//!
//! Rule validation here is shallow: turn order, move resolvability and game
//! over, enough to exercise the engine's failure paths the way a real server
//! would.

use rand::seq::SliceRandom;
use rand::Rng;

use subduel::action::{ActionRequest, ActionSubmitter, SubmitError};
use subduel::board::{Coordinate, Direction, BOARD_SIZE};
use subduel::fleet::Fleet;
use subduel::flow::{attack_candidates, move_candidates};
use subduel::state::{AllyBoardState, GameId, GameStateView, PlayerId, SubmarineState};

/// Submarines each player starts with, after the original game's setup.
const SUBMARINES_PER_PLAYER: usize = 4;

/// Hit points each submarine starts with.
const INITIAL_HP: u32 = 3;

struct MockSubmarine {
    id: String,
    owner: PlayerId,
    position: Coordinate,
    hp: u32,
    sunk: bool,
}

/// The mock game session. Implements [`ActionSubmitter`] so the engine can
/// own it directly; the front end reaches it through
/// [`Engine::submitter_mut`][subduel::flow::Engine::submitter_mut] for sync
/// payloads and the opponent's turns.
pub struct MockServer {
    game_id: GameId,
    players: [PlayerId; 2],
    current: usize,
    turn: u32,
    submarines: Vec<MockSubmarine>,
    log: Vec<String>,
}

impl MockServer {
    /// Create a session with both fleets placed randomly and `players[0]`
    /// holding the first turn.
    pub fn new(rng: &mut impl Rng, player_a: PlayerId, player_b: PlayerId) -> Self {
        let mut server = Self {
            game_id: GameId::from(format!("mock-{:08x}", rng.gen::<u32>())),
            players: [player_a, player_b],
            current: 0,
            turn: 1,
            submarines: Vec::new(),
            log: Vec::new(),
        };
        for side in 0..2 {
            for n in 0..SUBMARINES_PER_PLAYER {
                let position = server.random_free_cell(rng);
                let owner = server.players[side].clone();
                server.submarines.push(MockSubmarine {
                    id: format!("{}-s{}", owner, n + 1),
                    owner,
                    position,
                    hp: INITIAL_HP,
                    sunk: false,
                });
            }
        }
        server
    }

    fn random_free_cell(&self, rng: &mut impl Rng) -> Coordinate {
        loop {
            let cell = Coordinate::new(
                rng.gen_range(1, BOARD_SIZE + 1),
                rng.gen_range(1, BOARD_SIZE + 1),
            );
            if !self.submarines.iter().any(|sub| sub.position == cell) {
                return cell;
            }
        }
    }

    /// The player whose turn it is.
    pub fn current_player(&self) -> &PlayerId {
        &self.players[self.current]
    }

    /// The winner, once every submarine on one side is sunk.
    pub fn winner(&self) -> Option<&PlayerId> {
        for side in 0..2 {
            let loser = &self.players[side];
            if self
                .submarines
                .iter()
                .filter(|sub| &sub.owner == loser)
                .all(|sub| sub.sunk)
            {
                return Some(&self.players[1 - side]);
            }
        }
        None
    }

    /// Action log lines, oldest first.
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Every submarine on the board with its owner, for rendering.
    pub fn cells(&self) -> impl Iterator<Item = (Coordinate, &PlayerId, u32, bool)> {
        self.submarines
            .iter()
            .map(|sub| (sub.position, &sub.owner, sub.hp, sub.sunk))
    }

    /// The sync payload the state endpoint would serve to `viewer`.
    pub fn state_for(&self, viewer: &PlayerId) -> GameStateView {
        let submarines = self
            .submarines
            .iter()
            .filter(|sub| &sub.owner == viewer)
            .map(|sub| {
                (
                    sub.id.clone(),
                    SubmarineState {
                        x: sub.position.x,
                        y: sub.position.y,
                        hp: sub.hp,
                        sunk: sub.sunk,
                    },
                )
            })
            .collect();
        GameStateView {
            game_id: Some(self.game_id.clone()),
            current_player_id: self.current_player().clone(),
            ally_board: AllyBoardState { submarines },
        }
    }

    /// Fleet snapshot of `owner`'s submarines, used to reuse the engine's
    /// candidate rules for the scripted opponent.
    fn fleet_of(&self, owner: &PlayerId) -> Fleet {
        Fleet::from_sync(&self.state_for(owner).ally_board)
    }

    /// Apply one point of damage at `target`. Returns the report name.
    fn resolve_attack(&mut self, target: Coordinate) -> &'static str {
        match self
            .submarines
            .iter_mut()
            .find(|sub| !sub.sunk && sub.position == target)
        {
            Some(sub) => {
                sub.hp = sub.hp.saturating_sub(1);
                if sub.hp == 0 {
                    sub.sunk = true;
                    "hitAndSunk"
                } else {
                    "hit"
                }
            }
            None => "miss",
        }
    }

    /// Resolve a move request to a submarine and destination. The wire form
    /// carries no submarine id, so the first live submarine (in id order)
    /// with a clear path wins, matching the prototype server.
    fn resolve_move(
        &self,
        player: &PlayerId,
        direction: Direction,
        distance: u8,
    ) -> Option<(usize, Coordinate)> {
        let fleet = self.fleet_of(player);
        let mut movable: Vec<usize> = (0..self.submarines.len())
            .filter(|&i| {
                let sub = &self.submarines[i];
                &sub.owner == player && !sub.sunk
            })
            .collect();
        movable.sort_by(|&a, &b| self.submarines[a].id.cmp(&self.submarines[b].id));
        for i in movable {
            let source = self.submarines[i].position;
            if let Some(dest) = source.step(direction, distance) {
                if move_candidates(source, &fleet).contains(&dest)
                    && !self.occupied_by(dest, self.opponent_of(player))
                {
                    return Some((i, dest));
                }
            }
        }
        None
    }

    fn occupied_by(&self, cell: Coordinate, owner: &PlayerId) -> bool {
        self.submarines
            .iter()
            .any(|sub| &sub.owner == owner && sub.position == cell)
    }

    fn opponent_of(&self, player: &PlayerId) -> &PlayerId {
        if player == &self.players[0] {
            &self.players[1]
        } else {
            &self.players[0]
        }
    }

    fn end_turn(&mut self) {
        self.current = 1 - self.current;
        self.turn += 1;
    }

    /// Log form of a cell, with the row as a letter the way the front end
    /// labels it.
    fn cell_label(cell: Coordinate) -> String {
        format!("{},{}", cell.x, (b'A' + (cell.y - 1) as u8) as char)
    }

    /// Let the scripted opponent take its turn: a random attack from a
    /// random live submarine when possible, otherwise a random move,
    /// otherwise a pass.
    pub fn opponent_act(&mut self, rng: &mut impl Rng, opponent: &PlayerId) {
        let fleet = self.fleet_of(opponent);
        let actors: Vec<Coordinate> = fleet.live().map(|sub| sub.position).collect();

        if let Some(&actor) = actors.as_slice().choose(rng) {
            if rng.gen_bool(0.5) {
                let candidates = attack_candidates(actor, &fleet);
                if let Some(&target) = candidates.as_slice().choose(rng) {
                    let report = self.resolve_attack(target);
                    self.log.push(format!(
                        "T{} {} attack target({}) {}",
                        self.turn,
                        opponent,
                        Self::cell_label(target),
                        report
                    ));
                    self.end_turn();
                    return;
                }
            }
            let candidates = move_candidates(actor, &fleet);
            if let Some(&dest) = candidates.as_slice().choose(rng) {
                if let Some(sub) = self
                    .submarines
                    .iter_mut()
                    .find(|sub| sub.position == actor && &sub.owner == opponent)
                {
                    sub.position = dest;
                    self.log
                        .push(format!("T{} {} move moveSuccess", self.turn, opponent));
                    self.end_turn();
                    return;
                }
            }
        }
        self.log.push(format!("T{} {} pass", self.turn, opponent));
        self.end_turn();
    }
}

impl ActionSubmitter for MockServer {
    fn submit(&mut self, request: &ActionRequest) -> Result<(), SubmitError> {
        if self.winner().is_some() {
            return Err(SubmitError::new("gameOver"));
        }
        if request.player_id() != self.current_player() {
            return Err(SubmitError::new("invalidTurn"));
        }
        if request.game_id() != &self.game_id {
            return Err(SubmitError::new("invalidAction"));
        }

        match request {
            ActionRequest::Attack { target, .. } => {
                let target = *target;
                let player = request.player_id().clone();
                let report = self.resolve_attack(target);
                self.log.push(format!(
                    "T{} {} attack target({}) {}",
                    self.turn,
                    player,
                    Self::cell_label(target),
                    report
                ));
            }
            ActionRequest::Move {
                direction,
                distance,
                ..
            } => {
                let player = request.player_id().clone();
                match self.resolve_move(&player, *direction, *distance) {
                    Some((i, dest)) => {
                        self.submarines[i].position = dest;
                        self.log.push(format!(
                            "T{} {} move dir:{} dist:{} moveSuccess",
                            self.turn, player, direction, distance
                        ));
                    }
                    None => {
                        self.log.push(format!(
                            "T{} {} move dir:{} dist:{} moveBlocked",
                            self.turn, player, direction, distance
                        ));
                        return Err(SubmitError::new("moveBlocked"));
                    }
                }
            }
        }
        self.end_turn();
        Ok(())
    }
}
