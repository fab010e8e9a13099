use crate::board::{Board, PROMOTIONS, PieceId, PieceKind, Team};
use crate::config::GameConfig;
use crate::error::ChessError;
use crate::moves::execute::make_move;
use crate::moves::types::Move;
use crate::random::{RandomSource, choose};
use crate::record::{Marker, MoveRecord, MoveSink};
use crate::status::{GameResult, Reason, Verdict, evaluate};
use std::collections::BTreeSet;
use tracing::{debug, info, instrument};

/// One side: its team and the ids of its pieces still on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    team: Team,
    roster: BTreeSet<PieceId>,
}

impl Player {
    /// Every piece of `team` currently on `board`.
    pub fn from_board(board: &Board, team: Team) -> Self {
        Player {
            team,
            roster: board.pieces_of(team).map(|p| p.id()).collect(),
        }
    }

    pub fn team(&self) -> Team {
        self.team
    }

    pub fn roster(&self) -> &BTreeSet<PieceId> {
        &self.roster
    }

    pub fn pieces(&self) -> impl Iterator<Item = PieceId> + '_ {
        self.roster.iter().copied()
    }

    pub fn owns(&self, id: PieceId) -> bool {
        self.roster.contains(&id)
    }

    fn capture(&mut self, id: PieceId) -> bool {
        self.roster.remove(&id)
    }

    fn replace(&mut self, old: PieceId, new: PieceId) {
        self.roster.remove(&old);
        self.roster.insert(new);
    }
}

/// Result of one call to [`GameState::take_turn`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Moved(MoveRecord),
    Finished(GameResult),
}

/// The whole game: board, both players and whose turn it is.
///
/// Once `in_progress` clears it never sets again and nothing else changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    players: [Player; 2],
    last_mover: Option<Team>,
    in_progress: bool,
    result: Option<GameResult>,
    plies: u32,
    config: GameConfig,
}

impl GameState {
    /// Standard layout, White to move.
    pub fn new(config: GameConfig) -> Self {
        GameState::assemble(Board::new(), Team::White, config)
    }

    pub fn from_fen(fen: &str, config: GameConfig) -> Result<Self, ChessError> {
        let (board, to_move) = Board::from_fen(fen)?;
        GameState::from_board(board, to_move, config)
    }

    pub fn from_board(board: Board, to_move: Team, config: GameConfig) -> Result<Self, ChessError> {
        board.validate()?;
        Ok(GameState::assemble(board, to_move, config))
    }

    fn assemble(board: Board, to_move: Team, config: GameConfig) -> Self {
        let players = [
            Player::from_board(&board, Team::White),
            Player::from_board(&board, Team::Black),
        ];
        GameState {
            board,
            players,
            last_mover: Some(!to_move),
            in_progress: true,
            result: None,
            plies: 0,
            config,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player(&self, team: Team) -> &Player {
        &self.players[team as usize]
    }

    fn player_mut(&mut self, team: Team) -> &mut Player {
        &mut self.players[team as usize]
    }

    /// (side to move, the other side)
    fn sides(&self, active: Team) -> (&Player, &Player) {
        (self.player(active), self.player(!active))
    }

    pub fn last_mover(&self) -> Option<Team> {
        self.last_mover
    }

    pub fn to_move(&self) -> Team {
        self.last_mover.map_or(Team::White, Team::opposite)
    }

    pub fn is_turn_of(&self, team: Team) -> bool {
        self.last_mover != Some(team)
    }

    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    /// `None` while playing, and also after an abort.
    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    pub fn plies(&self) -> u32 {
        self.plies
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// How the position stands for the side to move.
    pub fn evaluate(&self) -> Result<Verdict, ChessError> {
        let (active, opponent) = self.sides(self.to_move());
        evaluate(&self.board, active, opponent, self.config.material)
    }

    /// Moves the side to move may choose from; empty once the game is over.
    pub fn legal_moves(&self) -> Result<Vec<Move>, ChessError> {
        match self.evaluate()? {
            Verdict::Play { moves, .. } => Ok(moves),
            Verdict::Over(_) => Ok(Vec::new()),
        }
    }

    /// Play one turn for `team`: pick uniformly among the candidates and
    /// apply the move, or end the game when there is nothing to play.
    #[instrument(level = "debug", skip(self, rng, sink), fields(ply = self.plies))]
    pub fn take_turn<R, S>(
        &mut self,
        team: Team,
        rng: &mut R,
        sink: &mut S,
    ) -> Result<TurnOutcome, ChessError>
    where
        R: RandomSource + ?Sized,
        S: MoveSink + ?Sized,
    {
        if !self.in_progress {
            return self
                .result
                .map(TurnOutcome::Finished)
                .ok_or_else(|| ChessError::Interrupted("game was aborted".into()));
        }
        if !self.is_turn_of(team) {
            return Err(ChessError::OutOfTurn(team));
        }

        if let Some(max) = self.config.max_plies
            && self.plies >= max
        {
            info!(team = %team, plies = self.plies, "ply limit reached, resigning");
            let result = GameResult::win(!team, Reason::Resignation);
            self.last_mover = Some(team);
            self.finish(result);
            return Ok(TurnOutcome::Finished(result));
        }

        let (active, opponent) = self.sides(team);
        match evaluate(&self.board, active, opponent, self.config.material)? {
            Verdict::Over(result) => {
                self.last_mover = Some(team);
                self.finish(result);
                Ok(TurnOutcome::Finished(result))
            }
            Verdict::Play { in_check, moves } => {
                debug!(candidates = moves.len(), in_check, "choosing move");
                let mv = *choose(rng, &moves).ok_or_else(|| {
                    ChessError::Corrupted("empty candidate set for a live game".into())
                })?;
                self.apply(mv, rng, sink).map(TurnOutcome::Moved)
            }
        }
    }

    /// Apply `mv` for the side that owns the piece, record it and judge the
    /// reply position. A promotion kind is drawn from `rng`.
    pub fn apply<R, S>(&mut self, mv: Move, rng: &mut R, sink: &mut S) -> Result<MoveRecord, ChessError>
    where
        R: RandomSource + ?Sized,
        S: MoveSink + ?Sized,
    {
        let team = self.board.get(mv.piece)?.team();
        if !self.in_progress || !self.is_turn_of(team) {
            return Err(ChessError::OutOfTurn(team));
        }
        if !self.player(team).owns(mv.piece) {
            return Err(ChessError::PieceMissing(mv.piece));
        }

        let promote_to = if mv.kind == PieceKind::Pawn && mv.to.y() == team.promotion_rank() {
            choose(rng, &PROMOTIONS).copied()
        } else {
            None
        };

        let applied = make_move(&mut self.board, mv, promote_to)?;
        if let Some(captured) = &applied.captured
            && !self.player_mut(!team).capture(captured.id())
        {
            return Err(ChessError::Corrupted(format!(
                "captured {:?} was not on the {} roster",
                captured.id(),
                !team
            )));
        }
        if let Some((_, id)) = applied.promotion {
            self.player_mut(team).replace(mv.piece, id);
        }
        self.last_mover = Some(team);
        self.plies += 1;

        let (next, mover) = self.sides(!team);
        let verdict = evaluate(&self.board, next, mover, self.config.material)?;
        let marker = match &verdict {
            Verdict::Over(GameResult {
                reason: Reason::Checkmate,
                ..
            }) => Some(Marker::Checkmate),
            Verdict::Play { in_check: true, .. } => Some(Marker::Check),
            _ => None,
        };

        let record = MoveRecord::from_applied(&applied, marker);
        sink.record(&record);
        if let Verdict::Over(result) = verdict {
            self.finish(result);
        }
        Ok(record)
    }

    /// `team` gives up. Returns the result, which is the existing one if the
    /// game had already ended.
    pub fn resign(&mut self, team: Team) -> Option<GameResult> {
        self.finish(GameResult::win(!team, Reason::Resignation));
        self.result
    }

    /// End the game with no result after a fatal error.
    pub(crate) fn abort(&mut self) {
        if self.in_progress {
            self.in_progress = false;
            info!(plies = self.plies, "game aborted");
        }
    }

    fn finish(&mut self, result: GameResult) {
        if !self.in_progress {
            return;
        }
        self.in_progress = false;
        self.result = Some(result);
        info!(%result, plies = self.plies, "game over");
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new(GameConfig::default())
    }
}
