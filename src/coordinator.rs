//! Strict turn alternation between two mover threads sharing one game.
//!
//! A single mutex guards the game state and the move sink; one condition
//! variable hands the turn over. A mover blocks until the game has ended or
//! it is not the last side to have moved, plays its whole turn under the
//! lock, then wakes everyone. Terminal transitions wake everyone too, and a
//! woken mover that finds the game over returns without touching it.

use crate::board::Team;
use crate::error::ChessError;
use crate::game::{GameState, TurnOutcome};
use crate::random::RandomSource;
use crate::record::MoveSink;
use crate::status::GameResult;
use std::sync::{Condvar, Mutex, MutexGuard};
use std::thread;
use tracing::{debug, error};

struct Table<S> {
    state: GameState,
    sink: S,
}

/// Wakes every waiter when dropped, including on early return or unwind.
struct Release<'a>(&'a Condvar);

impl Drop for Release<'_> {
    fn drop(&mut self) {
        self.0.notify_all();
    }
}

fn poisoned<T>(_: T) -> ChessError {
    ChessError::Interrupted("game lock poisoned".into())
}

pub struct TurnCoordinator<S> {
    table: Mutex<Table<S>>,
    turn: Condvar,
}

impl<S: MoveSink> TurnCoordinator<S> {
    pub fn new(state: GameState, sink: S) -> Self {
        TurnCoordinator {
            table: Mutex::new(Table { state, sink }),
            turn: Condvar::new(),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Table<S>>, ChessError> {
        self.table.lock().map_err(poisoned)
    }

    /// Block until `team` may move, then play one turn.
    ///
    /// Returns [`TurnOutcome::Finished`] once the game is over, whether it
    /// ended on this turn or while waiting. A fatal error aborts the game for
    /// both sides and is returned to the caller that hit it; the other side
    /// then gets [`ChessError::Interrupted`].
    pub fn request_move<R>(&self, team: Team, rng: &mut R) -> Result<TurnOutcome, ChessError>
    where
        R: RandomSource + ?Sized,
    {
        let mut table = self.lock()?;
        let _release = Release(&self.turn);

        while table.state.in_progress() && !table.state.is_turn_of(team) {
            debug!(team = %team, "waiting for turn");
            table = self.turn.wait(table).map_err(poisoned)?;
        }

        let Table { state, sink } = &mut *table;
        if !state.in_progress() {
            return state
                .result()
                .map(TurnOutcome::Finished)
                .ok_or_else(|| ChessError::Interrupted("game was aborted".into()));
        }

        match state.take_turn(team, rng, sink) {
            Err(e) => {
                error!(team = %team, error = %e, "fatal error, aborting game");
                state.abort();
                Err(e)
            }
            outcome => outcome,
        }
    }

    /// `team` resigns; blocked movers wake and see the game over.
    pub fn resign(&self, team: Team) -> Result<Option<GameResult>, ChessError> {
        let mut table = self.lock()?;
        let _release = Release(&self.turn);
        Ok(table.state.resign(team))
    }

    pub fn result(&self) -> Result<Option<GameResult>, ChessError> {
        Ok(self.lock()?.state.result())
    }

    /// Copy of the current game state.
    pub fn snapshot(&self) -> Result<GameState, ChessError> {
        Ok(self.lock()?.state.clone())
    }

    pub fn into_parts(self) -> Result<(GameState, S), ChessError> {
        let Table { state, sink } = self.table.into_inner().map_err(poisoned)?;
        Ok((state, sink))
    }

    /// Keep requesting turns for `team` until the game ends.
    pub fn run_mover<R>(&self, team: Team, rng: &mut R) -> Result<GameResult, ChessError>
    where
        R: RandomSource + ?Sized,
    {
        loop {
            if let TurnOutcome::Finished(result) = self.request_move(team, rng)? {
                return Ok(result);
            }
        }
    }
}

impl<S: MoveSink + Send> TurnCoordinator<S> {
    /// Run both movers on their own threads until the game ends.
    ///
    /// When a mover fails, the error it hit is returned in preference to the
    /// interruption its peer sees.
    pub fn play<W, B>(&self, mut white: W, mut black: B) -> Result<GameResult, ChessError>
    where
        W: RandomSource + Send,
        B: RandomSource + Send,
    {
        let (white, black) = thread::scope(|s| {
            let w = s.spawn(|| self.run_mover(Team::White, &mut white));
            let b = s.spawn(|| self.run_mover(Team::Black, &mut black));
            let panicked = |team: Team| ChessError::Interrupted(format!("{team} mover panicked"));
            (
                w.join().unwrap_or_else(|_| Err(panicked(Team::White))),
                b.join().unwrap_or_else(|_| Err(panicked(Team::Black))),
            )
        });

        match (white, black) {
            (Ok(result), _) | (_, Ok(result)) => Ok(result),
            (Err(ChessError::Interrupted(_)), Err(e)) | (Err(e), Err(_)) => Err(e),
        }
    }
}
