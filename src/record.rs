//! What each move did, where it goes, and how a finished game is stored.

use crate::board::{PieceKind, Team};
use crate::error::ChessError;
use crate::moves::execute::Applied;
use crate::moves::types::CastleSide;
use crate::square::Position;
use crate::status::GameResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Marker {
    Check,
    Checkmate,
}

/// One applied move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub team: Team,
    pub piece: PieceKind,
    pub origin: Position,
    /// Landing square of the moving piece (the king's, when castling).
    pub destination: Position,
    pub captured: Option<PieceKind>,
    pub en_passant: bool,
    pub promotion: Option<PieceKind>,
    pub castle: Option<CastleSide>,
    pub marker: Option<Marker>,
}

impl MoveRecord {
    pub fn from_applied(applied: &Applied, marker: Option<Marker>) -> Self {
        MoveRecord {
            team: applied.team,
            piece: applied.mv.kind,
            origin: applied.mv.from,
            destination: applied.landing,
            captured: applied.captured.as_ref().map(|p| p.kind()),
            en_passant: applied.en_passant,
            promotion: applied.promotion.map(|(kind, _)| kind),
            castle: applied.castle,
            marker,
        }
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.castle {
            Some(CastleSide::King) => f.write_str("0-0")?,
            Some(CastleSide::Queen) => f.write_str("0-0-0")?,
            None => {
                let sep = if self.is_capture() { 'x' } else { '-' };
                write!(
                    f,
                    "{}{}{}{}",
                    self.piece.letter(),
                    self.origin,
                    sep,
                    self.destination
                )?;
                if let Some(kind) = self.promotion {
                    write!(f, "={}", kind.letter())?;
                }
            }
        }
        match self.marker {
            Some(Marker::Check) => f.write_str("+"),
            Some(Marker::Checkmate) => f.write_str("#"),
            None => Ok(()),
        }
    }
}

/// Receives every move as it is applied.
pub trait MoveSink {
    fn record(&mut self, record: &MoveRecord);
}

impl<S: MoveSink + ?Sized> MoveSink for &mut S {
    fn record(&mut self, record: &MoveRecord) {
        (**self).record(record)
    }
}

impl<S: MoveSink + ?Sized> MoveSink for Box<S> {
    fn record(&mut self, record: &MoveRecord) {
        (**self).record(record)
    }
}

impl<A: MoveSink, B: MoveSink> MoveSink for (A, B) {
    fn record(&mut self, record: &MoveRecord) {
        self.0.record(record);
        self.1.record(record);
    }
}

impl MoveSink for Vec<MoveRecord> {
    fn record(&mut self, record: &MoveRecord) {
        self.push(record.clone());
    }
}

/// Emits each move as an `info` event with target `moves`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl MoveSink for TracingSink {
    fn record(&mut self, record: &MoveRecord) {
        info!(
            target: "moves",
            team = %record.team,
            piece = ?record.piece,
            from = %record.origin,
            to = %record.destination,
            capture = ?record.captured,
            "{record}"
        );
    }
}

/// Shared list of records; clones see the same list.
#[derive(Debug, Default, Clone)]
pub struct MemorySink(Arc<Mutex<Vec<MoveRecord>>>);

impl MemorySink {
    pub fn new() -> Self {
        MemorySink::default()
    }

    /// Copy of everything recorded so far.
    pub fn records(&self) -> Vec<MoveRecord> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl MoveSink for MemorySink {
    fn record(&mut self, record: &MoveRecord) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
    }
}

/// A played game: its moves and, when it ended, the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    pub records: Vec<MoveRecord>,
    pub result: Option<GameResult>,
}

impl Transcript {
    pub fn new(records: Vec<MoveRecord>, result: Option<GameResult>) -> Self {
        Transcript { records, result }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ChessError> {
        let mut out = BufWriter::new(File::create(path)?);
        bincode::serialize_into(&mut out, self)?;
        out.flush()?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ChessError> {
        let input = BufReader::new(File::open(path)?);
        Ok(bincode::deserialize_from(input)?)
    }
}

impl fmt::Display for Transcript {
    /// Numbered move list, one full move per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut number = 0;
        for record in &self.records {
            match record.team {
                Team::White => {
                    if number > 0 {
                        writeln!(f)?;
                    }
                    number += 1;
                    write!(f, "{number}. {record}")?;
                }
                Team::Black if number == 0 => {
                    number += 1;
                    write!(f, "{number}. ... {record}")?;
                }
                Team::Black => write!(f, " {record}")?,
            }
        }
        if let Some(result) = self.result {
            if number > 0 {
                writeln!(f)?;
            }
            write!(f, "{result}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Position {
        s.parse().unwrap()
    }

    fn record(piece: PieceKind, from: &str, to: &str) -> MoveRecord {
        MoveRecord {
            team: Team::White,
            piece,
            origin: sq(from),
            destination: sq(to),
            captured: None,
            en_passant: false,
            promotion: None,
            castle: None,
            marker: None,
        }
    }

    #[test]
    fn long_algebraic_text() {
        assert_eq!(record(PieceKind::Knight, "g1", "f3").to_string(), "Ng1-f3");

        let mut ep = record(PieceKind::Pawn, "e5", "d6");
        ep.captured = Some(PieceKind::Pawn);
        ep.en_passant = true;
        assert_eq!(ep.to_string(), "e5xd6");

        let mut castle = record(PieceKind::King, "e1", "g1");
        castle.castle = Some(CastleSide::King);
        assert_eq!(castle.to_string(), "0-0");

        let mut promo = record(PieceKind::Pawn, "e7", "e8");
        promo.promotion = Some(PieceKind::Queen);
        promo.marker = Some(Marker::Check);
        assert_eq!(promo.to_string(), "e7-e8=Q+");

        let mut mate = record(PieceKind::Queen, "h5", "f7");
        mate.captured = Some(PieceKind::Pawn);
        mate.marker = Some(Marker::Checkmate);
        assert_eq!(mate.to_string(), "Qh5xf7#");
    }

    #[test]
    fn memory_sink_clones_share_records() {
        let sink = MemorySink::new();
        let mut writer = sink.clone();
        writer.record(&record(PieceKind::Knight, "g1", "f3"));
        let mut pair = (Vec::new(), writer);
        pair.record(&record(PieceKind::Knight, "b1", "c3"));
        assert_eq!(sink.records().len(), 2);
        assert_eq!(pair.0.len(), 1);
    }
}
