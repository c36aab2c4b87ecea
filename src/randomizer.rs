use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::shape::PieceKind;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub enum RandomizerKind {
    #[default]
    TrueRandom,
    SinglePiece {
        piece: PieceKind,
    },
    /// L, I, O, T in order, forever.
    Cycle,
}

pub trait Randomizer {
    fn next(&mut self) -> PieceKind;
}

struct TrueRandom {
    rng: StdRng,
}

impl Randomizer for TrueRandom {
    fn next(&mut self) -> PieceKind {
        *PieceKind::all()
            .choose(&mut self.rng)
            .unwrap_or(&PieceKind::O)
    }
}

struct SinglePiece {
    piece: PieceKind,
}

impl Randomizer for SinglePiece {
    fn next(&mut self) -> PieceKind {
        self.piece
    }
}

struct Cycle {
    cursor: usize,
}

impl Randomizer for Cycle {
    fn next(&mut self) -> PieceKind {
        let all = PieceKind::all();
        let piece = all[self.cursor % all.len()];
        self.cursor = self.cursor.wrapping_add(1);
        piece
    }
}

pub fn randomizer_from_kind(kind: &RandomizerKind, seed: Option<u64>) -> Box<dyn Randomizer> {
    match kind {
        RandomizerKind::TrueRandom => {
            let rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            Box::new(TrueRandom { rng })
        }
        RandomizerKind::SinglePiece { piece } => Box::new(SinglePiece { piece: *piece }),
        RandomizerKind::Cycle => Box::new(Cycle { cursor: 0 }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_random_is_reproducible() {
        let mut a = randomizer_from_kind(&RandomizerKind::TrueRandom, Some(7));
        let mut b = randomizer_from_kind(&RandomizerKind::TrueRandom, Some(7));
        let left: Vec<PieceKind> = (0..32).map(|_| a.next()).collect();
        let right: Vec<PieceKind> = (0..32).map(|_| b.next()).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn random_eventually_deals_every_piece() {
        let mut r = randomizer_from_kind(&RandomizerKind::TrueRandom, Some(11));
        let dealt: Vec<PieceKind> = (0..200).map(|_| r.next()).collect();
        for kind in PieceKind::all() {
            assert!(dealt.contains(&kind), "{kind:?} never dealt");
        }
    }

    #[test]
    fn cycle_walks_all_pieces_in_order() {
        let mut r = randomizer_from_kind(&RandomizerKind::Cycle, None);
        let dealt: Vec<PieceKind> = (0..5).map(|_| r.next()).collect();
        assert_eq!(
            dealt,
            vec![PieceKind::L, PieceKind::I, PieceKind::O, PieceKind::T, PieceKind::L]
        );
    }

    #[test]
    fn single_piece_never_changes() {
        let mut r = randomizer_from_kind(&RandomizerKind::SinglePiece { piece: PieceKind::T }, None);
        assert!((0..10).all(|_| r.next() == PieceKind::T));
    }
}
