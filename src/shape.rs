use serde::{Deserialize, Serialize};

pub type Offset = [i32; 3];

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    L,
    I,
    O,
    T,
}

impl PieceKind {
    pub fn all() -> [PieceKind; 4] {
        [PieceKind::L, PieceKind::I, PieceKind::O, PieceKind::T]
    }

    /// Cell offsets from the piece origin; y points up, so every piece hangs
    /// below its origin.
    pub fn offsets(self) -> [Offset; 4] {
        match self {
            PieceKind::L => [[0, 0, 0], [0, -1, 0], [0, -2, 0], [1, -2, 0]],
            PieceKind::I => [[0, 0, 0], [0, -1, 0], [0, -2, 0], [0, -3, 0]],
            PieceKind::O => [[0, 0, 0], [1, 0, 0], [0, -1, 0], [1, -1, 0]],
            PieceKind::T => [[0, 0, 0], [-1, -1, 0], [0, -1, 0], [1, -1, 0]],
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            PieceKind::L => "#00BCD4",
            PieceKind::I => "#FF5722",
            PieceKind::O => "#FFEB3B",
            PieceKind::T => "#9C27B0",
        }
    }

    /// Deepest cell below the origin.
    pub fn depth(self) -> i32 {
        self.offsets().iter().map(|o| -o[1]).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_piece_has_four_distinct_cells() {
        for kind in PieceKind::all() {
            let cells: HashSet<Offset> = kind.offsets().into_iter().collect();
            assert_eq!(cells.len(), 4, "{kind:?}");
            assert!(cells.contains(&[0, 0, 0]), "{kind:?} must include its origin");
        }
    }

    #[test]
    fn pieces_hang_below_origin() {
        for kind in PieceKind::all() {
            assert!(kind.offsets().iter().all(|o| o[1] <= 0));
        }
        assert_eq!(PieceKind::I.depth(), 3);
        assert_eq!(PieceKind::O.depth(), 1);
    }

    #[test]
    fn colors_are_distinct() {
        let colors: HashSet<&str> = PieceKind::all().iter().map(|k| k.color()).collect();
        assert_eq!(colors.len(), 4);
    }
}
