//! Spatial index over extracted notes.
//!
//! Notes are bucketed by layer and sorted by tick inside each bucket, so a
//! rectangle query is a binary search per populated visible layer. Only
//! layers holding notes get a bucket.

use std::collections::BTreeMap;

use crate::note::Note;
use crate::song::Song;

/// Inclusive rectangle on the tick x layer grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridRect {
    pub first_tick: u32,
    pub first_layer: u32,
    pub last_tick: u32,
    pub last_layer: u32,
}

impl GridRect {
    /// Rectangle starting at `(tick, layer)` spanning `ticks x layers` cells.
    ///
    /// Returns `None` when either span is zero.
    pub fn from_origin(tick: u32, layer: u32, ticks: u32, layers: u32) -> Option<Self> {
        if ticks == 0 || layers == 0 {
            return None;
        }
        Some(Self {
            first_tick: tick,
            first_layer: layer,
            last_tick: tick.saturating_add(ticks - 1),
            last_layer: layer.saturating_add(layers - 1),
        })
    }

    /// Whether a note lies inside the rectangle.
    pub fn contains(&self, note: &Note) -> bool {
        (self.first_tick..=self.last_tick).contains(&note.tick)
            && (self.first_layer..=self.last_layer).contains(&note.layer)
    }
}

/// Notes of a song indexed for rectangle queries.
#[derive(Debug, Clone, Default)]
pub struct NoteGrid {
    /// Tick-sorted buckets of the layers that hold at least one note.
    layers: BTreeMap<u32, Vec<Note>>,
    len: usize,
    max_tick: Option<u32>,
}

impl NoteGrid {
    /// Build an index from any collection of notes.
    pub fn new(notes: impl IntoIterator<Item = Note>) -> Self {
        let mut grid = Self::default();
        for note in notes {
            grid.layers.entry(note.layer).or_default().push(note);
            grid.len += 1;
            grid.max_tick = Some(grid.max_tick.map_or(note.tick, |t| t.max(note.tick)));
        }
        for bucket in grid.layers.values_mut() {
            bucket.sort_by_key(|n| n.tick);
        }
        grid
    }

    /// Index every note of a song.
    pub fn from_song(song: &Song) -> Self {
        Self::new(song.notes())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Highest tick holding a note.
    pub fn max_tick(&self) -> Option<u32> {
        self.max_tick
    }

    /// Highest layer holding a note.
    pub fn max_layer(&self) -> Option<u32> {
        self.layers.keys().next_back().copied()
    }

    /// All notes, layer by layer.
    pub fn iter(&self) -> impl Iterator<Item = &Note> + '_ {
        self.layers.values().flatten()
    }

    /// Notes inside an inclusive rectangle.
    pub fn notes_in_rect(&self, rect: GridRect) -> impl Iterator<Item = &Note> + '_ {
        let buckets = (rect.first_layer <= rect.last_layer)
            .then(|| self.layers.range(rect.first_layer..=rect.last_layer));

        buckets.into_iter().flatten().flat_map(move |(_, bucket)| {
            let lo = bucket.partition_point(|n| n.tick < rect.first_tick);
            let hi = bucket.partition_point(|n| n.tick <= rect.last_tick).max(lo);
            bucket[lo..hi].iter()
        })
    }
}

impl FromIterator<Note> for NoteGrid {
    fn from_iter<I: IntoIterator<Item = Note>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> NoteGrid {
        NoteGrid::new([
            Note::new(0, 0, 45, 0),
            Note::new(10, 0, 45, 0),
            Note::new(5, 1, 40, 2),
            Note::new(3, 3, 40, 2),
            Note::new(7, 3, 40, 2),
        ])
    }

    #[test]
    fn test_empty_grid() {
        let grid = NoteGrid::new(Vec::new());
        assert!(grid.is_empty());
        assert_eq!(grid.max_tick(), None);
        assert_eq!(grid.max_layer(), None);
        let rect = GridRect::from_origin(0, 0, 100, 100).unwrap();
        assert_eq!(grid.notes_in_rect(rect).count(), 0);
    }

    #[test]
    fn test_extent() {
        let grid = grid();
        assert_eq!(grid.len(), 5);
        assert_eq!(grid.max_tick(), Some(10));
        assert_eq!(grid.max_layer(), Some(3));
    }

    #[test]
    fn test_rect_query_is_inclusive() {
        let grid = grid();
        let rect = GridRect {
            first_tick: 3,
            first_layer: 1,
            last_tick: 7,
            last_layer: 3,
        };
        let found: Vec<Note> = grid.notes_in_rect(rect).copied().collect();
        assert_eq!(
            found,
            vec![
                Note::new(5, 1, 40, 2),
                Note::new(3, 3, 40, 2),
                Note::new(7, 3, 40, 2),
            ]
        );
        assert!(found.iter().all(|n| rect.contains(n)));
    }

    #[test]
    fn test_rect_past_last_layer() {
        let grid = grid();
        let rect = GridRect::from_origin(0, 10, 50, 50).unwrap();
        assert_eq!(grid.notes_in_rect(rect).count(), 0);
    }

    #[test]
    fn test_rect_matches_linear_filter() {
        let grid = grid();
        for first_tick in 0..12 {
            for first_layer in 0..5 {
                let rect = GridRect::from_origin(first_tick, first_layer, 4, 2).unwrap();
                let expected = grid.iter().filter(|n| rect.contains(n)).count();
                assert_eq!(grid.notes_in_rect(rect).count(), expected);
            }
        }
    }

    #[test]
    fn test_zero_span_rect() {
        assert_eq!(GridRect::from_origin(0, 0, 0, 5), None);
        assert_eq!(GridRect::from_origin(0, 0, 5, 0), None);
    }

    #[test]
    fn test_sparse_far_layers() {
        let grid = NoteGrid::new([Note::new(0, 1, 45, 0), Note::new(4, u32::MAX, 45, 0)]);
        assert_eq!(grid.layers.len(), 2);
        assert_eq!(grid.max_layer(), Some(u32::MAX));

        let rect = GridRect::from_origin(0, u32::MAX - 3, 10, 10).unwrap();
        let found: Vec<Note> = grid.notes_in_rect(rect).copied().collect();
        assert_eq!(found, vec![Note::new(4, u32::MAX, 45, 0)]);
    }

    #[test]
    fn test_inverted_rect_is_empty() {
        let rect = GridRect {
            first_tick: 0,
            first_layer: 3,
            last_tick: 10,
            last_layer: 0,
        };
        assert_eq!(grid().notes_in_rect(rect).count(), 0);
    }
}
