//! Drop Target Resolver
//!
//! Turns a pointer position into a target column and insertion index.
//! The layout is a snapshot of the drop-zone and card rectangles, measured
//! again on every move event.

use crate::geometry::{Point, Rect};
use crate::model::{ColumnKey, TaskId};

/// A rendered task card
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardRegion {
    pub task_id: TaskId,
    pub rect: Rect,
}

/// A registered drop zone with its cards in display order
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRegion {
    pub column: ColumnKey,
    pub bounds: Rect,
    pub cards: Vec<CardRegion>,
}

impl ColumnRegion {
    pub fn new(column: ColumnKey, bounds: Rect) -> Self {
        Self { column, bounds, cards: Vec::new() }
    }

    pub fn with_card(mut self, task_id: TaskId, rect: Rect) -> Self {
        self.cards.push(CardRegion { task_id, rect });
        self
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn index_of(&self, task_id: TaskId) -> Option<usize> {
        self.cards.iter().position(|c| c.task_id == task_id)
    }
}

/// Where inside a column the pointer would drop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Column has no cards; anything inside it lands at 0
    Empty,
    /// Pointer is over the dragged card itself
    OverSelf,
    /// Insert before the card at this index (or at the end when equal to the length)
    At(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub column: ColumnKey,
    pub column_len: usize,
    pub slot: Slot,
}

/// Snapshot of every drop zone on screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardLayout {
    columns: Vec<ColumnRegion>,
}

impl BoardLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, region: ColumnRegion) {
        self.columns.retain(|c| c.column != region.column);
        self.columns.push(region);
    }

    pub fn with_column(mut self, region: ColumnRegion) -> Self {
        self.register(region);
        self
    }

    pub fn columns(&self) -> &[ColumnRegion] {
        &self.columns
    }

    pub fn column(&self, key: ColumnKey) -> Option<&ColumnRegion> {
        self.columns.iter().find(|c| c.column == key)
    }

    /// Hit-test the registered drop zones
    pub fn column_at(&self, at: Point) -> Option<&ColumnRegion> {
        self.columns.iter().find(|c| c.bounds.contains(at))
    }

    /// Locate a card on the board: its column and display index
    pub fn locate(&self, task_id: TaskId) -> Option<(ColumnKey, usize)> {
        self.columns
            .iter()
            .find_map(|c| c.index_of(task_id).map(|i| (c.column, i)))
    }

    /// Resolve a pointer position while `dragged` is being moved
    pub fn resolve(&self, at: Point, dragged: Option<TaskId>) -> Option<Resolution> {
        let region = self.column_at(at)?;
        let slot = if region.is_empty() {
            Slot::Empty
        } else if region
            .cards
            .iter()
            .any(|c| Some(c.task_id) == dragged && c.rect.contains(at))
        {
            Slot::OverSelf
        } else {
            Slot::At(find_drop_position(&region.cards, at.y, dragged))
        };
        Some(Resolution { column: region.column, column_len: region.len(), slot })
    }
}

/// Index of the first card whose vertical midpoint lies below `y`
///
/// The dragged card's own midpoint is never compared, but indices still count
/// it so they match the rendered order.
pub fn find_drop_position(cards: &[CardRegion], y: f64, dragged: Option<TaskId>) -> usize {
    cards
        .iter()
        .enumerate()
        .filter(|(_, card)| Some(card.task_id) != dragged)
        .find(|(_, card)| y < card.rect.mid_y())
        .map(|(i, _)| i)
        .unwrap_or(cards.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskStatus;

    fn column(key: ColumnKey, left: f64, ids: &[TaskId]) -> ColumnRegion {
        // cards are 40px tall with an 8px gap, starting 50px below the header
        let mut region = ColumnRegion::new(key, Rect::new(left, 0.0, 240.0, 600.0));
        for (i, id) in ids.iter().enumerate() {
            region = region.with_card(*id, Rect::new(left + 10.0, 50.0 + i as f64 * 48.0, 220.0, 40.0));
        }
        region
    }

    fn board() -> BoardLayout {
        BoardLayout::new()
            .with_column(column(ColumnKey::main(TaskStatus::Todo), 0.0, &[1, 2, 3]))
            .with_column(column(ColumnKey::main(TaskStatus::InProgress), 250.0, &[]))
    }

    #[test]
    fn index_zero_above_first_midpoint() {
        let layout = board();
        let res = layout.resolve(Point::new(100.0, 55.0), Some(9)).unwrap();
        assert_eq!(res.slot, Slot::At(0));
    }

    #[test]
    fn index_equals_length_below_last_midpoint() {
        let layout = board();
        // last card spans 146..186, midpoint 166
        let res = layout.resolve(Point::new(100.0, 170.0), Some(9)).unwrap();
        assert_eq!(res.slot, Slot::At(3));
        assert_eq!(res.column_len, 3);
    }

    #[test]
    fn between_cards_inserts_before_next() {
        let layout = board();
        // card 1 midpoint 70, card 2 midpoint 118
        let res = layout.resolve(Point::new(100.0, 95.0), Some(9)).unwrap();
        assert_eq!(res.slot, Slot::At(1));
    }

    #[test]
    fn empty_column_accepts_any_point() {
        let layout = board();
        let res = layout.resolve(Point::new(300.0, 500.0), Some(1)).unwrap();
        assert_eq!(res.column, ColumnKey::main(TaskStatus::InProgress));
        assert_eq!(res.slot, Slot::Empty);
    }

    #[test]
    fn pointer_over_dragged_card_is_self() {
        let layout = board();
        let res = layout.resolve(Point::new(100.0, 100.0), Some(2)).unwrap();
        assert_eq!(res.slot, Slot::OverSelf);
    }

    #[test]
    fn dragged_midpoint_is_skipped() {
        let cards = board().column(ColumnKey::main(TaskStatus::Todo)).unwrap().cards.clone();
        // between card 1's midpoint (70) and card 2's (118)
        assert_eq!(find_drop_position(&cards, 110.0, None), 1);
        assert_eq!(find_drop_position(&cards, 110.0, Some(2)), 2);
    }

    #[test]
    fn outside_every_zone_resolves_nothing() {
        assert!(board().resolve(Point::new(900.0, 10.0), Some(1)).is_none());
    }

    #[test]
    fn locate_reports_display_index() {
        assert_eq!(board().locate(3), Some((ColumnKey::main(TaskStatus::Todo), 2)));
        assert_eq!(board().locate(42), None);
    }
}
