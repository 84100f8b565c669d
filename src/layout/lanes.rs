//! First-fit lane packing for overlapping timeline bars.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

use super::geometry::Span;
use crate::error::LayoutError;
use crate::model::{Task, TaskId};

/// Lane chosen for every packed item, plus the number of lanes the row needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneAssignment<K: Eq + Hash> {
    lanes: Vec<usize>,
    by_id: HashMap<K, usize>,
    lane_count: usize,
}

impl<K: Eq + Hash> LaneAssignment<K> {
    /// Lane of the item with `id`. With duplicate ids the last one wins.
    pub fn lane_of(&self, id: &K) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// Lanes in input order, one per packed item.
    pub fn lanes(&self) -> &[usize] {
        &self.lanes
    }

    pub fn lane_count(&self) -> usize {
        self.lane_count
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }
}

/// Assign each span the lowest lane holding nothing it overlaps.
///
/// Items are visited by ascending start, ties in input order, so repeated
/// calls on the same input produce the same layout. Lane order is part of the
/// contract: renderers stack bars by lane index.
pub fn pack<K, T>(items: &[(K, Span<T>)]) -> Result<LaneAssignment<K>, LayoutError>
where
    K: Clone + Eq + Hash,
    T: PartialOrd + Copy,
{
    if let Some(index) = items.iter().position(|(_, span)| !span.is_valid()) {
        return Err(LayoutError::InvalidInterval { index });
    }

    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| {
        items[a]
            .1
            .start
            .partial_cmp(&items[b].1.start)
            .unwrap_or(Ordering::Equal)
    });

    let mut occupied: Vec<Vec<Span<T>>> = Vec::new();
    let mut lanes = vec![0; items.len()];
    for index in order {
        let span = items[index].1;
        let lane = match occupied
            .iter()
            .position(|lane| lane.iter().all(|other| !span.overlaps(other)))
        {
            Some(lane) => lane,
            None => {
                occupied.push(Vec::new());
                occupied.len() - 1
            }
        };
        occupied[lane].push(span);
        lanes[index] = lane;
    }

    let by_id = items
        .iter()
        .zip(&lanes)
        .map(|((id, _), &lane)| (id.clone(), lane))
        .collect();

    Ok(LaneAssignment {
        lanes,
        by_id,
        lane_count: occupied.len(),
    })
}

/// Pack tasks directly on their calendar dates.
pub fn pack_tasks(tasks: &[Task]) -> Result<LaneAssignment<TaskId>, LayoutError> {
    let spans: Vec<_> = tasks
        .iter()
        .map(|t| (t.id, Span::new(t.start, t.end)))
        .collect();
    pack(&spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProjectId;
    use chrono::NaiveDate;

    fn span(start: i64, end: i64) -> Span<i64> {
        Span::new(start, end)
    }

    #[test]
    fn empty_input_uses_no_lanes() {
        let assignment = pack::<&str, i64>(&[]).unwrap();
        assert!(assignment.is_empty());
        assert_eq!(assignment.lane_count(), 0);
    }

    #[test]
    fn abutting_tasks_share_lane_zero() {
        let assignment = pack(&[("a", span(0, 5)), ("b", span(5, 10))]).unwrap();
        assert_eq!(assignment.lane_of(&"a"), Some(0));
        assert_eq!(assignment.lane_of(&"b"), Some(0));
        assert_eq!(assignment.lane_count(), 1);
    }

    #[test]
    fn overlapping_tasks_are_stacked() {
        let assignment = pack(&[("a", span(0, 10)), ("b", span(5, 15))]).unwrap();
        assert_eq!(assignment.lanes(), &[0, 1]);
        assert_eq!(assignment.lane_count(), 2);
    }

    #[test]
    fn later_task_reuses_the_first_free_lane() {
        let assignment = pack(&[
            ("a", span(0, 10)),
            ("b", span(0, 10)),
            ("c", span(10, 20)),
        ])
        .unwrap();
        assert_eq!(assignment.lanes(), &[0, 1, 0]);
        assert_eq!(assignment.lane_count(), 2);
    }

    #[test]
    fn visits_by_start_not_input_order() {
        // c starts first, so it claims lane 0 even though it is listed last.
        let assignment = pack(&[
            ("a", span(5, 15)),
            ("b", span(20, 30)),
            ("c", span(0, 10)),
        ])
        .unwrap();
        assert_eq!(assignment.lane_of(&"c"), Some(0));
        assert_eq!(assignment.lane_of(&"a"), Some(1));
        assert_eq!(assignment.lane_of(&"b"), Some(0));
    }

    #[test]
    fn equal_starts_keep_input_order() {
        let assignment = pack(&[("x", span(3, 9)), ("y", span(3, 4)), ("z", span(3, 6))]).unwrap();
        assert_eq!(assignment.lanes(), &[0, 1, 2]);
    }

    #[test]
    fn zero_length_tasks_are_accepted_and_never_collide() {
        let assignment = pack(&[
            ("long", span(0, 10)),
            ("point", span(4, 4)),
            ("edge", span(10, 10)),
        ])
        .unwrap();
        assert_eq!(assignment.lanes(), &[0, 0, 0]);
        assert_eq!(assignment.lane_count(), 1);
    }

    #[test]
    fn inverted_interval_is_rejected_with_its_position() {
        let err = pack(&[("ok", span(0, 1)), ("bad", span(5, 2))]).unwrap_err();
        assert_eq!(err, LayoutError::InvalidInterval { index: 1 });
    }

    #[test]
    fn nan_positions_are_rejected() {
        let err = pack(&[(1, Span::new(0.0, f64::NAN))]).unwrap_err();
        assert_eq!(err, LayoutError::InvalidInterval { index: 0 });
    }

    #[test]
    fn chained_overlaps_alternate_between_two_lanes() {
        let items = [
            (0, span(0, 2)),
            (1, span(1, 4)),
            (2, span(3, 6)),
            (3, span(5, 8)),
        ];
        let assignment = pack(&items).unwrap();
        assert_eq!(assignment.lanes(), &[0, 1, 0, 1]);
        assert_eq!(assignment.lane_count(), 2);
    }

    #[test]
    fn duplicate_ids_resolve_to_the_last_entry() {
        let assignment = pack(&[("dup", span(0, 10)), ("dup", span(5, 15))]).unwrap();
        assert_eq!(assignment.lanes(), &[0, 1]);
        assert_eq!(assignment.lane_of(&"dup"), Some(1));
    }

    #[test]
    fn packing_is_repeatable_and_leaves_input_untouched() {
        let items = vec![("a", span(2, 8)), ("b", span(0, 4)), ("c", span(4, 9))];
        let before = items.clone();
        let first = pack(&items).unwrap();
        let second = pack(&items).unwrap();
        assert_eq!(first, second);
        assert_eq!(items, before);
    }

    #[test]
    fn tasks_pack_on_their_dates() {
        let d = |m, day| NaiveDate::from_ymd_opt(2025, m, day).unwrap();
        let tasks = vec![
            Task::new(TaskId(1), ProjectId(1), "Contracts", d(3, 1), d(5, 1)),
            Task::new(TaskId(2), ProjectId(1), "RFP", d(5, 1), d(9, 1)),
            Task::new(TaskId(3), ProjectId(1), "Audit", d(4, 1), d(6, 1)),
        ];
        let assignment = pack_tasks(&tasks).unwrap();
        assert_eq!(assignment.lane_of(&TaskId(1)), Some(0));
        assert_eq!(assignment.lane_of(&TaskId(3)), Some(1));
        assert_eq!(assignment.lane_of(&TaskId(2)), Some(0));
        assert_eq!(assignment.lane_count(), 2);
    }
}
