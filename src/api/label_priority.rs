//! Priority ordering of X-axis date labels.
//!
//! Priorities are computed once per dataset, axis rectangle and label size.
//! Showing dates greedily in descending priority then yields a stable,
//! overlap-free label set at every zoom level: dates picked for the fully
//! zoomed-out axis rank highest, dates revealed by zooming toward either border
//! come next, and the remaining gaps are filled by midpoint bisection with
//! decaying priority.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use rand::Rng;
use tracing::debug;

use crate::core::{Rect, Size, TimeRange, x_pixel};

const BASE_PRIORITY: f64 = 100.0 - 0.5;
const DECAY: f64 = 0.7;
const BORDER_SHRINK: f64 = 0.9;

/// Date index to priority, plus dates sorted by descending priority.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LabelPriorities {
    priorities: Vec<f64>,
    ordered: Vec<usize>,
}

impl LabelPriorities {
    #[must_use]
    pub fn priority(&self, index: usize) -> Option<f64> {
        self.priorities.get(index).copied()
    }

    /// Date indices by descending priority, ties by index.
    #[must_use]
    pub fn ordered(&self) -> &[usize] {
        &self.ordered
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.priorities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.priorities.is_empty()
    }
}

/// Inputs of one priority rebuild.
#[derive(Debug, Clone, Copy)]
pub struct PriorityInputs<'a> {
    /// Every candidate date, ascending.
    pub timestamps: &'a [f64],
    pub label_size: Size,
    pub axis: Rect,
    /// Minimum gap between labels as a fraction of the label width.
    pub spacing_ratio: f64,
    /// Border extension stops once the zoomed range is this fraction of the full range.
    pub min_window_fraction: f64,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    center: f64,
    day: usize,
    priority: f64,
}

fn jitter<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    1.0 + (rng.random::<f64>() - 0.5) / 1000.0
}

fn decay<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    DECAY * jitter(rng)
}

/// Builds the priority map for `inputs` using the engine-owned `rng`.
pub fn resolve_label_priorities<R: Rng + ?Sized>(
    inputs: PriorityInputs<'_>,
    rng: &mut R,
) -> LabelPriorities {
    let count = inputs.timestamps.len();
    if count == 0 {
        return LabelPriorities::default();
    }
    let full = TimeRange::new(inputs.timestamps[0], inputs.timestamps[count - 1]);
    let axis = inputs.axis;
    let position = |timestamp: f64, range: TimeRange| x_pixel(timestamp, range, axis, 0.0);
    let positions: Vec<f64> = inputs
        .timestamps
        .iter()
        .map(|&timestamp| position(timestamp, full))
        .collect();

    let width = inputs.label_size.width.max(0.0);
    let (slot_centers, spacing) = slot_centers(axis, width, inputs.spacing_ratio);

    let mut entries: Vec<Entry> = Vec::with_capacity(count);
    for center in slot_centers {
        let day = nearest_in(&positions, 0, count, center);
        if entries.last().is_some_and(|last| last.day == day) {
            continue;
        }
        let distance = (count as f64 / 2.0 - day as f64).abs() / count as f64;
        entries.push(Entry {
            center,
            day,
            priority: (BASE_PRIORITY - distance) * jitter(rng),
        });
    }
    let slots = entries.len();

    extend_borders(&mut entries, inputs, full, spacing, &position, rng);
    let filled = fill_gaps(&entries, &positions, rng);
    let complete = complete_edges(filled, &positions, rng);

    let mut priorities = vec![0.0; count];
    for entry in &complete {
        priorities[entry.day] = entry.priority;
    }
    let mut ordered: Vec<usize> = (0..count).collect();
    ordered.sort_by_key(|&index| (Reverse(OrderedFloat(priorities[index])), index));

    debug!(
        dates = count,
        slots,
        label_width = width,
        axis_width = axis.width,
        "rebuilt x label priorities"
    );
    LabelPriorities {
        priorities,
        ordered,
    }
}

/// Evenly spaced label slots filling the axis exactly.
fn slot_centers(axis: Rect, width: f64, spacing_ratio: f64) -> (Vec<f64>, f64) {
    let mut spacing = spacing_ratio.max(0.0) * width;
    let pitch = width + spacing;
    let slots = if pitch > 0.0 {
        ((axis.width + spacing) / pitch).floor().max(1.0) as usize
    } else {
        1
    };
    if slots > 1 {
        spacing = (axis.width - slots as f64 * width) / (slots - 1) as f64;
    }
    let step = (axis.width + spacing) / slots as f64;
    let centers = (0..slots)
        .map(|slot| axis.min_x() + slot as f64 * step + width / 2.0)
        .collect();
    (centers, spacing)
}

/// Index in `lo..hi` whose position is nearest to `target` (lowest index on ties).
fn nearest_in(positions: &[f64], lo: usize, hi: usize, target: f64) -> usize {
    let split = lo + positions[lo..hi].partition_point(|&position| position < target);
    if split == lo {
        return lo;
    }
    if split == hi {
        return hi - 1;
    }
    let before = target - positions[split - 1];
    let after = positions[split] - target;
    if after < before { split } else { split - 1 }
}

/// Adds dates that become showable when zooming toward each border.
fn extend_borders<R, P>(
    entries: &mut Vec<Entry>,
    inputs: PriorityInputs<'_>,
    full: TimeRange,
    spacing: f64,
    position: &P,
    rng: &mut R,
) where
    R: Rng + ?Sized,
    P: Fn(f64, TimeRange) -> f64,
{
    let count = inputs.timestamps.len();
    let (Some(mut first), Some(mut last)) = (entries.first().copied(), entries.last().copied())
    else {
        return;
    };
    let width = inputs.label_size.width;
    let axis = inputs.axis;
    let min_len = full.len() * inputs.min_window_fraction.clamp(f64::EPSILON, 1.0);
    let mut range_len = full.len();
    let mut prefix = Vec::new();

    while (first.day != 0 || last.day != count - 1) && range_len > min_len {
        range_len *= BORDER_SHRINK;
        let start_range = TimeRange::new(full.start, full.start + range_len);
        let end_range = TimeRange::new(full.end - range_len, full.end);

        if first.day > 0 {
            let scaled_first = position(inputs.timestamps[first.day], start_range);
            let candidate = (0..first.day).find(|&day| {
                let center = position(inputs.timestamps[day], start_range);
                center - width / 2.0 >= axis.min_x() && center + width + spacing <= scaled_first
            });
            if let Some(day) = candidate {
                first = Entry {
                    center: position(inputs.timestamps[day], full),
                    day,
                    priority: first.priority * decay(rng),
                };
                prefix.push(first);
            }
        }

        if last.day + 1 < count {
            let scaled_last = position(inputs.timestamps[last.day], end_range);
            let candidate = (last.day + 1..count).find(|&day| {
                let center = position(inputs.timestamps[day], end_range);
                center + width / 2.0 <= axis.max_x() && scaled_last + width + spacing <= center
            });
            if let Some(day) = candidate {
                last = Entry {
                    center: position(inputs.timestamps[day], full),
                    day,
                    priority: last.priority * decay(rng),
                };
                entries.push(last);
            }
        }
    }

    if !prefix.is_empty() {
        prefix.reverse();
        prefix.append(entries);
        *entries = prefix;
    }
}

enum GapTask {
    Split(Entry, Entry),
    Emit(Entry),
}

/// Bisects every gap between neighbouring entries until all days are present.
fn fill_gaps<R: Rng + ?Sized>(entries: &[Entry], positions: &[f64], rng: &mut R) -> Vec<Entry> {
    let mut filled = Vec::with_capacity(positions.len());
    let mut tasks = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        filled.push(*entry);
        let Some(next) = entries.get(index + 1) else {
            break;
        };
        tasks.push(GapTask::Split(*entry, *next));
        while let Some(task) = tasks.pop() {
            match task {
                GapTask::Emit(entry) => filled.push(entry),
                GapTask::Split(left, right) => {
                    if left.day + 1 >= right.day {
                        continue;
                    }
                    let midpoint = (left.center + right.center) / 2.0;
                    let day = nearest_in(positions, left.day + 1, right.day, midpoint);
                    let middle = Entry {
                        center: positions[day],
                        day,
                        priority: left.priority.min(right.priority) * decay(rng),
                    };
                    tasks.push(GapTask::Split(middle, right));
                    tasks.push(GapTask::Emit(middle));
                    tasks.push(GapTask::Split(left, middle));
                }
            }
        }
    }
    filled
}

/// Walks outward one day at a time until the first and last dates are present.
fn complete_edges<R: Rng + ?Sized>(
    mut filled: Vec<Entry>,
    positions: &[f64],
    rng: &mut R,
) -> Vec<Entry> {
    let (Some(first), Some(last)) = (filled.first().copied(), filled.last().copied()) else {
        return filled;
    };

    let mut prefix = Vec::with_capacity(first.day);
    let mut current = first;
    for day in (0..first.day).rev() {
        current = Entry {
            center: positions[day],
            day,
            priority: current.priority * decay(rng),
        };
        prefix.push(current);
    }

    let mut current = last;
    for day in last.day + 1..positions.len() {
        current = Entry {
            center: positions[day],
            day,
            priority: current.priority * decay(rng),
        };
        filled.push(current);
    }

    if prefix.is_empty() {
        return filled;
    }
    prefix.reverse();
    prefix.extend(filled);
    prefix
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::{PriorityInputs, resolve_label_priorities, slot_centers};
    use crate::core::{Rect, Size};

    fn daily(count: usize) -> Vec<f64> {
        (0..count).map(|day| day as f64 * 86_400.0).collect()
    }

    fn inputs(timestamps: &[f64]) -> PriorityInputs<'_> {
        PriorityInputs {
            timestamps,
            label_size: Size::new(40.0, 13.0),
            axis: Rect::new(0.0, 0.0, 400.0, 20.0),
            spacing_ratio: 0.5,
            min_window_fraction: 0.05,
        }
    }

    #[test]
    fn slots_fill_axis_exactly() {
        let (centers, spacing) = slot_centers(Rect::new(0.0, 0.0, 400.0, 20.0), 40.0, 0.5);
        assert_eq!(centers.len(), 7);
        assert!((centers[0] - 20.0).abs() <= 1e-9);
        assert!((centers[6] + 20.0 - 400.0).abs() <= 1e-9);
        assert!((spacing - 20.0).abs() <= 1e-9);
    }

    #[test]
    fn every_date_gets_a_priority_and_order_is_total() {
        let timestamps = daily(120);
        let mut rng = StdRng::seed_from_u64(7);
        let priorities = resolve_label_priorities(inputs(&timestamps), &mut rng);

        assert_eq!(priorities.len(), 120);
        let mut seen = priorities.ordered().to_vec();
        seen.sort_unstable();
        assert_eq!(seen, (0..120).collect::<Vec<_>>());
        for day in 0..120 {
            assert!(priorities.priority(day).expect("priority") > 0.0);
        }
        for pair in priorities.ordered().windows(2) {
            assert!(priorities.priority(pair[0]) >= priorities.priority(pair[1]));
        }
    }

    #[test]
    fn slot_dates_outrank_filled_dates() {
        let timestamps = daily(120);
        let mut rng = StdRng::seed_from_u64(11);
        let priorities = resolve_label_priorities(inputs(&timestamps), &mut rng);
        let top = priorities.ordered()[0];
        let top_priority = priorities.priority(top).expect("priority");
        assert!(top_priority > 99.0);
        // Base priorities sit near 99.5; anything derived from them decays by ~0.7.
        let high = priorities
            .ordered()
            .iter()
            .filter(|&&day| priorities.priority(day).expect("priority") > 90.0)
            .count();
        assert_eq!(high, 7);
    }

    #[test]
    fn same_seed_reproduces_priorities() {
        let timestamps = daily(60);
        let first = resolve_label_priorities(inputs(&timestamps), &mut StdRng::seed_from_u64(3));
        let second = resolve_label_priorities(inputs(&timestamps), &mut StdRng::seed_from_u64(3));
        assert_eq!(first, second);
    }

    #[test]
    fn tiny_inputs_do_not_panic() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(resolve_label_priorities(inputs(&[]), &mut rng).is_empty());
        assert_eq!(resolve_label_priorities(inputs(&[5.0]), &mut rng).ordered(), &[0]);

        let timestamps = daily(3);
        let mut narrow = inputs(&timestamps);
        narrow.axis = Rect::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(resolve_label_priorities(narrow, &mut rng).len(), 3);
    }
}
