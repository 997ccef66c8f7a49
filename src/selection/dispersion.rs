//! Weighted dispersion across folders
//!
//! A file set spreads its selections over several folders according to their
//! declared percentages. Rather than drawing randomly, a fixed sequence of
//! [`DISPERSION_SLOTS`] folder indices is built once and then walked cyclically,
//! so the observed share of every folder is deterministic.
//!
//! # Algorithm
//!
//! For each of the 100 slots, folders are scanned in declaration order and the
//! first one whose share of the slots filled so far is still below its target is
//! appended. The share is `trunc(count / filled * 100)` and counts as 0 for a
//! folder not yet present. When no folder qualifies (possible with percentages
//! that do not add up to 100) folder 0 is appended.
//!
//! Declaration order decides ties: when several folders are below target, the
//! first declared wins even if a later one has a larger percentage.
//!
//! For 20/30/50 the sequence starts `0, 1, 2, 2, 1, 2, 0, 1, 2, 2, ...` and ends
//! with exactly 20, 30 and 50 slots.

/// Length of every dispersion sequence
pub const DISPERSION_SLOTS: usize = 100;

/// Fixed sequence of folder indices approximating declared percentages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispersion {
    slots: Vec<usize>,
}

impl Dispersion {
    /// Build the sequence for folders with the given target percentages
    ///
    /// A single folder fills every slot. An empty input produces an empty
    /// sequence; callers reject that case before building.
    pub fn build(percentages: &[u8]) -> Self {
        if percentages.is_empty() {
            return Self { slots: Vec::new() };
        }

        let mut slots: Vec<usize> = Vec::with_capacity(DISPERSION_SLOTS);
        let mut counts = vec![0usize; percentages.len()];

        for _ in 0..DISPERSION_SLOTS {
            let filled = slots.len();
            let chosen = percentages
                .iter()
                .enumerate()
                .find(|&(index, &target)| {
                    let count = counts[index];
                    let share = if count == 0 {
                        0
                    } else {
                        ((count as f64 / filled as f64) * 100.0) as u32
                    };
                    share < u32::from(target)
                })
                .map(|(index, _)| index)
                .unwrap_or(0);

            counts[chosen] += 1;
            slots.push(chosen);
        }

        Self { slots }
    }

    /// Number of slots (100 unless built from no folders)
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when no folders were given
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Folder index stored in `slot`
    pub fn container_at(&self, slot: usize) -> Option<usize> {
        self.slots.get(slot).copied()
    }

    /// The full slot sequence
    pub fn slots(&self) -> &[usize] {
        &self.slots
    }

    /// How many slots each of `containers` folders occupies
    pub fn counts(&self, containers: usize) -> Vec<usize> {
        let mut counts = vec![0usize; containers];
        for &slot in &self.slots {
            if let Some(count) = counts.get_mut(slot) {
                *count += 1;
            }
        }
        counts
    }
}
