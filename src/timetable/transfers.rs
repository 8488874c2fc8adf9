use std::sync::Arc;

use crate::shared::time::Duration;

/// A minimum-time transfer with both endpoints translated to compact stop
/// indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompiledTransfer {
    pub from_stop: u32,
    pub to_stop: u32,
    pub min_transfer_time: Duration,
}

/// Ordered access to compiled transfers, keyed by originating stop.
///
/// Transfers are sorted by `(from_stop, min_transfer_time, to_stop)` and an
/// offset table of length `stop_count + 1` turns every per-stop lookup into
/// an O(1) slice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferIndex {
    transfers: Arc<[CompiledTransfer]>,
    offsets: Arc<[u32]>,
}

impl TransferIndex {
    pub fn build(mut transfers: Vec<CompiledTransfer>, stop_count: usize) -> Self {
        transfers.sort_by_key(|t| (t.from_stop, t.min_transfer_time, t.to_stop));
        let mut offsets: Vec<u32> = Vec::with_capacity(stop_count + 1);
        let mut cursor = 0usize;
        for stop in 0..stop_count as u32 {
            offsets.push(cursor as u32);
            while cursor < transfers.len() && transfers[cursor].from_stop == stop {
                cursor += 1;
            }
        }
        offsets.push(transfers.len() as u32);
        Self {
            transfers: transfers.into(),
            offsets: offsets.into(),
        }
    }

    /// All transfers originating at the given stop, cheapest first.
    pub fn from_stop(&self, stop: u32) -> &[CompiledTransfer] {
        let start = self.offsets[stop as usize] as usize;
        let end = self.offsets[stop as usize + 1] as usize;
        &self.transfers[start..end]
    }

    /// The same transfers with direction flipped, for scanning a
    /// time-reversed timetable.
    pub fn transposed(&self) -> Self {
        let stop_count = self.offsets.len() - 1;
        let flipped = self
            .transfers
            .iter()
            .map(|t| CompiledTransfer {
                from_stop: t.to_stop,
                to_stop: t.from_stop,
                min_transfer_time: t.min_transfer_time,
            })
            .collect();
        Self::build(flipped, stop_count)
    }

    pub fn len(&self) -> usize {
        self.transfers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty()
    }
}

#[test]
fn from_stop_slices_test() {
    let index = TransferIndex::build(
        vec![
            CompiledTransfer {
                from_stop: 1,
                to_stop: 2,
                min_transfer_time: Duration::from_seconds(300),
            },
            CompiledTransfer {
                from_stop: 1,
                to_stop: 0,
                min_transfer_time: Duration::from_seconds(120),
            },
            CompiledTransfer {
                from_stop: 0,
                to_stop: 1,
                min_transfer_time: Duration::from_seconds(60),
            },
        ],
        3,
    );
    assert_eq!(index.len(), 3);
    assert_eq!(index.from_stop(0).len(), 1);
    let from_one = index.from_stop(1);
    assert_eq!(from_one.len(), 2);
    assert_eq!(from_one[0].to_stop, 0);
    assert_eq!(from_one[1].to_stop, 2);
    assert!(index.from_stop(2).is_empty());
}

#[test]
fn tie_break_on_destination_test() {
    let index = TransferIndex::build(
        vec![
            CompiledTransfer {
                from_stop: 0,
                to_stop: 2,
                min_transfer_time: Duration::from_seconds(60),
            },
            CompiledTransfer {
                from_stop: 0,
                to_stop: 1,
                min_transfer_time: Duration::from_seconds(60),
            },
        ],
        3,
    );
    let from_zero = index.from_stop(0);
    assert_eq!(from_zero[0].to_stop, 1);
    assert_eq!(from_zero[1].to_stop, 2);
}

#[test]
fn transposed_test() {
    let index = TransferIndex::build(
        vec![CompiledTransfer {
            from_stop: 0,
            to_stop: 2,
            min_transfer_time: Duration::from_seconds(90),
        }],
        3,
    );
    let transposed = index.transposed();
    assert!(transposed.from_stop(0).is_empty());
    let from_two = transposed.from_stop(2);
    assert_eq!(from_two.len(), 1);
    assert_eq!(from_two[0].to_stop, 0);
    assert_eq!(from_two[0].min_transfer_time, Duration::from_seconds(90));
}
