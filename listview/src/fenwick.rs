use alloc::vec::Vec;
use core::cmp;

/// Fenwick tree over line extents.
///
/// Every line except the last carries the trailing spacing, so `prefix_sum(i)` is the start of
/// line `i` relative to the first line and `total()` is the content size.
#[derive(Clone, Debug, Default)]
pub(crate) struct PrefixSums {
    tree: Vec<u64>, // 1-indexed
    total: u64,
    max_bit: usize,
}

impl PrefixSums {
    pub(crate) fn from_sizes(sizes: &[u32], spacing: u32) -> Self {
        let n = sizes.len();
        let mut tree = alloc::vec![0u64; n + 1];
        let mut total = 0u64;
        let spacing = spacing as u64;
        for i in 1..=n {
            let mut v = sizes[i - 1] as u64;
            if i < n {
                v = v.saturating_add(spacing);
            }
            total = total.saturating_add(v);
            tree[i] = tree[i].saturating_add(v);
            let parent = i + lsb(i);
            if parent <= n {
                tree[parent] = tree[parent].saturating_add(tree[i]);
            }
        }
        Self {
            tree,
            total,
            max_bit: highest_power_of_two_leq(n),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.tree.len().saturating_sub(1)
    }

    pub(crate) fn add(&mut self, index: usize, delta: i64) {
        let n = self.len();
        if index >= n || delta == 0 {
            return;
        }
        if delta > 0 {
            self.total = self.total.saturating_add(delta as u64);
        } else {
            self.total = self.total.saturating_sub(delta.unsigned_abs());
        }
        let mut i = index + 1;
        while i <= n {
            let next = self.tree[i] as i128 + delta as i128;
            debug_assert!(next >= 0, "prefix sums underflow (node={i}, delta={delta})");
            self.tree[i] = next.clamp(0, u64::MAX as i128) as u64;
            i += lsb(i);
        }
    }

    /// Sum of the first `count` values.
    pub(crate) fn prefix_sum(&self, count: usize) -> u64 {
        let mut i = cmp::min(count, self.len());
        let mut sum = 0u64;
        while i > 0 {
            sum = sum.saturating_add(self.tree[i]);
            i &= i - 1;
        }
        sum
    }

    pub(crate) fn total(&self) -> u64 {
        self.total
    }

    /// Number of leading values whose sum is `<= target`.
    ///
    /// An offset inside the spacing after line `i` therefore resolves to line `i`.
    pub(crate) fn lower_bound(&self, mut target: u64) -> usize {
        let n = self.len();
        let mut idx = 0usize;
        let mut bit = self.max_bit;
        while bit != 0 {
            let next = idx + bit;
            if next <= n && self.tree[next] <= target {
                target -= self.tree[next];
                idx = next;
            }
            bit >>= 1;
        }
        idx
    }
}

fn lsb(i: usize) -> usize {
    i & i.wrapping_neg()
}

fn highest_power_of_two_leq(n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let mut p = 1usize;
    while p <= n / 2 {
        p <<= 1;
    }
    p
}
