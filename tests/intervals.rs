use algokit::interval::{KthStatistics, SegmentTree};
use proptest::prelude::*;

#[test]
fn kth_statistic_samples() {
    let tree = KthStatistics::new(&[1i64, 5, 2, 6, 3, 7, 4]);
    assert_eq!(tree.kth(3, 2, 5), 5);
    assert_eq!(tree.kth(1, 4, 4), 6);
}

#[test]
fn version_sums_count_insertions() {
    let tree = KthStatistics::new(&[10i64, 20, 10, 30, 20, 20]);
    for version in 0..tree.version_count() {
        assert_eq!(tree.root_sum(version), version as u64);
    }
}

proptest! {
    #[test]
    fn segment_tree_agrees_with_brute_model(
        elements in prop::collection::vec(-100i64..100, 1..24),
        ops in prop::collection::vec((0usize..3, 0usize..24, 0usize..24, -50i64..50), 1..60),
    ) {
        let len = elements.len();
        let mut model = elements.clone();
        let mut tree = SegmentTree::range_min_add(&elements);
        for (which, l, r, v) in ops {
            let (mut l, mut r) = (l % len, r % len);
            if l > r {
                std::mem::swap(&mut l, &mut r);
            }
            match which {
                0 => {
                    let expected = *model[l..=r].iter().min().unwrap();
                    prop_assert_eq!(tree.query(l, r), expected);
                }
                1 => {
                    for slot in &mut model[l..=r] {
                        *slot += v;
                    }
                    tree.update(l, r, v);
                }
                _ => {
                    for slot in &mut model[l..=r] {
                        *slot = v;
                    }
                    tree.assign(l, r, v);
                }
            }
        }
        // final full sweep
        for i in 0..len {
            prop_assert_eq!(tree.query(i, i), model[i]);
        }
    }

    #[test]
    fn kth_statistic_agrees_with_sorting(
        elements in prop::collection::vec(-1000i64..1000, 1..30),
        l in 1usize..30,
        r in 1usize..30,
        k in 1usize..30,
    ) {
        let n = elements.len();
        let (mut l, mut r) = ((l - 1) % n + 1, (r - 1) % n + 1);
        if l > r {
            std::mem::swap(&mut l, &mut r);
        }
        let k = (k - 1) % (r - l + 1) + 1;

        let tree = KthStatistics::new(&elements);
        let mut window: Vec<i64> = elements[l - 1..r].to_vec();
        window.sort_unstable();
        prop_assert_eq!(tree.kth(k, l, r), window[k - 1]);
    }
}
