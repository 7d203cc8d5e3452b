use std::collections::BTreeSet;

use light_bitvector::BitVector;
use proptest::prelude::*;

const MAX_IDX: usize = 600;

fn build(idxs: &BTreeSet<usize>) -> BitVector {
    idxs.iter().copied().collect()
}

fn ones(bv: &BitVector) -> Vec<usize> {
    bv.iter_ones().collect()
}

fn idx_set() -> impl Strategy<Value = BTreeSet<usize>> {
    prop::collection::btree_set(0..MAX_IDX, 0..64)
}

/// Checks every bit of `result` in `0..limit` against `op` applied to the
/// bits of `a` and `b`.
fn assert_bitwise(
    result: &BitVector,
    a: &BTreeSet<usize>,
    b: &BTreeSet<usize>,
    op: impl Fn(bool, bool) -> bool,
) -> Result<(), TestCaseError> {
    for i in 0..MAX_IDX + 64 {
        prop_assert_eq!(
            result.get(i),
            op(a.contains(&i), b.contains(&i)),
            "bit {}",
            i
        );
    }
    Ok(())
}

proptest! {
    #[test]
    fn set_then_get(idx in 0usize..100_000) {
        let mut bv = BitVector::new();
        bv.set(idx);
        prop_assert!(bv.get(idx));
        prop_assert!(bv.length() > idx);
    }

    #[test]
    fn clear_then_get(idxs in idx_set(), idx in 0..MAX_IDX) {
        let mut bv = build(&idxs);
        bv.clear(idx);
        prop_assert!(!bv.get(idx));
    }

    #[test]
    fn flip_is_an_involution(idxs in idx_set(), idx in 0..MAX_IDX) {
        let original = build(&idxs);
        let mut bv = original.clone();
        bv.flip(idx);
        prop_assert_eq!(bv.get(idx), !original.get(idx));
        bv.flip(idx);
        prop_assert_eq!(bv, original);
    }

    #[test]
    fn cardinality_counts_set_bits(idxs in idx_set()) {
        let bv = build(&idxs);
        let counted = (0..bv.length()).filter(|&i| bv.get(i)).count();
        prop_assert_eq!(bv.cardinality(), counted);
        prop_assert_eq!(bv.cardinality(), idxs.len());
        prop_assert_eq!(bv.length(), idxs.last().map_or(0, |&i| i + 1));
    }

    #[test]
    fn and_is_bitwise(a in idx_set(), b in idx_set()) {
        let mut bv = build(&a);
        bv.and(&build(&b));
        assert_bitwise(&bv, &a, &b, |x, y| x && y)?;
    }

    #[test]
    fn or_is_bitwise(a in idx_set(), b in idx_set()) {
        let mut bv = build(&a);
        bv.or(&build(&b));
        assert_bitwise(&bv, &a, &b, |x, y| x || y)?;
    }

    #[test]
    fn xor_is_bitwise(a in idx_set(), b in idx_set()) {
        let mut bv = build(&a);
        bv.xor(&build(&b));
        assert_bitwise(&bv, &a, &b, |x, y| x ^ y)?;
    }

    #[test]
    fn and_not_is_bitwise(a in idx_set(), b in idx_set()) {
        let mut bv = build(&a);
        bv.and_not(&build(&b));
        assert_bitwise(&bv, &a, &b, |x, y| x && !y)?;
    }

    #[test]
    fn set_algebra_keeps_canonical_form(a in idx_set(), b in idx_set()) {
        // results built through any path compare equal to a fresh build
        let (va, vb) = (build(&a), build(&b));
        prop_assert_eq!(&va & &vb, build(&a.intersection(&b).copied().collect()));
        prop_assert_eq!(&va | &vb, build(&a.union(&b).copied().collect()));
        prop_assert_eq!(&va ^ &vb, build(&a.symmetric_difference(&b).copied().collect()));
        prop_assert_eq!(&va - &vb, build(&a.difference(&b).copied().collect()));
    }

    #[test]
    fn intersects_and_contains_all(a in idx_set(), b in idx_set()) {
        let (va, vb) = (build(&a), build(&b));
        prop_assert_eq!(va.intersects(&vb), !a.is_disjoint(&b));
        prop_assert_eq!(va.contains_all(&vb), b.is_subset(&a));
    }

    #[test]
    fn value_of_roundtrip(idxs in idx_set()) {
        let bv = build(&idxs);
        prop_assert_eq!(BitVector::value_of(&bv.to_bit_list()), bv.clone());
        prop_assert_eq!(BitVector::from_le_bytes(&bv.to_le_bytes()), bv);
    }

    #[test]
    fn clone_is_equal_and_independent(idxs in idx_set(), idx in 0..MAX_IDX) {
        let original = build(&idxs);
        let mut clone = original.clone();
        prop_assert_eq!(&clone, &original);
        prop_assert_eq!(clone.hash_code(), original.hash_code());

        clone.flip(idx);
        prop_assert_eq!(ones(&original), idxs.iter().copied().collect::<Vec<_>>());
    }

    #[test]
    fn range_ops_match_model(idxs in idx_set(), start in 0..MAX_IDX, len in 0usize..200) {
        let range = start..start + len;

        let mut bv = build(&idxs);
        bv.set_range(range.clone()).unwrap();
        let expected: BTreeSet<usize> = idxs.iter().copied().chain(range.clone()).collect();
        prop_assert_eq!(ones(&bv), expected.into_iter().collect::<Vec<_>>());

        let mut bv = build(&idxs);
        bv.clear_range(range.clone()).unwrap();
        let expected: Vec<usize> = idxs.iter().copied().filter(|i| !range.contains(i)).collect();
        prop_assert_eq!(ones(&bv), expected);

        let mut bv = build(&idxs);
        bv.flip_range(range.clone()).unwrap();
        for i in 0..MAX_IDX + 200 {
            prop_assert_eq!(bv.get(i), idxs.contains(&i) ^ range.contains(&i));
        }
    }

    #[test]
    fn get_range_matches_model(idxs in idx_set(), start in 0..MAX_IDX, len in 0usize..300) {
        let bv = build(&idxs);
        let slice = bv.get_range(start..start + len).unwrap();
        let expected: Vec<usize> = idxs
            .range(start..start + len)
            .map(|i| i - start)
            .collect();
        prop_assert_eq!(ones(&slice), expected);
    }

    #[test]
    fn searches_match_model(idxs in idx_set(), from in 0..MAX_IDX + 100) {
        let bv = build(&idxs);
        prop_assert_eq!(bv.next_set_bit(from), idxs.range(from..).next().copied());
        prop_assert_eq!(bv.previous_set_bit(from), idxs.range(..=from).next_back().copied());

        let next_clear = (from..).find(|i| !idxs.contains(i));
        prop_assert_eq!(Some(bv.next_clear_bit(from)), next_clear);
        let previous_clear = (0..=from).rev().find(|i| !idxs.contains(i));
        prop_assert_eq!(bv.previous_clear_bit(from), previous_clear);
    }
}
