use light_bitvector::BitVector;

/// Prints every way of picking `left` items out of `idx..item_count`, with
/// the picks made so far recorded in `picked`.
fn combinations(idx: usize, left: usize, item_count: usize, picked: &mut BitVector) {
    if left == 0 {
        println!("{picked}");
        return;
    }
    if item_count - idx < left {
        return;
    }
    picked.set(idx);
    combinations(idx + 1, left - 1, item_count, picked);
    picked.clear(idx);
    combinations(idx + 1, left, item_count, picked)
}

fn main() {
    const ITEM_COUNT: usize = 6;
    const PICKS: usize = 3;
    let mut picked = BitVector::with_capacity(ITEM_COUNT);
    combinations(0, PICKS, ITEM_COUNT, &mut picked);
}
