// A register-style flag set driven only through the public API.
use light_bitvector::{BitVector, BitVectorError};

const READY: usize = 0;
const ERROR: usize = 3;
const IRQ_BASE: usize = 64;

fn main() {
    let mut flags = BitVector::with_capacity(128);
    flags.set(READY);
    flags.set_range(IRQ_BASE..IRQ_BASE + 4).unwrap();
    assert_eq!(flags.cardinality(), 5);
    assert!(!flags.get(ERROR));

    let mut pending = BitVector::new();
    pending.set(IRQ_BASE + 1);
    pending.set(IRQ_BASE + 9);

    let serviced = &flags & &pending;
    assert_eq!(serviced.to_string(), "{65}");

    flags -= &serviced;
    assert_eq!(flags.next_set_bit(IRQ_BASE), Some(IRQ_BASE));
    assert_eq!(flags.next_clear_bit(IRQ_BASE), IRQ_BASE + 1);

    assert_eq!(
        flags.clear_range(10..1),
        Err(BitVectorError::IndexOutOfRange { start: 10, end: 1 })
    );
}
