// Persisting a vector as words and as little-endian bytes.
use light_bitvector::BitVector;

fn main() {
    let original: BitVector = [1, 63, 64, 190].into_iter().collect();

    let words = original.to_bit_list();
    assert_eq!(words.len(), 3);
    assert_eq!(BitVector::value_of(&words), original);

    let bytes = original.to_le_bytes();
    assert_eq!(bytes.len(), 24);
    assert_eq!(BitVector::from_le_bytes(&bytes), original);

    let mut padded = words.clone();
    padded.extend([0, 0, 0]);
    let restored = BitVector::value_of(&padded);
    assert_eq!(restored, original);
    assert_eq!(restored.hash_code(), original.hash_code());
}
