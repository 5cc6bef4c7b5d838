use super::*;

#[test]
fn sequential_ids_are_reproducible() {
    let mut a = SequentialIds::new(7);
    let mut b = SequentialIds::new(7);
    for _ in 0..4 {
        assert_eq!(a.next_id(), b.next_id());
    }
}

#[test]
fn sequential_ids_encode_seed_and_counter() {
    let mut ids = SequentialIds::new(0xAB);
    let first = ids.next_id();
    let second = ids.next_id();
    assert_eq!(hex_id(&first), format!("{:016x}{:016x}", 0xABu64, 1u64));
    assert_eq!(hex_id(&second), format!("{:016x}{:016x}", 0xABu64, 2u64));
}

#[test]
fn random_ids_differ() {
    let mut ids = RandomIds;
    assert_ne!(ids.next_id(), ids.next_id());
}

#[test]
fn hex_id_is_32_lowercase_digits() {
    let id = [0xFFu8, 0x01, 0xA0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x0F];
    let hex = hex_id(&id);
    assert_eq!(hex.len(), 32);
    assert!(hex.starts_with("ff01a0"));
    assert!(hex.ends_with("0f"));
    assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}
