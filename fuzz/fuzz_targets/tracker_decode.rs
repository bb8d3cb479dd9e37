#![no_main]

extern crate holdem_ai;
extern crate libfuzzer_sys;

use holdem_ai::ai::{BooleanTracker, FloatTracker};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|encoded: &str| {
    let mut booleans = BooleanTracker::new(5, 2);
    if booleans.decode(Some(encoded)).is_ok() {
        assert!(booleans.count() <= booleans.capacity());
        assert!(booleans.count_true() <= booleans.count());
        assert_eq!(booleans.is_full(), booleans.count() == booleans.capacity());

        let encoded = booleans.encode();
        let mut again = BooleanTracker::new(1, 0);
        again.decode(Some(&encoded)).unwrap();
        assert_eq!(booleans, again);
    }

    let mut floats = FloatTracker::new(5, 2);
    if floats.decode(Some(encoded)).is_ok() {
        assert!(floats.count() <= floats.capacity());

        let encoded = floats.encode();
        let mut again = FloatTracker::new(1, 0);
        again.decode(Some(&encoded)).unwrap();
        // NaN slots never compare equal, the encodings do.
        assert_eq!(encoded, again.encode());
    }
});
