#![no_main]

use libfuzzer_sys::fuzz_target;
use tankwars::MatchState;
use tankwars::game::invariants::check_invariants;
use tankwars::replay::Recording;

// Arbitrary JSON must either be rejected or yield a valid state.
fuzz_target!(|data: &[u8]| {
    if let Ok(state) = serde_json::from_slice::<MatchState>(data) {
        assert!(check_invariants(&state).is_empty());
    }
    if let Ok(recording) = serde_json::from_slice::<Recording>(data) {
        assert!(check_invariants(&recording.initial).is_empty());
        if recording.len() <= 256 {
            let _ = recording.replay();
        }
    }
});
