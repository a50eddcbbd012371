/*!
    Deterministic RNG helpers for reproducible tests

    Seeded code sources so collision and ordering scenarios replay the
    same way on every run.
*/

use crate::invitation::{CodeGenerator, InvitationCode};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Mutex;

/// Default seed for deterministic tests
pub const DEFAULT_TEST_SEED: u64 = 42;

/// Create a deterministic RNG with the default seed
pub fn test_rng() -> StdRng {
    test_rng_with_seed(DEFAULT_TEST_SEED)
}

/// Create a deterministic RNG with a custom seed
pub fn test_rng_with_seed(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// First `count` codes drawn from the default seed
pub fn deterministic_codes(count: usize) -> Vec<InvitationCode> {
    let mut rng = test_rng();
    (0..count).map(|_| InvitationCode::generate_with(&mut rng)).collect()
}

/// Code generator driven by a seeded RNG
pub struct SeededCodes {
    rng: Mutex<StdRng>,
}

impl SeededCodes {
    pub fn new(seed: u64) -> Self {
        Self { rng: Mutex::new(test_rng_with_seed(seed)) }
    }
}

impl CodeGenerator for SeededCodes {
    fn next_code(&self) -> InvitationCode {
        InvitationCode::generate_with(&mut *self.rng.lock().unwrap())
    }
}
