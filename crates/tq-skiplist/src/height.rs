use oorandom::Rand32;

/// The maximum number of forward pointers ("skips") a node may have.
pub(crate) const MAX_HEIGHT: usize = 12;

/// The LevelDB-traditional seed for the height PRNG, used so that tests and callers that care
/// about reproducible shapes get one.
pub(crate) const DEFAULT_SEED: u64 = 0x_dead_beef;

const BRANCHING: u32 = 4;

/// Pick a node height in `[1, MAX_HEIGHT]`, incrementing with probability `1 / BRANCHING` at
/// each step.
pub(crate) fn random_height(rng: &mut Rand32) -> usize {
    let mut height = 1;
    while height < MAX_HEIGHT && rng.rand_u32() % BRANCHING == 0 {
        height += 1;
    }
    height
}
