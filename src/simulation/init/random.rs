/// Random number generator (xorshift32). A zero state is reseeded so the
/// sequence never gets stuck.
#[inline]
pub(super) fn xorshift32(state: &mut u32) -> u32 {
    if *state == 0 {
        *state = 0x9E37_79B9;
    }
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    x
}

/// Uniform float in `[0, 1)` from the top 24 bits
#[inline]
pub(super) fn next_unit(state: &mut u32) -> f32 {
    (xorshift32(state) >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
}
