//! Joint scalar multiplication `[s1]A + [s2]B` with Shamir's trick.
//!
//! Both scalars are scanned together two bits at a time from the most
//! significant end. Each step doubles the accumulator twice and adds one
//! precomputed combination `i·A + j·B` (`i, j ∈ 0..4`), so the cost is
//! roughly one scalar multiplication instead of two.

use num_bigint::{BigInt, BigUint, Sign};

use crate::backend::{CurvePoint, FieldElement};

/// The fifteen non-trivial combinations `i·A + j·B`, indexed by
/// `(j << 2 | i) - 1`.
#[derive(Clone, Debug)]
pub struct CombinationTable<P> {
    entries: [P; 15],
}

impl<P: Copy> CombinationTable<P> {
    pub fn new<F: FieldElement>(a: &P, b: &P) -> Self
    where
        P: CurvePoint<F>,
    {
        let a2 = a.double();
        let b2 = b.double();
        let a_multiples = [P::identity(), *a, a2, a2.add(a)];
        let b_multiples = [P::identity(), *b, b2, b2.add(b)];

        let mut entries = [P::identity(); 15];
        for (j, bj) in b_multiples.iter().enumerate() {
            for (i, ai) in a_multiples.iter().enumerate() {
                let entry = match (i, j) {
                    (0, 0) => continue,
                    (_, 0) => *ai,
                    (0, _) => *bj,
                    _ => bj.add(ai),
                };
                entries[(j << 2 | i) - 1] = entry;
            }
        }
        Self { entries }
    }

    /// Entry for digit `i` of the first scalar and digit `j` of the second.
    /// `None` for `(0, 0)`.
    pub fn get(&self, i: usize, j: usize) -> Option<&P> {
        match j << 2 | i {
            0 => None,
            idx => self.entries.get(idx - 1),
        }
    }
}

/// Reduces `|scalar|` modulo `order` and moves the sign onto the base.
fn normalize_sign<F: FieldElement, P: CurvePoint<F>>(
    scalar: &BigInt,
    base: &P,
    order: &BigUint,
) -> (BigUint, P) {
    let magnitude = scalar.magnitude() % order;
    match scalar.sign() {
        Sign::Minus => (magnitude, base.negate()),
        _ => (magnitude, *base),
    }
}

fn digit(k: &BigUint, window: u64) -> usize {
    (k.bit(2 * window) as usize) | (k.bit(2 * window + 1) as usize) << 1
}

/// Computes `[s1]a + [s2]b` for arbitrary signed scalars.
///
/// Exact for every input, including `a == b`, either scalar zero and
/// scalars outside `[0, order)`.
pub fn joint_scalar_mul<F: FieldElement, P: CurvePoint<F>>(
    a: &P,
    s1: &BigInt,
    b: &P,
    s2: &BigInt,
    order: &BigUint,
) -> P {
    let (k1, a) = normalize_sign::<F, P>(s1, a, order);
    let (k2, b) = normalize_sign::<F, P>(s2, b, order);
    let table = CombinationTable::new::<F>(&a, &b);

    let windows = k1.bits().max(k2.bits()).div_ceil(2);
    let mut acc = P::identity();
    for window in (0..windows).rev() {
        acc = acc.double().double();
        if let Some(entry) = table.get(digit(&k1, window), digit(&k2, window)) {
            acc = acc.add(entry);
        }
    }
    acc
}
