use bilinear::{Curve, RegisteredDriver};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, SeedableRng};

fn bench_driver<D: RegisteredDriver>(c: &mut Criterion, label: &str) {
    let curve: &Curve<D> = D::curve();
    let mut rng = StdRng::seed_from_u64(42);
    let s1 = curve.new_random_zr(&mut rng);
    let s2 = curve.new_random_zr(&mut rng);
    let a = curve.gen_g1();
    let b = curve.hash_to_g1(b"bench").expect("hash to g1");

    c.bench_function(&format!("{label}/g1_mul2"), |bench| {
        bench.iter(|| black_box(a.mul2(black_box(&s1), &b, black_box(&s2))));
    });
    c.bench_function(&format!("{label}/g1_mul_mul_add"), |bench| {
        bench.iter(|| black_box(a.mul(black_box(&s1)).add(&b.mul(black_box(&s2)))));
    });

    let n = 64;
    let left: Vec<_> = (0..n).map(|_| curve.new_random_zr(&mut rng)).collect();
    let right: Vec<_> = (0..n).map(|_| curve.new_random_zr(&mut rng)).collect();
    let gens: Vec<_> = (0..n).map(|i| a.mul(&curve.new_zr_from_u64(i as u64 + 1))).collect();
    c.bench_function(&format!("{label}/pairs_of_products_64"), |bench| {
        bench.iter(|| {
            let res = curve
                .add_pairs_of_products(&left, &right, &gens, &gens)
                .expect("equal lengths");
            black_box(res);
        });
    });
}

fn criterion_benches(c: &mut Criterion) {
    #[cfg(feature = "blst")]
    bench_driver::<bilinear::BlstBls12>(c, "blst");
    #[cfg(feature = "ark_bls12381")]
    bench_driver::<bilinear::ArkBls12>(c, "arkworks_bls12_381");
    #[cfg(feature = "ark_bls12377")]
    bench_driver::<bilinear::ArkBls377>(c, "arkworks_bls12_377");
    #[cfg(feature = "ark_bn254")]
    bench_driver::<bilinear::ArkBn254>(c, "arkworks_bn254");
}

criterion_group!(benches, criterion_benches);
criterion_main!(benches);
