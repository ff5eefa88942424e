use criterion::{black_box, criterion_group, criterion_main, Criterion};
use num::One;
use rlst::{c64, rlst_dynamic_array1, RandomAccessMut};
use rwg_pft::geometry::Geometry;
use rwg_pft::materials::{ConstantMaterial, Vacuum};
use rwg_pft::pft::{eppft, opft, CurrentSource, PftOptions};
use rwg_pft::shapes::regular_sphere;
use rwg_pft::traits::MaterialModel;
use rwg_pft::types::Side;

extern crate blas_src;
extern crate lapack_src;

pub fn pft_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("pft");
    group.sample_size(10);

    let omega = c64::new(1.0, 0.0);
    for level in 1..3 {
        let regions: Vec<Box<dyn MaterialModel>> = vec![
            Box::new(Vacuum),
            Box::new(ConstantMaterial::new(c64::new(2.25, 0.0), c64::one())),
        ];
        let geometry =
            Geometry::new(vec![regular_sphere(level, 1.0).unwrap()], regions).unwrap();
        let n = geometry.num_basis_functions();
        let mut v = rlst_dynamic_array1!(c64, [n]);
        for i in 0..n {
            *v.get_mut([i]).unwrap() = c64::new((i as f64).sin(), (i as f64).cos());
        }
        let currents = CurrentSource::Coefficients(&v);
        let options = PftOptions::default();

        group.bench_function(format!("OPFT with {n} coefficients"), |b| {
            b.iter(|| black_box(opft(&geometry, 0, omega, &currents, None, &options)))
        });
        group.bench_function(format!("Interior EPPFT with {n} coefficients"), |b| {
            b.iter(|| {
                black_box(eppft(
                    &geometry,
                    0,
                    omega,
                    &currents,
                    Side::Interior,
                    &options,
                ))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, pft_benchmark);
criterion_main!(benches);
