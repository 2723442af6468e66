use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use evosearch::{
    bounds::Bounds,
    operators::{
        BoundedSampler, PolynomialMutation, Sampling, SimulatedBinaryCrossover, Variation,
    },
    rng::RandomNumberGenerator,
    DecisionVector,
};

const NUM_VARIABLES: usize = 48;

fn parents(
    bounds: &Bounds,
    matings: usize,
    rng: &mut RandomNumberGenerator,
) -> Vec<(DecisionVector, DecisionVector)> {
    let population = BoundedSampler::new().sample(bounds, matings * 2, rng);
    population
        .chunks(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect()
}

fn bench_sampling(c: &mut Criterion) {
    let bounds = Bounds::new(vec![15.0; NUM_VARIABLES], vec![30.0; NUM_VARIABLES]).unwrap();
    let sampler = BoundedSampler::new();
    let mut rng = RandomNumberGenerator::from_seed(4144415054);

    let mut group = c.benchmark_group("sampling");
    for size in [20, 200, 2000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| sampler.sample(black_box(&bounds), size, &mut rng))
        });
    }
    group.finish();
}

fn bench_offspring(c: &mut Criterion) {
    let bounds = Bounds::new(vec![15.0; NUM_VARIABLES], vec![30.0; NUM_VARIABLES]).unwrap();
    let mut rng = RandomNumberGenerator::from_seed(4144415054);
    let crossover = SimulatedBinaryCrossover::new(15.0)
        .unwrap()
        .with_probability(0.8)
        .unwrap();
    let mutation = PolynomialMutation::new(20.0).unwrap();

    let sequential =
        Variation::new(crossover.clone(), mutation.clone()).with_parallel_threshold(usize::MAX);
    let parallel = Variation::new(crossover, mutation).with_parallel_threshold(1);

    let mut group = c.benchmark_group("offspring");
    for matings in [10, 100, 1000].iter() {
        let pairs = parents(&bounds, *matings, &mut rng);

        group.bench_with_input(BenchmarkId::new("sequential", matings), &pairs, |b, pairs| {
            b.iter(|| {
                let result = sequential.offspring(black_box(pairs), &bounds, &mut rng);
                assert!(result.is_ok());
            })
        });

        group.bench_with_input(BenchmarkId::new("parallel", matings), &pairs, |b, pairs| {
            b.iter(|| {
                let result = parallel.offspring(black_box(pairs), &bounds, &mut rng);
                assert!(result.is_ok());
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sampling, bench_offspring);
criterion_main!(benches);
