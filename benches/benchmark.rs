use bipartite_matching::{AdjacencyList, AdjacencyMatrix, GraphBuilder, KuhnMunkresSolver};
use criterion::BenchmarkId;
use criterion::Throughput;
use criterion::{criterion_group, criterion_main, Criterion, SamplingMode};
use rand::distributions::{Bernoulli, Distribution, Uniform};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::Beta;
use reservoir_sampling::unweighted::core::r as reservoir_sample;

type UInt = u32;

/// Dense instance, X = 0..size, Y = size..2 * size, a perfect matching is planted.
fn gen_dense_input<G: GraphBuilder<UInt>>(
    seed: u64,
    size: UInt,
    density: f64,
    min_value: i64,
    max_value: i64,
) -> (G, usize) {
    let mut val_rng = ChaCha8Rng::seed_from_u64(seed);
    let mut filter_rng = ChaCha8Rng::seed_from_u64(seed + 1);

    let between = Uniform::from(min_value..max_value);
    let num_of_arcs_fully_dense = (size as u32).pow(2);
    let target_elements_from_prng = ((num_of_arcs_fully_dense as f64) * density) as u32;
    let whether_to_add = Bernoulli::from_ratio(target_elements_from_prng, num_of_arcs_fully_dense)
        .expect("unexpected error");
    let mut ensured_x_to_y = (0..size).collect::<Vec<UInt>>();
    ensured_x_to_y.as_mut_slice().shuffle(&mut filter_rng);

    let mut graph = G::with_order(2 * size).unwrap();
    let mut num_of_arcs = 0;
    (0..size)
        .flat_map(|x| (0..size).map(move |y| (x, y)))
        .for_each(|(x, y)| {
            if whether_to_add.sample(&mut filter_rng) || (ensured_x_to_y[x as usize] == y) {
                graph
                    .add_edge(x, size + y, between.sample(&mut val_rng))
                    .unwrap();
                num_of_arcs += 1;
            }
        });
    (graph, num_of_arcs)
}

/// Sparse instance with `arcs_per_x` random neighbors per X vertex and Beta distributed weights.
fn gen_sparse_input(
    seed: u64,
    num_x: UInt,
    num_y: UInt,
    arcs_per_x: UInt,
    min_value: i64,
    range_width: f64,
) -> AdjacencyList<UInt> {
    let mut val_rng = ChaCha8Rng::seed_from_u64(seed);
    let mut filter_rng = ChaCha8Rng::seed_from_u64(seed + 1);
    let beta = Beta::new(3.0, 3.0).unwrap();

    let mut graph = AdjacencyList::with_order(num_x + num_y).unwrap();
    for x in 0..num_x {
        let mut y_samples = vec![0; arcs_per_x as usize];
        reservoir_sample(num_x..num_x + num_y, y_samples.as_mut_slice(), &mut filter_rng);
        for y in y_samples {
            let value = (range_width * beta.sample(&mut val_rng)).floor() as i64 + min_value;
            graph.add_edge(x, y, value).unwrap();
        }
    }
    graph
}

fn bench_dense_density_and_size(c: &mut Criterion, max_density_percent: UInt, max_size: UInt) {
    let mut group = c.benchmark_group("dense_random_degree");
    let (mut solver, mut solution) = KuhnMunkresSolver::new(
        max_size as usize,
        max_size as usize,
        (max_size as usize).pow(2) * (max_density_percent as usize) / 100,
    );
    group.sample_size(10);
    group.sampling_mode(SamplingMode::Flat);

    for density in (10..=max_density_percent).step_by(30).map(|i| i as f64 * 0.01) {
        for size in (100..=max_size).step_by(100) {
            let (list, num_of_arcs) =
                gen_dense_input::<AdjacencyList<UInt>>(size as u64, size, density, 500, 1000);
            group.throughput(Throughput::Elements(num_of_arcs as u64));
            let benchmark_id =
                BenchmarkId::new("list", format!("density {} size {}", density, size));
            group.bench_with_input(benchmark_id, &list, |b, graph| {
                b.iter(|| {
                    solver.solve(graph, &mut solution, true).unwrap();
                    if !solution.is_perfect() {
                        println!(
                            "not perfect: nits {}, nrelabels {}, num_unmatched {}",
                            solver.nits, solver.nrelabels, solution.num_unmatched,
                        )
                    }
                });
            });

            let (matrix, _) =
                gen_dense_input::<AdjacencyMatrix<UInt>>(size as u64, size, density, 500, 1000);
            let benchmark_id =
                BenchmarkId::new("matrix", format!("density {} size {}", density, size));
            group.bench_with_input(benchmark_id, &matrix, |b, graph| {
                b.iter(|| solver.solve(graph, &mut solution, true).unwrap());
            });
        }
    }
    group.finish();
}

fn bench_sparse_num_x_and_arcs_per_x(c: &mut Criterion, max_num_x: UInt, max_arcs_per_x: UInt) {
    let mut group = c.benchmark_group("sparse_random");
    let num_y = 4000;
    let (mut solver, mut solution) = KuhnMunkresSolver::new(
        max_num_x as usize,
        num_y as usize,
        (max_num_x * max_arcs_per_x) as usize,
    );
    group.sampling_mode(SamplingMode::Flat);

    for num_x in (100..=max_num_x).step_by(200) {
        for arcs_per_x in (8..=max_arcs_per_x).step_by(8) {
            let graph = gen_sparse_input(num_x as u64, num_x, num_y, arcs_per_x, 300, 700.0);
            group.throughput(Throughput::Elements(graph.num_of_edges() as u64));
            let benchmark_id = BenchmarkId::new(
                "kuhn_munkres",
                format!(
                    "num_x {}, num_y {}, arcs_per_x {}",
                    num_x, num_y, arcs_per_x
                ),
            );
            group.bench_with_input(benchmark_id, &graph, |b, graph| {
                b.iter(|| solver.solve(graph, &mut solution, false).unwrap());
            });
        }
    }
    group.finish();
}

fn bench_dense_density_70_size_300(c: &mut Criterion) {
    bench_dense_density_and_size(c, 70, 300)
}

fn bench_sparse_num_x_500_arcs_per_x_16(c: &mut Criterion) {
    bench_sparse_num_x_and_arcs_per_x(c, 500, 16)
}

criterion_group!(
    benches,
    bench_dense_density_70_size_300,
    bench_sparse_num_x_500_arcs_per_x_16
);
criterion_main!(benches);
