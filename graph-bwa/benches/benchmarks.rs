use criterion::{black_box, criterion_group, criterion_main, Criterion};

use graph_bwa::align::sw::{banded_sw, SwParams};
use graph_bwa::align::{Aligner, AlignmentMode, SeedExtendAligner};
use graph_bwa::index::pac::PackedBuffer;
use graph_bwa::index::{rope, sa, strategy};
use graph_bwa::util::dna;
use graph_bwa::{EdgeGraph, GraphAligner, IndexBundle};

fn make_sequence(len: usize, seed: u32) -> Vec<u8> {
    let bases = [b'A', b'C', b'G', b'T'];
    let mut seq = Vec::with_capacity(len);
    let mut x: u32 = seed;
    for _ in 0..len {
        x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        seq.push(bases[(x >> 16) as usize % 4]);
    }
    seq
}

fn make_graph(n_edges: usize, edge_len: usize) -> EdgeGraph {
    let mut g = EdgeGraph::new(21);
    for i in 0..n_edges {
        g.add_edge(&make_sequence(edge_len, 42 + i as u32));
    }
    g
}

fn bidirectional(len: usize) -> PackedBuffer {
    let mut pac = PackedBuffer::from_ascii(&make_sequence(len, 7)).unwrap();
    pac.append_reverse_complement().unwrap();
    pac
}

fn bench_pack(c: &mut Criterion) {
    let seq = make_sequence(100_000, 1);
    c.bench_function("pack_100k", |b| {
        b.iter(|| {
            let mut pac = PackedBuffer::from_ascii(black_box(&seq)).unwrap();
            pac.append_reverse_complement().unwrap();
            black_box(pac)
        })
    });
}

fn bench_build_sa(c: &mut Criterion) {
    let text: Vec<u8> = bidirectional(5_000).iter().map(|x| x + 1).chain(std::iter::once(0)).collect();
    c.bench_function("build_sa_10k", |b| b.iter(|| black_box(sa::build_sa(black_box(&text)))));
}

fn bench_online_bwt(c: &mut Criterion) {
    let pac = bidirectional(5_000);
    c.bench_function("online_bwt_10k", |b| {
        b.iter(|| black_box(rope::build_bwt_online(black_box(&pac), pac.len())))
    });
}

fn bench_build_index(c: &mut Criterion) {
    let pac = bidirectional(5_000);
    c.bench_function("build_index_10k", |b| {
        b.iter(|| black_box(strategy::build_index(black_box(&pac), pac.len())))
    });
}

fn bench_backward_search(c: &mut Criterion) {
    let g = make_graph(20, 500);
    let bundle = IndexBundle::build(&g, AlignmentMode::Default).unwrap();
    let probe = make_sequence(500, 42);
    let pattern: Vec<u8> = probe[100..120].iter().filter_map(|&b| dna::to_alphabet(b)).collect();
    c.bench_function("backward_search_20bp", |b| {
        b.iter(|| black_box(bundle.fm().backward_search(black_box(&pattern))))
    });
}

fn bench_banded_sw(c: &mut Criterion) {
    let query: Vec<u8> = make_sequence(100, 3).iter().map(|&b| dna::to_nt4(b)).collect();
    let mut reference = query.clone();
    reference[50] = (reference[50] + 1) & 3;
    let params = SwParams::from(&AlignmentMode::Default.align_opt());
    c.bench_function("banded_sw_100bp", |b| {
        b.iter(|| black_box(banded_sw(black_box(&query), black_box(&reference), params)))
    });
}

fn bench_align(c: &mut Criterion) {
    let g = make_graph(20, 500);
    let bundle = IndexBundle::build(&g, AlignmentMode::Default).unwrap();
    let aligner = SeedExtendAligner::new(AlignmentMode::Default);
    let read = make_sequence(500, 45)[200..300].to_vec();
    c.bench_function("seed_extend_100bp", |b| {
        b.iter(|| black_box(aligner.align(&bundle, black_box(&read))))
    });
}

fn bench_align_and_reconstruct(c: &mut Criterion) {
    let g = make_graph(20, 500);
    let ga = GraphAligner::new(&g, AlignmentMode::Default).unwrap();
    let reads: Vec<Vec<u8>> = (0..64).map(|i| make_sequence(500, 42 + i % 20)[100..250].to_vec()).collect();
    c.bench_function("align_batch_64x150bp", |b| b.iter(|| black_box(ga.align_batch(black_box(&reads)))));
}

criterion_group!(
    benches,
    bench_pack,
    bench_build_sa,
    bench_online_bwt,
    bench_build_index,
    bench_backward_search,
    bench_banded_sw,
    bench_align,
    bench_align_and_reconstruct
);
criterion_main!(benches);
