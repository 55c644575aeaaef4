//! 演示如何在 library 模式下把序列比对到图的边上。
//!
//! 运行方式：
//! ```bash
//! cargo run --example simple_align
//! ```

use graph_bwa::align::Aligner;
use graph_bwa::util::dna;
use graph_bwa::{AlignmentMode, EdgeGraph, Graph, GraphAligner, SeedExtendAligner};

fn main() -> Result<(), graph_bwa::BuildError> {
    // 1. 构建一个小图：两条边，K = 21
    let mut graph = EdgeGraph::new(21);
    let e1 = graph.add_edge(b"ATGCGTACGTTAGCCGATCGATTGCATGCCGTAGCTAGGCTTACGATCGA");
    let e2 = graph.add_edge(b"TTGACCGGTAACTGCATCGGATCCATGGCAAGTCTAGCTAGCAGTCAGTC");
    println!("边 {} 与 {}，共轭边 {} 与 {}", e1, e2, graph.conjugate(e1), graph.conjugate(e2));

    // 2. 建索引
    let aligner = GraphAligner::new(&graph, AlignmentMode::Default)?;
    let meta = aligner.bundle().meta();
    println!(
        "索引完成：{} 条边，{} 个段，双向 {} bp，策略 {}",
        meta.n_edges, meta.n_segments, meta.indexed_bases, meta.strategy
    );

    // 3. 比对原语的原始命中
    let read = b"ACGTTAGCCGATCGATTGCATGCCGTAGCTAGGCTT";
    let hits = SeedExtendAligner::new(AlignmentMode::Default).align(aligner.bundle(), read);
    println!("\n原始命中：");
    for h in &hits {
        println!(
            "  read[{}..{}] -> flat[{}..{}] score={} rev={} secondary={}",
            h.qb, h.qe, h.rb, h.re, h.score, h.is_rev, h.secondary
        );
    }

    // 4. 正向与反向互补读段的映射路径
    for (label, q) in [("正向", read.to_vec()), ("反向互补", dna::revcomp(read))] {
        let path = aligner.align_sequence(&q);
        println!("\n{} 映射路径：", label);
        for m in &path {
            println!(
                "  edge={} read{} -> edge{} quality={:.3}",
                m.edge, m.range.initial, m.range.mapped, m.quality
            );
        }
    }

    Ok(())
}
