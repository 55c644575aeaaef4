use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{debug, info};
use rayon::ThreadPoolBuilder;

use graph_bwa::io::{fasta, fastq::FastqReader};
use graph_bwa::util::qual::{trim_bad_quality, QualityTable};
use graph_bwa::{AlignmentMode, EdgeGraph, EdgeId, Graph, GraphAligner, IndexBundle};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(
    name = "graph-bwa",
    author,
    version,
    about = "BWA-style alignment of sequences onto de Bruijn graph edges",
    arg_required_else_help = true
)]
struct Cli {
    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct GraphOpts {
    /// Edge sequences, one FASTA record per edge (conjugates are derived)
    #[arg(short, long)]
    edges: PathBuf,
    /// k-mer size of the graph
    #[arg(short, default_value_t = 21)]
    k: usize,
    /// Alignment mode: default, intra-ctg, pacbio, ont2d, protein
    #[arg(short, long, default_value_t = AlignmentMode::Default)]
    mode: AlignmentMode,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the index over the graph edges and print its statistics
    Index {
        #[command(flatten)]
        graph: GraphOpts,
    },
    /// Map FASTQ reads onto the graph edges (TSV output)
    Map {
        #[command(flatten)]
        graph: GraphOpts,
        /// Reads FASTQ file
        reads: PathBuf,
        /// Output TSV path (stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
        #[arg(short = 't', long = "threads", default_value_t = 1)]
        threads: usize,
        /// Trim read ends below this Phred quality (0 disables trimming)
        #[arg(long = "trim-quality", default_value_t = 0)]
        trim_quality: u8,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        })
        .init();

    match cli.command {
        Commands::Index { graph } => run_index(&graph),
        Commands::Map { graph, reads, out, threads, trim_quality } => {
            ThreadPoolBuilder::new()
                .num_threads(threads.max(1))
                .build_global()
                .context("cannot initialise the thread pool")?;
            run_map(&graph, &reads, out.as_deref(), trim_quality)
        }
    }
}

/// Loads the edges and names every edge and its conjugate (`name'`).
fn load_graph(opts: &GraphOpts) -> Result<(EdgeGraph, HashMap<EdgeId, String>)> {
    let records = fasta::read_fasta(&opts.edges)?;
    if records.is_empty() {
        anyhow::bail!("edge file '{}' contains no sequences", opts.edges.display());
    }

    let mut graph = EdgeGraph::new(opts.k);
    let mut names = HashMap::with_capacity(records.len() * 2);
    for rec in records {
        let e = graph.add_edge(&rec.seq);
        let conj = graph.conjugate(e);
        if conj != e {
            names.insert(conj, format!("{}'", rec.id));
        }
        names.insert(e, rec.id);
    }
    info!("loaded {} edges (k = {}) from {}", graph.edge_count(), opts.k, opts.edges.display());
    Ok((graph, names))
}

fn run_index(opts: &GraphOpts) -> Result<()> {
    let (graph, _) = load_graph(opts)?;
    let bundle = IndexBundle::build(&graph, opts.mode)
        .with_context(|| format!("cannot index '{}'", opts.edges.display()))?;

    let meta = bundle.meta();
    println!("edges: {}", meta.n_edges);
    println!("segments: {}", meta.n_segments);
    println!("forward_len: {}", bundle.forward_len());
    println!("indexed_bases: {}", meta.indexed_bases);
    println!("ambiguous_runs: {}", bundle.ambiguous().len());
    println!("mode: {}", bundle.mode());
    println!("strategy: {}", meta.strategy);
    println!("built_at: {}", meta.built_at.to_rfc3339());
    Ok(())
}

/// A read prepared for alignment: trimmed sequence plus its offset in the original read.
struct PreparedRead {
    id: String,
    offset: usize,
    seq: Vec<u8>,
}

fn run_map(opts: &GraphOpts, reads: &Path, out: Option<&Path>, trim_quality: u8) -> Result<()> {
    let (graph, names) = load_graph(opts)?;
    let aligner = GraphAligner::new(&graph, opts.mode)
        .with_context(|| format!("cannot index '{}'", opts.edges.display()))?;

    let fh = File::open(reads).with_context(|| format!("cannot open reads FASTQ '{}'", reads.display()))?;
    let table = QualityTable::new();
    let mut batch = Vec::new();
    for rec in FastqReader::new(BufReader::new(fh)) {
        let rec = rec.with_context(|| format!("malformed FASTQ '{}'", reads.display()))?;
        let phred = rec.phred();
        let kept = if trim_quality > 0 { trim_bad_quality(&phred, trim_quality) } else { 0..rec.seq.len() };
        debug!(
            "{}: kept [{}, {}), p(correct) = {:.4}",
            rec.id,
            kept.start,
            kept.end,
            table.kmer_probability(&phred[kept.clone()])
        );
        batch.push(PreparedRead { id: rec.id, offset: kept.start, seq: rec.seq[kept].to_vec() });
    }
    info!("aligning {} reads with {} threads", batch.len(), rayon::current_num_threads());

    let seqs: Vec<&[u8]> = batch.iter().map(|r| r.seq.as_slice()).collect();
    let paths = aligner.align_batch(&seqs);

    let mut w: Box<dyn Write> = match out {
        Some(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("cannot create '{}'", p.display()))?,
        )),
        None => Box::new(BufWriter::new(std::io::stdout())),
    };
    writeln!(w, "read\tedge\tquery_start\tquery_end\tedge_start\tedge_end\tquality")?;
    let mut mapped = 0usize;
    for (read, path) in batch.iter().zip(&paths) {
        if !path.is_empty() {
            mapped += 1;
        }
        for m in path {
            let name = names.get(&m.edge).map_or_else(|| m.edge.to_string(), Clone::clone);
            writeln!(
                w,
                "{}\t{}\t{}\t{}\t{}\t{}\t{:.4}",
                read.id,
                name,
                read.offset + m.range.initial.start,
                read.offset + m.range.initial.end,
                m.range.mapped.start,
                m.range.mapped.end,
                m.quality
            )?;
        }
    }
    w.flush()?;
    info!("{} of {} reads mapped", mapped, batch.len());
    Ok(())
}
