//! # graph-bwa
//!
//! 把 [BWA](https://github.com/lh3/bwa) 风格的 FM 索引建在 de Bruijn 图的边上，
//! 并把比对命中还原为图上的映射路径。
//!
//! 主要功能：
//!
//! - **打包参考**：边序列 2-bit 打包，模糊碱基记录后随机替换，蛋白质模式按三个读框规范化
//! - **索引构建**：按规模在内存后缀数组与在线动态 BWT 之间选择，得到 FM 索引
//! - **比对原语**：SMEM 种子、种子链、带状仿射间隙 Smith-Waterman
//! - **坐标还原**：命中 → (边, read 区间, 边上区间, 质量)，处理链向、顶点重叠与读框
//!
//! ## 快速示例
//!
//! ```rust
//! use graph_bwa::{AlignmentMode, EdgeGraph, GraphAligner};
//!
//! let mut graph = EdgeGraph::new(11);
//! let edge = graph.add_edge(b"GATTACACCGTAGGCTAACGTTAGCCATGCAAGT");
//! let aligner = GraphAligner::new(&graph, AlignmentMode::Default)?;
//!
//! let path = aligner.align_sequence(b"ACCGTAGGCTAACGTTAGCCATG");
//! for m in &path {
//!     println!("{} {} -> {}", m.edge, m.range.initial, m.range.mapped);
//! }
//! # let _ = edge;
//! # Ok::<(), graph_bwa::BuildError>(())
//! ```
//!
//! ## 模块说明
//!
//! - [`graph`] — 只读的图接口与内存实现
//! - [`index`] — 打包参考、注释、SA/BWT/FM 索引与构建策略
//! - [`align`] — 比对模式与种子-延伸比对原语
//! - [`mapping`] — 命中到映射路径的还原
//! - [`io`] — FASTA / FASTQ 文件解析
//! - [`util`] — DNA 编码、码子规范化、碱基质量

pub mod align;
pub mod error;
pub mod graph;
pub mod index;
pub mod io;
pub mod mapper;
pub mod mapping;
pub mod util;

pub use align::{Aligner, AlignmentHit, AlignmentMode, SeedExtendAligner};
pub use error::BuildError;
pub use graph::{EdgeGraph, EdgeId, Graph};
pub use index::bundle::IndexBundle;
pub use mapper::GraphAligner;
pub use mapping::{EdgeMapping, MappingPath, MappingRange, Range};
