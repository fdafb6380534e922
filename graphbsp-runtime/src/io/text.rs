use graphbsp_api::io::{VertexReader, VertexWriter};
use graphbsp_common::error::{BspError, BspResult};
use graphbsp_common::types::{Edge, Vertex};
use std::fmt::Display;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Reads tab-separated adjacency records: the first field is the vertex
/// id, every following field is `target:weight`. The vertex value is
/// not part of the record; every vertex starts at `default_value`.
pub struct AdjacencyListReader {
    default_value: u64,
}

impl AdjacencyListReader {
    pub fn new(default_value: u64) -> Self {
        Self { default_value }
    }
}

impl VertexReader<u64, u64, u64> for AdjacencyListReader {
    fn read(&self, path: &Path) -> BspResult<Vec<Vertex<u64, u64, u64>>> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(b'\t')
            .from_path(path)
            .map_err(|e| BspError::Io(e.into()))?;

        let mut out = Vec::new();
        for rec in rdr.records() {
            let rec = rec.map_err(|e| BspError::Config(format!("input read: {e}")))?;
            let id: u64 = rec
                .get(0)
                .ok_or_else(|| BspError::Config("vertex id missing".to_string()))?
                .trim()
                .parse()
                .map_err(|e| BspError::Config(format!("vertex id parse: {e}")))?;

            let mut edges = Vec::with_capacity(rec.len().saturating_sub(1));
            for field in rec.iter().skip(1) {
                let field = field.trim();
                if field.is_empty() {
                    continue;
                }
                let (target, weight) = field.split_once(':').ok_or_else(|| {
                    BspError::Config(format!("edge {field:?} is not target:weight"))
                })?;
                let target: u64 = target
                    .trim()
                    .parse()
                    .map_err(|e| BspError::Config(format!("edge target parse: {e}")))?;
                let weight: u64 = weight
                    .trim()
                    .parse()
                    .map_err(|e| BspError::Config(format!("edge weight parse: {e}")))?;
                edges.push(Edge::new(target, weight));
            }

            out.push(Vertex::new(id, self.default_value, edges));
        }
        Ok(out)
    }
}

/// Writes one `id<TAB>value` record per vertex, sorted by id.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextVertexWriter;

impl<K, VV, EV> VertexWriter<K, VV, EV> for TextVertexWriter
where
    K: Display + Ord + Send + Sync,
    VV: Display + Send + Sync,
    EV: Send + Sync,
{
    fn write(&self, path: &Path, vertices: &[Vertex<K, VV, EV>]) -> BspResult<()> {
        let mut ordered: Vec<&Vertex<K, VV, EV>> = vertices.iter().collect();
        ordered.sort_by(|a, b| a.id.cmp(&b.id));

        let file = std::fs::File::create(path)?;
        let mut w = BufWriter::new(file);
        for v in ordered {
            writeln!(w, "{}\t{}", v.id, v.value)?;
        }
        w.flush()?;
        Ok(())
    }
}
