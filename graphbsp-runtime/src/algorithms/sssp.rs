use graphbsp_api::program::{ComputeContext, VertexProgram};
use graphbsp_common::config::{Configuration, SOURCE_VERTEX};
use graphbsp_common::error::{BspError, BspResult};

pub const INFINITY: u64 = u64::MAX;

/// Single-source shortest paths by iterative relaxation. The source
/// seeds distance 0 in superstep 0; every round a vertex takes the
/// minimum over its value and inbound candidates, relaxes its out-edges
/// when that improved it, and votes to halt otherwise. Values are
/// non-increasing across supersteps.
#[derive(Debug, Clone)]
pub struct ShortestPathsProgram {
    pub source: u64,
}

impl ShortestPathsProgram {
    pub fn new(source: u64) -> Self {
        Self { source }
    }

    pub fn from_configuration(config: &Configuration) -> BspResult<Self> {
        let source = config
            .get_u64(SOURCE_VERTEX)?
            .ok_or_else(|| BspError::Config(format!("{SOURCE_VERTEX} is required")))?;
        Ok(Self { source })
    }
}

impl VertexProgram<u64, u64, u64, u64> for ShortestPathsProgram {
    fn name(&self) -> &str {
        "sssp"
    }

    fn compute(
        &self,
        context: &mut dyn ComputeContext<u64, u64, u64, u64>,
        messages: &mut dyn Iterator<Item = u64>,
    ) {
        let current = *context.value();
        let mut best = current;

        if context.superstep() == 0 && *context.vertex_id() == self.source {
            best = 0;
        }
        for msg in messages {
            if msg < best {
                best = msg;
            }
        }

        if best < current {
            context.set_value(best);
            let relaxed: Vec<(u64, u64)> = context
                .edges()
                .iter()
                .map(|e| (e.target_id, best.saturating_add(e.value)))
                .collect();
            for (target, distance) in relaxed {
                context.send_message(target, distance);
            }
        } else {
            context.vote_to_halt();
        }
    }
}
