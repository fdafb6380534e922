use graphbsp_common::types::Edge;

/// Context handed to a vertex compute call. All side effects of a
/// superstep go through here: the vertex's own value, its outbound
/// messages, and its halt vote.
pub trait ComputeContext<K, VV, EV, M> {
    fn superstep(&self) -> u64;
    fn vertex_id(&self) -> &K;
    fn value(&self) -> &VV;
    fn set_value(&mut self, value: VV);
    fn edges(&self) -> &[Edge<K, EV>];
    fn send_message(&mut self, target_id: K, message: M);
    fn vote_to_halt(&mut self);
    /// Global aggregate merged at the previous barrier, if the job
    /// registered an aggregator.
    fn aggregated(&self) -> Option<&VV>;
}

/// A vertex-centric program. Invoked once per superstep for every vertex
/// that is active or has inbound messages. Programs are stateless
/// descriptions; per-vertex state lives in the context.
pub trait VertexProgram<K, VV, EV, M>: Send + Sync + 'static {
    fn name(&self) -> &str;

    fn compute(
        &self,
        context: &mut dyn ComputeContext<K, VV, EV, M>,
        messages: &mut dyn Iterator<Item = M>,
    );
}
