use std::{collections::HashSet, fmt::Debug};

use log::{debug, trace};

use crate::{
    alignment::TraceEntry,
    alignment_matrix::{Direction, index::AlignmentMatrixIndex},
    score::Score,
};

/// A filled dynamic programming table that can be traced back.
pub trait TraceTable {
    /// The automaton state stored per cell.
    type State: Copy + Debug;

    /// The optimal score and all (cell, state) pairs that attain it, in traceback order.
    fn start_cells(&self) -> (Score, Vec<(AlignmentMatrixIndex, Self::State)>);

    /// The optimal predecessors of a cell in a state.
    ///
    /// The direction is the step back from `index`, the state is the one at the predecessor cell.
    /// No predecessors mark the end of a trace.
    fn predecessors(
        &self,
        index: AlignmentMatrixIndex,
        state: Self::State,
    ) -> impl Iterator<Item = (Direction, Self::State)>;
}

#[derive(Debug, Clone)]
struct Branch<State> {
    index: AlignmentMatrixIndex,
    state: State,
    reversed_trace: Vec<TraceEntry>,
}

/// Enumerates up to `max_number` distinct co-optimal traces of a filled table.
///
/// Traces are ordered by start cell first and predecessor order second.
/// At least one trace is returned, even if `max_number` is zero.
pub fn traceback<Table: TraceTable>(
    table: &Table,
    max_number: usize,
) -> (Score, Vec<Vec<TraceEntry>>) {
    let max_number = max_number.max(1);
    let (score, start_cells) = table.start_cells();
    debug!(
        "Tracing back from {} start cells with score {score}",
        start_cells.len()
    );

    let mut traces = Vec::new();
    let mut known_traces = HashSet::new();
    let mut stack: Vec<_> = start_cells
        .into_iter()
        .rev()
        .map(|(index, state)| Branch {
            index,
            state,
            reversed_trace: Vec::new(),
        })
        .collect();

    while let Some(mut branch) = stack.pop() {
        loop {
            let mut predecessors = table.predecessors(branch.index, branch.state);
            let Some((direction, state)) = predecessors.next() else {
                break;
            };

            // Siblings are pushed in reverse so that they are popped in predecessor order.
            let siblings: Vec<_> = predecessors.collect();
            for &(sibling_direction, sibling_state) in siblings.iter().rev() {
                let (index, entry) = branch.index.trace_step(sibling_direction);
                let mut reversed_trace = branch.reversed_trace.clone();
                reversed_trace.push(entry);
                stack.push(Branch {
                    index,
                    state: sibling_state,
                    reversed_trace,
                });
            }

            let (index, entry) = branch.index.trace_step(direction);
            branch.index = index;
            branch.state = state;
            branch.reversed_trace.push(entry);
        }

        let mut trace = branch.reversed_trace;
        trace.reverse();
        trace!(
            "Branch ended at {:?} in state {:?} with {} columns, {} branches pending",
            branch.index,
            branch.state,
            trace.len(),
            stack.len()
        );
        if known_traces.insert(trace.clone()) {
            traces.push(trace);
            if traces.len() >= max_number {
                break;
            }
        }
    }

    debug!("Found {} distinct traces", traces.len());
    (score, traces)
}
