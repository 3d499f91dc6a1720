//! Control Flow Graph
//!
//! Successor/predecessor edges are derived from each block's terminator
//! rather than stored redundantly: a `br`/`condbr`/`switch`/`indirectbr`
//! lists its targets as `Value::BasicBlock` operands.

use rustc_hash::FxHashMap;

use crate::basic_block::BasicBlock;
use crate::function::Function;
use crate::value::Value;

/// Successor blocks of `block`, in operand order (so `condbr`'s true branch
/// comes before its false branch).
pub fn successors(block: &BasicBlock) -> Vec<BasicBlock> {
    match block.terminator() {
        Some(term) => term.operands().into_iter().filter_map(|op| match op {
            Value::BasicBlock(bb) => Some(bb),
            _ => None,
        }).collect(),
        None => Vec::new(),
    }
}

/// A function's control-flow graph, computed once and reused across passes
/// within a single driver iteration.
pub struct Cfg {
    order: Vec<BasicBlock>,
    successors: FxHashMap<BasicBlock, Vec<BasicBlock>>,
    predecessors: FxHashMap<BasicBlock, Vec<BasicBlock>>,
}

impl Cfg {
    pub fn build(function: &Function) -> Self {
        let order = function.blocks();
        let mut successors = FxHashMap::default();
        let mut predecessors: FxHashMap<BasicBlock, Vec<BasicBlock>> = FxHashMap::default();
        for block in &order {
            predecessors.entry(block.clone()).or_default();
        }
        for block in &order {
            let succs = self::successors(block);
            for succ in &succs {
                predecessors.entry(succ.clone()).or_default().push(block.clone());
            }
            successors.insert(block.clone(), succs);
        }
        Self { order, successors, predecessors }
    }

    pub fn entry(&self) -> Option<&BasicBlock> {
        self.order.first()
    }

    pub fn blocks(&self) -> &[BasicBlock] {
        &self.order
    }

    pub fn successors(&self, block: &BasicBlock) -> &[BasicBlock] {
        self.successors.get(block).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn predecessors(&self, block: &BasicBlock) -> &[BasicBlock] {
        self.predecessors.get(block).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Reverse-postorder over reachable blocks, starting from the entry
    /// block. Unreachable blocks (no path from entry) are omitted.
    pub fn reverse_postorder(&self) -> Vec<BasicBlock> {
        let Some(entry) = self.entry() else { return Vec::new() };
        let mut visited = FxHashMap::default();
        let mut postorder = Vec::new();
        self.postorder_visit(entry, &mut visited, &mut postorder);
        postorder.reverse();
        postorder
    }

    fn postorder_visit(&self, block: &BasicBlock, visited: &mut FxHashMap<BasicBlock, bool>, out: &mut Vec<BasicBlock>) {
        if visited.contains_key(block) {
            return;
        }
        visited.insert(block.clone(), true);
        for succ in self.successors(block) {
            self.postorder_visit(succ, visited, out);
        }
        out.push(block.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::{Instruction, Opcode};
    use crate::Context;

    #[test]
    fn test_linear_cfg() {
        let ctx = Context::new();
        let f = Function::new("f", ctx.void_type(), vec![], false);
        let entry = BasicBlock::new("entry");
        let exit = BasicBlock::new("exit");
        entry.append(Instruction::new(Opcode::Br, None, vec![Value::BasicBlock(exit.clone())], None));
        exit.append(Instruction::new(Opcode::Ret, None, vec![], None));
        f.append_block(entry.clone());
        f.append_block(exit.clone());

        let cfg = Cfg::build(&f);
        assert_eq!(cfg.successors(&entry), &[exit.clone()]);
        assert_eq!(cfg.predecessors(&exit), &[entry.clone()]);
        assert_eq!(cfg.reverse_postorder(), vec![entry, exit]);
    }
}
