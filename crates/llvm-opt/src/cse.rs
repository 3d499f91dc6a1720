//! Dominator-tree-based common subexpression elimination
//!
//! Rebuilt once per function at the start of every CSE invocation: the
//! dominator tree is a CSE-scoped resource here, not a cached analysis
//! carried across passes.

use llvm_core::{BasicBlock, Cfg, DominatorTree, Function, Instruction, Value};

use crate::predicates::is_literal_match;
use crate::stats::{Stats, CSE_ELIM};

pub fn run(function: &Function, stats: &mut Stats) {
    let cfg = Cfg::build(function);
    let tree = DominatorTree::build(&cfg);
    let preorder = tree.preorder();

    let mut scheduled = Vec::new();
    for b in function.blocks() {
        for d in &preorder {
            if *d == b {
                scheduled.extend(intra_block_matches(&b));
            } else if tree.dominates(&b, d) {
                scheduled.extend(cross_block_matches(&b, d));
            }
        }
    }

    for inst in scheduled {
        if inst.is_parented() {
            inst.erase_from_parent();
            stats.increment(CSE_ELIM);
        }
    }
}

/// For every ordered pair (I, J) with I earlier than J in `block`, schedule
/// J for erasure if it literally matches I.
fn intra_block_matches(block: &BasicBlock) -> Vec<Instruction> {
    let insts = block.instructions();
    let mut scheduled = Vec::new();
    for i in 0..insts.len() {
        for j in (i + 1)..insts.len() {
            if is_literal_match(&insts[i], &insts[j]) {
                insts[j].replace_all_uses_with(&Value::Instruction(insts[i].clone()));
                scheduled.push(insts[j].clone());
            }
        }
    }
    scheduled
}

/// `dominator` strictly dominates `dominated`; every literal match between
/// the two schedules the `dominated`-block instruction for erasure.
fn cross_block_matches(dominator: &BasicBlock, dominated: &BasicBlock) -> Vec<Instruction> {
    let mut scheduled = Vec::new();
    for i in dominator.instructions() {
        for j in dominated.instructions() {
            if is_literal_match(&i, &j) {
                j.replace_all_uses_with(&Value::Instruction(i.clone()));
                scheduled.push(j);
            }
        }
    }
    scheduled
}

#[cfg(test)]
mod tests {
    use super::*;
    use llvm_core::{Context, Opcode};

    #[test]
    fn test_intra_block_duplicate_eliminated() {
        let ctx = Context::new();
        let i32 = ctx.int32_type();
        let f = Function::new("f", ctx.void_type(), vec![], false);
        let entry = BasicBlock::new("entry");
        let x = Value::Argument { ty: i32.clone(), index: 0, name: Some("x".into()) };
        let y = Value::Argument { ty: i32.clone(), index: 1, name: Some("y".into()) };
        let p = Instruction::new(Opcode::Add, Some(i32.clone()), vec![x.clone(), y.clone()], Some("p".into()));
        let q = Instruction::new(Opcode::Add, Some(i32), vec![x, y], Some("q".into()));
        let ret = Instruction::new(Opcode::Ret, None, vec![Value::Instruction(q.clone())], None);
        entry.append(p.clone());
        entry.append(q.clone());
        entry.append(ret.clone());
        f.append_block(entry);

        let mut stats = Stats::new();
        run(&f, &mut stats);

        assert!(p.is_parented());
        assert!(!q.is_parented());
        assert_eq!(ret.operand(0), Some(Value::Instruction(p)));
        assert_eq!(stats.get(CSE_ELIM), 1);
    }

    #[test]
    fn test_cross_block_dominated_duplicate_eliminated() {
        let ctx = Context::new();
        let i32 = ctx.int32_type();
        let f = Function::new("f", ctx.void_type(), vec![], false);
        let entry = BasicBlock::new("entry");
        let succ = BasicBlock::new("succ");
        let x = Value::Argument { ty: i32.clone(), index: 0, name: Some("x".into()) };
        let y = Value::Argument { ty: i32.clone(), index: 1, name: Some("y".into()) };
        let p = Instruction::new(Opcode::Add, Some(i32.clone()), vec![x.clone(), y.clone()], Some("p".into()));
        entry.append(p.clone());
        entry.append(Instruction::new(Opcode::Br, None, vec![Value::BasicBlock(succ.clone())], None));

        let q = Instruction::new(Opcode::Add, Some(i32), vec![x, y], Some("q".into()));
        let ret = Instruction::new(Opcode::Ret, None, vec![Value::Instruction(q.clone())], None);
        succ.append(q.clone());
        succ.append(ret.clone());

        f.append_block(entry);
        f.append_block(succ);

        let mut stats = Stats::new();
        run(&f, &mut stats);

        assert!(!q.is_parented());
        assert_eq!(ret.operand(0), Some(Value::Instruction(p)));
        assert_eq!(stats.get(CSE_ELIM), 1);
    }
}
