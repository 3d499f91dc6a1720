//! Redundant load elimination
//!
//! Forwards a load to an earlier load of the same pointer within a block,
//! as long as nothing could have changed memory in between. L1 itself is
//! never erased by this pass.

use llvm_core::{BasicBlock, Function, Opcode};

use crate::predicates::no_intervening_store_or_call;
use crate::stats::{Stats, CSE_LD_ELIM};

pub fn run(function: &Function, stats: &mut Stats) {
    for block in function.blocks() {
        let scheduled = scan_block(&block);
        for inst in scheduled {
            if inst.is_parented() {
                inst.erase_from_parent();
                stats.increment(CSE_LD_ELIM);
            }
        }
    }
}

fn scan_block(block: &BasicBlock) -> Vec<llvm_core::Instruction> {
    let insts = block.instructions();
    let mut scheduled = Vec::new();
    for (i, l1) in insts.iter().enumerate() {
        if l1.opcode() != Opcode::Load {
            continue;
        }
        for l2 in &insts[i + 1..] {
            match l2.opcode() {
                Opcode::Store => break,
                Opcode::Load if matches(l1, l2, block) => {
                    l2.replace_all_uses_with(&llvm_core::Value::Instruction(l1.clone()));
                    scheduled.push(l2.clone());
                }
                _ => {}
            }
        }
    }
    scheduled
}

fn matches(l1: &llvm_core::Instruction, l2: &llvm_core::Instruction, block: &BasicBlock) -> bool {
    !l2.is_volatile()
        && l2.operand(0) == l1.operand(0)
        && l2.result_type() == l1.result_type()
        && no_intervening_store_or_call(block, l1, l2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use llvm_core::{Context, Function, Instruction, Value};

    #[test]
    fn test_redundant_load_forwards_to_first() {
        let ctx = Context::new();
        let i32 = ctx.int32_type();
        let ptr_ty = ctx.ptr_type(i32.clone());
        let p = Value::Argument { ty: ptr_ty, index: 0, name: Some("p".into()) };
        let f = Function::new("f", ctx.void_type(), vec![], false);
        let block = BasicBlock::new("entry");
        let a = Instruction::new(llvm_core::Opcode::Load, Some(i32.clone()), vec![p.clone()], Some("a".into()));
        let b = Instruction::new(llvm_core::Opcode::Load, Some(i32), vec![p], Some("b".into()));
        let ret = Instruction::new(llvm_core::Opcode::Ret, None, vec![Value::Instruction(b.clone())], None);
        block.append(a.clone());
        block.append(b.clone());
        block.append(ret.clone());
        f.append_block(block);

        let mut stats = Stats::new();
        run(&f, &mut stats);

        assert!(a.is_parented());
        assert!(!b.is_parented());
        assert_eq!(ret.operand(0), Some(Value::Instruction(a)));
        assert_eq!(stats.get(CSE_LD_ELIM), 1);
    }

    #[test]
    fn test_intervening_call_prevents_elimination() {
        let ctx = Context::new();
        let i32 = ctx.int32_type();
        let ptr_ty = ctx.ptr_type(i32.clone());
        let p = Value::Argument { ty: ptr_ty, index: 0, name: Some("p".into()) };
        let f = Function::new("f", ctx.void_type(), vec![], false);
        let block = BasicBlock::new("entry");
        let a = Instruction::new(llvm_core::Opcode::Load, Some(i32.clone()), vec![p.clone()], Some("a".into()));
        let call = Instruction::new(llvm_core::Opcode::Call, None, vec![], None);
        let b = Instruction::new(llvm_core::Opcode::Load, Some(i32), vec![p], Some("b".into()));
        block.append(a.clone());
        block.append(call);
        block.append(b.clone());
        f.append_block(block);

        let mut stats = Stats::new();
        run(&f, &mut stats);

        assert!(b.is_parented());
        assert_eq!(stats.get(CSE_LD_ELIM), 0);
    }

    #[test]
    fn test_volatile_load_never_eliminated() {
        let ctx = Context::new();
        let i32 = ctx.int32_type();
        let ptr_ty = ctx.ptr_type(i32.clone());
        let p = Value::Argument { ty: ptr_ty, index: 0, name: Some("p".into()) };
        let f = Function::new("f", ctx.void_type(), vec![], false);
        let block = BasicBlock::new("entry");
        let a = Instruction::new(llvm_core::Opcode::Load, Some(i32.clone()), vec![p.clone()], Some("a".into()));
        let b = Instruction::new(llvm_core::Opcode::Load, Some(i32), vec![p], Some("b".into())).with_volatile(true);
        block.append(a);
        block.append(b.clone());
        f.append_block(block);

        let mut stats = Stats::new();
        run(&f, &mut stats);

        assert!(b.is_parented());
        assert_eq!(stats.get(CSE_LD_ELIM), 0);
    }
}
