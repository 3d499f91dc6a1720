//! Redundant store elimination
//!
//! Combines store-to-load forwarding and dead-store elimination in one
//! per-store scan, with a deliberately asymmetric cutoff rule: once
//! store-to-load forwarding has fired at least once for a given S1, a
//! later side-effecting instruction no longer stops the scan for that
//! S1 -- only a matching second store does. A third store to the same
//! pointer in the same block is therefore not reconsidered until the
//! next driver iteration.

use llvm_core::{BasicBlock, Function, Instruction, Opcode, Value};

use crate::predicates::has_side_effects;
use crate::stats::{Stats, CSE_ST_ELIM, CSE_STORE2LOAD};

pub fn run(function: &Function, stats: &mut Stats) {
    for block in function.blocks() {
        let (forwarded, store_eliminated) = scan_block(&block);
        for inst in forwarded {
            if inst.is_parented() {
                inst.erase_from_parent();
                stats.increment(CSE_STORE2LOAD);
            }
        }
        for inst in store_eliminated {
            if inst.is_parented() {
                inst.erase_from_parent();
                stats.increment(CSE_ST_ELIM);
            }
        }
    }
}

fn scan_block(block: &BasicBlock) -> (Vec<Instruction>, Vec<Instruction>) {
    let insts = block.instructions();
    let mut forwarded = Vec::new();
    let mut store_eliminated = Vec::new();

    for (i, s1) in insts.iter().enumerate() {
        if s1.opcode() != Opcode::Store {
            continue;
        }
        let s1_ptr = s1.operand(1);
        let s1_val = s1.operand(0).map(|v| v.get_type());
        let mut forwarded_any = false;

        for inst in &insts[i + 1..] {
            if inst.opcode() == Opcode::Load
                && !inst.is_volatile()
                && inst.operand(0) == s1_ptr
                && inst.result_type() == s1_val
            {
                inst.replace_all_uses_with(&s1.operand(0).expect("store always has a value operand"));
                forwarded.push(inst.clone());
                forwarded_any = true;
                continue;
            }

            if inst.opcode() == Opcode::Store
                && !s1.is_volatile()
                && inst.operand(1) == s1_ptr
                && inst.operand(0).map(|v| v.get_type()) == s1_val
            {
                store_eliminated.push(s1.clone());
                break;
            }

            if has_side_effects(inst) && !forwarded_any {
                break;
            }
        }
    }

    (forwarded, store_eliminated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use llvm_core::{Context, Function};

    #[test]
    fn test_store_to_load_forwarding() {
        let ctx = Context::new();
        let i32 = ctx.int32_type();
        let ptr_ty = ctx.ptr_type(i32.clone());
        let p = Value::Argument { ty: ptr_ty, index: 0, name: Some("p".into()) };
        let v = Value::Argument { ty: i32.clone(), index: 1, name: Some("v".into()) };
        let f = Function::new("f", ctx.void_type(), vec![], false);
        let block = BasicBlock::new("entry");
        let store = Instruction::new(Opcode::Store, None, vec![v.clone(), p.clone()], None);
        let load = Instruction::new(Opcode::Load, Some(i32), vec![p], Some("x".into()));
        let ret = Instruction::new(Opcode::Ret, None, vec![Value::Instruction(load.clone())], None);
        block.append(store.clone());
        block.append(load.clone());
        block.append(ret.clone());
        f.append_block(block);

        let mut stats = Stats::new();
        run(&f, &mut stats);

        assert!(store.is_parented());
        assert!(!load.is_parented());
        assert_eq!(ret.operand(0), Some(v));
        assert_eq!(stats.get(CSE_STORE2LOAD), 1);
    }

    #[test]
    fn test_dead_store_elimination() {
        let ctx = Context::new();
        let i32 = ctx.int32_type();
        let ptr_ty = ctx.ptr_type(i32.clone());
        let p = Value::Argument { ty: ptr_ty, index: 0, name: Some("p".into()) };
        let u = Value::Argument { ty: i32.clone(), index: 1, name: Some("u".into()) };
        let v = Value::Argument { ty: i32, index: 2, name: Some("v".into()) };
        let f = Function::new("f", ctx.void_type(), vec![], false);
        let block = BasicBlock::new("entry");
        let s1 = Instruction::new(Opcode::Store, None, vec![u, p.clone()], None);
        let s2 = Instruction::new(Opcode::Store, None, vec![v, p], None);
        let ret = Instruction::new(Opcode::Ret, None, vec![], None);
        block.append(s1.clone());
        block.append(s2.clone());
        block.append(ret);
        f.append_block(block);

        let mut stats = Stats::new();
        run(&f, &mut stats);

        assert!(!s1.is_parented());
        assert!(s2.is_parented());
        assert_eq!(stats.get(CSE_ST_ELIM), 1);
    }
}
