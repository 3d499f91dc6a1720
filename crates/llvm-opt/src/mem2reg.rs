//! Memory-to-register promotion (single-block case)
//!
//! Treated elsewhere as an opaque external prelude invoked once before
//! the pipeline when requested; this crate supplies a real, if
//! intentionally modest, implementation: an `alloca` all of whose uses are
//! non-volatile loads and stores within a single basic block is promoted
//! to a plain SSA value, forwarding each load to the most recent preceding
//! store (or `undef`, for a read with no prior store in the block).
//!
//! Cross-block promotion -- inserting phi nodes at dominance frontiers --
//! is not implemented; a multi-block alloca is left untouched, which is
//! always semantics-preserving.

use llvm_core::{BasicBlock, Function, Instruction, Opcode, Value};

/// Run the promotion pass over every function in isolation; returns the
/// number of allocas promoted (informational only, not one of the named
/// statistics counters).
pub fn run(function: &Function) -> usize {
    let mut promoted = 0;
    for block in function.blocks() {
        let allocas: Vec<Instruction> = block.instructions().into_iter().filter(|i| i.opcode() == Opcode::Alloca).collect();
        for alloca in allocas {
            if let Some(owner) = promotable_block(&alloca) {
                promote_in_block(&alloca, &owner);
                promoted += 1;
            }
        }
    }
    promoted
}

/// Returns the single block the alloca may be promoted within, or `None`
/// if any use is volatile, not a direct load/store of the pointer, or
/// spans more than one block.
fn promotable_block(alloca: &Instruction) -> Option<BasicBlock> {
    let mut owner: Option<BasicBlock> = None;
    for user in alloca.uses() {
        let is_direct_memory_use = match user.opcode() {
            Opcode::Load => user.operand(0).as_ref() == Some(&Value::Instruction(alloca.clone())),
            Opcode::Store => user.operand(1).as_ref() == Some(&Value::Instruction(alloca.clone())),
            _ => false,
        };
        if !is_direct_memory_use || user.is_volatile() {
            return None;
        }
        let block = user.parent()?;
        match &owner {
            Some(existing) if *existing != block => return None,
            _ => owner = Some(block),
        }
    }
    owner.or_else(|| alloca.parent())
}

fn promote_in_block(alloca: &Instruction, block: &BasicBlock) {
    let mut current: Option<Value> = None;
    let mut scheduled = Vec::new();

    for inst in block.instructions() {
        if inst == *alloca {
            continue;
        }
        match inst.opcode() {
            Opcode::Load if inst.operand(0).as_ref() == Some(&Value::Instruction(alloca.clone())) => {
                let ty = inst.result_type().expect("load always has a result type");
                let value = current.clone().unwrap_or(Value::Undef(ty));
                inst.replace_all_uses_with(&value);
                scheduled.push(inst);
            }
            Opcode::Store if inst.operand(1).as_ref() == Some(&Value::Instruction(alloca.clone())) => {
                current = inst.operand(0);
                scheduled.push(inst);
            }
            _ => {}
        }
    }

    for inst in scheduled {
        if inst.is_parented() {
            inst.erase_from_parent();
        }
    }
    if alloca.is_parented() {
        alloca.erase_from_parent();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use llvm_core::{Context, Opcode};

    #[test]
    fn test_promotes_single_block_scalar() {
        let ctx = Context::new();
        let i32 = ctx.int32_type();
        let f = Function::new("f", i32.clone(), vec![], false);
        let block = BasicBlock::new("entry");
        let alloca = Instruction::new(Opcode::Alloca, Some(ctx.ptr_type(i32.clone())), vec![], Some("slot".into()));
        let v = Value::Argument { ty: i32.clone(), index: 0, name: Some("v".into()) };
        let store = Instruction::new(Opcode::Store, None, vec![v.clone(), Value::Instruction(alloca.clone())], None);
        let load = Instruction::new(Opcode::Load, Some(i32), vec![Value::Instruction(alloca.clone())], Some("x".into()));
        let ret = Instruction::new(Opcode::Ret, None, vec![Value::Instruction(load.clone())], None);
        block.append(alloca.clone());
        block.append(store.clone());
        block.append(load.clone());
        block.append(ret.clone());
        f.append_block(block);

        let promoted = run(&f);

        assert_eq!(promoted, 1);
        assert!(!alloca.is_parented());
        assert!(!store.is_parented());
        assert!(!load.is_parented());
        assert_eq!(ret.operand(0), Some(v));
    }

    #[test]
    fn test_uninitialized_read_becomes_undef() {
        let ctx = Context::new();
        let i32 = ctx.int32_type();
        let f = Function::new("f", i32.clone(), vec![], false);
        let block = BasicBlock::new("entry");
        let alloca = Instruction::new(Opcode::Alloca, Some(ctx.ptr_type(i32.clone())), vec![], Some("slot".into()));
        let load = Instruction::new(Opcode::Load, Some(i32), vec![Value::Instruction(alloca.clone())], Some("x".into()));
        let ret = Instruction::new(Opcode::Ret, None, vec![Value::Instruction(load.clone())], None);
        block.append(alloca.clone());
        block.append(load.clone());
        block.append(ret.clone());
        f.append_block(block);

        run(&f);

        assert!(matches!(ret.operand(0), Some(Value::Undef(_))));
    }

    #[test]
    fn test_multi_block_alloca_is_not_promoted() {
        let ctx = Context::new();
        let i32 = ctx.int32_type();
        let f = Function::new("f", i32.clone(), vec![], false);
        let entry = BasicBlock::new("entry");
        let next = BasicBlock::new("next");
        let alloca = Instruction::new(Opcode::Alloca, Some(ctx.ptr_type(i32.clone())), vec![], Some("slot".into()));
        let v = Value::Argument { ty: i32.clone(), index: 0, name: Some("v".into()) };
        let store = Instruction::new(Opcode::Store, None, vec![v, Value::Instruction(alloca.clone())], None);
        entry.append(alloca.clone());
        entry.append(store);
        entry.append(Instruction::new(Opcode::Br, None, vec![Value::BasicBlock(next.clone())], None));
        let load = Instruction::new(Opcode::Load, Some(i32), vec![Value::Instruction(alloca.clone())], Some("x".into()));
        next.append(load.clone());
        next.append(Instruction::new(Opcode::Ret, None, vec![Value::Instruction(load)], None));
        f.append_block(entry);
        f.append_block(next);

        let promoted = run(&f);
        assert_eq!(promoted, 0);
        assert!(alloca.is_parented());
    }
}
