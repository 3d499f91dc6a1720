//! Safety predicates
//!
//! Pure functions over a single instruction or a pair of instructions.
//! Every pass in this crate is built out of these four: whether removing,
//! merging or reordering a given instruction would be observable.

use llvm_core::{Instruction, Opcode, Value};

/// True iff `inst` produces an SSA value, has a "pure-value" opcode, and has
/// no remaining uses. Alloca counts as dead-when-unused: any reachable use
/// of its address would itself be a use edge.
pub fn is_dead(inst: &Instruction) -> bool {
    inst.has_result() && is_pure_value_opcode(inst) && !inst.has_uses()
}

fn is_pure_value_opcode(inst: &Instruction) -> bool {
    match inst.opcode() {
        Opcode::Load => !inst.is_volatile(),
        op => op.is_pure_value(),
    }
}

/// True for instructions whose effect extends beyond the value they
/// produce: `call`, `store`, `alloca`, `load`, `fence`, and every
/// terminator (`br`/`condbr`/`switch`/`indirectbr`/`invoke`/`resume`/
/// `unreachable`/`ret`). Rejects CSE candidates; loads are excluded here
/// because redundant-load-elimination handles them under stricter
/// conditions than plain structural matching.
pub fn has_side_effects(inst: &Instruction) -> bool {
    inst.is_terminator()
        || matches!(inst.opcode(), Opcode::Call | Opcode::Store | Opcode::Alloca | Opcode::Load | Opcode::Fence)
}

/// True iff neither instruction has side effects and they are structurally
/// identical: same opcode, result type, operand count, operands in the same
/// position (by SSA identity), and matching comparison predicate if any.
/// Commutativity is never exploited: `add x, y` does not match `add y, x`.
pub fn is_literal_match(i: &Instruction, j: &Instruction) -> bool {
    if has_side_effects(i) || has_side_effects(j) {
        return false;
    }
    if i.opcode() != j.opcode() || i.result_type() != j.result_type() || i.predicate() != j.predicate() {
        return false;
    }
    let (i_ops, j_ops) = (i.operands(), j.operands());
    if i_ops.len() != j_ops.len() {
        return false;
    }
    i_ops.iter().zip(j_ops.iter()).all(|(a, b)| values_match(a, b))
}

fn values_match(a: &Value, b: &Value) -> bool {
    a == b
}

/// Precondition: `l1` precedes `l2` in the same basic block. True iff no
/// `store` or `call` appears strictly between them. `fence`, `invoke` and
/// `resume` are *not* treated as barriers here: this is the literal opcode
/// list, not a hardened version of it.
pub fn no_intervening_store_or_call(block: &llvm_core::BasicBlock, l1: &Instruction, l2: &Instruction) -> bool {
    let insts = block.instructions();
    let Some(start) = insts.iter().position(|i| i == l1) else { return false };
    let Some(end) = insts.iter().position(|i| i == l2) else { return false };
    if start >= end {
        return false;
    }
    insts[start + 1..end].iter().all(|i| !matches!(i.opcode(), Opcode::Store | Opcode::Call))
}

#[cfg(test)]
mod tests {
    use super::*;
    use llvm_core::{BasicBlock, Context};

    #[test]
    fn test_is_dead_requires_no_uses() {
        let ctx = Context::new();
        let i32 = ctx.int32_type();
        let a = Instruction::new(Opcode::Add, Some(i32.clone()), vec![], Some("a".into()));
        assert!(is_dead(&a));
        let _b = Instruction::new(Opcode::Mul, Some(i32), vec![Value::Instruction(a.clone())], Some("b".into()));
        assert!(!is_dead(&a));
    }

    #[test]
    fn test_store_is_never_dead() {
        let store = Instruction::new(Opcode::Store, None, vec![], None);
        assert!(!is_dead(&store));
    }

    #[test]
    fn test_has_side_effects() {
        assert!(has_side_effects(&Instruction::new(Opcode::Call, None, vec![], None)));
        assert!(has_side_effects(&Instruction::new(Opcode::Br, None, vec![], None)));
        assert!(!has_side_effects(&Instruction::new(Opcode::Add, None, vec![], None)));
    }

    #[test]
    fn test_literal_match_rejects_commuted_operands() {
        let ctx = Context::new();
        let i32 = ctx.int32_type();
        let x = Value::Argument { ty: i32.clone(), index: 0, name: Some("x".into()) };
        let y = Value::Argument { ty: i32.clone(), index: 1, name: Some("y".into()) };
        let a = Instruction::new(Opcode::Add, Some(i32.clone()), vec![x.clone(), y.clone()], None);
        let b = Instruction::new(Opcode::Add, Some(i32), vec![y, x], None);
        assert!(!is_literal_match(&a, &b));
    }

    #[test]
    fn test_literal_match_identical_instructions() {
        let ctx = Context::new();
        let i32 = ctx.int32_type();
        let x = Value::Argument { ty: i32.clone(), index: 0, name: Some("x".into()) };
        let a = Instruction::new(Opcode::Add, Some(i32.clone()), vec![x.clone(), x.clone()], None);
        let b = Instruction::new(Opcode::Add, Some(i32), vec![x.clone(), x], None);
        assert!(is_literal_match(&a, &b));
    }

    #[test]
    fn test_no_intervening_store_or_call() {
        let ctx = Context::new();
        let i32 = ctx.int32_type();
        let ptr_ty = ctx.ptr_type(i32.clone());
        let p = Value::Argument { ty: ptr_ty, index: 0, name: Some("p".into()) };
        let block = BasicBlock::new("entry");
        let l1 = Instruction::new(Opcode::Load, Some(i32.clone()), vec![p.clone()], Some("a".into()));
        let mid = Instruction::new(Opcode::Add, Some(i32.clone()), vec![], Some("mid".into()));
        let l2 = Instruction::new(Opcode::Load, Some(i32), vec![p], Some("b".into()));
        block.append(l1.clone());
        block.append(mid);
        block.append(l2.clone());
        assert!(no_intervening_store_or_call(&block, &l1, &l2));
    }

    #[test]
    fn test_intervening_call_blocks() {
        let ctx = Context::new();
        let i32 = ctx.int32_type();
        let ptr_ty = ctx.ptr_type(i32.clone());
        let p = Value::Argument { ty: ptr_ty, index: 0, name: Some("p".into()) };
        let block = BasicBlock::new("entry");
        let l1 = Instruction::new(Opcode::Load, Some(i32.clone()), vec![p.clone()], Some("a".into()));
        let call = Instruction::new(Opcode::Call, None, vec![], None);
        let l2 = Instruction::new(Opcode::Load, Some(i32), vec![p], Some("b".into()));
        block.append(l1.clone());
        block.append(call);
        block.append(l2.clone());
        assert!(!no_intervening_store_or_call(&block, &l1, &l2));
    }
}
