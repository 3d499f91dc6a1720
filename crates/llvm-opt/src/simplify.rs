//! Per-instruction algebraic and constant simplification
//!
//! Returns a *replacement value*, never a new instruction, mirroring the
//! contract the driver's `Simplify` pass expects: a pre-existing SSA value
//! or a constant that uses of the instruction can be redirected to.

use llvm_core::{Function, IntPredicate, Instruction, Opcode, Predicate, Value};

use crate::stats::{Stats, CSE_SIMPLIFY};

/// For each instruction in each block, ask for a simplified replacement. If
/// one is returned and differs from the instruction itself, redirect all
/// uses to it and schedule the original for erasure.
pub fn run(function: &Function, stats: &mut Stats) {
    let mut scheduled = Vec::new();
    for block in function.blocks() {
        for inst in block.instructions() {
            if let Some(replacement) = try_simplify(&inst) {
                if replacement != Value::Instruction(inst.clone()) {
                    inst.replace_all_uses_with(&replacement);
                    scheduled.push(inst);
                }
            }
        }
    }
    for inst in scheduled {
        if inst.is_parented() {
            inst.erase_from_parent();
            stats.increment(CSE_SIMPLIFY);
        }
    }
}

/// Attempt to simplify `inst` to an equivalent, cheaper value. Returns
/// `None` if no simplification applies.
pub fn try_simplify(inst: &Instruction) -> Option<Value> {
    let ops = inst.operands();
    match inst.opcode() {
        Opcode::Add => fold_identity_commutative(&ops, 0).or_else(|| fold_int_binop(inst.opcode(), &ops)),
        Opcode::Sub => {
            if ops.len() == 2 && ops[0] == ops[1] {
                Some(Value::ConstantInt { ty: inst.result_type()?, value: 0 })
            } else {
                fold_identity_right(&ops, 0).or_else(|| fold_int_binop(inst.opcode(), &ops))
            }
        }
        Opcode::Mul => {
            if let Some(v) = fold_scalar(&ops, 0) {
                return Some(v);
            }
            fold_identity_commutative(&ops, 1).or_else(|| fold_int_binop(inst.opcode(), &ops))
        }
        Opcode::And => fold_scalar(&ops, 0).or_else(|| fold_int_binop(inst.opcode(), &ops)),
        Opcode::Or => fold_identity_commutative(&ops, 0).or_else(|| fold_int_binop(inst.opcode(), &ops)),
        Opcode::Xor => {
            if ops.len() == 2 && ops[0] == ops[1] {
                Some(Value::ConstantInt { ty: inst.result_type()?, value: 0 })
            } else {
                fold_int_binop(inst.opcode(), &ops)
            }
        }
        Opcode::Shl | Opcode::LShr | Opcode::AShr => fold_identity_right(&ops, 0).or_else(|| fold_int_binop(inst.opcode(), &ops)),
        Opcode::UDiv | Opcode::SDiv | Opcode::URem | Opcode::SRem => fold_int_binop(inst.opcode(), &ops),
        Opcode::Select => fold_select(&ops),
        Opcode::ICmp => fold_reflexive_icmp(inst, &ops),
        _ => None,
    }
}

/// `x <op> identity -> x`, where the identity operand may be on either side.
/// Only valid for commutative opcodes (`add`, `or`, `mul`) -- `ops[0]` and
/// `ops[1]` are interchangeable for those, so recognizing the identity on
/// either side is still sound.
fn fold_identity_commutative(ops: &[Value], identity: i64) -> Option<Value> {
    if ops.len() != 2 {
        return None;
    }
    if ops[1].as_constant_int() == Some(identity) {
        return Some(ops[0].clone());
    }
    if ops[0].as_constant_int() == Some(identity) {
        return Some(ops[1].clone());
    }
    None
}

/// `x <op> identity -> x`, identity recognized on the right operand only.
/// Required for non-commutative opcodes (`sub`, the shifts): `0 - x` is
/// `-x`, not `x`, and `0 shl x` is `0`, not `x`, so the identity can only
/// ever be folded away when it appears as the right-hand operand.
fn fold_identity_right(ops: &[Value], identity: i64) -> Option<Value> {
    if ops.len() != 2 {
        return None;
    }
    if ops[1].as_constant_int() == Some(identity) {
        return Some(ops[0].clone());
    }
    None
}

/// `x <op> absorbing -> absorbing`, e.g. `mul x, 0 -> 0`, `and x, 0 -> 0`.
fn fold_scalar(ops: &[Value], absorbing: i64) -> Option<Value> {
    if ops.len() != 2 {
        return None;
    }
    if ops[1].as_constant_int() == Some(absorbing) {
        return Some(ops[1].clone());
    }
    if ops[0].as_constant_int() == Some(absorbing) {
        return Some(ops[0].clone());
    }
    None
}

fn fold_select(ops: &[Value]) -> Option<Value> {
    if ops.len() != 3 {
        return None;
    }
    match ops[0].as_constant_int() {
        Some(1) => Some(ops[1].clone()),
        Some(0) => Some(ops[2].clone()),
        _ => None,
    }
}

fn fold_int_binop(opcode: Opcode, ops: &[Value]) -> Option<Value> {
    if ops.len() != 2 {
        return None;
    }
    let (a, b) = (ops[0].as_constant_int()?, ops[1].as_constant_int()?);
    let ty = ops[0].get_type();
    let result = match opcode {
        Opcode::Add => a.wrapping_add(b),
        Opcode::Sub => a.wrapping_sub(b),
        Opcode::Mul => a.wrapping_mul(b),
        Opcode::UDiv if b != 0 => ((a as u64) / (b as u64)) as i64,
        Opcode::SDiv if b != 0 => a.wrapping_div(b),
        Opcode::URem if b != 0 => ((a as u64) % (b as u64)) as i64,
        Opcode::SRem if b != 0 => a.wrapping_rem(b),
        Opcode::And => a & b,
        Opcode::Or => a | b,
        Opcode::Xor => a ^ b,
        Opcode::Shl => a.wrapping_shl(b as u32),
        Opcode::LShr => ((a as u64) >> (b as u32)) as i64,
        Opcode::AShr => a.wrapping_shr(b as u32),
        _ => return None,
    };
    Some(Value::ConstantInt { ty, value: result })
}

/// `icmp pred x, x -> reflexive truth value`: `eq`/`sle`/`sge` fold to
/// true, `ne`/`slt`/`sgt` fold to false. Unsigned predicates are
/// deliberately left unfolded.
fn fold_reflexive_icmp(inst: &Instruction, ops: &[Value]) -> Option<Value> {
    if ops.len() != 2 || ops[0] != ops[1] {
        return None;
    }
    let Some(Predicate::Int(pred)) = inst.predicate() else { return None };
    let ty = inst.result_type()?;
    match pred {
        IntPredicate::EQ | IntPredicate::SLE | IntPredicate::SGE => Some(Value::ConstantInt { ty, value: 1 }),
        IntPredicate::NE | IntPredicate::SLT | IntPredicate::SGT => Some(Value::ConstantInt { ty, value: 0 }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use llvm_core::Context;

    #[test]
    fn test_add_zero_simplifies_to_operand() {
        let ctx = Context::new();
        let i32 = ctx.int32_type();
        let x = Value::Argument { ty: i32.clone(), index: 0, name: Some("x".into()) };
        let zero = Value::ConstantInt { ty: i32.clone(), value: 0 };
        let inst = Instruction::new(Opcode::Add, Some(i32), vec![x.clone(), zero], None);
        assert_eq!(try_simplify(&inst), Some(x));
    }

    #[test]
    fn test_mul_zero_simplifies_to_zero() {
        let ctx = Context::new();
        let i32 = ctx.int32_type();
        let x = Value::Argument { ty: i32.clone(), index: 0, name: Some("x".into()) };
        let zero = Value::ConstantInt { ty: i32.clone(), value: 0 };
        let inst = Instruction::new(Opcode::Mul, Some(i32), vec![x, zero.clone()], None);
        assert_eq!(try_simplify(&inst), Some(zero));
    }

    #[test]
    fn test_sub_self_simplifies_to_zero() {
        let ctx = Context::new();
        let i32 = ctx.int32_type();
        let x = Value::Argument { ty: i32.clone(), index: 0, name: Some("x".into()) };
        let inst = Instruction::new(Opcode::Sub, Some(i32.clone()), vec![x.clone(), x], None);
        assert_eq!(try_simplify(&inst), Some(Value::ConstantInt { ty: i32, value: 0 }));
    }

    #[test]
    fn test_constant_fold_add() {
        let ctx = Context::new();
        let i32 = ctx.int32_type();
        let a = Value::ConstantInt { ty: i32.clone(), value: 2 };
        let b = Value::ConstantInt { ty: i32.clone(), value: 3 };
        let inst = Instruction::new(Opcode::Add, Some(i32.clone()), vec![a, b], None);
        assert_eq!(try_simplify(&inst), Some(Value::ConstantInt { ty: i32, value: 5 }));
    }

    #[test]
    fn test_sub_zero_left_operand_does_not_simplify() {
        let ctx = Context::new();
        let i32 = ctx.int32_type();
        let x = Value::Argument { ty: i32.clone(), index: 0, name: Some("x".into()) };
        let zero = Value::ConstantInt { ty: i32.clone(), value: 0 };
        let inst = Instruction::new(Opcode::Sub, Some(i32.clone()), vec![zero, x], None);
        assert_eq!(try_simplify(&inst), None, "0 - x is -x, not x");
    }

    #[test]
    fn test_sub_zero_right_operand_simplifies_to_operand() {
        let ctx = Context::new();
        let i32 = ctx.int32_type();
        let x = Value::Argument { ty: i32.clone(), index: 0, name: Some("x".into()) };
        let zero = Value::ConstantInt { ty: i32.clone(), value: 0 };
        let inst = Instruction::new(Opcode::Sub, Some(i32), vec![x.clone(), zero], None);
        assert_eq!(try_simplify(&inst), Some(x));
    }

    #[test]
    fn test_shl_zero_left_operand_does_not_simplify() {
        let ctx = Context::new();
        let i32 = ctx.int32_type();
        let x = Value::Argument { ty: i32.clone(), index: 0, name: Some("x".into()) };
        let zero = Value::ConstantInt { ty: i32.clone(), value: 0 };
        let inst = Instruction::new(Opcode::Shl, Some(i32.clone()), vec![zero, x], None);
        assert_eq!(try_simplify(&inst), None, "0 << x is 0, not x");
    }

    #[test]
    fn test_no_simplification_for_unrelated_operands() {
        let ctx = Context::new();
        let i32 = ctx.int32_type();
        let x = Value::Argument { ty: i32.clone(), index: 0, name: Some("x".into()) };
        let y = Value::Argument { ty: i32.clone(), index: 1, name: Some("y".into()) };
        let inst = Instruction::new(Opcode::Add, Some(i32), vec![x, y], None);
        assert_eq!(try_simplify(&inst), None);
    }
}
