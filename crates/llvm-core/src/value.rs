//! LLVM Values
//!
//! A `Value` is anything that can appear as an instruction operand: a
//! constant, a function argument, a reference to another instruction's
//! result, or a reference to a block/function/global.

use std::fmt;

use crate::basic_block::BasicBlock;
use crate::instruction::Instruction;
use crate::types::Type;

/// An SSA value.
///
/// Two `Value::Instruction`s are equal iff they name the same producing
/// instruction (identity, not structural equality of the instruction's
/// operands) -- see `is_literal_match` in `llvm-opt` for structural
/// comparison of two different instructions.
#[derive(Clone)]
pub enum Value {
    /// The result of another instruction in the same function.
    Instruction(Instruction),
    /// A function argument.
    Argument { ty: Type, index: usize, name: Option<String> },
    ConstantInt { ty: Type, value: i64 },
    ConstantFloat { ty: Type, value: f64 },
    ConstantNull(Type),
    Undef(Type),
    Poison(Type),
    /// A reference to a basic block (branch target / blockaddress).
    BasicBlock(BasicBlock),
    /// A reference to a named function (callee).
    Function { name: String, ty: Type },
    /// A reference to a named global variable.
    GlobalVariable { name: String, ty: Type },
}

impl Value {
    pub fn get_type(&self) -> Type {
        match self {
            Value::Instruction(inst) => inst.result_type().expect("instruction value must have a result type"),
            Value::Argument { ty, .. } => ty.clone(),
            Value::ConstantInt { ty, .. } => ty.clone(),
            Value::ConstantFloat { ty, .. } => ty.clone(),
            Value::ConstantNull(ty) => ty.clone(),
            Value::Undef(ty) => ty.clone(),
            Value::Poison(ty) => ty.clone(),
            Value::BasicBlock(_) => panic!("basic block values have no type"),
            Value::Function { ty, .. } => ty.clone(),
            Value::GlobalVariable { ty, .. } => ty.clone(),
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(
            self,
            Value::ConstantInt { .. } | Value::ConstantFloat { .. } | Value::ConstantNull(_) | Value::Undef(_) | Value::Poison(_)
        )
    }

    pub fn as_constant_int(&self) -> Option<i64> {
        match self {
            Value::ConstantInt { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn as_instruction(&self) -> Option<&Instruction> {
        match self {
            Value::Instruction(inst) => Some(inst),
            _ => None,
        }
    }
}

/// Structural equality over operand slots: two instruction-values are equal
/// iff they name the same producing instruction; constants compare by
/// value; everything else compares by name/index. This is the notion of
/// "same SSA value" used to wire up operands, not the `is_literal_match`
/// predicate (which additionally compares producing opcodes).
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Instruction(a), Value::Instruction(b)) => a == b,
            (Value::Argument { index: i1, .. }, Value::Argument { index: i2, .. }) => i1 == i2,
            (Value::ConstantInt { ty: t1, value: v1 }, Value::ConstantInt { ty: t2, value: v2 }) => t1 == t2 && v1 == v2,
            (Value::ConstantFloat { ty: t1, value: v1 }, Value::ConstantFloat { ty: t2, value: v2 }) => {
                t1 == t2 && v1.to_bits() == v2.to_bits()
            }
            (Value::ConstantNull(t1), Value::ConstantNull(t2)) => t1 == t2,
            (Value::Undef(t1), Value::Undef(t2)) => t1 == t2,
            (Value::Poison(t1), Value::Poison(t2)) => t1 == t2,
            (Value::BasicBlock(a), Value::BasicBlock(b)) => a == b,
            (Value::Function { name: n1, .. }, Value::Function { name: n2, .. }) => n1 == n2,
            (Value::GlobalVariable { name: n1, .. }, Value::GlobalVariable { name: n2, .. }) => n1 == n2,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Instruction(inst) => write!(f, "{:?}", inst),
            Value::Argument { index, name, .. } => write!(f, "%arg{}({:?})", index, name),
            Value::ConstantInt { value, .. } => write!(f, "{}", value),
            Value::ConstantFloat { value, .. } => write!(f, "{}", value),
            Value::ConstantNull(_) => write!(f, "null"),
            Value::Undef(_) => write!(f, "undef"),
            Value::Poison(_) => write!(f, "poison"),
            Value::BasicBlock(bb) => write!(f, "%{}", bb.name()),
            Value::Function { name, .. } => write!(f, "@{}", name),
            Value::GlobalVariable { name, .. } => write!(f, "@{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Context;

    #[test]
    fn test_constant_equality() {
        let ctx = Context::new();
        let i32 = ctx.int32_type();
        let a = Value::ConstantInt { ty: i32.clone(), value: 1 };
        let b = Value::ConstantInt { ty: i32.clone(), value: 1 };
        let c = Value::ConstantInt { ty: i32, value: 2 };
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
