//! LLVM Instructions
//!
//! Instructions are the basic operations in LLVM IR: arithmetic, memory
//! access, control flow, and so on. Instructions carry the def-use edges
//! and parent-block link the optimizer pipeline needs to erase and
//! rewrite them in place.

use std::fmt;
use std::sync::{Arc, RwLock, Weak};

use crate::basic_block::BasicBlockData;
use crate::types::Type;
use crate::value::Value;

/// Instruction opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Terminator instructions
    Ret,
    Br,
    CondBr,
    Switch,
    IndirectBr,
    Invoke,
    Resume,
    Unreachable,

    // Binary operations
    Add,
    Sub,
    Mul,
    UDiv,
    SDiv,
    URem,
    SRem,

    // Bitwise operations
    Shl,
    LShr,
    AShr,
    And,
    Or,
    Xor,

    // Floating point operations
    FAdd,
    FSub,
    FMul,
    FDiv,
    FRem,

    // Memory operations
    Alloca,
    Load,
    Store,
    GetElementPtr,
    Fence,

    // Comparison operations
    ICmp,
    FCmp,

    // Conversion operations
    Trunc,
    ZExt,
    SExt,
    FPTrunc,
    FPExt,
    FPToUI,
    FPToSI,
    UIToFP,
    SIToFP,
    PtrToInt,
    IntToPtr,
    BitCast,

    // Vector operations
    ExtractElement,
    InsertElement,
    ShuffleVector,

    // Aggregate operations
    ExtractValue,
    InsertValue,

    // Other operations
    Phi,
    Call,
    Select,
}

impl Opcode {
    /// Control-transfer opcodes that end a basic block.
    pub fn is_terminator(self) -> bool {
        matches!(
            self,
            Opcode::Ret
                | Opcode::Br
                | Opcode::CondBr
                | Opcode::Switch
                | Opcode::IndirectBr
                | Opcode::Invoke
                | Opcode::Resume
                | Opcode::Unreachable
        )
    }

    /// The "pure-value" opcode set: instructions whose sole observable
    /// effect is the value they produce.
    pub fn is_pure_value(self) -> bool {
        matches!(
            self,
            Opcode::Add
                | Opcode::Sub
                | Opcode::Mul
                | Opcode::UDiv
                | Opcode::SDiv
                | Opcode::URem
                | Opcode::SRem
                | Opcode::Shl
                | Opcode::LShr
                | Opcode::AShr
                | Opcode::And
                | Opcode::Or
                | Opcode::Xor
                | Opcode::FAdd
                | Opcode::FSub
                | Opcode::FMul
                | Opcode::FDiv
                | Opcode::FRem
                | Opcode::Trunc
                | Opcode::ZExt
                | Opcode::SExt
                | Opcode::FPTrunc
                | Opcode::FPExt
                | Opcode::FPToUI
                | Opcode::FPToSI
                | Opcode::UIToFP
                | Opcode::SIToFP
                | Opcode::PtrToInt
                | Opcode::IntToPtr
                | Opcode::BitCast
                | Opcode::ICmp
                | Opcode::FCmp
                | Opcode::ExtractElement
                | Opcode::InsertElement
                | Opcode::ShuffleVector
                | Opcode::ExtractValue
                | Opcode::InsertValue
                | Opcode::GetElementPtr
                | Opcode::Phi
                | Opcode::Select
                | Opcode::Alloca
                | Opcode::Load
        )
    }
}

/// Integer comparison predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntPredicate {
    EQ,
    NE,
    UGT,
    UGE,
    ULT,
    ULE,
    SGT,
    SGE,
    SLT,
    SLE,
}

/// Floating point comparison predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatPredicate {
    OEQ,
    OGT,
    OGE,
    OLT,
    OLE,
    ONE,
    ORD,
    UNO,
    UEQ,
    UGT,
    UGE,
    ULT,
    ULE,
    UNE,
}

/// A comparison predicate, carried by `icmp`/`fcmp` instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Predicate {
    Int(IntPredicate),
    Float(FloatPredicate),
}

pub(crate) struct InstructionData {
    pub(crate) opcode: Opcode,
    pub(crate) result_type: Option<Type>,
    pub(crate) operands: Vec<Value>,
    pub(crate) name: Option<String>,
    pub(crate) predicate: Option<Predicate>,
    pub(crate) volatile: bool,
    pub(crate) parent: Option<Weak<RwLock<BasicBlockData>>>,
    /// Distinct consumer instructions currently reading this instruction's
    /// result: the def-use edge, collapsed to one entry per consumer rather
    /// than one per operand slot.
    pub(crate) uses: Vec<Weak<RwLock<InstructionData>>>,
}

/// A handle to an instruction. Cloning an `Instruction` clones the handle,
/// not the instruction; `Arc::ptr_eq` on the inner data is the "same SSA
/// value" identity test used throughout.
#[derive(Clone)]
pub struct Instruction {
    pub(crate) data: Arc<RwLock<InstructionData>>,
}

impl Instruction {
    /// Create a free-standing instruction (not yet attached to a block).
    /// Wires up def-use edges to any instruction operands immediately.
    pub fn new(opcode: Opcode, result_type: Option<Type>, operands: Vec<Value>, name: Option<String>) -> Self {
        let data = Arc::new(RwLock::new(InstructionData {
            opcode,
            result_type,
            operands: Vec::new(),
            name,
            predicate: None,
            volatile: false,
            parent: None,
            uses: Vec::new(),
        }));
        let inst = Self { data };
        inst.set_operands(operands);
        inst
    }

    pub fn with_predicate(self, predicate: Predicate) -> Self {
        self.data.write().unwrap().predicate = Some(predicate);
        self
    }

    pub fn with_volatile(self, volatile: bool) -> Self {
        self.data.write().unwrap().volatile = volatile;
        self
    }

    fn set_operands(&self, operands: Vec<Value>) {
        for op in &operands {
            if let Value::Instruction(producer) = op {
                producer.add_use(self);
            }
        }
        self.data.write().unwrap().operands = operands;
    }

    fn add_use(&self, user: &Instruction) {
        let mut data = self.data.write().unwrap();
        let already = data
            .uses
            .iter()
            .any(|weak| weak.upgrade().is_some_and(|u| Arc::ptr_eq(&u, &user.data)));
        if !already {
            data.uses.push(Arc::downgrade(&user.data));
        }
    }

    fn remove_use(&self, user: &Instruction) {
        let mut data = self.data.write().unwrap();
        data.uses.retain(|weak| match weak.upgrade() {
            Some(u) => !Arc::ptr_eq(&u, &user.data),
            None => false,
        });
    }

    pub fn opcode(&self) -> Opcode {
        self.data.read().unwrap().opcode
    }

    pub fn result_type(&self) -> Option<Type> {
        self.data.read().unwrap().result_type.clone()
    }

    pub fn operands(&self) -> Vec<Value> {
        self.data.read().unwrap().operands.clone()
    }

    pub fn operand(&self, index: usize) -> Option<Value> {
        self.data.read().unwrap().operands.get(index).cloned()
    }

    pub fn predicate(&self) -> Option<Predicate> {
        self.data.read().unwrap().predicate
    }

    pub fn is_volatile(&self) -> bool {
        self.data.read().unwrap().volatile
    }

    pub fn name(&self) -> Option<String> {
        self.data.read().unwrap().name.clone()
    }

    pub fn set_name(&self, name: Option<String>) {
        self.data.write().unwrap().name = name;
    }

    /// Produces an SSA value (as opposed to `store`, `br`, `ret`, etc.).
    pub fn has_result(&self) -> bool {
        self.data.read().unwrap().result_type.is_some()
    }

    pub fn is_terminator(&self) -> bool {
        self.opcode().is_terminator()
    }

    pub fn parent(&self) -> Option<crate::basic_block::BasicBlock> {
        self.data.read().unwrap().parent.as_ref().and_then(|w| w.upgrade()).map(crate::basic_block::BasicBlock::from_arc)
    }

    pub(crate) fn set_parent(&self, parent: Option<Weak<RwLock<BasicBlockData>>>) {
        self.data.write().unwrap().parent = parent;
    }

    /// Whether this instruction is still attached to a block. Erase calls
    /// must check this: an instruction scheduled for deferred erasure may
    /// already have been erased transitively.
    pub fn is_parented(&self) -> bool {
        self.data.read().unwrap().parent.is_some()
    }

    /// Number of distinct instructions currently consuming this value.
    pub fn use_count(&self) -> usize {
        self.data.read().unwrap().uses.iter().filter(|w| w.upgrade().is_some()).count()
    }

    pub fn has_uses(&self) -> bool {
        self.use_count() > 0
    }

    /// The distinct instructions currently consuming this value.
    pub fn uses(&self) -> Vec<Instruction> {
        self.data.read().unwrap().uses.iter().filter_map(|w| w.upgrade()).map(|d| Instruction { data: d }).collect()
    }

    /// Replace every use of this instruction's result with `value`,
    /// rewriting every consumer's matching operand slots in place.
    pub fn replace_all_uses_with(&self, value: &Value) {
        let consumers: Vec<Instruction> = {
            let data = self.data.read().unwrap();
            data.uses.iter().filter_map(|w| w.upgrade()).map(|d| Instruction { data: d }).collect()
        };
        let self_value = Value::Instruction(self.clone());
        for consumer in &consumers {
            let mut operands = consumer.operands();
            let mut touched = false;
            for slot in operands.iter_mut() {
                if *slot == self_value {
                    *slot = value.clone();
                    touched = true;
                }
            }
            if touched {
                if let Value::Instruction(producer) = value {
                    producer.add_use(consumer);
                }
                consumer.data.write().unwrap().operands = operands;
            }
        }
        self.data.write().unwrap().uses.clear();
    }

    /// Erase this instruction from its parent block. Panics (a core-invariant
    /// violation, not a recoverable error) if it still has uses.
    pub fn erase_from_parent(&self) {
        assert!(!self.has_uses(), "erasing an instruction that still has uses");
        let parent = self.parent();
        for operand in self.operands() {
            if let Value::Instruction(producer) = operand {
                producer.remove_use(self);
            }
        }
        if let Some(block) = parent {
            block.remove_instruction(self);
        }
        self.set_parent(None);
    }
}

impl PartialEq for Instruction {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}
impl Eq for Instruction {}

impl fmt::Debug for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.data.read().unwrap();
        write!(f, "Instruction({:?}, {} operands)", data.opcode, data.operands.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Context;

    #[test]
    fn test_instruction_is_terminator() {
        let ret_inst = Instruction::new(Opcode::Ret, None, vec![], None);
        assert!(ret_inst.is_terminator());

        let add_inst = Instruction::new(Opcode::Add, None, vec![], None);
        assert!(!add_inst.is_terminator());
    }

    #[test]
    fn test_replace_all_uses_with_rewrites_consumers() {
        let ctx = Context::new();
        let i32 = ctx.int32_type();
        let x = Value::Argument { ty: i32.clone(), index: 0, name: Some("x".into()) };
        let a = Instruction::new(Opcode::Add, Some(i32.clone()), vec![x.clone(), x.clone()], Some("a".into()));
        let b = Instruction::new(Opcode::Mul, Some(i32.clone()), vec![Value::Instruction(a.clone()), x.clone()], Some("b".into()));
        assert_eq!(a.use_count(), 1);

        a.replace_all_uses_with(&x);
        assert_eq!(a.use_count(), 0);
        assert_eq!(b.operand(0), Some(x.clone()));
    }

    #[test]
    fn test_erase_requires_no_uses() {
        let ctx = Context::new();
        let i32 = ctx.int32_type();
        let a = Instruction::new(Opcode::Add, Some(i32.clone()), vec![], Some("a".into()));
        let _b = Instruction::new(Opcode::Mul, Some(i32), vec![Value::Instruction(a.clone())], Some("b".into()));
        assert!(a.has_uses());
    }
}
