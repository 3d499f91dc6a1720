//! Basic Blocks
//!
//! A basic block is a straight-line sequence of instructions ending in
//! exactly one terminator. Blocks are owned by a `Function` and hold their
//! instructions in program order.

use std::fmt;
use std::sync::{Arc, RwLock, Weak};

use crate::function::FunctionData;
use crate::instruction::Instruction;

pub(crate) struct BasicBlockData {
    pub(crate) name: String,
    pub(crate) instructions: Vec<Instruction>,
    pub(crate) parent: Option<Weak<RwLock<FunctionData>>>,
}

/// A handle to a basic block.
#[derive(Clone)]
pub struct BasicBlock {
    pub(crate) data: Arc<RwLock<BasicBlockData>>,
}

impl BasicBlock {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            data: Arc::new(RwLock::new(BasicBlockData { name: name.into(), instructions: Vec::new(), parent: None })),
        }
    }

    pub(crate) fn from_arc(data: Arc<RwLock<BasicBlockData>>) -> Self {
        Self { data }
    }

    pub fn name(&self) -> String {
        self.data.read().unwrap().name.clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.data.write().unwrap().name = name.into();
    }

    pub fn instructions(&self) -> Vec<Instruction> {
        self.data.read().unwrap().instructions.clone()
    }

    pub fn len(&self) -> usize {
        self.data.read().unwrap().instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().unwrap().instructions.is_empty()
    }

    pub fn terminator(&self) -> Option<Instruction> {
        self.data.read().unwrap().instructions.last().cloned().filter(|i| i.is_terminator())
    }

    /// Append an instruction to the end of the block, wiring up its parent
    /// link. Does not validate terminator placement; callers build blocks
    /// with the terminator appended last.
    pub fn append(&self, inst: Instruction) {
        inst.set_parent(Some(Arc::downgrade(&self.data)));
        self.data.write().unwrap().instructions.push(inst);
    }

    /// Insert `inst` immediately before `before` in this block.
    pub fn insert_before(&self, before: &Instruction, inst: Instruction) {
        let mut data = self.data.write().unwrap();
        let pos = data.instructions.iter().position(|i| i == before).expect("`before` is not in this block");
        inst.set_parent(Some(Arc::downgrade(&self.data)));
        data.instructions.insert(pos, inst);
    }

    /// Remove `inst` from this block's instruction list. Does not check
    /// use-emptiness; callers (`Instruction::erase_from_parent`) already did.
    pub(crate) fn remove_instruction(&self, inst: &Instruction) {
        self.data.write().unwrap().instructions.retain(|i| i != inst);
    }

    pub fn parent(&self) -> Option<crate::function::Function> {
        self.data.read().unwrap().parent.as_ref().and_then(|w| w.upgrade()).map(crate::function::Function::from_arc)
    }

    pub(crate) fn set_parent(&self, parent: Option<Weak<RwLock<FunctionData>>>) {
        self.data.write().unwrap().parent = parent;
    }
}

impl PartialEq for BasicBlock {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}
impl Eq for BasicBlock {}

impl std::hash::Hash for BasicBlock {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.data).hash(state)
    }
}

impl fmt::Debug for BasicBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BasicBlock({})", self.name())
    }
}
