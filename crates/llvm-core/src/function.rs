//! Functions
//!
//! A function owns an ordered list of basic blocks. The first block is the
//! entry block; control never falls through to it from elsewhere.

use std::fmt;
use std::sync::{Arc, RwLock, Weak};

use crate::basic_block::BasicBlock;
use crate::module::ModuleData;
use crate::types::Type;

pub(crate) struct FunctionData {
    pub(crate) name: String,
    pub(crate) return_type: Type,
    pub(crate) param_types: Vec<Type>,
    pub(crate) is_var_arg: bool,
    pub(crate) blocks: Vec<BasicBlock>,
    pub(crate) parent: Option<Weak<RwLock<ModuleData>>>,
}

/// A handle to a function.
#[derive(Clone)]
pub struct Function {
    pub(crate) data: Arc<RwLock<FunctionData>>,
}

impl Function {
    pub fn new(name: impl Into<String>, return_type: Type, param_types: Vec<Type>, is_var_arg: bool) -> Self {
        Self {
            data: Arc::new(RwLock::new(FunctionData {
                name: name.into(),
                return_type,
                param_types,
                is_var_arg,
                blocks: Vec::new(),
                parent: None,
            })),
        }
    }

    pub(crate) fn from_arc(data: Arc<RwLock<FunctionData>>) -> Self {
        Self { data }
    }

    pub fn name(&self) -> String {
        self.data.read().unwrap().name.clone()
    }

    pub fn return_type(&self) -> Type {
        self.data.read().unwrap().return_type.clone()
    }

    pub fn param_types(&self) -> Vec<Type> {
        self.data.read().unwrap().param_types.clone()
    }

    pub fn is_var_arg(&self) -> bool {
        self.data.read().unwrap().is_var_arg
    }

    pub fn is_declaration(&self) -> bool {
        self.data.read().unwrap().blocks.is_empty()
    }

    pub fn blocks(&self) -> Vec<BasicBlock> {
        self.data.read().unwrap().blocks.clone()
    }

    pub fn entry_block(&self) -> Option<BasicBlock> {
        self.data.read().unwrap().blocks.first().cloned()
    }

    pub fn append_block(&self, block: BasicBlock) {
        block.set_parent(Some(Arc::downgrade(&self.data)));
        self.data.write().unwrap().blocks.push(block);
    }

    /// All instructions across all blocks, in block order then in-block
    /// order -- the iteration order the optimizer driver uses per pass.
    pub fn instructions(&self) -> Vec<crate::instruction::Instruction> {
        self.blocks().iter().flat_map(|b| b.instructions()).collect()
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}
impl Eq for Function {}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function({})", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Context;

    #[test]
    fn test_append_block() {
        let ctx = Context::new();
        let f = Function::new("main", ctx.int32_type(), vec![], false);
        let bb = BasicBlock::new("entry");
        f.append_block(bb.clone());
        assert_eq!(f.entry_block(), Some(bb));
        assert!(!f.is_declaration());
    }

    #[test]
    fn test_declaration_has_no_blocks() {
        let ctx = Context::new();
        let f = Function::new("puts", ctx.int32_type(), vec![ctx.ptr_type(ctx.int8_type())], false);
        assert!(f.is_declaration());
    }
}
