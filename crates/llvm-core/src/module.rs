//! Modules
//!
//! A module is the top-level container for functions and global variables,
//! scoped to a single `Context`.

use std::fmt;
use std::sync::{Arc, RwLock};

use crate::context::Context;
use crate::function::Function;
use crate::types::Type;

pub(crate) struct ModuleData {
    pub(crate) name: String,
    pub(crate) functions: Vec<Function>,
    pub(crate) globals: Vec<GlobalVariable>,
}

#[derive(Clone, Debug)]
pub struct GlobalVariable {
    pub name: String,
    pub ty: Type,
    pub is_constant: bool,
}

/// A handle to a module.
#[derive(Clone)]
pub struct Module {
    pub(crate) data: Arc<RwLock<ModuleData>>,
    context: Context,
}

impl Module {
    pub fn new(name: impl Into<String>, context: Context) -> Self {
        Self {
            data: Arc::new(RwLock::new(ModuleData { name: name.into(), functions: Vec::new(), globals: Vec::new() })),
            context,
        }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn name(&self) -> String {
        self.data.read().unwrap().name.clone()
    }

    pub fn functions(&self) -> Vec<Function> {
        self.data.read().unwrap().functions.clone()
    }

    pub fn get_function(&self, name: &str) -> Option<Function> {
        self.data.read().unwrap().functions.iter().find(|f| f.name() == name).cloned()
    }

    pub fn add_function(&self, function: Function) {
        self.data.write().unwrap().functions.push(function);
    }

    pub fn globals(&self) -> Vec<GlobalVariable> {
        self.data.read().unwrap().globals.clone()
    }

    pub fn add_global(&self, global: GlobalVariable) {
        self.data.write().unwrap().globals.push(global);
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Module({})", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::Function;

    #[test]
    fn test_add_function() {
        let ctx = Context::new();
        let module = Module::new("test", ctx.clone());
        let f = Function::new("main", ctx.int32_type(), vec![], false);
        module.add_function(f.clone());
        assert_eq!(module.get_function("main"), Some(f));
        assert!(module.get_function("missing").is_none());
    }
}
