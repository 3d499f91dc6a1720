//! The Context is the top-level container for all LLVM entities.
//! It owns and manages all types, ensuring type uniqueness via interning.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::types::{Type, TypeData};

/// A context is a container for all LLVM IR entities.
/// In LLVM, a context owns all types, ensuring type uniqueness.
#[derive(Default, Clone)]
pub struct Context {
    type_cache: Arc<Mutex<HashMap<String, Arc<TypeData>>>>,
}

impl Context {
    /// Create a new LLVM context
    pub fn new() -> Self {
        Self { type_cache: Arc::new(Mutex::new(HashMap::new())) }
    }

    /// Get or create a type in this context, keyed by its textual spelling.
    pub(crate) fn intern_type(&self, key: String, type_data: TypeData) -> Type {
        let mut cache = self.type_cache.lock().unwrap();
        let data = cache.entry(key).or_insert_with(|| Arc::new(type_data)).clone();
        Type::new(data)
    }

    // Type construction helpers

    pub fn void_type(&self) -> Type {
        Type::void(self)
    }

    pub fn int_type(&self, bits: u32) -> Type {
        Type::int(self, bits)
    }

    pub fn bool_type(&self) -> Type {
        self.int_type(1)
    }

    pub fn int8_type(&self) -> Type {
        self.int_type(8)
    }

    pub fn int16_type(&self) -> Type {
        self.int_type(16)
    }

    pub fn int32_type(&self) -> Type {
        self.int_type(32)
    }

    pub fn int64_type(&self) -> Type {
        self.int_type(64)
    }

    pub fn half_type(&self) -> Type {
        Type::half(self)
    }

    pub fn float_type(&self) -> Type {
        Type::float(self)
    }

    pub fn double_type(&self) -> Type {
        Type::double(self)
    }

    pub fn ptr_type(&self, pointee: Type) -> Type {
        Type::ptr(self, pointee)
    }

    pub fn array_type(&self, element: Type, size: usize) -> Type {
        Type::array(self, element, size)
    }

    pub fn function_type(&self, return_type: Type, param_types: Vec<Type>, is_var_arg: bool) -> Type {
        Type::function(self, return_type, param_types, is_var_arg)
    }

    pub fn struct_type(&self, fields: Vec<Type>, name: Option<String>) -> Type {
        Type::struct_type(self, fields, name)
    }
}
