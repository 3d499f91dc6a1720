//! LLVM Type System
//!
//! This module implements LLVM's type system, including:
//! - Void type
//! - Integer types (i1, i8, i16, i32, i64, etc.)
//! - Floating point types (half, float, double)
//! - Pointer types
//! - Array types
//! - Struct types
//! - Function types

use std::fmt;
use std::sync::Arc;

/// Represents an LLVM type.
///
/// Types are interned by `Context`, so two `Type`s describe the same type
/// iff their underlying `Arc` points at the same allocation.
#[derive(Clone)]
pub struct Type {
    data: Arc<TypeData>,
}

/// Internal representation of type data
pub(crate) enum TypeData {
    Void,
    Integer { bits: u32 },
    Float { kind: FloatKind },
    Pointer { pointee: Type },
    Array { element: Type, size: usize },
    Struct { fields: Vec<Type>, name: Option<String> },
    Function { return_type: Type, param_types: Vec<Type>, is_var_arg: bool },
}

/// Floating point type kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatKind {
    Half,   // 16-bit
    Float,  // 32-bit
    Double, // 64-bit
}

impl Type {
    pub(crate) fn new(data: Arc<TypeData>) -> Self {
        Self { data }
    }

    // Type constructors

    pub fn void(ctx: &crate::Context) -> Self {
        ctx.intern_type("void".to_string(), TypeData::Void)
    }

    pub fn int(ctx: &crate::Context, bits: u32) -> Self {
        ctx.intern_type(format!("i{}", bits), TypeData::Integer { bits })
    }

    pub fn half(ctx: &crate::Context) -> Self {
        ctx.intern_type("half".to_string(), TypeData::Float { kind: FloatKind::Half })
    }

    pub fn float(ctx: &crate::Context) -> Self {
        ctx.intern_type("float".to_string(), TypeData::Float { kind: FloatKind::Float })
    }

    pub fn double(ctx: &crate::Context) -> Self {
        ctx.intern_type("double".to_string(), TypeData::Float { kind: FloatKind::Double })
    }

    pub fn ptr(ctx: &crate::Context, pointee: Type) -> Self {
        let key = format!("ptr<{}>", pointee);
        ctx.intern_type(key, TypeData::Pointer { pointee })
    }

    pub fn array(ctx: &crate::Context, element: Type, size: usize) -> Self {
        let key = format!("[{} x {}]", size, element);
        ctx.intern_type(key, TypeData::Array { element, size })
    }

    pub fn function(ctx: &crate::Context, return_type: Type, param_types: Vec<Type>, is_var_arg: bool) -> Self {
        let params_str = param_types.iter().map(|t| format!("{}", t)).collect::<Vec<_>>().join(", ");
        let vararg_str = if is_var_arg { ", ..." } else { "" };
        let key = format!("fn({}{}) -> {}", params_str, vararg_str, return_type);
        ctx.intern_type(key, TypeData::Function { return_type, param_types, is_var_arg })
    }

    pub fn struct_type(ctx: &crate::Context, fields: Vec<Type>, name: Option<String>) -> Self {
        let fields_str = fields.iter().map(|t| format!("{}", t)).collect::<Vec<_>>().join(", ");
        let key = match &name {
            Some(n) => format!("struct {} {{ {} }}", n, fields_str),
            None => format!("{{ {} }}", fields_str),
        };
        ctx.intern_type(key, TypeData::Struct { fields, name })
    }

    // Type queries

    pub fn is_void(&self) -> bool {
        matches!(&*self.data, TypeData::Void)
    }

    pub fn is_integer(&self) -> bool {
        matches!(&*self.data, TypeData::Integer { .. })
    }

    pub fn is_float(&self) -> bool {
        matches!(&*self.data, TypeData::Float { .. })
    }

    pub fn is_pointer(&self) -> bool {
        matches!(&*self.data, TypeData::Pointer { .. })
    }

    pub fn is_array(&self) -> bool {
        matches!(&*self.data, TypeData::Array { .. })
    }

    pub fn is_struct(&self) -> bool {
        matches!(&*self.data, TypeData::Struct { .. })
    }

    pub fn is_function(&self) -> bool {
        matches!(&*self.data, TypeData::Function { .. })
    }

    /// Get the bit width of an integer type
    pub fn int_width(&self) -> Option<u32> {
        match &*self.data {
            TypeData::Integer { bits } => Some(*bits),
            _ => None,
        }
    }

    /// Get the element type of a pointer
    pub fn pointee_type(&self) -> Option<&Type> {
        match &*self.data {
            TypeData::Pointer { pointee } => Some(pointee),
            _ => None,
        }
    }

    /// Get the element type and size of an array
    pub fn array_info(&self) -> Option<(&Type, usize)> {
        match &*self.data {
            TypeData::Array { element, size } => Some((element, *size)),
            _ => None,
        }
    }
}

/// Types are interned, so pointer equality of the backing allocation is
/// structural equality of the type.
impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl Eq for Type {}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.data {
            TypeData::Void => write!(f, "void"),
            TypeData::Integer { bits } => write!(f, "i{}", bits),
            TypeData::Float { kind } => match kind {
                FloatKind::Half => write!(f, "half"),
                FloatKind::Float => write!(f, "float"),
                FloatKind::Double => write!(f, "double"),
            },
            TypeData::Pointer { pointee } => write!(f, "{}*", pointee),
            TypeData::Array { element, size } => write!(f, "[{} x {}]", size, element),
            TypeData::Struct { fields, name } => {
                if let Some(n) = name {
                    write!(f, "%{}", n)
                } else {
                    write!(f, "{{ ")?;
                    for (i, field) in fields.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", field)?;
                    }
                    write!(f, " }}")
                }
            }
            TypeData::Function { return_type, param_types, is_var_arg } => {
                write!(f, "{} (", return_type)?;
                for (i, param) in param_types.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", param)?;
                }
                if *is_var_arg {
                    if !param_types.is_empty() {
                        write!(f, ", ")?;
                    }
                    write!(f, "...")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type({})", self)
    }
}
