//! Recursive-descent parser for the textual IR assembly format.
//!
//! Builds an `llvm_core::Module` directly rather than an intermediate AST:
//! each instruction is constructed (and its def-use edges wired up) as soon
//! as its operands are in scope, so forward references to not-yet-defined
//! locals are resolved via a per-function deferred-patch list.

use std::collections::HashMap;

use llvm_core::{
    BasicBlock, Context, FloatPredicate, Function, GlobalVariable, Instruction, IntPredicate, Module, Opcode, Predicate, Type, Value,
};
use thiserror::Error;

use crate::lexer::{LexError, Lexer, Position, SpannedToken, Token};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("lexer error: {0}")]
    Lexer(#[from] LexError),

    #[error("expected {expected}, found {found:?} at {}:{}", pos.line, pos.column)]
    UnexpectedToken { expected: String, found: Token, pos: Position },

    #[error("unknown local `%{name}` at {}:{}", pos.line, pos.column)]
    UnknownLocal { name: String, pos: Position },

    #[error("unknown block label `{name}` at {}:{}", pos.line, pos.column)]
    UnknownLabel { name: String, pos: Position },

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("invalid syntax: {message} at {}:{}", pos.line, pos.column)]
    InvalidSyntax { message: String, pos: Position },
}

type PResult<T> = Result<T, ParseError>;

pub struct Parser {
    context: Context,
    tokens: Vec<SpannedToken>,
    current: usize,
}

/// Per-function bookkeeping while parsing its body: locals defined so far,
/// blocks defined so far (so branch/phi targets can be resolved even when
/// they appear textually before their label), and any forward references
/// that still need patching once the whole function is parsed.
struct FunctionScope {
    locals: HashMap<String, Value>,
    blocks: HashMap<String, BasicBlock>,
}

impl Parser {
    pub fn new(context: Context) -> Self {
        Self { context, tokens: Vec::new(), current: 0 }
    }

    pub fn parse_module(&mut self, source: &str, name: impl Into<String>) -> PResult<Module> {
        self.tokens = Lexer::new(source).tokenize()?;
        self.current = 0;

        let module = Module::new(name, self.context.clone());
        while !self.at(Token::Eof) {
            match self.peek() {
                Token::Declare => self.parse_declare(&module)?,
                Token::Define => self.parse_define(&module)?,
                other => {
                    return Err(ParseError::UnexpectedToken {
                        expected: "`declare` or `define`".into(),
                        found: other.clone(),
                        pos: self.pos(),
                    })
                }
            }
        }
        Ok(module)
    }

    // --- token plumbing -------------------------------------------------

    fn peek(&self) -> &Token {
        self.tokens.get(self.current).map(|t| &t.token).unwrap_or(&Token::Eof)
    }

    fn pos(&self) -> Position {
        self.tokens.get(self.current).map(|t| t.pos).unwrap_or(Position { line: 0, column: 0 })
    }

    fn at(&self, token: Token) -> bool {
        *self.peek() == token
    }

    fn bump(&mut self) -> Token {
        let token = self.tokens.get(self.current).map(|t| t.token.clone()).unwrap_or(Token::Eof);
        if self.current < self.tokens.len() {
            self.current += 1;
        }
        token
    }

    fn expect(&mut self, expected: Token) -> PResult<()> {
        if *self.peek() == expected {
            self.bump();
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken { expected: format!("{:?}", expected), found: self.peek().clone(), pos: self.pos() })
        }
    }

    fn expect_global_ident(&mut self) -> PResult<String> {
        match self.bump() {
            Token::GlobalIdent(name) => Ok(name),
            other => Err(ParseError::UnexpectedToken { expected: "@global".into(), found: other, pos: self.pos() }),
        }
    }

    fn expect_local_ident(&mut self) -> PResult<String> {
        match self.bump() {
            Token::LocalIdent(name) => Ok(name),
            other => Err(ParseError::UnexpectedToken { expected: "%local".into(), found: other, pos: self.pos() }),
        }
    }

    fn expect_int(&mut self) -> PResult<i64> {
        match self.bump() {
            Token::IntLit(v) => Ok(v),
            other => Err(ParseError::UnexpectedToken { expected: "integer literal".into(), found: other, pos: self.pos() }),
        }
    }

    // --- types ------------------------------------------------------------

    fn parse_type(&mut self) -> PResult<Type> {
        let mut ty = match self.bump() {
            Token::Void => self.context.void_type(),
            Token::Half => self.context.half_type(),
            Token::Float => self.context.float_type(),
            Token::Double => self.context.double_type(),
            Token::IntType(bits) => self.context.int_type(bits),
            Token::LBracket => {
                let size = self.expect_int()? as usize;
                self.expect(Token::X)?;
                let elem = self.parse_type()?;
                self.expect(Token::RBracket)?;
                self.context.array_type(elem, size)
            }
            other => return Err(ParseError::UnexpectedToken { expected: "type".into(), found: other, pos: self.pos() }),
        };
        while self.at(Token::Star) {
            self.bump();
            ty = self.context.ptr_type(ty);
        }
        Ok(ty)
    }

    // --- top level ----------------------------------------------------------

    fn parse_declare(&mut self, module: &Module) -> PResult<()> {
        self.expect(Token::Declare)?;
        let ret_ty = self.parse_type()?;
        let name = self.expect_global_ident()?;
        let (param_types, is_var_arg) = self.parse_param_types()?;
        let function = Function::new(name, ret_ty, param_types, is_var_arg);
        module.add_function(function);
        Ok(())
    }

    fn parse_param_types(&mut self) -> PResult<(Vec<Type>, bool)> {
        self.expect(Token::LParen)?;
        let mut types = Vec::new();
        let mut is_var_arg = false;
        while !self.at(Token::RParen) {
            if let Token::LabelIdent(dots) = self.peek() {
                if dots == "..." {
                    self.bump();
                    is_var_arg = true;
                    break;
                }
            }
            types.push(self.parse_type()?);
            if !self.at(Token::RParen) {
                self.expect(Token::Comma)?;
            }
        }
        self.expect(Token::RParen)?;
        Ok((types, is_var_arg))
    }

    fn parse_define(&mut self, module: &Module) -> PResult<()> {
        self.expect(Token::Define)?;
        let ret_ty = self.parse_type()?;
        let name = self.expect_global_ident()?;
        self.expect(Token::LParen)?;
        let mut param_types = Vec::new();
        let mut param_names = Vec::new();
        let mut is_var_arg = false;
        while !self.at(Token::RParen) {
            if let Token::LabelIdent(dots) = self.peek() {
                if dots == "..." {
                    self.bump();
                    is_var_arg = true;
                    break;
                }
            }
            let ty = self.parse_type()?;
            let pname = self.expect_local_ident()?;
            param_types.push(ty);
            param_names.push(pname);
            if !self.at(Token::RParen) {
                self.expect(Token::Comma)?;
            }
        }
        self.expect(Token::RParen)?;

        let function = Function::new(&name, ret_ty, param_types.clone(), is_var_arg);
        self.expect(Token::LBrace)?;

        let mut scope = FunctionScope { locals: HashMap::new(), blocks: HashMap::new() };
        for (i, (ty, pname)) in param_types.iter().zip(param_names.iter()).enumerate() {
            scope.locals.insert(pname.clone(), Value::Argument { ty: ty.clone(), index: i, name: Some(pname.clone()) });
        }

        // First pass: create every block up front so forward branches and
        // phi incoming-edges can resolve labels regardless of source order.
        let body_start = self.current;
        while !self.at(Token::RBrace) {
            if let Token::LabelIdent(label) = self.peek().clone() {
                if self.tokens.get(self.current + 1).map(|t| &t.token) == Some(&Token::Colon) {
                    self.bump();
                    self.bump();
                    let block = BasicBlock::new(label.clone());
                    scope.blocks.insert(label, block.clone());
                    function.append_block(block);
                    continue;
                }
            }
            self.bump();
        }
        self.current = body_start;

        let mut current_block: Option<BasicBlock> = None;
        while !self.at(Token::RBrace) {
            if let Token::LabelIdent(label) = self.peek().clone() {
                if self.tokens.get(self.current + 1).map(|t| &t.token) == Some(&Token::Colon) {
                    self.bump();
                    self.bump();
                    current_block = scope.blocks.get(&label).cloned();
                    continue;
                }
            }
            let block = current_block.clone().ok_or_else(|| ParseError::InvalidSyntax {
                message: "instruction outside of any basic block".into(),
                pos: self.pos(),
            })?;
            self.parse_instruction(&block, &mut scope)?;
        }
        self.expect(Token::RBrace)?;

        module.add_function(function);
        Ok(())
    }

    fn lookup_local(&self, scope: &FunctionScope, name: &str) -> PResult<Value> {
        scope.locals.get(name).cloned().ok_or_else(|| ParseError::UnknownLocal { name: name.to_string(), pos: self.pos() })
    }

    fn lookup_block(&self, scope: &FunctionScope, name: &str) -> PResult<BasicBlock> {
        scope.blocks.get(name).cloned().ok_or_else(|| ParseError::UnknownLabel { name: name.to_string(), pos: self.pos() })
    }

    // --- instructions -------------------------------------------------------

    fn parse_instruction(&mut self, block: &BasicBlock, scope: &mut FunctionScope) -> PResult<()> {
        let mut result_name = None;
        if matches!(self.peek(), Token::LocalIdent(_)) && self.tokens.get(self.current + 1).map(|t| &t.token) == Some(&Token::Equals) {
            result_name = Some(self.expect_local_ident()?);
            self.expect(Token::Equals)?;
        }

        let op = match self.bump() {
            Token::Opcode(op) => op,
            other => return Err(ParseError::UnexpectedToken { expected: "opcode".into(), found: other, pos: self.pos() }),
        };

        let inst = self.parse_opcode_body(&op, scope)?;
        if let Some(name) = result_name {
            inst.set_name(Some(name.clone()));
            scope.locals.insert(name, Value::Instruction(inst.clone()));
        }
        block.append(inst);
        Ok(())
    }

    fn parse_typed_value(&mut self, scope: &FunctionScope) -> PResult<(Type, Value)> {
        let ty = self.parse_type()?;
        let value = self.parse_value(&ty, scope)?;
        Ok((ty, value))
    }

    fn parse_value(&mut self, ty: &Type, scope: &FunctionScope) -> PResult<Value> {
        match self.peek().clone() {
            Token::LocalIdent(name) => {
                self.bump();
                self.lookup_local(scope, &name)
            }
            Token::GlobalIdent(name) => {
                self.bump();
                Ok(Value::GlobalVariable { name, ty: ty.clone() })
            }
            Token::IntLit(v) => {
                self.bump();
                Ok(Value::ConstantInt { ty: ty.clone(), value: v })
            }
            Token::FloatLit(v) => {
                self.bump();
                Ok(Value::ConstantFloat { ty: ty.clone(), value: v })
            }
            Token::True => {
                self.bump();
                Ok(Value::ConstantInt { ty: ty.clone(), value: 1 })
            }
            Token::False => {
                self.bump();
                Ok(Value::ConstantInt { ty: ty.clone(), value: 0 })
            }
            Token::Null => {
                self.bump();
                Ok(Value::ConstantNull(ty.clone()))
            }
            Token::Undef => {
                self.bump();
                Ok(Value::Undef(ty.clone()))
            }
            Token::Poison => {
                self.bump();
                Ok(Value::Poison(ty.clone()))
            }
            other => Err(ParseError::UnexpectedToken { expected: "value".into(), found: other, pos: self.pos() }),
        }
    }

    fn parse_int_predicate(&mut self) -> PResult<IntPredicate> {
        match self.bump() {
            Token::Predicate(p) => match p.as_str() {
                "eq" => Ok(IntPredicate::EQ),
                "ne" => Ok(IntPredicate::NE),
                "ugt" => Ok(IntPredicate::UGT),
                "uge" => Ok(IntPredicate::UGE),
                "ult" => Ok(IntPredicate::ULT),
                "ule" => Ok(IntPredicate::ULE),
                "sgt" => Ok(IntPredicate::SGT),
                "sge" => Ok(IntPredicate::SGE),
                "slt" => Ok(IntPredicate::SLT),
                "sle" => Ok(IntPredicate::SLE),
                other => Err(ParseError::InvalidSyntax { message: format!("`{other}` is not an icmp predicate"), pos: self.pos() }),
            },
            other => Err(ParseError::UnexpectedToken { expected: "icmp predicate".into(), found: other, pos: self.pos() }),
        }
    }

    fn parse_float_predicate(&mut self) -> PResult<FloatPredicate> {
        match self.bump() {
            Token::Predicate(p) => match p.as_str() {
                "oeq" => Ok(FloatPredicate::OEQ),
                "ogt" => Ok(FloatPredicate::OGT),
                "oge" => Ok(FloatPredicate::OGE),
                "olt" => Ok(FloatPredicate::OLT),
                "ole" => Ok(FloatPredicate::OLE),
                "one" => Ok(FloatPredicate::ONE),
                "ord" => Ok(FloatPredicate::ORD),
                "uno" => Ok(FloatPredicate::UNO),
                "ueq" => Ok(FloatPredicate::UEQ),
                "ugt" => Ok(FloatPredicate::UGT),
                "uge" => Ok(FloatPredicate::UGE),
                "ult" => Ok(FloatPredicate::ULT),
                "ule" => Ok(FloatPredicate::ULE),
                "une" => Ok(FloatPredicate::UNE),
                other => Err(ParseError::InvalidSyntax { message: format!("`{other}` is not an fcmp predicate"), pos: self.pos() }),
            },
            other => Err(ParseError::UnexpectedToken { expected: "fcmp predicate".into(), found: other, pos: self.pos() }),
        }
    }

    fn parse_opcode_body(&mut self, op: &str, scope: &mut FunctionScope) -> PResult<Instruction> {
        let bool_ty = self.context.bool_type();
        match op {
            "add" | "sub" | "mul" | "udiv" | "sdiv" | "urem" | "srem" | "shl" | "lshr" | "ashr" | "and" | "or" | "xor" | "fadd"
            | "fsub" | "fmul" | "fdiv" | "frem" => {
                let (ty, lhs) = self.parse_typed_value(scope)?;
                self.expect(Token::Comma)?;
                let rhs = self.parse_value(&ty, scope)?;
                Ok(Instruction::new(binary_opcode(op), Some(ty), vec![lhs, rhs], None))
            }
            "icmp" => {
                let pred = self.parse_int_predicate()?;
                let (ty, lhs) = self.parse_typed_value(scope)?;
                self.expect(Token::Comma)?;
                let rhs = self.parse_value(&ty, scope)?;
                Ok(Instruction::new(Opcode::ICmp, Some(bool_ty), vec![lhs, rhs], None).with_predicate(Predicate::Int(pred)))
            }
            "fcmp" => {
                let pred = self.parse_float_predicate()?;
                let (ty, lhs) = self.parse_typed_value(scope)?;
                self.expect(Token::Comma)?;
                let rhs = self.parse_value(&ty, scope)?;
                Ok(Instruction::new(Opcode::FCmp, Some(bool_ty), vec![lhs, rhs], None).with_predicate(Predicate::Float(pred)))
            }
            "alloca" => {
                let elem_ty = self.parse_type()?;
                let ptr_ty = self.context.ptr_type(elem_ty);
                Ok(Instruction::new(Opcode::Alloca, Some(ptr_ty), vec![], None))
            }
            "load" => {
                let volatile = self.eat_volatile();
                let elem_ty = self.parse_type()?;
                self.expect(Token::Comma)?;
                let (_, ptr) = self.parse_typed_value(scope)?;
                Ok(Instruction::new(Opcode::Load, Some(elem_ty), vec![ptr], None).with_volatile(volatile))
            }
            "store" => {
                let volatile = self.eat_volatile();
                let (_, val) = self.parse_typed_value(scope)?;
                self.expect(Token::Comma)?;
                let (_, ptr) = self.parse_typed_value(scope)?;
                Ok(Instruction::new(Opcode::Store, None, vec![val, ptr], None).with_volatile(volatile))
            }
            "getelementptr" => {
                let base_ty = self.parse_type()?;
                self.expect(Token::Comma)?;
                let (_, base_ptr) = self.parse_typed_value(scope)?;
                let mut operands = vec![base_ptr];
                while self.at(Token::Comma) {
                    self.bump();
                    let (_, idx) = self.parse_typed_value(scope)?;
                    operands.push(idx);
                }
                let ptr_ty = self.context.ptr_type(base_ty);
                Ok(Instruction::new(Opcode::GetElementPtr, Some(ptr_ty), operands, None))
            }
            "fence" => Ok(Instruction::new(Opcode::Fence, None, vec![], None)),
            "trunc" | "zext" | "sext" | "fptrunc" | "fpext" | "fptoui" | "fptosi" | "uitofp" | "sitofp" | "ptrtoint" | "inttoptr"
            | "bitcast" => {
                let (_, val) = self.parse_typed_value(scope)?;
                self.expect(Token::To)?;
                let target_ty = self.parse_type()?;
                Ok(Instruction::new(cast_opcode(op), Some(target_ty), vec![val], None))
            }
            "select" => {
                let (_, cond) = self.parse_typed_value(scope)?;
                self.expect(Token::Comma)?;
                let (ty, tval) = self.parse_typed_value(scope)?;
                self.expect(Token::Comma)?;
                let (_, fval) = self.parse_typed_value(scope)?;
                Ok(Instruction::new(Opcode::Select, Some(ty), vec![cond, tval, fval], None))
            }
            "phi" => {
                let ty = self.parse_type()?;
                let mut operands = Vec::new();
                loop {
                    self.expect(Token::LBracket)?;
                    let val = self.parse_value(&ty, scope)?;
                    self.expect(Token::Comma)?;
                    let label = self.expect_local_ident()?;
                    let block = self.lookup_block(scope, &label)?;
                    self.expect(Token::RBracket)?;
                    operands.push(val);
                    operands.push(Value::BasicBlock(block));
                    if self.at(Token::Comma) {
                        self.bump();
                    } else {
                        break;
                    }
                }
                Ok(Instruction::new(Opcode::Phi, Some(ty), operands, None))
            }
            "call" => {
                let ret_ty = self.parse_type()?;
                let callee = self.expect_global_ident()?;
                self.expect(Token::LParen)?;
                let mut operands = vec![Value::Function { name: callee, ty: ret_ty.clone() }];
                while !self.at(Token::RParen) {
                    let (_, val) = self.parse_typed_value(scope)?;
                    operands.push(val);
                    if !self.at(Token::RParen) {
                        self.expect(Token::Comma)?;
                    }
                }
                self.expect(Token::RParen)?;
                let result_ty = if ret_ty.is_void() { None } else { Some(ret_ty) };
                Ok(Instruction::new(Opcode::Call, result_ty, operands, None))
            }
            "ret" => {
                if self.at(Token::Void) {
                    self.bump();
                    Ok(Instruction::new(Opcode::Ret, None, vec![], None))
                } else {
                    let (_, val) = self.parse_typed_value(scope)?;
                    Ok(Instruction::new(Opcode::Ret, None, vec![val], None))
                }
            }
            "br" => {
                if self.at(Token::LabelIdent("label".into())) {
                    self.bump();
                    let label = self.expect_local_ident()?;
                    let block = self.lookup_block(scope, &label)?;
                    Ok(Instruction::new(Opcode::Br, None, vec![Value::BasicBlock(block)], None))
                } else {
                    let (_, cond) = self.parse_typed_value(scope)?;
                    self.expect(Token::Comma)?;
                    self.expect_label_keyword()?;
                    let t_label = self.expect_local_ident()?;
                    let t_block = self.lookup_block(scope, &t_label)?;
                    self.expect(Token::Comma)?;
                    self.expect_label_keyword()?;
                    let f_label = self.expect_local_ident()?;
                    let f_block = self.lookup_block(scope, &f_label)?;
                    Ok(Instruction::new(
                        Opcode::CondBr,
                        None,
                        vec![cond, Value::BasicBlock(t_block), Value::BasicBlock(f_block)],
                        None,
                    ))
                }
            }
            "switch" => {
                let (ty, val) = self.parse_typed_value(scope)?;
                self.expect(Token::Comma)?;
                self.expect_label_keyword()?;
                let default_label = self.expect_local_ident()?;
                let default_block = self.lookup_block(scope, &default_label)?;
                self.expect(Token::LBracket)?;
                let mut operands = vec![val, Value::BasicBlock(default_block)];
                while !self.at(Token::RBracket) {
                    let (_, case_val) = self.parse_typed_value(scope)?;
                    self.expect(Token::Comma)?;
                    self.expect_label_keyword()?;
                    let case_label = self.expect_local_ident()?;
                    let case_block = self.lookup_block(scope, &case_label)?;
                    operands.push(case_val);
                    operands.push(Value::BasicBlock(case_block));
                }
                let _ = ty;
                self.expect(Token::RBracket)?;
                Ok(Instruction::new(Opcode::Switch, None, operands, None))
            }
            "indirectbr" => {
                let (_, addr) = self.parse_typed_value(scope)?;
                self.expect(Token::Comma)?;
                self.expect(Token::LBracket)?;
                let mut operands = vec![addr];
                loop {
                    self.expect_label_keyword()?;
                    let label = self.expect_local_ident()?;
                    operands.push(Value::BasicBlock(self.lookup_block(scope, &label)?));
                    if self.at(Token::Comma) {
                        self.bump();
                    } else {
                        break;
                    }
                }
                self.expect(Token::RBracket)?;
                Ok(Instruction::new(Opcode::IndirectBr, None, operands, None))
            }
            "invoke" => {
                let ret_ty = self.parse_type()?;
                let callee = self.expect_global_ident()?;
                self.expect(Token::LParen)?;
                let mut operands = vec![Value::Function { name: callee, ty: ret_ty.clone() }];
                while !self.at(Token::RParen) {
                    let (_, val) = self.parse_typed_value(scope)?;
                    operands.push(val);
                    if !self.at(Token::RParen) {
                        self.expect(Token::Comma)?;
                    }
                }
                self.expect(Token::RParen)?;
                self.expect_label_keyword()?;
                let normal = self.expect_local_ident()?;
                operands.push(Value::BasicBlock(self.lookup_block(scope, &normal)?));
                self.expect(Token::Comma)?;
                self.expect_label_keyword()?;
                let unwind = self.expect_local_ident()?;
                operands.push(Value::BasicBlock(self.lookup_block(scope, &unwind)?));
                let result_ty = if ret_ty.is_void() { None } else { Some(ret_ty) };
                Ok(Instruction::new(Opcode::Invoke, result_ty, operands, None))
            }
            "resume" => {
                let (_, val) = self.parse_typed_value(scope)?;
                Ok(Instruction::new(Opcode::Resume, None, vec![val], None))
            }
            "unreachable" => Ok(Instruction::new(Opcode::Unreachable, None, vec![], None)),
            "extractvalue" | "extractelement" | "insertvalue" | "insertelement" | "shufflevector" => {
                let (ty, first) = self.parse_typed_value(scope)?;
                let mut operands = vec![first];
                while self.at(Token::Comma) {
                    self.bump();
                    let (_, v) = self.parse_typed_value(scope)?;
                    operands.push(v);
                }
                Ok(Instruction::new(aggregate_opcode(op), Some(ty), operands, None))
            }
            other => Err(ParseError::InvalidSyntax { message: format!("unhandled opcode `{other}`"), pos: self.pos() }),
        }
    }

    fn eat_volatile(&mut self) -> bool {
        if self.at(Token::Volatile) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect_label_keyword(&mut self) -> PResult<()> {
        match self.peek().clone() {
            Token::LabelIdent(w) if w == "label" => {
                self.bump();
                Ok(())
            }
            other => Err(ParseError::UnexpectedToken { expected: "`label`".into(), found: other, pos: self.pos() }),
        }
    }
}

fn binary_opcode(op: &str) -> Opcode {
    match op {
        "add" => Opcode::Add,
        "sub" => Opcode::Sub,
        "mul" => Opcode::Mul,
        "udiv" => Opcode::UDiv,
        "sdiv" => Opcode::SDiv,
        "urem" => Opcode::URem,
        "srem" => Opcode::SRem,
        "shl" => Opcode::Shl,
        "lshr" => Opcode::LShr,
        "ashr" => Opcode::AShr,
        "and" => Opcode::And,
        "or" => Opcode::Or,
        "xor" => Opcode::Xor,
        "fadd" => Opcode::FAdd,
        "fsub" => Opcode::FSub,
        "fmul" => Opcode::FMul,
        "fdiv" => Opcode::FDiv,
        "frem" => Opcode::FRem,
        _ => unreachable!("non-binary opcode `{op}` routed to binary_opcode"),
    }
}

fn cast_opcode(op: &str) -> Opcode {
    match op {
        "trunc" => Opcode::Trunc,
        "zext" => Opcode::ZExt,
        "sext" => Opcode::SExt,
        "fptrunc" => Opcode::FPTrunc,
        "fpext" => Opcode::FPExt,
        "fptoui" => Opcode::FPToUI,
        "fptosi" => Opcode::FPToSI,
        "uitofp" => Opcode::UIToFP,
        "sitofp" => Opcode::SIToFP,
        "ptrtoint" => Opcode::PtrToInt,
        "inttoptr" => Opcode::IntToPtr,
        "bitcast" => Opcode::BitCast,
        _ => unreachable!("non-cast opcode `{op}` routed to cast_opcode"),
    }
}

fn aggregate_opcode(op: &str) -> Opcode {
    match op {
        "extractvalue" => Opcode::ExtractValue,
        "insertvalue" => Opcode::InsertValue,
        "extractelement" => Opcode::ExtractElement,
        "insertelement" => Opcode::InsertElement,
        "shufflevector" => Opcode::ShuffleVector,
        _ => unreachable!("non-aggregate opcode `{op}` routed to aggregate_opcode"),
    }
}

pub fn parse_module(source: &str, context: Context, name: impl Into<String>) -> PResult<Module> {
    Parser::new(context).parse_module(source, name)
}
