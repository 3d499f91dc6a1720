//! Printer for the textual IR assembly format
//!
//! The inverse of `parser::parse_module`: renders a `Module` back to the
//! same textual grammar it reads, so the driver's "write optimized IR back
//! out" step round-trips through this crate alone.

use std::fmt::Write;

use llvm_core::{BasicBlock, FloatPredicate, Function, Instruction, IntPredicate, Module, Opcode, Predicate, Type, Value};

pub fn print_module(module: &Module) -> String {
    let mut out = String::new();
    for global in module.globals() {
        let _ = writeln!(
            out,
            "@{} = {} {}",
            global.name,
            if global.is_constant { "constant" } else { "global" },
            global.ty
        );
    }
    for function in module.functions() {
        print_function(&function, &mut out);
    }
    out
}

fn print_function(function: &Function, out: &mut String) {
    let params = function.param_types().iter().map(|t| t.to_string()).collect::<Vec<_>>().join(", ");
    if function.is_declaration() {
        let _ = writeln!(out, "declare {} @{}({})", function.return_type(), function.name(), params);
        return;
    }
    let _ = writeln!(out, "define {} @{}({}) {{", function.return_type(), function.name(), params);
    for block in function.blocks() {
        print_block(&block, out);
    }
    let _ = writeln!(out, "}}");
}

fn print_block(block: &BasicBlock, out: &mut String) {
    let _ = writeln!(out, "{}:", block.name());
    for inst in block.instructions() {
        let _ = write!(out, "  ");
        print_instruction(&inst, out);
        let _ = writeln!(out);
    }
}

fn print_instruction(inst: &Instruction, out: &mut String) {
    if inst.has_result() {
        let _ = write!(out, "%{} = ", inst.name().unwrap_or_else(|| "_".to_string()));
    }
    let ty = inst.result_type();
    let ops = inst.operands();
    match inst.opcode() {
        Opcode::Add => write!(out, "add {}", binop(&ty, &ops)),
        Opcode::Sub => write!(out, "sub {}", binop(&ty, &ops)),
        Opcode::Mul => write!(out, "mul {}", binop(&ty, &ops)),
        Opcode::UDiv => write!(out, "udiv {}", binop(&ty, &ops)),
        Opcode::SDiv => write!(out, "sdiv {}", binop(&ty, &ops)),
        Opcode::URem => write!(out, "urem {}", binop(&ty, &ops)),
        Opcode::SRem => write!(out, "srem {}", binop(&ty, &ops)),
        Opcode::Shl => write!(out, "shl {}", binop(&ty, &ops)),
        Opcode::LShr => write!(out, "lshr {}", binop(&ty, &ops)),
        Opcode::AShr => write!(out, "ashr {}", binop(&ty, &ops)),
        Opcode::And => write!(out, "and {}", binop(&ty, &ops)),
        Opcode::Or => write!(out, "or {}", binop(&ty, &ops)),
        Opcode::Xor => write!(out, "xor {}", binop(&ty, &ops)),
        Opcode::FAdd => write!(out, "fadd {}", binop(&ty, &ops)),
        Opcode::FSub => write!(out, "fsub {}", binop(&ty, &ops)),
        Opcode::FMul => write!(out, "fmul {}", binop(&ty, &ops)),
        Opcode::FDiv => write!(out, "fdiv {}", binop(&ty, &ops)),
        Opcode::FRem => write!(out, "frem {}", binop(&ty, &ops)),
        Opcode::ICmp => {
            let pred = match inst.predicate() {
                Some(Predicate::Int(p)) => int_predicate_str(p),
                _ => "eq",
            };
            let opty = ops.first().map(|v| v.get_type()).unwrap_or_else(|| ty.clone().unwrap());
            write!(out, "icmp {} {} {}, {}", pred, opty, fmt_value(&ops[0]), fmt_value(&ops[1]))
        }
        Opcode::FCmp => {
            let pred = match inst.predicate() {
                Some(Predicate::Float(p)) => float_predicate_str(p),
                _ => "oeq",
            };
            let opty = ops.first().map(|v| v.get_type()).unwrap_or_else(|| ty.clone().unwrap());
            write!(out, "fcmp {} {} {}, {}", pred, opty, fmt_value(&ops[0]), fmt_value(&ops[1]))
        }
        Opcode::Alloca => write!(out, "alloca {}", ty.and_then(|t| t.pointee_type().cloned()).map(|t| t.to_string()).unwrap_or_default()),
        Opcode::Load => {
            let vol = if inst.is_volatile() { "volatile " } else { "" };
            write!(out, "load {}{}, {} {}", vol, ty.unwrap(), ops[0].get_type(), fmt_value(&ops[0]))
        }
        Opcode::Store => {
            let vol = if inst.is_volatile() { "volatile " } else { "" };
            write!(out, "store {}{} {}, {} {}", vol, ops[0].get_type(), fmt_value(&ops[0]), ops[1].get_type(), fmt_value(&ops[1]))
        }
        Opcode::GetElementPtr => {
            let base_ty = ty.and_then(|t| t.pointee_type().cloned()).unwrap();
            let _ = write!(out, "getelementptr {}, {} {}", base_ty, ops[0].get_type(), fmt_value(&ops[0]));
            for idx in &ops[1..] {
                let _ = write!(out, ", {} {}", idx.get_type(), fmt_value(idx));
            }
            Ok(())
        }
        Opcode::Fence => write!(out, "fence"),
        Opcode::Trunc | Opcode::ZExt | Opcode::SExt | Opcode::FPTrunc | Opcode::FPExt | Opcode::FPToUI | Opcode::FPToSI
        | Opcode::UIToFP | Opcode::SIToFP | Opcode::PtrToInt | Opcode::IntToPtr | Opcode::BitCast => {
            write!(out, "{} {} {} to {}", cast_name(inst.opcode()), ops[0].get_type(), fmt_value(&ops[0]), ty.unwrap())
        }
        Opcode::Select => write!(
            out,
            "select {} {}, {} {}, {} {}",
            ops[0].get_type(),
            fmt_value(&ops[0]),
            ops[1].get_type(),
            fmt_value(&ops[1]),
            ops[2].get_type(),
            fmt_value(&ops[2])
        ),
        Opcode::Phi => {
            let _ = write!(out, "phi {}", ty.unwrap());
            for pair in ops.chunks(2) {
                let _ = write!(out, " [ {}, %{} ]", fmt_value(&pair[0]), block_name(&pair[1]));
            }
            Ok(())
        }
        Opcode::Call => {
            let callee = match &ops[0] {
                Value::Function { name, .. } => name.clone(),
                other => fmt_value(other),
            };
            let _ = write!(out, "call {} @{}(", ty.clone().unwrap_or_else(|| ops[0].get_type()), callee);
            for (i, arg) in ops[1..].iter().enumerate() {
                if i > 0 {
                    let _ = write!(out, ", ");
                }
                let _ = write!(out, "{} {}", arg.get_type(), fmt_value(arg));
            }
            write!(out, ")")
        }
        Opcode::Ret => {
            if let Some(val) = ops.first() {
                write!(out, "ret {} {}", val.get_type(), fmt_value(val))
            } else {
                write!(out, "ret void")
            }
        }
        Opcode::Br => write!(out, "br label %{}", block_name(&ops[0])),
        Opcode::CondBr => {
            write!(out, "br i1 {}, label %{}, label %{}", fmt_value(&ops[0]), block_name(&ops[1]), block_name(&ops[2]))
        }
        Opcode::Switch => {
            let _ = write!(out, "switch {} {}, label %{} [", ops[0].get_type(), fmt_value(&ops[0]), block_name(&ops[1]));
            for pair in ops[2..].chunks(2) {
                let _ = write!(out, " {} {}, label %{}", pair[0].get_type(), fmt_value(&pair[0]), block_name(&pair[1]));
            }
            write!(out, " ]")
        }
        Opcode::IndirectBr => {
            let _ = write!(out, "indirectbr {} {}, [", ops[0].get_type(), fmt_value(&ops[0]));
            for (i, target) in ops[1..].iter().enumerate() {
                if i > 0 {
                    let _ = write!(out, ",");
                }
                let _ = write!(out, " label %{}", block_name(target));
            }
            write!(out, " ]")
        }
        Opcode::Invoke => {
            let callee = match &ops[0] {
                Value::Function { name, .. } => name.clone(),
                other => fmt_value(other),
            };
            let args = &ops[1..ops.len() - 2];
            let _ = write!(out, "invoke {} @{}(", ty.clone().unwrap_or_else(|| ops[0].get_type()), callee);
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    let _ = write!(out, ", ");
                }
                let _ = write!(out, "{} {}", arg.get_type(), fmt_value(arg));
            }
            write!(
                out,
                ") to label %{} unwind label %{}",
                block_name(&ops[ops.len() - 2]),
                block_name(&ops[ops.len() - 1])
            )
        }
        Opcode::Resume => write!(out, "resume {} {}", ops[0].get_type(), fmt_value(&ops[0])),
        Opcode::Unreachable => write!(out, "unreachable"),
        Opcode::ExtractValue | Opcode::ExtractElement | Opcode::InsertValue | Opcode::InsertElement | Opcode::ShuffleVector => {
            let _ = write!(out, "{}", aggregate_name(inst.opcode()));
            for (i, op) in ops.iter().enumerate() {
                if i > 0 {
                    let _ = write!(out, ",");
                }
                let _ = write!(out, " {} {}", op.get_type(), fmt_value(op));
            }
            Ok(())
        }
    }
    .ok();
}

fn binop(ty: &Option<Type>, ops: &[Value]) -> String {
    format!("{} {}, {}", ty.clone().unwrap(), fmt_value(&ops[0]), fmt_value(&ops[1]))
}

fn fmt_value(value: &Value) -> String {
    match value {
        Value::Instruction(inst) => format!("%{}", inst.name().unwrap_or_else(|| "_".to_string())),
        Value::Argument { name, index, .. } => format!("%{}", name.clone().unwrap_or_else(|| index.to_string())),
        Value::ConstantInt { value, .. } => value.to_string(),
        Value::ConstantFloat { value, .. } => value.to_string(),
        Value::ConstantNull(_) => "null".to_string(),
        Value::Undef(_) => "undef".to_string(),
        Value::Poison(_) => "poison".to_string(),
        Value::BasicBlock(bb) => bb.name(),
        Value::Function { name, .. } => format!("@{}", name),
        Value::GlobalVariable { name, .. } => format!("@{}", name),
    }
}

fn block_name(value: &Value) -> String {
    match value {
        Value::BasicBlock(bb) => bb.name(),
        other => fmt_value(other),
    }
}

fn int_predicate_str(p: IntPredicate) -> &'static str {
    match p {
        IntPredicate::EQ => "eq",
        IntPredicate::NE => "ne",
        IntPredicate::UGT => "ugt",
        IntPredicate::UGE => "uge",
        IntPredicate::ULT => "ult",
        IntPredicate::ULE => "ule",
        IntPredicate::SGT => "sgt",
        IntPredicate::SGE => "sge",
        IntPredicate::SLT => "slt",
        IntPredicate::SLE => "sle",
    }
}

fn float_predicate_str(p: FloatPredicate) -> &'static str {
    match p {
        FloatPredicate::OEQ => "oeq",
        FloatPredicate::OGT => "ogt",
        FloatPredicate::OGE => "oge",
        FloatPredicate::OLT => "olt",
        FloatPredicate::OLE => "ole",
        FloatPredicate::ONE => "one",
        FloatPredicate::ORD => "ord",
        FloatPredicate::UNO => "uno",
        FloatPredicate::UEQ => "ueq",
        FloatPredicate::UGT => "ugt",
        FloatPredicate::UGE => "uge",
        FloatPredicate::ULT => "ult",
        FloatPredicate::ULE => "ule",
        FloatPredicate::UNE => "une",
    }
}

fn cast_name(op: Opcode) -> &'static str {
    match op {
        Opcode::Trunc => "trunc",
        Opcode::ZExt => "zext",
        Opcode::SExt => "sext",
        Opcode::FPTrunc => "fptrunc",
        Opcode::FPExt => "fpext",
        Opcode::FPToUI => "fptoui",
        Opcode::FPToSI => "fptosi",
        Opcode::UIToFP => "uitofp",
        Opcode::SIToFP => "sitofp",
        Opcode::PtrToInt => "ptrtoint",
        Opcode::IntToPtr => "inttoptr",
        Opcode::BitCast => "bitcast",
        _ => unreachable!(),
    }
}

fn aggregate_name(op: Opcode) -> &'static str {
    match op {
        Opcode::ExtractValue => "extractvalue",
        Opcode::InsertValue => "insertvalue",
        Opcode::ExtractElement => "extractelement",
        Opcode::InsertElement => "insertelement",
        Opcode::ShuffleVector => "shufflevector",
        _ => unreachable!(),
    }
}
