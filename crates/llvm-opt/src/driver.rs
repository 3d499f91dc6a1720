//! The optimizer driver
//!
//! Owns the single `Stats` counter map for a run and executes the fixed
//! five-pass, three-iteration pipeline per function. The iteration count
//! is not a tunable: statistics are only meaningful against this exact
//! shape.

use llvm_core::Module;

use crate::stats::Stats;
use crate::{cse, dce, mem2reg, redundant_load, redundant_store, simplify};

const ITERATIONS: usize = 3;

#[derive(Debug, Clone, Copy, Default)]
pub struct OptimizerOptions {
    /// Run memory-to-register promotion once, before the pipeline.
    pub mem2reg: bool,
    /// Skip the five-pass pipeline entirely, leaving the module unchanged.
    pub no_cse: bool,
}

pub struct Optimizer {
    stats: Stats,
}

impl Default for Optimizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Optimizer {
    pub fn new() -> Self {
        Self { stats: Stats::new() }
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn run(&mut self, module: &Module, options: OptimizerOptions) {
        for function in module.functions() {
            if function.blocks().is_empty() {
                continue;
            }

            if options.mem2reg {
                let promoted = mem2reg::run(&function);
                log::debug!("mem2reg: promoted {promoted} allocas in `{}`", function.name());
            }

            if options.no_cse {
                continue;
            }

            for iteration in 0..ITERATIONS {
                log::debug!("pass pipeline iteration {iteration} over `{}`", function.name());
                dce::run(&function, &mut self.stats);
                simplify::run(&function, &mut self.stats);
                cse::run(&function, &mut self.stats);
                redundant_load::run(&function, &mut self.stats);
                redundant_store::run(&function, &mut self.stats);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use llvm_core::{BasicBlock, Context, Function, Instruction, Opcode, Value};

    #[test]
    fn test_dead_arithmetic_chain_is_removed_across_iterations() {
        let ctx = Context::new();
        let i32 = ctx.int32_type();
        let module = llvm_core::Module::new("m", ctx.clone());
        let f = Function::new("f", i32.clone(), vec![i32.clone(), i32.clone()], false);
        let block = BasicBlock::new("entry");
        let x = Value::Argument { ty: i32.clone(), index: 0, name: Some("x".into()) };
        let y = Value::Argument { ty: i32.clone(), index: 1, name: Some("y".into()) };
        let a = Instruction::new(Opcode::Add, Some(i32.clone()), vec![x.clone(), y], Some("a".into()));
        let two = Value::ConstantInt { ty: i32.clone(), value: 2 };
        let b = Instruction::new(Opcode::Mul, Some(i32), vec![Value::Instruction(a.clone()), two], Some("b".into()));
        let ret = Instruction::new(Opcode::Ret, None, vec![x], None);
        block.append(a.clone());
        block.append(b.clone());
        block.append(ret);
        f.append_block(block);
        module.add_function(f);

        let mut optimizer = Optimizer::new();
        optimizer.run(&module, OptimizerOptions { mem2reg: false, no_cse: false });

        assert!(!a.is_parented());
        assert!(!b.is_parented());
        assert!(optimizer.stats().get(crate::stats::CSE_DEAD) >= 2);
    }

    #[test]
    fn test_no_cse_flag_skips_pipeline() {
        let ctx = Context::new();
        let i32 = ctx.int32_type();
        let module = llvm_core::Module::new("m", ctx.clone());
        let f = Function::new("f", i32.clone(), vec![i32.clone()], false);
        let block = BasicBlock::new("entry");
        let x = Value::Argument { ty: i32.clone(), index: 0, name: Some("x".into()) };
        let zero = Value::ConstantInt { ty: i32.clone(), value: 0 };
        let dead = Instruction::new(Opcode::Add, Some(i32), vec![x.clone(), zero], Some("dead".into()));
        let ret = Instruction::new(Opcode::Ret, None, vec![x], None);
        block.append(dead.clone());
        block.append(ret);
        f.append_block(block);
        module.add_function(f);

        let mut optimizer = Optimizer::new();
        optimizer.run(&module, OptimizerOptions { mem2reg: false, no_cse: true });

        assert!(dead.is_parented());
        assert_eq!(optimizer.stats().nonzero().count(), 0);
    }
}
