//! Structural verification
//!
//! A cheap, local well-formedness check run after parsing and again after
//! optimization: every block ends in exactly one terminator, every `phi`
//! sits at the top of its block, and every use-edge points at an
//! instruction that is still attached to the function.

use thiserror::Error;

use crate::function::Function;
use crate::instruction::Opcode;
use crate::module::Module;
use crate::value::Value;

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("function `{function}` block `{block}` has no terminator")]
    MissingTerminator { function: String, block: String },

    #[error("function `{function}` block `{block}` has a terminator before its last instruction")]
    TerminatorNotLast { function: String, block: String },

    #[error("function `{function}` block `{block}` has a `phi` after a non-phi instruction")]
    PhiNotLeading { function: String, block: String },

    #[error("function `{function}` block `{block}` references block `{target}` not owned by the function")]
    DanglingBlockReference { function: String, block: String, target: String },

    #[error("function `{function}` has an instruction with a dangling use of an erased value")]
    DanglingUse { function: String },
}

pub fn verify_module(module: &Module) -> Result<(), VerificationError> {
    for function in module.functions() {
        verify_function(&function)?;
    }
    Ok(())
}

pub fn verify_function(function: &Function) -> Result<(), VerificationError> {
    if function.is_declaration() {
        return Ok(());
    }

    let fname = function.name();
    let blocks = function.blocks();

    for block in &blocks {
        let insts = block.instructions();
        let bname = block.name();

        let Some((last, rest)) = insts.split_last() else {
            return Err(VerificationError::MissingTerminator { function: fname.clone(), block: bname });
        };
        if !last.is_terminator() {
            return Err(VerificationError::MissingTerminator { function: fname.clone(), block: bname });
        }
        if rest.iter().any(|i| i.is_terminator()) {
            return Err(VerificationError::TerminatorNotLast { function: fname.clone(), block: bname });
        }

        let mut seen_non_phi = false;
        for inst in &insts {
            if inst.opcode() == Opcode::Phi {
                if seen_non_phi {
                    return Err(VerificationError::PhiNotLeading { function: fname.clone(), block: bname });
                }
            } else {
                seen_non_phi = true;
            }
        }

        for inst in &insts {
            for operand in inst.operands() {
                if let Value::BasicBlock(target) = operand {
                    if !blocks.iter().any(|b| *b == target) {
                        return Err(VerificationError::DanglingBlockReference {
                            function: fname.clone(),
                            block: bname,
                            target: target.name(),
                        });
                    }
                }
            }
        }
    }

    for block in &blocks {
        for inst in block.instructions() {
            for operand in inst.operands() {
                if let Value::Instruction(producer) = operand {
                    if !producer.is_parented() {
                        return Err(VerificationError::DanglingUse { function: fname.clone() });
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_block::BasicBlock;
    use crate::instruction::Instruction;
    use crate::Context;

    #[test]
    fn test_missing_terminator_is_rejected() {
        let ctx = Context::new();
        let f = Function::new("f", ctx.void_type(), vec![], false);
        let entry = BasicBlock::new("entry");
        entry.append(Instruction::new(Opcode::Add, Some(ctx.int32_type()), vec![], Some("x".into())));
        f.append_block(entry);
        assert!(matches!(verify_function(&f), Err(VerificationError::MissingTerminator { .. })));
    }

    #[test]
    fn test_well_formed_function_verifies() {
        let ctx = Context::new();
        let f = Function::new("f", ctx.void_type(), vec![], false);
        let entry = BasicBlock::new("entry");
        entry.append(Instruction::new(Opcode::Ret, None, vec![], None));
        f.append_block(entry);
        assert!(verify_function(&f).is_ok());
    }
}
