//! Dominator tree analysis
//!
//! Implements the Cooper-Harvey-Kennedy iterative dominance algorithm
//! (*A Simple, Fast Dominance Algorithm*, 2001). Cross-block common
//! subexpression elimination walks this tree in preorder so that a
//! candidate instruction is only matched against instructions in blocks
//! that provably execute before it on every path.

use rustc_hash::FxHashMap;

use crate::basic_block::BasicBlock;
use crate::cfg::Cfg;

pub struct DominatorTree {
    idom: FxHashMap<BasicBlock, BasicBlock>,
    children: FxHashMap<BasicBlock, Vec<BasicBlock>>,
    root: Option<BasicBlock>,
}

impl DominatorTree {
    pub fn build(cfg: &Cfg) -> Self {
        let rpo = cfg.reverse_postorder();
        let Some(root) = rpo.first().cloned() else {
            return Self { idom: FxHashMap::default(), children: FxHashMap::default(), root: None };
        };

        let rpo_index: FxHashMap<BasicBlock, usize> = rpo.iter().cloned().enumerate().map(|(i, b)| (b, i)).collect();
        let mut idom: FxHashMap<BasicBlock, BasicBlock> = FxHashMap::default();
        idom.insert(root.clone(), root.clone());

        let mut changed = true;
        while changed {
            changed = false;
            // Skip the entry block; process everything else in RPO order.
            for block in rpo.iter().skip(1) {
                let preds: Vec<&BasicBlock> = cfg
                    .predecessors(block)
                    .iter()
                    .filter(|p| idom.contains_key(*p))
                    .collect();
                let Some((first, rest)) = preds.split_first() else { continue };
                let mut new_idom = (*first).clone();
                for pred in rest {
                    new_idom = Self::intersect(&idom, &rpo_index, &new_idom, pred);
                }
                match idom.get(block) {
                    Some(existing) if *existing == new_idom => {}
                    _ => {
                        idom.insert(block.clone(), new_idom);
                        changed = true;
                    }
                }
            }
        }

        let mut children: FxHashMap<BasicBlock, Vec<BasicBlock>> = FxHashMap::default();
        for (block, dom) in &idom {
            if block != dom {
                children.entry(dom.clone()).or_default().push(block.clone());
            }
        }

        Self { idom, children, root: Some(root) }
    }

    fn intersect(
        idom: &FxHashMap<BasicBlock, BasicBlock>,
        rpo_index: &FxHashMap<BasicBlock, usize>,
        a: &BasicBlock,
        b: &BasicBlock,
    ) -> BasicBlock {
        let mut finger1 = a.clone();
        let mut finger2 = b.clone();
        while finger1 != finger2 {
            while rpo_index[&finger1] > rpo_index[&finger2] {
                finger1 = idom[&finger1].clone();
            }
            while rpo_index[&finger2] > rpo_index[&finger1] {
                finger2 = idom[&finger2].clone();
            }
        }
        finger1
    }

    pub fn root(&self) -> Option<&BasicBlock> {
        self.root.as_ref()
    }

    pub fn idom(&self, block: &BasicBlock) -> Option<&BasicBlock> {
        match self.root.as_ref() {
            Some(root) if block == root => None,
            _ => self.idom.get(block),
        }
    }

    pub fn children(&self, block: &BasicBlock) -> &[BasicBlock] {
        self.children.get(block).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn dominates(&self, a: &BasicBlock, b: &BasicBlock) -> bool {
        if a == b {
            return true;
        }
        let mut cur = b.clone();
        while let Some(dom) = self.idom(&cur) {
            if dom == a {
                return true;
            }
            cur = dom.clone();
        }
        false
    }

    /// Preorder walk of the dominator tree from the root.
    pub fn preorder(&self) -> Vec<BasicBlock> {
        let mut out = Vec::new();
        if let Some(root) = &self.root {
            self.preorder_visit(root, &mut out);
        }
        out
    }

    fn preorder_visit(&self, block: &BasicBlock, out: &mut Vec<BasicBlock>) {
        out.push(block.clone());
        for child in self.children(block) {
            self.preorder_visit(child, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::Function;
    use crate::instruction::{Instruction, Opcode};
    use crate::value::Value;
    use crate::Context;

    /// entry -> {left, right} -> merge
    fn diamond() -> Function {
        let ctx = Context::new();
        let f = Function::new("f", ctx.void_type(), vec![], false);
        let entry = BasicBlock::new("entry");
        let left = BasicBlock::new("left");
        let right = BasicBlock::new("right");
        let merge = BasicBlock::new("merge");

        entry.append(Instruction::new(
            Opcode::CondBr,
            None,
            vec![
                Value::ConstantInt { ty: ctx.bool_type(), value: 1 },
                Value::BasicBlock(left.clone()),
                Value::BasicBlock(right.clone()),
            ],
            None,
        ));
        left.append(Instruction::new(Opcode::Br, None, vec![Value::BasicBlock(merge.clone())], None));
        right.append(Instruction::new(Opcode::Br, None, vec![Value::BasicBlock(merge.clone())], None));
        merge.append(Instruction::new(Opcode::Ret, None, vec![], None));

        f.append_block(entry);
        f.append_block(left);
        f.append_block(right);
        f.append_block(merge);
        f
    }

    #[test]
    fn test_diamond_dominance() {
        let f = diamond();
        let cfg = Cfg::build(&f);
        let tree = DominatorTree::build(&cfg);
        let blocks = f.blocks();
        let (entry, left, right, merge) = (&blocks[0], &blocks[1], &blocks[2], &blocks[3]);

        assert_eq!(tree.idom(merge), Some(entry));
        assert!(tree.dominates(entry, left));
        assert!(tree.dominates(entry, right));
        assert!(tree.dominates(entry, merge));
        assert!(!tree.dominates(left, right));
        assert!(!tree.dominates(left, merge));
    }
}
