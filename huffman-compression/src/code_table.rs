use std::fmt;

use crate::{
    bit_io::{BitStr, Bits},
    format::{FRAMING_BITS, LEAF_BITS},
    frequency::{FrequencyTable, MAX_SYMBOLS},
    tree::Tree,
};

/// Code of every symbol plus the size of the serialized tree. Unused
/// symbols have an empty code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Bits>,
    tree_bits: u64,
}

impl CodeTable {
    pub fn from_tree(tree: &Tree) -> Self {
        let mut table = CodeTable {
            codes: vec![Bits::new(); MAX_SYMBOLS],
            tree_bits: 0,
        };
        let mut code = Bits::new();
        table.visit(tree, &mut code);
        table
    }

    // Same left-then-right preorder the tree is serialized in.
    fn visit(&mut self, tree: &Tree, current_code: &mut Bits) {
        match tree {
            Tree::Leaf { symbol, .. } => {
                self.tree_bits += LEAF_BITS;
                self.codes[*symbol as usize] = current_code.clone();
            }
            Tree::Branch { left, right, .. } => {
                self.tree_bits += 1;
                current_code.push(false);
                self.visit(left, current_code);
                current_code.pop();
                current_code.push(true);
                self.visit(right, current_code);
                current_code.pop();
            }
        }
    }

    pub fn code(&self, symbol: u8) -> &BitStr {
        &self.codes[symbol as usize]
    }

    pub fn tree_bits(&self) -> u64 {
        self.tree_bits
    }

    /// Symbols that received a code, lowest symbol value first. A lone-leaf
    /// tree assigns its symbol the empty code, so it is not listed here.
    pub fn assigned(&self) -> impl Iterator<Item = (u8, &BitStr)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter(|(_, code)| !code.is_empty())
            .map(|(symbol, code)| (symbol as u8, code.as_bitslice()))
    }

    pub fn payload_bits(&self, frequencies: &FrequencyTable) -> u64 {
        frequencies
            .present()
            .map(|(symbol, count)| count * self.code(symbol).len() as u64)
            .sum()
    }

    /// Size of the whole compressed file in bits, padding included.
    pub fn compressed_bits(&self, frequencies: &FrequencyTable) -> u64 {
        let bits = FRAMING_BITS + self.tree_bits + self.payload_bits(frequencies);
        bits.div_ceil(8) * 8
    }
}

impl fmt::Display for CodeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (symbol, code) in self.assigned() {
            let code = code
                .iter()
                .map(|bit| if *bit { '1' } else { '0' })
                .collect::<String>();
            writeln!(f, "{symbol} code is {code}")?;
        }
        Ok(())
    }
}
