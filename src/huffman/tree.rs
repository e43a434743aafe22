use std::cmp::{Eq, Ord, Ordering, PartialEq, PartialOrd, Reverse};
use std::collections::{BinaryHeap, VecDeque};
use std::fmt;
use std::io::{Read, Write};

use super::{Code, CodingError, Frequency, FrequencyTable, Symbol};
use crate::binary_stream::{BitReader, BitWriter};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NodeKind {
    Leaf { symbol: Symbol },
    Inner { left: usize, right: usize },
}

/// Membership bitmask over all 256 byte values
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct SymbolSet {
    mask: [u64; 4],
}

impl SymbolSet {
    fn single(symbol: Symbol) -> Self {
        let mut set = Self::default();
        set.mask[symbol as usize / 64] = 1 << (symbol % 64);
        set
    }

    fn union(&self, other: &SymbolSet) -> Self {
        let mut set = *self;
        for (word, other_word) in set.mask.iter_mut().zip(other.mask) {
            *word |= other_word;
        }
        set
    }

    fn contains(&self, symbol: Symbol) -> bool {
        self.mask[symbol as usize / 64] & (1 << (symbol % 64)) != 0
    }
}

#[derive(Clone, Copy, Debug)]
struct Node {
    frequency: Frequency,
    index: usize,
    kind: NodeKind,
    symbols: SymbolSet,
}

impl Node {
    fn leaf(index: usize, symbol: Symbol, frequency: Frequency) -> Self {
        Self {
            frequency,
            index,
            kind: NodeKind::Leaf { symbol },
            symbols: SymbolSet::single(symbol),
        }
    }

    fn inner(index: usize, left: &Node, right: &Node) -> Self {
        Self {
            frequency: left.frequency.saturating_add(right.frequency),
            index,
            kind: NodeKind::Inner {
                left: left.index,
                right: right.index,
            },
            symbols: left.symbols.union(&right.symbols),
        }
    }
}

/// Element of the merge queue.
///
/// Ordered by frequency first, then by the symbols of the subtree
/// concatenated from left to right, compared lexicographically.
struct QueueEntry {
    frequency: Frequency,
    key: Vec<Symbol>,
    index: usize,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.frequency
            .cmp(&other.frequency)
            .then_with(|| self.key.cmp(&other.key))
            .then_with(|| self.index.cmp(&other.index))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

enum ReadState {
    Descending(usize),
    Leaf(Symbol),
    Exhausted,
}

/// Immutable Huffman tree, nodes are owned by an arena and addressed by index.
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root_index: Option<usize>,
}

impl HuffmanTree {
    pub fn new(frequencies: &FrequencyTable) -> HuffmanTree {
        let mut heap = BinaryHeap::new();
        let mut nodes: Vec<Node> = Vec::with_capacity(frequencies.len() * 2);

        // create the initial nodeset
        for sf in frequencies.iter() {
            let node = Node::leaf(nodes.len(), sf.symbol, sf.frequency);
            heap.push(Reverse(QueueEntry {
                frequency: node.frequency,
                key: vec![sf.symbol],
                index: node.index,
            }));
            nodes.push(node);
        }

        // merge nodes until one is left
        let root_index = loop {
            let Some(Reverse(left)) = heap.pop() else {
                break None;
            };
            let Some(Reverse(right)) = heap.pop() else {
                break Some(left.index);
            };
            let node = Node::inner(nodes.len(), &nodes[left.index], &nodes[right.index]);
            let mut key = left.key;
            key.extend(right.key);
            heap.push(Reverse(QueueEntry {
                frequency: node.frequency,
                key,
                index: node.index,
            }));
            nodes.push(node);
        };

        log::debug!(
            "Built Huffman tree with {} leaves and {} nodes",
            frequencies.len(),
            nodes.len()
        );
        HuffmanTree { nodes, root_index }
    }

    pub fn is_empty(&self) -> bool {
        self.root_index.is_none()
    }

    /// Number of leaves, i.e. distinct symbols
    pub fn symbol_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node.kind, NodeKind::Leaf { .. }))
            .count()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn root_frequency(&self) -> Option<Frequency> {
        self.root_index.map(|index| self.nodes[index].frequency)
    }

    /// Code of `symbol` found by depth first descent, left subtree first.
    pub fn encode_recursive(&self, symbol: Symbol) -> Option<Code> {
        let root_index = self.root_index?;
        let mut reversed_path = self.find_reversed_path(root_index, symbol)?;
        reversed_path.reverse();
        Some(Code::from(reversed_path))
    }

    fn find_reversed_path(&self, index: usize, symbol: Symbol) -> Option<Vec<bool>> {
        match self.nodes[index].kind {
            NodeKind::Leaf {
                symbol: leaf_symbol,
            } => (leaf_symbol == symbol).then(Vec::new),
            NodeKind::Inner { left, right } => {
                if let Some(mut path) = self.find_reversed_path(left, symbol) {
                    path.push(false);
                    return Some(path);
                }
                let mut path = self.find_reversed_path(right, symbol)?;
                path.push(true);
                Some(path)
            }
        }
    }

    /// Code of `symbol` found by breadth first search, only entering
    /// subtrees that contain the symbol.
    pub fn encode_breadth_first(&self, symbol: Symbol) -> Option<Code> {
        let root_index = self.root_index?;
        let mut queue = VecDeque::from([(root_index, Code::new())]);
        while let Some((index, path)) = queue.pop_front() {
            match self.nodes[index].kind {
                NodeKind::Leaf {
                    symbol: leaf_symbol,
                } => {
                    if leaf_symbol == symbol {
                        return Some(path);
                    }
                }
                NodeKind::Inner { left, right } => {
                    for (child, bit) in [(left, false), (right, true)] {
                        if self.nodes[child].symbols.contains(symbol) {
                            queue.push_back((child, path.with_bit(bit)));
                        }
                    }
                }
            }
        }
        None
    }

    /// Walks the tree along `bits` and returns the symbol of the leaf
    /// reached exactly at the end of the input.
    pub fn decode<B: AsRef<[bool]>>(&self, bits: B) -> Option<Symbol> {
        let mut index = self.root_index?;
        for &bit in bits.as_ref() {
            match self.nodes[index].kind {
                // input continues past a leaf
                NodeKind::Leaf { .. } => return None,
                NodeKind::Inner { left, right } => index = if bit { right } else { left },
            }
        }
        match self.nodes[index].kind {
            NodeKind::Leaf { symbol } => Some(symbol),
            NodeKind::Inner { .. } => None,
        }
    }

    /// Writes the code of `symbol` bit by bit.
    ///
    /// Nothing is written for a symbol that is not part of the tree.
    pub fn write_code<W: Write>(
        &self,
        symbol: Symbol,
        writer: &mut BitWriter<W>,
    ) -> Result<(), CodingError> {
        let code = self
            .encode_breadth_first(symbol)
            .ok_or(CodingError::UnknownSymbol(symbol))?;
        for &bit in code.bits() {
            writer
                .write_bit(bit)
                .map_err(CodingError::BitWriterError)?;
        }
        Ok(())
    }

    /// Reads bits until a leaf is reached.
    ///
    /// Returns `None` if the reader runs out of bits first, or the tree is empty.
    pub fn read_code<R: Read>(
        &self,
        reader: &mut BitReader<R>,
    ) -> Result<Option<Symbol>, CodingError> {
        let mut state = match self.root_index {
            Some(index) => ReadState::Descending(index),
            None => ReadState::Exhausted,
        };
        loop {
            state = match state {
                ReadState::Descending(index) => match self.nodes[index].kind {
                    NodeKind::Leaf { symbol } => ReadState::Leaf(symbol),
                    NodeKind::Inner { left, right } => {
                        if !reader.has_next().map_err(CodingError::BitReaderError)? {
                            ReadState::Exhausted
                        } else if reader.read_bit().map_err(CodingError::BitReaderError)? {
                            ReadState::Descending(right)
                        } else {
                            ReadState::Descending(left)
                        }
                    }
                },
                ReadState::Leaf(symbol) => return Ok(Some(symbol)),
                ReadState::Exhausted => return Ok(None),
            }
        }
    }
}

const BOX_DRAWINGS_DOUBLE_HORIZONTAL: &str = "═";
const SPACE: &str = " ";

fn format_symbol(symbol: Symbol) -> String {
    if symbol.is_ascii_graphic() {
        format!("'{}'", symbol as char)
    } else {
        format!("{:#04X}", symbol)
    }
}

fn label_center(line: &str) -> usize {
    (line.chars().position(|c| c != ' ').unwrap_or(0) * 2 + line.trim().chars().count()) / 2
}

// Node & Tree visualization
impl Node {
    fn get_string(&self, tree: &HuffmanTree) -> Vec<String> {
        match self.kind {
            NodeKind::Leaf { symbol } => {
                vec![format!("(s:{},f:{})", format_symbol(symbol), self.frequency)]
            }
            NodeKind::Inner { left, right } => {
                let left_box: Vec<String> = tree.nodes[left].get_string(tree);
                let right_box: Vec<String> = tree.nodes[right].get_string(tree);
                let left_width = left_box[0].chars().count();
                let right_width = right_box[0].chars().count();
                let mut result: Vec<String> = Vec::new();

                result.push(format!(
                    "{}•{}",
                    SPACE.repeat(left_width),
                    SPACE.repeat(right_width)
                ));
                result.push(format!(
                    "{}║{}",
                    SPACE.repeat(left_width),
                    SPACE.repeat(right_width)
                ));

                let left_pos = label_center(&left_box[0]);
                let right_pos = label_center(&right_box[0]);
                result.push(format!(
                    "{}╔{}╩{}╗{}",
                    SPACE.repeat(left_pos),
                    BOX_DRAWINGS_DOUBLE_HORIZONTAL.repeat(left_width - left_pos - 1),
                    BOX_DRAWINGS_DOUBLE_HORIZONTAL.repeat(right_pos),
                    SPACE.repeat(right_width - right_pos - 1)
                ));

                let left_depth = left_box.len();
                let right_depth = right_box.len();
                for i in 0..std::cmp::max(left_depth, right_depth) {
                    let left_str = left_box
                        .get(i)
                        .cloned()
                        .unwrap_or_else(|| SPACE.repeat(left_width));
                    let right_str = right_box
                        .get(i)
                        .cloned()
                        .unwrap_or_else(|| SPACE.repeat(right_width));
                    result.push(format!("{} {}", left_str, right_str));
                }
                result
            }
        }
    }
}

impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(root_index) = self.root_index else {
            return writeln!(f, "(empty)");
        };
        let strs = self.nodes[root_index].get_string(self);
        for s in strs.iter() {
            writeln!(f, "{}", s)?;
        }
        Ok(())
    }
}
