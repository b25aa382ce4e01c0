//! `Word`: the doubly-linked list (arena + indices) of `Symbol`s BPE merges
//! operate on, and the priority-queue merge loop itself -- spec.md 4.5/9.
//! `prev`/`next` are indices into `Word::symbols`, not pointers, so merging
//! never needs to fight the borrow checker over a cyclic structure.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use rand::Rng;

use crate::tokenizer::Token;

pub(super) type Pair = (u32, u32);

/// One surviving or tombstoned symbol. `len` is the number of *original
/// text* bytes this symbol stands for (not the byte length of its vocab
/// string, which may carry a prefix/suffix) -- `word_to_tokens` sums `len`
/// across surviving symbols to recover offsets. A tombstoned symbol (one
/// absorbed by its left neighbor during a merge) has `len == 0`.
#[derive(Debug, Clone, Copy)]
pub(super) struct Symbol {
    pub id: u32,
    pub prev: isize,
    pub next: isize,
    pub len: usize,
}

impl Symbol {
    fn is_tombstone(&self) -> bool {
        self.len == 0
    }
}

#[derive(Debug, Clone)]
pub(super) struct Word {
    symbols: Vec<Symbol>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
struct Merge {
    pos: usize,
    rank: u32,
    new_id: u32,
}

impl Ord for Merge {
    fn cmp(&self, other: &Self) -> Ordering {
        // Smaller rank sorts first (higher priority); `BinaryHeap` is a
        // max-heap so we reverse the rank comparison. Ties broken by the
        // leftmost position, for determinism.
        other
            .rank
            .cmp(&self.rank)
            .then_with(|| other.pos.cmp(&self.pos))
    }
}

impl PartialOrd for Merge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Word {
    pub(super) fn new() -> Self {
        Word { symbols: vec![] }
    }

    pub(super) fn add(&mut self, id: u32, len: usize) {
        let prev = self.symbols.len() as isize - 1;
        if let Some(last) = self.symbols.last_mut() {
            last.next = self.symbols.len() as isize;
        }
        self.symbols.push(Symbol {
            id,
            prev,
            next: -1,
            len,
        });
    }

    /// Adds an unk-token symbol. With `fuse` on, a run of consecutive unk
    /// symbols collapses into one wider symbol instead of repeating the
    /// unk token once per source character -- spec.md 4.5 `fuse_unk`.
    pub(super) fn add_unk(&mut self, id: u32, len: usize, fuse: bool) {
        if fuse {
            if let Some(last) = self.symbols.last_mut() {
                if last.id == id {
                    last.len += len;
                    return;
                }
            }
        }
        self.add(id, len);
    }

    /// Merges every adjacent pair found in `merges`, highest priority
    /// (lowest rank) first, optionally dropping candidates at random
    /// (`dropout`) and re-enqueuing them once a non-dropped candidate is
    /// processed -- spec.md 4.5.
    pub(super) fn merge_all(&mut self, merges: &HashMap<Pair, (u32, u32)>, dropout: Option<f32>) {
        let mut queue = BinaryHeap::with_capacity(self.symbols.len());
        for i in 0..self.symbols.len().saturating_sub(1) {
            if let Some(&(rank, new_id)) = merges.get(&(self.symbols[i].id, self.symbols[i + 1].id)) {
                queue.push(Merge { pos: i, rank, new_id });
            }
        }

        let mut skip = Vec::new();
        let mut rng = rand::thread_rng();

        while let Some(top) = queue.pop() {
            if let Some(dropout) = dropout {
                if dropout > 0.0 && rng.gen::<f32>() < dropout {
                    skip.push(top);
                    continue;
                }
            }
            queue.extend(skip.drain(..));

            if self.symbols[top.pos].is_tombstone() {
                continue;
            }
            let next_pos = self.symbols[top.pos].next;
            if next_pos < 0 {
                continue;
            }
            let next_pos = next_pos as usize;
            if self.symbols[next_pos].is_tombstone() {
                continue;
            }
            let pair = (self.symbols[top.pos].id, self.symbols[next_pos].id);
            match merges.get(&pair) {
                Some(&(rank, new_id)) if rank == top.rank && new_id == top.new_id => {}
                _ => continue,
            }

            let merged_len = self.symbols[top.pos].len + self.symbols[next_pos].len;
            let merged_next = self.symbols[next_pos].next;
            let merged_prev = self.symbols[top.pos].prev;
            self.symbols[top.pos] = Symbol {
                id: top.new_id,
                prev: merged_prev,
                next: merged_next,
                len: merged_len,
            };
            self.symbols[next_pos] = Symbol {
                id: 0,
                prev: -1,
                next: -1,
                len: 0,
            };
            if merged_next >= 0 {
                self.symbols[merged_next as usize].prev = top.pos as isize;
            }

            if merged_prev >= 0 {
                let prev_pos = merged_prev as usize;
                if let Some(&(rank, new_id)) =
                    merges.get(&(self.symbols[prev_pos].id, self.symbols[top.pos].id))
                {
                    queue.push(Merge {
                        pos: prev_pos,
                        rank,
                        new_id,
                    });
                }
            }
            if merged_next >= 0 {
                let next_pos = merged_next as usize;
                if let Some(&(rank, new_id)) =
                    merges.get(&(self.symbols[top.pos].id, self.symbols[next_pos].id))
                {
                    queue.push(Merge {
                        pos: top.pos,
                        rank,
                        new_id,
                    });
                }
            }
        }
    }

    /// Walks surviving (non-tombstoned) symbols in order, resolving each id
    /// to its surface string and accumulating byte offsets into the text
    /// `merge_word` was built from.
    pub(super) fn to_tokens(&self, vocab_r: &HashMap<u32, String>) -> Vec<Token> {
        let mut pos = 0usize;
        let mut out = Vec::with_capacity(self.symbols.len());
        for symbol in &self.symbols {
            if symbol.is_tombstone() {
                continue;
            }
            let value = vocab_r.get(&symbol.id).cloned().unwrap_or_default();
            out.push(Token::new(symbol.id, value, (pos, pos + symbol.len)));
            pos += symbol.len;
        }
        out
    }

    #[cfg(test)]
    pub(super) fn len(&self) -> usize {
        self.symbols.iter().filter(|s| !s.is_tombstone()).count()
    }
}
