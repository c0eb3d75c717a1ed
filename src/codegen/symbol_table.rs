/*
 * Copyright (c) 2023-2025 Atsushi Komaba
 *
 * This file is part of Cminus.
 * Cminus is free software: you can redistribute it and/or
 * modify it under the terms of the GNU General Public License
 * as published by the Free Software Foundation, either version 3
 * of the License, or any later version.
 *
 * Cminus is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Cminus. If not, see <https://www.gnu.org/licenses/>.
 */

/*!
 * Scoped symbol tables mapping names to byte offsets.
 */

mod tests;

use std::collections::HashMap;

use crate::ir::WORD;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Symbol {
    pub offset: u32,
    /**
     * `Some(size)` for arrays. An array parameter has size 0 and occupies
     * one cell holding the address of the array.
     */
    pub array_size: Option<u32>,
    pub is_parameter: bool,
}

impl Symbol {
    pub fn is_array(&self) -> bool {
        self.array_size.is_some()
    }
    /**
     * The number of bytes the symbol occupies.
     */
    pub fn size(&self) -> u32 {
        match self.array_size {
            Some(size) if !self.is_parameter => WORD * size,
            _ => WORD,
        }
    }
}

#[derive(Debug)]
struct Frame {
    symbols: HashMap<String, Symbol>,
    start_offset: u32,
}

/**
 * A stack of scope frames. Offsets grow from the base offset in
 * declaration order and are given back when a frame is popped.
 */
#[derive(Debug)]
pub struct SymbolTable {
    frames: Vec<Frame>,
    offset: u32,
}

impl SymbolTable {
    pub fn new(base_offset: u32) -> SymbolTable {
        SymbolTable {
            frames: vec![Frame {
                symbols: HashMap::new(),
                start_offset: base_offset,
            }],
            offset: base_offset,
        }
    }
    /**
     * Adds a symbol to the innermost frame at the next free offset and
     * returns it. A symbol of the same name in that frame is replaced.
     */
    pub fn add_symbol(
        &mut self,
        name: impl Into<String>,
        array_size: Option<u32>,
        is_parameter: bool,
    ) -> Symbol {
        let symbol = Symbol {
            offset: self.offset,
            array_size,
            is_parameter,
        };
        self.offset += symbol.size();
        if let Some(frame) = self.frames.last_mut() {
            frame.symbols.insert(name.into(), symbol);
        }
        symbol
    }
    /**
     * Looks a name up, innermost frame first.
     */
    pub fn get_symbol(&self, name: &str) -> Option<Symbol> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.symbols.get(name).copied())
    }
    pub fn push_empty_stack(&mut self) {
        self.frames.push(Frame {
            symbols: HashMap::new(),
            start_offset: self.offset,
        });
    }
    /**
     * Drops the innermost frame and returns the number of bytes its symbols
     * occupied. The outermost frame is never dropped.
     */
    pub fn pop_stack(&mut self) -> u32 {
        if self.frames.len() == 1 {
            return 0;
        }
        let Some(frame) = self.frames.pop() else {
            return 0;
        };
        let freed = self.offset - frame.start_offset;
        self.offset = frame.start_offset;
        freed
    }
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
    /**
     * The offset the next symbol will get.
     */
    pub fn offset(&self) -> u32 {
        self.offset
    }
}
