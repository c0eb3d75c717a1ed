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

#![cfg(test)]

use super::*;

#[test]
fn offsets() {
    let mut table = SymbolTable::new(112);
    assert_eq!(table.add_symbol("a", None, false).offset, 112);
    assert_eq!(table.add_symbol("b", Some(10), false).offset, 116);
    assert_eq!(table.add_symbol("c", None, false).offset, 156);
    assert_eq!(table.offset(), 160);
}

#[test]
fn array_parameters_take_one_cell() {
    let mut table = SymbolTable::new(0);
    let array = table.add_symbol("array", Some(0), true);
    assert!(array.is_array());
    assert_eq!(array.size(), 4);
    assert_eq!(table.add_symbol("n", None, true).offset, 4);
}

#[test]
fn scopes() {
    let mut table = SymbolTable::new(0);
    table.add_symbol("x", None, true);
    table.push_empty_stack();
    table.add_symbol("y", Some(3), false);
    table.push_empty_stack();
    let shadow = table.add_symbol("x", None, false);
    assert_eq!(table.get_symbol("x"), Some(shadow));
    assert_eq!(table.depth(), 3);
    assert_eq!(table.pop_stack(), 4);
    assert_eq!(table.get_symbol("x").map(|symbol| symbol.offset), Some(0));
    assert_eq!(table.get_symbol("y").map(|symbol| symbol.offset), Some(4));
    assert_eq!(table.pop_stack(), 12);
    assert_eq!(table.get_symbol("y"), None);
    assert_eq!(table.pop_stack(), 0);
    assert_eq!(table.depth(), 1);
    assert_eq!(table.offset(), 4);
}
