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

use assert_json_diff::assert_json_eq;
use serde_json::json;

#[test]
fn render() {
    let mut tree = ParseTree::new("Program");
    let list = tree.add_child(tree.root(), "Declaration-list");
    let declaration = tree.add_child(list, "Declaration");
    tree.add_child(declaration, "(KEYWORD, int)");
    tree.add_child(list, "epsilon");
    tree.add_child(tree.root(), "$");
    assert_eq!(
        tree.to_string(),
        "Program
├── Declaration-list
│   ├── Declaration
│   │   └── (KEYWORD, int)
│   └── epsilon
└── $
"
    );
}

#[test]
fn clear_unused_stops_at_ancestor_with_children() {
    let mut tree = ParseTree::new("Program");
    let declaration = tree.add_child(tree.root(), "Declaration");
    tree.add_child(declaration, "Declaration-initial");
    let prime = tree.add_child(declaration, "Declaration-prime");
    let var = tree.add_child(prime, "Var-declaration-prime");
    let semicolon = tree.add_child(var, ";");
    tree.clear_unused(semicolon);
    assert_json_eq!(
        tree,
        json!({"Program": [{"Declaration": ["Declaration-initial"]}]})
    );
}

#[test]
fn clear_unused_keeps_root() {
    let mut tree = ParseTree::new("Program");
    let list = tree.add_child(tree.root(), "Declaration-list");
    tree.clear_unused(list);
    assert_json_eq!(tree, json!("Program"));
    assert_eq!(tree.leaves(), [tree.root()]);
}

#[test]
fn leaves_in_order() {
    let mut tree = ParseTree::new("A");
    let b = tree.add_child(tree.root(), "B");
    let c = tree.add_child(b, "c");
    let d = tree.add_child(tree.root(), "d");
    let e = tree.add_child(b, "e");
    assert_eq!(tree.leaves(), [c, e, d]);
}
