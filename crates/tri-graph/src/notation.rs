//! Compact text notation for particle graphs.
//!
//! ```text
//! graph  := part (';' part)*
//! part   := run (',' run)*
//! run    := vtx (edge vtx)*
//! vtx    := digits '^'*
//! edge   := glyph+
//! ```
//!
//! Each `^` adds a negative loop; whatever capacity a vertex has left is
//! closed with positive loops. Vertex ids are local to their part and must be
//! dense; later parts are renumbered after earlier ones.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use tri_core::errors::{ErrorInfo, TriError};
use tri_core::{Sign, VtxId, MAX_VTX, VTX_CAPACITY};

use crate::graph::{Graph, Primitive, Units};

/// Parses the text notation into a validated [`Graph`].
pub fn parse_graph(text: &str) -> Result<Graph, TriError> {
    let parts = text
        .split(';')
        .map(parse_part)
        .collect::<Result<Vec<_>, _>>()?;
    Graph::concat_all(&parts)
}

/// Unit counts contributed by an edge glyph, or `None` if the char is not a glyph.
fn glyph_units(ch: char) -> Option<Units> {
    let units = match ch {
        '-' => Units::new(1, 0),
        '~' => Units::new(0, 1),
        '=' => Units::new(2, 0),
        '≃' => Units::new(1, 1),
        '≈' => Units::new(0, 2),
        '≡' => Units::new(3, 0),
        '≅' => Units::new(2, 1),
        '≊' => Units::new(1, 2),
        '≋' => Units::new(0, 3),
        _ => return None,
    };
    Some(units)
}

fn parse_part(text: &str) -> Result<Graph, TriError> {
    let mut neg_loops: BTreeMap<u32, u8> = BTreeMap::new();
    let mut bonds: BTreeMap<(u32, u32), Units> = BTreeMap::new();

    for run in text.split(',') {
        let mut chars = run.chars().filter(|ch| !ch.is_whitespace()).peekable();
        if chars.peek().is_none() {
            return Err(notation_error("notation.empty_run", "empty run", text));
        }
        let mut prev = read_vertex(&mut chars, &mut neg_loops, text)?;
        while chars.peek().is_some() {
            let mut units = Units::default();
            while let Some(glyph) = chars.peek().copied().and_then(glyph_units) {
                units.pos += glyph.pos;
                units.neg += glyph.neg;
                chars.next();
                if units.total() > VTX_CAPACITY {
                    return Err(notation_error(
                        "notation.edge",
                        "edge carries more than three units",
                        text,
                    ));
                }
            }
            if units.is_empty() {
                let found = chars.peek().copied().unwrap_or(' ');
                return Err(notation_error(
                    "notation.token",
                    format!("unexpected character '{found}'"),
                    text,
                ));
            }
            let next = read_vertex(&mut chars, &mut neg_loops, text)?;
            let key = (prev.min(next), prev.max(next));
            if key.0 == key.1 {
                return Err(notation_error(
                    "notation.self_edge",
                    format!("vertex {prev} is joined to itself"),
                    text,
                ));
            }
            let bond = bonds.entry(key).or_default();
            bond.pos += units.pos;
            bond.neg += units.neg;
            if bond.total() > VTX_CAPACITY {
                return Err(notation_error(
                    "notation.edge",
                    format!("vertices {} and {} share more than three units", key.0, key.1),
                    text,
                ));
            }
            prev = next;
        }
    }

    let n = neg_loops.len();
    if n > MAX_VTX {
        return Err(TriError::too_many_vertices(n, MAX_VTX));
    }
    if neg_loops.keys().next_back().copied() != Some(n as u32) {
        return Err(notation_error(
            "notation.sparse_ids",
            format!("vertex ids must be exactly 1..={n}"),
            text,
        ));
    }

    let mut used = vec![0u8; n];
    let mut primitives = Vec::new();
    for (&(a, b), units) in &bonds {
        for (count, sign) in [(units.pos, Sign::Pos), (units.neg, Sign::Neg)] {
            if count > 0 {
                primitives.push(Primitive::edge(a as u8, b as u8, count, sign));
            }
        }
        used[(a - 1) as usize] += units.total();
        used[(b - 1) as usize] += units.total();
    }
    for (&vtx, &neg) in &neg_loops {
        let taken = used[(vtx - 1) as usize].saturating_add(neg);
        if taken > VTX_CAPACITY {
            return Err(TriError::Structural(
                ErrorInfo::new(
                    "graph.degree",
                    format!("vertex {vtx} carries {taken} connection units, expected 3"),
                )
                .with_context("vtx", vtx.to_string())
                .with_context("units", taken.to_string()),
            ));
        }
        primitives.push(Primitive::loops(vtx as u8, neg, Sign::Neg));
        primitives.push(Primitive::loops(vtx as u8, VTX_CAPACITY - taken, Sign::Pos));
    }
    Graph::from_primitives(n, primitives)
}

fn read_vertex<I>(
    chars: &mut std::iter::Peekable<I>,
    neg_loops: &mut BTreeMap<u32, u8>,
    text: &str,
) -> Result<u32, TriError>
where
    I: Iterator<Item = char>,
{
    let mut digits = String::new();
    while let Some(ch) = chars.peek().copied().filter(char::is_ascii_digit) {
        digits.push(ch);
        chars.next();
    }
    let id: u32 = digits
        .parse()
        .map_err(|_| notation_error("notation.vertex", "expected a vertex id", text))?;
    if id == 0 || id as usize > MAX_VTX {
        return Err(notation_error(
            "notation.vertex",
            format!("vertex id {id} is outside 1..={MAX_VTX}"),
            text,
        ));
    }
    let carets = neg_loops.entry(id).or_insert(0);
    while chars.peek() == Some(&'^') {
        chars.next();
        *carets = carets.saturating_add(1);
    }
    Ok(id)
}

fn notation_error(code: &str, message: impl Into<String>, text: &str) -> TriError {
    TriError::Notation(ErrorInfo::new(code, message).with_context("input", text.trim()))
}

fn push_glyphs(out: &mut String, units: Units) {
    out.extend(std::iter::repeat('-').take(usize::from(units.pos)));
    out.extend(std::iter::repeat('~').take(usize::from(units.neg)));
}

impl fmt::Display for Graph {
    /// Prints one run per bond (`a-b`), then every vertex without bonds on its own.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut mentioned = vec![false; self.num_verts()];
        let mut runs: Vec<String> = Vec::new();
        let vertex = |out: &mut String, vtx: VtxId, mentioned: &mut Vec<bool>| {
            out.push_str(&vtx.as_raw().to_string());
            if !mentioned[vtx.index()] {
                mentioned[vtx.index()] = true;
                let carets = usize::from(self.loops(vtx).neg);
                out.extend(std::iter::repeat('^').take(carets));
            }
        };
        for bond in self.bonds() {
            let mut run = String::new();
            vertex(&mut run, bond.a, &mut mentioned);
            push_glyphs(&mut run, bond.units);
            vertex(&mut run, bond.b, &mut mentioned);
            runs.push(run);
        }
        for idx in 0..self.num_verts() {
            if !mentioned[idx] {
                let mut run = String::new();
                vertex(&mut run, VtxId::from_index(idx), &mut mentioned);
                runs.push(run);
            }
        }
        write!(f, "{}", runs.join(", "))
    }
}

impl FromStr for Graph {
    type Err = TriError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        parse_graph(text)
    }
}
