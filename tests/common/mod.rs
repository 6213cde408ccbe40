#![allow(dead_code)]
use std::sync::Arc;

use gerrysample::{Graph, GraphBuilder, UnitRecord};

/// `width` x `height` grid with ids "r{row}c{col}". Party "A" is stronger in the left half.
pub fn grid(width: usize, height: usize, pop: u64) -> Arc<Graph> {
    let mut builder = GraphBuilder::new(["A", "B"]);
    for r in 0..height {
        for c in 0..width {
            let mut neighbors = Vec::new();
            if r > 0 { neighbors.push(format!("r{}c{}", r - 1, c)) }
            if r + 1 < height { neighbors.push(format!("r{}c{}", r + 1, c)) }
            if c > 0 { neighbors.push(format!("r{}c{}", r, c - 1)) }
            if c + 1 < width { neighbors.push(format!("r{}c{}", r, c + 1)) }
            let a = if c < width / 2 { pop * 3 / 5 } else { pop * 2 / 5 };
            builder.add_unit(
                format!("r{r}c{c}"),
                UnitRecord::new(pop).with_votes("A", a).with_votes("B", pop - a).with_neighbors(neighbors),
            );
        }
    }
    Arc::new(builder.build().unwrap())
}

/// Assignment of grid units to `num_districts` vertical strips of equal width.
pub fn strips(width: usize, height: usize, num_districts: usize) -> Vec<(String, u32)> {
    (0..height)
        .flat_map(|r| (0..width).map(move |c| (format!("r{r}c{c}"), (c * num_districts / width) as u32 + 1)))
        .collect()
}
