//! Barnes–Hut quadtree for approximate n-body repulsion.
//!
//! Cells far enough away (width / distance < theta) act as a single body at
//! their center of mass; everything else recurses. Used by the force phase
//! once the graph outgrows the all-pairs threshold.

use crate::geom::{Point, Vector, point, vector};

const MAX_DEPTH: usize = 32;

#[derive(Debug, Clone)]
struct Cell {
    center: Point,
    half: f64,
    mass: f64,
    weighted: Vector,
    children: Option<[usize; 4]>,
    body: Option<usize>,
}

impl Cell {
    fn new(center: Point, half: f64) -> Self {
        Self {
            center,
            half,
            mass: 0.0,
            weighted: vector(0.0, 0.0),
            children: None,
            body: None,
        }
    }

    fn quadrant(&self, p: Point) -> usize {
        let mut q = 0;
        if p.x > self.center.x {
            q |= 1;
        }
        if p.y > self.center.y {
            q |= 2;
        }
        q
    }

    fn child_center(&self, q: usize) -> Point {
        let h = self.half / 2.0;
        point(
            self.center.x + if q & 1 == 1 { h } else { -h },
            self.center.y + if q & 2 == 2 { h } else { -h },
        )
    }
}

#[derive(Debug, Clone)]
pub struct QuadTree {
    cells: Vec<Cell>,
    points: Vec<Point>,
    masses: Vec<f64>,
}

impl QuadTree {
    pub fn build(points: &[Point], masses: &[f64]) -> Self {
        let mut min = point(f64::MAX, f64::MAX);
        let mut max = point(f64::MIN, f64::MIN);
        for p in points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        let center = point((min.x + max.x) / 2.0, (min.y + max.y) / 2.0);
        let half = ((max.x - min.x).max(max.y - min.y) / 2.0).max(1.0);

        let mut tree = Self {
            cells: vec![Cell::new(center, half)],
            points: points.to_vec(),
            masses: masses.to_vec(),
        };
        for i in 0..tree.points.len() {
            tree.insert(0, i, 0);
        }
        tree
    }

    fn insert(&mut self, cell: usize, body: usize, depth: usize) {
        let p = self.points[body];
        let mass = self.masses[body];
        self.cells[cell].mass += mass;
        self.cells[cell].weighted += p.to_vector() * mass;

        if self.cells[cell].children.is_none() {
            match self.cells[cell].body {
                None => {
                    self.cells[cell].body = Some(body);
                    return;
                }
                // Coincident or over-deep bodies stay stacked in one leaf;
                // their mutual force is resolved by collision avoidance.
                Some(_) if depth >= MAX_DEPTH => return,
                Some(old) => {
                    // The parent keeps the aggregate it already counted for
                    // `old`; only the child subtree gains it here.
                    self.split(cell);
                    let old_p = self.points[old];
                    let q = self.cells[cell].quadrant(old_p);
                    let child = self.cells[cell].children.expect("just split")[q];
                    self.insert(child, old, depth + 1);
                }
            }
        }

        let q = self.cells[cell].quadrant(p);
        let child = self.cells[cell].children.expect("split above")[q];
        self.insert(child, body, depth + 1);
    }

    fn split(&mut self, cell: usize) {
        let mut indices = [0usize; 4];
        for (q, slot) in indices.iter_mut().enumerate() {
            let c = self.cells[cell].child_center(q);
            let h = self.cells[cell].half / 2.0;
            *slot = self.cells.len();
            self.cells.push(Cell::new(c, h));
        }
        self.cells[cell].children = Some(indices);
        self.cells[cell].body = None;
    }

    /// Approximate inverse-square repulsion exerted on `p` by every body
    /// except those coincident with it.
    pub fn repulsion_at(&self, p: Point, theta: f64, strength: f64) -> Vector {
        let mut force = vector(0.0, 0.0);
        let mut stack = vec![0usize];
        while let Some(i) = stack.pop() {
            let cell = &self.cells[i];
            if cell.mass == 0.0 {
                continue;
            }
            let com = (cell.weighted / cell.mass).to_point();
            let delta = p - com;
            let dist = delta.length();

            let is_leaf = cell.children.is_none();
            if is_leaf || (cell.half * 2.0) / dist.max(1e-9) < theta {
                if dist < 1e-9 {
                    continue;
                }
                let d = dist.max(1.0);
                force += delta / dist * (strength * cell.mass / (d * d));
            } else if let Some(children) = cell.children {
                stack.extend(children);
            }
        }
        force
    }
}
