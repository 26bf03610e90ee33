use crate::math::knn::Neighbor;

#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    pub fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }

    /// Component id per element, numbered in order of first appearance.
    pub fn labels(&mut self) -> (Vec<usize>, usize) {
        let n = self.parent.len();
        let mut root_to_label = vec![usize::MAX; n];
        let mut labels = Vec::with_capacity(n);
        let mut next = 0usize;
        for i in 0..n {
            let root = self.find(i);
            if root_to_label[root] == usize::MAX {
                root_to_label[root] = next;
                next += 1;
            }
            labels.push(root_to_label[root]);
        }
        (labels, next)
    }
}

/// Connected components of the symmetrised kNN graph.
pub fn knn_components(neighbors: &[Vec<Neighbor>]) -> (Vec<usize>, usize) {
    let mut uf = UnionFind::new(neighbors.len());
    for (i, list) in neighbors.iter().enumerate() {
        for nb in list {
            uf.union(i, nb.index);
        }
    }
    uf.labels()
}
