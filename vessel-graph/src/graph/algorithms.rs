//! Structural queries: components, branch cores and cliques.

use std::collections::BTreeSet;

use super::types::VesselGraph;

impl VesselGraph {
    /// Connected components, each sorted, ordered by smallest member
    pub fn connected_components(&self) -> Vec<Vec<usize>> {
        let all = vec![true; self.vertex_count()];
        self.induced_components(&all)
    }

    /// Connected components of the subgraph induced by `mask`
    pub fn induced_components(&self, mask: &[bool]) -> Vec<Vec<usize>> {
        let n = self.vertex_count();
        let mut seen = vec![false; n];
        let mut components = Vec::new();
        let mut stack = Vec::new();

        for start in 0..n {
            if seen[start] || !mask[start] {
                continue;
            }
            seen[start] = true;
            stack.push(start);
            let mut component = Vec::new();
            while let Some(v) = stack.pop() {
                component.push(v);
                for u in self.neighbors(v) {
                    if mask[u] && !seen[u] {
                        seen[u] = true;
                        stack.push(u);
                    }
                }
            }
            component.sort_unstable();
            components.push(component);
        }
        components
    }

    /// Branch cores: vertices of degree > 2 that keep at least two such
    /// neighbors after repeatedly stripping those that don't.
    ///
    /// Returns a membership mask.
    pub fn branch_cores(&self) -> Vec<bool> {
        let n = self.vertex_count();
        let mut mask: Vec<bool> = (0..n).map(|v| self.degree(v) > 2).collect();
        let mut inner: Vec<usize> = (0..n)
            .map(|v| {
                if mask[v] {
                    self.neighbors(v).filter(|&u| u != v && mask[u]).count()
                } else {
                    0
                }
            })
            .collect();

        let mut queue: Vec<usize> = (0..n).filter(|&v| mask[v] && inner[v] < 2).collect();
        while let Some(v) = queue.pop() {
            if !mask[v] {
                continue;
            }
            mask[v] = false;
            for u in self.neighbors(v) {
                if u != v && mask[u] {
                    inner[u] -= 1;
                    if inner[u] < 2 {
                        queue.push(u);
                    }
                }
            }
        }
        mask
    }

    /// Maximal cliques of the subgraph induced by `mask` whose size lies in
    /// `min_size..=max_size`. Each clique is sorted.
    pub fn maximal_cliques(
        &self,
        mask: &[bool],
        min_size: usize,
        max_size: usize,
    ) -> Vec<Vec<usize>> {
        let adjacency: Vec<BTreeSet<usize>> = (0..self.vertex_count())
            .map(|v| {
                if mask[v] {
                    self.neighbors(v).filter(|&u| u != v && mask[u]).collect()
                } else {
                    BTreeSet::new()
                }
            })
            .collect();

        let mut cliques = Vec::new();
        for component in self.induced_components(mask) {
            if component.len() < min_size {
                continue;
            }
            let candidates: BTreeSet<usize> = component.into_iter().collect();
            bron_kerbosch(
                &adjacency,
                &mut Vec::new(),
                candidates,
                BTreeSet::new(),
                &mut cliques,
            );
        }
        cliques.retain(|c| (min_size..=max_size).contains(&c.len()));
        cliques
    }
}

/// Bron–Kerbosch with Tomita pivoting
fn bron_kerbosch(
    adjacency: &[BTreeSet<usize>],
    current: &mut Vec<usize>,
    mut candidates: BTreeSet<usize>,
    mut excluded: BTreeSet<usize>,
    out: &mut Vec<Vec<usize>>,
) {
    if candidates.is_empty() {
        if excluded.is_empty() {
            let mut clique = current.clone();
            clique.sort_unstable();
            out.push(clique);
        }
        return;
    }

    let pivot = candidates
        .iter()
        .chain(excluded.iter())
        .copied()
        .max_by_key(|&u| adjacency[u].intersection(&candidates).count());
    let Some(pivot) = pivot else {
        return;
    };

    let branch: Vec<usize> = candidates.difference(&adjacency[pivot]).copied().collect();
    for v in branch {
        let next_candidates = candidates.intersection(&adjacency[v]).copied().collect();
        let next_excluded = excluded.intersection(&adjacency[v]).copied().collect();
        current.push(v);
        bron_kerbosch(adjacency, current, next_candidates, next_excluded, out);
        current.pop();
        candidates.remove(&v);
        excluded.insert(v);
    }
}
