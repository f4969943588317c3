//! Enumeration of all perfect matchings of a bipartite graph (Uno, 1997).
//!
//! Both sides hold `n` nodes labelled `0..n`. A matching is a `Vec<usize>`
//! mapping each left node to its right partner.

#[derive(Debug, Clone)]
struct Subproblem {
    adj: Vec<Vec<bool>>,
    fixed_left: Vec<bool>,
    fixed_right: Vec<bool>,
    matching: Vec<usize>,
}

impl Subproblem {
    /// Finds a cycle alternating between non-matching and matching edges.
    ///
    /// Walks a graph over right nodes where `r -> matching[l]` whenever `l` is
    /// adjacent to `r` but not matched to it. Returns the cycle as the new
    /// `(left, right)` edges that swapping along it would create.
    fn alternating_cycle(&self) -> Option<Vec<(usize, usize)>> {
        let n = self.matching.len();
        let mut state = vec![0u8; n];
        for start in 0..n {
            if self.fixed_right[start] || state[start] != 0 {
                continue;
            }
            let mut path = vec![start];
            let mut via: Vec<usize> = Vec::new();
            let mut cursor = vec![0usize];
            state[start] = 1;

            while let Some(&r) = path.last() {
                let top = path.len() - 1;
                let mut advanced = false;
                while cursor[top] < n {
                    let l = cursor[top];
                    cursor[top] += 1;
                    if self.fixed_left[l] || !self.adj[l][r] || self.matching[l] == r {
                        continue;
                    }
                    let next = self.matching[l];
                    match state[next] {
                        1 => {
                            let pos = path.iter().position(|&x| x == next)?;
                            let mut cycle: Vec<(usize, usize)> =
                                (pos..top).map(|k| (via[k], path[k])).collect();
                            cycle.push((l, r));
                            return Some(cycle);
                        }
                        0 => {
                            state[next] = 1;
                            via.push(l);
                            path.push(next);
                            cursor.push(0);
                            advanced = true;
                            break;
                        }
                        _ => {}
                    }
                }
                if !advanced {
                    state[r] = 2;
                    path.pop();
                    cursor.pop();
                    via.pop();
                }
            }
        }
        None
    }
}

/// Lazy iterator over every perfect matching, the seed first.
#[derive(Debug, Clone)]
pub struct PerfectMatchings {
    seed: Option<Vec<usize>>,
    stack: Vec<Subproblem>,
}

impl Iterator for PerfectMatchings {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(seed) = self.seed.take() {
            return Some(seed);
        }
        while let Some(sub) = self.stack.pop() {
            let Some(cycle) = sub.alternating_cycle() else {
                continue;
            };
            let (el, _) = cycle[0];
            let er = sub.matching[el];

            let mut swapped = sub.matching.clone();
            for &(l, r) in &cycle {
                swapped[l] = r;
            }

            // Matchings containing (el, er): drop both endpoints, keep the old matching.
            let mut with_edge = sub.clone();
            with_edge.fixed_left[el] = true;
            with_edge.fixed_right[er] = true;

            // Matchings avoiding (el, er): drop the edge, continue from the swapped one.
            let mut without_edge = sub;
            without_edge.adj[el][er] = false;
            without_edge.matching = swapped.clone();

            self.stack.push(with_edge);
            self.stack.push(without_edge);
            return Some(swapped);
        }
        None
    }
}

/// Enumerates all perfect matchings of the bipartite graph with `n` nodes per
/// side and the given `(left, right)` edges, starting from a known perfect
/// matching `seed` (`seed[left] = right`).
///
/// Returns `None` if `seed` is not a perfect matching over `edges`.
pub fn all_perfect_matchings(
    n: usize,
    edges: &[(usize, usize)],
    seed: &[usize],
) -> Option<PerfectMatchings> {
    let mut adj = vec![vec![false; n]; n];
    for &(l, r) in edges {
        if l >= n || r >= n {
            return None;
        }
        adj[l][r] = true;
    }
    if seed.len() != n {
        return None;
    }
    let mut taken = vec![false; n];
    for (l, &r) in seed.iter().enumerate() {
        if r >= n || taken[r] || !adj[l][r] {
            return None;
        }
        taken[r] = true;
    }

    Some(PerfectMatchings {
        seed: Some(seed.to_vec()),
        stack: vec![Subproblem {
            adj,
            fixed_left: vec![false; n],
            fixed_right: vec![false; n],
            matching: seed.to_vec(),
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn complete(n: usize) -> Vec<(usize, usize)> {
        (0..n).flat_map(|l| (0..n).map(move |r| (l, r))).collect()
    }

    fn collect(n: usize, edges: &[(usize, usize)], seed: &[usize]) -> Vec<Vec<usize>> {
        all_perfect_matchings(n, edges, seed).unwrap().collect()
    }

    fn assert_distinct(matchings: &[Vec<usize>]) {
        let set: HashSet<&Vec<usize>> = matchings.iter().collect();
        assert_eq!(set.len(), matchings.len(), "duplicates in {matchings:?}");
    }

    #[test]
    fn complete_graphs_yield_every_permutation() {
        let two = collect(2, &complete(2), &[0, 1]);
        assert_eq!(two.len(), 2);
        assert_eq!(two[0], vec![0, 1]);
        assert_distinct(&two);

        let three = collect(3, &complete(3), &[2, 0, 1]);
        assert_eq!(three.len(), 6);
        assert_distinct(&three);

        let four = collect(4, &complete(4), &[0, 1, 2, 3]);
        assert_eq!(four.len(), 24);
        assert_distinct(&four);
    }

    #[test]
    fn unique_matching_yields_only_the_seed() {
        let edges = [(0, 0), (1, 1), (1, 0), (2, 2)];
        assert_eq!(collect(3, &edges, &[0, 1, 2]), vec![vec![0, 1, 2]]);
    }

    #[test]
    fn enumerates_the_six_cycle_example() {
        // Left {1,3,5,7} and right {2,4,6,8} relabelled to 0..4.
        let raw = [
            (1, 2), (1, 4), (1, 6), (3, 4), (3, 6), (3, 8),
            (5, 6), (5, 8), (5, 2), (7, 8), (7, 2), (7, 4),
        ];
        let edges: Vec<(usize, usize)> = raw.iter().map(|&(l, r)| ((l - 1) / 2, r / 2 - 1)).collect();
        let found = collect(4, &edges, &[0, 1, 2, 3]);
        assert_eq!(found.len(), 9);
        assert_distinct(&found);
        assert!(found.contains(&vec![2, 3, 0, 1]));
    }

    #[test]
    fn enumerates_independent_swaps() {
        let edges = [
            (0, 0), (0, 1), (1, 5), (1, 6), (2, 0), (2, 1), (3, 5), (3, 6),
            (4, 2), (4, 3), (5, 2), (5, 3), (6, 4), (6, 7), (7, 4), (7, 7),
        ];
        let seed = [0, 6, 1, 5, 2, 3, 4, 7];
        let found = collect(8, &edges, &seed);
        assert_eq!(found.len(), 16);
        assert_distinct(&found);
        for m in &found {
            assert!(m.iter().enumerate().all(|(l, &r)| edges.contains(&(l, r))));
        }
    }

    #[test]
    fn invalid_seeds_are_rejected() {
        assert!(all_perfect_matchings(2, &complete(2), &[0, 0]).is_none());
        assert!(all_perfect_matchings(2, &[(0, 0)], &[0, 1]).is_none());
        assert!(all_perfect_matchings(2, &complete(2), &[0]).is_none());
    }

    #[test]
    fn empty_graph_has_one_empty_matching() {
        assert_eq!(collect(0, &[], &[]), vec![Vec::<usize>::new()]);
    }
}
