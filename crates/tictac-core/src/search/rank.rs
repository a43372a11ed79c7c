//! Ranking of scored candidates

use std::cmp::Ordering;

use super::score::Candidate;

/// Stable sort by ascending error, keeping the first `k`.
///
/// Candidates with equal error keep their input order.
pub fn rank(mut candidates: Vec<Candidate>, k: usize) -> Vec<Candidate> {
    candidates.sort_by(|a, b| a.error.total_cmp(&b.error));
    candidates.truncate(k);
    candidates
}

/// Bounded best-`k` buffer filled in enumeration order
#[derive(Debug)]
pub(crate) struct TopK {
    k: usize,
    items: Vec<Candidate>,
}

impl TopK {
    pub(crate) fn new(k: usize) -> Self {
        Self {
            k,
            items: Vec::with_capacity(k + 1),
        }
    }

    /// Offer a candidate. Ties lose to candidates already held, which
    /// keeps the buffer stable when candidates arrive in index order.
    pub(crate) fn push(&mut self, candidate: Candidate) {
        if self.k == 0 {
            return;
        }
        if self.items.len() == self.k {
            if let Some(worst) = self.items.last() {
                if candidate.error.total_cmp(&worst.error) != Ordering::Less {
                    return;
                }
            }
        }
        let pos = self
            .items
            .partition_point(|held| held.error.total_cmp(&candidate.error) != Ordering::Greater);
        self.items.insert(pos, candidate);
        self.items.truncate(self.k);
    }

    pub(crate) fn into_sorted(self) -> Vec<Candidate> {
        self.items
    }
}

/// Merge per-worker sorted lists into the global best `k`.
///
/// Ordering is by error, then by candidate id, which matches a stable sort
/// over the whole enumeration.
pub fn merge_top_k(lists: Vec<Vec<Candidate>>, k: usize) -> Vec<Candidate> {
    let mut sources: Vec<std::vec::IntoIter<Candidate>> =
        lists.into_iter().map(Vec::into_iter).collect();
    let mut heads: Vec<Option<Candidate>> = sources.iter_mut().map(Iterator::next).collect();
    let mut merged = Vec::with_capacity(k);

    while merged.len() < k {
        let best = heads
            .iter()
            .enumerate()
            .filter_map(|(i, head)| head.as_ref().map(|c| (i, c)))
            .min_by(|(_, a), (_, b)| by_error_then_id(a, b))
            .map(|(i, _)| i);
        let Some(i) = best else {
            break;
        };
        if let Some(candidate) = heads[i].take() {
            merged.push(candidate);
        }
        heads[i] = sources[i].next();
    }
    merged
}

fn by_error_then_id(a: &Candidate, b: &Candidate) -> Ordering {
    a.error.total_cmp(&b.error).then(a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolate::interpolate;
    use crate::params::ParameterVector;
    use crate::search::score::CandidateId;
    use pretty_assertions::assert_eq;

    fn candidate(id: u64, error: f64) -> Candidate {
        Candidate {
            id: CandidateId(id),
            params: ParameterVector::default(),
            sim_curve: interpolate(&[0.0, 1.0]).unwrap(),
            error,
            overflow: false,
        }
    }

    fn ids(list: &[Candidate]) -> Vec<u64> {
        list.iter().map(|c| c.id.0).collect()
    }

    #[test]
    fn rank_sorts_and_truncates() {
        let ranked = rank(
            vec![
                candidate(0, 5.0),
                candidate(1, 1.0),
                candidate(2, 3.0),
                candidate(3, 1.0),
                candidate(4, 0.5),
            ],
            3,
        );
        assert_eq!(ids(&ranked), vec![4, 1, 3]);
    }

    #[test]
    fn rank_returns_everything_when_short() {
        let ranked = rank(vec![candidate(0, 2.0), candidate(1, 1.0)], 5);
        assert_eq!(ids(&ranked), vec![1, 0]);
        assert!(rank(Vec::new(), 5).is_empty());
    }

    #[test]
    fn top_k_keeps_earliest_ties() {
        let mut top = TopK::new(2);
        for (id, error) in [(0, 2.0), (1, 1.0), (2, 1.0), (3, 1.0), (4, 0.5)] {
            top.push(candidate(id, error));
        }
        assert_eq!(ids(&top.into_sorted()), vec![4, 1]);
    }

    #[test]
    fn top_k_matches_rank() {
        let errors = [4.0, 2.0, 2.0, 9.0, 0.1, 2.0, 7.0, 0.1, 3.0];
        let all: Vec<Candidate> = errors
            .iter()
            .enumerate()
            .map(|(i, &e)| candidate(i as u64, e))
            .collect();

        let mut top = TopK::new(5);
        for c in all.clone() {
            top.push(c);
        }
        assert_eq!(ids(&top.into_sorted()), ids(&rank(all, 5)));
    }

    #[test]
    fn merge_orders_by_error_then_id() {
        let merged = merge_top_k(
            vec![
                vec![candidate(0, 1.0), candidate(1, 4.0)],
                vec![candidate(5, 0.5), candidate(6, 1.0), candidate(7, 1.5)],
                Vec::new(),
            ],
            4,
        );
        assert_eq!(ids(&merged), vec![5, 0, 6, 7]);
    }

    #[test]
    fn merge_of_short_lists() {
        let merged = merge_top_k(vec![vec![candidate(2, 1.0)], Vec::new()], 5);
        assert_eq!(ids(&merged), vec![2]);
        assert!(merge_top_k(Vec::new(), 5).is_empty());
    }
}
