//! Set algebra over posting lists.
//!
//! Inputs must be strictly increasing and duplicate-free; outputs are too. Binary
//! operations are single two-pointer merges, so they cost `O(|p1| + |p2|)`.

use std::cmp::Ordering;

use crate::index::NewsId;

/// News ids present in both lists.
pub fn intersect(p1: &[NewsId], p2: &[NewsId]) -> Vec<NewsId> {
    intersect_by(p1, p2, NewsId::cmp)
}

/// [`intersect`] with a caller-supplied comparison, invoked once per merge step.
pub fn intersect_by<F>(p1: &[NewsId], p2: &[NewsId], mut cmp: F) -> Vec<NewsId>
where
    F: FnMut(&NewsId, &NewsId) -> Ordering,
{
    let mut out = Vec::with_capacity(p1.len().min(p2.len()));
    let (mut i, mut j) = (0, 0);
    while i < p1.len() && j < p2.len() {
        match cmp(&p1[i], &p2[j]) {
            Ordering::Equal => {
                out.push(p1[i]);
                i += 1;
                j += 1;
            }
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
        }
    }
    out
}

/// News ids present in either list.
pub fn union(p1: &[NewsId], p2: &[NewsId]) -> Vec<NewsId> {
    union_by(p1, p2, NewsId::cmp)
}

/// [`union`] with a caller-supplied comparison, invoked once per merge step.
pub fn union_by<F>(p1: &[NewsId], p2: &[NewsId], mut cmp: F) -> Vec<NewsId>
where
    F: FnMut(&NewsId, &NewsId) -> Ordering,
{
    let mut out = Vec::with_capacity(p1.len() + p2.len());
    let (mut i, mut j) = (0, 0);
    while i < p1.len() && j < p2.len() {
        match cmp(&p1[i], &p2[j]) {
            Ordering::Equal => {
                out.push(p1[i]);
                i += 1;
                j += 1;
            }
            Ordering::Less => {
                out.push(p1[i]);
                i += 1;
            }
            Ordering::Greater => {
                out.push(p2[j]);
                j += 1;
            }
        }
    }
    out.extend_from_slice(&p1[i..]);
    out.extend_from_slice(&p2[j..]);
    out
}

/// News ids of `p1` that are not in `p2`.
pub fn difference(p1: &[NewsId], p2: &[NewsId]) -> Vec<NewsId> {
    let mut out = Vec::with_capacity(p1.len());
    let (mut i, mut j) = (0, 0);
    while i < p1.len() && j < p2.len() {
        match p1[i].cmp(&p2[j]) {
            Ordering::Equal => {
                i += 1;
                j += 1;
            }
            Ordering::Less => {
                out.push(p1[i]);
                i += 1;
            }
            Ordering::Greater => j += 1,
        }
    }
    out.extend_from_slice(&p1[i..]);
    out
}

/// Every id in `1..=universe` that is not in `p`, walking `p` alongside the
/// identity sequence once.
pub fn complement(p: &[NewsId], universe: NewsId) -> Vec<NewsId> {
    let mut out = Vec::with_capacity((universe as usize).saturating_sub(p.len()));
    let mut i = 0;
    for id in 1..=universe {
        if i < p.len() && p[i] == id {
            i += 1;
        } else {
            out.push(id);
        }
    }
    out
}

/// True when `p` is strictly increasing.
pub fn is_sorted_unique(p: &[NewsId]) -> bool {
    p.windows(2).all(|w| w[0] < w[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges() {
        let a = [1, 3, 5, 7];
        let b = [2, 3, 7, 9];
        assert_eq!(intersect(&a, &b), vec![3, 7]);
        assert_eq!(union(&a, &b), vec![1, 2, 3, 5, 7, 9]);
        assert_eq!(difference(&a, &b), vec![1, 5]);
        assert_eq!(difference(&b, &[]), vec![2, 3, 7, 9]);
    }

    #[test]
    fn complement_against_universe() {
        assert_eq!(complement(&[1, 3], 4), vec![2, 4]);
        assert_eq!(complement(&[], 3), vec![1, 2, 3]);
        assert_eq!(complement(&[1, 2, 3], 3), Vec::<NewsId>::new());
        assert!(complement(&[], 0).is_empty());
    }

    #[test]
    fn sortedness_check() {
        assert!(is_sorted_unique(&[]));
        assert!(is_sorted_unique(&[1, 2, 9]));
        assert!(!is_sorted_unique(&[1, 1]));
        assert!(!is_sorted_unique(&[3, 2]));
    }
}
