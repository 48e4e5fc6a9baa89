//! Cartesian products over explicit accumulators.

/// Every combination picking one element of each set, in lexicographic order
/// of the set positions (the first set varies slowest).
///
/// The product of zero sets is the single empty combination, and the product
/// involving an empty set has no combination at all.
pub fn cartesian_product<T: Clone>(sets: &[Vec<T>]) -> Vec<Vec<T>> {
    let mut combinations: Vec<Vec<T>> = vec![Vec::new()];
    for set in sets {
        let mut extended = Vec::with_capacity(combinations.len() * set.len());
        for combination in &combinations {
            for value in set {
                let mut next = Vec::with_capacity(combination.len() + 1);
                next.extend_from_slice(combination);
                next.push(value.clone());
                extended.push(next);
            }
        }
        combinations = extended;
    }
    combinations
}
