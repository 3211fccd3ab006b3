//! Strategies for combining a field across the base and its donors

/// Largest of base and donor values
pub fn max<T: Ord + Copy>(base: T, donors: &[T]) -> T {
    donors.iter().copied().fold(base, Ord::max)
}

/// Smallest of base and donor values
pub fn min<T: Ord + Copy>(base: T, donors: &[T]) -> T {
    donors.iter().copied().fold(base, Ord::min)
}

/// Bitwise OR of base and donor values
pub fn union(base: u32, donors: &[u32]) -> u32 {
    donors.iter().fold(base, |acc, bits| acc | bits)
}
