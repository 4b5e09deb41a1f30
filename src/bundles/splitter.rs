//! Fixed-size partitioning of an ordered request list

use crate::{Error, Result};

/// Split `items` into groups of `size`, preserving order.
///
/// Yields `ceil(len / size)` groups; only the last may be short.
///
/// # Errors
/// [`Error::InvalidParameter`] if `size` is zero.
pub fn split<T>(items: Vec<T>, size: usize) -> Result<Vec<Vec<T>>> {
    if size == 0 {
        return Err(Error::InvalidParameter(
            "bundle size must be greater than 0".to_string(),
        ));
    }

    let mut groups = Vec::with_capacity(items.len().div_ceil(size));
    let mut iter = items.into_iter().peekable();
    while iter.peek().is_some() {
        groups.push(iter.by_ref().take(size).collect());
    }
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thirteen_by_five() {
        let items: Vec<u32> = (1..=13).collect();
        let groups = split(items, 5).unwrap();
        assert_eq!(
            groups,
            vec![
                vec![1, 2, 3, 4, 5],
                vec![6, 7, 8, 9, 10],
                vec![11, 12, 13]
            ]
        );
    }

    #[test]
    fn test_sizes_and_count() {
        for len in 0..40usize {
            for size in 1..12usize {
                let items: Vec<usize> = (0..len).collect();
                let groups = split(items.clone(), size).unwrap();

                assert_eq!(groups.len(), len.div_ceil(size));
                assert_eq!(groups.iter().map(Vec::len).sum::<usize>(), len);
                if let Some((last, full)) = groups.split_last() {
                    assert!(full.iter().all(|g| g.len() == size));
                    assert!(!last.is_empty() && last.len() <= size);
                }
                assert_eq!(groups.concat(), items);
            }
        }
    }

    #[test]
    fn test_empty_input() {
        let groups = split(Vec::<u8>::new(), 5).unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(
            split(vec![1, 2, 3], 0),
            Err(Error::InvalidParameter(_))
        ));
    }
}
