use tracing::debug;
use varlist_error::{ErrorKind, Result, VarlistError};

use super::take::take;
use crate::array::ListArray;

/// Keep the sub-arrays where `mask` is true, in their original order.
pub fn filter(arr: &ListArray, mask: &[bool]) -> Result<ListArray> {
    if mask.len() != arr.len() {
        return Err(VarlistError::new(
            ErrorKind::LengthMismatch,
            format!(
                "Mask has length {}, array has length {}",
                mask.len(),
                arr.len()
            ),
        ));
    }

    let selected: Vec<usize> = mask
        .iter()
        .enumerate()
        .filter_map(|(idx, &keep)| keep.then_some(idx))
        .collect();
    debug!(selected = selected.len(), len = arr.len(), "filter");

    take(arr, &selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_keeps_order() {
        let arr: ListArray = [
            Some(vec![1_u32]),
            None,
            Some(vec![2, 3]),
            Some(vec![4]),
        ]
        .into_iter()
        .collect();

        let out = filter(&arr, &[true, true, false, true]).unwrap();

        let expected: ListArray = [Some(vec![1_u32]), None, Some(vec![4])]
            .into_iter()
            .collect();
        assert_eq!(expected, out);
        assert_eq!(&[0, 1, 1, 2], out.offsets().as_slice());
    }

    #[test]
    fn filter_count_matches_mask() {
        let arr: ListArray = (0..10).map(|v| vec![v as i16; v]).collect();
        let mask: Vec<bool> = (0..10).map(|v| v % 3 == 0).collect();

        let out = filter(&arr, &mask).unwrap();
        assert_eq!(mask.iter().filter(|&&m| m).count(), out.len());
        assert_eq!(&[3, 3, 3], out.values::<i16>(1).unwrap());
    }

    #[test]
    fn filter_length_mismatch() {
        let arr: ListArray = [vec![1_i8], vec![2]].into_iter().collect();
        let err = filter(&arr, &[true]).unwrap_err();
        assert_eq!(ErrorKind::LengthMismatch, err.kind());
    }
}
