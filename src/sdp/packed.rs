//! Packed lower-triangular storage of symmetric matrices.
//!
//! Column `c` contributes rows `c..d`, columns are laid out one after the
//! other, so a `d × d` matrix packs into `d(d+1)/2` values:
//!
//! ```text
//! d = 3:  [ 0       ]
//!         [ 1  3    ]
//!         [ 2  4  5 ]
//! ```

use ndarray::Array2;

/// Number of values in the packed form of a `dim × dim` matrix.
pub fn packed_len(dim: usize) -> usize {
    dim * (dim + 1) / 2
}

/// Position of entry `(row, col)`, `row >= col`, in the packed form.
#[inline]
pub fn packed_index(dim: usize, row: usize, col: usize) -> usize {
    debug_assert!(col <= row && row < dim);
    // columns before `col` hold dim, dim-1, ..., dim-col+1 values
    col * (2 * dim - col + 1) / 2 + (row - col)
}

/// Pack the lower triangle of a square matrix.
pub fn pack_lower(matrix: &Array2<f64>) -> Vec<f64> {
    let dim = matrix.nrows();
    assert_eq!(dim, matrix.ncols(), "matrix must be square");
    let mut packed = Vec::with_capacity(packed_len(dim));
    for col in 0..dim {
        for row in col..dim {
            packed.push(matrix[[row, col]]);
        }
    }
    packed
}

/// Unpack into a full symmetric matrix, mirroring across the diagonal.
///
/// # Panics
///
/// Panics if `packed.len() != packed_len(dim)`.
pub fn unpack_lower(dim: usize, packed: &[f64]) -> Array2<f64> {
    assert_eq!(
        packed.len(),
        packed_len(dim),
        "packed length does not match dimension {dim}"
    );
    let mut matrix = Array2::zeros((dim, dim));
    let mut values = packed.iter();
    for col in 0..dim {
        for row in col..dim {
            // length checked above
            let value = *values.next().unwrap_or(&0.0);
            matrix[[row, col]] = value;
            matrix[[col, row]] = value;
        }
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_packed_index_order() {
        let dim = 4;
        let mut expected = 0;
        for col in 0..dim {
            for row in col..dim {
                assert_eq!(packed_index(dim, row, col), expected);
                expected += 1;
            }
        }
        assert_eq!(expected, packed_len(dim));
    }

    #[test]
    fn test_unpack_mirrors() {
        let m = unpack_lower(3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(
            m,
            array![[1.0, 2.0, 3.0], [2.0, 4.0, 5.0], [3.0, 5.0, 6.0]]
        );
        assert_eq!(pack_lower(&m), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_empty() {
        assert_eq!(packed_len(0), 0);
        assert_eq!(unpack_lower(0, &[]).dim(), (0, 0));
    }

    #[test]
    #[should_panic(expected = "packed length")]
    fn test_unpack_wrong_length() {
        unpack_lower(2, &[1.0, 2.0]);
    }
}
