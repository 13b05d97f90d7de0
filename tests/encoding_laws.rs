//! Structural laws of the encoder and the packed layout

use std::collections::{BTreeMap, HashSet};

use moment_sdp::sdp::{extract_monomial, pack_lower, packed_len, unpack_lower};
use moment_sdp::*;
use ndarray::Array2;
use proptest::prelude::*;

/// A symmetric tagging with contiguous monomial indices and the identity at (0, 0).
fn tagged_gram() -> impl Strategy<Value = MomentMatrix> {
    (1usize..7).prop_flat_map(|dim| {
        proptest::collection::vec(0usize..12, packed_len(dim)).prop_map(move |raw| {
            let mut rows: Vec<Vec<usize>> = Vec::with_capacity(dim);
            let mut values = raw.into_iter();
            for row in 0..dim {
                rows.push((0..=row).map(|_| values.next().unwrap_or(0)).collect());
            }
            rows[0][0] = 0;

            // relabel to 0..k in increasing order, keeping 0 at 0
            let distinct: Vec<usize> = rows
                .iter()
                .flatten()
                .copied()
                .collect::<std::collections::BTreeSet<_>>()
                .into_iter()
                .collect();
            let rank: BTreeMap<usize, usize> =
                distinct.iter().enumerate().map(|(i, &v)| (v, i)).collect();
            let rows: Vec<Vec<usize>> = rows
                .into_iter()
                .map(|r| r.into_iter().map(|v| rank[&v]).collect())
                .collect();

            MomentMatrix::from_lower_rows(&rows).with_identity(IDENTITY)
        })
    })
}

fn relaxation_for(gram: MomentMatrix) -> MomentRelaxation<f64> {
    let count = gram.monomials().len();
    let objective = (0..count).map(|k| k as f64 - 1.5).collect();
    MomentRelaxation::new(gram, objective)
}

proptest! {
    #[test]
    fn prop_constraint_count_matches_monomials(gram in tagged_gram()) {
        let relaxation = relaxation_for(gram);
        let unique = relaxation.unique_monomial_count();
        let encoder = SdpEncoder::new(&relaxation).unwrap();
        let program = encoder.program();

        prop_assert_eq!(encoder.constraint_count(), unique - 1);
        prop_assert_eq!(program.constraint_matrices().len(), unique - 1);
        prop_assert_eq!(program.bounds().len(), unique - 1);
        prop_assert_eq!(program.constant_offset(), -1.5);
    }

    #[test]
    fn prop_triples_are_lower_and_unique(gram in tagged_gram()) {
        let encoder = SdpEncoder::new(&relaxation_for(gram)).unwrap();
        let program = encoder.program();

        let mut total = 0;
        for matrix in std::iter::once(program.fixed_matrix()).chain(program.constraint_matrices()) {
            let mut seen = HashSet::new();
            for t in matrix.entries() {
                prop_assert!(t.row >= t.col);
                prop_assert!(seen.insert((t.row, t.col)));
            }
            total += matrix.len();
        }
        // every lower cell is tagged exactly once, so it lands in exactly one matrix
        prop_assert_eq!(total, packed_len(encoder.dim()));
    }

    #[test]
    fn prop_constraints_are_negated_extractions(gram in tagged_gram()) {
        let relaxation = relaxation_for(gram);
        let encoder = SdpEncoder::new(&relaxation).unwrap();
        let program = encoder.program();
        let gram = relaxation.gram_matrix();

        prop_assert_eq!(program.fixed_matrix(), &extract_monomial(gram, 0, 1.0));
        for (k, matrix) in program.constraint_matrices().iter().enumerate() {
            let raw = extract_monomial(gram, k + 1, 1.0);
            prop_assert_eq!(matrix.len(), raw.len());
            for (negated, original) in matrix.entries().iter().zip(raw.entries()) {
                prop_assert_eq!((negated.row, negated.col), (original.row, original.col));
                prop_assert_eq!(negated.value, -original.value);
            }
        }
    }

    #[test]
    fn prop_pack_unpack_round_trip(dim in 0usize..8, seed in proptest::collection::vec(-1e3f64..1e3, 64)) {
        let mut matrix = Array2::zeros((dim, dim));
        for r in 0..dim {
            for c in 0..=r {
                let value = seed[(r * 8 + c) % seed.len()];
                matrix[[r, c]] = value;
                matrix[[c, r]] = value;
            }
        }
        let packed = pack_lower(&matrix);
        prop_assert_eq!(packed.len(), packed_len(dim));
        prop_assert_eq!(unpack_lower(dim, &packed), matrix);
    }
}

#[test]
fn test_shared_monomial_occupies_several_cells() {
    // monomial 1 sits at (1,0), (2,1) and (2,2)
    let gram = MomentMatrix::from_lower_rows(&[vec![0], vec![1, 2], vec![3, 1, 1]]).with_identity(IDENTITY);
    let encoder = SdpEncoder::new(&relaxation_for(gram)).unwrap();

    let positions: Vec<(usize, usize, f64)> = encoder.program().constraint_matrices()[0]
        .entries()
        .iter()
        .map(|t| (t.row, t.col, t.value))
        .collect();
    assert_eq!(positions, vec![(1, 0, -1.0), (2, 1, -1.0), (2, 2, -1.0)]);
}
