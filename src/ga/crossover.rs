//! Crossover operators for fixed-length representations.
//!
//! All operators take two parents of equal length and return two
//! offspring of the same length. Lengths are checked up front; a
//! mismatch is an error, never a silent truncation.
//!
//! # Index-permutation crossovers
//!
//! Cycle and partially matched crossover are defined on permutations.
//! To apply them to binary vectors, each parent is viewed through a random
//! permutation of its gene *indices*. The classic operator runs on those
//! index permutations, carrying the gene stored at each index along, and
//! every gene is finally written back to the index it came from. Each
//! offspring gene therefore still sits at its original position and comes
//! from one of the two parents.
//!
//! # Reference
//! Oliver, Smith & Holland (1987), "A study of permutation crossover
//! operators on the TSP" (cycle crossover);
//! Goldberg & Lingle (1985), "Alleles, loci, and the TSP" (PMX)

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::EvolutionError;

/// Pair of offspring representations.
pub type Offspring<G> = (Vec<G>, Vec<G>);

/// Crossover strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossoverType {
    /// One cut point, swapped suffixes.
    SinglePoint,
    /// Cycle crossover over random index permutations.
    Cycle,
    /// Partially matched crossover over random index permutations.
    PartiallyMatched,
    /// Independent fair coin per position.
    Uniform,
}

impl CrossoverType {
    /// Performs crossover using the configured strategy.
    pub fn crossover<G: Clone>(
        &self,
        p1: &[G],
        p2: &[G],
        rng: &mut dyn RngCore,
    ) -> Result<Offspring<G>, EvolutionError> {
        match self {
            CrossoverType::SinglePoint => single_point_crossover(p1, p2, rng),
            CrossoverType::Cycle => cycle_crossover(p1, p2, rng),
            CrossoverType::PartiallyMatched => pmx_crossover(p1, p2, rng),
            CrossoverType::Uniform => uniform_crossover(p1, p2, rng),
        }
    }
}

fn check_lengths<G>(p1: &[G], p2: &[G]) -> Result<(), EvolutionError> {
    if p1.len() != p2.len() {
        return Err(EvolutionError::LengthMismatch {
            expected: p1.len(),
            actual: p2.len(),
        });
    }
    Ok(())
}

fn random_permutation(len: usize, rng: &mut dyn RngCore) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..len).collect();
    perm.shuffle(rng);
    perm
}

/// `inverse[perm[k]] == k`.
fn inverse(perm: &[usize]) -> Vec<usize> {
    let mut inv = vec![0; perm.len()];
    for (k, &v) in perm.iter().enumerate() {
        inv[v] = k;
    }
    inv
}

/// Writes `genes[k]` to index `sources[k]`. `sources` must be a permutation.
fn scatter<G: Clone>(template: &[G], sources: Vec<usize>, genes: Vec<G>) -> Vec<G> {
    let mut child = template.to_vec();
    for (src, gene) in sources.into_iter().zip(genes) {
        child[src] = gene;
    }
    child
}

// ======================== Single point ========================

/// Single-point crossover.
///
/// Picks a cut in `[1, L-2]`; offspring 1 is `p1[..cut] + p2[cut..]`,
/// offspring 2 is `p2[..cut] + p1[cut..]`. Representations shorter than
/// three genes have no valid cut and are returned unchanged.
pub fn single_point_crossover<G: Clone>(
    p1: &[G],
    p2: &[G],
    rng: &mut dyn RngCore,
) -> Result<Offspring<G>, EvolutionError> {
    check_lengths(p1, p2)?;
    let len = p1.len();
    if len < 3 {
        return Ok((p1.to_vec(), p2.to_vec()));
    }

    let cut = rng.random_range(1..=len - 2);
    Ok(split_at(p1, p2, cut))
}

fn split_at<G: Clone>(p1: &[G], p2: &[G], cut: usize) -> Offspring<G> {
    let c1 = p1[..cut].iter().chain(&p2[cut..]).cloned().collect();
    let c2 = p2[..cut].iter().chain(&p1[cut..]).cloned().collect();
    (c1, c2)
}

// ======================== Cycle ========================

/// Cycle crossover over two random index permutations.
pub fn cycle_crossover<G: Clone>(
    p1: &[G],
    p2: &[G],
    rng: &mut dyn RngCore,
) -> Result<Offspring<G>, EvolutionError> {
    check_lengths(p1, p2)?;
    if p1.is_empty() {
        return Ok((Vec::new(), Vec::new()));
    }

    let perm1 = random_permutation(p1.len(), rng);
    let perm2 = random_permutation(p2.len(), rng);
    Ok(cycle_with_permutations(p1, p2, &perm1, &perm2))
}

/// Runs one cycle from the first slot, copies it from the same-side parent,
/// fills every other slot from the opposite parent, then remaps to true
/// positions.
fn cycle_with_permutations<G: Clone>(
    p1: &[G],
    p2: &[G],
    perm1: &[usize],
    perm2: &[usize],
) -> Offspring<G> {
    let len = p1.len();
    let position_in_perm1 = inverse(perm1);

    let mut on_cycle = vec![false; len];
    let start = 0;
    if perm1[start] != perm2[start] {
        let mut index = start;
        loop {
            on_cycle[index] = true;
            let value = perm2[index];
            if value == perm1[start] {
                break;
            }
            index = position_in_perm1[value];
        }
    }

    let mut sources1 = Vec::with_capacity(len);
    let mut genes1 = Vec::with_capacity(len);
    let mut sources2 = Vec::with_capacity(len);
    let mut genes2 = Vec::with_capacity(len);

    for slot in 0..len {
        let (i1, i2) = (perm1[slot], perm2[slot]);
        if on_cycle[slot] {
            sources1.push(i1);
            genes1.push(p1[i1].clone());
            sources2.push(i2);
            genes2.push(p2[i2].clone());
        } else {
            sources1.push(i2);
            genes1.push(p2[i2].clone());
            sources2.push(i1);
            genes2.push(p1[i1].clone());
        }
    }

    (scatter(p1, sources1, genes1), scatter(p2, sources2, genes2))
}

// ======================== Partially matched ========================

/// Partially matched crossover over two random index permutations.
///
/// Representations shorter than two genes are returned unchanged.
pub fn pmx_crossover<G: Clone>(
    p1: &[G],
    p2: &[G],
    rng: &mut dyn RngCore,
) -> Result<Offspring<G>, EvolutionError> {
    check_lengths(p1, p2)?;
    let len = p1.len();
    if len < 2 {
        return Ok((p1.to_vec(), p2.to_vec()));
    }

    let perm1 = random_permutation(len, rng);
    let perm2 = random_permutation(len, rng);
    let mut cuts = rand::seq::index::sample(rng, len, 2).into_vec();
    cuts.sort_unstable();
    let (a, b) = (cuts[0], cuts[1]);

    Ok((
        pmx_child(p1, p2, &perm1, &perm2, a, b),
        pmx_child(p2, p1, &perm2, &perm1, a, b),
    ))
}

/// Builds one PMX child: `perm_x[a..b]` is kept with `x`'s genes, indices of
/// `perm_y[a..b]` displaced by it are relocated along the mapping chain, and
/// all remaining slots take `perm_y` with `y`'s genes.
fn pmx_child<G: Clone>(
    x: &[G],
    y: &[G],
    perm_x: &[usize],
    perm_y: &[usize],
    a: usize,
    b: usize,
) -> Vec<G> {
    let layout = pmx_layout(perm_x, perm_y, a, b);
    let mut sources = Vec::with_capacity(layout.len());
    let mut genes = Vec::with_capacity(layout.len());
    for (src, from_x) in layout {
        let parent = if from_x { x } else { y };
        sources.push(src);
        genes.push(parent[src].clone());
    }
    scatter(y, sources, genes)
}

/// Source index of every child slot and whether its gene comes from `x`.
///
/// A displaced index whose first target slot is free takes `y`'s gene;
/// one placed by following the chain takes `x`'s gene.
fn pmx_layout(perm_x: &[usize], perm_y: &[usize], a: usize, b: usize) -> Vec<(usize, bool)> {
    let len = perm_x.len();
    let position_in_y = inverse(perm_y);

    let mut slots: Vec<Option<(usize, bool)>> = vec![None; len];
    let mut in_segment = vec![false; len];

    for k in a..b {
        slots[k] = Some((perm_x[k], true));
        in_segment[perm_x[k]] = true;
    }

    for k in a..b {
        let value = perm_y[k];
        if in_segment[value] {
            continue;
        }
        let mut index = position_in_y[perm_x[k]];
        if slots[index].is_none() {
            slots[index] = Some((value, false));
            continue;
        }
        while slots[index].is_some() {
            index = position_in_y[perm_x[index]];
        }
        slots[index] = Some((value, true));
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(slot, placed)| placed.unwrap_or((perm_y[slot], false)))
        .collect()
}

// ======================== Uniform ========================

/// Uniform crossover: a fair coin per position decides which parent feeds
/// offspring 1; offspring 2 takes the other.
pub fn uniform_crossover<G: Clone>(
    p1: &[G],
    p2: &[G],
    rng: &mut dyn RngCore,
) -> Result<Offspring<G>, EvolutionError> {
    check_lengths(p1, p2)?;

    let mut c1 = Vec::with_capacity(p1.len());
    let mut c2 = Vec::with_capacity(p2.len());
    for (g1, g2) in p1.iter().zip(p2) {
        if rng.random::<f64>() < 0.5 {
            c1.push(g1.clone());
            c2.push(g2.clone());
        } else {
            c1.push(g2.clone());
            c2.push(g1.clone());
        }
    }
    Ok((c1, c2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    const ALL: [CrossoverType; 4] = [
        CrossoverType::SinglePoint,
        CrossoverType::Cycle,
        CrossoverType::PartiallyMatched,
        CrossoverType::Uniform,
    ];

    fn sorted(mut v: Vec<u32>) -> Vec<u32> {
        v.sort_unstable();
        v
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let mut rng = SmallRng::seed_from_u64(42);
        for op in ALL {
            let err = op.crossover(&[0u8, 1, 0], &[1u8, 1], &mut rng).unwrap_err();
            assert!(matches!(
                err,
                EvolutionError::LengthMismatch {
                    expected: 3,
                    actual: 2
                }
            ));
        }
    }

    #[test]
    fn test_single_point_split() {
        let (c1, c2) = split_at(&[1, 1, 1, 1], &[0, 0, 0, 0], 1);
        assert_eq!(c1, vec![1, 0, 0, 0]);
        assert_eq!(c2, vec![0, 1, 1, 1]);
    }

    #[test]
    fn test_single_point_cut_stays_inside() {
        let mut rng = SmallRng::seed_from_u64(42);
        let p1 = vec![1u8; 5];
        let p2 = vec![0u8; 5];
        for _ in 0..200 {
            let (c1, _) = single_point_crossover(&p1, &p2, &mut rng).unwrap();
            // Cut in [1, 3]: first gene always from p1, last always from p2.
            assert_eq!(c1[0], 1);
            assert_eq!(c1[4], 0);
        }
    }

    #[test]
    fn test_short_genomes_pass_through() {
        let mut rng = SmallRng::seed_from_u64(42);
        let (c1, c2) = single_point_crossover(&[1u8, 0], &[0u8, 1], &mut rng).unwrap();
        assert_eq!((c1, c2), (vec![1, 0], vec![0, 1]));
        let (c1, c2) = pmx_crossover(&[1u8], &[0u8], &mut rng).unwrap();
        assert_eq!((c1, c2), (vec![1], vec![0]));
        let (c1, c2) = cycle_crossover::<u8>(&[], &[], &mut rng).unwrap();
        assert!(c1.is_empty() && c2.is_empty());
    }

    #[test]
    fn test_cycle_with_known_permutations() {
        let p1 = [10, 11, 12, 13];
        let p2 = [20, 21, 22, 23];
        // Cycle from slot 0: perm1[0]=0 -> perm2[0]=1 -> slot 1 -> perm2[1]=0 closes.
        let (c1, c2) = cycle_with_permutations(&p1, &p2, &[0, 1, 2, 3], &[1, 0, 3, 2]);
        assert_eq!(c1, vec![10, 11, 22, 23]);
        assert_eq!(c2, vec![20, 21, 12, 13]);
    }

    #[test]
    fn test_cycle_trivial_cycle_takes_other_parent() {
        let p1 = [1, 2, 3];
        let p2 = [4, 5, 6];
        let (c1, c2) = cycle_with_permutations(&p1, &p2, &[2, 0, 1], &[2, 1, 0]);
        assert_eq!(c1, vec![4, 5, 6]);
        assert_eq!(c2, vec![1, 2, 3]);
    }

    #[test]
    fn test_pmx_direct_placement() {
        let x = [10, 11, 12, 13, 14];
        let y = [20, 21, 22, 23, 24];
        let child = pmx_child(&x, &y, &[0, 1, 2, 3, 4], &[3, 4, 0, 1, 2], 1, 3);
        assert_eq!(child, vec![20, 11, 12, 23, 24]);
    }

    #[test]
    fn test_pmx_follows_mapping_chain() {
        let x = [10, 11, 12, 13, 14];
        let y = [20, 21, 22, 23, 24];
        // Index 2 is displaced; its first target slot 0 is inside the
        // segment, so the chain continues to slot 2 and keeps x's gene.
        let child = pmx_child(&x, &y, &[0, 1, 2, 3, 4], &[1, 2, 0, 3, 4], 0, 2);
        assert_eq!(child, vec![10, 11, 12, 23, 24]);
    }

    #[test]
    fn test_uniform_mixes_parents() {
        let mut rng = SmallRng::seed_from_u64(42);
        let p1 = vec![1u8; 64];
        let p2 = vec![0u8; 64];
        let (c1, c2) = uniform_crossover(&p1, &p2, &mut rng).unwrap();
        let ones = c1.iter().filter(|&&g| g == 1).count();
        assert!(ones > 10 && ones < 54);
        assert!(c1.iter().zip(&c2).all(|(a, b)| a + b == 1));
    }

    #[test]
    fn test_crossover_type_serde() {
        let t: CrossoverType = serde_json::from_str("\"partially_matched\"").unwrap();
        assert_eq!(t, CrossoverType::PartiallyMatched);
    }

    fn parents() -> impl Strategy<Value = (Vec<u32>, Vec<u32>, u64)> {
        (2usize..40).prop_flat_map(|len| {
            (
                proptest::collection::vec(0u32..1000, len),
                proptest::collection::vec(1000u32..2000, len),
                any::<u64>(),
            )
        })
    }

    proptest! {
        #[test]
        fn prop_offspring_genes_come_from_same_position((p1, p2, seed) in parents()) {
            let mut rng = SmallRng::seed_from_u64(seed);
            for op in ALL {
                let (c1, c2) = op.crossover(&p1, &p2, &mut rng).unwrap();
                prop_assert_eq!(c1.len(), p1.len());
                prop_assert_eq!(c2.len(), p2.len());
                for i in 0..p1.len() {
                    prop_assert!(c1[i] == p1[i] || c1[i] == p2[i]);
                    prop_assert!(c2[i] == p1[i] || c2[i] == p2[i]);
                }
            }
        }

        #[test]
        fn prop_complementary_operators_preserve_gene_pool((p1, p2, seed) in parents()) {
            let mut rng = SmallRng::seed_from_u64(seed);
            let pool = sorted(p1.iter().chain(&p2).copied().collect());
            for op in [CrossoverType::SinglePoint, CrossoverType::Cycle, CrossoverType::Uniform] {
                let (c1, c2) = op.crossover(&p1, &p2, &mut rng).unwrap();
                prop_assert_eq!(sorted(c1.into_iter().chain(c2).collect()), pool.clone());
            }
        }

        #[test]
        fn prop_pmx_layout_matches_mapping((len, seed) in (2usize..40, any::<u64>())) {
            let mut rng = SmallRng::seed_from_u64(seed);
            let perm_x = random_permutation(len, &mut rng);
            let perm_y = random_permutation(len, &mut rng);
            let mut cuts = rand::seq::index::sample(&mut rng, len, 2).into_vec();
            cuts.sort_unstable();
            let (a, b) = (cuts[0], cuts[1]);

            let layout = pmx_layout(&perm_x, &perm_y, a, b);
            let mut sources: Vec<usize> = layout.iter().map(|&(src, _)| src).collect();
            sources.sort_unstable();
            prop_assert_eq!(sources, (0..len).collect::<Vec<_>>());

            // x keeps its segment plus every chain-resolved index.
            let position_in_y = inverse(&perm_y);
            let mut expected_x: Vec<usize> = perm_x[a..b].to_vec();
            for k in a..b {
                let value = perm_y[k];
                let first_target = position_in_y[perm_x[k]];
                if !perm_x[a..b].contains(&value) && (a..b).contains(&first_target) {
                    expected_x.push(value);
                }
            }
            expected_x.sort_unstable();
            let mut from_x: Vec<usize> = layout
                .iter()
                .filter(|&&(_, x)| x)
                .map(|&(src, _)| src)
                .collect();
            from_x.sort_unstable();
            prop_assert_eq!(from_x, expected_x);
        }

        #[test]
        fn prop_pmx_genes_stay_at_source((p1, p2, seed) in parents()) {
            let mut rng = SmallRng::seed_from_u64(seed);
            let (c1, c2) = pmx_crossover(&p1, &p2, &mut rng).unwrap();
            prop_assert_eq!(c1.len(), p1.len());
            prop_assert_eq!(c2.len(), p2.len());
            for i in 0..p1.len() {
                prop_assert!(c1[i] == p1[i] || c1[i] == p2[i]);
                prop_assert!(c2[i] == p1[i] || c2[i] == p2[i]);
            }
        }
    }
}
