//! Cubic lattice geometry.
//!
//! Provides the bijection between 3D coordinates `(x, y, z)` in `[0, L)³`
//! and flat site indices `x·L² + y·L + z`, plus enumeration of the three
//! positive-direction neighbours used when harvesting bonds. Checking only
//! `+x`, `+y` and `+z` visits every unordered nearest-neighbour pair exactly
//! once; there is no periodic wrap.

use std::num::NonZeroUsize;

/// Geometry of an `L×L×L` cubic lattice.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
/// use percolate_core::Lattice;
///
/// let lattice = Lattice::new(NonZeroUsize::new(4).expect("non-zero"));
/// assert_eq!(lattice.sites(), 64);
/// assert_eq!(lattice.site_index(1, 2, 3), 16 + 8 + 3);
/// assert_eq!(lattice.coordinates(27), (1, 2, 3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lattice {
    side: NonZeroUsize,
}

impl Lattice {
    /// Creates a lattice with the given linear size `L`.
    #[must_use]
    pub const fn new(side: NonZeroUsize) -> Self {
        Self { side }
    }

    /// Returns the linear size `L`.
    #[must_use]
    pub const fn side(&self) -> NonZeroUsize {
        self.side
    }

    /// Returns the total number of sites `N = L³`.
    #[must_use]
    pub const fn sites(&self) -> usize {
        let l = self.side.get();
        l * l * l
    }

    /// Maps a coordinate triple to its flat site index.
    ///
    /// Coordinates outside `[0, L)` are a contract violation; the result is
    /// meaningless for such inputs.
    #[must_use]
    pub const fn site_index(&self, x: usize, y: usize, z: usize) -> usize {
        let l = self.side.get();
        x * l * l + y * l + z
    }

    /// Maps a flat site index back to its coordinate triple.
    #[must_use]
    pub const fn coordinates(&self, index: usize) -> (usize, usize, usize) {
        let l = self.side.get();
        (index / (l * l), (index / l) % l, index % l)
    }

    /// Returns the in-bounds positive-direction neighbours (`+x`, `+y`,
    /// `+z`) of the given site, as flat indices.
    pub fn positive_neighbours(&self, index: usize) -> impl Iterator<Item = usize> {
        let l = self.side.get();
        let (x, y, z) = self.coordinates(index);
        [
            (x + 1 < l).then(|| self.site_index(x + 1, y, z)),
            (y + 1 < l).then(|| self.site_index(x, y + 1, z)),
            (z + 1 < l).then(|| self.site_index(x, y, z + 1)),
        ]
        .into_iter()
        .flatten()
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use rstest::rstest;

    use super::Lattice;

    fn lattice(l: usize) -> Lattice {
        Lattice::new(NonZeroUsize::new(l).expect("non-zero side"))
    }

    #[test]
    fn index_round_trips_through_coordinates() {
        let lattice = lattice(5);
        for idx in 0..lattice.sites() {
            let (x, y, z) = lattice.coordinates(idx);
            assert!(x < 5 && y < 5 && z < 5);
            assert_eq!(lattice.site_index(x, y, z), idx);
        }
    }

    #[rstest]
    #[case(0, 0, 0, 3)]
    #[case(2, 2, 2, 0)]
    #[case(1, 1, 1, 3)]
    #[case(2, 0, 1, 1)]
    fn boundary_sites_lose_out_of_bounds_neighbours(
        #[case] x: usize,
        #[case] y: usize,
        #[case] z: usize,
        #[case] expected: usize,
    ) {
        let lattice = lattice(3);
        let idx = lattice.site_index(x, y, z);
        assert_eq!(lattice.positive_neighbours(idx).count(), expected);
    }

    #[test]
    fn positive_neighbours_are_adjacent_and_larger() {
        let lattice = lattice(4);
        for idx in 0..lattice.sites() {
            let (x, y, z) = lattice.coordinates(idx);
            for n in lattice.positive_neighbours(idx) {
                assert!(n > idx);
                let (nx, ny, nz) = lattice.coordinates(n);
                let manhattan =
                    nx.abs_diff(x) + ny.abs_diff(y) + nz.abs_diff(z);
                assert_eq!(manhattan, 1);
            }
        }
    }
}
