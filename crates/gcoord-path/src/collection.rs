//! Ordered groups of paths.

use tracing::debug;

use crate::path::Path;
use crate::settings::Setting;

/// An ordered group of paths, sorted on construction to shorten travel.
///
/// The collection owns its paths. Settings applied to the collection are
/// broadcast into each member's inherited layer, below the member's own
/// overrides.
#[derive(Debug, Clone, Default)]
pub struct PathCollection {
    paths: Vec<Path>,
}

impl PathCollection {
    /// Take ownership of `paths` and order them by nearest neighbor.
    /// Fewer than two paths are kept as given.
    pub fn new(paths: Vec<Path>) -> Self {
        let mut collection = Self { paths };
        collection.sort_paths();
        collection
    }

    /// Greedy nearest-neighbor ordering.
    ///
    /// Keeps the first path, then repeatedly appends the remaining path whose
    /// start is closest to the current end. Ties go to the earliest path in
    /// the current order, which makes the ordering idempotent. O(n²).
    pub fn sort_paths(&mut self) {
        if self.paths.len() < 2 {
            return;
        }

        let mut remaining: Vec<Option<Path>> = self.paths.drain(..).map(Some).collect();
        let mut order = Vec::with_capacity(remaining.len());
        let mut current = 0;
        let mut travel = 0.0;

        loop {
            let Some(path) = remaining[current].take() else {
                break;
            };
            let end = *path.end_coord();
            order.push(path);

            let mut best: Option<(usize, f64)> = None;
            for (index, candidate) in remaining.iter().enumerate() {
                let Some(candidate) = candidate else {
                    continue;
                };
                let distance = (candidate.start_coord() - end).norm();
                if best.map_or(true, |(_, d)| distance < d) {
                    best = Some((index, distance));
                }
            }

            match best {
                Some((index, distance)) => {
                    travel += distance;
                    current = index;
                }
                None => break,
            }
        }

        debug!(paths = order.len(), travel, "ordered path collection");
        self.paths = order;
    }

    /// Broadcast one setting to every member path.
    pub fn apply_to_all(&mut self, setting: Setting) {
        for path in &mut self.paths {
            path.inherit(setting.clone());
        }
    }

    /// Member paths in print order.
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// Iterate member paths in print order.
    pub fn iter(&self) -> std::slice::Iter<'_, Path> {
        self.paths.iter()
    }

    /// Mutable iteration, for per-path setting changes.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Path> {
        self.paths.iter_mut()
    }

    /// Number of paths.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// True when the collection holds no paths.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Give up ownership of the ordered paths.
    pub fn into_paths(self) -> Vec<Path> {
        self.paths
    }
}

impl<'a> IntoIterator for &'a PathCollection {
    type Item = &'a Path;
    type IntoIter = std::slice::Iter<'a, Path>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

/// Something the emitter can print: a lone path or a collection.
#[derive(Debug, Clone)]
pub enum PrintItem {
    /// A single path.
    Path(Path),
    /// A group of paths, printed in stored order.
    Collection(PathCollection),
}

impl From<Path> for PrintItem {
    fn from(path: Path) -> Self {
        PrintItem::Path(path)
    }
}

impl From<PathCollection> for PrintItem {
    fn from(collection: PathCollection) -> Self {
        PrintItem::Collection(collection)
    }
}

/// Expand collections in place, keeping overall order.
pub fn flatten(items: &[PrintItem]) -> Vec<&Path> {
    let mut paths = Vec::new();
    for item in items {
        match item {
            PrintItem::Path(path) => paths.push(path),
            PrintItem::Collection(collection) => paths.extend(collection.iter()),
        }
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrintSettings;
    use crate::kinematics::Kinematics;
    use proptest::prelude::*;

    fn segment(x0: f64, x1: f64) -> Path {
        Path::from_xyz(&[x0, x1], &[0.0, 0.0], &[0.0, 0.0], &Kinematics::default()).unwrap()
    }

    fn starts(collection: &PathCollection) -> Vec<f64> {
        collection.iter().map(|p| p.start_coord().x).collect()
    }

    #[test]
    fn test_nearest_neighbor_order() {
        let collection = PathCollection::new(vec![
            segment(0.0, 1.0),
            segment(50.0, 51.0),
            segment(2.0, 3.0),
            segment(10.0, 11.0),
        ]);
        assert_eq!(starts(&collection), vec![0.0, 2.0, 10.0, 50.0]);
    }

    #[test]
    fn test_first_path_stays_first() {
        let collection = PathCollection::new(vec![segment(100.0, 101.0), segment(0.0, 1.0)]);
        assert_eq!(starts(&collection), vec![100.0, 0.0]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        // Both candidates start 5 away from the end of the first path.
        let collection = PathCollection::new(vec![
            segment(0.0, 10.0),
            segment(15.0, 16.0),
            segment(5.0, 4.0),
        ]);
        assert_eq!(starts(&collection), vec![0.0, 15.0, 5.0]);
    }

    #[test]
    fn test_small_collections_untouched() {
        assert!(PathCollection::new(Vec::new()).is_empty());
        let one = PathCollection::new(vec![segment(3.0, 4.0)]);
        assert_eq!(starts(&one), vec![3.0]);
    }

    #[test]
    fn test_apply_to_all_under_path_overrides() {
        let mut second = segment(2.0, 3.0);
        second.set(Setting::FanSpeed(128.0));
        let mut collection = PathCollection::new(vec![segment(0.0, 1.0), second]);
        collection.apply_to_all(Setting::FanSpeed(0.0));

        let defaults = PrintSettings::default();
        let fans: Vec<f64> = collection
            .iter()
            .map(|p| p.resolve_settings(&defaults).fan_speed)
            .collect();
        assert_eq!(fans, vec![0.0, 128.0]);
    }

    #[test]
    fn test_flatten_expands_collections() {
        let items = vec![
            PrintItem::from(segment(0.0, 1.0)),
            PrintItem::from(PathCollection::new(vec![segment(5.0, 6.0), segment(2.0, 3.0)])),
            PrintItem::from(segment(9.0, 10.0)),
        ];
        let xs: Vec<f64> = flatten(&items).iter().map(|p| p.start_coord().x).collect();
        assert_eq!(xs, vec![0.0, 5.0, 2.0, 9.0]);
    }

    proptest! {
        #[test]
        fn prop_ordering_is_idempotent(
            coords in prop::collection::vec((-100.0f64..100.0, -100.0f64..100.0, -100.0f64..100.0), 0..12)
        ) {
            let paths: Vec<Path> = coords.iter().map(|&(a, b, y)| {
                Path::from_xyz(&[a, b], &[y, y], &[0.0, 0.0], &Kinematics::default()).unwrap()
            }).collect();
            let once = PathCollection::new(paths);
            let mut twice = once.clone();
            twice.sort_paths();
            let a: Vec<_> = once.iter().map(|p| *p.start_coord()).collect();
            let b: Vec<_> = twice.iter().map(|p| *p.start_coord()).collect();
            prop_assert_eq!(a, b);
        }
    }
}
