use std::hash::Hash;
use std::collections::{HashSet, VecDeque};

// NOTE: There is no "group" trait.  The group operation is supplied as a
//       closure, because a type may admit several choices of operator
//       and the caller must pick the right one.

/// Generates a finite group from a non-empty set of generators.
///
/// The generators may contain duplicates or extraneous elements.
/// `compose(a, b)` is called on members `a` and generators `b`; its order of
/// application is up to the caller, since either convention generates the
/// same set.
///
/// The order of the output is arbitrary, but consistent for
/// inputs that are related by a group isomorphism.
///
/// # Panics
///
/// Panics if `generators` is empty.  If the generators do not generate a
/// finite group under `compose`, this does not terminate.
pub fn generate_finite_group<G>(
    generators: &[G],
    mut compose: impl FnMut(&G, &G) -> G,
) -> Vec<G>
where G: Hash + Eq + Clone,
{
    assert!(generators.len() > 0, "empty groups do not exist!");

    let mut seen = HashSet::new();
    let mut out = vec![];

    let mut queue: VecDeque<_> = generators.iter().cloned().collect();

    while let Some(g) = queue.pop_front() {
        if seen.insert(g.clone()) {
            queue.extend(generators.iter().map(|h| compose(&g, h)));
            out.push(g);
        }
    }
    out
}
