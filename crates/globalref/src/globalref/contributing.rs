use super::{AbsReference, Analyzer};
use crate::addrs::AbsResource;
use std::collections::{BTreeMap, HashSet, VecDeque};

impl Analyzer<'_> {
    /// [Analyzer::meta_references] for a reference that carries its module instance
    pub fn meta_references_abs(&self, reference: &AbsReference) -> Vec<AbsReference> {
        let (module, references) = self.meta_references(&reference.module, &reference.reference);
        references
            .into_iter()
            .map(|found| AbsReference::new(module.clone(), found))
            .collect()
    }

    /// All references to resources found by following meta-references from `start`, transitively
    ///
    /// Sorted by their display string, each one reported once.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn contributing_resource_references(&self, start: &[AbsReference]) -> Vec<AbsReference> {
        let mut queue: VecDeque<AbsReference> = start.iter().cloned().collect();
        let mut visited = HashSet::new();
        let mut found = BTreeMap::new();

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.to_string()) {
                continue;
            }

            for next in self.meta_references_abs(&current) {
                if next.reference.subject.resource().is_some() {
                    found.entry(next.to_string()).or_insert_with(|| next.clone());
                }
                queue.push_back(next);
            }
        }

        tracing::trace!(visited = visited.len(), found = found.len(), "walk done");
        found.into_values().collect()
    }

    /// Resources contributing to `start`, see [Analyzer::contributing_resource_references]
    pub fn contributing_resources(&self, start: &[AbsReference]) -> Vec<AbsResource> {
        let mut resources = BTreeMap::new();
        for found in self.contributing_resource_references(start) {
            let Some(resource) = found.reference.subject.resource() else {
                continue;
            };
            let resource = resource.absolute(found.module.clone());
            resources.entry(resource.to_string()).or_insert(resource);
        }
        resources.into_values().collect()
    }
}
