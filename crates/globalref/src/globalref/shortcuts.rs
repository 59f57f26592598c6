use super::Analyzer;
use crate::addrs::{AbsOutputValue, AbsResource, AbsResourceInstance, Reference, Referenceable};
use crate::lang::Extractor;

impl Analyzer<'_> {
    /// References in the configuration of a resource instance, relative to the instance's module
    ///
    /// All instances of a resource share their configuration, so this ignores the instance key.
    pub fn references_from_resource_instance(&self, addr: &AbsResourceInstance) -> Vec<Reference> {
        let reference = Reference::new(Referenceable::Resource(addr.resource.resource.clone()));
        self.meta_references(&addr.module, &reference).1
    }

    pub fn references_from_output_value(&self, addr: &AbsOutputValue) -> Vec<Reference> {
        let reference = Reference::new(Referenceable::output(&addr.name));
        self.meta_references(&addr.module, &reference).1
    }

    /// References in the `count` or `for_each` argument of a resource
    pub fn references_from_resource_repetition(&self, addr: &AbsResource) -> Vec<Reference> {
        let Some(resource) = self
            .module_config(&addr.module)
            .and_then(|config| config.module.resource(&addr.resource))
        else {
            tracing::debug!(%addr, "resource not in configuration");
            return vec![];
        };

        let mut references = vec![];
        if let Some(expr) = resource.repetition() {
            Extractor::new(&resource.source).expr(expr, &mut references);
        }
        references
    }
}
