//! Domain ancestry of component classes.

use component_primitives::ComponentClass;

use crate::policy::TemplatePolicy;

/// Resolves the ancestor names advertised for a component.
#[derive(Debug, Clone, Copy)]
pub struct BaseClassResolver<'a> {
    policy: &'a TemplatePolicy,
}

impl<'a> BaseClassResolver<'a> {
    /// Creates a resolver using the policy's infrastructure markers.
    #[must_use]
    pub const fn new(policy: &'a TemplatePolicy) -> Self {
        Self { policy }
    }

    /// Lists the ancestors of `class`, depth first.
    ///
    /// Each ancestor is followed by its own ancestors. Ancestors defined in an
    /// infrastructure module are dropped together with everything above them.
    #[must_use]
    pub fn resolve(&self, class: &ComponentClass) -> Vec<String> {
        let mut names = Vec::new();
        self.collect(class, &mut names);
        names
    }

    fn collect(&self, class: &ComponentClass, names: &mut Vec<String>) {
        for base in class.bases() {
            if self.policy.is_infrastructure(base.module()) {
                continue;
            }
            names.push(base.name().to_owned());
            self.collect(base, names);
        }
    }
}
