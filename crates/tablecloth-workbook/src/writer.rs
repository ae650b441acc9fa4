use tablecloth_spec::Package;

use crate::error::WriteError;
use crate::options::{Backend, TemplateOptions};
use crate::plan::TemplatePlan;

/// A backend that turns a [`TemplatePlan`] into its own output format.
pub trait TemplateWriter {
    type Output;

    const BACKEND: Backend;

    /// Write a plan built for [`Self::BACKEND`].
    fn write_plan(&self, plan: &TemplatePlan) -> Result<Self::Output, WriteError>;

    fn write_package(
        &self,
        package: &Package,
        options: &TemplateOptions,
    ) -> Result<Self::Output, WriteError> {
        let plan = TemplatePlan::build(package, options, Self::BACKEND)?;
        self.write_plan(&plan)
    }
}

pub(crate) fn expect_backend(plan: &TemplatePlan, expected: Backend) -> Result<(), WriteError> {
    if plan.backend == expected {
        Ok(())
    } else {
        Err(WriteError::BackendMismatch {
            expected,
            found: plan.backend,
        })
    }
}
